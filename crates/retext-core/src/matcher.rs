use crate::types::Occurrence;
use regex::Regex;
use std::ops::Range;

pub fn literal_spans(haystack: &str, needle: &str) -> Vec<Range<usize>> {
    if needle.is_empty() {
        return Vec::new();
    }
    haystack
        .match_indices(needle)
        .map(|(idx, m)| idx..idx + m.len())
        .collect()
}

/// Spans running from each `start` delimiter through the first `end`
/// delimiter that follows it. Both delimiters are part of the span.
pub fn block_spans(haystack: &str, start: &str, end: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    if start.is_empty() || end.is_empty() {
        return spans;
    }

    let mut pos = 0;
    while let Some(rel_start) = haystack[pos..].find(start) {
        let span_start = pos + rel_start;
        let body = span_start + start.len();
        match haystack[body..].find(end) {
            Some(rel_end) => {
                let span_end = body + rel_end + end.len();
                spans.push(span_start..span_end);
                pos = span_end;
            }
            None => break,
        }
    }
    spans
}

pub fn pattern_spans(haystack: &str, regex: &Regex) -> Vec<Range<usize>> {
    regex
        .find_iter(haystack)
        .filter(|m| !m.is_empty())
        .map(|m| m.range())
        .collect()
}

pub fn select(mut spans: Vec<Range<usize>>, occurrence: Occurrence) -> Vec<Range<usize>> {
    match occurrence {
        Occurrence::All => spans,
        Occurrence::First => {
            spans.truncate(1);
            spans
        }
        Occurrence::Last => spans.pop().into_iter().collect(),
    }
}

/// Rebuilds `haystack` with each span swapped for `replacement`. Spans must be
/// sorted and non-overlapping.
pub fn splice(haystack: &str, spans: &[Range<usize>], replacement: &str) -> String {
    let mut out = String::with_capacity(haystack.len());
    let mut cursor = 0;
    for span in spans {
        out.push_str(&haystack[cursor..span.start]);
        out.push_str(replacement);
        cursor = span.end;
    }
    out.push_str(&haystack[cursor..]);
    out
}
