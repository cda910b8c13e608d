use super::ParseError;
use crate::types::Occurrence;

pub const MARKER_SEARCH_START: &str = "<<<<<<< SEARCH";
pub const MARKER_BLOCK_START: &str = "<<<<<<< BLOCK";
pub const MARKER_PATTERN_START: &str = "<<<<<<< PATTERN";
pub const MARKER_BLOCK_DIVIDER: &str = "-------";
pub const MARKER_DIVIDER: &str = "=======";
pub const MARKER_REPLACE_END: &str = ">>>>>>> REPLACE";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceKind {
    Search,
    Block(Occurrence),
    Pattern(Occurrence),
}

/// Recognizes an opening fence on an already trimmed line. Returns `None`
/// for ordinary text.
pub fn parse_opening(stripped: &str, line_no: usize) -> Option<Result<FenceKind, ParseError>> {
    if stripped == MARKER_SEARCH_START {
        return Some(Ok(FenceKind::Search));
    }
    if let Some(rest) = marker_argument(stripped, MARKER_BLOCK_START) {
        return Some(parse_occurrence(rest, line_no).map(FenceKind::Block));
    }
    if let Some(rest) = marker_argument(stripped, MARKER_PATTERN_START) {
        return Some(parse_occurrence(rest, line_no).map(FenceKind::Pattern));
    }
    None
}

/// Text after `marker`, provided the marker stands alone or is followed by
/// whitespace. `<<<<<<< BLOCKS` is not a block marker.
fn marker_argument<'a>(stripped: &'a str, marker: &str) -> Option<&'a str> {
    let rest = stripped.strip_prefix(marker)?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest.trim())
    } else {
        None
    }
}

fn parse_occurrence(word: &str, line_no: usize) -> Result<Occurrence, ParseError> {
    if word.is_empty() {
        return Ok(Occurrence::default());
    }
    word.parse().map_err(|source| ParseError::InvalidRule {
        line: line_no,
        source,
    })
}

/// Drops the line terminator that separates a section from the next marker.
pub fn strip_terminator(section: String) -> String {
    if let Some(s) = section.strip_suffix("\r\n") {
        s.to_string()
    } else if let Some(s) = section.strip_suffix('\n') {
        s.to_string()
    } else {
        section
    }
}
