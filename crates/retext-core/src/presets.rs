//! Built-in rule sets for styled-components sources whose CSS was mangled
//! by a formatter that put spaces around hyphens.

use crate::types::{Occurrence, Rule, RuleError, RuleSet};

/// A named, built-in rule set.
pub struct Preset {
    pub name: &'static str,
    pub description: &'static str,
    build: fn() -> Result<RuleSet, RuleError>,
}

impl Preset {
    pub fn rules(&self) -> Result<RuleSet, RuleError> {
        (self.build)()
    }
}

pub const PRESETS: &[Preset] = &[
    Preset {
        name: "styled-spacing",
        description: "Collapse spaced hyphens in CSS properties, tighten card padding, make the Form scrollable",
        build: styled_spacing,
    },
    Preset {
        name: "styled-components",
        description: "Replace the Spinner..StrengthSegment styled-component definitions with corrected ones",
        build: styled_components,
    },
];

pub fn preset(name: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.name == name)
}

/// Property names a formatter split as `a - b`. Order is irrelevant among
/// these, but they must all run before the `Form` block rule.
const SPACED_PROPERTIES: &[&str] = &[
    "font - size",
    "margin - top",
    "text - align",
    "font - weight",
    "align - items",
    "justify - content",
    "border - radius",
    "border - color",
    "margin - bottom",
    "margin - left",
    "box - shadow",
    "flex - direction",
    "text - decoration",
    "cursor: not - allowed",
];

const CARD_PADDING: &str = "padding: 2rem 2.5rem;";
const CARD_PADDING_REDUCED: &str = "padding: 1.5rem 2.5rem; /* Reduced to save vertical space */";

const FORM_FIXED_HEIGHT: &str = r#"const Form = styled.form`
  display: flex;
  flex-direction: column;
  gap: 0.85rem;
`;"#;

const FORM_SCROLLABLE: &str = r#"const Form = styled.form`
  display: flex;
  flex-direction: column;
  gap: 0.75rem;
  overflow-y: auto;
  overflow-x: hidden;
  padding-right: 0.5rem;
  
  /* Custom Scrollbar for the form */
  &::-webkit-scrollbar {
    width: 4px;
  }
  &::-webkit-scrollbar-track {
    background: transparent;
  }
  &::-webkit-scrollbar-thumb {
    background: #cbd5e1;
    border-radius: 4px;
  }
  &::-webkit-scrollbar-thumb:hover {
    background: #94a3b8;
  }
`;"#;

/// Lazily spans from the Spinner definition to the end of StrengthSegment.
const COMPONENTS_SPAN: &str =
    r"(?s)const Spinner = styled\.div`.*?const StrengthSegment = styled\.div`\n.*?\n`;";

/// Ends with the closing backtick line, without a trailing newline, so the
/// span pattern matches this text exactly and a second run is a no-op.
const COMPONENTS: &str = r#"const Spinner = styled.div`
  border: 2px solid rgba(255,255,255,0.3);
  border-top: 2px solid #fff;
  border-radius: 50%;
  width: 18px;
  height: 18px;
  animation: spin 0.8s linear infinite;
  display: inline-block;
  vertical-align: middle;

  @keyframes spin {
    from { transform: rotate(0deg); }
    to { transform: rotate(360deg); }
  }
`;

const GradientDivider = styled.div`
  display: flex;
  align-items: center;
  margin: 1.5rem 0;
  color: #94a3b8;
  font-size: 0.875rem;
  font-weight: 500;
  
  &::before,
  &::after {
    content: '';
    flex: 1;
    height: 1px;
    background: linear-gradient(to right, 
      rgba(226, 232, 240, 0), 
      rgba(226, 232, 240, 1), 
      rgba(226, 232, 240, 0)
    );
  }
  
  &::before { margin-right: 1rem; }
  &::after { margin-left: 1rem; }
`;

const ErrorMessage = styled.div`
  background: #fef2f2;
  border: 1px solid #fecaca;
  color: #dc2626;
  padding: 0.875rem;
  border-radius: 12px;
  font-size: 0.875rem;
  font-weight: 500;
  margin-bottom: 1.25rem;
  text-align: center;
`;

const ResendLink = styled.button`
  background: none;
  border: none;
  color: #2563eb;
  font-size: 0.875rem;
  font-weight: 600;
  cursor: pointer;
  padding: 0;
  transition: all 0.2s;
  
  &:hover {
    color: #1d4ed8;
    text-decoration: underline;
  }
  
  &:disabled {
    color: #94a3b8;
    cursor: not-allowed;
    text-decoration: none;
  }
`;

const OtpContainer = styled.div`
  display: flex;
  justify-content: space-between;
  gap: 0.5rem;
  margin-top: 0.75rem;
`;

const OtpBox = styled.input`
  width: 50px;
  height: 55px;
  padding: 0;
  border: 1px solid #e2e8f0;
  border-radius: 12px;
  font-size: 1.5rem;
  font-weight: 700;
  text-align: center;
  background: #ffffff;
  color: #0f172a;
  transition: all 0.3s;

  &:focus {
    outline: none;
    border-color: #3b82f6;
    box-shadow: 0 0 0 4px rgba(59, 130, 246, 0.15);
    transform: scale(1.05);
  }

  &::placeholder {
    color: #cbd5e1;
    font-weight: 400;
    font-size: 1rem;
  }
`;

const Row = styled.div`
  display: flex;
  gap: 1rem;
  @media (max-width: 640px) {
    flex-direction: column;
    gap: 1.25rem;
  }
`;

const StrengthMeter = styled.div`
  display: flex;
  gap: 4px;
  height: 4px;
  margin-top: 0.5rem;
`;

const StrengthSegment = styled.div`
  flex: 1;
  background: ${props => props.$active ? props.$color : '#e2e8f0'};
  border-radius: 2px;
  transition: background 0.3s ease;
  
  &.active {
    background: ${props => {
      if (props.$score <= 1) return '#ef4444';
      if (props.$score === 2) return '#f59e0b';
      if (props.$score === 3) return '#84cc16';
      return '#10b981';
    }};
  }
`;"#;

fn styled_spacing() -> Result<RuleSet, RuleError> {
    let mut rules = RuleSet::new();
    for prop in SPACED_PROPERTIES {
        rules.push(Rule::literal(*prop, prop.replace(" - ", "-"))?);
    }
    rules.push(Rule::literal(CARD_PADDING, CARD_PADDING_REDUCED)?.named("card padding"));
    rules.push(Rule::literal(FORM_FIXED_HEIGHT, FORM_SCROLLABLE)?.named("scrollable Form"));
    Ok(rules)
}

fn styled_components() -> Result<RuleSet, RuleError> {
    let rule = Rule::pattern(COMPONENTS_SPAN, COMPONENTS, Occurrence::First)?
        .named("Spinner..StrengthSegment definitions");
    Ok(RuleSet::new().with(rule))
}
