//! Prompt templates with request and prior-output placeholders.
//!
//! Two placeholders are recognised:
//!
//! - `{{request}}` is replaced with the end user's request
//! - `{{output:<stage_id>}}` is replaced with the verbatim text of a prior stage
//!
//! Anything else between double braces is kept as literal text, so prompts
//! that talk about template syntax survive rendering untouched.

use crate::context::StageInputs;
use crate::errors::UndeclaredDependencyError;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";
const OUTPUT_PREFIX: &str = "output:";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Request,
    Output(String),
}

/// A parsed prompt template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl PromptTemplate {
    /// Parses a template.
    ///
    /// Parsing never fails: an unterminated `{{` is literal text.
    #[must_use]
    pub fn parse(source: impl Into<String>) -> Self {
        let source = source.into();
        let segments = tokenize(&source);
        Self { source, segments }
    }

    /// Returns the raw template text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns true if the template contains a `{{request}}` placeholder.
    #[must_use]
    pub fn references_request(&self) -> bool {
        self.segments.iter().any(|s| matches!(s, Segment::Request))
    }

    /// Returns the stage ids referenced by `{{output:..}}`, in order of first use.
    #[must_use]
    pub fn referenced_outputs(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Output(id) = segment {
                if !ids.contains(&id.as_str()) {
                    ids.push(id);
                }
            }
        }
        ids
    }

    /// Renders the template.
    ///
    /// A referenced dependency that has not produced output renders as an
    /// empty string.
    ///
    /// # Errors
    ///
    /// Returns `UndeclaredDependencyError` if the template references a stage
    /// the inputs do not declare.
    pub fn render(
        &self,
        request: &str,
        inputs: &StageInputs,
    ) -> Result<String, UndeclaredDependencyError> {
        let mut out = String::with_capacity(self.source.len() + request.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Request => out.push_str(request),
                Segment::Output(id) => out.push_str(inputs.get(id)?.unwrap_or_default()),
            }
        }
        Ok(out)
    }
}

fn tokenize(source: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = source;

    while let Some(open) = rest.find(OPEN) {
        let after_open = &rest[open + OPEN.len()..];
        let Some(close) = after_open.find(CLOSE) else {
            break;
        };

        let inner = after_open[..close].trim();
        let placeholder = if inner == "request" {
            Some(Segment::Request)
        } else {
            inner
                .strip_prefix(OUTPUT_PREFIX)
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(|id| Segment::Output(id.to_string()))
        };

        match placeholder {
            Some(segment) => {
                literal.push_str(&rest[..open]);
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(segment);
                rest = &after_open[close + CLOSE.len()..];
            }
            None => {
                // Not ours; keep the opening braces and continue after them.
                literal.push_str(&rest[..open + OPEN.len()]);
                rest = after_open;
            }
        }
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    segments
}
