//! Minimal HTML template for the switch view.
//!
//! Syntax is literal text with `{{.Field}}` placeholders (inner whitespace
//! allowed). Fields resolve by name against the JSON object produced by
//! serializing the view model, and every substituted value is HTML-escaped.
//!
//! Parsing happens once at load; field lookup happens per render, so a
//! template naming a field the model lacks fails at render time.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum TemplateError {
    /// The template file could not be read.
    Io { path: PathBuf, source: std::io::Error },
    /// Malformed placeholder at byte `offset` of the source.
    Syntax { offset: usize, reason: &'static str },
    /// The view model could not fill the template.
    Render(String),
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::Io { path, source } => {
                write!(f, "template read failed for '{}': {source}", path.display())
            }
            TemplateError::Syntax { offset, reason } => {
                write!(f, "template syntax error at byte {offset}: {reason}")
            }
            TemplateError::Render(msg) => write!(f, "template render failed: {msg}"),
        }
    }
}

impl std::error::Error for TemplateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TemplateError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Template
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(String),
}

/// A parsed switch view template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchTemplate {
    segments: Vec<Segment>,
}

impl SwitchTemplate {
    /// Read and parse the template at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| TemplateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&source)
    }

    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut rest = source;
        let mut consumed = 0usize;

        while let Some(open) = rest.find("{{") {
            if open > 0 {
                segments.push(Segment::Literal(rest[..open].to_string()));
            }
            let offset = consumed + open;
            let after_open = &rest[open + 2..];
            let Some(close) = after_open.find("}}") else {
                return Err(TemplateError::Syntax {
                    offset,
                    reason: "unterminated '{{'",
                });
            };

            let inner = after_open[..close].trim();
            let Some(name) = inner.strip_prefix('.') else {
                return Err(TemplateError::Syntax {
                    offset,
                    reason: "placeholder must start with '.'",
                });
            };
            if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(TemplateError::Syntax {
                    offset,
                    reason: "placeholder field name must be [A-Za-z0-9_]+",
                });
            }
            segments.push(Segment::Field(name.to_string()));

            let advance = open + 2 + close + 2;
            consumed += advance;
            rest = &rest[advance..];
        }

        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        Ok(Self { segments })
    }

    /// Field names referenced by the template, in order of appearance.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Field(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Fill the template from `model`, which must serialize to a JSON object.
    pub fn render<T: Serialize>(&self, model: &T) -> Result<String, TemplateError> {
        let value = serde_json::to_value(model)
            .map_err(|e| TemplateError::Render(format!("view model not serializable: {e}")))?;
        let Value::Object(fields) = value else {
            return Err(TemplateError::Render(
                "view model must serialize to an object".to_string(),
            ));
        };

        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(name) => {
                    let v = fields.get(name).ok_or_else(|| {
                        TemplateError::Render(format!("view model has no field '{name}'"))
                    })?;
                    match v {
                        Value::String(s) => escape_html_into(&mut out, s),
                        Value::Number(n) => out.push_str(&n.to_string()),
                        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
                        _ => {
                            return Err(TemplateError::Render(format!(
                                "field '{name}' is not a scalar"
                            )))
                        }
                    }
                }
            }
        }
        Ok(out)
    }
}

fn escape_html_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
