//! Turning walker events into literal text.

use protolit_fmt::{Canonicalize, GoLiteralFormatter, SyntaxError};
use protolit_reflect::{DynamicMessage, ValueRef};
use thiserror::Error;
use tracing::{debug, trace};

use crate::literal;
use crate::nesting::NestingStack;
use crate::walk::{Step, Visitor, walk};

#[derive(Debug, Error)]
pub enum RenderError {
    /// The renderer produced text the canonicalizer rejects. Always a defect
    /// in the renderer, never in the input.
    #[error("generated literal does not parse: {source}\n{raw}")]
    Malformed { source: SyntaxError, raw: String },
}

/// Writes one fragment per walker event into a buffer.
#[derive(Debug, Default)]
struct LiteralWriter {
    out: String,
    nesting: NestingStack,
}

impl LiteralWriter {
    fn separator(&mut self) {
        self.out.push_str(self.nesting.separator());
    }

    fn close(&mut self) {
        self.nesting.pop();
        self.out.push('}');
        self.separator();
    }

    fn enum_value(step: &Step<'_>, number: i32) -> String {
        let enumeration = step
            .field()
            .map(|field| field.field_type())
            .and_then(|ty| ty.as_enum().cloned());
        match enumeration {
            Some(enumeration) => match enumeration.value_by_number(number) {
                Some(value) => enumeration.go_constant(value.name),
                None => {
                    debug!(
                        enumeration = enumeration.full_name(),
                        number, "enum number has no symbol, writing it raw"
                    );
                    number.to_string()
                }
            },
            None => number.to_string(),
        }
    }
}

impl<'a> Visitor<'a> for LiteralWriter {
    fn push(&mut self, step: &Step<'a>, value: ValueRef<'a>) {
        trace!(%step, depth = self.nesting.depth(), "push");
        match step {
            Step::Field(field) => match field.real_oneof() {
                Some(oneof) => {
                    let exported = literal::export(field.name());
                    self.out.push_str(&format!(
                        "{}: &{}_{exported}{{\n{exported}: ",
                        oneof.name(),
                        field.containing_message().go_name(),
                    ));
                    self.nesting.push();
                }
                None => {
                    self.out.push_str(field.name());
                    self.out.push_str(": ");
                }
            },
            Step::MapEntry { key, .. } => {
                self.out.push_str(&literal::map_key(key));
                self.out.push_str(": ");
            }
            Step::Root | Step::ListIndex { .. } => {}
        }

        match value {
            ValueRef::Message(message) => {
                if step.is_element() {
                    self.out.push_str("{\n");
                } else {
                    self.out.push('&');
                    self.out.push_str(message.descriptor().go_name());
                    self.out.push_str("{\n");
                }
                self.nesting.push();
            }
            ValueRef::List(_) => {
                let elem = step.field().map(|field| field.field_type().go_type()).unwrap_or_default();
                self.out.push_str(&format!("[]{elem}{{\n"));
                self.nesting.push();
            }
            ValueRef::Map(_) => {
                let (key, elem) = step
                    .field()
                    .map(|field| {
                        let key = field.map_key_kind().and_then(|kind| kind.go_type()).unwrap_or_default();
                        (key, field.field_type().go_type())
                    })
                    .unwrap_or_default();
                self.out.push_str(&format!("map[{key}]{elem}{{\n"));
                self.nesting.push();
            }
            ValueRef::Enum(number) => {
                self.out.push_str(&Self::enum_value(step, number));
                self.separator();
            }
            ValueRef::Bytes(bytes) => {
                self.out.push_str(&literal::bytes(bytes));
                self.separator();
            }
            ValueRef::String(string) => {
                self.out.push_str(&literal::quote(string));
                self.separator();
            }
            ValueRef::Scalar(scalar) => {
                self.out.push_str(&literal::scalar(scalar));
                self.separator();
            }
        }
    }

    fn pop(&mut self, step: &Step<'a>, value: ValueRef<'a>) {
        trace!(%step, depth = self.nesting.depth(), "pop");
        if matches!(value, ValueRef::Message(_) | ValueRef::List(_) | ValueRef::Map(_)) {
            self.close();
        }
        // The union wrapper closes after the member's own value.
        if let Step::Field(field) = step
            && field.real_oneof().is_some()
        {
            self.close();
        }
    }
}

/// Renders messages, feeding the raw text through a canonicalizer.
#[derive(Debug, Clone, Default)]
pub struct Renderer<C = GoLiteralFormatter> {
    canonicalizer: C,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Canonicalize> Renderer<C> {
    pub fn with_canonicalizer(canonicalizer: C) -> Self {
        Self { canonicalizer }
    }

    /// The text before canonicalization. Empty for `None`.
    pub fn render_raw<'a>(&self, message: impl Into<Option<&'a DynamicMessage>>) -> String {
        let Some(message) = message.into() else {
            return String::new();
        };
        let mut writer = LiteralWriter::default();
        walk(message, &mut writer);
        debug_assert_eq!(writer.nesting.depth(), 0);
        writer.out
    }

    pub fn try_render<'a>(
        &self,
        message: impl Into<Option<&'a DynamicMessage>>,
    ) -> Result<String, RenderError> {
        let Some(message) = message.into() else {
            return Ok(String::new());
        };
        let raw = self.render_raw(message);
        debug!(
            message = message.descriptor().full_name(),
            bytes = raw.len(),
            "rendered raw literal"
        );
        self.canonicalizer
            .canonicalize(&raw)
            .map_err(|source| RenderError::Malformed { source, raw })
    }

    /// Like [`Self::try_render`], but a canonicalization failure panics with
    /// the raw text.
    pub fn render<'a>(&self, message: impl Into<Option<&'a DynamicMessage>>) -> String {
        match self.try_render(message) {
            Ok(text) => text,
            Err(RenderError::Malformed { source, raw }) => {
                panic!("error formatting generated literal:\n{raw}\n{source}")
            }
        }
    }
}
