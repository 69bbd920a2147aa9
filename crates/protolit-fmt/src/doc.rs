//! Layout tree passed from the builder to the printer.
//!
//! The builder already knows whether a composite is written on one line or
//! one element per line, so there are no groups or soft breaks here. A tree
//! only needs text, forced breaks and indentation.

use std::borrow::Cow;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Doc {
    Nil,
    /// Text without line breaks.
    Text(Cow<'static, str>),
    /// A newline followed by the indentation of the enclosing level.
    HardLine,
    /// Breaks inside are indented one level deeper.
    Indent(Box<Doc>),
    Seq(Vec<Doc>),
}

impl Doc {
    pub fn text(s: impl Into<Cow<'static, str>>) -> Doc {
        let s = s.into();
        if s.is_empty() { Doc::Nil } else { Doc::Text(s) }
    }

    pub fn hardline() -> Doc {
        Doc::HardLine
    }

    pub fn indent(doc: Doc) -> Doc {
        match doc {
            Doc::Nil => Doc::Nil,
            doc => Doc::Indent(Box::new(doc)),
        }
    }

    /// Lay the parts out in order. Nested sequences are flattened.
    pub fn seq(parts: impl IntoIterator<Item = Doc>) -> Doc {
        let mut flat = Vec::new();
        for part in parts {
            match part {
                Doc::Nil => {}
                Doc::Seq(inner) => flat.extend(inner),
                part => flat.push(part),
            }
        }
        match flat.len() {
            0 => Doc::Nil,
            1 => flat.pop().unwrap_or(Doc::Nil),
            _ => Doc::Seq(flat),
        }
    }

    pub fn concat(self, other: Doc) -> Doc {
        Doc::seq([self, other])
    }

    pub fn join(docs: impl IntoIterator<Item = Doc>, sep: Doc) -> Doc {
        let mut parts = Vec::new();
        for (index, doc) in docs.into_iter().enumerate() {
            if index > 0 {
                parts.push(sep.clone());
            }
            parts.push(doc);
        }
        Doc::seq(parts)
    }

    /// Byte and character length of the document printed on one line.
    pub fn flat_width(&self) -> FlatWidth {
        match self {
            Doc::Text(text) => FlatWidth {
                bytes: text.len(),
                chars: text.chars().count(),
            },
            Doc::Seq(parts) => parts.iter().map(Doc::flat_width).fold(FlatWidth::default(), |acc, w| FlatWidth {
                bytes: acc.bytes + w.bytes,
                chars: acc.chars + w.chars,
            }),
            Doc::Indent(inner) => inner.flat_width(),
            Doc::Nil | Doc::HardLine => FlatWidth::default(),
        }
    }

    pub fn first_char(&self) -> Option<char> {
        match self {
            Doc::Text(text) => text.chars().next(),
            Doc::Seq(parts) => parts.iter().find_map(Doc::first_char),
            Doc::Indent(inner) => inner.first_char(),
            Doc::Nil | Doc::HardLine => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlatWidth {
    pub bytes: usize,
    pub chars: usize,
}
