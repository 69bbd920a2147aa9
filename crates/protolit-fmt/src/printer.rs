//! Writes a [`Doc`] out as text.

use crate::config::FormatConfig;
use crate::doc::Doc;

pub struct Printer<'c> {
    config: &'c FormatConfig,
}

impl<'c> Printer<'c> {
    pub fn new(config: &'c FormatConfig) -> Self {
        Self { config }
    }

    pub fn print(&self, doc: &Doc) -> String {
        let mut out = String::new();
        self.write(doc, 0, &mut out);
        out
    }

    fn write(&self, doc: &Doc, level: usize, out: &mut String) {
        match doc {
            Doc::Nil => {}
            Doc::Text(text) => out.push_str(text),
            Doc::HardLine => {
                out.push_str(self.config.newline.as_str());
                self.config.indent.write(out, level);
            }
            Doc::Indent(inner) => self.write(inner, level + 1, out),
            Doc::Seq(parts) => {
                for part in parts {
                    self.write(part, level, out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{IndentStyle, NewlineStyle};

    fn braces(inner: Doc) -> Doc {
        Doc::seq([
            Doc::text("{"),
            Doc::indent(Doc::seq([Doc::hardline(), inner])),
            Doc::hardline(),
            Doc::text("}"),
        ])
    }

    #[test]
    fn test_text_only() {
        let config = FormatConfig::default();
        let doc = Doc::seq([Doc::text("[]byte"), Doc::text("{1, 2}")]);
        assert_eq!(Printer::new(&config).print(&doc), "[]byte{1, 2}");
    }

    #[test]
    fn test_nested_levels() {
        let config = FormatConfig::default();
        let doc = braces(Doc::text("A: ").concat(braces(Doc::text("B: 1,"))).concat(Doc::text(",")));
        assert_eq!(
            Printer::new(&config).print(&doc),
            "{\n\tA: {\n\t\tB: 1,\n\t},\n}"
        );
    }

    #[test]
    fn test_spaces_and_crlf() {
        let config = FormatConfig::new()
            .with_indent(IndentStyle::Spaces(2))
            .with_newline(NewlineStyle::Crlf);
        let doc = braces(Doc::text("x"));
        assert_eq!(Printer::new(&config).print(&doc), "{\r\n  x\r\n}");
    }
}
