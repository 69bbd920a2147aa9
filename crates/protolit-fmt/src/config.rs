//! Knobs for the literal formatter.
//!
//! The defaults reproduce gofmt. Everything else exists for callers that
//! embed literals in files with their own conventions.

/// How one level of indentation is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndentStyle {
    #[default]
    Tab,
    Spaces(usize),
}

impl IndentStyle {
    pub(crate) fn write(self, out: &mut String, level: usize) {
        match self {
            IndentStyle::Tab => out.extend(std::iter::repeat_n('\t', level)),
            IndentStyle::Spaces(width) => out.extend(std::iter::repeat_n(' ', level * width)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NewlineStyle {
    #[default]
    Lf,
    Crlf,
}

impl NewlineStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            NewlineStyle::Lf => "\n",
            NewlineStyle::Crlf => "\r\n",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatConfig {
    pub indent: IndentStyle,
    /// Pad keys so the values of a run of single-line keyed elements start
    /// in the same column.
    pub align_keys: bool,
    pub newline: NewlineStyle,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            indent: IndentStyle::Tab,
            align_keys: true,
            newline: NewlineStyle::Lf,
        }
    }
}

impl FormatConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_indent(self, indent: IndentStyle) -> Self {
        Self { indent, ..self }
    }

    pub fn with_align_keys(self, align_keys: bool) -> Self {
        Self { align_keys, ..self }
    }

    pub fn with_newline(self, newline: NewlineStyle) -> Self {
        Self { newline, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent_levels() {
        let mut out = String::new();
        IndentStyle::Tab.write(&mut out, 2);
        assert_eq!(out, "\t\t");

        let mut out = String::new();
        IndentStyle::Spaces(2).write(&mut out, 3);
        assert_eq!(out, "      ");

        let mut out = String::new();
        IndentStyle::Spaces(4).write(&mut out, 0);
        assert_eq!(out, "");
    }

    #[test]
    fn test_defaults_match_gofmt() {
        let config = FormatConfig::new();
        assert_eq!(config.indent, IndentStyle::Tab);
        assert!(config.align_keys);
        assert_eq!(config.newline.as_str(), "\n");
    }
}
