//! Parser and canonical formatter for Go composite literals.
//!
//! [`canonicalize`] parses one literal expression and prints it the way gofmt
//! would: tab indentation, one element per line with trailing commas for
//! multi-line composites, and aligned values for runs of keyed elements.
//!
//! ```
//! let out = protolit_fmt::canonicalize("&pkg.T{\nA: 1,\nLong: []byte{1,2},\n}").unwrap();
//! assert_eq!(out, "&pkg.T{\n\tA:    1,\n\tLong: []byte{1, 2},\n}\n");
//! ```

pub mod ast;
mod builder;
pub mod config;
pub mod doc;
mod error;
mod lexer;
mod parser;
pub mod printer;

pub use config::{FormatConfig, IndentStyle, NewlineStyle};
pub use error::{Pos, SyntaxError};
pub use parser::parse;

use crate::ast::Expr;
use crate::builder::LiteralBuilder;
use crate::printer::Printer;

/// Validates literal text and rewrites it into canonical layout.
pub trait Canonicalize {
    fn canonicalize(&self, text: &str) -> Result<String, SyntaxError>;
}

/// The Go literal formatter.
#[derive(Debug, Clone, Default)]
pub struct GoLiteralFormatter {
    config: FormatConfig,
}

impl GoLiteralFormatter {
    pub fn new(config: FormatConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FormatConfig {
        &self.config
    }

    /// Print a parsed expression, newline-terminated.
    pub fn format_expr(&self, expr: &Expr) -> String {
        let doc = LiteralBuilder::new(&self.config).build(expr);
        let mut out = Printer::new(&self.config).print(&doc);
        out.push_str(self.config.newline.as_str());
        out
    }
}

impl Canonicalize for GoLiteralFormatter {
    fn canonicalize(&self, text: &str) -> Result<String, SyntaxError> {
        tracing::debug!(bytes = text.len(), "canonicalizing literal");
        let expr = parse(text)?;
        Ok(self.format_expr(&expr))
    }
}

/// Canonicalize with the default configuration.
pub fn canonicalize(text: &str) -> Result<String, SyntaxError> {
    GoLiteralFormatter::default().canonicalize(text)
}
