//! Syntax tree to Doc IR.
//!
//! Layout follows gofmt: a composite keeps the line structure of its source
//! (all on one line, or one element per line), and runs of single-line keyed
//! elements align their values in a column.

use crate::ast::{ArrayLen, BasicLit, CompositeLit, Element, Expr, LitKind};
use crate::config::FormatConfig;
use crate::doc::Doc;

/// Keys up to this many bytes always align with their neighbours.
const SMALL_KEY: usize = 40;
/// Size ratio against the running geometric mean that breaks an alignment run.
const KEY_RATIO: f64 = 2.5;

pub struct LiteralBuilder<'c> {
    config: &'c FormatConfig,
}

impl<'c> LiteralBuilder<'c> {
    pub fn new(config: &'c FormatConfig) -> Self {
        Self { config }
    }

    pub fn build(&self, expr: &Expr) -> Doc {
        match expr {
            Expr::Ident(name) => Doc::text(name.clone()),
            Expr::BasicLit(lit) => Doc::text(normalize_literal(lit)),
            Expr::Selector(x, name) => self.build(x).concat(Doc::text(format!(".{name}"))),
            Expr::Unary(op, x) => {
                let operand = self.build(x);
                let op = op.as_str();
                // `- -x` must not print as the `--` operator.
                let combines = match (op, operand.first_char()) {
                    ("-", Some('-')) | ("+", Some('+')) => true,
                    ("&", Some('&' | '^')) => true,
                    _ => false,
                };
                let op = if combines { format!("{op} ") } else { op.to_string() };
                Doc::text(op).concat(operand)
            }
            Expr::Star(x) => Doc::text("*").concat(self.build(x)),
            Expr::Paren(x) => Doc::text("(").concat(self.build(x)).concat(Doc::text(")")),
            Expr::Call { func, args } => {
                let args = Doc::join(args.iter().map(|arg| self.build(arg)), Doc::text(", "));
                self.build(func)
                    .concat(Doc::text("("))
                    .concat(args)
                    .concat(Doc::text(")"))
            }
            Expr::ArrayType { len, elem } => {
                let len = match len {
                    ArrayLen::Slice => Doc::Nil,
                    ArrayLen::Ellipsis => Doc::text("..."),
                    ArrayLen::Fixed(len) => self.build(len),
                };
                Doc::text("[")
                    .concat(len)
                    .concat(Doc::text("]"))
                    .concat(self.build(elem))
            }
            Expr::MapType { key, value } => Doc::text("map[")
                .concat(self.build(key))
                .concat(Doc::text("]"))
                .concat(self.build(value)),
            Expr::Composite(lit) => self.composite(lit),
        }
    }

    fn composite(&self, lit: &CompositeLit) -> Doc {
        let mut parts = Vec::with_capacity(5);
        if let Some(ty) = &lit.ty {
            parts.push(self.build(ty));
        }
        parts.push(Doc::text("{"));
        if lit.elements.is_empty() {
            // T{}
        } else if !lit.multiline {
            let elements = lit.elements.iter().map(|element| self.element(element, None));
            parts.push(Doc::join(elements, Doc::text(", ")));
        } else {
            let columns = self.key_columns(&lit.elements);
            let lines = lit.elements.iter().zip(columns).map(|(element, column)| {
                Doc::seq([Doc::hardline(), self.element(element, column), Doc::text(",")])
            });
            parts.push(Doc::indent(Doc::seq(lines)));
            parts.push(Doc::hardline());
        }
        parts.push(Doc::text("}"));
        Doc::seq(parts)
    }

    /// `column` is the width the key cell (key, colon and padding) is
    /// stretched to when the element takes part in an alignment run.
    fn element(&self, element: &Element, column: Option<usize>) -> Doc {
        let value = self.build(&element.value);
        let Some(key) = &element.key else {
            return value;
        };
        let key = self.build(key);
        let cell = key.flat_width().chars + 1;
        let padding = column.map_or(1, |column| column.saturating_sub(cell).max(1));
        key.concat(Doc::text(format!(":{}", " ".repeat(padding))))
            .concat(value)
    }

    /// Decide the key column of every element of a multi-line composite.
    ///
    /// Mirrors gofmt's expression-list heuristic: an element's size is its key
    /// width for single-line keyed elements, its full width for other
    /// single-line elements and zero for multi-line ones. A run ends at a
    /// multi-line or unkeyed element, or when a large key differs too much
    /// from the geometric mean of the sizes seen so far.
    fn key_columns(&self, elements: &[Element]) -> Vec<Option<usize>> {
        let mut columns = vec![None; elements.len()];
        if !self.config.align_keys || elements.len() < 2 {
            return columns;
        }

        let mut run: Vec<(usize, usize)> = Vec::new();
        let mut size = 0;
        let mut lnsum = 0.0;
        let mut count = 0;

        for (index, element) in elements.iter().enumerate() {
            let prev_size = size;
            let key_width = element.key.as_ref().map(|key| self.build(key).flat_width());
            size = match key_width {
                _ if !element.is_single_line() => 0,
                Some(width) => width.bytes,
                None => self.build(&element.value).flat_width().bytes,
            };

            let mut breaks_run = true;
            if prev_size > 0 && size > 0 {
                if count == 0 || prev_size <= SMALL_KEY && size <= SMALL_KEY {
                    breaks_run = false;
                } else {
                    let geomean = (lnsum / count as f64).exp();
                    let ratio = size as f64 / geomean;
                    breaks_run = KEY_RATIO * ratio <= 1.0 || KEY_RATIO <= ratio;
                }
            }

            let aligned = size > 0 && key_width.is_some();
            if breaks_run || !aligned {
                flush_run(&mut run, &mut columns);
            }
            if let (true, Some(width)) = (aligned, key_width) {
                run.push((index, width.chars + 1));
            }

            if size > 0 {
                lnsum += (size as f64).ln();
                count += 1;
            }
        }
        flush_run(&mut run, &mut columns);
        columns
    }
}

fn flush_run(run: &mut Vec<(usize, usize)>, columns: &mut [Option<usize>]) {
    let Some(widest) = run.iter().map(|&(_, cell)| cell).max() else {
        return;
    };
    for &(index, _) in run.iter() {
        columns[index] = Some(widest + 1);
    }
    run.clear();
}

/// Lower-case base prefixes and exponents, and drop leading zeros of integer
/// imaginary literals. Hexadecimal digits keep their case.
fn normalize_literal(lit: &BasicLit) -> String {
    if !matches!(lit.kind, LitKind::Int | LitKind::Float | LitKind::Imag) {
        return lit.text.clone();
    }
    let text = lit.text.as_str();
    let bytes = text.as_bytes();
    if bytes.len() >= 2 && bytes[0] == b'0' && matches!(bytes[1].to_ascii_lowercase(), b'x' | b'o' | b'b') {
        let prefix = bytes[1].to_ascii_lowercase();
        let mut rest = text[2..].to_string();
        if prefix == b'x' {
            rest = rest.replace('P', "p");
        }
        return format!("0{}{rest}", prefix as char);
    }

    let text = text.replace('E', "e");
    if lit.kind == LitKind::Imag && !text.contains(['.', 'e']) {
        let digits = text.trim_start_matches('0');
        return if digits == "i" { "0i".to_string() } else { digits.to_string() };
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::printer::Printer;

    fn format(src: &str) -> String {
        let config = FormatConfig::default();
        let expr = parse(src).unwrap();
        Printer::new(&config).print(&LiteralBuilder::new(&config).build(&expr))
    }

    #[test]
    fn test_literal_normalization() {
        assert_eq!(format("0X1F"), "0x1F");
        assert_eq!(format("0B101"), "0b101");
        assert_eq!(format("0x1P-2"), "0x1p-2");
        assert_eq!(format("1E+06"), "1e+06");
        assert_eq!(format("0123i"), "123i");
        assert_eq!(format("00i"), "0i");
        assert_eq!(format("0.5i"), "0.5i");
    }

    #[test]
    fn test_unary_spacing() {
        assert_eq!(format("- -1"), "- -1");
        assert_eq!(format("-(-1)"), "-(-1)");
        assert_eq!(format("& ^x"), "& ^x");
        assert_eq!(format("&T{}"), "&T{}");
    }

    #[test]
    fn test_single_line_composite() {
        assert_eq!(format("T{ a : 1 ,b:2 }"), "T{a: 1, b: 2}");
        assert_eq!(format("[]byte{1,2,3,}"), "[]byte{1, 2, 3}");
    }

    #[test]
    fn test_alignment_run() {
        assert_eq!(
            format("T{\nA: 1,\nLonger: 2,\n}"),
            "T{\n\tA:      1,\n\tLonger: 2,\n}"
        );
    }

    #[test]
    fn test_multiline_element_breaks_run() {
        assert_eq!(
            format("T{\nA: 1,\nB: U{\nC: 2,\n},\nLonger: 3,\n}"),
            "T{\n\tA: 1,\n\tB: U{\n\t\tC: 2,\n\t},\n\tLonger: 3,\n}"
        );
    }

    #[test]
    fn test_unkeyed_element_breaks_run() {
        assert_eq!(
            format("T{\nA: 1,\n2,\nLonger: 3,\n}"),
            "T{\n\tA: 1,\n\t2,\n\tLonger: 3,\n}"
        );
    }

    #[test]
    fn test_long_key_breaks_run() {
        let long = "K".repeat(45);
        let src = format!("T{{\nA: 1,\n{long}: 2,\nB: 3,\n}}");
        let expected = format!("T{{\n\tA: 1,\n\t{long}: 2,\n\tB: 3,\n}}");
        assert_eq!(format(&src), expected);
    }

    #[test]
    fn test_long_keys_of_similar_size_align() {
        let first = "K".repeat(45);
        let second = "L".repeat(50);
        let src = format!("T{{\n{first}: 1,\n{second}: 2,\n}}");
        let padding = " ".repeat(6);
        let expected = format!("T{{\n\t{first}:{padding}1,\n\t{second}: 2,\n}}");
        assert_eq!(format(&src), expected);
    }

    #[test]
    fn test_no_alignment_when_disabled() {
        let config = FormatConfig::new().with_align_keys(false);
        let expr = parse("T{\nA: 1,\nLonger: 2,\n}").unwrap();
        let out = Printer::new(&config).print(&LiteralBuilder::new(&config).build(&expr));
        assert_eq!(out, "T{\n\tA: 1,\n\tLonger: 2,\n}");
    }
}
