//! Syntax tree for a single Go literal expression.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Ident(String),
    BasicLit(BasicLit),
    /// `x.name`
    Selector(Box<Expr>, String),
    Unary(UnaryOp, Box<Expr>),
    /// `*x`, a pointer type or a dereference.
    Star(Box<Expr>),
    Paren(Box<Expr>),
    Call { func: Box<Expr>, args: Vec<Expr> },
    ArrayType { len: ArrayLen, elem: Box<Expr> },
    MapType { key: Box<Expr>, value: Box<Expr> },
    Composite(CompositeLit),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Addr,
    Neg,
    Pos,
    Not,
    Xor,
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Addr => "&",
            UnaryOp::Neg => "-",
            UnaryOp::Pos => "+",
            UnaryOp::Not => "!",
            UnaryOp::Xor => "^",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LitKind {
    Int,
    Float,
    Imag,
    Char,
    String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicLit {
    pub kind: LitKind,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArrayLen {
    /// `[]T`
    Slice,
    /// `[...]T`
    Ellipsis,
    /// `[N]T`
    Fixed(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeLit {
    /// `None` for elided element types, as in `[]T{{...}}`.
    pub ty: Option<Box<Expr>>,
    pub elements: Vec<Element>,
    /// Whether the source put a line break between the braces and the
    /// elements or between two elements.
    pub multiline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub key: Option<Expr>,
    pub value: Expr,
}

impl Expr {
    /// Whether the expression prints on a single line.
    pub fn is_single_line(&self) -> bool {
        match self {
            Expr::Ident(_) => true,
            Expr::BasicLit(lit) => !lit.text.contains('\n'),
            Expr::Selector(x, _) | Expr::Unary(_, x) | Expr::Star(x) | Expr::Paren(x) => {
                x.is_single_line()
            }
            Expr::Call { func, args } => {
                func.is_single_line() && args.iter().all(Expr::is_single_line)
            }
            Expr::ArrayType { len, elem } => {
                let len = match len {
                    ArrayLen::Fixed(len) => len.is_single_line(),
                    ArrayLen::Slice | ArrayLen::Ellipsis => true,
                };
                len && elem.is_single_line()
            }
            Expr::MapType { key, value } => key.is_single_line() && value.is_single_line(),
            Expr::Composite(lit) => {
                !(lit.multiline && !lit.elements.is_empty())
                    && lit.ty.as_deref().is_none_or(Expr::is_single_line)
                    && lit.elements.iter().all(Element::is_single_line)
            }
        }
    }
}

impl Element {
    pub fn is_single_line(&self) -> bool {
        self.key.as_ref().is_none_or(Expr::is_single_line) && self.value.is_single_line()
    }
}
