//! Recursive-descent parser producing one [`Expr`].

use crate::ast::{ArrayLen, BasicLit, CompositeLit, Element, Expr, LitKind, UnaryOp};
use crate::error::SyntaxError;
use crate::lexer::{Token, TokenKind, tokenize};

/// Parse `src` as exactly one expression, optionally followed by a newline.
pub fn parse(src: &str) -> Result<Expr, SyntaxError> {
    let tokens = tokenize(src)?;
    let mut parser = Parser { tokens, index: 0 };
    let expr = parser.parse_expr()?;
    if parser.peek().kind == TokenKind::AutoSemicolon {
        parser.advance();
    }
    let token = parser.peek();
    if token.kind != TokenKind::Eof {
        return Err(SyntaxError::new(
            token.pos,
            format!("expected EOF, found {}", token.describe()),
        ));
    }
    Ok(expr)
}

struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    index: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Token<'a> {
        self.tokens[self.index.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token<'a> {
        let token = self.peek();
        if token.kind != TokenKind::Eof {
            self.index += 1;
        }
        token
    }

    /// Line on which the most recently consumed token ends.
    fn last_line(&self) -> usize {
        self.index
            .checked_sub(1)
            .map_or(1, |index| self.tokens[index].end_line)
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<Token<'a>, SyntaxError> {
        let token = self.peek();
        if token.kind != kind {
            return Err(SyntaxError::new(
                token.pos,
                format!("expected {what}, found {}", token.describe()),
            ));
        }
        Ok(self.advance())
    }

    fn parse_expr(&mut self) -> Result<Expr, SyntaxError> {
        let op = match self.peek().kind {
            TokenKind::Amp => UnaryOp::Addr,
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Plus => UnaryOp::Pos,
            TokenKind::Not => UnaryOp::Not,
            TokenKind::Caret => UnaryOp::Xor,
            TokenKind::Star => {
                self.advance();
                return Ok(Expr::Star(Box::new(self.parse_expr()?)));
            }
            _ => return self.parse_primary(),
        };
        self.advance();
        Ok(Expr::Unary(op, Box::new(self.parse_expr()?)))
    }

    fn parse_primary(&mut self) -> Result<Expr, SyntaxError> {
        let mut expr = self.parse_operand()?;
        loop {
            match self.peek().kind {
                TokenKind::Dot => {
                    self.advance();
                    let name = self.expect(TokenKind::Ident, "selector")?;
                    expr = Expr::Selector(Box::new(expr), name.text.to_string());
                }
                TokenKind::LParen => {
                    self.advance();
                    let args = self.parse_call_args()?;
                    expr = Expr::Call {
                        func: Box::new(expr),
                        args,
                    };
                }
                TokenKind::LBrace if is_literal_type(&expr) => {
                    expr = Expr::Composite(self.parse_composite(Some(expr))?);
                }
                _ => return Ok(expr),
            }
        }
    }

    fn parse_operand(&mut self) -> Result<Expr, SyntaxError> {
        let token = self.peek();
        match token.kind {
            TokenKind::Ident => {
                self.advance();
                Ok(Expr::Ident(token.text.to_string()))
            }
            TokenKind::Int
            | TokenKind::Float
            | TokenKind::Imag
            | TokenKind::Char
            | TokenKind::String => {
                self.advance();
                Ok(Expr::BasicLit(BasicLit {
                    kind: lit_kind(token.kind),
                    text: token.text.to_string(),
                }))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(Expr::Paren(Box::new(inner)))
            }
            TokenKind::LBrack | TokenKind::Map => self.parse_type(),
            _ => Err(SyntaxError::new(
                token.pos,
                format!("expected operand, found {}", token.describe()),
            )),
        }
    }

    fn parse_type(&mut self) -> Result<Expr, SyntaxError> {
        let token = self.peek();
        match token.kind {
            TokenKind::Ident => {
                self.advance();
                let mut ty = Expr::Ident(token.text.to_string());
                if self.peek().kind == TokenKind::Dot {
                    self.advance();
                    let name = self.expect(TokenKind::Ident, "selector")?;
                    ty = Expr::Selector(Box::new(ty), name.text.to_string());
                }
                Ok(ty)
            }
            TokenKind::Star => {
                self.advance();
                Ok(Expr::Star(Box::new(self.parse_type()?)))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_type()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(Expr::Paren(Box::new(inner)))
            }
            TokenKind::LBrack => {
                self.advance();
                let len = match self.peek().kind {
                    TokenKind::RBrack => ArrayLen::Slice,
                    TokenKind::Ellipsis => {
                        self.advance();
                        ArrayLen::Ellipsis
                    }
                    _ => ArrayLen::Fixed(Box::new(self.parse_expr()?)),
                };
                self.expect(TokenKind::RBrack, "']'")?;
                let elem = self.parse_type()?;
                Ok(Expr::ArrayType {
                    len,
                    elem: Box::new(elem),
                })
            }
            TokenKind::Map => {
                self.advance();
                self.expect(TokenKind::LBrack, "'['")?;
                let key = self.parse_type()?;
                self.expect(TokenKind::RBrack, "']'")?;
                let value = self.parse_type()?;
                Ok(Expr::MapType {
                    key: Box::new(key),
                    value: Box::new(value),
                })
            }
            _ => Err(SyntaxError::new(
                token.pos,
                format!("expected type, found {}", token.describe()),
            )),
        }
    }

    fn parse_call_args(&mut self) -> Result<Vec<Expr>, SyntaxError> {
        let mut args = Vec::new();
        while self.peek().kind != TokenKind::RParen {
            args.push(self.parse_expr()?);
            if !self.at_comma("argument list", TokenKind::RParen)? {
                break;
            }
        }
        self.expect(TokenKind::RParen, "')'")?;
        Ok(args)
    }

    fn parse_composite(&mut self, ty: Option<Expr>) -> Result<CompositeLit, SyntaxError> {
        let lbrace = self.expect(TokenKind::LBrace, "'{'")?;
        let mut elements = Vec::new();
        let mut multiline = false;
        let mut prev_end = lbrace.end_line;

        while self.peek().kind != TokenKind::RBrace {
            let start = self.peek().pos.line;
            multiline |= start > prev_end;
            elements.push(self.parse_element()?);
            prev_end = self.last_line();
            if !self.at_comma("composite literal", TokenKind::RBrace)? {
                break;
            }
        }
        let rbrace = self.expect(TokenKind::RBrace, "'}'")?;
        multiline |= !elements.is_empty() && rbrace.pos.line > prev_end;

        Ok(CompositeLit {
            ty: ty.map(Box::new),
            elements,
            multiline,
        })
    }

    fn parse_element(&mut self) -> Result<Element, SyntaxError> {
        let first = self.parse_element_value()?;
        if self.peek().kind != TokenKind::Colon {
            return Ok(Element {
                key: None,
                value: first,
            });
        }
        self.advance();
        let value = self.parse_element_value()?;
        Ok(Element {
            key: Some(first),
            value,
        })
    }

    fn parse_element_value(&mut self) -> Result<Expr, SyntaxError> {
        if self.peek().kind == TokenKind::LBrace {
            return Ok(Expr::Composite(self.parse_composite(None)?));
        }
        self.parse_expr()
    }

    /// Consume a separating comma. Returns `false` at the closing token.
    fn at_comma(&mut self, context: &str, close: TokenKind) -> Result<bool, SyntaxError> {
        let token = self.peek();
        match token.kind {
            TokenKind::Comma => {
                self.advance();
                Ok(true)
            }
            kind if kind == close => Ok(false),
            TokenKind::AutoSemicolon => Err(SyntaxError::new(
                token.pos,
                format!("missing ',' before newline in {context}"),
            )),
            _ => Err(SyntaxError::new(
                token.pos,
                format!("missing ',' in {context}"),
            )),
        }
    }
}

fn is_literal_type(expr: &Expr) -> bool {
    match expr {
        Expr::Ident(_) | Expr::ArrayType { .. } | Expr::MapType { .. } => true,
        Expr::Selector(x, _) => matches!(**x, Expr::Ident(_)),
        _ => false,
    }
}

fn lit_kind(kind: TokenKind) -> LitKind {
    match kind {
        TokenKind::Int => LitKind::Int,
        TokenKind::Float => LitKind::Float,
        TokenKind::Imag => LitKind::Imag,
        TokenKind::Char => LitKind::Char,
        _ => LitKind::String,
    }
}
