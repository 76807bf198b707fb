use crate::ast::{BinaryOperator, CompareOperator, IncDecOperator, Literal, Node, Program};
use crate::token::{Span, Token, TokenKind};

mod error;

pub use error::{ParseError, ParseResult};

pub struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    position: usize,
    eof: Token<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<Token<'a>>) -> Self {
        let end = tokens.last().map(|token| token.span).unwrap_or_default();
        Self {
            tokens,
            position: 0,
            eof: Token::new(TokenKind::EOF, end),
        }
    }

    pub fn parse_program(mut self) -> ParseResult<Program> {
        let program = self.parse_block()?;
        self.expect(TokenKind::EOF, "end of file")?;
        Ok(program)
    }

    /// Parses items until `}` or end of input; the terminator is left in place.
    fn parse_block(&mut self) -> ParseResult<Program> {
        let mut statements = Vec::new();
        while !matches!(self.current_kind(), TokenKind::RBrace | TokenKind::EOF) {
            statements.push(self.parse_item()?);
        }
        Ok(Program::new(statements))
    }

    fn parse_item(&mut self) -> ParseResult<Node> {
        match *self.current_kind() {
            TokenKind::Semicolon => {
                self.advance();
                Ok(Node::NoOp)
            }
            TokenKind::While => self.parse_while(),
            TokenKind::Function => self.parse_function_def(),
            _ => {
                let statement = self.parse_statement()?;
                if matches!(self.current_kind(), TokenKind::Semicolon) {
                    self.advance();
                }
                Ok(statement)
            }
        }
    }

    fn parse_while(&mut self) -> ParseResult<Node> {
        self.expect(TokenKind::While, "'while'")?;
        let condition = self.parse_expression()?;
        let body = self.parse_braced_block()?;
        Ok(Node::While {
            condition: Box::new(condition),
            body,
        })
    }

    fn parse_function_def(&mut self) -> ParseResult<Node> {
        self.expect(TokenKind::Function, "'function'")?;
        let name = self.expect_identifier()?;
        self.expect(TokenKind::LParen, "'('")?;
        let mut params = Vec::new();
        if !matches!(self.current_kind(), TokenKind::RParen) {
            params.push(self.expect_identifier()?);
            while matches!(self.current_kind(), TokenKind::Comma) {
                self.advance();
                params.push(self.expect_identifier()?);
            }
        }
        self.expect(TokenKind::RParen, "')'")?;
        let body = self.parse_braced_block()?;
        Ok(Node::FunctionDef { name, params, body })
    }

    fn parse_braced_block(&mut self) -> ParseResult<Program> {
        self.expect(TokenKind::LBrace, "'{'")?;
        let body = self.parse_block()?;
        self.expect(TokenKind::RBrace, "'}'")?;
        Ok(body)
    }

    fn parse_statement(&mut self) -> ParseResult<Node> {
        match *self.current_kind() {
            TokenKind::Var => {
                self.advance();
                let name = self.expect_identifier()?;
                let init = if matches!(self.current_kind(), TokenKind::Equal) {
                    self.advance();
                    Some(Box::new(self.parse_expression()?))
                } else {
                    None
                };
                Ok(Node::Declare { name, init })
            }
            TokenKind::Print => {
                self.advance();
                let value = self.parse_expression()?;
                Ok(Node::Print(Box::new(value)))
            }
            TokenKind::Return => {
                self.advance();
                if matches!(
                    self.current_kind(),
                    TokenKind::Semicolon | TokenKind::RBrace | TokenKind::EOF
                ) {
                    return Ok(Node::Return(None));
                }
                let value = self.parse_expression()?;
                Ok(Node::Return(Some(Box::new(value))))
            }
            TokenKind::Identifier(name) => match *self.peek_kind() {
                TokenKind::Equal => {
                    self.advance();
                    self.advance();
                    let value = self.parse_expression()?;
                    Ok(Node::Assign {
                        target: name.to_string(),
                        value: Box::new(value),
                    })
                }
                TokenKind::Increment | TokenKind::Decrement => {
                    self.advance();
                    let op = if matches!(self.current_kind(), TokenKind::Increment) {
                        IncDecOperator::Increment
                    } else {
                        IncDecOperator::Decrement
                    };
                    self.advance();
                    Ok(Node::IncDec {
                        op,
                        target: name.to_string(),
                    })
                }
                _ => self.parse_expression(),
            },
            _ => self.parse_expression(),
        }
    }

    fn parse_expression(&mut self) -> ParseResult<Node> {
        let left = self.parse_additive()?;
        let Some(op) = self.comparison_operator() else {
            return Ok(left);
        };
        self.advance();
        let right = self.parse_additive()?;
        if self.comparison_operator().is_some() {
            let span = self.current().span;
            return Err(ParseError::ChainedComparison {
                line: span.line,
                column: span.column,
            });
        }
        Ok(Node::Compare {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    fn parse_additive(&mut self) -> ParseResult<Node> {
        let mut expr = self.parse_term()?;
        loop {
            let op = match *self.current_kind() {
                TokenKind::Plus => BinaryOperator::Add,
                TokenKind::Minus => BinaryOperator::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_term()?;
            expr = Node::BinaryOp {
                op,
                left: Some(Box::new(expr)),
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn parse_term(&mut self) -> ParseResult<Node> {
        let mut expr = self.parse_unary()?;
        loop {
            let op = match *self.current_kind() {
                TokenKind::Star => BinaryOperator::Mul,
                TokenKind::Slash => BinaryOperator::Div,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            expr = Node::BinaryOp {
                op,
                left: Some(Box::new(expr)),
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn parse_unary(&mut self) -> ParseResult<Node> {
        let op = match *self.current_kind() {
            TokenKind::Plus => BinaryOperator::Add,
            TokenKind::Minus => BinaryOperator::Sub,
            _ => return self.parse_primary(),
        };
        self.advance();
        let operand = self.parse_unary()?;
        Ok(Node::BinaryOp {
            op,
            left: None,
            right: Box::new(operand),
        })
    }

    fn parse_primary(&mut self) -> ParseResult<Node> {
        match *self.current_kind() {
            TokenKind::Number(value) => {
                self.advance();
                Ok(Node::Literal(Literal::Number(value)))
            }
            TokenKind::String(raw) => {
                self.advance();
                Ok(Node::Literal(Literal::String(raw.to_string())))
            }
            TokenKind::True => {
                self.advance();
                Ok(Node::Literal(Literal::Bool(true)))
            }
            TokenKind::False => {
                self.advance();
                Ok(Node::Literal(Literal::Bool(false)))
            }
            TokenKind::Identifier(name) => {
                self.advance();
                if !matches!(self.current_kind(), TokenKind::LParen) {
                    return Ok(Node::Identifier(name.to_string()));
                }
                self.advance();
                let mut args = Vec::new();
                if !matches!(self.current_kind(), TokenKind::RParen) {
                    args.push(self.parse_expression()?);
                    while matches!(self.current_kind(), TokenKind::Comma) {
                        self.advance();
                        args.push(self.parse_expression()?);
                    }
                }
                self.expect(TokenKind::RParen, "')'")?;
                Ok(Node::FunctionCall {
                    name: name.to_string(),
                    args,
                })
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(expr)
            }
            _ => Err(self.error("expression")),
        }
    }

    fn comparison_operator(&self) -> Option<CompareOperator> {
        let op = match *self.current_kind() {
            TokenKind::EqualEqual => CompareOperator::Equal,
            TokenKind::BangEqual => CompareOperator::NotEqual,
            TokenKind::Less => CompareOperator::Less,
            TokenKind::Greater => CompareOperator::Greater,
            TokenKind::LessEqual => CompareOperator::LessEqual,
            TokenKind::GreaterEqual => CompareOperator::GreaterEqual,
            _ => return None,
        };
        Some(op)
    }

    fn expect_identifier(&mut self) -> ParseResult<String> {
        if let TokenKind::Identifier(name) = *self.current_kind() {
            self.advance();
            Ok(name.to_string())
        } else {
            Err(self.error("identifier"))
        }
    }

    fn expect(&mut self, kind: TokenKind<'a>, expected: &str) -> ParseResult<()> {
        if *self.current_kind() == kind {
            self.advance();
            Ok(())
        } else {
            Err(self.error(expected))
        }
    }

    fn current(&self) -> &Token<'a> {
        self.tokens.get(self.position).unwrap_or(&self.eof)
    }

    fn current_kind(&self) -> &TokenKind<'a> {
        &self.current().kind
    }

    fn peek_kind(&self) -> &TokenKind<'a> {
        self.tokens
            .get(self.position + 1)
            .map(|token| &token.kind)
            .unwrap_or(&self.eof.kind)
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }

    fn error(&self, expected: &str) -> ParseError {
        let Token {
            kind,
            span: Span { line, column, .. },
        } = self.current();
        ParseError::UnexpectedToken {
            expected: expected.to_string(),
            found: kind.describe(),
            line: *line,
            column: *column,
        }
    }
}

pub fn parse_tokens(tokens: Vec<Token<'_>>) -> ParseResult<Program> {
    Parser::new(tokens).parse_program()
}
