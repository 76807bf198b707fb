use std::{iter::Peekable, str::CharIndices};

use crate::token::{Span, Token, TokenKind};

mod error;

pub use error::{LexError, LexResult};

pub struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
            line: 1,
            column: 0,
        }
    }

    pub fn next_token(&mut self) -> LexResult<Token<'a>> {
        self.skip_trivia();

        let Some(&(start_idx, ch)) = self.chars.peek() else {
            let index = self.input.len();
            return Ok(Token::new(
                TokenKind::EOF,
                Span {
                    start: index,
                    end: index,
                    line: self.line,
                    column: self.column,
                },
            ));
        };

        let start_line = self.line;
        let start_column = self.column;
        let kind = match ch {
            '"' | '\'' => return self.read_string(ch, start_idx, start_line, start_column),
            c if c.is_ascii_alphabetic() || c == '_' => {
                return Ok(self.read_identifier(start_idx, start_line, start_column));
            }
            c if c.is_ascii_digit() => {
                return self.read_number(start_idx, start_line, start_column);
            }
            '+' => {
                self.advance_char();
                if self.eat('+') {
                    TokenKind::Increment
                } else {
                    TokenKind::Plus
                }
            }
            '-' => {
                self.advance_char();
                if self.eat('-') {
                    TokenKind::Decrement
                } else {
                    TokenKind::Minus
                }
            }
            '=' => {
                self.advance_char();
                if self.eat('=') {
                    TokenKind::EqualEqual
                } else {
                    TokenKind::Equal
                }
            }
            '!' => {
                self.advance_char();
                if !self.eat('=') {
                    return Err(LexError::UnexpectedCharacter {
                        character: '!',
                        line: start_line,
                        column: start_column,
                    });
                }
                TokenKind::BangEqual
            }
            '<' => {
                self.advance_char();
                if self.eat('=') {
                    TokenKind::LessEqual
                } else {
                    TokenKind::Less
                }
            }
            '>' => {
                self.advance_char();
                if self.eat('=') {
                    TokenKind::GreaterEqual
                } else {
                    TokenKind::Greater
                }
            }
            '*' | '/' | '(' | ')' | '{' | '}' | ',' | ';' => {
                self.advance_char();
                match ch {
                    '*' => TokenKind::Star,
                    '/' => TokenKind::Slash,
                    '(' => TokenKind::LParen,
                    ')' => TokenKind::RParen,
                    '{' => TokenKind::LBrace,
                    '}' => TokenKind::RBrace,
                    ',' => TokenKind::Comma,
                    _ => TokenKind::Semicolon,
                }
            }
            _ => {
                return Err(LexError::UnexpectedCharacter {
                    character: ch,
                    line: start_line,
                    column: start_column,
                });
            }
        };

        Ok(Token::new(
            kind,
            Span {
                start: start_idx,
                end: self.current_index(),
                line: start_line,
                column: start_column,
            },
        ))
    }

    /// Skips whitespace and `//` line comments.
    fn skip_trivia(&mut self) {
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_whitespace() {
                self.advance_char();
                continue;
            }
            if c == '/' {
                let mut lookahead = self.chars.clone();
                lookahead.next();
                if matches!(lookahead.peek(), Some(&(_, '/'))) {
                    while let Some(&(_, c)) = self.chars.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.advance_char();
                    }
                    continue;
                }
            }
            break;
        }
    }

    fn read_identifier(&mut self, start: usize, line: usize, column: usize) -> Token<'a> {
        self.advance_char(); // Consume first char
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.advance_char();
            } else {
                break;
            }
        }

        let end_idx = self.current_index();
        let ident = &self.input[start..end_idx];
        let kind = match ident {
            "var" => TokenKind::Var,
            "console_log" => TokenKind::Print,
            "function" => TokenKind::Function,
            "while" => TokenKind::While,
            "return" => TokenKind::Return,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            _ => TokenKind::Identifier(ident),
        };
        Token::new(
            kind,
            Span {
                start,
                end: end_idx,
                line,
                column,
            },
        )
    }

    fn read_number(&mut self, start: usize, line: usize, column: usize) -> LexResult<Token<'a>> {
        self.consume_digits();

        // A fractional part needs at least one digit after the dot.
        let mut lookahead = self.chars.clone();
        if matches!(lookahead.next(), Some((_, '.')))
            && matches!(lookahead.peek(), Some(&(_, c)) if c.is_ascii_digit())
        {
            self.advance_char(); // Consume '.'
            self.consume_digits();
        }

        let end_idx = self.current_index();
        let literal = &self.input[start..end_idx];
        let value = literal
            .parse::<f64>()
            .map_err(|_| LexError::InvalidNumberLiteral {
                literal: literal.to_string(),
                line,
                column,
            })?;
        Ok(Token::new(
            TokenKind::Number(value),
            Span {
                start,
                end: end_idx,
                line,
                column,
            },
        ))
    }

    fn read_string(
        &mut self,
        quote: char,
        start: usize,
        line: usize,
        column: usize,
    ) -> LexResult<Token<'a>> {
        self.advance_char(); // Consume opening quote
        let content_start = start + quote.len_utf8();
        while let Some(&(idx, c)) = self.chars.peek() {
            if c == quote {
                self.advance_char(); // Consume closing quote
                return Ok(Token::new(
                    TokenKind::String(&self.input[content_start..idx]),
                    Span {
                        start,
                        end: idx + quote.len_utf8(),
                        line,
                        column,
                    },
                ));
            }
            if c == '\n' {
                break;
            }
            if c == '\\' {
                self.advance_char();
                if matches!(self.chars.peek(), None | Some(&(_, '\n'))) {
                    break;
                }
            }
            self.advance_char();
        }
        Err(LexError::UnterminatedString { line, column })
    }

    fn consume_digits(&mut self) {
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_ascii_digit() {
                self.advance_char();
            } else {
                break;
            }
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        if matches!(self.chars.peek(), Some(&(_, c)) if c == expected) {
            self.advance_char();
            true
        } else {
            false
        }
    }

    fn advance_char(&mut self) -> Option<(usize, char)> {
        let next = self.chars.next();
        if let Some((_, c)) = next {
            if c == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
        }
        next
    }

    fn current_index(&mut self) -> usize {
        self.chars
            .peek()
            .map(|(idx, _)| *idx)
            .unwrap_or(self.input.len())
    }
}

pub fn tokenize(input: &str) -> LexResult<Vec<Token<'_>>> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let is_eof = matches!(token.kind, TokenKind::EOF);
        tokens.push(token);
        if is_eof {
            break;
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn kinds(input: &str) -> Vec<TokenKind<'_>> {
        tokenize(input)
            .expect("tokenize should succeed")
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn test_simple_program() {
        let input = indoc! {"
            function add(a, b) {
                return a + b;
            }
            var n = add(1, 2.5);
            console_log n;
        "};
        let expected_tokens = vec![
            TokenKind::Function,
            TokenKind::Identifier("add"),
            TokenKind::LParen,
            TokenKind::Identifier("a"),
            TokenKind::Comma,
            TokenKind::Identifier("b"),
            TokenKind::RParen,
            TokenKind::LBrace,
            TokenKind::Return,
            TokenKind::Identifier("a"),
            TokenKind::Plus,
            TokenKind::Identifier("b"),
            TokenKind::Semicolon,
            TokenKind::RBrace,
            TokenKind::Var,
            TokenKind::Identifier("n"),
            TokenKind::Equal,
            TokenKind::Identifier("add"),
            TokenKind::LParen,
            TokenKind::Number(1.0),
            TokenKind::Comma,
            TokenKind::Number(2.5),
            TokenKind::RParen,
            TokenKind::Semicolon,
            TokenKind::Print,
            TokenKind::Identifier("n"),
            TokenKind::Semicolon,
            TokenKind::EOF,
        ];
        assert_eq!(kinds(input), expected_tokens);
    }

    #[test]
    fn prefers_two_character_operators() {
        assert_eq!(
            kinds("i++ j-- a==b a!=b a<=b a>=b a<b a>b x=-1"),
            vec![
                TokenKind::Identifier("i"),
                TokenKind::Increment,
                TokenKind::Identifier("j"),
                TokenKind::Decrement,
                TokenKind::Identifier("a"),
                TokenKind::EqualEqual,
                TokenKind::Identifier("b"),
                TokenKind::Identifier("a"),
                TokenKind::BangEqual,
                TokenKind::Identifier("b"),
                TokenKind::Identifier("a"),
                TokenKind::LessEqual,
                TokenKind::Identifier("b"),
                TokenKind::Identifier("a"),
                TokenKind::GreaterEqual,
                TokenKind::Identifier("b"),
                TokenKind::Identifier("a"),
                TokenKind::Less,
                TokenKind::Identifier("b"),
                TokenKind::Identifier("a"),
                TokenKind::Greater,
                TokenKind::Identifier("b"),
                TokenKind::Identifier("x"),
                TokenKind::Equal,
                TokenKind::Minus,
                TokenKind::Number(1.0),
                TokenKind::EOF,
            ]
        );
    }

    #[test]
    fn skips_line_comments_but_keeps_division() {
        let input = indoc! {"
            // leading comment
            x = 6 / 3; // trailing comment
        "};
        assert_eq!(
            kinds(input),
            vec![
                TokenKind::Identifier("x"),
                TokenKind::Equal,
                TokenKind::Number(6.0),
                TokenKind::Slash,
                TokenKind::Number(3.0),
                TokenKind::Semicolon,
                TokenKind::EOF,
            ]
        );
    }

    #[test]
    fn keeps_string_contents_raw() {
        assert_eq!(
            kinds(r#"console_log "a\"b\n" 'it\'s'"#),
            vec![
                TokenKind::Print,
                TokenKind::String(r#"a\"b\n"#),
                TokenKind::String(r"it\'s"),
                TokenKind::EOF,
            ]
        );
    }

    #[test]
    fn trailing_dot_is_not_part_of_number() {
        let err = tokenize("x = 1.;").expect_err("lone dot is not a token");
        assert_eq!(
            err,
            LexError::UnexpectedCharacter {
                character: '.',
                line: 1,
                column: 5,
            }
        );
    }

    #[test]
    fn tracks_line_and_column() {
        let tokens = tokenize("var a;\n  a++;").expect("tokenize should succeed");
        let increment = tokens
            .iter()
            .find(|token| token.kind == TokenKind::Increment)
            .expect("increment token");
        assert_eq!(increment.span.line, 2);
        assert_eq!(increment.span.column, 3);
        assert_eq!(increment.span.start, 10);
        assert_eq!(increment.span.end, 12);
    }

    #[test]
    fn errors_on_invalid_character() {
        let err = tokenize("x = 1 @ 2\n").expect_err("expected lexing failure");
        assert!(err.to_string().contains("Unexpected character '@'"));
    }

    #[test]
    fn errors_on_lone_bang() {
        let err = tokenize("x = !y").expect_err("expected lexing failure");
        assert!(err.to_string().contains("Unexpected character '!'"));
    }

    #[test]
    fn errors_on_unterminated_string() {
        let err = tokenize("console_log \"abc\nx = 1").expect_err("expected lexing failure");
        assert_eq!(err, LexError::UnterminatedString { line: 1, column: 12 });
    }
}
