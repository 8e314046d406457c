use std::str::Chars;

use peekmore::{PeekMore, PeekMoreIterator};

use crate::error::ScanError;
use crate::literal::Literal;
use crate::token::{Token, Type};

const KEYWORDS: &[(&str, Type)] = &[
    ("and", Type::And),
    ("class", Type::Class),
    ("else", Type::Else),
    ("false", Type::False),
    ("for", Type::For),
    ("fun", Type::Fun),
    ("if", Type::If),
    ("nil", Type::Nil),
    ("or", Type::Or),
    ("print", Type::Print),
    ("return", Type::Return),
    ("super", Type::Super),
    ("this", Type::This),
    ("true", Type::True),
    ("var", Type::Var),
    ("while", Type::While),
];

/// Turns source text into a token stream, one character lookahead (two for
/// two-character operators and the `1.5`-style number grammar).
pub struct Scanner<'a> {
    source: PeekMoreIterator<Chars<'a>>,
    tokens: Vec<Token>,
    errors: Vec<ScanError>,
    line: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Scanner<'a> {
        Scanner {
            source: source.chars().peekmore(),
            tokens: Vec::new(),
            errors: Vec::new(),
            line: 1,
        }
    }

    pub fn scan_tokens(mut self) -> (Vec<Token>, Vec<ScanError>) {
        while let Some(&c) = self.source.peek() {
            self.scan_token(c);
        }

        self.tokens.push(Token::new(Type::Eof, String::new(), None, self.line));
        (self.tokens, self.errors)
    }

    fn advance(&mut self) -> char {
        self.source.next().expect("advance() called past end of source")
    }

    fn peek(&mut self) -> Option<char> {
        self.source.peek().copied()
    }

    fn peek_next(&mut self) -> Option<char> {
        self.source.peek_next().copied()
    }

    /// Consumes and returns true if the upcoming character (already past
    /// the token's first character) equals `expected`.
    fn match_next(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn add(&mut self, r#type: Type, lexeme: String, literal: Option<Literal>) {
        self.tokens.push(Token::new(r#type, lexeme, literal, self.line));
    }

    fn add_single(&mut self, r#type: Type) {
        let c = self.advance();
        self.add(r#type, c.to_string(), None);
    }

    fn scan_token(&mut self, c: char) {
        match c {
            '(' => self.add_single(Type::LeftParen),
            ')' => self.add_single(Type::RightParen),
            '{' => self.add_single(Type::LeftBrace),
            '}' => self.add_single(Type::RightBrace),
            ',' => self.add_single(Type::Comma),
            '.' => self.add_single(Type::Dot),
            '-' => self.add_single(Type::Minus),
            '+' => self.add_single(Type::Plus),
            ';' => self.add_single(Type::Semicolon),
            '*' => self.add_single(Type::Star),

            '!' => {
                let first = self.advance();
                if self.match_next('=') {
                    self.add(Type::BangEqual, format!("{first}="), None);
                } else {
                    self.add(Type::Bang, first.to_string(), None);
                }
            }
            '=' => {
                let first = self.advance();
                if self.match_next('=') {
                    self.add(Type::EqualEqual, format!("{first}="), None);
                } else {
                    self.add(Type::Equal, first.to_string(), None);
                }
            }
            '<' => {
                let first = self.advance();
                if self.match_next('=') {
                    self.add(Type::LessEqual, format!("{first}="), None);
                } else {
                    self.add(Type::Less, first.to_string(), None);
                }
            }
            '>' => {
                let first = self.advance();
                if self.match_next('=') {
                    self.add(Type::GreaterEqual, format!("{first}="), None);
                } else {
                    self.add(Type::Greater, first.to_string(), None);
                }
            }
            '/' => {
                self.advance();
                if self.peek() == Some('/') {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                } else {
                    self.add(Type::Slash, "/".to_owned(), None);
                }
            }

            ' ' | '\r' | '\t' => {
                self.advance();
            }
            '\n' => {
                self.advance();
                self.line += 1;
            }

            '"' | '\'' => self.string(c),

            c if c.is_ascii_digit() => self.number(),

            c if c.is_alphabetic() || c == '_' => self.identifier(),

            other => {
                self.advance();
                self.errors.push(ScanError {
                    line: self.line,
                    message: format!("Unexpected character '{other}'"),
                });
            }
        }
    }

    fn string(&mut self, delimiter: char) {
        let start_line = self.line;
        self.advance(); // opening quote

        let mut value = String::new();
        loop {
            match self.peek() {
                Some(c) if c == delimiter => break,
                Some(c) => {
                    if c == '\n' {
                        self.line += 1;
                    }
                    value.push(c);
                    self.advance();
                }
                None => {
                    self.errors.push(ScanError {
                        line: start_line,
                        message: "Unterminated string".to_owned(),
                    });
                    return;
                }
            }
        }

        self.advance(); // closing quote
        self.add(Type::String, value.clone(), Some(Literal::String(value)));
    }

    fn number(&mut self) {
        let mut value = String::new();

        while let Some(c) = self.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            value.push(self.advance());
        }

        // Only consume the '.' as part of the number if a digit follows it;
        // otherwise `1.` scans as NUMBER("1") followed by a separate DOT.
        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            value.push(self.advance());
            while let Some(c) = self.peek() {
                if !c.is_ascii_digit() {
                    break;
                }
                value.push(self.advance());
            }
        }

        let number: f64 = value.parse().expect("scanned number lexeme to be valid");
        self.add(Type::Number, value, Some(Literal::Number(number)));
    }

    fn identifier(&mut self) {
        let mut value = String::new();

        while let Some(c) = self.peek() {
            if !(c.is_alphanumeric() || c == '_') {
                break;
            }
            value.push(self.advance());
        }

        let r#type = KEYWORDS
            .iter()
            .find(|(keyword, _)| *keyword == value)
            .map(|(_, t)| *t)
            .unwrap_or(Type::Identifier);

        self.add(r#type, value, None);
    }
}
