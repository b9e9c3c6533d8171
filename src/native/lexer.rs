//! Tokenizer for the brace-delimited project archive format.
//!
//! ```text
//! 29B97314FDCFA39411CA2CEA /* CustomTemplate */ = {
//!     isa = PBXGroup;
//!     children = ( 080E96DDFE201D6D7F000001 /* Classes */, );
//!     sourceTree = "<group>";
//! };
//! ```
//!
//! Block comments are kept as tokens because they carry display names;
//! `//` line comments are dropped.

use crate::error::{Result, TreeError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    LBrace,
    RBrace,
    LParen,
    RParen,
    Equals,
    Semicolon,
    Comma,
    /// Quoted or bare string, unescaped
    String(String),
    /// Contents of a `/* ... */` comment, trimmed
    Comment(String),
}

/// A token with the 1-based line it starts on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned {
    pub token: Token,
    pub line: usize,
}

pub fn tokenize(text: &str) -> Result<Vec<Spanned>> {
    Lexer::new(text).run()
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
}

impl Lexer {
    fn new(text: &str) -> Self {
        Self {
            chars: text.trim_start_matches('\u{feff}').chars().collect(),
            pos: 0,
            line: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn error(&self, line: usize, message: impl std::fmt::Display) -> TreeError {
        TreeError::parse("pbxproj", format!("line {line}: {message}"))
    }

    fn run(mut self) -> Result<Vec<Spanned>> {
        let mut tokens = Vec::new();
        while let Some(c) = self.peek() {
            let line = self.line;
            let token = match c {
                c if c.is_whitespace() => {
                    self.bump();
                    continue;
                }
                '/' if self.peek_next() == Some('/') => {
                    self.skip_line();
                    continue;
                }
                '/' if self.peek_next() == Some('*') => self.block_comment(line)?,
                '{' | '}' | '(' | ')' | '=' | ';' | ',' => {
                    self.bump();
                    punctuation(c)
                }
                '"' => self.quoted(line)?,
                _ => self.bare(),
            };
            tokens.push(Spanned { token, line });
        }
        Ok(tokens)
    }

    fn skip_line(&mut self) {
        while let Some(c) = self.bump() {
            if c == '\n' {
                break;
            }
        }
    }

    fn block_comment(&mut self, line: usize) -> Result<Token> {
        self.pos += 2;
        let mut body = String::new();
        loop {
            match self.bump() {
                Some('*') if self.peek() == Some('/') => {
                    self.pos += 1;
                    return Ok(Token::Comment(body.trim().to_string()));
                }
                Some(c) => body.push(c),
                None => return Err(self.error(line, "unterminated comment")),
            }
        }
    }

    fn quoted(&mut self, line: usize) -> Result<Token> {
        self.bump();
        let mut value = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(Token::String(value)),
                Some('\\') => match self.bump() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('r') => value.push('\r'),
                    Some(c) => value.push(c),
                    None => return Err(self.error(line, "unterminated string")),
                },
                Some(c) => value.push(c),
                None => return Err(self.error(line, "unterminated string")),
            }
        }
    }

    fn bare(&mut self) -> Token {
        let mut value = String::new();
        while let Some(c) = self.peek() {
            let comment_start = c == '/' && matches!(self.peek_next(), Some('*') | Some('/'));
            if c.is_whitespace() || is_delimiter(c) || comment_start {
                break;
            }
            value.push(c);
            self.bump();
        }
        Token::String(value)
    }
}

fn is_delimiter(c: char) -> bool {
    matches!(c, '{' | '}' | '(' | ')' | '=' | ';' | ',' | '"')
}

fn punctuation(c: char) -> Token {
    match c {
        '{' => Token::LBrace,
        '}' => Token::RBrace,
        '(' => Token::LParen,
        ')' => Token::RParen,
        '=' => Token::Equals,
        ';' => Token::Semicolon,
        _ => Token::Comma,
    }
}
