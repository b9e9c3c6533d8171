//! Recursive-descent reader turning archive tokens into nested values.

use super::lexer::{self, Spanned, Token};
use crate::error::{Result, TreeError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    String(String),
    Array(Vec<Value>),
    Dict(Dict),
}

/// One `key /* annotation */ = value;` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    /// Comment between the key and `=`; object records keep their display name here
    pub annotation: Option<String>,
    pub value: Value,
}

/// Dictionary preserving declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dict {
    entries: Vec<Entry>,
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Value::Dict(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }
}

impl Dict {
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|e| e.key == key).map(|e| &e.value)
    }

    pub fn get_entry(&self, key: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.key == key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_dict(&self, key: &str) -> Option<&Dict> {
        self.get(key).and_then(Value::as_dict)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse archive text into its root dictionary
pub fn parse(text: &str) -> Result<Dict> {
    let tokens = lexer::tokenize(text)?;
    let mut reader = Reader { tokens, pos: 0 };
    match reader.value()? {
        Value::Dict(dict) => Ok(dict),
        _ => Err(reader.error("archive root is not a dictionary")),
    }
}

struct Reader {
    tokens: Vec<Spanned>,
    pos: usize,
}

impl Reader {
    fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|t| t.line)
            .unwrap_or(1)
    }

    fn error(&self, message: impl std::fmt::Display) -> TreeError {
        TreeError::parse("pbxproj", format!("line {}: {}", self.line(), message))
    }

    /// Comments skipped, return the first comment seen
    fn skip_comments(&mut self) -> Option<String> {
        let mut first = None;
        while let Some(Spanned {
            token: Token::Comment(text),
            ..
        }) = self.tokens.get(self.pos)
        {
            if first.is_none() {
                first = Some(text.clone());
            }
            self.pos += 1;
        }
        first
    }

    fn next(&mut self) -> Option<Token> {
        self.skip_comments();
        let token = self.tokens.get(self.pos).map(|t| t.token.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn peek(&mut self) -> Option<&Token> {
        self.skip_comments();
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    fn expect(&mut self, expected: Token) -> Result<()> {
        match self.next() {
            Some(token) if token == expected => Ok(()),
            Some(token) => Err(self.error(format!("expected {expected:?}, found {token:?}"))),
            None => Err(self.error(format!("expected {expected:?}, found end of input"))),
        }
    }

    fn value(&mut self) -> Result<Value> {
        match self.next() {
            Some(Token::String(s)) => Ok(Value::String(s)),
            Some(Token::LBrace) => self.dict().map(Value::Dict),
            Some(Token::LParen) => self.array().map(Value::Array),
            Some(token) => Err(self.error(format!("unexpected {token:?}"))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn dict(&mut self) -> Result<Dict> {
        let mut entries = Vec::new();
        loop {
            let key = match self.next() {
                Some(Token::RBrace) => break,
                Some(Token::String(key)) => key,
                Some(token) => return Err(self.error(format!("expected key, found {token:?}"))),
                None => return Err(self.error("unterminated dictionary")),
            };
            let annotation = self.skip_comments();
            self.expect(Token::Equals)?;
            let value = self.value()?;
            self.expect(Token::Semicolon)?;
            entries.push(Entry {
                key,
                annotation,
                value,
            });
        }
        Ok(Dict { entries })
    }

    fn array(&mut self) -> Result<Vec<Value>> {
        let mut items = Vec::new();
        loop {
            if self.peek() == Some(&Token::RParen) {
                self.pos += 1;
                break;
            }
            items.push(self.value()?);
            match self.next() {
                Some(Token::Comma) => continue,
                Some(Token::RParen) => break,
                Some(token) => {
                    return Err(self.error(format!("expected ',' or ')', found {token:?}")))
                }
                None => return Err(self.error("unterminated array")),
            }
        }
        Ok(items)
    }
}
