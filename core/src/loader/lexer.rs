//! Tokenizer for Go source.
//!
//! Produces the token stream the declaration parser needs, including the
//! semicolons Go inserts automatically at line ends.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{line}:{col}: {message}")]
pub struct SyntaxError {
    pub line: u32,
    pub col: u32,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifiers and keywords alike; the parser tells them apart.
    Ident,
    Int,
    Float,
    Imag,
    Char,
    /// Interpreted or raw string literal, quotes included.
    String,
    Op,
    /// Explicit `;` or one inserted at a line end (text `"\n"`).
    Semicolon,
    Eof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub text: &'src str,
    /// Byte offset of the first character.
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl Token<'_> {
    pub fn is(&self, text: &str) -> bool {
        matches!(self.kind, TokenKind::Ident | TokenKind::Op) && self.text == text
    }

    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }
}

pub const KEYWORDS: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
    "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range",
    "return", "select", "struct", "switch", "type", "var",
];

pub fn is_keyword(ident: &str) -> bool {
    KEYWORDS.contains(&ident)
}

const OPERATORS: &[&str] = &[
    "<<=", ">>=", "&^=", "...", "&&", "||", "<-", "++", "--", "==", "!=", "<=", ">=", ":=",
    "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<", ">>", "&^", "+", "-", "*", "/", "%",
    "&", "|", "^", "<", ">", "=", "!", "(", ")", "[", "]", "{", "}", ",", ".", ":", "~",
];

pub fn tokenize(src: &str) -> Result<Vec<Token<'_>>, SyntaxError> {
    let mut lexer = Lexer::new(src);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}

struct Lexer<'src> {
    src: &'src str,
    pos: usize,
    line: u32,
    col: u32,
    /// Whether a newline after the previous token ends the statement.
    insert_semi: bool,
}

impl<'src> Lexer<'src> {
    fn new(src: &'src str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            col: 1,
            insert_semi: false,
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_at(&self, skip: usize) -> Option<char> {
        self.src[self.pos..].chars().nth(skip)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    fn error(&self, line: u32, col: u32, message: impl Into<String>) -> SyntaxError {
        SyntaxError {
            line,
            col,
            message: message.into(),
        }
    }

    fn token(&self, kind: TokenKind, start: usize, line: u32, col: u32) -> Token<'src> {
        Token {
            kind,
            text: &self.src[start..self.pos],
            offset: start,
            line,
            col,
        }
    }

    fn next_token(&mut self) -> Result<Token<'src>, SyntaxError> {
        if let Some(semi) = self.skip_trivia()? {
            return Ok(semi);
        }

        let (start, line, col) = (self.pos, self.line, self.col);
        let Some(c) = self.peek() else {
            if self.insert_semi {
                self.insert_semi = false;
                return Ok(Token {
                    kind: TokenKind::Semicolon,
                    text: "\n",
                    offset: start,
                    line,
                    col,
                });
            }
            return Ok(self.token(TokenKind::Eof, start, line, col));
        };

        let kind = if c.is_alphabetic() || c == '_' {
            while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
                self.bump();
            }
            TokenKind::Ident
        } else if c.is_ascii_digit() || (c == '.' && self.peek_at(1).is_some_and(|n| n.is_ascii_digit())) {
            self.number()
        } else {
            match c {
                '"' => self.interpreted_string(line, col)?,
                '`' => self.raw_string(line, col)?,
                '\'' => self.char_literal(line, col)?,
                ';' => {
                    self.bump();
                    TokenKind::Semicolon
                }
                _ => self.operator(line, col)?,
            }
        };

        let token = self.token(kind, start, line, col);
        self.insert_semi = match kind {
            TokenKind::Ident => {
                !is_keyword(token.text)
                    || matches!(token.text, "break" | "continue" | "fallthrough" | "return")
            }
            TokenKind::Int
            | TokenKind::Float
            | TokenKind::Imag
            | TokenKind::Char
            | TokenKind::String => true,
            TokenKind::Op => matches!(token.text, ")" | "]" | "}" | "++" | "--"),
            TokenKind::Semicolon | TokenKind::Eof => false,
        };
        Ok(token)
    }

    /// Skips whitespace and comments, returning an automatic semicolon when a
    /// line break ends a statement.
    fn skip_trivia(&mut self) -> Result<Option<Token<'src>>, SyntaxError> {
        loop {
            let (start, line, col) = (self.pos, self.line, self.col);
            match self.peek() {
                Some('\n') => {
                    self.bump();
                    if self.insert_semi {
                        self.insert_semi = false;
                        return Ok(Some(Token {
                            kind: TokenKind::Semicolon,
                            text: "\n",
                            offset: start,
                            line,
                            col,
                        }));
                    }
                }
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                // A byte order mark is allowed only as the very first character.
                Some('\u{feff}') if start == 0 => {
                    self.bump();
                    self.col = col;
                }
                Some('/') if self.peek_at(1) == Some('/') => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.bump();
                    }
                }
                Some('/') if self.peek_at(1) == Some('*') => {
                    self.bump();
                    self.bump();
                    let mut spans_lines = false;
                    loop {
                        match self.bump() {
                            Some('*') if self.peek() == Some('/') => {
                                self.bump();
                                break;
                            }
                            Some('\n') => spans_lines = true,
                            Some(_) => {}
                            None => return Err(self.error(line, col, "comment not terminated")),
                        }
                    }
                    // A multi-line comment acts like a newline.
                    if spans_lines && self.insert_semi {
                        self.insert_semi = false;
                        return Ok(Some(Token {
                            kind: TokenKind::Semicolon,
                            text: "\n",
                            offset: start,
                            line,
                            col,
                        }));
                    }
                }
                _ => return Ok(None),
            }
        }
    }

    fn number(&mut self) -> TokenKind {
        let mut kind = TokenKind::Int;
        let hex = self.src[self.pos..].starts_with("0x") || self.src[self.pos..].starts_with("0X");
        let mut prev = '\0';

        while let Some(c) = self.peek() {
            let signed_exponent =
                (c == '+' || c == '-') && (matches!(prev, 'p' | 'P') || (!hex && matches!(prev, 'e' | 'E')));
            if !(c.is_ascii_alphanumeric() || c == '_' || c == '.' || signed_exponent) {
                break;
            }
            if c == '.' || matches!(c, 'p' | 'P') || (!hex && matches!(c, 'e' | 'E')) {
                kind = TokenKind::Float;
            }
            prev = c;
            self.bump();
        }

        if prev == 'i' {
            TokenKind::Imag
        } else {
            kind
        }
    }

    fn quoted(&mut self, quote: char, what: &str, line: u32, col: u32) -> Result<(), SyntaxError> {
        self.bump();
        loop {
            match self.bump() {
                Some(c) if c == quote => return Ok(()),
                Some('\\') => {
                    if self.bump().is_none() {
                        break;
                    }
                }
                Some('\n') | None => break,
                Some(_) => {}
            }
        }
        Err(self.error(line, col, format!("{what} literal not terminated")))
    }

    fn interpreted_string(&mut self, line: u32, col: u32) -> Result<TokenKind, SyntaxError> {
        self.quoted('"', "string", line, col)?;
        Ok(TokenKind::String)
    }

    fn char_literal(&mut self, line: u32, col: u32) -> Result<TokenKind, SyntaxError> {
        self.quoted('\'', "rune", line, col)?;
        Ok(TokenKind::Char)
    }

    fn raw_string(&mut self, line: u32, col: u32) -> Result<TokenKind, SyntaxError> {
        self.bump();
        loop {
            match self.bump() {
                Some('`') => return Ok(TokenKind::String),
                Some(_) => {}
                None => return Err(self.error(line, col, "raw string literal not terminated")),
            }
        }
    }

    fn operator(&mut self, line: u32, col: u32) -> Result<TokenKind, SyntaxError> {
        let rest: &str = &self.src[self.pos..];
        let Some(op) = OPERATORS.iter().find(|op| rest.starts_with(**op)) else {
            let c = self.peek().unwrap_or_default();
            return Err(self.error(line, col, format!("invalid character {c:?}")));
        };
        for _ in 0..op.len() {
            self.bump();
        }
        Ok(TokenKind::Op)
    }
}
