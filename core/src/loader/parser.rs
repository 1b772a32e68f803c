//! Declaration-level parser for Go source files.
//!
//! Only what the analyses need is kept: the package clause and top-level
//! `type` declarations. Imports, functions, variables and constants are
//! skipped by bracket matching.

use tagscope_common::model::tag;

use super::lexer::{self, SyntaxError, Token, TokenKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub package: String,
    pub types: Vec<TypeDecl>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub name: String,
    /// Names of generic type parameters.
    pub params: Vec<String>,
    pub ty: TypeExpr,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// `T`, `pkg.T` or an instantiation `T[int]`, whose arguments are dropped.
    Name {
        package: Option<String>,
        name: String,
    },
    Pointer(Box<TypeExpr>),
    Struct(Vec<FieldDecl>),
    /// Slices, arrays, maps, channels, functions and interfaces, kept as source text.
    Opaque(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: String,
    pub ty: TypeExpr,
    /// Tag with the literal quoting removed.
    pub tag: Option<String>,
    pub embedded: bool,
}

pub fn parse_file(src: &str) -> Result<SourceFile, SyntaxError> {
    let tokens = lexer::tokenize(src)?;
    Parser { src, tokens, pos: 0 }.file()
}

struct Parser<'src> {
    src: &'src str,
    tokens: Vec<Token<'src>>,
    pos: usize,
}

impl<'src> Parser<'src> {
    fn peek(&self) -> Token<'src> {
        self.peek_nth(0)
    }

    fn peek_nth(&self, n: usize) -> Token<'src> {
        let last = self.tokens.len() - 1;
        self.tokens[(self.pos + n).min(last)]
    }

    fn advance(&mut self) -> Token<'src> {
        let token = self.peek();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn error_at(&self, token: Token<'_>, message: impl Into<String>) -> SyntaxError {
        SyntaxError {
            line: token.line,
            col: token.col,
            message: message.into(),
        }
    }

    fn unexpected(&self, expected: &str) -> SyntaxError {
        let token = self.peek();
        let found = match token.kind {
            TokenKind::Eof => "end of file".to_string(),
            TokenKind::Semicolon if token.text == "\n" => "newline".to_string(),
            _ => format!("{:?}", token.text),
        };
        self.error_at(token, format!("expected {expected}, found {found}"))
    }

    fn expect(&mut self, text: &str) -> Result<Token<'src>, SyntaxError> {
        if self.peek().is(text) {
            return Ok(self.advance());
        }
        Err(self.unexpected(&format!("{text:?}")))
    }

    fn ident(&mut self) -> Result<&'src str, SyntaxError> {
        let token = self.peek();
        if token.kind == TokenKind::Ident && !lexer::is_keyword(token.text) {
            self.advance();
            return Ok(token.text);
        }
        Err(self.unexpected("identifier"))
    }

    fn skip_semicolons(&mut self) {
        while self.peek().kind == TokenKind::Semicolon {
            self.advance();
        }
    }

    fn file(mut self) -> Result<SourceFile, SyntaxError> {
        self.skip_semicolons();
        self.expect("package")?;
        let package = self.ident()?.to_string();

        let mut types = Vec::new();
        loop {
            self.skip_semicolons();
            let token = self.peek();
            match (token.kind, token.text) {
                (TokenKind::Eof, _) => break,
                (TokenKind::Ident, "type") => self.type_decl(&mut types)?,
                (TokenKind::Ident, "import" | "func" | "var" | "const") => self.skip_decl()?,
                _ => return Err(self.unexpected("declaration")),
            }
        }

        Ok(SourceFile { package, types })
    }

    /// Consumes one declaration up to the semicolon that ends it at bracket depth zero.
    fn skip_decl(&mut self) -> Result<(), SyntaxError> {
        let mut open: Vec<Token<'src>> = Vec::new();
        self.advance();
        loop {
            let token = self.advance();
            match token.kind {
                TokenKind::Eof => {
                    return match open.pop() {
                        Some(unclosed) => Err(self.error_at(unclosed, "unclosed bracket")),
                        None => Ok(()),
                    };
                }
                TokenKind::Semicolon if open.is_empty() => return Ok(()),
                TokenKind::Op if matches!(token.text, "(" | "[" | "{") => open.push(token),
                TokenKind::Op if matches!(token.text, ")" | "]" | "}") => {
                    if open.pop().is_none() {
                        return Err(self.error_at(token, format!("unexpected {:?}", token.text)));
                    }
                }
                _ => {}
            }
        }
    }

    fn type_decl(&mut self, out: &mut Vec<TypeDecl>) -> Result<(), SyntaxError> {
        self.expect("type")?;
        if self.peek().is("(") {
            self.advance();
            loop {
                self.skip_semicolons();
                if self.peek().is(")") {
                    self.advance();
                    break;
                }
                out.push(self.type_spec()?);
                if !self.peek().is(")") && self.peek().kind != TokenKind::Semicolon {
                    return Err(self.unexpected("\";\" or \")\""));
                }
            }
        } else {
            out.push(self.type_spec()?);
        }
        self.end_of_decl()
    }

    fn end_of_decl(&mut self) -> Result<(), SyntaxError> {
        match self.peek().kind {
            TokenKind::Semicolon => {
                self.advance();
                Ok(())
            }
            TokenKind::Eof => Ok(()),
            _ => Err(self.unexpected("\";\"")),
        }
    }

    fn type_spec(&mut self) -> Result<TypeDecl, SyntaxError> {
        let line = self.peek().line;
        let name = self.ident()?.to_string();

        let params = if self.starts_type_params() {
            self.type_params()?
        } else {
            Vec::new()
        };

        // `type A = B` lowers like a definition.
        if self.peek().is("=") {
            self.advance();
        }

        let ty = self.type_expr()?;
        Ok(TypeDecl {
            name,
            params,
            ty,
            line,
        })
    }

    /// `[T any]` opens a parameter list, `[N]T` is an array type.
    fn starts_type_params(&self) -> bool {
        if !self.peek().is("[") {
            return false;
        }
        let first = self.peek_nth(1);
        let second = self.peek_nth(2);
        first.kind == TokenKind::Ident
            && !lexer::is_keyword(first.text)
            && (second.kind == TokenKind::Ident || second.is(",") || second.is("~"))
    }

    fn type_params(&mut self) -> Result<Vec<String>, SyntaxError> {
        self.expect("[")?;
        let mut params = Vec::new();
        loop {
            params.push(self.ident()?.to_string());
            if self.peek().is(",") {
                self.advance();
                continue;
            }
            // Constraint of this group, up to `,` or the closing `]`.
            let mut depth = 0usize;
            loop {
                let token = self.peek();
                match token.kind {
                    TokenKind::Eof => return Err(self.unexpected("\"]\"")),
                    TokenKind::Op if matches!(token.text, "(" | "[" | "{") => depth += 1,
                    TokenKind::Op if matches!(token.text, ")" | "}") => depth = depth.saturating_sub(1),
                    TokenKind::Op if token.text == "]" => {
                        if depth == 0 {
                            self.advance();
                            return Ok(params);
                        }
                        depth -= 1;
                    }
                    TokenKind::Op if token.text == "," && depth == 0 => {
                        self.advance();
                        break;
                    }
                    _ => {}
                }
                self.advance();
            }
            // a trailing comma before `]`
            if self.peek().is("]") {
                self.advance();
                return Ok(params);
            }
        }
    }

    fn type_expr(&mut self) -> Result<TypeExpr, SyntaxError> {
        let token = self.peek();
        match (token.kind, token.text) {
            (TokenKind::Op, "*") => {
                self.advance();
                Ok(TypeExpr::Pointer(Box::new(self.type_expr()?)))
            }
            (TokenKind::Op, "(") => {
                self.advance();
                let inner = self.type_expr()?;
                self.expect(")")?;
                Ok(inner)
            }
            (TokenKind::Ident, "struct") => self.struct_type(),
            (TokenKind::Ident, "map" | "chan" | "func" | "interface") | (TokenKind::Op, "[" | "<-") => {
                self.opaque_type()
            }
            (TokenKind::Ident, _) if !lexer::is_keyword(token.text) => self.type_name(),
            _ => Err(self.unexpected("type")),
        }
    }

    fn type_name(&mut self) -> Result<TypeExpr, SyntaxError> {
        let (package, name) = self.type_name_parts()?;
        Ok(TypeExpr::Name { package, name })
    }

    /// `T`, `pkg.T`, optionally followed by type arguments.
    fn type_name_parts(&mut self) -> Result<(Option<String>, String), SyntaxError> {
        let first = self.ident()?.to_string();
        let parts = if self.peek().is(".") {
            self.advance();
            (Some(first), self.ident()?.to_string())
        } else {
            (None, first)
        };

        if self.peek().is("[") {
            self.skip_balanced()?;
        }
        Ok(parts)
    }

    fn struct_type(&mut self) -> Result<TypeExpr, SyntaxError> {
        self.expect("struct")?;
        self.expect("{")?;

        let mut fields = Vec::new();
        loop {
            self.skip_semicolons();
            if self.peek().is("}") {
                break;
            }
            self.field_decl(&mut fields)?;
            if !self.peek().is("}") && self.peek().kind != TokenKind::Semicolon {
                return Err(self.unexpected("\";\" or \"}\""));
            }
        }
        self.expect("}")?;

        Ok(TypeExpr::Struct(fields))
    }

    fn field_decl(&mut self, out: &mut Vec<FieldDecl>) -> Result<(), SyntaxError> {
        if self.is_embedded_field() {
            let pointer = self.peek().is("*");
            if pointer {
                self.advance();
            }
            let (package, name) = self.type_name_parts()?;
            let ty = TypeExpr::Name {
                package,
                name: name.clone(),
            };
            let ty = if pointer {
                TypeExpr::Pointer(Box::new(ty))
            } else {
                ty
            };
            let tag = self.tag()?;
            out.push(FieldDecl {
                name,
                ty,
                tag,
                embedded: true,
            });
            return Ok(());
        }

        let mut names = vec![self.ident()?.to_string()];
        while self.peek().is(",") {
            self.advance();
            names.push(self.ident()?.to_string());
        }
        let ty = self.type_expr()?;
        let tag = self.tag()?;

        out.extend(names.into_iter().map(|name| FieldDecl {
            name,
            ty: ty.clone(),
            tag: tag.clone(),
            embedded: false,
        }));
        Ok(())
    }

    fn is_embedded_field(&self) -> bool {
        let first = self.peek();
        if first.is("*") {
            return true;
        }
        let next = self.peek_nth(1);
        if next.is(".") || is_field_end(next) {
            return true;
        }
        if next.is("[") {
            // `List[int]` is embedded, `Items [4]int` is a named field.
            let close = self.matching_bracket(self.pos + 1);
            return close.is_some_and(|idx| is_field_end(self.tokens[(idx + 1).min(self.tokens.len() - 1)]));
        }
        false
    }

    fn matching_bracket(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        for (idx, token) in self.tokens.iter().enumerate().skip(open) {
            match token.kind {
                TokenKind::Op if matches!(token.text, "(" | "[" | "{") => depth += 1,
                TokenKind::Op if matches!(token.text, ")" | "]" | "}") => {
                    depth = depth.checked_sub(1)?;
                    if depth == 0 {
                        return Some(idx);
                    }
                }
                TokenKind::Eof => return None,
                _ => {}
            }
        }
        None
    }

    fn tag(&mut self) -> Result<Option<String>, SyntaxError> {
        let token = self.peek();
        if token.kind != TokenKind::String {
            return Ok(None);
        }
        self.advance();
        match tag::unquote(token.text) {
            Some(tag) => Ok(Some(tag)),
            None => Err(self.error_at(token, "invalid tag literal")),
        }
    }

    /// Types the analyses never look inside; their source text is kept for display.
    fn opaque_type(&mut self) -> Result<TypeExpr, SyntaxError> {
        let start = self.peek().offset;
        let token = self.peek();
        match token.text {
            "[" => {
                self.skip_balanced()?;
                self.type_expr()?;
            }
            "map" => {
                self.advance();
                if !self.peek().is("[") {
                    return Err(self.unexpected("\"[\""));
                }
                self.skip_balanced()?;
                self.type_expr()?;
            }
            "chan" => {
                self.advance();
                if self.peek().is("<-") {
                    self.advance();
                }
                self.type_expr()?;
            }
            "<-" => {
                self.advance();
                self.expect("chan")?;
                self.type_expr()?;
            }
            "func" => {
                self.advance();
                if !self.peek().is("(") {
                    return Err(self.unexpected("\"(\""));
                }
                self.skip_balanced()?;
                if self.peek().is("(") {
                    self.skip_balanced()?;
                } else if self.starts_type() {
                    self.type_expr()?;
                }
            }
            "interface" => {
                self.advance();
                if !self.peek().is("{") {
                    return Err(self.unexpected("\"{\""));
                }
                self.skip_balanced()?;
            }
            _ => return Err(self.unexpected("type")),
        }

        let end = self.tokens[self.pos - 1].end();
        Ok(TypeExpr::Opaque(squeeze_whitespace(&self.src[start..end])))
    }

    fn starts_type(&self) -> bool {
        let token = self.peek();
        match token.kind {
            TokenKind::Ident => {
                !lexer::is_keyword(token.text)
                    || matches!(token.text, "struct" | "map" | "chan" | "func" | "interface")
            }
            TokenKind::Op => matches!(token.text, "*" | "[" | "(" | "<-"),
            _ => false,
        }
    }

    /// Skips from an opening bracket to its partner, inclusive.
    fn skip_balanced(&mut self) -> Result<(), SyntaxError> {
        let open = self.peek();
        match self.matching_bracket(self.pos) {
            Some(close) => {
                self.pos = close + 1;
                Ok(())
            }
            None => Err(self.error_at(open, "unclosed bracket")),
        }
    }
}

fn is_field_end(token: Token<'_>) -> bool {
    matches!(token.kind, TokenKind::String | TokenKind::Semicolon) || token.is("}")
}

fn squeeze_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
