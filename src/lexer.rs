use crate::ast::Token;
use crate::error::CompileError;
use crate::literal;
use crate::value::Value;

/// Hand-written scanner over the filter text.
///
/// Tokenization is longest-match with no backtracking across tokens. A token
/// that starts like a literal but has invalid content (`OBJECTID(` with bad
/// hex, a month of 13, malformed base64) is reported as a format error for
/// that literal family; it never silently degrades into a path token.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn text_from(&self, start: usize) -> String {
        self.input[start..self.position].iter().collect()
    }

    fn bad_literal(&self, family: &'static str, start: usize) -> CompileError {
        CompileError::BadLiteral {
            family,
            literal: self.text_from(start),
        }
    }

    pub fn next_token(&mut self) -> Result<Token, CompileError> {
        self.skip_whitespace();

        match self.current_char() {
            None => Ok(Token::Eof),
            Some(',') => {
                self.advance();
                Ok(Token::Comma)
            }
            Some('(') => {
                self.advance();
                Ok(Token::LParen)
            }
            Some(')') => {
                self.advance();
                Ok(Token::RParen)
            }
            Some('<') => {
                self.advance();
                if self.current_char() == Some('=') {
                    self.advance();
                    Ok(Token::Lte)
                } else {
                    Ok(Token::Lt)
                }
            }
            Some('>') => {
                self.advance();
                if self.current_char() == Some('=') {
                    self.advance();
                    Ok(Token::Gte)
                } else {
                    Ok(Token::Gt)
                }
            }
            Some('=') => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    self.advance();
                    Ok(Token::EqEq)
                } else {
                    Err(CompileError::UnexpectedChar {
                        found: '=',
                        offset: self.position,
                    })
                }
            }
            Some('!') => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    self.advance();
                    Ok(Token::NotEq)
                } else {
                    Err(CompileError::UnexpectedChar {
                        found: '!',
                        offset: self.position,
                    })
                }
            }
            Some('"') => {
                let text = self.read_quoted('"', "string literal")?;
                Ok(Token::Literal(Value::String(text)))
            }
            Some('`') => {
                let text = self.read_quoted('`', "quoted path")?;
                Ok(Token::Path(Some(text)))
            }
            Some('/') => self.read_regex(),
            Some('#') => self.read_date_time(),
            Some('$') => {
                if self.peek_char(1) == Some('{') {
                    self.read_expression()
                } else {
                    self.advance();
                    Ok(Token::Path(None))
                }
            }
            Some(c) if c.is_ascii_digit() || c == '+' || c == '-' => self.read_number(),
            Some(c) if c.is_alphabetic() || c == '_' => self.read_word(),
            Some(c) => Err(CompileError::UnexpectedChar {
                found: c,
                offset: self.position,
            }),
        }
    }

    /// Reads between `quote` characters; a doubled quote is a literal quote.
    fn read_quoted(&mut self, quote: char, what: &'static str) -> Result<String, CompileError> {
        let start = self.position;
        self.advance(); // opening quote

        let mut result = String::new();
        loop {
            match self.current_char() {
                Some(c) if c == quote => {
                    if self.peek_char(1) == Some(quote) {
                        result.push(quote);
                        self.advance();
                        self.advance();
                    } else {
                        self.advance();
                        return Ok(result);
                    }
                }
                Some(c) => {
                    result.push(c);
                    self.advance();
                }
                None => return Err(CompileError::Unterminated { what, offset: start }),
            }
        }
    }

    /// `/pattern/flags`; `//` inside the pattern is a literal slash.
    fn read_regex(&mut self) -> Result<Token, CompileError> {
        let start = self.position;
        self.advance(); // opening '/'

        let mut pattern = String::new();
        loop {
            match self.current_char() {
                Some('/') if self.peek_char(1) == Some('/') => {
                    pattern.push('/');
                    self.advance();
                    self.advance();
                }
                Some('/') => {
                    self.advance();
                    break;
                }
                Some(c) => {
                    pattern.push(c);
                    self.advance();
                }
                None => {
                    return Err(CompileError::Unterminated {
                        what: "regex literal",
                        offset: start,
                    });
                }
            }
        }

        let mut options = String::new();
        while let Some(c) = self.current_char() {
            if c.is_ascii_alphabetic() {
                options.push(c);
                self.advance();
            } else {
                break;
            }
        }

        Ok(Token::Literal(Value::Regex { pattern, options }))
    }

    fn read_date_time(&mut self) -> Result<Token, CompileError> {
        let start = self.position;
        self.advance(); // opening '#'

        let mut text = String::new();
        loop {
            match self.current_char() {
                Some('#') => {
                    self.advance();
                    break;
                }
                Some(c) => {
                    text.push(c);
                    self.advance();
                }
                None => {
                    return Err(CompileError::Unterminated {
                        what: "datetime literal",
                        offset: start,
                    });
                }
            }
        }

        literal::date_time(&text)
            .map(Token::Literal)
            .ok_or_else(|| self.bad_literal("DATETIME", start))
    }

    fn read_expression(&mut self) -> Result<Token, CompileError> {
        let start = self.position;
        self.advance(); // '$'
        self.advance(); // '{'

        let mut text = String::new();
        loop {
            match self.current_char() {
                Some('}') => {
                    self.advance();
                    return Ok(Token::Expression(text));
                }
                Some(c) => {
                    text.push(c);
                    self.advance();
                }
                None => {
                    return Err(CompileError::Unterminated {
                        what: "expression",
                        offset: start,
                    });
                }
            }
        }
    }

    fn read_number(&mut self) -> Result<Token, CompileError> {
        let start = self.position;
        let mut text = String::new();

        if let Some(sign @ ('+' | '-')) = self.current_char() {
            if !self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) {
                return Err(CompileError::UnexpectedChar {
                    found: sign,
                    offset: self.position,
                });
            }
            text.push(sign);
            self.advance();
        }

        while let Some(c) = self.current_char() {
            if c.is_ascii_digit() {
                text.push(c);
                self.advance();
            } else {
                break;
            }
        }

        if self.current_char() == Some('.')
            && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
        {
            text.push('.');
            self.advance();
            while let Some(c) = self.current_char() {
                if c.is_ascii_digit() {
                    text.push(c);
                    self.advance();
                } else {
                    break;
                }
            }
        }

        if let Some(e @ ('e' | 'E')) = self.current_char() {
            // Consume the exponent only when it is well-formed; otherwise the
            // 'e' starts the next token.
            let after_sign = match self.peek_char(1) {
                Some('+') | Some('-') => self.peek_char(2),
                other => other,
            };
            if after_sign.is_some_and(|c| c.is_ascii_digit()) {
                text.push(e);
                self.advance();
                if let Some(sign @ ('+' | '-')) = self.current_char() {
                    text.push(sign);
                    self.advance();
                }
                while let Some(c) = self.current_char() {
                    if c.is_ascii_digit() {
                        text.push(c);
                        self.advance();
                    } else {
                        break;
                    }
                }
            }
        }

        literal::decimal(&text)
            .map(Token::Literal)
            .ok_or_else(|| self.bad_literal("NUMBER", start))
    }

    /// Bare word: keyword, boolean/null literal, `OBJECTID(`/`UUID(`/`BINARY(`
    /// literal call, or a dot-separated field path.
    fn read_word(&mut self) -> Result<Token, CompileError> {
        let start = self.position;
        let mut word = String::new();
        let mut dotted = false;

        loop {
            while let Some(c) = self.current_char() {
                if c.is_alphanumeric() || c == '_' {
                    word.push(c);
                    self.advance();
                } else {
                    break;
                }
            }

            // A dot continues the path only when a segment follows it.
            if self.current_char() == Some('.')
                && self
                    .peek_char(1)
                    .is_some_and(|c| c.is_alphanumeric() || c == '_')
            {
                dotted = true;
                word.push('.');
                self.advance();
            } else {
                break;
            }
        }

        if dotted {
            return Ok(Token::Path(Some(word)));
        }

        match word.to_ascii_lowercase().as_str() {
            "and" => Ok(Token::And),
            "or" => Ok(Token::Or),
            "not" => Ok(Token::Not),
            "between" => Ok(Token::Between),
            "exist" => Ok(Token::Exist),
            "in" => Ok(Token::In),
            "is" => Ok(Token::Is),
            "match" => Ok(Token::Match),
            "options" => Ok(Token::Options),
            "anyof" => Ok(Token::AnyOf),
            "typeof" => Ok(Token::TypeOf),
            "true" => Ok(Token::Literal(Value::Boolean(true))),
            "false" => Ok(Token::Literal(Value::Boolean(false))),
            "null" => Ok(Token::Literal(Value::Null)),
            "objectid" if self.current_char() == Some('(') => self.read_object_id(start),
            "uuid" if self.current_char() == Some('(') => self.read_uuid(start),
            "binary" if self.current_char() == Some('(') => self.read_binary(start),
            _ => Ok(Token::Path(Some(word))),
        }
    }

    fn read_object_id(&mut self, start: usize) -> Result<Token, CompileError> {
        let args = self.read_call_args("OBJECTID", start)?;
        match args.as_slice() {
            [hex] => literal::object_id(hex),
            _ => None,
        }
        .map(Token::Literal)
        .ok_or_else(|| self.bad_literal("OBJECTID", start))
    }

    fn read_uuid(&mut self, start: usize) -> Result<Token, CompileError> {
        let args = self.read_call_args("UUID", start)?;
        match args.as_slice() {
            [guid] => literal::uuid_value(None, guid),
            [representation, guid] => literal::uuid_value(Some(representation.as_str()), guid),
            _ => None,
        }
        .map(Token::Literal)
        .ok_or_else(|| self.bad_literal("UUID", start))
    }

    fn read_binary(&mut self, start: usize) -> Result<Token, CompileError> {
        let args = self.read_call_args("BINARY", start)?;
        match args.as_slice() {
            [base64] => literal::binary_value(None, base64),
            [subtype, base64] => literal::binary_value(Some(subtype.as_str()), base64),
            _ => None,
        }
        .map(Token::Literal)
        .ok_or_else(|| self.bad_literal("BINARY", start))
    }

    /// Comma-separated quoted strings up to a closing paren; whitespace is
    /// allowed around every argument.
    fn read_call_args(
        &mut self,
        family: &'static str,
        start: usize,
    ) -> Result<Vec<String>, CompileError> {
        self.advance(); // '('

        let mut args = Vec::new();
        loop {
            self.skip_whitespace();
            if self.current_char() != Some('"') {
                return Err(self.bad_literal(family, start));
            }
            args.push(self.read_quoted('"', "string literal")?);

            self.skip_whitespace();
            match self.current_char() {
                Some(',') => self.advance(),
                Some(')') => {
                    self.advance();
                    return Ok(args);
                }
                _ => return Err(self.bad_literal(family, start)),
            }
        }
    }
}
