use crate::ast::{Entry, EntryKind, NO_LINK, Token};
use crate::error::CompileError;
use crate::lexer::Lexer;
use crate::program::FilterProgram;

/// Recursive-descent parser producing the flat entry arena.
///
/// Precedence is OR < AND < NOT/grouping < predicate. AND and OR groups are
/// appended as sibling chains, so `a AND b AND c` and `(a AND b) AND c` both
/// flatten into one three-element group, while explicitly nested groups of a
/// different operator keep their structure.
pub struct Parser {
    lexer: Lexer,
    current: Token,
    entries: Vec<Entry>,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self, CompileError> {
        let current = lexer.next_token()?;
        Ok(Parser {
            lexer,
            current,
            entries: Vec::new(),
        })
    }

    /// Consumes the whole token stream. Empty input is a valid filter and
    /// yields the empty program.
    pub fn parse(mut self) -> Result<FilterProgram, CompileError> {
        if self.current == Token::Eof {
            return Ok(FilterProgram::empty());
        }

        let root = self.parse_or()?;
        if self.current != Token::Eof {
            return Err(self.unexpected("end of filter"));
        }
        Ok(FilterProgram::new(self.entries, root))
    }

    fn advance(&mut self) -> Result<(), CompileError> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn expect(&mut self, token: Token, expected: &'static str) -> Result<(), CompileError> {
        if self.current == token {
            self.advance()
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn unexpected(&self, expected: &'static str) -> CompileError {
        CompileError::UnexpectedToken {
            found: self.current.to_string(),
            expected,
        }
    }

    fn add(&mut self, entry: Entry) -> i32 {
        self.entries.push(entry);
        (self.entries.len() - 1) as i32
    }

    /// Extends a sibling chain of `kind`, starting one when `left` is not
    /// already a chain of that kind.
    fn chain(&mut self, kind: EntryKind, left: i32, right: i32) -> i32 {
        if self.entries[left as usize].kind == kind {
            self.add(Entry::new(kind, left, right))
        } else {
            let head = self.add(Entry::new(kind, NO_LINK, left));
            self.add(Entry::new(kind, head, right))
        }
    }

    fn parse_or(&mut self) -> Result<i32, CompileError> {
        let mut left = self.parse_and()?;
        while self.current == Token::Or {
            self.advance()?;
            let right = self.parse_and()?;
            left = self.chain(EntryKind::Or, left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<i32, CompileError> {
        let mut left = self.parse_unary()?;
        while self.current == Token::And {
            self.advance()?;
            let right = self.parse_unary()?;
            left = self.chain(EntryKind::And, left, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<i32, CompileError> {
        match self.current {
            Token::Not => {
                self.advance()?;
                self.expect(Token::LParen, "\"(\"")?;
                let inner = self.parse_or()?;
                self.expect(Token::RParen, "\")\"")?;
                Ok(self.add(Entry::new(EntryKind::Not, inner, NO_LINK)))
            }
            Token::LParen => {
                self.advance()?;
                let inner = self.parse_or()?;
                self.expect(Token::RParen, "\")\"")?;
                Ok(inner)
            }
            Token::TypeOf => self.parse_typeof(),
            Token::AnyOf => self.parse_anyof(),
            Token::Path(_) => {
                let path = self.parse_path()?;
                self.parse_predicate(path)
            }
            _ => Err(self.unexpected("a field path, NOT, TYPEOF, ANYOF or \"(\"")),
        }
    }

    fn parse_path(&mut self) -> Result<Option<String>, CompileError> {
        match &self.current {
            Token::Path(path) => {
                let path = path.clone();
                self.advance()?;
                Ok(path)
            }
            _ => Err(self.unexpected("a field path")),
        }
    }

    fn parse_predicate(&mut self, path: Option<String>) -> Result<i32, CompileError> {
        let comparison = match self.current {
            Token::Lt => Some(EntryKind::Lt),
            Token::Lte => Some(EntryKind::Lte),
            Token::Gt => Some(EntryKind::Gt),
            Token::Gte => Some(EntryKind::Gte),
            Token::EqEq => Some(EntryKind::Eq),
            Token::NotEq => Some(EntryKind::Neq),
            _ => None,
        };
        if let Some(kind) = comparison {
            self.advance()?;
            let value = self.parse_value_entry()?;
            return Ok(self.add(Entry::with_text(kind, path, value, NO_LINK)));
        }

        let negated = if self.current == Token::Not {
            self.advance()?;
            true
        } else {
            false
        };

        match self.current {
            Token::Between => {
                self.advance()?;
                let low = self.parse_value_entry()?;
                self.expect(Token::And, "AND")?;
                let high = self.parse_value_entry()?;
                let kind = if negated {
                    EntryKind::Nbetween
                } else {
                    EntryKind::Between
                };
                Ok(self.add(Entry::with_text(kind, path, low, high)))
            }
            Token::Exist => {
                self.advance()?;
                let kind = if negated {
                    EntryKind::Nexist
                } else {
                    EntryKind::Exist
                };
                Ok(self.add(Entry::with_text(kind, path, NO_LINK, NO_LINK)))
            }
            Token::In => {
                self.advance()?;
                let operand = self.parse_in_operand()?;
                let kind = if negated { EntryKind::Nin } else { EntryKind::In };
                Ok(self.add(Entry::with_text(kind, path, operand, NO_LINK)))
            }
            Token::Match => {
                self.advance()?;
                let pattern = self.parse_value_entry()?;
                if self.current == Token::Options {
                    self.advance()?;
                    let options = self.parse_value_entry()?;
                    let kind = if negated {
                        EntryKind::NmatchOp
                    } else {
                        EntryKind::MatchOp
                    };
                    Ok(self.add(Entry::with_text(kind, path, pattern, options)))
                } else {
                    let kind = if negated {
                        EntryKind::Nmatch
                    } else {
                        EntryKind::Match
                    };
                    Ok(self.add(Entry::with_text(kind, path, pattern, NO_LINK)))
                }
            }
            _ => Err(self.unexpected(if negated {
                "BETWEEN, EXIST, IN or MATCH"
            } else {
                "a comparison operator, BETWEEN, EXIST, IN or MATCH"
            })),
        }
    }

    fn parse_typeof(&mut self) -> Result<i32, CompileError> {
        self.advance()?; // TYPEOF
        let path = self.parse_path()?;

        match self.current {
            Token::EqEq => {
                self.advance()?;
                let value = self.parse_value_entry()?;
                Ok(self.add(Entry::with_text(EntryKind::TypeEq, path, value, NO_LINK)))
            }
            Token::NotEq => {
                self.advance()?;
                let value = self.parse_value_entry()?;
                Ok(self.add(Entry::with_text(EntryKind::TypeNeq, path, value, NO_LINK)))
            }
            Token::In => {
                self.advance()?;
                let operand = self.parse_in_operand()?;
                Ok(self.add(Entry::with_text(EntryKind::TypeIn, path, operand, NO_LINK)))
            }
            Token::Not => {
                self.advance()?;
                self.expect(Token::In, "IN")?;
                let operand = self.parse_in_operand()?;
                Ok(self.add(Entry::with_text(EntryKind::TypeNin, path, operand, NO_LINK)))
            }
            _ => Err(self.unexpected("\"==\", \"!=\" or IN")),
        }
    }

    fn parse_anyof(&mut self) -> Result<i32, CompileError> {
        self.advance()?; // ANYOF
        let path = self.parse_path()?;
        self.expect(Token::Is, "IS")?;

        let negated = if self.current == Token::Not {
            self.advance()?;
            true
        } else {
            false
        };

        self.expect(Token::LParen, "\"(\"")?;
        let inner = self.parse_or()?;
        self.expect(Token::RParen, "\")\"")?;

        let kind = if negated {
            EntryKind::AnyNis
        } else {
            EntryKind::AnyIs
        };
        Ok(self.add(Entry::with_text(kind, path, inner, NO_LINK)))
    }

    /// Membership operand: a parenthesized value list or an array-producing
    /// `${...}` expression.
    fn parse_in_operand(&mut self) -> Result<i32, CompileError> {
        if let Token::Expression(text) = &self.current {
            let text = text.clone();
            self.advance()?;
            return Ok(self.add(Entry::with_text(
                EntryKind::ArrayExpr,
                Some(text),
                NO_LINK,
                NO_LINK,
            )));
        }

        self.expect(Token::LParen, "\"(\" or an expression")?;
        let first = self.parse_value_entry()?;
        let mut head = self.add(Entry::new(EntryKind::List, NO_LINK, first));
        while self.current == Token::Comma {
            self.advance()?;
            let next = self.parse_value_entry()?;
            head = self.add(Entry::new(EntryKind::List, head, next));
        }
        self.expect(Token::RParen, "\")\"")?;
        Ok(head)
    }

    fn parse_value_entry(&mut self) -> Result<i32, CompileError> {
        match &self.current {
            Token::Literal(value) => {
                let value = value.clone();
                self.advance()?;
                Ok(self.add(Entry::with_value(EntryKind::Value, value)))
            }
            Token::Expression(text) => {
                let text = text.clone();
                self.advance()?;
                Ok(self.add(Entry::with_text(
                    EntryKind::ValueExpr,
                    Some(text),
                    NO_LINK,
                    NO_LINK,
                )))
            }
            _ => Err(self.unexpected("a value")),
        }
    }
}
