//! Conditional Expression Parser
//!
//! Parses `[[ ... ]]` test expressions. Operands are words; `&&`, `||`,
//! `(`, `)`, `<` and `>` come from the lexer, and the remaining operators
//! are plain words such as `-f` or `==`.

use crate::ast::types::{
    BinTestOperator, BinaryTest, Command, ParenTest, TestClause, TestExpr, UnTestOperator,
    UnaryTest, Word,
};
use crate::parser::lexer::TokenType;
use crate::parser::parser::ParserState;
use crate::parser::types::SyntaxError;
use crate::parser::word_parser::WordMode;

impl<'a> ParserState<'a> {
    pub(super) fn parse_test_clause(&mut self) -> Result<Command, SyntaxError> {
        let start = self.tok.start;
        let left = self.consume_plain()?;
        self.skip_newlines()?;
        if self.is_plain("]]") {
            return Err(self.tok_error("`[[` must be followed by an expression"));
        }
        let x = self.parse_test_or()?;
        self.skip_newlines()?;
        if !self.is_plain("]]") {
            if self.tok.is(TokenType::Eof) {
                return Err(self
                    .lexer
                    .eof_error(start, "reached EOF without matching `[[` with `]]`"));
            }
            return Err(self.tok_error(format!(
                "not a valid test operator: {}",
                self.tok_desc()
            )));
        }
        let right = self.consume_plain()?;
        Ok(Command::TestClause(TestClause { left, right, x }))
    }

    fn parse_test_or(&mut self) -> Result<TestExpr, SyntaxError> {
        let mut x = self.parse_test_and()?;
        while self.tok.is(TokenType::OrOr) {
            let op_pos = self.pos(self.tok.start);
            self.next()?;
            self.skip_newlines()?;
            let y = self.parse_test_and()?;
            x = TestExpr::BinaryTest(Box::new(BinaryTest {
                op_pos,
                op: BinTestOperator::OrTest,
                x,
                y,
            }));
        }
        Ok(x)
    }

    fn parse_test_and(&mut self) -> Result<TestExpr, SyntaxError> {
        let mut x = self.parse_test_unary()?;
        while self.tok.is(TokenType::AndAnd) {
            let op_pos = self.pos(self.tok.start);
            self.next()?;
            self.skip_newlines()?;
            let y = self.parse_test_unary()?;
            x = TestExpr::BinaryTest(Box::new(BinaryTest {
                op_pos,
                op: BinTestOperator::AndTest,
                x,
                y,
            }));
        }
        Ok(x)
    }

    fn parse_test_unary(&mut self) -> Result<TestExpr, SyntaxError> {
        self.skip_newlines()?;
        if self.tok.is(TokenType::LParen) {
            let lparen = self.pos(self.tok.start);
            self.next()?;
            self.skip_newlines()?;
            let x = self.parse_test_or()?;
            self.skip_newlines()?;
            if !self.tok.is(TokenType::RParen) {
                return Err(self.tok_error("reached EOF without matching `(` with `)`"));
            }
            let rparen = self.pos(self.tok.start);
            self.next()?;
            return Ok(TestExpr::ParenTest(Box::new(ParenTest { lparen, rparen, x })));
        }

        if let Some(word) = self.tok_plain() {
            if let Some(op) = UnTestOperator::from_str(word) {
                if self.next_is_operand(word.len()) {
                    let op_pos = self.consume_plain()?;
                    let x = if op == UnTestOperator::Not {
                        self.parse_test_unary()?
                    } else {
                        TestExpr::Word(self.test_operand()?)
                    };
                    return Ok(TestExpr::UnaryTest(Box::new(UnaryTest { op_pos, op, x })));
                }
            }
        }

        let x = TestExpr::Word(self.test_operand()?);
        self.parse_test_binary(x)
    }

    /// A binary operator following `x`, if there is one.
    fn parse_test_binary(&mut self, x: TestExpr) -> Result<TestExpr, SyntaxError> {
        let op = match self.tok.token_type {
            TokenType::Less => Some(BinTestOperator::Before),
            TokenType::Great => Some(BinTestOperator::After),
            TokenType::Word => self
                .tok_plain()
                .and_then(BinTestOperator::from_str)
                .filter(|op| !matches!(op, BinTestOperator::AndTest | BinTestOperator::OrTest)),
            _ => None,
        };
        let Some(op) = op else {
            return Ok(x);
        };
        let op_start = self.tok.start;
        let op_pos = self.pos(op_start);
        let y = if op == BinTestOperator::ReMatch {
            self.lexer.set_pos(op_start + 2);
            self.lexer.skip_blanks()?;
            let regex_start = self.lexer.pos();
            let parts = self.parse_parts(WordMode::Regex)?;
            if parts.is_empty() {
                return Err(if self.lexer.at_end() {
                    self.lexer.eof_error(op_start, "`=~` must be followed by a word")
                } else {
                    self.lexer.error(regex_start, "`=~` must be followed by a word")
                });
            }
            self.next()?;
            Word { parts }
        } else {
            if matches!(self.tok.token_type, TokenType::Word) {
                self.consume_plain()?;
            } else {
                self.next()?;
            }
            self.test_operand()?
        };
        Ok(TestExpr::BinaryTest(Box::new(BinaryTest {
            op_pos,
            op,
            x,
            y: TestExpr::Word(y),
        })))
    }

    /// Whether a word follows a unary operator of `len` bytes, so that the
    /// operator is not itself the operand, as in `[[ -f ]]`.
    fn next_is_operand(&self, len: usize) -> bool {
        let after = self.lexer.skip_blanks_from(self.tok.start + len);
        let rest = self.src().get(after..self.lexer.end()).unwrap_or("");
        match rest.chars().next() {
            None => true,
            Some('\n' | ')' | ';') => false,
            Some(_) if rest.starts_with("&&") || rest.starts_with("||") => false,
            Some(_) => !matches!(self.lexer.plain_word_at(after), Some("]]")),
        }
    }

    fn test_operand(&mut self) -> Result<Word, SyntaxError> {
        match self.tok.token_type {
            TokenType::Word if !self.is_plain("]]") => self.take_word(),
            TokenType::Eof => Err(self.tok_error("reached EOF where a test operand was expected")),
            _ => Err(self.tok_error(format!(
                "test operand expected, found {}",
                self.tok_desc()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::types::{BinTestOperator, Command, TestExpr, UnTestOperator, WordPart};
    use crate::parser::{LangVariant, Parser, ParserConfig};

    fn test_expr(src: &str) -> TestExpr {
        let file = Parser::default().parse(src, "").unwrap();
        match file.stmts.stmts.into_iter().next().and_then(|s| s.cmd) {
            Some(Command::TestClause(clause)) => clause.x,
            other => panic!("expected a test clause, got {:?}", other),
        }
    }

    #[test]
    fn test_unary_file_test() {
        if let TestExpr::UnaryTest(u) = test_expr("[[ -f /etc/passwd ]]") {
            assert_eq!(u.op, UnTestOperator::RegFile);
        } else {
            panic!("Expected unary test");
        }
    }

    #[test]
    fn test_operator_as_operand() {
        if let TestExpr::Word(w) = test_expr("[[ -f ]]") {
            assert_eq!(w.lit(), Some("-f"));
        } else {
            panic!("Expected word");
        }
    }

    #[test]
    fn test_binary_and_logic() {
        if let TestExpr::BinaryTest(b) = test_expr("[[ $a == b* && ! -z $c || x < y ]]") {
            assert_eq!(b.op, BinTestOperator::OrTest);
            assert!(matches!(&b.y, TestExpr::BinaryTest(l) if l.op == BinTestOperator::Before));
            if let TestExpr::BinaryTest(and) = &b.x {
                assert_eq!(and.op, BinTestOperator::AndTest);
                assert!(matches!(&and.y, TestExpr::UnaryTest(n) if n.op == UnTestOperator::Not));
            } else {
                panic!("Expected and");
            }
        } else {
            panic!("Expected binary test");
        }
    }

    #[test]
    fn test_regex() {
        if let TestExpr::BinaryTest(b) = test_expr("[[ $x =~ ^(a|b)[0-9]+$ ]]") {
            assert_eq!(b.op, BinTestOperator::ReMatch);
            if let TestExpr::Word(w) = &b.y {
                assert!(matches!(&w.parts[0], WordPart::Lit(l) if l.value == "^(a|b)[0-9]+$"));
            } else {
                panic!("Expected word");
            }
        } else {
            panic!("Expected binary test");
        }
    }

    #[test]
    fn test_paren_test() {
        assert!(matches!(test_expr("[[ ( a == b ) ]]"), TestExpr::ParenTest(_)));
    }

    #[test]
    fn test_unclosed_is_incomplete() {
        let err = Parser::default().parse("[[ a == b", "").unwrap_err();
        assert!(err.incomplete);
        assert_eq!(err.message, "reached EOF without matching `[[` with `]]`");
    }

    #[test]
    fn test_posix_has_no_test_clause() {
        let parser = Parser::new(ParserConfig::new().variant(LangVariant::Posix));
        let file = parser.parse("[[ a ]]", "").unwrap();
        assert!(matches!(&file.stmts.stmts[0].cmd, Some(Command::CallExpr(_))));
    }
}
