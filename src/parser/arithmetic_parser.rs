//! Arithmetic Expression Parser
//!
//! Parses the inside of `$((...))`, `((...))`, C-style for loops, array
//! indexes and slices, reading straight from the lexer's cursor:
//! - $((1 + 2))
//! - $((x++))
//! - $((a ? b : c))
//! - $((2#1010))
//!
//! Precedence, lowest first: comma, assignment, ternary, `||`, `&&`, `|`,
//! `^`, `&`, equality, relational, shift, additive, multiplicative, `**`,
//! unary prefix, postfix.

use crate::ast::types::{
    ArithmExpr, BinAritOperator, BinaryArithm, ParenArithm, UnAritOperator, UnaryArithm, Word,
};
use crate::parser::parser::ParserState;
use crate::parser::types::SyntaxError;
use crate::parser::word_parser::WordMode;

/// Arithmetic operators, longest first so that `<<=` wins over `<<` and `<`
const ARITH_OPS: &[&str] = &[
    "<<=", ">>=", "**", "++", "--", "<<", ">>", "<=", ">=", "==", "!=", "&&", "||", "+=", "-=",
    "*=", "/=", "%=", "&=", "|=", "^=", "+", "-", "*", "/", "%", "<", ">", "=", "!", "~", "&",
    "|", "^", "?", ":", ",",
];

const ASSIGN_OPS: &[BinAritOperator] = &[
    BinAritOperator::Assgn,
    BinAritOperator::AddAssgn,
    BinAritOperator::SubAssgn,
    BinAritOperator::MulAssgn,
    BinAritOperator::QuoAssgn,
    BinAritOperator::RemAssgn,
    BinAritOperator::AndAssgn,
    BinAritOperator::OrAssgn,
    BinAritOperator::XorAssgn,
    BinAritOperator::ShlAssgn,
    BinAritOperator::ShrAssgn,
];

type Level<'a> = fn(&mut ParserState<'a>) -> Result<ArithmExpr, SyntaxError>;

fn binary(op: BinAritOperator, op_pos: crate::ast::Position, x: ArithmExpr, y: ArithmExpr) -> ArithmExpr {
    ArithmExpr::BinaryArithm(Box::new(BinaryArithm { op_pos, op, x, y }))
}

impl<'a> ParserState<'a> {
    /// Parse a full arithmetic expression, leaving the cursor at the first
    /// character that cannot continue it.
    pub(super) fn parse_arithm_expr(&mut self) -> Result<ArithmExpr, SyntaxError> {
        let x = self.parse_arith_comma()?;
        self.arith_skip()?;
        Ok(x)
    }

    /// Skip blanks, newlines and line continuations.
    pub(super) fn arith_skip(&mut self) -> Result<(), SyntaxError> {
        loop {
            self.lexer.skip_blanks()?;
            if self.lexer.peek() == Some('\n') {
                self.lexer.bump();
            } else {
                return Ok(());
            }
        }
    }

    /// The operator at the cursor, after skipping blanks.
    fn arith_op(&mut self) -> Result<Option<&'static str>, SyntaxError> {
        self.arith_skip()?;
        let rest = self.lexer.rest();
        Ok(ARITH_OPS.iter().copied().find(|op| rest.starts_with(op)))
    }

    /// Consume `op` and parse the operand that must follow it.
    fn arith_operand(&mut self, op: &str, level: Level<'a>) -> Result<ArithmExpr, SyntaxError> {
        let op_start = self.lexer.pos();
        self.lexer.bump_n(op.len());
        self.arith_skip()?;
        if self.lexer.at_end() {
            return Err(self
                .lexer
                .eof_error(op_start, format!("`{}` must be followed by an expression", op)));
        }
        level(self)
    }

    /// A left-associative level made of `ops` over `next`.
    fn arith_left_assoc(
        &mut self,
        ops: &[BinAritOperator],
        next: Level<'a>,
    ) -> Result<ArithmExpr, SyntaxError> {
        let mut x = next(self)?;
        loop {
            let Some(text) = self.arith_op()? else {
                break;
            };
            let Some(op) = BinAritOperator::from_str(text).filter(|op| ops.contains(op)) else {
                break;
            };
            let op_pos = self.pos(self.lexer.pos());
            let y = self.arith_operand(text, next)?;
            x = binary(op, op_pos, x, y);
        }
        Ok(x)
    }

    fn parse_arith_comma(&mut self) -> Result<ArithmExpr, SyntaxError> {
        self.arith_left_assoc(&[BinAritOperator::Comma], Self::parse_arith_assign)
    }

    fn parse_arith_assign(&mut self) -> Result<ArithmExpr, SyntaxError> {
        let x = self.parse_arith_ternary()?;
        let Some(text) = self.arith_op()? else {
            return Ok(x);
        };
        match BinAritOperator::from_str(text).filter(|op| ASSIGN_OPS.contains(op)) {
            Some(op) => {
                let op_pos = self.pos(self.lexer.pos());
                let y = self.arith_operand(text, Self::parse_arith_assign)?;
                Ok(binary(op, op_pos, x, y))
            }
            None => Ok(x),
        }
    }

    fn parse_arith_ternary(&mut self) -> Result<ArithmExpr, SyntaxError> {
        let cond = self.parse_arith_or()?;
        if self.arith_op()? != Some("?") {
            return Ok(cond);
        }
        let quest_pos = self.pos(self.lexer.pos());
        let then = self.arith_operand("?", Self::parse_arith_assign)?;
        if self.arith_op()? != Some(":") {
            let at = self.lexer.pos();
            return Err(if self.lexer.at_end() {
                self.lexer.eof_error(at, "ternary operator missing : after ?")
            } else {
                self.lexer.error(at, "ternary operator missing : after ?")
            });
        }
        let colon_pos = self.pos(self.lexer.pos());
        let otherwise = self.arith_operand(":", Self::parse_arith_ternary)?;
        Ok(binary(
            BinAritOperator::TernQuest,
            quest_pos,
            cond,
            binary(BinAritOperator::TernColon, colon_pos, then, otherwise),
        ))
    }

    fn parse_arith_or(&mut self) -> Result<ArithmExpr, SyntaxError> {
        self.arith_left_assoc(&[BinAritOperator::OrArit], Self::parse_arith_and)
    }

    fn parse_arith_and(&mut self) -> Result<ArithmExpr, SyntaxError> {
        self.arith_left_assoc(&[BinAritOperator::AndArit], Self::parse_arith_bitwise_or)
    }

    fn parse_arith_bitwise_or(&mut self) -> Result<ArithmExpr, SyntaxError> {
        self.arith_left_assoc(&[BinAritOperator::Or], Self::parse_arith_bitwise_xor)
    }

    fn parse_arith_bitwise_xor(&mut self) -> Result<ArithmExpr, SyntaxError> {
        self.arith_left_assoc(&[BinAritOperator::Xor], Self::parse_arith_bitwise_and)
    }

    fn parse_arith_bitwise_and(&mut self) -> Result<ArithmExpr, SyntaxError> {
        self.arith_left_assoc(&[BinAritOperator::And], Self::parse_arith_equality)
    }

    fn parse_arith_equality(&mut self) -> Result<ArithmExpr, SyntaxError> {
        self.arith_left_assoc(
            &[BinAritOperator::Eql, BinAritOperator::Neq],
            Self::parse_arith_relational,
        )
    }

    fn parse_arith_relational(&mut self) -> Result<ArithmExpr, SyntaxError> {
        self.arith_left_assoc(
            &[
                BinAritOperator::Lss,
                BinAritOperator::Gtr,
                BinAritOperator::Leq,
                BinAritOperator::Geq,
            ],
            Self::parse_arith_shift,
        )
    }

    fn parse_arith_shift(&mut self) -> Result<ArithmExpr, SyntaxError> {
        self.arith_left_assoc(
            &[BinAritOperator::Shl, BinAritOperator::Shr],
            Self::parse_arith_additive,
        )
    }

    fn parse_arith_additive(&mut self) -> Result<ArithmExpr, SyntaxError> {
        self.arith_left_assoc(
            &[BinAritOperator::Add, BinAritOperator::Sub],
            Self::parse_arith_multiplicative,
        )
    }

    fn parse_arith_multiplicative(&mut self) -> Result<ArithmExpr, SyntaxError> {
        self.arith_left_assoc(
            &[BinAritOperator::Mul, BinAritOperator::Quo, BinAritOperator::Rem],
            Self::parse_arith_power,
        )
    }

    fn parse_arith_power(&mut self) -> Result<ArithmExpr, SyntaxError> {
        let base = self.parse_arith_unary()?;
        if self.arith_op()? != Some("**") {
            return Ok(base);
        }
        let op_pos = self.pos(self.lexer.pos());
        // Right associative
        let exponent = self.arith_operand("**", Self::parse_arith_power)?;
        Ok(binary(BinAritOperator::Pow, op_pos, base, exponent))
    }

    fn parse_arith_unary(&mut self) -> Result<ArithmExpr, SyntaxError> {
        let op = match self.arith_op()? {
            Some(text @ ("!" | "~" | "++" | "--" | "+" | "-")) => UnAritOperator::from_str(text).map(|op| (text, op)),
            _ => None,
        };
        let Some((text, op)) = op else {
            return self.parse_arith_postfix();
        };
        let op_pos = self.pos(self.lexer.pos());
        let x = self.arith_operand(text, Self::parse_arith_unary)?;
        Ok(ArithmExpr::UnaryArithm(Box::new(UnaryArithm {
            op_pos,
            op,
            post: false,
            x,
        })))
    }

    fn parse_arith_postfix(&mut self) -> Result<ArithmExpr, SyntaxError> {
        let x = self.parse_arith_primary()?;
        if !matches!(x, ArithmExpr::Word(_)) {
            return Ok(x);
        }
        let op = match self.arith_op()? {
            Some("++") => UnAritOperator::Inc,
            Some("--") => UnAritOperator::Dec,
            _ => return Ok(x),
        };
        let op_pos = self.pos(self.lexer.pos());
        self.lexer.bump_n(2);
        Ok(ArithmExpr::UnaryArithm(Box::new(UnaryArithm {
            op_pos,
            op,
            post: true,
            x,
        })))
    }

    fn parse_arith_primary(&mut self) -> Result<ArithmExpr, SyntaxError> {
        self.arith_skip()?;
        let start = self.lexer.pos();
        if self.lexer.peek() == Some('(') {
            self.lexer.bump();
            let x = self.parse_arithm_expr()?;
            if self.lexer.peek() != Some(')') {
                return Err(self.arithm_close_error(start, "(", ")"));
            }
            let rparen = self.lexer.pos();
            self.lexer.bump();
            return Ok(ArithmExpr::ParenArithm(Box::new(ParenArithm {
                lparen: self.pos(start),
                rparen: self.pos(rparen),
                x,
            })));
        }
        let parts = self.parse_parts(WordMode::Arithm)?;
        if parts.is_empty() {
            return Err(match self.lexer.peek() {
                None => self
                    .lexer
                    .eof_error(start, "reached EOF where an arithmetic expression was expected"),
                Some(c) => self
                    .lexer
                    .error(start, format!("`{}` is not a valid arithmetic operand", c)),
            });
        }
        Ok(ArithmExpr::Word(Word { parts }))
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::types::{ArithmExpr, BinAritOperator, Command, UnAritOperator, WordPart};
    use crate::parser::Parser;

    fn arithm(src: &str) -> ArithmExpr {
        let file = Parser::default().parse(&format!("(( {} ))", src), "").unwrap();
        match file.stmts.stmts.into_iter().next().and_then(|s| s.cmd) {
            Some(Command::ArithmCmd(cmd)) => cmd.x,
            other => panic!("expected an arithmetic command, got {:?}", other),
        }
    }

    #[test]
    fn test_simple_number() {
        if let ArithmExpr::Word(w) = arithm("42") {
            assert_eq!(w.lit(), Some("42"));
        } else {
            panic!("Expected word");
        }
    }

    #[test]
    fn test_precedence() {
        if let ArithmExpr::BinaryArithm(b) = arithm("1 + 2 * 3") {
            assert_eq!(b.op, BinAritOperator::Add);
            assert!(matches!(&b.y, ArithmExpr::BinaryArithm(m) if m.op == BinAritOperator::Mul));
        } else {
            panic!("Expected binary");
        }
    }

    #[test]
    fn test_left_associative() {
        if let ArithmExpr::BinaryArithm(b) = arithm("a - b - c") {
            assert!(matches!(&b.x, ArithmExpr::BinaryArithm(l) if l.op == BinAritOperator::Sub));
        } else {
            panic!("Expected binary");
        }
    }

    #[test]
    fn test_power_right_associative() {
        if let ArithmExpr::BinaryArithm(b) = arithm("2 ** 3 ** 2") {
            assert_eq!(b.op, BinAritOperator::Pow);
            assert!(matches!(&b.y, ArithmExpr::BinaryArithm(r) if r.op == BinAritOperator::Pow));
        } else {
            panic!("Expected binary");
        }
    }

    #[test]
    fn test_assignment() {
        if let ArithmExpr::BinaryArithm(b) = arithm("x <<= 5") {
            assert_eq!(b.op, BinAritOperator::ShlAssgn);
        } else {
            panic!("Expected assignment");
        }
    }

    #[test]
    fn test_ternary() {
        if let ArithmExpr::BinaryArithm(b) = arithm("a ? b : c") {
            assert_eq!(b.op, BinAritOperator::TernQuest);
            assert!(matches!(&b.y, ArithmExpr::BinaryArithm(c) if c.op == BinAritOperator::TernColon));
        } else {
            panic!("Expected ternary");
        }
    }

    #[test]
    fn test_increment() {
        if let ArithmExpr::UnaryArithm(u) = arithm("x++") {
            assert_eq!(u.op, UnAritOperator::Inc);
            assert!(u.post);
        } else {
            panic!("Expected unary");
        }
        if let ArithmExpr::UnaryArithm(u) = arithm("++x") {
            assert!(!u.post);
        } else {
            panic!("Expected unary");
        }
    }

    #[test]
    fn test_operands_with_expansions() {
        if let ArithmExpr::BinaryArithm(b) = arithm("$a + ${b} + arr[i]") {
            assert!(matches!(&b.y, ArithmExpr::Word(w) if w.lit() == Some("arr[i]")));
            if let ArithmExpr::BinaryArithm(l) = &b.x {
                assert!(matches!(&l.x, ArithmExpr::Word(w) if matches!(w.parts[0], WordPart::ParamExp(_))));
            } else {
                panic!("Expected binary");
            }
        } else {
            panic!("Expected binary");
        }
    }

    #[test]
    fn test_missing_operand() {
        let err = Parser::default().parse("echo $((1 +", "").unwrap_err();
        assert!(err.incomplete);
        let err = Parser::default().parse("(( a ? b ))", "").unwrap_err();
        assert_eq!(err.message, "ternary operator missing : after ?");
    }
}
