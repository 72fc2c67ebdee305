//! Expansion Parsing
//!
//! Everything that starts with `$`: parameter expansions, command and
//! arithmetic substitutions, and the `$'...'` and `$"..."` quotes.

use crate::ast::types::{
    ArithmExp, ArithmExpr, CmdSubst, Expansion, Lit, ParExpOperator, ParNamesOperator, ParamExp,
    Position, Replace, Slice, Word, WordPart,
};
use crate::parser::lexer::{is_name_char, is_name_start};
use crate::parser::parser::{Closer, ParserState, BASH_LIKE};
use crate::parser::types::{LangVariant, SyntaxError};
use crate::parser::word_parser::WordMode;

/// Single-character special parameters
const SPECIAL_PARAMS: &str = "@*#?-$!0";

fn param_exp(dollar: Position, param: Lit, short: bool) -> ParamExp {
    ParamExp {
        dollar,
        rbrace: Position::default(),
        short,
        excl: false,
        length: false,
        width: false,
        param,
        index: None,
        slice: None,
        repl: None,
        names: None,
        exp: None,
    }
}

impl<'a> ParserState<'a> {
    /// Parse the expansion at a `$`. Returns `None`, without moving the
    /// cursor, when the `$` is a literal.
    pub(super) fn parse_dollar(&mut self, mode: WordMode) -> Result<Option<WordPart>, SyntaxError> {
        let start = self.lexer.pos();
        let quoted = matches!(mode, WordMode::DblQuoted | WordMode::Heredoc);
        let part = match self.lexer.peek_nth(1) {
            Some('(') if self.lexer.peek_nth(2) == Some('(') => {
                match self.parse_arithm_exp(start) {
                    Ok(part) => part,
                    Err(arith_err) => {
                        // `$((a) b)` is a command substitution starting with a subshell
                        self.lexer.set_pos(start);
                        match self.parse_cmd_subst(start) {
                            Ok(part) => part,
                            Err(_) => return Err(arith_err),
                        }
                    }
                }
            }
            Some('(') => self.parse_cmd_subst(start)?,
            Some('[') if self.lang() == LangVariant::Bash => self.parse_arithm_bracket(start)?,
            Some('\'') if !quoted && !self.lang().is_posix() => self.parse_sgl_quoted(true)?,
            Some('"') if !quoted && !self.lang().is_posix() => self.parse_dbl_quoted(true)?,
            Some('{') => self.parse_param_exp(start)?,
            Some(c) if is_name_start(c) => {
                self.lexer.bump();
                let name_start = self.lexer.pos();
                while self.lexer.peek().is_some_and(is_name_char) {
                    self.lexer.bump();
                }
                let param = self.lit(name_start, self.lexer.pos());
                WordPart::ParamExp(Box::new(param_exp(self.pos(start), param, true)))
            }
            Some(c) if c.is_ascii_digit() || SPECIAL_PARAMS.contains(c) => {
                self.lexer.bump_n(2);
                let param = self.lit(start + 1, start + 2);
                WordPart::ParamExp(Box::new(param_exp(self.pos(start), param, true)))
            }
            _ => return Ok(None),
        };
        Ok(Some(part))
    }

    /// `$(stmts)`
    fn parse_cmd_subst(&mut self, start: usize) -> Result<WordPart, SyntaxError> {
        self.lexer.bump_n(2);
        let (stmts, close) = self.parse_nested(start, "$(", start + 2, Closer::Paren)?;
        Ok(WordPart::CmdSubst(CmdSubst {
            left: self.pos(start),
            right: self.pos(close),
            stmts,
            backquotes: false,
            temp_file: false,
            reply_var: false,
        }))
    }

    /// `$((expr))`
    fn parse_arithm_exp(&mut self, start: usize) -> Result<WordPart, SyntaxError> {
        self.lexer.bump_n(3);
        let x = self.parse_arithm_expr()?;
        if !self.lexer.starts_with("))") {
            return Err(self.arithm_close_error(start, "$((", "))"));
        }
        let right = self.lexer.pos();
        self.lexer.bump_n(2);
        Ok(WordPart::ArithmExp(ArithmExp {
            left: self.pos(start),
            right: self.pos(right),
            bracket: false,
            x,
        }))
    }

    /// `$[expr]`
    fn parse_arithm_bracket(&mut self, start: usize) -> Result<WordPart, SyntaxError> {
        self.lexer.bump_n(2);
        let x = self.parse_arithm_expr()?;
        if self.lexer.peek() != Some(']') {
            return Err(self.arithm_close_error(start, "$[", "]"));
        }
        let right = self.lexer.pos();
        self.lexer.bump();
        Ok(WordPart::ArithmExp(ArithmExp {
            left: self.pos(start),
            right: self.pos(right),
            bracket: true,
            x,
        }))
    }

    pub(super) fn arithm_close_error(&self, left: usize, open: &str, close: &str) -> SyntaxError {
        if self.lexer.at_end() {
            self.lexer.eof_error(
                left,
                format!("reached EOF without matching `{}` with `{}`", open, close),
            )
        } else {
            self.lexer.error(
                self.lexer.pos(),
                format!("not a valid arithmetic operator: {}", self.lexer.peek().unwrap_or(' ')),
            )
        }
    }

    fn unclosed_param_exp(&self, start: usize) -> SyntaxError {
        self.lexer
            .eof_error(start, "reached EOF without matching `${` with `}`")
    }

    /// `${...}`, including the mksh `${ stmts;}` and `${|stmts;}` forms.
    fn parse_param_exp(&mut self, start: usize) -> Result<WordPart, SyntaxError> {
        self.lexer.bump_n(2);
        match self.lexer.peek() {
            Some('|') => {
                self.require_lang(start, "`${|stmts;}`", &[LangVariant::MirBSDKorn])?;
                self.lexer.bump();
                return self.parse_brace_subst(start, false, true);
            }
            Some(' ' | '\t' | '\n') => {
                self.require_lang(start, "`${ stmts;}`", &[LangVariant::MirBSDKorn])?;
                return self.parse_brace_subst(start, true, false);
            }
            _ => {}
        }

        let mut pe = param_exp(self.pos(start), self.lit(start + 2, start + 2), false);
        let rest = self.lexer.rest();
        let mut chars = rest.chars();
        let first = chars.next();
        let second = chars.next();
        match (first, second) {
            (Some('#'), Some(c)) if c != '}' => {
                pe.length = true;
                self.lexer.bump();
            }
            (Some('!'), Some(c)) if c != '}' => {
                self.require_lang(self.lexer.pos(), "`${!foo}`", BASH_LIKE)?;
                pe.excl = true;
                self.lexer.bump();
            }
            (Some('%'), Some(c)) if c != '}' && self.lang() == LangVariant::MirBSDKorn => {
                pe.width = true;
                self.lexer.bump();
            }
            _ => {}
        }

        let name_start = self.lexer.pos();
        match self.lexer.peek() {
            None => return Err(self.unclosed_param_exp(start)),
            Some(c) if is_name_start(c) => {
                while self.lexer.peek().is_some_and(is_name_char) {
                    self.lexer.bump();
                }
            }
            Some(c) if c.is_ascii_digit() => {
                while self.lexer.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.lexer.bump();
                }
            }
            Some(c) if SPECIAL_PARAMS.contains(c) => {
                self.lexer.bump();
            }
            Some(_) => {
                return Err(self
                    .lexer
                    .error(name_start, "parameter expansion requires a literal"))
            }
        }
        pe.param = self.lit(name_start, self.lexer.pos());

        if pe.excl && matches!(self.lexer.peek(), Some('*' | '@')) && self.lexer.peek_nth(1) == Some('}') {
            let op = if self.lexer.peek() == Some('*') {
                ParNamesOperator::NamesPrefix
            } else {
                ParNamesOperator::NamesPrefixWords
            };
            pe.names = Some(op);
            self.lexer.bump();
        }

        if self.lexer.peek() == Some('[') {
            self.require_lang(self.lexer.pos(), "arrays", BASH_LIKE)?;
            pe.index = Some(self.parse_param_index(start)?);
        }

        self.parse_param_op(start, &mut pe)?;

        match self.lexer.peek() {
            None => return Err(self.unclosed_param_exp(start)),
            Some('}') => {}
            Some(_) => return Err(self.lexer.error(self.lexer.pos(), "bad substitution")),
        }
        pe.rbrace = self.pos(self.lexer.pos());
        self.lexer.bump();
        Ok(WordPart::ParamExp(Box::new(pe)))
    }

    /// `[index]` after a parameter name; `@` and `*` are kept as words.
    fn parse_param_index(&mut self, start: usize) -> Result<ArithmExpr, SyntaxError> {
        let open = self.lexer.pos();
        self.lexer.bump();
        let index = if matches!(self.lexer.peek(), Some('@' | '*')) && self.lexer.peek_nth(1) == Some(']') {
            let lit = self.lit(open + 1, open + 2);
            self.lexer.bump();
            ArithmExpr::Word(Word {
                parts: vec![WordPart::Lit(lit)],
            })
        } else {
            self.parse_arithm_expr()?
        };
        match self.lexer.peek() {
            Some(']') => {
                self.lexer.bump();
                Ok(index)
            }
            None => Err(self.unclosed_param_exp(start)),
            Some(_) => Err(self.lexer.error(self.lexer.pos(), "bad substitution")),
        }
    }

    fn parse_param_op(&mut self, start: usize, pe: &mut ParamExp) -> Result<(), SyntaxError> {
        let at = self.lexer.pos();
        let Some(c) = self.lexer.peek() else {
            return Err(self.unclosed_param_exp(start));
        };
        let next = self.lexer.peek_nth(1);
        match c {
            '}' => {}
            ':' if matches!(next, Some('-' | '=' | '?' | '+')) => {
                let op = ParExpOperator::from_str(&self.src()[at..at + 2]);
                self.lexer.bump_n(2);
                self.parse_param_exp_word(pe, op)?;
            }
            ':' => {
                self.require_lang(at, "slicing", BASH_LIKE)?;
                self.lexer.bump();
                let offset = self.parse_arithm_expr()?;
                let length = if self.lexer.peek() == Some(':') {
                    self.lexer.bump();
                    Some(self.parse_arithm_expr()?)
                } else {
                    None
                };
                pe.slice = Some(Slice { offset, length });
            }
            '/' => {
                self.require_lang(at, "search and replace", BASH_LIKE)?;
                self.lexer.bump();
                let all = self.lexer.peek() == Some('/');
                if all {
                    self.lexer.bump();
                }
                let orig = Word {
                    parts: self.parse_parts(WordMode::ReplOrig)?,
                };
                let with = if self.lexer.peek() == Some('/') {
                    self.lexer.bump();
                    Some(Word {
                        parts: self.parse_parts(WordMode::ParamWord)?,
                    })
                } else {
                    None
                };
                pe.repl = Some(Replace { all, orig, with });
            }
            '-' | '=' | '?' | '+' => {
                self.lexer.bump();
                self.parse_param_exp_word(pe, ParExpOperator::from_str(&self.src()[at..at + 1]))?;
            }
            '%' | '#' => {
                let len = if next == Some(c) { 2 } else { 1 };
                let op = ParExpOperator::from_str(&self.src()[at..at + len]);
                self.lexer.bump_n(len);
                self.parse_param_exp_word(pe, op)?;
            }
            '^' | ',' => {
                self.require_lang(at, "this expansion operator", &[LangVariant::Bash])?;
                let len = if next == Some(c) { 2 } else { 1 };
                let op = ParExpOperator::from_str(&self.src()[at..at + len]);
                self.lexer.bump_n(len);
                self.parse_param_exp_word(pe, op)?;
            }
            '@' => {
                self.require_lang(at, "this expansion operator", &[LangVariant::Bash])?;
                self.lexer.bump();
                self.parse_param_exp_word(pe, Some(ParExpOperator::OtherParamOps))?;
            }
            _ => return Err(self.lexer.error(at, "bad substitution")),
        }
        Ok(())
    }

    fn parse_param_exp_word(
        &mut self,
        pe: &mut ParamExp,
        op: Option<ParExpOperator>,
    ) -> Result<(), SyntaxError> {
        let Some(op) = op else {
            return Err(self.lexer.error(self.lexer.pos(), "bad substitution"));
        };
        let parts = self.parse_parts(WordMode::ParamWord)?;
        let word = if parts.is_empty() { None } else { Some(Word { parts }) };
        pe.exp = Some(Expansion { op, word });
        Ok(())
    }

    /// mksh `${ stmts;}` and `${|stmts;}`
    fn parse_brace_subst(
        &mut self,
        start: usize,
        temp_file: bool,
        reply_var: bool,
    ) -> Result<WordPart, SyntaxError> {
        let (stmts, close) = self.parse_nested(start, "${", self.lexer.pos(), Closer::Brace)?;
        Ok(WordPart::CmdSubst(CmdSubst {
            left: self.pos(start),
            right: self.pos(close),
            stmts,
            backquotes: false,
            temp_file,
            reply_var,
        }))
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::types::{
        ArithmExpr, Command, ParExpOperator, ParNamesOperator, ParamExp, Word, WordPart,
    };
    use crate::parser::{LangVariant, Parser, ParserConfig};

    fn arg(src: &str) -> Word {
        let file = Parser::default().parse(src, "").unwrap();
        match &file.stmts.stmts[0].cmd {
            Some(Command::CallExpr(call)) => call.args[1].clone(),
            other => panic!("expected a call, got {:?}", other),
        }
    }

    fn param(src: &str) -> ParamExp {
        match arg(src).parts.remove(0) {
            WordPart::ParamExp(pe) => *pe,
            other => panic!("expected a parameter expansion, got {:?}", other),
        }
    }

    #[test]
    fn test_short_params() {
        let word = arg("echo $a$1$@x");
        assert_eq!(word.parts.len(), 4);
        assert!(matches!(&word.parts[1], WordPart::ParamExp(p) if p.param.value == "1"));
        assert!(matches!(&word.parts[2], WordPart::ParamExp(p) if p.param.value == "@"));
    }

    #[test]
    fn test_default_value() {
        let pe = param("echo ${foo:-bar baz}");
        assert_eq!(pe.param.value, "foo");
        let exp = pe.exp.unwrap();
        assert_eq!(exp.op, ParExpOperator::DefaultUnsetOrNull);
        assert_eq!(exp.word.unwrap().lit(), Some("bar baz"));
    }

    #[test]
    fn test_length_and_indirect() {
        assert!(param("echo ${#foo}").length);
        assert_eq!(param("echo ${#}").param.value, "#");
        let pe = param("echo ${!pre@}");
        assert!(pe.excl);
        assert_eq!(pe.names, Some(ParNamesOperator::NamesPrefixWords));
    }

    #[test]
    fn test_slice_and_replace() {
        let pe = param("echo ${a:1:2}");
        let slice = pe.slice.unwrap();
        assert!(slice.length.is_some());
        let pe = param("echo ${a//x/y}");
        let repl = pe.repl.unwrap();
        assert!(repl.all);
        assert_eq!(repl.orig.lit(), Some("x"));
        assert_eq!(repl.with.unwrap().lit(), Some("y"));
    }

    #[test]
    fn test_trim_operators() {
        let pe = param("echo ${path##*/}");
        assert_eq!(pe.exp.unwrap().op, ParExpOperator::RemLargePrefix);
        let pe = param("echo ${path%.*}");
        assert_eq!(pe.exp.unwrap().op, ParExpOperator::RemSmallSuffix);
    }

    #[test]
    fn test_index() {
        let pe = param("echo ${arr[@]}");
        assert!(matches!(pe.index, Some(ArithmExpr::Word(ref w)) if w.lit() == Some("@")));
        let pe = param("echo ${arr[i+1]}");
        assert!(matches!(pe.index, Some(ArithmExpr::BinaryArithm(_))));
    }

    #[test]
    fn test_unclosed_param_exp() {
        let err = Parser::default().parse("echo ${foo", "").unwrap_err();
        assert!(err.incomplete);
        assert_eq!(err.pos.to_string(), "1:6");
    }

    #[test]
    fn test_bad_substitution() {
        let err = Parser::default().parse("echo ${foo;}", "").unwrap_err();
        assert_eq!(err.message, "bad substitution");
        assert!(!err.incomplete);
    }

    #[test]
    fn test_case_expansion_is_bash_only() {
        let parser = Parser::new(ParserConfig::new().variant(LangVariant::MirBSDKorn));
        let err = parser.parse("echo ${a^^}", "").unwrap_err();
        assert_eq!(err.message, "this expansion operator is a bash feature");
    }

    #[test]
    fn test_cmd_subst_nested() {
        let word = arg("echo $(foo $(bar) | baz)");
        let WordPart::CmdSubst(cs) = &word.parts[0] else {
            panic!("expected a command substitution");
        };
        assert_eq!(cs.stmts.len(), 1);
        assert_eq!(cs.right.offset(), 23);
    }

    #[test]
    fn test_arithm_falls_back_to_subshell() {
        let word = arg("echo $((echo a); echo b)");
        let WordPart::CmdSubst(cs) = &word.parts[0] else {
            panic!("expected a command substitution");
        };
        assert_eq!(cs.stmts.len(), 2);
    }

    #[test]
    fn test_mksh_brace_subst() {
        let parser = Parser::new(ParserConfig::new().variant(LangVariant::MirBSDKorn));
        let file = parser.parse("echo ${ foo;} ${|bar;}", "").unwrap();
        let Some(Command::CallExpr(call)) = &file.stmts.stmts[0].cmd else {
            panic!("expected a call");
        };
        assert!(matches!(&call.args[1].parts[0], WordPart::CmdSubst(c) if c.temp_file));
        assert!(matches!(&call.args[2].parts[0], WordPart::CmdSubst(c) if c.reply_var));
        assert!(Parser::default().parse("echo ${ foo;}", "").is_err());
    }
}
