//! Compound Command Parser
//!
//! Handles parsing of compound commands: if, for, select, while, until,
//! case, blocks, subshells, `((...))` and `function` declarations.

use crate::ast::types::{
    ArithmCmd, Block, CStyleLoop, CaseClause, CaseItem, CaseOperator, Command, Elif, ForClause,
    FuncDecl, IfClause, Loop, Position, Subshell, WhileClause, WordIter,
};
use crate::parser::lexer::{is_valid_name, TokenType};
use crate::parser::parser::{ParserState, BASH_LIKE};
use crate::parser::types::{LangVariant, SyntaxError};

impl<'a> ParserState<'a> {
    /// A statement list that must not be empty, as after `if` or `while`.
    fn parse_required_list(&mut self, what: &str) -> Result<crate::ast::StmtList, SyntaxError> {
        let list = self.parse_stmt_list()?;
        if list.stmts.is_empty() {
            return Err(self.tok_error(format!("{} must be followed by a statement list", what)));
        }
        Ok(list)
    }

    // ===========================================================================
    // IF
    // ===========================================================================

    pub(super) fn parse_if(&mut self) -> Result<Command, SyntaxError> {
        let if_pos = self.consume_plain()?;
        let cond = self.parse_required_list("`if`")?;
        let then_pos = self.expect_plain("then", "`if <cond>` must be followed by `then`")?;
        let then = self.parse_required_list("`then`")?;

        let mut elifs = Vec::new();
        while self.is_plain("elif") {
            let elif_pos = self.consume_plain()?;
            let cond = self.parse_required_list("`elif`")?;
            let then_pos = self.expect_plain("then", "`elif <cond>` must be followed by `then`")?;
            let then = self.parse_required_list("`then`")?;
            elifs.push(Elif {
                elif_pos,
                then_pos,
                cond,
                then,
            });
        }

        let mut else_pos = Position::default();
        let mut else_stmts = None;
        if self.is_plain("else") {
            else_pos = self.consume_plain()?;
            else_stmts = Some(self.parse_stmt_list()?);
        }

        let fi_pos = self.expect_plain("fi", "`if` statement must end with a `fi`")?;
        Ok(Command::IfClause(IfClause {
            if_pos,
            then_pos,
            fi_pos,
            cond,
            then,
            elifs,
            else_pos,
            else_stmts,
        }))
    }

    // ===========================================================================
    // LOOPS
    // ===========================================================================

    pub(super) fn parse_while(&mut self, until: bool) -> Result<Command, SyntaxError> {
        let name = if until { "until" } else { "while" };
        let while_pos = self.consume_plain()?;
        let cond = self.parse_required_list(&format!("`{}`", name))?;
        let do_pos = self.expect_plain("do", &format!("`{} <cond>` must be followed by `do`", name))?;
        let body = self.parse_stmt_list()?;
        let done_pos = self.expect_plain("done", &format!("`{}` statement must end with `done`", name))?;
        Ok(Command::WhileClause(WhileClause {
            while_pos,
            do_pos,
            done_pos,
            until,
            cond,
            body,
        }))
    }

    /// `for` and `select` loops, including the C-style `for ((;;))`.
    pub(super) fn parse_for(&mut self, select: bool) -> Result<Command, SyntaxError> {
        let name = if select { "select" } else { "for" };
        let for_pos = self.consume_plain()?;

        let looper = if !select && self.tok.is(TokenType::LParen) && self.lexer.peek() == Some('(') {
            self.require_lang(self.tok.start, "c-style fors", BASH_LIKE)?;
            self.parse_c_style_loop()?
        } else {
            self.parse_word_iter(name)?
        };

        let do_pos = self.expect_plain("do", &format!("`{} foo [in words]` must be followed by `do`", name))?;
        let body = self.parse_stmt_list()?;
        let done_pos = self.expect_plain("done", &format!("`{}` statement must end with `done`", name))?;
        Ok(Command::ForClause(ForClause {
            for_pos,
            do_pos,
            done_pos,
            select,
            looper,
            body,
        }))
    }

    fn parse_word_iter(&mut self, name: &str) -> Result<Loop, SyntaxError> {
        let var = match self.tok_plain() {
            Some(word) if is_valid_name(word) => self.lit(self.tok.start, self.tok.start + word.len()),
            _ => return Err(self.tok_error(format!("`{}` must be followed by a literal", name))),
        };
        self.consume_plain()?;
        self.skip_newlines()?;

        let mut in_pos = None;
        let mut items = Vec::new();
        if self.is_plain("in") {
            in_pos = Some(self.consume_plain()?);
            while self.tok.is(TokenType::Word) {
                items.push(self.take_word()?);
            }
            match self.tok.token_type {
                TokenType::Semicolon => self.next()?,
                TokenType::Newline => {}
                _ => {
                    return Err(self.tok_error(format!(
                        "word list can only contain words, found {}",
                        self.tok_desc()
                    )))
                }
            }
        } else if self.tok.is(TokenType::Semicolon) {
            self.next()?;
        }
        self.skip_newlines()?;
        Ok(Loop::WordIter(WordIter {
            name: var,
            in_pos,
            items,
        }))
    }

    fn parse_c_style_loop(&mut self) -> Result<Loop, SyntaxError> {
        let left = self.tok.start;
        self.lexer.bump();
        let init = self.parse_arith_clause(";")?;
        self.expect_arith_sep(left, ";")?;
        let cond = self.parse_arith_clause(";")?;
        self.expect_arith_sep(left, ";")?;
        let post = self.parse_arith_clause("))")?;
        let right = self.lexer.pos();
        self.expect_arith_sep(left, "))")?;
        self.next()?;
        if self.tok.is(TokenType::Semicolon) {
            self.next()?;
        }
        self.skip_newlines()?;
        Ok(Loop::CStyleLoop(CStyleLoop {
            lparen: self.pos(left),
            rparen: self.pos(right),
            init,
            cond,
            post,
        }))
    }

    fn parse_arith_clause(&mut self, end: &str) -> Result<Option<crate::ast::ArithmExpr>, SyntaxError> {
        self.arith_skip()?;
        if self.lexer.starts_with(end) {
            return Ok(None);
        }
        Ok(Some(self.parse_arithm_expr()?))
    }

    fn expect_arith_sep(&mut self, left: usize, sep: &str) -> Result<(), SyntaxError> {
        if !self.lexer.starts_with(sep) {
            return Err(self.arithm_close_error(left, "((", "))"));
        }
        self.lexer.bump_n(sep.len());
        Ok(())
    }

    // ===========================================================================
    // CASE
    // ===========================================================================

    pub(super) fn parse_case(&mut self) -> Result<Command, SyntaxError> {
        let start = self.tok.start;
        let case_pos = self.consume_plain()?;
        if !self.tok.is(TokenType::Word) {
            return Err(self.tok_error("`case` must be followed by a word"));
        }
        let word = self.take_word()?;
        self.skip_newlines()?;
        self.expect_plain("in", "`case x` must be followed by `in`")?;

        let mut items = Vec::new();
        loop {
            self.skip_newlines()?;
            if self.is_plain("esac") {
                break;
            }
            if self.tok.is(TokenType::Eof) {
                return Err(self
                    .lexer
                    .eof_error(start, "reached EOF without matching `case` with `esac`"));
            }
            let item = self.parse_case_item()?;
            let last = !item.op_pos.is_valid();
            items.push(item);
            if last {
                break;
            }
        }
        self.skip_newlines()?;
        let last = self.take_comments();
        if self.tok.is(TokenType::Eof) {
            return Err(self
                .lexer
                .eof_error(start, "reached EOF without matching `case` with `esac`"));
        }
        let esac_pos = self.expect_plain("esac", "`case` statement must end with `esac`")?;
        Ok(Command::CaseClause(CaseClause {
            case_pos,
            esac_pos,
            word,
            items,
            last,
        }))
    }

    fn parse_case_item(&mut self) -> Result<CaseItem, SyntaxError> {
        let comments = self.take_comments();
        if self.tok.is(TokenType::LParen) {
            self.next()?;
        }
        let mut patterns = Vec::new();
        loop {
            if !self.tok.is(TokenType::Word) {
                return Err(self.tok_error("case patterns must consist of words"));
            }
            patterns.push(self.take_word()?);
            if !self.tok.is(TokenType::Pipe) {
                break;
            }
            self.next()?;
        }
        if !self.tok.is(TokenType::RParen) {
            return Err(self.tok_error("case patterns must be separated with |"));
        }
        self.next()?;

        let stmts = self.parse_stmt_list()?;
        let (op, op_pos) = match self.tok.token_type {
            TokenType::DSemi => (CaseOperator::Break, self.tok.start),
            TokenType::SemiAnd => {
                self.require_lang(self.tok.start, "`;&`", BASH_LIKE)?;
                (CaseOperator::Fallthrough, self.tok.start)
            }
            TokenType::SemiSemiAnd => {
                self.require_lang(self.tok.start, "`;;&`", &[LangVariant::Bash])?;
                (CaseOperator::Resume, self.tok.start)
            }
            TokenType::SemiPipe => {
                self.require_lang(self.tok.start, "`;|`", &[LangVariant::MirBSDKorn])?;
                (CaseOperator::ResumeKorn, self.tok.start)
            }
            _ => {
                return Ok(CaseItem {
                    op: CaseOperator::Break,
                    op_pos: Position::default(),
                    comments,
                    patterns,
                    stmts,
                })
            }
        };
        self.next()?;
        Ok(CaseItem {
            op,
            op_pos: self.pos(op_pos),
            comments,
            patterns,
            stmts,
        })
    }

    // ===========================================================================
    // GROUPING
    // ===========================================================================

    pub(super) fn parse_block(&mut self) -> Result<Command, SyntaxError> {
        let start = self.tok.start;
        let lbrace = self.consume_plain()?;
        let stmts = self.parse_stmt_list()?;
        if !self.is_plain("}") {
            if self.tok.is(TokenType::Eof) {
                return Err(self
                    .lexer
                    .eof_error(start, "reached EOF without matching `{` with `}`"));
            }
            return Err(self.unexpected_token());
        }
        let rbrace = self.consume_plain()?;
        Ok(Command::Block(Block {
            lbrace,
            rbrace,
            stmts,
        }))
    }

    pub(super) fn parse_subshell(&mut self) -> Result<Command, SyntaxError> {
        let start = self.tok.start;
        self.next()?;
        let stmts = self.parse_stmt_list()?;
        if !self.tok.is(TokenType::RParen) {
            if self.tok.is(TokenType::Eof) {
                return Err(self
                    .lexer
                    .eof_error(start, "reached EOF without matching `(` with `)`"));
            }
            return Err(self.unexpected_token());
        }
        if stmts.stmts.is_empty() {
            return Err(self.lexer.error(start, "a subshell must contain at least one statement"));
        }
        let rparen = self.pos(self.tok.start);
        self.next()?;
        Ok(Command::Subshell(Subshell {
            lparen: self.pos(start),
            rparen,
            stmts,
        }))
    }

    /// `((expr))`. The lexer has consumed the first `(`.
    pub(super) fn parse_arithm_cmd(&mut self) -> Result<Command, SyntaxError> {
        let start = self.tok.start;
        self.lexer.bump();
        let x = self.parse_arithm_expr()?;
        if !self.lexer.starts_with("))") {
            return Err(self.arithm_close_error(start, "((", "))"));
        }
        let right = self.lexer.pos();
        self.lexer.bump_n(2);
        self.next()?;
        Ok(Command::ArithmCmd(ArithmCmd {
            left: self.pos(start),
            right: self.pos(right),
            x,
        }))
    }

    // ===========================================================================
    // FUNCTIONS
    // ===========================================================================

    /// `function name [()] body`
    pub(super) fn parse_function(&mut self) -> Result<Command, SyntaxError> {
        let position = self.consume_plain()?;
        let name = match self.tok_plain() {
            Some(word) => self.lit(self.tok.start, self.tok.start + word.len()),
            None => return Err(self.tok_error("`function` must be followed by a name")),
        };
        self.consume_plain()?;
        if self.tok.is(TokenType::LParen) {
            self.next()?;
            if !self.tok.is(TokenType::RParen) {
                return Err(self.tok_error(format!("`{}(` must be followed by `)`", name.value)));
            }
            self.next()?;
        }
        let body = self.parse_func_body(&name.value)?;
        Ok(Command::FuncDecl(FuncDecl {
            position,
            rsrv_word: true,
            name,
            body: Box::new(body),
        }))
    }

    pub(super) fn parse_func_body(&mut self, name: &str) -> Result<crate::ast::Stmt, SyntaxError> {
        self.skip_newlines()?;
        if !self.can_start_stmt() {
            return Err(self.tok_error(format!("`{}()` must be followed by a statement", name)));
        }
        self.parse_command_stmt()
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::types::{CaseOperator, Command, Loop};
    use crate::parser::{LangVariant, Parser, ParserConfig};

    fn command(src: &str) -> Command {
        let file = Parser::default().parse(src, "").unwrap();
        file.stmts.stmts.into_iter().next().and_then(|s| s.cmd).unwrap()
    }

    #[test]
    fn test_parse_if_elif_else() {
        if let Command::IfClause(c) = command("if a; then b; elif c; then d; else e; fi") {
            assert_eq!(c.cond.len(), 1);
            assert_eq!(c.elifs.len(), 1);
            assert!(c.else_pos.is_valid());
            assert_eq!(c.else_stmts.unwrap().len(), 1);
            assert_eq!(c.fi_pos.offset(), 38);
        } else {
            panic!("Expected if");
        }
    }

    #[test]
    fn test_parse_while_until() {
        if let Command::WhileClause(c) = command("until false\ndo\n  x\ndone") {
            assert!(c.until);
            assert_eq!(c.body.len(), 1);
        } else {
            panic!("Expected until");
        }
    }

    #[test]
    fn test_parse_for_in() {
        if let Command::ForClause(c) = command("for i in a b c; do echo $i; done") {
            if let Loop::WordIter(w) = c.looper {
                assert_eq!(w.name.value, "i");
                assert_eq!(w.items.len(), 3);
                assert!(w.in_pos.is_some());
            } else {
                panic!("Expected word iteration");
            }
        } else {
            panic!("Expected for");
        }
    }

    #[test]
    fn test_parse_for_without_in() {
        if let Command::ForClause(c) = command("for arg\ndo :; done") {
            assert!(matches!(c.looper, Loop::WordIter(ref w) if w.in_pos.is_none()));
        } else {
            panic!("Expected for");
        }
    }

    #[test]
    fn test_parse_c_style_for() {
        if let Command::ForClause(c) = command("for ((i = 0; i < 3; i++)); do :; done") {
            if let Loop::CStyleLoop(l) = c.looper {
                assert!(l.init.is_some() && l.cond.is_some() && l.post.is_some());
            } else {
                panic!("Expected C-style loop");
            }
        } else {
            panic!("Expected for");
        }
        if let Command::ForClause(c) = command("for ((;;)) do :; done") {
            assert!(matches!(c.looper, Loop::CStyleLoop(ref l) if l.init.is_none()));
        } else {
            panic!("Expected for");
        }
    }

    #[test]
    fn test_parse_case() {
        let src = "case $x in\n  a|b) echo ab ;;\n  (c) echo c ;&\n  *) echo other\nesac";
        if let Command::CaseClause(c) = command(src) {
            assert_eq!(c.items.len(), 3);
            assert_eq!(c.items[0].patterns.len(), 2);
            assert_eq!(c.items[1].op, CaseOperator::Fallthrough);
            assert!(!c.items[2].op_pos.is_valid());
        } else {
            panic!("Expected case");
        }
    }

    #[test]
    fn test_case_operators_by_dialect() {
        let posix = Parser::new(ParserConfig::new().variant(LangVariant::Posix));
        let err = posix.parse("case x in a) ;& esac", "").unwrap_err();
        assert_eq!(err.message, "`;&` is a bash/mksh feature");
        let mksh = Parser::new(ParserConfig::new().variant(LangVariant::MirBSDKorn));
        assert!(mksh.parse("case x in a) b ;| esac", "").is_ok());
        assert!(Parser::default().parse("case x in a) b ;| esac", "").is_err());
    }

    #[test]
    fn test_parse_block_and_subshell() {
        assert!(matches!(command("{ a; b; }"), Command::Block(ref b) if b.stmts.len() == 2));
        assert!(matches!(command("(a; b)"), Command::Subshell(ref s) if s.stmts.len() == 2));
    }

    #[test]
    fn test_parse_arithm_cmd() {
        assert!(matches!(command("((x += 2))"), Command::ArithmCmd(_)));
        let posix = Parser::new(ParserConfig::new().variant(LangVariant::Posix));
        assert!(posix.parse("((x))", "").is_ok());
    }

    #[test]
    fn test_parse_functions() {
        if let Command::FuncDecl(f) = command("function foo { bar; }") {
            assert!(f.rsrv_word);
            assert_eq!(f.name.value, "foo");
        } else {
            panic!("Expected function");
        }
        if let Command::FuncDecl(f) = command("foo() (bar)") {
            assert!(!f.rsrv_word);
            assert!(matches!(f.body.cmd, Some(Command::Subshell(_))));
        } else {
            panic!("Expected function");
        }
    }

    #[test]
    fn test_unclosed_compounds_are_incomplete() {
        for src in ["if a; then b", "while a; do", "{ a;", "(a", "case x in", "for i in a b"] {
            let err = Parser::default().parse(src, "").unwrap_err();
            assert!(err.incomplete, "{} should be incomplete: {}", src, err);
        }
    }

    #[test]
    fn test_misplaced_reserved_word() {
        let err = Parser::default().parse("if a; then b; done", "").unwrap_err();
        assert!(!err.incomplete);
    }
}
