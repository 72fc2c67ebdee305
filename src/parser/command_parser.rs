//! Command Parser
//!
//! Handles parsing of statements in command position: dispatch to compound
//! commands, simple commands, assignments, arrays, redirections and
//! `name()` function declarations.

use crate::ast::types::{
    ArrayElem, ArrayExpr, Assign, CallExpr, Command, FuncDecl, RedirOperator, Redirect, Stmt,
    Word, WordPart,
};
use crate::parser::lexer::{
    is_name_char, is_name_start, is_valid_name, is_word_boundary, PendingHeredoc, TokenType,
    LIST_TERMINATORS, RESERVED_WORDS,
};
use crate::parser::parser::{ParserState, BASH_LIKE};
use crate::parser::types::SyntaxError;
use crate::parser::word_parser::WordMode;
use crate::printer;

/// Strip the quoting from a here-document delimiter. Returns the delimiter
/// and whether any part of it was quoted, which disables expansions in
/// the body.
pub(crate) fn heredoc_delimiter(word: &Word) -> (String, bool) {
    let mut delimiter = String::new();
    let mut quoted = false;
    for part in &word.parts {
        match part {
            WordPart::Lit(lit) => {
                let mut chars = lit.value.chars();
                while let Some(c) = chars.next() {
                    if c == '\\' {
                        quoted = true;
                        delimiter.extend(chars.next());
                    } else {
                        delimiter.push(c);
                    }
                }
            }
            WordPart::SglQuoted(q) => {
                quoted = true;
                delimiter.push_str(&q.value);
            }
            WordPart::DblQuoted(q) => {
                quoted = true;
                for inner in &q.parts {
                    match inner {
                        WordPart::Lit(lit) => delimiter.push_str(&lit.value),
                        other => delimiter.push_str(&printer::print_word_part(other)),
                    }
                }
            }
            other => delimiter.push_str(&printer::print_word_part(other)),
        }
    }
    (delimiter, quoted)
}

impl<'a> ParserState<'a> {
    /// Parse one command with its redirections.
    pub(super) fn parse_command_stmt(&mut self) -> Result<Stmt, SyntaxError> {
        let comments = self.take_comments();
        let mut stmt = self.stmt_at(self.tok.start);
        stmt.comments = comments;

        let posix = self.lang().is_posix();
        let compound = match self.tok.token_type {
            TokenType::Word => match self.tok_plain() {
                Some("{") => Some(self.parse_block()),
                Some("if") => Some(self.parse_if()),
                Some("while") => Some(self.parse_while(false)),
                Some("until") => Some(self.parse_while(true)),
                Some("for") => Some(self.parse_for(false)),
                Some("case") => Some(self.parse_case()),
                Some("select") if !posix => Some(self.parse_for(true)),
                Some("function") if !posix => Some(self.parse_function()),
                Some("[[") if !posix => Some(self.parse_test_clause()),
                Some(word) if LIST_TERMINATORS.contains_key(word) => {
                    return Err(self.unexpected_token())
                }
                _ => None,
            },
            TokenType::LParen if !posix && self.lexer.peek() == Some('(') => {
                Some(self.parse_arithm_cmd())
            }
            TokenType::LParen => Some(self.parse_subshell()),
            _ => None,
        };

        match compound {
            Some(cmd) => {
                stmt.cmd = Some(cmd?);
                while self.tok.is(TokenType::IoNumber) || self.tok.token_type.is_redirect() {
                    self.parse_redirect(&mut stmt)?;
                }
            }
            None => self.parse_simple_command(&mut stmt)?,
        }
        Ok(stmt)
    }

    fn parse_simple_command(&mut self, stmt: &mut Stmt) -> Result<(), SyntaxError> {
        let mut assigns = Vec::new();
        let mut args: Vec<Word> = Vec::new();
        loop {
            match self.tok.token_type {
                TokenType::IoNumber => self.parse_redirect(stmt)?,
                t if t.is_redirect() => self.parse_redirect(stmt)?,
                TokenType::Word => {
                    if args.is_empty() && assigns.is_empty() && stmt.redirs.is_empty() {
                        if let Some(decl) = self.try_parse_func_decl()? {
                            stmt.cmd = Some(decl);
                            return Ok(());
                        }
                    }
                    if args.is_empty() {
                        if let Some(assign) = self.try_parse_assign()? {
                            assigns.push(assign);
                            continue;
                        }
                    }
                    args.push(self.take_word()?);
                }
                _ => break,
            }
        }

        if assigns.is_empty() && args.is_empty() {
            if stmt.redirs.is_empty() {
                return Err(self.unexpected_token());
            }
        } else {
            stmt.cmd = Some(Command::CallExpr(CallExpr { assigns, args }));
        }
        Ok(())
    }

    // ===========================================================================
    // FUNCTION DECLARATIONS
    // ===========================================================================

    /// `name() body`, recognized by looking ahead for `(` and `)`.
    fn try_parse_func_decl(&mut self) -> Result<Option<Command>, SyntaxError> {
        let start = self.tok.start;
        let Some(name) = self.tok_plain() else {
            return Ok(None);
        };
        if RESERVED_WORDS.contains(name) || name.contains('=') {
            return Ok(None);
        }
        let lparen = self.lexer.skip_blanks_from(start + name.len());
        if !self.src()[lparen..].starts_with('(') {
            return Ok(None);
        }
        let rparen = self.lexer.skip_blanks_from(lparen + 1);
        if !self.src()[rparen..].starts_with(')') {
            return Ok(None);
        }
        if self.lang().is_posix() && !is_valid_name(name) {
            return Err(self.lexer.error(start, "invalid func name"));
        }
        let lit = self.lit(start, start + name.len());
        self.lexer.set_pos(rparen + 1);
        self.next()?;
        let body = self.parse_func_body(name)?;
        Ok(Some(Command::FuncDecl(FuncDecl {
            position: self.pos(start),
            rsrv_word: false,
            name: lit,
            body: Box::new(body),
        })))
    }

    // ===========================================================================
    // ASSIGNMENTS
    // ===========================================================================

    /// Parse `name=value`, `name+=value`, `name[i]=value` or `name=(...)`
    /// at the current word, if it is one.
    fn try_parse_assign(&mut self) -> Result<Option<Assign>, SyntaxError> {
        let start = self.tok.start;
        let src = self.src();
        let end = self.lexer.end();
        let bytes = src.as_bytes();

        let mut i = start;
        if !src[i..end].starts_with(is_name_start) {
            return Ok(None);
        }
        while i < end && is_name_char(bytes[i] as char) {
            i += 1;
        }
        let name_end = i;

        let mut index_range = None;
        if i < end && bytes[i] == b'[' {
            self.lexer.set_pos(i + 1);
            let close = self.find_closing_bracket('[', ']');
            self.lexer.set_pos(start);
            match close {
                Some(close) => {
                    index_range = Some((i + 1, close));
                    i = close + 1;
                }
                None => return Ok(None),
            }
        }

        let append = src[i..end].starts_with("+=");
        if append {
            i += 2;
        } else if i < end && bytes[i] == b'=' {
            i += 1;
        } else {
            return Ok(None);
        }

        let name = self.lit(start, name_end);
        let index = match index_range {
            Some((index_start, close)) => {
                self.require_lang(name_end, "arrays", BASH_LIKE)?;
                self.lexer.set_pos(index_start);
                let old_end = self.lexer.set_end(close);
                let index = self.parse_arithm_expr();
                let at_close = self.lexer.at_end();
                self.lexer.set_end(old_end);
                let index = index?;
                if !at_close {
                    return Err(self.lexer.error(self.lexer.pos(), "not a valid array index"));
                }
                Some(index)
            }
            None => None,
        };

        self.lexer.set_pos(i);
        let mut assign = Assign {
            append,
            name,
            index,
            value: None,
            array: None,
        };
        match self.lexer.peek() {
            Some('(') => {
                self.require_lang(i, "arrays", BASH_LIKE)?;
                assign.array = Some(self.parse_array_expr()?);
            }
            Some(c) if !is_word_boundary(c) => {
                assign.value = Some(Word {
                    parts: self.parse_parts(WordMode::Unquoted)?,
                });
            }
            _ => {}
        }
        self.next()?;
        Ok(Some(assign))
    }

    /// Skip blanks, newlines and comments inside an array literal.
    fn skip_array_space(&mut self) -> Result<(), SyntaxError> {
        loop {
            self.lexer.skip_blanks()?;
            match self.lexer.peek() {
                Some('\n') => {
                    self.lexer.bump();
                }
                Some('#') => {
                    let len = self.lexer.rest().find('\n').unwrap_or(self.lexer.rest().len());
                    self.lexer.bump_n(len);
                }
                _ => return Ok(()),
            }
        }
    }

    fn parse_array_expr(&mut self) -> Result<ArrayExpr, SyntaxError> {
        let lparen = self.lexer.pos();
        self.lexer.bump();
        let mut elems = Vec::new();
        loop {
            self.skip_array_space()?;
            match self.lexer.peek() {
                None => {
                    return Err(self
                        .lexer
                        .eof_error(lparen, "reached EOF without matching `(` with `)`"))
                }
                Some(')') => break,
                _ => {}
            }
            elems.push(self.parse_array_elem()?);
        }
        let rparen = self.lexer.pos();
        self.lexer.bump();
        Ok(ArrayExpr {
            lparen: self.pos(lparen),
            rparen: self.pos(rparen),
            elems,
        })
    }

    fn parse_array_elem(&mut self) -> Result<ArrayElem, SyntaxError> {
        let start = self.lexer.pos();
        let mut index = None;
        if self.lexer.peek() == Some('[') {
            self.lexer.bump();
            let close = self.find_closing_bracket('[', ']');
            match close {
                Some(close) if self.src()[close + 1..].starts_with('=') => {
                    let old_end = self.lexer.set_end(close);
                    let x = self.parse_arithm_expr();
                    self.lexer.set_end(old_end);
                    index = Some(x?);
                    self.lexer.set_pos(close + 2);
                }
                _ => self.lexer.set_pos(start),
            }
        }
        let parts = self.parse_parts(WordMode::Unquoted)?;
        if parts.is_empty() && index.is_none() {
            let c = self.lexer.peek().unwrap_or(' ');
            return Err(self
                .lexer
                .error(start, format!("array element values must be words, found `{}`", c)));
        }
        Ok(ArrayElem {
            index,
            value: Word { parts },
        })
    }

    // ===========================================================================
    // REDIRECTIONS
    // ===========================================================================

    pub(super) fn parse_redirect(&mut self, stmt: &mut Stmt) -> Result<(), SyntaxError> {
        let n = if self.tok.is(TokenType::IoNumber) {
            let lit = self.lit(self.tok.start, self.tok.end);
            self.next()?;
            Some(lit)
        } else {
            None
        };

        let op_start = self.tok.start;
        let op = match self.tok.token_type {
            TokenType::Less => RedirOperator::RdrIn,
            TokenType::Great => RedirOperator::RdrOut,
            TokenType::DGreat => RedirOperator::AppOut,
            TokenType::LessAnd => RedirOperator::DplIn,
            TokenType::GreatAnd => RedirOperator::DplOut,
            TokenType::LessGreat => RedirOperator::RdrInOut,
            TokenType::Clobber => RedirOperator::ClbOut,
            TokenType::DLess => RedirOperator::Hdoc,
            TokenType::DLessDash => RedirOperator::DashHdoc,
            TokenType::TLess => {
                self.require_lang(op_start, "`<<<`", BASH_LIKE)?;
                RedirOperator::WordHdoc
            }
            TokenType::AndGreat => {
                self.require_lang(op_start, "`&>`", BASH_LIKE)?;
                RedirOperator::RdrAll
            }
            TokenType::AndDGreat => {
                self.require_lang(op_start, "`&>>`", BASH_LIKE)?;
                RedirOperator::AppAll
            }
            _ => return Err(self.tok_error("expected a redirection operator")),
        };
        self.next()?;

        if !self.tok.is(TokenType::Word) {
            return Err(self.tok_error(format!("{} must be followed by a word", op)));
        }
        let word = self.parse_word()?;
        if matches!(op, RedirOperator::Hdoc | RedirOperator::DashHdoc) {
            let (delimiter, quoted) = heredoc_delimiter(&word);
            self.lexer.add_pending_heredoc(PendingHeredoc {
                op_pos: op_start,
                delimiter,
                strip_tabs: op == RedirOperator::DashHdoc,
                quoted,
            });
        }
        self.next()?;

        stmt.redirs.push(Redirect {
            op_pos: self.pos(op_start),
            op,
            n,
            word,
            hdoc: None,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::types::ArithmExpr;
    use crate::parser::{LangVariant, Parser, ParserConfig};

    fn stmt(src: &str) -> Stmt {
        let file = Parser::default().parse(src, "").unwrap();
        file.stmts.stmts.into_iter().next().unwrap()
    }

    fn call(src: &str) -> CallExpr {
        match stmt(src).cmd {
            Some(Command::CallExpr(call)) => call,
            other => panic!("expected a call, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_assignments() {
        let c = call("a=1 b+=x c= cmd d=2");
        assert_eq!(c.assigns.len(), 3);
        assert_eq!(c.assigns[0].value.as_ref().unwrap().lit(), Some("1"));
        assert!(c.assigns[1].append);
        assert!(c.assigns[2].value.is_none());
        assert_eq!(c.args.len(), 2);
        assert_eq!(c.args[1].lit(), Some("d=2"));
    }

    #[test]
    fn test_parse_array_assign() {
        let c = call("arr=(a 'b c'\n  [5]=d # note\n)");
        let array = c.assigns[0].array.as_ref().unwrap();
        assert_eq!(array.elems.len(), 3);
        assert!(array.elems[2].index.is_some());
        assert_eq!(array.elems[2].value.lit(), Some("d"));
    }

    #[test]
    fn test_parse_index_assign() {
        let c = call("a[i+1]=x");
        assert!(matches!(c.assigns[0].index, Some(ArithmExpr::BinaryArithm(_))));
        let posix = Parser::new(ParserConfig::new().variant(LangVariant::Posix));
        let err = posix.parse("a[1]=x", "").unwrap_err();
        assert_eq!(err.message, "arrays are a bash/mksh feature");
    }

    #[test]
    fn test_parse_redirections() {
        let s = stmt("cmd 2>&1 >out <in >>log");
        assert_eq!(s.redirs.len(), 4);
        assert_eq!(s.redirs[0].n.as_ref().unwrap().value, "2");
        assert_eq!(s.redirs[0].op, RedirOperator::DplOut);
        assert_eq!(s.redirs[3].op, RedirOperator::AppOut);
    }

    #[test]
    fn test_redirect_only_statement() {
        let s = stmt(">file");
        assert!(s.cmd.is_none());
        assert_eq!(s.redirs.len(), 1);
    }

    #[test]
    fn test_missing_redirect_target() {
        let err = Parser::default().parse("echo >", "").unwrap_err();
        assert!(err.incomplete);
        let err = Parser::default().parse("echo > ;", "").unwrap_err();
        assert_eq!(err.message, "> must be followed by a word");
    }

    #[test]
    fn test_heredoc_delimiter_quoting() {
        let s = stmt("cat <<'E'OF\n$x\nEOF\n");
        assert_eq!(s.redirs[0].hdoc.as_ref().unwrap().lit(), Some("$x\n"));
        let s = stmt("cat <<-\\EOF\n\tbody\n\tEOF\n");
        assert_eq!(s.redirs[0].hdoc.as_ref().unwrap().lit(), Some("\tbody\n"));
    }

    #[test]
    fn test_unclosed_heredoc() {
        let err = Parser::default().parse("cat <<EOF\nbody\n", "").unwrap_err();
        assert_eq!(err.message, "unclosed here-document `EOF`");
        assert!(err.incomplete);
    }

    #[test]
    fn test_func_decl_lookahead() {
        let s = stmt("foo ( ) { bar; }");
        assert!(matches!(s.cmd, Some(Command::FuncDecl(ref f)) if f.name.value == "foo"));
        let err = Parser::default().parse("foo()", "").unwrap_err();
        assert!(err.incomplete);
    }

    #[test]
    fn test_statement_separator_required() {
        let err = Parser::default().parse("{ foo; } bar", "").unwrap_err();
        assert!(err.message.starts_with("statements must be separated by &, ; or a newline"));
    }

    #[test]
    fn test_heredoc_delimiter_helper() {
        let word = Word {
            parts: vec![WordPart::Lit(crate::ast::AST::lit("E\\OF"))],
        };
        assert_eq!(heredoc_delimiter(&word), ("EOF".to_string(), true));
    }
}
