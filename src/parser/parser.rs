//! Recursive Descent Parser for Shell Scripts
//!
//! The parser pulls tokens from the lexer on demand and produces a [`File`].
//! Words are parsed by the same cursor as they are reached, so nested
//! substitutions are handled by sub-parsers over the same source range.
//!
//! Grammar (simplified):
//!   stmt_list ::= { stmt terminator }
//!   stmt      ::= and_or [ '&' ]
//!   and_or    ::= pipeline { ('&&' | '||') newline* pipeline }
//!   pipeline  ::= ['time' ['-p']] ['!'] command { ('|' | '|&') newline* command }
//!   command   ::= compound redirect* | func_decl | simple_command
//!   compound  ::= if | while | until | for | select | case | '{' | '(' | '((' | '[['

use std::cell::Cell;
use std::collections::HashMap;
use std::io::Read;

use crate::ast::types::{
    BinCmdOperator, BinaryCmd, Command, Comment, File, Position, RedirOperator, Stmt, StmtList,
    TimeClause, Word,
};
use crate::parser::lexer::{Lexer, Token, TokenType, LIST_TERMINATORS};
use crate::parser::source::SourceMap;
use crate::parser::types::{
    Error, LangVariant, ParserConfig, SyntaxError, MAX_INPUT_SIZE, MAX_PARSER_DEPTH,
};

/// Dialects with the bash and mksh extensions
pub(super) const BASH_LIKE: &[LangVariant] = &[LangVariant::Bash, LangVariant::MirBSDKorn];

/// What closes a nested statement list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Closer {
    Paren,
    Brace,
}

impl Closer {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Paren => ")",
            Self::Brace => "}",
        }
    }
}

/// Shell parser. Holds the configuration and the incomplete flag of the
/// last parse, which can be read while an interactive session runs.
#[derive(Debug, Default)]
pub struct Parser {
    config: ParserConfig,
    incomplete: Cell<bool>,
}

impl Parser {
    pub fn new(config: ParserConfig) -> Self {
        Self {
            config,
            incomplete: Cell::new(false),
        }
    }

    /// Whether the last input seen ended in the middle of a statement.
    pub fn incomplete(&self) -> bool {
        self.incomplete.get()
    }

    pub(super) fn set_incomplete(&self, incomplete: bool) {
        self.incomplete.set(incomplete);
    }

    /// Parse a complete source text.
    pub fn parse(&self, src: &str, name: &str) -> Result<File, SyntaxError> {
        if src.len() > MAX_INPUT_SIZE {
            return Err(SyntaxError::new(
                Position::new(0, 1, 1),
                format!("input too large: {} bytes exceeds limit of {}", src.len(), MAX_INPUT_SIZE),
            )
            .with_filename(name));
        }
        let map = SourceMap::new(src);
        let result = self.parse_source(&map, name, false);
        self.incomplete
            .set(matches!(&result, Err(err) if err.incomplete));
        result
    }

    /// Read all of `reader` and parse it.
    pub fn parse_reader<R: Read>(&self, mut reader: R, name: &str) -> Result<File, Error> {
        let mut src = String::new();
        reader.read_to_string(&mut src)?;
        Ok(self.parse(&src, name)?)
    }

    pub(super) fn parse_source(
        &self,
        map: &SourceMap<'_>,
        name: &str,
        interactive: bool,
    ) -> Result<File, SyntaxError> {
        let mut state = ParserState::new(map, 0, map.src().len(), &self.config, interactive, 0);
        state.lexer = state.lexer.with_stop_at(self.config.stop_sequence());
        state.parse_file(name).map_err(|err| err.with_filename(name))
    }
}

/// Parse a bash script with the default configuration
pub fn parse(input: &str) -> Result<File, SyntaxError> {
    Parser::default().parse(input, "")
}

/// Parsing state over one range of the source
pub(super) struct ParserState<'a> {
    pub(super) lexer: Lexer<'a>,
    pub(super) config: &'a ParserConfig,
    /// Current token; word tokens are not yet consumed
    pub(super) tok: Token,
    /// End offset of the last consumed token
    prev_end: usize,
    pending_comments: Vec<Comment>,
    /// Here-document bodies keyed by the absolute offset of their operator
    heredocs: HashMap<usize, Word>,
    depth: usize,
    /// Inside mksh `${ ...;}`, where `}` closes the list even mid-word
    brace_closer: bool,
    /// Parsing the inside of a double-quoted string
    pub(super) in_dbl_quote: bool,
}

impl<'a> ParserState<'a> {
    pub(super) fn new(
        map: &'a SourceMap<'a>,
        start: usize,
        end: usize,
        config: &'a ParserConfig,
        interactive: bool,
        depth: usize,
    ) -> Self {
        Self {
            lexer: Lexer::new(map, start, end, config.lang()).with_interactive(interactive),
            config,
            tok: Token::new(TokenType::Eof, start, start),
            prev_end: start,
            pending_comments: Vec::new(),
            heredocs: HashMap::new(),
            depth,
            brace_closer: false,
            in_dbl_quote: false,
        }
    }

    pub(super) fn parse_file(&mut self, name: &str) -> Result<File, SyntaxError> {
        self.next()?;
        let mut stmts = self.parse_stmt_list()?;
        if !self.tok.is(TokenType::Eof) {
            return Err(self.unexpected_token());
        }
        self.finish_list(&mut stmts)?;
        Ok(File {
            name: name.to_string(),
            stmts,
            end: self.pos(self.lexer.end()),
        })
    }

    // ===========================================================================
    // HELPER METHODS
    // ===========================================================================

    pub(super) fn lang(&self) -> LangVariant {
        self.config.lang()
    }

    pub(super) fn pos(&self, offset: usize) -> Position {
        self.lexer.position(offset)
    }

    pub(super) fn src(&self) -> &'a str {
        self.lexer.src()
    }

    /// Advance to the next token, collecting comments and reading any
    /// here-document bodies that start after a newline.
    pub(super) fn next(&mut self) -> Result<(), SyntaxError> {
        self.prev_end = self.lexer.pos();
        loop {
            let tok = self.lexer.next_token()?;
            match tok.token_type {
                TokenType::Comment => {
                    if self.config.keeps_comments() {
                        self.pending_comments.push(Comment {
                            hash: self.pos(tok.start),
                            text: self.src()[tok.start + 1..tok.end].to_string(),
                        });
                    }
                }
                TokenType::Newline => {
                    self.tok = tok;
                    if self.lexer.has_pending_heredocs() {
                        self.read_heredocs()?;
                    }
                    return Ok(());
                }
                _ => {
                    self.tok = tok;
                    return Ok(());
                }
            }
        }
    }

    /// The current word if it is a plain literal, such as a reserved word.
    pub(super) fn tok_plain(&self) -> Option<&'a str> {
        if self.tok.is(TokenType::Word) {
            self.lexer.plain_word_at(self.tok.start)
        } else {
            None
        }
    }

    pub(super) fn is_plain(&self, word: &str) -> bool {
        self.tok_plain() == Some(word)
    }

    /// Consume the current plain word.
    pub(super) fn consume_plain(&mut self) -> Result<Position, SyntaxError> {
        let start = self.tok.start;
        let len = self.tok_plain().map_or(0, str::len);
        self.lexer.set_pos(start + len);
        self.next()?;
        Ok(self.pos(start))
    }

    /// Consume the reserved word `word`, or fail with `message`.
    pub(super) fn expect_plain(&mut self, word: &str, message: &str) -> Result<Position, SyntaxError> {
        if !self.is_plain(word) {
            return Err(self.tok_error(message));
        }
        self.consume_plain()
    }

    pub(super) fn skip_newlines(&mut self) -> Result<(), SyntaxError> {
        while self.tok.is(TokenType::Newline) {
            self.next()?;
        }
        Ok(())
    }

    /// An error at the current token; incomplete if the input ended.
    pub(super) fn tok_error(&self, message: impl Into<String>) -> SyntaxError {
        if self.tok.is(TokenType::Eof) {
            self.lexer.eof_error(self.tok.start, message)
        } else {
            self.lexer.error(self.tok.start, message)
        }
    }

    pub(super) fn tok_desc(&self) -> String {
        match self.tok.token_type {
            TokenType::Word => match self.tok_plain() {
                Some(word) => format!("`{}`", word),
                None => "a word".to_string(),
            },
            TokenType::Eof => "EOF".to_string(),
            TokenType::Newline => "newline".to_string(),
            other => format!("`{}`", other.as_str()),
        }
    }

    /// Error for a token that cannot appear where a statement was expected.
    pub(super) fn unexpected_token(&self) -> SyntaxError {
        let message = match self.tok.token_type {
            TokenType::Eof => "unexpected EOF".to_string(),
            TokenType::RParen => "`)` can only be used to close a subshell".to_string(),
            t if t.is_case_terminator() => {
                format!("`{}` can only be used in a case clause", t.as_str())
            }
            t @ (TokenType::Semicolon
            | TokenType::Amp
            | TokenType::AndAnd
            | TokenType::OrOr
            | TokenType::Pipe
            | TokenType::PipeAmp) => {
                format!("`{}` can only immediately follow a statement", t.as_str())
            }
            TokenType::Word => match self.tok_plain() {
                Some(word) => match LIST_TERMINATORS.get(word) {
                    Some(usage) => format!("`{}` {}", word, usage),
                    None => format!("`{}` is not a valid start for a statement", word),
                },
                None => "unexpected word".to_string(),
            },
            other => format!("`{}` is not a valid start for a statement", other.as_str()),
        };
        self.tok_error(message)
    }

    /// Fail unless the configured dialect is one of `langs`.
    pub(super) fn require_lang(
        &self,
        offset: usize,
        feature: &str,
        langs: &[LangVariant],
    ) -> Result<(), SyntaxError> {
        if langs.contains(&self.lang()) {
            return Ok(());
        }
        let names: Vec<&str> = langs.iter().map(LangVariant::as_str).collect();
        let verb = if feature.ends_with('s') && !feature.starts_with('`') {
            "are"
        } else {
            "is"
        };
        Err(self.lexer.error(
            offset,
            format!("{} {} a {} feature", feature, verb, names.join("/")),
        ))
    }

    pub(super) fn take_comments(&mut self) -> Vec<Comment> {
        std::mem::take(&mut self.pending_comments)
    }

    /// Attach a comment on the line where `stmt` ended.
    fn attach_trailing(&mut self, stmt: &mut Stmt) {
        let line = self.pos(self.prev_end).line();
        if self
            .pending_comments
            .first()
            .is_some_and(|comment| comment.hash.line() == line)
        {
            stmt.trailing = Some(self.pending_comments.remove(0));
        }
    }

    pub(super) fn stmt_at(&self, offset: usize) -> Stmt {
        Stmt {
            comments: Vec::new(),
            position: self.pos(offset),
            semicolon: Position::default(),
            negated: false,
            background: false,
            cmd: None,
            redirs: Vec::new(),
            trailing: None,
        }
    }

    fn binary_stmt(&self, op: BinCmdOperator, op_pos: Position, x: Stmt, y: Stmt) -> Stmt {
        Stmt {
            comments: Vec::new(),
            position: x.position,
            semicolon: Position::default(),
            negated: false,
            background: false,
            cmd: Some(Command::BinaryCmd(BinaryCmd {
                op_pos,
                op,
                x: Box::new(x),
                y: Box::new(y),
            })),
            redirs: Vec::new(),
            trailing: None,
        }
    }

    // ===========================================================================
    // HERE-DOCUMENTS
    // ===========================================================================

    fn read_heredocs(&mut self) -> Result<(), SyntaxError> {
        let bodies = self.lexer.read_heredoc_bodies()?;
        for body in bodies {
            let word = self.parse_heredoc_body(body)?;
            let key = self.pos(body.op_pos).offset();
            self.heredocs.insert(key, word);
        }
        Ok(())
    }

    /// Check for unread here-documents and attach the bodies read so far.
    pub(super) fn finish_list(&mut self, list: &mut StmtList) -> Result<(), SyntaxError> {
        if let Some(heredoc) = self.lexer.pending_heredocs().first() {
            return Err(self.lexer.eof_error(
                heredoc.op_pos,
                format!("unclosed here-document `{}`", heredoc.delimiter),
            ));
        }
        if !self.heredocs.is_empty() {
            self.fill_heredocs(list);
        }
        Ok(())
    }

    fn fill_heredocs(&mut self, list: &mut StmtList) {
        for stmt in &mut list.stmts {
            self.fill_stmt_heredocs(stmt);
        }
    }

    fn fill_stmt_heredocs(&mut self, stmt: &mut Stmt) {
        for redir in &mut stmt.redirs {
            if matches!(redir.op, RedirOperator::Hdoc | RedirOperator::DashHdoc) && redir.hdoc.is_none() {
                redir.hdoc = self.heredocs.remove(&redir.op_pos.offset());
            }
        }
        let Some(cmd) = &mut stmt.cmd else {
            return;
        };
        match cmd {
            Command::IfClause(c) => {
                self.fill_heredocs(&mut c.cond);
                self.fill_heredocs(&mut c.then);
                for elif in &mut c.elifs {
                    self.fill_heredocs(&mut elif.cond);
                    self.fill_heredocs(&mut elif.then);
                }
                if let Some(stmts) = &mut c.else_stmts {
                    self.fill_heredocs(stmts);
                }
            }
            Command::WhileClause(c) => {
                self.fill_heredocs(&mut c.cond);
                self.fill_heredocs(&mut c.body);
            }
            Command::ForClause(c) => self.fill_heredocs(&mut c.body),
            Command::CaseClause(c) => {
                for item in &mut c.items {
                    self.fill_heredocs(&mut item.stmts);
                }
            }
            Command::Block(c) => self.fill_heredocs(&mut c.stmts),
            Command::Subshell(c) => self.fill_heredocs(&mut c.stmts),
            Command::BinaryCmd(c) => {
                self.fill_stmt_heredocs(&mut c.x);
                self.fill_stmt_heredocs(&mut c.y);
            }
            Command::FuncDecl(c) => self.fill_stmt_heredocs(&mut c.body),
            Command::TimeClause(c) => {
                if let Some(stmt) = &mut c.stmt {
                    self.fill_stmt_heredocs(stmt);
                }
            }
            Command::CallExpr(_) | Command::ArithmCmd(_) | Command::TestClause(_) => {}
        }
    }

    // ===========================================================================
    // NESTED LISTS
    // ===========================================================================

    /// Parse a statement list that starts at `start` in the same source and
    /// ends at `closer`. `left` is the offset of the opening construct and
    /// `open` its spelling, both used for errors. Returns the list and the
    /// offset of the closer; the cursor is left after the closer.
    pub(super) fn parse_nested(
        &mut self,
        left: usize,
        open: &str,
        start: usize,
        closer: Closer,
    ) -> Result<(StmtList, usize), SyntaxError> {
        let mut sub = ParserState::new(
            self.lexer.map(),
            start,
            self.lexer.end(),
            self.config,
            self.lexer.is_interactive(),
            self.depth,
        );
        sub.brace_closer = closer == Closer::Brace;
        sub.next()?;
        let mut stmts = sub.parse_stmt_list()?;
        let closed = match closer {
            Closer::Paren => sub.tok.is(TokenType::RParen),
            Closer::Brace => sub.at_brace_closer(),
        };
        if !closed {
            if sub.tok.is(TokenType::Eof) {
                return Err(self.lexer.eof_error(
                    left,
                    format!("reached EOF without matching `{}` with `{}`", open, closer.as_str()),
                ));
            }
            return Err(sub.unexpected_token());
        }
        sub.finish_list(&mut stmts)?;
        let close = sub.tok.start;
        self.lexer.set_pos(close + 1);
        Ok((stmts, close))
    }

    /// Parse `text`, which is not part of the source, as a complete list.
    /// Positions are reported relative to `base`.
    pub(super) fn parse_detached(&self, text: &str, base: Position) -> Result<StmtList, SyntaxError> {
        let map = SourceMap::with_base(text, base);
        let mut sub = ParserState::new(
            &map,
            0,
            text.len(),
            self.config,
            self.lexer.is_interactive(),
            self.depth,
        );
        sub.next()?;
        let mut stmts = sub.parse_stmt_list()?;
        if !sub.tok.is(TokenType::Eof) {
            return Err(sub.unexpected_token());
        }
        sub.finish_list(&mut stmts)?;
        Ok(stmts)
    }

    // ===========================================================================
    // STATEMENT PARSING
    // ===========================================================================

    /// Whether the current token ends a statement list.
    pub(super) fn at_list_end(&self) -> bool {
        match self.tok.token_type {
            TokenType::Eof | TokenType::RParen => true,
            t if t.is_case_terminator() => true,
            TokenType::Word => {
                self.at_brace_closer()
                    || self
                        .tok_plain()
                        .is_some_and(|word| LIST_TERMINATORS.contains_key(word))
            }
            _ => false,
        }
    }

    fn at_brace_closer(&self) -> bool {
        self.brace_closer && self.tok.is(TokenType::Word) && self.src()[self.tok.start..].starts_with('}')
    }

    /// Whether the current token can begin a statement.
    pub(super) fn can_start_stmt(&self) -> bool {
        match self.tok.token_type {
            TokenType::Word => !self.at_list_end(),
            TokenType::IoNumber | TokenType::LParen => true,
            t => t.is_redirect(),
        }
    }

    pub(super) fn parse_stmt_list(&mut self) -> Result<StmtList, SyntaxError> {
        self.depth += 1;
        if self.depth > MAX_PARSER_DEPTH {
            return Err(self.tok_error("statements are nested too deeply"));
        }
        let mut list = StmtList::default();
        loop {
            self.skip_newlines()?;
            if self.at_list_end() {
                break;
            }
            let stmt = self.parse_stmt()?;
            let terminated = stmt.semicolon.is_valid();
            list.stmts.push(stmt);
            if !terminated && !self.tok.is(TokenType::Newline) && !self.at_list_end() {
                return Err(self.tok_error(format!(
                    "statements must be separated by &, ; or a newline, found {}",
                    self.tok_desc()
                )));
            }
        }
        list.last = self.take_comments();
        self.depth -= 1;
        Ok(list)
    }

    pub(super) fn parse_stmt(&mut self) -> Result<Stmt, SyntaxError> {
        let mut comments = self.take_comments();
        let mut stmt = self.parse_and_or()?;
        comments.append(&mut stmt.comments);
        stmt.comments = comments;
        match self.tok.token_type {
            TokenType::Semicolon => {
                stmt.semicolon = self.pos(self.tok.start);
                self.next()?;
            }
            TokenType::Amp => {
                stmt.semicolon = self.pos(self.tok.start);
                stmt.background = true;
                self.next()?;
            }
            _ => {}
        }
        self.attach_trailing(&mut stmt);
        Ok(stmt)
    }

    fn parse_and_or(&mut self) -> Result<Stmt, SyntaxError> {
        let mut left = self.parse_pipeline()?;
        loop {
            let op = match self.tok.token_type {
                TokenType::AndAnd => BinCmdOperator::AndStmt,
                TokenType::OrOr => BinCmdOperator::OrStmt,
                _ => break,
            };
            let op_pos = self.pos(self.tok.start);
            self.next()?;
            self.skip_newlines()?;
            if !self.can_start_stmt() {
                return Err(self.tok_error(format!("`{}` must be followed by a statement", op)));
            }
            let right = self.parse_pipeline()?;
            left = self.binary_stmt(op, op_pos, left, right);
        }
        Ok(left)
    }

    fn parse_pipeline(&mut self) -> Result<Stmt, SyntaxError> {
        let start = self.tok.start;
        if !self.lang().is_posix() && self.is_plain("time") {
            return self.parse_time_clause();
        }
        let mut negated = false;
        if self.is_plain("!") {
            negated = true;
            self.consume_plain()?;
            if !self.can_start_stmt() {
                return Err(self.tok_error("`!` must be followed by a statement"));
            }
        }
        let mut left = self.parse_command_stmt()?;
        loop {
            let op = match self.tok.token_type {
                TokenType::Pipe => BinCmdOperator::Pipe,
                TokenType::PipeAmp => {
                    self.require_lang(self.tok.start, "`|&`", BASH_LIKE)?;
                    BinCmdOperator::PipeAll
                }
                _ => break,
            };
            let op_pos = self.pos(self.tok.start);
            self.next()?;
            self.skip_newlines()?;
            if !self.can_start_stmt() {
                return Err(self.tok_error(format!("`{}` must be followed by a statement", op)));
            }
            let right = self.parse_command_stmt()?;
            left = self.binary_stmt(op, op_pos, left, right);
        }
        if negated {
            left.negated = true;
            left.position = self.pos(start);
        }
        Ok(left)
    }

    fn parse_time_clause(&mut self) -> Result<Stmt, SyntaxError> {
        let start = self.tok.start;
        let time_pos = self.consume_plain()?;
        let mut posix_format = false;
        if self.is_plain("-p") {
            posix_format = true;
            self.consume_plain()?;
        }
        let stmt = if self.can_start_stmt() {
            Some(Box::new(self.parse_pipeline()?))
        } else {
            None
        };
        let mut clause = self.stmt_at(start);
        clause.cmd = Some(Command::TimeClause(TimeClause {
            time_pos,
            posix_format,
            stmt,
        }));
        Ok(clause)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::types::{Command, WordPart};

    fn parse_ok(src: &str) -> File {
        Parser::default().parse(src, "").unwrap()
    }

    #[test]
    fn test_parse_empty() {
        let file = parse_ok("");
        assert!(file.stmts.stmts.is_empty());
        let file = parse_ok("\n\n  \n");
        assert!(file.stmts.stmts.is_empty());
    }

    #[test]
    fn test_parse_simple_command() {
        let file = parse_ok("echo 'foo'");
        assert_eq!(file.stmts.len(), 1);
        let Some(Command::CallExpr(call)) = &file.stmts.stmts[0].cmd else {
            panic!("expected a call");
        };
        assert_eq!(call.args.len(), 2);
        assert_eq!(call.args[0].lit(), Some("echo"));
        assert!(matches!(&call.args[1].parts[0], WordPart::SglQuoted(q) if q.value == "foo"));
    }

    #[test]
    fn test_parse_and_or_positions() {
        let file = parse_ok("foo || bar");
        let stmt = &file.stmts.stmts[0];
        let Some(Command::BinaryCmd(bin)) = &stmt.cmd else {
            panic!("expected a binary command");
        };
        assert_eq!(stmt.pos().offset(), 0);
        assert_eq!(stmt.pos().to_string(), "1:1");
        assert_eq!(bin.op_pos.offset(), 4);
        assert_eq!(bin.op_pos.to_string(), "1:5");
        assert_eq!(bin.op, BinCmdOperator::OrStmt);
    }

    #[test]
    fn test_pipe_binds_tighter_than_and() {
        let file = parse_ok("a | b && c");
        let Some(Command::BinaryCmd(bin)) = &file.stmts.stmts[0].cmd else {
            panic!("expected a binary command");
        };
        assert_eq!(bin.op, BinCmdOperator::AndStmt);
        assert!(matches!(&bin.x.cmd, Some(Command::BinaryCmd(inner)) if inner.op == BinCmdOperator::Pipe));
    }

    #[test]
    fn test_and_or_is_left_associative() {
        let file = parse_ok("a && b || c");
        let Some(Command::BinaryCmd(bin)) = &file.stmts.stmts[0].cmd else {
            panic!("expected a binary command");
        };
        assert_eq!(bin.op, BinCmdOperator::OrStmt);
        assert!(matches!(&bin.x.cmd, Some(Command::BinaryCmd(inner)) if inner.op == BinCmdOperator::AndStmt));
    }

    #[test]
    fn test_separators() {
        let file = parse_ok("a; b & c\nd");
        assert_eq!(file.stmts.len(), 4);
        assert!(file.stmts.stmts[1].background);
        assert!(file.stmts.stmts[0].semicolon.is_valid());
        assert!(!file.stmts.stmts[3].semicolon.is_valid());
    }

    #[test]
    fn test_negation_and_time() {
        let file = parse_ok("! a | b\ntime -p c");
        assert!(file.stmts.stmts[0].negated);
        let Some(Command::TimeClause(time)) = &file.stmts.stmts[1].cmd else {
            panic!("expected time");
        };
        assert!(time.posix_format);
        assert!(time.stmt.is_some());
    }

    #[test]
    fn test_unexpected_reserved_word() {
        let err = Parser::default().parse("fi", "").unwrap_err();
        assert_eq!(err.message, "`fi` can only be used to end an if");
        assert!(!err.incomplete);
    }

    #[test]
    fn test_dangling_operator_is_incomplete() {
        let parser = Parser::default();
        let err = parser.parse("foo &&", "").unwrap_err();
        assert!(err.incomplete);
        assert!(parser.incomplete());
        parser.parse("foo", "").unwrap();
        assert!(!parser.incomplete());
    }

    #[test]
    fn test_pipe_all_is_not_posix() {
        let parser = Parser::new(ParserConfig::new().variant(LangVariant::Posix));
        let err = parser.parse("a |& b", "").unwrap_err();
        assert_eq!(err.message, "`|&` is a bash/mksh feature");
    }

    #[test]
    fn test_filename_in_error() {
        let err = Parser::default().parse("echo ${", "foo.sh").unwrap_err();
        assert_eq!(err.pos.to_string(), "1:6");
        assert!(err.to_string().starts_with("foo.sh:1:6: "));
    }

    #[test]
    fn test_parse_reader() {
        let file = Parser::default()
            .parse_reader("foo bar\n".as_bytes(), "")
            .unwrap();
        assert_eq!(file.stmts.len(), 1);
    }
}
