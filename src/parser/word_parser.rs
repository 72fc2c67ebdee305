//! Word Parsing
//!
//! Words are scanned straight from the source with the lexer's cursor.
//! Literal runs are kept exactly as written, escapes included, so that
//! printing a word gives back its source text.

use crate::ast::types::{
    CmdSubst, DblQuoted, ExtGlob, GlobOperator, Lit, ProcOperator, ProcSubst, SglQuoted, Word,
    WordPart,
};
use crate::parser::lexer::{is_blank, is_extglob_char, is_name_char, is_word_boundary, HeredocBody};
use crate::parser::parser::{Closer, ParserState};
use crate::parser::types::SyntaxError;

/// Where a word is being read, which decides what ends it and which
/// characters are special.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum WordMode {
    /// A plain shell word
    Unquoted,
    /// Inside `"..."`
    DblQuoted,
    /// An unquoted here-document body
    Heredoc,
    /// The word after a `${name` operator, up to `}`
    ParamWord,
    /// The pattern of `${name/pattern/with}`
    ReplOrig,
    /// The right side of `=~`
    Regex,
    /// An operand inside an arithmetic expression
    Arithm,
}

impl WordMode {
    fn quotes_apply(&self, in_dbl_quote: bool) -> bool {
        match self {
            Self::Unquoted | Self::Regex | Self::Arithm => true,
            Self::ParamWord | Self::ReplOrig => !in_dbl_quote,
            Self::DblQuoted | Self::Heredoc => false,
        }
    }

    fn allows_extglob(&self) -> bool {
        matches!(self, Self::Unquoted | Self::ParamWord | Self::ReplOrig)
    }
}

impl<'a> ParserState<'a> {
    /// Build a literal from a range of the source.
    pub(super) fn lit(&self, start: usize, end: usize) -> Lit {
        Lit {
            value_pos: self.pos(start),
            value_end: self.pos(end),
            value: self.src()[start..end].to_string(),
        }
    }

    /// Parse the word at the cursor without advancing to the next token.
    pub(super) fn parse_word(&mut self) -> Result<Word, SyntaxError> {
        let start = self.lexer.pos();
        let parts = self.parse_parts(WordMode::Unquoted)?;
        if parts.is_empty() {
            return Err(self.lexer.error(start, "expected a word"));
        }
        Ok(Word { parts })
    }

    /// Parse the current word token and advance past it.
    pub(super) fn take_word(&mut self) -> Result<Word, SyntaxError> {
        let word = self.parse_word()?;
        self.next()?;
        Ok(word)
    }

    /// Read word parts until the end of the word for `mode`.
    pub(super) fn parse_parts(&mut self, mode: WordMode) -> Result<Vec<WordPart>, SyntaxError> {
        let mut parts = Vec::new();
        let mut lit_start: Option<usize> = None;
        let mut paren_depth = 0usize;
        let quotes = mode.quotes_apply(self.in_dbl_quote);

        while let Some(c) = self.lexer.peek() {
            let at = self.lexer.pos();
            let next = self.lexer.peek_nth(1);

            if mode == WordMode::Unquoted
                && parts.is_empty()
                && lit_start.is_none()
                && matches!(c, '<' | '>')
                && next == Some('(')
                && !self.lang().is_posix()
            {
                parts.push(self.parse_proc_subst()?);
                continue;
            }

            if mode.allows_extglob()
                && is_extglob_char(c)
                && next == Some('(')
                && !self.lang().is_posix()
            {
                self.flush_lit(&mut parts, &mut lit_start, at);
                parts.push(self.parse_extglob()?);
                continue;
            }

            let stop = match mode {
                WordMode::Unquoted => is_word_boundary(c),
                WordMode::DblQuoted => c == '"',
                WordMode::Heredoc => false,
                WordMode::ParamWord => c == '}',
                WordMode::ReplOrig => c == '}' || c == '/',
                WordMode::Regex => {
                    paren_depth == 0 && (is_blank(c) || c == '\n' || c == ')')
                }
                WordMode::Arithm => !(is_name_char(c)
                    || matches!(c, '#' | '.' | '$' | '[' | '\\' | '\'' | '"' | '`')),
            };
            if stop {
                break;
            }

            match c {
                '\\' if self.lexer.at_trailing_backslash() => {
                    self.flush_lit(&mut parts, &mut lit_start, at);
                    self.lexer.bump();
                }
                '\\' => {
                    lit_start.get_or_insert(at);
                    self.parse_escape(at)?;
                }
                '\'' if quotes => {
                    self.flush_lit(&mut parts, &mut lit_start, at);
                    parts.push(self.parse_sgl_quoted(false)?);
                }
                '"' if quotes => {
                    self.flush_lit(&mut parts, &mut lit_start, at);
                    parts.push(self.parse_dbl_quoted(false)?);
                }
                '`' => {
                    self.flush_lit(&mut parts, &mut lit_start, at);
                    parts.push(self.parse_backquote()?);
                }
                '$' => {
                    let saved = lit_start.take();
                    match self.parse_dollar(mode)? {
                        Some(part) => {
                            if let Some(start) = saved {
                                parts.push(WordPart::Lit(self.lit(start, at)));
                            }
                            parts.push(part);
                        }
                        None => {
                            lit_start = Some(saved.unwrap_or(at));
                            self.lexer.bump();
                        }
                    }
                }
                '[' if mode == WordMode::Arithm => {
                    lit_start.get_or_insert(at);
                    self.lexer.bump();
                    match self.find_closing_bracket('[', ']') {
                        Some(close) => self.lexer.set_pos(close + 1),
                        None => {
                            return Err(self
                                .lexer
                                .eof_error(at, "reached EOF without matching `[` with `]`"))
                        }
                    }
                }
                _ => {
                    if mode == WordMode::Regex {
                        match c {
                            '(' => paren_depth += 1,
                            ')' => paren_depth -= 1,
                            _ => {}
                        }
                    }
                    lit_start.get_or_insert(at);
                    self.lexer.bump();
                }
            }
        }

        let end = self.lexer.pos();
        self.flush_lit(&mut parts, &mut lit_start, end);
        Ok(parts)
    }

    fn flush_lit(&self, parts: &mut Vec<WordPart>, lit_start: &mut Option<usize>, end: usize) {
        if let Some(start) = lit_start.take() {
            if start < end {
                parts.push(WordPart::Lit(self.lit(start, end)));
            }
        }
    }

    /// Skip a backslash and the character it escapes.
    fn parse_escape(&mut self, at: usize) -> Result<(), SyntaxError> {
        self.lexer.bump();
        match self.lexer.bump() {
            None if self.lexer.is_interactive() => {
                Err(self.lexer.eof_error(at, "reached EOF after a backslash"))
            }
            Some('\n') if self.lexer.at_end() && self.lexer.is_interactive() => Err(self
                .lexer
                .eof_error(at, "reached EOF after a line continuation")),
            _ => Ok(()),
        }
    }

    /// `'...'`, or `$'...'` when `dollar` is set and the cursor is at `$`.
    pub(super) fn parse_sgl_quoted(&mut self, dollar: bool) -> Result<WordPart, SyntaxError> {
        let left = self.lexer.pos();
        if dollar {
            self.lexer.bump();
        }
        self.lexer.bump();
        let start = self.lexer.pos();
        loop {
            match self.lexer.bump() {
                None => {
                    return Err(self
                        .lexer
                        .eof_error(left, "reached EOF without closing quote `'`"))
                }
                Some('\\') if dollar => {
                    self.lexer.bump();
                }
                Some('\'') => break,
                Some(_) => {}
            }
        }
        let end = self.lexer.pos() - 1;
        Ok(WordPart::SglQuoted(SglQuoted {
            left: self.pos(left),
            right: self.pos(end),
            dollar,
            value: self.src()[start..end].to_string(),
        }))
    }

    /// `"..."`, or `$"..."` when `dollar` is set and the cursor is at `$`.
    pub(super) fn parse_dbl_quoted(&mut self, dollar: bool) -> Result<WordPart, SyntaxError> {
        let left = self.lexer.pos();
        if dollar {
            self.lexer.bump();
        }
        self.lexer.bump();
        let saved = std::mem::replace(&mut self.in_dbl_quote, true);
        let parts = self.parse_parts(WordMode::DblQuoted);
        self.in_dbl_quote = saved;
        let parts = parts?;
        if self.lexer.peek() != Some('"') {
            return Err(self
                .lexer
                .eof_error(left, "reached EOF without closing quote `\"`"));
        }
        let right = self.lexer.pos();
        self.lexer.bump();
        Ok(WordPart::DblQuoted(DblQuoted {
            left: self.pos(left),
            right: self.pos(right),
            dollar,
            parts,
        }))
    }

    /// `` `stmts` ``. The body is unescaped and parsed on its own.
    fn parse_backquote(&mut self) -> Result<WordPart, SyntaxError> {
        let left = self.lexer.pos();
        self.lexer.bump();
        let body_start = self.lexer.pos();
        let mut text = String::new();
        loop {
            match self.lexer.bump() {
                None => {
                    return Err(self
                        .lexer
                        .eof_error(left, "reached EOF without closing quote `` ` ``"))
                }
                Some('\\') => match self.lexer.peek() {
                    Some(c @ ('\\' | '`' | '$')) => {
                        self.lexer.bump();
                        text.push(c);
                    }
                    Some('"') if self.in_dbl_quote => {
                        self.lexer.bump();
                        text.push('"');
                    }
                    _ => text.push('\\'),
                },
                Some('`') => break,
                Some(c) => text.push(c),
            }
        }
        let right = self.lexer.pos() - 1;
        let stmts = self.parse_detached(&text, self.pos(body_start))?;
        Ok(WordPart::CmdSubst(CmdSubst {
            left: self.pos(left),
            right: self.pos(right),
            stmts,
            backquotes: true,
            temp_file: false,
            reply_var: false,
        }))
    }

    /// `<(stmts)` or `>(stmts)`
    fn parse_proc_subst(&mut self) -> Result<WordPart, SyntaxError> {
        let start = self.lexer.pos();
        let open = &self.src()[start..start + 2];
        let op = ProcOperator::from_str(open).unwrap_or(ProcOperator::CmdIn);
        self.lexer.bump_n(2);
        let (stmts, close) = self.parse_nested(start, open, start + 2, Closer::Paren)?;
        Ok(WordPart::ProcSubst(ProcSubst {
            op_pos: self.pos(start),
            rparen: self.pos(close),
            op,
            stmts,
        }))
    }

    /// `@(pattern)` and friends; the pattern is kept as a literal.
    fn parse_extglob(&mut self) -> Result<WordPart, SyntaxError> {
        let start = self.lexer.pos();
        let open = &self.src()[start..start + 2];
        let op = GlobOperator::from_str(open).unwrap_or(GlobOperator::One);
        self.lexer.bump_n(2);
        let Some(close) = self.find_closing_bracket('(', ')') else {
            return Err(self.lexer.eof_error(
                start,
                format!("reached EOF without matching `{}` with `)`", open),
            ));
        };
        let pattern = self.lit(start + 2, close);
        self.lexer.set_pos(close + 1);
        Ok(WordPart::ExtGlob(ExtGlob {
            op_pos: self.pos(start),
            op,
            pattern,
        }))
    }

    /// Offset of the `close` matching an `open` just before the cursor,
    /// skipping escaped characters and quoted text. Does not move the cursor.
    pub(super) fn find_closing_bracket(&self, open: char, close: char) -> Option<usize> {
        let rest = self.lexer.rest();
        let base = self.lexer.pos();
        let mut depth = 1usize;
        let mut quote: Option<char> = None;
        let mut chars = rest.char_indices();
        while let Some((i, c)) = chars.next() {
            match quote {
                Some(q) => {
                    if c == '\\' && q == '"' {
                        chars.next();
                    } else if c == q {
                        quote = None;
                    }
                }
                None => match c {
                    '\\' => {
                        chars.next();
                    }
                    '\'' | '"' => quote = Some(c),
                    _ if c == open => depth += 1,
                    _ if c == close => {
                        depth -= 1;
                        if depth == 0 {
                            return Some(base + i);
                        }
                    }
                    _ => {}
                },
            }
        }
        None
    }

    /// Parse the body of a here-document that was read after a newline.
    pub(super) fn parse_heredoc_body(&mut self, body: HeredocBody) -> Result<Word, SyntaxError> {
        if body.start == body.end {
            return Ok(Word::default());
        }
        if body.quoted {
            return Ok(Word {
                parts: vec![WordPart::Lit(self.lit(body.start, body.end))],
            });
        }
        let saved = self.lexer.pos();
        let old_end = self.lexer.set_end(body.end);
        self.lexer.set_pos(body.start);
        let parts = self.parse_parts(WordMode::Heredoc);
        self.lexer.set_end(old_end);
        self.lexer.set_pos(saved);
        Ok(Word { parts: parts? })
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::types::{Command, Word, WordPart};
    use crate::parser::{LangVariant, Parser, ParserConfig};

    fn first_arg(src: &str, n: usize) -> Word {
        let file = Parser::default().parse(src, "").unwrap();
        match &file.stmts.stmts[0].cmd {
            Some(Command::CallExpr(call)) => call.args[n].clone(),
            other => panic!("expected a call, got {:?}", other),
        }
    }

    #[test]
    fn test_lit_keeps_escapes() {
        let word = first_arg("echo foo\\ bar", 1);
        assert_eq!(word.lit(), Some("foo\\ bar"));
    }

    #[test]
    fn test_trailing_backslash_at_eof() {
        let word = first_arg("echo a\\", 1);
        assert_eq!(word.lit(), Some("a"));
        let file = Parser::default().parse("\\", "").unwrap();
        assert!(file.stmts.stmts.is_empty());
        let file = Parser::default().parse("echo a \\", "").unwrap();
        assert!(matches!(&file.stmts.stmts[0].cmd, Some(Command::CallExpr(c)) if c.args.len() == 2));
    }

    #[test]
    fn test_mixed_parts() {
        let word = first_arg("echo a'b'\"c$d\"e", 1);
        assert_eq!(word.parts.len(), 4);
        assert!(matches!(&word.parts[0], WordPart::Lit(l) if l.value == "a"));
        assert!(matches!(&word.parts[1], WordPart::SglQuoted(q) if q.value == "b"));
        let WordPart::DblQuoted(dq) = &word.parts[2] else {
            panic!("expected double quotes");
        };
        assert_eq!(dq.parts.len(), 2);
        assert!(matches!(&dq.parts[1], WordPart::ParamExp(p) if p.short && p.param.value == "d"));
        assert!(matches!(&word.parts[3], WordPart::Lit(l) if l.value == "e"));
    }

    #[test]
    fn test_dollar_single_quotes() {
        let word = first_arg("echo $'a\\'b'", 1);
        assert!(matches!(&word.parts[0], WordPart::SglQuoted(q) if q.dollar && q.value == "a\\'b"));
    }

    #[test]
    fn test_lone_dollar_is_literal() {
        let word = first_arg("echo a$ $", 1);
        assert_eq!(word.lit(), Some("a$"));
    }

    #[test]
    fn test_backquotes() {
        let word = first_arg("echo `foo \\`bar\\``", 1);
        let WordPart::CmdSubst(cs) = &word.parts[0] else {
            panic!("expected a command substitution");
        };
        assert!(cs.backquotes);
        assert_eq!(cs.stmts.len(), 1);
    }

    #[test]
    fn test_unclosed_quote_is_incomplete() {
        let err = Parser::default().parse("echo 'foo", "").unwrap_err();
        assert_eq!(err.message, "reached EOF without closing quote `'`");
        assert_eq!(err.pos.to_string(), "1:6");
        assert!(err.incomplete);
    }

    #[test]
    fn test_extglob_and_proc_subst() {
        let word = first_arg("ls @(a|b).txt", 1);
        assert!(matches!(&word.parts[0], WordPart::ExtGlob(g) if g.pattern.value == "a|b"));
        let word = first_arg("diff <(ls) >(cat)", 1);
        assert!(matches!(&word.parts[0], WordPart::ProcSubst(_)));
    }

    #[test]
    fn test_proc_subst_not_posix() {
        let parser = Parser::new(ParserConfig::new().variant(LangVariant::Posix));
        assert!(parser.parse("diff <(ls)", "").is_err());
    }

    #[test]
    fn test_heredoc_body() {
        let file = Parser::default()
            .parse("cat <<EOF\nhello $name\nEOF\ncat <<'X'\n$raw\nX\n", "")
            .unwrap();
        let hdoc = file.stmts.stmts[0].redirs[0].hdoc.as_ref().unwrap();
        assert_eq!(hdoc.parts.len(), 3);
        let raw = file.stmts.stmts[1].redirs[0].hdoc.as_ref().unwrap();
        assert_eq!(raw.lit(), Some("$raw\n"));
    }
}
