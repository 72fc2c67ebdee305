//! Interactive Parsing
//!
//! Input arrives in chunks, usually lines. Each time the buffered input ends
//! in a newline it is parsed: complete statements are handed to a callback
//! and dropped from the buffer, while an incomplete statement is kept until
//! more input completes it. The parser's `incomplete()` flag tells the
//! callback, or a prompt, which of the two happened.

use std::io::{self, BufRead};

use crate::ast::types::{Position, Stmt};
use crate::parser::parser::Parser;
use crate::parser::source::SourceMap;
use crate::parser::types::{Error, SyntaxError};

/// A source of input chunks. `Ok(None)` means the input has ended.
pub trait ChunkSource {
    fn next_chunk(&mut self) -> io::Result<Option<String>>;
}

impl<F> ChunkSource for F
where
    F: FnMut() -> io::Result<Option<String>>,
{
    fn next_chunk(&mut self) -> io::Result<Option<String>> {
        self()
    }
}

/// Reads a buffered reader one line at a time.
pub struct LineSource<R: BufRead> {
    reader: R,
}

impl<R: BufRead> LineSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> ChunkSource for LineSource<R> {
    fn next_chunk(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

/// Resumable state of one interactive run: the input not yet consumed by
/// complete statements, and the position where it starts.
pub struct InteractiveSession<'p> {
    parser: &'p Parser,
    buf: String,
    base: Position,
    stopped: bool,
}

impl<'p> InteractiveSession<'p> {
    pub fn new(parser: &'p Parser) -> Self {
        parser.set_incomplete(false);
        Self {
            parser,
            buf: String::new(),
            base: Position::new(0, 1, 1),
            stopped: false,
        }
    }

    /// Whether the session has ended, because the callback asked to stop or
    /// the stop sequence was reached.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Text buffered for a statement that is still incomplete.
    pub fn pending(&self) -> &str {
        &self.buf
    }

    /// Add a chunk of input. Returns `Ok(false)` once the session is over.
    pub fn feed<F>(&mut self, chunk: &str, on_stmts: &mut F) -> Result<bool, SyntaxError>
    where
        F: FnMut(&[Stmt]) -> bool,
    {
        if self.stopped {
            return Ok(false);
        }
        self.buf.push_str(chunk);
        if !self.buf.ends_with('\n') {
            return Ok(true);
        }
        self.parse_buffer(on_stmts, true)?;
        Ok(!self.stopped)
    }

    /// End the input. Whatever is still buffered must now be complete.
    pub fn finish<F>(&mut self, on_stmts: &mut F) -> Result<(), SyntaxError>
    where
        F: FnMut(&[Stmt]) -> bool,
    {
        if self.stopped || self.buf.trim().is_empty() {
            return Ok(());
        }
        self.parse_buffer(on_stmts, false)?;
        self.stopped = true;
        Ok(())
    }

    fn parse_buffer<F>(&mut self, on_stmts: &mut F, more: bool) -> Result<(), SyntaxError>
    where
        F: FnMut(&[Stmt]) -> bool,
    {
        let map = SourceMap::with_base(&self.buf, self.base);
        match self.parser.parse_source(&map, "", more) {
            Ok(file) => {
                self.parser.set_incomplete(false);
                let reached_stop = file.end.offset() < self.base.offset() + self.buf.len();
                if !on_stmts(&file.stmts.stmts) || reached_stop {
                    self.stopped = true;
                }
                self.base = map.position(self.buf.len());
                self.buf.clear();
                Ok(())
            }
            Err(err) if err.incomplete && more => {
                self.parser.set_incomplete(true);
                if !on_stmts(&[]) {
                    self.stopped = true;
                }
                Ok(())
            }
            Err(err) => {
                self.parser.set_incomplete(err.incomplete);
                Err(err)
            }
        }
    }
}

impl Parser {
    /// Parse input chunk by chunk, calling `on_stmts` with the statements
    /// completed by each chunk that ends a line. While a statement is still
    /// incomplete the callback receives no statements and
    /// [`Parser::incomplete`] is true. Returning `false` from the callback
    /// stops reading.
    pub fn interactive<S, F>(&self, src: &mut S, mut on_stmts: F) -> Result<(), Error>
    where
        S: ChunkSource + ?Sized,
        F: FnMut(&[Stmt]) -> bool,
    {
        let mut session = InteractiveSession::new(self);
        while let Some(chunk) = src.next_chunk()? {
            if !session.feed(&chunk, &mut on_stmts)? {
                return Ok(());
            }
        }
        session.finish(&mut on_stmts)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParserConfig;

    fn run(parser: &Parser, chunks: &[&str]) -> Result<Vec<(usize, bool)>, Error> {
        let mut iter = chunks.iter().map(|s| s.to_string());
        let mut src = move || -> io::Result<Option<String>> { Ok(iter.next()) };
        let mut seen = Vec::new();
        parser.interactive(&mut src, |stmts| {
            seen.push((stmts.len(), parser.incomplete()));
            true
        })?;
        Ok(seen)
    }

    #[test]
    fn test_interactive_lines() {
        let parser = Parser::default();
        let seen = run(&parser, &["foo\n", "bar; baz\n", "\n", "'incom\n", "plete'\n"]).unwrap();
        assert_eq!(seen, vec![(1, false), (2, false), (0, false), (0, true), (1, false)]);
    }

    #[test]
    fn test_interactive_compound_spans_lines() {
        let parser = Parser::default();
        let seen = run(&parser, &["if true; then\n", "  echo a\n", "fi\n"]).unwrap();
        assert_eq!(seen, vec![(0, true), (0, true), (1, false)]);
    }

    #[test]
    fn test_interactive_heredoc_and_continuation() {
        let parser = Parser::default();
        let seen = run(&parser, &["cat <<EOF\n", "body\n", "EOF\n", "echo \\\n", "x\n"]).unwrap();
        assert_eq!(seen, vec![(0, true), (0, true), (1, false), (0, true), (1, false)]);
    }

    #[test]
    fn test_session_keeps_pending_input() {
        let parser = Parser::default();
        let mut session = InteractiveSession::new(&parser);
        let mut on_stmts = |_: &[Stmt]| true;
        assert!(session.feed("if a; then\n", &mut on_stmts).unwrap());
        assert_eq!(session.pending(), "if a; then\n");
        assert!(session.feed("b; fi\n", &mut on_stmts).unwrap());
        assert_eq!(session.pending(), "");
    }

    #[test]
    fn test_partial_chunks_wait_for_newline() {
        let parser = Parser::default();
        let seen = run(&parser, &["ec", "ho hi", "\n"]).unwrap();
        assert_eq!(seen, vec![(1, false)]);
    }

    #[test]
    fn test_incomplete_at_eof_is_error() {
        let parser = Parser::default();
        let err = run(&parser, &["echo 'foo\n"]).unwrap_err();
        match err {
            Error::Syntax(e) => assert!(e.incomplete),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_invalid_input_is_error() {
        let parser = Parser::default();
        assert!(run(&parser, &["fi\n"]).is_err());
    }

    #[test]
    fn test_positions_continue_across_chunks() {
        let parser = Parser::default();
        let mut lines = LineSource::new("a\nb c\n".as_bytes());
        let mut positions = Vec::new();
        parser
            .interactive(&mut lines, |stmts| {
                positions.extend(stmts.iter().map(|s| s.pos().to_string()));
                true
            })
            .unwrap();
        assert_eq!(positions, vec!["1:1", "2:1"]);
    }

    #[test]
    fn test_callback_can_stop() {
        let parser = Parser::default();
        let mut calls = 0;
        let mut lines = LineSource::new("a\nb\nc\n".as_bytes());
        parser
            .interactive(&mut lines, |_| {
                calls += 1;
                false
            })
            .unwrap();
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_stop_sequence_ends_session() {
        let parser = Parser::new(ParserConfig::new().stop_at("$$"));
        let seen = run(&parser, &["a\n", "$$\n", "b\n"]).unwrap();
        assert_eq!(seen, vec![(1, false), (0, false)]);
    }
}
