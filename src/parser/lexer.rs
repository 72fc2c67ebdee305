//! Lexer for Shell Scripts
//!
//! The lexer is a cursor over a range of the source. It produces operator,
//! newline and comment tokens, and marks where words begin; the word parser
//! scans word contents with the same cursor, so nested constructs such as
//! `$(...)` are read in a single pass. It also handles:
//! - Blanks and line continuations
//! - IO numbers (`2` in `2>file`)
//! - Here-document bodies, read at the newline after their redirection
//! - The stop sequence that ends input early

use std::collections::{HashMap, HashSet};

use crate::ast::Position;
use crate::parser::source::SourceMap;
use crate::parser::types::{LangVariant, SyntaxError};

/// Token types for the shell lexer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    // End of input
    Eof,

    // Newlines and comments
    Newline,
    Comment,

    // Start of a word; its extent is decided by the word parser
    Word,
    // Digits directly followed by a redirection operator
    IoNumber,

    // Separators
    Semicolon,   // ;
    Amp,         // &
    DSemi,       // ;;
    SemiAnd,     // ;&
    SemiSemiAnd, // ;;&
    SemiPipe,    // ;|

    // Operators
    Pipe,    // |
    PipeAmp, // |&
    AndAnd,  // &&
    OrOr,    // ||
    LParen,  // (
    RParen,  // )

    // Redirections
    Less,      // <
    Great,     // >
    DLess,     // <<
    DGreat,    // >>
    LessAnd,   // <&
    GreatAnd,  // >&
    LessGreat, // <>
    DLessDash, // <<-
    Clobber,   // >|
    TLess,     // <<<
    AndGreat,  // &>
    AndDGreat, // &>>
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eof => "EOF",
            Self::Newline => "newline",
            Self::Comment => "comment",
            Self::Word => "word",
            Self::IoNumber => "number",
            Self::Semicolon => ";",
            Self::Amp => "&",
            Self::DSemi => ";;",
            Self::SemiAnd => ";&",
            Self::SemiSemiAnd => ";;&",
            Self::SemiPipe => ";|",
            Self::Pipe => "|",
            Self::PipeAmp => "|&",
            Self::AndAnd => "&&",
            Self::OrOr => "||",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::Less => "<",
            Self::Great => ">",
            Self::DLess => "<<",
            Self::DGreat => ">>",
            Self::LessAnd => "<&",
            Self::GreatAnd => ">&",
            Self::LessGreat => "<>",
            Self::DLessDash => "<<-",
            Self::Clobber => ">|",
            Self::TLess => "<<<",
            Self::AndGreat => "&>",
            Self::AndDGreat => "&>>",
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(
            self,
            Self::Less
                | Self::Great
                | Self::DLess
                | Self::DGreat
                | Self::LessAnd
                | Self::GreatAnd
                | Self::LessGreat
                | Self::DLessDash
                | Self::Clobber
                | Self::TLess
                | Self::AndGreat
                | Self::AndDGreat
        )
    }

    pub fn is_case_terminator(&self) -> bool {
        matches!(
            self,
            Self::DSemi | Self::SemiAnd | Self::SemiSemiAnd | Self::SemiPipe
        )
    }
}

/// A token produced by the lexer. Offsets are absolute byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub token_type: TokenType,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn new(token_type: TokenType, start: usize, end: usize) -> Self {
        Self {
            token_type,
            start,
            end,
        }
    }

    pub fn is(&self, token_type: TokenType) -> bool {
        self.token_type == token_type
    }
}

/// A here-document waiting for its body
#[derive(Debug, Clone)]
pub struct PendingHeredoc {
    /// Offset of the `<<` or `<<-` operator
    pub op_pos: usize,
    pub delimiter: String,
    pub strip_tabs: bool,
    pub quoted: bool,
}

/// The raw extent of a here-document body, delimiter line excluded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeredocBody {
    pub op_pos: usize,
    pub start: usize,
    pub end: usize,
    pub quoted: bool,
}

lazy_static::lazy_static! {
    /// Reserved words, recognized by the parser in command position
    pub static ref RESERVED_WORDS: HashSet<&'static str> = [
        "!", "{", "}", "[[", "]]", "case", "do", "done", "elif", "else", "esac",
        "fi", "for", "function", "if", "in", "select", "then", "time", "until", "while",
    ]
    .into_iter()
    .collect();

    /// Reserved words that close a statement list, with what they close
    pub static ref LIST_TERMINATORS: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("}", "can only be used to close a block");
        m.insert("then", "can only be used in an if");
        m.insert("elif", "can only be used in an if");
        m.insert("else", "can only be used in an if");
        m.insert("fi", "can only be used to end an if");
        m.insert("do", "can only be used in a loop");
        m.insert("done", "can only be used to end a loop");
        m.insert("esac", "can only be used to end a case");
        m
    };

    /// Single-character operators
    static ref SINGLE_CHAR_OPS: HashMap<char, TokenType> = {
        let mut m = HashMap::new();
        m.insert('|', TokenType::Pipe);
        m.insert('&', TokenType::Amp);
        m.insert(';', TokenType::Semicolon);
        m.insert('(', TokenType::LParen);
        m.insert(')', TokenType::RParen);
        m.insert('<', TokenType::Less);
        m.insert('>', TokenType::Great);
        m
    };
}

/// Three-character operators
const THREE_CHAR_OPS: &[(&str, TokenType)] = &[
    (";;&", TokenType::SemiSemiAnd),
    ("<<-", TokenType::DLessDash),
    ("<<<", TokenType::TLess),
    ("&>>", TokenType::AndDGreat),
];

/// Two-character operators
const TWO_CHAR_OPS: &[(&str, TokenType)] = &[
    ("&&", TokenType::AndAnd),
    ("||", TokenType::OrOr),
    (";;", TokenType::DSemi),
    (";&", TokenType::SemiAnd),
    (";|", TokenType::SemiPipe),
    ("|&", TokenType::PipeAmp),
    ("<<", TokenType::DLess),
    (">>", TokenType::DGreat),
    ("<&", TokenType::LessAnd),
    (">&", TokenType::GreatAnd),
    ("<>", TokenType::LessGreat),
    (">|", TokenType::Clobber),
    ("&>", TokenType::AndGreat),
];

pub fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Characters that end an unquoted word
pub fn is_meta(c: char) -> bool {
    matches!(c, ';' | '&' | '|' | '(' | ')' | '<' | '>')
}

pub fn is_word_boundary(c: char) -> bool {
    is_blank(c) || c == '\n' || is_meta(c)
}

pub fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

pub fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Check if a string is a valid variable name
pub fn is_valid_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if is_name_start(c) => chars.all(is_name_char),
        _ => false,
    }
}

/// Characters that may open an extended glob when followed by `(`
pub fn is_extglob_char(c: char) -> bool {
    matches!(c, '?' | '*' | '+' | '@' | '!')
}

/// Word characters that need no further scanning
fn is_plain_char(c: char) -> bool {
    !is_word_boundary(c) && !matches!(c, '\'' | '"' | '`' | '$' | '\\')
}

/// Cursor over a range of the source text
pub struct Lexer<'a> {
    src: &'a str,
    map: &'a SourceMap<'a>,
    pos: usize,
    start: usize,
    end: usize,
    variant: LangVariant,
    stop_at: Option<&'a str>,
    interactive: bool,
    pending_heredocs: Vec<PendingHeredoc>,
}

impl<'a> Lexer<'a> {
    pub fn new(map: &'a SourceMap<'a>, start: usize, end: usize, variant: LangVariant) -> Self {
        Self {
            src: map.src(),
            map,
            pos: start,
            start,
            end,
            variant,
            stop_at: None,
            interactive: false,
            pending_heredocs: Vec::new(),
        }
    }

    pub fn with_stop_at(mut self, stop_at: Option<&'a str>) -> Self {
        self.stop_at = stop_at;
        self
    }

    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    // ===========================================================================
    // CURSOR
    // ===========================================================================

    pub fn src(&self) -> &'a str {
        self.src
    }

    pub fn map(&self) -> &'a SourceMap<'a> {
        self.map
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn set_pos(&mut self, pos: usize) {
        self.pos = pos.min(self.end);
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Narrow or widen the readable range; returns the previous end.
    pub fn set_end(&mut self, end: usize) -> usize {
        std::mem::replace(&mut self.end, end.min(self.src.len()))
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.end
    }

    pub fn variant(&self) -> LangVariant {
        self.variant
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Unread text of the current range
    pub fn rest(&self) -> &'a str {
        self.src.get(self.pos..self.end).unwrap_or("")
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// The character `n` characters after the cursor
    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    pub fn starts_with(&self, s: &str) -> bool {
        self.rest().starts_with(s)
    }

    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    pub fn bump_n(&mut self, bytes: usize) {
        self.pos = (self.pos + bytes).min(self.end);
    }

    pub fn position(&self, offset: usize) -> Position {
        self.map.position(offset)
    }

    pub fn error(&self, offset: usize, message: impl Into<String>) -> SyntaxError {
        SyntaxError::new(self.position(offset), message)
    }

    pub fn eof_error(&self, offset: usize, message: impl Into<String>) -> SyntaxError {
        SyntaxError::unexpected_eof(self.position(offset), message)
    }

    // ===========================================================================
    // TOKENS
    // ===========================================================================

    /// Skip spaces, tabs and line continuations.
    pub fn skip_blanks(&mut self) -> Result<(), SyntaxError> {
        loop {
            match self.peek() {
                Some(c) if is_blank(c) => {
                    self.pos += 1;
                }
                Some('\\') if self.at_trailing_backslash() => {
                    self.pos += 1;
                }
                Some('\\') if self.peek_nth(1) == Some('\n') => {
                    let at = self.pos;
                    self.pos += 2;
                    if self.at_end() && self.interactive {
                        return Err(self.eof_error(at, "reached EOF after a line continuation"));
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    /// A backslash that is the last character of the input. Outside
    /// interactive mode it continues onto nothing and is dropped.
    pub fn at_trailing_backslash(&self) -> bool {
        !self.interactive && self.end == self.src.len() && self.rest() == "\\"
    }

    /// Whether the stop sequence begins at the cursor.
    fn at_stop_sequence(&self) -> bool {
        let Some(stop) = self.stop_at else {
            return false;
        };
        if !self.starts_with(stop) {
            return false;
        }
        self.pos == self.start
            || matches!(self.src[..self.pos].chars().next_back(), Some(' ' | '\t' | '\n'))
    }

    /// Lex the next token. Word tokens are not consumed: the cursor is left
    /// at their first character.
    pub fn next_token(&mut self) -> Result<Token, SyntaxError> {
        self.skip_blanks()?;
        let start = self.pos;
        if self.at_end() {
            return Ok(Token::new(TokenType::Eof, start, start));
        }
        if self.at_stop_sequence() {
            self.end = start;
            return Ok(Token::new(TokenType::Eof, start, start));
        }

        let rest = self.rest();
        let c = match rest.chars().next() {
            Some(c) => c,
            None => return Ok(Token::new(TokenType::Eof, start, start)),
        };

        if c == '\n' {
            self.pos += 1;
            return Ok(Token::new(TokenType::Newline, start, start + 1));
        }

        if c == '#' {
            let len = rest.find('\n').unwrap_or(rest.len());
            self.pos += len;
            return Ok(Token::new(TokenType::Comment, start, start + len));
        }

        // Process substitution starts a word
        if (rest.starts_with("<(") || rest.starts_with(">(")) && !self.variant.is_posix() {
            return Ok(Token::new(TokenType::Word, start, start));
        }

        for (op, token_type) in THREE_CHAR_OPS {
            if rest.starts_with(op) {
                self.pos += op.len();
                return Ok(Token::new(*token_type, start, self.pos));
            }
        }
        for (op, token_type) in TWO_CHAR_OPS {
            if rest.starts_with(op) {
                self.pos += op.len();
                return Ok(Token::new(*token_type, start, self.pos));
            }
        }
        if let Some(token_type) = SINGLE_CHAR_OPS.get(&c) {
            self.pos += 1;
            return Ok(Token::new(*token_type, start, self.pos));
        }

        let digits = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        if digits > 0 && matches!(rest[digits..].chars().next(), Some('<' | '>')) {
            self.pos += digits;
            return Ok(Token::new(TokenType::IoNumber, start, self.pos));
        }

        Ok(Token::new(TokenType::Word, start, start))
    }

    /// The text of the word at `pos` if it is made only of plain characters,
    /// such as a reserved word or a test operator.
    pub fn plain_word_at(&self, pos: usize) -> Option<&'a str> {
        let rest = self.src.get(pos..self.end)?;
        let len = rest.find(|c: char| !is_plain_char(c)).unwrap_or(rest.len());
        if len == 0 {
            return None;
        }
        let word = &rest[..len];
        match rest[len..].chars().next() {
            None => Some(word),
            Some('(')
                if !self.variant.is_posix() && word.chars().next_back().is_some_and(is_extglob_char) =>
            {
                None
            }
            Some(c) if is_word_boundary(c) => Some(word),
            Some(_) => None,
        }
    }

    /// Offset of the first non-blank character at or after `pos`.
    pub fn skip_blanks_from(&self, mut pos: usize) -> usize {
        let bytes = self.src.as_bytes();
        while pos < self.end {
            match bytes[pos] {
                b' ' | b'\t' => pos += 1,
                b'\\' if pos + 1 < self.end && bytes[pos + 1] == b'\n' => pos += 2,
                _ => break,
            }
        }
        pos
    }

    // ===========================================================================
    // HERE-DOCUMENTS
    // ===========================================================================

    pub fn add_pending_heredoc(&mut self, heredoc: PendingHeredoc) {
        self.pending_heredocs.push(heredoc);
    }

    pub fn has_pending_heredocs(&self) -> bool {
        !self.pending_heredocs.is_empty()
    }

    pub fn pending_heredocs(&self) -> &[PendingHeredoc] {
        &self.pending_heredocs
    }

    /// Read the bodies of all pending here-documents, starting at the cursor,
    /// which must be at the start of a line.
    pub fn read_heredoc_bodies(&mut self) -> Result<Vec<HeredocBody>, SyntaxError> {
        let pending = std::mem::take(&mut self.pending_heredocs);
        let mut bodies = Vec::with_capacity(pending.len());
        for heredoc in pending {
            let start = self.pos;
            loop {
                if self.at_end() {
                    return Err(self.eof_error(
                        heredoc.op_pos,
                        format!("unclosed here-document `{}`", heredoc.delimiter),
                    ));
                }
                let line_start = self.pos;
                let rest = self.rest();
                let (line, next) = match rest.find('\n') {
                    Some(i) => (&rest[..i], line_start + i + 1),
                    None => (rest, self.end),
                };
                let candidate = if heredoc.strip_tabs {
                    line.trim_start_matches('\t')
                } else {
                    line
                };
                self.pos = next;
                if candidate == heredoc.delimiter {
                    bodies.push(HeredocBody {
                        op_pos: heredoc.op_pos,
                        start,
                        end: line_start,
                        quoted: heredoc.quoted,
                    });
                    break;
                }
            }
        }
        Ok(bodies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<(TokenType, String)> {
        let map = SourceMap::new(input);
        let mut lexer = Lexer::new(&map, 0, input.len(), LangVariant::Bash);
        let mut out = Vec::new();
        loop {
            let tok = lexer.next_token().unwrap();
            if tok.is(TokenType::Eof) {
                break;
            }
            if tok.is(TokenType::Word) {
                // words are consumed by the parser; skip a plain run here
                let word = lexer.plain_word_at(tok.start).unwrap_or("");
                lexer.bump_n(word.len().max(1));
                out.push((TokenType::Word, word.to_string()));
                continue;
            }
            out.push((tok.token_type, input[tok.start..tok.end].to_string()));
        }
        out
    }

    #[test]
    fn test_operators() {
        let toks = tokens("a && b || c | d |& e;;&");
        let types: Vec<TokenType> = toks.iter().map(|t| t.0).collect();
        assert_eq!(
            types,
            vec![
                TokenType::Word,
                TokenType::AndAnd,
                TokenType::Word,
                TokenType::OrOr,
                TokenType::Word,
                TokenType::Pipe,
                TokenType::Word,
                TokenType::PipeAmp,
                TokenType::Word,
                TokenType::SemiSemiAnd,
            ]
        );
    }

    #[test]
    fn test_redirection() {
        let toks = tokens("cat 2>&1 <<-EOF &>>log");
        assert_eq!(toks[1], (TokenType::IoNumber, "2".to_string()));
        assert_eq!(toks[2], (TokenType::GreatAnd, ">&".to_string()));
        assert_eq!(toks[4].0, TokenType::DLessDash);
        assert_eq!(toks[6].0, TokenType::AndDGreat);
    }

    #[test]
    fn test_comment_and_newline() {
        let toks = tokens("echo # hi\nfoo");
        assert_eq!(toks[1], (TokenType::Comment, "# hi".to_string()));
        assert_eq!(toks[2].0, TokenType::Newline);
        assert_eq!(toks[3], (TokenType::Word, "foo".to_string()));
    }

    #[test]
    fn test_line_continuation_is_blank() {
        let toks = tokens("a \\\n b");
        assert_eq!(toks.len(), 2);
    }

    #[test]
    fn test_plain_word() {
        let input = "then x@(y) \"q\"";
        let map = SourceMap::new(input);
        let lexer = Lexer::new(&map, 0, input.len(), LangVariant::Bash);
        assert_eq!(lexer.plain_word_at(0), Some("then"));
        assert_eq!(lexer.plain_word_at(5), None);
        assert_eq!(lexer.plain_word_at(11), None);
    }

    #[test]
    fn test_stop_sequence() {
        let input = "echo $$ foo\n$$ bar";
        let map = SourceMap::new(input);
        let mut lexer = Lexer::new(&map, 0, input.len(), LangVariant::Bash).with_stop_at(Some("$$"));
        lexer.set_pos(5);
        // "$$" after a blank stops the input
        assert!(lexer.next_token().unwrap().is(TokenType::Eof));
        assert_eq!(lexer.end(), 5);
    }

    #[test]
    fn test_heredoc_bodies() {
        let input = "line one\n\tEOF\nrest";
        let map = SourceMap::new(input);
        let mut lexer = Lexer::new(&map, 0, input.len(), LangVariant::Bash);
        lexer.add_pending_heredoc(PendingHeredoc {
            op_pos: 0,
            delimiter: "EOF".to_string(),
            strip_tabs: true,
            quoted: false,
        });
        let bodies = lexer.read_heredoc_bodies().unwrap();
        assert_eq!(&input[bodies[0].start..bodies[0].end], "line one\n");
        assert_eq!(lexer.rest(), "rest");
    }

    #[test]
    fn test_unclosed_heredoc_is_incomplete() {
        let input = "body\n";
        let map = SourceMap::new(input);
        let mut lexer = Lexer::new(&map, 0, input.len(), LangVariant::Bash);
        lexer.add_pending_heredoc(PendingHeredoc {
            op_pos: 0,
            delimiter: "EOF".to_string(),
            strip_tabs: false,
            quoted: false,
        });
        let err = lexer.read_heredoc_bodies().unwrap_err();
        assert!(err.incomplete);
    }
}
