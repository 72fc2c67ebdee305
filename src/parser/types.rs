//! Parser Types and Constants
//!
//! Errors, configuration, and limits shared across parser modules.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::ast::Position;

// Parser limits to prevent hangs and resource exhaustion
pub const MAX_INPUT_SIZE: usize = 10_000_000; // 10MB max input
pub const MAX_PARSER_DEPTH: usize = 200; // Max recursion depth for nested constructs

/// Shell dialect accepted by the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LangVariant {
    #[default]
    Bash,
    Posix,
    MirBSDKorn,
}

impl LangVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bash => "bash",
            Self::Posix => "posix",
            Self::MirBSDKorn => "mksh",
        }
    }

    pub fn is_posix(&self) -> bool {
        matches!(self, Self::Posix)
    }
}

impl fmt::Display for LangVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LangVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bash" => Ok(Self::Bash),
            "posix" | "sh" => Ok(Self::Posix),
            "mksh" => Ok(Self::MirBSDKorn),
            other => Err(format!("unknown shell language: {}", other)),
        }
    }
}

/// Options fixed for the lifetime of a [`Parser`](super::Parser).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserConfig {
    keep_comments: bool,
    variant: LangVariant,
    stop_at: Option<String>,
}

impl ParserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep comments in the tree instead of dropping them.
    pub fn keep_comments(mut self, keep: bool) -> Self {
        self.keep_comments = keep;
        self
    }

    pub fn variant(mut self, variant: LangVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Stop parsing when `word` starts a token at the beginning of the
    /// input or right after a blank or newline.
    pub fn stop_at(mut self, word: impl Into<String>) -> Self {
        let word = word.into();
        self.stop_at = if word.is_empty() { None } else { Some(word) };
        self
    }

    pub fn keeps_comments(&self) -> bool {
        self.keep_comments
    }

    pub fn lang(&self) -> LangVariant {
        self.variant
    }

    pub fn stop_sequence(&self) -> Option<&str> {
        self.stop_at.as_deref()
    }
}

/// A parse failure with the position it was detected at.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct SyntaxError {
    pub filename: Option<String>,
    pub pos: Position,
    pub message: String,
    /// Set when more input could still make the source valid
    pub incomplete: bool,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.filename {
            Some(name) if !name.is_empty() => write!(f, "{}:{}: {}", name, self.pos, self.message),
            _ => write!(f, "{}: {}", self.pos, self.message),
        }
    }
}

impl SyntaxError {
    pub fn new(pos: Position, message: impl Into<String>) -> Self {
        Self {
            filename: None,
            pos,
            message: message.into(),
            incomplete: false,
        }
    }

    /// An error caused by the input ending too early.
    pub fn unexpected_eof(pos: Position, message: impl Into<String>) -> Self {
        Self {
            incomplete: true,
            ..Self::new(pos, message)
        }
    }

    pub fn with_filename(mut self, name: &str) -> Self {
        if !name.is_empty() {
            self.filename = Some(name.to_string());
        }
        self
    }
}

/// Errors from parsing a reader: either the text is invalid or reading failed.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error("read error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_display() {
        let err = SyntaxError::new(Position::new(5, 1, 6), "bad substitution");
        assert_eq!(err.to_string(), "1:6: bad substitution");
        assert_eq!(
            err.with_filename("foo.sh").to_string(),
            "foo.sh:1:6: bad substitution"
        );
    }

    #[test]
    fn test_unexpected_eof_is_incomplete() {
        let err = SyntaxError::unexpected_eof(Position::new(0, 1, 1), "reached EOF");
        assert!(err.incomplete);
        assert!(!SyntaxError::new(Position::new(0, 1, 1), "x").incomplete);
    }

    #[test]
    fn test_lang_variant_from_str() {
        assert_eq!("mksh".parse::<LangVariant>(), Ok(LangVariant::MirBSDKorn));
        assert_eq!("posix".parse::<LangVariant>(), Ok(LangVariant::Posix));
        assert!("zsh".parse::<LangVariant>().is_err());
        assert_eq!(LangVariant::default().to_string(), "bash");
    }

    #[test]
    fn test_config_builder() {
        let config = ParserConfig::new()
            .keep_comments(true)
            .variant(LangVariant::MirBSDKorn)
            .stop_at("$$");
        assert!(config.keeps_comments());
        assert_eq!(config.lang(), LangVariant::MirBSDKorn);
        assert_eq!(config.stop_sequence(), Some("$$"));
        assert_eq!(ParserConfig::default().stop_sequence(), None);
    }
}
