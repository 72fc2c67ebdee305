//! Parser module for POSIX Shell, Bash and mksh
//!
//! This module contains the lexer, the recursive-descent parser and the
//! interactive front end.

pub mod types;
pub mod source;
pub mod lexer;
pub mod word_parser;
pub mod expansion_parser;
pub mod arithmetic_parser;
pub mod conditional_parser;
pub mod compound_parser;
pub mod command_parser;
pub mod parser;
pub mod interactive;

// Re-exports
pub use interactive::{ChunkSource, InteractiveSession, LineSource};
pub use parser::{parse, Parser};
pub use types::{Error, LangVariant, ParserConfig, SyntaxError};
