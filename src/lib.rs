//! sh-syntax - A parser and printer for POSIX Shell, Bash and mksh
//!
//! This library turns shell source into a syntax tree that keeps the
//! position of every node, walks and prints such trees, and parses input
//! interactively, one line at a time.

pub mod ast;
pub mod parser;
pub mod printer;

pub use ast::types::*;
pub use ast::{node_type, walk, NodeRef, Position};
pub use parser::{
    parse, ChunkSource, Error, InteractiveSession, LangVariant, LineSource, Parser, ParserConfig,
    SyntaxError,
};
pub use printer::{print_word_part, Printer};
