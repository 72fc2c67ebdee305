//! Syntax Tree for POSIX Shell, Bash and mksh
//!
//! Node types, source positions and a generic depth-first walker.
//!
//! Architecture:
//!   Input → Lexer → Parser → AST → Printer / Walker

pub mod position;
pub mod types;
pub mod walk;

pub use position::Position;
pub use types::*;
pub use walk::{node_type, walk, NodeRef};
