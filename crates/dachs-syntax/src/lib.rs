//! Syntax front-end of the Dachs compiler.
//!
//! ```text
//! Source ──lexer──▶ tokens ──parser──▶ Program ──import──▶ Program + Modules
//! ```
//!
//! The lexer runs on its own thread and streams tokens to the parser through
//! a bounded channel. Blocks of `if`, `switch` and `match` used as values are
//! converted by [`block_expr`].

pub mod block_expr;
pub mod import;
pub mod lexer;
pub mod parser;
pub mod token;

pub use block_expr::{block_expr, promote_stmt};
pub use import::{Resolver, library_paths, resolve_imports};
pub use lexer::{Lexer, tokenize};
pub use parser::{Parser, parse, parse_tokens};
pub use token::{Token, TokenKind};
