//! The Dachs compiler front-end: lexing, parsing and import resolution.

pub mod diagnostics;
pub mod pipeline;

pub use dachs_ast as ast;
pub use dachs_core::{Error, LogTags, Logger, Source};
pub use dachs_syntax as syntax;
