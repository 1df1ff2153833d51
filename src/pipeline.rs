//! Front-end pipeline of the Dachs compiler.
//!
//! ## Pipeline Stages
//!
//! ```text
//! Source
//!     │
//!     ▼
//! lex ─► Vec<Token>                       (--tokens)
//!     │
//!     ▼
//! parse ─► Program
//!     │
//!     ▼
//! resolve_imports ─► Program + Modules    (--ast)
//! ```
//!
//! Each stage reports the first failure as a [`dachs_core::Error`]. Semantic
//! analysis is not part of this pipeline yet.

use std::collections::HashSet;
use std::io;
use std::sync::Arc;

use dachs_ast::{Program, fprintln};
use dachs_core::{Error, Logger, Source};
use dachs_syntax::{Resolver, Token, parse, tokenize};

// =============================================================================
// Stages
// =============================================================================

/// Lex the whole source.
pub fn stage_lex(src: Arc<Source>, logger: Logger) -> Result<Vec<Token>, Error> {
    tokenize(src, logger)
}

/// Parse the source and resolve its imports with the default library paths.
pub fn stage_resolve(src: Arc<Source>, logger: Logger) -> Result<Program, Error> {
    let mut prog = parse(src, logger)?;
    dachs_syntax::resolve_imports(&mut prog, logger)?;
    Ok(prog)
}

/// Same as [`stage_resolve`] with a caller-provided resolver. Modules cached
/// by the resolver are shared with earlier programs.
pub fn stage_resolve_with(
    src: Arc<Source>,
    resolver: &mut Resolver,
    logger: Logger,
) -> Result<Program, Error> {
    let mut prog = parse(src, logger)?;
    resolver.resolve_imports(&mut prog)?;
    Ok(prog)
}

// =============================================================================
// Output
// =============================================================================

/// Write one token per line.
pub fn write_tokens(mut out: impl io::Write, tokens: &[Token]) -> io::Result<()> {
    for tok in tokens {
        writeln!(out, "{}", tok)?;
    }
    Ok(())
}

/// Write the AST of `prog` followed by the ASTs of all modules it imports,
/// directly or not. A module imported several times is written once.
pub fn write_ast(mut out: impl io::Write, prog: &Program) -> io::Result<()> {
    let mut seen = HashSet::new();
    write_program(&mut out, prog, &mut seen)
}

fn write_program<'a>(
    out: &mut impl io::Write,
    prog: &'a Program,
    seen: &mut HashSet<&'a str>,
) -> io::Result<()> {
    if !seen.insert(prog.source.name.as_str()) {
        return Ok(());
    }
    fprintln(&mut *out, prog)?;
    for module in &prog.modules {
        write_program(&mut *out, &module.ast, seen)?;
    }
    Ok(())
}
