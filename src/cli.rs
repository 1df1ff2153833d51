//! Command-line interface for the Dachs compiler.

use std::path::PathBuf;

use clap::Parser;
use dachs_core::LogTags;

#[derive(Debug, Parser)]
#[command(name = "dachs")]
#[command(about = "Dachs programming language compiler", long_about = None)]
pub struct Cli {
    /// Print the tokens of the source
    #[arg(long, conflicts_with = "ast")]
    pub tokens: bool,

    /// Print the AST of the source and of every imported module
    #[arg(long)]
    pub ast: bool,

    /// Comma-separated components to log: Parsing, Sema or All
    #[arg(long, value_name = "COMPONENTS", value_parser = parse_log_tags)]
    pub log: Option<LogTags>,

    /// Source file. Reads stdin when omitted
    pub file: Option<PathBuf>,
}

/// What the driver does with the source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Tokens,
    Ast,
    /// Parse and resolve imports without printing anything.
    Check,
}

impl Cli {
    pub fn mode(&self) -> Mode {
        if self.tokens {
            Mode::Tokens
        } else if self.ast {
            Mode::Ast
        } else {
            Mode::Check
        }
    }

    pub fn log_tags(&self) -> LogTags {
        self.log.unwrap_or(LogTags::NONE)
    }
}

/// Parse a comma-separated list of log components.
pub fn parse_log_tags(arg: &str) -> Result<LogTags, String> {
    let mut tags = LogTags::NONE;
    for name in arg.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        tags |= LogTags::from_component(name).ok_or_else(|| {
            format!(
                "Unknown log component '{}'. Valid component: 'Parsing', 'Sema' or 'All'",
                name
            )
        })?;
    }
    Ok(tags)
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_command_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_log_tags() {
        assert_eq!(parse_log_tags("Parsing"), Ok(LogTags::PARSING));
        assert_eq!(
            parse_log_tags("Parsing, Sema"),
            Ok(LogTags::PARSING | LogTags::SEMA)
        );
        assert_eq!(parse_log_tags("All"), Ok(LogTags::ALL));
        assert_eq!(
            parse_log_tags("Parsing,Lexing"),
            Err(
                "Unknown log component 'Lexing'. Valid component: 'Parsing', 'Sema' or 'All'"
                    .to_string()
            )
        );
    }

    #[test]
    fn test_modes() {
        let cli = Cli::try_parse_from(["dachs", "--tokens", "main.dcs"]).unwrap();
        assert_eq!(cli.mode(), Mode::Tokens);
        assert_eq!(cli.file, Some(PathBuf::from("main.dcs")));

        let cli = Cli::try_parse_from(["dachs", "--ast", "--log", "Parsing"]).unwrap();
        assert_eq!(cli.mode(), Mode::Ast);
        assert_eq!(cli.log_tags(), LogTags::PARSING);
        assert_eq!(cli.file, None);

        let cli = Cli::try_parse_from(["dachs"]).unwrap();
        assert_eq!(cli.mode(), Mode::Check);
        assert!(cli.log_tags().is_empty());
    }

    #[test]
    fn test_invalid_arguments() {
        assert!(Cli::try_parse_from(["dachs", "--tokens", "--ast"]).is_err());
        assert!(Cli::try_parse_from(["dachs", "--log", "Codegen"]).is_err());
    }
}
