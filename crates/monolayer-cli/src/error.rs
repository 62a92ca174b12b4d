use monolayer::core::definitions::DefinitionLoadError;
use monolayer::core::pattern::PatternError;
use monolayer::engine::error::AssemblyError;
use std::path::PathBuf;
use thiserror::Error;

use crate::utils::parser::ParseError;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    #[error(transparent)]
    Definition(#[from] DefinitionLoadError),

    #[error("Pattern generation failed: {0}")]
    Pattern(#[from] PatternError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<ParseError> for CliError {
    fn from(e: ParseError) -> Self {
        CliError::Argument(e.to_string())
    }
}
