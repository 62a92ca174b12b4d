use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileSquareLattice {
    pub sites_x: Option<usize>,
    pub sites_y: Option<usize>,
    pub spacing: Option<f64>,
    pub substrate_element: Option<String>,
    pub anchor_element: Option<String>,
    pub anchor_height: Option<f64>,
    pub attach_distance: Option<f64>,
    pub box_height: Option<f64>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(
    rename_all = "kebab-case",
    rename_all_fields = "kebab-case",
    tag = "type",
    deny_unknown_fields
)]
pub enum FileSurfaceConfig {
    SquareLattice(FileSquareLattice),
    File {
        path: PathBuf,
    },
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(
    rename_all = "kebab-case",
    rename_all_fields = "kebab-case",
    tag = "type",
    deny_unknown_fields
)]
pub enum FilePatternConfig {
    Grid {
        nx: usize,
        ny: usize,
    },
    Random {
        count: usize,
        seed: Option<u64>,
        min_separation: Option<f64>,
    },
    Full,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(
    rename_all = "kebab-case",
    rename_all_fields = "kebab-case",
    tag = "type",
    deny_unknown_fields
)]
pub enum FileChainConfig {
    Alkane {
        length: Option<usize>,
        fraction: Option<f64>,
    },
    File {
        path: PathBuf,
        fraction: Option<f64>,
    },
}

impl FileChainConfig {
    pub fn fraction(&self) -> Option<f64> {
        match self {
            FileChainConfig::Alkane { fraction, .. } | FileChainConfig::File { fraction, .. } => {
                *fraction
            }
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(
    rename_all = "kebab-case",
    rename_all_fields = "kebab-case",
    tag = "type",
    deny_unknown_fields
)]
pub enum FileBackfillConfig {
    Hydrogen,
    File { path: PathBuf },
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileTilingConfig {
    pub x: Option<usize>,
    pub y: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub surface: Option<FileSurfaceConfig>,
    pub pattern: Option<FilePatternConfig>,
    #[serde(default)]
    pub chains: Vec<FileChainConfig>,
    pub backfill: Option<FileBackfillConfig>,
    pub tiling: Option<FileTilingConfig>,
    pub chain_length: Option<usize>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
