use std::path::PathBuf;

use crate::language::UnknownLanguage;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("no platform config directory")]
    NoConfigDir,

    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid TOML in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Every failed check, joined with "; ".
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SidechatError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Language(#[from] UnknownLanguage),

    #[error("missing credential: set {0}")]
    MissingCredential(&'static str),

    #[error("unsupported image type: {}", .0.display())]
    UnsupportedImage(PathBuf),
}
