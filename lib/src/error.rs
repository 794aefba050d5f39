use std::borrow::Cow;
use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("Mirror tool not found")]
    BinaryNotFound(Cow<'static, str>),
    #[error("Invalid URL")]
    InvalidUrl(Cow<'static, str>),
    #[error("Error creating output directory")]
    CreateOutputDir(io::Error),
    #[error("Output directory is in use by another process")]
    OutputDirLocked,
    #[error("Error spawning mirror process")]
    Spawn(io::Error),
    #[error("A mirror job is already running")]
    AlreadyRunning,
    #[error("Error opening config")]
    OpenConfig(anyhow::Error),
    #[error("Error reading config")]
    ReadConfig(io::Error),
    #[error("Error parsing config")]
    ParseConfig(Cow<'static, str>),
    #[error("Configuration error")]
    Config(Cow<'static, str>),
    #[error("Error creating file")]
    CreateFile(anyhow::Error),
    #[error("Error writing file")]
    WriteFile(io::Error),
    #[error("Error")]
    Other(Cow<'static, str>),
}
