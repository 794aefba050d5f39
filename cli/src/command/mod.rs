use std::borrow::Cow;

mod check;
mod mirror;

pub use check::*;
pub use mirror::*;

use sitemirror::config::MirrorConfig;
use sitemirror::MirrorError;

use crate::GeneralOptions;

#[derive(Debug)]
pub enum CommandErrorKind {
    Arguments,
    Config,
    Tool,
    Cancelled,
    Other,
}

impl CommandErrorKind {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Arguments => 1,
            Self::Config => 2,
            Self::Tool => 3,
            Self::Cancelled => 130,
            Self::Other => 101,
        }
    }
}

#[derive(Debug)]
pub struct CommandError {
    pub kind: CommandErrorKind,
    pub description: Cow<'static, str>,
}

impl CommandError {
    pub fn new<S: Into<Cow<'static, str>>>(kind: CommandErrorKind, description: S) -> CommandError {
        CommandError {
            kind,
            description: description.into(),
        }
    }
}

impl From<MirrorError> for CommandError {
    fn from(error: MirrorError) -> Self {
        match error {
            MirrorError::BinaryNotFound(binary) => CommandError::new(
                CommandErrorKind::Tool,
                format!("Mirror tool '{binary}' was not found. Install wget2, or point the binary setting at a compatible tool."),
            ),
            MirrorError::InvalidUrl(err) => {
                CommandError::new(CommandErrorKind::Arguments, format!("Invalid URL: {err}"))
            }
            MirrorError::CreateOutputDir(err) => CommandError::new(
                CommandErrorKind::Other,
                format!("Error creating output directory: {err}"),
            ),
            MirrorError::OutputDirLocked => CommandError::new(
                CommandErrorKind::Other,
                "The output directory is already in use by another process",
            ),
            MirrorError::Spawn(err) => CommandError::new(
                CommandErrorKind::Other,
                format!("Error starting mirror process: {err}"),
            ),
            MirrorError::AlreadyRunning => {
                CommandError::new(CommandErrorKind::Other, "A mirror job is already running")
            }
            MirrorError::OpenConfig(err) => {
                CommandError::new(CommandErrorKind::Config, format!("Error opening config file: {err}"))
            }
            MirrorError::ReadConfig(err) => {
                CommandError::new(CommandErrorKind::Config, format!("Error reading config file: {err}"))
            }
            MirrorError::ParseConfig(err) => {
                CommandError::new(CommandErrorKind::Config, format!("Error parsing configuration: {err}"))
            }
            MirrorError::Config(err) => {
                CommandError::new(CommandErrorKind::Config, format!("Configuration error: {err}"))
            }
            MirrorError::CreateFile(err) => {
                CommandError::new(CommandErrorKind::Config, format!("Error creating file: {err}"))
            }
            MirrorError::WriteFile(err) => {
                CommandError::new(CommandErrorKind::Config, format!("Error writing file: {err}"))
            }
            MirrorError::Other(err) => CommandError::new(CommandErrorKind::Other, err.to_string()),
        }
    }
}

pub(crate) fn load_mirror_config(general_options: &GeneralOptions) -> Result<MirrorConfig, CommandError> {
    let config = if let Some(config_path) = &general_options.config_path {
        MirrorConfig::from_location(config_path)?
    } else {
        MirrorConfig::from_default_location()?
    };

    Ok(config)
}
