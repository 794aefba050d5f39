use std::io::{Read, Write};
use std::path::Path;
use std::str::FromStr;

use serde_derive::{Deserialize, Serialize};
use strum_macros::EnumString;

use sitemirror::config::get_default_config_path;
use sitemirror::error::*;
use sitemirror::util;

pub const CLI_CONFIG_FILENAME: &str = "cli.toml";

pub const DEFAULT_CLI_CONFIG_TOML: &str = include_str!("default_cli_config.toml");

#[derive(Clone, Copy, Debug, Deserialize, Serialize, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CliProgressBarStyle {
    Dot,
    Hash,
    Arrow,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct CliProgressConfig {
    pub enable: bool,
    pub bar_style: CliProgressBarStyle,
}

impl Default for CliProgressConfig {
    fn default() -> Self {
        Self {
            enable: true,
            bar_style: CliProgressBarStyle::Dot,
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct CliConfig {
    #[serde(default)]
    pub progress: CliProgressConfig,
}

impl CliConfig {
    pub fn from_file(path: &Path) -> Result<Self, MirrorError> {
        let mut file = util::open_file(path).map_err(MirrorError::OpenConfig)?;

        let mut toml_str = String::new();
        file.read_to_string(&mut toml_str).map_err(MirrorError::ReadConfig)?;

        Self::from_str(&toml_str)
    }

    pub fn from_location(path: &Path) -> Result<Self, MirrorError> {
        let config_file_path = path.join(CLI_CONFIG_FILENAME);

        if config_file_path.exists() {
            Self::from_file(&config_file_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn write_default() -> Result<(), MirrorError> {
        if let Some(config_location) = get_default_config_path() {
            let config_file_path = config_location.join(CLI_CONFIG_FILENAME);

            if !config_file_path.exists() {
                // Create config directory if necessary.
                util::create_parent_dir(&config_file_path)
                    .map_err(|err| MirrorError::Other(err.to_string().into()))?;

                // Write config file.
                let mut file = util::create_file(config_file_path).map_err(MirrorError::CreateFile)?;
                file.write_all(DEFAULT_CLI_CONFIG_TOML.as_bytes())
                    .map_err(MirrorError::WriteFile)?;
            }
        }

        Ok(())
    }
}

impl FromStr for CliConfig {
    type Err = MirrorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: Self = toml::from_str(s).map_err(|err| MirrorError::ParseConfig(err.to_string().into()))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cli_config_template_is_valid_toml() {
        let config: CliConfig = DEFAULT_CLI_CONFIG_TOML.parse().unwrap();

        assert!(config.progress.enable);
        assert!(matches!(config.progress.bar_style, CliProgressBarStyle::Dot));
    }

    #[test]
    fn bar_style_parses_from_string() {
        assert!(matches!(
            CliProgressBarStyle::from_str("hash"),
            Ok(CliProgressBarStyle::Hash)
        ));
        assert!(CliProgressBarStyle::from_str("bogus").is_err());
    }

    #[test]
    fn missing_progress_section_falls_back_to_defaults() {
        let config: CliConfig = "".parse().unwrap();

        assert!(config.progress.enable);
    }
}
