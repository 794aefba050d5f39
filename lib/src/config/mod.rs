use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde_derive::{Deserialize, Serialize};
use tracing::error;

use crate::error::*;
use crate::util;

pub const CONFIG_DIR: &str = "sitemirror";
pub const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_CONFIG_TOML: &str = include_str!("default_config.toml");

/// Default mirror tool. A wget2-compatible binary can be substituted through
/// the config file or `SITEMIRROR_BIN`.
pub const DEFAULT_BINARY: &str = "wget2";

pub const ENV_BINARY: &str = "SITEMIRROR_BIN";
pub const ENV_CA_BUNDLE: &str = "SITEMIRROR_CA_BUNDLE";

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct MirrorConfig {
    pub binary: Option<String>,
    pub ca_bundle: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct ResolvedMirrorConfig {
    pub binary: String,
    pub ca_bundle: Option<PathBuf>,
}

pub fn get_default_config_path() -> Option<PathBuf> {
    let config_path = dirs::config_dir().map(|p| p.join(CONFIG_DIR));

    if config_path.is_none() {
        error!("Could not get configuration path!");
    }

    config_path
}

impl MirrorConfig {
    pub fn from_file(path: &Path) -> Result<Self, MirrorError> {
        let mut file = util::open_file(path).map_err(MirrorError::OpenConfig)?;

        let mut toml_str = String::new();
        file.read_to_string(&mut toml_str).map_err(MirrorError::ReadConfig)?;

        Self::from_str(&toml_str)
    }

    pub fn from_location(path: &Path) -> Result<Self, MirrorError> {
        let config_file_path = path.join(CONFIG_FILENAME);

        if config_file_path.exists() {
            Self::from_file(&config_file_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_default_location() -> Result<Self, MirrorError> {
        if let Some(path) = get_default_config_path() {
            Self::from_location(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn write_default() -> Result<(), MirrorError> {
        if let Some(config_location) = get_default_config_path() {
            let config_file_path = config_location.join(CONFIG_FILENAME);

            if !config_file_path.exists() {
                // Create config directory if necessary.
                util::create_parent_dir(&config_file_path)
                    .map_err(|err| MirrorError::Other(err.to_string().into()))?;

                // Write config file.
                let mut file = util::create_file(config_file_path).map_err(MirrorError::CreateFile)?;
                file.write_all(DEFAULT_CONFIG_TOML.as_bytes())
                    .map_err(MirrorError::WriteFile)?;
            }
        }

        Ok(())
    }

    /// Apply environment overrides and defaults.
    pub fn resolve(self) -> Result<ResolvedMirrorConfig, MirrorError> {
        let binary = std::env::var(ENV_BINARY)
            .ok()
            .filter(|v| !v.is_empty())
            .or(self.binary)
            .unwrap_or_else(|| DEFAULT_BINARY.to_owned());

        let ca_bundle = std::env::var(ENV_CA_BUNDLE)
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or(self.ca_bundle);

        if let Some(ca_bundle) = &ca_bundle {
            if !ca_bundle.exists() {
                return Err(MirrorError::Config(
                    format!("CA bundle '{}' does not exist.", ca_bundle.display()).into(),
                ));
            }
        }

        Ok(ResolvedMirrorConfig { binary, ca_bundle })
    }
}

impl FromStr for MirrorConfig {
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
    fn parses_config_toml() {
        let config: MirrorConfig = r#"
            binary = "wget"
            ca-bundle = "/etc/ssl/certs/ca-bundle.crt"
        "#
        .parse()
        .unwrap();

        assert_eq!(config.binary.as_deref(), Some("wget"));
        assert_eq!(
            config.ca_bundle.as_deref(),
            Some(Path::new("/etc/ssl/certs/ca-bundle.crt"))
        );
    }

    #[test]
    fn empty_config_resolves_to_defaults() {
        let config: MirrorConfig = "".parse().unwrap();
        let resolved = config.resolve().unwrap();

        assert_eq!(resolved.binary, DEFAULT_BINARY);
        assert!(resolved.ca_bundle.is_none());
    }

    #[test]
    fn resolve_rejects_missing_ca_bundle() {
        let config: MirrorConfig = r#"ca-bundle = "/definitely/not/a/real/path/ca.crt""#.parse().unwrap();

        assert!(matches!(config.resolve(), Err(MirrorError::Config(_))));
    }

    #[test]
    fn default_config_template_is_valid_toml() {
        let config: MirrorConfig = DEFAULT_CONFIG_TOML.parse().unwrap();

        // The template should only contain commented-out settings.
        assert!(config.binary.is_none());
        assert!(config.ca_bundle.is_none());
    }
}
