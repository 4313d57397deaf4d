use crate::CONFIG_HOME;
use crate::LibraryError;
use crate::desktop_image::DesktopImageOptions;
use serde::Deserialize;
use serde::Serialize;
use std::path::Path;
use std::path::PathBuf;

pub const CONFIG_FILE: &str = "skylight.json";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticConfig {
    /// Defaults applied to every desktop image change, overridden by explicit options
    pub desktop_image_options: DesktopImageOptions,
    /// Tracing filter used when RUST_LOG is not set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl StaticConfig {
    pub fn path() -> PathBuf {
        CONFIG_HOME.join(CONFIG_FILE)
    }

    pub fn read(path: &Path) -> Result<Self, LibraryError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Comments and trailing commas are accepted
    pub fn from_json(content: &str) -> Result<Self, LibraryError> {
        let mut deserializer = serde_json::Deserializer::from_str(content);
        deserializer.set_allow_comments(true);
        deserializer.set_ignore_trailing_commas(true);

        let config = Self::deserialize(&mut deserializer)?;
        deserializer.end()?;

        Ok(config)
    }

    /// A missing file yields the default configuration
    #[tracing::instrument]
    pub fn load(path: &Path) -> Result<Self, LibraryError> {
        if !path.is_file() {
            tracing::debug!("no configuration file found, using defaults");
            return Ok(Self::default());
        }

        let config = Self::read(path)?;
        tracing::debug!("loaded configuration: {config:?}");

        Ok(config)
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }
}
