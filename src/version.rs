use std::fmt;

use serde::Serialize;

use crate::config::MixinConfig;
use crate::error::MixinError;

pub const MIXIN_NAME: &str = "terraform";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum VersionFormat {
    #[default]
    Plaintext,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    pub name: String,
    pub version: String,
    pub client_version: String,
}

impl VersionInfo {
    pub fn new(config: &MixinConfig) -> Self {
        Self {
            name: MIXIN_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            client_version: config.client_version.clone(),
        }
    }

    pub fn render(&self, format: VersionFormat) -> Result<String, MixinError> {
        match format {
            VersionFormat::Plaintext => Ok(self.to_string()),
            VersionFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} mixin v{} (terraform client {})",
            self.name, self.version, self.client_version
        )
    }
}
