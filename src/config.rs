//! Optional YAML settings, overridden by CLI flags

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DealsError, DealsResult};
use crate::excel::ZinnovLayout;

pub const DEFAULT_TITLE: &str = "Requested Accounts";
pub const DEFAULT_CONFIG_FILE: &str = "deals-formatter.yaml";

/// Contents of `deals-formatter.yaml`
///
/// ```yaml
/// title: Requested Accounts
/// zinnov_layout: client
/// out_dir: out
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DealsConfig {
    pub title: Option<String>,
    pub zinnov_layout: Option<ZinnovLayout>,
    pub out_dir: Option<PathBuf>,
}

/// Settings after merging file values with flags
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub title: String,
    pub zinnov_layout: Option<ZinnovLayout>,
    pub out_dir: PathBuf,
}

impl DealsConfig {
    pub fn load(path: &Path) -> DealsResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            DealsError::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        let config: DealsConfig = serde_yaml::from_str(&text)?;
        debug!(config = %path.display(), "config loaded");
        Ok(config)
    }

    /// An explicit path must exist; otherwise `deals-formatter.yaml` in the
    /// working directory is used when present.
    pub fn discover(explicit: Option<&Path>) -> DealsResult<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.is_file() {
            return Self::load(default_path);
        }
        Ok(Self::default())
    }

    /// Flags win over file values; file values win over defaults
    pub fn resolve(
        &self,
        title: Option<String>,
        zinnov_layout: Option<ZinnovLayout>,
        out_dir: Option<PathBuf>,
    ) -> Settings {
        Settings {
            title: title
                .or_else(|| self.title.clone())
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            zinnov_layout: zinnov_layout.or(self.zinnov_layout),
            out_dir: out_dir
                .or_else(|| self.out_dir.clone())
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}
