use std::path::PathBuf;

use anyhow::{anyhow, Result};
use directories::ProjectDirs;

pub const DEFAULT_ENCODING: &str = "UTF-8";
pub const NO_CACHE: &str = "no-cache, no-store, must-revalidate";

/// Response settings shared by every data source of a host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSourceSettings {
    pub response_encoding: String,
}

impl Default for DataSourceSettings {
    fn default() -> Self {
        Self {
            response_encoding: DEFAULT_ENCODING.to_string(),
        }
    }
}

impl DataSourceSettings {
    pub fn content_type(&self) -> String {
        format!("text/json; charset={}", self.response_encoding)
    }
}

pub fn default_db_path() -> Result<PathBuf> {
    let project_dirs = ProjectDirs::from("com", "hellhbbd", "gridsource")
        .ok_or_else(|| anyhow!("unable to resolve data directory"))?;
    Ok(project_dirs.data_local_dir().join("datasets.sqlite"))
}
