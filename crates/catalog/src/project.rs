use std::path::Path;

use gateway::{Gateway, StorageConfig};
use serde::{Deserialize, Serialize};

use crate::CatalogError;

/// Storage locations of one project's documents and tiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPaths {
    /// Directory holding `metadata.json` and every tile image.
    pub output_tiles: String,
    /// Path of the roster document.
    pub teams_file: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub paths: ProjectPaths,
}

impl Project {
    pub fn tile_root(&self) -> &str {
        self.paths.output_tiles.trim_end_matches('/')
    }

    pub fn metadata_path(&self) -> String {
        format!("{}/metadata.json", self.tile_root())
    }
}

/// The projects configuration file (`projects-config.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supabase_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supabase_anon_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
    pub projects: Vec<Project>,
    pub default_project: String,
}

impl ProjectConfig {
    pub fn from_json_str(raw: &str, path: &str) -> Result<Self, CatalogError> {
        serde_json::from_str(raw).map_err(|source| CatalogError::Parse {
            path: path.to_string(),
            source,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw, &path.display().to_string())
    }

    pub async fn fetch(gateway: &dyn Gateway, path: &str) -> Result<Self, CatalogError> {
        let raw = gateway
            .fetch_json(path)
            .await
            .map_err(|source| CatalogError::Fetch {
                path: path.to_string(),
                source,
            })?;
        serde_json::from_value(raw).map_err(|source| CatalogError::Parse {
            path: path.to_string(),
            source,
        })
    }

    /// The project selected by `defaultProject`.
    pub fn current_project(&self) -> Result<&Project, CatalogError> {
        self.projects
            .iter()
            .find(|p| p.id == self.default_project)
            .ok_or_else(|| CatalogError::NoProjectFound {
                id: self.default_project.clone(),
            })
    }

    /// Object-storage settings, if the config names a storage service.
    pub fn storage(&self) -> Option<StorageConfig> {
        let url = self.supabase_url.as_deref()?.trim();
        if url.is_empty() {
            return None;
        }
        let mut storage = StorageConfig::new(url);
        if let Some(bucket) = self.bucket.as_deref().filter(|b| !b.trim().is_empty()) {
            storage.bucket = bucket.to_string();
        }
        storage.anon_key = self.supabase_anon_key.clone();
        Some(storage)
    }
}
