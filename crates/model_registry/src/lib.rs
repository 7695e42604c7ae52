//! Versioned model registry backed by an object store.
//!
//! Layout: `models/<name>/<version>/model.json` holds the serialized
//! artifact and `models/<name>/<version>/manifest.json` its metadata.
//! `models/<name>/production` names the version currently marked for
//! serving; only promotion writes it.

use std::sync::Arc;

use anyhow::{Context, Result};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use object_store::path::Path as ObjectStorePath;
use object_store::ObjectStore;
use serde::{Deserialize, Serialize};

/// Metadata stored alongside each model version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelManifest {
    pub name: String,
    pub version: u32,
    pub created_at: DateTime<Utc>,
    pub model_kind: String,
    /// Input/output schema of the artifact.
    pub signature: serde_json::Value,
    /// Training parameters the version was fitted with.
    pub params: serde_json::Value,
    /// Evaluation metrics recorded at training time.
    pub metrics: serde_json::Value,
}

/// A loaded model version: manifest plus raw artifact bytes.
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub manifest: ModelManifest,
    pub artifact: Bytes,
}

/// Versioned model storage over an object store.
#[derive(Clone)]
pub struct ModelRegistry {
    store: Arc<dyn ObjectStore>,
}

impl ModelRegistry {
    /// Creates a registry over the given object store.
    #[must_use]
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Returns the next dense version number for a model name.
    ///
    /// # Errors
    ///
    /// Returns an error if listing the store fails.
    pub async fn next_version(&self, name: &str) -> Result<u32> {
        Ok(self.latest_version(name).await?.map_or(1, |v| v + 1))
    }

    /// Returns the highest registered version, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if listing the store fails.
    pub async fn latest_version(&self, name: &str) -> Result<Option<u32>> {
        let prefix = ObjectStorePath::from(format!("models/{name}"));

        let listing = self
            .store
            .list_with_delimiter(Some(&prefix))
            .await
            .context("Failed to list model versions")?;

        let mut latest = None;
        for dir in listing.common_prefixes {
            let Some(part) = dir.parts().last() else {
                continue;
            };

            if let Ok(version) = part.as_ref().parse::<u32>() {
                latest = latest.max(Some(version));
            }
        }

        Ok(latest)
    }

    /// Persists an artifact and its manifest as the version named in the
    /// manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or a store write fails.
    pub async fn save_version(&self, manifest: &ModelManifest, artifact: Bytes) -> Result<()> {
        let manifest_bytes =
            serde_json::to_vec_pretty(manifest).context("Failed to serialize model manifest")?;

        self.store
            .put(&artifact_path(&manifest.name, manifest.version), artifact.into())
            .await
            .context("Failed to write model artifact")?;

        self.store
            .put(
                &manifest_path(&manifest.name, manifest.version),
                Bytes::from(manifest_bytes).into(),
            )
            .await
            .context("Failed to write model manifest")?;

        Ok(())
    }

    /// Loads the manifest of a specific version.
    ///
    /// # Errors
    ///
    /// Returns an error if the version does not exist or cannot be decoded.
    pub async fn load_manifest(&self, name: &str, version: u32) -> Result<ModelManifest> {
        let bytes = self.get_bytes(&manifest_path(name, version)).await?;

        serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to decode manifest for '{name}' version {version}"))
    }

    /// Loads a specific version: manifest and artifact bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the version does not exist or cannot be read.
    pub async fn load_version(&self, name: &str, version: u32) -> Result<LoadedModel> {
        let manifest = self.load_manifest(name, version).await?;
        let artifact = self.get_bytes(&artifact_path(name, version)).await?;

        Ok(LoadedModel { manifest, artifact })
    }

    /// Resolves the version currently marked production.
    ///
    /// # Errors
    ///
    /// Returns an error if no version has been promoted.
    pub async fn production_version(&self, name: &str) -> Result<u32> {
        let bytes = self
            .get_bytes(&alias_path(name))
            .await
            .with_context(|| format!("No production model promoted for '{name}'"))?;

        std::str::from_utf8(&bytes)
            .context("Production alias is not valid UTF-8")?
            .trim()
            .parse()
            .context("Production alias does not contain a version number")
    }

    /// Loads the model currently marked production.
    ///
    /// # Errors
    ///
    /// Returns an error if no version has been promoted or the promoted
    /// version cannot be read.
    pub async fn load_production(&self, name: &str) -> Result<LoadedModel> {
        let version = self.production_version(name).await?;
        self.load_version(name, version).await
    }

    /// Marks a version as production, replacing any previous alias.
    ///
    /// # Errors
    ///
    /// Returns an error if the version does not exist or the alias write
    /// fails.
    pub async fn promote(&self, name: &str, version: u32) -> Result<()> {
        // The version must exist before it can be served
        self.load_manifest(name, version)
            .await
            .with_context(|| format!("Cannot promote missing version {version} of '{name}'"))?;

        self.store
            .put(&alias_path(name), Bytes::from(version.to_string()).into())
            .await
            .context("Failed to write production alias")?;

        Ok(())
    }

    /// Lists all manifests for a model, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be listed or a manifest cannot
    /// be decoded.
    pub async fn list_versions(&self, name: &str) -> Result<Vec<ModelManifest>> {
        let prefix = ObjectStorePath::from(format!("models/{name}"));

        let listing = self
            .store
            .list_with_delimiter(Some(&prefix))
            .await
            .context("Failed to list model versions")?;

        let mut versions = Vec::new();
        for dir in listing.common_prefixes {
            let Some(part) = dir.parts().last() else {
                continue;
            };

            if let Ok(version) = part.as_ref().parse::<u32>() {
                versions.push(version);
            }
        }

        versions.sort_unstable_by(|a, b| b.cmp(a));

        let mut manifests = Vec::with_capacity(versions.len());
        for version in versions {
            manifests.push(self.load_manifest(name, version).await?);
        }

        Ok(manifests)
    }

    /// Reads an object fully into memory.
    async fn get_bytes(&self, path: &ObjectStorePath) -> Result<Bytes> {
        let result = self
            .store
            .get(path)
            .await
            .with_context(|| format!("Failed to read {path}"))?;

        result
            .bytes()
            .await
            .with_context(|| format!("Failed to read bytes of {path}"))
    }
}

fn artifact_path(name: &str, version: u32) -> ObjectStorePath {
    ObjectStorePath::from(format!("models/{name}/{version}/model.json"))
}

fn manifest_path(name: &str, version: u32) -> ObjectStorePath {
    ObjectStorePath::from(format!("models/{name}/{version}/manifest.json"))
}

fn alias_path(name: &str) -> ObjectStorePath {
    ObjectStorePath::from(format!("models/{name}/production"))
}
