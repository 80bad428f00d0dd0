//! Admin-chosen photo overrides, keyed by candidate id.
//!
//! Overrides only ever touch display fields. They are applied after
//! selection and never influence scoring or order.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::candidate::Candidate;
use crate::error::StoreError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photo_urls: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageOverrides {
    entries: BTreeMap<String, ImageOverride>,
}

impl ImageOverrides {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ImageOverride> {
        self.entries.get(id)
    }

    pub fn set(&mut self, id: impl Into<String>, image: ImageOverride) {
        self.entries.insert(id.into(), image);
    }

    pub fn remove(&mut self, id: &str) -> Option<ImageOverride> {
        self.entries.remove(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Overwrite a candidate's photos with its override, if any.
    ///
    /// A blank override URL keeps the existing main photo; an empty override
    /// list keeps the existing gallery.
    pub fn apply(&self, candidate: &mut Candidate) {
        let Some(image) = self.entries.get(&candidate.id) else {
            return;
        };
        if let Some(url) = image.photo_url.as_deref().filter(|u| !u.is_empty()) {
            candidate.photo_url = Some(url.to_owned());
        }
        if !image.photo_urls.is_empty() {
            candidate.photo_urls.clone_from(&image.photo_urls);
        }
    }

    #[must_use]
    pub fn apply_all(&self, mut candidates: Vec<Candidate>) -> Vec<Candidate> {
        for candidate in &mut candidates {
            self.apply(candidate);
        }
        candidates
    }

    /// Read overrides from a JSON file. A missing file yields an empty set.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(StoreError::Io {
                    path: path.display().to_string(),
                    source: e,
                })
            }
        };
        serde_json::from_str(&content).map_err(|e| StoreError::Json {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Like [`ImageOverrides::load`], but a broken file is logged and
    /// treated as empty. Selection must never fail because of overrides.
    #[must_use]
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable image overrides");
            Self::default()
        })
    }

    /// Write overrides as pretty JSON, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory or file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        write_json(path, self)
    }
}

pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let body = serde_json::to_string_pretty(value).map_err(|e| StoreError::Json {
        path: path.display().to_string(),
        source: e,
    })?;
    std::fs::write(path, body).map_err(io_err)
}
