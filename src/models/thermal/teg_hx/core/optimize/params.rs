//! Persisted design parameters.
//!
//! Parameters are stored as a flat JSON object mapping a dotted name to an
//! array of numbers, one file per run at `<root>/<run>/parameters.json`.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// n-type to p-type leg area ratio.
pub const LEG_AREA_RATIO: &str = "te_pair.leg_area_ratio";
/// Leg area over module footprint.
pub const FILL_FRACTION: &str = "te_pair.fill_fraction";
/// Couple current in A.
pub const CURRENT: &str = "te_pair.I";
/// Leg length in m.
pub const LENGTH: &str = "te_pair.length";
/// Exhaust enhancement spacing in m.
pub const SPACING: &str = "exh.enh.spacing";

const FILE_NAME: &str = "parameters.json";

/// Errors that can occur while saving or loading parameters.
#[derive(Debug, Error)]
pub enum ParameterStoreError {
    #[error("i/o error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed parameters at {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("parameter {name:?} is missing or empty")]
    Missing { name: String },
}

/// Named arrays of numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameters(BTreeMap<String, Vec<f64>>);

impl Parameters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) {
        self.0.insert(name.into(), values);
    }

    pub fn insert_scalar(&mut self, name: impl Into<String>, value: f64) {
        self.insert(name, vec![value]);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.0.get(name).map(Vec::as_slice)
    }

    /// First value stored under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterStoreError::Missing`] if the name is absent or its
    /// array is empty.
    pub fn scalar(&self, name: &str) -> Result<f64, ParameterStoreError> {
        self.get(name)
            .and_then(|values| values.first().copied())
            .ok_or_else(|| ParameterStoreError::Missing {
                name: name.to_string(),
            })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Directory of optimization runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterStore {
    root: PathBuf,
}

impl ParameterStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of a run's parameter file.
    #[must_use]
    pub fn path(&self, run: &str) -> PathBuf {
        self.root.join(run).join(FILE_NAME)
    }

    #[must_use]
    pub fn exists(&self, run: &str) -> bool {
        self.path(run).is_file()
    }

    /// Writes a run's parameters, creating its directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterStoreError`] if the directory or file cannot be
    /// written.
    pub fn save(&self, run: &str, parameters: &Parameters) -> Result<PathBuf, ParameterStoreError> {
        let path = self.path(run);
        let dir = self.root.join(run);
        fs::create_dir_all(&dir).map_err(|source| ParameterStoreError::Io { path: dir, source })?;

        let json = serde_json::to_string_pretty(parameters).map_err(|source| {
            ParameterStoreError::Json {
                path: path.clone(),
                source,
            }
        })?;
        fs::write(&path, json).map_err(|source| ParameterStoreError::Io {
            path: path.clone(),
            source,
        })?;

        Ok(path)
    }

    /// Reads a run's parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterStoreError`] if the file cannot be read or is not a
    /// map of number arrays.
    pub fn load(&self, run: &str) -> Result<Parameters, ParameterStoreError> {
        let path = self.path(run);
        let content = fs::read_to_string(&path).map_err(|source| ParameterStoreError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ParameterStoreError::Json { path, source })
    }
}
