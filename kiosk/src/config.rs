//! Kiosk configuration loaded via OrthoConfig.
//!
//! Values come from `KIOSK_*` environment variables or an optional config
//! file; command-line arguments only select the operation to run.

use std::ffi::OsString;
use std::path::PathBuf;

use camino::Utf8PathBuf;
use kiosk_store::PersistPolicy;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while resolving configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// OrthoConfig rejected the configuration sources.
    #[error("failed to load configuration: {message}")]
    Load {
        /// Loader error message.
        message: String,
    },
    /// No base directory was configured and the working directory is unknown.
    #[error("cannot determine the working directory: {message}")]
    CurrentDir {
        /// I/O error message.
        message: String,
    },
    /// The base directory is not valid UTF-8.
    #[error("base directory is not valid UTF-8: {path}")]
    NonUtf8BaseDir {
        /// Lossy rendering of the rejected path.
        path: String,
    },
}

/// Configuration values for the kiosk services.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "KIOSK")]
pub struct KioskSettings {
    /// Directory holding `users.json`, `TrainData/` and `Feedback/`.
    /// Defaults to the working directory.
    pub base_dir: Option<PathBuf>,
    /// Emit JSON log lines instead of human-readable text.
    #[ortho_config(default = false)]
    pub log_json: bool,
    /// Fail credential commands when `users.json` cannot be written.
    #[ortho_config(default = false)]
    pub strict_persistence: bool,
}

impl KioskSettings {
    /// Loads settings from the environment and config files only.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] when a source holds invalid values.
    pub fn load_for_process() -> Result<Self, ConfigError> {
        Self::load_from_iter([OsString::from("kiosk")]).map_err(|err| ConfigError::Load {
            message: err.to_string(),
        })
    }

    /// Resolves the base directory, falling back to the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::CurrentDir`] or [`ConfigError::NonUtf8BaseDir`].
    pub fn base_dir(&self) -> Result<Utf8PathBuf, ConfigError> {
        let path = match &self.base_dir {
            Some(path) => path.clone(),
            None => std::env::current_dir().map_err(|err| ConfigError::CurrentDir {
                message: err.to_string(),
            })?,
        };
        Utf8PathBuf::from_path_buf(path).map_err(|rejected| ConfigError::NonUtf8BaseDir {
            path: rejected.display().to_string(),
        })
    }

    /// Persistence policy for the credential store.
    #[must_use]
    pub const fn persist_policy(&self) -> PersistPolicy {
        if self.strict_persistence {
            PersistPolicy::Propagate
        } else {
            PersistPolicy::LogAndContinue
        }
    }
}
