//! Plugin options
//!
//! Options are plain serde data so they can be embedded in a bundler
//! configuration. [`TsconfigPathsOptions::from_env`] layers the environment
//! on top of the defaults with `figment`.

use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{PathsError, Result};
use crate::host::default_extensions;
use crate::logging::LogLevel;
use crate::tsconfig::{TSCONFIG_FILE_NAME, find_config_file};

/// Environment variable naming the tsconfig to load, as understood by ts-node
pub const TS_NODE_PROJECT: &str = "TS_NODE_PROJECT";

/// Configuration for the tsconfig paths plugin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TsconfigPathsOptions {
    /// Explicit tsconfig to load
    ///
    /// When unset, the nearest `tsconfig.json` above the working directory
    /// is used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tsconfig_path: Option<PathBuf>,

    /// Diagnostic verbosity
    pub log_level: LogLevel,

    /// Redirect unaliased imports that land on a `.d.ts` to the `.js`/`.jsx`
    /// file next to it
    pub retarget_declarations: bool,

    /// Extensions probed when resolving a substituted candidate, in order
    pub extensions: Vec<String>,
}

impl Default for TsconfigPathsOptions {
    fn default() -> Self {
        Self {
            tsconfig_path: None,
            log_level: LogLevel::default(),
            retarget_declarations: true,
            extensions: default_extensions(),
        }
    }
}

impl TsconfigPathsOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `TS_NODE_PROJECT`
    pub fn from_env() -> Result<Self> {
        Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(
                Env::raw()
                    .only(&[TS_NODE_PROJECT])
                    .map(|_| "tsconfigPath".into())
                    .lowercase(false),
            )
            .extract()
            .map_err(|e| PathsError::InvalidOptions(e.to_string()))
    }

    pub fn with_tsconfig_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.tsconfig_path = Some(path.into());
        self
    }

    pub fn with_log_level(mut self, log_level: LogLevel) -> Self {
        self.log_level = log_level;
        self
    }

    pub fn with_retarget_declarations(mut self, enabled: bool) -> Self {
        self.retarget_declarations = enabled;
        self
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// The tsconfig to load for a build running in `cwd`.
    ///
    /// An explicit path wins (relative paths are taken from `cwd`). Otherwise
    /// the nearest `tsconfig.json` walking up from `cwd`, and as a last resort
    /// `cwd/tsconfig.json` so the read error names a sensible file.
    pub fn locate_tsconfig(&self, cwd: &Path) -> PathBuf {
        if let Some(path) = &self.tsconfig_path {
            return cwd.join(path);
        }

        find_config_file(cwd, TSCONFIG_FILE_NAME).unwrap_or_else(|| cwd.join(TSCONFIG_FILE_NAME))
    }
}
