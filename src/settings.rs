//! Layered runtime settings: defaults, then an optional TOML file, then
//! `DETONATION_*` environment variables.

use crate::error::Result;
use crate::utils::constants::{DEFAULT_SAMPLE, DEFAULT_SETTINGS_FILE, DEFAULT_TOP_N, ENV_PREFIX};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Default input CSV when `--input` is not given
    #[serde(default)]
    pub input: Option<PathBuf>,

    #[serde(default = "default_top_n")]
    pub top_n: usize,

    #[serde(default = "default_sample")]
    pub sample: usize,
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

fn default_sample() -> usize {
    DEFAULT_SAMPLE
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input: None,
            top_n: DEFAULT_TOP_N,
            sample: DEFAULT_SAMPLE,
        }
    }
}

impl Settings {
    /// Load settings. An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => File::from(p).required(true),
            None => File::with_name(DEFAULT_SETTINGS_FILE).required(false),
        };

        let settings = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        Ok(settings)
    }
}
