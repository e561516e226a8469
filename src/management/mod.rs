//! Config stores.
//!
//! A run loads the [`Config`] at the start and saves it at the end, so the
//! tokens minted or refreshed along the way survive until the next run. Two
//! interchangeable backends implement [`ConfigStore`]:
//!
//! - [`LocalStore`] - a TOML file on disk
//! - [`CloudStore`] - an object in Google Cloud Storage, encrypted with a
//!   Cloud KMS key
//!
//! The entry points pick one through [`StoreOptions`]; the rest of the crate only
//! sees the trait. Stores do no locking: concurrent load/save cycles must be
//! serialized by the caller.

mod cloud;
mod local;

use std::path::PathBuf;

use clap::ValueEnum;

use crate::{config, error::Result, types::Config};

pub use cloud::{CloudStore, GcpEndpoints};
pub use local::LocalStore;

pub trait ConfigStore: Send + Sync {
    fn load(&self) -> Result<Config>;
    fn save(&self, config: &Config) -> Result<()>;

    /// Short human-readable location, used in log lines.
    fn describe(&self) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    /// TOML file on the local disk
    Local,
    /// KMS-encrypted object in Google Cloud Storage
    Cloud,
}

/// Which store to open, as chosen on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    pub kind: StoreKind,
    /// Path used by the local store.
    pub config_file: PathBuf,
}

impl StoreOptions {
    pub fn new(kind: StoreKind, config_file: Option<PathBuf>) -> Self {
        Self {
            kind,
            config_file: config_file.unwrap_or_else(config::config_file),
        }
    }

    /// Opens the store. The cloud store reads its settings from the environment.
    pub fn open(&self) -> Result<Box<dyn ConfigStore>> {
        Ok(match self.kind {
            StoreKind::Local => Box::new(LocalStore::new(&self.config_file)),
            StoreKind::Cloud => Box::new(CloudStore::from_env()?),
        })
    }
}
