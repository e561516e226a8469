use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    error::{Error, Result},
    types::Config,
};

use super::ConfigStore;

pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        LocalStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for LocalStore {
    fn load(&self) -> Result<Config> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            Error::storage(format!("cannot read {}: {}", self.path.display(), e))
        })?;
        Ok(toml::from_str(&content)?)
    }

    fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // write next to the target, then rename over it
        let content = toml::to_string_pretty(config)?;
        let tmp = self.path.with_extension("toml.tmp");
        fs::write(&tmp, content)?;
        restrict_permissions(&tmp)?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            Error::storage(format!("cannot write {}: {}", self.path.display(), e))
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

// The file holds the client secret and both tokens.
#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
