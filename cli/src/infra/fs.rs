//! Filesystem infrastructure: implements the `LocalFs` port.

use std::path::Path;

use anyhow::Result;

use crate::domain::ProvisionError;

/// Production filesystem implementation of `LocalFs`.
pub struct LocalFs;

impl crate::application::ports::LocalFs for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path).map_err(|source| {
            ProvisionError::Filesystem {
                path: path.to_path_buf(),
                source,
            }
            .into()
        })
    }
}
