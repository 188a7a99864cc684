//! Material and hardware price lists.

pub mod entry;
pub mod loader;
pub mod lookup;

pub use entry::{CatalogEntry, CatalogSource, Prices, ProductType};
pub use loader::load_directory;
pub use lookup::{Catalog, CatalogMatch, MatchTier, Quote};

use crate::error::CatalogError;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

/// Loads the catalog directory on first use and keeps it for the process lifetime.
///
/// Concurrent first callers parse the files once; later calls only read.
#[derive(Debug)]
pub struct CatalogCache {
    dir: PathBuf,
    cell: OnceLock<Catalog>,
    init: Mutex<()>,
}

impl CatalogCache {
    #[must_use]
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            cell: OnceLock::new(),
            init: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    pub fn get(&self) -> Result<&Catalog, CatalogError> {
        if let Some(catalog) = self.cell.get() {
            return Ok(catalog);
        }

        let _guard = self
            .init
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(catalog) = self.cell.get() {
            return Ok(catalog);
        }

        let catalog = load_directory(&self.dir)?;
        Ok(self.cell.get_or_init(|| catalog))
    }
}
