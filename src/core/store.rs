//! JSON file store - lock-scoped read-modify-write over a single file.
//!
//! Both ledgers sit on top of [`JsonStore`]. Every operation takes the store's mutex for
//! its whole duration, so two writers can never read the same prior state and overwrite
//! each other. Writes go to a sibling temp file which is flushed to disk and then renamed
//! over the target, so readers only ever see a complete document.

use std::path::{Path, PathBuf};

use serde::{Serialize, de::DeserializeOwned};
use tokio::{io::AsyncWriteExt, sync::Mutex};
use tracing::{debug, info};

use crate::errors::{Error, Result};

/// What a [`JsonStore::transact`] closure decided to do with the loaded document.
#[derive(Debug)]
pub enum Commit<R> {
    /// Persist the mutated document, then return the value.
    Write(R),
    /// Leave the file untouched and return the value.
    Skip(R),
}

/// A JSON document on disk guarded by an in-process mutex.
#[derive(Debug)]
pub struct JsonStore<T> {
    path: PathBuf,
    lock: Mutex<()>,
    _document: std::marker::PhantomData<fn() -> T>,
}

impl<T> JsonStore<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Opens the store, creating the file with `empty` if it does not exist.
    ///
    /// An existing file must parse as `T`; a corrupt file is reported as
    /// [`Error::LedgerCorrupt`] and left as it is.
    pub async fn open(path: impl Into<PathBuf>, empty: T) -> Result<Self> {
        let store = Self {
            path: path.into(),
            lock: Mutex::new(()),
            _document: std::marker::PhantomData,
        };

        if tokio::fs::try_exists(&store.path).await? {
            debug!("Validating existing ledger file {:?}", store.path);
            store.read().await?;
        } else {
            if let Some(parent) = store.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await?;
            }
            store.write(&empty).await?;
            info!("Created empty ledger file {:?}", store.path);
        }

        Ok(store)
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the current document.
    pub async fn load(&self) -> Result<T> {
        let _guard = self.lock.lock().await;
        self.read().await
    }

    /// Runs a read-modify-write sequence under the store lock.
    ///
    /// The closure sees the freshly loaded document. If it returns [`Commit::Write`] the
    /// document is persisted before this call returns; if the write fails, the error is
    /// returned and the caller must treat the mutation as not applied. An `Err` from the
    /// closure aborts without touching the file.
    pub async fn transact<R>(&self, f: impl FnOnce(&mut T) -> Result<Commit<R>>) -> Result<R> {
        let _guard = self.lock.lock().await;
        let mut document = self.read().await?;
        match f(&mut document)? {
            Commit::Write(value) => {
                self.write(&document).await?;
                Ok(value)
            }
            Commit::Skip(value) => Ok(value),
        }
    }

    async fn read(&self) -> Result<T> {
        let bytes = tokio::fs::read(&self.path).await?;
        serde_json::from_slice(&bytes).map_err(|e| Error::LedgerCorrupt {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }

    async fn write(&self, document: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(document).map_err(|e| Error::LedgerWrite {
            path: self.path.clone(),
            source: std::io::Error::other(e),
        })?;

        let staging = staging_path(&self.path);
        let persist = async {
            let mut file = tokio::fs::File::create(&staging).await?;
            file.write_all(&bytes).await?;
            file.sync_all().await?;
            drop(file);
            tokio::fs::rename(&staging, &self.path).await
        };

        if let Err(source) = persist.await {
            // Best effort: a stale staging file is harmless but untidy.
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(Error::LedgerWrite {
                path: self.path.clone(),
                source,
            });
        }

        debug!("Persisted {} bytes to {:?}", bytes.len(), self.path);
        Ok(())
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
