//! Whole-document JSON file store.
//!
//! Every mutation is a read-modify-write of the full document, serialized by
//! an async mutex per file. Writes go to a sibling temp file first and are
//! renamed into place, so readers never observe a half-written document.

use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, trace};

pub struct JsonFile<T> {
    path: PathBuf,
    write_lock: Mutex<()>,
    _doc: PhantomData<fn() -> T>,
}

impl<T> JsonFile<T>
where
    T: Serialize + DeserializeOwned + Default + Send,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
            _doc: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the document. A missing file reads as `T::default()`.
    pub async fn load(&self) -> anyhow::Result<T> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "JSON store missing, using empty document");
                return Ok(T::default());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("read {}", self.path.display()));
            }
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(T::default());
        }
        serde_json::from_slice(&bytes).with_context(|| format!("parse {}", self.path.display()))
    }

    /// Load, apply `f`, and write the result back while holding the file lock.
    /// Nothing is written when `f` fails.
    pub async fn update<R, F>(&self, f: F) -> anyhow::Result<R>
    where
        F: FnOnce(&mut T) -> anyhow::Result<R> + Send,
        R: Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.load().await?;
        let out = f(&mut doc)?;
        self.store(&doc).await?;
        Ok(out)
    }

    async fn store(&self, doc: &T) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(doc)
            .with_context(|| format!("serialize {}", self.path.display()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("create directory {}", parent.display()))?;
        }

        let tmp = self.tmp_path();
        tokio::fs::write(&tmp, &json)
            .await
            .with_context(|| format!("write {}", tmp.display()))?;
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e).with_context(|| format!("replace {}", self.path.display()));
        }
        trace!(path = %self.path.display(), bytes = json.len(), "JSON store written");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
