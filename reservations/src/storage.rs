//! Booking persistence.
//!
//! The booking list is small and always written whole after every change.
//! Each save carries the revision of the state it was taken from; a storage
//! never lets an older revision replace a newer one.

use crate::types::Booking;
use futures::future::BoxFuture;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};

/// Errors from booking storage
#[derive(Error, Debug)]
pub enum StorageError {
    /// Reading or writing the backing file failed
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Stored data is not a valid booking list
    #[error("Invalid booking data: {0}")]
    Json(#[from] serde_json::Error),

    /// Storage refused the operation
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Where bookings are kept between runs.
///
/// Returns `BoxFuture` so the trait stays object safe.
pub trait BookingStorage: Send + Sync {
    /// Load every stored booking
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the data cannot be read or parsed.
    fn load(&self) -> BoxFuture<'_, Result<Vec<Booking>, StorageError>>;

    /// Replace the stored list with `bookings`, taken at `revision`.
    ///
    /// Revisions increase with every change. A save whose revision is not
    /// newer than the last one written is skipped.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the data cannot be written.
    fn save(
        &self,
        revision: u64,
        bookings: Vec<Booking>,
    ) -> BoxFuture<'_, Result<(), StorageError>>;
}

// ============================================================================
// JSON file
// ============================================================================

/// Bookings stored as a pretty-printed JSON array in one file.
///
/// Saves are serialized. If a load fails, the unreadable file is moved to
/// `<file>.corrupt` before the next save replaces it.
#[derive(Clone, Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    written: Arc<Mutex<u64>>,
    unreadable: Arc<AtomicBool>,
}

impl JsonFileStorage {
    /// Storage backed by the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            written: Arc::new(Mutex::new(0)),
            unreadable: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where an unreadable booking file is moved
    #[must_use]
    pub fn corrupt_path(&self) -> PathBuf {
        self.sibling(".corrupt")
    }

    fn temp_path(&self, revision: u64) -> PathBuf {
        self.sibling(&format!(".{revision}.tmp"))
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(suffix);
        self.path.with_file_name(name)
    }

    async fn read(&self) -> Result<Vec<Booking>, StorageError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No booking file yet");
                return Ok(Vec::new());
            },
            Err(error) => return Err(self.io_error(error)),
        };

        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        Ok(serde_json::from_slice(&raw)?)
    }

    async fn set_aside_unreadable(&self) -> Result<(), StorageError> {
        if !self.unreadable.load(Ordering::Acquire) {
            return Ok(());
        }

        let corrupt = self.corrupt_path();
        match tokio::fs::rename(&self.path, &corrupt).await {
            Ok(()) => {
                tracing::warn!(
                    path = %self.path.display(),
                    moved_to = %corrupt.display(),
                    "Unreadable booking file moved aside"
                );
            },
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {},
            Err(error) => return Err(self.io_error(error)),
        }
        self.unreadable.store(false, Ordering::Release);
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl BookingStorage for JsonFileStorage {
    fn load(&self) -> BoxFuture<'_, Result<Vec<Booking>, StorageError>> {
        Box::pin(async move {
            match self.read().await {
                Ok(bookings) => {
                    tracing::debug!(
                        path = %self.path.display(),
                        count = bookings.len(),
                        "Bookings loaded"
                    );
                    Ok(bookings)
                },
                Err(error) => {
                    self.unreadable.store(true, Ordering::Release);
                    Err(error)
                },
            }
        })
    }

    fn save(
        &self,
        revision: u64,
        bookings: Vec<Booking>,
    ) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            let mut written = self.written.lock().await;
            if revision <= *written {
                tracing::debug!(revision, written = *written, "Skipping stale booking snapshot");
                return Ok(());
            }

            let json = serde_json::to_vec_pretty(&bookings)?;

            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| self.io_error(e))?;
            }
            self.set_aside_unreadable().await?;

            let temp = self.temp_path(revision);
            tokio::fs::write(&temp, json)
                .await
                .map_err(|e| self.io_error(e))?;
            if let Err(error) = tokio::fs::rename(&temp, &self.path).await {
                let _ = tokio::fs::remove_file(&temp).await;
                return Err(self.io_error(error));
            }
            *written = revision;

            tracing::debug!(
                path = %self.path.display(),
                revision,
                count = bookings.len(),
                "Bookings saved"
            );
            Ok(())
        })
    }
}

// ============================================================================
// In memory
// ============================================================================

/// Keeps the last saved list in memory.
///
/// Clones share the same list. Can be switched to fail every save.
#[derive(Clone, Debug, Default)]
pub struct InMemoryBookingStorage {
    stored: Arc<RwLock<Stored>>,
    saves: Arc<AtomicUsize>,
    failing: Arc<AtomicBool>,
}

#[derive(Debug, Default)]
struct Stored {
    revision: u64,
    bookings: Vec<Booking>,
}

impl InMemoryBookingStorage {
    /// Empty storage
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-filled with `bookings`
    #[must_use]
    pub fn with_bookings(bookings: Vec<Booking>) -> Self {
        Self {
            stored: Arc::new(RwLock::new(Stored {
                revision: 0,
                bookings,
            })),
            ..Self::default()
        }
    }

    /// Make every later save fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Release);
    }

    /// Number of successful saves
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::Acquire)
    }

    /// The currently stored list
    pub async fn snapshot(&self) -> Vec<Booking> {
        self.stored.read().await.bookings.clone()
    }
}

impl BookingStorage for InMemoryBookingStorage {
    fn load(&self) -> BoxFuture<'_, Result<Vec<Booking>, StorageError>> {
        Box::pin(async move { Ok(self.stored.read().await.bookings.clone()) })
    }

    fn save(
        &self,
        revision: u64,
        bookings: Vec<Booking>,
    ) -> BoxFuture<'_, Result<(), StorageError>> {
        Box::pin(async move {
            if self.failing.load(Ordering::Acquire) {
                return Err(StorageError::Unavailable("in-memory storage set to fail".to_string()));
            }
            let mut stored = self.stored.write().await;
            if revision <= stored.revision {
                return Ok(());
            }
            *stored = Stored { revision, bookings };
            self.saves.fetch_add(1, Ordering::AcqRel);
            Ok(())
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{BillboardId, BookingId, CustomerId, SeatId};
    use chrono::NaiveDate;

    fn booking(id: u32, status: bool) -> Booking {
        Booking {
            id: BookingId::new(id),
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            customer_id: CustomerId::new(1),
            customer_name: "Juan Pérez".to_string(),
            seat_id: SeatId::new(id),
            seat_label: format!("A{id}"),
            billboard_id: BillboardId::new(1),
            movie_name: "Aventuras Cósmicas".to_string(),
            room_name: "Sala Normal".to_string(),
            status,
        }
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("bookings.json"));
        assert!(storage.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn saved_bookings_survive_a_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("bookings.json");
        let storage = JsonFileStorage::new(&path);

        storage
            .save(1, vec![booking(1, true), booking(2, false)])
            .await
            .unwrap();

        let reopened = JsonFileStorage::new(&path);
        let loaded = reopened.load().await.unwrap();
        assert_eq!(loaded, vec![booking(1, true), booking(2, false)]);
        assert!(!storage.temp_path(1).exists());

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"customerName\": \"Juan Pérez\""));
    }

    #[tokio::test]
    async fn corrupt_file_is_a_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookings.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result = JsonFileStorage::new(&path).load().await;
        assert!(matches!(result, Err(StorageError::Json(_))));
    }

    #[tokio::test]
    async fn stale_revisions_do_not_replace_newer_ones() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("bookings.json"));

        storage
            .save(2, vec![booking(1, true), booking(2, true)])
            .await
            .unwrap();
        storage.save(1, vec![booking(1, true)]).await.unwrap();

        assert_eq!(storage.load().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn unreadable_file_is_moved_aside_before_the_next_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookings.json");
        let truncated = r#"[ { "id": 1, "date": "2025-01-01", "#;
        std::fs::write(&path, truncated).unwrap();

        let storage = JsonFileStorage::new(&path);
        assert!(storage.load().await.is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), truncated);

        storage.save(1, vec![booking(9, true)]).await.unwrap();

        assert_eq!(
            std::fs::read_to_string(storage.corrupt_path()).unwrap(),
            truncated
        );
        assert_eq!(storage.load().await.unwrap(), vec![booking(9, true)]);
    }

    #[tokio::test]
    async fn readable_file_is_never_moved_aside() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("bookings.json"));

        storage.save(1, vec![booking(1, true)]).await.unwrap();
        storage.load().await.unwrap();
        storage.save(2, Vec::new()).await.unwrap();

        assert!(!storage.corrupt_path().exists());
    }

    #[tokio::test]
    async fn in_memory_storage_can_fail_saves() {
        let storage = InMemoryBookingStorage::with_bookings(vec![booking(1, true)]);
        storage.set_failing(true);
        assert!(storage.save(1, Vec::new()).await.is_err());
        assert_eq!(storage.load().await.unwrap().len(), 1);

        storage.set_failing(false);
        storage.save(1, Vec::new()).await.unwrap();
        assert_eq!(storage.save_count(), 1);
        assert!(storage.snapshot().await.is_empty());

        storage.save(1, vec![booking(2, true)]).await.unwrap();
        assert_eq!(storage.save_count(), 1);
        assert!(storage.snapshot().await.is_empty());
    }
}
