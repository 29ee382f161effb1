//! Song persistence seam
//!
//! The document store (cloud-synced or local mirror) is a
//! collaborator behind the [`SongStore`] trait. Saves after a
//! successful generation are detached: they never block or invalidate
//! the returned song, and their failures are delivered on a dedicated
//! error channel so the UI can show a non-blocking notification.

use async_trait::async_trait;
use kiy_common::Song;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use tracing::error;
use uuid::Uuid;

/// Persistence-boundary errors
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Song not found: {0}")]
    NotFound(Uuid),
}

/// Per-user song collection, keyed by the client-generated song id
#[async_trait]
pub trait SongStore: Send + Sync {
    async fn save(&self, song: &Song) -> Result<(), PersistenceError>;
    async fn delete(&self, id: Uuid) -> Result<(), PersistenceError>;
    async fn list(&self) -> Result<Vec<Song>, PersistenceError>;
}

/// Save a song without blocking the caller.
///
/// Spawns a task that writes to the store; on failure the error is
/// logged and sent on `error_tx`. The generation result the caller
/// already holds stays valid either way.
pub fn save_detached(
    store: Arc<dyn SongStore>,
    song: Song,
    error_tx: mpsc::Sender<PersistenceError>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(cause) = store.save(&song).await {
            error!(%cause, song_id = %song.id, "detached song save failed");
            // A dropped receiver means nobody is listening; the log
            // line above already recorded the failure.
            let _ = error_tx.send(cause).await;
        }
    })
}

/// In-memory store: the local-storage mirror analogue, also used as
/// the test double.
#[derive(Default)]
pub struct MemoryStore {
    songs: RwLock<Vec<Song>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SongStore for MemoryStore {
    async fn save(&self, song: &Song) -> Result<(), PersistenceError> {
        self.songs.write().await.push(song.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), PersistenceError> {
        let mut songs = self.songs.write().await;
        let before = songs.len();
        songs.retain(|s| s.id != id);
        if songs.len() == before {
            return Err(PersistenceError::NotFound(id));
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Song>, PersistenceError> {
        Ok(self.songs.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiy_common::CurationResult;
    use std::collections::BTreeMap;

    fn sample_song(title: &str) -> Song {
        Song::new(
            title,
            "jazz",
            "UklGRg==".to_string(),
            CurationResult {
                title_included: true,
                displayed_tags: vec!["jazz".to_string()],
                highlighted_features: BTreeMap::new(),
                image_included: false,
            },
        )
    }

    /// Store whose writes always fail, for error-channel tests
    struct BrokenStore;

    #[async_trait]
    impl SongStore for BrokenStore {
        async fn save(&self, _song: &Song) -> Result<(), PersistenceError> {
            Err(PersistenceError::WriteFailed("disk on fire".to_string()))
        }

        async fn delete(&self, id: Uuid) -> Result<(), PersistenceError> {
            Err(PersistenceError::NotFound(id))
        }

        async fn list(&self) -> Result<Vec<Song>, PersistenceError> {
            Err(PersistenceError::Unavailable("nope".to_string()))
        }
    }

    #[tokio::test]
    async fn memory_store_saves_lists_and_deletes() {
        let store = MemoryStore::new();
        let song = sample_song("First");
        let id = song.id;

        store.save(&song).await.unwrap();
        store.save(&sample_song("Second")).await.unwrap();
        assert_eq!(store.list().await.unwrap().len(), 2);

        store.delete(id).await.unwrap();
        let remaining = store.list().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].title, "Second");
    }

    #[tokio::test]
    async fn deleting_unknown_song_is_not_found() {
        let store = MemoryStore::new();
        let missing = Uuid::new_v4();
        assert!(matches!(
            store.delete(missing).await,
            Err(PersistenceError::NotFound(id)) if id == missing
        ));
    }

    #[tokio::test]
    async fn detached_save_reaches_the_store() {
        let store = Arc::new(MemoryStore::new());
        let (tx, mut rx) = mpsc::channel(1);

        let handle = save_detached(store.clone(), sample_song("Detached"), tx);
        handle.await.unwrap();

        assert_eq!(store.list().await.unwrap().len(), 1);
        // No error was reported.
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn detached_save_failure_is_observable_on_the_channel() {
        let (tx, mut rx) = mpsc::channel(1);

        let handle = save_detached(Arc::new(BrokenStore), sample_song("Doomed"), tx);
        handle.await.unwrap();

        assert!(matches!(
            rx.recv().await,
            Some(PersistenceError::WriteFailed(_))
        ));
    }
}
