//! Save/load persistence
//!
//! Features:
//! - Versioned JSON envelope ([`SaveBlob`])
//! - Atomic file writes (tmp → rename)
//! - Corruption detection (empty/malformed blobs surface as `Corrupt`)
//! - Version mismatch loads anyway, with a compatibility warning
//! - Periodic auto-save throttle

pub mod autosave;
pub mod envelope;
pub mod store;

pub use autosave::AutoSave;
pub use envelope::{SAVE_VERSION, SaveBlob};
pub use store::{BlobStore, FileStore, MemoryStore};

pub use crate::sim::CardSnapshot;

use crate::error::{Error, Result};

/// A successfully decoded save
#[derive(Debug, Clone)]
pub struct LoadedSave {
    pub blob: SaveBlob,
    /// Set when the save was written by a different version
    pub version_warning: Option<String>,
}

/// Persistence adapter over a single blob store
pub struct Persistence {
    store: Box<dyn BlobStore>,
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence").finish_non_exhaustive()
    }
}

impl Default for Persistence {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl Persistence {
    pub fn new(store: impl BlobStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Serialize and write the blob
    ///
    /// # Errors
    ///
    /// Returns `Io` if the store rejects the write.
    pub fn save(&mut self, blob: &SaveBlob) -> Result<()> {
        let bytes = blob.to_bytes()?;
        self.store.write(&bytes).map_err(Error::Io)?;
        log::info!(
            "Game saved ({}x{}, {} of {} cards matched, score {})",
            blob.board_width,
            blob.board_height,
            blob.matched_cards(),
            blob.cards.len(),
            blob.score.score
        );
        Ok(())
    }

    /// Read and decode the saved blob
    ///
    /// # Errors
    ///
    /// `NotFound` when nothing is saved, `Corrupt` when the data cannot be
    /// decoded, `Io` for other read failures.
    pub fn load(&self) -> Result<LoadedSave> {
        let bytes = self.store.read()?.ok_or(Error::NotFound)?;
        let blob = SaveBlob::from_bytes(&bytes).inspect_err(|e| {
            log::warn!("Discarding unreadable save: {}", e);
        })?;

        let version_warning = if blob.is_current_version() {
            None
        } else {
            let warning = format!(
                "save written by version {}, running {}",
                blob.game_version, SAVE_VERSION
            );
            log::warn!("Loading save from another version: {}", warning);
            Some(warning)
        };

        log::info!(
            "Found saved game ({}x{}, score {})",
            blob.board_width,
            blob.board_height,
            blob.score.score
        );
        Ok(LoadedSave {
            blob,
            version_warning,
        })
    }

    pub fn has_save(&self) -> bool {
        matches!(self.store.read(), Ok(Some(_)))
    }

    /// Remove the saved game
    pub fn clear(&mut self) -> Result<()> {
        self.store.remove().map_err(Error::Io)?;
        log::info!("Saved game cleared");
        Ok(())
    }
}
