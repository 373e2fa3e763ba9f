//! The save-collaborator seam.
//!
//! The engine never performs I/O. Once a session finishes and the caller
//! has read the report, the finalized Level is handed to a [`LevelSink`],
//! which assumes every orchestrator invariant already holds (unique ids, no
//! dangling references, aligned buffers) and does not re-validate.

use relevel_types::Level;

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// The sink could not persist the Level.
    #[error("save failed: {0}")]
    SaveFailed(String),
}

/// External collaborator that serializes a Level to its container format.
pub trait LevelSink {
    fn save(&mut self, level: &Level) -> Result<(), SinkError>;
}

/// Sink that keeps a deep copy of every saved Level. For tests and
/// embedding.
#[derive(Debug, Default)]
pub struct InMemorySink {
    saved: Vec<Level>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn saved(&self) -> &[Level] {
        &self.saved
    }
}

impl LevelSink for InMemorySink {
    fn save(&mut self, level: &Level) -> Result<(), SinkError> {
        self.saved.push(level.clone());
        Ok(())
    }
}
