//! Session export.
//!
//! A finished (or abandoned) session can be written out for inspection.
//! Each session gets its own directory under the export root:
//!
//! ```text
//! <root>/<uuid>/
//!   draft.json         # The agent draft as it stood
//!   transcript.jsonl   # One message per line, in append order
//! ```
//!
//! Export is write-only: nothing reads these files back into a session.

use std::{fs, io, path::PathBuf};

// Trait must be in scope for `.write_all()` on `BufWriter`.
use io::Write;

use tracing::info;
use uuid::Uuid;

use crate::model::{AgentDraft, Message};

/// Errors that can occur while exporting.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("session already exported: {0}")]
    AlreadyExported(Uuid),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, ExportError>;

/// File-based export target.
pub struct Exporter {
    root: PathBuf,
}

impl Exporter {
    /// Creates an exporter rooted at the given directory.
    ///
    /// The directory is created if it doesn't exist.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Writes the draft and transcript of a session. Returns its directory.
    pub fn export(
        &self,
        session_id: Uuid,
        draft: &AgentDraft,
        messages: &[Message],
    ) -> Result<PathBuf> {
        let dir = self.root.join(session_id.to_string());
        if dir.exists() {
            return Err(ExportError::AlreadyExported(session_id));
        }
        fs::create_dir_all(&dir)?;

        let json = serde_json::to_string_pretty(draft)?;
        fs::write(dir.join("draft.json"), json)?;

        let file = fs::File::create(dir.join("transcript.jsonl"))?;
        let mut writer = io::BufWriter::new(file);
        for message in messages {
            let mut line = serde_json::to_string(message)?;
            line.push('\n');
            writer.write_all(line.as_bytes())?;
        }
        writer.flush()?;

        info!(dir = %dir.display(), messages = messages.len(), "session exported");
        Ok(dir)
    }
}
