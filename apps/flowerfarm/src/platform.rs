//! # Platform Collaborators
//!
//! Command-line stand-ins for the document picker and the share sheet.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PathPicker            import --file data.csv   → Some(data.csv)       │
//! │                        import                   → None (cancelled)     │
//! │                                                                         │
//! │  CommandShareSheet     share_command = "xdg-open"                       │
//! │                        → runs `xdg-open <export file>`                 │
//! │                        no command configured → unavailable              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::commands::export::ShareSheet;
use crate::commands::import::DocumentPicker;

// =============================================================================
// Document Picker
// =============================================================================

/// Picker that answers with a path given up front.
#[derive(Debug, Clone, Default)]
pub struct PathPicker {
    path: Option<PathBuf>,
}

impl PathPicker {
    /// A picker that returns `path`, or cancels when `None`.
    pub fn new(path: Option<PathBuf>) -> Self {
        PathPicker { path }
    }
}

impl DocumentPicker for PathPicker {
    async fn pick(&self, mime_types: &'static [&'static str]) -> io::Result<Option<PathBuf>> {
        debug!(path = ?self.path, ?mime_types, "Picking document");
        Ok(self.path.clone())
    }
}

// =============================================================================
// Share Sheet
// =============================================================================

/// Share sheet that runs an external program with the file path.
#[derive(Debug, Clone, Default)]
pub struct CommandShareSheet {
    command: Option<String>,
}

impl CommandShareSheet {
    /// Uses `command` (program followed by optional arguments).
    pub fn new(command: Option<String>) -> Self {
        CommandShareSheet {
            command: command.filter(|c| !c.trim().is_empty()),
        }
    }
}

impl ShareSheet for CommandShareSheet {
    async fn is_available(&self) -> bool {
        self.command.is_some()
    }

    async fn share(&self, path: &Path, mime_type: &str, title: &str) -> io::Result<()> {
        let Some(ref command) = self.command else {
            return Err(io::Error::new(io::ErrorKind::Unsupported, "No share command configured"));
        };

        let mut parts = command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Empty share command"))?;

        debug!(program, ?path, mime_type, title, "Running share command");

        let status = tokio::process::Command::new(program)
            .args(parts)
            .arg(path)
            .env("FLOWERFARM_SHARE_MIME", mime_type)
            .env("FLOWERFARM_SHARE_TITLE", title)
            .status()
            .await?;

        if !status.success() {
            warn!(%status, program, "Share command failed");
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("Share command exited with {}", status),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
