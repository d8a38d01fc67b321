use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, channel};
use std::time::Duration;

use anyhow::{Context, Result};
use notify_debouncer_mini::{DebounceEventResult, Debouncer, new_debouncer, notify};

const DEBOUNCE: Duration = Duration::from_millis(300);

/// Watches the library root for file changes so images dropped into the
/// folder while the viewer is running become presentable, and deleted
/// ones stop being. Events are debounced and drained by the app once per
/// frame.
pub struct LibraryWatcher {
    // Held for its Drop; dropping it stops the watch.
    _debouncer: Debouncer<notify::RecommendedWatcher>,
    rx: Receiver<DebounceEventResult>,
}

impl LibraryWatcher {
    pub fn new(root: &Path) -> Result<Self> {
        let (tx, rx) = channel();
        let mut debouncer = new_debouncer(DEBOUNCE, tx).context("Failed to create file watcher")?;
        debouncer
            .watcher()
            .watch(root, notify::RecursiveMode::Recursive)
            .with_context(|| format!("Failed to watch {}", root.display()))?;
        Ok(Self {
            _debouncer: debouncer,
            rx,
        })
    }

    /// Paths touched since the last poll. Watch errors are swallowed; a
    /// missed event at worst delays discovery until the next change.
    pub fn poll(&self) -> Vec<PathBuf> {
        let mut touched = Vec::new();
        while let Ok(result) = self.rx.try_recv() {
            if let Ok(events) = result {
                touched.extend(events.into_iter().map(|e| e.path));
            }
        }
        touched
    }
}
