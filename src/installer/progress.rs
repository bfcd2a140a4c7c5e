//! Pollable installation progress
//!
//! [`ProgressTracker`] is a cheap, cloneable handle. The installer drives it
//! while other threads read consistent [`ProgressSnapshot`]s at any time.
//! A tracker can also mirror every snapshot to a JSON file so another
//! process (`modsmith status`) can poll a running install.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{Result, fs};

/// Point-in-time view of an installation run
///
/// `current_module` is `Some` exactly when `in_progress` is true.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub current_module: Option<String>,
    pub completed_count: usize,
    pub total: usize,
    pub percentage: u8,
    pub in_progress: bool,
}

impl ProgressSnapshot {
    /// State before any run started
    pub fn idle() -> Self {
        Self::default()
    }

    /// True once a run reached its terminal state
    pub fn is_complete(&self) -> bool {
        !self.in_progress && self.percentage == 100
    }

    /// Read a mirrored snapshot; `None` when no run wrote one yet
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(fs::read_failed(path.display().to_string(), e.to_string())),
        };
        let snapshot = serde_json::from_str(&content)
            .map_err(|e| fs::read_failed(path.display().to_string(), e.to_string()))?;
        Ok(Some(snapshot))
    }
}

/// Half-up integer rounding of `100 * done / total`
fn percentage(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let done = done.min(total);
    let pct = (200 * done + total) / (2 * total);
    u8::try_from(pct).unwrap_or(100)
}

#[derive(Debug, Default)]
struct TrackerState {
    plan: Vec<String>,
    snapshot: ProgressSnapshot,
}

/// Shared progress state for one installer
#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    state: Arc<RwLock<TrackerState>>,
    mirror: Option<Arc<PathBuf>>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mirror every snapshot to `path`
    pub fn with_snapshot_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.mirror = Some(Arc::new(path.into()));
        self
    }

    /// Current snapshot
    pub fn snapshot(&self) -> ProgressSnapshot {
        self.state.read().snapshot.clone()
    }

    /// Start a run over `plan`
    pub fn begin(&self, plan: &[String]) {
        self.update(|state| {
            state.plan = plan.to_vec();
            state.snapshot = ProgressSnapshot {
                current_module: None,
                completed_count: 0,
                total: plan.len(),
                percentage: 0,
                in_progress: false,
            };
        });
    }

    /// Mark `plan[index]` as running
    pub fn start_module(&self, index: usize) {
        self.update(|state| {
            let total = state.plan.len();
            let Some(module) = state.plan.get(index).cloned() else {
                return;
            };
            let completed = state.snapshot.completed_count.max(index).min(total);
            state.snapshot = ProgressSnapshot {
                current_module: Some(module),
                completed_count: completed,
                total,
                percentage: percentage(completed, total),
                in_progress: true,
            };
        });
    }

    /// Count the running module as done
    ///
    /// The snapshot then points at the next planned module, so a poller
    /// never sees a finished module reported as current. After the last
    /// module it is already terminal.
    pub fn finish_module(&self) {
        self.update(|state| {
            let snapshot = &mut state.snapshot;
            snapshot.completed_count = (snapshot.completed_count + 1).min(snapshot.total);
            snapshot.percentage = percentage(snapshot.completed_count, snapshot.total);
            snapshot.current_module = state.plan.get(snapshot.completed_count).cloned();
            snapshot.in_progress = snapshot.current_module.is_some();
        });
    }

    /// Enter the terminal state, always exactly 100%
    pub fn finish(&self) {
        self.update(|state| {
            let total = state.plan.len();
            state.snapshot = ProgressSnapshot {
                current_module: None,
                completed_count: total,
                total,
                percentage: 100,
                in_progress: false,
            };
        });
    }

    fn update(&self, apply: impl FnOnce(&mut TrackerState)) {
        let snapshot = {
            let mut state = self.state.write();
            apply(&mut state);
            state.snapshot.clone()
        };
        if let Some(path) = &self.mirror {
            if let Err(e) = write_snapshot(path, &snapshot) {
                tracing::warn!(path = %path.display(), error = %e, "could not mirror progress");
            }
        }
    }
}

fn write_snapshot(path: &Path, snapshot: &ProgressSnapshot) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let json = serde_json::to_vec_pretty(snapshot)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(&json)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
