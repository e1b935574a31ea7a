//! Generation lifecycle
//!
//! A generation runs on its own thread. The caller only ever shares the
//! [`GenerationHandle`], which any number of observers may poll or wait on.

use crate::config::consts::generation::ARTIFACT_PREFIX;
use crate::document::{Document, DocumentKind};
use crate::error::{DocweaveError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
enum State {
    Running,
    Completed {
        artifact: PathBuf,
        document: Document,
    },
    Failed(String),
}

impl State {
    fn is_terminal(&self) -> bool {
        !matches!(self, State::Running)
    }
}

/// Shared view of one generation
#[derive(Debug, Clone)]
pub struct GenerationHandle {
    shared: Arc<(Mutex<State>, Condvar)>,
}

impl GenerationHandle {
    pub(crate) fn running() -> Self {
        Self {
            shared: Arc::new((Mutex::new(State::Running), Condvar::new())),
        }
    }

    /// A handle that failed before any work was started
    pub(crate) fn failed_with(error: &DocweaveError) -> Self {
        let handle = Self::running();
        handle.fail(error);
        handle
    }

    fn state(&self) -> MutexGuard<'_, State> {
        // A panicking observer must not hide the outcome from the others
        self.shared.0.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn finish(&self, state: State) {
        *self.state() = state;
        self.shared.1.notify_all();
    }

    pub(crate) fn complete(&self, artifact: PathBuf, document: Document) {
        tracing::info!("Generation completed: {}", artifact.display());
        self.finish(State::Completed { artifact, document });
    }

    pub(crate) fn fail(&self, error: &DocweaveError) {
        tracing::error!("Generation failed: {}", error);
        self.finish(State::Failed(error.to_string()));
    }

    /// Finished successfully
    pub fn completed(&self) -> bool {
        matches!(*self.state(), State::Completed { .. })
    }

    /// Ended in failure
    pub fn failed(&self) -> bool {
        matches!(*self.state(), State::Failed(_))
    }

    /// No longer running, successfully or not
    pub fn finished(&self) -> bool {
        self.state().is_terminal()
    }

    /// Message of the error that ended the generation
    pub fn failure(&self) -> Option<String> {
        match &*self.state() {
            State::Failed(message) => Some(message.clone()),
            _ => None,
        }
    }

    /// Wait until the generation reaches a terminal state
    ///
    /// Returns `Ok` once it has completed or failed and
    /// [`DocweaveError::Timeout`] when `timeout` elapses first. Timing out
    /// does not stop the generation.
    pub fn block_until_completion(&self, timeout: Duration) -> Result<()> {
        let started = Instant::now();
        let (lock, condvar) = &*self.shared;
        let guard = lock.lock().unwrap_or_else(|e| e.into_inner());
        let (guard, _) = condvar
            .wait_timeout_while(guard, timeout, |state| !state.is_terminal())
            .unwrap_or_else(|e| e.into_inner());

        if guard.is_terminal() {
            Ok(())
        } else {
            Err(DocweaveError::Timeout {
                waited: started.elapsed(),
            })
        }
    }

    /// Where the finished document was written
    pub fn artifact_location(&self) -> Result<PathBuf> {
        match &*self.state() {
            State::Completed { artifact, .. } => Ok(artifact.clone()),
            State::Failed(message) => Err(DocweaveError::GenerationFailed(message.clone())),
            State::Running => Err(DocweaveError::GenerationIncomplete),
        }
    }

    /// The finished document, once completed
    pub fn document(&self) -> Option<Document> {
        match &*self.state() {
            State::Completed { document, .. } => Some(document.clone()),
            _ => None,
        }
    }
}

/// Write `document` as JSON to a fresh file in `dir`
pub(crate) fn write_artifact(document: &Document, dir: Option<&Path>) -> Result<PathBuf> {
    let kind: DocumentKind = document.kind();
    let dir = dir.map(Path::to_path_buf).unwrap_or_else(std::env::temp_dir);
    std::fs::create_dir_all(&dir)?;

    let mut file = tempfile::Builder::new()
        .prefix(ARTIFACT_PREFIX)
        .suffix(kind.file_suffix())
        .tempfile_in(&dir)?;
    file.write_all(document.to_json()?.as_bytes())?;

    let (_, path) = file.keep().map_err(|e| DocweaveError::IoError(e.error))?;
    Ok(path)
}
