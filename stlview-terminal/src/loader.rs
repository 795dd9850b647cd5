/// Asynchronous mesh loading on a background thread.
///
/// The loader reads the source in chunks and reports over a channel so the
/// frame loop can drain progress without blocking. Failures travel the same
/// channel; nothing here panics or propagates an error past the task.
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{unbounded, Receiver, Sender};
use stlview_core::{stl, Mesh, StlError};
use thiserror::Error;

const CHUNK_SIZE: usize = 64 * 1024;

/// Terminal failure of a load attempt
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {source_path}: {source}")]
    Io {
        source_path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {source_path}: {source}")]
    Parse {
        source_path: String,
        #[source]
        source: StlError,
    },
}

/// Events emitted by an in-flight load
#[derive(Debug)]
pub enum LoadEvent {
    /// Bytes read so far; `total` is known when the source reports a size
    Progress { loaded: u64, total: Option<u64> },
    Complete(Mesh),
    Failed(LoadError),
}

/// Handle to an in-flight load. Events are drained via `events()`; the task
/// can be cancelled, after which it sends nothing further. Dropping the
/// handle detaches the thread.
pub struct LoadTask {
    events: Receiver<LoadEvent>,
    cancelled: Arc<AtomicBool>,
}

impl LoadTask {
    pub fn events(&self) -> &Receiver<LoadEvent> {
        &self.events
    }

    /// Try to receive the next event without blocking.
    pub fn try_next(&self) -> Option<LoadEvent> {
        self.events.try_recv().ok()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}

/// Start loading an STL source on a background thread.
pub fn spawn_load(source: PathBuf) -> LoadTask {
    let (tx, rx) = unbounded();
    let cancelled = Arc::new(AtomicBool::new(false));
    let flag = cancelled.clone();

    thread::spawn(move || run_load(source, tx, flag));

    LoadTask {
        events: rx,
        cancelled,
    }
}

fn run_load(source: PathBuf, tx: Sender<LoadEvent>, cancelled: Arc<AtomicBool>) {
    let source_path = source.display().to_string();

    let io_err = |e: std::io::Error| LoadError::Io {
        source_path: source_path.clone(),
        source: e,
    };

    let mut file = match File::open(&source) {
        Ok(file) => file,
        Err(e) => {
            let _ = tx.send(LoadEvent::Failed(io_err(e)));
            return;
        }
    };

    let total = file.metadata().ok().map(|m| m.len());

    let mut data = Vec::new();
    let mut chunk = vec![0u8; CHUNK_SIZE];
    loop {
        if cancelled.load(Ordering::SeqCst) {
            return;
        }

        match file.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => {
                data.extend_from_slice(&chunk[..n]);
                let _ = tx.send(LoadEvent::Progress {
                    loaded: data.len() as u64,
                    total,
                });
            }
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => {
                let _ = tx.send(LoadEvent::Failed(io_err(e)));
                return;
            }
        }
    }

    if cancelled.load(Ordering::SeqCst) {
        return;
    }

    match stl::parse_stl(&data) {
        Ok(mesh) => {
            let _ = tx.send(LoadEvent::Complete(mesh));
        }
        Err(e) => {
            let _ = tx.send(LoadEvent::Failed(LoadError::Parse {
                source_path,
                source: e,
            }));
        }
    }
}
