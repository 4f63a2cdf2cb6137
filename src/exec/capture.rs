// src/exec/capture.rs

//! Concurrent capture of a child's stdout and stderr into the run log.
//!
//! Each stream gets its own Tokio task that reads line by line until EOF.
//! Lines within a stream keep their order; lines of the two streams
//! interleave in whatever order they arrive. Whether *anything* was
//! written is tracked in a shared [`CaptureState`], which must only be read
//! after [`StreamCapture::join`] returned.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::run_log::{RunLevel, RunLogger};

/// "Did the child write anything?" Monotonic: once set it stays set.
#[derive(Debug, Clone, Default)]
pub struct CaptureState {
    observed: Arc<AtomicBool>,
}

impl CaptureState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_output(&self) {
        self.observed.store(true, Ordering::Release);
    }

    pub fn any_output(&self) -> bool {
        self.observed.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

impl StreamKind {
    fn level(self) -> RunLevel {
        match self {
            StreamKind::Stdout => RunLevel::Info,
            StreamKind::Stderr => RunLevel::Error,
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamKind::Stdout => f.write_str("stdout"),
            StreamKind::Stderr => f.write_str("stderr"),
        }
    }
}

/// Handle on the running capture workers.
pub struct StreamCapture {
    state: CaptureState,
    workers: Vec<(StreamKind, JoinHandle<()>)>,
}

impl StreamCapture {
    /// Spawn one worker per present stream. Must be called right after the
    /// child is spawned so a chatty child never blocks on a full pipe.
    pub fn start<O, E>(stdout: Option<O>, stderr: Option<E>, sink: RunLogger) -> Self
    where
        O: AsyncRead + Unpin + Send + 'static,
        E: AsyncRead + Unpin + Send + 'static,
    {
        let state = CaptureState::new();
        let mut workers = Vec::with_capacity(2);

        if let Some(out) = stdout {
            let handle = tokio::spawn(drain(out, StreamKind::Stdout, sink.clone(), state.clone()));
            workers.push((StreamKind::Stdout, handle));
        }
        if let Some(err) = stderr {
            let handle = tokio::spawn(drain(err, StreamKind::Stderr, sink, state.clone()));
            workers.push((StreamKind::Stderr, handle));
        }

        Self { state, workers }
    }

    /// Wait for every worker to reach end-of-stream, then report whether any
    /// line was observed on either stream.
    pub async fn join(self) -> bool {
        for (kind, handle) in self.workers {
            if let Err(e) = handle.await {
                warn!(stream = %kind, error = %e, "capture worker did not finish cleanly");
            }
        }
        self.state.any_output()
    }
}

async fn drain<R>(reader: R, kind: StreamKind, sink: RunLogger, state: CaptureState)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    let mut lines = 0usize;

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                state.mark_output();
                lines += 1;
                let text = String::from_utf8_lossy(&buf);
                if let Err(e) = sink.write(kind.level(), text.trim_end()) {
                    // Keep draining: the child must not stall on a full pipe.
                    warn!(stream = %kind, error = %e, "failed to write captured line to run log");
                }
            }
            Err(e) => {
                let msg = format!("error reading {kind}: {e}");
                if let Err(write_err) = sink.error(&msg) {
                    warn!(stream = %kind, error = %write_err, "failed to record read error in run log");
                }
                warn!(stream = %kind, error = %e, "capture stopped early");
                break;
            }
        }
    }

    debug!(stream = %kind, lines, "capture worker finished");
}
