//! Periodic background reporting with graceful stop.
//!
//! [`Reporter`] drives a [`Renderer`](crate::Renderer) from a dedicated
//! thread: one render immediately, then one every period, all in place so
//! the report keeps overwriting itself on the terminal. Stopping the
//! reporter performs exactly one final non-in-place render and blocks until
//! that write has completed, so the final report is on the sink before the
//! caller proceeds (e.g. before process exit).
//!
//! The single thread guarantees at most one render is in flight at a time.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use progresso::{Progress, Reporter};
//!
//! let progress = Arc::new(Progress::new());
//! let reporter = Reporter::spawn(
//!     Arc::clone(&progress),
//!     std::io::stdout(),
//!     Duration::from_millis(100),
//!     "Progress:",
//! );
//!
//! // ... run the actual work, calling progress.inc(...) ...
//!
//! reporter.stop(); // final static render, flushed before this returns
//! ```

use std::io::Write;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::progress::Progress;
use crate::render::Renderer;

/// Handle to a background rendering loop.
///
/// Created by [`Reporter::spawn`]. Call [`stop`](Reporter::stop) to shut the
/// loop down; dropping the handle without calling `stop` does the same.
/// Either way, the final render has completed by the time control returns.
pub struct Reporter {
    stop: Sender<()>,
    thread: Option<JoinHandle<()>>,
}

impl Reporter {
    /// Starts a thread that renders `progress` to `sink` immediately and
    /// then every `period`, in place.
    ///
    /// A failed render is logged and terminates the loop; writing to
    /// stdout/stderr is not expected to fail in practice. A hung sink write
    /// blocks the loop (no per-render timeout).
    pub fn spawn<W>(
        progress: Arc<Progress>,
        mut sink: W,
        period: Duration,
        title: impl Into<String>,
    ) -> Self
    where
        W: Write + Send + 'static,
    {
        let title = title.into();
        let (stop, stop_rx) = mpsc::channel::<()>();

        let thread = thread::spawn(move || {
            let mut renderer = Renderer::new();

            if let Err(err) = renderer.render(&progress, &mut sink, &title, true) {
                log::error!("error writing progress: {err}");
                return;
            }

            loop {
                match stop_rx.recv_timeout(period) {
                    Err(RecvTimeoutError::Timeout) => {
                        if let Err(err) = renderer.render(&progress, &mut sink, &title, true) {
                            log::error!("error writing progress: {err}");
                            return;
                        }
                    }
                    // Stop requested, or the handle was leaked and dropped.
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                        // Final report: static, no cursor movement.
                        if let Err(err) = renderer.render(&progress, &mut sink, &title, false) {
                            log::error!("error writing progress: {err}");
                        }
                        return;
                    }
                }
            }
        });

        Reporter {
            stop,
            thread: Some(thread),
        }
    }

    /// Stops the rendering loop.
    ///
    /// Sends the stop signal and waits for the thread to perform its final
    /// non-in-place render and exit. When this returns, the final report
    /// reflecting the store's state at stop time has been written to the
    /// sink.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        // Send fails only if the loop already exited on a render error.
        let _ = self.stop.send(());
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for Reporter {
    fn drop(&mut self) {
        self.shutdown();
    }
}
