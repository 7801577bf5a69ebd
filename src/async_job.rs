//! Background jobs polled from the UI thread.
//!
//! A job runs on its own thread inside a current-thread tokio runtime and
//! reports back over a std channel, so the egui frame loop never blocks.

use anyhow::{anyhow, Result};
use std::future::Future;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use tokio::runtime::Builder;

/// Outcome of a job spawned with [`spawn_job`], collected by polling.
///
/// The result is handed out once; later polls return `None`.
pub struct AsyncJob<T> {
    receiver: Receiver<Result<T>>,
    done: bool,
}

impl<T> AsyncJob<T> {
    fn new(receiver: Receiver<Result<T>>) -> Self {
        Self { receiver, done: false }
    }

    pub fn poll(&mut self) -> Option<Result<T>> {
        if self.done {
            return None;
        }
        let outcome = match self.receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            // The worker thread panicked before reporting.
            Err(TryRecvError::Disconnected) => Err(anyhow!("Background job exited without a result")),
        };
        self.done = true;
        Some(outcome)
    }
}

/// Run the future produced by `builder` on a dedicated thread.
pub fn spawn_job<T, FutBuilder, Fut>(builder: FutBuilder) -> AsyncJob<T>
where
    T: Send + 'static,
    FutBuilder: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T>> + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let result = match Builder::new_current_thread().enable_all().build() {
            Ok(runtime) => runtime.block_on(builder()),
            Err(e) => Err(anyhow!("Failed to create async runtime: {}", e)),
        };
        let _ = tx.send(result);
    });
    AsyncJob::new(rx)
}
