// src/engine/runtime.rs

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::errors::Result;
use crate::generate::{BuildReport, Generator};
use crate::transpile::Transpiler;

use super::{BuildEvent, ChangeBatch, RuntimeOptions};

/// How a debounce window ended.
enum BatchEnd {
    Quiet,
    Shutdown,
    ChannelClosed,
}

/// Drives the generator: one initial build, then one incremental build per
/// debounced batch of [`BuildEvent::FilesChanged`].
///
/// Builds run one after another on the blocking pool; a new batch is not
/// started until the previous build has finished.
pub struct Runtime<T: Transpiler + 'static> {
    generator: Arc<Generator<T>>,
    event_rx: mpsc::Receiver<BuildEvent>,
    options: RuntimeOptions,
    report_tx: Option<mpsc::UnboundedSender<BuildReport>>,
}

impl<T: Transpiler + 'static> fmt::Debug for Runtime<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("generator", &self.generator)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<T: Transpiler + 'static> Runtime<T> {
    pub fn new(
        generator: Arc<Generator<T>>,
        event_rx: mpsc::Receiver<BuildEvent>,
        options: RuntimeOptions,
    ) -> Self {
        Self {
            generator,
            event_rx,
            options,
            report_tx: None,
        }
    }

    /// Also send every finished [`BuildReport`] to `tx`.
    pub fn with_report_sink(mut self, tx: mpsc::UnboundedSender<BuildReport>) -> Self {
        self.report_tx = Some(tx);
        self
    }

    /// Main event loop.
    ///
    /// - Runs the initial build.
    /// - Collects `FilesChanged` events until the debounce window passes
    ///   without new events, then runs one incremental build for the batch.
    /// - Stops on `ShutdownRequested` (dropping any pending batch) or when the
    ///   event channel closes (after building what is pending).
    pub async fn run(mut self) -> Result<()> {
        info!("modgen runtime started");

        let generator = Arc::clone(&self.generator);
        if let Some(report) = self.build(move || generator.initial_build()).await {
            self.publish(report);
        }

        if self.options.exit_after_initial {
            info!("initial build finished; exiting");
            return Ok(());
        }

        let mut batch = ChangeBatch::new();
        loop {
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    info!("runtime event channel closed; exiting");
                    break;
                }
            };

            debug!(?event, "runtime received event");

            match event {
                BuildEvent::ShutdownRequested => {
                    info!("shutdown requested; stopping runtime");
                    break;
                }
                BuildEvent::FilesChanged(paths) => {
                    batch.extend(paths);
                    let end = self.collect_until_quiet(&mut batch).await;

                    if matches!(end, BatchEnd::Shutdown) {
                        if !batch.is_empty() {
                            warn!(pending = batch.len(), "shutdown requested; dropping pending changes");
                        }
                        break;
                    }

                    self.incremental(batch.take()).await;

                    if matches!(end, BatchEnd::ChannelClosed) {
                        info!("runtime event channel closed; exiting");
                        break;
                    }
                }
            }
        }

        info!("runtime exiting");
        Ok(())
    }

    async fn collect_until_quiet(&mut self, batch: &mut ChangeBatch) -> BatchEnd {
        loop {
            match timeout(self.options.debounce, self.event_rx.recv()).await {
                Ok(Some(BuildEvent::FilesChanged(paths))) => batch.extend(paths),
                Ok(Some(BuildEvent::ShutdownRequested)) => return BatchEnd::Shutdown,
                Ok(None) => return BatchEnd::ChannelClosed,
                Err(_elapsed) => return BatchEnd::Quiet,
            }
        }
    }

    async fn incremental(&mut self, paths: Vec<PathBuf>) {
        if paths.is_empty() {
            return;
        }
        debug!(changed = paths.len(), "starting incremental build");

        let generator = Arc::clone(&self.generator);
        if let Some(report) = self.build(move || generator.incremental_build(paths)).await {
            self.publish(report);
        }
    }

    /// Run one build on the blocking pool. A build task that dies is logged
    /// and skipped; the runtime keeps serving later batches.
    async fn build<F>(&self, job: F) -> Option<BuildReport>
    where
        F: FnOnce() -> BuildReport + Send + 'static,
    {
        let report = match tokio::task::spawn_blocking(job).await {
            Ok(report) => report,
            Err(err) => {
                error!("build task failed: {err}");
                return None;
            }
        };

        info!(
            kind = %report.kind,
            generated = report.generated().count(),
            failed = report.failed().count(),
            unmatched = report.unmatched,
            "build finished"
        );
        Some(report)
    }

    fn publish(&self, report: BuildReport) {
        if let Some(tx) = &self.report_tx {
            // A dropped receiver only means nobody is listening any more.
            let _ = tx.send(report);
        }
    }
}
