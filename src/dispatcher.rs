// this_file: src/dispatcher.rs

//! Job dispatcher and background worker.
//!
//! A job moves through `Idle → LoadingFrame → Processing(i of N) → Finalizing`
//! and ends in `Completed` or `Failed`. The frame is loaded once and shared by
//! reference with every photo; losing it fails the whole job. Photos run one
//! at a time and a failing photo is logged and skipped. Only job-level
//! failures reach the host, as a single `error` response.
//!
//! [`Worker`] runs one dispatcher on a dedicated thread and talks to the host
//! over a pair of channels.

use crate::archive::{ArchiveBuilder, ArchiveSink};
use crate::batch::{BatchJob, FitMode, PhotoJobItem};
use crate::config::EngineOptions;
use crate::error::{Error, Result};
use crate::logging::Timer;
use crate::protocol::{Request, Response};
use crate::render::{composite_photo, decode_image, CompositeResult};
use crate::source::ByteSource;
use crossbeam_channel::{Receiver, Sender};
use image::RgbaImage;
use log::{debug, error, info, warn};
use std::fmt;
use std::thread::{self, JoinHandle};

/// Dispatcher lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Idle,
    LoadingFrame,
    Processing { current: usize, total: usize },
    Finalizing,
    Completed,
    Failed,
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobState::Idle => f.write_str("idle"),
            JobState::LoadingFrame => f.write_str("loading-frame"),
            JobState::Processing { current, total } => {
                write!(f, "processing {}/{}", current, total)
            }
            JobState::Finalizing => f.write_str("finalizing"),
            JobState::Completed => f.write_str("completed"),
            JobState::Failed => f.write_str("failed"),
        }
    }
}

/// What happened to a completed job. Not sent to the host.
#[derive(Debug, Clone, PartialEq)]
pub struct JobSummary {
    /// Photos in the job
    pub total: usize,
    /// Photos written to the archive
    pub succeeded: usize,
    /// 1-based positions of photos that failed
    pub skipped: Vec<usize>,
    /// Wall time for the whole job
    pub elapsed_ms: f64,
}

/// Runs exactly one batch job.
pub struct JobDispatcher<S> {
    source: S,
    options: EngineOptions,
    state: JobState,
}

impl<S: ByteSource> JobDispatcher<S> {
    pub fn new(source: S, options: EngineOptions) -> Self {
        Self {
            source,
            options,
            state: JobState::Idle,
        }
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    /// Run `job`, passing every response to `emit` in protocol order.
    ///
    /// On success the archive goes out in the `complete` response and the
    /// summary is returned. A dispatcher serves one job; later calls fail
    /// without emitting anything.
    pub fn run<F>(&mut self, job: &BatchJob, emit: F) -> Result<JobSummary>
    where
        F: FnMut(Response),
    {
        self.run_into(job, ArchiveBuilder::new(), emit)
    }

    fn run_into<W, F>(
        &mut self,
        job: &BatchJob,
        archive: ArchiveBuilder<W>,
        mut emit: F,
    ) -> Result<JobSummary>
    where
        W: ArchiveSink,
        F: FnMut(Response),
    {
        if self.state != JobState::Idle {
            return Err(Error::WorkerClosed(format!(
                "dispatcher already ran a job (state: {})",
                self.state
            )));
        }

        match self.execute(job, archive, &mut emit) {
            Ok((archive, summary)) => {
                self.transition(JobState::Completed);
                info!(
                    "Job complete: {}/{} photos archived ({} bytes) in {:.1}ms",
                    summary.succeeded,
                    summary.total,
                    archive.len(),
                    summary.elapsed_ms
                );
                if !summary.skipped.is_empty() {
                    warn!("Skipped photos at positions {:?}", summary.skipped);
                }
                emit(Response::Complete { archive });
                Ok(summary)
            }
            Err(e) => {
                self.transition(JobState::Failed);
                error!("Job failed: {}", e);
                emit(Response::Error {
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    fn execute<W: ArchiveSink>(
        &mut self,
        job: &BatchJob,
        mut archive: ArchiveBuilder<W>,
        emit: &mut dyn FnMut(Response),
    ) -> Result<(Vec<u8>, JobSummary)> {
        let timer = Timer::new(format!("batch of {} photos", job.photos.len()));
        job.validate_with_limit(self.options.max_photos)?;

        self.transition(JobState::LoadingFrame);
        let frame = self.load_image(&job.frame)?;
        info!(
            "Frame loaded: {}×{} from '{}'",
            frame.width(),
            frame.height(),
            job.frame
        );

        let total = job.photos.len();
        let mut skipped = Vec::new();

        for (i, item) in job.photos.iter().enumerate() {
            let current = i + 1;
            self.transition(JobState::Processing { current, total });
            emit(Response::Progress { current, total });

            match self.process_photo(current, item, &frame) {
                Ok(result) => archive.add(result.index, &result.name, &result.jpeg)?,
                Err(e) => {
                    warn!("Skipping photo {} ('{}'): {}", current, item.name, e);
                    skipped.push(current);
                }
            }
        }
        drop(frame);

        self.transition(JobState::Finalizing);
        let succeeded = archive.entry_count();
        debug!(
            "Finalizing archive: {} entries, {} payload bytes",
            succeeded,
            archive.payload_bytes()
        );
        let bytes = archive.finalize()?;

        Ok((
            bytes,
            JobSummary {
                total,
                succeeded,
                skipped,
                elapsed_ms: timer.elapsed_ms(),
            },
        ))
    }

    fn process_photo(
        &self,
        index: usize,
        item: &PhotoJobItem,
        frame: &RgbaImage,
    ) -> Result<CompositeResult> {
        let _timer = Timer::new(format!("photo {} ('{}')", index, item.name));
        if item.fit_mode != FitMode::Cover {
            debug!(
                "Photo {} requests fit mode {:?}; rendering as cover",
                index, item.fit_mode
            );
        }

        let photo = self.load_image(&item.source)?;
        composite_photo(index, item, &photo, frame, &self.options)
    }

    fn load_image(&self, reference: &str) -> Result<RgbaImage> {
        let bytes = self.source.fetch(reference)?;
        decode_image(reference, &bytes)
    }

    fn transition(&mut self, next: JobState) {
        debug!("Job state: {} -> {}", self.state, next);
        self.state = next;
    }
}

/// Handle to a background thread that serves one `start` request.
pub struct Worker {
    requests: Option<Sender<Request>>,
    responses: Receiver<Response>,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    /// Spawn the worker thread. It idles until [`Worker::start`].
    pub fn spawn<S>(source: S, options: EngineOptions) -> Result<Self>
    where
        S: ByteSource + 'static,
    {
        options.validate()?;
        let (request_tx, request_rx) = crossbeam_channel::bounded(1);
        let (response_tx, response_rx) = crossbeam_channel::unbounded();

        let handle = thread::Builder::new()
            .name("framekit-worker".to_string())
            .spawn(move || serve_one(source, options, request_rx, response_tx))?;

        Ok(Self {
            requests: Some(request_tx),
            responses: response_rx,
            handle: Some(handle),
        })
    }

    /// Send the one `start` request this worker will accept.
    pub fn start(&mut self, job: BatchJob) -> Result<()> {
        let requests = self
            .requests
            .take()
            .ok_or_else(|| Error::WorkerClosed("worker already started a job".to_string()))?;
        requests
            .send(Request::start(job))
            .map_err(|_| Error::WorkerClosed("worker thread has exited".to_string()))
    }

    /// Block for the next response; `None` once the worker is done.
    pub fn recv(&self) -> Option<Response> {
        self.responses.recv().ok()
    }

    /// Iterate responses until the worker hangs up.
    pub fn responses(&self) -> impl Iterator<Item = Response> + '_ {
        self.responses.iter()
    }

    /// Drop the worker without waiting. Responses still in flight are
    /// discarded; the thread exits once its current job ends.
    pub fn terminate(mut self) {
        self.requests.take();
        self.handle.take();
    }

    /// Wait for the worker thread to exit.
    pub fn join(mut self) -> Result<()> {
        self.requests.take();
        if let Some(handle) = self.handle.take() {
            handle
                .join()
                .map_err(|_| Error::WorkerClosed("worker thread panicked".to_string()))?;
        }
        Ok(())
    }
}

fn serve_one<S: ByteSource>(
    source: S,
    options: EngineOptions,
    requests: Receiver<Request>,
    responses: Sender<Response>,
) {
    let Ok(request) = requests.recv() else {
        debug!("Host hung up before sending start");
        return;
    };

    let job = request.into_job();
    info!("Starting job: {} photos", job.photos.len());

    let mut dispatcher = JobDispatcher::new(source, options);
    let _ = dispatcher.run(&job, |response| {
        if responses.send(response).is_err() {
            debug!("Host is gone; dropping response");
        }
    });
}
