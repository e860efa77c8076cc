//! Asynchronous rasterization tagged with the generation that requested it

use crate::{RasterOutput, RasterRequest, TextRasterizer};
use glyphdust_core::{Generation, GlyphError, Result};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;

/// How a [`RasterTask`] does its work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMode {
    /// Rasterize on a worker thread; the result arrives on a later poll
    #[default]
    Background,
    /// Rasterize on the first poll, on the polling thread
    Deferred,
}

enum TaskState {
    Deferred {
        rasterizer: Arc<dyn TextRasterizer>,
        request: RasterRequest,
    },
    Pending(Receiver<Result<RasterOutput>>),
    Finished,
}

/// One in-flight rasterization.
///
/// The result is never returned from `spawn`; it is observed as a discrete
/// "image ready" event through [`RasterTask::poll`]. Dropping the task
/// cancels it: a worker that finishes afterwards sends into a closed channel
/// and its image is discarded.
pub struct RasterTask {
    generation: Generation,
    state: TaskState,
}

impl RasterTask {
    pub fn spawn(
        generation: Generation,
        request: RasterRequest,
        rasterizer: Arc<dyn TextRasterizer>,
        mode: LoadMode,
    ) -> Self {
        let state = match mode {
            LoadMode::Deferred => TaskState::Deferred {
                rasterizer,
                request,
            },
            LoadMode::Background => {
                let (tx, rx) = mpsc::channel();
                std::thread::spawn(move || {
                    let result = rasterizer.rasterize(&request);
                    // Receiver gone means the task was cancelled
                    let _ = tx.send(result);
                });
                TaskState::Pending(rx)
            }
        };
        Self { generation, state }
    }

    /// Generation this task was started for
    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, TaskState::Finished)
    }

    /// Check for the image-ready event without blocking.
    ///
    /// Returns `Some` exactly once; later polls return `None`.
    pub fn poll(&mut self) -> Option<Result<RasterOutput>> {
        match std::mem::replace(&mut self.state, TaskState::Finished) {
            TaskState::Deferred {
                rasterizer,
                request,
            } => Some(rasterizer.rasterize(&request)),
            TaskState::Pending(rx) => match rx.try_recv() {
                Ok(result) => Some(result),
                Err(TryRecvError::Empty) => {
                    self.state = TaskState::Pending(rx);
                    None
                }
                Err(TryRecvError::Disconnected) => Some(Err(worker_lost())),
            },
            TaskState::Finished => None,
        }
    }
}

fn worker_lost() -> GlyphError {
    GlyphError::RasterError("raster worker exited without a result".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BlockRasterizer;
    use glyphdust_core::CanvasSize;
    use std::time::{Duration, Instant};

    struct FailingRasterizer;

    impl TextRasterizer for FailingRasterizer {
        fn rasterize(&self, _request: &RasterRequest) -> Result<RasterOutput> {
            Err(GlyphError::RasterError("boom".into()))
        }
    }

    struct PanickingRasterizer;

    impl TextRasterizer for PanickingRasterizer {
        fn rasterize(&self, _request: &RasterRequest) -> Result<RasterOutput> {
            panic!("rasterizer crashed");
        }
    }

    fn finish(mut task: RasterTask) -> Result<RasterOutput> {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(result) = task.poll() {
                return result;
            }
            assert!(Instant::now() < deadline, "raster task never finished");
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    fn request() -> RasterRequest {
        RasterRequest::new("hi", CanvasSize::new(64, 32))
    }

    #[test]
    fn deferred_task_runs_on_first_poll_only() {
        let mut task = RasterTask::spawn(
            Generation(3),
            request(),
            Arc::new(BlockRasterizer::default()),
            LoadMode::Deferred,
        );
        assert_eq!(task.generation(), Generation(3));
        assert!(!task.is_finished());

        let out = task.poll().unwrap().unwrap();
        assert_eq!(out.image.dimensions(), (64, 32));
        assert!(task.is_finished());
        assert!(task.poll().is_none());
    }

    #[test]
    fn background_task_delivers_result() {
        let mut task = RasterTask::spawn(
            Generation(1),
            request(),
            Arc::new(BlockRasterizer::default()),
            LoadMode::Background,
        );
        let deadline = Instant::now() + Duration::from_secs(5);
        let result = loop {
            if let Some(result) = task.poll() {
                break result;
            }
            assert!(Instant::now() < deadline, "raster task never finished");
            std::thread::sleep(Duration::from_millis(1));
        };
        assert!(result.is_ok());
        assert!(task.poll().is_none());
    }

    #[test]
    fn failure_is_reported_not_panicked() {
        let task = RasterTask::spawn(
            Generation(1),
            request(),
            Arc::new(FailingRasterizer),
            LoadMode::Background,
        );
        assert!(matches!(finish(task), Err(GlyphError::RasterError(_))));
    }

    #[test]
    fn crashed_worker_becomes_an_error() {
        let task = RasterTask::spawn(
            Generation(1),
            request(),
            Arc::new(PanickingRasterizer),
            LoadMode::Background,
        );
        assert!(matches!(finish(task), Err(GlyphError::RasterError(_))));
    }
}
