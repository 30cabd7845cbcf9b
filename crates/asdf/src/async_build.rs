//! Background builds on rayon's thread pool.
//!
//! The build still runs as one sequential iterator; it just runs on a worker
//! thread. Progress ticks stream back over a channel and the finished field
//! is polled without blocking.
//!
//! # Usage
//!
//! ```ignore
//! let mut job = AsyncBuild::spawn_mesh(mesh, BuildConfig::default(), CancelToken::new());
//!
//! // Each frame:
//! for tick in job.drain_progress() {
//!     ui.set_progress(tick.progress);
//! }
//! if let Some(field) = job.poll() {
//!     asset.apply_field(field);
//! }
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::{self as channel, Receiver, TryRecvError};

use crate::field::DistanceField;
use crate::octree::{AsdfBuild, BuildConfig, BuildProgress};
use crate::oracle::SurfaceOracle;
use crate::types::{Aabb, TriangleMesh};

/// Shared flag checked by a running build at every progress checkpoint.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
  pub fn new() -> Self {
    Self::default()
  }

  /// Request cancellation. The build stops at its next checkpoint.
  pub fn cancel(&self) {
    self.0.store(true, Ordering::Release);
  }

  pub fn is_cancelled(&self) -> bool {
    self.0.load(Ordering::Acquire)
  }
}

/// Handle to a build running on rayon's thread pool.
pub struct AsyncBuild {
  progress: Receiver<BuildProgress>,
  /// Receiver for the field; `None` once it has been taken.
  result: Option<Receiver<DistanceField>>,
  cancel: CancelToken,
  latest: Option<BuildProgress>,
}

impl AsyncBuild {
  /// Start building `oracle` over `bounds`.
  pub fn spawn<O>(oracle: O, bounds: Option<Aabb>, config: BuildConfig, cancel: CancelToken) -> Self
  where
    O: SurfaceOracle + Send + 'static,
  {
    Self::start(move || AsdfBuild::with_oracle(oracle, bounds, config), cancel)
  }

  /// Start building a mesh. Indexing the mesh also happens on the worker.
  pub fn spawn_mesh(mesh: impl Into<Arc<TriangleMesh>>, config: BuildConfig, cancel: CancelToken) -> Self {
    let mesh = mesh.into();
    Self::start(move || AsdfBuild::from_mesh(mesh, config), cancel)
  }

  fn start<O, F>(prepare: F, cancel: CancelToken) -> Self
  where
    O: SurfaceOracle + 'static,
    F: FnOnce() -> AsdfBuild<O> + Send + 'static,
  {
    let (progress_tx, progress_rx) = channel::unbounded();
    let (result_tx, result_rx) = channel::bounded(1);
    let token = cancel.clone();

    rayon::spawn(move || {
      let mut build = prepare();
      while let Some(tick) = build.next() {
        // Receiver dropped = nobody is watching, keep building
        let _ = progress_tx.send(tick);
        if token.is_cancelled() {
          break;
        }
      }
      let _ = result_tx.send(build.cancel());
    });

    Self {
      progress: progress_rx,
      result: Some(result_rx),
      cancel,
      latest: None,
    }
  }

  /// Ask the worker to stop at its next checkpoint. The field it returns
  /// is flagged incomplete.
  pub fn cancel(&self) {
    self.cancel.cancel();
  }

  pub fn token(&self) -> &CancelToken {
    &self.cancel
  }

  /// True until the field has been taken.
  pub fn is_busy(&self) -> bool {
    self.result.is_some()
  }

  /// Take every progress tick received so far.
  pub fn drain_progress(&mut self) -> Vec<BuildProgress> {
    let ticks: Vec<BuildProgress> = self.progress.try_iter().collect();
    if let Some(last) = ticks.last() {
      self.latest = Some(last.clone());
    }
    ticks
  }

  /// Most recent tick seen by [`drain_progress`](Self::drain_progress).
  pub fn latest_progress(&self) -> Option<&BuildProgress> {
    self.latest.as_ref()
  }

  /// Take the field if the worker has finished (non-blocking).
  pub fn poll(&mut self) -> Option<DistanceField> {
    let receiver = self.result.as_ref()?;

    match receiver.try_recv() {
      Ok(field) => {
        self.result = None;
        Some(field)
      }
      Err(TryRecvError::Empty) => None,
      Err(TryRecvError::Disconnected) => {
        self.result = None;
        None
      }
    }
  }

  /// Block until the worker finishes.
  pub fn wait(mut self) -> Option<DistanceField> {
    self.result.take()?.recv().ok()
  }
}
