//! Batch baking of independent assets.
//!
//! Following the IStage pattern: Enqueue → Tick → Completions
//!
//! Each request is one whole build. Builds run in parallel with each other
//! on rayon; a single build stays sequential.

use std::sync::Arc;

use rayon::prelude::*;
use web_time::Instant;

use crate::field::DistanceField;
#[cfg(feature = "metrics")]
use crate::metrics::{self, BakeMetrics};
use crate::octree::{build_from_mesh, BuildConfig};
use crate::types::TriangleMesh;

/// Request to bake a distance field from a mesh.
#[derive(Clone)]
pub struct BakeRequest {
  /// Unique identifier for this request
  pub id: u64,
  /// Source mesh (shared, not copied)
  pub mesh: Arc<TriangleMesh>,
  /// Build parameters
  pub config: BuildConfig,
}

/// Completed bake result.
pub struct BakeCompletion {
  /// Request ID this completion corresponds to
  pub id: u64,
  /// Built field
  pub field: Arc<DistanceField>,
  /// Wall-clock build time in microseconds
  pub build_time_us: u64,
}

/// Baking stage that processes requests in parallel.
pub struct BakeStage {
  /// Pending requests waiting to be processed
  pending: Vec<BakeRequest>,
  /// Completed results ready to be collected
  completed: Vec<BakeCompletion>,
  /// Next request ID
  next_id: u64,
  #[cfg(feature = "metrics")]
  metrics: BakeMetrics,
}

impl Default for BakeStage {
  fn default() -> Self {
    Self::new()
  }
}

impl BakeStage {
  pub fn new() -> Self {
    Self {
      pending: Vec::new(),
      completed: Vec::new(),
      next_id: 0,
      #[cfg(feature = "metrics")]
      metrics: BakeMetrics::new(),
    }
  }

  /// Enqueue a bake request, returning the assigned ID.
  ///
  /// Invalid configurations are accepted here and logged when the request
  /// is processed; they complete with an empty field.
  pub fn enqueue(&mut self, mesh: impl Into<Arc<TriangleMesh>>, config: BuildConfig) -> u64 {
    let id = self.next_id;
    self.next_id += 1;

    self.pending.push(BakeRequest {
      id,
      mesh: mesh.into(),
      config,
    });

    id
  }

  /// Process pending requests in parallel and move completions to output.
  /// Returns the number of requests processed this tick.
  #[tracing::instrument(skip_all, name = "task_queue::tick")]
  pub fn tick(&mut self) -> usize {
    if self.pending.is_empty() {
      return 0;
    }

    let requests = std::mem::take(&mut self.pending);
    let count = requests.len();

    let completions: Vec<BakeCompletion> = requests
      .into_par_iter()
      .map(|req| {
        let start = Instant::now();
        let field = match req.config.validate() {
          Ok(()) => build_from_mesh(req.mesh, req.config),
          Err(err) => {
            tracing::warn!(id = req.id, %err, "bake request rejected");
            DistanceField::empty(req.config.max_error, req.config.max_depth)
          }
        };
        let build_time_us = start.elapsed().as_micros() as u64;
        BakeCompletion {
          id: req.id,
          field: Arc::new(field),
          build_time_us,
        }
      })
      .collect();

    #[cfg(feature = "metrics")]
    if metrics::is_enabled() {
      for completion in &completions {
        self.metrics.record_build(&completion.field, completion.build_time_us);
      }
      tracing::debug!(
        average_ms = self.metrics.average_build_ms(),
        slowest_ms = self.metrics.slowest_build_ms(),
        "bake timings"
      );
    }

    tracing::debug!(count, "bake tick finished");
    self.completed.extend(completions);
    count
  }

  /// Take all completed fields.
  pub fn drain_completions(&mut self) -> Vec<BakeCompletion> {
    std::mem::take(&mut self.completed)
  }

  /// Number of pending requests.
  pub fn pending_count(&self) -> usize {
    self.pending.len()
  }

  /// Number of completed results waiting to be drained.
  pub fn completed_count(&self) -> usize {
    self.completed.len()
  }

  /// True when no work remains.
  pub fn is_idle(&self) -> bool {
    self.pending.is_empty() && self.completed.is_empty()
  }

  #[cfg(feature = "metrics")]
  pub fn metrics(&self) -> &BakeMetrics {
    &self.metrics
  }
}

#[cfg(test)]
#[path = "task_queue_test.rs"]
mod task_queue_test;
