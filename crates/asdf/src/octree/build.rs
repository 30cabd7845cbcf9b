//! Breadth-first, error-driven octree construction.
//!
//! # Algorithm
//!
//! ```text
//! root = cube around padded mesh bounds, corners evaluated
//! queue = [root]
//! while let Some(node) = queue.pop_front():
//!     if depth < max_depth and |d(center)| < half_extent * sqrt(3):
//!         if mse(node.sample vs oracle over 19 points) > max_error:
//!             append 8 evaluated children, enqueue them
//!     advance the level counter
//!     every `yield_interval` nodes: yield progress
//! ```
//!
//! The build is an [`Iterator`] of [`BuildProgress`] ticks. Stopping early
//! leaves a consistent tree: children are appended as a finished block of 8
//! before the parent's `first_child` is written, and every node has its
//! corners evaluated at creation.

use std::collections::VecDeque;
use std::sync::Arc;

use web_time::Instant;

use super::config::BuildConfig;
use super::node::DfNode;
use crate::constants::{SAMPLE_OFFSETS, SQRT_3};
use crate::field::DistanceField;
use crate::oracle::{MeshOracle, SurfaceOracle};
use crate::types::{Aabb, TriangleMesh};

/// One progress tick emitted by [`AsdfBuild`].
#[derive(Clone, Debug, PartialEq)]
pub struct BuildProgress {
  /// Human readable status line.
  pub message: String,
  /// Estimated completion in [0, 1]; 1.0 on the final tick.
  pub progress: f32,
  /// Nodes taken off the queue so far.
  pub nodes_processed: usize,
  /// Nodes allocated so far.
  pub node_count: usize,
  /// Level currently being processed.
  pub depth: i32,
}

/// Resumable octree build over a [`SurfaceOracle`].
///
/// Each call to [`Iterator::next`] processes up to `yield_interval` nodes
/// and returns a progress tick. The iterator ends after the tick reporting
/// completion.
pub struct AsdfBuild<O> {
  oracle: O,
  config: BuildConfig,
  nodes: Vec<DfNode>,
  queue: VecDeque<u32>,
  /// Level of the nodes currently being dequeued.
  depth: i32,
  /// Nodes left in the current level before `depth` advances.
  nodes_to_next_level: usize,
  processed: usize,
  nodes_per_depth: Vec<usize>,
  last_progress: f32,
  done: bool,
  started: Instant,
}

impl AsdfBuild<MeshOracle> {
  /// Index `mesh` and prepare a build over the bounds of its indexed
  /// triangles.
  ///
  /// A mesh without a usable triangle prepares an empty build. Stray
  /// vertices outside every triangle do not grow the root.
  pub fn from_mesh(mesh: impl Into<Arc<TriangleMesh>>, config: BuildConfig) -> Self {
    let oracle = MeshOracle::new(mesh);
    let bounds = oracle.bounds();
    Self::with_oracle(oracle, bounds, config)
  }
}

impl<O: SurfaceOracle> AsdfBuild<O> {
  /// Prepare a build of `oracle` over `bounds`.
  ///
  /// `None` bounds or a non-positive `max_depth` produce a build that
  /// finishes immediately with no nodes. The root is created (and its
  /// corners evaluated) here.
  pub fn with_oracle(oracle: O, bounds: Option<Aabb>, config: BuildConfig) -> Self {
    let mut build = Self {
      oracle,
      nodes: Vec::new(),
      queue: VecDeque::new(),
      depth: 0,
      nodes_to_next_level: 0,
      processed: 0,
      nodes_per_depth: Vec::new(),
      last_progress: 0.0,
      done: false,
      started: Instant::now(),
      config,
    };

    let bounds = match bounds {
      Some(b) if b.is_valid() && !build.config.is_empty() => b,
      _ => {
        tracing::debug!(
          max_depth = build.config.max_depth,
          "nothing to build, producing an empty field"
        );
        return build;
      }
    };

    let mut padded = bounds;
    padded.expand(build.config.bounds_padding);
    let half_extent = padded.half_extents().max_element();
    let root = DfNode::evaluated(padded.center(), half_extent, &build.oracle);

    tracing::debug!(
      center = ?root.center,
      half_extent,
      max_error = build.config.max_error,
      max_depth = build.config.max_depth,
      "starting distance field build"
    );

    build.nodes.push(root);
    build.queue.push_back(0);
    build.nodes_to_next_level = 1;
    build
  }

  /// Nodes allocated so far.
  pub fn nodes(&self) -> &[DfNode] {
    &self.nodes
  }

  pub fn config(&self) -> &BuildConfig {
    &self.config
  }

  pub fn nodes_processed(&self) -> usize {
    self.processed
  }

  /// Processed node count per level (index = depth).
  pub fn nodes_per_depth(&self) -> &[usize] {
    &self.nodes_per_depth
  }

  /// Level currently being processed.
  pub fn depth(&self) -> i32 {
    self.depth
  }

  /// True once the queue has drained.
  pub fn is_done(&self) -> bool {
    self.queue.is_empty()
  }

  /// Mean squared difference between the node's trilinear reconstruction
  /// and the oracle over the sample constellation.
  ///
  /// `center_distance` stands in for the first (center) sample.
  pub fn estimate_error(&self, node: &DfNode, center_distance: f32) -> f32 {
    let mut sum = {
      let e = node.sample(node.center) - center_distance;
      e * e
    };
    for offset in &SAMPLE_OFFSETS[1..] {
      let p = node.center + *offset * node.half_extent;
      let e = node.sample(p) - self.oracle.signed_distance(p);
      sum += e * e;
    }
    sum / SAMPLE_OFFSETS.len() as f32
  }

  /// Process one queued node. Returns false when the queue is empty.
  fn step(&mut self) -> bool {
    let Some(index) = self.queue.pop_front() else {
      return false;
    };
    let node = self.nodes[index as usize];

    if self.depth < self.config.max_depth {
      let center_distance = self.oracle.signed_distance(node.center);
      if center_distance.abs() < node.half_extent * SQRT_3
        && self.estimate_error(&node, center_distance) > self.config.max_error
      {
        self.subdivide(index as usize, &node);
      }
    }

    let level = self.depth as usize;
    if self.nodes_per_depth.len() <= level {
      self.nodes_per_depth.resize(level + 1, 0);
    }
    self.nodes_per_depth[level] += 1;
    self.processed += 1;

    self.nodes_to_next_level -= 1;
    if self.nodes_to_next_level == 0 {
      self.depth += 1;
      self.nodes_to_next_level = self.queue.len();
    }
    true
  }

  /// Append the 8 children of `parent` as one block, then link it.
  fn subdivide(&mut self, index: usize, parent: &DfNode) {
    let first = self.nodes.len();
    for octant in 0..8 {
      let mut child = parent.child(octant);
      child.evaluate_corners(&self.oracle);
      self.nodes.push(child);
      self.queue.push_back((first + octant) as u32);
    }
    self.nodes[index].first_child = first as i32;
  }

  fn tick(&mut self) -> BuildProgress {
    let raw = if self.queue.is_empty() {
      1.0
    } else {
      self.processed as f32 / (self.processed + self.queue.len()) as f32
    };
    self.last_progress = self.last_progress.max(raw);

    BuildProgress {
      message: format!("Processed nodes: {}", self.processed),
      progress: self.last_progress,
      nodes_processed: self.processed,
      node_count: self.nodes.len(),
      depth: self.depth,
    }
  }

  /// Run the remaining work and return the complete field.
  #[tracing::instrument(skip_all, name = "octree::build")]
  pub fn finish(mut self) -> DistanceField {
    for _ in self.by_ref() {}
    self.into_field()
  }

  /// Stop now. The field keeps every node built so far and is flagged
  /// incomplete unless the queue had already drained.
  pub fn cancel(self) -> DistanceField {
    if !self.queue.is_empty() {
      tracing::warn!(
        nodes = self.nodes.len(),
        queued = self.queue.len(),
        "distance field build cancelled"
      );
    }
    self.into_field()
  }

  /// Convert the nodes built so far into a field.
  pub fn into_field(self) -> DistanceField {
    let complete = self.queue.is_empty();
    DistanceField::from_nodes_unchecked(self.nodes, self.config.max_error, self.config.max_depth, complete)
  }
}

impl<O: SurfaceOracle> Iterator for AsdfBuild<O> {
  type Item = BuildProgress;

  fn next(&mut self) -> Option<BuildProgress> {
    if self.done {
      return None;
    }

    for _ in 0..self.config.yield_interval.max(1) {
      if !self.step() {
        break;
      }
    }

    let tick = self.tick();
    if self.queue.is_empty() {
      self.done = true;
      tracing::debug!(
        nodes = self.nodes.len(),
        depth = self.nodes_per_depth.len(),
        elapsed_ms = self.started.elapsed().as_millis() as u64,
        "distance field build finished"
      );
    } else {
      tracing::trace!(
        processed = self.processed,
        queued = self.queue.len(),
        progress = tick.progress,
        "build checkpoint"
      );
    }
    Some(tick)
  }
}

/// Build a field from any oracle in one call.
pub fn build<O: SurfaceOracle>(oracle: O, bounds: Option<Aabb>, config: BuildConfig) -> DistanceField {
  AsdfBuild::with_oracle(oracle, bounds, config).finish()
}

/// Build a field from a mesh in one call.
pub fn build_from_mesh(mesh: impl Into<Arc<TriangleMesh>>, config: BuildConfig) -> DistanceField {
  AsdfBuild::from_mesh(mesh, config).finish()
}

#[cfg(test)]
#[path = "build_test.rs"]
mod build_test;
