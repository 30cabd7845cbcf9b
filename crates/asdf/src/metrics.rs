//! Bake statistics: per-build node histograms and a window of recent
//! build times.
//!
//! Recording only happens with the `metrics` feature; [`COLLECT_METRICS`]
//! switches it off at runtime. [`BakeStage`](crate::task_queue::BakeStage)
//! records every completion it produces.

use std::collections::VecDeque;
#[cfg(feature = "metrics")]
use std::sync::atomic::Ordering;
use std::sync::atomic::AtomicBool;

use crate::constants::MAX_DEPTH;
use crate::field::DistanceField;
use crate::octree::query::node_depths;

/// Levels tracked by the depth histogram (root through `MAX_DEPTH`).
pub const DEPTH_SLOTS: usize = MAX_DEPTH as usize + 1;

/// Builds kept in the timing and node count windows.
pub const WINDOW_SIZE: usize = 64;

/// Runtime switch; only consulted when the `metrics` feature is on.
pub static COLLECT_METRICS: AtomicBool = AtomicBool::new(true);

/// True if bakes should be recorded.
#[inline]
pub fn is_enabled() -> bool {
    #[cfg(feature = "metrics")]
    {
        COLLECT_METRICS.load(Ordering::Relaxed)
    }
    #[cfg(not(feature = "metrics"))]
    {
        false
    }
}

/// The last `capacity` samples, oldest evicted first.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    samples: VecDeque<u64>,
    capacity: usize,
}

impl RollingWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a sample. A zero-capacity window stays empty.
    pub fn push(&mut self, value: u64) {
        if self.capacity == 0 {
            return;
        }
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Mean of the window, 0 when empty.
    pub fn average(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<u64>() as f64 / self.samples.len() as f64
    }

    /// Largest sample in the window.
    pub fn peak(&self) -> Option<u64> {
        self.samples.iter().copied().max()
    }
}

/// Statistics accumulated over finished builds.
#[derive(Debug, Clone)]
pub struct BakeMetrics {
    /// Nodes per depth of the most recent build (index = depth).
    pub nodes_per_depth: [u32; DEPTH_SLOTS],
    /// Rolling window of build times in microseconds.
    pub build_timings: RollingWindow,
    /// Rolling window of node counts.
    pub node_counts: RollingWindow,

    /// Last build time in microseconds.
    pub last_build_us: u64,
    /// Node memory of the most recent build.
    pub last_memory_bytes: u64,
    /// Builds recorded this session.
    pub total_builds: u64,
    /// Builds that were cancelled before finishing.
    pub incomplete_builds: u64,
}

impl Default for BakeMetrics {
    fn default() -> Self {
        Self {
            nodes_per_depth: [0; DEPTH_SLOTS],
            build_timings: RollingWindow::new(WINDOW_SIZE),
            node_counts: RollingWindow::new(WINDOW_SIZE),
            last_build_us: 0,
            last_memory_bytes: 0,
            total_builds: 0,
            incomplete_builds: 0,
        }
    }
}

impl BakeMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all metrics to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Record one finished (or cancelled) build.
    pub fn record_build(&mut self, field: &DistanceField, build_time_us: u64) {
        self.nodes_per_depth = [0; DEPTH_SLOTS];
        for depth in node_depths(field.nodes()) {
            let slot = (depth as usize).min(DEPTH_SLOTS - 1);
            self.nodes_per_depth[slot] += 1;
        }

        self.build_timings.push(build_time_us);
        self.node_counts.push(field.node_count() as u64);
        self.last_build_us = build_time_us;
        self.last_memory_bytes = field.stats().memory_bytes as u64;
        self.total_builds += 1;
        if !field.is_complete() {
            self.incomplete_builds += 1;
        }
    }

    /// Average build time in milliseconds over the window.
    pub fn average_build_ms(&self) -> f64 {
        self.build_timings.average() / 1000.0
    }

    /// Slowest build in the window, in milliseconds.
    pub fn slowest_build_ms(&self) -> f64 {
        self.build_timings.peak().unwrap_or(0) as f64 / 1000.0
    }

    /// Mean node count over the window.
    pub fn average_node_count(&self) -> f64 {
        self.node_counts.average()
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::octree::{build, BuildConfig};
    use crate::oracle::SphereOracle;
    use crate::types::Aabb;

    #[test]
    fn rolling_window_evicts_oldest() {
        let mut window = RollingWindow::new(3);
        for v in 1..=5u64 {
            window.push(v);
        }
        assert_eq!(window.len(), 3);
        assert_eq!(window.average(), 4.0);
        assert_eq!(window.peak(), Some(5));

        let empty = RollingWindow::new(3);
        assert!(empty.is_empty());
        assert_eq!(empty.average(), 0.0);
        assert_eq!(empty.peak(), None);
    }

    #[test]
    fn zero_capacity_window_stays_empty() {
        let mut window = RollingWindow::new(0);
        window.push(1u64);
        assert!(window.is_empty());
    }

    #[test]
    fn record_build_fills_histogram() {
        let bounds = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let field = build(SphereOracle::new(1.0), Some(bounds), BuildConfig::default());

        let mut metrics = BakeMetrics::new();
        metrics.record_build(&field, 1500);

        assert_eq!(metrics.nodes_per_depth[0], 1);
        assert_eq!(
            metrics.nodes_per_depth.iter().map(|&n| n as usize).sum::<usize>(),
            field.node_count()
        );
        assert_eq!(metrics.total_builds, 1);
        assert_eq!(metrics.incomplete_builds, 0);
        assert_eq!(metrics.last_build_us, 1500);
        assert_eq!(metrics.average_build_ms(), 1.5);
        metrics.record_build(&field, 2500);
        assert_eq!(metrics.average_build_ms(), 2.0);
        assert_eq!(metrics.slowest_build_ms(), 2.5);
        assert_eq!(metrics.average_node_count(), field.node_count() as f64);
        assert!(metrics.last_memory_bytes > 0);

        metrics.reset();
        assert_eq!(metrics.total_builds, 0);
        assert!(metrics.build_timings.is_empty());
    }

    #[cfg(not(feature = "metrics"))]
    #[test]
    fn disabled_without_feature() {
        assert!(!is_enabled());
    }
}
