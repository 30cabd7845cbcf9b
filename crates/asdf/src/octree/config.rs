//! BuildConfig - parameters for octree construction.

use serde::{Deserialize, Serialize};

use crate::constants::{BOUNDS_PADDING, DEFAULT_YIELD_INTERVAL, MAX_DEPTH};
use crate::error::{AsdfError, AsdfResult};

/// Parameters controlling how far and where the octree is refined.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
  /// Mean squared reconstruction error above which a node is subdivided.
  pub max_error: f32,

  /// Deepest level children may be created at. Root is depth 0.
  /// Values <= 0 build an empty field.
  pub max_depth: i32,

  /// Nodes processed between two progress ticks.
  pub yield_interval: usize,

  /// Growth of the mesh bounds (per axis, in size) before fitting the root.
  pub bounds_padding: f32,
}

impl Default for BuildConfig {
  fn default() -> Self {
    Self {
      max_error: 0.01,
      max_depth: 3,
      yield_interval: DEFAULT_YIELD_INTERVAL,
      bounds_padding: BOUNDS_PADDING,
    }
  }
}

impl BuildConfig {
  pub fn with_max_error(mut self, max_error: f32) -> Self {
    self.max_error = max_error;
    self
  }

  pub fn with_max_depth(mut self, max_depth: i32) -> Self {
    self.max_depth = max_depth;
    self
  }

  pub fn with_yield_interval(mut self, yield_interval: usize) -> Self {
    self.yield_interval = yield_interval;
    self
  }

  pub fn with_bounds_padding(mut self, bounds_padding: f32) -> Self {
    self.bounds_padding = bounds_padding;
    self
  }

  /// True if this configuration builds nothing.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.max_depth <= 0
  }

  /// Reject parameters the builder cannot honour.
  ///
  /// A non-positive depth is accepted: it is the documented way to request
  /// an empty field.
  pub fn validate(&self) -> AsdfResult<()> {
    if !self.max_error.is_finite() || self.max_error <= 0.0 {
      return Err(AsdfError::InvalidConfig(format!(
        "max_error must be a positive finite number, got {}",
        self.max_error
      )));
    }
    if self.max_depth > MAX_DEPTH {
      return Err(AsdfError::InvalidConfig(format!(
        "max_depth {} exceeds the supported maximum of {}",
        self.max_depth, MAX_DEPTH
      )));
    }
    if self.yield_interval == 0 {
      return Err(AsdfError::InvalidConfig(
        "yield_interval must be at least 1".to_string(),
      ));
    }
    if !self.bounds_padding.is_finite() || self.bounds_padding < 0.0 {
      return Err(AsdfError::InvalidConfig(format!(
        "bounds_padding must be a non-negative finite number, got {}",
        self.bounds_padding
      )));
    }
    Ok(())
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
