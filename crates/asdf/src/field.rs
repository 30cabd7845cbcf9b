//! DistanceField - the immutable result of a build.
//!
//! Readers share a field through `Arc<DistanceField>`; rebuilding produces
//! a new field that replaces the old one wholesale, so queries never observe
//! a half-written node array.

use glam::Vec3;

use crate::error::{AsdfError, AsdfResult};
use crate::octree::{query, DfNode};
use crate::types::Aabb;

/// Fallback central-difference step for fields without a leaf size.
const DEFAULT_GRADIENT_STEP: f32 = 1e-3;

/// Flat octree of distance samples plus the parameters it was built with.
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceField {
  nodes: Vec<DfNode>,
  bounds: Aabb,
  min_node_size: f32,
  max_error: f32,
  max_depth: i32,
  complete: bool,
}

/// Size and compression diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FieldStats {
  pub node_count: usize,
  pub leaf_count: usize,
  /// Deepest level present (root = 0).
  pub max_depth: u32,
  /// `node_count * size_of::<DfNode>()`.
  pub memory_bytes: usize,
  /// Samples per axis of a uniform grid at the finest node spacing.
  pub uniform_resolution: usize,
  /// Bytes of that uniform grid at one `f32` per sample.
  pub uniform_bytes: usize,
  /// `uniform_bytes / memory_bytes`, 0 for an empty field.
  pub compression_ratio: f32,
}

impl DistanceField {
  /// A field with no nodes. Samples everywhere as 0.
  pub fn empty(max_error: f32, max_depth: i32) -> Self {
    Self::from_nodes_unchecked(Vec::new(), max_error, max_depth, true)
  }

  /// Wrap a node array after checking it with [`validate_nodes`].
  pub fn from_nodes(
    nodes: Vec<DfNode>,
    max_error: f32,
    max_depth: i32,
    complete: bool,
  ) -> AsdfResult<Self> {
    validate_nodes(&nodes)?;
    Ok(Self::from_nodes_unchecked(nodes, max_error, max_depth, complete))
  }

  /// Wrap a node array produced by the builder. Bounds are the root cube,
  /// `min_node_size` is twice the smallest half-extent present.
  pub(crate) fn from_nodes_unchecked(
    nodes: Vec<DfNode>,
    max_error: f32,
    max_depth: i32,
    complete: bool,
  ) -> Self {
    let bounds = nodes.first().map_or_else(Aabb::default, DfNode::bounds);
    let min_node_size = nodes
      .iter()
      .map(|n| n.half_extent)
      .reduce(f32::min)
      .map_or(0.0, |h| h * 2.0);

    Self {
      nodes,
      bounds,
      min_node_size,
      max_error,
      max_depth,
      complete,
    }
  }

  pub fn nodes(&self) -> &[DfNode] {
    &self.nodes
  }

  pub fn node_count(&self) -> usize {
    self.nodes.len()
  }

  /// True if the field has no nodes and cannot answer queries.
  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  /// Root cube; zero-sized for an empty field.
  pub fn bounds(&self) -> Aabb {
    self.bounds
  }

  /// Side length of the smallest node.
  pub fn min_node_size(&self) -> f32 {
    self.min_node_size
  }

  pub fn max_error(&self) -> f32 {
    self.max_error
  }

  pub fn max_depth(&self) -> i32 {
    self.max_depth
  }

  /// False if the build was stopped before the queue drained.
  pub fn is_complete(&self) -> bool {
    self.complete
  }

  /// Approximate signed distance at `point`. Returns 0 for an empty field.
  #[inline]
  pub fn sample(&self, point: Vec3) -> f32 {
    query::sample(&self.nodes, point)
  }

  /// Index of the leaf answering queries at `point`.
  #[inline]
  pub fn find_leaf(&self, point: Vec3) -> Option<usize> {
    query::find_leaf(&self.nodes, point)
  }

  /// Level of node `index` (root = 0), `None` if out of range.
  pub fn depth_of(&self, index: usize) -> Option<u32> {
    if index >= self.nodes.len() {
      return None;
    }
    // A node's center lies strictly inside the octant of each ancestor
    let target = self.nodes[index].center;
    let mut depth = 0;
    let mut current = 0;
    while current != index {
      let node = &self.nodes[current];
      let first = usize::try_from(node.first_child).ok()?;
      current = first + node.get_octant(target);
      depth += 1;
      if current > index {
        return None;
      }
    }
    Some(depth)
  }

  pub fn leaf_count(&self) -> usize {
    self.nodes.iter().filter(|n| n.is_leaf()).count()
  }

  /// Central-difference gradient of [`sample`](Self::sample).
  pub fn gradient(&self, point: Vec3) -> Vec3 {
    if self.is_empty() {
      return Vec3::ZERO;
    }
    let h = if self.min_node_size > 0.0 {
      self.min_node_size * 0.5
    } else {
      DEFAULT_GRADIENT_STEP
    };
    let dx = self.sample(point + Vec3::X * h) - self.sample(point - Vec3::X * h);
    let dy = self.sample(point + Vec3::Y * h) - self.sample(point - Vec3::Y * h);
    let dz = self.sample(point + Vec3::Z * h) - self.sample(point - Vec3::Z * h);
    Vec3::new(dx, dy, dz) / (2.0 * h)
  }

  /// Unit surface normal direction at `point`, zero where undefined.
  pub fn normal(&self, point: Vec3) -> Vec3 {
    self.gradient(point).normalize_or_zero()
  }

  pub fn stats(&self) -> FieldStats {
    let node_count = self.nodes.len();
    if node_count == 0 {
      return FieldStats::default();
    }

    let memory_bytes = node_count * std::mem::size_of::<DfNode>();
    let uniform_resolution = if self.min_node_size > 0.0 {
      (self.bounds.max_extent() / self.min_node_size).ceil() as usize + 1
    } else {
      1
    };
    let uniform_bytes = uniform_resolution.pow(3) * std::mem::size_of::<f32>();

    FieldStats {
      node_count,
      leaf_count: self.leaf_count(),
      max_depth: query::node_depths(&self.nodes).into_iter().max().unwrap_or(0),
      memory_bytes,
      uniform_resolution,
      uniform_bytes,
      compression_ratio: uniform_bytes as f32 / memory_bytes as f32,
    }
  }
}

/// Check the structural invariants queries rely on: finite geometry and
/// distances, positive half-extents, and every child block of 8 lying
/// after its parent and inside the array.
pub fn validate_nodes(nodes: &[DfNode]) -> AsdfResult<()> {
  let count = nodes.len();
  for (index, node) in nodes.iter().enumerate() {
    if !node.center.is_finite() || !node.half_extent.is_finite() || node.half_extent <= 0.0 {
      return Err(AsdfError::CorruptField(format!(
        "node {} has invalid geometry",
        index
      )));
    }
    if node.corner_distances.iter().any(|d| !d.is_finite()) {
      return Err(AsdfError::CorruptField(format!(
        "node {} has non-finite corner distances",
        index
      )));
    }
    if node.first_child < -1 {
      return Err(AsdfError::CorruptField(format!(
        "node {} has child index {}",
        index, node.first_child
      )));
    }
    if let Some(children) = node.children() {
      if children.start <= index || children.end > count {
        return Err(AsdfError::CorruptField(format!(
          "node {} points at children {}..{} outside 0..{} or before itself",
          index, children.start, children.end, count
        )));
      }
    }
  }
  Ok(())
}
