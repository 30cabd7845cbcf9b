//! Point queries over a flat node array.
//!
//! Descent starts at node 0 and follows `first_child + octant` until a leaf
//! is reached. Cost is bounded by the tree depth, independent of the mesh.

use glam::Vec3;

use super::node::DfNode;

/// Index of the leaf whose cube the descent for `point` ends in.
///
/// Points outside the root are routed to the nearest boundary octant, so a
/// leaf is always returned for a non-empty array.
#[inline]
pub fn find_leaf(nodes: &[DfNode], point: Vec3) -> Option<usize> {
  let mut index = 0;
  let mut node = nodes.first()?;
  while node.first_child >= 0 {
    index = node.first_child as usize + node.get_octant(point);
    node = &nodes[index];
  }
  Some(index)
}

/// Signed distance at `point`, 0 for an empty array.
///
/// The 0 sentinel is indistinguishable from a point on the surface; check
/// for an empty field first where that matters.
#[inline]
pub fn sample(nodes: &[DfNode], point: Vec3) -> f32 {
  match find_leaf(nodes, point) {
    Some(leaf) => nodes[leaf].sample(point),
    None => 0.0,
  }
}

/// Like [`sample`] but stops descending after `max_depth` levels and
/// interpolates that node's corners.
pub fn sample_to_depth(nodes: &[DfNode], point: Vec3, max_depth: u32) -> f32 {
  let Some(mut node) = nodes.first() else {
    return 0.0;
  };
  let mut depth = 0;
  while node.first_child >= 0 && depth < max_depth {
    node = &nodes[node.first_child as usize + node.get_octant(point)];
    depth += 1;
  }
  node.sample(point)
}

/// Depth of every node (root = 0), by walking child links from the root.
///
/// Nodes not reachable from the root keep depth 0.
pub fn node_depths(nodes: &[DfNode]) -> Vec<u32> {
  let mut depths = vec![0u32; nodes.len()];
  // Children are always stored after their parent
  for (index, node) in nodes.iter().enumerate() {
    if let Some(children) = node.children() {
      let child_depth = depths[index] + 1;
      for child in children {
        depths[child] = child_depth;
      }
    }
  }
  depths
}

#[cfg(test)]
mod tests {
  use rand::prelude::*;

  use super::*;
  use crate::octree::{build, BuildConfig};
  use crate::oracle::{BoxOracle, SphereOracle, SurfaceOracle};
  use crate::types::Aabb;

  fn sphere_field() -> Vec<DfNode> {
    let oracle = SphereOracle::new(1.0);
    let bounds = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
    let config = BuildConfig::default().with_max_depth(4).with_max_error(1e-5);
    build(oracle, Some(bounds), config).nodes().to_vec()
  }

  #[test]
  fn empty_array_returns_sentinel() {
    assert_eq!(find_leaf(&[], Vec3::ZERO), None);
    assert_eq!(sample(&[], Vec3::ONE), 0.0);
    assert_eq!(sample_to_depth(&[], Vec3::ONE, 3), 0.0);
    assert!(node_depths(&[]).is_empty());
  }

  #[test]
  fn single_leaf_is_sampled_directly() {
    let mut root = DfNode::new(Vec3::ZERO, 1.0);
    root.corner_distances = [1.0; 8];
    assert_eq!(find_leaf(&[root], Vec3::splat(0.3)), Some(0));
    assert_eq!(sample(&[root], Vec3::splat(0.3)), 1.0);
  }

  #[test]
  fn descent_reaches_leaf_containing_point() {
    let nodes = sphere_field();
    assert!(nodes.len() > 9);

    let mut rng = StdRng::seed_from_u64(3);
    let root = nodes[0];
    for _ in 0..500 {
      let p = root.center
        + Vec3::new(
          rng.random_range(-1.0..1.0),
          rng.random_range(-1.0..1.0),
          rng.random_range(-1.0..1.0),
        ) * root.half_extent;
      let leaf = find_leaf(&nodes, p).unwrap();
      assert!(nodes[leaf].is_leaf());
      let slack = nodes[leaf].half_extent * (1.0 + 1e-5);
      assert!((p - nodes[leaf].center).abs().max_element() <= slack);
    }
  }

  #[test]
  fn sample_to_depth_zero_uses_root() {
    let nodes = sphere_field();
    let p = Vec3::new(0.2, -0.4, 0.1);
    assert_eq!(sample_to_depth(&nodes, p, 0), nodes[0].sample(p));
    assert_eq!(sample_to_depth(&nodes, p, u32::MAX), sample(&nodes, p));
  }

  #[test]
  fn depths_follow_child_links() {
    let nodes = sphere_field();
    let depths = node_depths(&nodes);
    assert_eq!(depths[0], 0);
    assert_eq!(depths[1..9], [1; 8]);
    for (i, node) in nodes.iter().enumerate() {
      if let Some(children) = node.children() {
        for c in children {
          assert_eq!(depths[c], depths[i] + 1);
        }
      }
    }
    assert!(depths.iter().all(|&d| d <= 4));
  }

  /// Sibling leaves sharing a face agree up to their reconstruction error.
  #[test]
  fn sibling_leaves_are_nearly_continuous() {
    let oracle = BoxOracle::new(Vec3::new(0.8, 0.5, 0.6));
    let bounds = Aabb::new(Vec3::new(-0.8, -0.5, -0.6), Vec3::new(0.8, 0.5, 0.6));
    let config = BuildConfig::default().with_max_depth(4).with_max_error(1e-4);
    let field = build(oracle, Some(bounds), config);
    let nodes = field.nodes();

    let mut rng = StdRng::seed_from_u64(99);
    let mut checked = 0;
    for parent in nodes.iter().filter(|n| !n.is_leaf()) {
      let Some(children) = parent.children() else {
        continue;
      };
      let first = children.start;
      // Octants 0 and 4 share the face x = parent.center.x
      let (a, b) = (&nodes[first], &nodes[first + 4]);
      if !(a.is_leaf() && b.is_leaf()) {
        continue;
      }
      let p = Vec3::new(
        parent.center.x,
        a.center.y + rng.random_range(-1.0..1.0) * a.half_extent,
        a.center.z + rng.random_range(-1.0..1.0) * a.half_extent,
      );
      let gap = (a.sample(p) - b.sample(p)).abs();
      let truth = oracle.signed_distance(p);
      let local_error = (a.sample(p) - truth).abs() + (b.sample(p) - truth).abs();
      assert!(gap <= local_error + 1e-4, "gap {} > local error {}", gap, local_error);
      assert!(gap <= a.size(), "gap {} exceeds leaf size {}", gap, a.size());
      checked += 1;
    }
    assert!(checked > 0);
  }
}
