//! Flat bounding volume hierarchy over mesh triangles.
//!
//! Nodes live in one array. Internal nodes store the index of their left
//! child; the right child always follows it. Leaves store a range into a
//! triangle permutation.

use glam::Vec3;
use smallvec::SmallVec;

use crate::types::{Aabb, TriangleMesh};

/// Maximum triangles stored in one leaf.
pub const MAX_TRIANGLES_PER_LEAF: usize = 4;

#[derive(Clone, Copy, Debug)]
struct BvhNode {
  bounds: Aabb,
  /// Leaf: first entry in `order`. Internal: index of the left child.
  start: u32,
  /// Number of triangles; 0 for internal nodes.
  count: u32,
}

impl BvhNode {
  #[inline]
  fn is_leaf(&self) -> bool {
    self.count > 0
  }
}

/// Bounding volume hierarchy answering nearest-triangle queries.
#[derive(Clone, Debug, Default)]
pub struct TriangleBvh {
  nodes: Vec<BvhNode>,
  /// Triangle indices, permuted so every leaf owns a contiguous range.
  order: Vec<u32>,
}

impl TriangleBvh {
  /// Build over the given triangle ids of `mesh` (median split on the
  /// longest centroid axis). Every id must be a triangle whose indices are
  /// in range; other triangles of `mesh` are never touched.
  pub fn build(mesh: &TriangleMesh, triangles: Vec<u32>) -> Self {
    let mut bvh = Self {
      nodes: Vec::with_capacity(triangles.len().max(1) * 2 / MAX_TRIANGLES_PER_LEAF + 1),
      order: triangles,
    };
    if bvh.order.is_empty() {
      return bvh;
    }

    // Indexed by triangle id; only ids in `order` are ever read
    let mut tri_bounds = vec![Aabb::empty(); mesh.triangle_count()];
    for &t in &bvh.order {
      let b = &mut tri_bounds[t as usize];
      for v in mesh.triangle(t as usize) {
        b.encapsulate(v);
      }
    }

    bvh.nodes.push(BvhNode {
      bounds: Aabb::empty(),
      start: 0,
      count: 0,
    });
    let len = bvh.order.len();
    bvh.fill(0, 0, len, &tri_bounds);
    bvh
  }

  /// Populate node `slot` with triangles `order[start..end]`.
  fn fill(&mut self, slot: usize, start: usize, end: usize, tri_bounds: &[Aabb]) {
    let mut bounds = Aabb::empty();
    let mut centroids = Aabb::empty();
    for &t in &self.order[start..end] {
      let b = &tri_bounds[t as usize];
      bounds.encapsulate_aabb(b);
      centroids.encapsulate(b.center());
    }

    let count = end - start;
    if count <= MAX_TRIANGLES_PER_LEAF {
      self.nodes[slot] = BvhNode {
        bounds,
        start: start as u32,
        count: count as u32,
      };
      return;
    }

    let axis = longest_axis(centroids.size());
    let mid = start + count / 2;
    self.order[start..end].select_nth_unstable_by(count / 2, |&a, &b| {
      let ca = tri_bounds[a as usize].center()[axis];
      let cb = tri_bounds[b as usize].center()[axis];
      ca.total_cmp(&cb)
    });

    let left = self.nodes.len();
    let placeholder = BvhNode {
      bounds: Aabb::empty(),
      start: 0,
      count: 0,
    };
    self.nodes.push(placeholder);
    self.nodes.push(placeholder);
    self.nodes[slot] = BvhNode {
      bounds,
      start: left as u32,
      count: 0,
    };

    self.fill(left, start, mid, tri_bounds);
    self.fill(left + 1, mid, end, tri_bounds);
  }

  /// True if the hierarchy holds no triangles.
  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  /// Number of hierarchy nodes.
  pub fn node_count(&self) -> usize {
    self.nodes.len()
  }

  /// Bounds of everything indexed.
  pub fn bounds(&self) -> Option<Aabb> {
    self.nodes.first().map(|n| n.bounds)
  }

  /// Find the triangle minimizing `distance_sq(triangle)`.
  ///
  /// `distance_sq` must return the squared distance from `point` to the
  /// triangle; subtrees whose box is already farther than the best hit are
  /// pruned. Returns `(triangle, squared distance)`.
  pub fn nearest<F>(&self, point: Vec3, mut distance_sq: F) -> Option<(u32, f32)>
  where
    F: FnMut(u32) -> f32,
  {
    if self.nodes.is_empty() {
      return None;
    }

    let mut best: Option<(u32, f32)> = None;
    let mut best_sq = f32::INFINITY;
    let mut stack: SmallVec<[u32; 64]> = SmallVec::new();
    stack.push(0);

    while let Some(index) = stack.pop() {
      let node = &self.nodes[index as usize];
      if node.bounds.distance_squared_to(point) >= best_sq {
        continue;
      }

      if node.is_leaf() {
        let range = node.start as usize..(node.start + node.count) as usize;
        for &tri in &self.order[range] {
          let d = distance_sq(tri);
          if d < best_sq {
            best_sq = d;
            best = Some((tri, d));
          }
        }
        continue;
      }

      // Push the far child first so the near one is visited first
      let left = node.start;
      let right = left + 1;
      let dl = self.nodes[left as usize].bounds.distance_squared_to(point);
      let dr = self.nodes[right as usize].bounds.distance_squared_to(point);
      if dl <= dr {
        stack.push(right);
        stack.push(left);
      } else {
        stack.push(left);
        stack.push(right);
      }
    }

    best
  }
}

#[inline]
fn longest_axis(size: Vec3) -> usize {
  if size.x >= size.y && size.x >= size.z {
    0
  } else if size.y >= size.z {
    1
  } else {
    2
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::oracle::triangle::closest_point_on_triangle;
  use crate::shapes;

  fn brute_force(mesh: &TriangleMesh, p: Vec3) -> f32 {
    (0..mesh.triangle_count())
      .map(|i| {
        let [a, b, c] = mesh.triangle(i);
        (closest_point_on_triangle(p, a, b, c).0 - p).length_squared()
      })
      .fold(f32::INFINITY, f32::min)
  }

  #[test]
  fn empty_bvh_finds_nothing() {
    let mesh = TriangleMesh::default();
    let bvh = TriangleBvh::build(&mesh, Vec::new());
    assert!(bvh.is_empty());
    assert!(bvh.nearest(Vec3::ZERO, |_| 0.0).is_none());
  }

  #[test]
  fn bounds_cover_mesh() {
    let mesh = shapes::uv_sphere(2.0, 16, 8);
    let ids: Vec<u32> = (0..mesh.triangle_count() as u32).collect();
    let bvh = TriangleBvh::build(&mesh, ids);

    let bounds = bvh.bounds().unwrap();
    for v in &mesh.vertices {
      assert!(bounds.contains_point(*v));
    }
    assert!(bvh.node_count() > 1);
  }

  #[test]
  fn nearest_matches_brute_force() {
    let mesh = shapes::uv_sphere(1.5, 24, 12);
    let ids: Vec<u32> = (0..mesh.triangle_count() as u32).collect();
    let bvh = TriangleBvh::build(&mesh, ids);

    let points = [
      Vec3::ZERO,
      Vec3::new(3.0, 0.1, -0.2),
      Vec3::new(-0.4, 1.2, 0.9),
      Vec3::new(0.0, -5.0, 0.0),
      Vec3::new(1.0, 1.0, 1.0),
    ];
    for p in points {
      let (_, d) = bvh
        .nearest(p, |t| {
          let [a, b, c] = mesh.triangle(t as usize);
          (closest_point_on_triangle(p, a, b, c).0 - p).length_squared()
        })
        .unwrap();
      let expected = brute_force(&mesh, p);
      assert!(
        (d - expected).abs() < 1e-5,
        "Point {:?}: bvh {} vs brute force {}",
        p,
        d,
        expected
      );
    }
  }

  #[test]
  fn build_ignores_triangles_outside_the_id_list() {
    let mut mesh = shapes::cube(1.0);
    mesh.indices.extend_from_slice(&[0, 1, 99]);
    let ids: Vec<u32> = (0..12).collect();
    let bvh = TriangleBvh::build(&mesh, ids);

    let bounds = bvh.bounds().unwrap();
    assert_eq!(bounds.min, Vec3::splat(-1.0));
    assert_eq!(bounds.max, Vec3::splat(1.0));
    let (triangle, _) = bvh.nearest(Vec3::new(0.0, 3.0, 0.0), |_| 1.0).unwrap();
    assert!(triangle < 12);
  }
}
