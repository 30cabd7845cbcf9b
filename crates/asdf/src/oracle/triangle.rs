//! Point-triangle proximity.

use glam::Vec3;

/// Closest point on triangle `abc` to `p`, with its barycentric weights
/// `(wa, wb, wc)`.
///
/// Voronoi-region walk over vertices, edges and face. Degenerate
/// (zero-area) triangles fall back to the nearest vertex or edge instead of
/// producing NaNs.
pub fn closest_point_on_triangle(p: Vec3, a: Vec3, b: Vec3, c: Vec3) -> (Vec3, Vec3) {
  let ab = b - a;
  let ac = c - a;
  let ap = p - a;

  // Vertex region A
  let d1 = ab.dot(ap);
  let d2 = ac.dot(ap);
  if d1 <= 0.0 && d2 <= 0.0 {
    return (a, Vec3::X);
  }

  // Vertex region B
  let bp = p - b;
  let d3 = ab.dot(bp);
  let d4 = ac.dot(bp);
  if d3 >= 0.0 && d4 <= d3 {
    return (b, Vec3::Y);
  }

  // Edge region AB
  let vc = d1 * d4 - d3 * d2;
  if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
    let v = safe_ratio(d1, d1 - d3);
    return (a + ab * v, Vec3::new(1.0 - v, v, 0.0));
  }

  // Vertex region C
  let cp = p - c;
  let d5 = ab.dot(cp);
  let d6 = ac.dot(cp);
  if d6 >= 0.0 && d5 <= d6 {
    return (c, Vec3::Z);
  }

  // Edge region AC
  let vb = d5 * d2 - d1 * d6;
  if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
    let w = safe_ratio(d2, d2 - d6);
    return (a + ac * w, Vec3::new(1.0 - w, 0.0, w));
  }

  // Edge region BC
  let va = d3 * d6 - d5 * d4;
  if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
    let w = safe_ratio(d4 - d3, (d4 - d3) + (d5 - d6));
    return (b + (c - b) * w, Vec3::new(0.0, 1.0 - w, w));
  }

  // Face region
  let sum = va + vb + vc;
  if sum.abs() <= f32::EPSILON {
    return (a, Vec3::X);
  }
  let v = vb / sum;
  let w = vc / sum;
  (a + ab * v + ac * w, Vec3::new(1.0 - v - w, v, w))
}

/// `num / den` clamped to [0, 1], 0 when `den` vanishes.
#[inline]
fn safe_ratio(num: f32, den: f32) -> f32 {
  if den.abs() <= f32::EPSILON {
    0.0
  } else {
    (num / den).clamp(0.0, 1.0)
  }
}

/// Unit face normal following counter-clockwise winding, zero if degenerate.
#[inline]
pub fn face_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
  (b - a).cross(c - a).normalize_or_zero()
}
