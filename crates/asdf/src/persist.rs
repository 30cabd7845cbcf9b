//! JSON persistence of built fields.
//!
//! The stored shape mirrors the in-memory field plus an explicit
//! `format_version`. Corner order inside each node is the canonical corner
//! order and is part of the format. Loading validates the node array before
//! handing out a field, so queries on a loaded field cannot index out of
//! bounds or loop.

use std::fs;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{AsdfError, AsdfResult};
use crate::field::{validate_nodes, DistanceField};
use crate::octree::DfNode;

/// Version written by this crate and the only one it reads.
pub const FORMAT_VERSION: u32 = 1;

/// On-disk form of a [`DistanceField`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PersistedField {
  pub format_version: u32,
  pub bounds_center: Vec3,
  pub bounds_half_extent: Vec3,
  pub min_node_size: f32,
  pub max_error: f32,
  pub max_depth: i32,
  pub complete: bool,
  pub nodes: Vec<DfNode>,
}

#[derive(Deserialize)]
struct VersionHeader {
  format_version: u32,
}

impl PersistedField {
  pub fn from_field(field: &DistanceField) -> Self {
    let bounds = field.bounds();
    Self {
      format_version: FORMAT_VERSION,
      bounds_center: bounds.center(),
      bounds_half_extent: bounds.half_extents(),
      min_node_size: field.min_node_size(),
      max_error: field.max_error(),
      max_depth: field.max_depth(),
      complete: field.is_complete(),
      nodes: field.nodes().to_vec(),
    }
  }

  /// Check the version and the structural invariants of the node array.
  pub fn validate(&self) -> AsdfResult<()> {
    if self.format_version != FORMAT_VERSION {
      return Err(AsdfError::UnsupportedVersion {
        found: self.format_version,
        expected: FORMAT_VERSION,
      });
    }

    validate_nodes(&self.nodes)
  }

  pub fn into_field(self) -> AsdfResult<DistanceField> {
    self.validate()?;
    Ok(DistanceField::from_nodes_unchecked(
      self.nodes,
      self.max_error,
      self.max_depth,
      self.complete,
    ))
  }
}

impl DistanceField {
  pub fn to_json(&self) -> AsdfResult<String> {
    Ok(serde_json::to_string(&PersistedField::from_field(self))?)
  }

  /// Parse and validate a persisted field.
  pub fn from_json(json: &str) -> AsdfResult<Self> {
    // Check the version first so newer layouts report a version error
    let header: VersionHeader = serde_json::from_str(json)?;
    if header.format_version != FORMAT_VERSION {
      return Err(AsdfError::UnsupportedVersion {
        found: header.format_version,
        expected: FORMAT_VERSION,
      });
    }
    let persisted: PersistedField = serde_json::from_str(json)?;
    persisted.into_field()
  }

  pub fn save(&self, path: impl AsRef<Path>) -> AsdfResult<()> {
    let path = path.as_ref();
    fs::write(path, self.to_json()?)?;
    tracing::debug!(path = %path.display(), nodes = self.node_count(), "field saved");
    Ok(())
  }

  pub fn load(path: impl AsRef<Path>) -> AsdfResult<Self> {
    let json = fs::read_to_string(path)?;
    Self::from_json(&json)
  }
}
