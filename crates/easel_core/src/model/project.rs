//! Canonical project document model.
//!
//! # Responsibility
//! - Define the document shape exchanged between host and core.
//! - Provide identity backfill for projects arriving without an id.
//!
//! # Invariants
//! - `id` is stable once assigned and never reused for another project.
//! - The core never mutates a project beyond the one-time id backfill.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for one project document.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type ProjectId = Uuid;

/// One layer of a project.
///
/// The pixel payload is opaque to this core and forwarded untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectLayer {
    pub name: String,
    /// Layer opacity in `0.0..=1.0`.
    pub opacity: f64,
    pub is_visible: bool,
    /// Raw pixel payload as produced by the host or the legacy decoder.
    #[serde(default)]
    pub pixels: Vec<u8>,
}

/// Canonical in-memory document exchanged with the host.
///
/// `id` may be absent on arrival; the lifecycle guard backfills it before
/// the application is constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub id: Option<ProjectId>,
    pub width: u32,
    pub height: u32,
    pub layers: Vec<ProjectLayer>,
}

impl Project {
    /// Returns the existing id, assigning a freshly generated one if absent.
    ///
    /// # Invariants
    /// - A second call returns the same id as the first.
    pub fn ensure_id(&mut self) -> ProjectId {
        match self.id {
            Some(id) => id,
            None => {
                let id = Uuid::new_v4();
                self.id = Some(id);
                id
            }
        }
    }
}
