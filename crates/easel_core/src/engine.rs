//! Drawing engine collaborator contracts.
//!
//! The engine itself (canvas, layer compositing, brush rendering) lives
//! outside this crate. The core drives it through these traits and never
//! assumes a concrete implementation.

use crate::capability::CapabilitySet;
use crate::model::geometry::{Rgb, Vec2};
use crate::model::project::Project;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Host-supplied knobs forwarded to the engine, never interpreted here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineOptions {
    /// Page URL the embedding is served from.
    pub embed_url: String,
    /// Disables automatic fit-to-view for small canvases.
    #[serde(default)]
    pub disable_auto_fit: bool,
    /// Enables importing images dropped onto the canvas.
    #[serde(default)]
    pub enable_image_dropper_import: bool,
}

/// Engine-side failure surfaced through the embed boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Application construction failed.
    Construction(String),
    /// An accessor operation failed inside the engine.
    Operation(String),
}

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Construction(details) => write!(f, "engine construction failed: {details}"),
            Self::Operation(details) => write!(f, "engine operation failed: {details}"),
        }
    }
}

impl Error for EngineError {}

/// A constructed drawing application.
///
/// Accessor methods are only reached after the lifecycle guard verified
/// construction and the declared capability flag; implementations may rely
/// on that ordering.
pub trait CanvasApp {
    /// Declares which accessor operations this engine implements.
    fn capabilities(&self) -> &CapabilitySet;

    /// Mounts the application's display surface into the host page.
    fn attach_to_host(&mut self) -> Result<(), EngineError>;

    fn export_png(&self) -> Result<Vec<u8>, EngineError>;
    fn export_psd(&self) -> Result<Vec<u8>, EngineError>;
    fn set_brush_size(&mut self, size: f64);
    fn brush_size(&self) -> f64;
    fn set_brush_opacity(&mut self, opacity: f64);
    fn brush_opacity(&self) -> f64;
    fn set_brush_scatter(&mut self, scatter: f64);
    fn draw(&mut self, path: &[Vec2]);
    fn clear_layer(&mut self);
    fn color(&self) -> Rgb;
    fn hide_tool_panel(&mut self);
}

/// One-shot factory constructing the application from a project.
pub trait AppBuilder {
    /// Builds the application. Called at most once per embed instance.
    fn build(
        &mut self,
        project: Project,
        options: &EngineOptions,
    ) -> Result<Box<dyn CanvasApp>, EngineError>;
}
