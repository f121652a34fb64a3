//! Embedding facade for host pages.
//!
//! # Responsibility
//! - Own the lifecycle guard and the deferred import queue.
//! - Expose the fixed accessor surface with explicit preconditions.
//!
//! # Invariants
//! - One `Embed` instance per host page; all mutable state lives here, no
//!   ambient singletons.
//! - Accessor failures perform no side effect.
//! - Legacy imports work independently of application construction.

mod import_queue;
mod lifecycle;

pub use import_queue::{DecoderState, DeferredImportQueue, ImportCallback, ImportRequest};

use crate::capability::EmbedCapability;
use crate::engine::{AppBuilder, CanvasApp, EngineError, EngineOptions};
use crate::host::StatusSink;
use crate::model::geometry::{Rgb, Vec2};
use crate::model::project::Project;
use crate::psd::{DecoderLoader, LoaderError, PsdDecoder};
use lifecycle::LifecycleGuard;
use std::error::Error;
use std::fmt::{Display, Formatter};

const WAITING_TEXT: &str = "Waiting for the document…";

/// Construction parameters supplied by the host page.
pub struct EmbedParams {
    /// Project to open immediately. When absent the host calls
    /// [`Embed::open_project`] later, for example after a deferred import.
    pub project: Option<Project>,
    pub options: EngineOptions,
}

/// Errors surfaced across the embed boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbedError {
    /// A second construction attempt was rejected.
    AlreadyInitialized,
    /// An accessor ran before successful construction.
    NotInitialized,
    /// Application construction failed.
    Construction(EngineError),
    /// The engine does not declare the requested operation.
    Unsupported(EmbedCapability),
    /// An accessor operation failed inside the engine.
    Engine(EngineError),
}

impl Display for EmbedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyInitialized => write!(f, "project already opened for this embed"),
            Self::NotInitialized => write!(f, "application not initialized"),
            Self::Construction(err) => write!(f, "application construction failed: {err}"),
            Self::Unsupported(capability) => {
                write!(f, "operation not supported by this engine: {}", capability.as_str())
            }
            Self::Engine(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EmbedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Construction(err) | Self::Engine(err) => Some(err),
            _ => None,
        }
    }
}

/// One embedding instance owned by the host page.
///
/// The host holds exactly one `Embed` per page; the decode-library handle
/// and the initialization flag live here for the page lifetime.
pub struct Embed {
    guard: LifecycleGuard,
    imports: DeferredImportQueue,
    builder: Box<dyn AppBuilder>,
    loader: Box<dyn DecoderLoader>,
    options: EngineOptions,
}

impl Embed {
    /// Creates one embedding instance.
    ///
    /// Writes the waiting text into the status sink and opens
    /// `params.project` immediately when present; a failure of that first
    /// open is contained and reported through the sink and the log.
    pub fn new(
        params: EmbedParams,
        builder: Box<dyn AppBuilder>,
        loader: Box<dyn DecoderLoader>,
        sink: Option<Box<dyn StatusSink>>,
    ) -> Self {
        let EmbedParams { project, options } = params;
        let mut embed = Self {
            guard: LifecycleGuard::new(sink),
            imports: DeferredImportQueue::new(),
            builder,
            loader,
            options,
        };
        embed.guard.set_waiting_text(WAITING_TEXT);
        if let Some(project) = project {
            let _ = embed.open_project(project);
        }
        embed
    }

    /// Opens `project` and constructs the application exactly once.
    ///
    /// # Errors
    /// - `AlreadyInitialized` on any call after the first.
    /// - `Construction` when the engine fails to build or mount; the guard
    ///   stays initialized and the attempt is not retried.
    pub fn open_project(&mut self, project: Project) -> Result<(), EmbedError> {
        self.guard
            .open_project(project, self.builder.as_mut(), &self.options)
    }

    /// Reports a host-side initialization failure into the status sink.
    pub fn report_init_error(&mut self, message: &str) {
        self.guard.report_init_error(message);
    }

    /// True once the first `open_project` call ran, regardless of outcome.
    pub fn is_initialized(&self) -> bool {
        self.guard.is_initialized()
    }

    /// True when the constructed engine declares `capability`.
    pub fn supports(&self, capability: EmbedCapability) -> Result<bool, EmbedError> {
        Ok(self.guard.app()?.capabilities().supports(capability))
    }

    pub fn export_png(&self) -> Result<Vec<u8>, EmbedError> {
        self.checked(EmbedCapability::ExportPng)?
            .export_png()
            .map_err(EmbedError::Engine)
    }

    pub fn export_psd(&self) -> Result<Vec<u8>, EmbedError> {
        self.checked(EmbedCapability::ExportPsd)?
            .export_psd()
            .map_err(EmbedError::Engine)
    }

    /// Sets the brush size (actual value, not display value).
    pub fn set_brush_size(&mut self, size: f64) -> Result<(), EmbedError> {
        self.checked_mut(EmbedCapability::SetBrushSize)?
            .set_brush_size(size);
        Ok(())
    }

    pub fn brush_size(&self) -> Result<f64, EmbedError> {
        Ok(self.checked(EmbedCapability::GetBrushSize)?.brush_size())
    }

    pub fn set_brush_opacity(&mut self, opacity: f64) -> Result<(), EmbedError> {
        self.checked_mut(EmbedCapability::SetBrushOpacity)?
            .set_brush_opacity(opacity);
        Ok(())
    }

    pub fn brush_opacity(&self) -> Result<f64, EmbedError> {
        Ok(self
            .checked(EmbedCapability::GetBrushOpacity)?
            .brush_opacity())
    }

    pub fn set_brush_scatter(&mut self, scatter: f64) -> Result<(), EmbedError> {
        self.checked_mut(EmbedCapability::SetBrushScatter)?
            .set_brush_scatter(scatter);
        Ok(())
    }

    /// Appends one stroke along `path`.
    pub fn draw(&mut self, path: &[Vec2]) -> Result<(), EmbedError> {
        self.checked_mut(EmbedCapability::Draw)?.draw(path);
        Ok(())
    }

    /// Clears the active layer.
    pub fn clear_layer(&mut self) -> Result<(), EmbedError> {
        self.checked_mut(EmbedCapability::ClearLayer)?.clear_layer();
        Ok(())
    }

    pub fn color(&self) -> Result<Rgb, EmbedError> {
        Ok(self.checked(EmbedCapability::GetColor)?.color())
    }

    pub fn hide_tool_panel(&mut self) -> Result<(), EmbedError> {
        self.checked_mut(EmbedCapability::HideToolPanel)?
            .hide_tool_panel();
        Ok(())
    }

    /// Submits legacy-document import requests.
    ///
    /// Requests are decoded immediately when the library is available and
    /// buffered in arrival order otherwise; the first buffering call also
    /// starts the one-shot library fetch. Every request fires its callback
    /// exactly once, with `None` when decoding is impossible. Imports do
    /// not require the application to be constructed.
    pub fn import_psds(&mut self, requests: Vec<ImportRequest>) {
        self.imports.submit(requests, self.loader.as_mut());
    }

    /// Settles the decode-library fetch started by [`Embed::import_psds`].
    ///
    /// The host calls this exactly once per fetch outcome. Calls on an
    /// already settled handle are logged and dropped; the handle never
    /// changes again for the process lifetime.
    pub fn resolve_decoder_load(&mut self, result: Result<Box<dyn PsdDecoder>, LoaderError>) {
        self.imports.resolve_load(result);
    }

    /// Current decode-library lifecycle state.
    pub fn decoder_state(&self) -> DecoderState {
        self.imports.state()
    }

    /// Number of buffered import requests.
    pub fn pending_imports(&self) -> usize {
        self.imports.pending_count()
    }

    fn checked(&self, capability: EmbedCapability) -> Result<&dyn CanvasApp, EmbedError> {
        let app = self.guard.app()?;
        if !app.capabilities().supports(capability) {
            return Err(EmbedError::Unsupported(capability));
        }
        Ok(app)
    }

    fn checked_mut(&mut self, capability: EmbedCapability) -> Result<&mut dyn CanvasApp, EmbedError> {
        let app = self.guard.app_mut()?;
        if !app.capabilities().supports(capability) {
            return Err(EmbedError::Unsupported(capability));
        }
        Ok(app)
    }
}
