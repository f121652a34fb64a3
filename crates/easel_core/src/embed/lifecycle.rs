//! Single-shot application lifecycle guard.
//!
//! # Responsibility
//! - Construct the drawing application exactly once per embed instance.
//! - Contain construction failures at the host boundary.
//! - Gate every accessor on successful construction.
//!
//! # Invariants
//! - The initialization flag moves `false -> true` once and never resets,
//!   even when construction fails.
//! - Failures are written to the status sink and logged; none panic across
//!   the boundary.

use crate::embed::EmbedError;
use crate::engine::{AppBuilder, CanvasApp, EngineOptions};
use crate::host::StatusSink;
use crate::model::project::Project;
use log::{error, info};

pub(crate) struct LifecycleGuard {
    initialized: bool,
    app: Option<Box<dyn CanvasApp>>,
    sink: Option<Box<dyn StatusSink>>,
}

impl LifecycleGuard {
    pub(crate) fn new(sink: Option<Box<dyn StatusSink>>) -> Self {
        Self {
            initialized: false,
            app: None,
            sink,
        }
    }

    pub(crate) fn set_waiting_text(&mut self, text: &str) {
        if let Some(sink) = self.sink.as_mut() {
            sink.set_text(text);
        }
    }

    /// Constructs the application from `project` on first call.
    ///
    /// A second call fails with `AlreadyInitialized` and performs no further
    /// effect. A failed first call marks the sink errored and is not retried;
    /// the guard is single-shot.
    pub(crate) fn open_project(
        &mut self,
        mut project: Project,
        builder: &mut dyn AppBuilder,
        options: &EngineOptions,
    ) -> Result<(), EmbedError> {
        if self.initialized {
            let err = EmbedError::AlreadyInitialized;
            self.report(&err);
            error!("event=embed_open module=lifecycle status=error error_code=already_initialized");
            return Err(err);
        }
        self.initialized = true;

        let project_id = project.ensure_id();
        let mut app = match builder.build(project, options) {
            Ok(app) => app,
            Err(engine_err) => {
                let err = EmbedError::Construction(engine_err);
                self.report(&err);
                error!(
                    "event=embed_open module=lifecycle status=error \
                     error_code=construction_failed project_id={project_id} error={err}"
                );
                return Err(err);
            }
        };

        if let Some(mut sink) = self.sink.take() {
            sink.remove();
        }

        if let Err(engine_err) = app.attach_to_host() {
            let err = EmbedError::Construction(engine_err);
            self.report(&err);
            error!(
                "event=embed_open module=lifecycle status=error \
                 error_code=attach_failed project_id={project_id} error={err}"
            );
            return Err(err);
        }

        self.app = Some(app);
        info!("event=embed_open module=lifecycle status=ok project_id={project_id}");
        Ok(())
    }

    /// Host-visible report for failures happening before construction,
    /// for example a host-side bundle load error.
    pub(crate) fn report_init_error(&mut self, message: &str) {
        if let Some(sink) = self.sink.as_mut() {
            sink.set_text(&format!("❌ {message}"));
            sink.mark_errored();
        }
        error!("event=embed_init module=lifecycle status=error error={message}");
    }

    pub(crate) fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub(crate) fn app(&self) -> Result<&dyn CanvasApp, EmbedError> {
        self.app.as_deref().ok_or(EmbedError::NotInitialized)
    }

    pub(crate) fn app_mut(&mut self) -> Result<&mut dyn CanvasApp, EmbedError> {
        match self.app.as_deref_mut() {
            Some(app) => Ok(app),
            None => Err(EmbedError::NotInitialized),
        }
    }

    fn report(&mut self, err: &EmbedError) {
        if let Some(sink) = self.sink.as_mut() {
            sink.set_text(&format!("❌ {err}"));
            sink.mark_errored();
        }
    }
}
