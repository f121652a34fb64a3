//! Embedding and lifecycle core for the easel drawing tool.
//! This crate is the single source of truth for host-boundary invariants.

pub mod capability;
pub mod embed;
pub mod engine;
pub mod host;
pub mod logging;
pub mod model;
pub mod psd;

pub use capability::{
    parse_capability, supported_capability_strings, CapabilityParseError, CapabilitySet,
    EmbedCapability, ALL_CAPABILITIES,
};
pub use embed::{
    DecoderState, DeferredImportQueue, Embed, EmbedError, EmbedParams, ImportCallback,
    ImportRequest,
};
pub use engine::{AppBuilder, CanvasApp, EngineError, EngineOptions};
pub use host::StatusSink;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::geometry::{Rgb, Vec2};
pub use model::project::{Project, ProjectId, ProjectLayer};
pub use psd::convert::psd_to_project;
pub use psd::{DecodeError, DecoderLoader, LoaderError, PsdDecoder, RawPsdDocument, RawPsdLayer};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
