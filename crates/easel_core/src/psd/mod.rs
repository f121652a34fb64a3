//! Legacy layered-document contracts and deferred-load collaborators.
//!
//! # Responsibility
//! - Define the decode-library contract (one blob in, one raw structure out).
//! - Define the loader contract for the one-shot asynchronous library fetch.
//! - Define the raw document shape produced by the decoder.
//!
//! # Invariants
//! - Decoders report failure through `Result`; they never panic across the
//!   collaborator boundary.
//! - A per-document decode failure is scoped to that one document.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod convert;

/// Raw layer shape produced by the decode library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPsdLayer {
    #[serde(default)]
    pub name: String,
    /// Source opacity in `0..=255`.
    pub opacity: u8,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub pixels: Vec<u8>,
}

/// Raw document structure produced by the decode library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPsdDocument {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub layers: Vec<RawPsdLayer>,
}

/// Decode-library contract.
///
/// The library is an opaque external collaborator; this core never inspects
/// the byte layout of the legacy format itself.
pub trait PsdDecoder {
    fn read_document(&self, blob: &[u8]) -> Result<RawPsdDocument, DecodeError>;
}

/// Starts the one-shot asynchronous fetch of the decode library.
///
/// The import queue calls [`DecoderLoader::begin_load`] at most once per
/// process. The host must hand the outcome to
/// [`crate::embed::Embed::resolve_decoder_load`] exactly once. No timeout
/// exists: a fetch that never settles leaves queued requests pending.
pub trait DecoderLoader {
    fn begin_load(&mut self);
}

/// Per-document decode failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The decoder could not read the blob.
    Malformed(String),
    /// The decoded document has zero width or height.
    EmptyDocument,
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(details) => write!(f, "malformed legacy document: {details}"),
            Self::EmptyDocument => write!(f, "legacy document has zero width or height"),
        }
    }
}

impl Error for DecodeError {}

/// Terminal decode-library fetch failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderError {
    pub message: String,
}

impl LoaderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Display for LoaderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "decode library unavailable: {}", self.message)
    }
}

impl Error for LoaderError {}
