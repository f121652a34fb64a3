//! Deferred import queue for legacy documents.
//!
//! # Responsibility
//! - Buffer import requests while the decode library is loading.
//! - Start the library fetch at most once per process.
//! - Drain buffered requests in strict arrival order once the fetch settles.
//!
//! # Invariants
//! - The decoder handle moves `Unloaded -> Loaded | Failed` and never
//!   transitions again.
//! - `begin_load` is invoked only by the submit that finds the buffer empty
//!   while the handle is `Unloaded`.
//! - Every accepted request fires its callback exactly once, eventually,
//!   and never synchronously while the handle is `Unloaded`.

use crate::model::project::Project;
use crate::psd::convert::psd_to_project;
use crate::psd::{DecoderLoader, LoaderError, PsdDecoder};
use log::{error, info, warn};
use std::collections::VecDeque;

/// Callback delivering one import outcome to the host.
///
/// `None` means the document could not be decoded, or the decode library is
/// permanently unavailable.
pub type ImportCallback = Box<dyn FnOnce(Option<Project>)>;

/// One import request: an opaque blob and its result callback.
pub struct ImportRequest {
    pub blob: Vec<u8>,
    pub callback: ImportCallback,
}

impl ImportRequest {
    pub fn new(blob: Vec<u8>, callback: impl FnOnce(Option<Project>) + 'static) -> Self {
        Self {
            blob,
            callback: Box::new(callback),
        }
    }
}

/// Decode-library lifecycle as observable by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderState {
    Unloaded,
    Loaded,
    Failed,
}

enum DecoderHandle {
    Unloaded,
    Loaded(Box<dyn PsdDecoder>),
    Failed,
}

impl DecoderHandle {
    fn is_settled(&self) -> bool {
        !matches!(self, Self::Unloaded)
    }
}

/// FIFO buffer in front of the lazily loaded decode library.
pub struct DeferredImportQueue {
    handle: DecoderHandle,
    pending: VecDeque<ImportRequest>,
}

impl Default for DeferredImportQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl DeferredImportQueue {
    pub fn new() -> Self {
        Self {
            handle: DecoderHandle::Unloaded,
            pending: VecDeque::new(),
        }
    }

    /// Accepts a batch of import requests, in the order given.
    ///
    /// Requests are decoded immediately when the library is available,
    /// resolved with `None` when it is permanently unavailable, and buffered
    /// otherwise. A buffering call that finds the buffer empty also starts
    /// the library fetch through `loader`; every other call only appends.
    pub fn submit(&mut self, requests: Vec<ImportRequest>, loader: &mut dyn DecoderLoader) {
        if requests.is_empty() {
            return;
        }

        match &self.handle {
            DecoderHandle::Loaded(decoder) => {
                for request in requests {
                    decode_one(decoder.as_ref(), request);
                }
            }
            DecoderHandle::Failed => {
                for request in requests {
                    resolve_unavailable(request);
                }
            }
            DecoderHandle::Unloaded => {
                let starts_load = self.pending.is_empty();
                self.pending.extend(requests);
                if starts_load {
                    info!(
                        "event=decoder_load module=import status=start queued={}",
                        self.pending.len()
                    );
                    loader.begin_load();
                }
            }
        }
    }

    /// Settles the one-shot library fetch and drains the buffer.
    ///
    /// On success every buffered request is decoded front-to-back; on
    /// failure every buffered request resolves with `None` and the handle
    /// becomes permanently unavailable. A call on an already settled handle
    /// is logged and dropped.
    pub fn resolve_load(&mut self, result: Result<Box<dyn PsdDecoder>, LoaderError>) {
        if self.handle.is_settled() {
            warn!("event=decoder_load module=import status=ignored detail=handle_already_settled");
            return;
        }

        match result {
            Ok(decoder) => {
                info!(
                    "event=decoder_load module=import status=ok queued={}",
                    self.pending.len()
                );
                while let Some(request) = self.pending.pop_front() {
                    decode_one(decoder.as_ref(), request);
                }
                self.handle = DecoderHandle::Loaded(decoder);
            }
            Err(err) => {
                error!(
                    "event=decoder_load module=import status=error queued={} error={err}",
                    self.pending.len()
                );
                self.handle = DecoderHandle::Failed;
                while let Some(request) = self.pending.pop_front() {
                    resolve_unavailable(request);
                }
            }
        }
    }

    /// Current decode-library lifecycle state.
    pub fn state(&self) -> DecoderState {
        match self.handle {
            DecoderHandle::Unloaded => DecoderState::Unloaded,
            DecoderHandle::Loaded(_) => DecoderState::Loaded,
            DecoderHandle::Failed => DecoderState::Failed,
        }
    }

    /// Number of buffered requests.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

/// Decodes one request and fires its callback.
///
/// A failure here is scoped to this single request; siblings and the
/// decoder handle are untouched.
fn decode_one(decoder: &dyn PsdDecoder, request: ImportRequest) {
    let ImportRequest { blob, callback } = request;
    match decoder.read_document(&blob).and_then(psd_to_project) {
        Ok(project) => callback(Some(project)),
        Err(err) => {
            error!("event=psd_decode module=import status=error error={err}");
            callback(None);
        }
    }
}

fn resolve_unavailable(request: ImportRequest) {
    error!("event=psd_decode module=import status=error error_code=decoder_unavailable");
    (request.callback)(None);
}
