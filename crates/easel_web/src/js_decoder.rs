//! Decode-library adapters over host-supplied JS functions.

use crate::js_engine::describe_js_error;
use easel_core::{DecodeError, DecoderLoader, PsdDecoder, RawPsdDocument};
use wasm_bindgen::JsValue;

/// Kicks the host-side dynamic import of the decode library.
///
/// The host settles the fetch through `decoderLoaded` / `decoderLoadFailed`
/// on the embed, exactly once. A synchronous throw from the start function
/// is logged here but still requires the host to report the failure.
pub struct JsDecoderLoader {
    start_fetch: js_sys::Function,
}

impl JsDecoderLoader {
    pub fn new(start_fetch: js_sys::Function) -> Self {
        Self { start_fetch }
    }
}

impl DecoderLoader for JsDecoderLoader {
    fn begin_load(&mut self) {
        if let Err(err) = self.start_fetch.call0(&JsValue::NULL) {
            log::error!(
                "event=decoder_load module=web status=error detail=start_threw error={}",
                describe_js_error(&err)
            );
        }
    }
}

/// Decode library handed over by the host once its bundle finished loading.
///
/// `read_document` receives the blob as a `Uint8Array` and must return the
/// raw document structure as a JSON string.
pub struct JsPsdDecoder {
    read_fn: js_sys::Function,
}

impl JsPsdDecoder {
    pub fn new(read_fn: js_sys::Function) -> Self {
        Self { read_fn }
    }
}

impl PsdDecoder for JsPsdDecoder {
    fn read_document(&self, blob: &[u8]) -> Result<RawPsdDocument, DecodeError> {
        let bytes = js_sys::Uint8Array::from(blob);
        let raw = self
            .read_fn
            .call1(&JsValue::NULL, bytes.as_ref())
            .map_err(|err| DecodeError::Malformed(describe_js_error(&err)))?;
        let json = raw.as_string().ok_or_else(|| {
            DecodeError::Malformed("decoder returned a non-string result".to_string())
        })?;
        serde_json::from_str(&json).map_err(|err| DecodeError::Malformed(err.to_string()))
    }
}
