//! Host-facing embed API for browser pages.
//!
//! # Responsibility
//! - Expose stable, use-case-level exports to the host page.
//! - Keep error semantics simple for page-script integration.
//!
//! # Invariants
//! - Exported functions must not panic across the wasm boundary.
//! - Documents cross the boundary as UTF-8 JSON strings with stable shape.
//! - Import callbacks receive a JSON project string, or `null` on failure.

use crate::dom::DomStatusSink;
use crate::js_decoder::{JsDecoderLoader, JsPsdDecoder};
use crate::js_engine::{describe_js_error, JsAppBuilder};
use easel_core::{
    parse_capability, DecoderState, Embed, EmbedError, EmbedParams, EngineOptions, ImportRequest,
    LoaderError, Project, Vec2,
};
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen::{JsCast, JsValue};

fn to_js_error(err: EmbedError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn import_request(blob: Vec<u8>, callback: js_sys::Function) -> ImportRequest {
    ImportRequest::new(blob, move |project| {
        let payload = match project.as_ref().and_then(|p| serde_json::to_string(p).ok()) {
            Some(json) => JsValue::from_str(&json),
            None => JsValue::NULL,
        };
        if let Err(err) = callback.call1(&JsValue::NULL, &payload) {
            log::error!(
                "event=import_callback module=web status=error error={}",
                describe_js_error(&err)
            );
        }
    })
}

/// One embedding instance per host page.
#[wasm_bindgen]
pub struct EaselEmbed {
    inner: Embed,
}

#[wasm_bindgen]
impl EaselEmbed {
    /// Creates the embed.
    ///
    /// Input semantics:
    /// - `engine_factory`: called once with `(projectJson, optionsJson)`,
    ///   must synchronously return the engine object.
    /// - `loader_start`: called at most once to start the decode-library
    ///   fetch; the page settles it via `decoderLoaded`/`decoderLoadFailed`.
    /// - `options_json`: engine options, empty string for defaults.
    ///
    /// # FFI contract
    /// - Sync call; touches the DOM only to look up the loading screen.
    /// - Never panics; invalid options are returned as an error string.
    #[wasm_bindgen(constructor)]
    pub fn new(
        engine_factory: js_sys::Function,
        loader_start: js_sys::Function,
        options_json: &str,
    ) -> Result<EaselEmbed, JsValue> {
        let options: EngineOptions = if options_json.trim().is_empty() {
            EngineOptions::default()
        } else {
            serde_json::from_str(options_json)
                .map_err(|err| JsValue::from_str(&format!("invalid embed options: {err}")))?
        };

        Ok(Self {
            inner: Embed::new(
                EmbedParams {
                    project: None,
                    options,
                },
                Box::new(JsAppBuilder::new(engine_factory)),
                Box::new(JsDecoderLoader::new(loader_start)),
                Some(Box::new(DomStatusSink::from_document())),
            ),
        })
    }

    /// Opens a project (JSON document) and constructs the application.
    ///
    /// # FFI contract
    /// - Sync call; mounts the engine surface into the page on success.
    /// - A second call fails; the first project stays active.
    /// - Never panics; failures return an error string and are also written
    ///   to the loading screen.
    #[wasm_bindgen(js_name = openProject)]
    pub fn open_project(&mut self, project_json: &str) -> Result<(), JsValue> {
        let project: Project = serde_json::from_str(project_json)
            .map_err(|err| JsValue::from_str(&format!("invalid project: {err}")))?;
        self.inner.open_project(project).map_err(to_js_error)
    }

    /// Writes a host-side initialization failure into the loading screen.
    #[wasm_bindgen(js_name = initError)]
    pub fn init_error(&mut self, message: &str) {
        self.inner.report_init_error(message);
    }

    #[wasm_bindgen(js_name = isInitialized)]
    pub fn is_initialized(&self) -> bool {
        self.inner.is_initialized()
    }

    /// True when the engine declares the capability (stable string id).
    pub fn supports(&self, capability: &str) -> Result<bool, JsValue> {
        let capability =
            parse_capability(capability).map_err(|err| JsValue::from_str(&err.to_string()))?;
        self.inner.supports(capability).map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = getPng)]
    pub fn get_png(&self) -> Result<Vec<u8>, JsValue> {
        self.inner.export_png().map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = getPsd)]
    pub fn get_psd(&self) -> Result<Vec<u8>, JsValue> {
        self.inner.export_psd().map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = setBrushSize)]
    pub fn set_brush_size(&mut self, size: f64) -> Result<(), JsValue> {
        self.inner.set_brush_size(size).map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = getBrushSize)]
    pub fn get_brush_size(&self) -> Result<f64, JsValue> {
        self.inner.brush_size().map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = setBrushOpacity)]
    pub fn set_brush_opacity(&mut self, opacity: f64) -> Result<(), JsValue> {
        self.inner.set_brush_opacity(opacity).map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = getBrushOpacity)]
    pub fn get_brush_opacity(&self) -> Result<f64, JsValue> {
        self.inner.brush_opacity().map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = setBrushScatter)]
    pub fn set_brush_scatter(&mut self, scatter: f64) -> Result<(), JsValue> {
        self.inner.set_brush_scatter(scatter).map_err(to_js_error)
    }

    /// Appends one stroke. `path_json` is a JSON array of `{x, y}` points.
    pub fn draw(&mut self, path_json: &str) -> Result<(), JsValue> {
        let path: Vec<Vec2> = serde_json::from_str(path_json)
            .map_err(|err| JsValue::from_str(&format!("invalid path: {err}")))?;
        self.inner.draw(&path).map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = clearLayer)]
    pub fn clear_layer(&mut self) -> Result<(), JsValue> {
        self.inner.clear_layer().map_err(to_js_error)
    }

    /// Returns the current color as a JSON `{r, g, b}` string.
    #[wasm_bindgen(js_name = getColor)]
    pub fn get_color(&self) -> Result<String, JsValue> {
        let color = self.inner.color().map_err(to_js_error)?;
        serde_json::to_string(&color)
            .map_err(|err| JsValue::from_str(&format!("color encoding failed: {err}")))
    }

    #[wasm_bindgen(js_name = hideToolPanel)]
    pub fn hide_tool_panel(&mut self) -> Result<(), JsValue> {
        self.inner.hide_tool_panel().map_err(to_js_error)
    }

    /// Submits one legacy-document import.
    ///
    /// # FFI contract
    /// - `callback` fires exactly once, eventually: a JSON project string on
    ///   success, `null` on failure.
    /// - Works before `openProject`; the first buffered import starts the
    ///   decode-library fetch.
    #[wasm_bindgen(js_name = importPsd)]
    pub fn import_psd(&mut self, blob: Vec<u8>, callback: js_sys::Function) {
        self.inner.import_psds(vec![import_request(blob, callback)]);
    }

    /// Submits a batch of imports, processed in the order given.
    ///
    /// `entries` is an array of `{blob: Uint8Array, callback: Function}`.
    #[wasm_bindgen(js_name = importPsds)]
    pub fn import_psds(&mut self, entries: js_sys::Array) -> Result<(), JsValue> {
        let mut requests = Vec::with_capacity(entries.length() as usize);
        for entry in entries.iter() {
            let blob = js_sys::Reflect::get(&entry, &JsValue::from_str("blob"))
                .ok()
                .and_then(|value| value.dyn_into::<js_sys::Uint8Array>().ok())
                .ok_or_else(|| JsValue::from_str("import entry needs a Uint8Array `blob`"))?;
            let callback = js_sys::Reflect::get(&entry, &JsValue::from_str("callback"))
                .ok()
                .and_then(|value| value.dyn_into::<js_sys::Function>().ok())
                .ok_or_else(|| JsValue::from_str("import entry needs a Function `callback`"))?;
            requests.push(import_request(blob.to_vec(), callback));
        }
        self.inner.import_psds(requests);
        Ok(())
    }

    /// Settles the decode-library fetch with the loaded library.
    ///
    /// `read_document` receives a `Uint8Array` blob and returns the raw
    /// document structure as a JSON string. Buffered imports drain in
    /// arrival order before this call returns.
    #[wasm_bindgen(js_name = decoderLoaded)]
    pub fn decoder_loaded(&mut self, read_document: js_sys::Function) {
        self.inner
            .resolve_decoder_load(Ok(Box::new(JsPsdDecoder::new(read_document))));
    }

    /// Settles the decode-library fetch as permanently failed.
    ///
    /// Every buffered and future import resolves with `null`.
    #[wasm_bindgen(js_name = decoderLoadFailed)]
    pub fn decoder_load_failed(&mut self, message: &str) {
        self.inner
            .resolve_decoder_load(Err(LoaderError::new(message)));
    }

    /// Decode-library state: `"unloaded"`, `"loaded"` or `"failed"`.
    #[wasm_bindgen(js_name = decoderState)]
    pub fn decoder_state(&self) -> String {
        match self.inner.decoder_state() {
            DecoderState::Unloaded => "unloaded",
            DecoderState::Loaded => "loaded",
            DecoderState::Failed => "failed",
        }
        .to_string()
    }

    #[wasm_bindgen(js_name = pendingImports)]
    pub fn pending_imports(&self) -> u32 {
        self.inner.pending_imports() as u32
    }
}
