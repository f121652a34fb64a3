//! Drawing engine adapters over host-supplied JS objects.
//!
//! The host page hands over a factory function; the object it returns is
//! probed once for its methods and the result becomes the declared
//! capability set. Every later call goes through the declared flag, never
//! through shape probing.

use easel_core::{
    AppBuilder, CanvasApp, CapabilitySet, EmbedCapability, EngineError, EngineOptions, Project,
    Rgb, Vec2, ALL_CAPABILITIES,
};
use wasm_bindgen::{JsCast, JsValue};

pub(crate) fn describe_js_error(value: &JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{value:?}"))
}

fn method(target: &js_sys::Object, name: &str) -> Option<js_sys::Function> {
    js_sys::Reflect::get(target, &JsValue::from_str(name))
        .ok()
        .and_then(|value| value.dyn_into::<js_sys::Function>().ok())
}

fn engine_method_name(capability: EmbedCapability) -> &'static str {
    match capability {
        EmbedCapability::ExportPng => "exportPng",
        EmbedCapability::ExportPsd => "exportPsd",
        EmbedCapability::SetBrushSize => "setBrushSize",
        EmbedCapability::GetBrushSize => "getBrushSize",
        EmbedCapability::SetBrushOpacity => "setBrushOpacity",
        EmbedCapability::GetBrushOpacity => "getBrushOpacity",
        EmbedCapability::SetBrushScatter => "setBrushScatter",
        EmbedCapability::Draw => "draw",
        EmbedCapability::ClearLayer => "clearLayer",
        EmbedCapability::GetColor => "getColor",
        EmbedCapability::HideToolPanel => "hideToolPanel",
    }
}

/// Builds the application from a host-supplied factory function.
///
/// The factory receives the project and the engine options as JSON strings
/// and must return the engine object synchronously.
pub struct JsAppBuilder {
    factory: js_sys::Function,
}

impl JsAppBuilder {
    pub fn new(factory: js_sys::Function) -> Self {
        Self { factory }
    }
}

impl AppBuilder for JsAppBuilder {
    fn build(
        &mut self,
        project: Project,
        options: &EngineOptions,
    ) -> Result<Box<dyn CanvasApp>, EngineError> {
        let project_json = serde_json::to_string(&project)
            .map_err(|err| EngineError::Construction(format!("project encoding failed: {err}")))?;
        let options_json = serde_json::to_string(options)
            .map_err(|err| EngineError::Construction(format!("options encoding failed: {err}")))?;

        let app = self
            .factory
            .call2(
                &JsValue::NULL,
                &JsValue::from_str(&project_json),
                &JsValue::from_str(&options_json),
            )
            .map_err(|err| EngineError::Construction(describe_js_error(&err)))?;
        let app: js_sys::Object = app.dyn_into().map_err(|_| {
            EngineError::Construction("engine factory did not return an object".to_string())
        })?;

        Ok(Box::new(JsCanvasApp::new(app)))
    }
}

/// One constructed engine object, driven through `Reflect` calls.
pub struct JsCanvasApp {
    app: js_sys::Object,
    capabilities: CapabilitySet,
}

impl JsCanvasApp {
    /// Wraps `app`, probing its methods once to build the capability set.
    pub fn new(app: js_sys::Object) -> Self {
        let mut capabilities = CapabilitySet::empty();
        for capability in ALL_CAPABILITIES.iter().copied() {
            if method(&app, engine_method_name(capability)).is_some() {
                capabilities.insert(capability);
            }
        }
        Self { app, capabilities }
    }

    fn call0(&self, name: &str) -> Result<JsValue, EngineError> {
        let function = method(&self.app, name)
            .ok_or_else(|| EngineError::Operation(format!("engine method missing: {name}")))?;
        function
            .call0(&self.app)
            .map_err(|err| EngineError::Operation(describe_js_error(&err)))
    }

    fn call1(&self, name: &str, arg: &JsValue) -> Result<JsValue, EngineError> {
        let function = method(&self.app, name)
            .ok_or_else(|| EngineError::Operation(format!("engine method missing: {name}")))?;
        function
            .call1(&self.app, arg)
            .map_err(|err| EngineError::Operation(describe_js_error(&err)))
    }

    fn log_call_failure(name: &str, err: &EngineError) {
        log::error!("event=engine_call module=web status=error method={name} error={err}");
    }
}

impl CanvasApp for JsCanvasApp {
    fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }

    fn attach_to_host(&mut self) -> Result<(), EngineError> {
        let element = self.call0("getElement")?;
        let element: web_sys::Element = element.dyn_into().map_err(|_| {
            EngineError::Operation("getElement returned a non-element".to_string())
        })?;
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| EngineError::Operation("host document unavailable".to_string()))?;
        let body = document
            .body()
            .ok_or_else(|| EngineError::Operation("host body unavailable".to_string()))?;
        body.append_child(&element)
            .map_err(|err| EngineError::Operation(describe_js_error(&err)))?;
        Ok(())
    }

    fn export_png(&self) -> Result<Vec<u8>, EngineError> {
        let value = self.call0("exportPng")?;
        let bytes: js_sys::Uint8Array = value.dyn_into().map_err(|_| {
            EngineError::Operation("exportPng returned non-byte data".to_string())
        })?;
        Ok(bytes.to_vec())
    }

    fn export_psd(&self) -> Result<Vec<u8>, EngineError> {
        let value = self.call0("exportPsd")?;
        let bytes: js_sys::Uint8Array = value.dyn_into().map_err(|_| {
            EngineError::Operation("exportPsd returned non-byte data".to_string())
        })?;
        Ok(bytes.to_vec())
    }

    fn set_brush_size(&mut self, size: f64) {
        if let Err(err) = self.call1("setBrushSize", &JsValue::from_f64(size)) {
            Self::log_call_failure("setBrushSize", &err);
        }
    }

    fn brush_size(&self) -> f64 {
        match self.call0("getBrushSize") {
            Ok(value) => value.as_f64().unwrap_or(0.0),
            Err(err) => {
                Self::log_call_failure("getBrushSize", &err);
                0.0
            }
        }
    }

    fn set_brush_opacity(&mut self, opacity: f64) {
        if let Err(err) = self.call1("setBrushOpacity", &JsValue::from_f64(opacity)) {
            Self::log_call_failure("setBrushOpacity", &err);
        }
    }

    fn brush_opacity(&self) -> f64 {
        match self.call0("getBrushOpacity") {
            Ok(value) => value.as_f64().unwrap_or(0.0),
            Err(err) => {
                Self::log_call_failure("getBrushOpacity", &err);
                0.0
            }
        }
    }

    fn set_brush_scatter(&mut self, scatter: f64) {
        if let Err(err) = self.call1("setBrushScatter", &JsValue::from_f64(scatter)) {
            Self::log_call_failure("setBrushScatter", &err);
        }
    }

    fn draw(&mut self, path: &[Vec2]) {
        let points = js_sys::Array::new();
        for point in path {
            let entry = js_sys::Object::new();
            let _ = js_sys::Reflect::set(&entry, &JsValue::from_str("x"), &point.x.into());
            let _ = js_sys::Reflect::set(&entry, &JsValue::from_str("y"), &point.y.into());
            points.push(&entry);
        }
        if let Err(err) = self.call1("draw", points.as_ref()) {
            Self::log_call_failure("draw", &err);
        }
    }

    fn clear_layer(&mut self) {
        if let Err(err) = self.call0("clearLayer") {
            Self::log_call_failure("clearLayer", &err);
        }
    }

    fn color(&self) -> Rgb {
        match self.call0("getColor") {
            Ok(value) => {
                let channel = |name: &str| -> u8 {
                    js_sys::Reflect::get(&value, &JsValue::from_str(name))
                        .ok()
                        .and_then(|v| v.as_f64())
                        .unwrap_or(0.0) as u8
                };
                Rgb::new(channel("r"), channel("g"), channel("b"))
            }
            Err(err) => {
                Self::log_call_failure("getColor", &err);
                Rgb::new(0, 0, 0)
            }
        }
    }

    fn hide_tool_panel(&mut self) {
        if let Err(err) = self.call0("hideToolPanel") {
            Self::log_call_failure("hideToolPanel", &err);
        }
    }
}
