//! DOM adapter for the loading-status sink.

use easel_core::StatusSink;

const LOADING_SCREEN_ID: &str = "loading-screen";
const LOADING_SCREEN_TEXT_ID: &str = "loading-screen-text";
const LOADING_SCREEN_ERROR_CLASS: &str = "loading-screen-error";

/// Status sink over the host page's loading-screen elements.
///
/// Both elements are optional; a page without them gets a silent sink.
pub struct DomStatusSink {
    screen: Option<web_sys::Element>,
    text: Option<web_sys::Element>,
}

impl DomStatusSink {
    /// Looks up the well-known loading-screen elements in the document.
    pub fn from_document() -> Self {
        let document = web_sys::window().and_then(|window| window.document());
        let lookup = |id: &str| {
            document
                .as_ref()
                .and_then(|document| document.get_element_by_id(id))
        };
        Self {
            screen: lookup(LOADING_SCREEN_ID),
            text: lookup(LOADING_SCREEN_TEXT_ID),
        }
    }
}

impl StatusSink for DomStatusSink {
    fn set_text(&mut self, text: &str) {
        if let Some(element) = &self.text {
            element.set_text_content(Some(text));
        }
    }

    fn mark_errored(&mut self) {
        if let Some(element) = &self.screen {
            let class = element.class_name();
            element.set_class_name(&format!("{class} {LOADING_SCREEN_ERROR_CLASS}"));
        }
    }

    fn remove(&mut self) {
        if let Some(element) = self.screen.take() {
            element.remove();
        }
        self.text = None;
    }
}
