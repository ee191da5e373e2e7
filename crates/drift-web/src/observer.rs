use drift_engine::{FrameObserver, GlowFrame};
use wasm_bindgen::JsValue;

/// Forwards each frame to a JS callback as a plain
/// `{ clusters: [{x, y}], particles: [{x, y}], active }` object.
#[derive(Clone)]
pub struct JsObserver {
    callback: js_sys::Function,
}

impl JsObserver {
    pub fn new(callback: js_sys::Function) -> Self {
        Self { callback }
    }
}

impl FrameObserver for JsObserver {
    fn on_frame(&mut self, frame: &GlowFrame) {
        let json = match serde_json::to_string(frame) {
            Ok(json) => json,
            Err(err) => {
                log::warn!("could not serialize glow frame: {}", err);
                return;
            }
        };
        let value = match js_sys::JSON::parse(&json) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("could not parse glow frame in JS: {:?}", err);
                return;
            }
        };
        if let Err(err) = self.callback.call1(&JsValue::NULL, &value) {
            log::warn!("glow frame callback threw: {:?}", err);
        }
    }
}
