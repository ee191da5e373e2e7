pub mod dispatch;
pub mod observer;
pub mod region;
pub mod runner;

pub use dispatch::Subscribers;
pub use observer::JsObserver;
pub use region::{DomRegion, DEFAULT_REGION_ELEMENT};
pub use runner::FieldRunner;

use std::cell::RefCell;

use drift_engine::{FieldConfig, InputEvent, Rect, SubscriptionId};
use wasm_bindgen::prelude::*;

use dispatch::RunnerSlot;

thread_local! {
    static RUNNER: RunnerSlot<DomRegion> = RefCell::new(None);
    static SUBSCRIBERS: RefCell<Subscribers<JsObserver>> = RefCell::new(Subscribers::new());
}

/// Run `f` against the live runner. `None` before `field_init`, after
/// `field_dispose`, or when called from inside another export.
fn with_runner<R>(f: impl FnOnce(&mut FieldRunner<DomRegion>) -> R) -> Option<R> {
    dispatch::with_runner(&RUNNER, f)
}

/// Start the field. Calling it again replaces the running field; page
/// subscriptions carry over.
///
/// `region_element_id` names the element to keep clear; defaults to `content-boundary`.
#[wasm_bindgen]
pub fn field_init(width: f32, height: f32, region_element_id: Option<String>) {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let provider = region_element_id.map(DomRegion::new).unwrap_or_default();
    let seed = (js_sys::Math::random() * u32::MAX as f64) as u64;
    let mut runner = FieldRunner::new(FieldConfig::default(), provider, seed);
    runner.init(width, height);

    let old = RUNNER.with(|cell| match cell.try_borrow_mut() {
        Ok(mut slot) => slot.replace(runner),
        Err(_) => {
            log::warn!("field_init called during a tick, ignored");
            None
        }
    });
    if let Some(mut old) = old {
        old.dispose();
    }
}

/// Advance the field, then call every subscribed callback once per stepped frame.
/// Callbacks run after the field is released and may call any export.
#[wasm_bindgen]
pub fn field_tick(dt: f32) {
    dispatch::tick_and_deliver(&RUNNER, &SUBSCRIBERS, dt);
}

/// Step on a fixed `dt` (seconds) drawn from accumulated frame time.
/// Zero or a negative `dt` returns to one step per refresh.
#[wasm_bindgen]
pub fn field_set_fixed_step(dt: f32) {
    with_runner(|r| r.set_fixed_step(dt));
}

#[wasm_bindgen]
pub fn field_pointer_move(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerMove { x, y }));
}

#[wasm_bindgen]
pub fn field_resize(width: f32, height: f32) {
    with_runner(|r| r.push_input(InputEvent::Resize { width, height }));
}

/// Push a region rect directly, bypassing the element lookup.
#[wasm_bindgen]
pub fn field_set_region(left: f32, top: f32, right: f32, bottom: f32) {
    let rect = Rect::new(left, top, right, bottom);
    with_runner(|r| r.push_input(InputEvent::Region { rect: Some(rect) }));
}

/// Apply JSON overrides. Returns false (and keeps the old config) when rejected.
#[wasm_bindgen]
pub fn field_load_config(json: &str) -> bool {
    let result = with_runner(|r| r.load_config(json));
    match result {
        Some(Ok(())) => true,
        Some(Err(err)) => {
            log::warn!("field config rejected: {}", err);
            false
        }
        None => false,
    }
}

/// Register a callback receiving every frame. Returns a handle for `field_unsubscribe`.
///
/// Works before `field_init` and survives a later `field_init`; `field_dispose` drops it.
#[wasm_bindgen]
pub fn field_subscribe(callback: js_sys::Function) -> u32 {
    SUBSCRIBERS.with(|s| s.borrow_mut().subscribe(JsObserver::new(callback)).raw())
}

#[wasm_bindgen]
pub fn field_unsubscribe(id: u32) -> bool {
    SUBSCRIBERS.with(|s| s.borrow_mut().unsubscribe(SubscriptionId::from_raw(id)))
}

/// True once the first frame is out, so page content can fade in.
#[wasm_bindgen]
pub fn field_is_ready() -> bool {
    with_runner(|r| r.is_ready()).unwrap_or(false)
}

/// Whether page point `(x, y)` is lit by the latest frame: within 80 px of a
/// cluster center, else within 35 px of any particle.
#[wasm_bindgen]
pub fn field_is_glowing(x: f32, y: f32) -> bool {
    with_runner(|r| r.is_glowing(x, y)).unwrap_or(false)
}

/// Stop the field and drop every subscription.
#[wasm_bindgen]
pub fn field_dispose() {
    SUBSCRIBERS.with(|s| s.borrow_mut().clear());
    let runner = RUNNER.with(|cell| cell.try_borrow_mut().ok().and_then(|mut slot| slot.take()));
    if let Some(mut runner) = runner {
        runner.dispose();
    }
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_frame_ptr() -> *const f32 {
    with_runner(|r| r.frame_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_frame_total_floats() -> u32 {
    with_runner(|r| r.frame_total_floats()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_particle_count() -> u32 {
    with_runner(|r| r.particle_count()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_cluster_count() -> u32 {
    with_runner(|r| r.cluster_count()).unwrap_or(0)
}

// ---- Vector accessors ----

#[cfg(feature = "vectors")]
#[wasm_bindgen]
pub fn get_vector_vertices_ptr() -> *const f32 {
    with_runner(|r| r.vector_vertices_ptr()).unwrap_or(std::ptr::null())
}

#[cfg(feature = "vectors")]
#[wasm_bindgen]
pub fn get_vector_vertex_count() -> u32 {
    with_runner(|r| r.vector_vertex_count()).unwrap_or(0)
}

/// Switch outline and line styling. `r, g, b` is the page foreground colour.
#[cfg(feature = "vectors")]
#[wasm_bindgen]
pub fn field_set_theme(dark: bool, r: u8, g: u8, b: u8) {
    use drift_engine::{Theme, VectorColor};

    let theme = if dark {
        Theme::dark(VectorColor::rgb8(r, g, b))
    } else {
        Theme::light()
    };
    with_runner(|runner| runner.set_theme(theme));
}
