//! Chart Component
//!
//! Mounts a [`ChartSpec`] on a canvas through Chart.js, which the page loads
//! as a global script. Tooltip and tick callbacks are Rust closures reading
//! the value formats carried by the spec.

use js_sys::{Object, Reflect};
use leptos::*;
use recarga::ChartSpec;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = Chart)]
    type ChartJs;

    #[wasm_bindgen(catch, constructor, js_class = "Chart")]
    fn new(canvas: &HtmlCanvasElement, config: &JsValue) -> Result<ChartJs, JsValue>;

    #[wasm_bindgen(method)]
    fn destroy(this: &ChartJs);
}

type Callback = Closure<dyn Fn(JsValue) -> JsValue>;

/// A live Chart.js instance and the callbacks it references
struct MountedChart {
    chart: ChartJs,
    _callbacks: Vec<Callback>,
}

impl Drop for MountedChart {
    fn drop(&mut self) {
        self.chart.destroy();
    }
}

/// Canvas rendering one chart
#[component]
pub fn ChartCanvas(spec: ChartSpec) -> impl IntoView {
    let canvas_ref = create_node_ref::<html::Canvas>();
    let mounted: Rc<RefCell<Option<MountedChart>>> = Rc::default();
    let canvas_id = spec.slot.canvas_id();
    let spec = Rc::new(spec);

    let slot = Rc::clone(&mounted);
    canvas_ref.on_load(move |canvas| match mount(&canvas, spec) {
        Ok(chart) => *slot.borrow_mut() = Some(chart),
        Err(e) => web_sys::console::error_2(&"Failed to create chart".into(), &e),
    });

    // Chart.js keeps the canvas bound until destroyed
    on_cleanup(move || drop(mounted.borrow_mut().take()));

    view! {
        <canvas id=canvas_id node_ref=canvas_ref class="w-full" />
    }
}

fn mount(canvas: &HtmlCanvasElement, spec: Rc<ChartSpec>) -> Result<MountedChart, JsValue> {
    let json = serde_json::to_string(spec.as_ref()).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let config = js_sys::JSON::parse(&json)?;
    let mut callbacks = Vec::new();

    let options = child_object(&config, "options")?;

    // options.plugins.tooltip.callbacks.label
    let tooltip_spec = Rc::clone(&spec);
    let label = Closure::<dyn Fn(JsValue) -> JsValue>::new(move |ctx: JsValue| {
        let index = Reflect::get(&ctx, &"datasetIndex".into())
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0) as usize;
        let value = Reflect::get(&ctx, &"parsed".into())
            .and_then(|parsed| Reflect::get(&parsed, &"y".into()))
            .ok()
            .and_then(|v| v.as_f64());
        tooltip_spec
            .tooltip_label(index, value)
            .map(JsValue::from)
            .unwrap_or(JsValue::UNDEFINED)
    });
    let tooltip_callbacks = child_object(
        &child_object(&child_object(&options, "plugins")?, "tooltip")?,
        "callbacks",
    )?;
    Reflect::set(&tooltip_callbacks, &"label".into(), label.as_ref())?;
    callbacks.push(label);

    // options.scales.<id>.ticks.callback
    let scales = child_object(&options, "scales")?;
    for axis_id in spec.options.scales.keys() {
        let tick_spec = Rc::clone(&spec);
        let id = axis_id.clone();
        let tick = Closure::<dyn Fn(JsValue) -> JsValue>::new(move |value: JsValue| {
            value
                .as_f64()
                .and_then(|v| tick_spec.tick_label(&id, v))
                .map(JsValue::from)
                .unwrap_or(value)
        });
        let ticks = child_object(&child_object(&scales, axis_id)?, "ticks")?;
        Reflect::set(&ticks, &"callback".into(), tick.as_ref())?;
        callbacks.push(tick);
    }

    let chart = ChartJs::new(canvas, &config)?;
    Ok(MountedChart {
        chart,
        _callbacks: callbacks,
    })
}

/// `parent[key]`, created as an empty object when missing
fn child_object(parent: &JsValue, key: &str) -> Result<JsValue, JsValue> {
    let existing = Reflect::get(parent, &key.into())?;
    if existing.is_object() {
        return Ok(existing);
    }
    let created: JsValue = Object::new().into();
    Reflect::set(parent, &key.into(), &created)?;
    Ok(created)
}
