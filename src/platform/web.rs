//! Browser binding: pointer listeners and a requestAnimationFrame loop on a
//! canvas, all torn down on drop.

use std::cell::{Cell, RefCell};
use std::f64::consts::PI;
use std::rc::Rc;

use glam::DVec2;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::{CancelToken, FrameLoop};
use crate::renderer::{Color, DrawCommand, Scene};
use crate::viewport::{PointerEvent, Viewport};

type Listener = Closure<dyn FnMut(web_sys::Event)>;
type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// A visualizer attached to a canvas
pub struct CanvasBinding {
    canvas: HtmlCanvasElement,
    viewport: Rc<RefCell<Viewport>>,
    listeners: Vec<(&'static str, Listener)>,
    token: CancelToken,
    frame_id: Rc<Cell<Option<i32>>>,
    frame: FrameCallback,
}

/// Pointer position in normalized canvas coordinates
fn normalized(canvas: &HtmlCanvasElement, event: &MouseEvent) -> DVec2 {
    let rect = canvas.get_bounding_client_rect();
    DVec2::new(
        (event.client_x() as f64 - rect.left()) / rect.width().max(1.0),
        (event.client_y() as f64 - rect.top()) / rect.height().max(1.0),
    )
}

fn css(color: Color) -> String {
    format!(
        "rgba({}, {}, {}, {})",
        (color[0] * 255.0).round(),
        (color[1] * 255.0).round(),
        (color[2] * 255.0).round(),
        color[3]
    )
}

/// Execute a scene on a 2D context
fn paint(ctx: &CanvasRenderingContext2d, scene: &Scene, w: f64, h: f64) -> Result<(), JsValue> {
    ctx.clear_rect(0.0, 0.0, w, h);
    let dash = js_sys::Array::of2(&JsValue::from(10.0), &JsValue::from(10.0));
    let solid = js_sys::Array::new();

    for command in &scene.commands {
        match command {
            DrawCommand::Polyline {
                points,
                color,
                width,
                dashed,
            } => {
                let Some((first, rest)) = points.split_first() else {
                    continue;
                };
                ctx.set_line_dash(if *dashed { &dash } else { &solid })?;
                ctx.set_stroke_style_str(&css(*color));
                ctx.set_line_width(*width as f64 * w);
                ctx.begin_path();
                ctx.move_to(first.x as f64 * w, first.y as f64 * h);
                for p in rest {
                    ctx.line_to(p.x as f64 * w, p.y as f64 * h);
                }
                ctx.stroke();
            }
            DrawCommand::Circle {
                center,
                radius,
                color,
            } => {
                ctx.set_fill_style_str(&css(*color));
                ctx.begin_path();
                ctx.arc(
                    center.x as f64 * w,
                    center.y as f64 * h,
                    *radius as f64 * w,
                    0.0,
                    2.0 * PI,
                )?;
                ctx.fill();
            }
            DrawCommand::Text {
                text,
                at,
                size,
                color,
            } => {
                let px = *size as f64 * h;
                ctx.set_fill_style_str(&css(*color));
                ctx.set_font(&format!("{}px sans-serif", px));
                ctx.fill_text(text, at.x as f64 * w, at.y as f64 * h + px)?;
            }
        }
    }
    Ok(())
}

impl CanvasBinding {
    /// Register pointer listeners on `canvas` and start drawing `scene` every
    /// frame. `scene` only reads the viewport.
    pub fn attach(
        canvas: HtmlCanvasElement,
        viewport: Viewport,
        mut scene: impl FnMut(&Viewport) -> Scene + 'static,
    ) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into()?;

        let viewport = Rc::new(RefCell::new(viewport));
        let token = CancelToken::new();
        let mut binding = Self {
            canvas: canvas.clone(),
            viewport: viewport.clone(),
            listeners: Vec::new(),
            token: token.clone(),
            frame_id: Rc::new(Cell::new(None)),
            frame: Rc::new(RefCell::new(None)),
        };

        binding.listen("mousedown", |c, e| {
            e.dyn_ref::<MouseEvent>()
                .map(|m| PointerEvent::Down(normalized(c, m)))
        })?;
        binding.listen("mousemove", |c, e| {
            e.dyn_ref::<MouseEvent>()
                .map(|m| PointerEvent::Move(normalized(c, m)))
        })?;
        binding.listen("mouseup", |c, e| {
            e.dyn_ref::<MouseEvent>()
                .map(|m| PointerEvent::Up(normalized(c, m)))
        })?;
        binding.listen("mouseleave", |_, _| Some(PointerEvent::Leave))?;
        binding.listen("wheel", |c, e| {
            let wheel = e.dyn_ref::<WheelEvent>()?;
            e.prevent_default();
            Some(PointerEvent::Wheel {
                delta_y: wheel.delta_y(),
                at: normalized(c, wheel),
            })
        })?;

        // Frame loop
        let surface = canvas;
        let mut frames = FrameLoop::new(token, move || {
            let (w, h) = (surface.width() as f64, surface.height() as f64);
            let drawn = scene(&viewport.borrow());
            if let Err(e) = paint(&ctx, &drawn, w, h) {
                log::warn!("Paint failed: {:?}", e);
            }
        });
        let handle = binding.frame.clone();
        let frame_id = binding.frame_id.clone();
        let schedule_window = window.clone();
        *binding.frame.borrow_mut() = Some(Closure::new(move |_time: f64| {
            frame_id.set(None);
            if !frames.tick() {
                return;
            }
            if let Some(callback) = handle.borrow().as_ref() {
                frame_id.set(
                    schedule_window
                        .request_animation_frame(callback.as_ref().unchecked_ref())
                        .ok(),
                );
            }
        }));

        let first = binding
            .frame
            .borrow()
            .as_ref()
            .map(|callback| window.request_animation_frame(callback.as_ref().unchecked_ref()));
        if let Some(id) = first {
            binding.frame_id.set(Some(id?));
        }

        log::info!("Canvas binding attached");
        Ok(binding)
    }

    fn listen(
        &mut self,
        name: &'static str,
        map: impl Fn(&HtmlCanvasElement, &web_sys::Event) -> Option<PointerEvent> + 'static,
    ) -> Result<(), JsValue> {
        let canvas = self.canvas.clone();
        let viewport = self.viewport.clone();
        let token = self.token.clone();
        let listener = Listener::new(move |event: web_sys::Event| {
            if token.is_cancelled() {
                return;
            }
            if let Some(pointer) = map(&canvas, &event) {
                viewport.borrow_mut().apply(pointer);
            }
        });
        self.canvas
            .add_event_listener_with_callback(name, listener.as_ref().unchecked_ref())?;
        self.listeners.push((name, listener));
        Ok(())
    }

    /// Current viewport state
    pub fn viewport(&self) -> Viewport {
        self.viewport.borrow().clone()
    }

    /// Replace the viewport, e.g. after refitting to new data
    pub fn set_viewport(&self, viewport: Viewport) {
        *self.viewport.borrow_mut() = viewport;
    }
}

impl Drop for CanvasBinding {
    fn drop(&mut self) {
        self.token.cancel();
        for (name, listener) in self.listeners.drain(..) {
            let _ = self
                .canvas
                .remove_event_listener_with_callback(name, listener.as_ref().unchecked_ref());
        }
        if let Some(id) = self.frame_id.take() {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(id);
            }
        }
        // Breaks the callback's reference to itself
        self.frame.borrow_mut().take();
        log::info!("Canvas binding detached");
    }
}
