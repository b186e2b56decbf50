use crate::browser;
use anyhow::{anyhow, Error, Result};
// ELI5: web assembly is a single threaded environment, so Rc RefCell > Mutex
use async_trait::async_trait;
use futures::channel::oneshot::channel;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{
    // unchecked_ref (unsafe) cast from Javascript type to Rust type
    // - we control the closure creation and specify the expected type
    JsCast,
    JsValue,
};
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use self::input::KeyState;

#[async_trait(?Send)]
pub trait Game {
    async fn initialize(&self) -> Result<Box<dyn Game>>;
    fn update(&mut self, keystate: &KeyState);
    fn draw(&mut self, renderer: &Renderer);
}

// length of a frame in milliseconds
pub const FRAME_SIZE: f32 = 1.0 / 60.0 * 1000.0;

pub struct GameLoop {
    last_frame: f64,
    accumulated_delta: f32,
}

type SharedLoopClosure = Rc<RefCell<Option<browser::LoopClosure>>>;

impl GameLoop {
    pub async fn start(game: impl Game + 'static) -> Result<()> {
        let mut input_receiver = input::prepare_input()?;
        let mut game = game.initialize().await?;
        let mut game_loop = GameLoop {
            last_frame: browser::now()?,
            accumulated_delta: 0.0,
        };
        let renderer = Renderer {
            context: browser::context()?,
        };
        let mut keystate = KeyState::new();

        let f: SharedLoopClosure = Rc::new(RefCell::new(None));
        let g = f.clone();
        *g.borrow_mut() = Some(browser::create_raf_closure(move |perf: f64| {
            input::process_input(&mut keystate, &mut input_receiver);

            game_loop.accumulated_delta += (perf - game_loop.last_frame) as f32;
            let mut stepped = false;
            while game_loop.accumulated_delta > FRAME_SIZE {
                game.update(&keystate);
                game_loop.accumulated_delta -= FRAME_SIZE;
                stepped = true;
            }
            // presses are one shot : only drop them once a step saw them
            if stepped {
                keystate.clear_presses();
            }
            game_loop.last_frame = perf;
            game.draw(&renderer);

            if let Some(closure) = f.borrow().as_ref() {
                if let Err(err) = browser::request_animation_frame(closure) {
                    error!("GameLoop: {:#?}", err);
                }
            }
        }));

        browser::request_animation_frame(
            g.borrow()
                .as_ref()
                .ok_or_else(|| anyhow!("GameLoop: Loop is None"))?,
        )?;

        Ok(())
    }
}

// ==================== Geometry ====================
#[derive(Debug, Default, Copy, Clone, PartialEq, Deserialize, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Deserialize, Serialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

/// Axis aligned, `position` is the top left corner (canvas origin is top left)
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Rect {
    pub position: Point,
    pub size: Size,
}

impl Rect {
    pub fn new(position: Point, size: Size) -> Self {
        Rect { position, size }
    }

    pub fn new_from_x_y(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect::new(Point { x, y }, Size { width, height })
    }

    /// Most things in this game are placed by their centre
    pub fn centered_at(center: Point, size: Size) -> Self {
        Rect::new_from_x_y(
            center.x - size.width / 2.0,
            center.y - size.height / 2.0,
            size.width,
            size.height,
        )
    }

    pub fn x(&self) -> f32 {
        self.position.x
    }

    pub fn y(&self) -> f32 {
        self.position.y
    }

    pub fn right(&self) -> f32 {
        self.position.x + self.size.width
    }

    pub fn bottom(&self) -> f32 {
        self.position.y + self.size.height
    }

    pub fn center(&self) -> Point {
        Point {
            x: self.position.x + self.size.width / 2.0,
            y: self.position.y + self.size.height / 2.0,
        }
    }

    /// strict overlap, rects that only share an edge don't intersect
    pub fn intersects(&self, rect: &Rect) -> bool {
        self.x() < rect.right()
            && self.right() > rect.x()
            && self.y() < rect.bottom()
            && self.bottom() > rect.y()
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x() && point.x <= self.right() && point.y >= self.y() && point.y <= self.bottom()
    }
}

// ==================== Rendering ====================
pub struct Renderer {
    context: CanvasRenderingContext2d,
}

/// How a line of text should look, mirrors the canvas font/fill settings
#[derive(Debug, Clone)]
pub struct TextStyle {
    pub font: String,
    pub color: &'static str,
    pub alpha: f64,
    pub align: &'static str,
}

impl Default for TextStyle {
    fn default() -> Self {
        TextStyle {
            font: "16px sans-serif".to_string(),
            color: "#fff",
            alpha: 1.0,
            align: "left",
        }
    }
}

impl Renderer {
    pub fn clear(&self, rect: &Rect) {
        self.context.clear_rect(
            rect.x().into(),
            rect.y().into(),
            rect.size.width.into(),
            rect.size.height.into(),
        );
    }

    pub fn fill_rect(&self, rect: &Rect, color: &str) {
        self.context.set_fill_style_str(color);
        self.context.fill_rect(
            rect.x().into(),
            rect.y().into(),
            rect.size.width.into(),
            rect.size.height.into(),
        );
    }

    pub fn draw_image(&self, image: &HtmlImageElement, frame: &Rect, destination: &Rect) {
        if let Err(err) = self
            .context
            .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                image,
                frame.x().into(),
                frame.y().into(),
                frame.size.width.into(),
                frame.size.height.into(),
                destination.x().into(),
                destination.y().into(),
                destination.size.width.into(),
                destination.size.height.into(),
            )
        {
            error!("Renderer::draw_image : {:#?}", err);
        }
    }

    /// Same as `draw_image` but spun around the destination centre
    pub fn draw_image_rotated(
        &self,
        image: &HtmlImageElement,
        frame: &Rect,
        destination: &Rect,
        angle_degrees: f32,
    ) {
        if angle_degrees == 0.0 {
            return self.draw_image(image, frame, destination);
        }
        let center = destination.center();
        self.context.save();
        let transformed = self
            .context
            .translate(center.x.into(), center.y.into())
            .and_then(|_| self.context.rotate(f64::from(angle_degrees).to_radians()));
        match transformed {
            Ok(()) => {
                let local = Rect::new_from_x_y(
                    -destination.size.width / 2.0,
                    -destination.size.height / 2.0,
                    destination.size.width,
                    destination.size.height,
                );
                self.draw_image(image, frame, &local);
            }
            Err(err) => error!("Renderer::draw_image_rotated : {:#?}", err),
        }
        self.context.restore();
    }

    pub fn draw_entire_image(&self, image: &HtmlImageElement, destination: &Rect) {
        if let Err(err) = self.context.draw_image_with_html_image_element_and_dw_and_dh(
            image,
            destination.x().into(),
            destination.y().into(),
            destination.size.width.into(),
            destination.size.height.into(),
        ) {
            error!("Renderer::draw_entire_image : {:#?}", err);
        }
    }

    pub fn draw_text(&self, text: &str, position: Point, style: &TextStyle) {
        self.context.save();
        self.context.set_font(&style.font);
        self.context.set_fill_style_str(style.color);
        self.context.set_global_alpha(style.alpha);
        self.context.set_text_align(style.align);
        self.context.set_text_baseline("top");
        if let Err(err) = self
            .context
            .fill_text(text, position.x.into(), position.y.into())
        {
            error!("Renderer::draw_text : {:#?}", err);
        }
        self.context.restore();
    }

    #[cfg(debug_assertions)]
    pub fn stroke_rect(&self, rect: &Rect, color: &str) {
        self.context.set_stroke_style_str(color);
        self.context.stroke_rect(
            rect.x().into(),
            rect.y().into(),
            rect.size.width.into(),
            rect.size.height.into(),
        );
    }
}

/// debug builds outline collision boxes
#[cfg(debug_assertions)]
pub trait DebugDraw {
    fn draw_debug(&self, renderer: &Renderer);
}

#[cfg(debug_assertions)]
impl DebugDraw for Rect {
    fn draw_debug(&self, renderer: &Renderer) {
        renderer.stroke_rect(self, "#ff0000");
    }
}

/// A whole image element placed somewhere in the world
pub struct Image {
    element: HtmlImageElement,
    bounding_box: Rect,
}

impl Image {
    pub fn new(element: HtmlImageElement, position: Point) -> Self {
        let size = image_size(&element);
        Image {
            element,
            bounding_box: Rect::new(position, size),
        }
    }

    pub fn centered_at(element: HtmlImageElement, center: Point) -> Self {
        let size = image_size(&element);
        Image {
            element,
            bounding_box: Rect::centered_at(center, size),
        }
    }

    /// Scale around the current centre
    pub fn scaled(mut self, factor: f32) -> Self {
        let center = self.bounding_box.center();
        let size = Size {
            width: self.bounding_box.size.width * factor,
            height: self.bounding_box.size.height * factor,
        };
        self.bounding_box = Rect::centered_at(center, size);
        self
    }

    pub fn bounding_box(&self) -> &Rect {
        &self.bounding_box
    }

    pub fn draw(&self, renderer: &Renderer) {
        renderer.draw_entire_image(&self.element, &self.bounding_box);
    }
}

pub fn image_size(image: &HtmlImageElement) -> Size {
    Size {
        width: image.natural_width() as f32,
        height: image.natural_height() as f32,
    }
}

/// Asynchronously load an image from a given source path
/// # Arguments
/// * `source` - string slice to path/url
/// # Returns
/// * `Ok(HtmlImageElement)` - on load success
/// * `Err` - on load fail
pub async fn load_image(source: &str) -> Result<HtmlImageElement> {
    let image = browser::new_image()?;
    let (tx, rx) = channel::<Result<(), Error>>();
    let success_tx = Rc::new(RefCell::new(Some(tx)));
    let error_tx = success_tx.clone();

    let success_callback = browser::closure_once(move || {
        if let Some(tx) = success_tx.borrow_mut().take() {
            let _ = tx.send(Ok(()));
        }
    });

    let source_name = source.to_string();
    let error_callback = browser::closure_once(move |err: JsValue| {
        if let Some(tx) = error_tx.borrow_mut().take() {
            let _ = tx.send(Err(anyhow!(
                "[engine.rs::load_image] Error loading image {}: {:#?}",
                source_name,
                err
            )));
        }
    });

    image.set_onload(Some(success_callback.as_ref().unchecked_ref()));
    image.set_onerror(Some(error_callback.as_ref().unchecked_ref()));
    image.set_src(source);

    // keep callback alive until image is loaded or errors
    success_callback.forget();
    error_callback.forget();

    // ?? - Result<Result<(), Error>, oneshot::Canceled>
    // - first ? yields channel result : Result<(), Error>
    // - second ? yields image load result : () or propagating Error
    rx.await??;

    Ok(image)
}

// ==================== Input ====================
pub mod input {
    use super::Point;
    use crate::browser;
    use anyhow::Result;
    use futures::channel::mpsc::{unbounded, UnboundedReceiver};
    use std::collections::HashSet;
    use wasm_bindgen::JsCast;

    // KeyboardEvent.code values the game reacts to
    pub const ARROW_LEFT: &str = "ArrowLeft";
    pub const ARROW_RIGHT: &str = "ArrowRight";
    pub const ARROW_UP: &str = "ArrowUp";
    pub const ENTER: &str = "Enter";

    #[derive(Debug)]
    pub enum InputEvent {
        KeyDown(String),
        KeyUp(String),
        PointerDown(Point),
    }

    /// Snapshot of what is held down right now, plus the key and pointer
    /// presses that arrived since the last update step
    #[derive(Debug, Default, Clone)]
    pub struct KeyState {
        pressed_keys: HashSet<String>,
        new_presses: HashSet<String>,
        pointer_presses: Vec<Point>,
    }

    impl KeyState {
        pub fn new() -> Self {
            KeyState::default()
        }

        pub fn is_pressed(&self, code: &str) -> bool {
            self.pressed_keys.contains(code)
        }

        /// Went down since the last step. Auto-repeat of a held key doesn't
        /// count.
        pub fn was_just_pressed(&self, code: &str) -> bool {
            self.new_presses.contains(code)
        }

        pub fn set_pressed(&mut self, code: &str) {
            if self.pressed_keys.insert(code.to_string()) {
                self.new_presses.insert(code.to_string());
            }
        }

        pub fn set_released(&mut self, code: &str) {
            self.pressed_keys.remove(code);
        }

        pub fn press_pointer(&mut self, at: Point) {
            self.pointer_presses.push(at);
        }

        pub fn pointer_presses(&self) -> &[Point] {
            &self.pointer_presses
        }

        /// Forget one shot presses (keys and pointer), held keys stay
        pub fn clear_presses(&mut self) {
            self.new_presses.clear();
            self.pointer_presses.clear();
        }
    }

    pub fn prepare_input() -> Result<UnboundedReceiver<InputEvent>> {
        let (keydown_sender, receiver) = unbounded();
        let keyup_sender = keydown_sender.clone();
        let pointer_sender = keydown_sender.clone();

        let onkeydown = browser::closure_wrap(Box::new(move |event: web_sys::KeyboardEvent| {
            // arrows would otherwise scroll the page
            if event.code().starts_with("Arrow") {
                event.prevent_default();
            }
            let _ = keydown_sender.unbounded_send(InputEvent::KeyDown(event.code()));
        }) as Box<dyn FnMut(web_sys::KeyboardEvent)>);

        let onkeyup = browser::closure_wrap(Box::new(move |event: web_sys::KeyboardEvent| {
            let _ = keyup_sender.unbounded_send(InputEvent::KeyUp(event.code()));
        }) as Box<dyn FnMut(web_sys::KeyboardEvent)>);

        let onmousedown = browser::closure_wrap(Box::new(move |event: web_sys::MouseEvent| {
            let at = Point {
                x: event.offset_x() as f32,
                y: event.offset_y() as f32,
            };
            let _ = pointer_sender.unbounded_send(InputEvent::PointerDown(at));
        }) as Box<dyn FnMut(web_sys::MouseEvent)>);

        let canvas = browser::canvas()?;
        canvas.set_onkeydown(Some(onkeydown.as_ref().unchecked_ref()));
        canvas.set_onkeyup(Some(onkeyup.as_ref().unchecked_ref()));
        canvas.set_onmousedown(Some(onmousedown.as_ref().unchecked_ref()));

        // listeners live as long as the page
        onkeydown.forget();
        onkeyup.forget();
        onmousedown.forget();

        Ok(receiver)
    }

    pub fn process_input(state: &mut KeyState, receiver: &mut UnboundedReceiver<InputEvent>) {
        // Err : nothing queued or channel closed
        while let Ok(event) = receiver.try_recv() {
            apply(state, event);
        }
    }

    pub fn apply(state: &mut KeyState, event: InputEvent) {
        match event {
            InputEvent::KeyDown(code) => state.set_pressed(&code),
            InputEvent::KeyUp(code) => state.set_released(&code),
            InputEvent::PointerDown(at) => state.press_pointer(at),
        }
    }

}
