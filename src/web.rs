//! Browser front end
//!
//! Canvas 2D rendering, keyboard/touch input, Web Audio feedback and the
//! requestAnimationFrame loop. Everything here is glue around `Session`.

use std::cell::{Cell as StdCell, RefCell};
use std::f64::consts::TAU;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Element, HtmlCanvasElement, HtmlElement};

use crate::audio::AudioManager;
use crate::consts::GRID_SIZE;
use crate::feedback::CuePicker;
use crate::fx::palette;
use crate::persistence::LocalStorageStore;
use crate::platform::{
    FeedbackSink, InputIntent, RenderSink, intent_from_key, intent_from_pad, intent_from_swipe,
    run_frame,
};
use crate::session::Session;
use crate::settings::Settings;
use crate::sim::{FoodKind, GameEvent, GamePhase, Snapshot};

/// Start screen, restored when a new run begins after game over
const START_OVERLAY: &str = "<h1>Snake Pro</h1>\
    <p>Swipe or use the arrow keys</p>\
    <p>Normal +10 | Boost +20 | Shield blocks one hit</p>\
    <button id=\"startBtn\">Start</button>";

/// Head glow, teal fading out
const GLOW_INNER: &str = "rgba(94,234,212,.45)";
const GLOW_OUTER: &str = "rgba(94,234,212,0)";

/// Pad button highlight (ms)
const PAD_PRESS_MS: i32 = 80;
/// Pad button vibration (ms)
const PAD_VIBRATE_MS: u32 = 6;

/// Draws snapshots onto a square canvas
pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    size: f64,
    /// Canvas px per particle px
    particle_scale: f64,
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement, settings: &Settings) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        let size = canvas.width() as f64;
        let cell = size / GRID_SIZE as f64;
        Some(Self {
            ctx,
            size,
            particle_scale: cell / settings.cell_size as f64,
        })
    }

    fn cell_px(&self) -> f64 {
        self.size / GRID_SIZE as f64
    }

    /// Rounded cell; `round` is the corner radius as a fraction of the cell
    fn draw_cell(&self, x: i32, y: i32, color: u32, round: f64) {
        let cell = self.cell_px();
        let (px, py) = (x as f64 * cell, y as f64 * cell);
        let r = cell * round;
        let ctx = &self.ctx;
        ctx.set_fill_style_str(&palette::css(color));
        ctx.begin_path();
        ctx.move_to(px + r, py);
        let _ = ctx.arc_to(px + cell, py, px + cell, py + cell, r);
        let _ = ctx.arc_to(px + cell, py + cell, px, py + cell, r);
        let _ = ctx.arc_to(px, py + cell, px, py, r);
        let _ = ctx.arc_to(px, py, px + cell, py, r);
        ctx.close_path();
        ctx.fill();
    }

    fn draw_head_glow(&self, x: i32, y: i32) {
        let cell = self.cell_px();
        let (hx, hy) = ((x as f64 + 0.5) * cell, (y as f64 + 0.5) * cell);
        let radius = cell * 1.2;
        let Ok(gradient) = self.ctx.create_radial_gradient(hx, hy, 2.0, hx, hy, radius) else {
            return;
        };
        let _ = gradient.add_color_stop(0.0, GLOW_INNER);
        let _ = gradient.add_color_stop(1.0, GLOW_OUTER);
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.ctx.begin_path();
        let _ = self.ctx.arc(hx, hy, radius, 0.0, TAU);
        self.ctx.fill();
    }

    fn draw_grid(&self) {
        let cell = self.cell_px();
        self.ctx.set_stroke_style_str("rgba(255,255,255,.05)");
        for i in 0..=GRID_SIZE {
            let p = i as f64 * cell;
            self.ctx.begin_path();
            self.ctx.move_to(p, 0.0);
            self.ctx.line_to(p, self.size);
            self.ctx.stroke();
            self.ctx.begin_path();
            self.ctx.move_to(0.0, p);
            self.ctx.line_to(self.size, p);
            self.ctx.stroke();
        }
    }

    fn draw_banner(&self, text: &str) {
        self.ctx.set_fill_style_str("rgba(0,0,0,.45)");
        self.ctx.fill_rect(0.0, 0.0, self.size, self.size);
        self.ctx.set_fill_style_str("#fff");
        self.ctx.set_font("bold 28px sans-serif");
        self.ctx.set_text_align("center");
        let _ = self.ctx.fill_text(text, self.size / 2.0, self.size / 2.0);
        self.ctx.set_text_align("start");
    }
}

impl RenderSink for CanvasRenderer {
    fn render(&mut self, snapshot: &Snapshot) {
        self.ctx.clear_rect(0.0, 0.0, self.size, self.size);
        self.draw_grid();

        for o in &snapshot.obstacles {
            self.draw_cell(o.x, o.y, palette::OBSTACLE, 0.15);
        }

        let food_color = match snapshot.food.kind {
            FoodKind::Normal => palette::AMBER,
            FoodKind::Boost => palette::CYAN,
            FoodKind::Shield => palette::VIOLET,
        };
        self.draw_cell(snapshot.food.cell.x, snapshot.food.cell.y, food_color, 0.35);

        for (i, s) in snapshot.snake.iter().enumerate() {
            let color = if i == 0 { palette::SNAKE_HEAD } else { palette::SNAKE_BODY };
            self.draw_cell(s.x, s.y, color, 0.25);
        }
        if let Some(head) = snapshot.head() {
            self.draw_head_glow(head.x, head.y);
        }

        if snapshot.shield > 0 {
            if let Some(head) = snapshot.head() {
                let cell = self.cell_px();
                self.ctx.set_stroke_style_str(&palette::css(palette::VIOLET));
                self.ctx.begin_path();
                let _ = self.ctx.arc(
                    (head.x as f64 + 0.5) * cell,
                    (head.y as f64 + 0.5) * cell,
                    cell * 0.8,
                    0.0,
                    TAU,
                );
                self.ctx.stroke();
            }
        }

        for p in &snapshot.particles {
            self.ctx.set_fill_style_str(&palette::css(p.color));
            self.ctx.set_global_alpha((p.life as f64 / 30.0).clamp(0.0, 1.0));
            self.ctx.begin_path();
            let _ = self.ctx.arc(
                p.pos.x as f64 * self.particle_scale,
                p.pos.y as f64 * self.particle_scale,
                p.radius as f64,
                0.0,
                TAU,
            );
            self.ctx.fill();
        }
        self.ctx.set_global_alpha(1.0);

        if snapshot.paused() {
            self.draw_banner("Paused");
        } else if snapshot.game_over() {
            self.draw_banner("Game Over");
        }
    }
}

/// Sound, vibration and screen shake
pub struct WebFeedback {
    audio: AudioManager,
    picker: CuePicker,
    haptics: bool,
    shake: bool,
    stage: Option<Element>,
}

impl WebFeedback {
    pub fn new(settings: &Settings, stage: Option<Element>) -> Self {
        Self {
            audio: AudioManager::new(settings.effective_volume()),
            picker: CuePicker::new(settings.move_sound_interval),
            haptics: settings.haptics,
            shake: settings.effective_screen_shake(),
            stage,
        }
    }

    /// Restart the CSS shake animation
    fn shake_stage(&self) {
        let Some(stage) = &self.stage else { return };
        let classes = stage.class_list();
        let _ = classes.remove_1("fx-shake");
        // Force reflow so re-adding the class restarts the animation
        if let Some(el) = stage.dyn_ref::<HtmlElement>() {
            let _ = el.offset_width();
        }
        let _ = classes.add_1("fx-shake");
    }
}

impl FeedbackSink for WebFeedback {
    fn dispatch(&mut self, event: &GameEvent, _now_ms: f64) {
        if self.shake && event.shakes() {
            self.shake_stage();
        }
        let Some(cue) = self.picker.pick(event) else {
            return;
        };
        self.audio.play_cue(&cue);
        if let (true, Some(ms)) = (self.haptics, cue.vibrate_ms) {
            if let Some(window) = web_sys::window() {
                let _ = window.navigator().vibrate_with_duration(ms);
            }
        }
    }
}

/// Game instance holding all browser-side state
struct WebGame {
    session: Session,
    renderer: CanvasRenderer,
    feedback: WebFeedback,
}

impl WebGame {
    fn dispatch_all(&mut self, events: &[GameEvent], now_ms: f64) {
        for event in events {
            self.feedback.dispatch(event, now_ms);
        }
    }

    fn update_hud(&self) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(el) = document.get_element_by_id("score") {
            el.set_text_content(Some(&self.session.score().to_string()));
        }
        if let Some(el) = document.get_element_by_id("best") {
            el.set_text_content(Some(&self.session.best().to_string()));
        }
        if let Some(el) = document.get_element_by_id("overlay") {
            let classes = el.class_list();
            let _ = match self.session.phase() {
                GamePhase::Idle => classes.add_1("show"),
                GamePhase::Over => {
                    el.set_inner_html(&format!(
                        "<h1>Game Over</h1>\
                         <p>Score: <b>{}</b> | Best: <b>{}</b></p>\
                         <button id=\"restartBtn\">Play again</button>",
                        self.session.score(),
                        self.session.best()
                    ));
                    classes.add_1("show")
                }
                GamePhase::Running | GamePhase::Paused => {
                    if document.get_element_by_id("restartBtn").is_some() {
                        el.set_inner_html(START_OVERLAY);
                    }
                    classes.remove_1("show")
                }
            };
        }
        if let Some(el) = document.get_element_by_id("pauseBtn") {
            let label = if self.session.is_paused() { "Resume" } else { "Pause" };
            el.set_text_content(Some(label));
        }
    }
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// Boot the game: find the canvas, wire up input and start the frame loop
pub fn run() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }

    log::info!("Snake Pro starting...");

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let Some(canvas) = document
        .get_element_by_id("game")
        .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
    else {
        log::error!("No #game canvas found");
        return;
    };

    let mut settings = Settings::load();
    settings.cell_size = canvas.width() as f32 / GRID_SIZE as f32;

    let Some(renderer) = CanvasRenderer::new(&canvas, &settings) else {
        log::error!("Canvas 2D context unavailable");
        return;
    };
    let stage = document
        .query_selector(".stage-wrap")
        .ok()
        .flatten();
    let feedback = WebFeedback::new(&settings, stage);
    let session = Session::new(Box::new(LocalStorageStore), settings);

    let game = Rc::new(RefCell::new(WebGame {
        session,
        renderer,
        feedback,
    }));
    game.borrow().update_hud();

    setup_keyboard(game.clone());
    setup_touch(&canvas, game.clone());
    setup_buttons(game.clone());
    setup_pad(game.clone());
    setup_auto_pause(game.clone());

    request_animation_frame(game);
    log::info!("Snake Pro running!");
}

fn apply_intent(game: &Rc<RefCell<WebGame>>, intent: InputIntent) {
    let now = now_ms();
    let mut g = game.borrow_mut();
    if intent == InputIntent::Start {
        g.feedback.audio.resume();
    }
    let events = g.session.handle(intent, now);
    if intent == InputIntent::ToggleMute {
        let settings = g.session.settings().clone();
        g.feedback.audio.set_volume(settings.effective_volume());
        settings.save();
    }
    g.dispatch_all(&events, now);
    g.update_hud();
}

fn setup_keyboard(game: Rc<RefCell<WebGame>>) {
    let Some(window) = web_sys::window() else { return };
    let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
        if let Some(intent) = intent_from_key(&event.key(), &event.code()) {
            // Keep arrows/space from scrolling the page
            event.prevent_default();
            apply_intent(&game, intent);
        }
    });
    let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn setup_touch(canvas: &HtmlCanvasElement, game: Rc<RefCell<WebGame>>) {
    let start = Rc::new(StdCell::new((0.0f32, 0.0f32)));

    {
        let start = start.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::TouchEvent| {
            if let Some(t) = event.changed_touches().get(0) {
                start.set((t.client_x() as f32, t.client_y() as f32));
            }
        });
        let _ = canvas.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::TouchEvent| {
            let Some(t) = event.changed_touches().get(0) else { return };
            let (sx, sy) = start.get();
            if let Some(intent) = intent_from_swipe(t.client_x() as f32 - sx, t.client_y() as f32 - sy) {
                apply_intent(&game, intent);
            }
        });
        let _ = canvas.add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

fn setup_buttons(game: Rc<RefCell<WebGame>>) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    // Delegated: the overlay buttons are recreated on game over
    let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
        let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
            return;
        };
        let intent = match target.id().as_str() {
            "startBtn" | "restartBtn" => InputIntent::Start,
            "pauseBtn" => InputIntent::TogglePause,
            _ => return,
        };
        apply_intent(&game, intent);
    });
    let _ = document.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure.forget();
}

/// On-screen direction pad (`.controls button[data-dir]`)
fn setup_pad(game: Rc<RefCell<WebGame>>) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let Ok(buttons) = document.query_selector_all(".controls button") else {
        return;
    };
    let options = web_sys::AddEventListenerOptions::new();
    options.set_passive(false);

    for i in 0..buttons.length() {
        let Some(btn) = buttons.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
            continue;
        };
        let Some(intent) = btn.get_attribute("data-dir").as_deref().and_then(intent_from_pad) else {
            continue;
        };

        // touchstart for mobile, mousedown for desktop; no click delay
        for kind in ["touchstart", "mousedown"] {
            let game = game.clone();
            let btn = btn.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                if event.cancelable() {
                    event.prevent_default();
                }
                apply_intent(&game, intent);
                press_pad_button(&btn, game.borrow().session.settings().haptics);
            });
            let _ = btn.add_event_listener_with_callback_and_add_event_listener_options(
                kind,
                closure.as_ref().unchecked_ref(),
                &options,
            );
            closure.forget();
        }
    }
}

/// Brief `pressed` highlight plus a haptic tick
fn press_pad_button(btn: &Element, haptics: bool) {
    let Some(window) = web_sys::window() else { return };
    let _ = btn.class_list().add_1("pressed");
    let target = btn.clone();
    let release = Closure::once(move || {
        let _ = target.class_list().remove_1("pressed");
    });
    let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        release.as_ref().unchecked_ref(),
        PAD_PRESS_MS,
    );
    release.forget();
    if haptics {
        let _ = window.navigator().vibrate_with_duration(PAD_VIBRATE_MS);
    }
}

fn setup_auto_pause(game: Rc<RefCell<WebGame>>) {
    let Some(window) = web_sys::window() else { return };
    let Some(document) = window.document() else { return };

    // Visibility change (tab switch, minimize)
    {
        let game = game.clone();
        let doc = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if doc.visibility_state() == web_sys::VisibilityState::Hidden {
                let mut g = game.borrow_mut();
                if g.session.pause() {
                    log::info!("Auto-paused (tab hidden)");
                    g.update_hud();
                }
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    // Window blur (click outside)
    {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
            let mut g = game.borrow_mut();
            if g.session.pause() {
                log::info!("Auto-paused (window blur)");
                g.update_hud();
            }
        });
        let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

fn request_animation_frame(game: Rc<RefCell<WebGame>>) {
    let Some(window) = web_sys::window() else { return };
    let closure = Closure::once(move |time: f64| {
        game_loop(game, time);
    });
    let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
    closure.forget();
}

fn game_loop(game: Rc<RefCell<WebGame>>, time: f64) {
    {
        let mut guard = game.borrow_mut();
        let g = &mut *guard;
        let before = (g.session.phase(), g.session.score());
        run_frame(&mut g.session, time, &mut g.renderer, &mut g.feedback);
        if before != (g.session.phase(), g.session.score()) {
            g.update_hud();
        }
    }

    request_animation_frame(game);
}
