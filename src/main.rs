//! Slope Rider entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::spawn_local;
    use web_sys::{HtmlCanvasElement, MouseEvent, Window};

    use slope_rider::platform::WebcamIntentSource;
    use slope_rider::pregame::{COUNTDOWN_FROM, PreGameSignal};
    use slope_rider::renderer::CanvasRenderer;
    use slope_rider::sim::GameEvent;
    use slope_rider::ui::{Hud, ids};
    use slope_rider::{GameError, Session};

    const CANVAS_ID: &str = "gameCanvas";
    const VIDEO_ID: &str = "video";
    /// Webcam preview is this fraction of the window in each dimension
    const VIDEO_SCALE: f64 = 5.0;
    /// Longest clock step fed to the pre-game machine (ms)
    const MAX_FRAME_MS: f64 = 100.0;

    /// DOM requests picked up by the next frame
    ///
    /// Event handlers only touch these cells; the frame task is the only
    /// borrower of `Game`.
    #[derive(Default)]
    struct Requests {
        confirm: Cell<bool>,
        restart: Cell<bool>,
        resize: Cell<bool>,
        /// A frame is scheduled or running
        armed: Cell<bool>,
    }

    /// Game instance holding all state
    struct Game {
        session: Session<WebcamIntentSource>,
        renderer: CanvasRenderer,
        hud: Hud,
        canvas: HtmlCanvasElement,
        last_time: f64,
        /// Turn input could not start; waits for a successful restart
        input_failed: bool,
    }

    fn window_size(window: &Window) -> (u32, u32) {
        let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        (dim(window.inner_width()) as u32, dim(window.inner_height()) as u32)
    }

    fn new_source(window: &Window) -> WebcamIntentSource {
        let (w, h) = window_size(window);
        WebcamIntentSource::new(VIDEO_ID, w as f64 / VIDEO_SCALE, h as f64 / VIDEO_SCALE)
    }

    fn alert(message: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }

    impl Game {
        fn apply_resize(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (w, h) = window_size(&window);
            if w == 0 || h == 0 {
                return;
            }
            self.canvas.set_width(w);
            self.canvas.set_height(h);
            self.renderer.resize(w, h);
            self.session.resize(w as f32, h as f32);
            log::debug!("Canvas resized to {}x{}", w, h);
        }

        fn begin_pregame(&mut self) {
            if self.input_failed {
                return;
            }
            self.session.begin_pregame();
            self.hud.show_pregame(COUNTDOWN_FROM);
        }

        fn show_signal(&self, signal: PreGameSignal) {
            match signal {
                PreGameSignal::PollDue => {}
                PreGameSignal::Ready => {
                    self.hud.hide_waiting();
                    self.hud.update_countdown(COUNTDOWN_FROM);
                }
                PreGameSignal::CountdownStep(n) => self.hud.update_countdown(n),
                PreGameSignal::CountdownComplete => {
                    self.hud.hide_countdown();
                    self.hud.hide_game_over();
                    log::info!("Countdown complete, run started");
                }
            }
        }

        /// Present a frame's events; false once the run has ended
        fn present(&self, events: Vec<GameEvent>) -> bool {
            let mut running = true;
            for event in events {
                match event {
                    GameEvent::ScoreChanged(score) => self.hud.update_score(score),
                    GameEvent::RenderFrame(frame) => {
                        if let Err(e) = self.renderer.render(&frame) {
                            log::warn!("Render error: {}", e);
                        }
                    }
                    GameEvent::GameOver { score, distance } => {
                        log::info!("Game over: score {} after {:.0} units", score, distance);
                        self.hud.show_game_over();
                        running = false;
                    }
                }
            }
            running
        }

        async fn restart(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            self.hud.hide_game_over();
            match self.session.restart(new_source(&window)).await {
                Ok(()) => {
                    self.input_failed = false;
                    self.hud.show_pregame(COUNTDOWN_FROM);
                }
                Err(e) => {
                    log::error!("Restart failed: {}", e);
                    self.input_failed = true;
                    alert("Failed to reinitialize camera or pose detection. Please refresh the page.");
                }
            }
            let events = self.session.drain_events();
            self.present(events);
        }
    }

    pub async fn run() -> Result<(), GameError> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| GameError::Js(e.to_string()))?;

        log::info!("Slope Rider starting...");

        let window = web_sys::window().ok_or_else(|| GameError::Js("no window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| GameError::Js("no document".into()))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id(CANVAS_ID)
            .ok_or_else(|| GameError::Js(format!("no element #{}", CANVAS_ID)))?
            .dyn_into()
            .map_err(|_| GameError::Js(format!("#{} is not a canvas", CANVAS_ID)))?;

        let (width, height) = window_size(&window);
        canvas.set_width(width);
        canvas.set_height(height);

        let hud = Hud::new(&document);
        hud.show_instructions();
        hud.update_score(0);

        let requests = Rc::new(Requests::default());
        setup_confirm_button(&document, requests.clone());

        let seed = js_sys::Date::now() as u64;
        let mut session = Session::new(seed, width as f32, height as f32, new_source(&window));
        log::info!("Game initialized with seed: {}", seed);

        // Instructions stay up while the camera and model load
        if let Err(e) = session.initialize().await {
            hud.hide_instructions();
            alert("Failed to initialize camera or pose detection. Please check permissions and refresh.");
            return Err(e);
        }

        let game = Rc::new(RefCell::new(Game {
            session,
            renderer: CanvasRenderer::new(&canvas)?,
            hud,
            canvas,
            last_time: 0.0,
            input_failed: false,
        }));

        // The window may have changed size while the model loaded
        requests.resize.set(true);
        setup_resize_handler(&window, game.clone(), requests.clone());
        setup_restart_button(&document, game.clone(), requests.clone());

        request_animation_frame(game, requests);
        log::info!("Slope Rider running!");
        Ok(())
    }

    fn setup_confirm_button(document: &web_sys::Document, requests: Rc<Requests>) {
        let Some(btn) = document.get_element_by_id(ids::CONFIRM_INSTRUCTIONS) else {
            log::error!("Confirm button not found");
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            requests.confirm.set(true);
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize_handler(window: &Window, game: Rc<RefCell<Game>>, requests: Rc<Requests>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if requests.armed.get() {
                requests.resize.set(true);
            } else if let Ok(mut g) = game.try_borrow_mut() {
                g.apply_resize();
            } else {
                requests.resize.set(true);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_restart_button(
        document: &web_sys::Document,
        game: Rc<RefCell<Game>>,
        requests: Rc<Requests>,
    ) {
        let Some(btn) = document.get_element_by_id(ids::RESTART) else {
            log::error!("Restart button not found");
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            requests.restart.set(true);
            // Game over stops the loop; a restart re-arms it
            if !requests.armed.get() {
                request_animation_frame(game.clone(), requests.clone());
            }
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>, requests: Rc<Requests>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        requests.armed.set(true);
        let armed = requests.clone();
        let closure = Closure::once(move |time: f64| {
            spawn_local(game_loop(game, requests, time));
        });
        if window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .is_err()
        {
            log::error!("requestAnimationFrame failed");
            armed.armed.set(false);
        }
        closure.forget();
    }

    async fn game_loop(game: Rc<RefCell<Game>>, requests: Rc<Requests>, time: f64) {
        if step(&game, &requests, time).await {
            request_animation_frame(game, requests);
        } else {
            requests.armed.set(false);
            log::debug!("Frame loop stopped");
        }
    }

    /// One display frame; false stops the loop
    #[allow(clippy::await_holding_refcell_ref)]
    async fn step(game: &Rc<RefCell<Game>>, requests: &Requests, time: f64) -> bool {
        let mut g = game.borrow_mut();

        let dt = if g.last_time > 0.0 {
            (time - g.last_time).clamp(0.0, MAX_FRAME_MS)
        } else {
            0.0
        };
        g.last_time = time;

        if requests.resize.take() {
            g.apply_resize();
        }
        if requests.restart.take() {
            g.restart().await;
        }
        if requests.confirm.take() {
            g.begin_pregame();
        }

        match g.session.state().phase() {
            GamePhase::Idle => {
                if let Some(signal) = g.session.update_pregame(dt).await {
                    g.show_signal(signal);
                }
                !g.input_failed
            }
            GamePhase::Running => {
                let events = g.session.frame().await;
                g.present(events)
            }
            GamePhase::GameOver => false,
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Slope Rider failed to start: {}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    let verbose = std::env::args().any(|a| a == "-v" || a == "--verbose");
    slope_rider::init_logging(verbose);

    log::info!("Slope Rider (native) starting...");
    log::info!("Native mode runs a scripted headless descent - run with `trunk serve` for the web version");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let seed = args
        .iter()
        .find_map(|a| a.parse::<u64>().ok())
        .unwrap_or(42);
    // Remaining words are the weave pattern, e.g. `slope-rider 7 left right`
    let pattern: Vec<&str> = args
        .iter()
        .map(String::as_str)
        .filter(|a| !a.starts_with('-') && a.parse::<u64>().is_err())
        .collect();

    match pollster::block_on(headless::run(seed, &pattern)) {
        Ok(summary) => println!(
            "Run finished after {} ticks: score {}, distance {:.1}{}",
            summary.ticks,
            summary.score,
            summary.distance,
            if summary.crashed { " (crashed)" } else { "" }
        ),
        Err(e) => {
            log::error!("Headless run failed: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted run with no browser: weave left and right until a crash or the tick cap
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use slope_rider::pregame::PreGameSignal;
    use slope_rider::sim::GameEvent;
    use slope_rider::{GameError, ScriptedIntents, Session, TurnIntent};

    const WIDTH: f32 = 800.0;
    const HEIGHT: f32 = 600.0;
    /// ~60 Hz display frame
    const FRAME_MS: f64 = 1000.0 / 60.0;
    const MAX_TICKS: usize = 20_000;
    /// Ticks spent on each step of the weave pattern
    const WEAVE: usize = 40;
    const DEFAULT_PATTERN: [&str; 4] = ["right", "left", "left", "right"];

    pub struct Summary {
        pub ticks: u64,
        pub score: u64,
        pub distance: f32,
        pub crashed: bool,
    }

    fn weave_script(labels: &[&str]) -> ScriptedIntents {
        let labels = if labels.is_empty() {
            &DEFAULT_PATTERN[..]
        } else {
            labels
        };
        let pattern: Vec<TurnIntent> = labels.iter().map(|l| TurnIntent::from_label(l)).collect();
        log::info!(
            "Weave pattern: {}",
            pattern.iter().map(TurnIntent::as_str).collect::<Vec<_>>().join(" ")
        );
        ScriptedIntents::new(
            pattern
                .into_iter()
                .cycle()
                .flat_map(|intent| std::iter::repeat_n(intent, WEAVE))
                .take(MAX_TICKS),
        )
    }

    pub async fn run(seed: u64, pattern: &[&str]) -> Result<Summary, GameError> {
        let mut session = Session::new(seed, WIDTH, HEIGHT, weave_script(pattern));
        session.initialize().await?;
        session.begin_pregame();

        while !session.pregame().is_done() {
            if let Some(PreGameSignal::CountdownStep(n)) = session.update_pregame(FRAME_MS).await {
                log::info!("{}...", n);
            }
        }

        let mut crashed = false;
        for _ in 0..MAX_TICKS {
            for event in session.frame().await {
                match event {
                    GameEvent::ScoreChanged(score) if score % 100 == 0 => {
                        log::info!("Score {}", score);
                    }
                    GameEvent::GameOver { .. } => crashed = true,
                    _ => {}
                }
            }
            if crashed {
                break;
            }
        }

        let state = session.state();
        log::debug!("Final frame: {}", state.snapshot().to_json()?);
        Ok(Summary {
            ticks: state.time_ticks(),
            score: state.score(),
            distance: state.distance(),
            crashed,
        })
    }
}
