//! Tap Rush entry point
//!
//! Browser: drives a session from requestAnimationFrame and mirrors cards into
//! the DOM. Native: plays a headless demo session with the autoplay bot.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlElement, MouseEvent};

    use tap_rush::GameConfig;
    use tap_rush::platform::web::{DomViewport, HashNavigator};
    use tap_rush::sim::{Card, CardId, ScoreFeedback, Session, SessionEvent};

    const ARENA_ID: &str = "arena";
    /// Longest frame fed to the session (tab switches, debugger pauses)
    const MAX_FRAME_MS: f64 = 100.0;
    /// How long the board shakes after a negative tap
    const SHAKE_MS: f64 = 200.0;

    /// Game instance holding all state
    struct Game {
        session: Session,
        document: Document,
        last_time: f64,
        /// Sub-millisecond remainder carried between frames
        accumulator: f64,
        /// Frame time at which the current shake stops
        shake_until: Option<f64>,
    }

    impl Game {
        fn new(document: Document, seed: u64) -> Self {
            let session = Session::new(GameConfig::load(), seed)
                .with_viewport(DomViewport::new(ARENA_ID))
                .with_navigator(HashNavigator::new("#/verify"));
            Self {
                session,
                document,
                last_time: 0.0,
                accumulator: 0.0,
                shake_until: None,
            }
        }

        /// Feed real elapsed time into the session
        fn update(&mut self, time: f64) {
            if self.last_time > 0.0 {
                self.accumulator += (time - self.last_time).min(MAX_FRAME_MS);
            }
            self.last_time = time;
            if self.shake_until.is_some_and(|until| time >= until) {
                self.shake_until = None;
                if let Some(arena) = self.document.get_element_by_id(ARENA_ID) {
                    let _ = arena.class_list().remove_1("shake");
                }
            }

            let whole = self.accumulator.floor();
            self.accumulator -= whole;
            self.session.advance(whole as u64);
            self.apply_events();
            self.update_hud();
        }

        fn apply_events(&mut self) {
            for event in self.session.drain_events() {
                match event {
                    SessionEvent::CardSpawned(id) => {
                        if let Some(card) = self.session.store().card(id).cloned() {
                            self.add_card(&card);
                        }
                    }
                    SessionEvent::CardExpired(id) => self.remove(&id.to_string()),
                    SessionEvent::CardTapped { id, points } => {
                        self.remove(&id.to_string());
                        if points < 0 {
                            self.shake();
                        }
                    }
                    SessionEvent::Feedback(feedback) => self.add_popup(&feedback),
                    SessionEvent::FeedbackExpired(id) => self.remove(&popup_id(id)),
                    SessionEvent::StrikeOutPending => {
                        log::info!("Struck out, ending shortly");
                    }
                    SessionEvent::Ended(reason) => {
                        log::info!("Ended: {:?} {:?}", reason, self.session.snapshot());
                    }
                }
            }
        }

        fn add_card(&self, card: &Card) {
            let Some(arena) = self.document.get_element_by_id(ARENA_ID) else {
                return;
            };
            let Ok(el) = self.document.create_element("div") else {
                return;
            };
            el.set_id(&card.id.to_string());
            el.set_class_name(&format!(
                "card {} {}",
                card.shape.as_str(),
                if card.polarity.is_negative() { "negative" } else { "positive" }
            ));
            let _ = el.set_attribute("data-card", &card.id.to_string());
            el.set_text_content(Some(&card.label));
            if let Some(html) = el.dyn_ref::<HtmlElement>() {
                let style = html.style();
                let _ = style.set_property("left", &format!("{}px", card.pos.x));
                let _ = style.set_property("top", &format!("{}px", card.pos.y));
                let _ = style.set_property("background-color", &card.color);
            }
            let _ = arena.append_child(&el);
        }

        fn add_popup(&self, feedback: &ScoreFeedback) {
            let Some(arena) = self.document.get_element_by_id(ARENA_ID) else {
                return;
            };
            let Ok(el) = self.document.create_element("div") else {
                return;
            };
            el.set_id(&popup_id(feedback.id));
            el.set_class_name(if feedback.points > 0 { "popup good" } else { "popup bad" });
            el.set_text_content(Some(&format!("{:+}", feedback.points)));
            if let Some(html) = el.dyn_ref::<HtmlElement>() {
                let style = html.style();
                let _ = style.set_property("left", &format!("{}px", feedback.x + 50.0));
                let _ = style.set_property("top", &format!("{}px", feedback.y));
            }
            let _ = arena.append_child(&el);
        }

        fn remove(&self, element_id: &str) {
            if let Some(el) = self.document.get_element_by_id(element_id) {
                el.remove();
            }
        }

        /// Shake the board for `SHAKE_MS`, restarting if already shaking
        fn shake(&mut self) {
            if let Some(arena) = self.document.get_element_by_id(ARENA_ID) {
                let _ = arena.class_list().add_1("shake");
            }
            self.shake_until = Some(self.last_time + SHAKE_MS);
        }

        fn update_hud(&self) {
            let snap = self.session.snapshot();
            let set = |id: &str, text: String| {
                if let Some(el) = self.document.get_element_by_id(id) {
                    el.set_text_content(Some(&text));
                }
            };
            set(
                "strikes",
                format!("{}/{}", snap.strikes, self.session.config().max_strikes),
            );
            set("time", format!("{}s", snap.time_remaining_secs));
            set("score", snap.score.to_string());
        }
    }

    fn popup_id(id: CardId) -> String {
        format!("popup-{}", id)
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Tap Rush starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
        let game = Rc::new(RefCell::new(Game::new(document, seed)));
        log::info!("Game initialized with seed: {}", seed);

        setup_tap_handler(game.clone());
        game.borrow_mut().session.start();
        request_animation_frame(game);

        log::info!("Tap Rush running!");
    }

    /// Clicks anywhere in the arena resolve to the card under the pointer
    fn setup_tap_handler(game: Rc<RefCell<Game>>) {
        let Some(arena) = game.borrow().document.get_element_by_id(ARENA_ID) else {
            log::error!("#{} not found, taps disabled", ARENA_ID);
            return;
        };
        let closure = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            let key = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.closest("[data-card]").ok().flatten())
                .and_then(|el| el.get_attribute("data-card"));
            if let Some(key) = key {
                let mut g = game.borrow_mut();
                g.session.tap_by_key(&key);
                g.apply_events();
                g.update_hud();
            }
        });
        let _ = arena.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let closure = Closure::once(move |time: f64| game_loop(game, time));
        if let Some(window) = web_sys::window() {
            let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        }
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let playing = {
            let mut g = game.borrow_mut();
            g.update(time);
            g.session.outcome().is_none()
        };
        // Keep one more frame after the end so popups can clear
        if playing || !game.borrow().session.feedback().is_empty() {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use anyhow::Context;
    use tap_rush::platform::FixedViewport;
    use tap_rush::results::{PlayerProfile, outcome_headline};
    use tap_rush::sim::{Autoplayer, SessionPhase};
    use tap_rush::{GameConfig, LeaderboardStore, LocalLeaderboard, ResultRecord};

    env_logger::init();
    log::info!("Tap Rush (native) starting...");
    log::info!("Native mode plays a headless demo - run with `trunk serve` for the web version");

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {}", path))?;
            GameConfig::from_json(&json).with_context(|| format!("parsing config {}", path))?
        }
        None => GameConfig::load(),
    };
    let seed = match args.next() {
        Some(s) => s.parse::<u64>().with_context(|| format!("invalid seed {:?}", s))?,
        None => 2024,
    };

    let duration = config.session_duration_secs;
    let max_strikes = config.max_strikes;
    let mut session = tap_rush::sim::Session::new(config, seed)
        .with_viewport(FixedViewport::new(1280.0, 720.0));
    let mut bot = Autoplayer::new(seed);

    session.start();
    // 60 Hz frames, like a browser would drive it
    while session.phase() == SessionPhase::Playing {
        session.advance(16);
        bot.play(&mut session);
        session.drain_events();
    }

    let snapshot = session.snapshot();
    let profile = PlayerProfile {
        name: "Autoplay".into(),
        location: "Headless".into(),
    };
    let record = ResultRecord::new(&profile, &snapshot, duration);
    if let Some(reason) = snapshot.outcome {
        println!("{}", outcome_headline(reason, max_strikes));
    }
    println!("{}", record.tier().message());
    println!("{}", serde_json::to_string_pretty(&record)?);

    let mut board = LocalLeaderboard::load();
    let rank = board.insert(record, 0.0)?;
    log::info!("Leaderboard rank {} of {}", rank, board.len());
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
