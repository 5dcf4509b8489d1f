use std::time::Duration;

use log::debug;

use crate::error::TextLoadError;
use crate::provider::TextLoader;
use crate::runtime::SecondTimer;
use crate::scoring::ScoreResult;
use crate::session::{Effect, RequestId, Session, TestDuration, Theme};

/// Owns the session and carries out the effects of its transitions
pub struct SessionController {
    session: Session,
    timer: SecondTimer,
    loader: Box<dyn TextLoader>,
}

impl SessionController {
    /// Mounts a new session in Idle and requests its first text
    pub fn new(duration: TestDuration, theme: Theme, loader: Box<dyn TextLoader>) -> Self {
        let mut controller = Self {
            session: Session::new(duration, theme),
            timer: SecondTimer::default(),
            loader,
        };
        let effects = controller.session.reset();
        controller.run(effects);
        controller
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn score(&self) -> &ScoreResult {
        self.session.score()
    }

    pub fn timer_armed(&self) -> bool {
        self.timer.is_armed()
    }

    pub fn start(&mut self) {
        let effects = self.session.start();
        self.run(effects);
    }

    pub fn pause(&mut self) {
        let effects = self.session.pause();
        self.run(effects);
    }

    pub fn reset(&mut self) {
        let effects = self.session.reset();
        self.run(effects);
    }

    pub fn on_keystroke(&mut self, new_value: &str) -> bool {
        self.session.on_keystroke(new_value)
    }

    pub fn set_duration(&mut self, duration: TestDuration) -> bool {
        self.session.set_duration(duration)
    }

    pub fn toggle_theme(&mut self) {
        self.session.toggle_theme();
    }

    pub fn on_text_loaded(&mut self, request: RequestId, result: Result<String, TextLoadError>) {
        let effects = self.session.text_loaded(request, result);
        self.run(effects);
    }

    /// Feed elapsed wall time into the countdown
    pub fn advance(&mut self, elapsed: Duration) {
        let fired = self.timer.advance(elapsed);
        for _ in 0..fired {
            if !self.timer.is_armed() {
                break;
            }
            let effects = self.session.tick();
            self.run(effects);
        }
    }

    pub fn unmount(&mut self) {
        let effects = self.session.unmount();
        self.run(effects);
    }

    fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            debug!("applying {effect:?}");
            match effect {
                Effect::LoadText(request) => self.loader.request(request),
                Effect::ArmTimer => self.timer.arm(),
                Effect::CancelTimer => self.timer.cancel(),
            }
        }
    }
}
