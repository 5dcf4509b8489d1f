use clap::ValueEnum;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::TextLoadError;
use crate::scoring::{self, ScoreResult};

/// Shown in place of the sample text when it could not be loaded
pub const FAILED_TEXT_PLACEHOLDER: &str = "Failed to load text...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Status {
    Idle,
    Running,
    Paused,
    Finished,
}

/// Selectable session lengths
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(try_from = "u32", into = "u32")]
pub enum TestDuration {
    #[value(name = "30")]
    #[strum(to_string = "30s")]
    Thirty,
    #[default]
    #[value(name = "60")]
    #[strum(to_string = "60s")]
    Sixty,
    #[value(name = "120")]
    #[strum(to_string = "120s")]
    OneTwenty,
}

impl TestDuration {
    pub fn secs(self) -> u32 {
        match self {
            TestDuration::Thirty => 30,
            TestDuration::Sixty => 60,
            TestDuration::OneTwenty => 120,
        }
    }

    /// Next option in selector order, wrapping around
    pub fn next(self) -> Self {
        match self {
            TestDuration::Thirty => TestDuration::Sixty,
            TestDuration::Sixty => TestDuration::OneTwenty,
            TestDuration::OneTwenty => TestDuration::Thirty,
        }
    }
}

impl TryFrom<u32> for TestDuration {
    type Error = String;

    fn try_from(secs: u32) -> Result<Self, Self::Error> {
        match secs {
            30 => Ok(TestDuration::Thirty),
            60 => Ok(TestDuration::Sixty),
            120 => Ok(TestDuration::OneTwenty),
            other => Err(format!("unsupported test duration {other}s, expected 30, 60 or 120")),
        }
    }
}

impl From<TestDuration> for u32 {
    fn from(d: TestDuration) -> Self {
        d.secs()
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

/// Identifies one sample text request; only the latest one is accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(u64);

impl RequestId {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Side effects requested by a session transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    LoadText(RequestId),
    ArmTimer,
    CancelTimer,
}

/// One timed typing attempt and everything needed to render it
#[derive(Debug, Clone)]
pub struct Session {
    reference_text: String,
    typed_input: String,
    remaining_seconds: u32,
    duration: TestDuration,
    status: Status,
    has_error: bool,
    theme: Theme,
    score: ScoreResult,
    pending_text: Option<RequestId>,
    next_request: u64,
    mounted: bool,
}

impl Session {
    pub fn new(duration: TestDuration, theme: Theme) -> Self {
        Self {
            reference_text: String::new(),
            typed_input: String::new(),
            remaining_seconds: duration.secs(),
            duration,
            status: Status::Idle,
            has_error: false,
            theme,
            score: ScoreResult::default(),
            pending_text: None,
            next_request: 0,
            mounted: true,
        }
    }

    pub fn reference_text(&self) -> &str {
        &self.reference_text
    }

    pub fn typed_input(&self) -> &str {
        &self.typed_input
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn duration(&self) -> TestDuration {
        self.duration
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn has_error(&self) -> bool {
        self.has_error
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn score(&self) -> &ScoreResult {
        &self.score
    }

    /// True while a sample text request is in flight
    pub fn is_loading(&self) -> bool {
        self.pending_text.is_some()
    }

    pub fn pending_request(&self) -> Option<RequestId> {
        self.pending_text
    }

    pub fn typed_len(&self) -> usize {
        self.typed_input.chars().count()
    }

    pub fn reference_len(&self) -> usize {
        self.reference_text.chars().count()
    }

    fn accepts_input(&self) -> bool {
        self.mounted && self.status == Status::Running && self.pending_text.is_none()
    }

    fn request_text(&mut self) -> RequestId {
        self.next_request += 1;
        let request = RequestId(self.next_request);
        self.pending_text = Some(request);
        request
    }

    fn clear_attempt(&mut self) {
        self.typed_input.clear();
        self.has_error = false;
        self.remaining_seconds = self.duration.secs();
        self.score = ScoreResult::default();
    }

    pub fn start(&mut self) -> Vec<Effect> {
        if !self.mounted {
            return vec![];
        }
        self.status = Status::Running;
        self.clear_attempt();
        let request = self.request_text();
        info!(
            "session started: {}s, text request {}",
            self.duration.secs(),
            request.value()
        );
        vec![Effect::CancelTimer, Effect::LoadText(request)]
    }

    pub fn pause(&mut self) -> Vec<Effect> {
        match self.status {
            Status::Running => {
                self.status = Status::Paused;
                debug!("session paused at {}s remaining", self.remaining_seconds);
                vec![Effect::CancelTimer]
            }
            Status::Paused => {
                self.status = Status::Running;
                debug!("session resumed at {}s remaining", self.remaining_seconds);
                if self.pending_text.is_none() {
                    vec![Effect::ArmTimer]
                } else {
                    vec![]
                }
            }
            Status::Idle | Status::Finished => vec![],
        }
    }

    /// Always lands in Idle with a fresh text request in flight
    pub fn reset(&mut self) -> Vec<Effect> {
        if !self.mounted {
            return vec![];
        }
        self.status = Status::Idle;
        self.clear_attempt();
        let request = self.request_text();
        info!("session reset, text request {}", request.value());
        vec![Effect::CancelTimer, Effect::LoadText(request)]
    }

    /// Replace the typed input. Returns false when the keystroke was ignored.
    pub fn on_keystroke(&mut self, new_value: &str) -> bool {
        if !self.accepts_input() {
            return false;
        }

        self.typed_input = new_value.to_owned();
        self.has_error = match new_value.chars().count().checked_sub(1) {
            Some(last_idx) => match (
                self.reference_text.chars().nth(last_idx),
                new_value.chars().last(),
            ) {
                (Some(expected), Some(typed)) => expected != typed,
                _ => false,
            },
            None => false,
        };
        true
    }

    /// One second elapsed on the countdown
    pub fn tick(&mut self) -> Vec<Effect> {
        if !self.accepts_input() {
            return vec![];
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.finish()
        } else {
            vec![]
        }
    }

    pub fn finish(&mut self) -> Vec<Effect> {
        if !matches!(self.status, Status::Running | Status::Paused) {
            return vec![];
        }

        self.status = Status::Finished;
        match scoring::score(&self.reference_text, &self.typed_input, self.duration.secs()) {
            Some(score) => {
                info!(
                    "session finished: {}% acc, {:.2} cps, {} cpm",
                    score.accuracy_percent, score.chars_per_second, score.chars_per_minute
                );
                self.score = score;
            }
            None => debug!("session finished with no input, skipping scoring"),
        }
        vec![Effect::CancelTimer]
    }

    pub fn text_loaded(
        &mut self,
        request: RequestId,
        result: Result<String, TextLoadError>,
    ) -> Vec<Effect> {
        if self.pending_text != Some(request) {
            debug!("dropping stale sample text for request {}", request.value());
            return vec![];
        }

        self.pending_text = None;
        self.reference_text = match result {
            Ok(text) => text,
            Err(e) => {
                warn!("sample text unavailable: {e}");
                FAILED_TEXT_PLACEHOLDER.to_owned()
            }
        };
        self.typed_input.clear();
        self.has_error = false;

        match self.status {
            Status::Running => vec![Effect::ArmTimer],
            _ => vec![],
        }
    }

    /// Only honoured while no attempt is in progress
    pub fn set_duration(&mut self, duration: TestDuration) -> bool {
        if !matches!(self.status, Status::Idle | Status::Finished) {
            return false;
        }
        self.duration = duration;
        self.remaining_seconds = duration.secs();
        true
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }

    /// Tears the session down; every later transition is a no-op
    pub fn unmount(&mut self) -> Vec<Effect> {
        self.mounted = false;
        self.pending_text = None;
        self.status = Status::Idle;
        debug!("session unmounted");
        vec![Effect::CancelTimer]
    }
}
