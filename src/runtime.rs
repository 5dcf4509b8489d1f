use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent};

use crate::error::TextLoadError;
use crate::session::RequestId;

/// Everything the main loop reacts to, from the terminal or from worker threads
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    Tick,
    TextLoaded {
        request: RequestId,
        result: Result<String, TextLoadError>,
    },
}

/// Source of application events (keyboard, resize, loaded text)
pub trait AppEventSource: Send + 'static {
    /// Waits at most `timeout`; `Err(Timeout)` means the loop should tick instead
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError>;
}

/// Reads terminal input on a background thread and merges it with loader results
pub struct CrosstermEventSource {
    tx: Sender<AppEvent>,
    rx: Receiver<AppEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let reader_tx = tx.clone();

        std::thread::spawn(move || loop {
            match event::read() {
                Ok(CtEvent::Key(key)) => {
                    if reader_tx.send(AppEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if reader_tx.send(AppEvent::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        });

        Self { tx, rx }
    }

    /// Sender for producers other than the terminal, e.g. text loaders
    pub fn sender(&self) -> Sender<AppEvent> {
        self.tx.clone()
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl AppEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// How long the loop waits for input before redrawing
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Event source fed by hand through a channel, so the loop runs without a terminal
pub struct TestEventSource {
    rx: Receiver<AppEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<AppEvent>) -> Self {
        Self { rx }
    }
}

impl AppEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Pulls one event per loop iteration
pub struct Runner<E: AppEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: AppEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Next event, or `Tick` once the interval passes quietly
    pub fn step(&self) -> AppEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => AppEvent::Tick,
        }
    }
}

/// Repeating one-second countdown task.
///
/// Wall time is fed in through [`SecondTimer::advance`], which reports how many
/// whole seconds fired. Cancelling drops any partially elapsed second, so a
/// re-armed timer always waits a full second before its first fire.
#[derive(Debug, Default)]
pub struct SecondTimer {
    armed: bool,
    carried: Duration,
}

impl SecondTimer {
    pub fn arm(&mut self) {
        if !self.armed {
            self.armed = true;
            self.carried = Duration::ZERO;
        }
    }

    pub fn cancel(&mut self) {
        self.armed = false;
        self.carried = Duration::ZERO;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn advance(&mut self, elapsed: Duration) -> u64 {
        if !self.armed {
            return 0;
        }

        self.carried += elapsed;
        let fired = self.carried.as_secs();
        self.carried -= Duration::from_secs(fired);
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Effect, Session, TestDuration, Theme};
    use assert_matches::assert_matches;
    use std::sync::mpsc;

    fn runner(rx: Receiver<AppEvent>) -> Runner<TestEventSource, FixedTicker> {
        Runner::new(
            TestEventSource::new(rx),
            FixedTicker::new(Duration::from_millis(5)),
        )
    }

    #[test]
    fn quiet_loop_ticks() {
        let (_tx, rx) = mpsc::channel();
        assert_matches!(runner(rx).step(), AppEvent::Tick);
    }

    #[test]
    fn dropped_producers_still_tick() {
        let (tx, rx) = mpsc::channel::<AppEvent>();
        drop(tx);
        assert_matches!(runner(rx).step(), AppEvent::Tick);
    }

    #[test]
    fn loaded_text_reaches_the_loop() {
        let mut session = Session::new(TestDuration::Thirty, Theme::Dark);
        let sent = session.reset().into_iter().find_map(|e| match e {
            Effect::LoadText(id) => Some(id),
            _ => None,
        });
        let sent = sent.unwrap();

        let (tx, rx) = mpsc::channel();
        tx.send(AppEvent::TextLoaded {
            request: sent,
            result: Ok("ready".into()),
        })
        .unwrap();

        assert_matches!(
            runner(rx).step(),
            AppEvent::TextLoaded { request, result: Ok(text) } if request == sent && text == "ready"
        );
    }

    #[test]
    fn timer_idle_until_armed() {
        let mut timer = SecondTimer::default();
        assert!(!timer.is_armed());
        assert_eq!(timer.advance(Duration::from_secs(5)), 0);
    }

    #[test]
    fn timer_fires_on_whole_seconds() {
        let mut timer = SecondTimer::default();
        timer.arm();

        assert_eq!(timer.advance(Duration::from_millis(600)), 0);
        assert_eq!(timer.advance(Duration::from_millis(600)), 1);
        assert_eq!(timer.advance(Duration::from_millis(800)), 1);
        assert_eq!(timer.advance(Duration::from_millis(2500)), 2);
    }

    #[test]
    fn timer_cancel_drops_partial_second() {
        let mut timer = SecondTimer::default();
        timer.arm();
        timer.advance(Duration::from_millis(900));

        timer.cancel();
        assert_eq!(timer.advance(Duration::from_millis(500)), 0);

        timer.arm();
        assert_eq!(timer.advance(Duration::from_millis(500)), 0);
        assert_eq!(timer.advance(Duration::from_millis(500)), 1);
    }

    #[test]
    fn timer_rearm_keeps_progress() {
        let mut timer = SecondTimer::default();
        timer.arm();
        timer.advance(Duration::from_millis(700));
        timer.arm();
        assert_eq!(timer.advance(Duration::from_millis(300)), 1);
    }
}
