use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use typespeed::controller::SessionController;
use typespeed::provider::{ChannelTextLoader, StaticTextProvider, TextProvider};
use typespeed::runtime::{AppEvent, FixedTicker, Runner, TestEventSource};
use typespeed::session::{Status, TestDuration, Theme, FAILED_TEXT_PLACEHOLDER};

struct FailingProvider;

impl TextProvider for FailingProvider {
    fn fetch_sample_text(&self) -> Result<String, typespeed::error::TextLoadError> {
        Err(typespeed::error::TextLoadError::NoQuotes)
    }
}

// Headless integration using the internal runtime + controller without a TTY.
// Loaded text, keystrokes and ticks all flow through one channel, as in the app.
#[test]
fn headless_typing_flow_finishes_and_scores() {
    let (tx, rx) = mpsc::channel();
    let loader = ChannelTextLoader::new(
        Arc::new(StaticTextProvider::new("hello world")),
        tx.clone(),
    );
    let mut controller =
        SessionController::new(TestDuration::Thirty, Theme::Dark, Box::new(loader));
    controller.start();

    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );

    let mut typed_everything = false;
    for _ in 0..1_000u32 {
        match runner.step() {
            AppEvent::TextLoaded { request, result } => {
                controller.on_text_loaded(request, result);
                // type once the text for the running attempt is in
                let session = controller.session();
                if session.status() == Status::Running && !session.is_loading() && !typed_everything
                {
                    for c in "hello world".chars() {
                        tx.send(AppEvent::Key(KeyEvent::new(
                            KeyCode::Char(c),
                            KeyModifiers::NONE,
                        )))
                        .unwrap();
                    }
                    typed_everything = true;
                }
            }
            AppEvent::Key(key) => {
                if let KeyCode::Char(c) = key.code {
                    let mut value = controller.session().typed_input().to_owned();
                    value.push(c);
                    controller.on_keystroke(&value);
                }
            }
            // every quiet step counts as a full second so the test stays fast
            AppEvent::Tick => controller.advance(Duration::from_secs(1)),
            AppEvent::Resize => {}
        }
        if controller.session().status() == Status::Finished {
            break;
        }
    }

    let session = controller.session();
    assert_eq!(session.status(), Status::Finished);
    assert_eq!(session.typed_input(), "hello world");
    assert_eq!(session.score().accuracy_percent, 100);
    assert_eq!(session.score().chars_per_second, 0.37);
    assert_eq!(session.score().chars_per_minute, 22);
    assert_eq!(session.score().words_typed, 2);
}

#[test]
fn headless_failed_text_keeps_session_usable() {
    let (tx, rx) = mpsc::channel();
    let loader = ChannelTextLoader::new(Arc::new(FailingProvider), tx);
    let mut controller =
        SessionController::new(TestDuration::Sixty, Theme::Light, Box::new(loader));

    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_secs(5)),
    );
    match runner.step() {
        AppEvent::TextLoaded { request, result } => controller.on_text_loaded(request, result),
        other => panic!("expected TextLoaded, got {other:?}"),
    }
    assert_eq!(controller.session().reference_text(), FAILED_TEXT_PLACEHOLDER);

    controller.start();
    match runner.step() {
        AppEvent::TextLoaded { request, result } => controller.on_text_loaded(request, result),
        other => panic!("expected TextLoaded, got {other:?}"),
    }
    assert!(controller.on_keystroke("Fa"));
    assert!(!controller.session().has_error());
    assert!(controller.timer_armed());
}

#[test]
fn headless_reset_mid_session_requests_new_text() {
    let (tx, rx) = mpsc::channel();
    let loader = ChannelTextLoader::new(Arc::new(StaticTextProvider::new("abcdef")), tx);
    let mut controller =
        SessionController::new(TestDuration::Sixty, Theme::Dark, Box::new(loader));
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_secs(5)),
    );
    let deliver = |controller: &mut SessionController| match runner.step() {
        AppEvent::TextLoaded { request, result } => controller.on_text_loaded(request, result),
        other => panic!("expected TextLoaded, got {other:?}"),
    };

    deliver(&mut controller);
    controller.start();
    deliver(&mut controller);
    controller.on_keystroke("abc");
    controller.advance(Duration::from_secs(12));
    assert_eq!(controller.session().remaining_seconds(), 48);

    controller.reset();
    assert!(controller.session().is_loading());
    assert_eq!(controller.session().remaining_seconds(), 60);
    assert_eq!(controller.session().typed_input(), "");
    assert!(!controller.timer_armed());

    deliver(&mut controller);
    assert_eq!(controller.session().status(), Status::Idle);
    assert_eq!(controller.session().reference_text(), "abcdef");
}
