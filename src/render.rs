//! Presentation contract shared by every front end: how each reference
//! character is classified, how far along the attempt is, and which status
//! line to show.

use crate::session::{Session, Status};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Correct,
    Wrong,
    /// Next character to type
    Active,
    Untyped,
}

/// Classify every reference character against the typed input
pub fn classify_chars(session: &Session) -> Vec<(char, CharClass)> {
    let typed: Vec<char> = session.typed_input().chars().collect();
    let cursor_visible = matches!(session.status(), Status::Running | Status::Paused);

    session
        .reference_text()
        .chars()
        .enumerate()
        .map(|(idx, expected)| {
            let class = match typed.get(idx) {
                Some(&c) if c == expected => CharClass::Correct,
                Some(_) => CharClass::Wrong,
                None if idx == typed.len() && cursor_visible => CharClass::Active,
                None => CharClass::Untyped,
            };
            (expected, class)
        })
        .collect()
}

/// Typed length as a percentage of the reference length
pub fn progress_percent(session: &Session) -> f64 {
    match session.reference_len() {
        0 => 0.0,
        len => session.typed_len() as f64 / len as f64 * 100.0,
    }
}

pub fn status_message(session: &Session) -> &'static str {
    match session.status() {
        Status::Finished => "Test Completed",
        Status::Paused => "Paused",
        _ if session.is_loading() => "Loading text...",
        _ if session.has_error() => "Typing mistake!",
        Status::Running => "Typing...",
        Status::Idle => "Press Enter to start",
    }
}
