/// Metrics for one finished session
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreResult {
    pub accuracy_percent: u8,
    pub chars_per_second: f64,
    pub chars_per_minute: u32,
    pub words_typed: usize,
}

/// Number of positions where the typed char matches the reference char.
/// Positions past the end of the reference never match.
pub fn correct_count(reference: &str, typed: &str) -> usize {
    typed
        .chars()
        .zip(reference.chars())
        .filter(|(t, r)| t == r)
        .count()
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Score typed input against the reference over `elapsed_secs`.
///
/// `elapsed_secs` is the configured session length, not the measured typing
/// time. Returns `None` when nothing was typed or no time elapsed.
pub fn score(reference: &str, typed: &str, elapsed_secs: u32) -> Option<ScoreResult> {
    let typed_len = typed.chars().count();
    if typed_len == 0 || elapsed_secs == 0 {
        return None;
    }

    let correct = correct_count(reference, typed);
    let accuracy = ((correct as f64 / typed_len as f64) * 100.0).round();
    let chars_per_second = round_to_hundredths(typed_len as f64 / elapsed_secs as f64);

    Some(ScoreResult {
        accuracy_percent: accuracy as u8,
        chars_per_second,
        chars_per_minute: (chars_per_second * 60.0).round() as u32,
        words_typed: typed.split_whitespace().count(),
    })
}
