use ratatui::style::Color;
use typespeed::session::Theme;

/// Colors for one theme
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub dim: Color,
    pub correct: Color,
    pub wrong: Color,
    pub accent: Color,
    pub track: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                background: Color::Rgb(24, 24, 27),
                text: Color::Rgb(228, 228, 231),
                dim: Color::DarkGray,
                correct: Color::Green,
                wrong: Color::Red,
                accent: Color::Yellow,
                track: Color::Rgb(63, 63, 70),
            },
            Theme::Light => Self {
                background: Color::Rgb(250, 250, 250),
                text: Color::Rgb(24, 24, 27),
                dim: Color::Gray,
                correct: Color::Rgb(22, 163, 74),
                wrong: Color::Rgb(220, 38, 38),
                accent: Color::Rgb(37, 99, 235),
                track: Color::Rgb(212, 212, 216),
            },
        }
    }
}
