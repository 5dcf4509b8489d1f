pub mod palette;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Gauge, Paragraph, Widget, Wrap},
    Frame,
};
use typespeed::{
    render::{classify_chars, progress_percent, status_message, CharClass},
    session::Status,
};

use crate::{ui::palette::Palette, App};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;
const RESULT_LINES: u16 = 4;

pub fn draw(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let session = self.controller.session();
        let palette = Palette::for_theme(session.theme());

        // styles
        let base_style = Style::default().fg(palette.text).bg(palette.background);
        let bold_style = base_style.add_modifier(Modifier::BOLD);
        let dim_style = base_style.fg(palette.dim);
        let italic_style = dim_style.add_modifier(Modifier::ITALIC);
        let correct_style = bold_style.fg(palette.correct);
        let wrong_style = bold_style.fg(palette.wrong);
        let active_style = bold_style
            .fg(palette.accent)
            .add_modifier(Modifier::UNDERLINED);

        Block::default().style(base_style).render(area, buf);

        let finished = session.status() == Status::Finished;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1), // title
                Constraint::Length(1), // status banner
                Constraint::Length(1), // duration / time / theme
                Constraint::Length(1), // progress
                Constraint::Length(1), // padding
                Constraint::Min(1),    // reference text
                Constraint::Length(if finished { RESULT_LINES } else { 0 }),
                Constraint::Length(1), // legend
            ])
            .split(area);

        Paragraph::new(Span::styled("Typing Speed Test", bold_style))
            .alignment(Alignment::Center)
            .render(chunks[0], buf);

        let banner_style = if session.has_error() && !finished {
            wrong_style
        } else {
            bold_style.fg(palette.accent)
        };
        Paragraph::new(Span::styled(status_message(session), banner_style))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);

        Paragraph::new(Span::styled(
            format!(
                "Duration: {}   Time: {}s   Theme: {}",
                session.duration(),
                session.remaining_seconds(),
                session.theme()
            ),
            dim_style,
        ))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);

        let progress = progress_percent(session);
        Gauge::default()
            .gauge_style(Style::default().fg(palette.accent).bg(palette.track))
            .ratio((progress / 100.0).clamp(0.0, 1.0))
            .label(Span::styled(format!("{progress:.0}%"), bold_style))
            .render(chunks[3], buf);

        let spans = classify_chars(session)
            .into_iter()
            .map(|(expected, class)| match class {
                CharClass::Correct => Span::styled(expected.to_string(), correct_style),
                CharClass::Wrong => Span::styled(
                    match expected {
                        ' ' => "·".to_owned(),
                        c => c.to_string(),
                    },
                    wrong_style,
                ),
                CharClass::Active => Span::styled(expected.to_string(), active_style),
                CharClass::Untyped => Span::styled(expected.to_string(), dim_style),
            })
            .collect::<Vec<Span>>();

        Paragraph::new(Line::from(spans))
            .style(base_style)
            .wrap(Wrap { trim: false })
            .render(chunks[5], buf);

        if finished {
            let score = session.score();
            let lines = vec![
                Line::from(Span::styled(
                    format!("Accuracy: {}%", score.accuracy_percent),
                    bold_style,
                )),
                Line::from(Span::styled(
                    format!("CPS: {:.2}", score.chars_per_second),
                    bold_style,
                )),
                Line::from(Span::styled(
                    format!("Speed (CPM): {}", score.chars_per_minute),
                    bold_style,
                )),
                Line::from(Span::styled(
                    format!("Words: {}", score.words_typed),
                    bold_style,
                )),
            ];
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .render(chunks[6], buf);
        }

        let pause_label = if session.status() == Status::Paused {
            "resume"
        } else {
            "pause"
        };
        Paragraph::new(Span::styled(
            format!(
                "(enter) start / (tab) {pause_label} / (ctrl+r) reset / (ctrl+d) duration / (ctrl+t) theme / (esc) quit"
            ),
            italic_style,
        ))
        .wrap(Wrap { trim: true })
        .render(chunks[7], buf);
    }
}
