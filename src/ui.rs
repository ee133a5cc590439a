pub mod score_table;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
    Frame,
};
use itertools::Itertools;
use unicode_width::UnicodeWidthStr;

use crate::{
    app::{App, WEBSITE_URL},
    game::{GameState, Phase},
    setup::SetupField,
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;
const TITLE: &str = "Muistipeli";

pub fn draw(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(4), // banner
                Constraint::Min(1),    // phase body
                Constraint::Length(1), // error line
                Constraint::Length(1), // key hints
            ])
            .split(area);

        render_banner(chunks[0], buf);

        match self.game.phase() {
            Phase::Setup => render_setup(self, chunks[1], buf),
            Phase::ShowNumbers { presenter, .. } => {
                render_flash(
                    presenter.current().unwrap_or_default(),
                    &presenter.index_text(),
                    chunks[1],
                    buf,
                );
            }
            Phase::UserInput {
                sequences, input, ..
            } => render_input(input, sequences.total_digits(), chunks[1], buf),
            Phase::Score {
                report, elapsed, ..
            } => score_table::render_score(report, *elapsed, chunks[1], buf),
        }

        if let Some(err) = self.game.last_error() {
            Paragraph::new(Span::styled(
                err.to_string(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center)
            .render(chunks[2], buf);
        }

        Paragraph::new(Span::styled(
            key_hints(self.game.state()),
            Style::default().add_modifier(Modifier::DIM),
        ))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);
    }
}

fn render_banner(area: Rect, buf: &mut Buffer) {
    let lines = vec![
        Line::from(Span::styled(
            TITLE,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            WEBSITE_URL,
            Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM),
        )),
    ];

    Paragraph::new(lines)
        .block(Block::default().borders(Borders::BOTTOM))
        .alignment(Alignment::Center)
        .render(area, buf);
}

fn render_setup(app: &App, area: Rect, buf: &mut Buffer) {
    let form = &app.game.form;
    let bold_style = Style::default().add_modifier(Modifier::BOLD);

    let mut lines = vec![Line::from("")];
    for field in SetupField::ALL {
        let focused = form.focus() == field;

        let value_style = if field.is_locked() {
            Style::default().add_modifier(Modifier::DIM)
        } else if focused {
            bold_style
                .fg(Color::Yellow)
                .add_modifier(Modifier::UNDERLINED)
        } else {
            bold_style
        };

        let marker = if focused { "> " } else { "  " };
        let mut spans = vec![
            Span::raw(marker),
            Span::raw(format!("{field}: ")),
            Span::styled(form.value(field), value_style),
        ];
        if field.is_locked() {
            spans.push(Span::styled(
                " (locked)",
                Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC),
            ));
        }

        lines.push(Line::from(spans));
        lines.push(Line::from(""));
    }

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(area, buf);
}

fn render_flash(current: &str, index_text: &str, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(area.height.saturating_sub(3) / 2),
            Constraint::Length(1), // number
            Constraint::Length(1), // padding
            Constraint::Length(1), // index text
            Constraint::Min(0),
        ])
        .split(area);

    Paragraph::new(Span::styled(
        spaced(current),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .render(chunks[1], buf);

    Paragraph::new(Span::styled(
        index_text.to_string(),
        Style::default().add_modifier(Modifier::DIM),
    ))
    .alignment(Alignment::Center)
    .render(chunks[3], buf);
}

fn render_input(input: &str, expected_len: usize, area: Rect, buf: &mut Buffer) {
    let max_chars_per_line = area.width.max(1) as usize;
    let input_lines = (input.width() / max_chars_per_line + 1) as u16;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(area.height.saturating_sub(input_lines + 4) / 2),
            Constraint::Length(1),           // prompt
            Constraint::Length(1),           // padding
            Constraint::Length(input_lines), // answer
            Constraint::Length(1),           // padding
            Constraint::Length(1),           // progress
            Constraint::Min(0),
        ])
        .split(area);

    Paragraph::new(Span::styled(
        "Type the numbers:",
        Style::default().add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .render(chunks[1], buf);

    let answer = Line::from(vec![
        Span::styled(
            input.to_string(),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
    ]);
    Paragraph::new(answer)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false })
        .render(chunks[3], buf);

    Paragraph::new(Span::styled(
        format!("{}/{} digits", input.chars().count(), expected_len),
        Style::default().add_modifier(Modifier::DIM),
    ))
    .alignment(Alignment::Center)
    .render(chunks[5], buf);
}

/// "42" -> "4 2", easier to read at a glance
fn spaced(digits: &str) -> String {
    digits.chars().join(" ")
}

fn key_hints(state: GameState) -> &'static str {
    match state {
        GameState::Setup => {
            "(enter) start  (tab/↑↓) field  (+/-) adjust  (o) website  (esc) quit"
        }
        GameState::ShowNumbers => "memorize...  (esc) quit",
        GameState::UserInput => "(0-9) type  (backspace) delete  (enter) check  (esc) quit",
        GameState::Score => "(enter/r) play again  (esc) quit",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Instant;

    fn rendered(app: &App) -> String {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(app, f)).unwrap();

        let buffer = terminal.backend().buffer();
        buffer.content.iter().map(|c| c.symbol()).collect()
    }

    fn quick_app() -> App {
        App::new(
            &Config {
                sequence_count: 2,
                digits_per_sequence: 2,
                secs_per_flash: 0.0,
            },
            Some(4),
        )
    }

    #[test]
    fn test_setup_screen() {
        let content = rendered(&quick_app());

        assert!(content.contains(TITLE));
        assert!(content.contains("Number of sequences: 2"));
        assert!(content.contains("(locked)"));
        assert!(content.contains("Seconds per flash: 0"));
    }

    #[test]
    fn test_flash_screen_shows_index() {
        let mut app = App::new(&Config::default(), Some(4));
        app.game.start(Instant::now()).unwrap();

        let content = rendered(&app);
        let first = app.game.sequences().unwrap().get(0).unwrap().to_string();
        assert!(content.contains("1/5"));
        assert!(content.contains(&spaced(&first)));
    }

    #[test]
    fn test_input_and_score_screens() {
        let mut app = quick_app();
        let now = Instant::now();
        app.game.start(now).unwrap();
        app.game.tick(now);
        app.game.tick(now);

        app.game.type_char('1');
        let content = rendered(&app);
        assert!(content.contains("Type the numbers:"));
        assert!(content.contains("1/4 digits"));

        let _ = app.game.submit(now);
        assert!(rendered(&app).contains("expected at least 4"));

        app.game.backspace();
        let answer = app.game.sequences().unwrap().flattened();
        for c in answer.chars() {
            app.game.type_char(c);
        }
        app.game.submit(now).unwrap();

        let content = rendered(&app);
        assert!(content.contains("Correct: 2/2 - 100.00%"));
    }

    #[test]
    fn test_spaced() {
        assert_eq!(spaced("42"), "4 2");
        assert_eq!(spaced("7"), "7");
        assert_eq!(spaced(""), "");
    }
}
