use std::time::Duration;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Widget},
};

use crate::scorer::{ScoreReport, SequenceResult};

/// Pure presenter for one result row: set number, correct digits, answer
pub fn present_row(idx: usize, result: &SequenceResult) -> Row<'static> {
    let answer_color = if result.is_correct() {
        Color::Green
    } else {
        Color::Red
    };

    Row::new(vec![
        Cell::from((idx + 1).to_string()),
        Cell::from(result.expected()),
        Cell::from(result.given()).style(
            Style::default()
                .fg(answer_color)
                .add_modifier(Modifier::BOLD),
        ),
    ])
}

/// `Correct: 3/5 - 60.00% - duration: 4.2 seconds`
pub fn summary_line(report: &ScoreReport, elapsed: Duration) -> String {
    format!(
        "Correct: {}/{} - {} - duration: {} seconds",
        report.correct,
        report.total,
        report.percentage_label(),
        format_secs(elapsed)
    )
}

/// Seconds with millisecond precision, trailing zeros dropped
pub fn format_secs(elapsed: Duration) -> String {
    let secs = elapsed.as_millis() as f64 / 1000.0;
    secs.to_string()
}

pub fn render_score(report: &ScoreReport, elapsed: Duration, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // table
            Constraint::Length(1), // padding
            Constraint::Length(1), // summary
        ])
        .split(area);

    let header = Row::new(vec![
        Cell::from("Set"),
        Cell::from("Correct"),
        Cell::from("Answer"),
    ])
    .style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = report
        .sequences
        .iter()
        .enumerate()
        .map(|(idx, result)| present_row(idx, result))
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(20),
            Constraint::Percentage(40),
            Constraint::Percentage(40),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title("Results"));

    Widget::render(table, chunks[0], buf);

    Paragraph::new(Span::styled(
        summary_line(report, elapsed),
        Style::default().add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .render(chunks[2], buf);
}
