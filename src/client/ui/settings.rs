use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::client::{app::ClientApp, form::FormField};

use super::{render_controls, render_notice, TITLE};

pub fn render(frame: &mut Frame, area: Rect, app: &ClientApp) {
    let chunks = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(6),
        Constraint::Length(2),
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    let title = Paragraph::new(TITLE)
        .alignment(Alignment::Center)
        .fg(Color::Cyan)
        .bold();
    frame.render_widget(title, chunks[0]);

    render_fields(frame, chunks[1], app);

    if app.is_generating() {
        let widget = Paragraph::new("Generating questions...")
            .alignment(Alignment::Center)
            .fg(Color::Yellow);
        frame.render_widget(widget, chunks[2]);
    } else {
        render_notice(frame, chunks[2], app.notice());
    }

    let service = Paragraph::new(format!("Quiz service: {}", app.service_url()))
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(service, chunks[4]);

    render_controls(
        frame,
        chunks[5],
        "tab/↑↓ move  ·  ←/→ difficulty  ·  enter generate  ·  esc quit",
    );
}

fn render_fields(frame: &mut Frame, area: Rect, app: &ClientApp) {
    let lines: Vec<Line> = FormField::ALL
        .iter()
        .map(|&field| {
            let focused = field == app.form.focus;
            let style = if focused {
                Style::default().fg(Color::Cyan).bold()
            } else {
                Style::default().fg(Color::Gray)
            };
            let marker = if focused { ">" } else { " " };
            let mut spans = vec![
                Span::styled(format!("{} ", marker), style),
                Span::styled(format!("{}: ", field.label()), style),
                Span::styled(app.form.value(field), Style::default().fg(Color::White)),
            ];
            if focused && field != FormField::Difficulty {
                spans.push(Span::styled("_", style));
            }
            Line::from(spans)
        })
        .collect();

    let widget = Paragraph::new(lines).block(
        Block::default()
            .title(" New Quiz ")
            .borders(Borders::ALL)
            .border_style(Color::DarkGray)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}
