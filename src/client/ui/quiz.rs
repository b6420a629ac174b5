use ratatui::{
    prelude::*,
    widgets::{Gauge, Paragraph, Wrap},
};

use crate::client::app::ClientApp;

use super::{render_controls, render_notice};

const LOW_TIME_SECONDS: u32 = 3;

pub fn render(frame: &mut Frame, area: Rect, app: &ClientApp) {
    let session = &app.session;
    let Some(question) = session.current_question() else {
        return;
    };
    let number = session.current_index() + 1;
    let total = session.questions().len();
    let topic = session.settings().map(|s| s.topic.trim()).unwrap_or_default();

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(2),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    let heading = Paragraph::new(format!("Quiz: {}", topic))
        .fg(Color::Cyan)
        .bold();
    frame.render_widget(heading, chunks[0]);

    render_progress(frame, chunks[1], number, total);

    let text = Paragraph::new(format!("Q{}/{}: {}", number, total, question.text))
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold();
    frame.render_widget(text, chunks[3]);

    render_options(frame, chunks[4], &question.options, session.selected());
    render_timer(frame, chunks[5], session.remaining_seconds());
    render_notice(frame, chunks[6], app.notice());
    render_controls(
        frame,
        chunks[7],
        "1-4/a-d choose  ·  j/k move  ·  enter next  ·  esc leave",
    );
}

fn render_progress(frame: &mut Frame, area: Rect, number: usize, total: usize) {
    let ratio = if total > 0 {
        (number as f64 / total as f64).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let widget = Gauge::default()
        .ratio(ratio)
        .label(format!("{}/{}", number, total))
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::DarkGray));
    frame.render_widget(widget, area);
}

fn render_options(frame: &mut Frame, area: Rect, options: &[String], selected: Option<&str>) {
    let mut lines: Vec<Line> = Vec::with_capacity(options.len() * 2);

    for (index, option) in options.iter().enumerate() {
        let is_selected = selected == Some(option.as_str());
        let style = if is_selected {
            Style::default().fg(Color::Cyan).bold()
        } else {
            Style::default().fg(Color::Gray)
        };
        let marker = if is_selected { ">" } else { " " };

        lines.push(Line::from(vec![
            Span::styled(format!("{} ", marker), style),
            Span::styled(format!("{}. ", index + 1), style),
            Span::styled(option.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_timer(frame: &mut Frame, area: Rect, remaining: u32) {
    let color = if remaining <= LOW_TIME_SECONDS {
        Color::Red
    } else {
        Color::Yellow
    };
    let widget = Paragraph::new(format!("{} seconds left", remaining))
        .alignment(Alignment::Right)
        .fg(color);
    frame.render_widget(widget, area);
}
