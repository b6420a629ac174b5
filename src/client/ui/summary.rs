use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::client::{
    app::ClientApp,
    session::{QuestionOutcome, SummaryEntry},
};

use super::render_controls;

pub fn render(frame: &mut Frame, area: Rect, app: &ClientApp) {
    let Some(summary) = app.session.summary() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(5),
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    let header = vec![
        Line::from(Span::styled(
            "Quiz Completed!",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} / {}", summary.score, summary.total),
            Style::default().fg(score_color(summary.score, summary.total)).bold(),
        )),
        Line::from(""),
    ];
    let widget = Paragraph::new(header).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, chunks[0]);

    let results_title = Paragraph::new("Your Results:").fg(Color::White).bold();
    frame.render_widget(results_title, chunks[1]);

    let lines: Vec<Line> = summary.entries.iter().flat_map(entry_lines).collect();
    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().padding(Padding::horizontal(1)))
        .scroll((app.summary_scroll(), 0));
    frame.render_widget(widget, chunks[2]);

    render_controls(frame, chunks[3], "j/k scroll  ·  r retake  ·  q quit");
}

fn score_color(score: usize, total: usize) -> Color {
    match (score * 100).checked_div(total).unwrap_or(0) {
        90.. => Color::Green,
        70..=89 => Color::Cyan,
        50..=69 => Color::Yellow,
        _ => Color::Red,
    }
}

fn entry_lines(entry: &SummaryEntry) -> Vec<Line<'static>> {
    let (mark, color) = match entry.outcome {
        QuestionOutcome::Correct => (" ✅", Color::Green),
        QuestionOutcome::Incorrect => (" ❌", Color::Red),
        QuestionOutcome::Unanswered => ("", Color::DarkGray),
    };
    let answer = entry.user_answer.clone().unwrap_or_else(|| "None".to_string());

    vec![
        Line::from(Span::styled(
            format!("Q{}: {}", entry.question_index + 1, entry.text),
            Style::default().fg(Color::White),
        )),
        Line::from(vec![
            Span::styled("  Your Answer: ", Style::default().fg(Color::Gray)),
            Span::styled(format!("{}{}", answer, mark), Style::default().fg(color)),
        ]),
        Line::from(Span::styled(
            format!("  Correct Answer: {}", entry.correct_answer),
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
    ]
}
