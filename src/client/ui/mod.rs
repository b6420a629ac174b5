mod quiz;
mod settings;
mod summary;

use ratatui::{
    prelude::*,
    widgets::{Block, Paragraph, Wrap},
};

use crate::client::{
    app::{ClientApp, Notice, NoticeKind},
    session::SessionPhase,
};

pub const TITLE: &str = "QuizNova: Spark Your Knowledge!";

pub fn render(frame: &mut Frame, app: &ClientApp) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    match app.session.phase() {
        SessionPhase::Configuring => settings::render(frame, area, app),
        SessionPhase::Active => quiz::render(frame, area, app),
        SessionPhase::Completed => summary::render(frame, area, app),
    }
}

fn render_notice(frame: &mut Frame, area: Rect, notice: Option<&Notice>) {
    let Some(notice) = notice else {
        return;
    };
    let color = match notice.kind {
        NoticeKind::Info => Color::Cyan,
        NoticeKind::Warning => Color::Yellow,
        NoticeKind::Error => Color::Red,
    };
    let widget = Paragraph::new(notice.text.as_str())
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .fg(color)
        .bold();
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect, controls: &str) {
    let widget = Paragraph::new(controls)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
