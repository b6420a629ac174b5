//! Key handling and screen state for the terminal client.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::{
    client::{
        api::QuizGenerator,
        form::SettingsForm,
        guard::GuardEvent,
        session::{QuizSession, SessionPhase},
    },
    models::domain::OPTION_COUNT,
};

pub const TIME_UP: &str = "Time's up!";

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Generate,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    fn new(kind: NoticeKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

pub struct ClientApp {
    pub session: QuizSession,
    pub form: SettingsForm,
    notice: Option<Notice>,
    generating: bool,
    summary_scroll: u16,
    service_url: String,
}

impl ClientApp {
    pub fn new(service_url: impl Into<String>) -> Self {
        Self {
            session: QuizSession::new(),
            form: SettingsForm::default(),
            notice: None,
            generating: false,
            summary_scroll: 0,
            service_url: service_url.into(),
        }
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    pub fn summary_scroll(&self) -> u16 {
        self.summary_scroll
    }

    pub fn service_url(&self) -> &str {
        &self.service_url
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if key.kind != KeyEventKind::Press || self.generating {
            return KeyOutcome::Continue;
        }
        self.notice = None;

        match self.session.phase() {
            SessionPhase::Configuring => self.handle_settings_key(key),
            SessionPhase::Active => self.handle_quiz_key(key),
            SessionPhase::Completed => self.handle_summary_key(key),
        }
    }

    fn handle_settings_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if is_copy_chord(&key) {
            return KeyOutcome::Quit;
        }

        match key.code {
            KeyCode::Esc => return KeyOutcome::Quit,
            KeyCode::Enter => match self.form.to_settings().validate() {
                Ok(()) => {
                    self.generating = true;
                    return KeyOutcome::Generate;
                }
                Err(e) => self.notice = Some(Notice::new(NoticeKind::Error, e.to_string())),
            },
            KeyCode::Tab | KeyCode::Down => self.form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.form.focus_previous(),
            KeyCode::Left => self.form.cycle_difficulty(false),
            KeyCode::Right => self.form.cycle_difficulty(true),
            KeyCode::Backspace => self.form.pop(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.form.push(c)
            }
            _ => {}
        }
        KeyOutcome::Continue
    }

    fn handle_quiz_key(&mut self, key: KeyEvent) -> KeyOutcome {
        let guarded = if is_copy_chord(&key) {
            Some(GuardEvent::Copy)
        } else if key.code == KeyCode::PrintScreen {
            Some(GuardEvent::Key("PrintScreen".to_string()))
        } else {
            None
        };
        if let Some(event) = guarded {
            if let Some(warning) = self.session.intercept(&event) {
                log::debug!("Blocked {:?} during the quiz", event);
                self.notice = Some(Notice::new(NoticeKind::Warning, warning));
            }
            return KeyOutcome::Continue;
        }

        match key.code {
            KeyCode::Char(c @ '1'..='4') => self.select(c as usize - '1' as usize),
            KeyCode::Char(c @ ('a'..='d' | 'A'..='D')) => {
                self.select(c.to_ascii_lowercase() as usize - 'a' as usize)
            }
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(OPTION_COUNT - 1),
            KeyCode::Enter | KeyCode::Right | KeyCode::Char('n') => {
                if let Err(e) = self.session.next() {
                    self.notice = Some(Notice::new(NoticeKind::Warning, e.to_string()));
                }
                self.summary_scroll = 0;
            }
            KeyCode::Esc | KeyCode::Char('q') => {
                if self.session.abandon().is_ok() {
                    self.form = SettingsForm::from_settings(self.session.settings());
                    self.notice = Some(Notice::new(NoticeKind::Info, "Quiz abandoned."));
                }
            }
            _ => {}
        }
        KeyOutcome::Continue
    }

    fn handle_summary_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if is_copy_chord(&key) {
            return KeyOutcome::Quit;
        }

        match key.code {
            KeyCode::Enter | KeyCode::Char('r') => {
                if self.session.retake().is_ok() {
                    self.form = SettingsForm::from_settings(self.session.settings());
                    self.summary_scroll = 0;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let limit = self
                    .session
                    .summary()
                    .map_or(0, |s| u16::try_from(s.entries.len() * 4).unwrap_or(u16::MAX));
                self.summary_scroll = self.summary_scroll.saturating_add(1).min(limit);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.summary_scroll = self.summary_scroll.saturating_sub(1)
            }
            KeyCode::Esc | KeyCode::Char('q') => return KeyOutcome::Quit,
            _ => {}
        }
        KeyOutcome::Continue
    }

    fn select(&mut self, position: usize) {
        if let Err(e) = self.session.select_index(position) {
            self.notice = Some(Notice::new(NoticeKind::Warning, e.to_string()));
        }
    }

    /// Steps the selection by `step` options, wrapping around. With nothing
    /// selected the first step lands on the first or last option.
    fn move_selection(&mut self, step: usize) {
        let Some(question) = self.session.current_question() else {
            return;
        };
        let current = self
            .session
            .selected()
            .and_then(|s| question.options.iter().position(|o| o == s));
        let position = match current {
            Some(position) => (position + step) % OPTION_COUNT,
            None if step == 1 => 0,
            None => OPTION_COUNT - 1,
        };
        self.select(position);
    }

    /// Applies every countdown event that has arrived since the last call.
    pub fn drain_timer_events(&mut self) {
        while let Some(event) = self.session.try_timer_event() {
            if self.session.handle_timer_event(event).is_some() {
                self.notice = Some(Notice::new(NoticeKind::Warning, TIME_UP));
                self.summary_scroll = 0;
            }
        }
    }

    /// Requests the quiz described by the form. A failure stays on the
    /// settings screen with the error shown.
    pub async fn generate(&mut self, generator: &dyn QuizGenerator) {
        self.generating = true;
        let result = self.session.start(self.form.to_settings(), generator).await;
        self.generating = false;
        self.notice = result
            .err()
            .map(|e| Notice::new(NoticeKind::Error, e.to_string()));
    }
}

fn is_copy_chord(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c' | 'C') | KeyCode::Insert)
}
