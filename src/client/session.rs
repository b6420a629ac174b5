//! One quiz attempt, from configuration through results.
//!
//! `Configuring -> Active` happens only after a successful generation call.
//! While `Active`, each question runs its own [`CountdownTimer`]; the timer
//! is replaced on every question change and cancelled whenever the session
//! leaves `Active`. `Completed -> Configuring` is the explicit retake.
//!
//! A timeout counts as unanswered: any tentative selection is discarded and
//! no point is awarded. Points are only counted on an explicit [`next`].
//!
//! [`next`]: QuizSession::next

use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::{
    client::{
        api::QuizGenerator,
        guard::{self, GuardEvent},
        timer::{CountdownTimer, TimerEvent},
    },
    models::{
        domain::{Difficulty, QuizQuestion, MAX_QUESTION_COUNT, MIN_QUESTION_COUNT},
        dto::request::GenerateQuizRequestDto,
    },
};

pub const DEFAULT_SECONDS_PER_QUESTION: u32 = 10;
pub const MIN_SECONDS_PER_QUESTION: u32 = 5;
pub const MAX_SECONDS_PER_QUESTION: u32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Configuring,
    Active,
    Completed,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Please enter a valid topic, number of questions, and timer duration. ({0})")]
    InvalidSettings(&'static str),

    #[error("{0}")]
    GenerationFailed(String),

    #[error("Not allowed while the quiz is {0:?}")]
    WrongPhase(SessionPhase),

    #[error("'{0}' is not an option for this question")]
    UnknownOption(String),

    #[error("Select an answer before moving on")]
    NoSelection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSettings {
    pub topic: String,
    pub question_count: usize,
    pub seconds_per_question: u32,
    pub difficulty: Option<Difficulty>,
}

impl QuizSettings {
    pub fn new(topic: impl Into<String>, question_count: usize) -> Self {
        Self {
            topic: topic.into(),
            question_count,
            seconds_per_question: DEFAULT_SECONDS_PER_QUESTION,
            difficulty: None,
        }
    }

    pub fn with_timer(mut self, seconds_per_question: u32) -> Self {
        self.seconds_per_question = seconds_per_question;
        self
    }

    pub fn with_difficulty(mut self, difficulty: Option<Difficulty>) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn validate(&self) -> Result<(), SessionError> {
        if self.topic.trim().is_empty() {
            return Err(SessionError::InvalidSettings("topic is empty"));
        }
        if !(MIN_QUESTION_COUNT..=MAX_QUESTION_COUNT).contains(&self.question_count) {
            return Err(SessionError::InvalidSettings(
                "number of questions must be between 3 and 10",
            ));
        }
        if !(MIN_SECONDS_PER_QUESTION..=MAX_SECONDS_PER_QUESTION)
            .contains(&self.seconds_per_question)
        {
            return Err(SessionError::InvalidSettings(
                "timer must be between 5 and 300 seconds",
            ));
        }
        Ok(())
    }

    pub fn to_request(&self) -> GenerateQuizRequestDto {
        GenerateQuizRequestDto::new(self.topic.trim(), self.question_count, self.difficulty)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAnswer {
    pub question_index: usize,
    pub answer: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionOutcome {
    Correct,
    Incorrect,
    Unanswered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    NextQuestion(usize),
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryEntry {
    pub question_index: usize,
    pub text: String,
    pub user_answer: Option<String>,
    pub correct_answer: String,
    pub outcome: QuestionOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSummary {
    pub topic: String,
    pub score: usize,
    pub total: usize,
    pub entries: Vec<SummaryEntry>,
}

pub struct QuizSession {
    phase: SessionPhase,
    settings: Option<QuizSettings>,
    questions: Vec<QuizQuestion>,
    current: usize,
    selected: Option<String>,
    answers: Vec<UserAnswer>,
    outcomes: Vec<QuestionOutcome>,
    score: usize,
    remaining_seconds: u32,
    last_error: Option<String>,
    timer: Option<CountdownTimer>,
    timer_generation: u64,
    events_tx: UnboundedSender<TimerEvent>,
    events_rx: UnboundedReceiver<TimerEvent>,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    pub fn new() -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            phase: SessionPhase::Configuring,
            settings: None,
            questions: Vec::new(),
            current: 0,
            selected: None,
            answers: Vec::new(),
            outcomes: Vec::new(),
            score: 0,
            remaining_seconds: 0,
            last_error: None,
            timer: None,
            timer_generation: 0,
            events_tx,
            events_rx,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn settings(&self) -> Option<&QuizSettings> {
        self.settings.as_ref()
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        match self.phase {
            SessionPhase::Active => self.questions.get(self.current),
            _ => None,
        }
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn answers(&self) -> &[UserAnswer] {
        &self.answers
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn timer_generation(&self) -> u64 {
        self.timer_generation
    }

    pub fn has_running_timer(&self) -> bool {
        self.timer.is_some()
    }

    /// Requests a quiz and, on success, moves to `Active` on the first
    /// question. On failure the session stays in `Configuring` with the
    /// error recorded and nothing else changed.
    pub async fn start(
        &mut self,
        settings: QuizSettings,
        generator: &dyn QuizGenerator,
    ) -> Result<(), SessionError> {
        if self.phase != SessionPhase::Configuring {
            return Err(SessionError::WrongPhase(self.phase));
        }

        if let Err(e) = settings.validate() {
            self.last_error = Some(e.to_string());
            return Err(e);
        }

        self.last_error = None;
        log::info!(
            "Requesting {} questions on '{}'",
            settings.question_count,
            settings.topic
        );

        let questions = match generator.generate(&settings.to_request()).await {
            Ok(questions) if !questions.is_empty() => questions,
            Ok(_) => {
                return Err(self.fail(crate::client::api::GENERATION_FAILED.to_string()));
            }
            Err(e) => return Err(self.fail(e.to_string())),
        };

        self.begin(settings, questions);
        Ok(())
    }

    fn fail(&mut self, message: String) -> SessionError {
        log::warn!("Quiz generation failed: {}", message);
        self.last_error = Some(message.clone());
        SessionError::GenerationFailed(message)
    }

    fn begin(&mut self, settings: QuizSettings, questions: Vec<QuizQuestion>) {
        self.questions = questions;
        self.settings = Some(settings);
        self.current = 0;
        self.selected = None;
        self.answers.clear();
        self.outcomes.clear();
        self.score = 0;
        self.phase = SessionPhase::Active;
        self.restart_timer();
    }

    fn restart_timer(&mut self) {
        let seconds = self
            .settings
            .as_ref()
            .map_or(DEFAULT_SECONDS_PER_QUESTION, |s| s.seconds_per_question);

        self.timer_generation += 1;
        self.remaining_seconds = seconds;
        // Replacing the handle drops and aborts the previous countdown.
        self.timer = Some(CountdownTimer::start(
            self.timer_generation,
            seconds,
            self.events_tx.clone(),
        ));
    }

    fn stop_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }

    /// Records `option` as the answer to the current question, replacing
    /// any earlier choice.
    pub fn select_option(&mut self, option: &str) -> Result<(), SessionError> {
        let question = self
            .current_question()
            .ok_or(SessionError::WrongPhase(self.phase))?;
        if !question.has_option(option) {
            return Err(SessionError::UnknownOption(option.to_string()));
        }

        let index = self.current;
        self.selected = Some(option.to_string());
        match self.answers.iter_mut().find(|a| a.question_index == index) {
            Some(existing) => existing.answer = option.to_string(),
            None => self.answers.push(UserAnswer {
                question_index: index,
                answer: option.to_string(),
            }),
        }
        Ok(())
    }

    pub fn select_index(&mut self, position: usize) -> Result<(), SessionError> {
        let option = self
            .current_question()
            .ok_or(SessionError::WrongPhase(self.phase))?
            .options
            .get(position)
            .cloned()
            .ok_or_else(|| SessionError::UnknownOption(format!("option {}", position + 1)))?;
        self.select_option(&option)
    }

    /// Locks in the selected answer, scores it, and moves on.
    pub fn next(&mut self) -> Result<Advance, SessionError> {
        let question = self
            .current_question()
            .ok_or(SessionError::WrongPhase(self.phase))?;
        let selected = self.selected.as_deref().ok_or(SessionError::NoSelection)?;

        if question.is_correct(selected) {
            self.score += 1;
            self.outcomes.push(QuestionOutcome::Correct);
        } else {
            self.outcomes.push(QuestionOutcome::Incorrect);
        }

        Ok(self.advance())
    }

    fn advance(&mut self) -> Advance {
        self.selected = None;
        if self.current + 1 >= self.questions.len() {
            self.stop_timer();
            self.phase = SessionPhase::Completed;
            log::info!("Quiz completed with score {}/{}", self.score, self.questions.len());
            Advance::Completed
        } else {
            self.current += 1;
            self.restart_timer();
            Advance::NextQuestion(self.current)
        }
    }

    /// Applies a countdown event. Events from any timer other than the one
    /// currently running are ignored.
    pub fn handle_timer_event(&mut self, event: TimerEvent) -> Option<Advance> {
        if self.phase != SessionPhase::Active || event.generation() != self.timer_generation {
            return None;
        }

        match event {
            TimerEvent::Tick { remaining, .. } => {
                self.remaining_seconds = remaining;
                None
            }
            TimerEvent::Expired { .. } => {
                let index = self.current;
                log::debug!("Question {} timed out", index + 1);
                self.remaining_seconds = 0;
                self.answers.retain(|a| a.question_index != index);
                self.outcomes.push(QuestionOutcome::Unanswered);
                Some(self.advance())
            }
        }
    }

    /// Waits for the next countdown event.
    pub async fn next_timer_event(&mut self) -> Option<TimerEvent> {
        self.events_rx.recv().await
    }

    /// Returns a pending countdown event without waiting.
    pub fn try_timer_event(&mut self) -> Option<TimerEvent> {
        self.events_rx.try_recv().ok()
    }

    /// Leaves an active quiz without finishing it.
    pub fn abandon(&mut self) -> Result<(), SessionError> {
        if self.phase != SessionPhase::Active {
            return Err(SessionError::WrongPhase(self.phase));
        }
        self.reset();
        Ok(())
    }

    /// Clears a completed quiz so a new one can be configured. The previous
    /// settings are kept for prefilling.
    pub fn retake(&mut self) -> Result<(), SessionError> {
        if self.phase != SessionPhase::Completed {
            return Err(SessionError::WrongPhase(self.phase));
        }
        self.reset();
        Ok(())
    }

    fn reset(&mut self) {
        self.stop_timer();
        self.phase = SessionPhase::Configuring;
        self.questions.clear();
        self.current = 0;
        self.selected = None;
        self.answers.clear();
        self.outcomes.clear();
        self.score = 0;
        self.remaining_seconds = self
            .settings
            .as_ref()
            .map_or(DEFAULT_SECONDS_PER_QUESTION, |s| s.seconds_per_question);
    }

    /// Copy and screen-capture attempts only produce a warning during a quiz.
    pub fn intercept(&self, event: &GuardEvent) -> Option<&'static str> {
        match self.phase {
            SessionPhase::Active => guard::warning_for(event),
            _ => None,
        }
    }

    pub fn summary(&self) -> Option<QuizSummary> {
        if self.phase != SessionPhase::Completed {
            return None;
        }

        let entries = self
            .questions
            .iter()
            .enumerate()
            .map(|(index, question)| SummaryEntry {
                question_index: index,
                text: question.text.clone(),
                user_answer: self
                    .answers
                    .iter()
                    .find(|a| a.question_index == index)
                    .map(|a| a.answer.clone()),
                correct_answer: question.correct_answer.clone(),
                outcome: self
                    .outcomes
                    .get(index)
                    .copied()
                    .unwrap_or(QuestionOutcome::Unanswered),
            })
            .collect();

        Some(QuizSummary {
            topic: self
                .settings
                .as_ref()
                .map(|s| s.topic.trim().to_string())
                .unwrap_or_default(),
            score: self.score,
            total: self.questions.len(),
            entries,
        })
    }
}
