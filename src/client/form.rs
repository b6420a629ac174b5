use crate::{
    client::session::{QuizSettings, DEFAULT_SECONDS_PER_QUESTION},
    models::domain::Difficulty,
};

pub const DEFAULT_QUESTION_COUNT: usize = 5;

const MAX_TOPIC_CHARS: usize = 200;
const MAX_NUMBER_DIGITS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Topic,
    Count,
    Timer,
    Difficulty,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::Topic,
        FormField::Count,
        FormField::Timer,
        FormField::Difficulty,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Topic => "Topic",
            FormField::Count => "Number of Questions",
            FormField::Timer => "Seconds per Question",
            FormField::Difficulty => "Difficulty",
        }
    }

    fn position(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    fn previous(self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// The editable quiz settings shown before a quiz starts. Numbers are kept
/// as typed and only parsed when the quiz is requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsForm {
    pub topic: String,
    pub count: String,
    pub seconds: String,
    pub difficulty: Option<Difficulty>,
    pub focus: FormField,
}

impl Default for SettingsForm {
    fn default() -> Self {
        Self::from_settings(None)
    }
}

impl SettingsForm {
    /// Prefills from the previous quiz, or the defaults when there is none.
    pub fn from_settings(settings: Option<&QuizSettings>) -> Self {
        match settings {
            Some(s) => Self {
                topic: s.topic.clone(),
                count: s.question_count.to_string(),
                seconds: s.seconds_per_question.to_string(),
                difficulty: s.difficulty,
                focus: FormField::Topic,
            },
            None => Self {
                topic: String::new(),
                count: DEFAULT_QUESTION_COUNT.to_string(),
                seconds: DEFAULT_SECONDS_PER_QUESTION.to_string(),
                difficulty: None,
                focus: FormField::Topic,
            },
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }

    /// Types `c` into the focused field. Number fields take digits only.
    pub fn push(&mut self, c: char) {
        match self.focus {
            FormField::Topic if self.topic.chars().count() < MAX_TOPIC_CHARS => self.topic.push(c),
            FormField::Count => push_digit(&mut self.count, c),
            FormField::Timer => push_digit(&mut self.seconds, c),
            FormField::Difficulty if c == ' ' => self.cycle_difficulty(true),
            _ => {}
        }
    }

    pub fn pop(&mut self) {
        match self.focus {
            FormField::Topic => {
                self.topic.pop();
            }
            FormField::Count => {
                self.count.pop();
            }
            FormField::Timer => {
                self.seconds.pop();
            }
            FormField::Difficulty => self.difficulty = None,
        }
    }

    /// Steps through any -> easy -> medium -> hard -> any.
    pub fn cycle_difficulty(&mut self, forward: bool) {
        const CYCLE: [Option<Difficulty>; 4] = [
            None,
            Some(Difficulty::Easy),
            Some(Difficulty::Medium),
            Some(Difficulty::Hard),
        ];
        let position = CYCLE.iter().position(|d| *d == self.difficulty).unwrap_or(0);
        let next = if forward {
            (position + 1) % CYCLE.len()
        } else {
            (position + CYCLE.len() - 1) % CYCLE.len()
        };
        self.difficulty = CYCLE[next];
    }

    pub fn value(&self, field: FormField) -> String {
        match field {
            FormField::Topic => self.topic.clone(),
            FormField::Count => self.count.clone(),
            FormField::Timer => self.seconds.clone(),
            FormField::Difficulty => self
                .difficulty
                .map_or_else(|| "any".to_string(), |d| d.to_string()),
        }
    }

    /// Empty or unparseable numbers become zero and fail settings validation.
    pub fn to_settings(&self) -> QuizSettings {
        QuizSettings::new(self.topic.clone(), self.count.parse().unwrap_or(0))
            .with_timer(self.seconds.parse().unwrap_or(0))
            .with_difficulty(self.difficulty)
    }
}

fn push_digit(field: &mut String, c: char) {
    if c.is_ascii_digit() && field.len() < MAX_NUMBER_DIGITS {
        field.push(c);
    }
}
