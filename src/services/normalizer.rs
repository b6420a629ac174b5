//! Coerces a free-text model completion into validated [`QuizQuestion`]s.
//!
//! The completion is expected to contain a JSON array somewhere inside it,
//! possibly wrapped in a markdown code fence. Each element is checked for the
//! required fields, its options are given their positional `A) `..`D) `
//! prefix, and a bare-letter answer is expanded to the matching option.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use crate::models::domain::{QuizQuestion, OPTION_COUNT, OPTION_LETTERS};

const CODE_FENCE: &str = "```";

/// Parenthesized option label, e.g. `A)Paris`, `(a) Paris`.
static OPTION_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\(?([A-Da-d])\)\s*").expect("OPTION_LABEL is a valid regex pattern")
});

/// An answer given as just a letter, e.g. `B`, `b`, `B)`, `(B)`, `B.`.
static LETTER_ANSWER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\(?([A-Da-d])\)?\.?$").expect("LETTER_ANSWER is a valid regex pattern")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("Failed to parse quiz data: {0}")]
    MalformedResponse(String),

    #[error("Question {} missing or invalid {field}", .index + 1)]
    IncompleteQuestion { index: usize, field: &'static str },

    #[error("Question {} has duplicate options", .index + 1)]
    DuplicateOptions { index: usize },

    #[error("Question {} correctAnswer doesn't match any option", .index + 1)]
    AnswerMismatch { index: usize },

    #[error("Expected {expected} questions, got {actual}")]
    CountMismatch { expected: usize, actual: usize },
}

/// Normalizes `raw` into exactly `expected` questions, in source order.
pub fn normalize_completion(
    raw: &str,
    expected: usize,
) -> Result<Vec<QuizQuestion>, NormalizeError> {
    let array = extract_json_array(raw)?;

    let elements: Vec<Value> = serde_json::from_str(array)
        .map_err(|e| NormalizeError::MalformedResponse(e.to_string()))?;

    let questions = elements
        .iter()
        .enumerate()
        .map(|(index, element)| normalize_question(index, element))
        .collect::<Result<Vec<_>, _>>()?;

    if questions.len() != expected {
        return Err(NormalizeError::CountMismatch {
            expected,
            actual: questions.len(),
        });
    }

    Ok(questions)
}

/// Returns the slice from the first `[` to the last `]`, after removing any
/// surrounding code fence.
pub fn extract_json_array(raw: &str) -> Result<&str, NormalizeError> {
    let content = strip_code_fence(raw);

    let start = content
        .find('[')
        .ok_or_else(|| NormalizeError::MalformedResponse("no '[' found in response".to_string()))?;
    let end = content
        .rfind(']')
        .ok_or_else(|| NormalizeError::MalformedResponse("no ']' found in response".to_string()))?;

    if end < start {
        return Err(NormalizeError::MalformedResponse(
            "closing ']' appears before opening '['".to_string(),
        ));
    }

    Ok(&content[start..=end])
}

pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix(CODE_FENCE) else {
        return trimmed;
    };

    // Drop the opening fence line, or just the language tag on a one-line reply.
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
    };

    let body = body.trim_end();
    body.strip_suffix(CODE_FENCE).unwrap_or(body).trim()
}

fn normalize_question(index: usize, element: &Value) -> Result<QuizQuestion, NormalizeError> {
    let incomplete = |field| NormalizeError::IncompleteQuestion { index, field };

    let text = non_empty_str(element.get("text")).ok_or_else(|| incomplete("text"))?;

    let raw_options = element
        .get("options")
        .and_then(Value::as_array)
        .filter(|options| options.len() == OPTION_COUNT)
        .ok_or_else(|| incomplete("options"))?;

    let correct_answer =
        non_empty_str(element.get("correctAnswer")).ok_or_else(|| incomplete("correctAnswer"))?;

    let mut source_options: [&str; OPTION_COUNT] = Default::default();
    let mut options: [String; OPTION_COUNT] = Default::default();
    for (position, raw_option) in raw_options.iter().enumerate() {
        let option = non_empty_str(Some(raw_option)).ok_or_else(|| incomplete("options"))?;
        let repaired = repair_prefix(position, option);
        if option_body(&repaired).is_empty() {
            return Err(incomplete("options"));
        }
        source_options[position] = option;
        options[position] = repaired;
    }

    if has_duplicates(&options) {
        return Err(NormalizeError::DuplicateOptions { index });
    }

    let correct_answer = resolve_answer(correct_answer, &source_options, &options)
        .ok_or(NormalizeError::AnswerMismatch { index })?;

    Ok(QuizQuestion {
        text: text.to_string(),
        options,
        correct_answer,
    })
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn canonical_prefix(position: usize) -> String {
    format!("{}) ", OPTION_LETTERS[position])
}

fn option_body(option: &str) -> &str {
    option.get(3..).unwrap_or_default().trim()
}

/// Ensures `option` starts with the canonical prefix for `position`. A
/// parenthesized label of the same letter is rewritten in place; anything
/// else gets the prefix prepended.
pub fn repair_prefix(position: usize, option: &str) -> String {
    let prefix = canonical_prefix(position);
    if option.starts_with(&prefix) {
        return option.to_string();
    }

    if let Some(captures) = OPTION_LABEL.captures(option) {
        let same_letter = captures
            .get(1)
            .and_then(|m| m.as_str().chars().next())
            .is_some_and(|c| c.eq_ignore_ascii_case(&OPTION_LETTERS[position]));
        if same_letter {
            let label_end = captures.get(0).map_or(0, |m| m.end());
            return format!("{}{}", prefix, &option[label_end..]);
        }
    }

    format!("{}{}", prefix, option)
}

/// Maps the model's answer onto a repaired option. The answer may be the
/// repaired option itself, the option exactly as the model wrote it, or a
/// bare letter.
fn resolve_answer(
    answer: &str,
    source_options: &[&str; OPTION_COUNT],
    options: &[String; OPTION_COUNT],
) -> Option<String> {
    if options.iter().any(|option| option == answer) {
        return Some(answer.to_string());
    }

    if let Some(position) = source_options.iter().position(|&option| option == answer) {
        return Some(options[position].clone());
    }

    let expanded = expand_letter_answer(answer, options);
    options.contains(&expanded).then_some(expanded)
}

fn expand_letter_answer(answer: &str, options: &[String; OPTION_COUNT]) -> String {
    let position = LETTER_ANSWER
        .captures(answer)
        .and_then(|captures| captures.get(1))
        .and_then(|m| m.as_str().chars().next())
        .and_then(|letter| {
            OPTION_LETTERS
                .iter()
                .position(|l| l.eq_ignore_ascii_case(&letter))
        });

    match position {
        Some(position) => options[position].clone(),
        None => answer.to_string(),
    }
}

/// Positional prefixes always differ, so options are compared by the text
/// after the prefix, ignoring case.
fn has_duplicates(options: &[String; OPTION_COUNT]) -> bool {
    let bodies: Vec<String> = options
        .iter()
        .map(|option| option_body(option).to_lowercase())
        .collect();

    bodies
        .iter()
        .enumerate()
        .any(|(i, body)| bodies[i + 1..].contains(body))
}
