use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError};

use crate::errors::AppResult;
use crate::models::domain::{Difficulty, QuizRequest};

const MAX_TOPIC_LENGTH: usize = 200;

/// Body of `POST /api/generate-quiz`.
///
/// `topic` and `count` default to empty so that a missing field is reported
/// through validation rather than as a body parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct GenerateQuizRequestDto {
    #[serde(default)]
    #[validate(custom(function = "validate_topic"))]
    pub topic: String,

    #[serde(default, deserialize_with = "deserialize_count")]
    #[validate(
        required(message = "Please request between 3 and 10 questions"),
        range(min = 3, max = 10, message = "Please request between 3 and 10 questions")
    )]
    pub count: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
}

impl GenerateQuizRequestDto {
    pub fn new(topic: impl Into<String>, count: usize, difficulty: Option<Difficulty>) -> Self {
        Self {
            topic: topic.into(),
            count: Some(count as i64),
            difficulty,
        }
    }

    pub fn into_quiz_request(self) -> AppResult<QuizRequest> {
        self.validate()?;

        Ok(QuizRequest {
            topic: self.topic.trim().to_string(),
            // validated above: present and within 3..=10
            count: self.count.unwrap_or_default() as usize,
            difficulty: self.difficulty,
        })
    }
}

fn validate_topic(topic: &str) -> Result<(), ValidationError> {
    let trimmed = topic.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new("topic_empty")
            .with_message("Please provide a valid topic for the quiz".into()));
    }
    if trimmed.chars().count() > MAX_TOPIC_LENGTH {
        return Err(ValidationError::new("topic_too_long")
            .with_message("Topic must be at most 200 characters".into()));
    }
    Ok(())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CountField {
    Number(i64),
    Text(String),
}

fn deserialize_count<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<CountField>::deserialize(deserializer)? {
        None => Ok(None),
        Some(CountField::Number(n)) => Ok(Some(n)),
        Some(CountField::Text(s)) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| D::Error::custom("count must be a whole number")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;

    fn parse(json: &str) -> GenerateQuizRequestDto {
        serde_json::from_str(json).expect("request body should deserialize")
    }

    #[test]
    fn accepts_valid_request_and_trims_topic() {
        let request = parse(r#"{"topic":"  Oceans ","count":5,"difficulty":"easy"}"#)
            .into_quiz_request()
            .expect("request should validate");

        assert_eq!(request.topic, "Oceans");
        assert_eq!(request.count, 5);
        assert_eq!(request.difficulty, Some(Difficulty::Easy));
    }

    #[test]
    fn accepts_numeric_string_count() {
        let request = parse(r#"{"topic":"Oceans","count":"7"}"#)
            .into_quiz_request()
            .expect("numeric string count should validate");

        assert_eq!(request.count, 7);
        assert_eq!(request.difficulty, None);
    }

    #[test]
    fn rejects_non_numeric_count_at_parse_time() {
        let parsed =
            serde_json::from_str::<GenerateQuizRequestDto>(r#"{"topic":"x","count":"many"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn rejects_count_out_of_range() {
        for count in [2, 11, 0, -4] {
            let body = format!(r#"{{"topic":"Oceans","count":{}}}"#, count);
            let result = parse(&body).into_quiz_request();
            assert!(
                matches!(
                    result,
                    Err(AppError::InvalidInput(ref msg)) if msg.contains("between 3 and 10")
                ),
                "count {} should be rejected, got {:?}",
                count,
                result
            );
        }
    }

    #[test]
    fn rejects_missing_count() {
        let result = parse(r#"{"topic":"Oceans"}"#).into_quiz_request();
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn rejects_blank_or_missing_topic() {
        for body in [r#"{"topic":"   ","count":5}"#, r#"{"count":5}"#] {
            let result = parse(body).into_quiz_request();
            assert!(
                matches!(
                    result,
                    Err(AppError::InvalidInput(ref msg)) if msg.contains("valid topic")
                ),
                "body {} should be rejected, got {:?}",
                body,
                result
            );
        }
    }

    #[test]
    fn rejects_overlong_topic() {
        let request = GenerateQuizRequestDto::new("x".repeat(201), 5, None);
        assert!(request.into_quiz_request().is_err());
    }

    #[test]
    fn rejects_unknown_difficulty_at_parse_time() {
        let parsed = serde_json::from_str::<GenerateQuizRequestDto>(
            r#"{"topic":"Oceans","count":5,"difficulty":"nightmare"}"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn serializes_without_absent_difficulty() {
        let json = serde_json::to_value(GenerateQuizRequestDto::new("Oceans", 5, None)).unwrap();

        assert_eq!(json["topic"], "Oceans");
        assert_eq!(json["count"], 5);
        assert!(json.get("difficulty").is_none());
    }
}
