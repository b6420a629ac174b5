use once_cell::sync::Lazy;

use crate::{
    constants::quiz_prompt::{QUIZ_EXAMPLE, QUIZ_RULES, QUIZ_SYSTEM_PROMPT},
    models::domain::{QuizQuestion, QuizRequest},
};

static SYSTEM_PROMPT: Lazy<String> = Lazy::new(|| {
    let schema = schemars::schema_for!(Vec<QuizQuestion>);
    match serde_json::to_string_pretty(&schema) {
        Ok(schema) => format!(
            "{}\n\nEach response must validate against this JSON Schema:\n{}",
            QUIZ_SYSTEM_PROMPT, schema
        ),
        Err(e) => {
            log::warn!("Could not render question schema for system prompt: {}", e);
            QUIZ_SYSTEM_PROMPT.to_string()
        }
    }
});

/// A system + user message pair for the completion API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizPrompt {
    pub system: String,
    pub user: String,
}

pub fn build_quiz_prompt(request: &QuizRequest) -> QuizPrompt {
    QuizPrompt {
        system: SYSTEM_PROMPT.clone(),
        user: build_user_prompt(request),
    }
}

pub fn build_user_prompt(request: &QuizRequest) -> String {
    let mut prompt = format!(
        "Generate exactly {} multiple choice quiz questions on the topic \"{}\". {}\n",
        request.count, request.topic, QUIZ_RULES
    );

    if let Some(difficulty) = request.difficulty {
        prompt.push_str(&format!(
            "4. Difficulty: {}. Questions should test {}.\n",
            difficulty,
            difficulty.guidance()
        ));
    }

    prompt.push('\n');
    prompt.push_str(QUIZ_EXAMPLE);
    prompt.push_str(&format!(
        "\n\nNow generate {} questions about \"{}\":",
        request.count, request.topic
    ));
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::Difficulty;

    fn request(difficulty: Option<Difficulty>) -> QuizRequest {
        QuizRequest {
            topic: "Oceans".to_string(),
            count: 5,
            difficulty,
        }
    }

    #[test]
    fn user_prompt_names_topic_count_and_prefixes() {
        let prompt = build_user_prompt(&request(None));

        assert!(prompt.starts_with(
            "Generate exactly 5 multiple choice quiz questions on the topic \"Oceans\"."
        ));
        assert!(prompt.contains("prefix with A), B), etc."));
        assert!(prompt.contains("\"correctAnswer\": \"B) Paris\""));
        assert!(prompt.ends_with("Now generate 5 questions about \"Oceans\":"));
        assert!(!prompt.contains("Difficulty:"));
    }

    #[test]
    fn user_prompt_includes_difficulty_when_given() {
        let prompt = build_user_prompt(&request(Some(Difficulty::Hard)));

        assert!(prompt.contains("4. Difficulty: hard."));
        assert!(prompt.contains(Difficulty::Hard.guidance()));
    }

    #[test]
    fn system_prompt_carries_instruction_and_schema() {
        let prompt = build_quiz_prompt(&request(None));

        assert!(prompt.system.starts_with(QUIZ_SYSTEM_PROMPT));
        assert!(prompt.system.contains("correctAnswer"));
    }
}
