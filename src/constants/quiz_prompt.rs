pub const QUIZ_SYSTEM_PROMPT: &str = "You are a quiz generator. \
    Return only valid JSON arrays with quiz questions in the exact specified format. \
    Do not include any additional text or explanations.";

pub const QUIZ_RULES: &str = r#"Follow these strict rules:
1. Each question must have:
   - A clear question text
   - Exactly 4 options (A, B, C, D)
   - One correct answer (must match exactly one option)
2. Format each question as JSON with:
   - "text": The question
   - "options": Array of 4 options (prefix with A), B), etc.)
   - "correctAnswer": The full correct option text
3. Return only a valid JSON array with no extra text"#;

pub const QUIZ_EXAMPLE: &str = r#"Example:
[
  {
    "text": "What is the capital of France?",
    "options": ["A) London", "B) Paris", "C) Berlin", "D) Madrid"],
    "correctAnswer": "B) Paris"
  }
]"#;
