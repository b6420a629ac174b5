pub mod quiz_question;
pub mod quiz_request;
pub use quiz_question::{Difficulty, QuizQuestion, OPTION_COUNT, OPTION_LETTERS};
pub use quiz_request::{QuizRequest, MAX_QUESTION_COUNT, MIN_QUESTION_COUNT};
