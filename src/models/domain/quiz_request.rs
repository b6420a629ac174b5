use super::Difficulty;

pub const MIN_QUESTION_COUNT: usize = 3;
pub const MAX_QUESTION_COUNT: usize = 10;

/// A validated quiz generation request. Built from
/// [`GenerateQuizRequestDto`](crate::models::dto::request::GenerateQuizRequestDto).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizRequest {
    pub topic: String,
    pub count: usize,
    pub difficulty: Option<Difficulty>,
}
