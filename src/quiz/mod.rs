/// Quiz module
///
/// Payload validation, the transactional quiz repository,
/// and submission scoring.

mod payload;
mod scoring;
mod store;

pub use payload::{NewQuestion, NewQuiz, QuestionPayload, QuizPayload, QuizUpdate, QuizUpdatePayload};
pub use scoring::{load_answer_key, score_submission, tally, AnswerKey, Submission};
pub use store::{create_quiz, get_quiz, list_quizzes, update_quiz, Question, Quiz};
