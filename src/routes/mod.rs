mod auth;
mod health_check;
mod quizzes;

pub use auth::{admin_signup, login, student_signup, ApiResponse, LoginResponse};
pub use health_check::health_check;
pub use quizzes::{create_quiz, get_quiz, list_quizzes, submit_answers, update_quiz};
