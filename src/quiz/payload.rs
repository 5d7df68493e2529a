/// Quiz request payloads and their validation.
///
/// Validation short-circuits on the first failure, in this order:
/// title, description, duration, presence of questions, then each question.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::ValidationError;
use crate::validators::{require_text, MAX_TITLE_LENGTH};

const MAX_DESCRIPTION_LENGTH: usize = 10_000;
const MAX_QUESTION_LENGTH: usize = 10_000;
/// Width of `questions.correct_option`
pub const MAX_OPTION_LENGTH: usize = 100;

#[derive(Debug, Deserialize)]
pub struct QuizPayload {
    pub title: String,
    pub description: String,
    /// Minutes
    pub duration: i32,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub questions: Vec<QuestionPayload>,
}

#[derive(Debug, Deserialize)]
pub struct QuestionPayload {
    pub title: String,
    pub correct_option: String,
    #[serde(default)]
    pub options: Vec<String>,
}

/// Body of a quiz metadata update; questions are not touched.
#[derive(Debug, Deserialize)]
pub struct QuizUpdatePayload {
    pub title: String,
    pub description: String,
    pub duration: i32,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
}

/// A quiz that passed validation, with timestamps resolved.
#[derive(Debug, Clone)]
pub struct NewQuiz {
    pub title: String,
    pub description: String,
    pub duration_minutes: i32,
    pub created_at: DateTime<Utc>,
    pub start_time: DateTime<Utc>,
    pub questions: Vec<NewQuestion>,
}

#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub title: String,
    pub correct_option: String,
    pub options: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct QuizUpdate {
    pub title: String,
    pub description: String,
    pub duration_minutes: i32,
    pub start_time: DateTime<Utc>,
}

fn validate_header(title: &str, description: &str, duration: i32) -> Result<(), ValidationError> {
    require_text("title", title, MAX_TITLE_LENGTH)?;
    require_text("description", description, MAX_DESCRIPTION_LENGTH)?;
    if duration <= 0 {
        return Err(ValidationError::OutOfRange(
            "duration must be a positive number of minutes".to_string(),
        ));
    }
    Ok(())
}

impl QuestionPayload {
    fn validate(self, index: usize) -> Result<NewQuestion, ValidationError> {
        let field = |name: &str| format!("questions[{}].{}", index, name);

        require_text(&field("title"), &self.title, MAX_QUESTION_LENGTH)?;
        if self.options.is_empty() {
            return Err(ValidationError::EmptyField(field("options")));
        }
        if self.correct_option.is_empty() {
            return Err(ValidationError::EmptyField(field("correct_option")));
        }
        // VARCHAR counts characters, not bytes
        if self.correct_option.chars().count() > MAX_OPTION_LENGTH {
            return Err(ValidationError::TooLong(field("correct_option"), MAX_OPTION_LENGTH));
        }
        if !self.options.contains(&self.correct_option) {
            return Err(ValidationError::OutOfRange(format!(
                "{} must be one of the offered options",
                field("correct_option")
            )));
        }

        Ok(NewQuestion {
            title: self.title,
            correct_option: self.correct_option,
            options: self.options,
        })
    }
}

impl QuizPayload {
    /// Validates the payload; unset timestamps default to `now`, the moment
    /// the request was accepted.
    pub fn validate(self, now: DateTime<Utc>) -> Result<NewQuiz, ValidationError> {
        validate_header(&self.title, &self.description, self.duration)?;
        if self.questions.is_empty() {
            return Err(ValidationError::EmptyField("questions".to_string()));
        }

        let questions = self
            .questions
            .into_iter()
            .enumerate()
            .map(|(index, question)| question.validate(index))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(NewQuiz {
            title: self.title,
            description: self.description,
            duration_minutes: self.duration,
            created_at: self.created_at.unwrap_or(now),
            start_time: self.start_time.unwrap_or(now),
            questions,
        })
    }
}

impl QuizUpdatePayload {
    pub fn validate(self, now: DateTime<Utc>) -> Result<QuizUpdate, ValidationError> {
        validate_header(&self.title, &self.description, self.duration)?;
        Ok(QuizUpdate {
            title: self.title,
            description: self.description,
            duration_minutes: self.duration,
            start_time: self.start_time.unwrap_or(now),
        })
    }
}
