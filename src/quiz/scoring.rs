/// Scoring Engine
///
/// A submission maps question ids to the chosen option. Every referenced
/// question must exist: one unknown id rejects the whole submission with
/// NotFound, and nothing is scored. Matching is exact and case-sensitive.

use std::collections::{BTreeMap, HashMap};

use sqlx::PgPool;

use crate::error::AppError;

pub type Submission = BTreeMap<i64, String>;

/// Question id -> persisted correct option
pub type AnswerKey = HashMap<i64, String>;

pub async fn load_answer_key(pool: &PgPool, question_ids: Vec<i64>) -> Result<AnswerKey, AppError> {
    let rows = sqlx::query_as::<_, (i64, String)>(
        "SELECT id, correct_option FROM questions WHERE id = ANY($1)",
    )
    .bind(question_ids)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().collect())
}

/// Tallies exact matches. Fails closed before counting if any submitted id
/// is absent from the answer key.
pub fn tally(submission: &Submission, answer_key: &AnswerKey) -> Result<u32, AppError> {
    let missing: Vec<String> = submission
        .keys()
        .filter(|id| !answer_key.contains_key(*id))
        .map(|id| id.to_string())
        .collect();

    if !missing.is_empty() {
        return Err(AppError::not_found(format!(
            "Question {}",
            missing.join(", ")
        )));
    }

    let score = submission
        .iter()
        .filter(|(id, answer)| answer_key.get(*id) == Some(*answer))
        .count();

    Ok(score as u32)
}

pub async fn score_submission(pool: &PgPool, submission: &Submission) -> Result<u32, AppError> {
    if submission.is_empty() {
        return Ok(0);
    }

    let answer_key = load_answer_key(pool, submission.keys().copied().collect()).await?;
    tally(submission, &answer_key)
}
