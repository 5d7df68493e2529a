/// Quiz Repository
///
/// Quiz creation writes the quiz row and every question row inside one
/// transaction: either all rows commit, or the transaction is rolled back
/// before the error is returned. Readers never see a partial quiz.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::{AppError, DatabaseError};
use crate::quiz::payload::{NewQuestion, NewQuiz, QuizUpdate};

#[derive(Debug, Clone, Serialize)]
pub struct Quiz {
    pub quiz_id: i64,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    /// Minutes
    pub duration: i32,
    pub start_time: DateTime<Utc>,
    pub created_by: Option<String>,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Question {
    pub question_id: i64,
    pub title: String,
    pub options: Vec<String>,
    /// Answer key; stripped for non-admin callers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_option: Option<String>,
}

impl Quiz {
    pub fn without_answers(mut self) -> Self {
        for question in &mut self.questions {
            question.correct_option = None;
        }
        self
    }
}

#[derive(sqlx::FromRow)]
struct QuizRow {
    quiz_id: i64,
    title: String,
    description: String,
    created_at: DateTime<Utc>,
    duration_minutes: i32,
    start_time: DateTime<Utc>,
    created_by: Option<String>,
    question_id: Option<i64>,
    question_title: Option<String>,
    correct_option: Option<String>,
    options: Option<Json<Vec<String>>>,
}

fn transaction_error(e: sqlx::Error) -> AppError {
    AppError::Database(DatabaseError::Transaction(e.to_string()))
}

/// Creates a quiz and all of its questions atomically.
///
/// Returns the generated quiz id.
pub async fn create_quiz(
    pool: &PgPool,
    quiz: &NewQuiz,
    created_by: &str,
) -> Result<i64, AppError> {
    let mut tx = pool.begin().await.map_err(transaction_error)?;

    match insert_quiz_rows(&mut tx, quiz, created_by).await {
        Ok(quiz_id) => {
            tx.commit().await.map_err(transaction_error)?;
            Ok(quiz_id)
        }
        Err(e) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::error!(error = %rollback_err, "Quiz transaction rollback failed");
            }
            Err(e)
        }
    }
}

async fn insert_quiz_rows(
    tx: &mut Transaction<'_, Postgres>,
    quiz: &NewQuiz,
    created_by: &str,
) -> Result<i64, AppError> {
    let quiz_id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO quizzes (title, description, created_at, duration_minutes, start_time, created_by)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(&quiz.title)
    .bind(&quiz.description)
    .bind(quiz.created_at)
    .bind(quiz.duration_minutes)
    .bind(quiz.start_time)
    .bind(created_by)
    .fetch_one(&mut **tx)
    .await?;

    for (position, question) in quiz.questions.iter().enumerate() {
        insert_question(tx, quiz_id, position as i32, question).await?;
    }

    Ok(quiz_id)
}

async fn insert_question(
    tx: &mut Transaction<'_, Postgres>,
    quiz_id: i64,
    position: i32,
    question: &NewQuestion,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO questions (quiz_id, position, title, correct_option, options)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(quiz_id)
    .bind(position)
    .bind(&question.title)
    .bind(&question.correct_option)
    .bind(Json(&question.options))
    .execute(&mut **tx)
    .await
    .map_err(|e| {
        tracing::warn!(quiz_id, position, error = %e, "Question insert failed");
        AppError::from(e)
    })?;

    Ok(())
}

const SELECT_QUIZZES: &str = r#"
    SELECT q.id AS quiz_id, q.title, q.description, q.created_at, q.duration_minutes,
           q.start_time, q.created_by,
           qs.id AS question_id, qs.title AS question_title, qs.correct_option, qs.options
    FROM quizzes q
    LEFT JOIN questions qs ON qs.quiz_id = q.id
"#;

/// Lists all quizzes ordered by id, questions in insertion order.
pub async fn list_quizzes(pool: &PgPool) -> Result<Vec<Quiz>, AppError> {
    let query = format!("{} ORDER BY q.id, qs.position", SELECT_QUIZZES);
    let rows = sqlx::query_as::<_, QuizRow>(&query)
        .fetch_all(pool)
        .await?;

    Ok(group_rows(rows))
}

pub async fn get_quiz(pool: &PgPool, quiz_id: i64) -> Result<Quiz, AppError> {
    let query = format!("{} WHERE q.id = $1 ORDER BY qs.position", SELECT_QUIZZES);
    let rows = sqlx::query_as::<_, QuizRow>(&query)
        .bind(quiz_id)
        .fetch_all(pool)
        .await?;

    group_rows(rows)
        .pop()
        .ok_or_else(|| AppError::not_found(format!("Quiz {}", quiz_id)))
}

/// Updates quiz metadata only.
pub async fn update_quiz(pool: &PgPool, quiz_id: i64, update: &QuizUpdate) -> Result<(), AppError> {
    let result = sqlx::query(
        r#"
        UPDATE quizzes
        SET title = $1, description = $2, duration_minutes = $3, start_time = $4
        WHERE id = $5
        "#,
    )
    .bind(&update.title)
    .bind(&update.description)
    .bind(update.duration_minutes)
    .bind(update.start_time)
    .bind(quiz_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found(format!("Quiz {}", quiz_id)));
    }
    Ok(())
}

// Rows arrive ordered by quiz id, so a change of id starts a new quiz.
fn group_rows(rows: Vec<QuizRow>) -> Vec<Quiz> {
    let mut quizzes: Vec<Quiz> = Vec::new();

    for row in rows {
        if quizzes.last().map(|q| q.quiz_id) != Some(row.quiz_id) {
            quizzes.push(Quiz {
                quiz_id: row.quiz_id,
                title: row.title,
                description: row.description,
                created_at: row.created_at,
                duration: row.duration_minutes,
                start_time: row.start_time,
                created_by: row.created_by,
                questions: Vec::new(),
            });
        }

        if let (Some(question_id), Some(title)) = (row.question_id, row.question_title) {
            if let Some(quiz) = quizzes.last_mut() {
                quiz.questions.push(Question {
                    question_id,
                    title,
                    options: row.options.map(|o| o.0).unwrap_or_default(),
                    correct_option: row.correct_option,
                });
            }
        }
    }

    quizzes
}
