/// Quiz Routes
///
/// Reading quizzes and submitting answers (any authenticated role), plus
/// the admin-only create and update handlers.

use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Serialize;
use sqlx::PgPool;

use crate::auth::Claims;
use crate::error::AppError;
use crate::quiz::{self, Quiz, QuizPayload, QuizUpdatePayload, Submission};
use crate::routes::auth::ApiResponse;

#[derive(Serialize)]
pub struct QuizCreatedResponse {
    pub message: String,
    pub quiz_id: i64,
}

#[derive(Serialize)]
pub struct ScoreResponse {
    pub score: u32,
}

fn for_caller(quiz: Quiz, claims: &Claims) -> Quiz {
    if claims.is_admin() {
        quiz
    } else {
        quiz.without_answers()
    }
}

/// POST /admin/quizzes
///
/// # Errors
/// - 401: missing/invalid token (middleware)
/// - 403: caller is not an admin (middleware, before the body is read)
/// - 400: payload failed validation
/// - 500: any insert failed; the whole quiz was rolled back
pub async fn create_quiz(
    claims: web::ReqData<Claims>,
    payload: web::Json<QuizPayload>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let new_quiz = payload.into_inner().validate(Utc::now())?;

    let quiz_id = quiz::create_quiz(pool.get_ref(), &new_quiz, &claims.email).await?;

    tracing::info!(
        quiz_id,
        email = %claims.email,
        questions = new_quiz.questions.len(),
        "Quiz created successfully"
    );

    Ok(HttpResponse::Created().json(QuizCreatedResponse {
        message: "Quiz created successfully".to_string(),
        quiz_id,
    }))
}

/// PUT /admin/quizzes/{quiz_id}
pub async fn update_quiz(
    claims: web::ReqData<Claims>,
    path: web::Path<i64>,
    payload: web::Json<QuizUpdatePayload>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let quiz_id = path.into_inner();

    let update = payload.into_inner().validate(Utc::now())?;
    quiz::update_quiz(pool.get_ref(), quiz_id, &update).await?;

    tracing::info!(quiz_id, email = %claims.email, "Quiz updated successfully");

    Ok(HttpResponse::Ok().json(ApiResponse::new("Quiz updated successfully")))
}

/// GET /quizzes
pub async fn list_quizzes(
    claims: web::ReqData<Claims>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let quizzes: Vec<Quiz> = quiz::list_quizzes(pool.get_ref())
        .await?
        .into_iter()
        .map(|q| for_caller(q, &claims))
        .collect();

    Ok(HttpResponse::Ok().json(quizzes))
}

/// GET /quizzes/{quiz_id}
pub async fn get_quiz(
    claims: web::ReqData<Claims>,
    path: web::Path<i64>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let quiz = quiz::get_quiz(pool.get_ref(), path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(for_caller(quiz, &claims)))
}

/// POST /quizzes/submit
///
/// Body: `{"<question_id>": "<option>", ...}`
///
/// # Errors
/// - 404: any referenced question does not exist (nothing is scored)
pub async fn submit_answers(
    claims: web::ReqData<Claims>,
    submission: web::Json<Submission>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let score = quiz::score_submission(pool.get_ref(), &submission).await?;

    tracing::info!(
        email = %claims.email,
        answers = submission.len(),
        score,
        "Submission scored"
    );

    Ok(HttpResponse::Ok().json(ScoreResponse { score }))
}
