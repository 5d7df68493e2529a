//! Shared harness for database-backed integration tests: every test gets a
//! fresh Postgres database with migrations applied and its own server.

#![allow(dead_code)]

use qwizza::configuration::{get_configuration, DatabaseSettings};
use qwizza::startup::run;
use serde_json::{json, Value};
use sqlx::{Connection, Executor, PgConnection, PgPool};
use std::net::TcpListener;

pub struct TestApp {
    pub address: String,
    pub db_pool: PgPool,
    pub client: reqwest::Client,
}

pub async fn spawn_app() -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let mut configuration = get_configuration().expect("Failed to read configuration.");
    configuration.database.database_name = uuid::Uuid::new_v4().to_string();
    let connection_pool = configure_database(&configuration.database).await;

    let server = run(listener, connection_pool.clone(), configuration.jwt.clone())
        .expect("Failed to bind address");
    let _ = tokio::spawn(server);

    TestApp {
        address,
        db_pool: connection_pool,
        client: reqwest::Client::new(),
    }
}

pub async fn configure_database(config: &DatabaseSettings) -> PgPool {
    let mut connection = PgConnection::connect(&config.connection_string_without_db())
        .await
        .expect("Failed to connect to Postgres");
    connection
        .execute(&*format!(r#"CREATE DATABASE "{}";"#, config.database_name))
        .await
        .expect("Failed to create database.");

    let connection_pool = PgPool::connect(&config.connection_string())
        .await
        .expect("Failed to connect to Postgres.");
    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database.");
    connection_pool
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(&self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn signup(&self, path: &str, username: &str, email: &str) -> reqwest::Response {
        self.post_json(
            path,
            &json!({
                "username": username,
                "email": email,
                "password": "SecurePass123",
                "phone": "+1 555 0100"
            }),
        )
        .await
    }

    /// Signs up and logs in, returning the bearer token.
    pub async fn token_for(&self, signup_path: &str, username: &str, email: &str) -> String {
        let response = self.signup(signup_path, username, email).await;
        assert_eq!(201, response.status().as_u16());

        let response = self
            .post_json("/login", &json!({"email": email, "password": "SecurePass123"}))
            .await;
        assert_eq!(200, response.status().as_u16());

        let body: Value = response.json().await.expect("Failed to parse response");
        body["token"].as_str().expect("No token in response").to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.token_for("/admin/signup", "quizmaster", "admin@example.com").await
    }

    pub async fn student_token(&self) -> String {
        self.token_for("/signup", "learner", "student@example.com").await
    }

    pub async fn create_quiz(&self, token: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(&self.url("/admin/quizzes"))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn list_quizzes(&self, token: &str) -> Vec<Value> {
        let response = self
            .client
            .get(&self.url("/quizzes"))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request.");
        assert_eq!(200, response.status().as_u16());
        response.json().await.expect("Failed to parse response")
    }

    pub async fn submit(&self, token: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(&self.url("/quizzes/submit"))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }
}
