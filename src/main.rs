use sqlx::postgres::PgPoolOptions;
use std::net::TcpListener;
use qwizza::configuration::get_configuration;
use qwizza::startup::run;
use qwizza::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_telemetry();

    tracing::info!("Starting application");

    // Missing signing key or database settings abort startup
    let configuration = match get_configuration() {
        Ok(config) => {
            tracing::info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            tracing::error!("Failed to read configuration: {}", e);
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Configuration error",
            ));
        }
    };

    let connection_string = configuration.database.connection_string();
    tracing::info!(
        host = %configuration.database.host,
        database = %configuration.database.database_name,
        "Attempting to connect to database"
    );

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&connection_string)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create connection pool: {}", e);
            std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "Database connection error",
            )
        })?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to run migrations: {}", e);
            std::io::Error::new(std::io::ErrorKind::Other, "Migration error")
        })?;

    tracing::info!("Database connection pool created and migrated");

    let address = format!("127.0.0.1:{}", configuration.application.port);
    let listener = TcpListener::bind(&address)?;
    tracing::info!("Server listening on: {}", address);

    let server = run(listener, pool.clone(), configuration.jwt.clone())?;
    let result = server.await;

    pool.close().await;
    tracing::info!("Server stopped, database pool closed");

    result
}
