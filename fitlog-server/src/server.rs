use anyhow::{Context, Result};
use axum::{Router, routing::get};
use log::{error, info};
use tokio::net::TcpListener;
use tokio::signal;

use fitlog::Tracker;
use fitlog::config::Config;

use crate::routes;

pub fn create_router(tracker: Tracker) -> Router {
    Router::new()
        .route("/health", get(routes::health_check))
        .route(
            "/workouts/",
            get(routes::list_workouts).post(routes::create_workout),
        )
        .route(
            "/workouts/{id}",
            get(routes::get_workout)
                .put(routes::update_workout)
                .delete(routes::delete_workout),
        )
        .route(
            "/exercises/",
            get(routes::list_exercises).post(routes::create_exercise),
        )
        .route(
            "/exercises/{id}",
            get(routes::get_exercise)
                .put(routes::update_exercise)
                .delete(routes::delete_exercise),
        )
        .route(
            "/progress/",
            get(routes::list_progress).post(routes::create_progress),
        )
        .route(
            "/progress/{id}",
            get(routes::get_progress)
                .put(routes::update_progress)
                .delete(routes::delete_progress),
        )
        .route(
            "/workout-exercises/",
            get(routes::list_workout_exercises).post(routes::create_workout_exercise),
        )
        .route(
            "/workout-exercises/{id}",
            get(routes::get_exercises_for_workout)
                .put(routes::update_workout_exercise)
                .delete(routes::delete_workout_exercise),
        )
        .route("/stats/workouts", get(routes::workout_stats))
        .route("/stats/progress", get(routes::progress_stats))
        .with_state(tracker)
}

pub async fn run_server(config: Config) -> Result<()> {
    info!("Opening database at {}", config.database_url);
    let tracker = Tracker::new(&config.database_url).await?;
    let app = create_router(tracker.clone());

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracker.close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
