//! Routing, authentication and dispatch to the CLI

use super::params::QueryParams;
use super::response::{ApiError, ApiResponse};
use crate::invoker::{AccountCommand, CommandRunner};
use crate::parse::parse_output;
use crate::settings::SettingsProvider;
use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

const DEFAULT_DAYS: &str = "30";
const DEFAULT_TRIAL_MINUTES: &str = "30";

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}

struct AppState<S, R> {
    settings: S,
    runner: R,
}

type SharedState<S, R> = Arc<AppState<S, R>>;

impl<S: SettingsProvider, R: CommandRunner> AppState<S, R> {
    /// Run a command whose success is judged by the parsed username
    async fn run_account(
        &self,
        command: AccountCommand,
        failure: &str,
    ) -> Result<ApiResponse, ApiError> {
        let raw = self.invoke(&command).await?;
        let account = parse_output(&raw, || self.settings.domain());

        if account.is_success() {
            info!("{} succeeded for {}", command.subcommand(), command.user());
            Ok(ApiResponse::Account(account))
        } else {
            warn!("{} failed for {}", command.subcommand(), command.user());
            Err(ApiError::CommandFailed {
                message: failure.to_string(),
                raw,
            })
        }
    }

    async fn invoke(&self, command: &AccountCommand) -> Result<String, ApiError> {
        self.runner
            .run(command.args())
            .await
            .map_err(|e| ApiError::Fault(e.to_string()))
    }
}

/// Build the API router around a settings source and a CLI runner
pub fn router<S: SettingsProvider, R: CommandRunner>(settings: S, runner: R) -> Router {
    let state: SharedState<S, R> = Arc::new(AppState { settings, runner });

    Router::new()
        .route("/add", get(add_user::<S, R>))
        .route("/trial", get(trial_user::<S, R>))
        .route("/renew", get(renew_user::<S, R>))
        .route("/del", get(delete_user::<S, R>))
        .fallback(invalid_endpoint)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_auth::<S, R>,
        ))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Listen on `addr` until Ctrl+C
pub async fn serve<S: SettingsProvider, R: CommandRunner>(
    addr: SocketAddr,
    settings: S,
    runner: R,
) -> Result<(), ServeError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServeError::Bind { addr, source })?;
    info!("ZIVPN API serving at {}", addr);

    axum::serve(listener, router(settings, runner))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down"),
        Err(e) => warn!("Failed to listen for Ctrl+C: {}", e),
    }
}

/// Reject requests whose `auth` parameter does not match the current key
async fn require_auth<S: SettingsProvider, R: CommandRunner>(
    State(state): State<SharedState<S, R>>,
    params: QueryParams,
    request: Request,
    next: Next,
) -> Response {
    // The key is re-read every time so edits apply without a restart
    let authorized = match (state.settings.auth_key(), params.get("auth")) {
        (Some(expected), Some(provided)) => provided == expected,
        (Some(expected), None) => expected.is_empty(),
        (None, _) => false,
    };

    if !authorized {
        warn!("Unauthorized request to {}", request.uri().path());
        return ApiError::Unauthorized.into_response();
    }

    next.run(request).await
}

async fn add_user<S: SettingsProvider, R: CommandRunner>(
    State(state): State<SharedState<S, R>>,
    params: QueryParams,
) -> Result<ApiResponse, ApiError> {
    let user = params.require("user")?;
    let command = AccountCommand::Add {
        user: user.to_string(),
        password: params.get_or("password", user).to_string(),
        days: params.get_or("days", DEFAULT_DAYS).to_string(),
    };
    state.run_account(command, "Failed to create user").await
}

async fn trial_user<S: SettingsProvider, R: CommandRunner>(
    State(state): State<SharedState<S, R>>,
    params: QueryParams,
) -> Result<ApiResponse, ApiError> {
    let command = AccountCommand::Trial {
        user: params.require("user")?.to_string(),
        minutes: params.get_or("mins", DEFAULT_TRIAL_MINUTES).to_string(),
    };
    state.run_account(command, "Failed to create trial").await
}

async fn renew_user<S: SettingsProvider, R: CommandRunner>(
    State(state): State<SharedState<S, R>>,
    params: QueryParams,
) -> Result<ApiResponse, ApiError> {
    let command = AccountCommand::Renew {
        user: params.require("user")?.to_string(),
        days: params.get_or("days", DEFAULT_DAYS).to_string(),
    };
    state.run_account(command, "Failed to renew").await
}

/// Deletion prints no account block, so success is read off the raw text
async fn delete_user<S: SettingsProvider, R: CommandRunner>(
    State(state): State<SharedState<S, R>>,
    params: QueryParams,
) -> Result<ApiResponse, ApiError> {
    let user = params.require("user")?.to_string();
    let raw = state.invoke(&AccountCommand::Delete { user: user.clone() }).await?;

    if raw.contains("deleted") || raw.contains("not found") {
        info!("del_api processed {}", user);
        Ok(ApiResponse::Done(format!("User {} processed", user)))
    } else {
        warn!("del_api failed for {}", user);
        Err(ApiError::CommandFailed {
            message: "Failed to delete user".to_string(),
            raw,
        })
    }
}

async fn invalid_endpoint() -> ApiError {
    ApiError::InvalidEndpoint
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Internal error".to_string()
    };
    debug!("Handler panicked: {}", message);
    ApiError::Fault(message).into_response()
}
