use axum::{
    Router,
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use std::{net::SocketAddr, sync::Arc};

use crate::{AuthSettings, ServerError, auth, budgets, categories, dashboard, transactions};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub auth: AuthSettings,
}

async fn require_session(
    auth_header: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let Some(TypedHeader(authorization)) = auth_header else {
        tracing::warn!(path = %request.uri().path(), "missing bearer token");
        return Err(ServerError::Unauthorized("missing token".to_string()));
    };

    let claims = auth::validate_token(authorization.token(), auth::now())?;
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route(
            "/expenses",
            get(transactions::list_expenses).post(transactions::create_expense),
        )
        .route(
            "/expenses/{id}",
            get(transactions::get_expense)
                .put(transactions::update_expense)
                .delete(transactions::delete_expense),
        )
        .route(
            "/incomes",
            get(transactions::list_incomes).post(transactions::create_income),
        )
        .route(
            "/incomes/{id}",
            get(transactions::get_income)
                .put(transactions::update_income)
                .delete(transactions::delete_income),
        )
        .route("/budgets", get(budgets::list).post(budgets::create))
        .route(
            "/budgets/{id}",
            put(budgets::update).delete(budgets::delete),
        )
        .route("/categories", get(categories::list).post(categories::create))
        .route(
            "/categories/{id}",
            put(categories::update).delete(categories::delete),
        )
        .route("/dashboard", get(dashboard::get))
        .route_layer(middleware::from_fn(require_session))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .with_state(state)
}

/// Build the full application router around `engine`.
pub fn app(engine: Engine, auth: AuthSettings) -> Router {
    router(ServerState {
        engine: Arc::new(engine),
        auth,
    })
}

pub async fn run(engine: Engine, auth: AuthSettings, addr: SocketAddr) {
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener on {addr}: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, auth, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    auth: AuthSettings,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(engine, auth)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    auth: AuthSettings,
    listener: tokio::net::TcpListener,
) -> Result<SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, auth, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
