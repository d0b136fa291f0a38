use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Json, Router,
};
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    error::ApiError,
    session::{Authenticated, Session, SessionSigner},
    state::AppState,
};

const DASHBOARD_USER: &str = "AI Bot User";
const INVALID_PIN: &str = "Invalid PIN. Please try again.";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/login", get(login_form).post(submit_login))
        .route("/logout", get(logout))
        .route("/dashboard", get(dashboard))
        .route("/api/data", get(api_data))
        .route("/static/app.js", get(app_js))
        .route("/static/styles.css", get(styles_css))
        .fallback(not_found)
        .with_state(state)
}

/// Marks every response as non-cacheable.
pub async fn no_cache_headers(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-cache, no-store, must-revalidate"),
    );
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
    response
}

async fn home(session: Session) -> Redirect {
    if session.is_authenticated() {
        Redirect::to("/dashboard")
    } else {
        Redirect::to("/login")
    }
}

async fn login_form() -> Html<String> {
    Html(ui::render_login(None))
}

#[derive(Debug, Deserialize)]
struct LoginForm {
    #[serde(default)]
    pin_code: String,
}

async fn submit_login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    if state.gate().authenticate(&form.pin_code) {
        tracing::info!("pin accepted, session issued");
        return (
            [(header::SET_COOKIE, state.sessions().login_cookie())],
            Redirect::to("/dashboard"),
        )
            .into_response();
    }

    tracing::warn!("pin rejected");
    Html(ui::render_login(Some(INVALID_PIN))).into_response()
}

async fn logout() -> impl IntoResponse {
    (
        [(header::SET_COOKIE, SessionSigner::logout_cookie())],
        Redirect::to("/login"),
    )
}

async fn dashboard(State(state): State<AppState>, session: Session) -> Result<Response, ApiError> {
    if !session.is_authenticated() {
        return Ok(Redirect::to("/login").into_response());
    }

    let snapshot = state.snapshot().await?;
    let json = serde_json::to_string(&snapshot)?;

    let page = ui::render_dashboard(DASHBOARD_USER, &json);
    Ok(Html(page).into_response())
}

async fn api_data(
    _: Authenticated,
    State(state): State<AppState>,
) -> Result<Json<runtime::Snapshot>, ApiError> {
    let snapshot = state.poll_snapshot(OffsetDateTime::now_utc()).await?;
    Ok(Json(snapshot))
}

async fn app_js() -> impl IntoResponse {
    (
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        ui::app_js(),
    )
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not Found")
}

async fn styles_css() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], ui::styles_css())
}
