//! HTTP route handlers: page, decode form, health.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::{Form, Json};
use serde::Deserialize;

use reverseai_core::{Category, Submission};

use super::page::{render_page, Outcome, PageView, EMPTY_POST_MESSAGE};
use super::state::AppState;
use super::MAX_POST_SIZE;

/// Which form button was pressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum FormAction {
    #[default]
    Decode,
    Clear,
}

/// Body of `POST /decode`.
#[derive(Debug, Deserialize)]
pub(crate) struct DecodeForm {
    #[serde(default)]
    pub(crate) category: Option<String>,
    #[serde(default)]
    pub(crate) text: String,
    #[serde(default)]
    pub(crate) action: FormAction,
}

/// Fallback handler for unmatched routes.
pub(crate) async fn handle_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Html(r#"<h1>404</h1><p><a href="/">Back to ReverseAI</a></p>"#),
    )
}

/// GET /health
pub(crate) async fn handle_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let response = serde_json::json!({
        "status": "ok",
        "version": reverseai_core::VERSION,
        "model": state.config.model,
        "client_initialized": state.dispatcher_initialized(),
    });
    (StatusCode::OK, Json(response))
}

/// GET /
pub(crate) async fn handle_index() -> Html<String> {
    Html(render_page(&PageView::default()))
}

/// POST /decode
///
/// `action=clear` re-renders the form with its contents and no result.
/// `action=decode` validates, dispatches once, and renders the result.
pub(crate) async fn handle_decode(
    State(state): State<Arc<AppState>>,
    Form(form): Form<DecodeForm>,
) -> Response {
    let category = match form.category.as_deref() {
        None | Some("") => Category::default(),
        Some(label) => match label.parse::<Category>() {
            Ok(c) => c,
            Err(e) => {
                tracing::debug!(error = %e, "rejected form");
                let message = e.to_string();
                let view = PageView {
                    text: &form.text,
                    outcome: Outcome::Invalid(&message),
                    ..Default::default()
                };
                return (StatusCode::BAD_REQUEST, Html(render_page(&view))).into_response();
            }
        },
    };

    if form.action == FormAction::Clear {
        let view = PageView {
            category,
            text: &form.text,
            outcome: Outcome::Idle,
        };
        return Html(render_page(&view)).into_response();
    }

    if form.text.len() > MAX_POST_SIZE {
        let view = PageView {
            category,
            text: &form.text,
            outcome: Outcome::Invalid("That post is too long to decode. Trim it and try again."),
        };
        return (StatusCode::PAYLOAD_TOO_LARGE, Html(render_page(&view))).into_response();
    }

    let submission = match Submission::new(form.text.as_str(), category) {
        Ok(s) => s,
        Err(_) => {
            let view = PageView {
                category,
                text: &form.text,
                outcome: Outcome::Invalid(EMPTY_POST_MESSAGE),
            };
            return Html(render_page(&view)).into_response();
        }
    };

    let reply = state.dispatcher().dispatch(&submission).await;

    let view = PageView {
        category,
        text: &form.text,
        outcome: Outcome::Result(&reply),
    };
    Html(render_page(&view)).into_response()
}
