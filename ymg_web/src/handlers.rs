use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use snafu::{ResultExt, Snafu};
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;
use tracing::instrument;
use ymg_mecab::Mecab;

use crate::reading::assemble_reading;

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(context(suffix(Error)))]
pub enum Error {
    #[snafu(display("dictionary lookup failed"))]
    Dict { source: ymg_dict::Error },
    #[snafu(display("analyzer failed"))]
    Analyze { source: ymg_mecab::Error },
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::error!("request failed: {self}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}

#[derive(Clone)]
pub struct ServerState {
    pub pool: SqlitePool,
    pub mecab: Mecab,
}

#[derive(Debug, Serialize)]
pub struct ReadingResponse {
    pub text: String,
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/:text", get(handle_reading))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Word-level resolution first, then one analyzer pass over whatever is
/// left so kanji and unknown scripts still get a reading.
#[instrument(skip(state))]
async fn handle_reading(
    State(state): State<ServerState>,
    Path(text): Path<String>,
) -> Result<Json<ReadingResponse>> {
    let assembled = assemble_reading(&state.pool, &text)
        .await
        .context(DictError)?;
    let text = state
        .mecab
        .reading(&assembled)
        .await
        .context(AnalyzeError)?;
    Ok(Json(ReadingResponse { text }))
}
