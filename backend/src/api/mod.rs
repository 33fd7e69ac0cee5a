pub mod channel;
pub mod playlist;
pub mod search;
pub mod video;

pub use channel::*;
pub use playlist::*;
pub use search::*;
pub use video::*;

use crate::error::FetchError;
use crate::models::{CacheStats, ErrorResponse};
use crate::services::coordinator::{Request, Response};
use crate::AppState;
use log::{error, warn};
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{get, post, State};

impl From<FetchError> for ErrorResponse {
    fn from(e: FetchError) -> Self {
        let status = match e {
            FetchError::NotFound { .. } => Status::NotFound,
            FetchError::Timeout(_) => Status::GatewayTimeout,
            FetchError::MalformedResponse(_) | FetchError::Network(_) => Status::BadGateway,
            FetchError::Aborted(_) => Status::InternalServerError,
        };

        ErrorResponse {
            status,
            error: e.kind().to_string(),
            message: e.to_string(),
        }
    }
}

/// Logs the failure and turns it into a JSON error body.
pub(crate) fn failure(context: &str, e: FetchError) -> ErrorResponse {
    match e {
        FetchError::NotFound { .. } => warn!("{context}: {e}"),
        _ => error!("{context}: {e}"),
    }
    e.into()
}

pub(crate) fn bad_request(message: &str) -> ErrorResponse {
    ErrorResponse {
        status: Status::BadRequest,
        error: "bad_request".to_string(),
        message: message.to_string(),
    }
}

#[get("/cache")]
pub async fn cache_stats(state: &State<AppState>) -> Json<CacheStats> {
    Json(state.coordinator.cache_stats())
}

/// Single entry point taking any coordinator request as tagged JSON.
#[post("/requests", data = "<request>")]
pub async fn dispatch_request(
    request: Json<Request>,
    state: &State<AppState>,
) -> Result<Json<Response>, ErrorResponse> {
    let request = request.into_inner();
    let context = format!("Request {request:?} failed");
    state
        .coordinator
        .dispatch(request)
        .await
        .map(Json)
        .map_err(|e| failure(&context, e))
}
