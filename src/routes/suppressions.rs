//! Suppression list endpoints: list, refresh, and remove.

use crate::error::ApiError;
use crate::suppression::{SuppressionCache, parse_addresses};
use rocket::data::Data;
use rocket::http::Method;
use rocket::route::{self, Handler, Route};
use rocket::serde::json::{self, Json};
use rocket::{Request, State, get, post};
use serde::{Deserialize, Serialize};

/// Request body for removing addresses from the suppression list.
#[derive(Debug, Deserialize)]
pub struct RemoveRequest {
    /// Newline-separated addresses; blank lines are ignored.
    #[serde(default)]
    pub emails: String,
}

/// One result line per non-blank input address.
#[derive(Debug, Serialize, Deserialize)]
pub struct RemoveResponse {
    pub results: Vec<String>,
}

/// Current cached suppression list, sorted case-insensitively.
#[get("/list")]
pub fn list(cache: &State<SuppressionCache>) -> Json<Vec<String>> {
    Json(cache.snapshot())
}

/// Re-fetch the full list from the provider, then return it.
#[post("/update")]
pub async fn update(cache: &State<SuppressionCache>) -> Result<Json<Vec<String>>, ApiError> {
    cache.refresh().await?;
    Ok(Json(cache.snapshot()))
}

/// Remove each requested address remotely and from the cache.
#[post("/remove", data = "<request>")]
pub async fn remove(
    request: Result<Json<RemoveRequest>, json::Error<'_>>,
    cache: &State<SuppressionCache>,
) -> Result<Json<RemoveResponse>, ApiError> {
    let request = request.map_err(|err| {
        log::debug!("rejecting remove request: {}", err);
        ApiError::BadRequest("invalid json".to_string())
    })?;

    let inputs = parse_addresses(&request.emails);
    let outcomes = cache.remove_all(&inputs).await;
    let removed = outcomes.iter().filter(|outcome| outcome.is_removed()).count();
    log::info!(
        "remove request: {} address(es), {} removed",
        inputs.len(),
        removed
    );

    Ok(Json(RemoveResponse {
        results: outcomes.iter().map(ToString::to_string).collect(),
    }))
}

/// Answers 405 for any method routed to it.
#[derive(Clone)]
pub struct PostOnly;

#[rocket::async_trait]
impl Handler for PostOnly {
    async fn handle<'r>(&self, request: &'r Request<'_>, _: Data<'r>) -> route::Outcome<'r> {
        route::Outcome::from(request, ApiError::MethodNotAllowed)
    }
}

/// Routes rejecting non-POST methods on the given paths.
pub fn post_only_routes(paths: &[&str]) -> Vec<Route> {
    let methods = [
        Method::Get,
        Method::Put,
        Method::Delete,
        Method::Patch,
        Method::Options,
    ];
    paths
        .iter()
        .flat_map(|path| {
            methods
                .iter()
                .map(move |method| Route::new(*method, path, PostOnly))
        })
        .collect()
}
