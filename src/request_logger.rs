use rocket::fairing::{Fairing, Info, Kind};
use rocket::{Data, Request, Response};
use std::time::Instant;

/// Start time stashed in request-local state.
struct RequestStart(Instant);

/// Fairing logging one line per request: method, path, status, and latency.
/// Server errors are logged at `warn` so failed refreshes stand out.
pub struct RequestLogger;

#[rocket::async_trait]
impl Fairing for RequestLogger {
    fn info(&self) -> Info {
        Info {
            name: "Request Logger",
            kind: Kind::Request | Kind::Response,
        }
    }

    async fn on_request(&self, request: &mut Request<'_>, _: &mut Data<'_>) {
        request.local_cache(|| RequestStart(Instant::now()));
    }

    async fn on_response<'r>(&self, request: &'r Request<'_>, response: &mut Response<'r>) {
        let started = request.local_cache(|| RequestStart(Instant::now()));
        let elapsed_ms = started.0.elapsed().as_secs_f64() * 1000.0;
        let status = response.status();
        let level = if status.code >= 500 {
            log::Level::Warn
        } else {
            log::Level::Info
        };

        log::log!(
            level,
            "{} {} -> {} ({:.2}ms)",
            request.method(),
            request.uri().path(),
            status.code,
            elapsed_ms
        );
    }
}
