use rocket::http::{ContentType, Status};
use rocket::response::{self, Responder};
use rocket::{Request, Response};
use std::io::Cursor;

/// Request-level failures. Bodies are plain text.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    MethodNotAllowed,
    /// The remote suppression directory failed.
    Upstream(String),
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => {
                log::debug!("bad request: {}", msg);
                (Status::BadRequest, msg)
            }
            ApiError::MethodNotAllowed => (Status::MethodNotAllowed, "POST required".to_string()),
            ApiError::Upstream(msg) => {
                log::error!("suppression directory error: {}", msg);
                (Status::InternalServerError, msg)
            }
        };

        Response::build()
            .status(status)
            .header(ContentType::Plain)
            .sized_body(message.len(), Cursor::new(message))
            .ok()
    }
}

impl From<crate::suppression::DirectoryError> for ApiError {
    fn from(err: crate::suppression::DirectoryError) -> Self {
        ApiError::Upstream(err.to_string())
    }
}
