use actix_web::{error, http::StatusCode, HttpResponse, HttpResponseBuilder};
use derive_more::{Display, Error};

/// Error returned by the credential extractors when a handler asks for a
/// credential the gate did not attach to the request.
#[derive(Debug, Display, Error)]
pub enum AuthError {
    #[display("unauthorized")]
    Unauthorized,
    #[display("forbidden")]
    Forbidden,
}

impl error::ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match *self {
            AuthError::Unauthorized => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponseBuilder::new(self.status_code()).body(self.to_string())
    }
}
