//! HTTP surface.
//!
//! Two endpoints: link creation under `/api/links` and the catch-all
//! redirect route. Registration order matters: the API scope must be
//! mounted before the `/{code}` catch-all.

pub mod links;
pub mod redirect;

pub use links::links_routes;
pub use redirect::redirect_routes;

use serde::Serialize;

/// Error body shared by both endpoints.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
