//! Redirect endpoint: `GET /{code}`.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use tracing::{debug, error};

use super::ErrorBody;
use crate::analytics::VisitFingerprint;
use crate::errors::LinkforgeError;
use crate::services::RedirectResolver;
use crate::utils::ip::extract_client_ip;
use crate::utils::is_valid_code;

pub fn redirect_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/{code}", web::get().to(RedirectApi::handle_redirect));
}

pub struct RedirectApi {}

impl RedirectApi {
    pub async fn handle_redirect(
        req: HttpRequest,
        path: web::Path<String>,
        resolver: web::Data<Arc<RedirectResolver>>,
    ) -> impl Responder {
        let code = path.into_inner();

        // Codes that cannot exist skip the store entirely.
        if !is_valid_code(&code) {
            debug!("Invalid short code rejected: {}", code);
            return Self::not_found_response();
        }

        let fingerprint = Self::fingerprint_from(&req);

        match resolver.resolve(&code, fingerprint).await {
            Ok(destination) => HttpResponse::build(StatusCode::FOUND)
                .insert_header(("Location", destination))
                .finish(),
            Err(LinkforgeError::NotFound(_)) => Self::not_found_response(),
            Err(e) => {
                error!("Redirect failed for '{}': {}", code, e);
                HttpResponse::InternalServerError()
                    .json(ErrorBody::new("Server error during redirect"))
            }
        }
    }

    /// Capture only raw strings here; all derivation happens off the hot
    /// path in the enricher.
    fn fingerprint_from(req: &HttpRequest) -> VisitFingerprint {
        let mut fingerprint = VisitFingerprint::new(String::new());
        fingerprint.source_ip = extract_client_ip(req);
        fingerprint.user_agent = req
            .headers()
            .get("user-agent")
            .and_then(|h| h.to_str().ok())
            .map(String::from);
        fingerprint.referrer = req
            .headers()
            .get("referer")
            .and_then(|h| h.to_str().ok())
            .map(String::from);
        fingerprint
    }

    #[inline]
    fn not_found_response() -> HttpResponse {
        HttpResponse::NotFound().json(ErrorBody::new("Link not found or inactive"))
    }
}
