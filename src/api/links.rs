//! Link endpoints: `POST /api/links` and `GET /api/links/{id}/insights`.
//!
//! The creation body carries the destination and an optional custom alias;
//! the response includes whatever enrichment survived, possibly just the
//! defaults (enrichment failures never fail creation).

use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use tracing::error;

use super::ErrorBody;
use crate::ai::Insight;
use crate::config::ServerConfig;
use crate::errors::LinkforgeError;
use crate::services::{CreateLinkRequest, LinkService};
use crate::storage::Link;

pub fn links_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/links", web::post().to(LinksApi::create_link))
            .route(
                "/links/{id}/insights",
                web::get().to(LinksApi::link_insights),
            ),
    );
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkBody {
    pub original_url: String,
    #[serde(default)]
    pub custom_alias: Option<String>,
    #[serde(default)]
    pub owner_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkPayload {
    pub id: String,
    pub original_url: String,
    pub code: String,
    pub short_url: String,
    pub custom_alias: Option<String>,
    pub suggested_aliases: Vec<String>,
    pub category: String,
    pub tags: Vec<String>,
    pub click_count: u64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize)]
pub struct CreateLinkResponse {
    pub success: bool,
    pub link: LinkPayload,
}

#[derive(Debug, Serialize)]
pub struct InsightsResponse {
    pub success: bool,
    pub insights: Vec<Insight>,
}

impl LinkPayload {
    fn from_link(link: Link, base_url: &str) -> Self {
        let short_url = format!("{}/{}", base_url.trim_end_matches('/'), link.code);
        Self {
            id: link.id,
            original_url: link.original_url,
            code: link.code,
            short_url,
            custom_alias: link.custom_alias,
            suggested_aliases: link.suggested_aliases,
            category: link.category,
            tags: link.tags,
            click_count: link.click_count,
            created_at: link.created_at,
        }
    }
}

pub struct LinksApi {}

impl LinksApi {
    pub async fn create_link(
        body: web::Json<CreateLinkBody>,
        service: web::Data<Arc<LinkService>>,
        server: web::Data<ServerConfig>,
    ) -> impl Responder {
        let body = body.into_inner();

        let request = CreateLinkRequest {
            original_url: body.original_url,
            custom_alias: body.custom_alias,
            owner_id: body.owner_id.unwrap_or_else(|| "anonymous".to_string()),
        };

        match service.create_link(request).await {
            Ok(link) => HttpResponse::Created().json(CreateLinkResponse {
                success: true,
                link: LinkPayload::from_link(link, &server.base_url),
            }),
            Err(e) => Self::error_response(e),
        }
    }

    pub async fn link_insights(
        path: web::Path<String>,
        service: web::Data<Arc<LinkService>>,
    ) -> impl Responder {
        match service.link_insights(&path.into_inner()).await {
            Ok(insights) => HttpResponse::Ok().json(InsightsResponse {
                success: true,
                insights,
            }),
            Err(e) => Self::error_response(e),
        }
    }

    fn error_response(err: LinkforgeError) -> HttpResponse {
        match &err {
            LinkforgeError::Validation(msg) => {
                HttpResponse::BadRequest().json(ErrorBody::new(msg.clone()))
            }
            LinkforgeError::AliasTaken(_) => {
                HttpResponse::Conflict().json(ErrorBody::new("Custom alias already taken"))
            }
            LinkforgeError::NotFound(_) => {
                HttpResponse::NotFound().json(ErrorBody::new("Link not found"))
            }
            LinkforgeError::AllocationExhausted(_) => {
                error!("[{}] {}", err.code(), err);
                HttpResponse::InternalServerError()
                    .json(ErrorBody::new("Could not allocate a short code"))
            }
            _ => {
                error!("[{}] Link operation failed: {}", err.code(), err);
                HttpResponse::InternalServerError().json(ErrorBody::new("Failed to process link"))
            }
        }
    }
}
