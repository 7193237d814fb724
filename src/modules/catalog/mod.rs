//! Catalog browsing: landing page, prefix search and book details.

pub mod models;
pub mod negotiate;
pub mod pagination;
pub mod routes;
pub mod views;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{routing::get, Router};
use booklist_db::BookStore;
use booklist_kernel::{InitCtx, Module};
use utoipa::OpenApi;

use routes::CatalogState;

#[derive(OpenApi)]
#[openapi(
    paths(routes::search, routes::show_book),
    components(schemas(models::BookJson, models::SearchJson, models::TitleJson))
)]
struct CatalogApi;

pub struct CatalogModule {
    store: Arc<dyn BookStore>,
}

impl CatalogModule {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for CatalogModule {
    fn name(&self) -> &'static str {
        "catalog"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            page_size = pagination::PAGE_SIZE,
            "catalog module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(routes::landing))
            .route("/search", get(routes::search))
            .route("/show/{id}", get(routes::show_book))
            .with_state(CatalogState {
                store: self.store.clone(),
            })
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        match serde_json::to_value(CatalogApi::openapi()) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(module = self.name(), error = %e, "failed to serialize OpenAPI fragment");
                None
            }
        }
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "catalog module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            leased = self.store.leased(),
            "catalog module stopped"
        );
        Ok(())
    }
}
