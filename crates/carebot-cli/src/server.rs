//! HTTP gateway — serves the chat endpoint and the widget page.
//!
//! Routes:
//! - `POST /chat` — one chat turn through the [`ConversationRouter`]
//! - `GET /` — landing page with the chat widget
//! - `GET /health` — liveness probe

use std::sync::Arc;

use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::json;
use tracing::{error, info};

use carebot_core::config::Config;
use carebot_core::session::InMemorySessionStore;
use carebot_providers::{ChatDispatch, ProviderDispatcher, PROVIDERS};
use carebot_router::{ChatRequest, ConversationRouter};

use crate::helpers;

const INDEX_HTML: &str = include_str!("../static/index.html");

/// Shared state handed to every handler.
pub struct AppState {
    pub router: ConversationRouter,
}

impl AppState {
    pub fn new(dispatch: Arc<dyn ChatDispatch>) -> Self {
        Self {
            router: ConversationRouter::new(Arc::new(InMemorySessionStore::new()), dispatch),
        }
    }
}

pub fn app_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(index)))
        .service(web::resource("/chat").route(web::post().to(chat)))
        .service(web::resource("/health").route(web::get().to(health_check)));
}

async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(INDEX_HTML)
}

async fn chat(state: web::Data<AppState>, request: web::Json<ChatRequest>) -> impl Responder {
    let reply = state.router.handle(request.into_inner()).await;
    HttpResponse::Ok().json(reply)
}

async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

/// Run the gateway until the server stops.
pub async fn run(config: Config) -> Result<()> {
    helpers::print_banner("Gateway");

    let dispatcher = ProviderDispatcher::new(&config.providers)?;
    for spec in PROVIDERS {
        let status = if dispatcher.is_configured(spec.name) {
            "✓".green().to_string()
        } else {
            format!("· not configured (set {})", spec.env_key).dimmed().to_string()
        };
        println!("  {:<12} {}", spec.display_name, status);
    }

    let state = web::Data::new(AppState::new(Arc::new(dispatcher)));
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    println!();
    println!("  Listening on {}", format!("http://{addr}").bold());
    println!();

    let server = HttpServer::new(move || App::new().app_data(state.clone()).configure(app_config))
        .bind(&addr)
        .with_context(|| format!("failed to bind {addr}"))?
        .run();

    info!(%addr, "gateway started");

    if let Err(e) = server.await {
        error!(error = %e, "gateway stopped with an error");
        return Err(e).context("gateway server error");
    }

    info!("gateway stopped");
    Ok(())
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test;
    use async_trait::async_trait;
    use carebot_core::types::Message;
    use carebot_providers::DispatchError;
    use carebot_router::ChatReply;
    use serde_json::json;

    /// Answers every call with a fixed text, or fails when `fail` is set.
    struct FixedDispatch {
        fail: bool,
    }

    #[async_trait]
    impl ChatDispatch for FixedDispatch {
        async fn call(
            &self,
            provider: &str,
            _prompt: &str,
            _history: &[Message],
        ) -> Result<String, DispatchError> {
            if self.fail {
                Err(DispatchError::UnknownProvider(provider.to_string()))
            } else {
                Ok(format!("answer from {provider}"))
            }
        }
    }

    fn state(fail: bool) -> web::Data<AppState> {
        web::Data::new(AppState::new(Arc::new(FixedDispatch { fail })))
    }

    #[actix_web::test]
    async fn test_health() {
        let app = test::init_service(App::new().app_data(state(false)).configure(app_config)).await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[actix_web::test]
    async fn test_index_serves_widget() {
        let app = test::init_service(App::new().app_data(state(false)).configure(app_config)).await;

        let req = test::TestRequest::get().uri("/").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let body = test::read_body(resp).await;
        let html = String::from_utf8_lossy(&body);
        assert!(html.contains("handleChatbotOption"));
    }

    #[actix_web::test]
    async fn test_chat_defaults_to_menu() {
        let app = test::init_service(App::new().app_data(state(false)).configure(app_config)).await;

        let req = test::TestRequest::post()
            .uri("/chat")
            .set_json(json!({}))
            .to_request();
        let reply: ChatReply = test::call_and_read_body_json(&app, req).await;

        assert!(reply.response.starts_with("Please select an option:"));
        assert_eq!(reply.chat_state, "initial");
        assert!(reply.symptoms.is_empty());
        assert_eq!(reply.model_used, None);
    }

    #[actix_web::test]
    async fn test_chat_doctor_turn() {
        let app = test::init_service(App::new().app_data(state(false)).configure(app_config)).await;

        let req = test::TestRequest::post()
            .uri("/chat")
            .set_json(json!({
                "user_id": "web-1",
                "message": "I feel dizzy",
                "chat_state": "doctor",
                "symptoms": null
            }))
            .to_request();
        let reply: ChatReply = test::call_and_read_body_json(&app, req).await;

        assert!(reply.response.starts_with("answer from anthropic<br>"));
        assert_eq!(reply.chat_state, "initial");
        assert_eq!(reply.model_used.as_deref(), Some("Claude 3.5 Sonnet"));
    }

    #[actix_web::test]
    async fn test_chat_failure_is_still_ok() {
        let app = test::init_service(App::new().app_data(state(true)).configure(app_config)).await;

        let req = test::TestRequest::post()
            .uri("/chat")
            .set_json(json!({ "message": "hello", "chat_state": "patient" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let reply: ChatReply = test::read_body_json(resp).await;
        assert_eq!(reply.response, carebot_router::flows::GENERIC_ERROR_MESSAGE);
        assert_eq!(reply.chat_state, "initial");
        assert_eq!(reply.model_used, None);
    }

    #[actix_web::test]
    async fn test_chat_rejects_non_json() {
        let app = test::init_service(App::new().app_data(state(false)).configure(app_config)).await;

        let req = test::TestRequest::post()
            .uri("/chat")
            .insert_header(("content-type", "application/json"))
            .set_payload("not json")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_client_error());
    }
}
