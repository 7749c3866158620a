//! # 管理服务器
//!
//! Axum HTTP服务器，提供评测数据的 REST API

use crate::app::AppContext;
use crate::config::{AppConfig, ServerConfig};
use crate::error::{EvalError, Result};
use crate::management::{handlers, response, routes};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::response::Response;
use axum::routing::get;
use std::net::SocketAddr;
use std::ops::Deref;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// 管理服务器应用状态
#[derive(Clone)]
pub struct AppState {
    context: Arc<AppContext>,
}

impl AppState {
    #[must_use]
    pub const fn new(context: Arc<AppContext>) -> Self {
        Self { context }
    }

    #[must_use]
    pub const fn context_arc(&self) -> &Arc<AppContext> {
        &self.context
    }
}

impl Deref for AppState {
    type Target = AppContext;

    fn deref(&self) -> &Self::Target {
        &self.context
    }
}

/// 管理服务器
pub struct ManagementServer {
    /// 配置
    config: ServerConfig,
    /// 路由器
    router: Router,
}

impl ManagementServer {
    /// 创建新的管理服务器
    #[must_use]
    pub fn new(context: Arc<AppContext>) -> Self {
        let config = context.config.server.clone();
        let router = create_router(AppState::new(context));
        Self { config, router }
    }

    /// 启动服务器
    pub async fn serve(self) -> Result<()> {
        let addr = self.bind_address()?;
        info!("Starting EvalMatrix server on {addr}");

        let listener = TcpListener::bind(&addr).await.map_err(|e| {
            EvalError::server_start_with_source(format!("无法绑定地址 {addr}"), e)
        })?;

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| EvalError::server_start_with_source("HTTP服务异常退出", e))?;

        info!("服务器已停止");
        Ok(())
    }

    /// 获取绑定地址
    pub fn bind_address(&self) -> Result<SocketAddr> {
        let ip = self
            .config
            .bind_address
            .parse::<std::net::IpAddr>()
            .map_err(|e| {
                EvalError::config_with_source(
                    format!("无效的监听地址: {}", self.config.bind_address),
                    e,
                )
            })?;
        Ok(SocketAddr::new(ip, self.config.port))
    }
}

/// 创建完整路由器（API前缀、健康检查、CORS、请求追踪）
pub fn create_router(state: AppState) -> Router {
    let config: &AppConfig = &state.config;
    let server = &config.server;

    let mut app = Router::new()
        .nest(&server.api_prefix, routes::create_routes())
        .route("/health", get(handlers::system::health_check))
        .route("/", get(handlers::system::root_handler))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(server.max_upload_size));

    let service_builder = ServiceBuilder::new().layer(TraceLayer::new_for_http());

    if server.enable_cors {
        app = app.layer(service_builder.layer(cors_layer(&server.cors_origins)));
    } else {
        app = app.layer(service_builder);
    }

    app.with_state(state)
}

/// 配置CORS；`*` 允许任意源
fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors_layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::ORIGIN]);

    if origins.iter().any(|origin| origin == "*") {
        return cors_layer.allow_origin(Any);
    }

    let parsed = origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<std::result::Result<Vec<_>, _>>();

    match parsed {
        Ok(origins) => cors_layer.allow_origin(origins).allow_credentials(true),
        Err(e) => {
            warn!("Invalid CORS origin configuration: {e}, falling back to allow any");
            cors_layer.allow_origin(Any)
        }
    }
}

async fn not_found() -> Response {
    response::error(StatusCode::NOT_FOUND, "RESOURCE_NOT_FOUND", "路由不存在")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("无法监听退出信号: {}", e);
        std::future::pending::<()>().await;
    }
    info!("收到退出信号，正在关闭服务器");
}
