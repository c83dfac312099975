//! Static preview server for the landing page.
//!
//! # Design
//! - Serves the site directory as-is; every response carries the allowed
//!   origin, methods, and headers, not only preflight responses.
//! - When the requested port is taken, walks forward to the next free port.

use std::future::Future;
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;

use axum::{
    Router,
    http::{
        HeaderValue, Method, Request,
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE,
        },
    },
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::{debug, info, warn};

use crate::error::{ServerError, ServerResult};

/// Port tried first.
pub const DEFAULT_PORT: u16 = 8000;
/// Consecutive ports tried before giving up.
pub const DEFAULT_PORT_ATTEMPTS: u16 = 10;

const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type";

/// Axum router wrapper serving a site directory.
pub struct PreviewServer {
    router: Router,
}

impl PreviewServer {
    /// Serve files under `root`; directories resolve to `index.html`.
    #[must_use]
    pub fn new(root: &Path) -> Self {
        let cors_layer = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([CONTENT_TYPE]);
        let trace_layer = TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
            tracing::info_span!(
                "http.request",
                method = %request.method(),
                path = %request.uri().path(),
            )
        });

        let router = Router::new()
            .fallback_service(ServeDir::new(root).append_index_html_on_directories(true))
            .layer(cors_layer)
            .layer(SetResponseHeaderLayer::if_not_present(
                ACCESS_CONTROL_ALLOW_ORIGIN,
                HeaderValue::from_static("*"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static(ALLOWED_METHODS),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static(ALLOWED_HEADERS),
            ))
            .layer(trace_layer);
        Self { router }
    }

    /// Underlying router.
    #[must_use]
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Serve on `listener` until `shutdown` resolves.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Serve`] if the server terminates unexpectedly.
    pub async fn serve<S>(self, listener: TcpListener, shutdown: S) -> ServerResult<()>
    where
        S: Future<Output = ()> + Send + 'static,
    {
        if let Ok(addr) = listener.local_addr() {
            info!(url = %format!("http://{addr}"), "preview server listening");
        }
        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|source| ServerError::Serve { source })?;
        info!("preview server stopped");
        Ok(())
    }
}

/// Bind `ip:port`, moving to the next port while the address is in use, for at
/// most `attempts` ports.
///
/// # Errors
///
/// Returns [`ServerError::Bind`] for any failure other than the address being
/// in use, or [`ServerError::PortsExhausted`] when every candidate is taken.
pub async fn bind_with_fallback(ip: IpAddr, port: u16, attempts: u16) -> ServerResult<TcpListener> {
    for offset in 0..attempts.max(1) {
        let Some(candidate) = port.checked_add(offset) else {
            break;
        };
        let addr = SocketAddr::new(ip, candidate);
        match TcpListener::bind(addr).await {
            Ok(listener) => {
                if offset > 0 {
                    warn!(requested = port, bound = candidate, "requested port in use");
                }
                return Ok(listener);
            }
            Err(err) if err.kind() == io::ErrorKind::AddrInUse => {
                debug!(port = candidate, "port in use; trying the next one");
            }
            Err(source) => return Err(ServerError::Bind { addr, source }),
        }
    }
    Err(ServerError::PortsExhausted {
        ip,
        first: port,
        attempts,
    })
}

/// Resolves on Ctrl+C.
pub async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to install Ctrl+C handler; serving until killed");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    const LOCALHOST: IpAddr = IpAddr::V4(std::net::Ipv4Addr::LOCALHOST);

    #[tokio::test]
    async fn binds_requested_port_when_free() -> Result<()> {
        let probe = TcpListener::bind((LOCALHOST, 0)).await?;
        let port = probe.local_addr()?.port();
        drop(probe);

        let listener = bind_with_fallback(LOCALHOST, port, 1).await?;
        assert_eq!(listener.local_addr()?.port(), port);
        Ok(())
    }

    #[tokio::test]
    async fn exhausted_ports_are_reported() -> Result<()> {
        let taken = TcpListener::bind((LOCALHOST, 0)).await?;
        let port = taken.local_addr()?.port();

        let err = bind_with_fallback(LOCALHOST, port, 1)
            .await
            .expect_err("port is taken");
        assert!(matches!(
            err,
            ServerError::PortsExhausted { first, attempts: 1, .. } if first == port
        ));
        Ok(())
    }
}
