use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::future::IntoFuture;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{oneshot, Mutex};

use super::models::RedirectParams;
use crate::error::ProviderError;

const DONE_PAGE: &str = "<!doctype html><html><body>\
<h3>Photosflix</h3><p>Sign-in complete. You can close this window.</p>\
</body></html>";

struct RedirectState {
    reply: Mutex<Option<oneshot::Sender<RedirectParams>>>,
}

/// Serves the loopback redirect URI until the provider's redirect arrives and
/// returns its query parameters. Other requests (favicon, speculative
/// preconnects) are answered or left alone without holding up the redirect.
///
/// The listener is released as soon as this returns or is dropped.
pub async fn receive_redirect(listener: TcpListener) -> Result<RedirectParams, ProviderError> {
    let (reply, received) = oneshot::channel();
    let state = Arc::new(RedirectState {
        reply: Mutex::new(Some(reply)),
    });

    let app = Router::new()
        .route("/", get(handle_redirect))
        .with_state(state);

    tracing::debug!(addr = ?listener.local_addr().ok(), "Waiting for sign-in redirect");
    let server = axum::serve(listener, app).into_future();

    tokio::select! {
        params = received => {
            params.map_err(|_| ProviderError::Transport("redirect listener closed".into()))
        }
        result = server => {
            result?;
            Err(ProviderError::Transport("redirect listener stopped".into()))
        }
    }
}

async fn handle_redirect(
    State(state): State<Arc<RedirectState>>,
    Query(params): Query<RedirectParams>,
) -> Response {
    if !params.is_complete() {
        return StatusCode::NOT_FOUND.into_response();
    }

    tracing::debug!(has_error = params.error.is_some(), "Sign-in redirect received");
    if let Some(reply) = state.reply.lock().await.take() {
        let _ = reply.send(params);
    }
    Html(DONE_PAGE).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    async fn get(addr: SocketAddr, target: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let request = format!(
            "GET {} HTTP/1.1\r\nHost: 127.0.0.1\r\nConnection: close\r\n\r\n",
            target
        );
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    async fn bind() -> (TcpListener, SocketAddr) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        (listener, addr)
    }

    #[tokio::test]
    async fn test_receive_redirect_decodes_code() {
        let (listener, addr) = bind().await;

        let client = tokio::spawn(async move {
            get(addr, "/?state=xyz&code=4%2F0abc&scope=openid").await
        });

        let params = receive_redirect(listener).await.unwrap();
        assert_eq!(params.code.as_deref(), Some("4/0abc"));
        assert_eq!(params.state.as_deref(), Some("xyz"));
        assert!(params.error.is_none());
        assert!(client.await.unwrap().contains("Sign-in complete"));
    }

    #[tokio::test]
    async fn test_receive_redirect_reports_provider_error() {
        let (listener, addr) = bind().await;

        tokio::spawn(async move { get(addr, "/?error=access_denied&state=xyz").await });

        let params = receive_redirect(listener).await.unwrap();
        assert_eq!(params.error.as_deref(), Some("access_denied"));
        assert!(params.code.is_none());
    }

    #[tokio::test]
    async fn test_receive_redirect_skips_stray_requests() {
        let (listener, addr) = bind().await;

        let client = tokio::spawn(async move {
            let favicon = get(addr, "/favicon.ico").await;
            let bare = get(addr, "/").await;
            get(addr, "/?code=abc&state=s1").await;
            (favicon, bare)
        });

        let params = receive_redirect(listener).await.unwrap();
        let (favicon, bare) = client.await.unwrap();

        assert!(favicon.starts_with("HTTP/1.1 404"));
        assert!(bare.starts_with("HTTP/1.1 404"));
        assert_eq!(params.code.as_deref(), Some("abc"));
        assert_eq!(params.state.as_deref(), Some("s1"));
    }

    #[tokio::test]
    async fn test_idle_connection_does_not_block_redirect() {
        let (listener, addr) = bind().await;

        // Browsers open connections they may never use
        let _idle = TcpStream::connect(addr).await.unwrap();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            get(addr, "/?code=abc&state=s1").await
        });

        let params = tokio::time::timeout(Duration::from_secs(2), receive_redirect(listener))
            .await
            .expect("redirect was not received")
            .unwrap();
        assert_eq!(params.code.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_listener_released_when_dropped() {
        let (listener, addr) = bind().await;

        let waiting = tokio::spawn(receive_redirect(listener));
        tokio::time::sleep(Duration::from_millis(20)).await;
        waiting.abort();
        let _ = waiting.await;

        assert!(TcpListener::bind(addr).await.is_ok());
    }
}
