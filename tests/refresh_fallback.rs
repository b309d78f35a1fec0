//! Multi-origin refresh fallback against real loopback listeners.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum_extra::extract::CookieJar;

use idiom_web::origin::Origin;
use idiom_web::refresh::RefreshClient;
use idiom_web::types::CredentialPair;

async fn serve(router: Router) -> Origin {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    Origin::parse(&format!("http://{addr}")).unwrap()
}

/// Refresh endpoint stand-in: checks the refresh cookie and answers with a
/// pair tagged by origin name, counting the calls it receives.
fn issuing_router(tag: &'static str, calls: Arc<AtomicUsize>) -> Router {
    async fn handler(
        State((tag, calls)): State<(&'static str, Arc<AtomicUsize>)>,
        jar: CookieJar,
    ) -> Response {
        calls.fetch_add(1, Ordering::SeqCst);
        match jar.get("refresh_token").map(|c| c.value().to_string()) {
            Some(token) if token == "good-refresh" => Json(CredentialPair::new(
                format!("{tag}-access"),
                format!("{tag}-refresh"),
            ))
            .into_response(),
            _ => StatusCode::UNAUTHORIZED.into_response(),
        }
    }

    Router::new()
        .route("/api/auth/refresh", post(handler))
        .with_state((tag, calls))
}

fn failing_router() -> Router {
    Router::new().route(
        "/api/auth/refresh",
        post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    )
}

fn client() -> RefreshClient {
    RefreshClient::new("/api/auth/refresh", "refresh_token")
}

#[tokio::test]
async fn failing_first_origin_falls_through_to_second() {
    let first = serve(failing_router()).await;
    let second_calls = Arc::new(AtomicUsize::new(0));
    let second = serve(issuing_router("second", second_calls.clone())).await;

    let pair = client()
        .refresh("good-refresh", &[first, second])
        .await
        .unwrap();

    // The pair from the succeeding origin is what comes back, not a
    // leftover from the failed attempt.
    assert_eq!(pair.access_token, "second-access");
    assert_eq!(pair.refresh_token, "second-refresh");
    assert_eq!(second_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn first_success_short_circuits_remaining_origins() {
    let first_calls = Arc::new(AtomicUsize::new(0));
    let second_calls = Arc::new(AtomicUsize::new(0));
    let first = serve(issuing_router("first", first_calls.clone())).await;
    let second = serve(issuing_router("second", second_calls.clone())).await;

    let pair = client()
        .refresh("good-refresh", &[first, second])
        .await
        .unwrap();

    assert_eq!(pair.access_token, "first-access");
    assert_eq!(first_calls.load(Ordering::SeqCst), 1);
    assert_eq!(second_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn exhausted_origins_report_last_status() {
    let first = serve(failing_router()).await;
    let second = serve(issuing_router("second", Arc::new(AtomicUsize::new(0)))).await;

    // The second origin rejects this token with 401, which is the last
    // observed status once the pass is over.
    let err = client()
        .refresh("revoked-refresh", &[first, second])
        .await
        .unwrap_err();

    assert_eq!(err.attempts, 2);
    assert_eq!(err.last_status, Some(401));
}

#[tokio::test]
async fn unreachable_origin_is_skipped() {
    // Bind-then-drop to get a port that refuses connections.
    let unreachable = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        Origin::parse(&format!("http://{addr}")).unwrap()
    };
    let calls = Arc::new(AtomicUsize::new(0));
    let live = serve(issuing_router("live", calls.clone())).await;

    let pair = client()
        .refresh("good-refresh", &[unreachable, live])
        .await
        .unwrap();

    assert_eq!(pair.access_token, "live-access");
}
