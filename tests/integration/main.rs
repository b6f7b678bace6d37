//! filechain integration test harness.
//!
//! End-to-end tests run the whole path: chunk → address → link → submit,
//! both directly against the in-memory ledger and over HTTP through an
//! in-process gateway.

use filechain_client::MemoryLedger;
use filechain_gateway::{router, GatewayState};

mod http;
mod upload;

// ── Harness ───────────────────────────────────────────────────────────────────

/// Start a gateway on an OS-assigned port.
///
/// Returns the API base URL and a handle on the backing ledger so tests
/// can inspect or sabotage it.
pub async fn spawn_gateway() -> (String, MemoryLedger) {
    let state = GatewayState::new();
    let ledger = state.ledger.clone();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind gateway listener");
    let addr = listener.local_addr().expect("listener has no local addr");

    tokio::spawn(async move {
        axum_serve(listener, router(state)).await;
    });

    (format!("http://{addr}/api"), ledger)
}

async fn axum_serve(listener: tokio::net::TcpListener, app: axum::Router) {
    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("gateway exited: {e}");
    }
}

/// Deterministic pseudo-random bytes for multi-chunk files.
pub fn test_bytes(len: usize) -> Vec<u8> {
    let mut state = 0x2545F491u32;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(1664525).wrapping_add(1013904223);
            (state >> 24) as u8
        })
        .collect()
}
