//! /node and /search-file handlers — the ledger's HTTP surface.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use filechain_core::cid::Cid;
use filechain_client::ledger::{LedgerEntry, LedgerError, LedgerRead, LedgerWrite, SignedEntry};
use filechain_client::{AccountId, MemoryLedger};

#[derive(Clone)]
pub struct GatewayState {
    pub ledger: MemoryLedger,
}

impl GatewayState {
    pub fn new() -> Self {
        Self {
            ledger: MemoryLedger::new(),
        }
    }
}

impl Default for GatewayState {
    fn default() -> Self {
        Self::new()
    }
}

type HandlerError = (StatusCode, String);

fn bad_request(msg: impl Into<String>) -> HandlerError {
    (StatusCode::BAD_REQUEST, msg.into())
}

// ── /node (submit) ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct NodeBody {
    cid: Cid,
    /// Hex-encoded payload.
    data: String,
    next: Option<Cid>,
    /// Hex-encoded Ed25519 public key.
    account: String,
    /// Hex-encoded signature.
    signature: String,
}

#[derive(Serialize)]
pub struct SubmitResponse {
    tx: String,
}

pub async fn handle_submit(
    State(state): State<GatewayState>,
    Json(body): Json<NodeBody>,
) -> Result<Json<SubmitResponse>, HandlerError> {
    let data = hex::decode(&body.data).map_err(|e| bad_request(format!("invalid data hex: {e}")))?;
    let account: AccountId = body
        .account
        .parse()
        .map_err(|e| bad_request(format!("invalid account: {e}")))?;
    let signature: [u8; 64] = hex::decode(&body.signature)
        .map_err(|e| bad_request(format!("invalid signature hex: {e}")))?
        .try_into()
        .map_err(|_| bad_request("signature must be 64 bytes"))?;

    let signed = SignedEntry {
        cid: body.cid,
        entry: LedgerEntry {
            data: Bytes::from(data),
            next: body.next,
        },
        account,
        signature,
    };

    match state.ledger.submit(&signed).await {
        Ok(tx) => {
            tracing::info!(cid = %signed.cid.short(), tx = %tx, "node submitted");
            Ok(Json(SubmitResponse { tx: tx.to_string() }))
        }
        Err(LedgerError::Rejected(reason)) => Err((StatusCode::UNPROCESSABLE_ENTITY, reason)),
        Err(LedgerError::Unavailable(reason)) => Err((StatusCode::SERVICE_UNAVAILABLE, reason)),
    }
}

// ── /node/{cid} (fetch) ───────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct EntryResponse {
    data: String,
    next: Option<Cid>,
}

pub async fn handle_get_node(
    State(state): State<GatewayState>,
    Path(cid): Path<String>,
) -> Result<Json<EntryResponse>, HandlerError> {
    let cid: Cid = cid
        .parse()
        .map_err(|e| bad_request(format!("invalid cid: {e}")))?;

    match state.ledger.get(&cid).await {
        Ok(Some(entry)) => Ok(Json(EntryResponse {
            data: hex::encode(&entry.data),
            next: entry.next,
        })),
        Ok(None) => Err((StatusCode::NOT_FOUND, "no such node".to_string())),
        Err(e) => Err((StatusCode::SERVICE_UNAVAILABLE, e.to_string())),
    }
}

// ── /search-file/{cid} ────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct FoundResponse {
    found: bool,
}

pub async fn handle_search_file(
    State(state): State<GatewayState>,
    Path(cid): Path<String>,
) -> Result<Json<FoundResponse>, HandlerError> {
    let cid: Cid = cid
        .parse()
        .map_err(|e| bad_request(format!("invalid cid: {e}")))?;

    match state.ledger.exists(&cid).await {
        Ok(found) => Ok(Json(FoundResponse { found })),
        Err(e) => Err((StatusCode::SERVICE_UNAVAILABLE, e.to_string())),
    }
}

// ── /status ───────────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct StatusResponse {
    nodes: usize,
}

pub async fn handle_status(State(state): State<GatewayState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        nodes: state.ledger.len(),
    })
}
