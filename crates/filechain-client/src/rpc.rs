//! HTTP ledger client for a filechain gateway node.
//!
//! Wire bodies carry CIDs in their string form and payloads hex-encoded;
//! the gateway answers with the same shapes.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use filechain_core::cid::Cid;

use crate::ledger::{LedgerEntry, LedgerError, LedgerRead, LedgerWrite, SignedEntry, TxRef};

#[derive(Clone)]
pub struct RpcLedger {
    base_url: String,
    http: reqwest::Client,
}

// ── Wire types ────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct NodeBody {
    cid: Cid,
    /// Hex-encoded payload.
    data: String,
    next: Option<Cid>,
    /// Hex-encoded Ed25519 public key.
    account: String,
    /// Hex-encoded signature.
    signature: String,
}

#[derive(Deserialize)]
struct SubmitResponse {
    tx: String,
}

#[derive(Deserialize)]
struct FoundResponse {
    found: bool,
}

#[derive(Deserialize)]
struct EntryResponse {
    data: String,
    next: Option<Cid>,
}

// ── Client ────────────────────────────────────────────────────────────────────

impl RpcLedger {
    /// Point a client at a gateway API base, e.g. `http://127.0.0.1:9620/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn transport(err: reqwest::Error) -> LedgerError {
        LedgerError::Unavailable(err.to_string())
    }
}

#[async_trait]
impl LedgerRead for RpcLedger {
    async fn exists(&self, cid: &Cid) -> Result<bool, LedgerError> {
        let url = format!("{}/search-file/{}", self.base_url, cid);
        let resp: FoundResponse = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(Self::transport)?
            .error_for_status()
            .map_err(Self::transport)?
            .json()
            .await
            .map_err(Self::transport)?;
        Ok(resp.found)
    }

    async fn get(&self, cid: &Cid) -> Result<Option<LedgerEntry>, LedgerError> {
        let url = format!("{}/node/{}", self.base_url, cid);
        let resp = self.http.get(&url).send().await.map_err(Self::transport)?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let resp: EntryResponse = resp
            .error_for_status()
            .map_err(Self::transport)?
            .json()
            .await
            .map_err(Self::transport)?;

        let data = hex::decode(&resp.data)
            .map_err(|e| LedgerError::Unavailable(format!("malformed entry payload: {e}")))?;
        Ok(Some(LedgerEntry {
            data: Bytes::from(data),
            next: resp.next,
        }))
    }
}

#[async_trait]
impl LedgerWrite for RpcLedger {
    async fn submit(&self, signed: &SignedEntry) -> Result<TxRef, LedgerError> {
        let body = NodeBody {
            cid: signed.cid,
            data: hex::encode(&signed.entry.data),
            next: signed.entry.next,
            account: signed.account.to_string(),
            signature: hex::encode(signed.signature),
        };

        let url = format!("{}/node", self.base_url);
        let resp = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(Self::transport)?;

        if !resp.status().is_success() {
            let reason = resp.text().await.unwrap_or_else(|e| e.to_string());
            return Err(LedgerError::Rejected(reason));
        }

        let resp: SubmitResponse = resp.json().await.map_err(Self::transport)?;
        Ok(TxRef::new(resp.tx))
    }
}
