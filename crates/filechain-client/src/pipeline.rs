//! Submission pipeline — writing a chunk chain to the ledger.
//!
//! One pipeline drives one submission at a time; a second `upload` call
//! queues behind the first rather than clobbering its in-flight handle.
//! Progress is published on a watch channel so callers can observe
//! `Idle → Submitting → Confirmed | Failed` without threading callbacks
//! through the write path.
//!
//! Nodes are written tail-first. The root node lands last, so a chain is
//! never discoverable from its root until every node behind it is
//! durable — a partially written chain can never be mistaken for a
//! complete one. No retry happens here: content addressing makes a
//! caller-level re-upload safe and duplicate-free.

use thiserror::Error;
use tokio::sync::{watch, Mutex};

use filechain_core::dag::Chain;

use crate::ledger::{LedgerEntry, LedgerError, LedgerWrite, SignedEntry, TxRef};
use crate::session::{SessionContext, SessionError, UploadHandle};
use crate::signer::SignerProvider;

/// Observable submission state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadState {
    Idle,
    Submitting,
    Confirmed(TxRef),
    Failed(String),
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("nothing to upload: the chunk chain is empty")]
    EmptyChain,
    #[error("no ledger client connected")]
    NotConnected,
    #[error("no signing account attached to this session")]
    Unauthenticated,
    #[error("ledger rejected the submission: {0}")]
    SubmissionRejected(String),
}

impl From<SessionError> for UploadError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotConnected => UploadError::NotConnected,
            SessionError::Unauthenticated => UploadError::Unauthenticated,
        }
    }
}

pub struct UploadPipeline {
    state: watch::Sender<UploadState>,
    in_flight: Mutex<()>,
}

impl UploadPipeline {
    pub fn new() -> Self {
        let (state, _) = watch::channel(UploadState::Idle);
        Self {
            state,
            in_flight: Mutex::new(()),
        }
    }

    /// Watch submission state transitions.
    pub fn subscribe(&self) -> watch::Receiver<UploadState> {
        self.state.subscribe()
    }

    /// The most recent state.
    pub fn state(&self) -> UploadState {
        self.state.borrow().clone()
    }

    /// Submit a linked chain through a session.
    ///
    /// Binds the session's signer once, then writes every node. Returns
    /// the transaction reference of the root write on success. On any
    /// rejection the chain is not reported usable — the root was never
    /// written, so lookups by root CID keep answering "absent".
    pub async fn upload<C, P>(
        &self,
        session: &SessionContext<C>,
        provider: &P,
        chain: &Chain,
    ) -> Result<TxRef, UploadError>
    where
        C: LedgerWrite,
        P: SignerProvider,
    {
        if chain.is_empty() {
            return Err(UploadError::EmptyChain);
        }
        let handle = session.bind(provider)?;
        self.upload_bound(&handle, chain).await
    }

    /// Submit a linked chain through an already-bound handle.
    pub async fn upload_bound<C: LedgerWrite>(
        &self,
        handle: &UploadHandle<'_, C>,
        chain: &Chain,
    ) -> Result<TxRef, UploadError> {
        if chain.is_empty() {
            return Err(UploadError::EmptyChain);
        }

        // Serialize submissions: a new upload waits for the previous one
        // to reach a terminal state instead of overwriting its handle.
        let _guard = self.in_flight.lock().await;
        self.state.send_replace(UploadState::Submitting);

        let result = self.submit_chain(handle, chain).await;
        match &result {
            Ok(tx) => {
                tracing::info!(
                    root = %chain.root_cid().map(|c| c.short()).unwrap_or_default(),
                    nodes = chain.len(),
                    bytes = chain.total_bytes(),
                    tx = %tx,
                    "chain confirmed"
                );
                self.state.send_replace(UploadState::Confirmed(tx.clone()));
            }
            Err(err) => {
                tracing::warn!(error = %err, "chain submission failed");
                self.state.send_replace(UploadState::Failed(err.to_string()));
            }
        }
        result
    }

    async fn submit_chain<C: LedgerWrite>(
        &self,
        handle: &UploadHandle<'_, C>,
        chain: &Chain,
    ) -> Result<TxRef, UploadError> {
        let mut root_tx = None;

        // Tail-first: node i is only ever written after node i+1 is durable.
        for (pos, node) in chain.nodes().iter().enumerate().rev() {
            let is_root = pos == 0;

            // Dedup probe. The root is always submitted so every confirmed
            // upload yields a fresh transaction reference; a failed probe
            // degrades to submitting — existence checking is an
            // optimization, not a correctness requirement.
            if !is_root {
                match handle.client().exists(&node.cid).await {
                    Ok(true) => {
                        tracing::debug!(cid = %node.cid.short(), "node already on ledger, skipping");
                        continue;
                    }
                    Ok(false) => {}
                    Err(err) => {
                        tracing::debug!(cid = %node.cid.short(), error = %err, "existence probe failed, submitting anyway");
                    }
                }
            }

            let entry = LedgerEntry {
                data: node.data.clone(),
                next: node.next,
            };
            let signed = SignedEntry::sign(node.cid, entry, handle.signer());
            let tx = handle
                .client()
                .submit(&signed)
                .await
                .map_err(|err| match err {
                    LedgerError::Rejected(reason) => UploadError::SubmissionRejected(reason),
                    // Keep the failure kind visible to the caller: a dead
                    // node is not the node saying no.
                    LedgerError::Unavailable(reason) => {
                        UploadError::SubmissionRejected(format!("node unreachable: {reason}"))
                    }
                })?;

            if is_root {
                root_tx = Some(tx);
            }
        }

        // The loop always reaches pos 0 on success, and pos 0 always submits.
        root_tx.ok_or_else(|| UploadError::SubmissionRejected("no transaction reference".into()))
    }
}

impl Default for UploadPipeline {
    fn default() -> Self {
        Self::new()
    }
}
