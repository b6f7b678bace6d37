//! Ledger capability interface and the persisted entry format.
//!
//! Writers and readers see the ledger only through these narrow traits —
//! never through a concrete client's full surface. The persisted layout
//! is one entry per CID: `{ data, next }`. Entries are append-only;
//! nothing in this crate updates or deletes one.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use filechain_core::cid::Cid;

use crate::signer::{AccountId, Signer};

/// Stable reference to the transaction that carried a write.
///
/// Opaque to this crate; its string form is what callers feed into
/// explorer links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxRef(String);

impl TxRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TxRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the ledger stores under one CID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    /// The chunk payload.
    pub data: Bytes,
    /// Link to the next chunk in the file's chain, if any.
    pub next: Option<Cid>,
}

/// A ledger write plus the signature that authorizes it.
#[derive(Debug, Clone)]
pub struct SignedEntry {
    pub cid: Cid,
    pub entry: LedgerEntry,
    pub account: AccountId,
    pub signature: [u8; 64],
}

/// Domain separator for entry signatures.
const SIGNING_DOMAIN: &[u8] = b"filechain/node/v1";

impl SignedEntry {
    /// Sign an entry for submission.
    pub fn sign(cid: Cid, entry: LedgerEntry, signer: &dyn Signer) -> Self {
        let msg = Self::signing_bytes(&cid, &entry);
        let signature = signer.sign(&msg);
        Self {
            cid,
            entry,
            account: signer.account(),
            signature,
        }
    }

    /// Canonical bytes covered by the signature:
    /// domain tag, CID, link marker + link, payload.
    fn signing_bytes(cid: &Cid, entry: &LedgerEntry) -> Vec<u8> {
        let mut msg = Vec::with_capacity(SIGNING_DOMAIN.len() + 80 + entry.data.len());
        msg.extend_from_slice(SIGNING_DOMAIN);
        msg.extend_from_slice(&cid.to_bytes());
        match &entry.next {
            Some(next) => {
                msg.push(1);
                msg.extend_from_slice(&next.to_bytes());
            }
            None => msg.push(0),
        }
        msg.extend_from_slice(&entry.data);
        msg
    }

    /// Check the entry is internally consistent and properly signed.
    pub fn verify(&self) -> Result<(), EntryVerifyError> {
        if Cid::of(&self.entry.data) != self.cid {
            return Err(EntryVerifyError::CidMismatch);
        }
        let key = ed25519_dalek::VerifyingKey::from_bytes(&self.account.0)
            .map_err(|_| EntryVerifyError::InvalidAccount)?;
        let sig = ed25519_dalek::Signature::from_bytes(&self.signature);
        let msg = Self::signing_bytes(&self.cid, &self.entry);
        ed25519_dalek::Verifier::verify(&key, &msg, &sig)
            .map_err(|_| EntryVerifyError::BadSignature)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EntryVerifyError {
    #[error("CID does not match entry content")]
    CidMismatch,
    #[error("account id is not a valid public key")]
    InvalidAccount,
    #[error("signature does not verify")]
    BadSignature,
}

#[derive(Debug, Error)]
pub enum LedgerError {
    /// The node looked at the write and said no — bad signature,
    /// insufficient funds, oversized payload.
    #[error("ledger rejected the write: {0}")]
    Rejected(String),
    /// The node could not be reached or answered garbage.
    #[error("ledger unreachable: {0}")]
    Unavailable(String),
}

/// Read-only ledger access. Requires no signer and may be shared freely.
#[async_trait]
pub trait LedgerRead: Send + Sync {
    /// Whether an entry with this CID exists. Absence is a valid answer,
    /// not an error.
    async fn exists(&self, cid: &Cid) -> Result<bool, LedgerError>;

    /// Fetch the entry stored under a CID.
    async fn get(&self, cid: &Cid) -> Result<Option<LedgerEntry>, LedgerError>;
}

/// Append-only ledger writes. Submitting a CID that is already present
/// must be a no-op success — content addressing makes retries safe.
#[async_trait]
pub trait LedgerWrite: LedgerRead {
    async fn submit(&self, entry: &SignedEntry) -> Result<TxRef, LedgerError>;
}
