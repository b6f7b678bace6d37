//! In-memory ledger — the stub chain node used by the gateway and tests.
//!
//! Entries are immutable once written: if a CID is present, its content
//! is correct, so re-submitting it is a no-op success. That mirrors the
//! append-only contract real chains give us and is what makes upload
//! retries harmless.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use filechain_core::cid::Cid;

use crate::ledger::{LedgerEntry, LedgerError, LedgerRead, LedgerWrite, SignedEntry, TxRef};

#[derive(Clone)]
pub struct MemoryLedger {
    entries: Arc<DashMap<Cid, LedgerEntry>>,
    tx_counter: Arc<AtomicU64>,
    /// Writes remaining before injected rejection kicks in.
    writes_left: Arc<AtomicI64>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            tx_counter: Arc::new(AtomicU64::new(0)),
            writes_left: Arc::new(AtomicI64::new(i64::MAX)),
        }
    }

    /// Test hook: accept `writes` more submissions, then reject the rest.
    pub fn reject_after(&self, writes: u64) {
        let writes = writes.min(i64::MAX as u64) as i64;
        self.writes_left.store(writes, Ordering::SeqCst);
    }

    /// Number of distinct entries stored.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerRead for MemoryLedger {
    async fn exists(&self, cid: &Cid) -> Result<bool, LedgerError> {
        Ok(self.entries.contains_key(cid))
    }

    async fn get(&self, cid: &Cid) -> Result<Option<LedgerEntry>, LedgerError> {
        Ok(self.entries.get(cid).map(|e| e.value().clone()))
    }
}

#[async_trait]
impl LedgerWrite for MemoryLedger {
    async fn submit(&self, signed: &SignedEntry) -> Result<TxRef, LedgerError> {
        signed
            .verify()
            .map_err(|e| LedgerError::Rejected(e.to_string()))?;

        if self.writes_left.fetch_sub(1, Ordering::SeqCst) <= 0 {
            return Err(LedgerError::Rejected("write rejected by node".into()));
        }

        // Idempotent append: first write wins, duplicates change nothing.
        self.entries
            .entry(signed.cid)
            .or_insert_with(|| signed.entry.clone());

        let seq = self.tx_counter.fetch_add(1, Ordering::SeqCst);
        let mut preimage = Vec::with_capacity(44);
        preimage.extend_from_slice(&signed.cid.to_bytes());
        preimage.extend_from_slice(&seq.to_le_bytes());
        let tx = TxRef::new(format!("0x{}", hex::encode(blake3::hash(&preimage).as_bytes())));

        tracing::debug!(cid = %signed.cid.short(), tx = %tx, "entry accepted");
        Ok(tx)
    }
}
