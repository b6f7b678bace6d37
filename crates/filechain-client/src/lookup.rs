//! Lookup — read-only existence checks and retrieval by CID.
//!
//! No signer required; the service clones freely and may be shared
//! across concurrent tasks since it never mutates the ledger.

use std::collections::HashSet;

use thiserror::Error;

use filechain_core::cid::Cid;

use crate::ledger::LedgerRead;

#[derive(Clone)]
pub struct LookupService<C> {
    client: C,
}

#[derive(Debug, Error)]
pub enum LookupError {
    /// Transport failure — the answer is "unknown", not "absent".
    #[error("lookup unavailable: {0}")]
    Unavailable(String),
    /// The root exists but some node in its chain does not.
    #[error("chain is missing node {0}")]
    Incomplete(Cid),
    /// A corrupt store handed back links that loop.
    #[error("chain links form a cycle at {0}")]
    Cyclic(Cid),
}

impl<C: LedgerRead> LookupService<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Whether a node with this CID is on the ledger.
    ///
    /// Absence is a valid negative answer; only transport failure errors.
    pub async fn exists(&self, cid: &Cid) -> Result<bool, LookupError> {
        self.client
            .exists(cid)
            .await
            .map_err(|e| LookupError::Unavailable(e.to_string()))
    }

    /// Fetch and reassemble a whole file by its root CID.
    ///
    /// Returns `None` when the root is not on the ledger. A root that
    /// exists with a broken chain behind it is an `Incomplete` error —
    /// that state is never produced by a confirmed upload.
    pub async fn fetch(&self, root: &Cid) -> Result<Option<Vec<u8>>, LookupError> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        let mut cursor = Some(*root);
        let mut first = true;

        while let Some(cid) = cursor {
            if !seen.insert(cid) {
                return Err(LookupError::Cyclic(cid));
            }
            let entry = self
                .client
                .get(&cid)
                .await
                .map_err(|e| LookupError::Unavailable(e.to_string()))?;
            let entry = match entry {
                Some(entry) => entry,
                None if first => return Ok(None),
                None => return Err(LookupError::Incomplete(cid)),
            };
            out.extend_from_slice(&entry.data);
            cursor = entry.next;
            first = false;
        }

        Ok(Some(out))
    }
}
