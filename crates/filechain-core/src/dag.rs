//! DAG linking — turning addressed chunks into a retrievable chain.
//!
//! A file's chain is strictly linear: each node carries the CID of the
//! chunk that follows it in file order, and the last node carries none.
//! The first node's CID is the external handle for the whole file.
//! Linking is pure — no ledger access, no ambient state — so relinking
//! the same chunks always produces the same chain.

use std::collections::HashSet;

use bytes::Bytes;
use thiserror::Error;

use crate::chunk::{self, Chunk, ChunkError};
use crate::cid::Cid;

/// The addressable, linkable unit persisted on the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkNode {
    /// Address of `data`. Computed from the bytes alone.
    pub cid: Cid,
    /// The chunk's payload.
    pub data: Bytes,
    /// CID of the next chunk in file order. `None` on the last chunk.
    pub next: Option<Cid>,
}

/// An ordered, owned chain of nodes for one file.
///
/// Ownership is explicit: the link structure lives in each node's `next`
/// field, not in array adjacency, so a chain survives reordering or
/// partial serialization intact.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Chain {
    nodes: Vec<ChunkNode>,
}

impl Chain {
    /// Link an ordered chunk sequence into a chain.
    pub fn build(chunks: Vec<Chunk>) -> Self {
        let cids: Vec<Cid> = chunks.iter().map(|c| Cid::of(&c.bytes)).collect();
        let nodes = chunks
            .into_iter()
            .enumerate()
            .map(|(i, chunk)| ChunkNode {
                cid: cids[i],
                data: chunk.bytes,
                next: cids.get(i + 1).copied(),
            })
            .collect();
        Self { nodes }
    }

    /// CID of the first chunk — the handle the whole file is looked up by.
    pub fn root_cid(&self) -> Option<Cid> {
        self.nodes.first().map(|n| n.cid)
    }

    /// Nodes in file order.
    pub fn nodes(&self) -> &[ChunkNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total payload bytes across the chain.
    pub fn total_bytes(&self) -> u64 {
        self.nodes.iter().map(|n| n.data.len() as u64).sum()
    }
}

/// Chunk a byte source and link the result in one step.
///
/// Fails before any addressing happens if `chunk_size` is zero.
pub fn chunk_and_link(data: &[u8], chunk_size: usize) -> Result<Chain, ChunkError> {
    Ok(Chain::build(chunk::split(data, chunk_size)?))
}

#[derive(Debug, Error)]
pub enum WalkError {
    #[error("chain is missing node {0}")]
    MissingNode(Cid),
    #[error("chain links form a cycle at {0}")]
    CycleDetected(Cid),
}

/// Reassemble file bytes by walking `next` links from `root`.
///
/// `fetch` resolves one CID to its stored payload and link. A node the
/// store cannot produce breaks the walk — a file is reconstructible only
/// if every node in its chain is retrievable.
pub fn reassemble<F>(root: Cid, mut fetch: F) -> Result<Vec<u8>, WalkError>
where
    F: FnMut(&Cid) -> Option<(Bytes, Option<Cid>)>,
{
    let mut out = Vec::new();
    let mut seen = HashSet::new();
    let mut cursor = Some(root);

    while let Some(cid) = cursor {
        if !seen.insert(cid) {
            return Err(WalkError::CycleDetected(cid));
        }
        let (data, next) = fetch(&cid).ok_or(WalkError::MissingNode(cid))?;
        out.extend_from_slice(&data);
        cursor = next;
    }

    Ok(out)
}
