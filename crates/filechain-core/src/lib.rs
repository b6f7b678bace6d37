//! filechain-core — content addressing, chunking, and DAG linking.
//! All other filechain crates depend on this one.

pub mod chunk;
pub mod cid;
pub mod config;
pub mod dag;

pub use chunk::{split, Chunk, ChunkError};
pub use cid::Cid;
pub use dag::{chunk_and_link, Chain, ChunkNode};
