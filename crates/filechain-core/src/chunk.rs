//! Chunking — fixed-size splits of a byte source.

use bytes::Bytes;
use thiserror::Error;

/// A contiguous byte range of a source file, before addressing.
///
/// Ephemeral: chunks exist for the duration of one upload attempt and are
/// consumed when the chain is linked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Ordinal position in the file, 0-based.
    pub index: usize,
    /// Payload, at most the configured chunk size. The last chunk of a
    /// file may be shorter; an empty file has one zero-length chunk.
    pub bytes: Bytes,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChunkError {
    #[error("chunk size must be at least 1 byte")]
    InvalidChunkSize,
}

/// Split `data` into `ceil(len / chunk_size)` chunks, minimum one.
///
/// Chunks never overlap, and concatenating them in index order reproduces
/// `data` exactly. The chunk size is fixed for the whole split — callers
/// must not mix sizes within one upload.
pub fn split(data: &[u8], chunk_size: usize) -> Result<Vec<Chunk>, ChunkError> {
    if chunk_size == 0 {
        return Err(ChunkError::InvalidChunkSize);
    }

    if data.is_empty() {
        return Ok(vec![Chunk {
            index: 0,
            bytes: Bytes::new(),
        }]);
    }

    Ok(data
        .chunks(chunk_size)
        .enumerate()
        .map(|(index, piece)| Chunk {
            index,
            bytes: Bytes::copy_from_slice(piece),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_chunk_size_is_rejected() {
        assert_eq!(split(b"data", 0), Err(ChunkError::InvalidChunkSize));
    }

    #[test]
    fn chunk_count_is_ceil_of_len_over_size() {
        for (len, size, expected) in [
            (0usize, 4usize, 1usize),
            (1, 4, 1),
            (4, 4, 1),
            (5, 4, 2),
            (8, 4, 2),
            (9, 4, 3),
            (100, 7, 15),
        ] {
            let data = vec![0xAB; len];
            let chunks = split(&data, size).unwrap();
            assert_eq!(chunks.len(), expected, "len={len} size={size}");
        }
    }

    #[test]
    fn concatenation_reproduces_source() {
        let data: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();
        for size in [1, 3, 64, 4096, 10_000, 20_000] {
            let chunks = split(&data, size).unwrap();
            let rejoined: Vec<u8> = chunks
                .iter()
                .flat_map(|c| c.bytes.iter().copied())
                .collect();
            assert_eq!(rejoined, data, "size={size}");
        }
    }

    #[test]
    fn indices_are_sequential() {
        let chunks = split(&[0u8; 30], 7).unwrap();
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
        }
    }

    #[test]
    fn empty_input_yields_one_empty_chunk() {
        let chunks = split(&[], 16).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].index, 0);
        assert!(chunks[0].bytes.is_empty());
    }

    #[test]
    fn exact_multiple_has_no_trailing_empty_chunk() {
        let chunks = split(&[1u8; 12], 4).unwrap();
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.bytes.len() == 4));
    }

    #[test]
    fn last_chunk_carries_the_remainder() {
        let chunks = split(b"ABCDEFGHI", 4).unwrap();
        assert_eq!(chunks.len(), 3);
        assert_eq!(&chunks[0].bytes[..], b"ABCD");
        assert_eq!(&chunks[1].bytes[..], b"EFGH");
        assert_eq!(&chunks[2].bytes[..], b"I");
    }
}
