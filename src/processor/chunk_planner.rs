use memchr::memchr;

use crate::processor::ChunkRange;

/// Splits `data` into record-aligned ranges of roughly `data.len() / workers`
/// bytes, never smaller than `min_chunk_size`.
///
/// Every range except possibly the last ends one byte after a `\n`, so no
/// record straddles two ranges. The ranges are contiguous and cover
/// `[0, data.len())` exactly once.
pub fn plan_chunks(data: &[u8], workers: usize, min_chunk_size: usize) -> Vec<ChunkRange> {
    let size = data.len();
    if size == 0 {
        return vec![];
    }

    let chunk_size = min_chunk_size.max(size / workers.max(1)).max(1);
    let mut ranges = Vec::with_capacity(size / chunk_size + 1);
    let mut start = 0;

    while start < size {
        let mut end = (start + chunk_size).min(size);

        if end < size {
            // Move past the separator that closes the record containing `end`
            end = match memchr(b'\n', &data[end..]) {
                Some(pos) => end + pos + 1,
                None => size,
            };
        }

        if start < end {
            ranges.push(ChunkRange::new(start, end));
        }
        start = end;
    }

    ranges
}
