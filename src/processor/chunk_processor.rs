use memchr::{memchr_iter, memrchr};

use crate::processor::{ChunkRange, PartialAggregate, positive_zero};

/// Scans one range of the input and aggregates its records.
///
/// Records are `\n`-delimited. A trailing record without a newline is still
/// processed, which is what the last range of a file relies on. Empty lines
/// (including whitespace-only ones such as a bare `\r`) are ignored;
/// malformed ones are skipped and counted.
pub fn process_chunk(data: &[u8], range: ChunkRange) -> PartialAggregate<'_> {
    let chunk = &data[range.start..range.end];
    let mut partial = PartialAggregate::new();

    let mut start = 0;
    for newline_pos in memchr_iter(b'\n', chunk) {
        scan_line(&mut partial, &chunk[start..newline_pos]);
        start = newline_pos + 1;
    }
    if start < chunk.len() {
        scan_line(&mut partial, &chunk[start..]);
    }

    partial
}

#[inline]
fn scan_line<'a>(partial: &mut PartialAggregate<'a>, line: &'a [u8]) {
    if line.trim_ascii().is_empty() {
        return;
    }
    match parse_record(line) {
        Some((key, value)) => partial.observe(key, value),
        None => partial.skipped += 1,
    }
}

/// Splits a record on its rightmost `;`.
///
/// Everything left of that separator is the key, byte for byte, so keys may
/// themselves contain `;`. Returns `None` when there is no separator or the
/// value is not a finite number.
pub fn parse_record(line: &[u8]) -> Option<(&[u8], f64)> {
    let sep = memrchr(b';', line)?;
    let value = parse_value(&line[sep + 1..])?;
    Some((&line[..sep], value))
}

fn parse_value(field: &[u8]) -> Option<f64> {
    let value: f64 = fast_float::parse(field.trim_ascii()).ok()?;
    value.is_finite().then_some(positive_zero(value))
}
