//! Block-alignment arithmetic

/// Compute the run of whole `block_size` blocks covering
/// `[offset, offset + length)`.
///
/// Returns `(first_block, block_count)`. A non-positive `length` covers no
/// blocks, though `first_block` still names the block containing `offset`.
pub fn encompassing_blocks(offset: i64, length: i64, block_size: usize) -> (i64, i64) {
    let block = block_size as i64;
    let first = offset / block;
    if length <= 0 {
        return (first, 0);
    }
    let last = (offset + length - 1) / block;
    (first, last - first + 1)
}
