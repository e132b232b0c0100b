/// Maximum number of transactions the ledger accepts in one insert request.
pub const MAX_TRANSACTIONS_PER_REQUEST: usize = 50;

/// Splits `items` into consecutive slices of at most `size` elements.
/// A size of zero is treated as one.
pub fn chunk<T>(items: &[T], size: usize) -> Vec<&[T]> {
    items.chunks(size.max(1)).collect()
}
