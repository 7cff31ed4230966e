//! Helpers shared by the repositories.

/// Upper bound on bound parameters per `IN (...)` list.
///
/// SQLite caps the number of host parameters in one statement
/// (`SQLITE_MAX_VARIABLE_NUMBER`); id lists longer than this are queried in
/// several rounds.
pub const SQLITE_MAX_PARAMS_CHUNK: usize = 500;

/// Splits `items` into slices that fit in one `IN (...)` clause.
pub fn chunk_for_sqlite<T>(items: &[T]) -> impl Iterator<Item = &[T]> {
    items.chunks(SQLITE_MAX_PARAMS_CHUNK)
}
