//! Database ID type definitions.

/// Alias for the integer type used for mapping to database row IDs.
pub type DatabaseId = i64;

/// The ID of an [Account](crate::account::Account).
pub type AccountId = DatabaseId;

/// The ID of a [Transaction](crate::transaction::Transaction).
pub type TransactionId = DatabaseId;

/// The ID of a [Transfer](crate::transfer::Transfer).
pub type TransferId = DatabaseId;

/// The ID of a [Category](crate::category::Category).
///
/// Categories use caller-supplied string IDs (e.g. "salary", "groceries")
/// so a transaction holding a stale reference can still be displayed by
/// falling back to the raw ID.
pub type CategoryId = String;
