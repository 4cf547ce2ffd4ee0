//! The edit-window policy for transactions.

use time::{Duration, PrimitiveDateTime};

/// How long a transaction stays editable after it is created.
pub const EDIT_WINDOW: Duration = Duration::hours(12);

/// Whether a transaction created at `created_at` may still be edited or
/// deleted at `now`.
///
/// The boundary is inclusive: a transaction exactly [EDIT_WINDOW] old is
/// still editable, one second older is frozen forever.
pub fn is_editable(created_at: PrimitiveDateTime, now: PrimitiveDateTime) -> bool {
    now - created_at <= EDIT_WINDOW
}
