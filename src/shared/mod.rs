//! Shared utilities used by the API client and the webhook listener.

pub mod normalize;
pub mod serde_util;
pub mod spend_id;

// Re-export commonly used items
pub use normalize::{normalize, normalize_in_place, FieldKind};
pub use spend_id::{generate_spend_id, DEFAULT_SPEND_ID_LEN, MAX_SPEND_ID_LEN};
