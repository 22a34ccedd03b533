use serde::{Deserialize, Serialize};

/// Pagination settings for a model's index endpoint.
///
/// A model without a `pagination` block has no `Pagination` at all; a
/// zero value here means the key was never set inside a block that did
/// set the other one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pagination {
    pub per_page: i64,
    pub max_per_page: i64,
}

impl Pagination {
    pub fn new(per_page: i64, max_per_page: i64) -> Self {
        Self {
            per_page,
            max_per_page,
        }
    }
}
