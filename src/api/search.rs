//! Search query parameters for list endpoints

use serde::Deserialize;

/// `?term=` filter shared by the list endpoints
///
/// An absent term lists everything. A present term, even an empty one,
/// filters with a case-insensitive substring match.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SearchParams {
    pub term: Option<String>,
}
