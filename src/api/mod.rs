//! API response types and query parameters

pub mod response;
pub mod search;

pub use response::{DataResponse, Flash, ListResponse};
pub use search::SearchParams;
