//! Common types used across the application.

pub mod pagination;

pub use pagination::{MAX_LIMIT, MAX_PAGE, Page, PageRequest, has_more, page_offset};
