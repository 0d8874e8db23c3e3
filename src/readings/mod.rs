pub mod error;
pub mod export;
pub mod fetcher;
pub mod summary;
