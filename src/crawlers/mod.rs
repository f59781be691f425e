pub mod crawler;
pub mod web;

pub use crawler::{FetchError, PageFetcher};
pub use web::{Collection, HttpFetcher};
