//! Collaborator traits the discovery core depends on.

pub mod fetcher;
pub mod searcher;

pub use fetcher::{FetchedPage, PageFetcher, ValidatedFetcher};
pub use searcher::{MockSearchFailure, MockSearcher, ProspectSearcher};
