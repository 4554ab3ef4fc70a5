//! AI search provider implementations.

pub mod tavily;

pub use tavily::TavilyProspectSearcher;
