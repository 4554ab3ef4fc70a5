//! Discovery pipeline.
//!
//! ```text
//! DiscoveryRequest
//!   -> AiSearchDiscoverer | UrlScrapeDiscoverer   (RawCandidate, tagged by source)
//!   -> ProspectNormalizer                          (contact, fit score, dedupe)
//!   -> DiscoveryResultAssembler                    (DiscoveryResult)
//! ```

pub mod ai_search;
pub mod assemble;
pub mod contact;
pub mod discovery;
pub mod normalize;
pub mod score;
pub mod url_scrape;

pub use ai_search::{build_search_query, AiSearchDiscoverer, AiSearchOutcome};
pub use assemble::{url_echo, DiscoveryResultAssembler};
pub use contact::ContactExtractor;
pub use discovery::ProspectDiscovery;
pub use normalize::{dedupe_prospects, ProspectNormalizer};
pub use score::{FitScorer, ScoreInput, ScoringCriteria};
pub use url_scrape::{page_to_candidate, ScrapeOutcome, UrlScrapeDiscoverer};
