//! End-to-end tests for prospect discovery.
//!
//! These drive `ProspectDiscovery` through both modes with mock
//! collaborators:
//! 1. AI search capping, scoring and failure handling
//! 2. URL scrape ordering, partial failure and cancellation
//! 3. Request validation short-circuits
//! 4. Invariants over scores and deduplication

use std::collections::HashSet;
use std::time::Duration;

use proptest::prelude::*;
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use tokio_util::sync::CancellationToken;

use prospect_discovery::{
    dedupe_prospects,
    pipeline::ScoreInput,
    testing::{ai_record, profile_page, MockFetchFailure, MockSearchFailure, TestScenario},
    AiSearchRequest, ContactInfo, DiscoveryConfig, DiscoveryRequest, FitScorer, Prospect,
    ProspectNormalizer, ProspectSource, RawCandidate, ScoringCriteria, UrlScrapeRequest,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Seven provider records, two of them without any name.
fn seven_records() -> Vec<serde_json::Value> {
    vec![
        ai_record("Jane Doe", "Educational Consultant", "Washington DC", "https://capitoladvising.com/jane"),
        json!({"specialty": ["college essays"], "source_url": "http://a.com"}),
        ai_record("John Roe", "College Admissions", "Arlington VA", "https://roeconsulting.com"),
        ai_record("Maria Lopez", "educational consultant", "Washington", "https://lopez.org"),
        json!({"bio": "Anonymous tutor", "source_url": "https://b.com"}),
        ai_record("Sam Lee", "Tutor", "DC", "https://samlee.com"),
        ai_record("Ana Park", "Consultant", "Bethesda MD", "https://anapark.com"),
    ]
}

#[tokio::test]
async fn test_ai_mode_caps_results() {
    init_tracing();
    let (discovery, searcher, _) = TestScenario::new()
        .with_search_results(seven_records())
        .build();

    let request = AiSearchRequest::new("user-1", "educational consultant", "Washington DC")
        .with_max_results(5);
    let result = discovery.discover(&request.into()).await;

    assert!(result.success);
    assert_eq!(result.source, ProspectSource::AiSearch);
    assert!(result.total_found <= 5);
    assert_eq!(result.total_found, result.prospects.len());
    assert_eq!(result.search_query_used, "educational consultant in Washington DC");
    assert_eq!(searcher.calls(), vec![("educational consultant in Washington DC".to_string(), 5)]);

    // The nameless records among the first five are dropped
    let names: Vec<_> = result.prospects.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Jane Doe", "John Roe", "Maria Lopez"]);
}

#[tokio::test]
async fn test_ai_mode_scores_against_criteria() {
    let (discovery, _, _) = TestScenario::new()
        .with_search_results(vec![json!({
            "name": "Jane Doe",
            "specialty": "Educational Consultant, college essays",
            "location": "Washington DC",
            "source_url": "https://capitoladvising.com/jane",
            "bio": "Jane works with high school students across the District.",
            "email": "jane@capitoladvising.com"
        })])
        .build();

    let request = AiSearchRequest::new("user-1", "Educational Consultant", "Washington DC")
        .with_context("works with high school students");
    let result = discovery.discover(&request.into()).await;

    let jane = &result.prospects[0];
    assert_eq!(jane.fit_score, 100);
    assert_eq!(jane.specialty, vec!["Educational Consultant", "college essays"]);
    assert_eq!(jane.contact.email.as_deref(), Some("jane@capitoladvising.com"));
    assert_eq!(jane.contact.website, None);
    assert_eq!(
        result.search_query_used,
        "Educational Consultant in Washington DC (works with high school students)"
    );
}

#[tokio::test]
async fn test_provider_outage() {
    let (discovery, _, _) = TestScenario::new()
        .with_search_failure(MockSearchFailure::Unavailable)
        .build();

    let request = AiSearchRequest::new("user-1", "educational consultant", "Washington DC");
    let result = discovery.discover(&request.into()).await;

    assert!(!result.success);
    assert!(result.prospects.is_empty());
    assert_eq!(result.total_found, 0);
    assert!(!result.error.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_ai_duplicates_collapse() {
    let (discovery, _, _) = TestScenario::new()
        .with_search_results(vec![
            ai_record("Jane Doe", "Tutor", "DC", "https://a.com/1"),
            json!({"name": "JANE  DOE", "source_url": "https://www.a.com/2", "phone": "202-555-0143"}),
            ai_record("Jane Doe", "Tutor", "DC", "https://b.com"),
        ])
        .build();

    let request = AiSearchRequest::new("user-1", "Tutor", "DC");
    let result = discovery.discover(&request.into()).await;

    assert_eq!(result.total_found, 2);
    assert_eq!(result.prospects[0].contact.phone.as_deref(), Some("202-555-0143"));
    assert_eq!(result.prospects[1].source_url, "https://b.com");
}

#[tokio::test]
async fn test_url_mode_second_url_fails() {
    init_tracing();
    let (discovery, _, fetcher) = TestScenario::new()
        .with_page(profile_page("https://a.com/jane", "Jane Doe", "Educational consultant."))
        .with_fetch_failure("https://b.com/team", MockFetchFailure::Status(500))
        .with_page(profile_page("https://c.com/john", "John Roe - Tutor", "Call 202-555-0143"))
        .build();

    let request = UrlScrapeRequest::new(
        "user-1",
        ["https://a.com/jane", "https://b.com/team", "https://c.com/john"],
    );
    let result = discovery.discover(&request.into()).await;

    assert!(result.success);
    assert_eq!(result.source, ProspectSource::UrlScrape);
    assert_eq!(result.total_found, 2);
    let urls: Vec<_> = result.prospects.iter().map(|p| p.source_url.as_str()).collect();
    assert_eq!(urls, vec!["https://a.com/jane", "https://c.com/john"]);
    assert_eq!(result.prospects[1].name, "John Roe");
    assert_eq!(result.prospects[1].fit_score, 55);
    assert_eq!(result.skipped.len(), 1);
    assert_eq!(result.skipped[0].url, "https://b.com/team");
    assert!(result.error.is_none());
    assert_eq!(fetcher.call_count(), 3);
    assert!(result.search_query_used.starts_with("3 URLs: "));
}

#[tokio::test]
async fn test_url_mode_order_survives_out_of_order_completion() {
    let (discovery, _, _) = TestScenario::new()
        .with_page(profile_page("https://a.com/slow", "Slow Person", "slow"))
        .with_fetch_delay("https://a.com/slow", Duration::from_millis(100))
        .with_page(profile_page("https://a.com/mid", "Mid Person", "mid"))
        .with_fetch_delay("https://a.com/mid", Duration::from_millis(30))
        .with_page(profile_page("https://a.com/fast", "Fast Person", "fast"))
        .build();

    let request = UrlScrapeRequest::new(
        "user-1",
        ["https://a.com/slow", "https://a.com/mid", "https://a.com/fast"],
    );
    let result = discovery.discover(&request.into()).await;

    let names: Vec<_> = result.prospects.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Slow Person", "Mid Person", "Fast Person"]);
}

#[tokio::test]
async fn test_url_mode_all_fail_is_still_success() {
    let (discovery, _, _) = TestScenario::new().build();

    let request = UrlScrapeRequest::new("user-1", ["https://a.com/1", "https://a.com/2"]);
    let result = discovery.discover(&request.into()).await;

    assert!(result.success);
    assert_eq!(result.total_found, 0);
    assert_eq!(result.skipped.len(), 2);
    assert!(result.error.unwrap().contains("failed to fetch"));
}

#[tokio::test]
async fn test_url_mode_rejects_bad_urls_without_fetching() {
    let (discovery, _, fetcher) = TestScenario::new().build();

    let request = UrlScrapeRequest::new("user-1", ["https://a.com", "ftp://files.example.com"]);
    let result = discovery.discover(&request.into()).await;

    assert!(!result.success);
    assert!(result.error.is_some());
    assert_eq!(fetcher.call_count(), 0);
}

#[tokio::test]
async fn test_url_mode_respects_max_urls() {
    let (discovery, _, fetcher) = TestScenario::new()
        .with_config(DiscoveryConfig::default().with_max_urls(2))
        .build();

    let request =
        UrlScrapeRequest::new("user-1", ["https://a.com/1", "https://a.com/2", "https://a.com/3"]);
    let result = discovery.discover(&request.into()).await;

    assert!(!result.success);
    assert_eq!(fetcher.call_count(), 0);
}

#[tokio::test]
async fn test_ai_mode_rejects_excess_max_results() {
    let (discovery, searcher, _) = TestScenario::new().build();

    let request = AiSearchRequest::new("user-1", "Tutor", "DC").with_max_results(500);
    let result = discovery.discover(&request.into()).await;

    assert!(!result.success);
    assert_eq!(searcher.call_count(), 0);
}

#[tokio::test]
async fn test_cancellation_stops_new_fetches() {
    let (discovery, _, fetcher) = TestScenario::new()
        .with_config(DiscoveryConfig::default().with_scrape_concurrency(1))
        .with_page(profile_page("https://a.com/1", "Jane Doe", "one"))
        .with_fetch_delay("https://a.com/1", Duration::from_millis(100))
        .with_page(profile_page("https://a.com/2", "John Roe", "two"))
        .build();

    let request: DiscoveryRequest =
        UrlScrapeRequest::new("user-1", ["https://a.com/1", "https://a.com/2"]).into();
    let token = CancellationToken::new();

    let (result, _) = tokio::join!(discovery.discover_with_cancel(&request, &token), async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        token.cancel();
    });

    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("discovery cancelled"));
    assert!(result.prospects.is_empty());
    assert_eq!(fetcher.call_count(), 1);
}

#[test]
fn test_request_wire_format() {
    let request: DiscoveryRequest = assert_ok!(serde_json::from_value(json!({
        "mode": "ai_search",
        "user_id": "user-1",
        "specialty": "Tutor",
        "location": "DC"
    })));
    match request {
        DiscoveryRequest::AiSearch(ref ai) => {
            assert_eq!(ai.max_results, None);
            assert_eq!(ai.max_results_or_default(&DiscoveryConfig::default()), 10);
        }
        _ => panic!("expected AI search request"),
    }

    let bad: Result<DiscoveryRequest, _> = serde_json::from_value(json!({"mode": "carrier_pigeon"}));
    assert_err!(bad);
}

#[tokio::test]
async fn test_result_wire_format() {
    let (discovery, _, _) = TestScenario::new()
        .with_search_results(vec![ai_record("Jane Doe", "Tutor", "DC", "https://a.com")])
        .build();
    let result = discovery
        .discover(&AiSearchRequest::new("user-1", "Tutor", "DC").into())
        .await;

    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["success"], true);
    assert_eq!(value["source"], "ai_search");
    assert_eq!(value["total_found"], 1);
    assert_eq!(value["prospects"][0]["source"], "ai_search");
    assert!(value.get("error").is_none());
}

#[test]
fn test_config_defaults_are_valid() {
    assert_ok!(DiscoveryConfig::default().validate());
    assert_err!(DiscoveryConfig::default().with_scrape_concurrency(0).validate());
}

fn arb_prospect() -> impl Strategy<Value = Prospect> {
    (
        prop::sample::select(vec!["Jane Doe", "jane doe", " JANE  DOE ", "John Roe"]),
        prop::sample::select(vec!["https://a.com/1", "https://www.a.com/2", "https://b.com"]),
        any::<bool>(),
        any::<bool>(),
        0u8..=100,
    )
        .prop_map(|(name, url, email, phone, fit_score)| Prospect {
            name: name.to_string(),
            title: None,
            organization: None,
            specialty: vec![],
            location: None,
            source_url: url.to_string(),
            source: ProspectSource::AiSearch,
            contact: ContactInfo {
                email: email.then(|| "jane@a.com".to_string()),
                phone: phone.then(|| "202-555-0143".to_string()),
                website: None,
            },
            fit_score,
        })
}

proptest! {
    #[test]
    fn fit_score_always_in_range(
        specialty in "[a-zA-Z ]{0,20}",
        location in "[a-zA-Z ]{0,20}",
        context in proptest::option::of("[a-z ]{0,30}"),
        candidate_specialty in prop::collection::vec("[a-zA-Z ]{0,15}", 0..3),
        candidate_location in proptest::option::of("[a-zA-Z ]{0,15}"),
        raw_text in ".{0,60}",
        has_name in any::<bool>(),
        has_email in any::<bool>(),
    ) {
        let scorer = FitScorer::new(ScoringCriteria::new(&specialty, &location, context.as_deref()));
        let contact = ContactInfo {
            email: has_email.then(|| "jane@a.com".to_string()),
            ..Default::default()
        };
        let score = scorer.score(&ScoreInput {
            has_name,
            specialty: &candidate_specialty,
            location: candidate_location.as_deref(),
            raw_text: &raw_text,
            contact: &contact,
        });
        prop_assert!(score <= 100);
        if has_name {
            prop_assert!(score >= 50);
        } else {
            prop_assert_eq!(score, 0);
        }
    }

    #[test]
    fn dedupe_is_idempotent(prospects in prop::collection::vec(arb_prospect(), 0..12)) {
        let once = dedupe_prospects(prospects);
        let twice = dedupe_prospects(once.clone());
        prop_assert_eq!(&once, &twice);

        let keys: HashSet<_> = once.iter().map(Prospect::dedupe_key).collect();
        prop_assert_eq!(keys.len(), once.len());
    }

    #[test]
    fn nameless_candidates_never_survive(
        specialty in "[a-z]{1,10}",
        bio in "[a-z ]{0,40}",
    ) {
        let candidate = RawCandidate::from_json(
            ProspectSource::AiSearch,
            json!({"specialty": [specialty], "bio": bio, "source_url": "http://a.com"}),
        );
        let out = ProspectNormalizer::default()
            .normalize_all(&[candidate], &CancellationToken::new())
            .unwrap();
        prop_assert!(out.is_empty());
    }
}
