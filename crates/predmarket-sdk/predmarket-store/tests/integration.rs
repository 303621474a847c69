use predmarket_sdk::testing::valid_form;
use predmarket_sdk::{Category, MarketFormData, MarketId, MarketListing};
use predmarket_store::{MarketFilter, MarketSort, MarketStore, StoreError};

// ==================== Test Helpers ====================

fn listing(question: &str, end_date: &str, liquidity: &str, category: Category) -> MarketListing {
    let form = MarketFormData {
        question: question.to_string(),
        category,
        end_date: end_date.to_string(),
        initial_liquidity: liquidity.to_string(),
        ..valid_form()
    };
    MarketListing::from_form(&form).expect("valid listing")
}

fn seeded_store() -> (MarketStore, Vec<MarketId>) {
    let mut store = MarketStore::open_in_memory().unwrap();
    let ids = vec![
        store
            .ingest_listing(
                &listing("First?", "2030-03-01", "1", Category::Crypto),
                Some("0xaaa"),
            )
            .unwrap(),
        store
            .ingest_listing(
                &listing("Second?", "2030-01-01", "5", Category::Sports),
                Some("0xbbb"),
            )
            .unwrap(),
        store
            .ingest_listing(
                &listing("Third?", "2030-02-01", "0.25", Category::Crypto),
                None,
            )
            .unwrap(),
    ];
    (store, ids)
}

fn questions(infos: &[predmarket_store::MarketInfo]) -> Vec<&str> {
    infos.iter().map(|m| m.listing.question.as_str()).collect()
}

// ==================== Ingest ====================

#[test]
fn ingest_and_get() {
    let mut store = MarketStore::open_in_memory().unwrap();
    let l = listing("Will BTC hit 100k?", "2030-01-01", "0.5", Category::Crypto);
    let mid = store.ingest_listing(&l, Some("0xcreator")).unwrap();
    assert_eq!(mid, l.market_id(Some("0xcreator")));

    let info = store.get_market(&mid).unwrap().unwrap();
    assert_eq!(info.listing, l);
    assert_eq!(info.creator.as_deref(), Some("0xcreator"));
    assert!(!info.resolved);
    assert_eq!(info.winning_outcome, None);
    assert!(!info.created_at.is_empty());
}

#[test]
fn ingest_is_idempotent() {
    let mut store = MarketStore::open_in_memory().unwrap();
    let l = listing("Once?", "2030-01-01", "1", Category::Other);
    let a = store.ingest_listing(&l, Some("0xaaa")).unwrap();
    let b = store.ingest_listing(&l, Some("0xaaa")).unwrap();
    assert_eq!(a, b);
    assert_eq!(store.count_markets().unwrap(), 1);
}

#[test]
fn same_listing_from_two_creators() {
    let mut store = MarketStore::open_in_memory().unwrap();
    let l = listing("Twice?", "2030-01-01", "1", Category::Other);
    let a = store.ingest_listing(&l, Some("0xaaa")).unwrap();
    let b = store.ingest_listing(&l, Some("0xbbb")).unwrap();
    assert_ne!(a, b);
    assert_eq!(store.count_markets().unwrap(), 2);

    assert_eq!(
        store.get_market(&b).unwrap().unwrap().creator.as_deref(),
        Some("0xbbb")
    );
    let theirs = store
        .list_markets(&MarketFilter {
            creator: Some("0xbbb".into()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(theirs.len(), 1);
    assert_eq!(theirs[0].market_id, b);
}

#[test]
fn blank_outcomes_are_stored_verbatim() {
    let mut store = MarketStore::open_in_memory().unwrap();
    let form = MarketFormData {
        outcomes: vec!["Yes".into(), "No".into(), "".into()],
        ..valid_form()
    };
    let l = MarketListing::from_form(&form).unwrap();
    let mid = store.ingest_listing(&l, None).unwrap();
    let info = store.get_market(&mid).unwrap().unwrap();
    assert_eq!(info.listing.outcomes, vec!["Yes", "No", ""]);
}

#[test]
fn ingest_form_converts_and_rejects() {
    let mut store = MarketStore::open_in_memory().unwrap();
    let mid = store.ingest_form(&valid_form(), None).unwrap();
    let info = store.get_market(&mid).unwrap().unwrap();
    assert_eq!(info.listing.liquidity_wei.as_u128(), 500_000_000_000_000_000);

    let form = MarketFormData {
        initial_liquidity: "0".into(),
        ..valid_form()
    };
    let err = store.ingest_form(&form, None).unwrap_err();
    assert!(matches!(err, StoreError::Sdk(_)));
    assert_eq!(store.count_markets().unwrap(), 1);
}

#[test]
fn get_missing_market() {
    let mut store = MarketStore::open_in_memory().unwrap();
    assert!(store.get_market(&MarketId([0x11; 32])).unwrap().is_none());
}

// ==================== Listing ====================

#[test]
fn list_newest_first() {
    let (mut store, _) = seeded_store();
    let all = store.list_markets(&MarketFilter::default()).unwrap();
    assert_eq!(questions(&all), vec!["Third?", "Second?", "First?"]);
}

#[test]
fn list_ending_soon() {
    let (mut store, _) = seeded_store();
    let filter = MarketFilter {
        sort: MarketSort::EndingSoon,
        ..Default::default()
    };
    let all = store.list_markets(&filter).unwrap();
    assert_eq!(questions(&all), vec!["Second?", "Third?", "First?"]);
}

#[test]
fn list_most_liquidity_with_limit() {
    let (mut store, _) = seeded_store();
    let filter = MarketFilter {
        sort: MarketSort::MostLiquidity,
        limit: Some(2),
        ..Default::default()
    };
    let top = store.list_markets(&filter).unwrap();
    assert_eq!(questions(&top), vec!["Second?", "First?"]);
}

#[test]
fn list_filters() {
    let (mut store, _) = seeded_store();

    let crypto = store
        .list_markets(&MarketFilter {
            category: Some(Category::Crypto),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(questions(&crypto), vec!["Third?", "First?"]);

    let mine = store
        .list_markets(&MarketFilter {
            creator: Some("0xbbb".into()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(questions(&mine), vec!["Second?"]);

    let second_end = store.list_markets(&MarketFilter::default()).unwrap()[1]
        .listing
        .end_timestamp;
    let later = store
        .list_markets(&MarketFilter {
            ends_after: Some(second_end),
            sort: MarketSort::EndingSoon,
            ..Default::default()
        })
        .unwrap();
    assert_eq!(questions(&later), vec!["Third?", "First?"]);

    let earlier = store
        .list_markets(&MarketFilter {
            ends_before: Some(second_end + 1),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(questions(&earlier), vec!["Second?"]);
}

// ==================== Resolution ====================

#[test]
fn resolve_market_once() {
    let (mut store, ids) = seeded_store();
    let info = store.resolve_market(&ids[0], 1).unwrap();
    assert!(info.resolved);
    assert_eq!(info.winning_outcome, Some(1));

    let err = store.resolve_market(&ids[0], 0).unwrap_err();
    assert!(matches!(err, StoreError::AlreadyResolved(_)));

    let resolved = store
        .list_markets(&MarketFilter {
            resolved: Some(true),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(questions(&resolved), vec!["First?"]);

    let open = store
        .list_markets(&MarketFilter {
            resolved: Some(false),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(open.len(), 2);
}

#[test]
fn resolve_rejects_bad_outcome_and_unknown_market() {
    let (mut store, ids) = seeded_store();
    let err = store.resolve_market(&ids[1], 2).unwrap_err();
    assert!(matches!(err, StoreError::InvalidOutcome { index: 2, count: 2 }));

    let err = store.resolve_market(&MarketId([0x42; 32]), 0).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[test]
fn resolve_rejects_blank_outcome() {
    let mut store = MarketStore::open_in_memory().unwrap();
    let form = MarketFormData {
        outcomes: vec!["Yes".into(), "No".into(), "  ".into()],
        ..valid_form()
    };
    let mid = store.ingest_form(&form, None).unwrap();

    let err = store.resolve_market(&mid, 2).unwrap_err();
    assert!(matches!(err, StoreError::InvalidOutcome { index: 2, count: 3 }));
    assert!(!store.get_market(&mid).unwrap().unwrap().resolved);

    let info = store.resolve_market(&mid, 0).unwrap();
    assert_eq!(info.winning_outcome, Some(0));
}

// ==================== Persistence ====================

#[test]
fn reopen_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("markets.sqlite");
    let path = path.to_str().unwrap();

    let mid = {
        let mut store = MarketStore::open(path).unwrap();
        store
            .ingest_listing(&listing("Durable?", "2030-01-01", "2", Category::Technology), None)
            .unwrap()
    };

    let mut store = MarketStore::open(path).unwrap();
    let info = store.get_market(&mid).unwrap().unwrap();
    assert_eq!(info.listing.question, "Durable?");
    assert_eq!(info.listing.category, Category::Technology);
}
