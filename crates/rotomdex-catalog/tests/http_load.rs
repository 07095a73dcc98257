use rotomdex_catalog::{
    Catalog, CatalogConfig, CatalogLoader, HttpSource, JoinPolicy, LoadStatus,
};
use rotomdex_test_utils::mock_api::MockApi;
use std::time::Duration;

fn config(base_url: &str) -> CatalogConfig {
    CatalogConfig {
        base_url: base_url.to_string(),
        timeout_secs: 5,
        ..Default::default()
    }
}

fn names(catalog: &Catalog) -> Vec<String> {
    catalog.visible().iter().map(|e| e.name.clone()).collect()
}

#[test]
fn test_http_load_in_index_order() {
    let server = MockApi::kanto()
        .delay_item("bulbasaur", Duration::from_millis(300))
        .start();
    let loader = CatalogLoader::from_config(&config(server.base_url())).unwrap();

    let state = loader.load(4);

    assert_eq!(state.status, LoadStatus::Ready);
    let got: Vec<_> = state.entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(got, vec!["bulbasaur", "charmander", "charizard", "squirtle"]);
    assert_eq!(state.entries[0].categories, vec!["grass", "poison"]);
    assert_eq!(state.entries[2].categories, vec!["fire", "flying"]);
    assert_eq!(state.entries[1].id(), Some(4));
    assert!(state.entries[3]
        .image_ref
        .as_deref()
        .unwrap()
        .ends_with("/sprites/diamond-pearl/7.png"));
    // one index request plus one per entry
    assert_eq!(server.request_count(), 5);
}

#[test]
fn test_http_limit_larger_than_upstream() {
    let server = MockApi::kanto().start();
    let loader = CatalogLoader::from_config(&config(server.base_url())).unwrap();

    let state = loader.load(151);
    assert!(state.status.is_ready());
    assert_eq!(state.entries.len(), 6);
}

#[test]
fn test_http_sprite_fallback() {
    let server = MockApi::kanto().without_dp_sprite("pikachu").start();
    let loader = CatalogLoader::from_config(&config(server.base_url())).unwrap();

    let state = loader.load(6);
    let pikachu = state.entries.iter().find(|e| e.name == "pikachu").unwrap();
    assert!(pikachu
        .image_ref
        .as_deref()
        .unwrap()
        .ends_with("/sprites/default/25.png"));
}

#[test]
fn test_http_index_failure() {
    let server = MockApi::kanto().fail_index(500).start();
    let loader = CatalogLoader::from_config(&config(server.base_url())).unwrap();

    let catalog = Catalog::from_load(loader.load(6));

    assert!(catalog.entries().is_empty());
    assert!(catalog.visible().is_empty());
    let failure = catalog.status().failure().unwrap();
    assert!(failure.contains("HTTP 500"), "{failure}");
    assert_eq!(server.request_count(), 1);
}

#[test]
fn test_http_item_failure_all_or_nothing() {
    let server = MockApi::kanto().fail_item("charizard").start();
    let loader = CatalogLoader::from_config(&config(server.base_url())).unwrap();

    let state = loader.load(6);
    assert!(state.entries.is_empty());
    assert!(state.status.failure().unwrap().contains("charizard"));
    // every item was still requested
    assert_eq!(server.request_count(), 7);
}

#[test]
fn test_http_item_failure_partial() {
    let server = MockApi::kanto().fail_item("charizard").start();
    let config = CatalogConfig {
        join_policy: JoinPolicy::Partial,
        ..config(server.base_url())
    };
    let loader = CatalogLoader::from_config(&config).unwrap();

    let mut catalog = Catalog::from_load(loader.load(6));
    assert!(catalog.status().is_ready());
    assert_eq!(catalog.report().to_string(), "5 of 6 loaded");

    catalog.set_query("CHAR");
    assert_eq!(names(&catalog), vec!["charmander"]);
}

#[test]
fn test_http_timeout_is_item_failure() {
    let server = MockApi::kanto()
        .delay_item("squirtle", Duration::from_secs(3))
        .start();
    let config = CatalogConfig {
        timeout_secs: 1,
        join_policy: JoinPolicy::Partial,
        ..config(server.base_url())
    };
    let loader = CatalogLoader::from_config(&config).unwrap();

    let state = loader.load(6);
    assert_eq!(state.report.loaded, 5);
    assert_eq!(state.report.failures.len(), 1);
    assert_eq!(state.report.failures[0].name, "squirtle");
    assert!(
        state.report.failures[0].reason.contains("timed out"),
        "{}",
        state.report.failures[0].reason
    );
}

#[test]
fn test_http_unreachable_upstream() {
    // nothing listens on the discard port
    let config = CatalogConfig {
        base_url: "http://127.0.0.1:9/api/v2".into(),
        timeout_secs: 2,
        ..Default::default()
    };
    let state = CatalogLoader::from_config(&config).unwrap().load(3);
    assert!(state.entries.is_empty());
    assert!(matches!(state.status, LoadStatus::Failed(_)));
}

#[test]
fn test_http_source_rejects_bad_config() {
    let config = CatalogConfig {
        base_url: "pokeapi.co".into(),
        ..Default::default()
    };
    assert!(HttpSource::new(&config).is_err());
}
