//! End-to-end reads against the mock PokeAPI.
//!
//! # Design
//! Each test starts the mock server on a random port with the bundled
//! fixture, then drives `PokeApiClient` over real HTTP through the default
//! `UreqTransport`. Faults are injected per path to exercise the strict and
//! tolerant failure policies.

use std::collections::BTreeSet;
use std::fs;
use std::time::Duration;

use pokeapi_core::answers::{count_matching_names, interbreed_count, weight_extremes};
use pokeapi_core::{ApiError, ClientConfig, PokeApiClient, DEFAULT_MAX_ID};
use pokeapi_mock::{Dataset, MockState};
use tempfile::TempDir;

struct Harness {
    client: PokeApiClient,
    state: MockState,
    _tmp: TempDir,
}

impl Harness {
    fn log_entries(&self) -> usize {
        fs::read_to_string(self.client.log().path())
            .unwrap_or_default()
            .lines()
            .filter(|line| *line == "ERROR")
            .count()
    }
}

fn start() -> Harness {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    let base_url = format!("http://{addr}/api/v2");
    let state = MockState::new(Dataset::fixture(), &base_url);
    let server_state = state.clone();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            pokeapi_mock::serve(listener, server_state).await
        })
        .unwrap();
    });

    let tmp = tempfile::tempdir().unwrap();
    let config = ClientConfig::default()
        .with_base_url(base_url)
        .with_timeout(Duration::from_secs(5))
        .with_log_path(tmp.path().join("log/log_file"));
    let client = PokeApiClient::from_config(&config).unwrap();

    Harness {
        client,
        state,
        _tmp: tmp,
    }
}

#[test]
fn lists_every_name_in_server_order() {
    let h = start();

    let names = h.client.list_all_resource_names().unwrap();
    assert_eq!(names.len(), 15);
    assert_eq!(names[0], "rattata");
    assert_eq!(names[14], "lucario");
    assert_eq!(count_matching_names(&names), Some(1)); // raticate
    assert_eq!(h.log_entries(), 0);
    assert!(!h.client.log().path().parent().unwrap().exists());
}

#[test]
fn listing_is_unavailable_when_server_fails() {
    let h = start();
    h.state.fail_with("/api/v2/pokemon/", 502);

    let err = h.client.list_all_resource_names().unwrap_err();
    assert!(matches!(err, ApiError::BadGateway { .. }));
    assert_eq!(h.log_entries(), 1);
}

#[test]
fn raichu_interbreeds_across_ground_and_fairy() {
    let h = start();

    let names = h.client.interbreedable_species("raichu").unwrap();
    let expected: BTreeSet<String> = [
        "clefairy", "lucario", "mankey", "pikachu", "primeape", "raichu", "raticate", "rattata",
        "sandshrew",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    assert_eq!(names, expected);
    assert_eq!(interbreed_count(&names), Some(9));
}

#[test]
fn failed_egg_group_is_skipped() {
    let h = start();
    h.state.fail_with("/api/v2/egg-group/5/", 502);

    let names = h.client.interbreedable_species("raichu").unwrap();
    let expected: BTreeSet<String> = ["clefairy", "pikachu", "raichu"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(names, expected);
    assert_eq!(h.log_entries(), 1);
}

#[test]
fn unknown_pokemon_is_unavailable() {
    let h = start();

    let err = h.client.interbreedable_species("missingno").unwrap_err();
    assert!(matches!(err, ApiError::ResourceNotFound { .. }));
    assert_eq!(h.log_entries(), 1);
}

#[test]
fn fighting_weights_stop_at_first_generation() {
    let h = start();

    let weights = h.client.weights_for_type("fighting", DEFAULT_MAX_ID).unwrap();
    assert_eq!(weights, vec![280, 320, 195, 705, 1300, 498, 502]);
    assert_eq!(weight_extremes(&weights), Some([1300, 195]));

    let all = h.client.weights_for_type("fighting", 1000).unwrap();
    assert_eq!(all.last(), Some(&540));
}

#[test]
fn failed_weight_lookup_becomes_zero() {
    let h = start();
    h.state.fail_with("/api/v2/pokemon/68/", 502);

    let weights = h.client.weights_for_type("fighting", DEFAULT_MAX_ID).unwrap();
    assert_eq!(weights, vec![280, 320, 195, 705, 0, 498, 502]);
    assert_eq!(weight_extremes(&weights), Some([705, 0]));
    assert_eq!(h.log_entries(), 1);
}

#[test]
fn repeated_reads_match() {
    let h = start();

    assert_eq!(
        h.client.list_all_resource_names().unwrap(),
        h.client.list_all_resource_names().unwrap()
    );
    assert_eq!(
        h.client.weights_for_type("electric", DEFAULT_MAX_ID).unwrap(),
        h.client.weights_for_type("electric", DEFAULT_MAX_ID).unwrap()
    );
}

#[test]
fn unreachable_upstream_is_unexpected_error() {
    let tmp = tempfile::tempdir().unwrap();
    let config = ClientConfig::default()
        .with_base_url("http://127.0.0.1:1/api/v2")
        .with_timeout(Duration::from_secs(2))
        .with_log_path(tmp.path().join("log/log_file"));
    let client = PokeApiClient::from_config(&config).unwrap();

    let err = client.weights_for_type("fighting", DEFAULT_MAX_ID).unwrap_err();
    assert!(matches!(err, ApiError::Transport { .. }));
    let log = fs::read_to_string(client.log().path()).unwrap();
    assert!(log.contains("Kind: UnexpectedError"));
}
