use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Page size PokeAPI uses when no `limit` is given.
pub const DEFAULT_LIMIT: usize = 20;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PokemonRecord {
    pub id: u32,
    pub name: String,
    pub weight: u32,
    pub species: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SpeciesRecord {
    pub id: u32,
    pub name: String,
    pub egg_groups: Vec<u32>,
    pub varieties: Vec<u32>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EggGroupRecord {
    pub id: u32,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TypeRecord {
    pub id: u32,
    pub name: String,
    pub pokemon: Vec<u32>,
}

/// Flat, id-linked records the server renders into PokeAPI-shaped JSON.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub pokemon: Vec<PokemonRecord>,
    pub species: Vec<SpeciesRecord>,
    pub egg_groups: Vec<EggGroupRecord>,
    pub types: Vec<TypeRecord>,
}

impl Dataset {
    /// The bundled first-generation sample in `fixtures/pokeapi.json`.
    pub fn fixture() -> Self {
        serde_json::from_str(include_str!("../fixtures/pokeapi.json"))
            .expect("bundled fixture is valid JSON")
    }

    fn pokemon_by_id(&self, id: u32) -> Option<&PokemonRecord> {
        self.pokemon.iter().find(|p| p.id == id)
    }

    fn pokemon_by_key(&self, key: &str) -> Option<&PokemonRecord> {
        match key.parse::<u32>() {
            Ok(id) => self.pokemon_by_id(id),
            Err(_) => self.pokemon.iter().find(|p| p.name == key),
        }
    }
}

/// Shared server state: the dataset, the externally visible base URL used to
/// build resource links, and the injected faults keyed by request path.
#[derive(Clone, Debug)]
pub struct MockState {
    data: Arc<Dataset>,
    base_url: String,
    faults: Arc<RwLock<HashMap<String, u16>>>,
}

impl MockState {
    pub fn new(data: Dataset, base_url: &str) -> Self {
        Self {
            data: Arc::new(data),
            base_url: base_url.trim_end_matches('/').to_string(),
            faults: Arc::default(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Make every request to `path` (e.g. `/api/v2/egg-group/5/`) answer with
    /// `status`. Trailing slashes are ignored when matching.
    pub fn fail_with(&self, path: &str, status: u16) {
        self.faults
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(normalize(path).to_string(), status);
    }

    pub fn clear_faults(&self) {
        self.faults
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn fault_for(&self, path: &str) -> Option<u16> {
        self.faults
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(normalize(path))
            .copied()
    }

    fn link(&self, segment: &str, id: u32) -> String {
        format!("{}/{segment}/{id}/", self.base_url)
    }
}

fn normalize(path: &str) -> &str {
    path.trim_end_matches('/')
}

#[derive(Deserialize)]
pub struct ListParams {
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: usize,
}

pub fn app(state: MockState) -> Router {
    Router::new()
        .route("/api/v2/pokemon", get(list_pokemon))
        .route("/api/v2/pokemon/", get(list_pokemon))
        .route("/api/v2/pokemon/{key}", get(get_pokemon))
        .route("/api/v2/pokemon/{key}/", get(get_pokemon))
        .route("/api/v2/pokemon-species/{id}", get(get_species))
        .route("/api/v2/pokemon-species/{id}/", get(get_species))
        .route("/api/v2/egg-group/{id}", get(get_egg_group))
        .route("/api/v2/egg-group/{id}/", get(get_egg_group))
        .route("/api/v2/type", get(list_types))
        .route("/api/v2/type/", get(list_types))
        .route("/api/v2/type/{id}", get(get_type))
        .route("/api/v2/type/{id}/", get(get_type))
        .layer(middleware::from_fn_with_state(state.clone(), inject_faults))
        .with_state(state)
}

/// Serve the bundled fixture, linking resources to the listener's address.
pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    let state = MockState::new(Dataset::fixture(), &format!("http://{addr}/api/v2"));
    serve(listener, state).await
}

pub async fn serve(listener: TcpListener, state: MockState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}

async fn inject_faults(State(state): State<MockState>, request: Request, next: Next) -> Response {
    match state.fault_for(request.uri().path()) {
        Some(code) => StatusCode::from_u16(code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response(),
        None => next.run(request).await,
    }
}

async fn list_pokemon(State(state): State<MockState>, Query(params): Query<ListParams>) -> Json<Value> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    let results: Vec<Value> = state
        .data
        .pokemon
        .iter()
        .skip(params.offset)
        .take(limit)
        .map(|p| json!({ "name": p.name, "url": state.link("pokemon", p.id) }))
        .collect();
    Json(json!({
        "count": state.data.pokemon.len(),
        "results": results,
    }))
}

async fn get_pokemon(State(state): State<MockState>, Path(key): Path<String>) -> Result<Json<Value>, StatusCode> {
    let pokemon = state.data.pokemon_by_key(&key).ok_or(StatusCode::NOT_FOUND)?;
    let species_name = state
        .data
        .species
        .iter()
        .find(|s| s.id == pokemon.species)
        .map(|s| s.name.clone())
        .unwrap_or_default();
    Ok(Json(json!({
        "id": pokemon.id,
        "name": pokemon.name,
        "weight": pokemon.weight,
        "species": { "name": species_name, "url": state.link("pokemon-species", pokemon.species) },
    })))
}

async fn get_species(State(state): State<MockState>, Path(id): Path<u32>) -> Result<Json<Value>, StatusCode> {
    let species = state
        .data
        .species
        .iter()
        .find(|s| s.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    let egg_groups: Vec<Value> = species
        .egg_groups
        .iter()
        .filter_map(|gid| state.data.egg_groups.iter().find(|g| g.id == *gid))
        .map(|g| json!({ "name": g.name, "url": state.link("egg-group", g.id) }))
        .collect();
    let varieties: Vec<Value> = species
        .varieties
        .iter()
        .enumerate()
        .filter_map(|(i, pid)| state.data.pokemon_by_id(*pid).map(|p| (i, p)))
        .map(|(i, p)| {
            json!({
                "is_default": i == 0,
                "pokemon": { "name": p.name, "url": state.link("pokemon", p.id) },
            })
        })
        .collect();
    Ok(Json(json!({
        "id": species.id,
        "name": species.name,
        "egg_groups": egg_groups,
        "varieties": varieties,
    })))
}

async fn get_egg_group(State(state): State<MockState>, Path(id): Path<u32>) -> Result<Json<Value>, StatusCode> {
    let group = state
        .data
        .egg_groups
        .iter()
        .find(|g| g.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    let members: Vec<Value> = state
        .data
        .species
        .iter()
        .filter(|s| s.egg_groups.contains(&id))
        .map(|s| json!({ "name": s.name, "url": state.link("pokemon-species", s.id) }))
        .collect();
    Ok(Json(json!({
        "id": group.id,
        "name": group.name,
        "pokemon_species": members,
    })))
}

async fn list_types(State(state): State<MockState>) -> Json<Value> {
    let results: Vec<Value> = state
        .data
        .types
        .iter()
        .map(|t| json!({ "name": t.name, "url": state.link("type", t.id) }))
        .collect();
    Json(json!({
        "count": state.data.types.len(),
        "results": results,
    }))
}

async fn get_type(State(state): State<MockState>, Path(id): Path<u32>) -> Result<Json<Value>, StatusCode> {
    let ty = state
        .data
        .types
        .iter()
        .find(|t| t.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    let members: Vec<Value> = ty
        .pokemon
        .iter()
        .filter_map(|pid| state.data.pokemon_by_id(*pid))
        .map(|p| {
            json!({
                "slot": 1,
                "pokemon": { "name": p.name, "url": state.link("pokemon", p.id) },
            })
        })
        .collect();
    Ok(Json(json!({
        "id": ty.id,
        "name": ty.name,
        "pokemon": members,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_parses_and_links_are_consistent() {
        let data = Dataset::fixture();
        assert_eq!(data.pokemon.len(), 15);
        for p in &data.pokemon {
            assert!(data.species.iter().any(|s| s.id == p.species), "{} has no species", p.name);
        }
        for s in &data.species {
            for g in &s.egg_groups {
                assert!(data.egg_groups.iter().any(|e| e.id == *g), "{} has unknown egg group", s.name);
            }
        }
        for t in &data.types {
            for pid in &t.pokemon {
                assert!(data.pokemon_by_id(*pid).is_some(), "type {} has unknown member", t.name);
            }
        }
    }

    #[test]
    fn pokemon_lookup_accepts_name_or_id() {
        let data = Dataset::fixture();
        assert_eq!(data.pokemon_by_key("26").unwrap().name, "raichu");
        assert_eq!(data.pokemon_by_key("raichu").unwrap().id, 26);
        assert!(data.pokemon_by_key("missingno").is_none());
    }

    #[test]
    fn faults_ignore_trailing_slash() {
        let state = MockState::new(Dataset::default(), "http://localhost/api/v2/");
        state.fail_with("/api/v2/type/", 502);
        assert_eq!(state.fault_for("/api/v2/type"), Some(502));
        state.clear_faults();
        assert_eq!(state.fault_for("/api/v2/type/"), None);
    }

    #[test]
    fn links_use_base_url_without_double_slash() {
        let state = MockState::new(Dataset::default(), "http://localhost/api/v2/");
        assert_eq!(state.base_url(), "http://localhost/api/v2");
        assert_eq!(state.link("egg-group", 5), "http://localhost/api/v2/egg-group/5/");
    }
}
