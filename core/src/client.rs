//! Blocking PokeAPI client and the three aggregate read operations.
//!
//! # Design
//! Every request goes through `request_url`, which classifies the status
//! code, writes any failure to the `ErrorLog` exactly once, and hands back a
//! typed `Result`. Higher-level operations only propagate with `?`; they
//! never log a request failure a second time.
//!
//! Required hops (listing, pokemon, species, type) are strict: one failure
//! makes the whole operation unavailable. Independent branches fanned out by
//! `fetch_each` are tolerant: a failed egg-group contributes nothing to the
//! union, and a failed weight lookup is recorded as `0`.

use std::collections::BTreeSet;

use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::{ApiError, ConfigError};
use crate::http::{HttpRequest, HttpResponse, Transport, UreqTransport};
use crate::log::ErrorLog;
use crate::types::{EggGroup, PokemonSpeciesLink, PokemonType, PokemonWeight, ResourceList, Species};

const POKEMON: &str = "pokemon";
const TYPE: &str = "type";

/// Highest national-dex id of the first generation.
pub const DEFAULT_MAX_ID: u32 = 151;

/// Extract the trailing numeric id from a resource URL such as
/// `https://pokeapi.co/api/v2/pokemon/25/`. One trailing slash is tolerated.
pub fn resource_id(url: &str) -> Result<u32, ApiError> {
    let trimmed = url.strip_suffix('/').unwrap_or(url);
    trimmed
        .rsplit('/')
        .next()
        .and_then(|segment| segment.parse().ok())
        .ok_or_else(|| ApiError::InvalidResourceUrl {
            url: url.to_string(),
        })
}

/// Synchronous client for the PokeAPI endpoints used here.
#[derive(Debug, Clone)]
pub struct PokeApiClient<T = UreqTransport> {
    base_url: String,
    transport: T,
    log: ErrorLog,
}

impl PokeApiClient<UreqTransport> {
    /// Build a client with a `ureq` transport and open its error log.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        let log = ErrorLog::open(&config.log_path).map_err(|source| ConfigError::Log {
            path: config.log_path.display().to_string(),
            source,
        })?;
        let transport = UreqTransport::new(config.timeout, &config.user_agent);
        Ok(Self::new(&config.base_url, transport, log))
    }
}

impl<T: Transport> PokeApiClient<T> {
    pub fn new(base_url: &str, transport: T, log: ErrorLog) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
            log,
        }
    }

    pub fn log(&self) -> &ErrorLog {
        &self.log
    }

    pub fn endpoint(&self, segment: &str) -> String {
        format!("{}/{segment}/", self.base_url)
    }

    pub fn build_get(&self, url: &str) -> HttpRequest {
        HttpRequest {
            url: url.to_string(),
            headers: vec![("accept".to_string(), "application/json".to_string())],
        }
    }

    /// GET `url` and classify the outcome. 2xx responses are returned as-is;
    /// every other outcome is logged once and returned as an error.
    pub fn request_url(&self, url: &str) -> Result<HttpResponse, ApiError> {
        tracing::debug!(url, "GET");
        let request = self.build_get(url);
        let result = match self.transport.execute(&request) {
            Ok(response) => check_status(url, response),
            Err(source) => Err(ApiError::Transport {
                url: url.to_string(),
                source,
            }),
        };
        result.map_err(|err| self.report(err))
    }

    /// `request_url` followed by JSON decoding into `D`.
    pub fn fetch_json<D: DeserializeOwned>(&self, url: &str) -> Result<D, ApiError> {
        let response = self.request_url(url)?;
        serde_json::from_str(&response.body).map_err(|e| {
            self.report(ApiError::Deserialization {
                url: url.to_string(),
                detail: e.to_string(),
            })
        })
    }

    /// Fetch independent resources in input order. Position `i` of the output
    /// always belongs to `urls[i]`, so a concurrent implementation can replace
    /// this without changing how callers aggregate.
    pub fn fetch_each<D, S>(&self, urls: &[S]) -> Vec<Result<D, ApiError>>
    where
        D: DeserializeOwned,
        S: AsRef<str>,
    {
        urls.iter().map(|url| self.fetch_json(url.as_ref())).collect()
    }

    /// Names of every pokemon, in server order.
    pub fn list_all_resource_names(&self) -> Result<Vec<String>, ApiError> {
        let url = self.endpoint(POKEMON);
        let probe: ResourceList = self.fetch_json(&format!("{url}?limit=1"))?;
        let all: ResourceList = self.fetch_json(&format!("{url}?limit={}", probe.count))?;
        Ok(all.results.into_iter().map(|entry| entry.name).collect())
    }

    /// Every species sharing at least one egg group with `name`'s species.
    pub fn interbreedable_species(&self, name: &str) -> Result<BTreeSet<String>, ApiError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ApiError::InvalidName);
        }

        let pokemon: PokemonSpeciesLink = self.fetch_json(&format!("{}{name}", self.endpoint(POKEMON)))?;
        let species: Species = self.fetch_json(&pokemon.species.url)?;
        let egg_group_urls: Vec<&str> = species.egg_groups.iter().map(|g| g.url.as_str()).collect();

        let mut names = BTreeSet::new();
        for group in self.fetch_each::<EggGroup, _>(&egg_group_urls).into_iter().flatten() {
            names.extend(group.pokemon_species.into_iter().map(|s| s.name));
        }
        Ok(names)
    }

    /// Weights of the pokemon of `type_name` whose id is at most `max_id`, in
    /// listing order. Lookups that fail are recorded as `0`.
    pub fn weights_for_type(&self, type_name: &str, max_id: u32) -> Result<Vec<u32>, ApiError> {
        let types: ResourceList = self.fetch_json(&self.endpoint(TYPE))?;
        let type_url = types
            .results
            .into_iter()
            .find(|entry| entry.name == type_name)
            .map(|entry| entry.url)
            .ok_or_else(|| {
                self.report(ApiError::TypeNotFound {
                    name: type_name.to_string(),
                })
            })?;

        let members: PokemonType = self.fetch_json(&type_url)?;
        let urls: Vec<String> = members
            .pokemon
            .into_iter()
            .map(|member| member.pokemon.url)
            .filter(|url| match resource_id(url) {
                Ok(id) => id <= max_id,
                Err(err) => {
                    self.report(err);
                    false
                }
            })
            .collect();

        let weights = self
            .fetch_each::<PokemonWeight, _>(&urls)
            .into_iter()
            .map(|pokemon| pokemon.map(|p| p.weight).unwrap_or(0))
            .collect();
        Ok(weights)
    }

    fn report(&self, err: ApiError) -> ApiError {
        if let Err(io_err) = self.log.append(err.kind(), &err.to_string()) {
            tracing::error!(
                path = %self.log.path().display(),
                error = %io_err,
                "could not write error log"
            );
        }
        err
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(url: &str, response: HttpResponse) -> Result<HttpResponse, ApiError> {
    match response.status {
        404 => Err(ApiError::ResourceNotFound {
            url: url.to_string(),
        }),
        502 => Err(ApiError::BadGateway {
            url: url.to_string(),
        }),
        _ if response.is_success() => Ok(response),
        status => Err(ApiError::UnexpectedStatus {
            url: url.to_string(),
            status,
            body: response.body,
        }),
    }
}
