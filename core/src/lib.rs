//! Blocking client for the public PokeAPI.
//!
//! # Overview
//! `PokeApiClient` issues GET requests through a `Transport`, classifies the
//! status codes, and builds three aggregate reads on top: every pokemon name,
//! the species a pokemon can interbreed with, and the weights of a type's
//! first-generation members. Failures are written to an append-only
//! `ErrorLog` and surface as `Err(ApiError)`, meaning "unavailable".
//!
//! # Design
//! - Requests and responses are plain data (`HttpRequest`/`HttpResponse`);
//!   `UreqTransport` performs the real I/O and tests swap in a fake.
//! - The client is stateless apart from its log, so repeated reads against an
//!   unchanged upstream give identical results.
//! - DTOs model only the fields that are read; integration tests against the
//!   mock server catch schema drift.

pub mod answers;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod log;
pub mod types;

pub use client::{resource_id, PokeApiClient, DEFAULT_MAX_ID};
pub use config::{ClientConfig, ConfigOverrides};
pub use error::{ApiError, ConfigError, FailureKind};
pub use http::{HttpRequest, HttpResponse, Transport, TransportError, UreqTransport};
pub use log::{ErrorLog, DEFAULT_LOG_PATH};
pub use types::{
    EggGroup, NamedResource, PokemonSpeciesLink, PokemonType, PokemonWeight, ResourceList, ResourceRef,
    Species,
};
