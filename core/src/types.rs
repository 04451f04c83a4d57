//! DTOs for the parts of PokeAPI responses the client reads.
//!
//! # Design
//! Only the consumed fields are modelled; serde ignores the rest, so the
//! upstream can grow without breaking parsing. These types are defined
//! independently from the mock-server's fixtures and the integration tests
//! catch drift between the two.

use serde::{Deserialize, Serialize};

/// A bare link to another resource.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceRef {
    pub url: String,
}

/// A named link, as found in listings and most nested references.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NamedResource {
    pub name: String,
    pub url: String,
}

/// A paginated listing (`/pokemon/`, `/type/`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceList {
    pub count: u64,
    pub results: Vec<NamedResource>,
}

/// The species link of a pokemon resource (`/pokemon/{name}`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PokemonSpeciesLink {
    pub species: ResourceRef,
}

/// The weight of a pokemon resource (`/pokemon/{id}/`), in hectograms.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PokemonWeight {
    pub weight: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Species {
    #[serde(default)]
    pub egg_groups: Vec<ResourceRef>,
    #[serde(default)]
    pub varieties: Vec<Variety>,
}

/// One concrete form of a species.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Variety {
    pub pokemon: NamedResource,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EggGroup {
    pub pokemon_species: Vec<NamedResource>,
}

/// A single type resource (`/type/{id}/`) and the pokemon that have it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PokemonType {
    pub pokemon: Vec<TypeMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TypeMember {
    pub pokemon: NamedResource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pokemon_views_ignore_unmodelled_fields() {
        let raw = r#"{
            "id": 26,
            "name": "raichu",
            "height": 8,
            "weight": 300,
            "species": {"name": "raichu", "url": "https://pokeapi.co/api/v2/pokemon-species/26/"},
            "types": []
        }"#;
        let weight: PokemonWeight = serde_json::from_str(raw).unwrap();
        assert_eq!(weight.weight, 300);
        let link: PokemonSpeciesLink = serde_json::from_str(raw).unwrap();
        assert_eq!(link.species.url, "https://pokeapi.co/api/v2/pokemon-species/26/");
    }

    #[test]
    fn species_link_does_not_need_weight() {
        let raw = r#"{"species": {"url": "https://pokeapi.co/api/v2/pokemon-species/26/"}}"#;
        let link: PokemonSpeciesLink = serde_json::from_str(raw).unwrap();
        assert!(link.species.url.ends_with("/26/"));
        assert!(serde_json::from_str::<PokemonWeight>(raw).is_err());
    }

    #[test]
    fn weight_does_not_need_species() {
        let weight: PokemonWeight = serde_json::from_str(r#"{"weight": 195}"#).unwrap();
        assert_eq!(weight.weight, 195);
    }

    #[test]
    fn weight_rejects_non_integer_value() {
        let raw = r#"{"species": {"url": "x"}, "weight": "heavy"}"#;
        assert!(serde_json::from_str::<PokemonWeight>(raw).is_err());
    }

    #[test]
    fn species_lists_default_to_empty() {
        let species: Species = serde_json::from_str("{}").unwrap();
        assert!(species.egg_groups.is_empty());
        assert!(species.varieties.is_empty());
    }

    #[test]
    fn type_members_are_nested_under_pokemon() {
        let raw = r#"{"pokemon": [{"slot": 1, "pokemon": {"name": "machop", "url": "https://pokeapi.co/api/v2/pokemon/66/"}}]}"#;
        let ty: PokemonType = serde_json::from_str(raw).unwrap();
        assert_eq!(ty.pokemon[0].pokemon.name, "machop");
    }
}
