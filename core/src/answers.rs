//! The three summary answers computed from client results.
//!
//! Each returns `None` when there is nothing meaningful to report, which the
//! CLI prints the same way as an unavailable upstream.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::{Regex, RegexBuilder};

pub const INTERBREED_SUBJECT: &str = "raichu";
pub const WEIGHT_TYPE: &str = "fighting";

fn contains_at() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        RegexBuilder::new("at")
            .case_insensitive(true)
            .build()
            .expect("static pattern is valid")
    })
}

/// Names containing "at" (any case) and exactly two lowercase `a`s. An empty
/// listing has no answer.
pub fn count_matching_names<S: AsRef<str>>(names: &[S]) -> Option<usize> {
    if names.is_empty() {
        return None;
    }
    let count = names
        .iter()
        .filter(|name| {
            let name = AsRef::<str>::as_ref(*name);
            contains_at().is_match(name) && name.matches('a').count() == 2
        })
        .count();
    Some(count)
}

pub fn interbreed_count(species: &BTreeSet<String>) -> Option<usize> {
    if species.is_empty() {
        None
    } else {
        Some(species.len())
    }
}

/// `[max, min]` of the weights.
pub fn weight_extremes(weights: &[u32]) -> Option<[u32; 2]> {
    let max = weights.iter().copied().max()?;
    let min = weights.iter().copied().min()?;
    Some([max, min])
}
