//! Column alias resolution.
//!
//! Source datasets name the same attribute inconsistently across files
//! ("Eleves_Pri", "Eleves_Prim", "eleves_pri"...). The alias table maps a
//! canonical name to its known variants and resolves against whatever
//! columns a dataset actually has. Tolerance is configuration, never
//! inference: only listed variants match, with an optional case-insensitive
//! comparison.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configured synonym table for canonical column names.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AliasTable {
    /// canonical name -> known variants, in match-priority order
    #[serde(default)]
    aliases: HashMap<String, Vec<String>>,

    /// Compare candidate and column names case-insensitively.
    #[serde(default)]
    pub case_insensitive: bool,
}

impl AliasTable {
    pub fn new(aliases: HashMap<String, Vec<String>>, case_insensitive: bool) -> Self {
        Self { aliases, case_insensitive }
    }

    /// Candidate column names for a canonical name. The canonical name
    /// itself is always the first candidate.
    fn candidates<'a>(&'a self, canonical: &'a str) -> impl Iterator<Item = &'a str> {
        std::iter::once(canonical).chain(
            self.aliases
                .get(canonical)
                .into_iter()
                .flatten()
                .map(String::as_str)
                .filter(move |v| *v != canonical),
        )
    }

    /// Return the first configured variant present in `columns`, or `None`
    /// when no variant matches. Never errors: an unresolved metric is
    /// excluded by the caller, not raised.
    pub fn resolve(&self, canonical: &str, columns: &[String]) -> Option<String> {
        for candidate in self.candidates(canonical) {
            let found = columns.iter().find(|col| {
                if self.case_insensitive {
                    col.eq_ignore_ascii_case(candidate)
                } else {
                    col.as_str() == candidate
                }
            });
            if let Some(col) = found {
                return Some(col.clone());
            }
        }
        None
    }
}
