//! Name normalization and the per-game name book.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::entities::GameType;

/// Normalize a participant name or event title.
///
/// Trims, collapses runs of whitespace to one space and title-cases each
/// word. Returns an empty string for blank input; callers must reject it.
///
/// ```
/// use kaartmiddag::event::normalize_name;
///
/// assert_eq!(normalize_name("  corry   VAN heeswijk "), "Corry Van Heeswijk");
/// assert_eq!(normalize_name("   "), "");
/// ```
pub fn normalize_name(raw: &str) -> String {
    raw.split_whitespace()
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case_word(word: &str) -> String {
    let lower = word.to_lowercase();
    let mut chars = lower.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    // Upper-casing may expand one char into several (e.g. "ß" -> "SS");
    // only the leading char of the expansion stays upper-case.
    let mut upper = first.to_uppercase();
    let mut out = String::with_capacity(lower.len());
    if let Some(head) = upper.next() {
        out.push(head);
    }
    for tail in upper {
        out.extend(tail.to_lowercase());
    }
    out.push_str(chars.as_str());
    out
}

fn contains_ignore_case(list: &[String], name: &str) -> bool {
    let wanted = name.to_lowercase();
    list.iter().any(|n| n.trim().to_lowercase() == wanted)
}

/// Names learned at registration that are not on the built-in lists
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct NameBook {
    #[serde(rename = "Jokeren", default)]
    pub jokeren: Vec<String>,
    #[serde(rename = "Rikken", default)]
    pub rikken: Vec<String>,
}

impl NameBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn names(&self, game: GameType) -> &[String] {
        match game {
            GameType::Jokeren => &self.jokeren,
            GameType::Rikken => &self.rikken,
        }
    }

    fn names_mut(&mut self, game: GameType) -> &mut Vec<String> {
        match game {
            GameType::Jokeren => &mut self.jokeren,
            GameType::Rikken => &mut self.rikken,
        }
    }

    /// Remember `name` for `game` unless it is already known.
    ///
    /// Returns `true` when the book changed.
    pub fn learn(&mut self, name: &str, game: GameType, builtin: &[String]) -> bool {
        let name = normalize_name(name);
        if name.is_empty()
            || contains_ignore_case(builtin, &name)
            || contains_ignore_case(self.names(game), &name)
        {
            return false;
        }

        self.names_mut(game).push(name);
        true
    }

    /// Built-in and learned names for a game, deduplicated case-insensitively
    /// (first spelling wins) and sorted alphabetically.
    pub fn suggestions(&self, game: GameType, builtin: &[String]) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut merged: Vec<String> = builtin
            .iter()
            .chain(self.names(game))
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty() && seen.insert(n.to_lowercase()))
            .collect();
        merged.sort_by_key(|n| n.to_lowercase());
        merged
    }
}

/// Built-in name lists, one per game
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct BuiltinNames {
    #[serde(rename = "Jokeren", default)]
    pub jokeren: Vec<String>,
    #[serde(rename = "Rikken", default)]
    pub rikken: Vec<String>,
}

impl BuiltinNames {
    pub fn for_game(&self, game: GameType) -> &[String] {
        match game {
            GameType::Jokeren => &self.jokeren,
            GameType::Rikken => &self.rikken,
        }
    }
}
