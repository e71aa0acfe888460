// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Keyword-overlap scoring between a concept description and range table rows.
//!
//! # Algorithm
//!
//! The description is lowercased and split on anything that is not an ASCII
//! letter or digit; stop words and one-letter tokens are dropped, and repeats
//! count once. Each remaining token scores against a row at most once:
//!
//! * **2 points** when it matches one of the row's advisor keywords
//! * **1 point** when it matches a word of the row's label or description
//!
//! A token matches a term when they are equal, or when the term has at least
//! three characters and the token starts with it (`authentication` matches
//! `auth`). Scores are summed per row; the caller breaks ties by declaration order.

use crate::registry::SystemRange;
use std::collections::BTreeSet;

const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "for", "in", "of", "on", "or", "the", "to", "with",
];

const KEYWORD_WEIGHT: u32 = 2;
const DESCRIPTIVE_WEIGHT: u32 = 1;
const MIN_PREFIX_LEN: usize = 3;

/// A row's score plus the description tokens that earned it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeScore {
    pub score: u32,
    pub matched: Vec<String>,
}

pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|token| token.len() > 1 && !STOP_WORDS.contains(token))
        .map(str::to_string)
        .collect()
}

fn matches_term(token: &str, term: &str) -> bool {
    token == term || (term.len() >= MIN_PREFIX_LEN && token.starts_with(term))
}

pub fn score_range(tokens: &[String], row: &SystemRange) -> RangeScore {
    let descriptive: BTreeSet<String> = tokenize(row.label())
        .into_iter()
        .chain(tokenize(row.description()))
        .collect();

    let mut seen = BTreeSet::new();
    let mut score = 0;
    let mut matched = Vec::new();
    for token in tokens.iter().filter(|token| seen.insert(token.as_str())) {
        let weight = if row.keywords().iter().any(|k| matches_term(token, k)) {
            KEYWORD_WEIGHT
        } else if descriptive.iter().any(|d| matches_term(token, d)) {
            DESCRIPTIVE_WEIGHT
        } else {
            continue;
        };
        score += weight;
        matched.push(token.clone());
    }

    RangeScore { score, matched }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth_row() -> SystemRange {
        SystemRange::new("auth_system", 1000, 1999, "Authentication & Authorization")
            .unwrap()
            .with_keywords(["auth", "login", "permission", "role", "security"])
    }

    #[test]
    fn test_tokenize_drops_noise() {
        assert_eq!(
            tokenize("A new Payment-processing flow for the API!"),
            vec!["new", "payment", "processing", "flow", "api"]
        );
    }

    #[test]
    fn test_keyword_prefix_outweighs_description() {
        let comms = SystemRange::new("communication_events", 500, 599, "Inter-service Communication")
            .unwrap()
            .with_keywords(["message"]);
        let tokens = tokenize("authentication service");

        let auth = score_range(&tokens, &auth_row());
        let comm = score_range(&tokens, &comms);

        assert_eq!(auth.score, 2);
        assert_eq!(auth.matched, vec!["authentication"]);
        assert_eq!(comm.score, 1);
        assert_eq!(comm.matched, vec!["service"]);
    }

    #[test]
    fn test_repeated_tokens_count_once() {
        let infra = SystemRange::new("infrastructure", 2000, 3999, "Infrastructure & Containers")
            .unwrap()
            .with_keywords(["container"]);
        let tokens = tokenize("auth auth auth container");

        let auth = score_range(&tokens, &auth_row());
        assert_eq!(auth.score, 2);
        assert_eq!(auth.matched, vec!["auth"]);
        assert_eq!(score_range(&tokens, &infra).score, 2);
    }

    #[test]
    fn test_label_words_score_without_keywords() {
        let payment = SystemRange::new("payment", 12000, 12099, "").unwrap();
        assert_eq!(score_range(&tokenize("payment"), &payment).score, 1);
        assert_eq!(score_range(&tokenize("shipping"), &payment).score, 0);
    }

    #[test]
    fn test_short_terms_need_exact_match() {
        let ml = SystemRange::new("ai_ml", 5000, 5999, "AI & Machine Learning")
            .unwrap()
            .with_keywords(["ai", "ml"]);
        assert_eq!(score_range(&tokenize("ai agent"), &ml).score, 2);
        assert_eq!(score_range(&tokenize("aid"), &ml).score, 0);
    }
}
