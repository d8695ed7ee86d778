//! Rule-based domain name suggestions.
//!
//! Keywords are picked from the user's answers according to the category,
//! then combined with each other and with a small set of local flair words.
//! No network access happens here; availability is checked by the caller.

use crate::types::DomainCategory;
use crate::utils::is_valid_base_name;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

lazy_static::lazy_static! {
    static ref DISALLOWED: Regex = Regex::new(r"[^a-z0-9 ]").expect("valid pattern");
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").expect("valid pattern");
}

/// Suffix words appended to each keyword.
const FLAIR_WORDS: [&str; 7] = ["254", "ke", "hub", "pro", "zone", "base", "core"];

/// Default number of suggestions.
pub const DEFAULT_SUGGESTION_COUNT: usize = 6;

const SHORT_MAX_LEN: usize = 12;
const LONG_MAX_LEN: usize = 15;
const MIN_BASE_LEN: usize = 3;

/// How a personal site is named.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NameStyle {
    /// Built from the person's full name and initials
    #[default]
    RealName,
    /// Built from the first description word
    Brand,
}

/// Answers collected for the suggestion generator.
///
/// Only the fields relevant to `category` are read; the rest may stay empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionInput {
    pub category: DomainCategory,
    /// Legal or registered name
    pub name: String,
    pub description: String,
    pub location: String,

    pub business_type: String,
    pub style: String,

    pub level: String,
    pub faith_based: bool,

    pub name_style: NameStyle,
    pub full_name: String,
    pub initials: String,
    pub focus: String,

    pub org_type: String,

    /// Cap bases at 12 characters instead of 15
    pub prefer_short: bool,
}

impl SuggestionInput {
    pub fn new(category: DomainCategory) -> Self {
        Self {
            category,
            name: String::new(),
            description: String::new(),
            location: String::new(),
            business_type: String::new(),
            style: String::new(),
            level: String::new(),
            faith_based: false,
            name_style: NameStyle::default(),
            full_name: String::new(),
            initials: String::new(),
            focus: String::new(),
            org_type: String::new(),
            prefer_short: true,
        }
    }
}

/// Lowercase, turn anything outside `[a-z0-9 ]` into a space, collapse
/// whitespace and trim.
pub fn clean(input: &str) -> String {
    let lowered = input.to_lowercase();
    let replaced = DISALLOWED.replace_all(&lowered, " ");
    WHITESPACE_RUN.replace_all(&replaced, " ").trim().to_string()
}

/// Clean `input` and join its words into a single label.
pub fn to_brand(input: &str) -> String {
    clean(input).split(' ').collect()
}

/// Truncate to at most `max` characters.
pub fn squeeze(input: &str, max: usize) -> String {
    input.chars().take(max).collect()
}

/// Pick the keywords for a category. Empty entries are dropped.
pub fn build_keywords(input: &SuggestionInput) -> Vec<String> {
    let description = clean(&input.description);
    let tokens: Vec<&str> = description.split(' ').filter(|t| !t.is_empty()).collect();
    let token = |i: usize| tokens.get(i).copied().unwrap_or_default().to_string();

    let name = clean(&input.name);
    let location = clean(&input.location);

    let keywords = match input.category {
        DomainCategory::Company => vec![
            name,
            input.business_type.clone(),
            input.style.clone(),
            token(0),
            token(1),
            location,
        ],
        DomainCategory::School => vec![
            name,
            input.level.clone(),
            if input.faith_based { "catholic".to_string() } else { String::new() },
            "school".to_string(),
            location,
        ],
        DomainCategory::Personal => match input.name_style {
            NameStyle::RealName => vec![
                input.full_name.clone(),
                input.initials.clone(),
                input.focus.clone(),
                location,
            ],
            NameStyle::Brand => vec![
                token(0),
                "portfolio".to_string(),
                input.focus.clone(),
                location,
            ],
        },
        DomainCategory::Organization => vec![name, input.org_type.clone(), token(0), location],
        _ => vec![name, token(0), token(1), location],
    };

    keywords
        .into_iter()
        .filter(|k| !k.trim().is_empty())
        .collect()
}

/// Combine keywords into candidate base names, in generation order.
///
/// Adjacent keyword pairs come first, then for each keyword: the keyword
/// alone, the keyword with each flair word, and "go"/"get" prefixes.
pub fn patternize(keywords: &[String], prefer_short: bool) -> Vec<String> {
    let max_len = if prefer_short { SHORT_MAX_LEN } else { LONG_MAX_LEN };
    let cleaned: Vec<String> = keywords
        .iter()
        .map(|k| clean(k))
        .filter(|k| !k.is_empty())
        .collect();

    let mut raw = Vec::new();

    for pair in cleaned.windows(2) {
        raw.push(format!("{}{}", pair[0], pair[1]));
    }

    for keyword in &cleaned {
        raw.push(keyword.clone());
        for flair in FLAIR_WORDS {
            raw.push(format!("{} {}", keyword, flair));
        }
        raw.push(format!("go {}", keyword));
        raw.push(format!("get {}", keyword));
    }

    let mut seen = HashSet::new();
    raw.iter()
        .map(|candidate| squeeze(&to_brand(candidate), max_len))
        .filter(|base| base.len() >= MIN_BASE_LEN && is_valid_base_name(base))
        .filter(|base| seen.insert(base.clone()))
        .collect()
}

/// Generate up to `count` full domain names for the input's category.
///
/// # Example
///
/// ```rust
/// use domain_verify_lib::{generate_suggestions, DomainCategory, SuggestionInput};
///
/// let mut input = SuggestionInput::new(DomainCategory::Company);
/// input.name = "Jua Kali".to_string();
/// let names = generate_suggestions(&input, 3);
/// assert_eq!(names[0], "juakali.co.ke");
/// ```
pub fn generate_suggestions(input: &SuggestionInput, count: usize) -> Vec<String> {
    let extension = input.category.extension();
    let keywords = build_keywords(input);
    let mut seen = HashSet::new();

    patternize(&keywords, input.prefer_short)
        .into_iter()
        .map(|base| format!("{}{}", base, extension))
        .filter(|domain| seen.insert(domain.clone()))
        .take(count)
        .collect()
}
