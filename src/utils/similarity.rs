//! Title and author-name similarity.

use strsim::jaro_winkler;

/// Normalize a title for comparison
///
/// Lower-cases, turns punctuation into spaces and collapses whitespace.
pub fn normalize_title(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Similarity of two strings in `[0, 1]`
///
/// Jaro-Winkler over the normalized forms. The pair is put in a fixed order
/// before scoring so the result does not depend on argument order.
pub fn string_similarity(a: &str, b: &str) -> f64 {
    normalized_similarity(&normalize_title(a), &normalize_title(b))
}

/// Jaro-Winkler over strings that are already normalized
pub(crate) fn normalized_similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let (first, second) = if a <= b { (a, b) } else { (b, a) };
    jaro_winkler(first, second).clamp(0.0, 1.0)
}

/// An author name split into family name and given-name tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParsedName {
    pub family: String,
    pub given: Vec<String>,
}

impl ParsedName {
    /// Parse "Last, First", "First Last" or "Last FM" forms
    pub fn parse(raw: &str) -> Self {
        if let Some((family, given)) = raw.split_once(',') {
            return Self {
                family: tokens(family).join(" "),
                given: tokens(given),
            };
        }

        let original: Vec<&str> = raw
            .split(|c: char| !is_name_char(c))
            .filter(|t| !t.is_empty())
            .collect();

        match original.as_slice() {
            [] => Self {
                family: String::new(),
                given: Vec::new(),
            },
            [only] => Self {
                family: only.to_lowercase(),
                given: Vec::new(),
            },
            [first, rest @ ..] if rest.iter().all(|t| is_initials(t)) && !is_initials(first) => {
                // "Smith JA" style: family name first, initials trailing
                Self {
                    family: first.to_lowercase(),
                    given: rest.iter().map(|t| t.to_lowercase()).collect(),
                }
            }
            [given @ .., last] => Self {
                family: last.to_lowercase(),
                given: given.iter().map(|t| t.to_lowercase()).collect(),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.family.is_empty() && self.given.is_empty()
    }

    /// Space-joined tokens, family name first
    pub fn joined(&self) -> String {
        std::iter::once(self.family.as_str())
            .chain(self.given.iter().map(String::as_str))
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Similarity to another parsed name in `[0, 1]`
    pub fn similarity(&self, other: &ParsedName) -> f64 {
        if self.family.is_empty() || other.family.is_empty() {
            return 0.0;
        }

        let family = normalized_similarity(&self.family, &other.family);
        match given_similarity(&self.given, &other.given) {
            Some(given) => family * (0.5 + 0.5 * given),
            None => family,
        }
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '\''
}

fn tokens(part: &str) -> Vec<String> {
    part.split(|c: char| !is_name_char(c))
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Upper-case initials such as "J" or "JA"
fn is_initials(token: &str) -> bool {
    let count = token.chars().count();
    ((1..=3).contains(&count) && token.chars().all(char::is_uppercase))
        || (count == 1 && token.chars().all(char::is_alphabetic))
}

/// Compare the leading given names, `None` when either side has none
fn given_similarity(a: &[String], b: &[String]) -> Option<f64> {
    let first_a = a.first()?;
    let first_b = b.first()?;

    if first_a.chars().next() != first_b.chars().next() {
        return Some(0.0);
    }
    if first_a.chars().count() == 1 || first_b.chars().count() == 1 {
        return Some(1.0);
    }

    Some(normalized_similarity(first_a, first_b))
}

/// Normalize an author name into space-joined tokens, family name first
///
/// "Smith, J." and "J. Smith" both become `"smith j"`.
pub fn normalize_author_name(raw: &str) -> String {
    ParsedName::parse(raw).joined()
}

/// Similarity of two author names in `[0, 1]`
///
/// Family names are scored with Jaro-Winkler. Given names only need
/// compatible initials, so "Smith, John" and "Smith, J." score 1.0.
pub fn author_name_similarity(a: &str, b: &str) -> f64 {
    ParsedName::parse(a).similarity(&ParsedName::parse(b))
}

/// Similarity of two author lists in `[0, 1]`
///
/// Each name of the shorter list is paired with its best match in the longer
/// list and the scores are averaged. A truncated author list therefore still
/// scores 1.0 against the full one. Returns 0.0 when either list is empty.
pub fn author_list_similarity<A, B>(a: &[A], b: &[B]) -> f64
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    let parsed_a = parse_names(a);
    let parsed_b = parse_names(b);
    parsed_list_similarity(&parsed_a, &parsed_b)
}

pub(crate) fn parse_names<S: AsRef<str>>(names: &[S]) -> Vec<ParsedName> {
    names
        .iter()
        .map(|n| ParsedName::parse(n.as_ref()))
        .filter(|n| !n.is_empty())
        .collect()
}

pub(crate) fn parsed_list_similarity(a: &[ParsedName], b: &[ParsedName]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    match a.len().cmp(&b.len()) {
        std::cmp::Ordering::Less => best_match_average(a, b),
        std::cmp::Ordering::Greater => best_match_average(b, a),
        // Equal lengths: take the weaker direction so the score is symmetric
        std::cmp::Ordering::Equal => best_match_average(a, b).min(best_match_average(b, a)),
    }
}

fn best_match_average(shorter: &[ParsedName], longer: &[ParsedName]) -> f64 {
    let total: f64 = shorter
        .iter()
        .map(|name| {
            longer
                .iter()
                .map(|candidate| name.similarity(candidate))
                .fold(0.0, f64::max)
        })
        .sum();
    (total / shorter.len() as f64).clamp(0.0, 1.0)
}
