//! Collapsing duplicate groups into single records.

use std::collections::HashSet;

use crate::config::{DuplicateDetectionOptions, MergeStrategy};
use crate::models::{CandidateRecord, DuplicateGroup, MergedRecord};

use super::dedup::{group_indices, IndexGroup};
use super::identifiers::{normalize_doi, normalize_url};
use super::similarity::normalize_author_name;

/// Collapse one duplicate group into a single record
///
/// List fields are unioned across all members. Identifiers come from the
/// first member whose value normalizes. Citations, year, journal and abstract
/// follow the member preferred by the configured [`MergeStrategy`], falling back
/// to the next preferred member when a value is missing.
pub fn merge_duplicates(
    group: &DuplicateGroup,
    options: &DuplicateDetectionOptions,
) -> MergedRecord {
    let members: Vec<&CandidateRecord> = group.members().collect();
    MergedRecord {
        record: merge_members(&members, options.merge_strategy()),
        merged_from: group.len(),
        merge_confidence: group.confidence,
    }
}

/// Remove duplicates from a batch of records
///
/// Each duplicate group is replaced by its merged record at the primary's
/// position; all other records keep their relative order. The result is a
/// fixed point: running it again returns the same list.
pub fn remove_duplicates(
    records: &[CandidateRecord],
    options: &DuplicateDetectionOptions,
) -> Vec<CandidateRecord> {
    merge_all(records, options)
        .into_iter()
        .map(MergedRecord::into_record)
        .collect()
}

/// Like [`remove_duplicates`], keeping merge metadata for every output record
///
/// Records that had no duplicates come back with `merged_from == 1` and
/// `merge_confidence == 1.0`.
pub fn merge_all(
    records: &[CandidateRecord],
    options: &DuplicateDetectionOptions,
) -> Vec<MergedRecord> {
    let mut current: Vec<MergedRecord> = records
        .iter()
        .cloned()
        .map(MergedRecord::unmerged)
        .collect();

    // A merged record can newly match a survivor, so repeat until stable.
    // Every productive pass shrinks the list, which bounds the loop.
    let mut pass = 0;
    loop {
        let groups = group_indices(current.iter().map(|m| &m.record), options);
        if groups.is_empty() {
            return current;
        }

        pass += 1;
        let before = current.len();
        current = apply_groups(current, &groups, options.merge_strategy());
        tracing::debug!(
            "Merge pass {}: {} groups, {} -> {} records",
            pass,
            groups.len(),
            before,
            current.len()
        );
    }
}

fn apply_groups(
    current: Vec<MergedRecord>,
    groups: &[IndexGroup],
    strategy: MergeStrategy,
) -> Vec<MergedRecord> {
    let mut replacements: Vec<Option<MergedRecord>> = vec![None; current.len()];
    let mut absorbed = vec![false; current.len()];

    for group in groups {
        let members: Vec<&CandidateRecord> =
            group.indices.iter().map(|&i| &current[i].record).collect();
        let merged_from = group.indices.iter().map(|&i| current[i].merged_from).sum();
        let merge_confidence = group
            .indices
            .iter()
            .map(|&i| current[i].merge_confidence)
            .fold(group.link.confidence, f64::min);

        replacements[group.indices[0]] = Some(MergedRecord {
            record: merge_members(&members, strategy),
            merged_from,
            merge_confidence,
        });
        for &idx in &group.indices[1..] {
            absorbed[idx] = true;
        }
    }

    current
        .into_iter()
        .zip(replacements)
        .zip(absorbed)
        .filter_map(|((entry, replacement), absorbed)| {
            if absorbed {
                None
            } else {
                Some(replacement.unwrap_or(entry))
            }
        })
        .collect()
}

/// Members in preference order for the given strategy
///
/// Sorts are stable, so ties keep input order.
fn rank_members<'a>(
    members: &[&'a CandidateRecord],
    strategy: MergeStrategy,
) -> Vec<&'a CandidateRecord> {
    let mut ranked = members.to_vec();
    match strategy {
        MergeStrategy::KeepHighestQuality => {
            ranked.sort_by(|a, b| b.quality_score().total_cmp(&a.quality_score()));
        }
        MergeStrategy::KeepMostRecent => {
            ranked.sort_by_key(|m| std::cmp::Reverse(m.year));
        }
        MergeStrategy::KeepMostCitations => {
            ranked.sort_by_key(|m| std::cmp::Reverse(m.citations));
        }
    }
    ranked
}

fn first_present<T, F>(ranked: &[&CandidateRecord], field: F) -> Option<T>
where
    F: Fn(&CandidateRecord) -> Option<T>,
{
    ranked.iter().find_map(|m| field(*m))
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn merge_members(members: &[&CandidateRecord], strategy: MergeStrategy) -> CandidateRecord {
    let ranked = rank_members(members, strategy);

    let title = members
        .iter()
        .find(|m| m.has_title())
        .map(|m| m.title.clone())
        .unwrap_or_default();

    CandidateRecord {
        title,
        authors: union_authors(members),
        journal: first_present(&ranked, |m| non_blank(&m.journal)),
        year: first_present(&ranked, |m| m.year),
        citations: first_present(&ranked, |m| m.citations),
        doi: first_valid(members, |m| m.doi.as_deref(), normalize_doi),
        url: first_valid(members, |m| m.url.as_deref(), normalize_url),
        r#abstract: first_present(&ranked, |m| non_blank(&m.r#abstract)),
        keywords: union_case_insensitive(members.iter().flat_map(|m| m.keywords.iter())),
        topics: union_case_insensitive(members.iter().flat_map(|m| m.topics.iter())),
        confidence: max_finite(members.iter().map(|m| m.confidence)),
        relevance_score: max_finite(members.iter().map(|m| m.relevance_score)),
    }
}

/// First identifier, in member order, that survives normalization
fn first_valid<G, N>(members: &[&CandidateRecord], get: G, normalize: N) -> Option<String>
where
    G: Fn(&CandidateRecord) -> Option<&str>,
    N: Fn(&str) -> Option<String>,
{
    members
        .iter()
        .filter_map(|m| get(*m))
        .find(|raw| normalize(raw).is_some())
        .map(|raw| raw.trim().to_string())
}

/// Author union keyed on the normalized name, keeping the first surface form
fn union_authors(members: &[&CandidateRecord]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut authors = Vec::new();
    for name in members.iter().flat_map(|m| m.authors.iter()) {
        let key = normalize_author_name(name);
        if key.is_empty() {
            continue;
        }
        if seen.insert(key) {
            authors.push(name.clone());
        }
    }
    authors
}

fn union_case_insensitive<'a, I>(values: I) -> Vec<String>
where
    I: Iterator<Item = &'a String>,
{
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::new();
    for value in values {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            continue;
        }
        if seen.insert(trimmed.to_lowercase()) {
            out.push(value.clone());
        }
    }
    out
}

fn max_finite<I: Iterator<Item = f64>>(values: I) -> f64 {
    values.filter(|v| v.is_finite()).fold(0.0, f64::max)
}
