//! Duplicate detection for candidate records.
//!
//! Pairs are classified by a fixed rule order (DOI, URL, exact title and
//! authors, fuzzy match) and the positive pairs are closed transitively with
//! a disjoint-set over record indices.

use crate::config::DuplicateDetectionOptions;
use crate::models::{CandidateRecord, DuplicateGroup, MatchStrategy, PairMatch};

use super::identifiers::{normalize_doi, normalize_url};
use super::similarity::{
    normalize_title, normalized_similarity, parse_names, parsed_list_similarity, ParsedName,
};

/// Title similarity a DOI match must reach when strict DOI matching is off
pub const DOI_TITLE_SANITY_BOUND: f64 = 0.5;

const DOI_CONFIDENCE: f64 = 1.0;
const URL_CONFIDENCE: f64 = 0.95;
const TITLE_AUTHOR_CONFIDENCE: f64 = 1.0;

const FUZZY_TITLE_WEIGHT: f64 = 0.6;
const FUZZY_AUTHOR_WEIGHT: f64 = 0.4;

#[cfg(feature = "parallel")]
const PARALLEL_MIN_RECORDS: usize = 128;

/// Comparison keys derived once per record
#[derive(Debug)]
struct RecordKey {
    doi: Option<String>,
    url: Option<String>,
    exact_title: String,
    title: String,
    title_len: usize,
    authors: Vec<ParsedName>,
}

impl RecordKey {
    fn new(record: &CandidateRecord) -> Self {
        let title = normalize_title(&record.title);
        Self {
            doi: record.doi.as_deref().and_then(normalize_doi),
            url: record.url.as_deref().and_then(normalize_url),
            exact_title: record
                .title
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
                .to_lowercase(),
            title_len: title.chars().count(),
            title,
            authors: parse_names(&record.authors),
        }
    }

    /// Upper bound on [`RecordKey::title_similarity`] from the title lengths alone
    ///
    /// Jaro is at most `(2 + shorter / longer) / 3` and the Winkler prefix
    /// bonus adds at most `0.4 * (1 - jaro)`.
    fn title_similarity_bound(&self, other: &RecordKey) -> f64 {
        let (shorter, longer) = if self.title_len <= other.title_len {
            (self.title_len, other.title_len)
        } else {
            (other.title_len, self.title_len)
        };
        if longer == 0 {
            return 1.0;
        }
        let jaro = (2.0 + shorter as f64 / longer as f64) / 3.0;
        // Slack for float rounding at the threshold
        0.4 + 0.6 * jaro + 1e-9
    }

    fn title_similarity(&self, other: &RecordKey) -> f64 {
        normalized_similarity(&self.title, &other.title)
    }
}

/// Decide whether two records describe the same publication
///
/// Returns `None` when no rule fires.
pub fn classify_pair(
    a: &CandidateRecord,
    b: &CandidateRecord,
    options: &DuplicateDetectionOptions,
) -> Option<PairMatch> {
    classify_keys(&RecordKey::new(a), &RecordKey::new(b), options)
}

fn classify_keys(
    a: &RecordKey,
    b: &RecordKey,
    options: &DuplicateDetectionOptions,
) -> Option<PairMatch> {
    if let (Some(doi_a), Some(doi_b)) = (&a.doi, &b.doi) {
        if doi_a == doi_b
            && (options.strict_doi_matching()
                || a.title_similarity(b) >= DOI_TITLE_SANITY_BOUND)
        {
            return Some(PairMatch {
                confidence: DOI_CONFIDENCE,
                strategy: MatchStrategy::Doi,
            });
        }
    }

    if let (Some(url_a), Some(url_b)) = (&a.url, &b.url) {
        if url_a == url_b {
            return Some(PairMatch {
                confidence: URL_CONFIDENCE,
                strategy: MatchStrategy::Url,
            });
        }
    }

    // Blank titles never take part in the title rules
    if a.title.is_empty() || b.title.is_empty() {
        return None;
    }

    if a.exact_title == b.exact_title {
        let author_similarity = parsed_list_similarity(&a.authors, &b.authors);
        if author_similarity >= 1.0 {
            return Some(PairMatch {
                confidence: TITLE_AUTHOR_CONFIDENCE,
                strategy: MatchStrategy::TitleAuthor,
            });
        }
    }

    if !options.enable_fuzzy_matching() {
        return None;
    }

    // Family names are short, so authors are scored before the title
    let author_similarity = parsed_list_similarity(&a.authors, &b.authors);
    if author_similarity < options.author_similarity_threshold() {
        return None;
    }

    if a.title_similarity_bound(b) < options.title_similarity_threshold() {
        return None;
    }
    let title_similarity = a.title_similarity(b);
    if title_similarity < options.title_similarity_threshold() {
        return None;
    }

    let confidence =
        FUZZY_TITLE_WEIGHT * title_similarity + FUZZY_AUTHOR_WEIGHT * author_similarity;
    Some(PairMatch {
        confidence: confidence.clamp(0.0, 1.0),
        strategy: MatchStrategy::FuzzyMatch,
    })
}

/// A positive pair `(left, right)` with `left < right`
type Edge = (usize, usize, PairMatch);

fn row_edges<'a>(
    keys: &'a [RecordKey],
    i: usize,
    options: &'a DuplicateDetectionOptions,
) -> impl Iterator<Item = Edge> + 'a {
    ((i + 1)..keys.len())
        .filter_map(move |j| classify_keys(&keys[i], &keys[j], options).map(|m| (i, j, m)))
}

fn sequential_edges(keys: &[RecordKey], options: &DuplicateDetectionOptions) -> Vec<Edge> {
    (0..keys.len())
        .flat_map(|i| row_edges(keys, i, options))
        .collect()
}

#[cfg(feature = "parallel")]
fn pairwise_edges(keys: &[RecordKey], options: &DuplicateDetectionOptions) -> Vec<Edge> {
    if keys.len() < PARALLEL_MIN_RECORDS {
        return sequential_edges(keys, options);
    }

    use rayon::prelude::*;

    // collect() keeps row order, so the edge list matches the sequential one
    (0..keys.len())
        .into_par_iter()
        .flat_map_iter(|i| row_edges(keys, i, options))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn pairwise_edges(keys: &[RecordKey], options: &DuplicateDetectionOptions) -> Vec<Edge> {
    sequential_edges(keys, options)
}

/// Indices of one connected component plus its weakest primary link
#[derive(Debug, Clone)]
pub(crate) struct IndexGroup {
    pub indices: Vec<usize>,
    pub link: PairMatch,
}

/// Group records by the transitive closure of [`classify_pair`]
///
/// Each non-primary member is linked to the primary by their direct edge when
/// the pair was classified, otherwise by the first edge that unioned the
/// member into the component. A component's link is the weakest of those, the
/// earliest member winning ties. Components come back ordered by their first
/// index and hold their indices in ascending order.
pub(crate) fn group_indices<'a, I>(records: I, options: &DuplicateDetectionOptions) -> Vec<IndexGroup>
where
    I: IntoIterator<Item = &'a CandidateRecord>,
{
    let keys: Vec<RecordKey> = records.into_iter().map(RecordKey::new).collect();
    let n = keys.len();
    if n < 2 {
        return Vec::new();
    }

    // Edges arrive in (left, right) order
    let edges = pairwise_edges(&keys, options);
    tracing::debug!("Classified {} records: {} duplicate pairs", n, edges.len());

    let mut dsu = DisjointSet::new(n);
    let mut joined: Vec<Option<PairMatch>> = vec![None; n];
    for &(left, right, link) in &edges {
        if dsu.union(left, right).is_some() {
            tracing::trace!(
                "Joined records {} and {} via {} ({:.3})",
                left,
                right,
                link.strategy,
                link.confidence
            );
            joined[left].get_or_insert(link);
            joined[right].get_or_insert(link);
        }
    }

    let mut members: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut primary = vec![0; n];
    for idx in 0..n {
        let root = dsu.find(idx);
        if members[root].is_empty() {
            primary[root] = idx;
        }
        members[root].push(idx);
    }

    // The primary is the smallest index, so its direct edges have it on the left
    let mut direct: Vec<Option<PairMatch>> = vec![None; n];
    for &(left, right, link) in &edges {
        if primary[dsu.find(left)] == left {
            direct[right] = Some(link);
        }
    }

    let mut groups: Vec<IndexGroup> = members
        .into_iter()
        .filter(|indices| indices.len() > 1)
        .filter_map(|indices| {
            let link = indices[1..]
                .iter()
                .filter_map(|&idx| direct[idx].or(joined[idx]))
                .reduce(|weakest, link| {
                    if link.confidence < weakest.confidence {
                        link
                    } else {
                        weakest
                    }
                })?;
            Some(IndexGroup { indices, link })
        })
        .collect();
    groups.sort_by_key(|g| g.indices[0]);

    tracing::debug!("Found {} duplicate groups", groups.len());
    groups
}

/// Find duplicate groups in a batch of records
///
/// Each group's primary is its first record in input order; the other
/// members follow in input order. Records without duplicates are not
/// reported.
pub fn detect_duplicates(
    records: &[CandidateRecord],
    options: &DuplicateDetectionOptions,
) -> Vec<DuplicateGroup> {
    group_indices(records, options)
        .into_iter()
        .map(|group| DuplicateGroup {
            primary: records[group.indices[0]].clone(),
            duplicates: group.indices[1..]
                .iter()
                .map(|&i| records[i].clone())
                .collect(),
            confidence: group.link.confidence,
            merge_strategy: group.link.strategy,
            indices: group.indices,
        })
        .collect()
}

/// Union-find over record indices
struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    /// Merge the sets of `left` and `right`, returning the new root if they were apart
    fn union(&mut self, left: usize, right: usize) -> Option<usize> {
        let left_root = self.find(left);
        let right_root = self.find(right);

        if left_root == right_root {
            return None;
        }

        let left_rank = self.rank[left_root];
        let right_rank = self.rank[right_root];

        if left_rank < right_rank {
            self.parent[left_root] = right_root;
            Some(right_root)
        } else if left_rank > right_rank {
            self.parent[right_root] = left_root;
            Some(left_root)
        } else {
            self.parent[right_root] = left_root;
            self.rank[left_root] += 1;
            Some(left_root)
        }
    }
}
