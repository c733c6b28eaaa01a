//! Integration tests for Scholar Dedup
//!
//! These tests exercise the public API end to end: normalization, grouping
//! and merging of candidate records.

use scholar_dedup::config::{DuplicateDetectionOptions, MergeStrategy};
use scholar_dedup::models::{CandidateRecord, MatchStrategy, RecordBuilder};
use scholar_dedup::utils::{
    author_list_similarity, detect_duplicates, merge_all, merge_duplicates, normalize_doi,
    normalize_url, remove_duplicates,
};
use std::time::{Duration, Instant};

fn options_with(strategy: MergeStrategy) -> DuplicateDetectionOptions {
    DuplicateDetectionOptions::builder()
        .merge_strategy(strategy)
        .build()
        .unwrap()
}

fn mixed_batch() -> Vec<CandidateRecord> {
    vec![
        RecordBuilder::new("BERT: Pre-training of deep bidirectional transformers")
            .authors(["Devlin, Jacob", "Chang, Ming-Wei", "Lee, Kenton"])
            .doi("10.18653/v1/N19-1423")
            .citations(80000)
            .year(2019)
            .build(),
        RecordBuilder::new("Mastering the game of Go with deep neural networks")
            .authors(["Silver, David", "Huang, Aja"])
            .url("https://www.nature.com/articles/nature16961")
            .build(),
        RecordBuilder::new("BERT: pre-training of deep bidirectional transformers.")
            .authors(["J. Devlin", "M.-W. Chang"])
            .url("https://arxiv.org/abs/1810.04805")
            .citations(75000)
            .year(2018)
            .build(),
        RecordBuilder::new("Mastering the Game of Go")
            .authors(["D. Silver"])
            .url("http://nature.com/articles/nature16961/")
            .build(),
        RecordBuilder::new("BERT (arXiv preprint)")
            .url("arxiv.org/abs/1810.04805")
            .build(),
        RecordBuilder::new("ImageNet classification with deep convolutional neural networks")
            .authors(["Krizhevsky, Alex", "Sutskever, Ilya", "Hinton, Geoffrey"])
            .build(),
    ]
}

#[test]
fn test_doi_surface_forms_share_canonical_form() {
    let forms = [
        "https://doi.org/10.1234/x",
        "doi:10.1234/x",
        "http://dx.doi.org/10.1234/x",
        "10.1234/x",
    ];
    let canonical: Vec<Option<String>> = forms.iter().map(|f| normalize_doi(f)).collect();
    assert!(canonical.iter().all(|c| c == &canonical[0]));
    assert!(canonical[0].is_some());

    assert_eq!(normalize_doi(""), None);
    assert_eq!(normalize_doi("see the paper"), None);
}

#[test]
fn test_url_surface_forms_share_canonical_form() {
    let a = normalize_url("https://example.com/p/");
    let b = normalize_url("http://example.com/p");
    let c = normalize_url("https://www.example.com/p");
    assert!(a.is_some());
    assert_eq!(a, b);
    assert_eq!(b, c);
}

#[test]
fn test_shared_doi_forms_one_group_regardless_of_metadata() {
    let records = vec![
        RecordBuilder::new("A title")
            .authors(["Smith, John"])
            .doi("https://doi.org/10.5555/abc")
            .build(),
        RecordBuilder::new("Entirely different wording")
            .authors(["Brown, Bob"])
            .doi("10.5555/ABC")
            .build(),
    ];

    let groups = detect_duplicates(&records, &DuplicateDetectionOptions::default());
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].confidence, 1.0);
    assert_eq!(groups[0].merge_strategy, MatchStrategy::Doi);
    assert_eq!(groups[0].primary.title, "A title");
    assert_eq!(groups[0].duplicates.len(), 1);
}

#[test]
fn test_raising_title_threshold_never_adds_groups() {
    let records = vec![
        RecordBuilder::new("Neural machine translation by jointly learning to align")
            .authors(["Bahdanau, Dzmitry", "Cho, Kyunghyun", "Bengio, Yoshua"])
            .build(),
        RecordBuilder::new("Neural machine translation by jointly learning to align and translate")
            .authors(["Bahdanau, D.", "Cho, K."])
            .build(),
    ];

    let low = DuplicateDetectionOptions::builder()
        .title_similarity_threshold(0.6)
        .build()
        .unwrap();
    let high = DuplicateDetectionOptions::builder()
        .title_similarity_threshold(0.95)
        .build()
        .unwrap();

    let low_groups = detect_duplicates(&records, &low).len();
    let high_groups = detect_duplicates(&records, &high).len();
    assert_eq!(low_groups, 1);
    assert!(high_groups <= low_groups);
}

#[test]
fn test_remove_duplicates_is_idempotent() {
    let options = DuplicateDetectionOptions::default();
    let once = remove_duplicates(&mixed_batch(), &options);
    let twice = remove_duplicates(&once, &options);
    assert_eq!(once, twice);
    assert!(once.len() < mixed_batch().len());
}

#[test]
fn test_shared_doi_keeps_most_citations() {
    let records = vec![
        RecordBuilder::new("Paper one").doi("10.1000/xyz123").citations(12).build(),
        RecordBuilder::new("Paper one (v2)")
            .doi("https://doi.org/10.1000/XYZ123")
            .citations(40)
            .build(),
        RecordBuilder::new("Something unrelated").citations(99).build(),
    ];

    let deduped = remove_duplicates(&records, &options_with(MergeStrategy::KeepMostCitations));
    assert_eq!(deduped.len(), 2);
    assert_eq!(deduped[0].citations, Some(40));
    assert_eq!(deduped[1].title, "Something unrelated");
}

#[test]
fn test_fuzzy_chain_forms_one_group() {
    // A~B and B~C on titles, while A and C are too far apart to match directly
    let a = RecordBuilder::new("Convolutional networks for images")
        .author("Smith, John")
        .build();
    let b = RecordBuilder::new("Convolutional networks for image classification")
        .author("Smith, J.")
        .build();
    let c = RecordBuilder::new("Convolutional networks for image classification and detection")
        .author("J. Smith")
        .build();

    let options = DuplicateDetectionOptions::builder()
        .title_similarity_threshold(0.92)
        .build()
        .unwrap();

    assert!(scholar_dedup::utils::classify_pair(&a, &b, &options).is_some());
    assert!(scholar_dedup::utils::classify_pair(&b, &c, &options).is_some());
    assert!(scholar_dedup::utils::classify_pair(&a, &c, &options).is_none());

    let groups = detect_duplicates(&[a, b, c], &options);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 3);
    assert_eq!(groups[0].merge_strategy, MatchStrategy::FuzzyMatch);
}

#[test]
fn test_author_list_similarity_bounds() {
    assert!(author_list_similarity(&["Smith, John", "Doe, Alice"], &["Smith, J.", "Doe, A."]) > 0.8);
    assert!(author_list_similarity(&["Smith, John"], &["Brown, Bob"]) < 0.3);
}

#[test]
fn test_empty_inputs() {
    let options = DuplicateDetectionOptions::default();
    assert!(detect_duplicates(&[], &options).is_empty());
    assert!(remove_duplicates(&[], &options).is_empty());
    assert!(merge_all(&[], &options).is_empty());
    let empty: [&str; 0] = [];
    assert_eq!(author_list_similarity(&empty, &empty), 0.0);
}

#[test]
fn test_mixed_batch_order_and_merge() {
    let options = options_with(MergeStrategy::KeepMostRecent);
    let merged = merge_all(&mixed_batch(), &options);

    let titles: Vec<&str> = merged.iter().map(|m| m.record.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "BERT: Pre-training of deep bidirectional transformers",
            "Mastering the game of Go with deep neural networks",
            "ImageNet classification with deep convolutional neural networks",
        ]
    );

    let bert = &merged[0];
    assert_eq!(bert.merged_from, 3);
    assert_eq!(bert.record.year, Some(2019));
    assert_eq!(bert.record.citations, Some(80000));
    assert_eq!(bert.record.doi.as_deref(), Some("10.18653/v1/N19-1423"));
    assert_eq!(bert.record.url.as_deref(), Some("https://arxiv.org/abs/1810.04805"));
    assert_eq!(
        bert.record.authors,
        vec!["Devlin, Jacob", "Chang, Ming-Wei", "Lee, Kenton", "J. Devlin", "M.-W. Chang"]
    );

    assert_eq!(merged[1].merged_from, 2);
    assert_eq!(merged[1].merge_confidence, 0.95);
    assert_eq!(merged[2].merged_from, 1);
}

#[test]
fn test_merge_duplicates_from_detected_group() {
    let options = options_with(MergeStrategy::KeepHighestQuality);
    let groups = detect_duplicates(&mixed_batch(), &options);
    assert_eq!(groups.len(), 2);

    let merged = merge_duplicates(&groups[1], &options);
    assert_eq!(merged.merged_from, groups[1].len());
    assert_eq!(merged.merge_confidence, groups[1].confidence);
    assert_eq!(merged.record.title, groups[1].primary.title);
}

#[test]
fn test_inputs_are_not_mutated() {
    let records = mixed_batch();
    let snapshot = records.clone();
    let _ = remove_duplicates(&records, &DuplicateDetectionOptions::default());
    assert_eq!(records, snapshot);
}

#[test]
fn test_thousand_records_group_by_doi() {
    let records: Vec<CandidateRecord> = (0..1000)
        .map(|i| {
            RecordBuilder::new(format!("Paper {} on topic {}", i, i % 17))
                .author(format!("Author{}, X.", i))
                .doi(format!("10.4242/batch.{}", i % 900))
                .build()
        })
        .collect();

    let options = DuplicateDetectionOptions::builder()
        .enable_fuzzy_matching(false)
        .build()
        .unwrap();

    let groups = detect_duplicates(&records, &options);

    // DOIs 0..100 appear twice
    assert_eq!(groups.len(), 100);
    assert!(groups.iter().all(|g| g.len() == 2));
}

const ADJECTIVES: [&str; 12] = [
    "Adaptive", "Robust", "Scalable", "Sparse", "Deep", "Bayesian", "Stochastic",
    "Distributed", "Efficient", "Neural", "Quantum", "Causal",
];
const TASKS: [&str; 11] = [
    "inference", "optimization", "retrieval", "segmentation", "compression", "routing",
    "scheduling", "clustering", "translation", "estimation", "control",
];
const DOMAINS: [&str; 9] = [
    "genomic sequences", "power grids", "social networks", "medical images", "urban traffic",
    "protein structures", "financial markets", "climate models", "speech signals",
];
const SURNAMES: [&str; 40] = [
    "Smith", "Garcia", "Chen", "Müller", "Rossi", "Kowalski", "Tanaka", "Okafor", "Silva",
    "Novak", "Dubois", "Jensen", "Ivanova", "Kim", "Nguyen", "Haddad", "Larsen", "Moreau",
    "Fischer", "Costa", "Yilmaz", "Patel", "Sato", "Horvat", "Andersen", "Lindqvist", "Romero",
    "Bianchi", "Schmidt", "Wong", "Mendes", "Ahmed", "Kovacs", "Petrov", "Berg", "Ortiz",
    "Weber", "Zhou", "Lopez", "Meyer",
];

fn varied_record(i: usize) -> CandidateRecord {
    let title = format!(
        "{} {} for {}",
        ADJECTIVES[i % 12],
        TASKS[(i / 12) % 11],
        DOMAINS[(i / 132) % 9]
    );
    let initial = (b'A' + ((i / 40) % 26) as u8) as char;
    RecordBuilder::new(title)
        .author(format!("{}, {}.", SURNAMES[i % 40], initial))
        .year(2000 + (i % 25) as i32)
        .build()
}

#[test]
#[cfg_attr(debug_assertions, ignore = "timing is only meaningful in release builds")]
fn test_thousand_varied_records_with_fuzzy_matching() {
    let mut records: Vec<CandidateRecord> = (0..990).map(varied_record).collect();
    // Reworded copies of ten earlier records
    for k in 0..10 {
        let original = varied_record(k * 97);
        let surname = original.authors[0].split(',').next().unwrap_or_default().to_string();
        let initial = (b'A' + (((k * 97) / 40) % 26) as u8) as char;
        records.push(
            RecordBuilder::new(format!("{}.", original.title.to_uppercase()))
                .author(format!("{}. {}", initial, surname))
                .build(),
        );
    }

    let options = DuplicateDetectionOptions::default();
    assert!(options.enable_fuzzy_matching());

    let start = Instant::now();
    let groups = detect_duplicates(&records, &options);
    let elapsed = start.elapsed();

    assert!(elapsed < Duration::from_secs(1), "took {:?}", elapsed);

    for k in 0..10 {
        let copy = 990 + k;
        assert!(
            groups
                .iter()
                .any(|g| g.indices.contains(&(k * 97)) && g.indices.contains(&copy)),
            "record {} was not grouped with its copy",
            k * 97
        );
    }

    let mut seen = std::collections::HashSet::new();
    for group in &groups {
        for idx in &group.indices {
            assert!(seen.insert(*idx), "record {} in two groups", idx);
        }
    }
}
