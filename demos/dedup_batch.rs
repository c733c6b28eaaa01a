//! Deduplicate a small batch of search results.
//!
//! Pass a TOML configuration file as the first argument to override the
//! default options and logging level. Set `RUST_LOG=scholar_dedup=trace` to
//! see every duplicate pair as it is joined.

use anyhow::{Context, Result};
use scholar_dedup::config::ConfigFile;
use scholar_dedup::models::{CandidateRecord, RecordBuilder};
use scholar_dedup::utils::{detect_duplicates, merge_all};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn sample_records() -> Vec<CandidateRecord> {
    vec![
        RecordBuilder::new("Deep learning")
            .authors(["LeCun, Yann", "Bengio, Yoshua", "Hinton, Geoffrey"])
            .journal("Nature")
            .year(2015)
            .citations(52000)
            .doi("https://doi.org/10.1038/nature14539")
            .confidence(0.9)
            .relevance_score(0.8)
            .build(),
        RecordBuilder::new("Attention is all you need")
            .authors(["Vaswani, Ashish", "Shazeer, Noam", "Parmar, Niki"])
            .year(2017)
            .citations(91000)
            .url("https://arxiv.org/abs/1706.03762")
            .keywords(["transformers", "attention"])
            .confidence(0.7)
            .build(),
        RecordBuilder::new("Deep Learning")
            .authors(["Y. LeCun", "Y. Bengio"])
            .year(2015)
            .citations(48000)
            .doi("doi:10.1038/NATURE14539")
            .confidence(0.6)
            .build(),
        RecordBuilder::new("Attention Is All You Need.")
            .authors(["A. Vaswani", "N. Shazeer"])
            .journal("Advances in Neural Information Processing Systems")
            .year(2017)
            .keywords(["Transformers", "machine translation"])
            .confidence(0.8)
            .build(),
        RecordBuilder::new("Generative adversarial nets")
            .authors(["Goodfellow, Ian"])
            .year(2014)
            .build(),
    ]
}

fn main() -> Result<()> {
    let config = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => ConfigFile::load(&path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => ConfigFile::default(),
    };

    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.logging.filter_directive()),
    );
    if config.logging.is_json() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    let options = config.detection_options()?;
    let records = sample_records();

    let groups = detect_duplicates(&records, &options);
    tracing::info!("Found {} duplicate groups in {} records", groups.len(), records.len());
    for group in &groups {
        println!(
            "{} (+{} duplicates, {} at {:.2})",
            group.primary.title,
            group.duplicates.len(),
            group.merge_strategy,
            group.confidence
        );
    }

    let merged = merge_all(&records, &options);
    println!("{}", serde_json::to_string_pretty(&merged)?);

    Ok(())
}
