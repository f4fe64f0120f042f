// src/main.rs - Propose link/create/skip actions for transaction names against a partner directory
use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use partner_lib::linking::report::LinkReport;
use partner_lib::matching::index::EntityIndex;
use partner_lib::models::core::{AliasKind, EntityRecord};
use partner_lib::models::matching::{QueryInput, Resolution};
use partner_lib::pipeline::LinkingPipeline;
use partner_lib::resolution::{
    resolve_cached, LruResolutionCache, NameResolver, PassthroughResolver, ResolutionCache,
    TableResolver,
};
use partner_lib::utils::config::{LinkConfig, MatchConfig};
use partner_lib::utils::env::load_env;
use partner_lib::utils::logging::LinkingLogger;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct LinkArgs {
    /// Partner directory snapshot (JSON array of partner rows)
    #[arg(long)]
    directory: PathBuf,

    /// Transaction-side names to reconcile (JSON array of {id, name, external_identifier})
    #[arg(long)]
    queries: PathBuf,

    /// Optional resolution table (JSON object of raw name -> registered company name)
    #[arg(long)]
    resolutions: Option<PathBuf>,

    /// Write the report here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Only process the first N queries
    #[arg(long)]
    limit: Option<usize>,

    /// Override MATCH_MIN_SCORE
    #[arg(long)]
    min_score: Option<f64>,

    /// Override MATCH_MAX_CANDIDATES
    #[arg(long)]
    max_candidates: Option<i64>,

    /// Override LINK_AUTO_THRESHOLD
    #[arg(long)]
    auto_link_threshold: Option<f64>,

    /// Override LINK_SUGGEST_THRESHOLD
    #[arg(long)]
    suggest_threshold: Option<f64>,

    /// Skip instead of proposing new partners when nothing matches
    #[arg(long)]
    no_create: bool,

    /// Do not use the resolution cache
    #[arg(long)]
    no_cache: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// One row of a freee-style partner export.
#[derive(Debug, Deserialize)]
struct PartnerRow {
    id: i64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    long_name: Option<String>,
    #[serde(default)]
    shortcut1: Option<String>,
    #[serde(default)]
    shortcut2: Option<String>,
    #[serde(default)]
    corporate_number: Option<String>,
}

impl From<PartnerRow> for EntityRecord {
    fn from(row: PartnerRow) -> Self {
        let mut record = EntityRecord::new(row.id, row.name.unwrap_or_default());
        if let Some(long_name) = row.long_name {
            record = record.with_alias(AliasKind::Legal, long_name);
        }
        for shortcut in [row.shortcut1, row.shortcut2].into_iter().flatten() {
            record = record.with_alias(AliasKind::Short, shortcut);
        }
        if let Some(number) = row.corporate_number {
            record = record.with_identifier(number);
        }
        record
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} file {}", what, path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse {} file {}", what, path.display()))
}

fn build_match_config(args: &LinkArgs) -> Result<MatchConfig> {
    let base = MatchConfig::from_env().context("Invalid match configuration in environment")?;
    let config = MatchConfig::new(
        args.min_score.unwrap_or(base.min_score()),
        args.max_candidates.unwrap_or(base.max_candidates() as i64),
        base.exact_match_boost(),
    )
    .context("Invalid match configuration")?;
    Ok(config)
}

fn build_link_config(args: &LinkArgs) -> Result<LinkConfig> {
    let base = LinkConfig::from_env().context("Invalid link configuration in environment")?;
    let config = LinkConfig::new(
        args.auto_link_threshold.unwrap_or(base.auto_link_threshold()),
        args.suggest_threshold.unwrap_or(base.suggest_threshold()),
        base.create_new_if_no_match() && !args.no_create,
    )
    .context("Invalid link configuration")?;
    Ok(config)
}

fn create_progress_bar(total: usize) -> Result<ProgressBar> {
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("🔗 [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")?
            .progress_chars("█▉▊▋▌▍▎▏  "),
    );
    pb.set_message("Resolving names...");
    Ok(pb)
}

fn main() -> Result<()> {
    env_logger::init();
    load_env();

    let args = LinkArgs::parse();

    if args.verbose {
        log::set_max_level(log::LevelFilter::Debug);
    }

    let logger = LinkingLogger::new();
    let mut report = LinkReport::new();
    let use_cache = !args.no_cache;
    logger.log_start(&report.run_id().to_string(), use_cache);

    let match_config = build_match_config(&args)?;
    let link_config = build_link_config(&args)?;
    match_config.log_config();
    link_config.log_config();

    logger.log_phase("Loading inputs", None);
    let rows: Vec<PartnerRow> = read_json(&args.directory, "directory")?;
    let records: Vec<EntityRecord> = rows.into_iter().map(EntityRecord::from).collect();
    logger.log_data_loaded(records.len(), "partner");

    let mut queries: Vec<QueryInput> = read_json(&args.queries, "queries")?;
    if let Some(limit) = args.limit {
        queries.truncate(limit);
    }
    logger.log_data_loaded(queries.len(), "query");

    if queries.is_empty() {
        info!("✅ No queries to process. Exiting.");
        return Ok(());
    }

    let resolver: Box<dyn NameResolver> = match &args.resolutions {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("Failed to read resolutions file {}", path.display()))?;
            let table = TableResolver::from_json(&raw)?;
            info!("📚 Loaded {} resolution table entries", table.len());
            Box::new(table)
        }
        None => {
            warn!("No resolution table given; query names are used as-is");
            Box::new(PassthroughResolver)
        }
    };

    logger.log_phase("Building index", None);
    let index = EntityIndex::build(&records);
    logger.log_data_quality_issue("partners excluded from the index", index.stats().excluded);

    logger.log_phase("Resolving names", Some(&format!("{} queries", queries.len())));
    let mut cache = LruResolutionCache::from_env();
    let pb = create_progress_bar(queries.len())?;
    let mut resolutions: Vec<Resolution> = Vec::with_capacity(queries.len());
    for query in &queries {
        resolutions.push(resolve_cached(resolver.as_ref(), &mut cache, &query.name, use_cache));
        pb.inc(1);
    }
    pb.finish_with_message("Names resolved");
    let (hits, misses) = cache.stats();
    logger.log_cache_results(hits, misses);

    let unresolved = resolutions
        .iter()
        .filter(|r| r.resolved_name().is_none())
        .count();
    logger.log_data_quality_issue("unresolved names", unresolved);

    logger.log_phase("Ranking and deciding", None);
    let pipeline = LinkingPipeline::new(&index, match_config, link_config);
    for proposal in pipeline.propose_batch(&queries, &resolutions) {
        report.push(proposal);
    }

    let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
    match &args.output {
        Some(path) => {
            fs::write(path, json)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!("💾 Report written to {}", path.display());
        }
        None => println!("{}", json),
    }

    report.log_summary();
    logger.log_completion(report.len());
    Ok(())
}
