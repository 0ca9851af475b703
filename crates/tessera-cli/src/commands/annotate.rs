//! Annotate command - run the full pipeline over a dataset.

use std::path::{Path, PathBuf};

use colored::Colorize;
use tessera::{
    CachedKb, DirTableLoader, KbConfig, KbService, MockKbService, Pipeline, RunOutcome,
    WIKIDATA_ENTITY_NS, WikidataService, read_cell_targets, result_paths, write_cell_annotations,
    write_column_relations, write_column_types,
};

use crate::cli::KbChoice;

#[allow(clippy::too_many_arguments)]
pub fn run(
    tables: PathBuf,
    targets: PathBuf,
    output: PathBuf,
    kb: KbChoice,
    cache: Option<PathBuf>,
    timeout: u64,
    language: String,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !tables.is_dir() {
        return Err(format!("Tables directory not found: {}", tables.display()).into());
    }

    let target_list = read_cell_targets(&targets)?;
    println!(
        "{} {} targets from {}",
        "Annotating".cyan().bold(),
        target_list.len().to_string().white().bold(),
        targets.display()
    );

    let config = KbConfig {
        language,
        timeout_secs: timeout,
        ..KbConfig::default()
    };

    match kb {
        KbChoice::Wikidata => annotate_with(
            WikidataService::with_config(config)?,
            &tables,
            &target_list,
            &output,
            cache,
            verbose,
        ),
        KbChoice::Mock => annotate_with(
            MockKbService::new(),
            &tables,
            &target_list,
            &output,
            cache,
            verbose,
        ),
    }
}

fn annotate_with<K: KbService>(
    service: K,
    tables: &Path,
    targets: &[tessera::CellTarget],
    output: &Path,
    cache_path: Option<PathBuf>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let kb = CachedKb::new(service);
    if let Some(ref path) = cache_path {
        if path.exists() {
            kb.load(path)?;
            if verbose {
                println!("Loaded {} cached lookups from {}", kb.len(), path.display());
            }
        }
    }

    let loader = DirTableLoader::new(tables);
    let outcome = Pipeline::new(&loader, &kb).run(targets);

    let (cea, cta, cpa) = result_paths(output);
    write_cell_annotations(&cea, &outcome.cells, WIKIDATA_ENTITY_NS)?;
    write_column_types(&cta, &outcome.column_types, WIKIDATA_ENTITY_NS)?;
    write_column_relations(&cpa, &outcome.relations, WIKIDATA_ENTITY_NS)?;

    let summary_path = output.join("summary.json");
    std::fs::write(
        &summary_path,
        serde_json::to_string_pretty(&outcome.summary)?,
    )?;

    if let Some(ref path) = cache_path {
        kb.save(path)?;
    }

    print_summary(&outcome, verbose);
    let stats = kb.stats();
    println!(
        "Lookups: {} served from cache, {} queried",
        stats.hits.to_string().white().bold(),
        stats.misses.to_string().white().bold()
    );

    println!();
    println!(
        "{} {}",
        "Saved results to".green().bold(),
        output.display().to_string().white()
    );

    Ok(())
}

fn print_summary(outcome: &RunOutcome, verbose: bool) {
    let summary = &outcome.summary;

    println!(
        "Cells: {} annotated, {} unresolved, {} malformed",
        summary.cells.annotated.to_string().green(),
        summary.cells.unresolved.to_string().yellow(),
        summary.cells.malformed.to_string().red()
    );
    println!(
        "Columns typed: {} of {}",
        summary.column_types.annotated.to_string().green(),
        summary.column_types.columns
    );
    println!(
        "Column pairs related: {} of {}",
        summary.relations.annotated.to_string().green(),
        summary.relations.pairs
    );

    let failures = summary.lookup_failures();
    if failures > 0 {
        println!(
            "{} {} lookup failures (cells {}, types {}, relations {})",
            "Warning:".yellow().bold(),
            failures,
            summary.cells.lookup_failures,
            summary.column_types.lookup_failures,
            summary.relations.lookup_failures
        );
    }

    if verbose {
        println!();
        println!("{}", "Stage detail:".yellow().bold());
        println!(
            "  cells: {} targets, {} empty, {} tables failed to load",
            summary.cells.targets, summary.cells.empty_cells, summary.cells.tables_failed
        );
        println!(
            "  relations: {} tables, {} skipped with <2 annotated columns",
            summary.relations.tables, summary.relations.tables_skipped
        );
    }
}
