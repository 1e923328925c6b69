use super::{initialize_thread_pool, write_reports};
use crate::cli::ScoreArgs;
use crate::prim::{
    amplicon::{observed_accessions, PairingParams},
    classify::{classify, ClassificationResult},
    hit::parse_hits,
    report::format_report,
    targets::TargetSets,
};
use crate::tools::{
    blast::{Blastdbcmd, Blastn, SearchParams, TaxidFilter},
    Tool,
};
use crate::utils::{create_writer, open_input_reader, Result, STDIO_PATH};
use bio::io::fasta;
use rayon::prelude::*;
use std::{
    io::Read,
    path::{Path, PathBuf},
    time::Instant,
};
use tempfile::NamedTempFile;

/// A primer FASTA file and the name its report block carries.
#[derive(Debug, Clone)]
struct PrimerSet {
    name: String,
    query: PathBuf,
}

pub fn score(args: ScoreArgs) -> Result<()> {
    let start_timer = Instant::now();

    let blastdbcmd = Blastdbcmd::new(Tool::new(&args.blastdbcmd), &args.db);
    let listing = blastdbcmd.taxid_listing(&args.targets_path)?;
    let targets = TargetSets::from_listing(&listing);
    log::info!(
        "Target taxa: {} accessions, {} expected targets",
        targets.candidate_pool.len(),
        targets.expected_targets.len()
    );
    if targets.candidate_pool.is_empty() {
        log::warn!(
            "No accessions found for the taxon IDs in {}",
            args.targets_path.display()
        );
    }

    // Removed on drop, after every search is done
    let stdin_primers = if args.primer_paths.is_empty() {
        Some(spool_primers(open_input_reader(Path::new(STDIO_PATH))?)?)
    } else {
        None
    };
    let primer_sets: Vec<PrimerSet> = match &stdin_primers {
        Some(spooled) => vec![PrimerSet {
            name: STDIO_PATH.to_string(),
            query: spooled.path().to_path_buf(),
        }],
        None => args
            .primer_paths
            .iter()
            .map(|path| PrimerSet {
                name: path.display().to_string(),
                query: path.clone(),
            })
            .collect(),
    };

    let blastn = Blastn::new(Tool::new(&args.blastn), &args.db);
    let search_params = SearchParams {
        evalue: args.evalue,
        num_threads: args.num_threads,
        max_target_seqs: max_target_seqs(args.max_target_factor, targets.candidate_pool.len()),
        taxid_filter: taxid_filter(&args),
    };
    let pairing = PairingParams {
        max_mismatches: args.max_mismatches.into(),
        max_amplicon_len: args.max_amplicon_len.into(),
    };

    log::debug!(
        "Scoring {} primer set(s) with {} job(s)",
        primer_sets.len(),
        args.num_jobs
    );
    let pool = initialize_thread_pool(args.num_jobs)?;
    let reports = pool.install(|| {
        primer_sets
            .par_iter()
            .map(|primer_set| {
                score_primer_set(primer_set, &blastn, &search_params, &pairing, &targets)
                    .map(|result| format_report(&result, None))
            })
            .collect::<Result<Vec<String>>>()
    })?;

    let mut writer = create_writer(args.output_path.as_deref())?;
    write_reports(&mut writer, &reports)?;

    log::info!("Total execution time: {:.2?}", start_timer.elapsed());
    Ok(())
}

fn score_primer_set(
    primer_set: &PrimerSet,
    blastn: &Blastn,
    search_params: &SearchParams,
    pairing: &PairingParams,
    targets: &TargetSets,
) -> Result<ClassificationResult> {
    let out = blastn.search(&primer_set.query, search_params)?;
    let hits = parse_hits(&out).map_err(|e| format!("{}: {}", primer_set.name, e))?;
    let observed = observed_accessions(&hits, pairing);
    let result = classify(primer_set.name.as_str(), &observed, targets);
    log::info!(
        "{}: {} hits, {} accessions amplified, TP={} FP={} FN={}",
        primer_set.name,
        hits.len(),
        observed.len(),
        result.true_positives.len(),
        result.false_positives.len(),
        result.false_negatives.len()
    );
    Ok(result)
}

/// At least one target sequence, since blastn rejects zero.
fn max_target_seqs(factor: f64, num_accessions: usize) -> usize {
    ((factor * num_accessions as f64).floor() as usize).max(1)
}

fn taxid_filter(args: &ScoreArgs) -> Option<TaxidFilter> {
    match (&args.negative_taxids_path, &args.positive_taxids_path) {
        (Some(path), _) => Some(TaxidFilter::Negative(path.clone())),
        (None, Some(path)) => Some(TaxidFilter::Positive(path.clone())),
        (None, None) => None,
    }
}

/// Copies primer FASTA into a temporary file blastn can read, checking the
/// records on the way.
fn spool_primers<R: Read>(reader: R) -> Result<NamedTempFile> {
    let mut spooled = tempfile::Builder::new()
        .prefix("prim")
        .suffix(".fasta")
        .tempfile()
        .map_err(|e| format!("Failed to create temporary primer file: {}", e))?;
    let mut num_records = 0;
    {
        let mut writer = fasta::Writer::new(spooled.as_file_mut());
        for record in fasta::Reader::new(reader).records() {
            let record = record.map_err(|e| format!("Invalid primer FASTA: {}", e))?;
            record
                .check()
                .map_err(|e| format!("Invalid primer {}: {}", record.id(), e))?;
            writer
                .write_record(&record)
                .map_err(|e| format!("Failed to write temporary primer file: {}", e))?;
            num_records += 1;
        }
        writer
            .flush()
            .map_err(|e| format!("Failed to write temporary primer file: {}", e))?;
    }
    if num_records == 0 {
        return Err("No primers found in input".into());
    }
    log::debug!("Spooled {} primers to {}", num_records, spooled.path().display());
    Ok(spooled)
}
