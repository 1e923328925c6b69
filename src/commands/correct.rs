use super::{initialize_thread_pool, write_reports};
use crate::cli::CorrectArgs;
use crate::prim::{
    classify::ClassificationResult,
    distance::DistanceMatrix,
    reclassify::{reclassify, ReclassifyParams},
    report::{format_report, parse_reports, DistanceAnnotation},
};
use crate::tools::{blast::Blastdbcmd, phylonium::Phylonium, Tool};
use crate::utils::{create_writer, read_input_to_string, Result, STDIO_PATH};
use itertools::Itertools;
use rayon::prelude::*;
use std::{path::PathBuf, time::Instant};

struct Corrector<'a> {
    blastdbcmd: Blastdbcmd,
    phylonium: Phylonium,
    reference: &'a str,
    threshold: f64,
    check_true_positives: bool,
    print_distances: bool,
}

pub fn correct(args: CorrectArgs) -> Result<()> {
    let start_timer = Instant::now();

    let report_paths = if args.report_paths.is_empty() {
        vec![PathBuf::from(STDIO_PATH)]
    } else {
        args.report_paths.clone()
    };
    let mut results = Vec::new();
    for path in &report_paths {
        let text = read_input_to_string(path)?;
        let parsed = parse_reports(&text).map_err(|e| format!("{}: {}", path.display(), e))?;
        log::debug!("Read {} report(s) from {}", parsed.len(), path.display());
        results.extend(parsed);
    }

    let blastdbcmd = Blastdbcmd::new(Tool::new(&args.blastdbcmd), &args.db);
    let reference = blastdbcmd.accession(&args.reference)?;
    log::info!("Reference {} is {} in {}", args.reference, reference, args.db.display());

    let corrector = Corrector {
        blastdbcmd,
        phylonium: Phylonium::new(Tool::new(&args.phylonium), args.num_threads),
        reference: &reference,
        threshold: args.threshold,
        check_true_positives: args.check_true_positives,
        print_distances: args.print_distances,
    };

    let pool = initialize_thread_pool(args.num_jobs)?;
    let reports = pool.install(|| {
        results
            .par_iter()
            .map(|result| corrector.correct_primer_set(result))
            .collect::<Result<Vec<String>>>()
    })?;

    let mut writer = create_writer(args.output_path.as_deref())?;
    write_reports(&mut writer, &reports)?;

    log::info!("Total execution time: {:.2?}", start_timer.elapsed());
    Ok(())
}

impl Corrector<'_> {
    fn correct_primer_set(&self, result: &ClassificationResult) -> Result<String> {
        let entries = self.entries(result);
        let matrix = if entries.len() > 1 {
            self.distances(&entries)?
        } else {
            log::debug!("{}: no accessions to check", result.primer_set);
            DistanceMatrix::new(Vec::new(), Vec::new())?
        };

        let corrected = reclassify(
            result,
            &matrix,
            &ReclassifyParams {
                reference: self.reference,
                threshold: self.threshold,
                check_true_positives: self.check_true_positives,
            },
        );
        log::info!(
            "{}: sensitivity {:.3} -> {:.3}, specificity {:.3} -> {:.3}",
            result.primer_set,
            result.sensitivity,
            corrected.sensitivity,
            result.specificity,
            corrected.specificity
        );

        let annotation = DistanceAnnotation {
            matrix: &matrix,
            reference: self.reference,
            annotate_true_positives: self.check_true_positives,
        };
        Ok(format_report(
            &corrected,
            self.print_distances.then_some(&annotation),
        ))
    }

    /// The reference followed by every other accession whose category may
    /// change.
    fn entries<'r>(&'r self, result: &'r ClassificationResult) -> Vec<&'r str> {
        let checked: Box<dyn Iterator<Item = &'r String> + 'r> = if self.check_true_positives {
            Box::new(result.accessions())
        } else {
            Box::new(
                result
                    .false_positives
                    .iter()
                    .chain(result.false_negatives.iter()),
            )
        };
        std::iter::once(self.reference)
            .chain(
                checked
                    .map(String::as_str)
                    .filter(|acc| *acc != self.reference),
            )
            .unique()
            .collect()
    }

    fn distances(&self, entries: &[&str]) -> Result<DistanceMatrix> {
        let tmp_dir = tempfile::Builder::new()
            .prefix("prim")
            .tempdir()
            .map_err(|e| format!("Failed to create temporary directory: {}", e))?;
        let genomes = self.blastdbcmd.extract_genomes(entries, tmp_dir.path())?;
        let reference_path = tmp_dir.path().join(format!("{}.fasta", self.reference));
        if !genomes.contains(&reference_path) {
            return Err(format!(
                "Couldn't retrieve reference {} from the database",
                self.reference
            ));
        }
        log::debug!(
            "Computing distances between {} genomes in {}",
            genomes.len(),
            tmp_dir.path().display()
        );
        let matrix = self.phylonium.distances(&reference_path, &genomes)?;
        if !matrix.contains(self.reference) {
            return Err(format!(
                "Reference {} missing from the distance matrix",
                self.reference
            ));
        }
        Ok(matrix)
    }
}
