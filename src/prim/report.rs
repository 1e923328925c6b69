//! Line-oriented classification report, one block per primer set:
//!
//! ```text
//! PrimerSet:<TAB>name
//! Sensitivity:<TAB>0.333
//! Specificity:<TAB>0.5
//! TruePositives:<TAB>A1
//! FalsePositives:<TAB>A4
//! FalseNegatives:<TAB>A2 A3
//! ```
//!
//! Category lines are omitted when the category is empty. Accessions are
//! written in sorted order.

use super::{classify::ClassificationResult, distance::DistanceMatrix, AccessionSet};
use crate::utils::Result;
use itertools::Itertools;

const PRIMER_SET: &str = "PrimerSet";
const SENSITIVITY: &str = "Sensitivity";
const SPECIFICITY: &str = "Specificity";
const TRUE_POSITIVES: &str = "TruePositives";
const FALSE_POSITIVES: &str = "FalsePositives";
const FALSE_NEGATIVES: &str = "FalseNegatives";

const MIN_BLOCK_LINES: usize = 3;
const MAX_BLOCK_LINES: usize = 6;

const SIGNIFICANT_DIGITS: usize = 3;

/// Requests that accessions be followed by their distance to `reference`.
/// True positives are only annotated with `annotate_true_positives`.
#[derive(Debug, Clone, Copy)]
pub struct DistanceAnnotation<'a> {
    pub matrix: &'a DistanceMatrix,
    pub reference: &'a str,
    pub annotate_true_positives: bool,
}

pub fn format_report(
    result: &ClassificationResult,
    annotation: Option<&DistanceAnnotation>,
) -> String {
    let mut block = format!(
        "{}:\t{}\n{}:\t{}\n{}:\t{}\n",
        PRIMER_SET,
        result.primer_set,
        SENSITIVITY,
        format_general(result.sensitivity),
        SPECIFICITY,
        format_general(result.specificity)
    );

    let categories = [
        (
            TRUE_POSITIVES,
            &result.true_positives,
            annotation.filter(|a| a.annotate_true_positives),
        ),
        (FALSE_POSITIVES, &result.false_positives, annotation),
        (FALSE_NEGATIVES, &result.false_negatives, annotation),
    ];
    for (label, accessions, annotation) in categories {
        if accessions.is_empty() {
            continue;
        }
        let entries = match annotation {
            Some(a) => accessions
                .iter()
                .map(|acc| {
                    format!(
                        "{} {}",
                        acc,
                        format_general(a.matrix.distance(a.reference, acc))
                    )
                })
                .join(" "),
            None => accessions.iter().join(" "),
        };
        block.push_str(&format!("{}:\t{}\n", label, entries));
    }
    block
}

/// Parses every report block in `text`. Text before the first block and blank
/// lines are ignored.
pub fn parse_reports(text: &str) -> Result<Vec<ClassificationResult>> {
    let mut blocks: Vec<Vec<&str>> = Vec::new();
    for line in text.lines().filter(|line| !line.trim().is_empty()) {
        if line.starts_with(PRIMER_SET) {
            blocks.push(vec![line]);
        } else if let Some(block) = blocks.last_mut() {
            block.push(line);
        }
    }
    blocks.iter().map(|block| parse_block(block)).collect()
}

fn parse_block(lines: &[&str]) -> Result<ClassificationResult> {
    let malformed = |reason: &str| format!("Mal-formed report ({}):\n{}", reason, lines.join("\n"));

    if !(MIN_BLOCK_LINES..=MAX_BLOCK_LINES).contains(&lines.len()) {
        return Err(malformed(&format!(
            "expected {} to {} lines, found {}",
            MIN_BLOCK_LINES,
            MAX_BLOCK_LINES,
            lines.len()
        )));
    }

    let primer_set = labeled_value(lines[0], PRIMER_SET)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| malformed("missing primer set name"))?;
    let sensitivity = parse_metric(lines[1], SENSITIVITY).map_err(|e| malformed(&e))?;
    let specificity = parse_metric(lines[2], SPECIFICITY).map_err(|e| malformed(&e))?;

    let mut true_positives = None;
    let mut false_positives = None;
    let mut false_negatives = None;
    for line in &lines[MIN_BLOCK_LINES..] {
        let mut tokens = line.split_whitespace();
        let label = tokens.next().unwrap_or_default();
        let slot = match label.strip_suffix(':') {
            Some(TRUE_POSITIVES) => &mut true_positives,
            Some(FALSE_POSITIVES) => &mut false_positives,
            Some(FALSE_NEGATIVES) => &mut false_negatives,
            _ => return Err(malformed(&format!("unknown category '{}'", label))),
        };
        if slot.is_some() {
            return Err(malformed(&format!("repeated category '{}'", label)));
        }
        *slot = Some(tokens.map(str::to_string).collect::<AccessionSet>());
    }

    Ok(ClassificationResult {
        primer_set: primer_set.to_string(),
        true_positives: true_positives.unwrap_or_default(),
        false_positives: false_positives.unwrap_or_default(),
        false_negatives: false_negatives.unwrap_or_default(),
        sensitivity,
        specificity,
    })
}

fn labeled_value<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    line.strip_prefix(label)
        .and_then(|rest| rest.strip_prefix(':'))
        .map(str::trim)
}

fn parse_metric(line: &str, label: &str) -> Result<f64> {
    let value = labeled_value(line, label).ok_or_else(|| format!("expected {} line", label))?;
    value
        .parse::<f64>()
        .map_err(|_| format!("invalid {} '{}'", label.to_lowercase(), value))
}

/// Formats a number with three significant digits the way C's `%.3g` does:
/// fixed notation for moderate exponents, otherwise `d.dde±XX`, trailing zeros
/// removed.
pub fn format_general(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let scientific = format!("{:.*e}", SIGNIFICANT_DIGITS - 1, value);
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= SIGNIFICANT_DIGITS as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_zeros(mantissa), sign, exponent.abs())
    } else {
        let decimals = (SIGNIFICANT_DIGITS as i32 - 1 - exponent) as usize;
        trim_zeros(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_zeros(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}
