use crate::utils::Result;
use std::str::FromStr;

/// BLAST output format requested from `blastn`; the column order is what
/// [`Hit::from_str`] expects.
pub const HIT_OUTFMT: &str = "6 length qlen mismatch saccver sstart send";

/// One tabular similarity-search hit of a primer against a subject sequence.
/// Subject coordinates are 1-based and inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub length: i64,
    pub query_len: i64,
    pub mismatches: i64,
    pub accession: String,
    pub start: i64,
    pub end: i64,
}

impl Hit {
    pub fn is_forward(&self) -> bool {
        self.start < self.end
    }

    pub fn is_reverse(&self) -> bool {
        self.start > self.end
    }

    /// The primer aligned over its whole length.
    pub fn is_end_to_end(&self) -> bool {
        self.length == self.query_len
    }
}

impl FromStr for Hit {
    type Err = String;

    fn from_str(line: &str) -> Result<Self> {
        const EXPECTED_FIELD_COUNT: usize = 6;
        let fields: Vec<&str> = line.split_whitespace().collect();
        let (length, query_len, mismatches, accession, start, end) = match &fields[..] {
            [length, query_len, mismatches, accession, start, end] => {
                (*length, *query_len, *mismatches, *accession, *start, *end)
            }
            _ => {
                return Err(format!(
                    "Expected {} fields in the format 'length qlen mismatch saccver sstart send', found {}: {}",
                    EXPECTED_FIELD_COUNT,
                    fields.len(),
                    line
                ))
            }
        };

        let parse_int = |name: &str, value: &str| {
            value
                .parse::<i64>()
                .map_err(|_| format!("Invalid {} '{}' in hit: {}", name, value, line))
        };

        Ok(Hit {
            length: parse_int("length", length)?,
            query_len: parse_int("qlen", query_len)?,
            mismatches: parse_int("mismatch", mismatches)?,
            accession: accession.to_string(),
            start: parse_int("sstart", start)?,
            end: parse_int("send", end)?,
        })
    }
}

/// Parses the complete tabular output of one search; blank lines are skipped.
pub fn parse_hits(text: &str) -> Result<Vec<Hit>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(line_number, line)| {
            line.parse::<Hit>()
                .map_err(|e| format!("Error at hit line {}: {}", line_number + 1, e))
        })
        .collect()
}
