use crate::utils::Result;
use std::collections::HashMap;

/// Square matrix of pairwise distances between named sequences, as printed by
/// phylonium in PHYLIP layout:
///
/// ```text
/// 3
/// AE005174.2  0       0.001   0.03
/// B1          0.001   0       0.029
/// C1          0.03    0.029   0
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    index: HashMap<String, usize>,
    values: Vec<Vec<f64>>,
}

impl DistanceMatrix {
    pub fn new(names: Vec<String>, values: Vec<Vec<f64>>) -> Result<Self> {
        if values.len() != names.len() || values.iter().any(|row| row.len() != names.len()) {
            return Err(format!(
                "Distance matrix for {} names must be square",
                names.len()
            ));
        }
        let mut index = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            if index.insert(name.clone(), i).is_some() {
                return Err(format!("Duplicate name in distance matrix: {}", name));
            }
        }
        Ok(DistanceMatrix {
            index,
            values,
        })
    }

    pub fn from_phylip(text: &str) -> Result<Self> {
        let mut lines = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty());

        let (_, header) = lines
            .next()
            .ok_or_else(|| "Couldn't read distance matrix: empty input".to_string())?;
        let size: usize = header
            .trim()
            .parse()
            .map_err(|_| format!("Invalid distance matrix size: {}", header.trim()))?;

        let mut names = Vec::with_capacity(size);
        let mut values = Vec::with_capacity(size);
        for (line_number, line) in lines.by_ref().take(size) {
            let mut fields = line.split_whitespace();
            let name = fields.next().unwrap_or_default();
            let row = fields
                .map(parse_distance)
                .collect::<Result<Vec<f64>>>()
                .map_err(|e| format!("Error at distance matrix line {}: {}", line_number + 1, e))?;
            if row.len() != size {
                return Err(format!(
                    "Error at distance matrix line {}: expected {} distances, found {}",
                    line_number + 1,
                    size,
                    row.len()
                ));
            }
            names.push(name.to_string());
            values.push(row);
        }
        if names.len() != size {
            return Err(format!(
                "Distance matrix declares {} rows, found {}",
                size,
                names.len()
            ));
        }
        if let Some((line_number, _)) = lines.next() {
            return Err(format!(
                "Unexpected text after distance matrix at line {}",
                line_number + 1
            ));
        }
        Self::new(names, values)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Distance between two named sequences; `NaN` if either is not in the
    /// matrix or the tool could not compute it. A sequence is at distance 0
    /// from itself, listed or not.
    pub fn distance(&self, a: &str, b: &str) -> f64 {
        if a == b {
            return 0.0;
        }
        match (self.index.get(a), self.index.get(b)) {
            (Some(&i), Some(&j)) => self.values[i][j],
            _ => f64::NAN,
        }
    }
}

fn parse_distance(field: &str) -> Result<f64> {
    match field.trim_start_matches(['+', '-']).to_ascii_lowercase().as_str() {
        "" | "nan" => Ok(f64::NAN),
        _ => field
            .parse::<f64>()
            .map_err(|_| format!("Invalid distance '{}'", field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MATRIX: &str = "\
3
AE005174.2\t0\t0.001\t0.03
B1\t0.001\t0\tnan
C1\t0.03\t-nan\t0
";

    #[test]
    fn parse_phylip_matrix() {
        let matrix = DistanceMatrix::from_phylip(MATRIX).unwrap();
        assert!(matrix.contains("AE005174.2") && matrix.contains("B1") && matrix.contains("C1"));
        assert_eq!(matrix.distance("AE005174.2", "B1"), 0.001);
        assert_eq!(matrix.distance("C1", "AE005174.2"), 0.03);
        assert!(matrix.distance("B1", "C1").is_nan());
        assert!(matrix.distance("C1", "B1").is_nan());
    }

    #[test]
    fn unknown_name_is_nan() {
        let matrix = DistanceMatrix::from_phylip(MATRIX).unwrap();
        assert!(!matrix.contains("Z9"));
        assert!(matrix.distance("AE005174.2", "Z9").is_nan());
    }

    #[test]
    fn self_distance_is_zero() {
        let matrix = DistanceMatrix::from_phylip(MATRIX).unwrap();
        assert_eq!(matrix.distance("B1", "B1"), 0.0);
        let empty = DistanceMatrix::new(Vec::new(), Vec::new()).unwrap();
        assert_eq!(empty.distance("R.1", "R.1"), 0.0);
        assert!(empty.distance("R.1", "B1").is_nan());
    }

    #[test]
    fn dash_and_infinity_entries() {
        let matrix = DistanceMatrix::from_phylip("2\nA 0 -\nB inf 0\n").unwrap();
        assert!(matrix.distance("A", "B").is_nan());
        assert!(matrix.distance("B", "A").is_infinite());
    }

    #[test]
    fn empty_input_err() {
        assert_eq!(
            DistanceMatrix::from_phylip("\n"),
            Err("Couldn't read distance matrix: empty input".to_string())
        );
    }

    #[test]
    fn short_row_err() {
        assert_eq!(
            DistanceMatrix::from_phylip("2\nA 0 0.1\nB 0.1\n"),
            Err("Error at distance matrix line 3: expected 2 distances, found 1".to_string())
        );
    }

    #[test]
    fn missing_rows_err() {
        assert_eq!(
            DistanceMatrix::from_phylip("3\nA 0 0.1 0.2\nB 0.1 0 0.3\n"),
            Err("Distance matrix declares 3 rows, found 2".to_string())
        );
    }

    #[test]
    fn invalid_distance_err() {
        assert_eq!(
            DistanceMatrix::from_phylip("1\nA zero\n"),
            Err("Error at distance matrix line 2: Invalid distance 'zero'".to_string())
        );
    }

    #[test]
    fn duplicate_name_err() {
        assert_eq!(
            DistanceMatrix::from_phylip("2\nA 0 0.1\nA 0.1 0\n"),
            Err("Duplicate name in distance matrix: A".to_string())
        );
    }
}
