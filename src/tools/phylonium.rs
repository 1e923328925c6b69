use super::Tool;
use crate::prim::distance::DistanceMatrix;
use crate::utils::Result;
use std::{ffi::OsString, path::Path, path::PathBuf};

/// Whole-genome distance estimation with phylonium. Sequences are named
/// after their file stem, so `AE005174.2.fasta` appears as `AE005174.2`.
#[derive(Debug, Clone)]
pub struct Phylonium {
    tool: Tool,
    num_threads: usize,
}

impl Phylonium {
    pub fn new(tool: Tool, num_threads: usize) -> Self {
        Phylonium { tool, num_threads }
    }

    pub fn distances(&self, reference: &Path, genomes: &[PathBuf]) -> Result<DistanceMatrix> {
        let out = self.tool.run(self.args(reference, genomes))?;
        DistanceMatrix::from_phylip(&out).map_err(|e| {
            format!(
                "Couldn't read distance matrix from {}: {}",
                self.tool.program().display(),
                e
            )
        })
    }

    fn args(&self, reference: &Path, genomes: &[PathBuf]) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-t".into(),
            self.num_threads.to_string().into(),
            "-r".into(),
            reference.into(),
        ];
        args.extend(genomes.iter().map(OsString::from));
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phylonium_args() {
        let phylonium = Phylonium::new(Tool::new("phylonium"), 8);
        let genomes = vec![PathBuf::from("tmp/R.fasta"), PathBuf::from("tmp/B1.fasta")];
        let args: Vec<String> = phylonium
            .args(Path::new("tmp/R.fasta"), &genomes)
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec!["-t", "8", "-r", "tmp/R.fasta", "tmp/R.fasta", "tmp/B1.fasta"]
        );
    }

    #[cfg(unix)]
    #[test]
    fn failing_tool_err() {
        let phylonium = Phylonium::new(Tool::new("false"), 1);
        let err = phylonium
            .distances(Path::new("R.fasta"), &[PathBuf::from("R.fasta")])
            .unwrap_err();
        assert!(err.starts_with("false failed"));
    }

    #[cfg(unix)]
    #[test]
    fn empty_output_err() {
        let phylonium = Phylonium::new(Tool::new("true"), 1);
        let err = phylonium
            .distances(Path::new("R.fasta"), &[PathBuf::from("R.fasta")])
            .unwrap_err();
        assert_eq!(
            err,
            "Couldn't read distance matrix from true: Couldn't read distance matrix: empty input"
        );
    }
}
