use super::Tool;
use crate::prim::{hit::HIT_OUTFMT, targets::LISTING_OUTFMT};
use crate::utils::Result;
use bio::io::fasta;
use std::{
    ffi::OsString,
    fs,
    io::Write,
    path::{Path, PathBuf},
};

/// Restricts a primer search to (or away from) a list of taxon IDs.
#[derive(Debug, Clone, PartialEq)]
pub enum TaxidFilter {
    Positive(PathBuf),
    Negative(PathBuf),
}

#[derive(Debug, Clone)]
pub struct SearchParams {
    pub evalue: f64,
    pub num_threads: usize,
    pub max_target_seqs: usize,
    pub taxid_filter: Option<TaxidFilter>,
}

/// `blastn` run against a fixed database.
#[derive(Debug, Clone)]
pub struct Blastn {
    tool: Tool,
    db: PathBuf,
}

impl Blastn {
    pub fn new(tool: Tool, db: &Path) -> Self {
        Blastn {
            tool,
            db: db.to_path_buf(),
        }
    }

    /// Searches the primers in `query` and returns the tabular hits.
    pub fn search(&self, query: &Path, params: &SearchParams) -> Result<String> {
        self.tool.run(self.search_args(query, params))
    }

    fn search_args(&self, query: &Path, params: &SearchParams) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-task".into(),
            "blastn-short".into(),
            "-query".into(),
            query.into(),
            "-db".into(),
            self.db.clone().into(),
            "-evalue".into(),
            params.evalue.to_string().into(),
            "-num_threads".into(),
            params.num_threads.to_string().into(),
            "-max_target_seqs".into(),
            params.max_target_seqs.to_string().into(),
        ];
        match &params.taxid_filter {
            Some(TaxidFilter::Negative(path)) => {
                args.extend(["-negative_taxidlist".into(), path.into()])
            }
            Some(TaxidFilter::Positive(path)) => args.extend(["-taxidlist".into(), path.into()]),
            None => {}
        }
        args.extend(["-outfmt".into(), HIT_OUTFMT.into()]);
        args
    }
}

/// `blastdbcmd` queries against a fixed database.
#[derive(Debug, Clone)]
pub struct Blastdbcmd {
    tool: Tool,
    db: PathBuf,
}

impl Blastdbcmd {
    pub fn new(tool: Tool, db: &Path) -> Self {
        Blastdbcmd {
            tool,
            db: db.to_path_buf(),
        }
    }

    /// Lists `accession title` for every entry under the taxon IDs in `taxids`.
    pub fn taxid_listing(&self, taxids: &Path) -> Result<String> {
        self.tool.run([
            OsString::from("-db"),
            self.db.clone().into(),
            "-taxidlist".into(),
            taxids.into(),
            "-outfmt".into(),
            LISTING_OUTFMT.into(),
        ])
    }

    /// Resolves an entry such as `AE005174` to the accession stored in the
    /// database, e.g. `AE005174.2`.
    pub fn accession(&self, entry: &str) -> Result<String> {
        let out = self.tool.run([
            OsString::from("-db"),
            self.db.clone().into(),
            "-entry".into(),
            entry.into(),
            "-outfmt".into(),
            "%a".into(),
        ])?;
        out.lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string)
            .ok_or_else(|| format!("Entry {} not found in {}", entry, self.db.display()))
    }

    /// Writes each requested sequence to `<dir>/<accession>.fasta` and returns
    /// the written paths in the order they were retrieved.
    pub fn extract_genomes(&self, accessions: &[&str], dir: &Path) -> Result<Vec<PathBuf>> {
        let batch_path = dir.join("entries.txt");
        let mut batch = fs::File::create(&batch_path)
            .map_err(|e| format!("Failed to create {}: {}", batch_path.display(), e))?;
        for accession in accessions {
            writeln!(batch, "{}", accession)
                .map_err(|e| format!("Failed to write {}: {}", batch_path.display(), e))?;
        }
        drop(batch);

        let fasta = self.tool.run([
            OsString::from("-db"),
            self.db.clone().into(),
            "-entry_batch".into(),
            batch_path.into(),
        ])?;
        split_fasta(&fasta, dir)
    }
}

fn split_fasta(fasta: &str, dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for record in fasta::Reader::new(fasta.as_bytes()).records() {
        let record = record.map_err(|e| format!("Invalid FASTA from blastdbcmd: {}", e))?;
        let path = dir.join(format!("{}.fasta", record.id()));
        let mut writer = fasta::Writer::to_file(&path)
            .map_err(|e| format!("Failed to create {}: {}", path.display(), e))?;
        writer
            .write_record(&record)
            .and_then(|_| writer.flush())
            .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
        paths.push(path);
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(taxid_filter: Option<TaxidFilter>) -> SearchParams {
        SearchParams {
            evalue: 1000.0,
            num_threads: 4,
            max_target_seqs: 30,
            taxid_filter,
        }
    }

    fn as_strings(args: Vec<OsString>) -> Vec<String> {
        args.into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn search_args_without_filter() {
        let blastn = Blastn::new(Tool::new("blastn"), Path::new("db/sample"));
        let args = as_strings(blastn.search_args(Path::new("prim.fasta"), &params(None)));
        assert_eq!(
            args,
            vec![
                "-task",
                "blastn-short",
                "-query",
                "prim.fasta",
                "-db",
                "db/sample",
                "-evalue",
                "1000",
                "-num_threads",
                "4",
                "-max_target_seqs",
                "30",
                "-outfmt",
                "6 length qlen mismatch saccver sstart send",
            ]
        );
    }

    #[test]
    fn search_args_with_negative_filter() {
        let blastn = Blastn::new(Tool::new("blastn"), Path::new("nt"));
        let filter = TaxidFilter::Negative(PathBuf::from("neg.txt"));
        let args = as_strings(blastn.search_args(Path::new("p.fa"), &params(Some(filter))));
        let pos = args.iter().position(|a| a == "-negative_taxidlist").unwrap();
        assert_eq!(args[pos + 1], "neg.txt");
        assert!(!args.contains(&"-taxidlist".to_string()));
    }

    #[test]
    fn split_fasta_by_accession() {
        let dir = tempfile::tempdir().unwrap();
        let fasta = ">AE005174.2 Escherichia coli O157:H7 EDL933\nACGT\nACGT\n>B1 other\nTTTT\n";
        let paths = split_fasta(fasta, dir.path()).unwrap();
        assert_eq!(
            paths,
            vec![dir.path().join("AE005174.2.fasta"), dir.path().join("B1.fasta")]
        );
        let written = fs::read_to_string(&paths[0]).unwrap();
        assert!(written.starts_with(">AE005174.2 Escherichia coli O157:H7 EDL933\n"));
        assert!(written.contains("ACGTACGT"));
    }
}
