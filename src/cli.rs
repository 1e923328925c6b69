use crate::utils::{available_threads, Result};
use clap::{ArgAction, ArgGroup, Parser, Subcommand};
use env_logger::fmt::Color;
use log::{Level, LevelFilter};
use once_cell::sync::Lazy;
use std::{
    io::Write,
    path::{Path, PathBuf},
};

pub static FULL_VERSION: Lazy<String> = Lazy::new(|| {
    format!(
        "{}-{}",
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_GIT_DESCRIBE")
    )
});

static DEFAULT_THREADS: Lazy<String> = Lazy::new(|| available_threads().to_string());

#[derive(Parser)]
#[command(name="prim",
          version=&**FULL_VERSION,
          about="Score PCR primers against a BLAST database and correct the scores with genome distances",
          long_about = None,
          disable_help_subcommand = true,
          help_template = "{name} {version}\n{about-section}\n{usage-heading}\n    {usage}\n\n{all-args}{after-help}",
          )]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = ArgAction::Count, help = "Specify multiple times to increase verbosity level (e.g., -vv for more verbosity)")]
    pub verbosity: u8,
}

#[derive(Subcommand)]
pub enum Command {
    #[clap(about = "Score primer sets by comparing them to a BLAST database")]
    Score(ScoreArgs),
    #[clap(about = "Correct primer scores with genome distances to a reference strain")]
    Correct(CorrectArgs),
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("score")))]
#[command(arg_required_else_help(true))]
pub struct ScoreArgs {
    #[clap(required = true)]
    #[clap(short = 'd')]
    #[clap(long = "db")]
    #[clap(help = "BLAST database")]
    #[clap(value_name = "DB")]
    #[arg(value_parser = check_blast_db)]
    pub db: PathBuf,

    #[clap(required = true)]
    #[clap(short = 't')]
    #[clap(long = "targets")]
    #[clap(help = "File of target taxon IDs")]
    #[clap(value_name = "TAXIDS")]
    #[arg(value_parser = check_file_exists)]
    pub targets_path: PathBuf,

    #[clap(help = "FASTA files of primer sets; standard input if none given")]
    #[clap(value_name = "PRIMERS")]
    pub primer_paths: Vec<PathBuf>,

    #[clap(short = 'o')]
    #[clap(long = "output")]
    #[clap(help = "Output report path (standard output if not given)")]
    #[clap(value_name = "OUTPUT")]
    pub output_path: Option<PathBuf>,

    #[clap(short = 'T')]
    #[clap(long = "threads")]
    #[clap(help = "Number of BLAST threads")]
    #[clap(value_name = "THREADS")]
    #[clap(default_value = DEFAULT_THREADS.as_str())]
    #[arg(value_parser = threads_in_range)]
    pub num_threads: usize,

    #[clap(long = "jobs")]
    #[clap(help = "Number of primer sets evaluated concurrently")]
    #[clap(value_name = "JOBS")]
    #[clap(default_value = "1")]
    #[arg(value_parser = threads_in_range)]
    pub num_jobs: usize,

    #[clap(help_heading("Advanced"))]
    #[clap(short = 'n')]
    #[clap(long = "negative-taxids")]
    #[clap(help = "File of taxon IDs excluded from the search (-negative_taxidlist)")]
    #[clap(value_name = "TAXIDS")]
    #[clap(conflicts_with = "positive_taxids_path")]
    #[arg(value_parser = check_file_exists)]
    pub negative_taxids_path: Option<PathBuf>,

    #[clap(help_heading("Advanced"))]
    #[clap(short = 'p')]
    #[clap(long = "positive-taxids")]
    #[clap(help = "File of taxon IDs the search is restricted to (-taxidlist)")]
    #[clap(value_name = "TAXIDS")]
    #[arg(value_parser = check_file_exists)]
    pub positive_taxids_path: Option<PathBuf>,

    #[clap(help_heading("Advanced"))]
    #[clap(short = 'i')]
    #[clap(long = "max-mismatches")]
    #[clap(help = "Maximum number of mismatches between primer and subject")]
    #[clap(value_name = "MISMATCHES")]
    #[clap(default_value = "5")]
    pub max_mismatches: u32,

    #[clap(help_heading("Advanced"))]
    #[clap(short = 'l')]
    #[clap(long = "max-amplicon-len")]
    #[clap(help = "Maximum length of an amplicon")]
    #[clap(value_name = "LENGTH")]
    #[clap(default_value = "4000")]
    pub max_amplicon_len: u32,

    #[clap(help_heading("Advanced"))]
    #[clap(short = 'e')]
    #[clap(long = "evalue")]
    #[clap(help = "BLAST E-value")]
    #[clap(value_name = "EVALUE")]
    #[clap(default_value = "1000")]
    #[arg(value_parser = positive_float)]
    pub evalue: f64,

    #[clap(help_heading("Advanced"))]
    #[clap(short = 'm')]
    #[clap(long = "max-target-factor")]
    #[clap(
        help = "Maximum number of BLAST target sequences as a multiple of the number of target accessions"
    )]
    #[clap(value_name = "FACTOR")]
    #[clap(default_value = "3")]
    #[arg(value_parser = positive_float)]
    pub max_target_factor: f64,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "blastn")]
    #[clap(help = "blastn program")]
    #[clap(value_name = "PATH")]
    #[clap(default_value = "blastn")]
    pub blastn: PathBuf,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "blastdbcmd")]
    #[clap(help = "blastdbcmd program")]
    #[clap(value_name = "PATH")]
    #[clap(default_value = "blastdbcmd")]
    pub blastdbcmd: PathBuf,
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("correct")))]
#[command(arg_required_else_help(true))]
pub struct CorrectArgs {
    #[clap(required = true)]
    #[clap(short = 'd')]
    #[clap(long = "db")]
    #[clap(help = "BLAST database")]
    #[clap(value_name = "DB")]
    #[arg(value_parser = check_blast_db)]
    pub db: PathBuf,

    #[clap(required = true)]
    #[clap(short = 'r')]
    #[clap(long = "reference")]
    #[clap(help = "Accession of the reference target strain")]
    #[clap(value_name = "ACCESSION")]
    #[arg(value_parser = check_nonempty)]
    pub reference: String,

    #[clap(required = true)]
    #[clap(short = 't')]
    #[clap(long = "threshold")]
    #[clap(help = "Threshold distance to the reference")]
    #[clap(value_name = "DISTANCE")]
    #[arg(value_parser = positive_float)]
    pub threshold: f64,

    #[clap(help = "Reports written by 'prim score'; standard input if none given")]
    #[clap(value_name = "REPORTS")]
    pub report_paths: Vec<PathBuf>,

    #[clap(short = 'o')]
    #[clap(long = "output")]
    #[clap(help = "Output report path (standard output if not given)")]
    #[clap(value_name = "OUTPUT")]
    pub output_path: Option<PathBuf>,

    #[clap(short = 'T')]
    #[clap(long = "threads")]
    #[clap(help = "Number of phylonium threads")]
    #[clap(value_name = "THREADS")]
    #[clap(default_value = DEFAULT_THREADS.as_str())]
    #[arg(value_parser = threads_in_range)]
    pub num_threads: usize,

    #[clap(long = "jobs")]
    #[clap(help = "Number of primer sets corrected concurrently")]
    #[clap(value_name = "JOBS")]
    #[clap(default_value = "1")]
    #[arg(value_parser = threads_in_range)]
    pub num_jobs: usize,

    #[clap(short = 'D')]
    #[clap(long = "distances")]
    #[clap(help = "Include distances to the reference in the output")]
    pub print_distances: bool,

    #[clap(short = 'p')]
    #[clap(long = "check-true-positives")]
    #[clap(help = "Also check true positives (default: only false positives and false negatives)")]
    pub check_true_positives: bool,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "blastdbcmd")]
    #[clap(help = "blastdbcmd program")]
    #[clap(value_name = "PATH")]
    #[clap(default_value = "blastdbcmd")]
    pub blastdbcmd: PathBuf,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "phylonium")]
    #[clap(help = "phylonium program")]
    #[clap(value_name = "PATH")]
    #[clap(default_value = "phylonium")]
    pub phylonium: PathBuf,
}

pub fn init_verbose(args: &Cli) {
    let filter_level: LevelFilter = match args.verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            let level = record.level();
            let mut style = buf.style();
            match record.level() {
                Level::Error => style.set_color(Color::Red),
                Level::Warn => style.set_color(Color::Yellow),
                Level::Info => style.set_color(Color::Green),
                Level::Debug => style.set_color(Color::Blue),
                Level::Trace => style.set_color(Color::Cyan),
            };

            writeln!(
                buf,
                "{} [{}] - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                style.value(level),
                record.args()
            )
        })
        .filter_level(filter_level)
        .init();
}

fn threads_in_range(s: &str) -> Result<usize> {
    let thread: usize = s
        .parse()
        .map_err(|_| format!("`{}` is not a valid thread number", s))?;
    if thread >= 1 {
        Ok(thread)
    } else {
        Err("Number of threads must be at least 1".into())
    }
}

fn check_file_exists(s: &str) -> Result<PathBuf> {
    let path = Path::new(s);
    if !path.exists() {
        Err(format!("File does not exist: {}", path.display()))
    } else {
        Ok(path.to_path_buf())
    }
}

/// A nucleotide BLAST database `db` is present if its `db.ndb` file is.
fn check_blast_db(s: &str) -> Result<PathBuf> {
    let ndb_path = PathBuf::from(format!("{}.ndb", s));
    if !ndb_path.exists() {
        Err(format!("Couldn't find BLAST database: {}", s))
    } else {
        Ok(PathBuf::from(s))
    }
}

fn check_nonempty(s: &str) -> Result<String> {
    if s.trim().is_empty() {
        Err("Value cannot be an empty string".to_string())
    } else {
        Ok(s.trim().to_string())
    }
}

fn positive_float(s: &str) -> Result<f64> {
    let value = s
        .parse::<f64>()
        .map_err(|e| format!("Could not parse float: {}", e))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("The value must be greater than 0, got: {}", value))
    }
}
