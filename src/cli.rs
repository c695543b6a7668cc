use crate::{
    constants::DEFAULT_THREADS,
    core::{caller::Caller, variant::VariantMode},
    io::vcf_reader::SomaticSamples,
    utils::util::Result,
};
use anyhow::anyhow;
use clap::{ArgAction, Parser, Subcommand};
use env_logger::fmt::Color;
use log::{Level, LevelFilter};
use once_cell::sync::Lazy;
use std::{
    collections::HashSet,
    io::Write,
    path::{Path, PathBuf},
};

/// Full version string including the crate version and git description.
///
/// # Examples
/// * `0.1.0-1ba958a-dirty` - while on a dirty branch
/// * `0.1.0-1ba958a` - with a fresh commit
pub static FULL_VERSION: Lazy<String> = Lazy::new(|| {
    let git_describe = env!("VERGEN_GIT_DESCRIBE");
    if git_describe.is_empty() {
        env!("CARGO_PKG_VERSION").to_string()
    } else {
        format!("{}-{}", env!("CARGO_PKG_VERSION"), git_describe)
    }
});

#[derive(Parser, Debug)]
#[command(name="vcfcombine",
          version=&**FULL_VERSION,
          about="Combine small-variant VCFs from multiple callers",
          long_about = None,
          help_template = "{name} {version}\n{about-section}\n{usage-heading}\n    {usage}\n\n{all-args}{after-help}",
          )]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Specify multiple times to increase verbosity level (e.g., -vv for more verbosity)
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        global = true
    )]
    pub verbosity: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Merge per-caller VCFs into one VCF with cross-caller depth statistics
    Combine(CombineArgs),
    /// Append pileup-derived read support fields to a combined VCF
    BamStats(BamStatsArgs),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Combine(_) => "combine",
            Command::BamStats(_) => "bam-stats",
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(arg_required_else_help(true))]
pub struct CombineArgs {
    /// VCF files to combine (.vcf or .vcf.gz); input order is the default caller priority
    #[arg(
        short = 'i',
        long = "input",
        value_name = "VCF",
        num_args = 1..,
        required = true,
        value_parser = check_vcf_path
    )]
    pub inputs: Vec<PathBuf>,

    /// Columns to keep, e.g. GT AD DP AF
    #[arg(long = "columns", value_name = "COLUMN", num_args = 1.., required = true)]
    pub columns: Vec<String>,

    /// Type of the input VCFs
    #[arg(long = "type", value_name = "TYPE", value_enum)]
    pub mode: VariantMode,

    /// Write output to a file [default: standard output]
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        value_parser = check_prefix_path
    )]
    pub output: Option<String>,

    /// Write the chrom/pos of every combined variant to this file (samtools mpileup regions)
    #[arg(long = "regions", value_name = "FILE", value_parser = check_prefix_path)]
    pub regions: Option<String>,

    /// Normal sample id (somatic only)
    #[arg(long = "normal", value_name = "ID")]
    pub normal: Option<String>,

    /// Tumor sample id (somatic only)
    #[arg(long = "tumor", value_name = "ID")]
    pub tumor: Option<String>,

    /// Caller priority, e.g. vardict mutect2 strelka; must name the caller of every input
    #[arg(long = "priority", value_name = "CALLER", num_args = 1..)]
    pub priority: Option<Vec<Caller>>,

    /// Number of threads to use
    #[arg(
        short = '@',
        value_name = "THREADS",
        default_value_t = DEFAULT_THREADS,
        value_parser = threads_in_range
    )]
    pub num_threads: usize,

    /// Do not append version and command line to the header
    #[arg(long = "no-version", help_heading = "Advanced")]
    pub no_version: bool,
}

impl CombineArgs {
    /// Checks the options that clap cannot relate to each other.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for input in &self.inputs {
            if !seen.insert(input) {
                return Err(crate::combine_error!(
                    "Duplicate input VCF: {}",
                    input.display()
                ));
            }
        }
        if let Some(priority) = &self.priority {
            if priority.len() != self.inputs.len() {
                return Err(crate::combine_error!(
                    "The number of priority callers ({}) does not match the number of input VCFs ({})",
                    priority.len(),
                    self.inputs.len()
                ));
            }
        }
        if self.mode == VariantMode::Somatic {
            self.somatic_samples()?;
        }
        Ok(())
    }

    /// Sample ids for somatic inputs; `None` in germline mode.
    pub fn samples(&self) -> Result<Option<SomaticSamples>> {
        match self.mode {
            VariantMode::Germline => Ok(None),
            VariantMode::Somatic => self.somatic_samples().map(Some),
        }
    }

    fn somatic_samples(&self) -> Result<SomaticSamples> {
        match (&self.normal, &self.tumor) {
            (Some(normal), Some(tumor)) => Ok(SomaticSamples {
                normal: normal.clone(),
                tumor: tumor.clone(),
            }),
            _ => Err(crate::combine_error!(
                "Both --normal and --tumor are required for somatic VCFs"
            )),
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(arg_required_else_help(true))]
pub struct BamStatsArgs {
    /// Combined VCF file
    #[arg(long = "vcf", value_name = "VCF", value_parser = check_file_exists)]
    pub vcf: PathBuf,

    /// samtools mpileup output covering the combined variants (plain or gzipped)
    #[arg(long = "pileup", value_name = "PILEUP", value_parser = check_file_exists)]
    pub pileup: PathBuf,

    /// Type of the combined VCF; somatic pileups list the normal BAM first
    #[arg(long = "type", value_name = "TYPE", value_enum)]
    pub mode: VariantMode,

    /// Write output to a file [default: standard output]
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        value_parser = check_prefix_path
    )]
    pub output: Option<String>,
}

pub fn init_verbose(args: &Cli) {
    let filter_level: LevelFilter = match args.verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
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
                "{} [{}] {} - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                style.value(level),
                record.module_path().unwrap_or("unknown_module"),
                record.args()
            )
        })
        .filter_level(filter_level)
        .init();
}

/// Validates that the provided string represents a valid number of threads.
///
/// Returns an error if the value is not a positive integer.
fn threads_in_range(s: &str) -> anyhow::Result<usize> {
    let thread: usize = s
        .parse::<usize>()
        .map_err(|_| anyhow!("`{}` is not a valid thread number", s))?;
    if thread == 0 {
        return Err(anyhow!("Number of threads must be >= 1"));
    }
    Ok(thread)
}

fn check_file_exists(s: &str) -> anyhow::Result<PathBuf> {
    let path = Path::new(s);
    if !path.exists() {
        return Err(anyhow!("File does not exist: {}", path.display()));
    }
    Ok(path.to_path_buf())
}

/// Input VCFs must exist and be plain (`.vcf`) or gzipped (`.vcf.gz`) text.
fn check_vcf_path(s: &str) -> anyhow::Result<PathBuf> {
    let path = check_file_exists(s)?;
    let name = s.to_lowercase();
    if !(name.ends_with(".vcf") || name.ends_with(".vcf.gz")) {
        return Err(anyhow!(
            "Input must be a .vcf or .vcf.gz file: {}",
            path.display()
        ));
    }
    Ok(path)
}

fn check_prefix_path(s: &str) -> anyhow::Result<String> {
    let path = Path::new(s);
    if let Some(parent_dir) = path.parent() {
        if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
            return Err(anyhow!("Path does not exist: {}", parent_dir.display()));
        }
    }
    Ok(s.to_string())
}
