use crate::{
    cli::FULL_VERSION,
    constants::{MANDATORY_HEADER, SOMATIC_STATS_HEADER, STATS_HEADER},
    core::variant::{LocusKey, Variant, VariantMode},
    io::vcf_reader::{NormalisedVcf, SomaticSamples},
    utils::util::Result,
};
use indexmap::IndexSet;
use std::{
    env,
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

/// Text VCF sink over a file or standard output.
pub struct VcfWriter {
    writer: Box<dyn Write>,
}

impl VcfWriter {
    pub fn new(output: Option<&str>) -> Result<Self> {
        let writer: Box<dyn Write> = match output {
            Some(path) => {
                let file = File::create(path).map_err(|e| {
                    crate::combine_error!("Failed to create output file {}: {e}", path)
                })?;
                Box::new(BufWriter::new(file))
            }
            None => Box::new(BufWriter::new(io::stdout().lock())),
        };
        Ok(VcfWriter { writer })
    }

    pub fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.writer, "{line}")?;
        Ok(())
    }

    pub fn write_lines<S: AsRef<str>>(&mut self, lines: &[S]) -> Result<()> {
        for line in lines {
            self.write_line(line.as_ref())?;
        }
        Ok(())
    }

    pub fn write_variant(&mut self, variant: &Variant) -> Result<()> {
        self.write_line(&variant.to_line())
    }

    pub fn finish(mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Header of the combined VCF, one entry per line.
///
/// Meta lines of every input (priority order, duplicates dropped), the stats block, the
/// per-caller column declarations, optional version lines and finally the `#CHROM` line.
pub fn create_output_header(
    inputs: &[NormalisedVcf],
    mode: VariantMode,
    samples: Option<&SomaticSamples>,
    no_version: bool,
) -> Result<Vec<String>> {
    let mut lines: IndexSet<String> = inputs
        .iter()
        .flat_map(|vcf| vcf.meta_info.iter().cloned())
        .collect();

    let stats_header: &[&str] = match mode {
        VariantMode::Germline => &STATS_HEADER,
        VariantMode::Somatic => &SOMATIC_STATS_HEADER,
    };
    lines.extend(stats_header.iter().map(|line| line.to_string()));
    for vcf in inputs {
        lines.extend(vcf.selection.header_lines(vcf.caller));
    }
    if !no_version {
        lines.extend(version_lines());
    }

    let column_header = match (mode, samples) {
        (VariantMode::Germline, _) => inputs
            .first()
            .map(|vcf| vcf.header.clone())
            .ok_or_else(|| crate::combine_error!("No input VCFs to build a header from"))?,
        (VariantMode::Somatic, Some(samples)) => {
            format!("{MANDATORY_HEADER}\t{}\t{}", samples.normal, samples.tumor)
        }
        (VariantMode::Somatic, None) => {
            return Err(crate::combine_error!(
                "normal and tumor ids are required for somatic vcfs"
            ))
        }
    };

    let mut header: Vec<String> = lines.into_iter().collect();
    header.push(column_header);
    Ok(header)
}

fn version_lines() -> [String; 2] {
    let version_line = format!("##{}Version={}", env!("CARGO_PKG_NAME"), *FULL_VERSION);
    let command_line = env::args().collect::<Vec<String>>().join(" ");
    let command_line = format!("##{}Command={}", env!("CARGO_PKG_NAME"), command_line);
    [version_line, command_line]
}

/// Inserts extra declarations immediately before the `#CHROM` line (or at the end if absent).
pub fn insert_before_column_header<S: AsRef<str>>(header: &mut Vec<String>, extra: &[S]) {
    let position = header
        .iter()
        .position(|line| !line.starts_with("##"))
        .unwrap_or(header.len());
    header.splice(
        position..position,
        extra.iter().map(|line| line.as_ref().to_string()),
    );
}

/// `chrom\tpos` per merged locus, the region list consumed by `samtools mpileup -l`.
pub fn write_regions<'a, I>(path: &Path, keys: I) -> Result<()>
where
    I: IntoIterator<Item = &'a LocusKey>,
{
    let file = File::create(path).map_err(|e| {
        crate::combine_error!("Failed to create regions file {}: {e}", path.display())
    })?;
    let mut writer = BufWriter::new(file);
    for key in keys {
        writeln!(writer, "{}\t{}", key.chrom, key.pos)?;
    }
    writer.flush()?;
    Ok(())
}
