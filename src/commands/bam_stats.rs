use crate::{
    cli::BamStatsArgs,
    constants::BAM_STATS_HEADER,
    core::{
        pileup::PileupObservation,
        variant::{SampleColumns, Side, Variant, VariantMode},
    },
    io::{
        merge_writer::{insert_before_column_header, VcfWriter},
        pileup_reader::{read_pileup, PileupTable},
        readers::open_text_reader,
    },
    utils::util::{try_exists, Result},
};
use std::io::BufRead;

const SOMATIC_COLUMNS: SampleColumns = SampleColumns {
    normal: 9,
    tumor: 10,
};

/// Appends the `PMC*` read support fields to one combined VCF data line.
pub fn annotate_line(line: &str, mode: VariantMode, pileup: &PileupTable) -> Result<String> {
    let mut variant = match mode {
        VariantMode::Germline => Variant::read_germline(line)?,
        VariantMode::Somatic => Variant::read_somatic(line, SOMATIC_COLUMNS)?,
    };
    let observations: &[PileupObservation] = pileup
        .get(&(variant.chrom.clone(), variant.pos.clone()))
        .map(Vec::as_slice)
        .unwrap_or_default();

    match mode {
        VariantMode::Germline => {
            let stats = variant.bam_stats(observations.first());
            variant.add_bam_stats(&stats, None);
        }
        VariantMode::Somatic => {
            let normal = variant.side_bam_stats(Side::Normal, observations);
            let tumor = variant.side_bam_stats(Side::Tumor, observations);
            variant.add_bam_stats(&normal, Some(&tumor));
        }
    }
    Ok(variant.to_line())
}

pub fn bam_stats(args: BamStatsArgs) -> Result<()> {
    try_exists(&args.vcf)?;
    try_exists(&args.pileup)?;
    let pileup = read_pileup(&args.pileup)?;

    let reader = open_text_reader(&args.vcf)?;
    let mut writer = VcfWriter::new(args.output.as_deref())?;
    let mut header: Vec<String> = Vec::new();
    let mut header_written = false;
    let mut n_records = 0usize;

    for (line_idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        if line.starts_with('#') {
            if header_written {
                return Err(crate::combine_error!(
                    "Header line {} of {} follows data lines",
                    line_idx + 1,
                    args.vcf.display()
                ));
            }
            let is_column_header = !line.starts_with("##");
            header.push(line);
            if is_column_header {
                insert_before_column_header(&mut header, &BAM_STATS_HEADER);
                writer.write_lines(&header)?;
                header_written = true;
            }
            continue;
        }
        if !header_written {
            return Err(crate::combine_error!(
                "Data line {} of {} precedes the #CHROM header line",
                line_idx + 1,
                args.vcf.display()
            ));
        }
        let annotated = annotate_line(&line, args.mode, &pileup).map_err(|e| {
            crate::combine_error!(
                "Error annotating line {} of {}: {e}",
                line_idx + 1,
                args.vcf.display()
            )
        })?;
        writer.write_line(&annotated)?;
        n_records += 1;
    }

    if !header_written {
        return Err(crate::combine_error!(
            "No #CHROM header line found in {}",
            args.vcf.display()
        ));
    }
    writer.finish()?;
    log::info!("Annotated {} variants with pileup read support", n_records);
    Ok(())
}
