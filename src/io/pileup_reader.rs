use super::readers::open_text_reader;
use crate::{core::pileup::PileupObservation, error::CombineError, utils::util::Result};
use std::{collections::HashMap, io::BufRead, path::Path};

/// Per-locus observations keyed by (chromosome, 1-based position), one entry per BAM.
pub type PileupTable = HashMap<(String, String), Vec<PileupObservation>>;

/// Parses one `samtools mpileup` line: chrom, pos, ref base, then `depth, bases, quals` per BAM.
pub fn parse_pileup_line(line: &str) -> Result<((String, String), Vec<PileupObservation>)> {
    let fields: Vec<&str> = line.trim_end_matches(['\n', '\r']).split('\t').collect();
    if fields.len() < 6 {
        return Err(CombineError::MalformedRecord {
            expected: 6,
            found: fields.len(),
        });
    }
    let observations = fields[3..]
        .chunks(3)
        .filter(|triple| triple.len() >= 2)
        .map(|triple| {
            Ok(PileupObservation {
                total_depth: triple[0].parse::<i64>()?,
                bases: triple[1].to_string(),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(((fields[0].to_string(), fields[1].to_string()), observations))
}

pub fn read_pileup(path: &Path) -> Result<PileupTable> {
    let reader = open_text_reader(path)?;
    let mut table = PileupTable::new();
    for (line_idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let (locus, observations) = parse_pileup_line(&line).map_err(|e| {
            crate::combine_error!(
                "Error parsing pileup line {} of {}: {e}",
                line_idx + 1,
                path.display()
            )
        })?;
        table.insert(locus, observations);
    }
    log::debug!("Loaded {} pileup loci from {}", table.len(), path.display());
    Ok(table)
}
