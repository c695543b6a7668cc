use crate::{
    constants::{BAM_STATS_FIELDS, MISSING_VALUE, NOT_APPLICABLE},
    core::variant::{FieldMap, SampleData, Side, Variant},
    utils::util::{format_float, round_to},
};
use std::fmt;

/// Total depth and raw base string of one sample at one locus, as reported by `samtools mpileup`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PileupObservation {
    pub total_depth: i64,
    pub bases: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bidirectional {
    Yes,
    No,
    NotApplicable,
}

impl fmt::Display for Bidirectional {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bidirectional::Yes => write!(f, "Y"),
            Bidirectional::No => write!(f, "N"),
            Bidirectional::NotApplicable => write!(f, "{NOT_APPLICABLE}"),
        }
    }
}

/// Read support derived from a pileup; reference counts are signed because indel reads are
/// subtracted from the raw match counts.
#[derive(Debug, Clone, PartialEq)]
pub struct BamStats {
    pub total_depth: i64,
    pub ref_reads: i64,
    pub alt_reads: i64,
    pub allele_frequency: Option<f64>,
    pub ref_fwd: i64,
    pub ref_rev: i64,
    pub alt_fwd: i64,
    pub alt_rev: i64,
    pub bidirectional: Bidirectional,
}

impl BamStats {
    pub fn empty() -> Self {
        Self {
            total_depth: 0,
            ref_reads: 0,
            alt_reads: 0,
            allele_frequency: None,
            ref_fwd: 0,
            ref_rev: 0,
            alt_fwd: 0,
            alt_rev: 0,
            bidirectional: Bidirectional::NotApplicable,
        }
    }

    /// Values in `BAM_STATS_FIELDS` order.
    pub fn values(&self) -> [String; 9] {
        [
            self.total_depth.to_string(),
            self.ref_reads.to_string(),
            self.alt_reads.to_string(),
            self.allele_frequency
                .map(format_float)
                .unwrap_or_else(|| MISSING_VALUE.to_string()),
            self.ref_fwd.to_string(),
            self.ref_rev.to_string(),
            self.alt_fwd.to_string(),
            self.alt_rev.to_string(),
            self.bidirectional.to_string(),
        ]
    }
}

/// Removes every `+N<bases>` / `-N<bases>` indel notation in one left-to-right pass.
///
/// The run length is a greedy decimal run; a sign without digits is dropped on its own.
pub fn strip_indels(pileup: &str) -> String {
    let chars: Vec<char> = pileup.chars().collect();
    let mut out = String::with_capacity(pileup.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c != '+' && c != '-' {
            out.push(c);
            i += 1;
            continue;
        }
        let digits_start = i + 1;
        let mut digits_end = digits_start;
        while digits_end < chars.len() && chars[digits_end].is_ascii_digit() {
            digits_end += 1;
        }
        let length: usize = chars[digits_start..digits_end]
            .iter()
            .collect::<String>()
            .parse()
            .unwrap_or(0);
        i = digits_end.saturating_add(length).min(chars.len());
    }
    out
}

fn count(haystack: &str, needle: &str) -> i64 {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count() as i64
}

/// Decodes strand-specific reference/alternate support for a ref/alt pair from a pileup base string.
pub fn compute_bam_stats(
    reference: &str,
    alt: &str,
    observation: Option<&PileupObservation>,
) -> BamStats {
    let Some(observation) = observation else {
        return BamStats::empty();
    };
    let pileup = observation.bases.as_str();
    let mut ref_fwd = count(pileup, ".");
    let mut ref_rev = count(pileup, ",");

    let ref_len = reference.chars().count();
    let alt_len = alt.chars().count();
    let (alt_fwd, alt_rev) = if ref_len == alt_len {
        let stripped = strip_indels(pileup);
        (
            count(&stripped, alt),
            count(&stripped, &alt.to_lowercase()),
        )
    } else if ref_len == 1 && alt_len > 1 {
        let inserted: String = alt.chars().skip(1).collect();
        let tag = format!("+{}", alt_len - 1);
        let fwd = count(pileup, &format!("{tag}{inserted}"));
        let rev = count(pileup, &format!("{tag}{}", inserted.to_lowercase()));
        ref_fwd -= fwd;
        ref_rev -= rev;
        (fwd, rev)
    } else if ref_len > 1 && alt_len == 1 {
        let deleted: String = reference.chars().skip(1).collect();
        let tag = format!("-{}", ref_len - 1);
        let fwd = count(pileup, &format!("{tag}{deleted}"));
        let rev = count(pileup, &format!("{tag}{}", deleted.to_lowercase()));
        ref_fwd -= fwd;
        ref_rev -= rev;
        (fwd, rev)
    } else {
        (0, 0)
    };

    let alt_reads = alt_fwd + alt_rev;
    let ref_reads = ref_fwd + ref_rev;
    let (allele_frequency, bidirectional) = if alt_reads != 0 {
        let frequency = (observation.total_depth != 0)
            .then(|| round_to(alt_reads as f64 / observation.total_depth as f64, 2));
        let bidirectional = if alt_fwd != 0 && alt_rev != 0 {
            Bidirectional::Yes
        } else {
            Bidirectional::No
        };
        (frequency, bidirectional)
    } else {
        (None, Bidirectional::NotApplicable)
    };

    BamStats {
        total_depth: observation.total_depth,
        ref_reads,
        alt_reads,
        allele_frequency,
        ref_fwd,
        ref_rev,
        alt_fwd,
        alt_rev,
        bidirectional,
    }
}

impl Variant {
    pub fn bam_stats(&self, observation: Option<&PileupObservation>) -> BamStats {
        compute_bam_stats(&self.reference, &self.alt, observation)
    }

    /// Appends the nine `PMC*` FORMAT fields; somatic records take one result per side.
    pub fn add_bam_stats(&mut self, germline_or_normal: &BamStats, tumor: Option<&BamStats>) {
        let insert = |format: &mut FieldMap, stats: &BamStats| {
            for (name, value) in BAM_STATS_FIELDS.iter().zip(stats.values()) {
                format.insert(name.to_string(), value);
            }
        };
        match &mut self.samples {
            SampleData::Germline(format) => insert(format, germline_or_normal),
            SampleData::Somatic { normal, tumor: tumor_format } => {
                insert(normal, germline_or_normal);
                let empty = BamStats::empty();
                insert(tumor_format, tumor.unwrap_or(&empty));
            }
        }
    }

    /// Observations are ordered as the BAMs were given to mpileup: normal first, then tumor.
    pub fn side_bam_stats(&self, side: Side, observations: &[PileupObservation]) -> BamStats {
        let index = match side {
            Side::Normal => 0,
            Side::Tumor => 1,
        };
        self.bam_stats(observations.get(index))
    }
}
