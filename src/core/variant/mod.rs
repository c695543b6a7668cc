mod merge;
mod parse;
mod select;
mod write;

pub use merge::layer_info;
pub use parse::normalize_gt;

use indexmap::IndexMap;
use std::fmt;

/// Ordered key/value mapping; keys are unique and keep first-insertion order.
pub type FieldMap = IndexMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum VariantMode {
    Germline,
    Somatic,
}

impl fmt::Display for VariantMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariantMode::Germline => write!(f, "germline"),
            VariantMode::Somatic => write!(f, "somatic"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Normal,
    Tumor,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Normal, Side::Tumor];

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Normal => "normal",
            Side::Tumor => "tumor",
        }
    }
}

/// 0-based tab-delimited column indices of the paired samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleColumns {
    pub normal: usize,
    pub tumor: usize,
}

/// (chromosome, position, reference, alternate) identity shared across callers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocusKey {
    pub chrom: String,
    pub pos: String,
    pub reference: String,
    pub alt: String,
}

impl fmt::Display for LocusKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}",
            self.chrom, self.pos, self.reference, self.alt
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SampleData {
    Germline(FieldMap),
    Somatic { normal: FieldMap, tumor: FieldMap },
}

impl SampleData {
    pub fn side(&self, side: Side) -> Option<&FieldMap> {
        match (self, side) {
            (SampleData::Somatic { normal, .. }, Side::Normal) => Some(normal),
            (SampleData::Somatic { tumor, .. }, Side::Tumor) => Some(tumor),
            _ => None,
        }
    }
}

/// One VCF data line decoded into its mandatory columns, INFO and sample FORMAT values.
#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    pub chrom: String,
    pub pos: String,
    pub id: String,
    pub reference: String,
    pub alt: String,
    pub qual: String,
    pub filter: String,
    pub info: FieldMap,
    pub samples: SampleData,
}

impl Variant {
    pub fn key(&self) -> LocusKey {
        LocusKey {
            chrom: self.chrom.clone(),
            pos: self.pos.clone(),
            reference: self.reference.clone(),
            alt: self.alt.clone(),
        }
    }

    /// Tab-joined locus key, e.g. `chr1\t100\tA\tG`.
    pub fn variant_key(&self) -> String {
        self.key().to_string()
    }

    pub fn is_snv(&self) -> bool {
        self.reference.len() == 1 && self.alt.len() == 1
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_line())
    }
}
