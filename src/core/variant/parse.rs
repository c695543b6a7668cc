use super::{FieldMap, SampleColumns, SampleData, Variant};
use crate::{
    constants::{AD_FIELD, AF_FIELD, DPI_FIELD, DP_FIELD, GT_FIELD, MISSING_VALUE},
    core::caller::CallerProfile,
    error::CombineError,
    utils::util::{format_float, round_to, Result},
};

const MANDATORY_FIELDS: usize = 7;
const INFO_COLUMN: usize = 7;
const FORMAT_COLUMN: usize = 8;
const GERMLINE_SAMPLE_COLUMN: usize = 9;

/// Canonical genotype: `.` becomes `0`, phasing `|` becomes `/`, and `1/0` is reordered to `0/1`.
pub fn normalize_gt(raw: &str) -> String {
    let gt = raw.replace('.', "0").replace('|', "/");
    if gt == "1/0" {
        "0/1".to_string()
    } else {
        gt
    }
}

fn split_fields(line: &str) -> Vec<&str> {
    line.trim_end_matches(['\n', '\r']).split('\t').collect()
}

/// Semicolon-separated `key=value` tokens; a bare flag maps to itself.
fn parse_info(info: &str) -> FieldMap {
    let mut fields = FieldMap::new();
    for token in info.split(';') {
        match token.split_once('=') {
            Some((key, value)) => fields.insert(key.to_string(), value.to_string()),
            None => fields.insert(token.to_string(), token.to_string()),
        };
    }
    fields
}

/// Zips FORMAT names with sample values; the shorter list bounds the result.
fn parse_sample(names: &str, values: &str) -> FieldMap {
    names
        .split(':')
        .zip(values.split(':'))
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

/// `round(AD[1] / DP, 2)`, or `None` when either side is missing, non-numeric or DP is zero.
fn allele_frequency(format: &FieldMap) -> Option<String> {
    let alt_depth: f64 = format
        .get(AD_FIELD)?
        .split(',')
        .nth(1)?
        .trim()
        .parse()
        .ok()?;
    let depth: f64 = format.get(DP_FIELD)?.trim().parse().ok()?;
    let af = alt_depth / depth;
    af.is_finite().then(|| format_float(round_to(af, 2)))
}

impl Variant {
    fn from_fields(fields: &[&str], samples: SampleData) -> Self {
        Variant {
            chrom: fields[0].to_string(),
            pos: fields[1].to_string(),
            id: fields[2].to_string(),
            reference: fields[3].to_string(),
            alt: fields[4].to_string(),
            qual: fields[5].to_string(),
            filter: fields[6].to_string(),
            info: parse_info(fields[INFO_COLUMN]),
            samples,
        }
    }

    fn require_fields(fields: &[&str], expected: usize) -> Result<()> {
        if fields.len() < expected {
            return Err(CombineError::MalformedRecord {
                expected,
                found: fields.len(),
            });
        }
        Ok(())
    }

    /// Decodes a single-sample line without any normalisation.
    pub fn read_germline(line: &str) -> Result<Self> {
        let fields = split_fields(line);
        Self::require_fields(&fields, MANDATORY_FIELDS + 1)?;
        let format = match (fields.get(FORMAT_COLUMN), fields.get(GERMLINE_SAMPLE_COLUMN)) {
            (Some(names), Some(values)) => parse_sample(names, values),
            _ => FieldMap::new(),
        };
        Ok(Self::from_fields(&fields, SampleData::Germline(format)))
    }

    /// Decodes a paired normal/tumor line without any normalisation.
    pub fn read_somatic(line: &str, columns: SampleColumns) -> Result<Self> {
        let fields = split_fields(line);
        let expected = (FORMAT_COLUMN + 1).max(columns.normal.max(columns.tumor) + 1);
        Self::require_fields(&fields, expected)?;
        let names = fields[FORMAT_COLUMN];
        let samples = SampleData::Somatic {
            normal: parse_sample(names, fields[columns.normal]),
            tumor: parse_sample(names, fields[columns.tumor]),
        };
        Ok(Self::from_fields(&fields, samples))
    }

    /// Decodes a germline line and applies GT normalisation and the AF/AD/DP recomputation.
    pub fn from_germline_line(line: &str, profile: &CallerProfile) -> Result<Self> {
        let mut variant = Self::read_germline(line)?;
        let indel = !variant.is_snv();
        let info = &mut variant.info;
        let SampleData::Germline(format) = &mut variant.samples else {
            unreachable!("read_germline always yields germline samples")
        };

        if profile.normalize_gt {
            if let Some(gt) = format.get_mut(GT_FIELD) {
                *gt = normalize_gt(gt);
            }
        }

        if profile.indel_depth_from_dpi && indel {
            let dpi = format
                .get(DPI_FIELD)
                .cloned()
                .unwrap_or_else(|| MISSING_VALUE.to_string());
            format.insert(DP_FIELD.to_string(), dpi);
        }

        let af = allele_frequency(format).unwrap_or_else(|| MISSING_VALUE.to_string());
        info.insert(AF_FIELD.to_string(), af);

        for field in [AD_FIELD, DP_FIELD] {
            if let Some(value) = format.get(field) {
                info.insert(field.to_string(), value.clone());
            }
        }
        Ok(variant)
    }

    /// Decodes a somatic line and normalises both genotypes when the caller reports them.
    pub fn from_somatic_line(
        line: &str,
        profile: &CallerProfile,
        columns: SampleColumns,
    ) -> Result<Self> {
        let mut variant = Self::read_somatic(line, columns)?;
        if let (true, SampleData::Somatic { normal, tumor }) =
            (profile.normalize_gt, &mut variant.samples)
        {
            for sample in [normal, tumor] {
                if let Some(gt) = sample.get_mut(GT_FIELD) {
                    *gt = normalize_gt(gt);
                }
            }
        }
        Ok(variant)
    }
}
