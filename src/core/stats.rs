use crate::{
    constants::{MISSING_ALLELE_DEPTHS, MISSING_VALUE},
    error::CombineError,
    utils::util::{format_float, mean, round_to, round_to_i64, sample_sd, Result},
};

/// Cross-caller mean and sample standard deviation, rendered for INFO output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeanSd {
    pub mean: String,
    pub sd: String,
}

impl MeanSd {
    fn new(mean: impl Into<String>, sd: impl Into<String>) -> Self {
        Self {
            mean: mean.into(),
            sd: sd.into(),
        }
    }
}

fn parse_depth(value: &str) -> Result<i64> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| CombineError::InvalidDepth {
            value: value.to_string(),
        })
}

fn summarize(column: &[f64]) -> (String, String) {
    let mean = round_to_i64(mean(column)).to_string();
    let sd = sample_sd(column)
        .map(|sd| format_float(round_to(sd, 2)))
        .unwrap_or_else(|| MISSING_VALUE.to_string());
    (mean, sd)
}

/// Per-allele mean and sd over comma-separated AD strings; `.` entries are ignored.
///
/// All contributing AD strings must carry the same number of alleles.
pub fn allele_depth_stats<S: AsRef<str>>(values: &[S]) -> Result<MeanSd> {
    let present: Vec<&str> = values
        .iter()
        .map(AsRef::as_ref)
        .filter(|value| *value != MISSING_VALUE)
        .collect();

    let depths = present
        .iter()
        .map(|value| value.split(',').map(parse_depth).collect::<Result<Vec<_>>>())
        .collect::<Result<Vec<_>>>()?;

    match depths.as_slice() {
        [] => Ok(MeanSd::new(MISSING_ALLELE_DEPTHS, MISSING_ALLELE_DEPTHS)),
        [single] => {
            let joined = single
                .iter()
                .map(i64::to_string)
                .collect::<Vec<_>>()
                .join(",");
            Ok(MeanSd::new(joined, MISSING_ALLELE_DEPTHS))
        }
        [first, rest @ ..] => {
            if rest.iter().any(|d| d.len() != first.len()) {
                return Err(CombineError::AlleleCountMismatch {
                    values: present.iter().map(|v| v.to_string()).collect(),
                });
            }
            let (means, sds): (Vec<String>, Vec<String>) = (0..first.len())
                .map(|allele| {
                    let column: Vec<f64> = depths.iter().map(|d| d[allele] as f64).collect();
                    summarize(&column)
                })
                .unzip();
            Ok(MeanSd::new(means.join(","), sds.join(",")))
        }
    }
}

/// Mean and sd over scalar depth values; `.` entries are ignored.
pub fn depth_stats<S: AsRef<str>>(values: &[S]) -> Result<MeanSd> {
    let depths = values
        .iter()
        .map(AsRef::as_ref)
        .filter(|value| *value != MISSING_VALUE)
        .map(parse_depth)
        .collect::<Result<Vec<_>>>()?;

    match depths.as_slice() {
        [] => Ok(MeanSd::new(MISSING_VALUE, MISSING_VALUE)),
        [single] => Ok(MeanSd::new(single.to_string(), MISSING_VALUE)),
        _ => {
            let column: Vec<f64> = depths.iter().map(|&d| d as f64).collect();
            let (mean, sd) = summarize(&column);
            Ok(MeanSd::new(mean, sd))
        }
    }
}
