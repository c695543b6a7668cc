use crate::{
    constants::{AD_FIELD, DEPTH_COLUMNS, DP_FIELD, GT_FIELD},
    core::variant::{FieldMap, Side, VariantMode},
    utils::util::Result,
};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Caller {
    HaplotypeCaller,
    Mutect2,
    Strelka,
    Vardict,
}

impl Caller {
    pub const ALL: [Caller; 4] = [
        Caller::HaplotypeCaller,
        Caller::Mutect2,
        Caller::Strelka,
        Caller::Vardict,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Caller::HaplotypeCaller => "haplotypecaller",
            Caller::Mutect2 => "mutect2",
            Caller::Strelka => "strelka",
            Caller::Vardict => "vardict",
        }
    }

    /// Infers the caller from `##source=` and `##GATKCommandLine` meta lines, first match wins.
    pub fn from_meta_lines<S: AsRef<str>>(meta_lines: &[S]) -> Option<Self> {
        meta_lines
            .iter()
            .find_map(|line| Self::from_meta_line(line.as_ref()))
    }

    fn from_meta_line(line: &str) -> Option<Self> {
        if let Some(source) = line.strip_prefix("##source=") {
            let source = source.trim().to_lowercase();
            return Self::ALL
                .into_iter()
                .find(|caller| source.contains(caller.tag()));
        }
        if let Some(rest) = line.strip_prefix("##GATKCommandLine") {
            let tool = rest
                .strip_prefix(".")
                .and_then(|r| r.split('=').next())
                .or_else(|| {
                    rest.strip_prefix("=<ID=")
                        .and_then(|r| r.split([',', '>']).next())
                })?;
            return match tool.to_lowercase().as_str() {
                "haplotypecaller" => Some(Caller::HaplotypeCaller),
                "mutect2" => Some(Caller::Mutect2),
                _ => None,
            };
        }
        None
    }
}

impl FromStr for Caller {
    type Err = crate::error::CombineError;

    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|caller| caller.tag() == lowered)
            .ok_or_else(|| {
                crate::combine_error!(
                    "Unknown caller '{}', expected one of: haplotypecaller, mutect2, strelka, vardict",
                    s
                )
            })
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Caller quirks that change how a record is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerProfile {
    pub caller: Caller,
    pub mode: VariantMode,
    pub normalize_gt: bool,
    pub indel_depth_from_dpi: bool,
}

impl CallerProfile {
    pub fn new(caller: Caller, mode: VariantMode) -> Self {
        let is_strelka = caller == Caller::Strelka;
        Self {
            caller,
            mode,
            // strelka somatic output carries no genotype
            normalize_gt: !(is_strelka && mode == VariantMode::Somatic),
            indel_depth_from_dpi: is_strelka,
        }
    }
}

/// Native field name -> canonical output name, for INFO and FORMAT separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSelection {
    pub info: FieldMap,
    pub format: FieldMap,
}

impl ColumnSelection {
    pub fn new<S: AsRef<str>>(columns: &[S], profile: &CallerProfile) -> Self {
        let mut info = FieldMap::new();
        let mut format = FieldMap::new();
        let caller = profile.caller;

        for column in columns.iter().map(AsRef::as_ref) {
            if [GT_FIELD, AD_FIELD, DP_FIELD].contains(&column) {
                format.insert(column.to_string(), column.to_string());
            }
            if column == GT_FIELD {
                continue;
            }
            let is_depth = DEPTH_COLUMNS.contains(&column);
            match (profile.mode, is_depth) {
                (VariantMode::Germline, true) => {
                    info.insert(column.to_string(), format!("{column}_{caller}"));
                }
                (VariantMode::Somatic, true) => {
                    for side in Side::BOTH {
                        let key = format!("{column}_{}", side.as_str());
                        let canonical = format!("{key}_{caller}");
                        info.insert(key, canonical);
                    }
                }
                (_, false) => {
                    info.insert(column.to_string(), column.to_string());
                }
            }
        }
        Self { info, format }
    }

    /// `##INFO` declarations for the caller-suffixed columns this selection produces.
    pub fn header_lines(&self, caller: Caller) -> Vec<String> {
        self.info
            .iter()
            .filter(|(native, canonical)| native != canonical)
            .map(|(native, canonical)| {
                let (base, side) = native.split_once('_').unwrap_or((native.as_str(), ""));
                let (number, kind, what) = match base {
                    AD_FIELD => ("R", "Integer", "Allelic depths"),
                    DP_FIELD => ("1", "Integer", "Read depth"),
                    _ => ("A", "Float", "Allele frequency"),
                };
                let side = if side.is_empty() {
                    String::new()
                } else {
                    format!(" of the {side} sample")
                };
                format!(
                    "##INFO=<ID={canonical},Number={number},Type={kind},Description=\"{what}{side} reported by {caller}\">"
                )
            })
            .collect()
    }
}
