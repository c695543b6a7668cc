use super::readers::open_text_reader;
use crate::{
    constants::{NORMAL_SAMPLE_FALLBACK, TUMOR_SAMPLE_FALLBACK},
    core::{
        caller::{Caller, CallerProfile, ColumnSelection},
        variant::{LocusKey, SampleColumns, Variant, VariantMode},
    },
    error::CombineError,
    utils::util::Result,
};
use indexmap::IndexMap;
use std::{
    io::BufRead,
    path::{Path, PathBuf},
};

/// Sample identifiers used to locate the paired columns of a somatic VCF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SomaticSamples {
    pub normal: String,
    pub tumor: String,
}

/// One caller's VCF after parsing and field selection.
#[derive(Debug, Clone)]
pub struct NormalisedVcf {
    pub path: PathBuf,
    pub caller: Caller,
    pub selection: ColumnSelection,
    pub meta_info: Vec<String>,
    pub header: String,
    pub variants: IndexMap<LocusKey, Variant>,
}

fn locate_sample_column(
    header_fields: &[&str],
    sample_id: &str,
    fallback: &str,
    path: &Path,
) -> Result<usize> {
    let find = |name: &str| header_fields.iter().skip(9).position(|f| *f == name);
    find(sample_id)
        .or_else(|| find(fallback))
        .map(|offset| offset + 9)
        .ok_or_else(|| {
            crate::combine_error!(
                "Sample '{}' (or '{}') not found in the header of {}",
                sample_id,
                fallback,
                path.display()
            )
        })
}

pub fn somatic_sample_columns(
    header: &str,
    samples: &SomaticSamples,
    path: &Path,
) -> Result<SampleColumns> {
    let fields: Vec<&str> = header.trim_end_matches(['\n', '\r']).split('\t').collect();
    Ok(SampleColumns {
        normal: locate_sample_column(&fields, &samples.normal, NORMAL_SAMPLE_FALLBACK, path)?,
        tumor: locate_sample_column(&fields, &samples.tumor, TUMOR_SAMPLE_FALLBACK, path)?,
    })
}

impl NormalisedVcf {
    pub fn load<S: AsRef<str>>(
        path: &Path,
        columns: &[S],
        mode: VariantMode,
        samples: Option<&SomaticSamples>,
    ) -> Result<Self> {
        log::trace!("Start loading VCF {:?}", path);
        let reader = open_text_reader(path)?;

        let mut meta_info = Vec::new();
        let mut header: Option<String> = None;
        let mut context: Option<(CallerProfile, ColumnSelection, Option<SampleColumns>)> = None;
        let mut variants: IndexMap<LocusKey, Variant> = IndexMap::new();

        for (line_idx, line) in reader.lines().enumerate() {
            let line_num = line_idx + 1;
            let line = line.map_err(|e| {
                crate::combine_error!("Error reading line {} of {}: {e}", line_num, path.display())
            })?;
            if line.trim().is_empty() {
                continue;
            }
            if line.starts_with("##") {
                meta_info.push(line);
                continue;
            }
            if line.starts_with('#') {
                let caller = Caller::from_meta_lines(&meta_info).ok_or_else(|| {
                    CombineError::UnknownCaller {
                        path: path.to_path_buf(),
                    }
                })?;
                let profile = CallerProfile::new(caller, mode);
                let selection = ColumnSelection::new(columns, &profile);
                let sample_columns = match (mode, samples) {
                    (VariantMode::Somatic, Some(samples)) => {
                        Some(somatic_sample_columns(&line, samples, path)?)
                    }
                    (VariantMode::Somatic, None) => {
                        return Err(crate::combine_error!(
                            "normal and tumor ids are required for somatic vcfs"
                        ))
                    }
                    (VariantMode::Germline, _) => None,
                };
                context = Some((profile, selection, sample_columns));
                header = Some(line);
                continue;
            }

            let Some((profile, selection, sample_columns)) = context.as_ref() else {
                return Err(crate::combine_error!(
                    "Data line {} of {} precedes the #CHROM header line",
                    line_num,
                    path.display()
                ));
            };
            let parsed = match sample_columns {
                Some(columns) => Variant::from_somatic_line(&line, profile, *columns),
                None => Variant::from_germline_line(&line, profile),
            };
            let mut variant = parsed.map_err(|e| {
                crate::combine_error!("Error parsing line {} of {}: {e}", line_num, path.display())
            })?;
            variant.select_fields(selection, profile.caller);
            if let Some(previous) = variants.insert(variant.key(), variant) {
                log::warn!(
                    "Duplicate variant {} in {}; keeping the later record",
                    previous.key(),
                    path.display()
                );
            }
        }

        let (Some(header), Some((profile, selection, _))) = (header, context) else {
            return Err(crate::combine_error!(
                "No #CHROM header line found in {}",
                path.display()
            ));
        };

        log::debug!(
            "Loaded {} variants from {} (caller: {})",
            variants.len(),
            path.display(),
            profile.caller
        );
        Ok(NormalisedVcf {
            path: path.to_path_buf(),
            caller: profile.caller,
            selection,
            meta_info,
            header,
            variants,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::variant::{SampleData, Side};
    use tempfile::tempdir;

    const COLUMNS: [&str; 4] = ["GT", "AD", "DP", "AF"];

    fn write_vcf(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).expect("test VCF should be writable");
        path
    }

    #[test]
    fn load_germline_vcf_parses_and_selects() {
        let temp_dir = tempdir().expect("temp dir should be created");
        let path = write_vcf(
            temp_dir.path(),
            "hc.vcf",
            "##fileformat=VCFv4.2\n\
             ##GATKCommandLine=<ID=HaplotypeCaller,Version=4.0.10.0>\n\
             #CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tS1\n\
             chr1\t100\t.\tA\tG\t50\tPASS\tDP=12\tGT:AD:DP\t0/1:6,6:12\n\
             \n\
             chr1\t200\t.\tC\tT\t50\tPASS\tDP=9\tGT:AD:DP\t1/1:0,9:9\n",
        );
        let vcf = NormalisedVcf::load(&path, &COLUMNS, VariantMode::Germline, None)
            .expect("VCF should load");
        assert_eq!(vcf.caller, Caller::HaplotypeCaller);
        assert_eq!(vcf.meta_info.len(), 2);
        assert!(vcf.header.starts_with("#CHROM"));
        assert_eq!(vcf.variants.len(), 2);

        let (key, first) = vcf.variants.first().expect("first variant should exist");
        assert_eq!(key.pos, "100");
        assert_eq!(first.info["AF_haplotypecaller"], "0.5");
        let SampleData::Germline(format) = &first.samples else {
            panic!("expected germline samples");
        };
        assert_eq!(format["GT"], "0/1");
    }

    #[test]
    fn load_somatic_vcf_locates_columns_by_sample_id() {
        let temp_dir = tempdir().expect("temp dir should be created");
        let path = write_vcf(
            temp_dir.path(),
            "m2.vcf",
            "##source=Mutect2\n\
             #CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\ttumor_s\tnormal_s\n\
             chr1\t100\t.\tA\tG\t.\tPASS\tTLOD=7\tGT:AD:DP\t0/1:6,6:12\t0/0:10,0:10\n",
        );
        let samples = SomaticSamples {
            normal: "normal_s".to_string(),
            tumor: "tumor_s".to_string(),
        };
        let vcf = NormalisedVcf::load(&path, &COLUMNS, VariantMode::Somatic, Some(&samples))
            .expect("VCF should load");
        let variant = &vcf.variants[0];
        assert_eq!(variant.info["AD_normal_mutect2"], "10,0");
        assert_eq!(variant.info["AD_tumor_mutect2"], "6,6");
        assert_eq!(variant.samples.side(Side::Normal).unwrap()["GT"], "0/0");
    }

    #[test]
    fn load_somatic_vcf_falls_back_to_strelka_sample_names() {
        let header = "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tNORMAL\tTUMOR";
        let samples = SomaticSamples {
            normal: "n1".to_string(),
            tumor: "t1".to_string(),
        };
        let columns = somatic_sample_columns(header, &samples, Path::new("s.vcf")).unwrap();
        assert_eq!(
            columns,
            SampleColumns {
                normal: 9,
                tumor: 10
            }
        );

        let missing = SomaticSamples {
            normal: "n1".to_string(),
            tumor: "t2".to_string(),
        };
        let header = "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tn1\tother";
        assert!(somatic_sample_columns(header, &missing, Path::new("s.vcf")).is_err());
    }

    #[test]
    fn load_rejects_unknown_caller() {
        let temp_dir = tempdir().expect("temp dir should be created");
        let path = write_vcf(
            temp_dir.path(),
            "unknown.vcf",
            "##fileformat=VCFv4.2\n#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tS1\n",
        );
        let err = NormalisedVcf::load(&path, &COLUMNS, VariantMode::Germline, None).unwrap_err();
        assert!(matches!(err, CombineError::UnknownCaller { .. }));
    }

    #[test]
    fn load_rejects_data_before_header_and_missing_header() {
        let temp_dir = tempdir().expect("temp dir should be created");
        let path = write_vcf(
            temp_dir.path(),
            "early.vcf",
            "##source=strelka\nchr1\t1\t.\tA\tG\t.\t.\t.\tGT\t0/1\n",
        );
        let err = NormalisedVcf::load(&path, &COLUMNS, VariantMode::Germline, None).unwrap_err();
        assert!(err.to_string().contains("precedes the #CHROM header"));

        let path = write_vcf(temp_dir.path(), "empty.vcf", "##source=strelka\n");
        let err = NormalisedVcf::load(&path, &COLUMNS, VariantMode::Germline, None).unwrap_err();
        assert!(err.to_string().contains("No #CHROM header line"));
    }

    #[test]
    fn load_reports_malformed_line_with_location() {
        let temp_dir = tempdir().expect("temp dir should be created");
        let path = write_vcf(
            temp_dir.path(),
            "short.vcf",
            "##source=VarDict\n#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tS1\nchr1\t1\t.\tA\n",
        );
        let err = NormalisedVcf::load(&path, &COLUMNS, VariantMode::Germline, None).unwrap_err();
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn load_keeps_last_record_for_duplicate_locus() {
        let temp_dir = tempdir().expect("temp dir should be created");
        let path = write_vcf(
            temp_dir.path(),
            "dup.vcf",
            "##source=VarDict\n\
             #CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tS1\n\
             chr1\t5\t.\tA\tG\t.\tPASS\t.\tGT:DP\t0/1:10\n\
             chr1\t9\t.\tA\tG\t.\tPASS\t.\tGT:DP\t0/1:11\n\
             chr1\t5\t.\tA\tG\t.\tPASS\t.\tGT:DP\t0/1:12\n",
        );
        let vcf = NormalisedVcf::load(&path, &["DP"], VariantMode::Germline, None)
            .expect("VCF should load");
        assert_eq!(vcf.variants.len(), 2);
        assert_eq!(vcf.variants[0].info["DP_vardict"], "12");
        assert_eq!(vcf.variants[1].pos, "9");
    }
}
