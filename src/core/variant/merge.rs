use super::{FieldMap, SampleData, Side, Variant};
use crate::{
    constants::{AD_FIELD, AF_FIELD, DP_FIELD, IDENTIFIED_INFO, MISSING_VALUE},
    core::{
        caller::Caller,
        stats::{allele_depth_stats, depth_stats, MeanSd},
    },
    utils::util::Result,
};

fn values_with_prefix<'a>(info: &'a FieldMap, prefix: &str) -> Vec<&'a str> {
    info.iter()
        .filter(|(key, _)| key.starts_with(prefix))
        .map(|(_, value)| value.as_str())
        .collect()
}

fn is_unresolved_depth(key: &str, value: &str) -> bool {
    value == MISSING_VALUE && [AD_FIELD, AF_FIELD, DP_FIELD].iter().any(|f| key.contains(f))
}

/// Layers each caller's INFO into one mapping; later callers overwrite earlier ones.
pub fn layer_info<'a, I>(infos: I) -> FieldMap
where
    I: IntoIterator<Item = &'a FieldMap>,
{
    let mut combined = FieldMap::new();
    for info in infos {
        for (key, value) in info {
            combined.insert(key.clone(), value.clone());
        }
    }
    combined
}

impl Variant {
    /// Folds the combined INFO of every contributing caller into this representative record.
    ///
    /// Emits `Identified`, the AD/DP mean and sd when requested, stores the means in the sample
    /// FORMAT, drops unresolved per-caller depth placeholders and resets FILTER to `.`.
    pub fn combine_info<S: AsRef<str>>(
        mut self,
        columns: &[S],
        callers: &[Caller],
        combined_info: FieldMap,
    ) -> Result<Self> {
        let wants = |field: &str| columns.iter().any(|c| c.as_ref() == field);
        let identified = callers
            .iter()
            .map(|caller| caller.tag())
            .collect::<Vec<_>>()
            .join("-");
        let mut added: Vec<(String, String)> = vec![(IDENTIFIED_INFO.to_string(), identified)];

        match &mut self.samples {
            SampleData::Germline(format) => {
                if wants(AD_FIELD) {
                    let stats = allele_depth_stats(&values_with_prefix(&combined_info, AD_FIELD))?;
                    push_stats(&mut added, AD_FIELD, "", &stats);
                    format.insert(AD_FIELD.to_string(), stats.mean);
                }
                if wants(DP_FIELD) {
                    let stats = depth_stats(&values_with_prefix(&combined_info, DP_FIELD))?;
                    push_stats(&mut added, DP_FIELD, "", &stats);
                    format.insert(DP_FIELD.to_string(), stats.mean);
                }
            }
            SampleData::Somatic { normal, tumor } => {
                for (side, format) in [(Side::Normal, normal), (Side::Tumor, tumor)] {
                    let suffix = format!("_{}", side.as_str());
                    if wants(AD_FIELD) {
                        let prefix = format!("{AD_FIELD}{suffix}");
                        let stats = allele_depth_stats(&values_with_prefix(&combined_info, &prefix))?;
                        push_stats(&mut added, AD_FIELD, &suffix, &stats);
                        format.insert(AD_FIELD.to_string(), stats.mean);
                    }
                    if wants(DP_FIELD) {
                        let prefix = format!("{DP_FIELD}{suffix}");
                        let stats = depth_stats(&values_with_prefix(&combined_info, &prefix))?;
                        push_stats(&mut added, DP_FIELD, &suffix, &stats);
                        format.insert(DP_FIELD.to_string(), stats.mean);
                    }
                }
            }
        }

        let mut info: FieldMap = combined_info
            .into_iter()
            .filter(|(key, value)| !is_unresolved_depth(key, value))
            .collect();
        info.extend(added);

        self.info = info;
        self.filter = MISSING_VALUE.to_string();
        Ok(self)
    }
}

fn push_stats(added: &mut Vec<(String, String)>, field: &str, suffix: &str, stats: &MeanSd) {
    added.push((format!("{field}_mean{suffix}"), stats.mean.clone()));
    added.push((format!("{field}_sd{suffix}"), stats.sd.clone()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        caller::{CallerProfile, ColumnSelection},
        variant::{SampleColumns, VariantMode},
    };

    const COLUMNS: [&str; 4] = ["GT", "AD", "DP", "AF"];

    fn germline(caller: Caller, line: &str) -> Variant {
        let profile = CallerProfile::new(caller, VariantMode::Germline);
        let selection = ColumnSelection::new(&COLUMNS, &profile);
        let mut variant = Variant::from_germline_line(line, &profile).unwrap();
        variant.select_fields(&selection, caller);
        variant
    }

    fn somatic(caller: Caller, line: &str) -> Variant {
        let profile = CallerProfile::new(caller, VariantMode::Somatic);
        let selection = ColumnSelection::new(&COLUMNS, &profile);
        let columns = SampleColumns {
            normal: 9,
            tumor: 10,
        };
        let mut variant = Variant::from_somatic_line(line, &profile, columns).unwrap();
        variant.select_fields(&selection, caller);
        variant
    }

    fn pairs(map: &FieldMap) -> Vec<(&str, &str)> {
        map.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
    }

    #[test]
    fn test_layer_info_last_caller_wins() {
        let first = FieldMap::from([
            ("DB".to_string(), "DB".to_string()),
            ("MQ".to_string(), "60".to_string()),
        ]);
        let second = FieldMap::from([("MQ".to_string(), "55".to_string())]);
        let combined = layer_info([&first, &second]);
        assert_eq!(pairs(&combined), vec![("DB", "DB"), ("MQ", "55")]);
    }

    #[test]
    fn test_combine_two_germline_callers() {
        let hc = germline(
            Caller::HaplotypeCaller,
            "chr1\t100\t.\tA\tG\t60\tPASS\t.\tGT:AD:DP\t0/1:4,2:6",
        );
        let vd = germline(
            Caller::Vardict,
            "chr1\t100\t.\tA\tG\t33\tLowQual\t.\tGT:AD:DP\t1/0:6,4:10",
        );
        let callers = [Caller::HaplotypeCaller, Caller::Vardict];
        let combined = layer_info([&hc.info, &vd.info]);
        let merged = hc.combine_info(&COLUMNS, &callers, combined).unwrap();

        assert_eq!(merged.filter, ".");
        assert_eq!(merged.qual, "60");
        assert_eq!(
            pairs(&merged.info),
            vec![
                ("AD_haplotypecaller", "4,2"),
                ("DP_haplotypecaller", "6"),
                ("AF_haplotypecaller", "0.33"),
                ("AD_vardict", "6,4"),
                ("DP_vardict", "10"),
                ("AF_vardict", "0.4"),
                ("Identified", "haplotypecaller-vardict"),
                ("AD_mean", "5,3"),
                ("AD_sd", "1.41,1.41"),
                ("DP_mean", "8"),
                ("DP_sd", "2.83"),
            ]
        );
        let SampleData::Germline(format) = &merged.samples else {
            panic!("expected germline samples");
        };
        assert_eq!(pairs(format), vec![("GT", "0/1"), ("AD", "5,3"), ("DP", "8")]);
    }

    #[test]
    fn test_combine_strips_unresolved_placeholders() {
        let hc = germline(
            Caller::HaplotypeCaller,
            "chr1\t100\t.\tA\tG\t60\tPASS\t.\tGT:AD:DP\t0/1:4,2:6",
        );
        let strelka = germline(Caller::Strelka, "chr1\t100\t.\tA\tG\t20\tPASS\t.\tGT\t0/1");
        let callers = [Caller::HaplotypeCaller, Caller::Strelka];
        let combined = layer_info([&hc.info, &strelka.info]);
        let merged = hc.combine_info(&COLUMNS, &callers, combined).unwrap();

        assert!(!merged.info.contains_key("AD_strelka"));
        assert!(!merged.info.contains_key("DP_strelka"));
        assert!(!merged.info.contains_key("AF_strelka"));
        assert_eq!(merged.info["Identified"], "haplotypecaller-strelka");
        assert_eq!(merged.info["AD_mean"], "4,2");
        assert_eq!(merged.info["AD_sd"], ".,.");
        assert_eq!(merged.info["DP_mean"], "6");
        assert_eq!(merged.info["DP_sd"], ".");
    }

    #[test]
    fn test_combine_without_depth_columns_only_identifies() {
        let hc = germline(
            Caller::HaplotypeCaller,
            "chr1\t100\t.\tA\tG\t60\tPASS\t.\tGT:AD:DP\t0/1:4,2:6",
        );
        let combined = layer_info([&hc.info]);
        let merged = hc
            .combine_info(&["GT"], &[Caller::HaplotypeCaller], combined)
            .unwrap();
        assert_eq!(
            pairs(&merged.info),
            vec![
                ("AD_haplotypecaller", "4,2"),
                ("DP_haplotypecaller", "6"),
                ("AF_haplotypecaller", "0.33"),
                ("Identified", "haplotypecaller"),
            ]
        );
    }

    #[test]
    fn test_combine_somatic_per_side() {
        let m2 = somatic(
            Caller::Mutect2,
            "chr2\t500\t.\tC\tT\t.\tPASS\tTLOD=9\tGT:AD:DP\t0/0:20,0:20\t0/1:12,8:20",
        );
        let vd = somatic(
            Caller::Vardict,
            "chr2\t500\t.\tC\tT\t.\tPASS\tSOMATIC\tGT:AD:DP\t0/0:22,0:22\t0/1:10,10:20",
        );
        let callers = [Caller::Mutect2, Caller::Vardict];
        let combined = layer_info([&m2.info, &vd.info]);
        let merged = m2.combine_info(&COLUMNS, &callers, combined).unwrap();

        assert_eq!(merged.info["Identified"], "mutect2-vardict");
        assert_eq!(merged.info["AD_mean_normal"], "21,0");
        assert_eq!(merged.info["AD_sd_normal"], "1.41,0.0");
        assert_eq!(merged.info["DP_mean_normal"], "21");
        assert_eq!(merged.info["AD_mean_tumor"], "11,9");
        assert_eq!(merged.info["DP_mean_tumor"], "20");
        assert_eq!(merged.info["DP_sd_tumor"], "0.0");
        let added: Vec<&str> = merged
            .info
            .keys()
            .skip_while(|k| *k != "Identified")
            .map(String::as_str)
            .collect();
        assert_eq!(
            added,
            vec![
                "Identified",
                "AD_mean_normal",
                "AD_sd_normal",
                "DP_mean_normal",
                "DP_sd_normal",
                "AD_mean_tumor",
                "AD_sd_tumor",
                "DP_mean_tumor",
                "DP_sd_tumor",
            ]
        );
        assert_eq!(merged.samples.side(Side::Normal).unwrap()["AD"], "21,0");
        assert_eq!(merged.samples.side(Side::Tumor).unwrap()["DP"], "20");
    }

    #[test]
    fn test_combine_reports_mismatched_allele_counts() {
        let hc = germline(
            Caller::HaplotypeCaller,
            "chr1\t100\t.\tA\tG,T\t60\tPASS\t.\tGT:AD:DP\t1/2:1,2,3:6",
        );
        let vd = germline(
            Caller::Vardict,
            "chr1\t100\t.\tA\tG,T\t60\tPASS\t.\tGT:AD:DP\t1/2:1,2:6",
        );
        let combined = layer_info([&hc.info, &vd.info]);
        let result = hc.combine_info(
            &COLUMNS,
            &[Caller::HaplotypeCaller, Caller::Vardict],
            combined,
        );
        assert!(result.is_err());
    }
}
