pub const DEFAULT_THREADS: usize = 1;

pub const MISSING_VALUE: &str = ".";
pub const MISSING_ALLELE_DEPTHS: &str = ".,.";
pub const NOT_APPLICABLE: &str = "N/A";

pub const IDENTIFIED_INFO: &str = "Identified";

pub const GT_FIELD: &str = "GT";
pub const AD_FIELD: &str = "AD";
pub const DP_FIELD: &str = "DP";
pub const AF_FIELD: &str = "AF";
pub const DPI_FIELD: &str = "DPI";

/// Columns whose values differ per caller and are suffixed with the caller tag.
pub const DEPTH_COLUMNS: [&str; 3] = [AD_FIELD, DP_FIELD, AF_FIELD];

pub const NORMAL_SAMPLE_FALLBACK: &str = "NORMAL";
pub const TUMOR_SAMPLE_FALLBACK: &str = "TUMOR";

pub const MANDATORY_HEADER: &str = "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT";

pub const BAM_STATS_FIELDS: [&str; 9] = [
    "PMCDP", "PMCRD", "PMCAD", "PMCFREQ", "PMCRDF", "PMCRDR", "PMCADF", "PMCADR", "PMCBDIR",
];

pub const STATS_HEADER: [&str; 5] = [
    r#"##INFO=<ID=Identified,Number=1,Type=String,Description="Callers that identified the variant, in priority order">"#,
    r#"##INFO=<ID=AD_mean,Number=R,Type=Integer,Description="Mean allelic depths across callers">"#,
    r#"##INFO=<ID=AD_sd,Number=R,Type=Float,Description="Sample standard deviation of allelic depths across callers">"#,
    r#"##INFO=<ID=DP_mean,Number=1,Type=Integer,Description="Mean read depth across callers">"#,
    r#"##INFO=<ID=DP_sd,Number=1,Type=Float,Description="Sample standard deviation of read depth across callers">"#,
];

pub const SOMATIC_STATS_HEADER: [&str; 9] = [
    r#"##INFO=<ID=Identified,Number=1,Type=String,Description="Callers that identified the variant, in priority order">"#,
    r#"##INFO=<ID=AD_mean_normal,Number=R,Type=Integer,Description="Mean allelic depths of the normal sample across callers">"#,
    r#"##INFO=<ID=AD_sd_normal,Number=R,Type=Float,Description="Sample standard deviation of allelic depths of the normal sample across callers">"#,
    r#"##INFO=<ID=DP_mean_normal,Number=1,Type=Integer,Description="Mean read depth of the normal sample across callers">"#,
    r#"##INFO=<ID=DP_sd_normal,Number=1,Type=Float,Description="Sample standard deviation of read depth of the normal sample across callers">"#,
    r#"##INFO=<ID=AD_mean_tumor,Number=R,Type=Integer,Description="Mean allelic depths of the tumor sample across callers">"#,
    r#"##INFO=<ID=AD_sd_tumor,Number=R,Type=Float,Description="Sample standard deviation of allelic depths of the tumor sample across callers">"#,
    r#"##INFO=<ID=DP_mean_tumor,Number=1,Type=Integer,Description="Mean read depth of the tumor sample across callers">"#,
    r#"##INFO=<ID=DP_sd_tumor,Number=1,Type=Float,Description="Sample standard deviation of read depth of the tumor sample across callers">"#,
];

pub const BAM_STATS_HEADER: [&str; 9] = [
    r#"##FORMAT=<ID=PMCDP,Number=1,Type=Integer,Description="Total read depth (includes bases supporting other alleles)">"#,
    r#"##FORMAT=<ID=PMCRD,Number=1,Type=Integer,Description="Depth of reference-supporting bases">"#,
    r#"##FORMAT=<ID=PMCAD,Number=A,Type=Integer,Description="Depth of alternate-supporting bases">"#,
    r#"##FORMAT=<ID=PMCFREQ,Number=A,Type=Float,Description="Variant allele frequency">"#,
    r#"##FORMAT=<ID=PMCRDF,Number=1,Type=String,Description="Depth of reference-supporting bases on forward strand">"#,
    r#"##FORMAT=<ID=PMCRDR,Number=1,Type=String,Description="Depth of reference-supporting bases on reverse strand">"#,
    r#"##FORMAT=<ID=PMCADF,Number=A,Type=String,Description="Depth of alternate-supporting bases on forward strand">"#,
    r#"##FORMAT=<ID=PMCADR,Number=A,Type=String,Description="Depth of alternate-supporting bases on reverse strand">"#,
    r#"##FORMAT=<ID=PMCBDIR,Number=A,Type=String,Description="Y/N indicating if variant is bidirectional (N/A if no alt reads)">"#,
];
