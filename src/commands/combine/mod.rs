use crate::{
    cli::CombineArgs,
    core::{
        caller::Caller,
        variant::{layer_info, LocusKey, Variant, VariantMode},
    },
    io::{
        merge_writer::{create_output_header, write_regions, VcfWriter},
        vcf_reader::{NormalisedVcf, SomaticSamples},
    },
    utils::util::Result,
};
use indexmap::IndexMap;
use rayon::{prelude::*, ThreadPoolBuilder};
use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};


/// Loci in first-appearance order with the indices of the inputs that report them.
type LocusGroups = Vec<(LocusKey, Vec<usize>)>;

fn load_inputs(
    paths: &[PathBuf],
    columns: &[String],
    mode: VariantMode,
    samples: Option<&SomaticSamples>,
) -> Result<Vec<NormalisedVcf>> {
    paths
        .par_iter()
        .map(|path| NormalisedVcf::load(path, columns, mode, samples))
        .collect()
}

/// Reorders the inputs so their callers follow `priority`; without one, input order is kept.
pub fn order_by_priority(
    inputs: Vec<NormalisedVcf>,
    priority: Option<&[Caller]>,
) -> Result<Vec<NormalisedVcf>> {
    let callers: Vec<Caller> = inputs.iter().map(|vcf| vcf.caller).collect();
    let Some(priority) = priority else {
        let unique: HashSet<&Caller> = callers.iter().collect();
        if unique.len() != callers.len() {
            log::warn!(
                "Several inputs share a caller ({:?}); their records will overwrite each other",
                callers
            );
        }
        return Ok(inputs);
    };

    let inferred: HashSet<&Caller> = callers.iter().collect();
    let requested: HashSet<&Caller> = priority.iter().collect();
    if priority.len() != inputs.len() || inferred != requested {
        return Err(crate::combine_error!(
            "Priority callers {:?} do not match the callers inferred from the inputs {:?}",
            priority,
            callers
        ));
    }

    let mut remaining: Vec<Option<NormalisedVcf>> = inputs.into_iter().map(Some).collect();
    let mut ordered = Vec::with_capacity(remaining.len());
    for caller in priority {
        let slot = remaining
            .iter_mut()
            .find(|slot| matches!(slot, Some(vcf) if vcf.caller == *caller))
            .and_then(Option::take)
            .ok_or_else(|| {
                crate::combine_error!(
                    "Priority lists {} more often than the inputs provide it ({:?})",
                    caller,
                    callers
                )
            })?;
        ordered.push(slot);
    }
    Ok(ordered)
}

/// Groups every locus with the inputs reporting it, keeping first appearance in input order.
pub fn group_loci(inputs: &[NormalisedVcf]) -> LocusGroups {
    let mut groups: IndexMap<&LocusKey, Vec<usize>> = IndexMap::new();
    for (idx, vcf) in inputs.iter().enumerate() {
        for key in vcf.variants.keys() {
            groups.entry(key).or_default().push(idx);
        }
    }
    groups
        .into_iter()
        .map(|(key, members)| (key.clone(), members))
        .collect()
}

/// One output record: the highest priority record with the layered INFO of all reporters.
fn merge_locus(
    inputs: &[NormalisedVcf],
    key: &LocusKey,
    members: &[usize],
    columns: &[String],
) -> Result<Variant> {
    let records = members
        .iter()
        .map(|&idx| {
            inputs[idx].variants.get(key).ok_or_else(|| {
                crate::combine_error!("Variant {} missing from {}", key, inputs[idx].path.display())
            })
        })
        .collect::<Result<Vec<&Variant>>>()?;
    let callers: Vec<Caller> = members.iter().map(|&idx| inputs[idx].caller).collect();
    let Some(representative) = records.first() else {
        return Err(crate::combine_error!("No records to merge for {}", key));
    };
    let combined_info = layer_info(records.iter().map(|variant| &variant.info));
    (*representative)
        .clone()
        .combine_info(columns, &callers, combined_info)
}

pub fn merge_groups(
    inputs: &[NormalisedVcf],
    groups: &LocusGroups,
    columns: &[String],
) -> Result<Vec<Variant>> {
    groups
        .par_iter()
        .map(|(key, members)| merge_locus(inputs, key, members, columns))
        .collect()
}

pub fn combine(args: CombineArgs) -> Result<()> {
    args.validate()?;
    let samples = args.samples()?;

    let pool = ThreadPoolBuilder::new()
        .num_threads(args.num_threads)
        .thread_name(|i| format!("vcfcombine-{i}"))
        .build()
        .map_err(|e| crate::combine_error!("Failed to initialize thread pool: {e}"))?;

    let inputs = pool.install(|| {
        load_inputs(&args.inputs, &args.columns, args.mode, samples.as_ref())
    })?;
    let inputs = order_by_priority(inputs, args.priority.as_deref())?;
    log::info!(
        "Combining {} {} VCFs, caller priority: {}",
        inputs.len(),
        args.mode,
        inputs
            .iter()
            .map(|vcf| vcf.caller.tag())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let groups = group_loci(&inputs);
    log::debug!("Found {} distinct variants", groups.len());
    let merged = pool.install(|| merge_groups(&inputs, &groups, &args.columns))?;

    let header = create_output_header(&inputs, args.mode, samples.as_ref(), args.no_version)?;
    let mut writer = VcfWriter::new(args.output.as_deref())?;
    writer.write_lines(&header)?;
    for variant in &merged {
        writer.write_variant(variant)?;
    }
    writer.finish()?;
    log::info!("Wrote {} combined variants", merged.len());

    if let Some(regions) = &args.regions {
        write_regions(Path::new(regions), groups.iter().map(|(key, _)| key))?;
        log::debug!("Wrote variant regions to {}", regions);
    }
    Ok(())
}
