use super::{FieldMap, SampleData, Side, Variant};
use crate::{
    constants::{GT_FIELD, MISSING_VALUE},
    core::caller::{Caller, ColumnSelection},
};

impl Variant {
    /// Replaces INFO and FORMAT with the requested columns under their canonical names.
    pub fn select_fields(&mut self, selection: &ColumnSelection, caller: Caller) {
        let (info, samples) = match &self.samples {
            SampleData::Germline(format) => {
                let info = selection
                    .info
                    .iter()
                    .map(|(native, canonical)| {
                        let value = self
                            .info
                            .get(native)
                            .or_else(|| format.get(native))
                            .map_or(MISSING_VALUE, String::as_str);
                        (canonical.clone(), value.to_string())
                    })
                    .collect();
                let format = selection
                    .format
                    .iter()
                    .map(|(native, canonical)| {
                        let value = format.get(native).map_or(MISSING_VALUE, String::as_str);
                        (canonical.clone(), value.to_string())
                    })
                    .collect();
                (info, SampleData::Germline(format))
            }
            SampleData::Somatic { normal, tumor } => {
                let mut info = FieldMap::new();
                for native in selection.info.keys() {
                    if let Some(value) = self.info.get(native) {
                        info.insert(native.clone(), value.clone());
                        continue;
                    }
                    let sided = Side::BOTH.into_iter().find_map(|side| {
                        native
                            .strip_suffix(side.as_str())
                            .and_then(|base| base.strip_suffix('_'))
                            .map(|base| (side, base))
                    });
                    if let Some((side, base)) = sided {
                        let sample = match side {
                            Side::Normal => normal,
                            Side::Tumor => tumor,
                        };
                        if let Some(value) = sample.get(base) {
                            info.insert(format!("{native}_{caller}"), value.clone());
                        }
                    }
                }

                let mut new_normal = FieldMap::new();
                let mut new_tumor = FieldMap::new();
                for native in selection.format.keys() {
                    match (normal.get(native), tumor.get(native)) {
                        (Some(n), Some(t)) => {
                            new_normal.insert(native.clone(), n.clone());
                            new_tumor.insert(native.clone(), t.clone());
                        }
                        _ if native == GT_FIELD => {
                            new_normal.insert(GT_FIELD.to_string(), MISSING_VALUE.to_string());
                            new_tumor.insert(GT_FIELD.to_string(), MISSING_VALUE.to_string());
                        }
                        _ => {}
                    }
                }
                (
                    info,
                    SampleData::Somatic {
                        normal: new_normal,
                        tumor: new_tumor,
                    },
                )
            }
        };
        self.info = info;
        self.samples = samples;
    }
}
