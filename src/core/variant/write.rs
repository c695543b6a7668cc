use super::{FieldMap, SampleData, Variant};

fn render_info(info: &FieldMap) -> String {
    info.iter()
        .map(|(key, value)| {
            if key == value {
                key.clone()
            } else {
                format!("{key}={value}")
            }
        })
        .collect::<Vec<_>>()
        .join(";")
}

fn join_keys(format: &FieldMap) -> String {
    format.keys().map(String::as_str).collect::<Vec<_>>().join(":")
}

fn join_values(format: &FieldMap) -> String {
    format.values().map(String::as_str).collect::<Vec<_>>().join(":")
}

impl Variant {
    /// Tab-delimited VCF data line, without trailing newline.
    ///
    /// Somatic records share the normal sample's FORMAT names for both sample columns.
    pub fn to_line(&self) -> String {
        let mut columns = vec![
            self.chrom.clone(),
            self.pos.clone(),
            self.id.clone(),
            self.reference.clone(),
            self.alt.clone(),
            self.qual.clone(),
            self.filter.clone(),
            render_info(&self.info),
        ];
        match &self.samples {
            SampleData::Germline(format) => {
                columns.push(join_keys(format));
                columns.push(join_values(format));
            }
            SampleData::Somatic { normal, tumor } => {
                columns.push(join_keys(normal));
                columns.push(join_values(normal));
                columns.push(join_values(tumor));
            }
        }
        columns.join("\t")
    }
}
