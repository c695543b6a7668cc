use crate::{error::CombineError, utils::util::Result};
use flate2::read::MultiGzDecoder;
use std::{
    fs::File,
    io::{BufReader, Read as ioRead},
    path::Path,
};

pub fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".gzip")
}

/// Opens a plain or gzip/bgzip compressed text file for line reading.
pub fn open_text_reader(path: &Path) -> Result<BufReader<Box<dyn ioRead>>> {
    let file = File::open(path).map_err(|error| {
        crate::combine_error!("Failed to open file {}: {error}", path.display())
    })?;
    if is_gzipped(path) {
        let gz_decoder = MultiGzDecoder::new(file);
        if gz_decoder.header().is_some() {
            Ok(BufReader::new(Box::new(gz_decoder)))
        } else {
            Err(CombineError::InvalidGzipHeader {
                path: path.to_path_buf(),
            })
        }
    } else {
        Ok(BufReader::new(Box::new(file)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::{write::GzEncoder, Compression};
    use std::io::{BufRead, Write};
    use tempfile::tempdir;

    #[test]
    fn open_text_reader_reads_plain_and_gzipped_files() {
        let temp_dir = tempdir().expect("temp dir should be created");

        let plain = temp_dir.path().join("calls.vcf");
        std::fs::write(&plain, "##fileformat=VCFv4.2\n").expect("plain file should be written");
        let lines: Vec<String> = open_text_reader(&plain)
            .expect("plain file should open")
            .lines()
            .collect::<std::io::Result<_>>()
            .expect("lines should read");
        assert_eq!(lines, vec!["##fileformat=VCFv4.2"]);

        let gzipped = temp_dir.path().join("calls.vcf.gz");
        let mut encoder = GzEncoder::new(
            File::create(&gzipped).expect("gz file should be created"),
            Compression::default(),
        );
        encoder
            .write_all(b"##fileformat=VCFv4.2\n#CHROM\n")
            .expect("gz payload should be written");
        encoder.finish().expect("gz stream should finish");
        let lines: Vec<String> = open_text_reader(&gzipped)
            .expect("gz file should open")
            .lines()
            .collect::<std::io::Result<_>>()
            .expect("lines should read");
        assert_eq!(lines, vec!["##fileformat=VCFv4.2", "#CHROM"]);
    }

    #[test]
    fn open_text_reader_rejects_plain_text_with_gz_extension() {
        let temp_dir = tempdir().expect("temp dir should be created");
        let fake = temp_dir.path().join("fake.vcf.gz");
        std::fs::write(&fake, "not compressed\n").expect("file should be written");
        let Err(err) = open_text_reader(&fake) else {
            panic!("plain text with a .gz extension should be rejected");
        };
        assert!(matches!(err, CombineError::InvalidGzipHeader { .. }));
    }

    #[test]
    fn open_text_reader_reports_missing_file() {
        let temp_dir = tempdir().expect("temp dir should be created");
        let Err(err) = open_text_reader(&temp_dir.path().join("missing.vcf")) else {
            panic!("missing file should not open");
        };
        assert!(err.to_string().contains("Failed to open file"));
    }
}
