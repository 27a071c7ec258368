//! KMZ packaging and export file names.

use std::io::{Cursor, Write as _};

use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

use crate::ExportError;

/// Name of the KML entry inside every KMZ.
pub const KML_ENTRY: &str = "doc.kml";

/// `FIELD_SURVEY_{millis}.kmz`
#[must_use]
pub fn kmz_file_name(millis: i64) -> String {
    format!("FIELD_SURVEY_{millis}.kmz")
}

/// `FIELD_SURVEY_REPORT_{millis}.{extension}`
#[must_use]
pub fn report_file_name(millis: i64, extension: &str) -> String {
    format!("FIELD_SURVEY_REPORT_{millis}.{extension}")
}

/// Zips `kml` into a single deflated `doc.kml` entry.
///
/// # Errors
///
/// * If the archive cannot be written
pub fn package_kmz(kml: &str) -> Result<Vec<u8>, ExportError> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file(KML_ENTRY, options)?;
    zip.write_all(kml.as_bytes()).map_err(|e| ExportError::Io {
        path: KML_ENTRY.to_string(),
        source: e,
    })?;

    let cursor = zip.finish()?;
    let bytes = cursor.into_inner();
    log::debug!("package_kmz: {} bytes of KML -> {} bytes", kml.len(), bytes.len());
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use std::io::Read as _;

    use super::*;

    #[test]
    fn archive_holds_a_single_kml_entry() {
        let kml = "<?xml version=\"1.0\"?><kml></kml>";
        let bytes = package_kmz(kml).unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 1);

        let mut entry = archive.by_name(KML_ENTRY).unwrap();
        assert_eq!(entry.compression(), CompressionMethod::Deflated);
        let mut contents = String::new();
        entry.read_to_string(&mut contents).unwrap();
        assert_eq!(contents, kml);
    }

    #[test]
    fn file_names_carry_the_timestamp() {
        assert_eq!(kmz_file_name(1_700_000_000_000), "FIELD_SURVEY_1700000000000.kmz");
        assert_eq!(
            report_file_name(42, "png"),
            "FIELD_SURVEY_REPORT_42.png"
        );
    }
}
