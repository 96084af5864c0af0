use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::ExportError;
use crate::export::document::ExportDocument;

const INDENT: &[u8] = b"    ";

/// Encodes the document as JSON: indented when `human_readable`, otherwise
/// without any insignificant whitespace.
pub fn encode<W: Write>(
    document: &ExportDocument,
    writer: W,
    human_readable: bool,
) -> serde_json::Result<()> {
    if human_readable {
        let mut serializer =
            serde_json::Serializer::with_formatter(writer, PrettyFormatter::with_indent(INDENT));
        document.serialize(&mut serializer)
    } else {
        serde_json::to_writer(writer, document)
    }
}

pub fn to_bytes(document: &ExportDocument, human_readable: bool) -> serde_json::Result<Vec<u8>> {
    let mut bytes = Vec::new();
    encode(document, &mut bytes, human_readable)?;
    Ok(bytes)
}

/// Creates or truncates `path` and writes the document to it as UTF-8.
/// Documents holding NaN or infinite numbers are refused before the file is
/// opened.
pub fn write_document(
    document: &ExportDocument,
    path: &Path,
    human_readable: bool,
) -> Result<(), ExportError> {
    if let Some(location) = document.find_non_finite() {
        let message = format!("non-finite number in {}", location);
        return Err(ExportError::write_failure(
            path,
            io::Error::new(io::ErrorKind::InvalidData, message),
        ));
    }

    let file = File::create(path).map_err(|e| ExportError::write_failure(path, e))?;
    let mut writer = BufWriter::new(file);

    encode(document, &mut writer, human_readable)
        .map_err(|e| ExportError::write_failure(path, e))?;
    writer
        .flush()
        .map_err(|e| ExportError::write_failure(path, e))?;

    Ok(())
}
