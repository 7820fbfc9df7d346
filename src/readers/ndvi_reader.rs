use crate::error::{ProcessingError, Result};
use crate::models::RawNdviRow;
use crate::utils::constants::{COL_GEO, COL_SYSTEM_INDEX, DEFAULT_BUFFER_SIZE, REQUIRED_COLUMNS};
use encoding_rs::{Encoding, WINDOWS_1252};
use memmap2::Mmap;
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, warn};

pub struct NdviReader {
    use_mmap: bool,
}

impl NdviReader {
    pub fn new() -> Self {
        Self { use_mmap: false }
    }

    pub fn with_mmap(use_mmap: bool) -> Self {
        Self { use_mmap }
    }

    /// Read every row of an NDVI export into memory
    pub fn read_rows(&self, path: &Path) -> Result<Vec<RawNdviRow>> {
        if self.use_mmap {
            self.read_rows_mmap(path)
        } else {
            self.read_rows_buffered(path)
        }
    }

    fn read_rows_buffered(&self, path: &Path) -> Result<Vec<RawNdviRow>> {
        let file = File::open(path)?;
        let mut reader = BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file);
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;

        let text = decode_input(&bytes);
        self.parse_rows(text.as_bytes())
    }

    fn read_rows_mmap(&self, path: &Path) -> Result<Vec<RawNdviRow>> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };

        let text = decode_input(&mmap);
        self.parse_rows(text.as_bytes())
    }

    /// Parse CSV text with a header row.
    ///
    /// Fails when a required column is absent. `.geo` and any other extra
    /// columns are ignored.
    pub fn parse_rows<R: Read>(&self, input: R) -> Result<Vec<RawNdviRow>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(input);

        let headers = reader.headers()?.clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(ProcessingError::MissingColumn(column.to_string()));
            }
        }

        if headers.iter().any(|h| h == COL_GEO) {
            debug!("Dropping '{}' column", COL_GEO);
        }
        if !headers.iter().any(|h| h == COL_SYSTEM_INDEX) {
            debug!("No '{}' column; rows carry no identifier", COL_SYSTEM_INDEX);
        }

        let mut rows = Vec::new();
        for result in reader.deserialize::<RawNdviRow>() {
            rows.push(result?);
        }

        debug!("Read {} rows", rows.len());
        Ok(rows)
    }
}

impl Default for NdviReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode raw file bytes, honouring a BOM and falling back to Windows-1252
/// when the content is not UTF-8.
pub fn decode_input(bytes: &[u8]) -> Cow<'_, str> {
    if let Some((encoding, bom_length)) = Encoding::for_bom(bytes) {
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_length..]);
        return text;
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => {
            warn!("Input is not valid UTF-8; decoding as Windows-1252");
            let (text, _, _) = WINDOWS_1252.decode(bytes);
            text
        }
    }
}
