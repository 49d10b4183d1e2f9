//! File and buffer reading with GemCad's legacy encoding.
//!
//! GemCad predates UTF-8 and its exports are usually ISO-8859-1. Files
//! are decoded as UTF-8 when they happen to be valid, otherwise byte by
//! byte as Latin-1, which cannot fail.

use std::fs;
use std::path::Path;

use crate::parser::{parse, FacetProgram};
use crate::Result;

/// Reads and parses a facet diagram from a file.
pub fn read_asc<P: AsRef<Path>>(path: P) -> Result<FacetProgram> {
    let bytes = fs::read(path)?;
    read_asc_from_buffer(&bytes)
}

/// Parses a facet diagram from raw bytes.
pub fn read_asc_from_buffer(bytes: &[u8]) -> Result<FacetProgram> {
    parse(&decode(bytes))
}

/// UTF-8 if valid, Latin-1 otherwise. Every byte maps to the Unicode
/// code point of the same value, so this never loses instruction text.
fn decode(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_buffer_parses_directly() {
        let program = read_asc_from_buffer(b"g 96\na 42.0 4.0 0 24\n").unwrap();
        assert_eq!(program.full_rotation, 96);
        assert_eq!(program.facet_sets[0].indices, vec![0, 24]);
    }

    #[test]
    fn latin1_header_survives_decoding() {
        // "Facett\xe9" is invalid UTF-8 but fine Latin-1.
        let mut bytes = b"H Facett\xe9\ng 8\na 45.0 2.0 1\n".to_vec();
        let program = read_asc_from_buffer(&bytes).unwrap();
        assert_eq!(program.header, "Facett\u{e9}");

        // The same text as UTF-8 decodes identically.
        bytes = "H Facetté\ng 8\na 45.0 2.0 1\n".as_bytes().to_vec();
        let utf8 = read_asc_from_buffer(&bytes).unwrap();
        assert_eq!(utf8.header, program.header);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            read_asc("definitely/not/here.asc"),
            Err(crate::AscError::Io(_))
        ));
    }
}
