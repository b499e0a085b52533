//! Text codec lookup for the `encoding` option.

use encoding_rs::Encoding;
use std::path::Path;

use crate::error::{DhelpError, Result};

/// Resolves an encoding label, accepting Python-style spellings such as
/// `utf_8` or `latin_1` alongside the WHATWG labels.
pub fn lookup(label: &str) -> Result<&'static Encoding> {
    let trimmed = label.trim();
    Encoding::for_label(trimmed.as_bytes())
        .or_else(|| Encoding::for_label(trimmed.replace('_', "-").as_bytes()))
        .or_else(|| Encoding::for_label(trimmed.replace(['_', '-'], "").as_bytes()))
        .ok_or_else(|| DhelpError::UnsupportedEncoding(label.to_string()))
}

/// Strictly decodes `bytes`. A byte order mark is kept as part of the text
/// so that saving the result reproduces the original bytes.
pub fn decode(bytes: &[u8], label: &str, origin: &Path) -> Result<String> {
    let encoding = lookup(label)?;
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
        .ok_or_else(|| {
            DhelpError::MalformedInput(format!(
                "{} is not valid {}",
                origin.display(),
                encoding.name()
            ))
        })
}

pub fn encode(text: &str, label: &str) -> Result<Vec<u8>> {
    let encoding = lookup(label)?;
    // encoding_rs only writes ASCII-compatible encodings
    if encoding.output_encoding() != encoding {
        return Err(DhelpError::UnsupportedEncoding(format!(
            "{} cannot be used for writing",
            encoding.name()
        )));
    }
    let (bytes, _, had_errors) = encoding.encode(text);
    if had_errors {
        return Err(DhelpError::MalformedInput(format!(
            "text contains characters not representable in {}",
            encoding.name()
        )));
    }
    Ok(bytes.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_accepts_python_names() {
        assert_eq!(lookup("utf_8").unwrap(), encoding_rs::UTF_8);
        assert_eq!(lookup("UTF-8").unwrap(), encoding_rs::UTF_8);
        assert_eq!(lookup("latin_1").unwrap(), encoding_rs::WINDOWS_1252);
    }

    #[test]
    fn test_lookup_rejects_unknown() {
        assert!(matches!(
            lookup("klingon-8"),
            Err(DhelpError::UnsupportedEncoding(_))
        ));
    }

    #[test]
    fn test_decode_rejects_invalid_bytes() {
        let result = decode(&[0x66, 0xff, 0x6f], "utf-8", Path::new("x.txt"));
        assert!(matches!(result, Err(DhelpError::MalformedInput(_))));
    }

    #[test]
    fn test_latin1_round_trip() {
        let bytes = encode("café", "latin1").unwrap();
        assert_eq!(bytes, vec![0x63, 0x61, 0x66, 0xe9]);
        assert_eq!(decode(&bytes, "latin1", Path::new("x")).unwrap(), "café");
    }

    #[test]
    fn test_bom_is_preserved() {
        let bytes = b"\xef\xbb\xbfhello";
        let text = decode(bytes, "utf-8", Path::new("x")).unwrap();
        assert_eq!(encode(&text, "utf-8").unwrap(), bytes.to_vec());
    }

    #[test]
    fn test_utf16_cannot_be_written() {
        assert!(matches!(
            encode("hi", "utf-16le"),
            Err(DhelpError::UnsupportedEncoding(_))
        ));
    }

    #[test]
    fn test_unmappable_characters_fail() {
        assert!(matches!(
            encode("ἀρχή", "latin1"),
            Err(DhelpError::MalformedInput(_))
        ));
    }
}
