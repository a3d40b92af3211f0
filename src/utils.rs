use crate::registry::TextEncoding;
use thiserror::Error;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const UTF16LE_BOM: &[u8] = b"\xFF\xFE";

/// Failure to decode bytes under a candidate encoding.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum DecodeError {
    #[error("invalid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("odd number of bytes for UTF-16")]
    OddLength,
    #[error("unpaired UTF-16 surrogate")]
    UnpairedSurrogate,
}

/// Decodes a whole file, dropping a leading byte-order mark.
pub(crate) fn decode_text(bytes: &[u8], encoding: TextEncoding) -> Result<String, DecodeError> {
    match encoding {
        TextEncoding::Utf8 | TextEncoding::Utf8Sig => {
            let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
            Ok(std::str::from_utf8(bytes)?.to_string())
        }
        TextEncoding::Utf16Le => {
            let bytes = bytes.strip_prefix(UTF16LE_BOM).unwrap_or(bytes);
            if bytes.len() % 2 != 0 {
                return Err(DecodeError::OddLength);
            }
            char::decode_utf16(utf16le_units(bytes))
                .collect::<Result<String, _>>()
                .map_err(|_| DecodeError::UnpairedSurrogate)
        }
    }
}

fn utf16le_units(bytes: &[u8]) -> impl Iterator<Item = u16> + '_ {
    bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
}

/// Decodes the first line as UTF-16LE, keeping any byte-order mark as `\u{feff}`.
pub(crate) fn first_line_utf16le(bytes: &[u8]) -> Result<String, DecodeError> {
    let mut line = String::new();
    for unit in char::decode_utf16(utf16le_units(bytes)) {
        let c = unit.map_err(|_| DecodeError::UnpairedSurrogate)?;
        if c == '\n' {
            return Ok(line);
        }
        line.push(c);
    }
    if bytes.len() % 2 != 0 {
        return Err(DecodeError::OddLength);
    }
    Ok(line)
}

/// Decodes the first line as UTF-8, dropping a leading byte-order mark.
pub(crate) fn first_line_utf8(bytes: &[u8]) -> Result<String, DecodeError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let end = bytes.iter().position(|b| *b == b'\n').unwrap_or(bytes.len());
    Ok(std::str::from_utf8(&bytes[..end])?.to_string())
}

/// Formats a spreadsheet number, without a fractional part when integral.
pub(crate) fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Parses the leading integer of a value such as `2020`, `2020.0` or `2020///`.
pub(crate) fn leading_integer(value: &str) -> Option<i64> {
    let value = value.trim();
    let digits_start = usize::from(value.starts_with(['-', '+']));
    let end = value[digits_start..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(value.len(), |i| i + digits_start);
    if end == digits_start {
        return None;
    }
    value[..end].parse().ok()
}
