//! Tokenizing label lines into [`AnnotationRecord`]s.
//!
//! One annotation per line: a class id followed by whitespace-separated
//! normalized values. Blank lines and `#` comments are skipped. Shape checks
//! (odd counts, short polygons) are left to the geometry core.

use label_coverage_core::AnnotationRecord;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("line {line}: missing class id")]
    MissingClassId { line: usize },
    #[error("line {line}: invalid class id {token:?}")]
    InvalidClassId { line: usize, token: String },
    #[error("line {line}: invalid number {token:?}")]
    InvalidNumber { line: usize, token: String },
}

/// Class ids are written as integers, but some exporters emit `0.0`; accept
/// any non-negative float with no fractional part.
fn parse_class_id(token: &str, line: usize) -> Result<u32, ParseError> {
    if let Ok(id) = token.parse::<u32>() {
        return Ok(id);
    }
    let invalid = || ParseError::InvalidClassId {
        line,
        token: token.to_string(),
    };
    let v: f64 = token.parse().map_err(|_| invalid())?;
    if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= u32::MAX as f64 {
        Ok(v as u32)
    } else {
        Err(invalid())
    }
}

/// Parse a single line. `line` is the 1-based line number used in errors.
///
/// Returns `Ok(None)` for blank and comment lines.
pub fn parse_annotation_line(text: &str, line: usize) -> Result<Option<AnnotationRecord>, ParseError> {
    let text = text.trim();
    if text.is_empty() || text.starts_with('#') {
        return Ok(None);
    }

    let mut tokens = text.split_whitespace();
    let class_token = tokens.next().ok_or(ParseError::MissingClassId { line })?;
    let class_id = parse_class_id(class_token, line)?;

    let values = tokens
        .map(|tok| {
            tok.parse::<f64>().map_err(|_| ParseError::InvalidNumber {
                line,
                token: tok.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(AnnotationRecord::new(class_id, values)))
}

/// Parse a whole label file's contents, keeping line order.
pub fn parse_annotations(text: &str) -> Result<Vec<AnnotationRecord>, ParseError> {
    let mut out = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        if let Some(rec) = parse_annotation_line(raw, idx + 1)? {
            out.push(rec);
        }
    }
    Ok(out)
}
