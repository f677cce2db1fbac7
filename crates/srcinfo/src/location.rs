//! Raw location records: the `(path, span, comments)` triples a descriptor
//! compiler emits per file, decoupled from their proto encoding.

use prost_types::source_code_info::Location as LocationProto;
use prost_types::SourceCodeInfo;
use serde::{Deserialize, Serialize};

/// A zero-based source span.
///
/// The proto encoding is either four elements (`start_line`, `start_col`,
/// `end_line`, `end_col`) or the single-line short form of three
/// (`start_line`, `start_col`, `end_col`); the short form synthesizes
/// `end_line = start_line`. Anything else is an upstream contract violation
/// and decodes to the zero span.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Zero-based first line.
    pub start_line: i32,
    /// Zero-based column on the first line.
    pub start_col: i32,
    /// Zero-based last line.
    pub end_line: i32,
    /// Zero-based column just past the span on the last line.
    pub end_col: i32,
}

impl Span {
    /// Decodes the proto span encoding.
    #[must_use]
    pub fn from_proto_span(span: &[i32]) -> Self {
        match *span {
            [start_line, start_col, end_col] => Self {
                start_line,
                start_col,
                end_line: start_line,
                end_col,
            },
            [start_line, start_col, end_line, end_col] => Self {
                start_line,
                start_col,
                end_line,
                end_col,
            },
            _ => Self::default(),
        }
    }

    /// Re-encodes into the proto span form, using the three-element short
    /// form for single-line spans the way `protoc` does.
    #[must_use]
    pub fn to_proto_span(self) -> Vec<i32> {
        if self.start_line == self.end_line {
            vec![self.start_line, self.start_col, self.end_col]
        } else {
            vec![self.start_line, self.start_col, self.end_line, self.end_col]
        }
    }
}

/// One raw location record attached to a structural path.
///
/// Multiple records may share a path (repeated annotations on one element);
/// their relative order is meaningful and preserved everywhere downstream.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLocation {
    /// Structural path of the element this record belongs to.
    pub path: Vec<i32>,
    /// Source span of the element.
    pub span: Span,
    /// Comment block directly above the element, if any.
    pub leading_comments: Option<String>,
    /// Comment on the same line after the element, if any.
    pub trailing_comments: Option<String>,
    /// Detached comment blocks above the element, blank-line separated.
    pub leading_detached_comments: Vec<String>,
}

impl RawLocation {
    /// Decodes a single proto location.
    #[must_use]
    pub fn from_proto(loc: &LocationProto) -> Self {
        Self {
            path: loc.path.clone(),
            span: Span::from_proto_span(&loc.span),
            leading_comments: loc.leading_comments.clone(),
            trailing_comments: loc.trailing_comments.clone(),
            leading_detached_comments: loc.leading_detached_comments.clone(),
        }
    }

    /// Flattens a whole `SourceCodeInfo`, preserving record order.
    #[must_use]
    pub fn from_source_code_info(info: &SourceCodeInfo) -> Vec<Self> {
        info.location.iter().map(Self::from_proto).collect()
    }

    /// Re-encodes into the proto location shape.
    #[must_use]
    pub fn to_proto(&self) -> LocationProto {
        LocationProto {
            path: self.path.clone(),
            span: self.span.to_proto_span(),
            leading_comments: self.leading_comments.clone(),
            trailing_comments: self.trailing_comments.clone(),
            leading_detached_comments: self.leading_detached_comments.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_span_form_synthesizes_end_line() {
        let s = Span::from_proto_span(&[7, 2, 30]);
        assert_eq!(
            s,
            Span {
                start_line: 7,
                start_col: 2,
                end_line: 7,
                end_col: 30
            }
        );
    }

    #[test]
    fn long_span_form_is_verbatim() {
        let s = Span::from_proto_span(&[3, 0, 9, 1]);
        assert_eq!(s.end_line, 9);
        assert_eq!(s.to_proto_span(), vec![3, 0, 9, 1]);
    }

    #[test]
    fn malformed_span_decodes_to_zero() {
        assert_eq!(Span::from_proto_span(&[]), Span::default());
        assert_eq!(Span::from_proto_span(&[1, 2]), Span::default());
        assert_eq!(Span::from_proto_span(&[1, 2, 3, 4, 5]), Span::default());
    }

    #[test]
    fn single_line_round_trips_to_short_form() {
        let s = Span::from_proto_span(&[7, 2, 30]);
        assert_eq!(s.to_proto_span(), vec![7, 2, 30]);
    }
}
