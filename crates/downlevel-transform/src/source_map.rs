//! Source Map v3 generation from cursor mapping segments.
//!
//! The cursor records one segment per catch-up: an output span produced from
//! a source span. Moves are deletions and appends are unmapped insertions,
//! so neither contributes mappings. Verbatim (identity) segments additionally
//! get one mapping point per output line, so debuggers can resolve positions
//! inside multi-line copied spans.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use downlevel_core::text::byte_offset_to_position;
use serde::{Deserialize, Serialize};

use crate::cursor::MappingSegment;

const BASE64_VLQ_CHARS: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// A Source Map v3 document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMap {
    pub version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub sources: Vec<String>,
    pub names: Vec<String>,
    pub mappings: String,
}

impl SourceMap {
    /// Build a map from the cursor's recorded segments.
    ///
    /// `source` and `output` are the full input and output texts; byte
    /// offsets in the segments are resolved against them to 0-indexed
    /// line/column pairs.
    pub fn from_segments(
        segments: &[MappingSegment],
        source: &str,
        output: &str,
        filename: Option<&str>,
    ) -> Self {
        let points = collect_points(segments, source, output);
        SourceMap {
            version: 3,
            file: None,
            sources: vec![filename.unwrap_or("<source>").to_string()],
            names: Vec::new(),
            mappings: build_mappings(&points),
        }
    }

    /// Render the inline data-URI comment form.
    pub fn to_inline_comment(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::to_string(self)?;
        Ok(format!(
            "//# sourceMappingURL=data:application/json;charset=utf-8;base64,{}",
            BASE64.encode(json)
        ))
    }
}

#[derive(Debug, Clone, Copy)]
struct MappingPoint {
    out_line: u32,
    out_col: u32,
    src_line: u32,
    src_col: u32,
}

fn zero_indexed(content: &str, offset: usize) -> (u32, u32) {
    let (line, col) = byte_offset_to_position(content, offset);
    (line - 1, col - 1)
}

#[allow(unused_assignments)]
fn collect_points(segments: &[MappingSegment], source: &str, output: &str) -> Vec<MappingPoint> {
    let mut points = Vec::new();
    for segment in segments {
        let (mut out_line, mut out_col) = zero_indexed(output, segment.output.start);
        let (mut src_line, mut src_col) = zero_indexed(source, segment.source.start);
        points.push(MappingPoint {
            out_line,
            out_col,
            src_line,
            src_col,
        });
        if !segment.is_identity() {
            // transformed spans map only at their start
            continue;
        }
        let text = &output[segment.output.start..segment.output.end];
        let mut chars = text.chars().peekable();
        while let Some(ch) = chars.next() {
            if ch == '\n' {
                out_line += 1;
                out_col = 0;
                src_line += 1;
                src_col = 0;
                if chars.peek().is_some() {
                    points.push(MappingPoint {
                        out_line,
                        out_col,
                        src_line,
                        src_col,
                    });
                }
            } else {
                out_col += 1;
                src_col += 1;
            }
        }
    }
    points
}

fn build_mappings(points: &[MappingPoint]) -> String {
    let mut mappings = String::new();
    let mut current_line = 0u32;
    let mut first_on_line = true;
    let mut prev_out_col = 0i64;
    let mut prev_src_line = 0i64;
    let mut prev_src_col = 0i64;

    for point in points {
        while current_line < point.out_line {
            mappings.push(';');
            current_line += 1;
            prev_out_col = 0;
            first_on_line = true;
        }
        if !first_on_line {
            mappings.push(',');
        }
        vlq_encode(i64::from(point.out_col) - prev_out_col, &mut mappings);
        // single-source map: the source index never moves
        vlq_encode(0, &mut mappings);
        vlq_encode(i64::from(point.src_line) - prev_src_line, &mut mappings);
        vlq_encode(i64::from(point.src_col) - prev_src_col, &mut mappings);
        prev_out_col = i64::from(point.out_col);
        prev_src_line = i64::from(point.src_line);
        prev_src_col = i64::from(point.src_col);
        first_on_line = false;
    }
    mappings
}

fn vlq_encode(value: i64, out: &mut String) {
    let mut v: u64 = if value < 0 {
        ((value.unsigned_abs()) << 1) | 1
    } else {
        (value as u64) << 1
    };
    loop {
        let mut digit = (v & 0b11111) as u8;
        v >>= 5;
        if v != 0 {
            digit |= 0b100000;
        }
        out.push(BASE64_VLQ_CHARS[digit as usize] as char);
        if v == 0 {
            break;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
