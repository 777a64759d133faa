//! Table-row recovery from page content streams.
//!
//! Estimate documents lay their damage/parts grid out as absolutely
//! positioned text runs. Rather than full layout analysis, each text-show
//! operation is anchored at the current text position, runs are grouped
//! into rows by vertical proximity, and a row's runs become its cells in
//! left-to-right order. No business semantics live here; the field parsers
//! decide which rows are priced items.

use lopdf::content::Content;
use lopdf::Object;

use super::Result;
use crate::error::PdfError;

/// One recovered cell grid; rows top-to-bottom, cells left-to-right.
pub type Table = Vec<TableRow>;

/// Cells of a single visual row.
pub type TableRow = Vec<String>;

/// Vertical distance (in text-space units) within which two runs are
/// considered part of the same row.
const ROW_TOLERANCE: f32 = 3.0;

/// A text run anchored at the position where its show operation started.
struct TextRun {
    x: f32,
    y: f32,
    text: String,
}

/// Recover a cell grid from a page content stream.
pub fn recover_table(content: &[u8]) -> Result<Table> {
    let content = Content::decode(content).map_err(|e| PdfError::Parse(e.to_string()))?;

    let mut runs: Vec<TextRun> = Vec::new();

    // Current text position and line start, tracked through the subset of
    // text-positioning operators these documents actually use. Scaling and
    // rotation components of Tm are ignored; only the translation matters
    // for row/column grouping.
    let mut line_x = 0.0f32;
    let mut line_y = 0.0f32;
    let mut leading = 0.0f32;

    for op in &content.operations {
        let operands = &op.operands;
        match op.operator.as_str() {
            "BT" => {
                line_x = 0.0;
                line_y = 0.0;
            }
            "Tm" => {
                if operands.len() == 6 {
                    line_x = number(&operands[4]).unwrap_or(line_x);
                    line_y = number(&operands[5]).unwrap_or(line_y);
                }
            }
            "Td" => {
                if operands.len() == 2 {
                    line_x += number(&operands[0]).unwrap_or(0.0);
                    line_y += number(&operands[1]).unwrap_or(0.0);
                }
            }
            "TD" => {
                if operands.len() == 2 {
                    let ty = number(&operands[1]).unwrap_or(0.0);
                    line_x += number(&operands[0]).unwrap_or(0.0);
                    line_y += ty;
                    leading = -ty;
                }
            }
            "TL" => {
                if let Some(l) = operands.first().and_then(number) {
                    leading = l;
                }
            }
            "T*" => {
                line_y -= leading;
            }
            "Tj" => {
                if let Some(text) = operands.first().and_then(shown_text) {
                    push_run(&mut runs, line_x, line_y, text);
                }
            }
            "'" => {
                line_y -= leading;
                if let Some(text) = operands.first().and_then(shown_text) {
                    push_run(&mut runs, line_x, line_y, text);
                }
            }
            "\"" => {
                line_y -= leading;
                if let Some(text) = operands.get(2).and_then(shown_text) {
                    push_run(&mut runs, line_x, line_y, text);
                }
            }
            "TJ" => {
                if let Some(Object::Array(parts)) = operands.first() {
                    let text: String = parts.iter().filter_map(shown_text).collect();
                    push_run(&mut runs, line_x, line_y, text);
                }
            }
            _ => {}
        }
    }

    Ok(group_rows(runs))
}

fn push_run(runs: &mut Vec<TextRun>, x: f32, y: f32, text: String) {
    if !text.trim().is_empty() {
        runs.push(TextRun { x, y, text });
    }
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Decode a shown string. Simple byte encodings only: UTF-8 when valid,
/// Latin-1 otherwise; composite-font code points come out lossily.
fn shown_text(obj: &Object) -> Option<String> {
    match obj {
        Object::String(bytes, _) => Some(match std::str::from_utf8(bytes) {
            Ok(s) => s.to_string(),
            Err(_) => bytes.iter().map(|&b| b as char).collect(),
        }),
        _ => None,
    }
}

/// Group runs into rows by vertical proximity, then order cells by x.
fn group_rows(mut runs: Vec<TextRun>) -> Table {
    // Page coordinates grow upward; highest y is the top row.
    runs.sort_by(|a, b| b.y.partial_cmp(&a.y).unwrap_or(std::cmp::Ordering::Equal));

    let mut rows: Vec<(f32, Vec<TextRun>)> = Vec::new();
    for run in runs {
        match rows.last_mut() {
            Some((row_y, row)) if (run.y - *row_y).abs() <= ROW_TOLERANCE => row.push(run),
            _ => rows.push((run.y, vec![run])),
        }
    }

    rows.into_iter()
        .map(|(_, mut row)| {
            row.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
            row.into_iter().map(|r| r.text).collect()
        })
        .collect()
}
