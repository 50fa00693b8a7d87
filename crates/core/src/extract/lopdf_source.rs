//! lopdf-backed fragment extraction.
//!
//! Interprets each page's content stream, tracking the text matrix through
//! the text-positioning operators, and emits one [`TextFragment`] per shown
//! string. Exact glyph metrics are not loaded; run widths are estimated
//! from an average glyph advance, which is sufficient for the proportional
//! character positioning the detector performs.

use std::collections::BTreeMap;

use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId};

use super::FragmentSource;
use crate::error::{DetectError, Result};
use crate::fragment::{PageFragments, TextFragment};

/// Average glyph advance relative to the font size.
const AVG_GLYPH_ADVANCE_EM: f64 = 0.5;

/// Font size assumed before any Tf operator has been seen.
const DEFAULT_FONT_SIZE: f64 = 12.0;

/// Line-height factor applied by the `T*`, `'` and `"` operators when no
/// leading has been set.
const DEFAULT_LEADING_FACTOR: f64 = 1.2;

const MATRIX_IDENTITY: [f64; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// The default [`FragmentSource`], parsing documents with [`lopdf`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfSource;

impl FragmentSource for LopdfSource {
    fn fragments(&self, pdf_data: &[u8]) -> Result<Vec<PageFragments>> {
        let doc = Document::load_mem(pdf_data)
            .map_err(|e| DetectError::DocumentParse(format!("failed to load document: {e}")))?;

        let mut pages = Vec::new();
        for (number, page_id) in doc.get_pages() {
            let fragments = extract_page(&doc, page_id, number)?;
            pages.push(PageFragments { number, fragments });
        }
        Ok(pages)
    }
}

/// Text state threaded through one page's content stream.
struct TextState {
    text_matrix: [f64; 6],
    line_matrix: [f64; 6],
    font: String,
    size: f64,
    leading: f64,
}

impl TextState {
    fn new() -> Self {
        Self {
            text_matrix: MATRIX_IDENTITY,
            line_matrix: MATRIX_IDENTITY,
            font: String::new(),
            size: DEFAULT_FONT_SIZE,
            leading: 0.0,
        }
    }

    fn begin_text(&mut self) {
        self.text_matrix = MATRIX_IDENTITY;
        self.line_matrix = MATRIX_IDENTITY;
    }

    /// Font size as rendered, including the text-matrix scale.
    fn effective_size(&self) -> f64 {
        let scale = f64::hypot(self.text_matrix[0], self.text_matrix[1]);
        if scale == 0.0 { self.size } else { self.size * scale }
    }

    /// Translates the line matrix by (tx, ty) and restarts the text matrix
    /// from it (Td/TD semantics).
    fn move_text(&mut self, tx: f64, ty: f64) {
        self.line_matrix[4] += tx;
        self.line_matrix[5] += ty;
        self.text_matrix = self.line_matrix;
    }

    /// Moves to the start of the next line (T* semantics).
    fn next_line(&mut self) {
        let leading = if self.leading != 0.0 {
            self.leading
        } else {
            self.size * DEFAULT_LEADING_FACTOR
        };
        self.line_matrix[5] -= leading;
        self.text_matrix = self.line_matrix;
    }
}

fn extract_page(doc: &Document, page_id: ObjectId, page_number: u32) -> Result<Vec<TextFragment>> {
    let fonts = doc.get_page_fonts(page_id).unwrap_or_default();

    let content_data = doc
        .get_page_content(page_id)
        .map_err(|e| DetectError::DocumentParse(format!("failed to read page content: {e}")))?;
    let content = Content::decode(&content_data)
        .map_err(|e| DetectError::DocumentParse(format!("failed to decode content stream: {e}")))?;

    let mut fragments = Vec::new();
    let mut state = TextState::new();
    let mut in_text = false;

    for op in &content.operations {
        match op.operator.as_str() {
            "BT" => {
                in_text = true;
                state.begin_text();
            }
            "ET" => in_text = false,
            "Tf" => {
                if op.operands.len() >= 2 {
                    if let Ok(name) = op.operands[0].as_name() {
                        state.font = String::from_utf8_lossy(name).into_owned();
                    }
                    if let Some(size) = operand_number(&op.operands[1]) {
                        state.size = size;
                    }
                }
            }
            "TL" => {
                if let Some(leading) = op.operands.first().and_then(operand_number) {
                    state.leading = leading;
                }
            }
            "Td" => {
                if op.operands.len() >= 2 {
                    let tx = operand_number(&op.operands[0]).unwrap_or(0.0);
                    let ty = operand_number(&op.operands[1]).unwrap_or(0.0);
                    state.move_text(tx, ty);
                }
            }
            "TD" => {
                if op.operands.len() >= 2 {
                    let tx = operand_number(&op.operands[0]).unwrap_or(0.0);
                    let ty = operand_number(&op.operands[1]).unwrap_or(0.0);
                    state.leading = -ty;
                    state.move_text(tx, ty);
                }
            }
            "Tm" => {
                if op.operands.len() >= 6 {
                    for (i, operand) in op.operands.iter().take(6).enumerate() {
                        state.text_matrix[i] = operand_number(operand)
                            .unwrap_or(if i == 0 || i == 3 { 1.0 } else { 0.0 });
                    }
                    state.line_matrix = state.text_matrix;
                }
            }
            "T*" => state.next_line(),
            "Tj" => {
                if in_text && let Some(operand) = op.operands.first() {
                    show_string(doc, &fonts, &mut state, operand, page_number, &mut fragments);
                }
            }
            "'" => {
                if in_text && let Some(operand) = op.operands.first() {
                    state.next_line();
                    show_string(doc, &fonts, &mut state, operand, page_number, &mut fragments);
                }
            }
            "\"" => {
                // Operands are word spacing, char spacing, string; the
                // spacings are ignored by this estimator.
                if in_text && let Some(operand) = op.operands.get(2) {
                    state.next_line();
                    show_string(doc, &fonts, &mut state, operand, page_number, &mut fragments);
                }
            }
            "TJ" => {
                if in_text && let Some(Object::Array(items)) = op.operands.first() {
                    for item in items {
                        match item {
                            Object::String(..) => {
                                show_string(
                                    doc,
                                    &fonts,
                                    &mut state,
                                    item,
                                    page_number,
                                    &mut fragments,
                                );
                            }
                            other => {
                                if let Some(adjust) = operand_number(other) {
                                    // Positioning adjustments are in
                                    // thousandths of the font size.
                                    state.text_matrix[4] -=
                                        adjust / 1000.0 * state.effective_size();
                                }
                            }
                        }
                    }
                }
            }
            _ => {}
        }
    }

    Ok(fragments)
}

/// Emits a fragment for a shown string and advances the text matrix past it.
fn show_string(
    doc: &Document,
    fonts: &BTreeMap<Vec<u8>, &Dictionary>,
    state: &mut TextState,
    operand: &Object,
    page_number: u32,
    fragments: &mut Vec<TextFragment>,
) {
    let Object::String(bytes, _) = operand else {
        return;
    };
    let text = decode_string(doc, fonts, &state.font, bytes);
    if text.is_empty() {
        return;
    }

    let size = state.effective_size();
    let width = text.chars().count() as f64 * size * AVG_GLYPH_ADVANCE_EM;
    fragments.push(TextFragment::new(
        text,
        state.text_matrix[4],
        state.text_matrix[5],
        width,
        size,
        page_number,
    ));
    state.text_matrix[4] += width;
}

/// Decodes a shown string through the current font's encoding, falling back
/// to UTF-16BE (BOM-prefixed) and then Latin-1.
fn decode_string(
    doc: &Document,
    fonts: &BTreeMap<Vec<u8>, &Dictionary>,
    font: &str,
    bytes: &[u8],
) -> String {
    if let Some(font_dict) = fonts.get(font.as_bytes())
        && let Ok(encoding) = font_dict.get_font_encoding(doc)
        && let Ok(text) = Document::decode_text(&encoding, bytes)
    {
        return text;
    }

    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    bytes.iter().map(|&b| b as char).collect()
}

fn operand_number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(f64::from(*r)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin1_fallback_for_unknown_font() {
        let doc = Document::with_version("1.5");
        let fonts = BTreeMap::new();
        assert_eq!(decode_string(&doc, &fonts, "F1", b"Name: ..."), "Name: ...");
    }

    #[test]
    fn utf16_fallback_decodes_bom_prefixed_strings() {
        let doc = Document::with_version("1.5");
        let fonts = BTreeMap::new();
        // "(1)" as UTF-16BE with BOM
        let bytes = [0xFE, 0xFF, 0x00, 0x28, 0x00, 0x31, 0x00, 0x29];
        assert_eq!(decode_string(&doc, &fonts, "F1", &bytes), "(1)");
    }

    #[test]
    fn text_state_advances_past_shown_runs() {
        let mut state = TextState::new();
        state.size = 10.0;
        state.move_text(50.0, 700.0);
        assert_eq!(state.text_matrix[4], 50.0);

        // Four characters at 0.5 em advance
        let advance = 4.0 * 10.0 * AVG_GLYPH_ADVANCE_EM;
        state.text_matrix[4] += advance;
        assert_eq!(state.text_matrix[4], 70.0);

        state.next_line();
        assert_eq!(state.text_matrix[4], 50.0);
        assert_eq!(state.text_matrix[5], 700.0 - 12.0);
    }

    #[test]
    fn effective_size_follows_matrix_scale() {
        let mut state = TextState::new();
        state.size = 12.0;
        assert_eq!(state.effective_size(), 12.0);
        state.text_matrix = [2.0, 0.0, 0.0, 2.0, 0.0, 0.0];
        assert_eq!(state.effective_size(), 24.0);
    }
}
