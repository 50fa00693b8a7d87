//! Detected placeholder records.

use serde::Serialize;

/// A detected fill-in placeholder.
///
/// The `x`/`y`/`width`/`height` rectangle covers the fillable blank the
/// marker sits in, not the marker digits themselves;
/// `background_x`/`background_width` cover only the digit token, for
/// highlighting the marker separately from its blank.
///
/// `mapped` and `tag_id` are always `false`/`None` at detection time; the
/// downstream field-mapping UI mutates them when a user binds a tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placeholder {
    /// Synthetic id, sequential per detection run.
    pub id: u32,
    /// Literal marker text, e.g. `"(12)"`.
    pub original: String,
    /// The marker digits with no surrounding whitespace, e.g. `"12"`.
    pub extracted_key: String,
    /// 1-based page number.
    pub page: u32,
    /// Left edge of the fillable blank.
    pub x: f64,
    /// Baseline y of the marker's line.
    pub y: f64,
    /// Width of the fillable blank.
    pub width: f64,
    /// Height of the blank, derived from the marker font size.
    pub height: f64,
    /// Left edge of the digit token.
    pub background_x: f64,
    /// Width of the digit token.
    pub background_width: f64,
    /// Font size of the fragment containing the digits, for sizing overlay
    /// text.
    pub font_size: f64,
    /// Whether a tag has been bound to this placeholder.
    pub mapped: bool,
    /// Id of the bound tag, if any.
    pub tag_id: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_keys() {
        let placeholder = Placeholder {
            id: 1,
            original: "(7)".to_string(),
            extracted_key: "7".to_string(),
            page: 2,
            x: 10.0,
            y: 700.0,
            width: 120.0,
            height: 14.4,
            background_x: 60.0,
            background_width: 6.0,
            font_size: 12.0,
            mapped: false,
            tag_id: None,
        };

        let json = serde_json::to_value(&placeholder).expect("serialize placeholder");
        assert_eq!(json["extractedKey"], "7");
        assert_eq!(json["backgroundX"], 60.0);
        assert_eq!(json["backgroundWidth"], 6.0);
        assert_eq!(json["fontSize"], 12.0);
        assert_eq!(json["tagId"], serde_json::Value::Null);
        assert_eq!(json["mapped"], false);
    }
}
