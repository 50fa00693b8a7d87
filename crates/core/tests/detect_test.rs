//! End-to-end detection tests over an in-memory fragment source.
//!
//! Geometry uses a uniform grid: 12pt font, every character 6.0 units wide,
//! matching the proportional estimate the extraction adapter produces.

use fieldmark_core::{
    DetectorParams, FragmentSource, PageFragments, PlaceholderDetector, Result, TextFragment,
};

/// Fragment source serving a fixed page list, ignoring the input bytes.
struct StaticSource {
    pages: Vec<PageFragments>,
}

impl FragmentSource for StaticSource {
    fn fragments(&self, _pdf_data: &[u8]) -> Result<Vec<PageFragments>> {
        Ok(self.pages.clone())
    }
}

fn frag(text: &str, x: f64, y: f64, page: u32) -> TextFragment {
    let width = text.chars().count() as f64 * 6.0;
    TextFragment::new(text, x, y, width, 12.0, page)
}

fn detect(pages: Vec<PageFragments>) -> Vec<fieldmark_core::Placeholder> {
    let detector =
        PlaceholderDetector::with_source(StaticSource { pages }, DetectorParams::default());
    detector.detect(b"unused").expect("detection")
}

fn one_page(fragments: Vec<TextFragment>) -> Vec<PageFragments> {
    vec![PageFragments {
        number: 1,
        fragments,
    }]
}

#[test]
fn detects_a_simple_labelled_blank() {
    let found = detect(one_page(vec![frag("Name: ....(1).... Born", 0.0, 700.0, 1)]));

    assert_eq!(found.len(), 1);
    let p = &found[0];
    assert_eq!(p.id, 1);
    assert_eq!(p.original, "(1)");
    assert_eq!(p.extracted_key, "1");
    assert_eq!(p.page, 1);
    assert_eq!(p.y, 700.0);
    // Blank from the first dot after "Name: " to the last dot before " Born".
    assert_eq!(p.x, 6.0 * 6.0);
    assert_eq!(p.x + p.width, 17.0 * 6.0);
    assert_eq!(p.height, 12.0 * 1.2);
    assert_eq!(p.font_size, 12.0);
    assert!(!p.mapped);
    assert_eq!(p.tag_id, None);
}

#[test]
fn two_fields_on_one_line_get_separate_blanks() {
    let text = "Họ và tên: ................(1)................ Ngày sinh: ....(2)....";
    let found = detect(one_page(vec![frag(text, 0.0, 700.0, 1)]));

    assert_eq!(found.len(), 2);

    // First blank: dots 11..=45, so x = 11 chars in, end after char 45.
    assert_eq!(found[0].extracted_key, "1");
    assert_eq!(found[0].x, 11.0 * 6.0);
    assert_eq!(found[0].x + found[0].width, 46.0 * 6.0);

    // Second blank: governed by the "Ngày sinh:" colon, dots 58..=68.
    assert_eq!(found[1].extracted_key, "2");
    assert_eq!(found[1].x, 58.0 * 6.0);
    assert_eq!(found[1].x + found[1].width, 69.0 * 6.0);
}

#[test]
fn bare_parenthetical_in_prose_is_not_a_placeholder() {
    let found = detect(one_page(vec![frag(
        "as provided by clause (5) of this agreement",
        0.0,
        700.0,
        1,
    )]));
    assert!(found.is_empty());
}

#[test]
fn dotted_marker_is_a_placeholder() {
    let found = detect(one_page(vec![frag("......(5)......", 0.0, 700.0, 1)]));
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].extracted_key, "5");
}

#[test]
fn values_above_the_ceiling_are_ignored() {
    let found = detect(one_page(vec![frag("......(1999)......", 0.0, 700.0, 1)]));
    assert!(found.is_empty());
}

#[test]
fn glyph_split_marker_is_reassembled() {
    let found = detect(one_page(vec![
        frag("......", 0.0, 700.0, 1),
        frag("(", 36.0, 700.0, 1),
        frag("2", 42.0, 700.0, 1),
        frag("6", 48.0, 700.0, 1),
        frag(")", 54.0, 700.0, 1),
        frag("......", 60.0, 700.0, 1),
    ]));

    assert_eq!(found.len(), 1);
    let p = &found[0];
    assert_eq!(p.extracted_key, "26");
    assert_eq!(p.original, "(26)");
    assert_eq!(p.background_x, 42.0);
    assert_eq!(p.background_width, 12.0);
    // The whole dotted run is the blank.
    assert_eq!(p.x, 0.0);
    assert_eq!(p.x + p.width, 96.0);
}

#[test]
fn repeated_value_keeps_only_the_first_occurrence() {
    let pages = vec![
        PageFragments {
            number: 1,
            fragments: vec![frag("A: ....(3)....", 0.0, 700.0, 1)],
        },
        PageFragments {
            number: 2,
            fragments: vec![frag("B: ....(3)....", 0.0, 700.0, 2)],
        },
    ];
    let found = detect(pages);

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].page, 1);
}

#[test]
fn a_rejected_candidate_still_claims_its_value() {
    // Page 1 carries "(5)" in prose; it fails separator validation but a
    // later dotted "(5)" must not resurrect the value.
    let pages = vec![
        PageFragments {
            number: 1,
            fragments: vec![frag("per clause (5) herein", 0.0, 700.0, 1)],
        },
        PageFragments {
            number: 2,
            fragments: vec![frag("......(5)......", 0.0, 700.0, 2)],
        },
    ];
    let found = detect(pages);
    assert!(found.is_empty());
}

#[test]
fn ids_are_sequential_across_pages() {
    let pages = vec![
        PageFragments {
            number: 1,
            fragments: vec![frag("....(1).... and ....(2)....", 0.0, 700.0, 1)],
        },
        PageFragments {
            number: 2,
            fragments: vec![frag("....(3)....", 0.0, 700.0, 2)],
        },
    ];
    let found = detect(pages);

    let ids: Vec<u32> = found.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    let pages_seen: Vec<u32> = found.iter().map(|p| p.page).collect();
    assert_eq!(pages_seen, vec![1, 1, 2]);
}

#[test]
fn fragment_order_within_a_page_does_not_change_the_blank() {
    let ordered = vec![
        frag("Name: ", 0.0, 700.0, 1),
        frag("....(4)....", 36.0, 700.0, 1),
        frag(" Born", 102.0, 700.0, 1),
    ];
    let mut shuffled = ordered.clone();
    shuffled.reverse();

    let a = detect(one_page(ordered));
    let b = detect(one_page(shuffled));

    assert_eq!(a.len(), 1);
    assert_eq!(b.len(), 1);
    assert_eq!(a[0].x, b[0].x);
    assert_eq!(a[0].width, b[0].width);
}

#[test]
fn empty_document_yields_no_placeholders() {
    let found = detect(Vec::new());
    assert!(found.is_empty());
}

#[test]
fn detection_is_deterministic_across_runs() {
    let pages = || {
        vec![
            PageFragments {
                number: 1,
                fragments: vec![
                    frag("A: ....(1)....", 0.0, 700.0, 1),
                    frag("B: ....(2)....", 0.0, 650.0, 1),
                ],
            },
            PageFragments {
                number: 2,
                fragments: vec![frag("C: ....(3)....", 0.0, 700.0, 2)],
            },
        ]
    };

    let first = detect(pages());
    for _ in 0..10 {
        assert_eq!(detect(pages()), first);
    }
}
