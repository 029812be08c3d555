use pricelens_core::PriceQuote;

use super::*;

fn outcome() -> ResolutionOutcome {
    ResolutionOutcome {
        urls_with_prices: vec![
            PriceQuote::new("https://www.flipkart.com/p/1", "₹1,299"),
            PriceQuote::new("https://www.ajio.com/p/2", "N/A"),
        ],
        best_guess_labels: Some(vec!["denim jacket".to_owned()]),
    }
}

#[test]
fn recognition_from_args_keeps_url_order() {
    let recognition = recognition_from_args(
        Some("denim jacket".to_owned()),
        vec!["https://a.example/1".to_owned(), "https://b.example/2".to_owned()],
    );
    assert_eq!(recognition.best_guess_labels, vec!["denim jacket"]);
    assert_eq!(
        recognition.matching_pages,
        vec![
            PageRef::new("https://a.example/1"),
            PageRef::new("https://b.example/2"),
        ]
    );
    assert!(recognition.service_error.is_none());
}

#[test]
fn recognition_from_args_without_label_has_no_labels() {
    let recognition = recognition_from_args(None, vec![]);
    assert!(recognition.best_guess_labels.is_empty());
    assert!(recognition.product_label().is_none());
}

#[test]
fn render_outcome_json_uses_wire_field_names() {
    let rendered = render_outcome(&outcome(), false).unwrap();
    let json: serde_json::Value = serde_json::from_str(&rendered).unwrap();
    assert_eq!(json["urls_with_prices"][0]["price"], "₹1,299");
    assert_eq!(json["best_guess_labels"][0], "denim jacket");
}

#[test]
fn render_outcome_table_lists_rows_in_order() {
    let rendered = render_outcome(&outcome(), true).unwrap();
    let lines: Vec<&str> = rendered.lines().collect();
    assert!(lines[0].starts_with("URL"));
    assert!(lines[1].starts_with("https://www.flipkart.com/p/1"));
    assert!(lines[1].ends_with("₹1,299"));
    assert!(lines[2].ends_with("N/A"));
    assert_eq!(lines.last().copied(), Some("best guess: denim jacket"));
}

#[test]
fn render_outcome_table_handles_empty_outcome() {
    let rendered = render_outcome(&ResolutionOutcome::default(), true).unwrap();
    assert_eq!(rendered, "URL  PRICE");
}
