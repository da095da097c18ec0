use chrono::NaiveDate;

use super::*;

fn parse_first_card(html: &str, page: u32) -> Option<ReviewRecord> {
    let document = Html::parse_document(html);
    let card = review_cards(&document).into_iter().next()?;
    Some(parse_review_card(card, page))
}

// -----------------------------------------------------------------------
// full cards
// -----------------------------------------------------------------------

const FULL_CARD: &str = r#"
<div class="review-card">
  <div class="fw-600">Rahul Mehta</div>
  <h3>"Billing in minutes"</h3>
  <span class="fs-5">9 March, 2023</span>
  <div class="star-rating" aria-label="4.5 stars"><span>4.5</span></div>
  <p>We switched from spreadsheets and never looked back.</p>
  <div>Pros: Quick GST invoices</div>
  <div>Cons: Mobile app is slow</div>
</div>
"#;

#[test]
fn full_card_extracts_every_field() {
    let record = parse_first_card(FULL_CARD, 3).expect("card should parse");
    assert_eq!(record.reviewer_name, "Rahul Mehta");
    assert_eq!(record.review_title, "\"Billing in minutes\"");
    assert_eq!(record.review_date_raw, "9 March, 2023");
    assert_eq!(record.parsed_date, NaiveDate::from_ymd_opt(2023, 3, 9));
    assert!((record.rating - 4.5).abs() < f64::EPSILON);
    assert_eq!(
        record.content,
        "We switched from spreadsheets and never looked back."
    );
    assert_eq!(record.pros, "Pros: Quick GST invoices");
    assert_eq!(record.cons, "Cons: Mobile app is slow");
    assert_eq!(record.page_number, 3);
    assert_eq!(record.source, "Capterra");
}

#[test]
fn date_prefers_datetime_attribute() {
    let html = r#"
        <div class="review-card">
          <strong>Anita</strong>
          <time datetime="2023-01-15">last January</time>
        </div>"#;
    let record = parse_first_card(html, 1).unwrap();
    assert_eq!(record.review_date_raw, "2023-01-15");
    assert_eq!(record.parsed_date, NaiveDate::from_ymd_opt(2023, 1, 15));
}

#[test]
fn unparseable_date_keeps_raw_text_and_null_parsed_date() {
    let html = r#"
        <div class="review-card">
          <span class="review-date">a while ago</span>
          <p>Works fine.</p>
        </div>"#;
    let record = parse_first_card(html, 1).unwrap();
    assert_eq!(record.review_date_raw, "a while ago");
    assert!(record.parsed_date.is_none());
}

// -----------------------------------------------------------------------
// defaults
// -----------------------------------------------------------------------

#[test]
fn missing_fields_fall_back_to_defaults() {
    let html = r#"<div class="review-card"><span>Only a stray span</span></div>"#;
    let record = parse_first_card(html, 2).expect("sparse card is still a record");
    assert_eq!(record.reviewer_name, UNKNOWN_REVIEWER);
    assert_eq!(record.review_title, "");
    assert_eq!(record.review_date_raw, "");
    assert!(record.parsed_date.is_none());
    assert!(record.rating.abs() < f64::EPSILON);
    assert_eq!(record.content, "");
    assert_eq!(record.pros, "");
    assert_eq!(record.cons, "");
    assert_eq!(record.page_number, 2);
}

#[test]
fn name_selector_fallback_order() {
    let html = r#"
        <div class="review-card">
          <strong>Bold Text</strong>
          <h4>Kavya N.</h4>
        </div>"#;
    // h4 outranks strong in the name list even though strong comes first.
    assert_eq!(parse_first_card(html, 1).unwrap().reviewer_name, "Kavya N.");
}

// -----------------------------------------------------------------------
// rating
// -----------------------------------------------------------------------

#[test]
fn rating_uses_aria_label_when_text_is_empty() {
    let html = r#"
        <div class="review-card">
          <span aria-label="Rated 4 stars out of 5"></span>
        </div>"#;
    let record = parse_first_card(html, 1).unwrap();
    assert!((record.rating - 4.0).abs() < f64::EPSILON);
}

#[test]
fn rating_stops_at_first_matching_selector() {
    let html = r#"
        <div class="review-card">
          <span aria-label="five stars">★★★★★</span>
          <span class="rating">5.0</span>
        </div>"#;
    // The aria-label selector matches first and its text has no number;
    // later selectors are not consulted.
    let record = parse_first_card(html, 1).unwrap();
    assert!(record.rating.abs() < f64::EPSILON);
}

#[test]
fn rating_falls_through_selectors_until_one_matches() {
    let html = r#"
        <div class="review-card">
          <div class="overall-rating">Overall 3.5/5</div>
        </div>"#;
    let record = parse_first_card(html, 1).unwrap();
    assert!((record.rating - 3.5).abs() < f64::EPSILON);
}

#[test]
fn rating_token_parsing() {
    assert_eq!(parse_rating_token("4.5 out of 5"), Some(4.5));
    assert_eq!(parse_rating_token("Rated 5"), Some(5.0));
    assert_eq!(parse_rating_token("3."), Some(3.0));
    assert!(parse_rating_token("no stars").is_none());
    assert!(parse_rating_token("").is_none());
}

// -----------------------------------------------------------------------
// pros / cons
// -----------------------------------------------------------------------

#[test]
fn pros_cons_markers_are_case_insensitive() {
    let html = r#"
        <div class="review-card">
          <p>PROS: cheap</p>
          <ul>cons: <li>no payroll</li></ul>
        </div>"#;
    let record = parse_first_card(html, 1).unwrap();
    assert_eq!(record.pros, "PROS: cheap");
    assert_eq!(record.cons, "cons: no payroll");
}

#[test]
fn first_pros_section_wins() {
    let html = r#"
        <div class="review-card">
          <p>Pros: first</p>
          <p>Pros: second</p>
        </div>"#;
    let record = parse_first_card(html, 1).unwrap();
    assert_eq!(record.pros, "Pros: first");
    assert_eq!(record.cons, "");
}

#[test]
fn wrapper_without_own_marker_text_is_not_taken() {
    let html = r#"
        <div class="review-card">
          <div class="body">
            <p>Pros: offline mode</p>
          </div>
        </div>"#;
    let record = parse_first_card(html, 1).unwrap();
    assert_eq!(record.pros, "Pros: offline mode");
}

// -----------------------------------------------------------------------
// empty cards
// -----------------------------------------------------------------------

#[test]
fn empty_card_still_yields_a_default_record() {
    let html = r#"<div class="review-card"><div class="skeleton-line"></div></div>"#;
    let record = parse_first_card(html, 4).expect("every card is a record");
    assert_eq!(record.reviewer_name, UNKNOWN_REVIEWER);
    assert_eq!(record.review_date_raw, "");
    assert!(record.parsed_date.is_none());
    assert!(record.rating.abs() < f64::EPSILON);
    assert_eq!(record.page_number, 4);
    assert_eq!(record.source, "Capterra");
}

#[test]
fn card_with_only_empty_title_and_paragraph_is_kept() {
    let html = r#"<div class="review-card"><h3></h3><p></p></div>"#;
    let record = parse_first_card(html, 1).expect("every card is a record");
    assert_eq!(record.reviewer_name, UNKNOWN_REVIEWER);
    assert_eq!(record.review_title, "");
    assert_eq!(record.content, "");
}

#[test]
fn card_with_only_a_rating_label_is_kept() {
    let html = r#"<div class="review-card"><i aria-label="2 stars"></i></div>"#;
    let record = parse_first_card(html, 1).expect("rating-only card is a record");
    assert!((record.rating - 2.0).abs() < f64::EPSILON);
}

#[test]
fn review_cards_are_returned_in_document_order() {
    let html = r#"
        <div class="review-card"><strong>First</strong></div>
        <section><div class="review-card"><strong>Second</strong></div></section>
        <div class="not-a-card"><strong>Ignored</strong></div>"#;
    let document = Html::parse_document(html);
    let names: Vec<String> = review_cards(&document)
        .into_iter()
        .map(|card| parse_review_card(card, 1))
        .map(|r| r.reviewer_name)
        .collect();
    assert_eq!(names, vec!["First", "Second"]);
}
