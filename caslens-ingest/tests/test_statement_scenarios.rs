use std::cell::RefCell;

use caslens_core::{PlanType, RecordSource};
use caslens_ingest::{
    CasError, MemoryTextLayer, ParserConfig, StatementParser, TextLayer, UnnamedValuePolicy,
};
use chrono::NaiveDate;

/// Text layer that records which pages were requested and can fail one page
struct CountingLayer {
    inner: MemoryTextLayer,
    failing_page: Option<usize>,
    requested: RefCell<Vec<usize>>,
}

impl CountingLayer {
    fn new(pages: Vec<Vec<&str>>) -> Self {
        Self {
            inner: MemoryTextLayer::new(pages),
            failing_page: None,
            requested: RefCell::new(Vec::new()),
        }
    }

    fn failing_on(mut self, page: usize) -> Self {
        self.failing_page = Some(page);
        self
    }
}

impl TextLayer for CountingLayer {
    fn page_count(&self) -> usize {
        self.inner.page_count()
    }

    fn page_fragments(&self, page: usize) -> caslens_ingest::error::Result<Vec<String>> {
        self.requested.borrow_mut().push(page);
        if self.failing_page == Some(page) {
            return Err(CasError::PageText {
                page,
                reason: "content stream is corrupt".to_string(),
            });
        }
        self.inner.page_fragments(page)
    }
}

fn summary_parser() -> StatementParser {
    StatementParser::new(ParserConfig::default()).unwrap()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn test_two_page_summary_statement() {
    // empty fragments leave double spaces behind, which is where rows break
    let layer = MemoryTextLayer::new(vec![
        vec![
            "Consolidated Account Summary",
            "As on 31-Dec-2025",
            "",
            "Axis Bluechip Fund Direct Growth 45,230.50 INFA1B2C3D4",
            "",
        ],
        vec!["Page 2 of 2", "", "End of holdings list"],
    ]);

    let summary = summary_parser().parse_text_layer(&layer).unwrap();
    assert_eq!(summary.funds.len(), 1);
    let fund = &summary.funds[0];
    assert!(fund.name.contains("Axis Bluechip"), "{}", fund.name);
    assert_eq!(fund.plan_type, PlanType::Direct);
    assert_eq!(fund.value, 45230.50);
    assert_eq!(summary.direct_value, 45230.50);
    assert_eq!(summary.regular_value, 0.0);
    assert_eq!(summary.total_value, 45230.50);
    assert_eq!(summary.potential_savings, 0.0);
}

#[test]
fn test_registrar_anchored_rows() {
    let page = "Consolidated Account Summary Statement for 01-Jan-2025 to 31-Dec-2025 \
        CAMS 1234567/89 Axis Bluechip Fund Direct Growth 10.000 45,230.50 INFA1B2C3D4 \
        KFINTECH 99887766 HDFC Flexi Cap Fund Regular Plan Growth 1,00,000.00 INF179K01BB8 \
        CAMS 55 Parag Parikh Flexi Cap Fund Direct Plan 12,34,567.89 INF879O01027 \
        FTAMIL 77 Templeton India Value Fund Regular Growth 5,000.00 INF090I01239 \
        KARVY 88 Exit Load applies 100.00 INF000000000";
    let layer = MemoryTextLayer::new(vec![vec![page]]);

    let (summary, report) = summary_parser().parse_with_report(&layer).unwrap();
    assert_eq!(summary.funds.len(), 4);
    assert!(summary.funds.iter().all(|f| f.source == RecordSource::IsinAnchor));
    assert!(summary.funds[0].name.contains("Axis Bluechip"));
    assert_eq!(summary.funds[1].plan_type, PlanType::Regular);
    assert_eq!(summary.funds[2].value, 1234567.89);

    assert!(close(summary.total_value, 1384798.39));
    assert!(close(summary.direct_value, 1279798.39));
    assert!(close(summary.regular_value, 105000.0));
    assert!(close(summary.potential_savings, 1050.0));
    assert_eq!(report.lines_excluded, 1);
}

#[test]
fn test_wrong_variant_fails_before_later_pages() {
    let layer = CountingLayer::new(vec![
        vec!["Consolidated Account Statement", "Detailed transactions"],
        vec!["Axis Bluechip Fund Direct Growth 45,230.50 INFA1B2C3D4"],
        vec!["HDFC Flexi Cap Fund Regular 1,000.00 INF179K01BB8"],
    ]);

    let err = summary_parser().parse_text_layer(&layer).unwrap_err();
    assert!(matches!(err, CasError::UnsupportedStatement { .. }), "{err}");
    assert!(err.is_input_rejection());
    assert_eq!(*layer.requested.borrow(), vec![1]);
}

#[test]
fn test_no_matching_lines_is_empty_not_error() {
    let layer = MemoryTextLayer::new(vec![
        vec!["Consolidated Account Summary", "", "Investor: A N Other", "", "Email: someone@example.com"],
        vec!["Nothing of interest here", "", "Contact your distributor"],
    ]);

    let summary = summary_parser().parse_text_layer(&layer).unwrap();
    assert!(summary.is_empty());
    assert_eq!(summary.total_value, 0.0);
    assert_eq!(summary.potential_savings, 0.0);
}

#[test]
fn test_scheme_name_carries_across_pages() {
    let parser = StatementParser::new(ParserConfig::any_layout()).unwrap();
    let layer = MemoryTextLayer::new(vec![
        vec!["Statement header", "", "Nippon India Small Cap Fund - Direct Plan Growth"],
        vec!["Market Value on 31-Dec-2025 : INR 2,500.00"],
    ]);

    let summary = parser.parse_text_layer(&layer).unwrap();
    assert_eq!(summary.funds.len(), 1);
    let fund = &summary.funds[0];
    assert_eq!(fund.name, "Nippon India Small Cap Fund - Direct Plan Growth");
    assert_eq!(fund.plan_type, PlanType::Direct);
    assert_eq!(fund.valued_on, NaiveDate::from_ymd_opt(2025, 12, 31));
}

#[test]
fn test_unnamed_values_follow_policy() {
    let pages = vec![vec!["Valuation : 750.00", "", "Closing Balance (Rs) : 250.00"]];

    let placeholder = StatementParser::new(ParserConfig::any_layout())
        .unwrap()
        .parse_text_layer(&MemoryTextLayer::new(pages.clone()))
        .unwrap();
    assert_eq!(placeholder.funds.len(), 2);
    assert_eq!(placeholder.placeholder_count(), 2);
    assert_eq!(placeholder.total_value, 1000.0);
    assert_eq!(placeholder.direct_value + placeholder.regular_value, 0.0);

    let dropped = StatementParser::new(ParserConfig::any_layout().with_policy(UnnamedValuePolicy::Drop))
        .unwrap()
        .parse_text_layer(&MemoryTextLayer::new(pages))
        .unwrap();
    assert!(dropped.is_empty());
    assert_eq!(dropped.total_value, 0.0);
}

#[test]
fn test_parser_is_reusable_across_documents() {
    let parser = StatementParser::new(ParserConfig::any_layout()).unwrap();
    // the first document ends with a dangling scheme name
    let first = MemoryTextLayer::new(vec![vec!["Kotak Emerging Equity Fund Regular"]]);
    let second = MemoryTextLayer::new(vec![vec!["Market Value : 900.00"]]);

    assert!(parser.parse_text_layer(&first).unwrap().is_empty());
    let summary = parser.parse_text_layer(&second).unwrap();
    assert_eq!(summary.funds.len(), 1);
    assert!(summary.funds[0].is_placeholder());
}

#[test]
fn test_unreadable_middle_page_is_skipped() {
    let layer = CountingLayer::new(vec![
        vec![
            "Consolidated Account Summary",
            "",
            "Axis Bluechip Fund Direct Growth 45,230.50 INFA1B2C3D4",
            "",
            "Nippon India Small Cap Fund - Direct Plan Growth",
        ],
        vec!["Kotak Emerging Equity Fund Regular 9,999.00 INF174K01LS2"],
        vec![
            "Market Value on 31-Dec-2025 : INR 2,500.00",
            "",
            "HDFC Flexi Cap Fund Regular Plan Growth 1,000.00 INF179K01BB8",
        ],
    ])
    .failing_on(2);

    let (summary, report) = summary_parser().parse_with_report(&layer).unwrap();
    assert_eq!(*layer.requested.borrow(), vec![1, 2, 3]);
    assert_eq!(report.pages, 3);

    let names: Vec<&str> = summary.funds.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(summary.funds.len(), 3, "{names:?}");
    assert!(names[0].contains("Axis Bluechip"));
    // the scheme name from page 1 survives the unreadable page 2
    assert_eq!(names[1], "Nippon India Small Cap Fund - Direct Plan Growth");
    assert_eq!(summary.funds[1].plan_type, PlanType::Direct);
    assert_eq!(summary.funds[1].value, 2500.0);
    assert!(names[2].contains("HDFC Flexi Cap"));
    assert!(!names.iter().any(|n| n.contains("Kotak")));
    assert!(close(summary.total_value, 48730.50));
}

#[test]
fn test_unreadable_first_page_is_not_a_wrong_variant() {
    let layer = CountingLayer::new(vec![
        vec!["Consolidated Account Summary"],
        vec!["Axis Bluechip Fund Direct Growth 45,230.50 INFA1B2C3D4"],
    ])
    .failing_on(1);

    let err = summary_parser().parse_text_layer(&layer).unwrap_err();
    assert!(matches!(err, CasError::PageText { page: 1, .. }), "{err}");
    assert!(!matches!(err, CasError::UnsupportedStatement { .. }));
    assert_eq!(*layer.requested.borrow(), vec![1]);
}

#[test]
fn test_unreadable_first_page_is_skipped_without_header_check() {
    let parser = StatementParser::new(ParserConfig::any_layout()).unwrap();
    let layer = CountingLayer::new(vec![
        vec!["Consolidated Account Summary"],
        vec!["Axis Bluechip Fund Direct Growth 45,230.50 INFA1B2C3D4"],
    ])
    .failing_on(1);

    let summary = parser.parse_text_layer(&layer).unwrap();
    assert_eq!(summary.funds.len(), 1);
    assert_eq!(summary.direct_value, 45230.50);
}
