//! Controller tests — form toggle, fetch-and-render, request ordering.
//!
//! Details come from an in-memory source with per-entry delays so that
//! overlapping requests can be raced deterministically on paused time.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use tokio::sync::mpsc;

use hangry_dashboard::model::*;
use hangry_dashboard::page::*;
use hangry_dashboard::panel::*;
use hangry_dashboard::source::{DetailSource, FetchError};

// ═══════════════════════════════════════════════════════════════════════════
// Fixtures
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
enum Outcome {
    Detail(RestaurantDetail),
    Status(u16),
    Malformed(&'static str),
}

#[derive(Default)]
struct MockSource {
    responses: HashMap<String, (Duration, Outcome)>,
    requested: Mutex<Vec<String>>,
}

impl MockSource {
    fn with(mut self, id: &str, delay_ms: u64, outcome: Outcome) -> Self {
        self.responses
            .insert(id.to_string(), (Duration::from_millis(delay_ms), outcome));
        self
    }

    fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl DetailSource for MockSource {
    async fn fetch(&self, id: &RestaurantId) -> Result<RestaurantDetail, FetchError> {
        self.requested.lock().unwrap().push(id.as_str().to_string());
        let (delay, outcome) = self
            .responses
            .get(id.as_str())
            .cloned()
            .unwrap_or_else(|| (Duration::ZERO, Outcome::Detail(detail(id.as_str(), &[], &[]))));

        tokio::time::sleep(delay).await;

        match outcome {
            Outcome::Detail(d) => Ok(d),
            Outcome::Status(status) => Err(FetchError::Status {
                status,
                body: "error".into(),
            }),
            Outcome::Malformed(body) => Err(FetchError::Malformed(
                RestaurantDetail::from_json(body).unwrap_err(),
            )),
        }
    }
}

fn detail(name: &str, reviews: &[(f64, &str)], photos: &[&str]) -> RestaurantDetail {
    RestaurantDetail {
        status: ResponseStatus::from("ok"),
        name: name.to_string(),
        reviews: reviews.iter().map(|(r, t)| Review::new(*r, *t)).collect(),
        photos: photos.iter().map(|p| p.to_string()).collect(),
        menu: Menu::default(),
    }
}

struct Harness {
    page: Page,
    panel: DetailPanel,
    loaded_rx: mpsc::UnboundedReceiver<DetailLoaded>,
    source: Arc<MockSource>,
}

impl Harness {
    fn new(ids: &[&str], source: MockSource, ordering: ResponseOrdering) -> Self {
        let listing: Vec<RestaurantSummary> = ids
            .iter()
            .map(|id| RestaurantSummary::new(*id, format!("Restaurant {id}")).with_href(format!("/r/{id}")))
            .collect();
        let page = Page::from_listing(&listing);
        let source = Arc::new(source);
        let dyn_source: Arc<dyn DetailSource> = source.clone();
        let (loaded_tx, loaded_rx) = mpsc::unbounded_channel();
        let panel = DetailPanel::for_page(&page, dyn_source, loaded_tx).with_ordering(ordering);
        Self {
            page,
            panel,
            loaded_rx,
            source,
        }
    }

    /// Click the entry with `id`, returning the activation after the page
    /// ran its default action.
    fn click(&mut self, id: &str) -> (DetailRequest, Activation, bool) {
        let entry = self.page.element(id).expect("entry exists");
        let mut activation = Activation::new(id);
        let request = self.panel.activate(&entry.borrow(), &mut activation);
        let navigated = self.page.finish_activation(&activation);
        (request, activation, navigated)
    }

    async fn next_loaded(&mut self) -> DetailLoaded {
        self.loaded_rx.recv().await.expect("fetch task reports back")
    }

    fn review_lines(&self) -> Vec<String> {
        self.page.reviews().borrow().text_lines()
    }

    fn photo_srcs(&self) -> Vec<String> {
        self.page
            .photos()
            .borrow()
            .fragments()
            .iter()
            .map(|f| match f {
                Fragment::Image { src, .. } => src.clone(),
                other => panic!("unexpected fragment in photos: {other:?}"),
            })
            .collect()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Form toggle
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_toggle_hides_trigger_and_shows_form() {
    let page = Page::new();
    let toggle = FormToggle::from_page(&page);
    assert!(!toggle.form_visible());

    toggle.show_update_form();

    assert!(page.element(UPDATE_TRIGGER_ID).unwrap().borrow().is_hidden());
    assert!(!page.element(UPDATE_FORM_ID).unwrap().borrow().is_hidden());
    assert!(toggle.form_visible());
}

#[test]
fn test_toggle_from_any_prior_state() {
    for (trigger_hidden, form_hidden) in [(false, false), (false, true), (true, false), (true, true)] {
        let page = Page::new();
        let trigger = page.element(UPDATE_TRIGGER_ID).unwrap();
        let form = page.element(UPDATE_FORM_ID).unwrap();
        if trigger_hidden {
            trigger.borrow_mut().add_class(HIDDEN_CLASS);
        }
        if !form_hidden {
            form.borrow_mut().remove_class(HIDDEN_CLASS);
        }

        FormToggle::from_page(&page).show_update_form();

        assert!(trigger.borrow().is_hidden(), "trigger should end hidden");
        assert!(!form.borrow().is_hidden(), "form should end visible");
    }
}

#[test]
fn test_toggle_is_idempotent() {
    let page = Page::new();
    let toggle = FormToggle::from_page(&page);
    toggle.show_update_form();
    toggle.show_update_form();

    let trigger = page.element(UPDATE_TRIGGER_ID).unwrap();
    let classes: Vec<String> = trigger.borrow().classes().map(String::from).collect();
    assert_eq!(classes, vec![HIDDEN_CLASS.to_string()]);
    assert!(toggle.form_visible());
}

#[test]
fn test_toggle_without_trigger_still_shows_form() {
    let mut page = Page::new();
    page.remove(UPDATE_TRIGGER_ID);
    let toggle = FormToggle::from_page(&page);
    toggle.show_update_form();
    assert!(toggle.form_visible());
    assert!(!toggle.is_trigger(UPDATE_TRIGGER_ID));
}

#[test]
fn test_toggle_without_any_element_is_noop() {
    let toggle = FormToggle::new(None, None);
    toggle.show_update_form();
    assert!(!toggle.form_visible());
}

#[test]
fn test_toggle_recognises_its_trigger() {
    let page = Page::new();
    let toggle = FormToggle::from_page(&page);
    assert!(toggle.is_trigger(UPDATE_TRIGGER_ID));
    assert!(!toggle.is_trigger(UPDATE_FORM_ID));
}

#[tokio::test]
async fn test_toggle_does_not_touch_detail_regions() {
    let mut h = Harness::new(
        &["a"],
        MockSource::default().with("a", 0, Outcome::Detail(detail("A", &[(4.0, "ok")], &["/a.jpg"]))),
        ResponseOrdering::LatestOnly,
    );
    h.click("a");
    let loaded = h.next_loaded().await;
    h.panel.apply(loaded).unwrap();

    FormToggle::from_page(&h.page).show_update_form();

    assert_eq!(h.review_lines(), vec!["Rating: 4: ok"]);
    assert_eq!(h.photo_srcs(), vec!["/a.jpg"]);
}

// ═══════════════════════════════════════════════════════════════════════════
// Fetch and render
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_cafe_x_scenario() {
    let response = RestaurantDetail::from_json(
        r#"{"status":"ok","name":"Cafe X","reviews":[{"rating":5,"text":"Great"}],"photos":["/img/a.jpg"],"menu":{}}"#,
    )
    .unwrap();
    let mut h = Harness::new(
        &["42"],
        MockSource::default().with("42", 5, Outcome::Detail(response)),
        ResponseOrdering::LatestOnly,
    );

    let (request, activation, navigated) = h.click("42");
    assert_eq!(request.id.as_str(), "42");
    assert!(activation.default_prevented());
    assert!(!navigated);

    let loaded = h.next_loaded().await;
    let applied = h.panel.apply(loaded).unwrap();

    assert_eq!(
        applied,
        Applied::Rendered {
            id: RestaurantId::new("42"),
            reviews: 1,
            photos: 1
        }
    );
    assert_eq!(h.source.requested(), vec!["42"]);
    assert_eq!(h.review_lines(), vec!["Rating: 5: Great"]);
    assert_eq!(
        h.page.photos().borrow().fragments(),
        &[Fragment::Image {
            src: "/img/a.jpg".into(),
            height: PHOTO_HEIGHT
        }]
    );
    assert_eq!(h.page.reviews().borrow().to_html(), "Rating: 5: Great<br><br>");
    assert_eq!(
        h.page.photos().borrow().to_html(),
        "<img src=\"/img/a.jpg\" height=\"300\">"
    );
    assert_eq!(h.panel.shown(), Some((&RestaurantId::new("42"), "Cafe X")));
}

#[tokio::test]
async fn test_render_clears_previous_response() {
    let source = MockSource::default()
        .with(
            "a",
            0,
            Outcome::Detail(detail(
                "A",
                &[(1.0, "one"), (2.0, "two"), (3.0, "three")],
                &["/a1.jpg", "/a2.jpg"],
            )),
        )
        .with("b", 0, Outcome::Detail(detail("B", &[(5.0, "solo")], &[])));
    let mut h = Harness::new(&["a", "b"], source, ResponseOrdering::LatestOnly);

    h.panel.load(RestaurantId::new("a")).await.unwrap();
    assert_eq!(h.page.reviews().borrow().len(), 3);
    assert_eq!(h.page.photos().borrow().len(), 2);

    h.panel.load(RestaurantId::new("b")).await.unwrap();
    assert_eq!(h.review_lines(), vec!["Rating: 5: solo"]);
    assert!(h.page.photos().borrow().is_empty());
}

#[tokio::test]
async fn test_empty_response_empties_regions() {
    let source = MockSource::default()
        .with("a", 0, Outcome::Detail(detail("A", &[(2.0, "meh")], &["/a.jpg"])))
        .with("b", 0, Outcome::Detail(detail("B", &[], &[])));
    let mut h = Harness::new(&["a", "b"], source, ResponseOrdering::LatestOnly);

    h.panel.load(RestaurantId::new("a")).await.unwrap();
    let applied = h.panel.load(RestaurantId::new("b")).await.unwrap();

    assert_eq!(
        applied,
        Applied::Rendered {
            id: RestaurantId::new("b"),
            reviews: 0,
            photos: 0
        }
    );
    assert!(h.page.reviews().borrow().is_empty());
    assert!(h.page.photos().borrow().is_empty());
}

#[tokio::test]
async fn test_order_preserved() {
    let reviews = [(5.0, "e"), (1.0, "a"), (4.5, "d"), (2.0, "b"), (3.0, "c")];
    let photos = ["/z.jpg", "/a.jpg", "/m.jpg"];
    let mut h = Harness::new(
        &["x"],
        MockSource::default().with("x", 0, Outcome::Detail(detail("X", &reviews, &photos))),
        ResponseOrdering::LatestOnly,
    );

    h.panel.load(RestaurantId::new("x")).await.unwrap();

    assert_eq!(
        h.review_lines(),
        vec![
            "Rating: 5: e",
            "Rating: 1: a",
            "Rating: 4.5: d",
            "Rating: 2: b",
            "Rating: 3: c",
        ]
    );
    assert_eq!(h.photo_srcs(), vec!["/z.jpg", "/a.jpg", "/m.jpg"]);
}

#[tokio::test]
async fn test_non_ok_status_still_renders() {
    let response = RestaurantDetail::from_json(
        r#"{"status":"error","name":"Grumpy Grill","reviews":[{"rating":1,"text":"bad"}],"photos":[]}"#,
    )
    .unwrap();
    let mut h = Harness::new(
        &["g"],
        MockSource::default().with("g", 0, Outcome::Detail(response)),
        ResponseOrdering::LatestOnly,
    );

    h.click("g");
    let loaded = h.next_loaded().await;
    let applied = h.panel.apply(loaded).unwrap();

    assert_eq!(
        applied,
        Applied::Rendered {
            id: RestaurantId::new("g"),
            reviews: 1,
            photos: 0
        }
    );
    assert_eq!(h.review_lines(), vec!["Rating: 1: bad"]);
    assert_eq!(h.panel.shown().map(|(_, name)| name), Some("Grumpy Grill"));
}

#[tokio::test]
async fn test_sequential_loads_request_every_id_as_given() {
    // Repeats and ids shared with page elements are requested like any other
    let ids = ["42", "42", UPDATE_TRIGGER_ID, REVIEWS_REGION];
    let mut h = Harness::new(&[], MockSource::default(), ResponseOrdering::LatestOnly);

    for id in ids {
        let applied = h.panel.load(RestaurantId::new(id)).await.unwrap();
        assert!(
            matches!(&applied, Applied::Rendered { id: shown, .. } if shown.as_str() == id),
            "unexpected outcome for {id}: {applied:?}"
        );
        assert_eq!(h.panel.shown().map(|(_, name)| name), Some(id));
    }

    assert_eq!(h.source.requested(), ids.to_vec());
    assert_eq!(h.panel.last_issued(), 4);
}

#[tokio::test]
async fn test_identifier_propagation() {
    let ids = ["1", "2", "x-y", "42", "café"];
    let mut h = Harness::new(&ids, MockSource::default(), ResponseOrdering::ArrivalOrder);

    for id in ids {
        let (request, _, _) = h.click(id);
        assert_eq!(request.id.as_str(), id);
    }
    for _ in ids {
        let loaded = h.next_loaded().await;
        h.panel.apply(loaded).unwrap();
    }

    let mut requested = h.source.requested();
    requested.sort();
    let mut expected: Vec<String> = ids.iter().map(|s| s.to_string()).collect();
    expected.sort();
    assert_eq!(requested, expected);
}

#[tokio::test]
async fn test_activation_never_navigates() {
    let ids = ["1", "2", "3"];
    let mut h = Harness::new(&ids, MockSource::default(), ResponseOrdering::LatestOnly);

    for id in ids {
        let (_, activation, navigated) = h.click(id);
        assert!(activation.default_prevented(), "default not prevented for {id}");
        assert!(!navigated);
        assert_eq!(h.page.location(), "/");
    }
}

#[tokio::test]
async fn test_requests_are_numbered() {
    let mut h = Harness::new(&["a", "b"], MockSource::default(), ResponseOrdering::LatestOnly);
    let (first, _, _) = h.click("a");
    let (second, _, _) = h.click("b");
    let (third, _, _) = h.click("a");
    assert_eq!((first.seq, second.seq, third.seq), (1, 2, 3));
    assert_eq!(h.panel.last_issued(), 3);
    assert_eq!(h.panel.in_flight(), 3);

    for _ in 0..3 {
        let loaded = h.next_loaded().await;
        h.panel.apply(loaded).unwrap();
    }
    assert_eq!(h.panel.in_flight(), 0);
}

// ═══════════════════════════════════════════════════════════════════════════
// Failures
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_failed_fetch_leaves_regions_untouched() {
    let source = MockSource::default()
        .with("good", 0, Outcome::Detail(detail("Good", &[(4.0, "nice")], &["/g.jpg"])))
        .with("down", 0, Outcome::Status(500));
    let mut h = Harness::new(&["good", "down"], source, ResponseOrdering::LatestOnly);

    h.panel.load(RestaurantId::new("good")).await.unwrap();

    h.click("down");
    let loaded = h.next_loaded().await;
    let err = h.panel.apply(loaded).unwrap_err();

    assert!(matches!(err, FetchError::Status { status: 500, .. }));
    assert_eq!(h.review_lines(), vec!["Rating: 4: nice"]);
    assert_eq!(h.photo_srcs(), vec!["/g.jpg"]);
    assert_eq!(h.panel.shown().map(|(_, name)| name), Some("Good"));
}

#[tokio::test]
async fn test_malformed_payload_is_rejected() {
    let source = MockSource::default()
        .with("good", 0, Outcome::Detail(detail("Good", &[(3.0, "fine")], &[])))
        .with("broken", 0, Outcome::Malformed(r#"{"status":"ok","name":"B"}"#));
    let mut h = Harness::new(&["good", "broken"], source, ResponseOrdering::LatestOnly);

    h.panel.load(RestaurantId::new("good")).await.unwrap();
    let err = h.panel.load(RestaurantId::new("broken")).await.unwrap_err();

    assert!(matches!(err, FetchError::Malformed(_)));
    assert_eq!(h.review_lines(), vec!["Rating: 3: fine"]);
}

#[tokio::test]
async fn test_failure_before_any_render_leaves_regions_empty() {
    let mut h = Harness::new(
        &["down"],
        MockSource::default().with("down", 0, Outcome::Status(404)),
        ResponseOrdering::ArrivalOrder,
    );
    assert!(h.panel.load(RestaurantId::new("down")).await.is_err());
    assert!(h.page.reviews().borrow().is_empty());
    assert!(h.page.photos().borrow().is_empty());
    assert_eq!(h.panel.shown(), None);
}

// ═══════════════════════════════════════════════════════════════════════════
// Overlapping requests
// ═══════════════════════════════════════════════════════════════════════════

fn race_source() -> MockSource {
    MockSource::default()
        .with("1", 200, Outcome::Detail(detail("Slow", &[(1.0, "from one")], &["/1.jpg"])))
        .with("2", 10, Outcome::Detail(detail("Fast", &[(2.0, "from two")], &["/2.jpg"])))
}

#[tokio::test(start_paused = true)]
async fn test_race_arrival_order_shows_slow_first_click() {
    let mut h = Harness::new(&["1", "2"], race_source(), ResponseOrdering::ArrivalOrder);
    h.click("1");
    h.click("2");

    let first = h.next_loaded().await;
    assert_eq!(first.request.id.as_str(), "2", "fast response arrives first");
    h.panel.apply(first).unwrap();
    assert_eq!(h.review_lines(), vec!["Rating: 2: from two"]);

    let second = h.next_loaded().await;
    let applied = h.panel.apply(second).unwrap();

    assert!(matches!(applied, Applied::Rendered { .. }));
    assert_eq!(h.review_lines(), vec!["Rating: 1: from one"]);
    assert_eq!(h.photo_srcs(), vec!["/1.jpg"]);
}

#[tokio::test(start_paused = true)]
async fn test_race_latest_only_shows_last_click() {
    let mut h = Harness::new(&["1", "2"], race_source(), ResponseOrdering::LatestOnly);
    h.click("1");
    h.click("2");

    let first = h.next_loaded().await;
    assert!(matches!(h.panel.apply(first).unwrap(), Applied::Rendered { .. }));

    let second = h.next_loaded().await;
    let applied = h.panel.apply(second).unwrap();

    assert_eq!(
        applied,
        Applied::Stale {
            id: RestaurantId::new("1"),
            seq: 1,
            latest: 2
        }
    );
    assert_eq!(h.review_lines(), vec!["Rating: 2: from two"]);
    assert_eq!(h.photo_srcs(), vec!["/2.jpg"]);
    assert_eq!(h.panel.shown().map(|(_, name)| name), Some("Fast"));
}

#[tokio::test(start_paused = true)]
async fn test_latest_only_ignores_superseded_failure() {
    let source = MockSource::default()
        .with("down", 200, Outcome::Status(502))
        .with("up", 10, Outcome::Detail(detail("Up", &[(5.0, "yes")], &[])));
    let mut h = Harness::new(&["down", "up"], source, ResponseOrdering::LatestOnly);
    h.click("down");
    h.click("up");

    let first = h.next_loaded().await;
    h.panel.apply(first).unwrap();
    let second = h.next_loaded().await;

    assert!(matches!(h.panel.apply(second), Ok(Applied::Stale { .. })));
    assert_eq!(h.review_lines(), vec!["Rating: 5: yes"]);
}

#[tokio::test(start_paused = true)]
async fn test_ordering_switch_applies_to_pending_responses() {
    let mut h = Harness::new(&["1", "2"], race_source(), ResponseOrdering::LatestOnly);
    h.click("1");
    h.click("2");
    h.panel.set_ordering(ResponseOrdering::ArrivalOrder);

    for _ in 0..2 {
        let loaded = h.next_loaded().await;
        h.panel.apply(loaded).unwrap();
    }
    assert_eq!(h.review_lines(), vec!["Rating: 1: from one"]);
}
