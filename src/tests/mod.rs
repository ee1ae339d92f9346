use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;

async fn spawn_note_service(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/")
}

#[test]
fn gate_requires_bottom_edge_within_tolerance() {
    let metrics = crate::feed::ScrollMetrics {
        offset: 69,
        viewport: 30,
        content: 100,
    };
    assert!(metrics.at_bottom(1));
    assert!(!metrics.at_bottom(0));

    let metrics = crate::feed::ScrollMetrics {
        offset: 70,
        viewport: 30,
        content: 100,
    };
    assert!(metrics.at_bottom(0));
}

#[test]
fn short_content_counts_as_bottom() {
    let metrics = crate::feed::ScrollMetrics {
        offset: 0,
        viewport: 24,
        content: 6,
    };
    assert!(metrics.at_bottom(0));
    assert!(metrics.at_bottom(1));
}

#[test]
fn scroll_batches_append_exactly_batch_size_cards() {
    let mut feed = crate::feed::Feed::new(crate::feed::FeedOptions::default());
    for expected in [4usize, 8, 12] {
        feed.scroll_to_bottom(10);
        match feed.on_scroll(10) {
            crate::feed::GateOutcome::Appended(count) => assert_eq!(count, 4),
            other => panic!("expected a batch, got {other:?}"),
        }
        assert_eq!(feed.len(), expected);
    }
}

#[test]
fn card_labels_follow_container_position() {
    let mut feed = crate::feed::Feed::new(crate::feed::FeedOptions {
        batch_size: 3,
        cap: 0,
        tolerance: 1,
    });
    let note = crate::fetch::NoteRecord {
        content: "x".to_string(),
        created_at: "t1".to_string(),
        dead_line: "t2".to_string(),
        mode: "read".to_string(),
    };
    feed.push_note(&note);
    feed.push_note(&note);

    feed.scroll_to_bottom(4);
    feed.on_scroll(4);

    let titles: Vec<_> = feed.cards().iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["Card 1", "Card 2", "Card 3", "Card 4", "Card 5"]);
}

#[test]
fn gate_does_not_fire_above_the_bottom() {
    let mut feed = crate::feed::Feed::new(crate::feed::FeedOptions::default());
    feed.append_placeholders(20);

    feed.scroll_to(0, 10);
    assert!(matches!(
        feed.on_scroll(10),
        crate::feed::GateOutcome::NotAtBottom
    ));
    assert_eq!(feed.len(), 20);

    feed.scroll_to(29, 10);
    assert!(matches!(
        feed.on_scroll(10),
        crate::feed::GateOutcome::Appended(4)
    ));
    assert_eq!(feed.len(), 24);
}

#[test]
fn cap_suppresses_scrolls_but_not_manual_adds() {
    let mut feed = crate::feed::Feed::new(crate::feed::FeedOptions {
        batch_size: 4,
        cap: 8,
        tolerance: 1,
    });

    feed.scroll_to_bottom(5);
    assert!(matches!(
        feed.on_scroll(5),
        crate::feed::GateOutcome::Appended(4)
    ));
    feed.scroll_to_bottom(5);
    assert!(matches!(
        feed.on_scroll(5),
        crate::feed::GateOutcome::Appended(4)
    ));
    feed.scroll_to_bottom(5);
    assert!(matches!(
        feed.on_scroll(5),
        crate::feed::GateOutcome::CapReached
    ));
    assert_eq!(feed.len(), 8);
    assert_eq!(feed.counter(), 12);

    // the manual control keeps working past the cap
    assert_eq!(feed.add_batch(), 4);
    assert_eq!(feed.len(), 12);
    assert_eq!(feed.counter(), 16);
    feed.scroll_to_bottom(5);
    assert!(matches!(
        feed.on_scroll(5),
        crate::feed::GateOutcome::CapReached
    ));
}

#[test]
fn zero_cap_never_suppresses() {
    let mut feed = crate::feed::Feed::new(crate::feed::FeedOptions {
        batch_size: 4,
        cap: 0,
        tolerance: 1,
    });
    for _ in 0..50 {
        feed.scroll_to_bottom(10);
        assert!(matches!(
            feed.on_scroll(10),
            crate::feed::GateOutcome::Appended(_)
        ));
    }
    assert_eq!(feed.len(), 200);
}

#[tokio::test]
async fn fetch_seeds_note_cards_from_the_service() {
    let app = Router::new().route(
        "/note/getnotes/",
        get(|| async {
            Json(json!({
                "object": [
                    { "content": "buy milk", "created_at": "2024-01-01", "dead_line": "2024-01-02", "mod": "read" },
                    { "content": "ship release", "created_at": "2024-01-03", "dead_line": "2024-01-09", "mod": "write" }
                ]
            }))
        }),
    );
    let endpoint = spawn_note_service(app).await;

    let runner = crate::runner::Runner::new(crate::runner::Options {
        endpoint,
        ..crate::runner::Options::default()
    })
    .unwrap();
    let report = runner.run().await.unwrap();

    assert_eq!(report.notes_fetched, 2);
    assert!(report.fetch_error.is_none());
    assert_eq!(report.appended, 4);
    assert_eq!(report.cards.len(), 6);

    let first = &report.cards[0];
    assert_eq!(first.kind, crate::feed::card::CardKind::Note);
    assert_eq!(first.title, "Card 1");
    assert!(first.body.iter().any(|l| l.contains("buy milk")));
    assert!(first.body.iter().any(|l| l.contains("read")));

    assert_eq!(report.cards[2].kind, crate::feed::card::CardKind::Placeholder);
}

#[tokio::test]
async fn fetch_accepts_a_single_object_envelope() {
    let app = Router::new().route(
        "/note/getnotes/",
        get(|| async {
            Json(json!({
                "object": { "content": "solo", "created_at": "a", "dead_line": "b", "mod": "read" }
            }))
        }),
    );
    let endpoint = spawn_note_service(app).await;

    let runner = crate::runner::Runner::new(crate::runner::Options {
        endpoint,
        ..crate::runner::Options::default()
    })
    .unwrap();
    let notes = runner.fetch_notes().await.unwrap();

    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].content, "solo");
}

#[tokio::test]
async fn server_error_leaves_a_placeholder_only_feed() {
    let app = Router::new().route(
        "/note/getnotes/",
        get(|| async { (axum::http::StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let endpoint = spawn_note_service(app).await;

    let runner = crate::runner::Runner::new(crate::runner::Options {
        endpoint,
        ..crate::runner::Options::default()
    })
    .unwrap();
    let report = runner.run().await.unwrap();

    assert_eq!(report.notes_fetched, 0);
    let err = report.fetch_error.unwrap();
    assert!(err.contains("500"));
    assert_eq!(report.cards.len(), 4);
    assert!(report
        .cards
        .iter()
        .all(|c| c.kind == crate::feed::card::CardKind::Placeholder));
}

#[tokio::test]
async fn malformed_payload_reports_a_decode_error() {
    let app = Router::new().route("/note/getnotes/", get(|| async { "not json" }));
    let endpoint = spawn_note_service(app).await;

    let runner = crate::runner::Runner::new(crate::runner::Options {
        endpoint,
        ..crate::runner::Options::default()
    })
    .unwrap();
    let err = runner.fetch_notes().await.unwrap_err();

    assert!(matches!(err, crate::fetch::FetchError::Decode { .. }));
}
