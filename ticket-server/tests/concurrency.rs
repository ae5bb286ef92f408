//! Concurrent bookings against a file-backed database never oversell

mod common;

use std::sync::Arc;

use common::TestApp;
use http::StatusCode;
use shared::models::Role;

async fn run_concurrent(app: Arc<TestApp>, capacity: i64, requests: usize, tickets: i64) -> i64 {
    let organizer = app.user("org@example.com", Role::Organizer).await;
    let event_id = app.create_event(&organizer.token, capacity).await;

    let mut attendees = Vec::with_capacity(requests);
    for i in 0..requests {
        attendees.push(app.user(&format!("fan{i}@example.com"), Role::Attendee).await);
    }

    let handles: Vec<_> = attendees
        .into_iter()
        .map(|attendee| {
            let app = Arc::clone(&app);
            tokio::spawn(async move { app.book(&attendee.token, event_id, tickets).await })
        })
        .collect();

    let results = futures::future::join_all(handles).await;

    let mut admitted = 0;
    for result in results {
        let (status, body) = result.unwrap();
        match status {
            StatusCode::CREATED => admitted += tickets,
            StatusCode::BAD_REQUEST => assert_eq!(body["code"], 4002, "{body}"),
            other => panic!("unexpected status {other}: {body}"),
        }
    }

    let (_, event) = app.get(&format!("/api/events/{event_id}"), None).await;
    assert_eq!(event["tickets_sold"], admitted);
    assert!(event["available_seats"].as_i64().unwrap() >= 0);
    admitted
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_even_split_fills_exactly() {
    let app = Arc::new(TestApp::new().await);
    // 10 requests of 5 seats each against 50 seats
    let admitted = run_concurrent(app, 50, 10, 5).await;
    assert_eq!(admitted, 50);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_more_requests_than_seats() {
    let app = Arc::new(TestApp::new().await);
    // 40 requests of 3 seats each against 20 seats: only 6 fit
    let admitted = run_concurrent(app, 20, 40, 3).await;
    assert_eq!(admitted, 18);
}
