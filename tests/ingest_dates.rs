// tests/ingest_dates.rs
use chrono::{Duration, Local};
use news_feed_ingestor::ingest::dates::{default_freshness_window, resolve_date};
use news_feed_ingestor::{PipelineError, RawEntry, RawTime};

fn ago(d: Duration) -> RawTime {
    RawTime::from(Local::now() - d)
}

#[test]
fn updated_alone_resolves_to_its_own_time() {
    let t = ago(Duration::minutes(20));
    let entry = RawEntry {
        updated_parsed: Some(t),
        ..Default::default()
    };
    let got = resolve_date(&entry, Local::now(), default_freshness_window()).unwrap();
    assert_eq!(got, t.to_local());
}

#[test]
fn updated_is_preferred_over_published() {
    let updated = ago(Duration::minutes(5));
    let published = ago(Duration::minutes(50));
    let entry = RawEntry {
        updated_parsed: Some(updated),
        published_parsed: Some(published),
        ..Default::default()
    };
    let got = resolve_date(&entry, Local::now(), default_freshness_window()).unwrap();
    assert_eq!(got, updated.to_local());
}

#[test]
fn published_is_the_fallback() {
    let published = ago(Duration::minutes(30));
    let entry = RawEntry {
        published_parsed: Some(published),
        ..Default::default()
    };
    let got = resolve_date(&entry, Local::now(), default_freshness_window()).unwrap();
    assert_eq!(got, published.to_local());
}

#[test]
fn no_date_is_a_skip_not_an_error() {
    let entry = RawEntry {
        title: Some("t".into()),
        ..Default::default()
    };
    let got = resolve_date(&entry, Local::now(), default_freshness_window()).unwrap();
    assert!(got.is_none());
}

#[test]
fn unparseable_structured_date_fails() {
    for bad in [
        RawTime::new(2024, 13, 1, 0, 0, 0),
        RawTime::new(2023, 2, 29, 0, 0, 0),
        RawTime::new(2024, 1, 1, 24, 0, 0),
    ] {
        let entry = RawEntry {
            updated_parsed: Some(bad),
            ..Default::default()
        };
        let err = resolve_date(&entry, Local::now(), default_freshness_window());
        assert!(
            matches!(err, Err(PipelineError::MalformedDate { .. })),
            "{bad} must be rejected loudly"
        );
    }
}

#[test]
fn within_the_hour_is_kept() {
    for mins in [0, 1, 10, 59] {
        let entry = RawEntry {
            published_parsed: Some(ago(Duration::minutes(mins))),
            ..Default::default()
        };
        assert!(
            resolve_date(&entry, Local::now(), default_freshness_window())
                .unwrap()
                .is_some(),
            "{mins} minutes old should be fresh"
        );
    }
}

#[test]
fn older_entries_are_rejected() {
    for d in [
        Duration::seconds(3601),
        Duration::hours(2),
        Duration::days(1),
        Duration::days(1) + Duration::minutes(10),
        Duration::days(30),
    ] {
        let entry = RawEntry {
            published_parsed: Some(ago(d)),
            ..Default::default()
        };
        assert!(
            resolve_date(&entry, Local::now(), default_freshness_window())
                .unwrap()
                .is_none(),
            "{d} old should be stale"
        );
    }
}

#[test]
fn wider_window_keeps_more() {
    let entry = RawEntry {
        published_parsed: Some(ago(Duration::hours(3))),
        ..Default::default()
    };
    assert!(resolve_date(&entry, Local::now(), Duration::hours(6))
        .unwrap()
        .is_some());
}

#[test]
fn slightly_future_dates_are_kept() {
    let entry = RawEntry {
        published_parsed: Some(RawTime::from(Local::now() + Duration::minutes(5))),
        ..Default::default()
    };
    assert!(resolve_date(&entry, Local::now(), default_freshness_window())
        .unwrap()
        .is_some());
}

#[test]
fn far_future_dates_are_rejected() {
    for d in [Duration::hours(2), Duration::days(1), Duration::days(365)] {
        let entry = RawEntry {
            updated_parsed: Some(RawTime::from(Local::now() + d)),
            ..Default::default()
        };
        assert!(
            resolve_date(&entry, Local::now(), default_freshness_window())
                .unwrap()
                .is_none(),
            "{d} ahead should be rejected"
        );
    }
}
