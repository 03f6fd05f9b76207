mod common;

use std::sync::Arc;

use common::FakeBackend;
use mastertask::notifications::{NotificationFeed, NotificationFilter};

fn feed_with(backend: &Arc<FakeBackend>) -> NotificationFeed {
    NotificationFeed::new(backend.clone(), 7)
}

#[tokio::test]
async fn test_load_and_filter() {
    let backend = Arc::new(FakeBackend::new());
    backend.seed_notification(7, "Task overdue", false);
    backend.seed_notification(7, "Reminder", true);
    backend.seed_notification(8, "Not yours", false);

    let mut feed = feed_with(&backend);
    feed.load().await.unwrap();
    assert_eq!(feed.items().len(), 2);
    assert_eq!(feed.unread_count(), 1);

    feed.set_filter(NotificationFilter::Unread).await.unwrap();
    assert_eq!(feed.filter(), NotificationFilter::Unread);
    assert_eq!(feed.items().len(), 1);
    assert_eq!(feed.items()[0].message, "Task overdue");

    feed.set_filter(NotificationFilter::Read).await.unwrap();
    assert_eq!(feed.items()[0].message, "Reminder");
}

#[tokio::test]
async fn test_mark_and_delete_patch_local_copy() {
    let backend = Arc::new(FakeBackend::new());
    let first = backend.seed_notification(7, "first", false);
    let second = backend.seed_notification(7, "second", false);

    let mut feed = feed_with(&backend);
    feed.load().await.unwrap();
    let fetches = backend.call_count("fetch_notifications");

    feed.mark(first, true).await.unwrap();
    assert_eq!(feed.unread_count(), 1);

    feed.delete(second).await.unwrap();
    assert_eq!(feed.items().len(), 1);
    assert_eq!(backend.call_count("fetch_notifications"), fetches);
}

#[tokio::test]
async fn test_failures_leave_feed_unchanged() {
    let backend = Arc::new(FakeBackend::new());
    let id = backend.seed_notification(7, "only", false);

    let mut feed = feed_with(&backend);
    feed.load().await.unwrap();

    backend.fail("mark_notification");
    backend.fail("delete_notification");
    backend.fail("fetch_notifications");

    assert!(feed.mark(id, true).await.is_err());
    assert!(feed.delete(id).await.is_err());
    assert!(feed.set_filter(NotificationFilter::Read).await.is_err());

    assert_eq!(feed.filter(), NotificationFilter::All);
    assert_eq!(feed.items().len(), 1);
    assert_eq!(feed.unread_count(), 1);
}
