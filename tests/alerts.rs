use mastertask::alerts::Alerts;
use mastertask::constants::MAX_ALERTS;

#[test]
fn test_newest_first_and_clear() {
    let mut alerts = Alerts::new();
    assert!(alerts.is_empty());

    alerts.push("first".to_string());
    alerts.push("second".to_string());

    let messages: Vec<String> = alerts.newest_first().into_iter().map(|a| a.message).collect();
    assert_eq!(messages, vec!["second", "first"]);
    assert_eq!(alerts.latest().unwrap().message, "second");
    assert!(!alerts.latest().unwrap().timestamp.is_empty());

    alerts.clear();
    assert!(alerts.is_empty());
}

#[test]
fn test_drain_empties_queue() {
    let mut alerts = Alerts::new();
    alerts.push("a".to_string());
    alerts.push("b".to_string());

    let drained: Vec<String> = alerts.drain().into_iter().map(|a| a.message).collect();
    assert_eq!(drained, vec!["b", "a"]);
    assert!(alerts.is_empty());
}

#[test]
fn test_queue_is_capped() {
    let mut alerts = Alerts::new();
    for i in 0..MAX_ALERTS + 5 {
        alerts.push(format!("alert {}", i));
    }

    assert_eq!(alerts.len(), MAX_ALERTS);
    assert_eq!(alerts.newest_first().last().unwrap().message, "alert 5");
}
