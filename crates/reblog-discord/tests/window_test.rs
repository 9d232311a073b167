mod common;

use common::ScriptedSource;
use reblog_discord::ContextWindowAssembler;
use reblog_types::is_chronological;
use std::sync::Arc;

fn ids(messages: &[reblog_types::Message]) -> Vec<&str> {
    messages.iter().map(|m| m.id.as_str()).collect()
}

#[tokio::test]
async fn test_initial_window_uses_default_half_width() {
    let source = Arc::new(ScriptedSource::with_ids(1..=20));
    let assembler = ContextWindowAssembler::new(source.clone());

    let window = assembler.build_initial_window("c1", "10", None).await.unwrap();

    assert_eq!(window.messages.len(), 11);
    assert_eq!(window.earliest_id(), Some("5"));
    assert_eq!(window.latest_id(), Some("15"));
    assert_eq!(window.focal_index(), Some(5));
    assert!(is_chronological(&window.messages));
    assert_eq!(source.calls(), 3);
}

#[tokio::test]
async fn test_initial_window_near_channel_edges() {
    let source = Arc::new(ScriptedSource::with_ids(1..=4));
    let assembler = ContextWindowAssembler::new(source).with_half_width(3);

    let window = assembler.build_initial_window("c1", "2", None).await.unwrap();

    assert_eq!(ids(&window.messages), vec!["1", "2", "3", "4"]);
    assert!(!window.has_more_before);
    assert!(!window.has_more_after);
}

#[tokio::test]
async fn test_extend_before_pages_from_earliest_known() {
    let source = Arc::new(ScriptedSource::with_ids(1..=20));
    let assembler = ContextWindowAssembler::new(source);

    let window = assembler.build_initial_window("c1", "10", Some(2)).await.unwrap();
    assert_eq!(window.earliest_id(), Some("8"));

    let page = assembler
        .extend_before("c1", "10", window.earliest_id().unwrap(), 3)
        .await
        .unwrap();
    assert_eq!(ids(&page.messages), vec!["5", "6", "7"]);
    assert!(page.has_more);

    let page = assembler.extend_before("c1", "10", "3", 5).await.unwrap();
    assert_eq!(ids(&page.messages), vec!["1", "2"]);
    assert!(!page.has_more);

    let page = assembler.extend_before("c1", "10", "1", 5).await.unwrap();
    assert!(page.messages.is_empty());
    assert!(!page.has_more);
}

#[tokio::test]
async fn test_extend_after_pages_from_latest_known() {
    let source = Arc::new(ScriptedSource::with_ids(1..=12));
    let assembler = ContextWindowAssembler::new(source);

    let page = assembler.extend_after("c1", "5", "8", 3).await.unwrap();
    assert_eq!(ids(&page.messages), vec!["9", "10", "11"]);
    assert!(page.has_more);

    let page = assembler.extend_after("c1", "5", "11", 3).await.unwrap();
    assert_eq!(ids(&page.messages), vec!["12"]);
    assert!(!page.has_more);
}

#[tokio::test]
async fn test_missing_focal_message_fails() {
    let source = Arc::new(ScriptedSource::with_ids(1..=3));
    let assembler = ContextWindowAssembler::new(source);

    let err = assembler
        .build_initial_window("c1", "99", Some(2))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_zero_limit_reports_no_more() {
    let source = Arc::new(ScriptedSource::with_ids(1..=20));
    let assembler = ContextWindowAssembler::new(source);

    let page = assembler.extend_before("c1", "10", "8", 0).await.unwrap();
    assert!(page.messages.is_empty());
    assert!(!page.has_more);

    let page = assembler.extend_after("c1", "10", "12", 0).await.unwrap();
    assert!(!page.has_more);

    let window = assembler.build_initial_window("c1", "10", Some(0)).await.unwrap();
    assert_eq!(ids(&window.messages), vec!["10"]);
    assert!(!window.has_more_before);
    assert!(!window.has_more_after);
}

#[tokio::test]
async fn test_oversized_limit_is_clamped_to_page_maximum() {
    let source = Arc::new(ScriptedSource::with_ids(1..=300));
    let assembler = ContextWindowAssembler::new(source);

    let page = assembler.extend_before("c1", "250", "250", 150).await.unwrap();
    assert_eq!(page.messages.len(), 100);
    assert_eq!(page.messages[0].id, "150");
    assert!(page.has_more);

    let page = assembler.extend_after("c1", "1", "1", 500).await.unwrap();
    assert_eq!(page.messages.len(), 100);
    assert!(page.has_more);

    let window = assembler.build_initial_window("c1", "150", Some(120)).await.unwrap();
    assert_eq!(window.messages.len(), 201);
    assert!(window.has_more_before);
    assert!(window.has_more_after);
}
