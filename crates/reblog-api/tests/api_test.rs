use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, TimeZone, Utc};
use reblog_api::{build_router, config::Config, state::AppState};
use reblog_discord::{Direction, MessageSource, Result, SourceError};
use reblog_persist::InMemoryReblogStore;
use reblog_types::{Author, Channel, Message, ReactionGroup};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const CONFIG: &str = r#"
    [server]
    host = "127.0.0.1"
    port = 0

    [cors]
    enabled = false
    origins = []

    [discord]
    guild_id = "g1"
    window_half_width = 2
    page_limit = 3

    [cache]
    enabled = false
    ttl_secs = 60
    sweep_secs = 60

    [store]
    backend = "memory"
    database = "test"

    [logging]
    level = "debug"
    format = "pretty"
"#;

/// Channel "c1" holding messages 1..=20, one minute apart
struct FakeChannel {
    messages: Vec<Message>,
}

impl FakeChannel {
    fn new() -> Self {
        let base = Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap();
        let messages = (1..=20u64)
            .map(|n| Message {
                id: n.to_string(),
                channel_id: "c1".to_string(),
                author: Author {
                    id: "a1".to_string(),
                    display_name: "Author".to_string(),
                    avatar: None,
                },
                content: format!("message {}", n),
                created_at: base + Duration::minutes(n as i64),
                attachments: vec![],
                reactions: vec![],
            })
            .collect();
        Self { messages }
    }

    fn numeric(id: &str) -> Result<u64> {
        id.parse()
            .map_err(|_| SourceError::NotFound(format!("message {}", id)))
    }
}

#[async_trait]
impl MessageSource for FakeChannel {
    async fn fetch_message(
        &self,
        _channel_id: &str,
        message_id: &str,
        _include_reactions: bool,
    ) -> Result<Message> {
        self.messages
            .iter()
            .find(|m| m.id == message_id)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(format!("message {}", message_id)))
    }

    async fn fetch_directional(
        &self,
        _channel_id: &str,
        reference_id: &str,
        direction: Direction,
        limit: u32,
        cursor_id: Option<&str>,
    ) -> Result<Vec<Message>> {
        let anchor = Self::numeric(cursor_id.unwrap_or(reference_id))?;
        let limit = limit as usize;
        let page: Vec<Message> = match direction {
            Direction::Before => {
                let older: Vec<Message> = self
                    .messages
                    .iter()
                    .filter(|m| m.snowflake().unwrap_or(0) < anchor)
                    .cloned()
                    .collect();
                older[older.len().saturating_sub(limit)..].to_vec()
            }
            Direction::After => self
                .messages
                .iter()
                .filter(|m| m.snowflake().unwrap_or(0) > anchor)
                .take(limit)
                .cloned()
                .collect(),
        };
        Ok(page)
    }

    async fn fetch_latest(&self, _channel_id: &str, limit: u32) -> Result<Vec<Message>> {
        let skip = self.messages.len().saturating_sub(limit as usize);
        Ok(self.messages[skip..].to_vec())
    }

    async fn fetch_channels(&self, _guild_id: &str) -> Result<Vec<Channel>> {
        Ok(vec![
            Channel {
                id: "c1".to_string(),
                name: "general".to_string(),
                kind: 0,
                parent_id: None,
                position: Some(0),
            },
            Channel {
                id: "c2".to_string(),
                name: "memes".to_string(),
                kind: 0,
                parent_id: None,
                position: Some(1),
            },
        ])
    }

    async fn fetch_reactions(
        &self,
        _channel_id: &str,
        _message_id: &str,
    ) -> Result<Vec<ReactionGroup>> {
        Ok(vec![])
    }
}

fn app_with(configure: impl FnOnce(&mut Config)) -> Router {
    let mut config: Config = toml::from_str(CONFIG).unwrap();
    configure(&mut config);
    let state = AppState::new(
        config,
        Arc::new(FakeChannel::new()),
        Arc::new(InMemoryReblogStore::new()),
    );
    build_router(Arc::new(state))
}

fn app() -> Router {
    app_with(|_| {})
}

fn request(method: Method, uri: &str, user: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder
            .header("x-user-id", format!("id-{}", user))
            .header("x-user-name", user)
            .header("x-user-guilds", "g1,g2");
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn ids(messages: &Value) -> Vec<String> {
    messages
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_health_needs_no_identity() {
    let (status, body) = send(&app(), request(Method::GET, "/health", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"], "memory");
    assert!(body.get("cache").is_none());
}

#[tokio::test]
async fn test_api_requires_identity() {
    let (status, body) = send(&app(), request(Method::GET, "/api/channels", None, None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].as_str().unwrap().contains("identity"));
}

#[tokio::test]
async fn test_required_guild_gate() {
    let gated = app_with(|c| c.discord.required_guild_id = Some("g9".to_string()));
    let (status, _) = send(&gated, request(Method::GET, "/api/channels", Some("alice"), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let member = app_with(|c| c.discord.required_guild_id = Some("g2".to_string()));
    let (status, _) = send(&member, request(Method::GET, "/api/channels", Some("alice"), None)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_list_channels() {
    let (status, body) = send(&app(), request(Method::GET, "/api/channels", Some("alice"), None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["guild_id"], "g1");
    assert_eq!(body["channels"].as_array().unwrap().len(), 2);
    assert_eq!(body["channels"][0]["type"], 0);
}

#[tokio::test]
async fn test_latest_uses_configured_page_limit() {
    let app = app();

    let (status, body) = send(&app, request(Method::GET, "/api/channels/c1/latest", Some("alice"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body["messages"]), vec!["18", "19", "20"]);

    let (_, body) = send(
        &app,
        request(Method::GET, "/api/channels/c1/latest?limit=1", Some("alice"), None),
    )
    .await;
    assert_eq!(ids(&body["messages"]), vec!["20"]);
}

#[tokio::test]
async fn test_window_and_extensions() {
    let app = app();

    let (status, window) = send(&app, request(Method::GET, "/api/messages/c1/10", Some("alice"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&window["messages"]), vec!["8", "9", "10", "11", "12"]);
    assert_eq!(window["focal_id"], "10");
    assert_eq!(window["has_more_before"], true);

    let (_, before) = send(
        &app,
        request(Method::GET, "/api/messages/c1/10/before?before_id=8&limit=5", Some("alice"), None),
    )
    .await;
    assert_eq!(ids(&before["messages"]), vec!["3", "4", "5", "6", "7"]);
    assert_eq!(before["has_more"], true);

    let (_, after) = send(
        &app,
        request(Method::GET, "/api/messages/c1/10/after?after_id=18&limit=5", Some("alice"), None),
    )
    .await;
    assert_eq!(ids(&after["messages"]), vec!["19", "20"]);
    assert_eq!(after["has_more"], false);
}

#[tokio::test]
async fn test_window_of_unknown_message_is_not_found() {
    let (status, _) = send(&app(), request(Method::GET, "/api/messages/c1/999", Some("alice"), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_resolve_link() {
    let app = app();

    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/api/links/resolve",
            Some("alice"),
            Some(json!({ "link": "https://discord.com/channels/g1/c1/10" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "guild_id": "g1", "channel_id": "c1", "message_id": "10" }));

    let (status, _) = send(
        &app,
        request(
            Method::POST,
            "/api/links/resolve",
            Some("alice"),
            Some(json!({ "link": "https://example.com/nope" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_reblog_and_star_flow() {
    let app = app();

    let (status, created) = send(
        &app,
        request(
            Method::POST,
            "/api/reblogs",
            Some("alice"),
            Some(json!({ "title": "Highlights", "message_ids": "12,5,12", "channel_id": "c1" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let entry_id = created["id"].as_str().unwrap().to_string();

    let (status, detail) = send(
        &app,
        request(Method::GET, &format!("/api/reblogs/{}", entry_id), Some("bob"), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&detail["entry"]["messages"]), vec!["5", "12"]);
    assert_eq!(detail["entry"]["created_by"]["username"], "alice");
    assert_eq!(detail["starred"], false);
    assert!(detail["entry"].get("description").is_none());

    for _ in 0..2 {
        let (status, star) = send(
            &app,
            request(Method::POST, "/api/stars", Some("bob"), Some(json!({ "entry_id": entry_id }))),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(star["star_count"], 1);
    }

    let (_, detail) = send(
        &app,
        request(Method::GET, &format!("/api/reblogs/{}", entry_id), Some("bob"), None),
    )
    .await;
    assert_eq!(detail["starred"], true);
    assert_eq!(detail["entry"]["star_count"], 1);
    assert_eq!(detail["stars"][0]["username"], "bob");

    let (_, mine) = send(&app, request(Method::GET, "/api/stars/mine", Some("bob"), None)).await;
    assert_eq!(mine["entries"].as_array().unwrap().len(), 1);

    let (status, removed) = send(
        &app,
        request(Method::DELETE, "/api/stars", Some("bob"), Some(json!({ "entry_id": entry_id }))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(removed, json!({ "success": true }));

    let (_, stars) = send(
        &app,
        request(Method::GET, &format!("/api/reblogs/{}/stars", entry_id), Some("bob"), None),
    )
    .await;
    assert!(stars.as_array().unwrap().is_empty());

    let (_, listed) = send(&app, request(Method::GET, "/api/reblogs", Some("bob"), None)).await;
    assert_eq!(listed["entries"][0]["star_count"], 0);
    assert_eq!(listed["archive"].as_array().unwrap().len(), 1);
    assert_eq!(listed["archive"][0]["entry_ids"][0], entry_id.as_str());
}

#[tokio::test]
async fn test_reblog_description_is_kept_with_entry() {
    let app = app();

    let (status, created) = send(
        &app,
        request(
            Method::POST,
            "/api/reblogs",
            Some("alice"),
            Some(json!({
                "title": "Highlights",
                "description": " the good bits ",
                "message_ids": ["5"],
                "channel_id": "c1"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let entry_id = created["id"].as_str().unwrap();
    let (_, detail) = send(
        &app,
        request(Method::GET, &format!("/api/reblogs/{}", entry_id), Some("bob"), None),
    )
    .await;
    assert_eq!(detail["entry"]["description"], "the good bits");
}

#[tokio::test]
async fn test_reblog_validation_and_missing_messages() {
    let app = app();

    let (status, _) = send(
        &app,
        request(
            Method::POST,
            "/api/reblogs",
            Some("alice"),
            Some(json!({ "title": "  ", "message_ids": ["1"], "channel_id": "c1" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        request(
            Method::POST,
            "/api/reblogs",
            Some("alice"),
            Some(json!({ "title": "Ghosts", "message_ids": ["1", "404"], "channel_id": "c1" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, listed) = send(&app, request(Method::GET, "/api/reblogs", Some("alice"), None)).await;
    assert!(listed["entries"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_star_unknown_reblog_is_not_found() {
    let app = app();

    let (status, _) = send(
        &app,
        request(Method::POST, "/api/stars", Some("bob"), Some(json!({ "entry_id": "missing" }))),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, request(Method::GET, "/api/reblogs/missing", Some("bob"), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
