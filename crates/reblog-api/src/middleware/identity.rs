use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use reblog_types::UserIdentity;
use std::sync::Arc;

use crate::{error::ApiError, state::AppState};

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_NAME_HEADER: &str = "x-user-name";
pub const USER_AVATAR_HEADER: &str = "x-user-avatar";
pub const USER_GUILDS_HEADER: &str = "x-user-guilds";

/// Identity established by the authenticating layer in front of the API
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub identity: UserIdentity,
    pub guilds: Vec<String>,
}

impl CurrentUser {
    pub fn id(&self) -> &str {
        &self.identity.id
    }

    pub fn is_member_of(&self, guild_id: &str) -> bool {
        self.guilds.iter().any(|g| g == guild_id)
    }

    fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        let mut identity = UserIdentity::new(header(USER_ID_HEADER)?, header(USER_NAME_HEADER)?);
        if let Some(avatar) = header(USER_AVATAR_HEADER) {
            identity = identity.with_avatar(avatar);
        }

        let guilds = header(USER_GUILDS_HEADER)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|g| !g.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Some(Self { identity, guilds })
    }
}

/// Resolve the caller and apply the guild-membership gate.
///
/// Handlers read the result through `Extension<CurrentUser>`.
pub async fn require_identity(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = CurrentUser::from_headers(req.headers())
        .ok_or_else(|| ApiError::Unauthorized("missing user identity".to_string()))?;

    if let Some(guild_id) = state.config.discord.required_guild() {
        if !user.is_member_of(guild_id) {
            tracing::debug!(user_id = %user.id(), guild_id = %guild_id, "Rejected non-member");
            return Err(ApiError::Forbidden(
                "you must be a member of the required guild".to_string(),
            ));
        }
    }

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_headers_parse_into_identity() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("u1"));
        headers.insert(USER_NAME_HEADER, HeaderValue::from_static("alice"));
        headers.insert(USER_GUILDS_HEADER, HeaderValue::from_static(" 1, 2,,3 "));

        let user = CurrentUser::from_headers(&headers).unwrap();
        assert_eq!(user.id(), "u1");
        assert_eq!(user.identity.avatar, None);
        assert_eq!(user.guilds, vec!["1", "2", "3"]);
        assert!(user.is_member_of("2"));
    }

    #[test]
    fn test_blank_name_is_no_identity() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("u1"));
        headers.insert(USER_NAME_HEADER, HeaderValue::from_static("  "));
        assert!(CurrentUser::from_headers(&headers).is_none());
    }
}
