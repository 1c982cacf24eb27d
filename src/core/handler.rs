use crate::core::limit::resolve_limit;
use crate::domain::model::User;
use crate::domain::ports::UserSource;
use crate::utils::error::Result;
use serde::Serialize;

pub const INDEX_VIEW: &str = "index";
pub const USER_LIST_VIEW: &str = "userlist";

/// What the handler hands to the renderer: a view name plus the `users`
/// attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserListView {
    #[serde(skip)]
    pub view: &'static str,
    pub users: Vec<User>,
}

/// Handles user-list requests with an injected [`UserSource`].
pub struct UserListHandler<S: UserSource> {
    source: S,
}

impl<S: UserSource> UserListHandler<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn index(&self) -> &'static str {
        INDEX_VIEW
    }

    /// Resolves the raw limit and fetches that many users.
    pub async fn list_users(&self, raw_limit: Option<&str>) -> Result<UserListView> {
        tracing::debug!("Received limit: {:?}", raw_limit);
        let limit = resolve_limit(raw_limit)?;

        let users = self.source.fetch_users(limit).await?;
        Ok(UserListView {
            view: USER_LIST_VIEW,
            users,
        })
    }

    /// Same as [`list_users`](Self::list_users) for an
    /// `application/x-www-form-urlencoded` body. The first `limit` value wins.
    pub async fn handle_form(&self, body: &str) -> Result<UserListView> {
        let raw_limit = url::form_urlencoded::parse(body.as_bytes())
            .find(|(key, _)| key == "limit")
            .map(|(_, value)| value.into_owned());

        self.list_users(raw_limit.as_deref()).await
    }
}
