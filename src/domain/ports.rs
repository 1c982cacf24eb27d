use crate::domain::model::User;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_endpoint(&self) -> &str;
    fn timeout(&self) -> Option<Duration>;
    fn headers(&self) -> &HashMap<String, String>;
}

/// Source of user records.
#[async_trait]
pub trait UserSource: Send + Sync {
    /// Returns at most `limit` users in upstream order.
    ///
    /// Either the whole response is usable or the call fails; a partial list
    /// is never returned.
    async fn fetch_users(&self, limit: NonZeroUsize) -> Result<Vec<User>>;
}
