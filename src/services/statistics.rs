//! Statistics service
//!
//! Web statistics live at `/statistika/statis-web` as a single document;
//! per-user rows live at `/statistika/user`.

use reqwest::Method;
use serde::Deserialize;
use tracing::info;
use crate::models::statistics::{UserStatistic, WebStatistics};
use crate::utils::errors::Result;
use super::client::ApiClient;
use super::resource::ResourceClient;

const WEB_STATISTICS_PATH: &str = "/statistika/statis-web";

/// The backend may answer with the document or with a list holding it
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WebStatisticsReply {
    Many(Vec<WebStatistics>),
    One(WebStatistics),
}

#[derive(Clone, Debug)]
pub struct StatisticsService {
    user_statistics: ResourceClient<UserStatistic>,
}

impl StatisticsService {
    pub fn new(api: ApiClient) -> Self {
        Self {
            user_statistics: ResourceClient::new(api),
        }
    }

    /// Latest published web statistics, `None` when nothing was published yet
    pub async fn web(&self) -> Result<Option<WebStatistics>> {
        let reply: WebStatisticsReply = self
            .user_statistics
            .api()
            .get_json(WEB_STATISTICS_PATH)
            .await?;

        Ok(match reply {
            WebStatisticsReply::Many(mut all) => all.pop(),
            WebStatisticsReply::One(stats) => Some(stats),
        })
    }

    pub async fn publish_web(&self, stats: &WebStatistics) -> Result<()> {
        self.user_statistics
            .api()
            .send_empty(Method::POST, WEB_STATISTICS_PATH, Some(stats))
            .await?;
        info!(total_users = stats.total_users, "Web statistics published");
        Ok(())
    }

    pub async fn list_users(&self) -> Result<Vec<UserStatistic>> {
        self.user_statistics.list().await
    }

    pub async fn create_user(&self, stat: &UserStatistic) -> Result<UserStatistic> {
        self.user_statistics.create(stat).await
    }

    /// `PUT /statistika/user` with the id carried in the body
    pub async fn update_user(&self, stat: &UserStatistic) -> Result<UserStatistic> {
        let id = stat.id.as_deref().unwrap_or_default();
        self.user_statistics.update(id, stat).await
    }

    pub async fn delete_user(&self, id: &str) -> Result<()> {
        self.user_statistics.delete(id).await?;
        info!(id = id, "User statistic deleted");
        Ok(())
    }
}
