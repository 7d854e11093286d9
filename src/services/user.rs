//! User service implementation
//!
//! Listing, deletion and block/deblock of platform accounts. Block state is
//! changed with plain GET calls on `/users/block/:id` and `/users/deblock/:id`.

use reqwest::Method;
use tracing::info;
use crate::models::user::User;
use crate::utils::errors::Result;
use super::client::ApiClient;
use super::resource::ResourceClient;

/// User service for account administration
#[derive(Clone, Debug)]
pub struct UserService {
    users: ResourceClient<User>,
}

impl UserService {
    /// Create a new UserService instance
    pub fn new(api: ApiClient) -> Self {
        Self {
            users: ResourceClient::new(api),
        }
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        self.users.list().await
    }

    pub async fn delete(&self, user_id: &str) -> Result<()> {
        self.users.delete(user_id).await?;
        info!(user_id = user_id, "User deleted");
        Ok(())
    }

    pub async fn block(&self, user_id: &str) -> Result<()> {
        self.switch(user_id, "block").await
    }

    pub async fn deblock(&self, user_id: &str) -> Result<()> {
        self.switch(user_id, "deblock").await
    }

    /// Block an active user or unblock a blocked one
    pub async fn toggle_block(&self, user: &User) -> Result<()> {
        if user.is_blocked() {
            self.deblock(&user.id).await
        } else {
            self.block(&user.id).await
        }
    }

    async fn switch(&self, user_id: &str, action: &str) -> Result<()> {
        let path = format!("/users/{}/{}", action, urlencoding::encode(user_id));
        self.users
            .api()
            .send_empty::<()>(Method::GET, &path, None)
            .await?;
        info!(user_id = user_id, action = action, "User block state changed");
        Ok(())
    }
}
