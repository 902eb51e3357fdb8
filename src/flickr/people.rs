use serde::Deserialize;

use super::{FetchError, FlickrClient};

#[derive(Debug, Deserialize)]
struct User {
    nsid: String,
}

#[derive(Debug, Deserialize)]
struct UserLookup {
    user: User,
}

#[async_trait::async_trait]
pub trait PeopleProvider {
    /// Resolve a Flickr username to the account's NSID.
    async fn find_user_by_username(&self, username: &str) -> Result<String, FetchError>;
}

#[async_trait::async_trait]
impl PeopleProvider for FlickrClient {
    async fn find_user_by_username(&self, username: &str) -> Result<String, FetchError> {
        let lookup: UserLookup = self
            .call(
                "flickr.people.findByUsername",
                &[("username", username.to_string())],
            )
            .await?;

        if lookup.user.nsid.is_empty() {
            return Err(FetchError::UnknownUser(username.to_string()));
        }
        Ok(lookup.user.nsid)
    }
}
