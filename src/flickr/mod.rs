use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

pub mod people;
pub mod photos;
#[cfg(test)]
pub(crate) mod testing;

pub use people::PeopleProvider;
pub use photos::{PhotoProvider, PhotoRecord, SizeClass, PHOTOS_PER_PAGE};

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(surf::Error),
    #[error("unexpected HTTP status {0}")]
    Status(surf::StatusCode),
    #[error("Flickr API error {code}: {message}")]
    Api { code: i32, message: String },
    #[error("malformed Flickr response")]
    Decode(#[from] serde_json::Error),
    #[error("could not encode query string")]
    Query(#[from] serde_qs::Error),
    #[error("no Flickr account for username {0:?}")]
    UnknownUser(String),
}

impl From<surf::Error> for FetchError {
    fn from(err: surf::Error) -> Self {
        FetchError::Http(err)
    }
}

/// Everything the aggregator needs from the remote side.
pub trait FlickrApi: PeopleProvider + PhotoProvider + Send + Sync {}

impl<T: PeopleProvider + PhotoProvider + Send + Sync> FlickrApi for T {}

#[derive(Debug, Deserialize)]
#[serde(tag = "stat")]
enum Envelope<T> {
    #[serde(rename = "ok")]
    Ok(T),
    #[serde(rename = "fail")]
    Fail { code: i32, message: String },
}

impl<T> From<Envelope<T>> for Result<T, FetchError> {
    fn from(envelope: Envelope<T>) -> Self {
        match envelope {
            Envelope::Ok(payload) => Ok(payload),
            Envelope::Fail { code, message } => Err(FetchError::Api { code, message }),
        }
    }
}

#[derive(Clone)]
pub struct FlickrClient {
    client: surf::Client,
    endpoint: Url,
    api_key: String,
    api_secret: String,
}

impl std::fmt::Debug for FlickrClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlickrClient")
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl FlickrClient {
    pub const DEFAULT_ENDPOINT: &'static str = "https://api.flickr.com/services/rest/";

    pub fn new(endpoint: Url, api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            client: surf::Client::new(),
            endpoint,
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    fn request_url(
        &self,
        method: &'static str,
        params: &[(&'static str, String)],
    ) -> Result<Url, FetchError> {
        let mut query: BTreeMap<&str, String> = params.iter().cloned().collect();
        query.insert("method", method.to_string());
        query.insert("api_key", self.api_key.clone());
        query.insert("format", "json".to_string());
        query.insert("nojsoncallback", "1".to_string());

        if !self.api_secret.is_empty() {
            let signature = sign(&self.api_secret, &query);
            query.insert("api_sig", signature);
        }

        let mut url = self.endpoint.clone();
        url.set_query(Some(&serde_qs::to_string(&query)?));
        Ok(url)
    }

    async fn call<R: DeserializeOwned>(
        &self,
        method: &'static str,
        params: &[(&'static str, String)],
    ) -> Result<R, FetchError> {
        let url = self.request_url(method, params)?;
        tracing::debug!(method, "calling Flickr API");

        let mut res = self.client.get(url.as_str()).await?;
        if !res.status().is_success() {
            return Err(FetchError::Status(res.status()));
        }

        let body = res.body_string().await?;
        serde_json::from_str::<Envelope<R>>(&body)?.into()
    }
}

/// Flickr's request signature: MD5 of the secret followed by every parameter name and value, in
/// ascending name order.
fn sign(secret: &str, params: &BTreeMap<&str, String>) -> String {
    let mut data = String::from(secret);
    for (name, value) in params {
        data.push_str(name);
        data.push_str(value);
    }
    format!("{:x}", md5::compute(data))
}
