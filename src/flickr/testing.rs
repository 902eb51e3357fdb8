use std::sync::{Arc, Mutex};

use super::{FetchError, PeopleProvider, PhotoProvider, PhotoRecord};

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    FindUser(String),
    Photoset(String, u32),
    Public(String, u32),
}

/// Serves canned pages; a `None` page fails. Clones share the call log.
#[derive(Clone, Default)]
pub struct FakeFlickr {
    pub nsid: Option<String>,
    pub pages: Vec<Option<Vec<PhotoRecord>>>,
    pub calls: Arc<Mutex<Vec<Call>>>,
}

impl FakeFlickr {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn page(&self, page: u32) -> Result<Vec<PhotoRecord>, FetchError> {
        match self.pages.get(page as usize - 1) {
            Some(Some(records)) => Ok(records.clone()),
            Some(None) => Err(FetchError::Api {
                code: 105,
                message: "Service currently unavailable".into(),
            }),
            None => panic!("page {} requested past the end", page),
        }
    }
}

#[async_trait::async_trait]
impl PeopleProvider for FakeFlickr {
    async fn find_user_by_username(&self, username: &str) -> Result<String, FetchError> {
        self.record(Call::FindUser(username.to_string()));
        self.nsid
            .clone()
            .ok_or_else(|| FetchError::UnknownUser(username.to_string()))
    }
}

#[async_trait::async_trait]
impl PhotoProvider for FakeFlickr {
    async fn get_photoset_photos(
        &self,
        photoset_id: &str,
        page: u32,
    ) -> Result<Vec<PhotoRecord>, FetchError> {
        self.record(Call::Photoset(photoset_id.to_string(), page));
        self.page(page)
    }

    async fn get_public_photos(
        &self,
        user_id: &str,
        page: u32,
    ) -> Result<Vec<PhotoRecord>, FetchError> {
        self.record(Call::Public(user_id.to_string(), page));
        self.page(page)
    }
}

pub fn record(id: &str, title: &str, tags: &str) -> PhotoRecord {
    PhotoRecord {
        id: id.into(),
        title: title.into(),
        tags: tags.into(),
        ..Default::default()
    }
}
