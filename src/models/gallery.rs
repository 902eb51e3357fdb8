use std::collections::HashMap;

use rand::seq::SliceRandom;
use tracing::{debug, error, info};

use legypte_api_structs::{Gallery, ImageEntry, SourceInfo, Sources, TagMap};

use crate::flickr::{FetchError, FlickrApi, PhotoRecord, SizeClass, PHOTOS_PER_PAGE};

/// Owner identifier that selects the shared photoset instead of a Flickr account.
pub const DEFAULT_OWNER: &str = "default";

pub const MY_PHOTOS_SOURCE: &str = "source_my_photos";
pub const MY_PHOTOS_DISPLAY: &str = "My Photos";

/// Final arrangement of the image list before it is handed out.
pub trait ImageOrder: Send + Sync {
    fn arrange(&self, images: &mut [ImageEntry]);
}

/// Uniform random shuffle.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomOrder;

impl ImageOrder for RandomOrder {
    fn arrange(&self, images: &mut [ImageEntry]) {
        images.shuffle(&mut rand::thread_rng());
    }
}

/// Leaves images in the order they were fetched.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeepOrder;

impl ImageOrder for KeepOrder {
    fn arrange(&self, _images: &mut [ImageEntry]) {}
}

/// Hands out `tag_id_<n>` handles, so tag text never has to be used as an HTML identifier.
#[derive(Debug)]
pub struct TagRegistry {
    ids: HashMap<String, String>,
    next: u32,
}

impl Default for TagRegistry {
    fn default() -> Self {
        Self {
            ids: HashMap::new(),
            next: 1,
        }
    }
}

impl TagRegistry {
    pub fn id_for(&mut self, tag: &str) -> String {
        if let Some(id) = self.ids.get(tag) {
            return id.clone();
        }

        let id = format!("tag_id_{}", self.next);
        self.next += 1;
        self.ids.insert(tag.to_string(), id.clone());
        id
    }
}

/// Folds raw records from any number of sources into one deduplicated gallery.
#[derive(Debug, Default)]
pub struct GalleryBuilder {
    tags: TagRegistry,
    sources: Sources,
    images: Vec<ImageEntry>,
    // Photo ID -> offset in `images`.
    seen: HashMap<String, usize>,
}

impl GalleryBuilder {
    pub fn add_source(&mut self, key: &str, display: &str, records: &[PhotoRecord]) {
        let source = self
            .sources
            .entry(key.to_string())
            .or_insert_with(|| SourceInfo {
                display: display.to_string(),
                tags: TagMap::new(),
            });

        for record in records {
            if let Some(&offset) = self.seen.get(&record.id) {
                self.images[offset].sources.insert(key.to_string());
                continue;
            }

            let mut image = ImageEntry {
                id: record.id.clone(),
                title: record.title.clone(),
                tags: TagMap::new(),
                sizes: Vec::new(),
                sources: [key.to_string()].into_iter().collect(),
            };

            for tag in record.tags.split_whitespace() {
                let tag_id = self.tags.id_for(tag);
                source
                    .tags
                    .entry(tag.to_string())
                    .or_insert_with(|| tag_id.clone());
                image.tags.insert(tag.to_string(), tag_id);
            }

            image.sizes = SizeClass::ALL
                .iter()
                .filter_map(|&class| record.variant(class))
                .collect();
            image.sizes.sort_by_key(|size| size.width);

            self.seen.insert(image.id.clone(), self.images.len());
            self.images.push(image);
        }
    }

    pub fn build(self) -> Gallery {
        Gallery {
            sources: self.sources,
            images: self.images,
        }
    }
}

/// What the gallery script gets when nothing could be fetched.
pub fn empty_gallery() -> Gallery {
    let mut builder = GalleryBuilder::default();
    builder.add_source(MY_PHOTOS_SOURCE, MY_PHOTOS_DISPLAY, &[]);
    builder.build()
}

pub struct Aggregator {
    flickr: Box<dyn FlickrApi>,
    order: Box<dyn ImageOrder>,
    default_photoset_id: String,
}

impl Aggregator {
    pub fn new(flickr: impl FlickrApi + 'static, default_photoset_id: impl Into<String>) -> Self {
        Self {
            flickr: Box::new(flickr),
            order: Box::new(RandomOrder),
            default_photoset_id: default_photoset_id.into(),
        }
    }

    pub fn with_order(mut self, order: impl ImageOrder + 'static) -> Self {
        self.order = Box::new(order);
        self
    }

    /// Every record for `owner`, one page at a time. Any failure discards what was fetched so far.
    pub async fn fetch_photos(&self, owner: &str) -> Result<Vec<PhotoRecord>, FetchError> {
        let user_id = if owner == DEFAULT_OWNER {
            None
        } else {
            Some(self.flickr.find_user_by_username(owner).await?)
        };

        let mut records = Vec::new();
        let mut page = 1;
        loop {
            let batch = match &user_id {
                None => {
                    self.flickr
                        .get_photoset_photos(&self.default_photoset_id, page)
                        .await?
                },
                Some(user_id) => self.flickr.get_public_photos(user_id, page).await?,
            };
            debug!(page, count = batch.len(), "fetched page");

            let full_page = batch.len() == PHOTOS_PER_PAGE;
            records.extend(batch);
            if !full_page {
                break;
            }
            page += 1;
        }

        Ok(records)
    }

    pub async fn try_aggregate(&self, owner: &str) -> Result<Gallery, FetchError> {
        let records = self.fetch_photos(owner).await?;

        let mut builder = GalleryBuilder::default();
        builder.add_source(MY_PHOTOS_SOURCE, MY_PHOTOS_DISPLAY, &records);
        let mut gallery = builder.build();
        self.order.arrange(&mut gallery.images);

        info!(
            records = records.len(),
            images = gallery.images.len(),
            "aggregated gallery"
        );
        Ok(gallery)
    }

    /// Like `try_aggregate`, but a failed fetch is logged and yields `empty_gallery()`.
    #[tracing::instrument(skip(self))]
    pub async fn aggregate(&self, owner: &str) -> Gallery {
        match self.try_aggregate(owner).await {
            Ok(gallery) => gallery,
            Err(err) => {
                error!("Failed to fetch photos from Flickr: {}", err);
                empty_gallery()
            },
        }
    }
}
