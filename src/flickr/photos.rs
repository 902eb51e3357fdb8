use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr, PickFirst};

use legypte_api_structs::SizeVariant;

use super::{FetchError, FlickrClient};

/// Flickr's largest allowed page size; a shorter page is the last one.
pub const PHOTOS_PER_PAGE: usize = 500;

/// Flickr size suffixes we ask for, in the order they're requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SizeClass {
    /// Small, 240 on longest side.
    M,
    /// Small, 320.
    N,
    /// Medium, 640.
    Z,
    /// Medium, 800.
    C,
    /// Large, 1024.
    L,
    /// Original.
    O,
}

impl SizeClass {
    pub const ALL: [SizeClass; 6] = [
        SizeClass::M,
        SizeClass::N,
        SizeClass::Z,
        SizeClass::C,
        SizeClass::L,
        SizeClass::O,
    ];

    pub fn suffix(self) -> &'static str {
        match self {
            SizeClass::M => "m",
            SizeClass::N => "n",
            SizeClass::Z => "z",
            SizeClass::C => "c",
            SizeClass::L => "l",
            SizeClass::O => "o",
        }
    }

    /// The `extras` parameter for listing calls: tags plus every size class.
    pub fn extras() -> String {
        let mut extras = String::from("tags");
        for class in Self::ALL {
            extras.push_str(",url_");
            extras.push_str(class.suffix());
        }
        extras
    }
}

/// One photo as returned by the listing endpoints with our extras.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct PhotoRecord {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub tags: String,

    #[serde(default)]
    pub url_m: Option<String>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub width_m: Option<u32>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub height_m: Option<u32>,

    #[serde(default)]
    pub url_n: Option<String>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub width_n: Option<u32>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub height_n: Option<u32>,

    #[serde(default)]
    pub url_z: Option<String>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub width_z: Option<u32>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub height_z: Option<u32>,

    #[serde(default)]
    pub url_c: Option<String>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub width_c: Option<u32>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub height_c: Option<u32>,

    #[serde(default)]
    pub url_l: Option<String>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub width_l: Option<u32>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub height_l: Option<u32>,

    #[serde(default)]
    pub url_o: Option<String>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub width_o: Option<u32>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub height_o: Option<u32>,
}

impl PhotoRecord {
    /// The variant for `class`, if Flickr gave us a URL for it. Missing dimensions read as 0.
    pub fn variant(&self, class: SizeClass) -> Option<SizeVariant> {
        let (url, width, height) = match class {
            SizeClass::M => (&self.url_m, self.width_m, self.height_m),
            SizeClass::N => (&self.url_n, self.width_n, self.height_n),
            SizeClass::Z => (&self.url_z, self.width_z, self.height_z),
            SizeClass::C => (&self.url_c, self.width_c, self.height_c),
            SizeClass::L => (&self.url_l, self.width_l, self.height_l),
            SizeClass::O => (&self.url_o, self.width_o, self.height_o),
        };

        match url {
            Some(url) if !url.is_empty() => Some(SizeVariant {
                url: url.clone(),
                width: width.unwrap_or_default(),
                height: height.unwrap_or_default(),
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PhotoList {
    #[serde(default)]
    photo: Vec<PhotoRecord>,
}

#[derive(Debug, Deserialize)]
struct PhotosetPage {
    photoset: PhotoList,
}

#[derive(Debug, Deserialize)]
struct PublicPhotosPage {
    photos: PhotoList,
}

#[async_trait::async_trait]
pub trait PhotoProvider {
    /// One page of a photoset. Pages start at 1.
    async fn get_photoset_photos(
        &self,
        photoset_id: &str,
        page: u32,
    ) -> Result<Vec<PhotoRecord>, FetchError>;

    /// One page of an account's public photos. Pages start at 1.
    async fn get_public_photos(
        &self,
        user_id: &str,
        page: u32,
    ) -> Result<Vec<PhotoRecord>, FetchError>;
}

fn listing_params(
    owner_param: &'static str,
    owner: &str,
    page: u32,
) -> Vec<(&'static str, String)> {
    vec![
        (owner_param, owner.to_string()),
        ("extras", SizeClass::extras()),
        ("per_page", PHOTOS_PER_PAGE.to_string()),
        ("page", page.to_string()),
    ]
}

#[async_trait::async_trait]
impl PhotoProvider for FlickrClient {
    async fn get_photoset_photos(
        &self,
        photoset_id: &str,
        page: u32,
    ) -> Result<Vec<PhotoRecord>, FetchError> {
        let res: PhotosetPage = self
            .call(
                "flickr.photosets.getPhotos",
                &listing_params("photoset_id", photoset_id, page),
            )
            .await?;
        Ok(res.photoset.photo)
    }

    async fn get_public_photos(
        &self,
        user_id: &str,
        page: u32,
    ) -> Result<Vec<PhotoRecord>, FetchError> {
        let res: PublicPhotosPage = self
            .call(
                "flickr.people.getPublicPhotos",
                &listing_params("user_id", user_id, page),
            )
            .await?;
        Ok(res.photos.photo)
    }
}
