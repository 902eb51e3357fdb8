pub mod gallery;

pub use gallery::{
    empty_gallery, Aggregator, GalleryBuilder, ImageOrder, KeepOrder, RandomOrder, TagRegistry,
    DEFAULT_OWNER,
};
