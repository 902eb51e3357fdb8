use std::collections::{BTreeMap, BTreeSet};

/// Tag text to its `tag_id_<n>` handle.
pub type TagMap = BTreeMap<String, String>;

/// Source key to the source's display name and contributed tags.
pub type Sources = BTreeMap<String, SourceInfo>;

#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct SizeVariant {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct SourceInfo {
    pub display: String,
    pub tags: TagMap,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ImageEntry {
    pub id: String,
    pub title: String,
    pub tags: TagMap,
    /// Sorted from smallest to largest width.
    pub sizes: Vec<SizeVariant>,
    #[serde(with = "presence_markers")]
    pub sources: BTreeSet<String>,
}

/// The payload handed to the gallery script.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Gallery {
    pub sources: Sources,
    pub images: Vec<ImageEntry>,
}

/// The gallery script looks sources up with `image.sources[key]`, so the set goes over the wire
/// as `{ "source_key": 1 }`.
mod presence_markers {
    use std::collections::{BTreeMap, BTreeSet};

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(set: &BTreeSet<String>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(set.iter().map(|key| (key, 1u8)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BTreeSet<String>, D::Error> {
        let markers = BTreeMap::<String, serde::de::IgnoredAny>::deserialize(deserializer)?;
        Ok(markers.into_keys().collect())
    }
}
