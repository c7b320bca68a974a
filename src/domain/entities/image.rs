use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de::IgnoredAny};

/// An image as the backend lists it. Most fields are optional on the wire.
///
/// Decoding is lenient: `createdAt` stays an opaque string and numeric
/// fields accept integral floats, so one odd item never fails the listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageItem {
    pub image_id: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub original_key: Option<String>,
    #[serde(default)]
    pub original_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_dimension")]
    pub original_width: Option<u32>,
    #[serde(default, deserialize_with = "lenient_dimension")]
    pub original_height: Option<u32>,
    #[serde(default, deserialize_with = "lenient_integer")]
    pub original_size_bytes: Option<i64>,
    #[serde(default)]
    pub original_content_type: Option<String>,

    #[serde(default)]
    pub thumbnail_key: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_dimension")]
    pub thumbnail_width: Option<u32>,
    #[serde(default, deserialize_with = "lenient_dimension")]
    pub thumbnail_height: Option<u32>,
    #[serde(default, deserialize_with = "lenient_integer")]
    pub thumbnail_size_bytes: Option<i64>,
    #[serde(default)]
    pub thumbnail_content_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_quality")]
    pub thumbnail_quality: Option<u8>,
}

#[derive(Debug, Deserialize)]
pub struct ImageListResponse {
    #[serde(default)]
    pub items: Option<Vec<ImageItem>>,
}

impl ImageListResponse {
    pub fn into_items(self) -> Vec<ImageItem> {
        self.items.unwrap_or_default()
    }
}

/// One stored object: the original upload or its thumbnail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageVariant {
    pub key: Option<String>,
    pub url: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub size_bytes: u64,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    pub image_id: String,
    /// `None` when the backend timestamp is not recognisable
    pub created_at: Option<DateTime<Utc>>,
    pub status: String,
    pub display_name: String,
    pub original: ImageVariant,
    pub thumbnail: ImageVariant,
    pub thumbnail_quality: Option<u8>,
}

impl From<ImageItem> for ImageRecord {
    fn from(item: ImageItem) -> Self {
        let display_name = display_name_from_key(item.original_key.as_deref());

        ImageRecord {
            image_id: item.image_id,
            created_at: parse_timestamp(&item.created_at),
            status: item.status,
            display_name,
            original: ImageVariant {
                key: item.original_key,
                url: item.original_url,
                width: item.original_width,
                height: item.original_height,
                size_bytes: non_negative(item.original_size_bytes),
                content_type: item.original_content_type,
            },
            thumbnail: ImageVariant {
                key: item.thumbnail_key,
                url: item.thumbnail_url,
                width: item.thumbnail_width,
                height: item.thumbnail_height,
                size_bytes: non_negative(item.thumbnail_size_bytes),
                content_type: item.thumbnail_content_type,
            },
            thumbnail_quality: item.thumbnail_quality,
        }
    }
}

/// Storage keys look like `<prefix>/<filename>`; the name is the segment after the first `/`.
pub fn display_name_from_key(key: Option<&str>) -> String {
    key.and_then(|k| k.split('/').nth(1))
        .unwrap_or_default()
        .to_string()
}

fn non_negative(size: Option<i64>) -> u64 {
    size.map(|s| s.max(0) as u64).unwrap_or(0)
}

/// RFC 3339, or a naive timestamp taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireNumber {
    Integer(i64),
    Float(f64),
    Other(IgnoredAny),
}

impl WireNumber {
    fn to_i64(&self) -> Option<i64> {
        match *self {
            WireNumber::Integer(n) => Some(n),
            WireNumber::Float(f) if f.is_finite() => Some(f.trunc() as i64),
            _ => None,
        }
    }
}

fn lenient_integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<WireNumber>::deserialize(deserializer)?.and_then(|n| n.to_i64()))
}

fn lenient_dimension<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_integer(deserializer)?.and_then(|n| u32::try_from(n).ok()))
}

fn lenient_quality<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_integer(deserializer)?.and_then(|n| u8::try_from(n).ok()))
}
