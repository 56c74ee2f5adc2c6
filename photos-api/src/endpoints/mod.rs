pub mod albums;
pub mod media_items;

use serde::{Deserialize, Deserializer};

/// A response page: its items plus the continuation token, if any.
pub trait Page {
    type Item;

    fn into_page(self) -> (Vec<Self::Item>, Option<String>);
}

/// The provider encodes int64 fields as JSON strings; accept either form.
pub(crate) fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(u64),
        String(String),
    }

    Ok(
        Option::<NumberOrString>::deserialize(deserializer)?.and_then(|value| match value {
            NumberOrString::Number(n) => Some(n),
            NumberOrString::String(s) => s.trim().parse().ok(),
        }),
    )
}
