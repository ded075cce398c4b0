//! デシリアライズ補助

use serde::{Deserialize, Deserializer};

/// `null` をデフォルト値として扱う
///
/// `#[serde(default)]` はフィールド欠落しか救わないため、
/// `"amenities": null` のようなペイロードにはこちらを併用する。
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
