//! Serde adapter storing keyed collections as JSON arrays.
//!
//! Items carry their own name, so on disk a table's columns are a plain list
//! and in memory they are an insertion-ordered map from that name.

use std::fmt;
use std::marker::PhantomData;

use indexmap::IndexMap;
use serde::de::{Deserialize, Deserializer, Error, MapAccess, Visitor};
use serde::ser::{Serialize, Serializer};

/// An item that knows the key it is matched by.
pub trait Keyed {
    fn key(&self) -> String;
}

pub fn serialize<S, T>(map: &IndexMap<String, T>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize,
{
    serializer.collect_seq(map.values())
}

pub fn deserialize<'de, D, T>(deserializer: D) -> Result<IndexMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Keyed,
{
    let items = Vec::<T>::deserialize(deserializer)?;
    collect(items).map_err(|key| D::Error::custom(format!("duplicate entry '{key}'")))
}

/// Build a keyed map, failing on the first repeated key.
pub fn collect<T: Keyed>(items: impl IntoIterator<Item = T>) -> Result<IndexMap<String, T>, String> {
    let mut map = IndexMap::new();
    for item in items {
        let key = item.key();
        if map.contains_key(&key) {
            return Err(key);
        }
        map.insert(key, item);
    }
    Ok(map)
}

/// Deserialize a JSON object into an ordered map, rejecting repeated keys
/// instead of letting the last one win.
pub fn unique_map<'de, D, V>(deserializer: D) -> Result<IndexMap<String, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    struct UniqueMap<V>(PhantomData<V>);

    impl<'de, V: Deserialize<'de>> Visitor<'de> for UniqueMap<V> {
        type Value = IndexMap<String, V>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a map with unique keys")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut map = IndexMap::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((key, value)) = access.next_entry::<String, V>()? {
                if map.contains_key(&key) {
                    return Err(A::Error::custom(format!("duplicate entry '{key}'")));
                }
                map.insert(key, value);
            }
            Ok(map)
        }
    }

    deserializer.deserialize_map(UniqueMap(PhantomData))
}
