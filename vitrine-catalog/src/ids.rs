use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a single attribute value ("Red", "Size M")
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct AttributeId(pub u64);

/// Identifier of an attribute group ("Color", "Size")
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct GroupId(pub u64);

/// Identifier of a combination (one purchasable variant)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CombinationId(pub u64);

/// Host data carries these ids as numbers, as numeric strings, and as
/// JSON object keys (always strings), so deserialization accepts all
/// three forms.
fn deserialize_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    struct IdVisitor;

    impl<'de> Visitor<'de> for IdVisitor {
        type Value = u64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an id, as an integer or a numeric string")
        }

        fn visit_u64<E>(self, id: u64) -> Result<u64, E> {
            Ok(id)
        }

        fn visit_i64<E>(self, id: i64) -> Result<u64, E>
        where
            E: de::Error,
        {
            u64::try_from(id).map_err(|_| E::custom(format!("id out of range: {}", id)))
        }

        fn visit_str<E>(self, id: &str) -> Result<u64, E>
        where
            E: de::Error,
        {
            id.parse()
                .map_err(|_| E::custom(format!("id is not numeric: {:?}", id)))
        }
    }

    deserializer.deserialize_any(IdVisitor)
}

impl<'de> Deserialize<'de> for AttributeId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserialize_id(deserializer).map(Self)
    }
}

impl<'de> Deserialize<'de> for GroupId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserialize_id(deserializer).map(Self)
    }
}

impl<'de> Deserialize<'de> for CombinationId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserialize_id(deserializer).map(Self)
    }
}

impl From<u64> for AttributeId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<u64> for GroupId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<u64> for CombinationId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for AttributeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for CombinationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[test]
    fn test_id_ordering() {
        let mut ids = vec![AttributeId(11), AttributeId(2), AttributeId(10)];
        ids.sort();
        assert_eq!(ids, vec![AttributeId(2), AttributeId(10), AttributeId(11)]);
    }

    #[test]
    fn test_ids_as_map_keys() {
        // the host keys these collections by numeric-string ids
        let mut map: BTreeMap<AttributeId, String> = BTreeMap::new();
        map.insert(AttributeId(7), "Red".to_string());

        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json, json!({"7": "Red"}));

        let back: BTreeMap<AttributeId, String> = serde_json::from_value(json).unwrap();
        assert_eq!(back.get(&AttributeId(7)).map(String::as_str), Some("Red"));
    }

    #[test]
    fn test_ids_accept_numbers_and_numeric_strings() {
        let id: AttributeId = serde_json::from_value(json!(7)).unwrap();
        assert_eq!(id, AttributeId(7));

        let id: AttributeId = serde_json::from_value(json!("7")).unwrap();
        assert_eq!(id, AttributeId(7));

        assert!(serde_json::from_value::<AttributeId>(json!("seven")).is_err());
        assert!(serde_json::from_value::<CombinationId>(json!(-4)).is_err());
    }
}
