use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::ids::AttributeId;

/// A named set of attribute options ("Color", "Size") as assembled for the
/// page template
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeGroup {
    /// Attribute preselected for this group on the page; wire name `default`.
    /// Hosts use a negative id when nothing is preselected, which reads as
    /// `None` here.
    #[serde(
        rename = "default",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "unset_as_none"
    )]
    pub default_attribute: Option<AttributeId>,

    /// Option display payloads keyed by attribute id, ascending id order
    #[serde(default, deserialize_with = "crate::wire::map_or_empty")]
    pub attributes: BTreeMap<AttributeId, Value>,

    /// Group display fields owned by the host (name, group type, ...)
    #[serde(flatten)]
    pub details: serde_json::Map<String, Value>,
}

impl AttributeGroup {
    pub fn new(
        default_attribute: Option<AttributeId>,
        attributes: impl IntoIterator<Item = (AttributeId, Value)>,
    ) -> Self {
        Self {
            default_attribute,
            attributes: attributes.into_iter().collect(),
            details: serde_json::Map::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn contains(&self, attribute: AttributeId) -> bool {
        self.attributes.contains_key(&attribute)
    }

    /// Smallest attribute id still present in this group
    pub fn min_attribute(&self) -> Option<AttributeId> {
        self.attributes.keys().next().copied()
    }

    /// Whether the preselected attribute is one of the remaining options
    pub fn default_is_valid(&self) -> bool {
        self.default_attribute
            .map_or(false, |id| self.attributes.contains_key(&id))
    }
}

fn unset_as_none<'de, D>(deserializer: D) -> Result<Option<AttributeId>, D::Error>
where
    D: Deserializer<'de>,
{
    struct DefaultVisitor;

    impl<'de> Visitor<'de> for DefaultVisitor {
        type Value = Option<AttributeId>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an attribute id or an unset marker")
        }

        fn visit_none<E>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D2>(self, deserializer: D2) -> Result<Self::Value, D2::Error>
        where
            D2: Deserializer<'de>,
        {
            deserializer.deserialize_any(self)
        }

        fn visit_u64<E>(self, id: u64) -> Result<Self::Value, E> {
            Ok(Some(AttributeId(id)))
        }

        fn visit_i64<E>(self, id: i64) -> Result<Self::Value, E> {
            Ok(u64::try_from(id).ok().map(AttributeId))
        }

        fn visit_str<E>(self, id: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            let id: i64 = id
                .parse()
                .map_err(|_| E::custom(format!("default is not numeric: {:?}", id)))?;
            Ok(u64::try_from(id).ok().map(AttributeId))
        }
    }

    deserializer.deserialize_option(DefaultVisitor)
}
