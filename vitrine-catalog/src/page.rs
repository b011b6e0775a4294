use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

use crate::combination::Combination;
use crate::group::AttributeGroup;
use crate::ids::{AttributeId, CombinationId, GroupId};

/// Color swatch payloads keyed by the attribute id they decorate
pub type ColorMap = BTreeMap<AttributeId, Value>;

/// Combination image payloads, keyed the same way as colors
pub type ImageMap = BTreeMap<AttributeId, Value>;

/// Variant and attribute template data assembled for one product page
/// render. Transient: built by the host per render, filtered, handed back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariantPage {
    #[serde(default)]
    pub combinations: BTreeMap<CombinationId, Combination>,

    #[serde(default)]
    pub groups: BTreeMap<GroupId, AttributeGroup>,

    #[serde(default)]
    pub colors: ColorMap,

    #[serde(default)]
    pub combination_images: ImageMap,

    /// The product's currently active attribute ids, in host display order
    #[serde(default)]
    pub active_attributes: Vec<AttributeId>,
}

impl VariantPage {
    /// A page only carries variants when both combinations and groups were
    /// assembled
    pub fn has_variants(&self) -> bool {
        !self.combinations.is_empty() && !self.groups.is_empty()
    }

    /// Color currently chosen on the page: the last active attribute with a
    /// swatch entry wins, mirroring the host's overwrite scan
    pub fn selected_color(&self) -> Option<AttributeId> {
        if self.colors.is_empty() {
            return None;
        }
        self.active_attributes
            .iter()
            .copied()
            .filter(|id| self.colors.contains_key(id))
            .last()
    }

    /// Group holding the given attribute, if any
    pub fn group_of(&self, attribute: AttributeId) -> Option<GroupId> {
        self.groups
            .iter()
            .find(|(_, group)| group.contains(attribute))
            .map(|(id, _)| *id)
    }

    /// Structural consistency check for a filtered page: every surviving
    /// reference resolves into exactly one group, defaults are valid, and
    /// no group option, swatch or image entry is left unused.
    ///
    /// Diagnostic for tests and debugging; pages without variants are
    /// vacuously valid. Note that the selected-color rule can deliberately
    /// narrow group options below the surviving combinations' references,
    /// in which case this reports `DanglingAttribute`.
    pub fn validate(&self) -> Result<(), PageError> {
        if !self.has_variants() {
            return Ok(());
        }

        let mut owner: BTreeMap<AttributeId, GroupId> = BTreeMap::new();
        for (group_id, group) in &self.groups {
            if group.is_empty() {
                return Err(PageError::EmptyGroup { group: *group_id });
            }
            match group.default_attribute {
                None => return Err(PageError::MissingDefault { group: *group_id }),
                Some(default) if !group.contains(default) => {
                    return Err(PageError::DanglingDefault {
                        group: *group_id,
                        attribute: default,
                    });
                }
                _ => {}
            }
            for attribute in group.attributes.keys() {
                if let Some(first) = owner.insert(*attribute, *group_id) {
                    return Err(PageError::AmbiguousAttribute {
                        attribute: *attribute,
                        first,
                        second: *group_id,
                    });
                }
            }
        }

        let mut used: BTreeSet<AttributeId> = BTreeSet::new();
        for (combination_id, combination) in &self.combinations {
            for attribute in &combination.attributes {
                if !owner.contains_key(attribute) {
                    return Err(PageError::DanglingAttribute {
                        combination: *combination_id,
                        attribute: *attribute,
                    });
                }
                used.insert(*attribute);
            }
        }

        for (attribute, group) in &owner {
            if !used.contains(attribute) {
                return Err(PageError::UnusedAttribute {
                    group: *group,
                    attribute: *attribute,
                });
            }
        }
        for attribute in self.colors.keys() {
            if !used.contains(attribute) {
                return Err(PageError::UnusedColor { attribute: *attribute });
            }
        }
        for attribute in self.combination_images.keys() {
            if !used.contains(attribute) {
                return Err(PageError::UnusedImage { attribute: *attribute });
            }
        }
        Ok(())
    }
}

/// Structural problems `VariantPage::validate` can report
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PageError {
    #[error("Combination {combination} references attribute {attribute} outside any group")]
    DanglingAttribute {
        combination: CombinationId,
        attribute: AttributeId,
    },

    #[error("Attribute {attribute} appears in both group {first} and group {second}")]
    AmbiguousAttribute {
        attribute: AttributeId,
        first: GroupId,
        second: GroupId,
    },

    #[error("Group {group} has no attributes left")]
    EmptyGroup { group: GroupId },

    #[error("Group {group} has no default attribute")]
    MissingDefault { group: GroupId },

    #[error("Group {group} default attribute {attribute} is not among its options")]
    DanglingDefault {
        group: GroupId,
        attribute: AttributeId,
    },

    #[error("Group {group} option {attribute} is not used by any combination")]
    UnusedAttribute {
        group: GroupId,
        attribute: AttributeId,
    },

    #[error("Color swatch {attribute} is not used by any combination")]
    UnusedColor { attribute: AttributeId },

    #[error("Combination image {attribute} is not used by any combination")]
    UnusedImage { attribute: AttributeId },
}
