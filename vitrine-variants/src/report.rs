use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use vitrine_catalog::{AttributeId, CombinationId, GroupId};

/// Outcome of one filter pass over a variant page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterReport {
    /// Color the page had selected when the pass ran
    pub selected_color: Option<AttributeId>,
    /// Combinations dropped as discontinued
    pub removed_combinations: Vec<CombinationId>,
    /// Attributes forced out by the selected-color rule
    pub forced_attributes: BTreeSet<AttributeId>,
    /// Group options pruned across all groups
    pub removed_attributes: usize,
    /// Groups dropped because no option survived
    pub removed_groups: Vec<GroupId>,
    /// Color swatches pruned
    pub removed_colors: usize,
    /// Combination image entries pruned
    pub removed_images: usize,
}

impl FilterReport {
    /// Whether the pass altered the page at all. Pruning only ever happens
    /// downstream of a removed combination, so this is the one flag to check.
    pub fn changed(&self) -> bool {
        !self.removed_combinations.is_empty()
    }
}

impl fmt::Display for FilterReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "removed {} combinations, {} attributes, {} groups, {} colors, {} images",
            self.removed_combinations.len(),
            self.removed_attributes,
            self.removed_groups.len(),
            self.removed_colors,
            self.removed_images
        )
    }
}
