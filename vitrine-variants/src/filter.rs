use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

use vitrine_catalog::{AttributeId, VariantPage};

use crate::report::FilterReport;

/// Marker a manufacturer part number must end with to flag the
/// combination as discontinued
pub const DEFAULT_DISCONTINUED_MARKER: char = '#';

/// Tuning for the combination filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default = "default_marker")]
    pub discontinued_marker: char,
}

fn default_marker() -> char {
    DEFAULT_DISCONTINUED_MARKER
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            discontinued_marker: DEFAULT_DISCONTINUED_MARKER,
        }
    }
}

/// Removes discontinued combinations from a variant page and prunes the
/// attribute groups, color swatches and combination images they leave
/// behind.
///
/// A combination counts as discontinued when its manufacturer part number
/// ends with the configured marker and its stock quantity is exactly zero.
/// Negative quantities mean backorderable stock and are left alone.
#[derive(Debug, Clone, Default)]
pub struct CombinationFilter {
    config: FilterConfig,
}

impl CombinationFilter {
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    /// Marker this filter looks for
    pub fn marker(&self) -> char {
        self.config.discontinued_marker
    }

    /// Runs one filter pass over the page in place.
    ///
    /// Pages without combinations or without groups are passed through
    /// untouched, as are pages where no combination is discontinued. When
    /// a discontinued combination carries the page's selected color, its
    /// other non-color attributes are withdrawn from the groups even if a
    /// differently colored combination still uses them: on a color-locked
    /// page those options would all lead to the removed variant.
    pub fn filter_page(&self, page: &mut VariantPage) -> FilterReport {
        let mut report = FilterReport::default();
        if !page.has_variants() {
            return report;
        }
        report.selected_color = page.selected_color();

        let marker = self.config.discontinued_marker;
        let selected = report.selected_color;
        let mut used: BTreeSet<AttributeId> = BTreeSet::new();
        let mut forced: BTreeSet<AttributeId> = BTreeSet::new();
        {
            let colors = &page.colors;
            let removed = &mut report.removed_combinations;
            page.combinations.retain(|id, combination| {
                if combination.is_discontinued(marker) {
                    if selected.is_some_and(|color| combination.references(color)) {
                        forced.extend(
                            combination
                                .attributes
                                .iter()
                                .filter(|id| !colors.contains_key(*id))
                                .copied(),
                        );
                    }
                    removed.push(*id);
                    false
                } else {
                    used.extend(combination.attributes.iter().copied());
                    true
                }
            });
        }
        if report.removed_combinations.is_empty() {
            return report;
        }

        for attribute in &forced {
            used.remove(attribute);
        }
        report.forced_attributes = forced;

        let colors_before = page.colors.len();
        page.colors.retain(|id, _| used.contains(id));
        report.removed_colors = colors_before - page.colors.len();

        let images_before = page.combination_images.len();
        page.combination_images.retain(|id, _| used.contains(id));
        report.removed_images = images_before - page.combination_images.len();

        let mut removed_attributes = 0;
        {
            let removed_groups = &mut report.removed_groups;
            page.groups.retain(|group_id, group| {
                let before = group.attributes.len();
                group.attributes.retain(|id, _| used.contains(id));
                removed_attributes += before - group.attributes.len();
                if group.is_empty() {
                    removed_groups.push(*group_id);
                    return false;
                }
                if !group.default_is_valid() {
                    group.default_attribute = group.min_attribute();
                }
                true
            });
        }
        report.removed_attributes = removed_attributes;

        debug!("Discontinued combination pass: {}", report);
        report
    }
}
