use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

use vitrine_catalog::{AttributeId, ColorMap, GroupId, ImageMap, VariantPage};
use vitrine_variants::{CombinationFilter, FilterConfig, FilterReport};

use crate::error::HookError;
use crate::settings::HookSettings;
use crate::vars::TemplateVars;

/// Template variable names the host product page controller assigns
pub const VAR_COMBINATIONS: &str = "combinations";
pub const VAR_GROUPS: &str = "groups";
pub const VAR_COLORS: &str = "colors";
pub const VAR_COMBINATION_IMAGES: &str = "combinationImages";
pub const VAR_PRODUCT: &str = "product";

/// Callback the host invokes once the variant and attribute template
/// data for a product page has been assembled
pub trait TemplateHook: Send + Sync {
    fn name(&self) -> &str;
    fn handle(&self, vars: &mut TemplateVars) -> Result<HookReport, HookError>;
}

/// Why a hook invocation left the bag alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Disabled,
    NoCombinations,
    NoGroups,
}

/// What a hook invocation did to the bag
#[derive(Debug, Clone, PartialEq)]
pub enum HookReport {
    Skipped(SkipReason),
    Unchanged,
    Filtered(FilterReport),
}

/// The product variable, as far as this hook reads it: one active
/// attribute per group, keyed by group id. Hosts serialize the map as
/// `[]` when no attribute is active.
#[derive(Debug, Default, Deserialize)]
struct ProductVar {
    #[serde(default, deserialize_with = "vitrine_catalog::wire::map_or_empty")]
    attributes: BTreeMap<GroupId, ActiveAttribute>,
}

#[derive(Debug, Deserialize)]
struct ActiveAttribute {
    id_attribute: AttributeId,
}

/// Removes discontinued combinations from the assembled page variables
/// and prunes groups, color swatches and combination images down to what
/// the surviving combinations use.
pub struct DiscontinuedCombinationsHook {
    settings: HookSettings,
    filter: CombinationFilter,
}

impl DiscontinuedCombinationsHook {
    pub fn new(settings: HookSettings) -> Self {
        let filter = CombinationFilter::new(FilterConfig {
            discontinued_marker: settings.discontinued_marker,
        });
        Self { settings, filter }
    }
}

impl Default for DiscontinuedCombinationsHook {
    fn default() -> Self {
        Self::new(HookSettings::default())
    }
}

impl TemplateHook for DiscontinuedCombinationsHook {
    fn name(&self) -> &str {
        "discontinued_combinations"
    }

    fn handle(&self, vars: &mut TemplateVars) -> Result<HookReport, HookError> {
        if !self.settings.enabled {
            return Ok(HookReport::Skipped(SkipReason::Disabled));
        }
        let combinations: BTreeMap<_, _> = read_or_default(vars, VAR_COMBINATIONS)?;
        if combinations.is_empty() {
            return Ok(HookReport::Skipped(SkipReason::NoCombinations));
        }
        let groups: BTreeMap<_, _> = read_or_default(vars, VAR_GROUPS)?;
        if groups.is_empty() {
            return Ok(HookReport::Skipped(SkipReason::NoGroups));
        }

        let colors: ColorMap = read_or_default(vars, VAR_COLORS)?;
        let combination_images: ImageMap = read_or_default(vars, VAR_COMBINATION_IMAGES)?;
        let had_colors = !colors.is_empty();
        let had_images = !combination_images.is_empty();

        let product: ProductVar = read_or_default(vars, VAR_PRODUCT)?;
        let active_attributes = product
            .attributes
            .into_values()
            .map(|active| active.id_attribute)
            .collect();

        let mut page = VariantPage {
            combinations,
            groups,
            colors,
            combination_images,
            active_attributes,
        };
        let report = self.filter.filter_page(&mut page);
        if !report.changed() {
            return Ok(HookReport::Unchanged);
        }

        vars.set(VAR_COMBINATIONS, &page.combinations)?;
        vars.set(VAR_GROUPS, &page.groups)?;
        if had_colors {
            vars.set(VAR_COLORS, &page.colors)?;
        }
        if had_images {
            vars.set(VAR_COMBINATION_IMAGES, &page.combination_images)?;
        }
        debug!("{}: {}", self.name(), report);
        Ok(HookReport::Filtered(report))
    }
}

/// Hosts assign `false`, `null` or an empty array where a collection has
/// no entries; all of those read as the type's default here. Anything
/// else must decode as `T`.
fn read_or_default<T>(vars: &TemplateVars, name: &str) -> Result<T, HookError>
where
    T: DeserializeOwned + Default,
{
    match vars.raw(name) {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Ok(T::default()),
        Some(Value::Array(items)) if items.is_empty() => Ok(T::default()),
        Some(value) => T::deserialize(value).map_err(|source| HookError::MalformedVariable {
            name: name.to_string(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_product_var_decode() {
        let value = json!({
            "id_product": 7,
            "name": "Shirt",
            "attributes": {
                "1": {"id_attribute": 2, "id_attribute_group": 1, "name": "Black", "group": "Color"},
                "2": {"id_attribute": 10, "id_attribute_group": 2, "name": "S", "group": "Size"},
            },
        });
        let product = ProductVar::deserialize(&value).unwrap();
        let active: Vec<AttributeId> = product
            .attributes
            .into_values()
            .map(|a| a.id_attribute)
            .collect();
        assert_eq!(active, vec![AttributeId(2), AttributeId(10)]);
    }

    #[test]
    fn test_product_var_without_attributes() {
        let value = json!({"id_product": 7});
        let product = ProductVar::deserialize(&value).unwrap();
        assert!(product.attributes.is_empty());
    }

    #[test]
    fn test_product_var_placeholder_attributes() {
        let value = json!({"id_product": 7, "attributes": []});
        let product = ProductVar::deserialize(&value).unwrap();
        assert!(product.attributes.is_empty());
    }

    #[test]
    fn test_read_or_default_lenience() {
        let mut vars = TemplateVars::new();
        vars.insert("a", json!(null));
        vars.insert("b", json!(false));
        vars.insert("c", json!([]));
        vars.insert("d", json!({"5": {"name": "L"}}));

        for name in ["a", "b", "c", "missing"] {
            let map: BTreeMap<AttributeId, Value> = read_or_default(&vars, name).unwrap();
            assert!(map.is_empty());
        }
        let map: BTreeMap<AttributeId, Value> = read_or_default(&vars, "d").unwrap();
        assert_eq!(map.get(&AttributeId(5)), Some(&json!({"name": "L"})));
    }

    #[test]
    fn test_read_or_default_rejects_junk() {
        let mut vars = TemplateVars::new();
        vars.insert("combinations", json!("soon"));
        let result: Result<BTreeMap<AttributeId, Value>, _> =
            read_or_default(&vars, "combinations");
        let err = result.unwrap_err();
        assert_eq!(err.variable(), "combinations");
    }
}
