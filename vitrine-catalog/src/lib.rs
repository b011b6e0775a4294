pub mod combination;
pub mod group;
pub mod ids;
pub mod page;
pub mod wire;

pub use combination::Combination;
pub use group::AttributeGroup;
pub use ids::{AttributeId, CombinationId, GroupId};
pub use page::{ColorMap, ImageMap, PageError, VariantPage};
