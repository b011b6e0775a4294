pub mod error;
pub mod hook;
pub mod settings;
pub mod vars;

pub use error::HookError;
pub use hook::{
    DiscontinuedCombinationsHook, HookReport, SkipReason, TemplateHook, VAR_COLORS,
    VAR_COMBINATIONS, VAR_COMBINATION_IMAGES, VAR_GROUPS, VAR_PRODUCT,
};
pub use settings::HookSettings;
pub use vars::TemplateVars;
