use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

use crate::error::HookError;

/// Mutable bag of named template variables the rendering pipeline hands
/// to hooks during a product page render
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateVars {
    vars: HashMap<String, Value>,
}

impl TemplateVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Value exactly as the host assigned it, if any
    pub fn raw(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    /// Decodes a variable into `T`. Absent variables read as `Ok(None)`,
    /// present ones that do not decode are an error.
    pub fn get<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, HookError> {
        match self.vars.get(name) {
            None => Ok(None),
            Some(value) => T::deserialize(value).map(Some).map_err(|source| {
                HookError::MalformedVariable {
                    name: name.to_string(),
                    source,
                }
            }),
        }
    }

    /// Encodes `value` and assigns it under `name`
    pub fn set<T: Serialize>(&mut self, name: &str, value: &T) -> Result<(), HookError> {
        let encoded =
            serde_json::to_value(value).map_err(|source| HookError::SerializeVariable {
                name: name.to_string(),
                source,
            })?;
        self.vars.insert(name.to_string(), encoded);
        Ok(())
    }

    /// Assigns an already encoded value
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.vars.insert(name.into(), value);
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.vars.remove(name)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn into_inner(self) -> HashMap<String, Value> {
        self.vars
    }
}

impl From<HashMap<String, Value>> for TemplateVars {
    fn from(vars: HashMap<String, Value>) -> Self {
        Self { vars }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_typed_get() {
        let mut vars = TemplateVars::new();
        vars.insert("page", json!({"title": "Shirt", "position": 3}));

        #[derive(Debug, PartialEq, serde::Deserialize)]
        struct Page {
            title: String,
            position: u32,
        }

        let page: Option<Page> = vars.get("page").unwrap();
        assert_eq!(
            page,
            Some(Page {
                title: "Shirt".to_string(),
                position: 3,
            })
        );
    }

    #[test]
    fn test_absent_variable_is_none() {
        let vars = TemplateVars::new();
        let value: Option<u32> = vars.get("missing").unwrap();
        assert_eq!(value, None);
        assert!(!vars.contains("missing"));
    }

    #[test]
    fn test_malformed_variable_is_an_error() {
        let mut vars = TemplateVars::new();
        vars.insert("count", json!("lots"));
        let result: Result<Option<u32>, _> = vars.get("count");
        let err = result.unwrap_err();
        assert_eq!(err.variable(), "count");
    }

    #[test]
    fn test_set_encodes_in_place() {
        let mut vars = TemplateVars::new();
        vars.set("ids", &vec![1u64, 2, 3]).unwrap();
        assert_eq!(vars.raw("ids"), Some(&json!([1, 2, 3])));
        assert_eq!(vars.len(), 1);
    }

    #[test]
    fn test_host_map_round_trip() {
        // runners wrap the assigned variables for hooks, then unwrap the
        // bag to hand it back to the template engine
        assert!(TemplateVars::new().is_empty());

        let assigned = HashMap::from([
            ("combinations".to_string(), json!({"100": {"quantity": 5}})),
            ("page_name".to_string(), json!("product")),
        ]);
        let mut vars = TemplateVars::from(assigned);
        assert!(!vars.is_empty());

        vars.remove("page_name");
        let handed_back = vars.into_inner();
        assert_eq!(handed_back.len(), 1);
        assert!(handed_back.contains_key("combinations"));
    }
}
