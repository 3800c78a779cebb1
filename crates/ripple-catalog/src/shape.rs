//! Structural validation of fetched catalog resources.

use serde::de::DeserializeOwned;
use serde_json::Value;

use ripple_core::error::CatalogError;

/// What a resource must look like: a JSON object carrying an array field.
#[derive(Debug, Clone, Copy)]
pub struct Shape {
    pub kind: &'static str,
    pub field: &'static str,
}

pub const MANIFEST: Shape = Shape {
    kind: "manifest",
    field: "routes",
};
pub const ITEM_BANK: Shape = Shape {
    kind: "item bank",
    field: "items",
};
pub const TOKEN_CATALOG: Shape = Shape {
    kind: "token catalog",
    field: "tokens",
};
pub const TOPIC_CATALOG: Shape = Shape {
    kind: "topic catalog",
    field: "topics",
};

impl Shape {
    /// Check the top-level shape of `value`, then decode it.
    pub fn decode<T: DeserializeOwned>(self, resource: &str, value: Value) -> Result<T, CatalogError> {
        let invalid = |message: String| CatalogError::Invalid {
            resource: resource.to_string(),
            kind: self.kind,
            message,
        };

        let Some(object) = value.as_object() else {
            return Err(invalid(format!("expected a JSON object, got {}", type_name(&value))));
        };
        match object.get(self.field) {
            Some(Value::Array(_)) => {}
            Some(other) => {
                return Err(invalid(format!(
                    "`{}` must be an array, got {}",
                    self.field,
                    type_name(other)
                )))
            }
            None => return Err(invalid(format!("missing `{}` array", self.field))),
        }

        serde_json::from_value(value).map_err(|e| invalid(e.to_string()))
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ripple_core::model::{ItemBank, Manifest};
    use serde_json::json;

    #[test]
    fn accepts_expected_shape() {
        let bank: ItemBank = ITEM_BANK
            .decode("banks/a.json", json!({"items": [{"id": "q1"}]}))
            .unwrap();
        assert_eq!(bank.len(), 1);
    }

    #[test]
    fn rejects_non_objects() {
        let err = MANIFEST
            .decode::<Manifest>("manifest.json", json!([1, 2]))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "manifest.json is not a valid manifest: expected a JSON object, got an array"
        );
    }

    #[test]
    fn rejects_missing_or_mistyped_field() {
        let missing = ITEM_BANK
            .decode::<ItemBank>("b.json", json!({"questions": []}))
            .unwrap_err();
        assert!(missing.to_string().contains("missing `items` array"));

        let mistyped = ITEM_BANK
            .decode::<ItemBank>("b.json", json!({"items": {"q1": {}}}))
            .unwrap_err();
        assert!(mistyped.to_string().contains("must be an array, got an object"));
    }

    #[test]
    fn rejects_bad_entries() {
        let err = ITEM_BANK
            .decode::<ItemBank>("b.json", json!({"items": [{"bodyHtml": "no id"}]}))
            .unwrap_err();
        assert!(matches!(err, CatalogError::Invalid { kind: "item bank", .. }));
    }
}
