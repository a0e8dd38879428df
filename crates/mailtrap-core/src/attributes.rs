//! Attribute maps exchanged with the orchestrator
//!
//! Declared configuration, planned state and prior state all travel as a flat
//! JSON object keyed by attribute name. An absent key is an unknown value and
//! an explicit `null` is a known-empty value (see [`crate::Field`]).

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// Flat attribute record
pub type AttributeMap = serde_json::Map<String, serde_json::Value>;

/// Decode an attribute map into a typed model
pub fn from_attributes<T: DeserializeOwned>(attrs: &AttributeMap) -> Result<T> {
    serde_json::from_value(serde_json::Value::Object(attrs.clone()))
        .map_err(|e| Error::codec(format!("unable to decode attributes: {e}")))
}

/// Encode a typed model into an attribute map
pub fn to_attributes<T: Serialize>(model: &T) -> Result<AttributeMap> {
    match serde_json::to_value(model)? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(Error::codec(format!(
            "expected an object when encoding attributes, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Field;
    use serde::Deserialize;

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Model {
        #[serde(default, skip_serializing_if = "Field::is_unknown")]
        id: Field<i64>,
        #[serde(default, skip_serializing_if = "Field::is_unknown")]
        name: Field<String>,
    }

    #[test]
    fn test_unknown_fields_are_omitted() {
        let model = Model {
            id: Field::Unknown,
            name: Field::Known("x".to_string()),
        };
        let attrs = to_attributes(&model).unwrap();
        assert!(!attrs.contains_key("id"));
        assert_eq!(attrs["name"], "x");
    }

    #[test]
    fn test_shape_mismatch_is_codec_error() {
        let mut attrs = AttributeMap::new();
        attrs.insert("id".to_string(), serde_json::json!("not a number"));
        let err = from_attributes::<Model>(&attrs).unwrap_err();
        assert!(matches!(err, Error::Codec(_)));
    }
}
