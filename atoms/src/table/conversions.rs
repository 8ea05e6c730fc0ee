//! Conversions between marker representations and DynamoDB attribute maps.
//!
//! Pure functions, testable without DynamoDB access. Nested objects are
//! stored as `M`, sequences as `L`.

use aws_sdk_dynamodb::types::AttributeValue;
use serde_json::{Map, Number, Value};

use super::Item;
use crate::error::{MarkerError, Result};
use crate::markers::LocationMarker;

/// Convert a marker to a DynamoDB item.
pub fn marker_to_item(marker: &LocationMarker) -> Result<Item> {
    let representation = marker
        .to_representation()
        .map_err(|e| MarkerError::Store(format!("marker did not serialize: {e}")))?;
    match representation {
        Value::Object(fields) => Ok(fields
            .iter()
            .map(|(key, value)| (key.clone(), json_to_attribute(value)))
            .collect()),
        other => Err(MarkerError::Store(format!(
            "marker did not serialize to an object: {other}"
        ))),
    }
}

/// Convert a DynamoDB item to a marker.
///
/// A row that no longer decodes is a store fault, not a client error.
pub fn item_to_marker(item: &Item) -> Result<LocationMarker> {
    let mut fields = Map::new();
    for (key, attr) in item {
        fields.insert(key.clone(), attribute_to_json(attr)?);
    }
    LocationMarker::from_representation(Value::Object(fields)).map_err(|e| match e {
        MarkerError::Decode(msg) => MarkerError::Store(format!("corrupt marker row: {msg}")),
        other => other,
    })
}

pub fn json_to_attribute(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Array(values) => AttributeValue::L(values.iter().map(json_to_attribute).collect()),
        Value::Object(fields) => AttributeValue::M(
            fields
                .iter()
                .map(|(key, value)| (key.clone(), json_to_attribute(value)))
                .collect(),
        ),
    }
}

pub fn attribute_to_json(attr: &AttributeValue) -> Result<Value> {
    Ok(match attr {
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::N(n) => Value::Number(parse_number(n)?),
        AttributeValue::S(s) => Value::String(s.clone()),
        AttributeValue::Ss(values) => {
            Value::Array(values.iter().cloned().map(Value::String).collect())
        }
        AttributeValue::Ns(values) => Value::Array(
            values
                .iter()
                .map(|n| parse_number(n).map(Value::Number))
                .collect::<Result<Vec<_>>>()?,
        ),
        AttributeValue::L(values) => Value::Array(
            values
                .iter()
                .map(attribute_to_json)
                .collect::<Result<Vec<_>>>()?,
        ),
        AttributeValue::M(fields) => {
            let mut map = Map::new();
            for (key, value) in fields {
                map.insert(key.clone(), attribute_to_json(value)?);
            }
            Value::Object(map)
        }
        other => {
            return Err(MarkerError::Store(format!(
                "unsupported attribute type: {other:?}"
            )))
        }
    })
}

fn parse_number(raw: &str) -> Result<Number> {
    if let Ok(i) = raw.parse::<i64>() {
        return Ok(Number::from(i));
    }
    if let Ok(u) = raw.parse::<u64>() {
        return Ok(Number::from(u));
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .ok_or_else(|| MarkerError::Store(format!("invalid number attribute: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinate;
    use crate::media::Image;
    use serde_json::json;

    #[test]
    fn test_marker_to_item_nests_structures() {
        let mut marker = LocationMarker::new(Coordinate::new("2.0", "1.0")).with_name("Bench");
        marker.set_marker_id("m-1");
        marker.add_image_to_history(Image::new("2024-01-01", "u", "k", "b"));

        let item = marker_to_item(&marker).unwrap();

        assert_eq!(item.get("markerId"), Some(&AttributeValue::S("m-1".into())));
        assert_eq!(item.get("currentImage"), Some(&AttributeValue::Null(true)));
        match item.get("coordinate") {
            Some(AttributeValue::M(coord)) => {
                assert_eq!(coord.get("latitude"), Some(&AttributeValue::S("1.0".into())));
            }
            other => panic!("coordinate stored as {other:?}"),
        }
        match item.get("historicalImages") {
            Some(AttributeValue::L(images)) => assert_eq!(images.len(), 1),
            other => panic!("historicalImages stored as {other:?}"),
        }
    }

    #[test]
    fn test_item_round_trip() {
        let mut marker = LocationMarker::new(Coordinate::new("2.0", "1.0"));
        marker.set_marker_id("m-2");
        marker.add_subscription_email("a@example.com");
        let item = marker_to_item(&marker).unwrap();
        assert_eq!(item_to_marker(&item).unwrap(), marker);
    }

    #[test]
    fn test_string_sets_read_as_lists() {
        let attr = AttributeValue::Ss(vec!["a@example.com".into(), "b@example.com".into()]);
        assert_eq!(
            attribute_to_json(&attr).unwrap(),
            json!(["a@example.com", "b@example.com"])
        );
    }

    #[test]
    fn test_numbers_keep_integer_form() {
        assert_eq!(attribute_to_json(&AttributeValue::N("42".into())).unwrap(), json!(42));
        assert_eq!(attribute_to_json(&AttributeValue::N("1.5".into())).unwrap(), json!(1.5));
        assert!(attribute_to_json(&AttributeValue::N("abc".into())).is_err());
    }

    #[test]
    fn test_corrupt_row_is_store_error() {
        let mut item = Item::new();
        item.insert("markerId".into(), AttributeValue::S("m-3".into()));
        item.insert("coordinate".into(), AttributeValue::S("nowhere".into()));
        assert!(matches!(item_to_marker(&item), Err(MarkerError::Store(_))));
    }
}
