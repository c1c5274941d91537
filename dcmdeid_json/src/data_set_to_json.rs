//! Converts a data set into DICOM JSON.
//!
//! Ref: PS3.18 F.2.

use base64::prelude::*;
use serde_json::{Map, Number, Value};

use dcmdeid_core::{
  DataElementValue, DataError, DataSet, DataSetPath, ValueRepresentation,
};

/// Converts a data set into a DICOM JSON object. Data elements are emitted in
/// ascending tag order.
///
pub fn convert_data_set_to_json(
  data_set: &DataSet,
) -> Result<Map<String, Value>, DataError> {
  let mut path = DataSetPath::new();

  convert_data_set(data_set, &mut path)
}

fn convert_data_set(
  data_set: &DataSet,
  path: &mut DataSetPath,
) -> Result<Map<String, Value>, DataError> {
  let mut object = Map::new();

  for (tag, value) in data_set.iter() {
    path
      .add_data_element(*tag)
      .map_err(DataError::new_value_invalid)?;

    let json = convert_data_element_value(value, path)?;
    object.insert(tag.to_hex_string(), Value::Object(json));

    path.pop();
  }

  Ok(object)
}

fn convert_data_element_value(
  value: &DataElementValue,
  path: &mut DataSetPath,
) -> Result<Map<String, Value>, DataError> {
  let vr = value.value_representation();

  let mut json = Map::new();
  json.insert("vr".to_string(), Value::String(vr.to_str().to_string()));

  // If the value is empty then no 'Value' or 'InlineBinary' is added to the
  // output. Ref: PS3.18 F.2.5.
  if value.is_empty() {
    return Ok(json);
  }

  if vr == ValueRepresentation::Sequence {
    let mut items = vec![];

    let sequence_items =
      value.sequence_items().map_err(|e| e.with_path(path))?;

    for (index, item) in sequence_items.iter().enumerate() {
      path
        .add_sequence_item(index)
        .map_err(DataError::new_value_invalid)?;

      items.push(Value::Object(convert_data_set(item, path)?));

      path.pop();
    }

    json.insert("Value".to_string(), Value::Array(items));

    return Ok(json);
  }

  if vr.is_binary() {
    let bytes = value.bytes().map_err(|e| e.with_path(path))?;
    let inline_binary = BASE64_STANDARD.encode(bytes);
    json.insert("InlineBinary".to_string(), Value::String(inline_binary));

    return Ok(json);
  }

  let values = convert_binary_value(value).map_err(|e| e.with_path(path))?;
  json.insert("Value".to_string(), Value::Array(values));

  Ok(json)
}

/// Converts a data element value holding non-sequence, non-binary data to the
/// items of a DICOM JSON `Value` array.
///
fn convert_binary_value(
  value: &DataElementValue,
) -> Result<Vec<Value>, DataError> {
  match value.value_representation() {
    ValueRepresentation::AttributeTag => Ok(
      value
        .get_attribute_tags()?
        .iter()
        .map(|tag| Value::String(tag.to_hex_string()))
        .collect(),
    ),

    // Because JSON doesn't allow NaN or Infinity values, but they can be
    // present in a DICOM data element, they are converted to strings
    ValueRepresentation::FloatingPointDouble
    | ValueRepresentation::FloatingPointSingle => {
      Ok(value.get_floats()?.into_iter().map(float_to_json).collect())
    }

    ValueRepresentation::SignedLong
    | ValueRepresentation::SignedShort
    | ValueRepresentation::UnsignedLong
    | ValueRepresentation::UnsignedShort
    | ValueRepresentation::SignedVeryLong
    | ValueRepresentation::UnsignedVeryLong => {
      // The range of integers representable by JavaScript's Number type.
      // Values outside this range are converted to strings.
      let safe_integer_range = -9007199254740991i64..=9007199254740991i64;

      Ok(
        value
          .get_ints()?
          .into_iter()
          .map(|i| {
            if safe_integer_range.contains(&i) {
              Value::Number(Number::from(i))
            } else {
              Value::String(i.to_string())
            }
          })
          .collect(),
      )
    }

    ValueRepresentation::PersonName => Ok(
      value
        .get_strings()?
        .into_iter()
        .map(person_name_to_json)
        .collect(),
    ),

    // Numeric strings are emitted as JSON numbers when every value parses,
    // otherwise their strings are passed through unaltered
    ValueRepresentation::DecimalString => {
      let strings = value.get_strings()?;

      let floats = strings
        .iter()
        .map(|s| match *s {
          "" => Some(Value::Null),
          s => match s.parse::<i64>() {
            Ok(i) => Some(Value::Number(Number::from(i))),
            Err(_) => s
              .parse::<f64>()
              .ok()
              .and_then(Number::from_f64)
              .map(Value::Number),
          },
        })
        .collect::<Option<Vec<_>>>();

      Ok(floats.unwrap_or_else(|| strings_to_json(&strings)))
    }

    ValueRepresentation::IntegerString => {
      let strings = value.get_strings()?;

      let ints = strings
        .iter()
        .map(|s| match *s {
          "" => Some(Value::Null),
          s => s.parse::<i64>().ok().map(|i| Value::Number(Number::from(i))),
        })
        .collect::<Option<Vec<_>>>();

      Ok(ints.unwrap_or_else(|| strings_to_json(&strings)))
    }

    vr if vr.allows_multiplicity() => {
      Ok(strings_to_json(&value.get_strings()?))
    }

    vr if vr.is_string() => Ok(strings_to_json(&[value.get_string()?])),

    vr => Err(DataError::new_value_invalid(format!(
      "Value representation '{}' can't be converted to a JSON value",
      vr
    ))),
  }
}

fn float_to_json(f: f64) -> Value {
  if f.is_nan() {
    Value::String("NaN".to_string())
  } else if f == f64::INFINITY {
    Value::String("Infinity".to_string())
  } else if f == f64::NEG_INFINITY {
    Value::String("-Infinity".to_string())
  } else {
    Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
  }
}

fn person_name_to_json(name: &str) -> Value {
  if name.is_empty() {
    return Value::Null;
  }

  let mut object = Map::new();

  for (component_group, group_name) in name
    .split('=')
    .zip(["Alphabetic", "Ideographic", "Phonetic"])
  {
    let component_group = component_group.trim_end_matches(' ');
    if !component_group.is_empty() {
      object.insert(
        group_name.to_string(),
        Value::String(component_group.to_string()),
      );
    }
  }

  Value::Object(object)
}

fn strings_to_json(strings: &[&str]) -> Vec<Value> {
  strings
    .iter()
    .map(|s| {
      if s.is_empty() {
        Value::Null
      } else {
        Value::String(s.to_string())
      }
    })
    .collect()
}
