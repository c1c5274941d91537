//! Converts DICOM JSON into a data set.
//!
//! Ref: PS3.18 F.2.

use base64::prelude::*;
use serde_json::Value;

use dcmdeid_core::{
  DataElementTag, DataElementValue, DataSet, DataSetPath, ValueRepresentation,
  dictionary,
};

use crate::{DicomJsonReadConfig, JsonDeserializeError};

/// Converts a parsed DICOM JSON value into a data set.
///
pub fn convert_json_to_data_set(
  json: &Value,
  config: &DicomJsonReadConfig,
) -> Result<DataSet, JsonDeserializeError> {
  let mut path = DataSetPath::new();

  convert_json_object_to_data_set(json, config, true, &mut path)
}

fn convert_json_object_to_data_set(
  json: &Value,
  config: &DicomJsonReadConfig,
  is_root: bool,
  path: &mut DataSetPath,
) -> Result<DataSet, JsonDeserializeError> {
  let Some(object) = json.as_object() else {
    return Err(json_invalid("Data set is not an object", path));
  };

  let mut data_set = DataSet::new();

  for (key, element) in object {
    let tag = parse_tag(key).ok_or_else(|| {
      json_invalid(format!("Data element tag '{}' is invalid", key), path)
    })?;

    // Stop before pixel data the same way a header-only read of a DICOM P10
    // file would
    if is_root && config.header_only && tag >= dictionary::PIXEL_DATA.tag {
      continue;
    }

    path
      .add_data_element(tag)
      .map_err(|details| json_invalid(details, path))?;

    let value = convert_json_to_data_element_value(element, config, path)?;
    data_set.insert(tag, value);

    path.pop();
  }

  Ok(data_set)
}

fn convert_json_to_data_element_value(
  json: &Value,
  config: &DicomJsonReadConfig,
  path: &mut DataSetPath,
) -> Result<DataElementValue, JsonDeserializeError> {
  let Some(object) = json.as_object() else {
    return Err(json_invalid("Data element is not an object", path));
  };

  let vr = match object.get("vr") {
    Some(Value::String(vr)) => ValueRepresentation::from_bytes(vr.as_bytes())
      .map_err(|_| json_invalid(format!("VR '{}' is invalid", vr), path))?,
    _ => return Err(json_invalid("Data element has no VR", path)),
  };

  if object.contains_key("BulkDataURI") {
    return Err(json_invalid("BulkDataURI values are not supported", path));
  }

  if let Some(inline_binary) = object.get("InlineBinary") {
    return convert_inline_binary(inline_binary, vr, config, path);
  }

  let values = match object.get("Value") {
    None | Some(Value::Null) => return Ok(DataElementValue::new_empty(vr)),
    Some(Value::Array(values)) => values,
    Some(_) => return Err(json_invalid("Value is not an array", path)),
  };

  match vr {
    ValueRepresentation::Sequence => {
      convert_sequence(values, config, path).map(DataElementValue::new_sequence)
    }

    ValueRepresentation::PersonName => {
      let names = values
        .iter()
        .map(|value| convert_person_name(value, path))
        .collect::<Result<Vec<_>, _>>()?;

      string_value(vr, &names, path)
    }

    ValueRepresentation::AttributeTag => {
      let tags = values
        .iter()
        .map(|value| {
          value.as_str().and_then(parse_tag).ok_or_else(|| {
            json_invalid(format!("AttributeTag '{}' is invalid", value), path)
          })
        })
        .collect::<Result<Vec<_>, _>>()?;

      DataElementValue::new_attribute_tag(&tags)
        .map_err(|e| json_invalid(e.to_string(), path))
    }

    ValueRepresentation::FloatingPointSingle
    | ValueRepresentation::FloatingPointDouble => {
      let floats = values
        .iter()
        .map(|value| convert_float(value, path))
        .collect::<Result<Vec<f64>, _>>()?;

      if vr == ValueRepresentation::FloatingPointSingle {
        let floats = floats.iter().map(|f| *f as f32).collect::<Vec<_>>();
        DataElementValue::new_floating_point_single(&floats)
      } else {
        DataElementValue::new_floating_point_double(&floats)
      }
      .map_err(|e| json_invalid(e.to_string(), path))
    }

    ValueRepresentation::SignedShort
    | ValueRepresentation::UnsignedShort
    | ValueRepresentation::SignedLong
    | ValueRepresentation::UnsignedLong
    | ValueRepresentation::SignedVeryLong
    | ValueRepresentation::UnsignedVeryLong => {
      let ints = values
        .iter()
        .map(|value| convert_int(value, path))
        .collect::<Result<Vec<i128>, _>>()?;

      match vr {
        ValueRepresentation::SignedShort => {
          let ints = narrow_ints::<i16>(&ints, vr, path)?;
          DataElementValue::new_signed_short(&ints)
        }
        ValueRepresentation::UnsignedShort => {
          let ints = narrow_ints::<u16>(&ints, vr, path)?;
          DataElementValue::new_unsigned_short(&ints)
        }
        ValueRepresentation::SignedLong => {
          let ints = narrow_ints::<i32>(&ints, vr, path)?;
          DataElementValue::new_signed_long(&ints)
        }
        ValueRepresentation::UnsignedLong => {
          let ints = narrow_ints::<u32>(&ints, vr, path)?;
          DataElementValue::new_unsigned_long(&ints)
        }
        ValueRepresentation::SignedVeryLong => {
          let ints = narrow_ints::<i64>(&ints, vr, path)?;
          DataElementValue::new_signed_very_long(&ints)
        }
        _ => {
          let ints = narrow_ints::<u64>(&ints, vr, path)?;
          DataElementValue::new_unsigned_very_long(&ints)
        }
      }
      .map_err(|e| json_invalid(e.to_string(), path))
    }

    _ if vr.is_string() => {
      let strings = values
        .iter()
        .map(|value| match value {
          Value::Null => Ok("".to_string()),
          Value::String(s) => Ok(s.clone()),
          Value::Number(n) => Ok(n.to_string()),
          _ => Err(json_invalid(
            format!("String value '{}' is invalid", value),
            path,
          )),
        })
        .collect::<Result<Vec<_>, _>>()?;

      string_value(vr, &strings, path)
    }

    _ => Err(json_invalid(
      format!("VR '{}' must be stored as an InlineBinary", vr),
      path,
    )),
  }
}

fn convert_inline_binary(
  json: &Value,
  vr: ValueRepresentation,
  config: &DicomJsonReadConfig,
  path: &DataSetPath,
) -> Result<DataElementValue, JsonDeserializeError> {
  let Some(inline_binary) = json.as_str() else {
    return Err(json_invalid("InlineBinary is not a string", path));
  };

  if config.header_only {
    return Ok(DataElementValue::new_empty(vr));
  }

  let bytes = BASE64_STANDARD
    .decode(inline_binary)
    .map_err(|_| json_invalid("InlineBinary is not valid Base64", path))?;

  DataElementValue::new_binary(vr, bytes)
    .map_err(|e| json_invalid(e.to_string(), path))
}

fn convert_sequence(
  items: &[Value],
  config: &DicomJsonReadConfig,
  path: &mut DataSetPath,
) -> Result<Vec<DataSet>, JsonDeserializeError> {
  let mut data_sets = Vec::with_capacity(items.len());

  for (index, item) in items.iter().enumerate() {
    path
      .add_sequence_item(index)
      .map_err(|details| json_invalid(details, path))?;

    data_sets.push(convert_json_object_to_data_set(item, config, false, path)?);

    path.pop();
  }

  Ok(data_sets)
}

/// Converts a DICOM JSON person name object into the `Alphabetic=Ideographic=
/// Phonetic` form, with trailing empty component groups removed.
///
fn convert_person_name(
  json: &Value,
  path: &DataSetPath,
) -> Result<String, JsonDeserializeError> {
  let object = match json {
    Value::Null => return Ok("".to_string()),
    Value::Object(object) => object,
    _ => return Err(json_invalid("PersonName is not an object", path)),
  };

  let mut component_groups = ["Alphabetic", "Ideographic", "Phonetic"]
    .iter()
    .map(|name| match object.get(*name) {
      None | Some(Value::Null) => Ok(""),
      Some(Value::String(s)) => Ok(s.as_str()),
      Some(_) => Err(json_invalid(
        format!("PersonName {} is not a string", name),
        path,
      )),
    })
    .collect::<Result<Vec<_>, _>>()?;

  while component_groups.last() == Some(&"") {
    component_groups.pop();
  }

  Ok(component_groups.join("="))
}

fn convert_float(
  json: &Value,
  path: &DataSetPath,
) -> Result<f64, JsonDeserializeError> {
  match json {
    Value::Number(n) => n.as_f64(),
    Value::String(s) => match s.as_str() {
      "NaN" => Some(f64::NAN),
      "Infinity" => Some(f64::INFINITY),
      "-Infinity" => Some(f64::NEG_INFINITY),
      _ => None,
    },
    _ => None,
  }
  .ok_or_else(|| {
    json_invalid(format!("Float value '{}' is invalid", json), path)
  })
}

fn convert_int(
  json: &Value,
  path: &DataSetPath,
) -> Result<i128, JsonDeserializeError> {
  match json {
    Value::Number(n) => n
      .as_i64()
      .map(i128::from)
      .or_else(|| n.as_u64().map(i128::from)),

    // Very long integers outside the range of a JavaScript number are stored
    // as strings
    Value::String(s) => s.parse::<i128>().ok(),

    _ => None,
  }
  .ok_or_else(|| json_invalid(format!("Int value '{}' is invalid", json), path))
}

fn narrow_ints<T: TryFrom<i128>>(
  ints: &[i128],
  vr: ValueRepresentation,
  path: &DataSetPath,
) -> Result<Vec<T>, JsonDeserializeError> {
  ints
    .iter()
    .map(|i| {
      T::try_from(*i).map_err(|_| {
        json_invalid(format!("Value {} is out of range for '{}'", i, vr), path)
      })
    })
    .collect()
}

fn string_value(
  vr: ValueRepresentation,
  strings: &[String],
  path: &DataSetPath,
) -> Result<DataElementValue, JsonDeserializeError> {
  let strings = strings.iter().map(|s| s.as_str()).collect::<Vec<_>>();

  DataElementValue::new_strings(vr, &strings)
    .map_err(|e| json_invalid(e.to_string(), path))
}

/// DICOM JSON tags are exactly eight hex digits.
///
fn parse_tag(key: &str) -> Option<DataElementTag> {
  if key.len() != 8 {
    return None;
  }

  DataElementTag::from_hex_string(key).ok()
}

fn json_invalid(
  details: impl Into<String>,
  path: &DataSetPath,
) -> JsonDeserializeError {
  JsonDeserializeError::JsonInvalid {
    details: details.into(),
    path: path.clone(),
  }
}
