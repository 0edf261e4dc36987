//! Descriptor-driven encode/decode over a JSON document form.
//!
//! The codec is stateless: pure functions over instances, safely callable
//! from any thread once the registry is finalized. The byte-level framing
//! of the document is the transport's or file store's concern; the
//! contracts here bind any encoding:
//!
//! * fields are visited in declaration order and `NO_SERIALIZE` fields
//!   are never written,
//! * decoding starts from descriptor defaults, so missing and
//!   `NO_SERIALIZE` fields come back as defaults,
//! * unknown fields in the input are ignored (schema evolution across
//!   versions is expected, not exceptional),
//! * enums travel as their stable ordinals.

use serde_json::{Map, Number};

use crate::descriptor::{FieldFlags, StructDescriptor};
use crate::error::CodecError;
use crate::registry::SchemaRegistry;
use crate::types::TypeRef;
use crate::value::{StructValue, Value};

/// Encodes an instance into its JSON document form.
///
/// # Returns
/// `Err(CodecError::NonFiniteFloat)` if a float field holds NaN or an
/// infinity; everything else encodes.
pub fn encode(instance: &StructValue) -> Result<serde_json::Value, CodecError> {
    let descriptor = instance.descriptor();
    let mut object = Map::new();
    for (field, value) in descriptor.fields().iter().zip(instance.values()) {
        if field.flags().contains(FieldFlags::NO_SERIALIZE) {
            continue;
        }
        let encoded = encode_value(descriptor.name(), field.name(), value)?;
        object.insert(field.name().to_string(), encoded);
    }
    Ok(serde_json::Value::Object(object))
}

/// Decodes an instance of the named struct from its JSON document form.
///
/// Starts from a default instance, then overwrites every serialized field
/// present in the input. Fields flagged `NO_SERIALIZE` keep their
/// defaults even if the input carries them.
pub fn decode(
    registry: &SchemaRegistry,
    strukt: &str,
    doc: &serde_json::Value,
) -> Result<StructValue, CodecError> {
    let descriptor = registry.struct_descriptor(strukt)?;
    decode_with(registry, &descriptor, doc)
}

fn decode_with(
    registry: &SchemaRegistry,
    descriptor: &StructDescriptor,
    doc: &serde_json::Value,
) -> Result<StructValue, CodecError> {
    let object = doc.as_object().ok_or_else(|| CodecError::NotAnObject {
        strukt: descriptor.name().to_string(),
    })?;
    let mut instance = registry.instantiate(descriptor.name())?;
    for (index, field) in descriptor.fields().iter().enumerate() {
        if field.flags().contains(FieldFlags::NO_SERIALIZE) {
            continue;
        }
        let Some(raw) = object.get(field.name()) else {
            continue;
        };
        let value = decode_value(registry, descriptor.name(), field.name(), field.ty(), raw)?;
        instance.set_raw(index, value);
    }
    Ok(instance)
}

fn encode_value(strukt: &str, field: &str, value: &Value) -> Result<serde_json::Value, CodecError> {
    match value {
        Value::Bool(v) => Ok(serde_json::Value::Bool(*v)),
        Value::Int(v) => Ok(serde_json::Value::Number(Number::from(*v))),
        Value::Float(v) => {
            let number = Number::from_f64(*v).ok_or_else(|| CodecError::NonFiniteFloat {
                strukt: strukt.to_string(),
                field: field.to_string(),
            })?;
            Ok(serde_json::Value::Number(number))
        }
        Value::Str(v) => Ok(serde_json::Value::String(v.clone())),
        Value::Enum(ordinal) => Ok(serde_json::Value::Number(Number::from(*ordinal))),
        Value::Struct(nested) => encode(nested),
        Value::Array(items) | Value::List(items) => {
            let mut encoded = Vec::with_capacity(items.len());
            for item in items {
                encoded.push(encode_value(strukt, field, item)?);
            }
            Ok(serde_json::Value::Array(encoded))
        }
    }
}

fn decode_value(
    registry: &SchemaRegistry,
    strukt: &str,
    field: &str,
    ty: &TypeRef,
    raw: &serde_json::Value,
) -> Result<Value, CodecError> {
    let mismatch = |expected: &'static str| CodecError::ValueShapeMismatch {
        strukt: strukt.to_string(),
        field: field.to_string(),
        expected,
    };
    match ty {
        TypeRef::Bool => raw.as_bool().map(Value::Bool).ok_or_else(|| mismatch("bool")),
        TypeRef::Int => raw.as_i64().map(Value::Int).ok_or_else(|| mismatch("int")),
        TypeRef::Float => raw
            .as_f64()
            .map(Value::Float)
            .ok_or_else(|| mismatch("float")),
        TypeRef::Str => raw
            .as_str()
            .map(|s| Value::Str(s.to_string()))
            .ok_or_else(|| mismatch("string")),
        TypeRef::Enum(name) => {
            let ordinal = raw
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| mismatch("enum ordinal"))?;
            let descriptor = registry.enum_descriptor(name)?;
            if descriptor.item(ordinal).is_none() {
                return Err(CodecError::InvalidEnumOrdinal {
                    enumeration: name.clone(),
                    ordinal,
                    count: descriptor.count(),
                });
            }
            Ok(Value::Enum(ordinal))
        }
        TypeRef::Struct(name) => {
            let descriptor = registry.struct_descriptor(name)?;
            Ok(Value::Struct(decode_with(registry, &descriptor, raw)?))
        }
        TypeRef::Array(elem, len) => {
            let items = raw.as_array().ok_or_else(|| mismatch("array"))?;
            if items.len() != *len {
                return Err(CodecError::ArrayLengthMismatch {
                    strukt: strukt.to_string(),
                    field: field.to_string(),
                    expected: *len,
                    got: items.len(),
                });
            }
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                values.push(decode_value(registry, strukt, field, elem, item)?);
            }
            Ok(Value::Array(values))
        }
        TypeRef::List(elem) => {
            let items = raw.as_array().ok_or_else(|| mismatch("array"))?;
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                values.push(decode_value(registry, strukt, field, elem, item)?);
            }
            Ok(Value::List(values))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{EnumDescriptor, FieldDescriptor, FieldFlags, StructDescriptor};

    fn test_registry() -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        registry
            .register_enum(
                EnumDescriptor::new("Jitter", "", &[("None", ""), ("White", ""), ("Halton", "")])
                    .unwrap(),
            )
            .unwrap();
        registry
            .register_struct(
                StructDescriptor::new(
                    "Camera",
                    "",
                    vec![
                        FieldDescriptor::bool_field("perspective", true, ""),
                        FieldDescriptor::float_field("fov", 45.0, ""),
                        FieldDescriptor::enum_field("jitter", "Jitter", "Halton", ""),
                        FieldDescriptor::float_array("position", &[0.0, 0.0, -10.0], "")
                            .with_flags(FieldFlags::NO_SERIALIZE),
                    ],
                )
                .unwrap(),
            )
            .unwrap();
        registry
            .register_struct(
                StructDescriptor::new(
                    "Scene",
                    "",
                    vec![
                        FieldDescriptor::str_field("name", "", ""),
                        FieldDescriptor::struct_field("camera", "Camera", ""),
                        FieldDescriptor::list("tags", TypeRef::Str, ""),
                    ],
                )
                .unwrap(),
            )
            .unwrap();
        registry.finalize().unwrap();
        registry
    }

    #[test]
    fn round_trip_preserves_serialized_fields() {
        let registry = test_registry();
        let mut scene = registry.instantiate("Scene").unwrap();
        scene.set("name", Value::Str("boids".to_string())).unwrap();
        scene.push("tags", Value::Str("demo".to_string())).unwrap();

        let encoded = encode(&scene).unwrap();
        let decoded = decode(&registry, "Scene", &encoded).unwrap();
        assert_eq!(decoded, scene);
    }

    #[test]
    fn no_serialize_fields_reset_to_defaults() {
        let registry = test_registry();
        let mut camera = registry.instantiate("Camera").unwrap();
        camera
            .set(
                "position",
                Value::Array(vec![
                    Value::Float(1.0),
                    Value::Float(2.0),
                    Value::Float(3.0),
                ]),
            )
            .unwrap();
        camera.set("fov", Value::Float(90.0)).unwrap();

        let encoded = encode(&camera).unwrap();
        // The runtime-only field never reaches the document.
        assert!(encoded.get("position").is_none());

        let decoded = decode(&registry, "Camera", &encoded).unwrap();
        assert_eq!(decoded.float_field("fov").unwrap(), 90.0);
        let position = decoded.slice_field("position").unwrap();
        assert_eq!(position[2].as_float(), Some(-10.0));
    }

    #[test]
    fn no_serialize_fields_ignored_even_if_present_in_input() {
        let registry = test_registry();
        let doc = serde_json::json!({
            "fov": 60.0,
            "position": [9.0, 9.0, 9.0],
        });
        let decoded = decode(&registry, "Camera", &doc).unwrap();
        let position = decoded.slice_field("position").unwrap();
        assert_eq!(position[0].as_float(), Some(0.0));
        assert_eq!(decoded.float_field("fov").unwrap(), 60.0);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let registry = test_registry();
        let decoded = decode(&registry, "Camera", &serde_json::json!({})).unwrap();
        assert!(decoded.bool_field("perspective").unwrap());
        assert_eq!(decoded.float_field("fov").unwrap(), 45.0);
        assert_eq!(decoded.ordinal_field("jitter").unwrap(), 2);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let registry = test_registry();
        let doc = serde_json::json!({
            "fov": 30.0,
            "addedInSomeFutureVersion": {"nested": true},
        });
        let decoded = decode(&registry, "Camera", &doc).unwrap();
        assert_eq!(decoded.float_field("fov").unwrap(), 30.0);
    }

    #[test]
    fn enums_encode_as_stable_ordinals() {
        let registry = test_registry();
        let camera = registry.instantiate("Camera").unwrap();
        let encoded = encode(&camera).unwrap();
        assert_eq!(encoded["jitter"], serde_json::json!(2));
    }

    #[test]
    fn out_of_range_ordinal_rejected() {
        let registry = test_registry();
        let doc = serde_json::json!({"jitter": 3});
        let err = decode(&registry, "Camera", &doc).unwrap_err();
        assert!(matches!(
            err,
            CodecError::InvalidEnumOrdinal {
                ordinal: 3,
                count: 3,
                ..
            }
        ));
    }

    #[test]
    fn wrong_array_length_rejected() {
        let mut registry = SchemaRegistry::new();
        registry
            .register_struct(
                StructDescriptor::new(
                    "Texture",
                    "",
                    vec![FieldDescriptor::int_array("size", &[0, 0, 1], "")],
                )
                .unwrap(),
            )
            .unwrap();
        registry.finalize().unwrap();

        let doc = serde_json::json!({"size": [1, 2]});
        let err = decode(&registry, "Texture", &doc).unwrap_err();
        assert!(matches!(
            err,
            CodecError::ArrayLengthMismatch {
                expected: 3,
                got: 2,
                ..
            }
        ));
    }

    #[test]
    fn wrong_shape_rejected() {
        let registry = test_registry();
        let doc = serde_json::json!({"fov": "wide"});
        let err = decode(&registry, "Camera", &doc).unwrap_err();
        assert!(matches!(err, CodecError::ValueShapeMismatch { .. }));
    }

    #[test]
    fn nested_struct_round_trip() {
        let registry = test_registry();
        let mut scene = registry.instantiate("Scene").unwrap();
        let mut camera = registry.instantiate("Camera").unwrap();
        camera.set("fov", Value::Float(72.0)).unwrap();
        scene.set("camera", Value::Struct(camera)).unwrap();

        let encoded = encode(&scene).unwrap();
        let decoded = decode(&registry, "Scene", &encoded).unwrap();
        let camera = decoded.struct_field("camera").unwrap();
        assert_eq!(camera.float_field("fov").unwrap(), 72.0);
    }
}
