//! Runtime decoding and encoding of operation payloads.
//!
//! [`Codec`] interprets a [`TypeRegistry`] the same way the generated Rust
//! code does, so responses can be checked without compiling anything. In the
//! default lenient mode a `null` or missing value in a non-null position is
//! passed through as [`TypedValue::Null`]; strict mode rejects it.

use crate::config::ScalarCodec;
use crate::dedup::InternedOperation;
use crate::dedup::TypeId;
use crate::dedup::TypeRegistry;
use crate::tree::OperationTree;
use crate::GenerateOptions;
use crate::TypeKind;
use crate::TypeRef;
use chrono::DateTime;
use chrono::NaiveDateTime;
use chrono::SecondsFormat;
use chrono::Utc;
use indexmap::IndexMap;

/// A JSON-compatible dynamically-typed value.
pub type JsonValue = serde_json_bytes::Value;

/// A JSON-compatible object/map with string keys and dynamically-typed values.
pub type JsonMap = serde_json_bytes::Map<serde_json_bytes::ByteString, JsonValue>;

/// A decoded value, shaped after the generated types.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Null,
    /// Built-in and unmapped custom scalars, as received.
    Scalar(JsonValue),
    DateTime(DateTime<Utc>),
    Enum {
        /// The schema name of the enum.
        enum_name: String,
        value: String,
    },
    List(Vec<TypedValue>),
    Object {
        /// The generated record or input type name.
        type_name: String,
        /// Keyed by response key (or input field name).
        fields: IndexMap<String, TypedValue>,
    },
}

impl TypedValue {
    pub fn is_null(&self) -> bool {
        matches!(self, TypedValue::Null)
    }

    /// Look up a field of an object value.
    pub fn get(&self, key: &str) -> Option<&TypedValue> {
        match self {
            TypedValue::Object { fields, .. } => fields.get(key),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[TypedValue]> {
        match self {
            TypedValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&str> {
        match self {
            TypedValue::Enum { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&JsonValue> {
        match self {
            TypedValue::Scalar(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_date_time(&self) -> Option<&DateTime<Utc>> {
        match self {
            TypedValue::DateTime(value) => Some(value),
            _ => None,
        }
    }

    pub fn type_name(&self) -> Option<&str> {
        match self {
            TypedValue::Object { type_name, .. } => Some(type_name),
            _ => None,
        }
    }

    fn describe(&self) -> String {
        match self {
            TypedValue::Null => "null".to_string(),
            TypedValue::Scalar(value) => describe_json(value).to_string(),
            TypedValue::DateTime(_) => "a date-time".to_string(),
            TypedValue::Enum { enum_name, .. } => format!("a `{enum_name}` value"),
            TypedValue::List(_) => "a list".to_string(),
            TypedValue::Object { type_name, .. } => format!("a `{type_name}` object"),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    #[error("unknown value `{value}` for enum `{enum_name}`")]
    UnknownEnumValue { enum_name: String, value: String },

    #[error("`{value}` is not a valid `{scalar}`: {message}")]
    ScalarFormatError {
        scalar: String,
        value: String,
        message: String,
    },

    #[error("non-null value at `{path}` is null or missing")]
    MissingRequiredField { path: String },

    #[error("expected {expected} at `{path}`, found {found}")]
    UnexpectedShape {
        path: String,
        expected: &'static str,
        found: String,
    },

    #[error("payload is not valid JSON: {message}")]
    Json { message: String },

    #[error("response has no `data`")]
    MissingData,
}

/// Parse a date-time scalar: RFC 3339, or an ISO 8601 date-time without
/// offset which is taken to be UTC.
pub fn parse_date_time(value: &str) -> Result<DateTime<Utc>, DecodeError> {
    if let Ok(date_time) = DateTime::parse_from_rfc3339(value) {
        return Ok(date_time.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|error| DecodeError::ScalarFormatError {
            scalar: "DateTime".to_string(),
            value: value.to_string(),
            message: error.to_string(),
        })
}

/// Format a date-time scalar as RFC 3339 in UTC.
pub fn format_date_time(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

pub struct Codec<'r> {
    registry: &'r TypeRegistry,
    options: &'r GenerateOptions,
}

impl<'r> Codec<'r> {
    pub fn new(registry: &'r TypeRegistry, options: &'r GenerateOptions) -> Self {
        Self { registry, options }
    }

    /// Decode a whole response body into the operation's data type.
    pub fn decode_response(
        &self,
        operation: &InternedOperation,
        raw: &str,
    ) -> Result<TypedValue, DecodeError> {
        let response: JsonValue = serde_json::from_str(raw).map_err(|error| DecodeError::Json {
            message: error.to_string(),
        })?;
        let data = match &response {
            JsonValue::Object(response) => response.get("data"),
            other => return Err(unexpected("response", "an object", describe_json(other))),
        };
        match data {
            None | Some(JsonValue::Null) => Err(DecodeError::MissingData),
            Some(data) => self.decode_data(operation.data, data),
        }
    }

    /// Decode the `data` member of a response.
    pub fn decode_data(&self, data: TypeId, raw: &JsonValue) -> Result<TypedValue, DecodeError> {
        self.decode_object("data", data, raw)
    }

    pub fn decode_value(
        &self,
        type_ref: &TypeRef,
        nested: Option<TypeId>,
        raw: Option<&JsonValue>,
    ) -> Result<TypedValue, DecodeError> {
        self.decode("value", type_ref, nested, raw)
    }

    pub fn encode_value(
        &self,
        type_ref: &TypeRef,
        nested: Option<TypeId>,
        value: &TypedValue,
    ) -> Result<JsonValue, DecodeError> {
        self.encode("value", type_ref, nested, value)
    }

    /// Encode variable values. Variables without a value are left out.
    pub fn encode_variables(
        &self,
        operation: &OperationTree,
        values: &IndexMap<String, TypedValue>,
    ) -> Result<JsonMap, DecodeError> {
        let mut encoded = JsonMap::new();
        for variable in &operation.variables {
            match values.get(&variable.name) {
                Some(value) => {
                    let json = self.encode(&variable.name, &variable.type_ref, None, value)?;
                    encoded.insert(variable.name.as_str(), json);
                }
                None if variable.type_ref.is_nullable() || variable.default_value.is_some() => {}
                None if self.options.strict => {
                    return Err(DecodeError::MissingRequiredField {
                        path: variable.name.clone(),
                    })
                }
                None => {}
            }
        }
        Ok(encoded)
    }

    /// Decode variable values. Variables absent from `raw` are left out.
    pub fn decode_variables(
        &self,
        operation: &OperationTree,
        raw: &JsonMap,
    ) -> Result<IndexMap<String, TypedValue>, DecodeError> {
        let mut decoded = IndexMap::new();
        for variable in &operation.variables {
            match raw.get(variable.name.as_str()) {
                Some(value) => {
                    let value = self.decode(&variable.name, &variable.type_ref, None, Some(value))?;
                    decoded.insert(variable.name.clone(), value);
                }
                None if variable.type_ref.is_nullable() || variable.default_value.is_some() => {}
                None if self.options.strict => {
                    return Err(DecodeError::MissingRequiredField {
                        path: variable.name.clone(),
                    })
                }
                None => {}
            }
        }
        Ok(decoded)
    }

    fn decode(
        &self,
        path: &str,
        type_ref: &TypeRef,
        nested: Option<TypeId>,
        raw: Option<&JsonValue>,
    ) -> Result<TypedValue, DecodeError> {
        let raw = match raw {
            None | Some(JsonValue::Null) => return self.null(path, type_ref),
            Some(raw) => raw,
        };

        if let Some(item) = type_ref.item() {
            let JsonValue::Array(items) = raw else {
                return Err(unexpected(path, "a list", describe_json(raw)));
            };
            return items
                .iter()
                .enumerate()
                .map(|(index, raw)| self.decode(&format!("{path}[{index}]"), &item, nested, Some(raw)))
                .collect::<Result<Vec<_>, _>>()
                .map(TypedValue::List);
        }

        match type_ref.kind {
            TypeKind::Scalar => self.decode_scalar(&type_ref.name, raw),
            TypeKind::Enum => self.decode_enum(path, &type_ref.name, raw),
            TypeKind::Object | TypeKind::Interface | TypeKind::Union => match nested {
                Some(id) => self.decode_object(path, id, raw),
                None => Ok(TypedValue::Scalar(raw.clone())),
            },
            TypeKind::InputObject => self.decode_input(path, &type_ref.name, raw),
        }
    }

    fn null(&self, path: &str, type_ref: &TypeRef) -> Result<TypedValue, DecodeError> {
        if type_ref.is_nullable() || !self.options.strict {
            Ok(TypedValue::Null)
        } else {
            Err(DecodeError::MissingRequiredField {
                path: path.to_string(),
            })
        }
    }

    fn decode_scalar(&self, name: &str, raw: &JsonValue) -> Result<TypedValue, DecodeError> {
        match self.options.scalar_codec(name) {
            ScalarCodec::DateTime => {
                let Some(text) = raw.as_str() else {
                    return Err(DecodeError::ScalarFormatError {
                        scalar: name.to_string(),
                        value: raw.to_string(),
                        message: "expected a string".to_string(),
                    });
                };
                parse_date_time(text)
                    .map(TypedValue::DateTime)
                    .map_err(|error| match error {
                        DecodeError::ScalarFormatError { value, message, .. } => {
                            DecodeError::ScalarFormatError {
                                scalar: name.to_string(),
                                value,
                                message,
                            }
                        }
                        error => error,
                    })
            }
            ScalarCodec::Raw => Ok(TypedValue::Scalar(raw.clone())),
        }
    }

    fn decode_enum(&self, path: &str, name: &str, raw: &JsonValue) -> Result<TypedValue, DecodeError> {
        let Some(value) = raw.as_str() else {
            return Err(unexpected(path, "an enum value", describe_json(raw)));
        };
        self.check_enum(name, value)?;
        Ok(TypedValue::Enum {
            enum_name: name.to_string(),
            value: value.to_string(),
        })
    }

    fn check_enum(&self, name: &str, value: &str) -> Result<(), DecodeError> {
        match self.registry.enum_by_schema_name(name) {
            Some(generated) if !generated.values.iter().any(|known| known == value) => {
                Err(DecodeError::UnknownEnumValue {
                    enum_name: name.to_string(),
                    value: value.to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    fn decode_object(&self, path: &str, id: TypeId, raw: &JsonValue) -> Result<TypedValue, DecodeError> {
        let JsonValue::Object(object) = raw else {
            return Err(unexpected(path, "an object", describe_json(raw)));
        };
        let Some(generated) = self.registry.get(id) else {
            return Ok(TypedValue::Scalar(raw.clone()));
        };
        let mut fields = IndexMap::with_capacity(generated.fields.len());
        for field in &generated.fields {
            let field_path = format!("{path}.{}", field.response_key);
            let value = self.decode(
                &field_path,
                &field.type_ref,
                field.nested,
                object.get(field.response_key.as_str()),
            )?;
            fields.insert(field.response_key.clone(), value);
        }
        Ok(TypedValue::Object {
            type_name: generated.name.clone(),
            fields,
        })
    }

    fn decode_input(&self, path: &str, name: &str, raw: &JsonValue) -> Result<TypedValue, DecodeError> {
        let JsonValue::Object(object) = raw else {
            return Err(unexpected(path, "an object", describe_json(raw)));
        };
        let Some(generated) = self.registry.input_by_schema_name(name) else {
            return Ok(TypedValue::Scalar(raw.clone()));
        };
        let mut fields = IndexMap::new();
        for field in &generated.fields {
            let field_path = format!("{path}.{}", field.name);
            match object.get(field.name.as_str()) {
                Some(value) => {
                    let value = self.decode(&field_path, &field.type_ref, None, Some(value))?;
                    fields.insert(field.name.clone(), value);
                }
                None if field.type_ref.is_nullable() || field.default_value.is_some() => {}
                None => {
                    self.null(&field_path, &field.type_ref)?;
                }
            }
        }
        Ok(TypedValue::Object {
            type_name: generated.name.clone(),
            fields,
        })
    }

    fn encode(
        &self,
        path: &str,
        type_ref: &TypeRef,
        nested: Option<TypeId>,
        value: &TypedValue,
    ) -> Result<JsonValue, DecodeError> {
        if value.is_null() {
            return self.null(path, type_ref).map(|_| JsonValue::Null);
        }

        if let Some(item) = type_ref.item() {
            let TypedValue::List(items) = value else {
                return Err(unexpected(path, "a list", value.describe()));
            };
            return items
                .iter()
                .enumerate()
                .map(|(index, value)| self.encode(&format!("{path}[{index}]"), &item, nested, value))
                .collect::<Result<Vec<_>, _>>()
                .map(JsonValue::Array);
        }

        match value {
            TypedValue::Null => Ok(JsonValue::Null),
            TypedValue::Scalar(json) => Ok(json.clone()),
            TypedValue::DateTime(date_time) => Ok(JsonValue::String(format_date_time(date_time).into())),
            TypedValue::Enum { value, .. } => {
                self.check_enum(&type_ref.name, value)?;
                Ok(JsonValue::String(value.as_str().into()))
            }
            TypedValue::List(_) => Err(unexpected(path, "a single value", value.describe())),
            TypedValue::Object { fields, .. } => match (type_ref.kind, nested) {
                (TypeKind::InputObject, _) => self.encode_input(path, &type_ref.name, fields),
                (_, Some(id)) => self.encode_object(path, id, fields),
                (_, None) => Err(unexpected(path, "a leaf value", value.describe())),
            },
        }
    }

    fn encode_object(
        &self,
        path: &str,
        id: TypeId,
        fields: &IndexMap<String, TypedValue>,
    ) -> Result<JsonValue, DecodeError> {
        let mut object = JsonMap::new();
        if let Some(generated) = self.registry.get(id) {
            for field in &generated.fields {
                let field_path = format!("{path}.{}", field.response_key);
                let value = fields.get(&field.response_key).unwrap_or(&TypedValue::Null);
                let json = self.encode(&field_path, &field.type_ref, field.nested, value)?;
                object.insert(field.response_key.as_str(), json);
            }
        }
        Ok(JsonValue::Object(object))
    }

    fn encode_input(
        &self,
        path: &str,
        name: &str,
        fields: &IndexMap<String, TypedValue>,
    ) -> Result<JsonValue, DecodeError> {
        let mut object = JsonMap::new();
        if let Some(generated) = self.registry.input_by_schema_name(name) {
            for field in &generated.fields {
                let field_path = format!("{path}.{}", field.name);
                match fields.get(&field.name) {
                    Some(value) => {
                        let json = self.encode(&field_path, &field.type_ref, None, value)?;
                        object.insert(field.name.as_str(), json);
                    }
                    None if field.type_ref.is_nullable() || field.default_value.is_some() => {}
                    None => {
                        self.null(&field_path, &field.type_ref)?;
                    }
                }
            }
        }
        Ok(JsonValue::Object(object))
    }
}

fn unexpected(path: &str, expected: &'static str, found: impl Into<String>) -> DecodeError {
    DecodeError::UnexpectedShape {
        path: path.to_string(),
        expected,
        found: found.into(),
    }
}

fn describe_json(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "a list",
        JsonValue::Object(_) => "an object",
    }
}
