/// Error returned by a [`Transport`].
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// Sends an operation to a GraphQL server.
pub trait Transport {
    /// Send `operation` with `variables` and return the raw response body.
    fn call(&self, operation: &str, variables: serde_json::Value) -> Result<String, TransportError>;
}

/// An entry of the `errors` list of a GraphQL response.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GraphQLError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<serde_json::Value>,
}

#[derive(Debug)]
pub enum ClientError {
    Transport(TransportError),
    /// The body is not JSON, or the variables could not be serialized.
    Json(serde_json::Error),
    /// The body does not fit the generated types. Unknown enum values and
    /// malformed scalars only keep the message of their `UnknownEnumValue` or
    /// `ScalarFormatError`; parse the value with `FromStr` for the typed error.
    Decode(serde_json::Error),
    /// The response has errors and no data.
    Response(Vec<GraphQLError>),
    MissingData,
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Transport(error) => write!(f, "transport error: {error}"),
            ClientError::Json(error) => write!(f, "invalid JSON: {error}"),
            ClientError::Decode(error) => write!(f, "could not decode response: {error}"),
            ClientError::Response(errors) => {
                let messages: Vec<&str> = errors.iter().map(|error| error.message.as_str()).collect();
                write!(f, "GraphQL errors: {}", messages.join("; "))
            }
            ClientError::MissingData => f.write_str("response has no `data`"),
        }
    }
}

impl std::error::Error for ClientError {}

/// The envelope of a GraphQL response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Response<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQLError>,
}

/// Decode the `data` of a response body.
pub fn decode_response<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, ClientError> {
    let response: Response<T> = serde_json::from_str(body).map_err(|error| {
        if error.is_data() {
            ClientError::Decode(error)
        } else {
            ClientError::Json(error)
        }
    })?;
    match response.data {
        Some(data) => Ok(data),
        None if !response.errors.is_empty() => Err(ClientError::Response(response.errors)),
        None => Err(ClientError::MissingData),
    }
}

/// Deserialize a non-null field, taking `null` as its type's default value.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A string that is not one of an enum's values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEnumValue {
    pub enum_name: &'static str,
    pub value: String,
}

impl std::fmt::Display for UnknownEnumValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown value `{}` for enum `{}`", self.value, self.enum_name)
    }
}

impl std::error::Error for UnknownEnumValue {}

/// A scalar value that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarFormatError {
    pub scalar: &'static str,
    pub value: String,
    pub message: String,
}

impl std::fmt::Display for ScalarFormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "`{}` is not a valid `{}`: {}", self.value, self.scalar, self.message)
    }
}

impl std::error::Error for ScalarFormatError {}
