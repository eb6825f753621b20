use crate::client::raw_string_hashes;
use crate::generator::StructDef;
use crate::OperationKind;
use std::fmt;

/// Everything generated for one operation apart from its record types: the
/// variables struct and the entry type that sends and decodes it.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationDef {
    name: String,
    kind: OperationKind,
    data_type: String,
    source_text: String,
    variables: StructDef,
}

impl OperationDef {
    pub fn new(
        name: impl Into<String>,
        kind: OperationKind,
        data_type: impl Into<String>,
        source_text: impl Into<String>,
        variables: StructDef,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            data_type: data_type.into(),
            source_text: source_text.into(),
            variables,
        }
    }
}

impl fmt::Display for OperationDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = &self.name;
        let variables = self.variables.name();
        let hashes = "#".repeat(raw_string_hashes(&self.source_text));

        write!(f, "{}", self.variables)?;
        writeln!(f)?;
        writeln!(f, "/// The `{name}` {}.", self.kind)?;
        writeln!(f, "#[derive(Debug, Clone, PartialEq)]")?;
        writeln!(f, "pub struct {name} {{")?;
        writeln!(f, "    pub data: {},", self.data_type)?;
        writeln!(f, "}}")?;
        writeln!(f)?;
        writeln!(f, "impl {name} {{")?;
        writeln!(
            f,
            "    pub const OPERATION: &'static str = r{hashes}\"{}\"{hashes};",
            self.source_text.trim_end()
        )?;
        writeln!(f)?;
        writeln!(f, "    /// Decode a response body.")?;
        writeln!(
            f,
            "    pub fn from_json(body: &str) -> Result<Self, ClientError> {{"
        )?;
        writeln!(f, "        decode_response(body).map(|data| Self {{ data }})")?;
        writeln!(f, "    }}")?;
        writeln!(f)?;
        writeln!(
            f,
            "    /// Send the operation through `transport` and decode the response."
        )?;
        writeln!(f, "    pub fn execute<T: Transport + ?Sized>(")?;
        writeln!(f, "        transport: &T,")?;
        writeln!(f, "        variables: &{variables},")?;
        writeln!(f, "    ) -> Result<Self, ClientError> {{")?;
        writeln!(
            f,
            "        let variables = serde_json::to_value(variables).map_err(ClientError::Json)?;"
        )?;
        writeln!(f, "        let body = transport")?;
        writeln!(f, "            .call(Self::OPERATION, variables)")?;
        writeln!(f, "            .map_err(ClientError::Transport)?;")?;
        writeln!(f, "        Self::from_json(&body)")?;
        writeln!(f, "    }}")?;
        writeln!(f, "}}")
    }
}
