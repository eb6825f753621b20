#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PlanetsAllFilms {
    pub planets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PlanetsData {
    #[serde(rename = "allFilms")]
    pub all_films: Vec<PlanetsAllFilms>,
}

/// Variables of `Planets`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlanetsVariables {}

/// The `Planets` query.
#[derive(Debug, Clone, PartialEq)]
pub struct Planets {
    pub data: PlanetsData,
}

impl Planets {
    pub const OPERATION: &'static str = r#"query Planets {
  allFilms {
    planets
  }
}"#;

    /// Decode a response body.
    pub fn from_json(body: &str) -> Result<Self, ClientError> {
        decode_response(body).map(|data| Self { data })
    }

    /// Send the operation through `transport` and decode the response.
    pub fn execute<T: Transport + ?Sized>(
        transport: &T,
        variables: &PlanetsVariables,
    ) -> Result<Self, ClientError> {
        let variables = serde_json::to_value(variables).map_err(ClientError::Json)?;
        let body = transport
            .call(Self::OPERATION, variables)
            .map_err(ClientError::Transport)?;
        Self::from_json(&body)
    }
}
