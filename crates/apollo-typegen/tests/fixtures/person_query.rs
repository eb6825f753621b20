/// The `LengthUnit` enum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LengthUnit {
    #[default]
    Meter,
    Foot,
}

impl LengthUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            LengthUnit::Meter => "METER",
            LengthUnit::Foot => "FOOT",
        }
    }
}

impl std::fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LengthUnit {
    type Err = UnknownEnumValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "METER" => Ok(LengthUnit::Meter),
            "FOOT" => Ok(LengthUnit::Foot),
            _ => Err(UnknownEnumValue {
                enum_name: "LengthUnit",
                value: value.to_string(),
            }),
        }
    }
}

impl Serialize for LengthUnit {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LengthUnit {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

/// The `ExperienceLevel` enum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ExperienceLevel {
    #[default]
    FirstTimer,
    Veteran,
}

impl ExperienceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::FirstTimer => "FIRST_TIMER",
            ExperienceLevel::Veteran => "VETERAN",
        }
    }
}

impl std::fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ExperienceLevel {
    type Err = UnknownEnumValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "FIRST_TIMER" => Ok(ExperienceLevel::FirstTimer),
            "VETERAN" => Ok(ExperienceLevel::Veteran),
            _ => Err(UnknownEnumValue {
                enum_name: "ExperienceLevel",
                value: value.to_string(),
            }),
        }
    }
}

impl Serialize for ExperienceLevel {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ExperienceLevel {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PersonQueryPersonHomeworld {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PersonQueryPerson {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub experience: ExperienceLevel,
    /// Selected with `unit: $unit`.
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub homeworld: Option<PersonQueryPersonHomeworld>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PersonQueryFilm {
    #[serde(rename = "releaseDate", default)]
    pub release_date: Option<DateTime>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PersonQueryData {
    /// Selected with `id: $id`.
    #[serde(default)]
    pub person: Option<PersonQueryPerson>,
    /// Selected with `id: $id`.
    #[serde(default)]
    pub film: Option<PersonQueryFilm>,
}

/// Variables of `PersonQuery`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PersonQueryVariables {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<LengthUnit>,
}

/// The `PersonQuery` query.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonQuery {
    pub data: PersonQueryData,
}

impl PersonQuery {
    pub const OPERATION: &'static str = r#"query PersonQuery($id: ID!, $unit: LengthUnit) {
  person(id: $id) {
    name
    experience
    height(unit: $unit)
    homeworld {
      name
    }
  }
  film(id: $id) {
    releaseDate
  }
}"#;

    /// Decode a response body.
    pub fn from_json(body: &str) -> Result<Self, ClientError> {
        decode_response(body).map(|data| Self { data })
    }

    /// Send the operation through `transport` and decode the response.
    pub fn execute<T: Transport + ?Sized>(
        transport: &T,
        variables: &PersonQueryVariables,
    ) -> Result<Self, ClientError> {
        let variables = serde_json::to_value(variables).map_err(ClientError::Json)?;
        let body = transport
            .call(Self::OPERATION, variables)
            .map_err(ClientError::Transport)?;
        Self::from_json(&body)
    }
}
