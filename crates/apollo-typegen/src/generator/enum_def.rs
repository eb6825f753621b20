use crate::generator::field::unique;
use crate::generator::field::variant_ident;
use indexmap::IndexSet;
use std::fmt;

/// A Rust enum for a GraphQL enum, with string conversions in both directions.
///
/// Values are (de)serialized through `as_str` and `FromStr`, which fails with
/// `UnknownEnumValue` for strings the schema does not define. The first value
/// is the `Default`, which lenient decoding uses for `null`.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDef {
    name: String,
    schema_name: String,
    /// `(variant, GraphQL value)` pairs in schema order.
    values: Vec<(String, String)>,
    taken: IndexSet<String>,
}

impl EnumDef {
    pub fn new(name: impl Into<String>, schema_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema_name: schema_name.into(),
            values: Vec::new(),
            taken: IndexSet::new(),
        }
    }

    pub fn value(&mut self, value: impl Into<String>) {
        let value = value.into();
        let variant = unique(variant_ident(&value), &mut self.taken);
        self.values.push((variant, value));
    }

    pub fn variants(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(variant, _)| variant.as_str())
    }
}

impl fmt::Display for EnumDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = &self.name;
        writeln!(f, "/// The `{}` enum.", self.schema_name)?;
        if self.values.is_empty() {
            writeln!(f, "#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]")?;
        } else {
            writeln!(f, "#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]")?;
        }
        writeln!(f, "pub enum {name} {{")?;
        for (index, (variant, _)) in self.values.iter().enumerate() {
            if index == 0 {
                writeln!(f, "    #[default]")?;
            }
            writeln!(f, "    {variant},")?;
        }
        writeln!(f, "}}")?;

        writeln!(f)?;
        writeln!(f, "impl {name} {{")?;
        writeln!(f, "    pub fn as_str(&self) -> &'static str {{")?;
        if self.values.is_empty() {
            writeln!(f, "        match *self {{}}")?;
        } else {
            writeln!(f, "        match self {{")?;
            for (variant, value) in &self.values {
                writeln!(f, "            {name}::{variant} => \"{value}\",")?;
            }
            writeln!(f, "        }}")?;
        }
        writeln!(f, "    }}")?;
        writeln!(f, "}}")?;

        writeln!(f)?;
        writeln!(f, "impl std::fmt::Display for {name} {{")?;
        writeln!(
            f,
            "    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {{"
        )?;
        writeln!(f, "        f.write_str(self.as_str())")?;
        writeln!(f, "    }}")?;
        writeln!(f, "}}")?;

        writeln!(f)?;
        writeln!(f, "impl std::str::FromStr for {name} {{")?;
        writeln!(f, "    type Err = UnknownEnumValue;")?;
        writeln!(f)?;
        writeln!(f, "    fn from_str(value: &str) -> Result<Self, Self::Err> {{")?;
        writeln!(f, "        match value {{")?;
        for (variant, value) in &self.values {
            writeln!(f, "            \"{value}\" => Ok({name}::{variant}),")?;
        }
        writeln!(f, "            _ => Err(UnknownEnumValue {{")?;
        writeln!(f, "                enum_name: \"{}\",", self.schema_name)?;
        writeln!(f, "                value: value.to_string(),")?;
        writeln!(f, "            }}),")?;
        writeln!(f, "        }}")?;
        writeln!(f, "    }}")?;
        writeln!(f, "}}")?;

        writeln!(f)?;
        writeln!(f, "impl Serialize for {name} {{")?;
        writeln!(
            f,
            "    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {{"
        )?;
        writeln!(f, "        serializer.serialize_str(self.as_str())")?;
        writeln!(f, "    }}")?;
        writeln!(f, "}}")?;

        writeln!(f)?;
        writeln!(f, "impl<'de> Deserialize<'de> for {name} {{")?;
        writeln!(
            f,
            "    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {{"
        )?;
        writeln!(f, "        let value = String::deserialize(deserializer)?;")?;
        writeln!(f, "        value.parse().map_err(serde::de::Error::custom)")?;
        writeln!(f, "    }}")?;
        writeln!(f, "}}")
    }
}
