use crate::client;
use crate::generator::EnumDef;
use crate::generator::OperationDef;
use crate::generator::StructDef;
use std::fmt;

/// A complete generated source file.
///
/// Definitions are printed in a fixed order: the custom header, the client
/// support code, enums, input objects, record types, then one entry type per
/// operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Artifact {
    header: Option<String>,
    date_time: bool,
    enums: Vec<EnumDef>,
    inputs: Vec<StructDef>,
    records: Vec<StructDef>,
    operations: Vec<OperationDef>,
}

impl Artifact {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(&mut self, header: impl Into<String>) {
        self.header = Some(header.into());
    }

    /// Include the `DateTime` scalar wrapper.
    pub fn date_time(&mut self) {
        self.date_time = true;
    }

    pub fn enum_def(&mut self, enum_def: EnumDef) {
        self.enums.push(enum_def);
    }

    pub fn input(&mut self, input: StructDef) {
        self.inputs.push(input);
    }

    /// Add a record type. Records must be added after the records they reference.
    pub fn record(&mut self, record: StructDef) {
        self.records.push(record);
    }

    pub fn operation(&mut self, operation: OperationDef) {
        self.operations.push(operation);
    }

    pub fn records(&self) -> &[StructDef] {
        &self.records
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(header) = &self.header {
            writeln!(f, "{}", header.trim_end())?;
            writeln!(f)?;
        }
        write!(f, "{}", client::IMPORTS)?;
        writeln!(f)?;
        write!(f, "{}", client::PRELUDE)?;
        if self.date_time {
            writeln!(f)?;
            write!(f, "{}", client::DATE_TIME)?;
        }

        for enum_def in &self.enums {
            writeln!(f)?;
            write!(f, "{enum_def}")?;
        }
        for input in &self.inputs {
            writeln!(f)?;
            write!(f, "{input}")?;
        }
        for record in &self.records {
            writeln!(f)?;
            write!(f, "{record}")?;
        }
        for operation in &self.operations {
            writeln!(f)?;
            write!(f, "{operation}")?;
        }
        Ok(())
    }
}
