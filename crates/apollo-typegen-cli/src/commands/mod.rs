mod generate;

pub(crate) use generate::Generate;

#[derive(Debug, clap::Subcommand)]
pub(crate) enum Command {
    /// Generate Rust source for the operations in a set of query documents.
    Generate(Generate),
}
