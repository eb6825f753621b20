use anyhow::anyhow;
use anyhow::bail;
use anyhow::Context;
use anyhow::Result;
use apollo_typegen::Config;
use apollo_typegen::DocumentSource;
use apollo_typegen::GenerateOptions;
use apollo_typegen::Schema;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

#[derive(Debug, clap::Args)]
pub(crate) struct Generate {
    /// Configuration file. Defaults to `.typegen.json` in the current
    /// directory when it exists.
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Schema definition file.
    #[arg(long, short = 's')]
    pub schema: Option<PathBuf>,

    /// Where to write the generated source. Printed to stdout when omitted.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Generate types that reject `null` in non-null fields instead of
    /// decoding it as the field type's default value.
    #[arg(long)]
    pub strict: bool,

    /// Glob patterns of query documents, added to the configured ones.
    pub documents: Vec<String>,
}

/// Configuration file and command line merged together, with every path
/// resolved.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Settings {
    pub schema: PathBuf,
    pub documents: Vec<String>,
    pub output: Option<PathBuf>,
    pub options: GenerateOptions,
}

impl Generate {
    pub(crate) fn run(&self) -> Result<()> {
        let settings = match self.config_path() {
            Some(path) => {
                let config = Config::load(&path)?;
                let base = path.parent().unwrap_or_else(|| Path::new("")).to_owned();
                self.settings(config, &base)?
            }
            None => self.settings(Config::default(), Path::new(""))?,
        };

        let sdl = fs::read_to_string(&settings.schema)
            .with_context(|| format!("could not read schema `{}`", settings.schema.display()))?;
        let schema = Schema::parse_and_validate(&sdl, &settings.schema)
            .map_err(|with_errors| anyhow!("invalid schema:\n{}", with_errors.errors))?;

        let documents = read_documents(&expand_globs(&settings.documents)?)?;
        log::info!("generating from {} document(s)", documents.len());
        let source = apollo_typegen::generate(&schema, &documents, &settings.options)?;

        match &settings.output {
            Some(output) => {
                if let Some(parent) = output.parent().filter(|dir| !dir.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("could not create `{}`", parent.display()))?;
                }
                fs::write(output, source)
                    .with_context(|| format!("could not write `{}`", output.display()))?;
                log::info!("wrote `{}`", output.display());
            }
            None => print!("{source}"),
        }
        Ok(())
    }

    fn config_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.config {
            return Some(path.clone());
        }
        let default = PathBuf::from(Config::FILE_NAME);
        default.is_file().then_some(default)
    }

    /// Apply the command line over `config`, whose relative paths are
    /// relative to `base`.
    pub(crate) fn settings(&self, config: Config, base: &Path) -> Result<Settings> {
        let options = config.options().strict(config.strict || self.strict);
        let schema = match (&self.schema, &config.schema) {
            (Some(schema), _) => schema.clone(),
            (None, Some(schema)) => base.join(schema),
            (None, None) => bail!("no schema given, pass `--schema` or set `schema` in the configuration"),
        };
        let output = match (&self.output, &config.output) {
            (Some(output), _) => Some(output.clone()),
            (None, Some(output)) => Some(base.join(output)),
            (None, None) => None,
        };
        let mut documents: Vec<String> = config
            .documents
            .iter()
            .map(|pattern| base.join(pattern).to_string_lossy().into_owned())
            .collect();
        documents.extend(self.documents.iter().cloned());
        if documents.is_empty() {
            bail!("no documents given, pass glob patterns or set `documents` in the configuration");
        }

        Ok(Settings {
            schema,
            documents,
            output,
            options,
        })
    }
}

/// Every file matching one of `patterns`, in pattern order and then path
/// order, without duplicates.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for pattern in patterns {
        let mut matched = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern `{pattern}`"))?
            .collect::<Result<Vec<_>, _>>()?;
        if matched.is_empty() {
            log::warn!("`{pattern}` matches no files");
        }
        matched.sort();
        for path in matched {
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
    }
    Ok(paths)
}

fn read_documents(paths: &[PathBuf]) -> Result<Vec<DocumentSource>> {
    if paths.is_empty() {
        bail!("no query documents found");
    }
    paths
        .iter()
        .map(|path| {
            let text = fs::read_to_string(path)
                .with_context(|| format!("could not read `{}`", path.display()))?;
            log::debug!("read `{}`", path.display());
            Ok(DocumentSource::new(path.display().to_string(), text))
        })
        .collect()
}
