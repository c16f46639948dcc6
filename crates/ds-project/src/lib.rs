//! ds-project: scenario file format, migration and validation.

pub mod migrate;
pub mod schema;
pub mod validate;

pub use migrate::{LATEST_VERSION, migrate_to_latest};
pub use schema::*;
pub use validate::{ValidationError, validate_scenario};

use ds_sim::Simulation;
use std::path::{Path, PathBuf};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("{}: scenario written as version {version} is invalid: {source}", path.display())]
    InvalidFile {
        path: PathBuf,
        version: u32,
        source: ValidationError,
    },

    #[error("Migration error: {what}")]
    Migration { what: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Simulation error: {0}")]
    Sim(#[from] ds_sim::SimError),
}

/// On-disk encoding of a scenario.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
}

impl Format {
    /// `.json` is JSON; every other extension is read as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Format::Json,
            _ => Format::Yaml,
        }
    }

    fn parse(self, content: &str) -> ProjectResult<Scenario> {
        Ok(match self {
            Format::Yaml => serde_yaml::from_str(content)?,
            Format::Json => serde_json::from_str(content)?,
        })
    }

    fn render(self, scenario: &Scenario) -> ProjectResult<String> {
        Ok(match self {
            Format::Yaml => serde_yaml::to_string(scenario)?,
            Format::Json => serde_json::to_string_pretty(scenario)?,
        })
    }
}

/// Read a scenario, bring it up to [`LATEST_VERSION`] and validate the
/// migrated result. Validation failures name the file and the version it
/// was written as.
pub fn load_as(path: &Path, format: Format) -> ProjectResult<Scenario> {
    let content = std::fs::read_to_string(path)?;
    let stored = format.parse(&content)?;
    let version = stored.version;
    let scenario = migrate_to_latest(stored)?;
    validate_scenario(&scenario).map_err(|source| ProjectError::InvalidFile {
        path: path.to_path_buf(),
        version,
        source,
    })?;
    Ok(scenario)
}

/// Write a scenario at [`LATEST_VERSION`]. Older in-memory scenarios are
/// migrated first; nothing is written unless the result validates.
pub fn save_as(path: &Path, scenario: &Scenario, format: Format) -> ProjectResult<()> {
    let scenario = migrate_to_latest(scenario.clone())?;
    validate_scenario(&scenario)?;
    std::fs::write(path, format.render(&scenario)?)?;
    Ok(())
}

/// Load a scenario, picking the format from the file extension.
pub fn load(path: &Path) -> ProjectResult<Scenario> {
    load_as(path, Format::from_path(path))
}

pub fn save(path: &Path, scenario: &Scenario) -> ProjectResult<()> {
    save_as(path, scenario, Format::from_path(path))
}

pub fn load_yaml(path: &Path) -> ProjectResult<Scenario> {
    load_as(path, Format::Yaml)
}

pub fn save_yaml(path: &Path, scenario: &Scenario) -> ProjectResult<()> {
    save_as(path, scenario, Format::Yaml)
}

pub fn load_json(path: &Path) -> ProjectResult<Scenario> {
    load_as(path, Format::Json)
}

pub fn save_json(path: &Path, scenario: &Scenario) -> ProjectResult<()> {
    save_as(path, scenario, Format::Json)
}

impl Scenario {
    /// Build a ready-to-run simulation from the plant configuration.
    pub fn build(&self) -> ProjectResult<Simulation> {
        Ok(Simulation::from_config(&self.plant)?)
    }
}
