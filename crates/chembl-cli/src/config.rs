//! Effective run configuration.
//!
//! Layers are merged as TOML tables, lowest first: built-in defaults, the
//! configuration file, `CLASSIFY_*` environment variables, and finally the
//! command line. The merged table is deserialized once into
//! [`PipelineOptions`].

use std::path::{Path, PathBuf};

use chembl_model::PipelineOptions;
use toml::{Table, Value};

use crate::logging::parse_level;

/// Prefix of `CLASSIFY__SECTION__KEY` variables.
pub const ENV_PREFIX: &str = "CLASSIFY__";
pub const ENV_INPUT_DIR: &str = "CLASSIFY_INPUT_DIR";
pub const ENV_OUTPUT_DIR: &str = "CLASSIFY_OUTPUT_DIR";

const REQUIRED_KEYS: [(&str, &str); 2] = [("io", "input_dir"), ("io", "output_dir")];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: Box<toml::de::Error>,
    },

    #[error("missing required config key {0}")]
    MissingKey(String),

    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("io.separator must be a single ASCII character, got {0:?}")]
    InvalidSeparator(String),
}

/// Values taken from command-line flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub write_meta: Option<bool>,
}

/// Build the effective options from an optional file, environment
/// variables and command-line overrides.
///
/// `env` is usually `std::env::vars()`; variables without the
/// `CLASSIFY` prefix are ignored.
pub fn load_config<I>(
    path: Option<&Path>,
    env: I,
    overrides: &ConfigOverrides,
) -> Result<PipelineOptions, ConfigError>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut table = Table::new();
    if let Some(path) = path {
        merge_tables(&mut table, read_config_file(path)?);
    }
    apply_env(&mut table, env)?;
    apply_overrides(&mut table, overrides)?;
    options_from_table(table)
}

fn read_config_file(path: &Path) -> Result<Table, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    text.parse::<Table>().map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source: Box::new(source),
    })
}

fn options_from_table(table: Table) -> Result<PipelineOptions, ConfigError> {
    for (section, key) in REQUIRED_KEYS {
        let present = table
            .get(section)
            .and_then(Value::as_table)
            .is_some_and(|values| values.contains_key(key));
        if !present {
            return Err(ConfigError::MissingKey(format!("{section}.{key}")));
        }
    }
    let options = Value::Table(table)
        .try_into::<PipelineOptions>()
        .map_err(|error| ConfigError::InvalidValue {
            key: "config".to_string(),
            message: error.to_string().trim().to_string(),
        })?;
    validate_options(&options)?;
    Ok(options)
}

fn validate_options(options: &PipelineOptions) -> Result<(), ConfigError> {
    if options.io.separator_byte().is_none() {
        return Err(ConfigError::InvalidSeparator(options.io.separator.clone()));
    }
    if !options.runtime.float_na_fill.is_finite() {
        return Err(ConfigError::InvalidValue {
            key: "runtime.float_na_fill".to_string(),
            message: "must be a finite number".to_string(),
        });
    }
    if parse_level(&options.log.level).is_none() {
        return Err(ConfigError::InvalidValue {
            key: "log.level".to_string(),
            message: format!("unknown level {:?}", options.log.level),
        });
    }
    if options.pairs.predicates.is_empty() {
        return Err(ConfigError::InvalidValue {
            key: "pairs.predicates".to_string(),
            message: "at least one predicate is required".to_string(),
        });
    }
    Ok(())
}

fn apply_env<I>(table: &mut Table, env: I) -> Result<(), ConfigError>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut vars: Vec<(String, String)> = env
        .into_iter()
        .filter(|(name, _)| name.starts_with("CLASSIFY_"))
        .collect();
    vars.sort();
    for (name, raw) in vars {
        let path: Vec<String> = match name.as_str() {
            ENV_INPUT_DIR => vec!["io".to_string(), "input_dir".to_string()],
            ENV_OUTPUT_DIR => vec!["io".to_string(), "output_dir".to_string()],
            _ => match name.strip_prefix(ENV_PREFIX) {
                Some(rest) => rest.split("__").map(str::to_lowercase).collect(),
                None => continue,
            },
        };
        if path.len() < 2 || path.iter().any(String::is_empty) {
            return Err(ConfigError::InvalidValue {
                key: name,
                message: "expected CLASSIFY__SECTION__KEY".to_string(),
            });
        }
        set_value(table, &path, parse_scalar(&raw))?;
    }
    Ok(())
}

fn apply_overrides(table: &mut Table, overrides: &ConfigOverrides) -> Result<(), ConfigError> {
    let io_key = |key: &str| ["io".to_string(), key.to_string()];
    if let Some(dir) = &overrides.input_dir {
        set_value(table, &io_key("input_dir"), path_value(dir))?;
    }
    if let Some(dir) = &overrides.output_dir {
        set_value(table, &io_key("output_dir"), path_value(dir))?;
    }
    if let Some(write_meta) = overrides.write_meta {
        set_value(table, &io_key("write_meta"), Value::Boolean(write_meta))?;
    }
    Ok(())
}

fn path_value(path: &Path) -> Value {
    Value::String(path.to_string_lossy().into_owned())
}

/// Read an environment value as a TOML scalar, or as a plain string when
/// it is not valid TOML.
pub fn parse_scalar(raw: &str) -> Value {
    let document = format!("value = {raw}");
    match document.parse::<Table>() {
        Ok(mut parsed) if parsed.len() == 1 => parsed
            .remove("value")
            .unwrap_or_else(|| Value::String(raw.to_string())),
        _ => Value::String(raw.to_string()),
    }
}

fn set_value(table: &mut Table, path: &[String], value: Value) -> Result<(), ConfigError> {
    let Some((last, parents)) = path.split_last() else {
        return Ok(());
    };
    let mut current = table;
    for (depth, part) in parents.iter().enumerate() {
        let entry = current
            .entry(part.clone())
            .or_insert_with(|| Value::Table(Table::new()));
        current = match entry {
            Value::Table(inner) => inner,
            _ => {
                return Err(ConfigError::InvalidValue {
                    key: path[..=depth].join("."),
                    message: "expected a table".to_string(),
                });
            }
        };
    }
    current.insert(last.clone(), value);
    Ok(())
}

/// Merge `overlay` into `base`; nested tables merge key by key.
fn merge_tables(base: &mut Table, overlay: Table) {
    for (key, value) in overlay {
        let replaced = match (base.get_mut(&key), value) {
            (Some(Value::Table(existing)), Value::Table(incoming)) => {
                merge_tables(existing, incoming);
                None
            }
            (_, value) => Some(value),
        };
        if let Some(value) = replaced {
            base.insert(key, value);
        }
    }
}

/// Render the effective options as TOML.
pub fn render_config(options: &PipelineOptions) -> Result<String, toml::ser::Error> {
    toml::to_string_pretty(options)
}
