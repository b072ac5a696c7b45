use std::path::Path;

use anyhow::{bail, Context};
use toml::{map::Map, Value};

const SECRETS_FILE: &str = "Secrets.toml";

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub storage: Storage,
    pub port: u16,
    pub base_path: String,
    pub cors_origins: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Storage {
    MongoDb {
        url: String,
        database: String,
        collection: String,
    },
    Memory,
}

impl Config {
    /// Loads `Secrets.toml`, then `.env`, then the process environment, each
    /// overriding the one before.
    pub fn load() -> anyhow::Result<Self> {
        let env = load_env(Path::new(SECRETS_FILE))?;

        Self::from_env(&env)
    }

    pub fn from_env(env: &Map<String, Value>) -> anyhow::Result<Self> {
        let storage = match get(env, "STORAGE")?.as_deref() {
            None | Some("mongodb") => Storage::MongoDb {
                url: get(env, "MONGO_DB_URL")?
                    .context("MONGO_DB_URL was not found")?,
                database: get(env, "MONGO_DEFAULT_DB")?
                    .context("MONGO_DEFAULT_DB was not found")?,
                collection: get(env, "MONGO_COLLECTION")?
                    .unwrap_or_else(|| "blogs".to_string()),
            },
            Some("memory") => Storage::Memory,
            Some(other) => bail!("unknown STORAGE: {other}"),
        };

        let port = match get(env, "PORT")? {
            Some(port) => port
                .parse()
                .with_context(|| format!("failed to parse PORT: {port}"))?,
            None => 3000,
        };

        let base_path =
            get(env, "BASE_PATH")?.unwrap_or_else(|| "/blog".to_string());
        if !base_path.starts_with('/') {
            bail!("BASE_PATH must start with '/': {base_path}");
        }
        let base_path = match base_path.trim_end_matches('/') {
            "" => "/".to_string(),
            trimmed => trimmed.to_string(),
        };

        let cors_origins = get(env, "CORS_ORIGINS")?
            .map(|origins| {
                origins
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            storage,
            port,
            base_path,
            cors_origins,
        })
    }
}

/// Strings are taken as is, integers are rendered, anything else is an
/// error.
fn get(
    env: &Map<String, Value>,
    key: &str,
) -> anyhow::Result<Option<String>> {
    match env.get(key) {
        None => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(Value::Integer(value)) => Ok(Some(value.to_string())),
        Some(other) => bail!("{key} must be a string, found {other}"),
    }
}

pub fn load_env(secrets: &Path) -> anyhow::Result<Map<String, Value>> {
    let mut env = if secrets.exists() {
        let text = std::fs::read_to_string(secrets).with_context(|| {
            format!("failed to read {}", secrets.display())
        })?;
        toml::from_str::<Map<String, Value>>(&text).with_context(|| {
            format!("failed to parse {}", secrets.display())
        })?
    } else {
        Map::new()
    };

    match dotenvy::dotenv() {
        Ok(_) => {}
        Err(e) if e.not_found() => {}
        Err(e) => return Err(e).context("failed to load .env"),
    }

    env.extend(
        std::env::vars().map(|(key, value)| (key, Value::String(value))),
    );

    Ok(env)
}
