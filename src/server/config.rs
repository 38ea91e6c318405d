use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::core::Todo;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// json-server style `db.json` (`{ "todos": [...] }`) to seed the store from
    pub db_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct DbFile {
    #[serde(default)]
    todos: Vec<Todo>,
}

impl ServerConfig {
    /// Reads `APP_HOST`, `APP_PORT` and `APP_DB_FILE`, loading a `.env` file
    /// first if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let host = env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3500".to_string())
            .parse::<u16>()
            .context("APP_PORT must be a valid u16")?;

        let db_file = env::var_os("APP_DB_FILE").map(PathBuf::from);

        Ok(Self {
            host,
            port,
            db_file,
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Todos from the configured db file, empty when none is configured.
    pub fn seed(&self) -> Result<Vec<Todo>> {
        match &self.db_file {
            Some(path) => load_db_file(path),
            None => Ok(Vec::new()),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3500,
            db_file: None,
        }
    }
}

fn load_db_file(path: &Path) -> Result<Vec<Todo>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_db(&raw).with_context(|| format!("invalid db file {}", path.display()))
}

fn parse_db(raw: &str) -> Result<Vec<Todo>> {
    let db: DbFile = serde_json::from_str(raw)?;
    Ok(db.todos)
}
