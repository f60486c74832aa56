use crate::api::endpoints::LICHESS_BASE_URL;
use crate::error::AppError;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const TOKEN_FILE: &str = "api-key.txt";
pub const USERNAME_FILE: &str = "username.txt";

#[derive(Clone)]
pub struct Config {
    pub token: String,
    pub username: String,
    pub base_url: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("token", &"<redacted>")
            .field("username", &self.username)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Values given on the command line; each one wins over the environment.
#[derive(Debug, Default)]
pub struct ConfigOverrides {
    pub username: Option<String>,
    pub token_file: Option<PathBuf>,
    pub username_file: Option<PathBuf>,
}

impl Config {
    pub fn load(overrides: ConfigOverrides) -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let token_path = resolve_path(overrides.token_file, "LICHESS_TOKEN_FILE", TOKEN_FILE);
        let token = read_single_line(&token_path)?;

        let username = match overrides.username {
            Some(username) => username,
            None => {
                let path =
                    resolve_path(overrides.username_file, "LICHESS_USERNAME_FILE", USERNAME_FILE);
                read_single_line(&path)?
            }
        };

        let base_url = env::var("LICHESS_API_URL").unwrap_or_else(|_| LICHESS_BASE_URL.to_string());

        log::debug!("loaded credentials from {}", token_path.display());

        Ok(Config {
            token,
            username,
            base_url,
        })
    }
}

/// Flag, then environment variable, then the working directory, then `~/.lichess_stats`.
fn resolve_path(explicit: Option<PathBuf>, env_key: &str, file_name: &str) -> PathBuf {
    if let Some(path) = explicit {
        return path;
    }
    if let Ok(path) = env::var(env_key) {
        return PathBuf::from(path);
    }

    let local = PathBuf::from(file_name);
    if local.exists() {
        return local;
    }

    dirs::home_dir()
        .map(|home| home.join(".lichess_stats").join(file_name))
        .filter(|path| path.exists())
        .unwrap_or(local)
}

/// Returns the first line of `path` without its line terminator.
pub fn read_single_line(path: &Path) -> Result<String, AppError> {
    let content = fs::read_to_string(path).map_err(|e| {
        AppError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
    })?;

    Ok(content.lines().next().unwrap_or_default().to_string())
}
