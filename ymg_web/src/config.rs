use std::{env, num::ParseIntError, path::PathBuf};

use snafu::{ResultExt, Snafu};

type Result<T, E = Error> = std::result::Result<T, E>;

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Snafu)]
#[snafu(context(suffix(Error)))]
pub enum Error {
    #[snafu(display("DATABASE_URL must be set"))]
    MissingDatabaseUrl { source: env::VarError },
    #[snafu(display("PORT must be a number, got {raw:?}"))]
    BadPort { raw: String, source: ParseIntError },
}

/// Runtime configuration, read from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub mecab_path: String,
    pub dict_seed: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Config> {
        let port = match env::var("PORT") {
            Ok(raw) => raw.parse().context(BadPortError { raw: raw.as_str() })?,
            Err(_) => DEFAULT_PORT,
        };
        let database_url = env::var("DATABASE_URL").context(MissingDatabaseUrlError)?;
        let mecab_path = env::var("MECAB_PATH").unwrap_or_else(|_| "mecab".to_string());
        let dict_seed = env::var("DICT_SEED").ok().map(PathBuf::from);
        Ok(Config {
            port,
            database_url,
            mecab_path,
            dict_seed,
        })
    }
}
