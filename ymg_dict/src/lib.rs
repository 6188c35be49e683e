//! Reading dictionary backed by SQLite. Words found here bypass the
//! transliterator entirely.

use std::{collections::BTreeMap, fs, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    QueryBuilder, Sqlite, SqlitePool,
};
use tracing::{debug, instrument, warn};

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(context(suffix(Error)))]
pub enum Error {
    #[snafu(display("invalid database url {url:?}"))]
    BadDatabaseUrl { url: String, source: sqlx::Error },
    #[snafu(display("failed to open dictionary database {url:?}"))]
    OpenDatabase { url: String, source: sqlx::Error },
    CreateSchema { source: sqlx::Error },
    CountEntries { source: sqlx::Error },
    #[snafu(display("lookup failed for {word:?}"))]
    Lookup { word: String, source: sqlx::Error },
    #[snafu(display("failed to read seed file {path:?}"))]
    OpenSeedFile {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("seed file {path:?} is not a word to kana map"))]
    DeserializeSeed {
        path: std::path::PathBuf,
        source: serde_json::Error,
    },
    InsertEntries { source: sqlx::Error },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DictEntry {
    pub word: String,
    pub kana: String,
}

/// Opens the dictionary database, creating the file and the `yomi` table on
/// first use.
pub async fn connect(url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(url)
        .context(BadDatabaseUrlError { url })?
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .connect_with(options)
        .await
        .context(OpenDatabaseError { url })?;
    sqlx::query("CREATE TABLE IF NOT EXISTS yomi (word TEXT PRIMARY KEY, kana TEXT NOT NULL)")
        .execute(&pool)
        .await
        .context(CreateSchemaError)?;
    Ok(pool)
}

/// Returns the kana reading recorded for `word`, if any. Matching is exact;
/// callers are expected to lowercase first.
pub async fn lookup(pool: &SqlitePool, word: &str) -> Result<Option<String>> {
    let entry = sqlx::query_as::<_, DictEntry>("SELECT word, kana FROM yomi WHERE word = $1")
        .bind(word)
        .fetch_optional(pool)
        .await
        .context(LookupError { word })?;
    Ok(entry.map(|e| e.kana))
}

pub async fn insert_entries(pool: &SqlitePool, entries: Vec<DictEntry>) -> Result<()> {
    // SQLite caps the number of bind parameters per statement
    let max_arg_count = 301;
    for chunk in entries.chunks(max_arg_count / 2) {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("INSERT INTO yomi(word, kana) ");
        qb.push_values(chunk, |mut b, entry| {
            b.push_bind(entry.word.clone()).push_bind(entry.kana.clone());
        });
        qb.build().execute(pool).await.context(InsertEntriesError)?;
    }
    debug!(entries = entries.len(), "seeded dictionary");
    Ok(())
}

/// Loads a seed file into an empty dictionary. A populated table is left
/// alone so restarts do not re-import.
#[instrument(skip(pool))]
pub async fn import_seed(pool: &SqlitePool, path: &Path) -> Result<()> {
    let seeded: i64 = sqlx::query_scalar("SELECT count(*) FROM yomi")
        .fetch_one(pool)
        .await
        .context(CountEntriesError)?;
    if seeded != 0 {
        warn!("dictionary already imported, skipping");
        return Ok(());
    }

    let text = fs::read_to_string(path).context(OpenSeedFileError { path })?;
    let entries = parse_seed(&text).context(DeserializeSeedError { path })?;
    insert_entries(pool, entries).await
}

fn parse_seed(text: &str) -> serde_json::Result<Vec<DictEntry>> {
    let map: BTreeMap<String, String> = serde_json::from_str(text)?;
    Ok(map
        .into_iter()
        .map(|(word, kana)| DictEntry { word, kana })
        .collect())
}
