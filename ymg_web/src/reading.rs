use sqlx::SqlitePool;
use tracing::instrument;

/// Builds the word-level reading of `text`. Each run of Latin letters is
/// lowercased and resolved against the dictionary first, then the
/// transliterator; runs of anything else pass through for the analyzer to
/// deal with later.
#[instrument(skip(pool))]
pub async fn assemble_reading(pool: &SqlitePool, text: &str) -> Result<String, ymg_dict::Error> {
    let mut reading = String::with_capacity(text.len());
    let runs: Vec<&str> = ymg_ja_utils::script_runs(text).collect();
    for run in runs {
        let word = run.to_lowercase();
        if let Some(kana) = ymg_dict::lookup(pool, &word).await? {
            reading.push_str(&kana);
        } else if ymg_ja_utils::is_latin(&word) {
            reading.push_str(&ymg_romaji::transliterate(&word));
        } else {
            reading.push_str(run);
        }
    }
    Ok(reading)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use sqlx::SqlitePool;
    use ymg_dict::DictEntry;

    use super::assemble_reading;

    async fn seeded_pool() -> SqlitePool {
        let pool = ymg_dict::connect("sqlite::memory:").await.unwrap();
        ymg_dict::insert_entries(
            &pool,
            vec![DictEntry {
                word: "tokyo".into(),
                kana: "とうきょう".into(),
            }],
        )
        .await
        .unwrap();
        pool
    }

    #[tokio::test]
    async fn empty_text_reads_as_nothing() {
        let pool = seeded_pool().await;
        assert_eq!(assemble_reading(&pool, "").await.unwrap(), "");
    }

    #[tokio::test]
    async fn dictionary_words_win_over_the_transliterator() {
        let pool = seeded_pool().await;
        // the transliterator alone would spell this ときょ
        assert_eq!(assemble_reading(&pool, "tokyo").await.unwrap(), "とうきょう");
    }

    #[tokio::test]
    async fn dictionary_lookup_is_case_insensitive() {
        let pool = seeded_pool().await;
        assert_eq!(assemble_reading(&pool, "TOKYO").await.unwrap(), "とうきょう");
    }

    #[tokio::test]
    async fn unknown_latin_words_are_transliterated() {
        let pool = seeded_pool().await;
        assert_eq!(
            assemble_reading(&pool, "sushi wo taberu").await.unwrap(),
            "すし を たべる"
        );
    }

    #[tokio::test]
    async fn non_latin_runs_pass_through_untouched() {
        let pool = seeded_pool().await;
        assert_eq!(
            assemble_reading(&pool, "寿司とsake").await.unwrap(),
            "寿司とさけ"
        );
        assert_eq!(
            assemble_reading(&pool, "tokyo123").await.unwrap(),
            "とうきょう123"
        );
    }
}
