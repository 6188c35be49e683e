//! Morphological analyzer fallback. Text nothing else could read is handed
//! to mecab in `-Oyomi` mode and its katakana output folded to hiragana.

use std::process::Stdio;

use once_cell::sync::Lazy;
use regex::Regex;
use snafu::{OptionExt, ResultExt, Snafu};
use tokio::{io::AsyncWriteExt, process::Command};
use tracing::instrument;

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(context(suffix(Error)))]
pub enum Error {
    #[snafu(display("failed to run {program:?}"))]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    StdinUnavailable,
    #[snafu(display("failed to write to the analyzer"))]
    WriteInput { source: std::io::Error },
    #[snafu(display("failed to collect analyzer output"))]
    CollectOutput { source: std::io::Error },
    #[snafu(display("analyzer exited with {status}: {stderr}"))]
    AnalyzerFailed {
        status: std::process::ExitStatus,
        stderr: String,
    },
}

static UNSAFE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r##"["#&^()|`*+<>\\;\n]"##).unwrap());

/// Blanks out characters with a meaning to a shell or to mecab's own
/// formatting, then swaps the first `?` for a fullwidth `？` so a query
/// string survives the trip.
pub fn sanitize(text: &str) -> String {
    let cleaned = UNSAFE_CHARS.replace_all(text, " ");
    cleaned.replacen('?', "？", 1)
}

/// Handle on an external mecab binary.
#[derive(Debug, Clone)]
pub struct Mecab {
    program: String,
    args: Vec<String>,
}

impl Mecab {
    /// A mecab install asked for its reading (`-Oyomi`) output.
    pub fn new(program: impl Into<String>) -> Self {
        Mecab::with_args(program, ["-Oyomi"])
    }

    /// Any analyzer-shaped program with an explicit argv, for stand-ins
    /// that do not understand mecab's flags.
    pub fn with_args<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Mecab {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Sanitizes `text`, runs it through the analyzer, and folds the
    /// katakana reading to hiragana. The trailing newline the tool prints
    /// is dropped.
    pub async fn reading(&self, text: &str) -> Result<String> {
        let safe = sanitize(text);
        let raw = self.yomi(&safe).await?;
        let raw = raw.strip_suffix('\n').unwrap_or(&raw);
        Ok(ymg_ja_utils::kata_to_hira_str(raw))
    }

    #[instrument(skip_all)]
    async fn yomi(&self, text: &str) -> Result<String> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .context(SpawnError {
                program: &self.program,
            })?;

        let mut stdin = child.stdin.take().context(StdinUnavailableError)?;
        // a child that dies before draining stdin closes the pipe; the exit
        // status is checked before any write error so its stderr is what
        // gets reported
        let wrote = async {
            stdin.write_all(text.as_bytes()).await?;
            stdin.write_all(b"\n").await
        }
        .await;
        drop(stdin);

        let output = child.wait_with_output().await.context(CollectOutputError)?;
        if !output.status.success() {
            return AnalyzerFailedError {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            }
            .fail();
        }
        wrote.context(WriteInputError)?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn clean_text_is_left_alone() {
        assert_eq!(sanitize("konnichiha"), "konnichiha");
        assert_eq!(sanitize("お寿司？"), "お寿司？");
    }

    #[test]
    fn shell_metacharacters_become_spaces() {
        assert_eq!(sanitize(r##"a"b#c"##), "a b c");
        assert_eq!(sanitize("a&b^c(d)e"), "a b c d e");
        assert_eq!(sanitize("a|b`c*d+e"), "a b c d e");
        assert_eq!(sanitize("a<b>c\\d;e"), "a b c d e");
        assert_eq!(sanitize("line\nbreak"), "line break");
    }

    #[test]
    fn only_the_first_question_mark_turns_fullwidth() {
        assert_eq!(sanitize("nani? hontou?"), "nani？ hontou?");
    }

    // cat copies stdin to stdout, standing in for a well-behaved analyzer
    fn cat() -> Mecab {
        Mecab::with_args("cat", Vec::<String>::new())
    }

    #[test]
    fn the_default_argv_asks_mecab_for_yomi_output() {
        assert_eq!(Mecab::new("mecab").args, ["-Oyomi"]);
    }

    #[tokio::test]
    async fn reading_folds_analyzer_output_to_hiragana() {
        assert_eq!(cat().reading("ハロー、セカイ").await.unwrap(), "はろー、せかい");
    }

    #[tokio::test]
    async fn reading_strips_the_trailing_newline_only() {
        assert_eq!(cat().reading("スシ").await.unwrap(), "すし");
        assert_eq!(cat().reading("").await.unwrap(), "");
    }

    #[tokio::test]
    async fn reading_sanitizes_before_spawning() {
        assert_eq!(cat().reading("ラーメン?もう一杯?").await.unwrap(), "らーめん？もう一杯?");
    }

    #[tokio::test]
    async fn an_unknown_program_is_a_spawn_error() {
        let mecab = Mecab::new("ymg-definitely-not-installed");
        let err = mecab.reading("kani").await.unwrap_err();
        assert!(matches!(err, Error::Spawn { .. }));
    }

    // false exits without reading stdin, so this also covers the
    // closed-pipe path: the status, not the write error, is reported
    #[tokio::test]
    async fn a_failing_analyzer_reports_its_status() {
        let mecab = Mecab::new("false");
        let err = mecab.reading("kani").await.unwrap_err();
        assert!(matches!(err, Error::AnalyzerFailed { .. }));
    }
}
