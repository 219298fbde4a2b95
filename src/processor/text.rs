//! Control-escape text cleaner.
//!
//! MV message text is littered with `\C[n]`, `\I[n]`, `\.`-style escapes.
//! Everything backslash-prefixed is stripped except the `\N[n]` actor
//! placeholder, which resolves through the actor table (unknown ids become
//! the empty string). Total and deterministic; never fails.

use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::LazyLock;

// Argument-taking escapes (\C[2], \I[7], \V[3], \P[1]) go together with
// their bracket group; every other backslash pair strips alone, so literal
// bracket text after a no-argument escape survives.
static ESCAPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\(?:[CIVPcivp]\[[^\]]*\]|[^N])").expect("escape pattern"));

static ACTOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\N\[(\d+)\]").expect("actor placeholder pattern"));

pub fn clean_text(text: &str, actors: &HashMap<i64, String>) -> String {
    let stripped = ESCAPE_RE.replace_all(text, "");
    let resolved = ACTOR_RE.replace_all(&stripped, |caps: &Captures| {
        caps[1]
            .parse::<i64>()
            .ok()
            .and_then(|id| actors.get(&id).cloned())
            .unwrap_or_default()
    });
    resolved.trim().to_string()
}
