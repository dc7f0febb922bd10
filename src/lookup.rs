// Lookup adapter: runs Translate Shell (`trans`) in dump mode and pulls the
// card fields out of the raw Google Translate response it prints.
//
// The dump layout is undocumented and changes between versions, so the parser
// is best-effort: every section is optional and anything that does not have
// the expected shape is skipped.

use std::io;
use std::process::{Command, Stdio};

use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::error::LookupError;

/// How many example sentences end up on the card.
const MAX_EXAMPLES: usize = 4;
/// How many dictionary terms are kept per part of speech in the fallback.
const MAX_TERMS: usize = 5;

/// Structured result of a lookup. `Lookup::default()` is the empty result
/// used when the tool is unavailable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lookup {
    /// Definitions joined with `<br>`, ready for the card.
    pub translation: String,
    pub ipa: String,
    /// Distinct parts of speech, comma separated.
    pub pos: String,
    pub definitions: Vec<String>,
    pub examples: Vec<String>,
}

impl Lookup {
    /// The examples as they go on the card: bulleted and `<br>` separated.
    pub fn examples_field(&self) -> String {
        self.examples
            .iter()
            .take(MAX_EXAMPLES)
            .map(|e| format!("• {e}"))
            .collect::<Vec<_>>()
            .join("<br>")
    }
}

/// Run the lookup tool for `word` and parse its output.
pub fn lookup_word(config: &Config, word: &str) -> Result<Lookup, LookupError> {
    let lang = config.language.as_str();
    debug!(bin = %config.trans_bin, word, "running lookup tool");

    // Force an English locale so part-of-speech labels come back in English.
    let output = Command::new(&config.trans_bin)
        .args(["-dump", "-no-ansi", "-s", lang, "-t", lang, word])
        .env("LANG", "en_US.UTF-8")
        .stdin(Stdio::null())
        .output()
        .map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => LookupError::NotInstalled(config.trans_bin.clone()),
            _ => LookupError::Io(e),
        })?;

    if !output.status.success() {
        return Err(LookupError::Failed {
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(parse_dump(&String::from_utf8_lossy(&output.stdout)))
}

/// Parse the text printed by `trans -dump`.
pub fn parse_dump(output: &str) -> Lookup {
    let Some(data) = extract_json(output) else {
        debug!("no JSON array found in lookup output");
        return Lookup::default();
    };
    let Some(items) = data.as_array() else {
        return Lookup::default();
    };

    let mut lookup = Lookup {
        ipa: ipa_of(items).unwrap_or_default(),
        ..Lookup::default()
    };

    let mut glosses: Vec<(&str, String)> = Vec::new();
    for (pos, entries) in pos_blocks(items) {
        for entry in entries.iter().filter_map(Value::as_array) {
            // Definitions start with a string; synonym groups start with a list.
            let Some(gloss) = entry.first().and_then(Value::as_str) else {
                continue;
            };
            glosses.push((pos, gloss.to_string()));
            if let Some(example) = entry.get(2).and_then(Value::as_str) {
                lookup.examples.push(example.to_string());
            }
        }
    }

    if glosses.is_empty() {
        for (pos, entries) in pos_blocks(items).chain(top_level_blocks(items)) {
            let terms: Vec<&str> = entries
                .iter()
                .filter_map(Value::as_str)
                .take(MAX_TERMS)
                .collect();
            if !terms.is_empty() {
                glosses.push((pos, terms.join(", ")));
            }
        }
    }

    let mut parts: Vec<&str> = Vec::new();
    for (pos, _) in &glosses {
        if !parts.contains(pos) {
            parts.push(*pos);
        }
    }

    // With a single part of speech the PoS field already says it all.
    let tag = parts.len() > 1;
    lookup.definitions = glosses
        .iter()
        .map(|(pos, gloss)| {
            if tag {
                format!("({pos}) {gloss}")
            } else {
                gloss.clone()
            }
        })
        .collect();
    lookup.pos = parts.join(", ");
    lookup.translation = lookup.definitions.join("<br>");
    lookup
}

fn extract_json(output: &str) -> Option<Value> {
    let start = output.find('[')?;
    let end = output.rfind(']')?;
    if end < start {
        return None;
    }
    match serde_json::from_str(&output[start..=end]) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(error = %e, "lookup output is not valid JSON");
            None
        }
    }
}

/// The transliteration of the source text sits at `[0][1][3]`.
fn ipa_of(items: &[Value]) -> Option<String> {
    let raw = items.first()?.get(1)?.get(3)?.as_str()?.trim();
    if raw.is_empty() {
        return None;
    }
    if raw.starts_with('/') && raw.ends_with('/') && raw.len() > 1 {
        Some(raw.to_string())
    } else {
        Some(format!("/{raw}/"))
    }
}

/// `[pos, [entries...], ...]` blocks nested one level inside a section.
fn pos_blocks(items: &[Value]) -> impl Iterator<Item = (&str, &Vec<Value>)> {
    items
        .iter()
        .filter_map(Value::as_array)
        .filter(|section| {
            section
                .first()
                .and_then(Value::as_array)
                .is_some_and(|first| !first.is_empty())
        })
        .flat_map(|section| section.iter().filter_map(as_pos_block))
}

/// Sections that are themselves a `[pos, [entries...]]` block.
fn top_level_blocks(items: &[Value]) -> impl Iterator<Item = (&str, &Vec<Value>)> {
    items.iter().filter_map(as_pos_block)
}

fn as_pos_block(value: &Value) -> Option<(&str, &Vec<Value>)> {
    let block = value.as_array()?;
    let pos = block.first()?.as_str()?;
    let entries = block.get(1)?.as_array()?;
    Some((pos, entries))
}
