//! Escaping for every textual form a user-supplied value can end up in.
//!
//! Commands are spawned with discrete argv entries, never through a shell,
//! but three places still serialize values into text the engine (or a human
//! copying a log line) re-parses:
//!
//! - filter-graph option values ([`filter_value`]),
//! - concat-demuxer list files ([`concat_entry`]),
//! - rendered command lines in logs ([`shell_quote`]).

use std::borrow::Cow;
use std::path::Path;

use vt_core::{Error, Result};

/// Characters with meaning inside an ffmpeg filter graph description.
const FILTER_SPECIALS: &[char] = &['\\', '\'', ':', ',', ';', '[', ']', '=', ' ', '\t', '\n'];

/// Characters the filter's own option parser treats as syntax.
const OPTION_SPECIALS: &[char] = &['\\', '\'', ':'];

/// Escape a filter option value for both parsing levels of a graph.
///
/// ffmpeg unquotes the graph description once before handing each option
/// string to the filter, which then splits it on `:`. Option-level specials
/// are backslash-escaped first, and the result is single-quoted for the
/// graph level with embedded quotes written as `'\''`. Plain numbers and
/// arithmetic expressions pass through untouched.
pub fn filter_value(value: &str) -> Cow<'_, str> {
    if !value.is_empty() && !value.contains(FILTER_SPECIALS) {
        return Cow::Borrowed(value);
    }
    let mut option = String::with_capacity(value.len());
    for ch in value.chars() {
        if OPTION_SPECIALS.contains(&ch) {
            option.push('\\');
        }
        option.push(ch);
    }
    Cow::Owned(single_quote(&option))
}

/// Render one line of a concat-demuxer list file for `path`.
///
/// Paths containing line breaks cannot be represented in the line-based
/// list format and are rejected.
pub fn concat_entry(path: &Path) -> Result<String> {
    let path = path.to_string_lossy();
    if path.contains(['\n', '\r']) {
        return Err(Error::Validation(format!(
            "path cannot be written to a concat list: {path:?}"
        )));
    }
    Ok(format!("file {}", single_quote(&path)))
}

/// Quote a word for a POSIX shell, leaving safe words as they are.
pub fn shell_quote(word: &str) -> Cow<'_, str> {
    let safe = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_-./:=@%+,".contains(c));
    if safe {
        Cow::Borrowed(word)
    } else {
        Cow::Owned(single_quote(word))
    }
}

fn single_quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for ch in value.chars() {
        if ch == '\'' {
            quoted.push_str("'\\''");
        } else {
            quoted.push(ch);
        }
    }
    quoted.push('\'');
    quoted
}
