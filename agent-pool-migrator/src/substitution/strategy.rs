//! Replacement strategies.

use crate::config::PoolMapping;
use serde::Deserialize;
use std::ops::Range;

/// Replaces a pool name inside one file's content.
pub trait Substitution: Send + Sync {
    /// Returns the rewritten content, or [`None`] if nothing matched.
    fn apply(&self, content: &str, mapping: &PoolMapping) -> Option<String>;
}

/// Selects the [`Substitution`] strategy used for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubstitutionMode {
    /// Plain substring replacement.
    #[default]
    Literal,

    /// Replace only YAML scalar values equal to the pool name.
    Scalar,
}

impl SubstitutionMode {
    /// Returns the strategy implementing this mode.
    #[must_use]
    pub fn strategy(self) -> Box<dyn Substitution> {
        match self {
            Self::Literal => Box::new(LiteralSubstitution),
            Self::Scalar => Box::new(ScalarSubstitution),
        }
    }
}

/// Replaces every occurrence of the old pool name, wherever it appears.
///
/// A pool name that is a substring of an unrelated token (`pool1` inside
/// `pool10`) is replaced too.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralSubstitution;

impl Substitution for LiteralSubstitution {
    fn apply(&self, content: &str, mapping: &PoolMapping) -> Option<String> {
        content
            .contains(&mapping.old_name)
            .then(|| content.replace(&mapping.old_name, &mapping.new_name))
    }
}

/// Replaces scalar values that equal the old pool name exactly.
///
/// A value is the text after a `key:` or a `- ` list marker, with optional
/// quotes and trailing comment removed. Everything outside the replaced value
/// is kept byte for byte.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScalarSubstitution;

impl Substitution for ScalarSubstitution {
    fn apply(&self, content: &str, mapping: &PoolMapping) -> Option<String> {
        if !content.contains(&mapping.old_name) {
            return None;
        }

        let mut output = String::with_capacity(content.len());
        let mut changed = false;

        for line in content.split_inclusive('\n') {
            match scalar_span(line) {
                Some(span) if line[span.clone()] == mapping.old_name => {
                    output.push_str(&line[..span.start]);
                    output.push_str(&mapping.new_name);
                    output.push_str(&line[span.end..]);
                    changed = true;
                }
                _ => output.push_str(line),
            }
        }

        changed.then_some(output)
    }
}

/// Byte range of the scalar value on a YAML line, without quotes.
fn scalar_span(line: &str) -> Option<Range<usize>> {
    let body = line.trim_end_matches(['\n', '\r']);
    let mut start = body.len() - body.trim_start().len();

    let rest = &body[start..];
    if rest.starts_with('#') {
        return None;
    }
    if let Some(after) = rest.strip_prefix("- ") {
        start += 2 + (after.len() - after.trim_start().len());
    }

    if let Some(separator) = key_separator(&body[start..]) {
        start += separator + 1;
        let after = &body[start..];
        start += after.len() - after.trim_start().len();
    }

    let mut end = body[start..]
        .find(" #")
        .map_or(body.len(), |comment| start + comment);
    end = start + body[start..end].trim_end().len();

    let value = &body[start..end];
    let quoted = value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')));
    if quoted {
        start += 1;
        end -= 1;
    }

    (start < end).then_some(start..end)
}

/// Position of the `:` ending a mapping key, if the text starts with one.
fn key_separator(text: &str) -> Option<usize> {
    if text.starts_with(['"', '\'']) {
        return None;
    }
    text.find(": ")
        .or_else(|| text.strip_suffix(':').map(str::len))
}
