//! Length-limited text input.
//!
//! Every edit is clamped to the first `limit` characters before it reaches
//! the owner, so the owner never holds an over-long draft. A disabled input
//! forwards nothing.

/// Clamps edits to a character limit and reports a `current/limit` counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundedInput {
    limit: usize,
    disabled: bool,
}

impl BoundedInput {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            disabled: false,
        }
    }

    /// The same input with the disabled flag set to `disabled`.
    pub fn with_disabled(self, disabled: bool) -> Self {
        Self { disabled, ..self }
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// The first `limit` characters of `raw`. Never splits a code point.
    pub fn clamp<'a>(&self, raw: &'a str) -> &'a str {
        match raw.char_indices().nth(self.limit) {
            Some((end, _)) => &raw[..end],
            None => raw,
        }
    }

    /// Clamp `raw` and hand the result to the owner.
    ///
    /// Returns `false` without calling `notify` while disabled.
    pub fn on_change(&self, raw: &str, notify: impl FnOnce(String)) -> bool {
        if self.disabled {
            return false;
        }
        notify(self.clamp(raw).to_string());
        true
    }

    /// Live counter shown under the input, e.g. `12/220`.
    pub fn counter(&self, value: &str) -> String {
        format!("{}/{}", value.chars().count(), self.limit)
    }
}
