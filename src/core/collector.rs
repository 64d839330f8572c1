//! # Comment Collector
//!
//! The ordered list of free-text comments the user is writing, plus the rules
//! for editing and submitting them. No UI types here; the TUI mirrors this
//! list into its editors.
//!
//! ```text
//! comments: ["", ...]      1..=MAX_COMMENTS entries, never empty
//! loading:  bool           read-only while a submission is in flight
//! ```

use std::fmt;

/// Upper bound on the number of comment entries.
pub const MAX_COMMENTS: usize = 10;
/// Minimum length (in characters, untrimmed) of each submitted comment.
pub const MIN_COMMENT_CHARS: usize = 10;

/// Why a collector operation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectorError {
    /// `add` on a full list.
    Capacity,
    /// `remove` on a single-entry list.
    LastEntry,
    /// Index past the end of the list.
    OutOfRange,
    /// Submit with nothing but blank entries.
    NoComments,
    /// Submit with an entry under `MIN_COMMENT_CHARS`.
    TooShort,
    /// Mutation attempted while a submission is in flight.
    Busy,
}

impl CollectorError {
    /// Whether the user should be told about this refusal. Removing the last
    /// entry or hitting a stale index is simply ignored.
    pub fn is_user_facing(self) -> bool {
        matches!(
            self,
            CollectorError::Capacity | CollectorError::NoComments | CollectorError::TooShort
        )
    }
}

impl fmt::Display for CollectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectorError::Capacity => write!(f, "Maximum {MAX_COMMENTS} comments allowed"),
            CollectorError::LastEntry => write!(f, "At least one comment is required"),
            CollectorError::OutOfRange => write!(f, "No such comment"),
            CollectorError::NoComments => write!(f, "Please enter at least one comment"),
            CollectorError::TooShort => write!(
                f,
                "Each comment should be at least {MIN_COMMENT_CHARS} characters"
            ),
            CollectorError::Busy => write!(f, "Analysis in progress"),
        }
    }
}

impl std::error::Error for CollectorError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collector {
    comments: Vec<String>,
    loading: bool,
}

impl Default for Collector {
    fn default() -> Self {
        Self::new()
    }
}

impl Collector {
    /// Starts with a single empty entry.
    pub fn new() -> Self {
        Self {
            comments: vec![String::new()],
            loading: false,
        }
    }

    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_full(&self) -> bool {
        self.comments.len() >= MAX_COMMENTS
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    fn ensure_editable(&self) -> Result<(), CollectorError> {
        if self.loading {
            Err(CollectorError::Busy)
        } else {
            Ok(())
        }
    }

    /// Appends one empty entry.
    pub fn add(&mut self) -> Result<(), CollectorError> {
        self.ensure_editable()?;
        if self.is_full() {
            return Err(CollectorError::Capacity);
        }
        self.comments.push(String::new());
        Ok(())
    }

    /// Deletes the entry at `index`. The list never becomes empty.
    pub fn remove(&mut self, index: usize) -> Result<(), CollectorError> {
        self.ensure_editable()?;
        if self.comments.len() <= 1 {
            return Err(CollectorError::LastEntry);
        }
        if index >= self.comments.len() {
            return Err(CollectorError::OutOfRange);
        }
        self.comments.remove(index);
        Ok(())
    }

    /// Replaces the text at `index`.
    pub fn update(&mut self, index: usize, text: String) -> Result<(), CollectorError> {
        self.ensure_editable()?;
        let slot = self
            .comments
            .get_mut(index)
            .ok_or(CollectorError::OutOfRange)?;
        *slot = text;
        Ok(())
    }

    /// Validates and returns the non-blank entries in order, entering the
    /// loading state. On error nothing changes.
    pub fn submit(&mut self) -> Result<Vec<String>, CollectorError> {
        self.ensure_editable()?;
        let valid = validate(&self.comments)?;
        self.loading = true;
        Ok(valid)
    }

    /// Called by the controller once the submission settles either way.
    pub fn finish_loading(&mut self) {
        self.loading = false;
    }
}

/// Filters to entries with non-blank text and checks each one's length.
///
/// The length check runs on the untrimmed text, so surrounding whitespace
/// counts toward the minimum.
pub fn validate(comments: &[String]) -> Result<Vec<String>, CollectorError> {
    let valid: Vec<String> = comments
        .iter()
        .filter(|c| !c.trim().is_empty())
        .cloned()
        .collect();

    if valid.is_empty() {
        return Err(CollectorError::NoComments);
    }
    if valid.iter().any(|c| c.chars().count() < MIN_COMMENT_CHARS) {
        return Err(CollectorError::TooShort);
    }
    Ok(valid)
}
