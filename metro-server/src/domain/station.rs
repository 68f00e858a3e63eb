//! Station and line identifier types, and the station-name grammar.
//!
//! Raw station names carry line membership inside the name itself:
//!
//! ```text
//! simple_name "_" line                                  single-line station
//! simple_name "_(interchange " line (" " line)* ")"     interchange station
//! ```
//!
//! [`canonicalize`] maps any raw name to the identifier shared by every
//! line-specific spelling of the same physical station, and [`parse_lines`]
//! extracts the set of lines serving it.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

/// Separator between the simple name and the line annotation.
const DELIMITER: char = '_';

/// Opening of the interchange annotation, directly after the delimiter.
const INTERCHANGE_OPEN: &str = "(interchange";

/// Error returned when a raw station name does not follow the naming grammar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// No `_` separating the simple name from the line annotation
    #[error("station name {0:?} has no line annotation")]
    MissingDelimiter(String),

    /// Nothing before the first `_`
    #[error("station name {0:?} has an empty simple name")]
    EmptyName(String),

    /// Trailing line token is empty
    #[error("station name {0:?} has an empty line id")]
    EmptyLine(String),

    /// Line token contains characters other than letters and digits
    #[error("invalid line id {line:?} in station name {name:?}")]
    InvalidLine { name: String, line: String },

    /// `_(interchange ...)` annotation is not well formed
    #[error("malformed interchange annotation in station name {0:?}")]
    MalformedInterchange(String),
}

/// Lowercase identifier shared by all representations of one physical station.
///
/// Only produced by [`canonicalize`], so two raw names that differ in case or
/// line annotation always yield equal ids.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CanonicalId(String);

impl CanonicalId {
    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CanonicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CanonicalId({})", self.0)
    }
}

impl fmt::Display for CanonicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A metro line identifier, e.g. `red` or `blue`.
///
/// Stored lowercase.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct LineId(String);

impl LineId {
    /// Create a line id, normalizing to lowercase.
    pub fn new(s: &str) -> Self {
        LineId(s.trim().to_lowercase())
    }

    /// Returns the line id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineId({})", self.0)
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Non-empty, ordered set of lines serving a station.
///
/// Ordering is alphabetical so that iteration (and therefore search order)
/// is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LineSet(BTreeSet<LineId>);

impl LineSet {
    /// Create a set holding a single line.
    pub fn single(line: LineId) -> Self {
        let mut set = BTreeSet::new();
        set.insert(line);
        LineSet(set)
    }

    /// Number of lines in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false: a `LineSet` can only be built with at least one line.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when more than one line serves the station.
    pub fn is_interchange(&self) -> bool {
        self.0.len() > 1
    }

    pub fn contains(&self, line: &LineId) -> bool {
        self.0.contains(line)
    }

    /// Iterate lines in alphabetical order.
    pub fn iter(&self) -> impl Iterator<Item = &LineId> {
        self.0.iter()
    }

    /// Lines present in both sets, in alphabetical order.
    pub fn common(&self, other: &LineSet) -> Vec<LineId> {
        self.0.intersection(&other.0).cloned().collect()
    }

    /// Add every line of `other` to this set.
    pub fn merge(&mut self, other: &LineSet) {
        self.0.extend(other.0.iter().cloned());
    }
}

/// Canonicalize a raw station name.
///
/// Takes the text before the first `_`, trims it, and lowercases it. Total:
/// every input produces an id, even one that fails [`parse_lines`].
///
/// # Examples
///
/// ```
/// use metro_server::domain::canonicalize;
///
/// let id = canonicalize("Rajiv Chowk_(interchange blue yellow)");
/// assert_eq!(id.as_str(), "rajiv chowk");
/// assert_eq!(canonicalize("RAJIV CHOWK_blue"), id);
/// ```
pub fn canonicalize(raw_name: &str) -> CanonicalId {
    let simple = raw_name.split(DELIMITER).next().unwrap_or_default();
    CanonicalId(simple.trim().to_lowercase())
}

/// Parse the set of lines encoded in a raw station name.
///
/// # Examples
///
/// ```
/// use metro_server::domain::{LineId, parse_lines};
///
/// let lines = parse_lines("Kashmere Gate_(interchange red yellow violet)").unwrap();
/// assert_eq!(lines.len(), 3);
/// assert!(lines.contains(&LineId::new("violet")));
///
/// let lines = parse_lines("Dilshad Garden_red").unwrap();
/// assert!(!lines.is_interchange());
///
/// assert!(parse_lines("Nowhere").is_err());
/// ```
pub fn parse_lines(raw_name: &str) -> Result<LineSet, ParseError> {
    let name = raw_name.trim();

    let (simple, annotation) = name
        .split_once(DELIMITER)
        .ok_or_else(|| ParseError::MissingDelimiter(name.to_string()))?;

    if simple.trim().is_empty() {
        return Err(ParseError::EmptyName(name.to_string()));
    }

    if let Some(list) = annotation.trim_start().strip_prefix(INTERCHANGE_OPEN) {
        return parse_interchange_list(name, list);
    }

    // Single-line form: the line is whatever follows the last delimiter.
    let line = name
        .rsplit(DELIMITER)
        .next()
        .map(str::trim)
        .unwrap_or_default();
    validate_line(name, line).map(LineSet::single)
}

/// Parse the remainder of `_(interchange` up to and including `)`.
fn parse_interchange_list(name: &str, list: &str) -> Result<LineSet, ParseError> {
    let malformed = || ParseError::MalformedInterchange(name.to_string());

    // The keyword must be followed by whitespace before the first line.
    if !list.starts_with(char::is_whitespace) {
        return Err(malformed());
    }

    let inner = list.trim_end().strip_suffix(')').ok_or_else(malformed)?;

    let mut lines = BTreeSet::new();
    for token in inner.split_whitespace() {
        lines.insert(validate_line(name, token)?);
    }

    if lines.is_empty() {
        return Err(malformed());
    }

    Ok(LineSet(lines))
}

fn validate_line(name: &str, token: &str) -> Result<LineId, ParseError> {
    if token.is_empty() {
        return Err(ParseError::EmptyLine(name.to_string()));
    }
    if !token.chars().all(char::is_alphanumeric) {
        return Err(ParseError::InvalidLine {
            name: name.to_string(),
            line: token.to_string(),
        });
    }
    Ok(LineId::new(token))
}
