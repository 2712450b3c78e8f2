//! POLYKV - Core Type Definitions
//! Keys, typed entries and timestamps shared by every database.

use std::borrow::Borrow;
use std::collections::{BTreeSet, HashSet};
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

/// Microseconds since the Unix epoch.
pub type Timestamp = u64;

/// Current wall-clock time as a [`Timestamp`].
pub fn now_micros() -> Timestamp {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_micros() as u64
}

/// Declared data type of a key.
///
/// Metadata only: it never takes part in key identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataType {
    #[default]
    Unspecified,
    String,
    List,
    Set,
    SortedSet,
}

/// Address of an entry within one database.
///
/// Equality and hashing use the key text only (ordinal, case-sensitive),
/// so two keys with the same text and different [`DataType`] share a slot.
#[derive(Debug, Clone)]
pub struct Key {
    text: String,
    data_type: DataType,
}

impl Key {
    /// Create a key with an unspecified data type.
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_type(text, DataType::Unspecified)
    }

    /// Create a key with a declared data type.
    pub fn with_type(text: impl Into<String>, data_type: DataType) -> Self {
        Self {
            text: text.into(),
            data_type,
        }
    }

    /// The lookup text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The declared data type.
    pub fn data_type(&self) -> DataType {
        self.data_type
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for Key {}

impl Hash for Key {
    // Must hash exactly like `str` for the `Borrow<str>` impl to be sound.
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.as_str().hash(state);
    }
}

impl Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.text
    }
}

/// Typed payload of an entry. The variant is fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValue {
    String(String),
    List(Vec<String>),
    Set(HashSet<String>),
    SortedSet(BTreeSet<String>),
}

impl EntryValue {
    /// The data type tag matching this variant.
    pub fn data_type(&self) -> DataType {
        match self {
            EntryValue::String(_) => DataType::String,
            EntryValue::List(_) => DataType::List,
            EntryValue::Set(_) => DataType::Set,
            EntryValue::SortedSet(_) => DataType::SortedSet,
        }
    }
}

/// A timestamped, typed value stored under a key.
///
/// Accessors are total: asking for a type the entry does not hold returns
/// the empty value for that type instead of failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    value: EntryValue,
    created_on: Timestamp,
    modified_on: Timestamp,
}

static EMPTY_LIST: &[String] = &[];
static EMPTY_SORTED_SET: BTreeSet<String> = BTreeSet::new();

fn empty_set() -> &'static HashSet<String> {
    static EMPTY: OnceLock<HashSet<String>> = OnceLock::new();
    EMPTY.get_or_init(HashSet::new)
}

impl Entry {
    /// Create an entry, stamping `created_on` and `modified_on` with the current time.
    pub fn new(value: EntryValue) -> Self {
        let now = now_micros();
        Self {
            value,
            created_on: now,
            modified_on: now,
        }
    }

    /// Create a string entry.
    pub fn string(value: impl Into<String>) -> Self {
        Self::new(EntryValue::String(value.into()))
    }

    /// Create a list entry, keeping the given order.
    pub fn list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(EntryValue::List(values.into_iter().map(Into::into).collect()))
    }

    /// Create an unordered set entry.
    pub fn set<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(EntryValue::Set(values.into_iter().map(Into::into).collect()))
    }

    /// Create a sorted set entry.
    pub fn sorted_set<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(EntryValue::SortedSet(
            values.into_iter().map(Into::into).collect(),
        ))
    }

    /// The typed payload.
    pub fn value(&self) -> &EntryValue {
        &self.value
    }

    /// The data type of the stored payload.
    pub fn data_type(&self) -> DataType {
        self.value.data_type()
    }

    /// When the entry was first stored.
    pub fn created_on(&self) -> Timestamp {
        self.created_on
    }

    /// When the entry was last written.
    pub fn modified_on(&self) -> Timestamp {
        self.modified_on
    }

    /// String payload, or `""` for any other variant.
    pub fn get_string(&self) -> &str {
        match &self.value {
            EntryValue::String(s) => s,
            _ => "",
        }
    }

    /// List payload, or an empty slice for any other variant.
    pub fn get_list(&self) -> &[String] {
        match &self.value {
            EntryValue::List(items) => items,
            _ => EMPTY_LIST,
        }
    }

    /// Set payload, or an empty set for any other variant.
    pub fn get_set(&self) -> &HashSet<String> {
        match &self.value {
            EntryValue::Set(items) => items,
            _ => empty_set(),
        }
    }

    /// Sorted set payload, or an empty set for any other variant.
    pub fn get_sorted_set(&self) -> &BTreeSet<String> {
        match &self.value {
            EntryValue::SortedSet(items) => items,
            _ => &EMPTY_SORTED_SET,
        }
    }

    pub(crate) fn set_created_on(&mut self, created_on: Timestamp) {
        self.created_on = created_on;
    }

    pub(crate) fn touch(&mut self) {
        // Never move backwards past the creation stamp, even if the clock does.
        self.modified_on = now_micros().max(self.created_on);
    }
}
