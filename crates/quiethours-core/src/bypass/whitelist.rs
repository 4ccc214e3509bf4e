//! Per-number bypass whitelist.
//!
//! An ordered collection of numbers with explicit call/message bypass
//! flags, consulted before any general policy. Persisted as a flat string
//! (`number##flag##flag||...`) for compatibility with the legacy settings
//! layout; in memory it is structured entries, never string surgery.

use serde::{Deserialize, Serialize};

use crate::error::WhitelistError;

/// Separates fields within one entry.
pub const FIELD_DELIMITER: &str = "##";
/// Separates entries from each other.
pub const ENTRY_DELIMITER: &str = "||";

/// One whitelisted number. Identity is the number alone; the flags are
/// payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhitelistEntry {
    pub number: String,
    pub bypass_calls: bool,
    pub bypass_messages: bool,
}

impl WhitelistEntry {
    /// Build a validated entry.
    ///
    /// # Errors
    ///
    /// Rejects empty numbers and numbers containing a serialization
    /// delimiter, so a bad number can never corrupt the flat string.
    pub fn new(
        number: impl Into<String>,
        bypass_calls: bool,
        bypass_messages: bool,
    ) -> Result<Self, WhitelistError> {
        let number = number.into();
        if number.is_empty() {
            return Err(WhitelistError::EmptyNumber);
        }
        for delimiter in [FIELD_DELIMITER, ENTRY_DELIMITER] {
            if number.contains(delimiter) {
                return Err(WhitelistError::ReservedDelimiter {
                    number,
                    delimiter: delimiter.into(),
                });
            }
        }
        Ok(Self {
            number,
            bypass_calls,
            bypass_messages,
        })
    }
}

/// Ordered set of whitelist entries, keyed by number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallWhitelist {
    entries: Vec<WhitelistEntry>,
}

impl CallWhitelist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[WhitelistEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn find(&self, number: &str) -> Option<&WhitelistEntry> {
        self.entries.iter().find(|e| e.number == number)
    }

    /// Insert `entry`, replacing an existing entry with the same number
    /// in place (insertion order of the original is kept).
    pub fn add(&mut self, entry: WhitelistEntry) {
        match self.entries.iter_mut().find(|e| e.number == entry.number) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    /// Remove by number. Returns whether an entry was removed.
    pub fn remove(&mut self, number: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.number != number);
        self.entries.len() != before
    }

    /// Parse the flat storage string. Malformed records are dropped
    /// rather than failing the whole list; missing flags default to off.
    pub fn parse(flat: &str) -> Self {
        let mut list = Self::new();
        for record in flat.split(ENTRY_DELIMITER) {
            if record.is_empty() {
                continue;
            }
            let mut fields = record.split(FIELD_DELIMITER);
            let number = match fields.next() {
                Some(n) if !n.is_empty() => n,
                _ => continue,
            };
            let bypass_calls = fields.next().map(parse_flag).unwrap_or(false);
            let bypass_messages = fields.next().map(parse_flag).unwrap_or(false);
            list.add(WhitelistEntry {
                number: number.to_string(),
                bypass_calls,
                bypass_messages,
            });
        }
        list
    }

    /// Serialize to the flat storage string.
    pub fn serialize(&self) -> String {
        self.entries
            .iter()
            .map(|e| {
                format!(
                    "{}{FIELD_DELIMITER}{}{FIELD_DELIMITER}{}",
                    e.number, e.bypass_calls, e.bypass_messages
                )
            })
            .collect::<Vec<_>>()
            .join(ENTRY_DELIMITER)
    }
}

fn parse_flag(field: &str) -> bool {
    matches!(field, "true" | "1")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn entry(number: &str, calls: bool, messages: bool) -> WhitelistEntry {
        WhitelistEntry::new(number, calls, messages).unwrap()
    }

    #[test]
    fn add_upserts_by_number() {
        let mut list = CallWhitelist::new();
        list.add(entry("0712345678", true, false));
        list.add(entry("0798765432", false, true));
        list.add(entry("0712345678", false, false));

        assert_eq!(list.len(), 2);
        // Position preserved, flags replaced.
        assert_eq!(list.entries()[0].number, "0712345678");
        assert!(!list.entries()[0].bypass_calls);
    }

    #[test]
    fn remove_by_number() {
        let mut list = CallWhitelist::new();
        list.add(entry("0712345678", true, true));
        assert!(list.remove("0712345678"));
        assert!(!list.remove("0712345678"));
        assert!(list.is_empty());
    }

    #[test]
    fn rejects_delimiter_bearing_number() {
        assert_eq!(
            WhitelistEntry::new("07##12", true, false),
            Err(WhitelistError::ReservedDelimiter {
                number: "07##12".into(),
                delimiter: "##".into(),
            })
        );
        assert!(WhitelistEntry::new("07||12", true, false).is_err());
        assert_eq!(
            WhitelistEntry::new("", true, false),
            Err(WhitelistError::EmptyNumber)
        );
    }

    #[test]
    fn parse_known_format() {
        let list = CallWhitelist::parse("0712345678##true##false||0798765432##false##true");
        assert_eq!(list.len(), 2);
        assert!(list.find("0712345678").unwrap().bypass_calls);
        assert!(!list.find("0712345678").unwrap().bypass_messages);
        assert!(list.find("0798765432").unwrap().bypass_messages);
    }

    #[test]
    fn parse_accepts_numeric_flags() {
        let list = CallWhitelist::parse("0712345678##1##0");
        assert!(list.find("0712345678").unwrap().bypass_calls);
        assert!(!list.find("0712345678").unwrap().bypass_messages);
    }

    #[test]
    fn parse_drops_malformed_records() {
        let list = CallWhitelist::parse("||##true##true||0712345678##true##true||garbage");
        assert_eq!(list.len(), 2);
        assert!(list.find("0712345678").is_some());
        // A bare number parses with both flags off.
        let garbage = list.find("garbage").unwrap();
        assert!(!garbage.bypass_calls && !garbage.bypass_messages);
    }

    #[test]
    fn empty_list_serializes_to_empty_string() {
        assert_eq!(CallWhitelist::new().serialize(), "");
        assert!(CallWhitelist::parse("").is_empty());
    }

    proptest! {
        #[test]
        fn serialize_parse_roundtrip(
            numbers in proptest::collection::vec("[0-9]{4,12}", 0..50),
            flags in proptest::collection::vec((any::<bool>(), any::<bool>()), 50),
        ) {
            let mut list = CallWhitelist::new();
            for (number, (calls, messages)) in numbers.iter().zip(flags.iter()) {
                list.add(entry(number, *calls, *messages));
            }
            let reparsed = CallWhitelist::parse(&list.serialize());
            prop_assert_eq!(reparsed, list);
        }
    }
}
