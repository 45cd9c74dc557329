//! Restricted character string kinds used in X.509 names.

use super::tags;
use reqkit_types::DerError;

/// The ASN.1 string types a directory attribute value may be encoded as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringKind {
    Utf8,
    Printable,
    Ia5,
}

impl StringKind {
    pub fn tag(&self) -> u8 {
        match self {
            StringKind::Utf8 => tags::UTF8_STRING,
            StringKind::Printable => tags::PRINTABLE_STRING,
            StringKind::Ia5 => tags::IA5_STRING,
        }
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            tags::UTF8_STRING => Some(StringKind::Utf8),
            tags::PRINTABLE_STRING => Some(StringKind::Printable),
            tags::IA5_STRING => Some(StringKind::Ia5),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StringKind::Utf8 => "UTF8String",
            StringKind::Printable => "PrintableString",
            StringKind::Ia5 => "IA5String",
        }
    }

    /// Whether every character of `value` is in this kind's repertoire.
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            StringKind::Utf8 => true,
            StringKind::Printable => value.chars().all(is_printable_char),
            StringKind::Ia5 => value.is_ascii(),
        }
    }

    pub fn validate(&self, value: &str) -> Result<(), DerError> {
        if self.accepts(value) {
            Ok(())
        } else {
            Err(DerError::InvalidStringEncoding { kind: self.name() })
        }
    }

    /// Decode raw content octets of this kind.
    pub fn decode(&self, content: &[u8]) -> Result<String, DerError> {
        let invalid = DerError::InvalidStringEncoding { kind: self.name() };
        let value = std::str::from_utf8(content).map_err(|_| invalid.clone())?;
        if !self.accepts(value) {
            return Err(invalid);
        }
        Ok(value.to_string())
    }
}

/// X.680 PrintableString repertoire.
fn is_printable_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, ' ' | '\'' | '(' | ')' | '+' | ',' | '-' | '.' | '/' | ':' | '=' | '?')
}
