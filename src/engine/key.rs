//! Owner name ⇄ storage key.
//!
//! A storage key is the lowercase hex form of the owner's UTF-8 bytes. It is
//! safe as a file name on any file system: no separators, no reserved
//! characters, no case folding surprises. Uppercase digits are rejected on
//! decode so that every name has exactly one key.

use std::{fmt, path::Path, str::FromStr};

use buddyvault_error::KeyError;

/// File-system-safe key derived from an owner name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StorageKey(String);

impl StorageKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Recovers the owner name.
    pub fn decode(&self) -> Result<String, KeyError> {
        decode_key(&self.0)
    }
}

impl fmt::Display for StorageKey {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for StorageKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_key(s)?;
        Ok(Self(s.to_string()))
    }
}

impl AsRef<Path> for StorageKey {
    fn as_ref(&self) -> &Path {
        Path::new(&self.0)
    }
}

/// Encodes an owner name.
///
/// ```
/// use buddyvault::engine::key::encode_key;
///
/// assert_eq!(encode_key("Al!ce").as_str(), "416c216365");
/// ```
pub fn encode_key(name: &str) -> StorageKey {
    StorageKey(hex::encode(name.as_bytes()))
}

/// Encodes a raw name that has not been checked for UTF-8 yet.
pub fn encode_key_bytes(name: &[u8]) -> Result<StorageKey, KeyError> {
    let name = std::str::from_utf8(name).map_err(|e| KeyError::NotUtf8 {
        reason: e.to_string(),
    })?;
    Ok(encode_key(name))
}

/// Decodes a storage key back to the owner name.
pub fn decode_key(key: &str) -> Result<String, KeyError> {
    let malformed = |reason: String| KeyError::MalformedKey {
        key: key.to_string(),
        reason,
    };

    if key.len() % 2 != 0 {
        return Err(malformed(format!("odd length {}", key.len())));
    }
    if let Some((pos, c)) = key
        .char_indices()
        .find(|&(_, c)| !matches!(c, '0'..='9' | 'a'..='f'))
    {
        return Err(malformed(format!("invalid character {c:?} at {pos}")));
    }

    let bytes = hex::decode(key).map_err(|e| malformed(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| KeyError::NotUtf8 {
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_known_values() {
        assert_eq!(encode_key("bob").as_str(), "626f62");
        assert_eq!(encode_key("a/b").as_str(), "612f62");
        assert_eq!(encode_key("é").as_str(), "c3a9");
        assert_eq!(encode_key("\0").as_str(), "00");
        assert!(encode_key("").is_empty());
    }

    #[test]
    fn test_reversible() {
        for name in ["Al!ce", "C:\\dir\\*?", "日本語", "tab\there", ""] {
            assert_eq!(decode_key(encode_key(name).as_str()).unwrap(), name);
        }
    }

    #[test]
    fn test_rejects_uppercase() {
        assert!(matches!(
            decode_key("4A"),
            Err(KeyError::MalformedKey { .. })
        ));
        assert!("4A".parse::<StorageKey>().is_err());
        assert_eq!("4a".parse::<StorageKey>().unwrap().decode().unwrap(), "J");
    }

    #[test]
    fn test_rejects_odd_length_and_foreign_chars() {
        assert!(decode_key("616").is_err());
        assert!(decode_key("61zz").is_err());
        assert!(decode_key("61.tmp").is_err());
    }

    #[test]
    fn test_rejects_non_utf8_payload() {
        assert!(matches!(decode_key("ff"), Err(KeyError::NotUtf8 { .. })));
        assert!(matches!(
            encode_key_bytes(&[0xC3, 0x28]),
            Err(KeyError::NotUtf8 { .. })
        ));
        assert_eq!(encode_key_bytes(b"ok").unwrap().as_str(), "6f6b");
    }
}
