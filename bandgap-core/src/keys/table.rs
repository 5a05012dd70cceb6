//! Key table definitions

/// Escape byte, also the lead-in of ANSI cursor key sequences
pub const ESC: u8 = 0x1B;

/// Longest byte sequence a binding may use
pub const MAX_SEQUENCE_LEN: usize = 3;

/// Logical keys understood by the calibration console
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Key {
    /// Restore the persisted reference
    Load,
    /// Persist the current reference
    Save,
    /// Toggle between menu and live display
    Space,
    /// Raise the reference
    Up,
    /// Lower the reference
    Down,
    /// Lone Escape press
    Escape,
    /// Quit letter
    Quit,
}

/// One byte sequence and the logical key it decodes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    pub bytes: &'static [u8],
    pub key: Key,
}

impl KeyBinding {
    pub const fn new(bytes: &'static [u8], key: Key) -> Self {
        Self { bytes, key }
    }
}

/// Bindings of the default console, in match order
const DEFAULT_BINDINGS: &[KeyBinding] = &[
    KeyBinding::new(b"1", Key::Load),
    KeyBinding::new(b"2", Key::Save),
    KeyBinding::new(b" ", Key::Space),
    KeyBinding::new(&[ESC, b'[', b'A'], Key::Up),
    KeyBinding::new(&[ESC, b'[', b'B'], Key::Down),
    KeyBinding::new(&[ESC], Key::Escape),
    KeyBinding::new(b"q", Key::Quit),
    KeyBinding::new(b"j", Key::Down),
    KeyBinding::new(b"k", Key::Up),
];

/// Problems that make a key table undecodable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyTableError {
    /// Binding at this index has no bytes
    EmptySequence(usize),
    /// Binding at this index exceeds [`MAX_SEQUENCE_LEN`]
    SequenceTooLong(usize),
    /// Bindings at these indices share every byte
    DuplicateSequence(usize, usize),
}

/// Result of matching a received prefix against the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Match {
    /// Key whose sequence equals the received bytes exactly
    pub full: Option<Key>,
    /// Number of longer sequences the received bytes are a prefix of
    pub partial: usize,
}

/// Ordered set of key bindings
///
/// A sequence may be a strict prefix of another (`ESC` and `ESC [ A`); the
/// decoder resolves those by waiting. Two identical sequences can never be
/// told apart and are rejected by [`KeyTable::new`].
#[derive(Debug, Clone, Copy)]
pub struct KeyTable<'a> {
    bindings: &'a [KeyBinding],
    max_len: usize,
}

impl KeyTable<'static> {
    /// Space, `1`/`2` load/save, arrow keys or `k`/`j`, Escape or `q`
    pub const DEFAULT: KeyTable<'static> = KeyTable {
        bindings: DEFAULT_BINDINGS,
        max_len: MAX_SEQUENCE_LEN,
    };
}

impl Default for KeyTable<'static> {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl<'a> KeyTable<'a> {
    /// Build a table after checking that every binding is decodable
    pub fn new(bindings: &'a [KeyBinding]) -> Result<Self, KeyTableError> {
        let mut max_len = 0;

        for (i, binding) in bindings.iter().enumerate() {
            match binding.bytes.len() {
                0 => return Err(KeyTableError::EmptySequence(i)),
                n if n > MAX_SEQUENCE_LEN => return Err(KeyTableError::SequenceTooLong(i)),
                n => max_len = max_len.max(n),
            }

            if let Some(j) = bindings[..i].iter().position(|b| b.bytes == binding.bytes) {
                return Err(KeyTableError::DuplicateSequence(j, i));
            }
        }

        Ok(Self { bindings, max_len })
    }

    pub fn bindings(&self) -> &'a [KeyBinding] {
        self.bindings
    }

    /// Length of the longest sequence in the table
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Match bytes received so far (from the start of a key press)
    pub fn classify(&self, received: &[u8]) -> Match {
        let mut result = Match::default();

        for binding in self.bindings {
            if binding.bytes == received {
                result.full = Some(binding.key);
            } else if binding.bytes.len() > received.len() && binding.bytes.starts_with(received) {
                result.partial += 1;
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_is_valid() {
        let table = KeyTable::new(DEFAULT_BINDINGS).unwrap();
        assert_eq!(table.max_len(), KeyTable::DEFAULT.max_len());
        assert_eq!(table.bindings().len(), 9);
    }

    #[test]
    fn test_escape_is_prefix_of_arrows() {
        let m = KeyTable::DEFAULT.classify(&[ESC]);
        assert_eq!(m.full, Some(Key::Escape));
        assert_eq!(m.partial, 2);

        let m = KeyTable::DEFAULT.classify(&[ESC, b'[']);
        assert_eq!(m.full, None);
        assert_eq!(m.partial, 2);

        let m = KeyTable::DEFAULT.classify(&[ESC, b'[', b'B']);
        assert_eq!(m.full, Some(Key::Down));
        assert_eq!(m.partial, 0);
    }

    #[test]
    fn test_unknown_bytes_match_nothing() {
        assert_eq!(KeyTable::DEFAULT.classify(b"x"), Match::default());
        assert_eq!(KeyTable::DEFAULT.classify(&[ESC, b'O']), Match::default());
    }

    #[test]
    fn test_aliases_share_a_key() {
        assert_eq!(KeyTable::DEFAULT.classify(b"k").full, Some(Key::Up));
        assert_eq!(KeyTable::DEFAULT.classify(b"j").full, Some(Key::Down));
    }

    #[test]
    fn test_rejects_duplicate_sequences() {
        const BINDINGS: &[KeyBinding] = &[
            KeyBinding::new(b"a", Key::Up),
            KeyBinding::new(b"b", Key::Down),
            KeyBinding::new(b"a", Key::Quit),
        ];
        assert_eq!(
            KeyTable::new(BINDINGS).unwrap_err(),
            KeyTableError::DuplicateSequence(0, 2)
        );
    }

    #[test]
    fn test_rejects_empty_and_long_sequences() {
        const EMPTY: &[KeyBinding] = &[KeyBinding::new(b"", Key::Up)];
        assert_eq!(
            KeyTable::new(EMPTY).unwrap_err(),
            KeyTableError::EmptySequence(0)
        );

        const LONG: &[KeyBinding] = &[
            KeyBinding::new(b"a", Key::Up),
            KeyBinding::new(&[ESC, b'[', b'1', b'~'], Key::Down),
        ];
        assert_eq!(
            KeyTable::new(LONG).unwrap_err(),
            KeyTableError::SequenceTooLong(1)
        );
    }

    #[test]
    fn test_prefix_bindings_are_allowed() {
        const BINDINGS: &[KeyBinding] = &[
            KeyBinding::new(&[ESC], Key::Escape),
            KeyBinding::new(&[ESC, b'[', b'A'], Key::Up),
        ];
        let table = KeyTable::new(BINDINGS).unwrap();
        assert_eq!(table.max_len(), 3);
    }
}
