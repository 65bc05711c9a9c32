use nanoid::nanoid;

/// Alphabet for record identifiers (no ambiguous glyphs, no key separators).
const RECORD_ID_ALPHABET: &[char] = &[
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'J', 'K', 'L', 'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y',
    'Z', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'j', 'm', 'n', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];
const RECORD_ID_LENGTH: usize = 20;

/// Generates a new identifier for a user, post, comment or notification.
pub fn generate_record_id() -> String {
    nanoid!(RECORD_ID_LENGTH, RECORD_ID_ALPHABET)
}

/// Returns `true` when `value` could have been produced by [`generate_record_id`].
///
/// Ids are spliced into Redis keys, so anything else is rejected before a key is built.
pub fn is_record_id(value: &str) -> bool {
    value.chars().count() == RECORD_ID_LENGTH && value.chars().all(|c| RECORD_ID_ALPHABET.contains(&c))
}
