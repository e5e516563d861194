//! Parsing of algorithm identifier strings such as `aes-256-gcm`,
//! `AES_256_GCM` or `EVP_aes_128_cbc()` into cipher, key size and mode.

use crate::utils::{extract_last_segment, unquote_string};

const MODES: &[&str] = &[
    "ECB", "CBC", "CFB", "CFB1", "CFB8", "OFB", "CTR", "GCM", "CCM", "OCB", "XTS", "SIV",
    "WRAP", "POLY1305",
];

/// Ciphers whose key size is fixed by name.
const FIXED_KEY_BYTES: &[(&str, u64)] = &[("CHACHA20", 32), ("XCHACHA20", 32), ("SM4", 16)];

/// Ciphers whose key size is spelled as a bit count next to the name.
const SIZED_CIPHERS: &[&str] = &["AES", "ARIA", "CAMELLIA"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CipherSpec {
    pub cipher: Option<String>,
    /// Key length in bytes
    pub key_length: Option<u64>,
    pub mode: Option<String>,
}

pub fn parse_cipher_spec(identifier: &str) -> CipherSpec {
    let unquoted = unquote_string(identifier);
    let bare = extract_last_segment(unquoted.trim().trim_end_matches("()"))
        .trim_start_matches(['&', '*'])
        .to_uppercase();
    let bare = bare.strip_prefix("EVP_").unwrap_or(&bare);

    let mut tokens: Vec<String> = bare
        .split(['-', '_', '/'])
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    if tokens.is_empty() {
        return CipherSpec::default();
    }

    // `AES256` style: split a fused bit count off the cipher name
    let head = tokens.remove(0);
    let (cipher, fused_bits) = split_fused_bits(&head);
    if let Some(bits) = fused_bits {
        tokens.insert(0, bits);
    }

    let mut spec = CipherSpec {
        cipher: Some(cipher.clone()),
        ..CipherSpec::default()
    };

    if let Some((_, bytes)) = FIXED_KEY_BYTES.iter().find(|(name, _)| *name == cipher) {
        spec.key_length = Some(*bytes);
    } else if SIZED_CIPHERS.contains(&cipher.as_str()) {
        spec.key_length = tokens
            .iter()
            .find_map(|t| t.parse::<u64>().ok())
            .filter(|bits| bits % 8 == 0)
            .map(|bits| bits / 8);
    }

    spec.mode = tokens
        .iter()
        .find(|t| MODES.contains(&t.as_str()))
        .cloned();
    spec
}

fn split_fused_bits(token: &str) -> (String, Option<String>) {
    let digits_at = token
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i);

    match digits_at {
        Some(i) if i > 0 => {
            let (name, bits) = token.split_at(i);
            if SIZED_CIPHERS.contains(&name) {
                (name.to_string(), Some(bits.to_string()))
            } else {
                (token.to_string(), None)
            }
        }
        _ => (token.to_string(), None),
    }
}
