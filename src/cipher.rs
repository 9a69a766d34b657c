use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// How a key value combines with a cipher symbol.
///
/// Closed set: every call site dispatches with a `match`, so adding a
/// variant is a compile error everywhere it matters.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Add,
    Sub,
    Xor,
}

impl Operation {
    /// Cipher symbol -> plaintext symbol under key value `k`.
    #[inline(always)]
    pub fn decrypt(self, c: u8, k: u8, n: u8) -> u8 {
        let n16 = n as u16;
        match self {
            Operation::Add => (((c as u16) + (k as u16)) % n16) as u8,
            Operation::Sub => (((c as u16) + n16 - (k as u16)) % n16) as u8,
            Operation::Xor => (((c ^ k) as u16) % n16) as u8,
        }
    }

    /// Plaintext symbol -> cipher symbol under key value `k`. Inverse of
    /// `decrypt` for Add/Sub; for Xor only when `n` is a power of two.
    #[inline(always)]
    pub fn encrypt(self, p: u8, k: u8, n: u8) -> u8 {
        let n16 = n as u16;
        match self {
            Operation::Add => (((p as u16) + n16 - (k as u16)) % n16) as u8,
            Operation::Sub => (((p as u16) + (k as u16)) % n16) as u8,
            Operation::Xor => (((p ^ k) as u16) % n16) as u8,
        }
    }

    /// Whether decrypt/encrypt form a bijection on `[0, n)`.
    pub fn is_bijective(self, n: u8) -> bool {
        match self {
            Operation::Add | Operation::Sub => true,
            Operation::Xor => n.is_power_of_two(),
        }
    }
}

/// Applies a repeating key cyclically, writing into `out`.
/// `out` is cleared first so a scratch buffer can be reused across calls.
pub fn decrypt_into(op: Operation, cipher: &[u8], key: &[u8], n: u8, out: &mut Vec<u8>) {
    debug_assert!(!key.is_empty());
    out.clear();
    out.reserve(cipher.len());
    let len = key.len();
    for (i, &c) in cipher.iter().enumerate() {
        out.push(op.decrypt(c, key[i % len], n));
    }
}

pub fn decrypt_stream(op: Operation, cipher: &[u8], key: &[u8], n: u8) -> Vec<u8> {
    let mut out = Vec::new();
    decrypt_into(op, cipher, key, n, &mut out);
    out
}

pub fn encrypt_stream(op: Operation, plain: &[u8], key: &[u8], n: u8) -> Vec<u8> {
    debug_assert!(!key.is_empty());
    let len = key.len();
    plain
        .iter()
        .enumerate()
        .map(|(i, &p)| op.encrypt(p, key[i % len], n))
        .collect()
}
