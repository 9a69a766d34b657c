use crate::cipher::Operation;
use crate::stream::CipherStream;
use fastrand::Rng;

/// Most frequent symbol in a slice; ties resolve to the lowest index so
/// the estimate is deterministic for identical inputs.
fn most_frequent(slice: &[u8], n: u8) -> u8 {
    let mut counts = [0u32; 256];
    for &s in slice {
        counts[s as usize] += 1;
    }
    let mut best = 0u8;
    let mut best_count = 0u32;
    for idx in 0..n {
        let c = counts[idx as usize];
        if c > best_count {
            best = idx;
            best_count = c;
        }
    }
    best
}

/// The key value that decrypts `cipher_sym` to `plain_sym` under `op`.
/// Exact for Add/Sub; for Xor the raw xor is reduced mod n, a best-effort
/// guess consistent with the operation's own reduction.
fn key_for(op: Operation, cipher_sym: u8, plain_sym: u8, n: u8) -> u8 {
    let n16 = n as u16;
    match op {
        Operation::Add => (((plain_sym as u16) + n16 - (cipher_sym as u16)) % n16) as u8,
        Operation::Sub => (((cipher_sym as u16) + n16 - (plain_sym as u16)) % n16) as u8,
        Operation::Xor => (((cipher_sym ^ plain_sym) as u16) % n16) as u8,
    }
}

/// Frequency-analysis seed key: per key position, the coset's most
/// frequent cipher symbol is assumed to be `assumed_common` in plaintext.
/// A heuristic starting point, not a guarantee; its only contract is
/// determinism given identical inputs.
pub fn estimate_key(
    stream: &CipherStream,
    length: usize,
    assumed_common: u8,
    op: Operation,
    n: u8,
) -> Vec<u8> {
    (0..length)
        .map(|offset| {
            let coset = stream.coset(offset, length);
            key_for(op, most_frequent(&coset, n), assumed_common, n)
        })
        .collect()
}

/// Uniform random key for restart runs.
pub fn random_key(rng: &mut Rng, length: usize, n: u8) -> Vec<u8> {
    (0..length).map(|_| rng.u8(0..n)).collect()
}
