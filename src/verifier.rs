use crate::cipher::{decrypt_stream, encrypt_stream, Operation};
use crate::error::{RbResult, RunebreakError};
use crate::stream::CipherStream;

/// Decrypts with `(key, op)`, re-encrypts, and compares symbol-for-symbol
/// against the original stream. Always true for Add/Sub by construction;
/// a false return means the operation lost information (Xor over a
/// non-power-of-two alphabet).
pub fn verify(stream: &CipherStream, key: &[u8], op: Operation, n: u8) -> bool {
    if key.is_empty() {
        return false;
    }
    let plain = decrypt_stream(op, stream.indices(), key, n);
    let recovered = encrypt_stream(op, &plain, key, n);
    recovered == stream.indices()
}

/// Strict variant for callers that treat information loss as an error.
pub fn require_reversible(stream: &CipherStream, key: &[u8], op: Operation, n: u8) -> RbResult<()> {
    if verify(stream, key, op, n) {
        Ok(())
    } else {
        Err(RunebreakError::NonInvertible(op, n as usize))
    }
}
