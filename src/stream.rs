use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkKind {
    Word,
    Line,
}

/// A layout boundary observed during tokenization, anchored to the symbol
/// offset it precedes. Carried through re-orderings untouched so reporting
/// code can reapply the source layout; never interpreted by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mark {
    pub offset: usize,
    pub kind: MarkKind,
}

impl Mark {
    pub fn new(offset: usize, kind: MarkKind) -> Self {
        Self { offset, kind }
    }
}

/// An immutable sequence of symbol indices. The engine only ever reads it;
/// transformations (decryption, transposition) produce new index vectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CipherStream {
    indices: Vec<u8>,
    marks: Vec<Mark>,
}

impl CipherStream {
    pub fn new(indices: Vec<u8>, marks: Vec<Mark>) -> Self {
        Self { indices, marks }
    }

    pub fn from_indices(indices: Vec<u8>) -> Self {
        Self::new(indices, Vec::new())
    }

    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Every `length`-th index starting at `offset`. The statistics engine
    /// and key estimator both work coset-by-coset.
    pub fn coset(&self, offset: usize, length: usize) -> Vec<u8> {
        self.indices
            .iter()
            .skip(offset)
            .step_by(length)
            .copied()
            .collect()
    }
}
