// Import the gene type this genome is made of
use super::Gene;
// Serialization support for checkpointing
use serde::{Deserialize, Serialize};

/// Fixed-capacity sequence of genes plus the length of its inherited prefix
///
/// Slots `0..fixed_len` hold genes fixed by an ancestor (or earlier this
/// lifetime). Slots from `fixed_len` on have never been lived yet; they are
/// zero-filled rather than left undefined, and are always overwritten with a
/// fresh random gene before they are read.
///
/// **Rust Concept: Encapsulation**
/// The fields are private so nobody can shrink `fixed_len` or resize the
/// gene vector from outside. The only way to grow the fixed prefix is
/// `fix_next`, which keeps the invariant `fixed_len <= capacity`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genome {
    genes: Vec<Gene>,
    fixed_len: usize,
}

impl Genome {
    /// Empty genome of the given capacity: all slots zero, nothing fixed
    pub fn new(capacity: usize) -> Self {
        Self {
            genes: vec![Gene::ZERO; capacity],
            fixed_len: 0,
        }
    }

    /// Number of slots, equal to the configured `max_moves`
    pub fn capacity(&self) -> usize {
        self.genes.len()
    }

    /// How many leading slots hold fixed, inherited genes
    pub fn fixed_len(&self) -> usize {
        self.fixed_len
    }

    /// Whether slot `index` has been fixed by an ancestor or earlier tick
    pub fn is_fixed(&self, index: usize) -> bool {
        index < self.fixed_len
    }

    /// Gene at `index`
    ///
    /// # Panics
    /// Panics if `index >= capacity()`.
    pub fn gene(&self, index: usize) -> Gene {
        self.genes[index]
    }

    /// Overwrite the gene at `index`
    pub fn set(&mut self, index: usize, gene: Gene) {
        self.genes[index] = gene;
    }

    /// Extend the fixed prefix by one slot
    ///
    /// Saturates at capacity, so `fixed_len` never exceeds it.
    pub fn fix_next(&mut self) {
        if self.fixed_len < self.genes.len() {
            self.fixed_len += 1;
        }
    }

    /// Every slot, fixed or not
    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    /// The fixed prefix as a slice
    pub fn fixed_genes(&self) -> &[Gene] {
        &self.genes[..self.fixed_len]
    }
}
