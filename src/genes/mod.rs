// This file declares the genes module and its submodules
//
// A fly's genetic material is deliberately simple:
// - `Gene` is a single (dx, dy) step for one tick
// - `Genome` is the fixed-capacity list of those steps, plus how much of it
//   has been fixed by ancestors

// Declare the gene submodule (looks for gene.rs in this directory)
mod gene;

// Declare the genome submodule (looks for genome.rs in this directory)
mod genome;

// Re-export both so users can write:
//   use flies::genes::{Gene, Genome};
// instead of:
//   use flies::genes::gene::Gene;
pub use gene::Gene;
pub use genome::Genome;
