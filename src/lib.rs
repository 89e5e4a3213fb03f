//! # Overlap graphs over k-finger fingerprints of sequencing reads.
//!
//! A factorization decomposes a sequencing read into an ordered list of substrings (factors).
//! The fingerprint of a read is the sequence of its factor lengths, and a k-finger is a window
//! of `k` consecutive fingerprint values.
//! This crate turns a file of precomputed factorizations into a deduplicated graph:
//! every distinct canonical k-finger becomes a node, and two nodes are connected when their
//! windows overlap by `k - 1` factors within some read.
//! The graph is used for repeat and structure analysis of read sets.
//!
//! See [`FingerGraph`] for graph construction and [`formats`] for the text-based graph file format.
//!
//! ### Basic concepts
//!
//! Nodes are accessed by handles, which are indices into an arena owned by the graph.
//! A node stores its canonical key, the set of [`Occurrence`] positions where the window was
//! observed, and the handles of its neighbors.
//! Canonicalization makes keys independent of strand and orientation: a k-finger and its
//! reversal map to the same node, as do a representative substring and its reverse complement.
//! When canonicalization is disabled, the graph is directed instead.
//!
//! Node keys can optionally be enriched with a representative substring extracted from the
//! window's factors, which disambiguates windows whose factor lengths happen to coincide.
//!
//! The pipeline is a bounded batch job: the whole input is consumed and the graph is built
//! in memory before any output is produced.
//! The export filters nodes observed only once, but the graph keeps them; memory scales with
//! the number of distinct canonical windows.

pub mod canonical;
pub mod factorization;
pub mod formats;
pub mod graph;
pub mod utils;

pub use factorization::FactorRecord;
pub use graph::{FingerGraph, Node, NodeKey, Occurrence};
