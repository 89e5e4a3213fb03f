//! The k-finger overlap graph.
//!
//! A [`FingerGraph`] is built in a single pass over a factorization file.
//! For every read, a window of `k` consecutive fingerprint values slides along the read.
//! Each window position yields two overlapping k-fingers, the window and its successor,
//! which become nodes connected by an edge.
//! Windows whose factor lengths sum to less than the limit are discarded as uninformative.
//!
//! Nodes are deduplicated by their canonical [`NodeKey`]: when canonicalization is enabled,
//! a k-finger and its reversal (and a representative substring and its reverse complement)
//! map to the same node, and the graph is undirected.
//! Without canonicalization the keys are used verbatim and the graph is directed.
//!
//! All nodes live in an arena owned by the graph and are addressed by `usize` handles.
//! Adjacency is stored as sets of handles, so repeated nodes and edges collapse
//! automatically.

use crate::canonical;
use crate::factorization::{self, FactorRecord};

use std::collections::{BTreeSet, HashMap};
use std::fmt::Display;
use std::io::BufRead;


//-----------------------------------------------------------------------------

/// A position where a canonical window was observed.
///
/// Occurrences are ordered by read identifier and then by offset.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Occurrence {
    /// Identifier of the read.
    pub read_id: String,
    /// Offset of the window start within the read, in bases.
    pub offset: usize,
}

impl Occurrence {
    /// Creates a new occurrence.
    pub fn new(read_id: &str, offset: usize) -> Self {
        Occurrence {
            read_id: String::from(read_id),
            offset,
        }
    }
}

impl Display for Occurrence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "('{}', {})", self.read_id, self.offset)
    }
}

//-----------------------------------------------------------------------------

/// The canonical identity of a node.
///
/// Two windows are the same node exactly when their canonical keys are equal.
/// Keys are compared by the k-finger values and then by the representative sequence.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeKey {
    /// Window of `k` consecutive factor lengths.
    pub finger: Vec<usize>,
    /// Representative substring; empty when the graph is not enriched.
    pub sequence: String,
}

impl Display for NodeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "((")?;
        let mut first = true;
        for value in self.finger.iter() {
            if first {
                first = false;
            } else {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, "), '{}')", self.sequence)
    }
}

//-----------------------------------------------------------------------------

/// A node of the graph: a canonical window with its occurrences and neighbors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    key: NodeKey,
    occurrences: BTreeSet<Occurrence>,
    neighbors: BTreeSet<usize>,
}

impl Node {
    fn new(key: NodeKey) -> Self {
        Node {
            key,
            occurrences: BTreeSet::new(),
            neighbors: BTreeSet::new(),
        }
    }

    /// Returns the canonical key of the node.
    pub fn key(&self) -> &NodeKey {
        &self.key
    }

    /// Returns all positions where the window was observed, across all reads.
    pub fn occurrences(&self) -> &BTreeSet<Occurrence> {
        &self.occurrences
    }

    /// Returns the handles of the adjacent nodes.
    pub fn neighbors(&self) -> &BTreeSet<usize> {
        &self.neighbors
    }
}

//-----------------------------------------------------------------------------

/// A deduplicated overlap graph over the k-fingers of a read set.
///
/// The graph owns its nodes and exposes them by handle.
/// Handles are assigned in insertion order, which makes iteration deterministic.
///
/// # Examples
///
/// ```
/// use kfinger_graph::FingerGraph;
///
/// let input = b"read1 0|AAAA CCC GG TTTTT AA\nread2 0|AAAA CCC GG TTTTT AA\n";
/// let graph = FingerGraph::from_reader(&input[..], 2, 0, false, false).unwrap();
///
/// // Four distinct windows of width 2, each observed in both reads.
/// assert_eq!(graph.node_count(), 4);
/// for node in graph.nodes() {
///     assert_eq!(node.occurrences().len(), 2);
/// }
/// ```
#[derive(Debug)]
pub struct FingerGraph {
    k: usize,
    limit: usize,
    normalized: bool,
    enriched: bool,
    nodes: Vec<Node>,
    index: HashMap<NodeKey, usize>,
}

impl FingerGraph {
    /// Creates an empty graph.
    ///
    /// Returns an error if `k` is zero.
    ///
    /// # Arguments
    ///
    /// * `k`: Window width in factors.
    /// * `limit`: Minimum sum of factor lengths for a window to produce a node.
    /// * `normalize`: Canonicalize keys; the graph becomes undirected.
    /// * `enrich`: Extract a representative substring for each window.
    pub fn new(k: usize, limit: usize, normalize: bool, enrich: bool) -> Result<Self, String> {
        if k == 0 {
            return Err(String::from("Window width must be at least 1"));
        }
        Ok(FingerGraph {
            k,
            limit,
            normalized: normalize,
            enriched: enrich,
            nodes: Vec::new(),
            index: HashMap::new(),
        })
    }

    /// Builds the graph from a factorization file in a single pass.
    ///
    /// See [`crate::factorization`] for the input format.
    /// Lines without a factor segment are skipped; invalid offsets are fatal.
    pub fn from_reader<R: BufRead>(
        reader: R, k: usize, limit: usize, normalize: bool, enrich: bool
    ) -> Result<Self, String> {
        let mut graph = Self::new(k, limit, normalize, enrich)?;
        for line in reader.lines() {
            let line = line.map_err(|x| x.to_string())?;
            if let Some(record) = factorization::parse_record(&line)? {
                graph.add_record(&record);
            }
        }
        Ok(graph)
    }

    /// Adds all windows of one factorized read to the graph.
    ///
    /// The window slides one factor at a time.
    /// At each position the current window and its successor are inserted and connected,
    /// unless either window's factor lengths sum to less than the limit.
    /// The successor window starts one factor later, so its offset is the current offset
    /// plus the length of the window's first factor.
    pub fn add_record(&mut self, record: &FactorRecord) {
        let fingerprint = record.fingerprint();
        let mut offset = record.offset;
        let mut idx = 0;

        while idx + self.k < fingerprint.len() {
            let left = &fingerprint[idx..idx + self.k];
            let right = &fingerprint[idx + 1..idx + self.k + 1];

            if left.iter().sum::<usize>() < self.limit || right.iter().sum::<usize>() < self.limit {
                offset += fingerprint[idx];
                idx += 1;
                continue;
            }

            let (left_seq, right_seq) = if self.enriched {
                (
                    canonical::representative(&record.factors, idx, idx + self.k, self.normalized),
                    canonical::representative(&record.factors, idx + 1, idx + self.k + 1, self.normalized),
                )
            } else {
                (String::new(), String::new())
            };

            let advance = left[0];
            let from = self.insert(left.to_vec(), left_seq, &record.read_id, offset);
            let to = self.insert(right.to_vec(), right_seq, &record.read_id, offset + advance);
            self.connect(from, to);

            offset += advance;
            idx += 1;
        }
    }

    /// Returns the canonical key for a window.
    ///
    /// When the graph is normalized, both the k-finger and the sequence are reduced
    /// to their canonical forms; otherwise the key is used verbatim.
    pub fn canonical_key(&self, finger: Vec<usize>, sequence: String) -> NodeKey {
        if self.normalized {
            NodeKey {
                finger: canonical::canonical_finger(finger),
                sequence: canonical::canonical_sequence(&sequence),
            }
        } else {
            NodeKey { finger, sequence }
        }
    }

    /// Registers an observation of a window and returns the handle of its node.
    ///
    /// The key is canonicalized before the lookup.
    /// The first observation creates the node; later ones merge into its occurrence set,
    /// where duplicate (read, offset) pairs collapse.
    pub fn insert(&mut self, finger: Vec<usize>, sequence: String, read_id: &str, offset: usize) -> usize {
        let key = self.canonical_key(finger, sequence);
        let occurrence = Occurrence::new(read_id, offset);
        match self.index.get(&key) {
            Some(&handle) => {
                self.nodes[handle].occurrences.insert(occurrence);
                handle
            }
            None => {
                let handle = self.nodes.len();
                let mut node = Node::new(key.clone());
                node.occurrences.insert(occurrence);
                self.nodes.push(node);
                self.index.insert(key, handle);
                handle
            }
        }
    }

    /// Adds an edge between two nodes.
    ///
    /// The edge is mirrored when the graph is undirected.
    /// Repeated edges collapse.
    /// Panics if either handle is out of bounds.
    pub fn connect(&mut self, from: usize, to: usize) {
        self.nodes[from].neighbors.insert(to);
        if !self.is_directed() {
            self.nodes[to].neighbors.insert(from);
        }
    }

    /// Returns the handle of the node for the given window, if any.
    ///
    /// The key is canonicalized before the lookup.
    pub fn find(&self, finger: &[usize], sequence: &str) -> Option<usize> {
        let key = self.canonical_key(finger.to_vec(), String::from(sequence));
        self.index.get(&key).copied()
    }

    /// Returns the window width in factors.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Returns the minimum sum of factor lengths for a window to produce a node.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Returns `true` if keys are canonicalized.
    pub fn is_normalized(&self) -> bool {
        self.normalized
    }

    /// Returns `true` if the graph is directed.
    ///
    /// The graph is directed exactly when it is not normalized: undirected structure
    /// only makes sense once orientation is canonicalized.
    pub fn is_directed(&self) -> bool {
        !self.normalized
    }

    /// Returns `true` if node keys carry a representative substring.
    pub fn is_enriched(&self) -> bool {
        self.enriched
    }

    /// Returns the number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the node with the given handle.
    ///
    /// Panics if the handle is out of bounds.
    pub fn node(&self, handle: usize) -> &Node {
        &self.nodes[handle]
    }

    /// Returns an iterator over the nodes in handle order.
    pub fn nodes(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }
}

//-----------------------------------------------------------------------------
