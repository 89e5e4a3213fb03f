//! Reading and writing graph files.
//!
//! A graph file is a text format with a header line, a block of vertex records, and a
//! block of edge records, in that order:
//!
//! ```text
//! HT	k=<k>	threshold=<limit>	is_normalized=<0|1>	is_enriched=<0|1>
//! VT	((i1, i2, ..., ik), 'SEQ')	{('read_id', offset), ...}
//! ED	((i1, i2, ..., ik), 'SEQ')	((j1, j2, ..., jk), 'SEQ')
//! ```
//!
//! Fields are tab-separated, and vertex tuples are rendered identically wherever they
//! appear.
//! Nodes observed fewer than [`MIN_OCCURRENCES`] times are noise: they are left out of
//! the export entirely, and an edge record is written only when both of its endpoints
//! are retained.
//! In an undirected graph, every edge record is followed by its explicitly written
//! mirror record, so a reader never needs to infer the reverse direction.
//!
//! The export algorithm is separated from the I/O sink: [`graph_records`] produces the
//! ordered record sequence as plain strings, and [`write_graph`] streams the same
//! records into any [`Write`] sink.
//! The order is deterministic: vertices in insertion order, edge records by source and
//! then by target handle.
//!
//! [`read_graph`] rebuilds a complete graph from a file, including occurrence sets and
//! adjacency.
//! Writing the result again reproduces the file byte for byte.

use crate::graph::{FingerGraph, Node, NodeKey, Occurrence};

use std::collections::BTreeSet;
use std::io::{self, BufRead, Write};

#[cfg(test)]
mod tests;

//-----------------------------------------------------------------------------

/// Nodes observed fewer times than this are left out of the export.
pub const MIN_OCCURRENCES: usize = 2;

fn is_retained(node: &Node) -> bool {
    node.occurrences().len() >= MIN_OCCURRENCES
}

/// Returns the header record for the graph.
///
/// The `is_enriched` flag in the header is set when node keys carry no representative
/// sequence; it is the negation of [`FingerGraph::is_enriched`].
pub fn header_record(graph: &FingerGraph) -> String {
    format!(
        "HT\tk={}\tthreshold={}\tis_normalized={}\tis_enriched={}",
        graph.k(),
        graph.limit(),
        graph.is_normalized() as u8,
        !graph.is_enriched() as u8
    )
}

/// Returns the vertex record for a node.
pub fn vertex_record(node: &Node) -> String {
    let mut occurrences = String::from("{");
    let mut first = true;
    for occurrence in node.occurrences().iter() {
        if first {
            first = false;
        } else {
            occurrences.push_str(", ");
        }
        occurrences.push_str(&occurrence.to_string());
    }
    occurrences.push('}');
    format!("VT\t{}\t{}", node.key(), occurrences)
}

/// Returns the record for a directed edge.
pub fn edge_record(from: &Node, to: &Node) -> String {
    format!("ED\t{}\t{}", from.key(), to.key())
}

//-----------------------------------------------------------------------------

/// Returns the export of the graph as an ordered sequence of records.
///
/// The records do not contain newline characters.
/// See the module documentation for the format and the filtering rules.
pub fn graph_records(graph: &FingerGraph) -> Vec<String> {
    let mut result = vec![header_record(graph)];

    for node in graph.nodes() {
        if is_retained(node) {
            result.push(vertex_record(node));
        }
    }

    for node in graph.nodes() {
        if !is_retained(node) {
            continue;
        }
        for handle in node.neighbors().iter() {
            let neighbor = graph.node(*handle);
            if !is_retained(neighbor) {
                continue;
            }
            result.push(edge_record(node, neighbor));
            if !graph.is_directed() {
                result.push(edge_record(neighbor, node));
            }
        }
    }

    result
}

/// Writes the graph to the given sink, one record per line.
pub fn write_graph<W: Write>(graph: &FingerGraph, output: &mut W) -> io::Result<()> {
    for record in graph_records(graph) {
        output.write_all(record.as_bytes())?;
        output.write_all(b"\n")?;
    }
    Ok(())
}

//-----------------------------------------------------------------------------

fn header_field<'a>(field: Option<&'a str>, prefix: &str) -> Result<&'a str, String> {
    field.and_then(|f| f.strip_prefix(prefix)).ok_or_else(|| {
        format!("Missing header field {}", prefix)
    })
}

fn header_flag(value: &str, name: &str) -> Result<bool, String> {
    match value {
        "0" => Ok(false),
        "1" => Ok(true),
        _ => Err(format!("Invalid header flag {}={}", name, value)),
    }
}

fn parse_header(line: &str) -> Result<FingerGraph, String> {
    let mut fields = line.split('\t');
    if fields.next() != Some("HT") {
        return Err(format!("Invalid graph file header: {}", line));
    }

    let k = header_field(fields.next(), "k=")?;
    let k = k.parse::<usize>().map_err(|err| {
        format!("Invalid header field k={}: {}", k, err)
    })?;
    let limit = header_field(fields.next(), "threshold=")?;
    let limit = limit.parse::<usize>().map_err(|err| {
        format!("Invalid header field threshold={}: {}", limit, err)
    })?;
    let normalized = header_flag(header_field(fields.next(), "is_normalized=")?, "is_normalized")?;
    let bare = header_flag(header_field(fields.next(), "is_enriched=")?, "is_enriched")?;

    // In the file, the flag marks graphs whose keys have no representative sequence.
    FingerGraph::new(k, limit, normalized, !bare)
}

fn parse_key(text: &str) -> Result<NodeKey, String> {
    let inner = text.strip_prefix("((").ok_or_else(|| {
        format!("Invalid vertex tuple: {}", text)
    })?;
    let split = inner.find("), '").ok_or_else(|| {
        format!("Invalid vertex tuple: {}", text)
    })?;
    let sequence = inner[split + 4..].strip_suffix("')").ok_or_else(|| {
        format!("Invalid vertex tuple: {}", text)
    })?;

    let mut finger = Vec::new();
    for value in inner[..split].split(", ") {
        let value = value.parse::<usize>().map_err(|err| {
            format!("Invalid k-finger value {}: {}", value, err)
        })?;
        finger.push(value);
    }

    Ok(NodeKey {
        finger,
        sequence: String::from(sequence),
    })
}

fn parse_occurrence(text: &str) -> Result<Occurrence, String> {
    let body = text.strip_prefix('\'').ok_or_else(|| {
        format!("Invalid occurrence: {}", text)
    })?;
    let quote = body.find('\'').ok_or_else(|| {
        format!("Invalid occurrence: {}", text)
    })?;
    let read_id = &body[..quote];
    let offset = body[quote + 1..].strip_prefix(", ").ok_or_else(|| {
        format!("Invalid occurrence: {}", text)
    })?;
    let offset = offset.parse::<usize>().map_err(|err| {
        format!("Invalid occurrence offset {}: {}", offset, err)
    })?;
    Ok(Occurrence::new(read_id, offset))
}

fn parse_occurrences(text: &str) -> Result<BTreeSet<Occurrence>, String> {
    let inner = text.strip_prefix('{').and_then(|t| t.strip_suffix('}')).ok_or_else(|| {
        format!("Invalid occurrence set: {}", text)
    })?;

    let mut result = BTreeSet::new();
    if inner.is_empty() {
        return Ok(result);
    }
    for item in inner.split("), (") {
        let item = item.strip_prefix('(').unwrap_or(item);
        let item = item.strip_suffix(')').unwrap_or(item);
        result.insert(parse_occurrence(item)?);
    }
    Ok(result)
}

fn parse_vertex(fields: &str, graph: &mut FingerGraph) -> Result<(), String> {
    let (key, occurrences) = fields.split_once('\t').ok_or_else(|| {
        format!("Invalid vertex record: {}", fields)
    })?;
    let key = parse_key(key)?;
    let occurrences = parse_occurrences(occurrences)?;
    if occurrences.is_empty() {
        return Err(format!("Vertex without occurrences: {}", key));
    }
    for occurrence in occurrences {
        graph.insert(key.finger.clone(), key.sequence.clone(), &occurrence.read_id, occurrence.offset);
    }
    Ok(())
}

fn parse_edge(fields: &str, graph: &mut FingerGraph) -> Result<(), String> {
    let (from, to) = fields.split_once('\t').ok_or_else(|| {
        format!("Invalid edge record: {}", fields)
    })?;
    let from = parse_key(from)?;
    let to = parse_key(to)?;
    let from = graph.find(&from.finger, &from.sequence).ok_or_else(|| {
        format!("Edge from an unknown vertex: {}", from)
    })?;
    let to = graph.find(&to.finger, &to.sequence).ok_or_else(|| {
        format!("Edge to an unknown vertex: {}", to)
    })?;
    graph.connect(from, to);
    Ok(())
}

/// Reads a graph file, fully rebuilding the graph.
///
/// Node identity, occurrence sets, and adjacency are all restored; writing the result
/// with [`write_graph`] reproduces the input byte for byte.
/// All errors are fatal: an invalid or missing header, a record with an unknown marker,
/// a vertex record after the first edge record, an edge referencing an unknown vertex,
/// or a numeric field that does not parse.
pub fn read_graph<R: BufRead>(reader: &mut R) -> Result<FingerGraph, String> {
    let mut lines = reader.lines();
    let header = match lines.next() {
        Some(line) => line.map_err(|x| x.to_string())?,
        None => return Err(String::from("Missing graph file header")),
    };
    let mut graph = parse_header(&header)?;

    let mut in_edges = false;
    for line in lines {
        let line = line.map_err(|x| x.to_string())?;
        if let Some(fields) = line.strip_prefix("VT\t") {
            if in_edges {
                return Err(format!("Vertex record after the edge block: {}", line));
            }
            parse_vertex(fields, &mut graph)?;
        } else if let Some(fields) = line.strip_prefix("ED\t") {
            in_edges = true;
            parse_edge(fields, &mut graph)?;
        } else {
            return Err(format!("Unknown record: {}", line));
        }
    }

    Ok(graph)
}

//-----------------------------------------------------------------------------
