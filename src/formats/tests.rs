use super::*;

use crate::utils;

use std::fs;

//-----------------------------------------------------------------------------

fn build_graph(input: &str, k: usize, limit: usize, normalize: bool, enrich: bool) -> FingerGraph {
    let graph = FingerGraph::from_reader(input.as_bytes(), k, limit, normalize, enrich);
    assert!(graph.is_ok(), "Failed to build the graph: {}", graph.unwrap_err());
    graph.unwrap()
}

fn write_to_vec(graph: &FingerGraph) -> Vec<u8> {
    let mut output: Vec<u8> = Vec::new();
    let result = write_graph(graph, &mut output);
    assert!(result.is_ok(), "Failed to write the graph: {}", result.unwrap_err());
    output
}

fn read_from_slice(serialized: &[u8]) -> FingerGraph {
    let mut reader = serialized;
    let graph = read_graph(&mut reader);
    assert!(graph.is_ok(), "Failed to read the graph: {}", graph.unwrap_err());
    graph.unwrap()
}

fn check_same_graph(loaded: &FingerGraph, truth: &FingerGraph) {
    assert_eq!(loaded.k(), truth.k(), "Wrong k");
    assert_eq!(loaded.limit(), truth.limit(), "Wrong limit");
    assert_eq!(loaded.is_normalized(), truth.is_normalized(), "Wrong normalization flag");
    assert_eq!(loaded.is_directed(), truth.is_directed(), "Wrong directedness");
    assert_eq!(loaded.is_enriched(), truth.is_enriched(), "Wrong enrichment flag");
    assert_eq!(loaded.node_count(), truth.node_count(), "Wrong number of nodes");
    for (handle, (loaded_node, true_node)) in loaded.nodes().zip(truth.nodes()).enumerate() {
        assert_eq!(loaded_node.key(), true_node.key(), "Wrong key for node {}", handle);
        assert_eq!(
            loaded_node.occurrences(), true_node.occurrences(),
            "Wrong occurrences for node {}", handle
        );
        assert_eq!(
            loaded_node.neighbors(), true_node.neighbors(),
            "Wrong neighbors for node {}", handle
        );
    }
}

//-----------------------------------------------------------------------------

#[test]
fn header_flags() {
    let graph = FingerGraph::new(5, 30, true, true).unwrap();
    assert_eq!(
        header_record(&graph), "HT\tk=5\tthreshold=30\tis_normalized=1\tis_enriched=0",
        "Wrong header for a normalized enriched graph"
    );

    // The header flag is set for graphs whose keys have no representative sequence.
    let graph = FingerGraph::new(2, 0, false, false).unwrap();
    assert_eq!(
        header_record(&graph), "HT\tk=2\tthreshold=0\tis_normalized=0\tis_enriched=1",
        "Wrong header for an unnormalized bare graph"
    );
}

#[test]
fn record_rendering() {
    let input = "read1 0|AAAA CCC GG TTTTT AA\nread2 0|AAAA CCC GG TTTTT AA\n";
    let graph = build_graph(input, 2, 0, false, true);

    assert_eq!(
        vertex_record(graph.node(0)),
        "VT\t((4, 3), 'AAAA')\t{('read1', 0), ('read2', 0)}",
        "Wrong vertex record"
    );
    assert_eq!(
        edge_record(graph.node(0), graph.node(1)),
        "ED\t((4, 3), 'AAAA')\t((3, 2), 'CCC')",
        "Wrong edge record"
    );
}

#[test]
fn directed_export() {
    let input = "read1 0|AAAA CCC GG TTTTT AA\nread2 0|AAAA CCC GG TTTTT AA\n";
    let graph = build_graph(input, 2, 0, false, false);

    let truth = vec![
        String::from("HT\tk=2\tthreshold=0\tis_normalized=0\tis_enriched=1"),
        String::from("VT\t((4, 3), '')\t{('read1', 0), ('read2', 0)}"),
        String::from("VT\t((3, 2), '')\t{('read1', 4), ('read2', 4)}"),
        String::from("VT\t((2, 5), '')\t{('read1', 7), ('read2', 7)}"),
        String::from("VT\t((5, 2), '')\t{('read1', 9), ('read2', 9)}"),
        String::from("ED\t((4, 3), '')\t((3, 2), '')"),
        String::from("ED\t((3, 2), '')\t((2, 5), '')"),
        String::from("ED\t((2, 5), '')\t((5, 2), '')"),
    ];
    assert_eq!(graph_records(&graph), truth, "Wrong records for a directed graph");

    let serialized = write_to_vec(&graph);
    let mut truth_bytes = truth.join("\n").into_bytes();
    truth_bytes.push(b'\n');
    assert_eq!(serialized, truth_bytes, "Wrong serialized graph");
}

#[test]
fn undirected_export_mirrors_edges() {
    let input = "read1 0|AA CCC G\nread2 0|AA CCC G\n";
    let graph = build_graph(input, 2, 0, true, false);

    let truth = vec![
        String::from("HT\tk=2\tthreshold=0\tis_normalized=1\tis_enriched=1"),
        String::from("VT\t((2, 3), '')\t{('read1', 0), ('read2', 0)}"),
        String::from("VT\t((1, 3), '')\t{('read1', 2), ('read2', 2)}"),
        String::from("ED\t((2, 3), '')\t((1, 3), '')"),
        String::from("ED\t((1, 3), '')\t((2, 3), '')"),
        String::from("ED\t((1, 3), '')\t((2, 3), '')"),
        String::from("ED\t((2, 3), '')\t((1, 3), '')"),
    ];
    assert_eq!(graph_records(&graph), truth, "Wrong records for an undirected graph");
}

//-----------------------------------------------------------------------------

#[test]
fn export_filters_rare_nodes() {
    let mut graph = FingerGraph::new(2, 0, false, false).unwrap();
    let frequent = graph.insert(vec![4, 3], String::new(), "read1", 0);
    graph.insert(vec![4, 3], String::new(), "read2", 0);
    let rare = graph.insert(vec![3, 2], String::new(), "read1", 4);
    graph.connect(frequent, rare);

    // The rare neighbor is filtered from the output but stays in the graph.
    let records = graph_records(&graph);
    assert_eq!(records.len(), 2, "Wrong number of records");
    assert!(records[1].starts_with("VT\t((4, 3)"), "Missing vertex record for the frequent node");
    assert_eq!(graph.node_count(), 2, "The export changed the graph");

    // Once the neighbor is observed again, the edge is retained as well.
    graph.insert(vec![3, 2], String::new(), "read2", 4);
    let records = graph_records(&graph);
    assert_eq!(records.len(), 4, "Wrong number of records");
    assert!(records[3].starts_with("ED\t"), "Missing edge record");
}

#[test]
fn single_occurrence_graph_exports_only_the_header() {
    let input = "read1 0|AAAA CCC GG TTTTT AA\n";
    let graph = build_graph(input, 2, 0, false, false);

    assert_eq!(graph.node_count(), 4, "Wrong number of nodes");
    let records = graph_records(&graph);
    assert_eq!(records.len(), 1, "Single-occurrence nodes were exported");
}

//-----------------------------------------------------------------------------

#[test]
fn round_trip_preserves_the_graph() {
    let input = "read1 0|AAAA CCC GG TTTTT AA\nread2 0|AAAA CCC GG TTTTT AA\n";
    for (normalize, enrich) in [(false, false), (false, true), (true, false), (true, true)] {
        let graph = build_graph(input, 2, 0, normalize, enrich);
        let serialized = write_to_vec(&graph);
        let loaded = read_from_slice(&serialized);
        check_same_graph(&loaded, &graph);

        // Writing the loaded graph reproduces the file byte for byte.
        assert_eq!(write_to_vec(&loaded), serialized, "The round trip changed the file");
    }
}

#[test]
fn round_trip_of_an_empty_graph() {
    let graph = FingerGraph::new(5, 30, true, true).unwrap();
    let serialized = write_to_vec(&graph);
    let loaded = read_from_slice(&serialized);
    check_same_graph(&loaded, &graph);
}

#[test]
fn loading_keeps_only_retained_nodes() {
    // read3 shares no windows with the others, so its nodes are filtered.
    let input = "read1 0|AAAA CCC GG TTTTT AA\nread2 0|AAAA CCC GG TTTTT AA\nread3 0|A CC GGG TTTT AAAAA\n";
    let graph = build_graph(input, 2, 0, false, false);
    assert!(graph.node_count() > 4, "The unshared read produced no nodes");

    let loaded = read_from_slice(&write_to_vec(&graph));
    assert_eq!(loaded.node_count(), 4, "Filtered nodes were loaded");
    for node in loaded.nodes() {
        assert!(node.occurrences().len() >= MIN_OCCURRENCES, "A filtered node was loaded");
    }
}

#[test]
fn read_graph_file() {
    let filename = utils::get_test_data("example.graph");
    let mut reader = utils::open_file(&filename).unwrap();
    let graph = read_graph(&mut reader);
    assert!(graph.is_ok(), "Failed to read the graph file: {}", graph.unwrap_err());
    let graph = graph.unwrap();

    assert_eq!(graph.k(), 2, "Wrong k");
    assert_eq!(graph.limit(), 0, "Wrong limit");
    assert!(!graph.is_normalized(), "Wrong normalization flag");
    assert!(!graph.is_enriched(), "Wrong enrichment flag");
    assert_eq!(graph.node_count(), 4, "Wrong number of nodes");

    let serialized = write_to_vec(&graph);
    let truth = fs::read(&filename).unwrap();
    assert_eq!(serialized, truth, "The round trip changed the file");
}

//-----------------------------------------------------------------------------

#[test]
fn structural_errors_are_fatal() {
    // Missing header.
    assert!(read_graph(&mut &b""[..]).is_err(), "Accepted an empty file");

    // Unknown or truncated header.
    assert!(read_graph(&mut &b"XX\tk=2\tthreshold=0\tis_normalized=0\tis_enriched=1\n"[..]).is_err(), "Accepted an unknown header marker");
    assert!(read_graph(&mut &b"HT\tk=2\tthreshold=0\n"[..]).is_err(), "Accepted a truncated header");

    // Unknown record marker.
    let file = b"HT\tk=2\tthreshold=0\tis_normalized=0\tis_enriched=1\nVX\t((1, 2), '')\t{('r1', 0), ('r2', 0)}\n";
    assert!(read_graph(&mut &file[..]).is_err(), "Accepted an unknown record marker");

    // Vertex record after the edge block.
    let file = b"HT\tk=2\tthreshold=0\tis_normalized=0\tis_enriched=1\n\
VT\t((1, 2), '')\t{('r1', 0), ('r2', 0)}\n\
VT\t((2, 3), '')\t{('r1', 1), ('r2', 1)}\n\
ED\t((1, 2), '')\t((2, 3), '')\n\
VT\t((3, 4), '')\t{('r1', 3), ('r2', 3)}\n";
    assert!(read_graph(&mut &file[..]).is_err(), "Accepted a vertex record after the edge block");

    // Edge referencing an unknown vertex.
    let file = b"HT\tk=2\tthreshold=0\tis_normalized=0\tis_enriched=1\n\
VT\t((1, 2), '')\t{('r1', 0), ('r2', 0)}\n\
ED\t((1, 2), '')\t((7, 8), '')\n";
    assert!(read_graph(&mut &file[..]).is_err(), "Accepted an edge to an unknown vertex");
}

#[test]
fn numeric_errors_are_fatal() {
    assert!(
        read_graph(&mut &b"HT\tk=two\tthreshold=0\tis_normalized=0\tis_enriched=1\n"[..]).is_err(),
        "Accepted a non-numeric k"
    );
    assert!(
        read_graph(&mut &b"HT\tk=2\tthreshold=0\tis_normalized=maybe\tis_enriched=1\n"[..]).is_err(),
        "Accepted an invalid flag"
    );

    let file = b"HT\tk=2\tthreshold=0\tis_normalized=0\tis_enriched=1\n\
VT\t((1, x), '')\t{('r1', 0), ('r2', 0)}\n";
    assert!(read_graph(&mut &file[..]).is_err(), "Accepted a non-numeric k-finger value");

    let file = b"HT\tk=2\tthreshold=0\tis_normalized=0\tis_enriched=1\n\
VT\t((1, 2), '')\t{('r1', zero), ('r2', 0)}\n";
    assert!(read_graph(&mut &file[..]).is_err(), "Accepted a non-numeric occurrence offset");
}

#[test]
fn malformed_records_are_fatal() {
    let file = b"HT\tk=2\tthreshold=0\tis_normalized=0\tis_enriched=1\n\
VT\t((1, 2), '')\n";
    assert!(read_graph(&mut &file[..]).is_err(), "Accepted a vertex record without occurrences");

    let file = b"HT\tk=2\tthreshold=0\tis_normalized=0\tis_enriched=1\n\
VT\t((1, 2), '')\t{}\n";
    assert!(read_graph(&mut &file[..]).is_err(), "Accepted an empty occurrence set");

    let file = b"HT\tk=2\tthreshold=0\tis_normalized=0\tis_enriched=1\n\
VT\t(1, 2)\t{('r1', 0), ('r2', 0)}\n";
    assert!(read_graph(&mut &file[..]).is_err(), "Accepted a malformed vertex tuple");
}

//-----------------------------------------------------------------------------
