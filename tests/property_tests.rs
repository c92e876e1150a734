//! Property-based tests for trueno-csr
//!
//! Verifies chunking and expansion invariants hold for arbitrary offset arrays

use proptest::prelude::*;
use trueno_csr::{
    chunk_partition, expand_offsets, CsrGraph, HostStream, KernelConfig, NodeId, OffsetArray,
    SystemAllocator,
};

/// Sequential reference: fill each group's range with its id
fn reference_expand(offsets: &[u32], base_idx: u32) -> Vec<u32> {
    let mut out = Vec::new();
    for (group, window) in offsets.windows(2).enumerate() {
        let degree = (window[1] - window[0]) as usize;
        out.extend(std::iter::repeat(base_idx + group as u32).take(degree));
    }
    out
}

fn offsets_from(degrees: &[u32]) -> Vec<u32> {
    let mut offsets = Vec::with_capacity(degrees.len() + 1);
    offsets.push(0);
    for &d in degrees {
        offsets.push(offsets[offsets.len() - 1] + d);
    }
    offsets
}

/// Degree sequences with plenty of empty groups
fn prop_degrees(max_groups: usize) -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(prop_oneof![2 => Just(0u32), 3 => 0u32..20], 0..max_groups)
}

/// Streams with tiny thresholds so the parallel passes get exercised too
fn prop_stream() -> impl Strategy<Value = HostStream> {
    prop_oneof![
        Just(HostStream::default()),
        (1usize..8).prop_map(|block| {
            HostStream::new(
                KernelConfig::default()
                    .with_num_threads(3)
                    .with_parallel_threshold(1)
                    .with_scan_block_size(block),
            )
            .unwrap()
        }),
    ]
}

// Property: chunk boundaries are well-formed and snap to group boundaries
proptest! {
    #[test]
    fn prop_chunk_boundaries_well_formed(
        degrees in prop_degrees(200),
        chunk_size in 1usize..64,
        stream in prop_stream(),
    ) {
        let offsets = offsets_from(&degrees);
        let num_vertices = degrees.len() as u32;
        let num_edges = *offsets.last().unwrap();

        let chunks = chunk_partition(
            &stream,
            &SystemAllocator,
            &offsets,
            num_vertices,
            num_edges,
            chunk_size,
        )
        .unwrap();

        let vertex = chunks.vertex_boundaries();
        let edge = chunks.edge_boundaries();
        let num_chunks = (num_edges as usize).div_ceil(chunk_size).max(1);

        // Invariant 1: both sequences have num_chunks + 1 entries
        prop_assert_eq!(vertex.len(), num_chunks + 1);
        prop_assert_eq!(edge.len(), num_chunks + 1);

        // Invariant 2: endpoints
        prop_assert_eq!(vertex[0], 0);
        prop_assert_eq!(edge[0], 0);
        prop_assert_eq!(*vertex.last().unwrap(), num_vertices);
        prop_assert_eq!(*edge.last().unwrap(), num_edges);

        // Invariant 3: non-decreasing
        prop_assert!(vertex.windows(2).all(|w| w[0] <= w[1]));
        prop_assert!(edge.windows(2).all(|w| w[0] <= w[1]));

        // Invariant 4: every cut is an exact group boundary
        for (v, e) in vertex.iter().zip(edge) {
            prop_assert_eq!(offsets[*v as usize], *e);
        }
    }
}

// Property: interior cuts land at or after their target, at the first vertex that does
proptest! {
    #[test]
    fn prop_chunk_cuts_are_lower_bounds(
        degrees in prop_degrees(200),
        chunk_size in 1usize..64,
    ) {
        let offsets = offsets_from(&degrees);
        let num_edges = *offsets.last().unwrap();

        let chunks = chunk_partition(
            &HostStream::default(),
            &SystemAllocator,
            &offsets,
            degrees.len() as u32,
            num_edges,
            chunk_size,
        )
        .unwrap();

        let vertex = chunks.vertex_boundaries();
        for i in 1..chunks.num_chunks() {
            let goal = (i * chunk_size) as u32;
            let v = vertex[i] as usize;
            prop_assert!(offsets[v] >= goal);
            prop_assert!(v == 0 || offsets[v - 1] < goal);
        }
    }
}

// Property: a single chunk is returned whenever everything fits
proptest! {
    #[test]
    fn prop_single_chunk_when_everything_fits(degrees in prop_degrees(50), slack in 0usize..10) {
        let offsets = offsets_from(&degrees);
        let num_edges = *offsets.last().unwrap();
        let num_vertices = degrees.len() as u32;

        let chunks = chunk_partition(
            &HostStream::default(),
            &SystemAllocator,
            &offsets,
            num_vertices,
            num_edges,
            num_edges as usize + slack + 1,
        )
        .unwrap();

        prop_assert_eq!(chunks.vertex_boundaries(), &[0, num_vertices][..]);
        prop_assert_eq!(chunks.edge_boundaries(), &[0, num_edges][..]);
    }
}

// Property: expansion matches the sequential fill for any base index
proptest! {
    #[test]
    fn prop_expand_matches_reference(
        degrees in prop_degrees(300),
        base_idx in 0u32..1000,
        stream in prop_stream(),
    ) {
        let offsets = offsets_from(&degrees);

        let ids: Vec<u32> = expand_offsets(&stream, &SystemAllocator, &offsets, base_idx).unwrap();

        prop_assert_eq!(ids.len(), *offsets.last().unwrap() as usize);
        prop_assert_eq!(ids, reference_expand(&offsets, base_idx));
    }
}

// Property: offsets built from degrees give the degrees back
proptest! {
    #[test]
    fn prop_from_degrees_roundtrip(degrees in prop_degrees(300), stream in prop_stream()) {
        let offsets = OffsetArray::<u64>::from_degrees(
            &stream,
            &SystemAllocator,
            &degrees.iter().map(|&d| u64::from(d)).collect::<Vec<_>>(),
        )
        .unwrap();

        prop_assert_eq!(offsets.num_groups(), degrees.len());
        let back: Vec<u32> = offsets.degrees().iter().map(|&d| d as u32).collect();
        prop_assert_eq!(back, degrees);
    }
}

// Property: expanding graph row offsets recovers each edge's source
proptest! {
    #[test]
    fn prop_edge_sources_match_edge_list(edges in prop_edge_list(0usize..100usize, 0u32..30u32)) {
        let graph = CsrGraph::from_edge_list(&edges).unwrap();
        let sources = graph.edge_sources(&HostStream::default(), &SystemAllocator).unwrap();

        let mut expected: Vec<u32> = edges.iter().map(|(src, _, _)| src.0).collect();
        expected.sort_unstable();

        prop_assert_eq!(sources, expected);
    }
}

// Property: chunks of a graph cover every edge exactly once, in order
proptest! {
    #[test]
    fn prop_graph_chunks_cover_edges(
        edges in prop_edge_list(0usize..100usize, 0u32..30u32),
        chunk_size in 1usize..16,
    ) {
        let graph = CsrGraph::from_edge_list(&edges).unwrap();
        let chunks = graph.edge_chunks(&HostStream::default(), chunk_size).unwrap();

        let mut collected = Vec::new();
        for chunk in chunks.chunks() {
            collected.extend(graph.chunk_edges(&chunk).unwrap());
        }

        prop_assert_eq!(collected.len(), graph.num_edges());
        let (_, col_indices, _) = graph.csr_components();
        let targets: Vec<u32> = collected.iter().map(|(_, dst, _)| *dst).collect();
        prop_assert_eq!(targets, col_indices.to_vec());
    }
}

/// Generate random edge list
fn prop_edge_list(
    num_edges: impl Strategy<Value = usize>,
    max_node: impl Strategy<Value = u32>,
) -> impl Strategy<Value = Vec<(NodeId, NodeId, f32)>> {
    (num_edges, max_node).prop_flat_map(|(n, max_node)| {
        // Ensure max_node is at least 1 to avoid empty range
        let max_node = max_node.max(1);
        prop::collection::vec(
            (0..max_node, 0..max_node, 0.0..100.0f32)
                .prop_map(|(src, dst, weight)| (NodeId(src), NodeId(dst), weight)),
            0..=n,
        )
    })
}
