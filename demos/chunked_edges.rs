//! Chunked edge processing with trueno-csr
//!
//! Run with: cargo run --example chunked_edges
//! GPU path: cargo run --example chunked_edges --features gpu

use trueno_csr::{CsrGraph, HostStream, KernelConfig, NodeId, TrackingAllocator};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🦀 trueno-csr Chunked Edges Example\n");

    // 1. Build a call graph
    println!("📊 Building call graph...");
    let graph = CsrGraph::from_edge_list(&[
        (NodeId(0), NodeId(1), 1.0), // main → parse_args
        (NodeId(0), NodeId(2), 1.0), // main → validate
        (NodeId(0), NodeId(3), 1.0), // main → execute
        (NodeId(1), NodeId(2), 2.0), // parse_args → validate (called twice)
        (NodeId(3), NodeId(4), 1.0), // execute → cleanup
        (NodeId(3), NodeId(5), 1.0), // execute → log
        (NodeId(4), NodeId(5), 1.0), // cleanup → log
    ])?;
    println!(
        "  ✅ Graph built: {} nodes, {} edges",
        graph.num_nodes(),
        graph.num_edges()
    );
    println!("  row_offsets: {:?}\n", graph.row_offsets().as_slice());

    // 2. Host stream from TRUENO_CSR_* overrides
    let stream = HostStream::new(KernelConfig::from_env()?)?;
    let alloc = TrackingAllocator::new();
    println!("⚙️  Stream {} with {} threads\n", stream.id(), stream.num_threads());

    // 3. Expand offsets into the COO source column
    println!("🔁 Expanding row offsets...");
    let sources = graph.edge_sources(&stream, &alloc)?;
    println!("  edge sources: {sources:?}");
    println!(
        "  ✅ {} allocation(s), {} bytes\n",
        alloc.allocations(),
        alloc.bytes()
    );

    // 4. Split into node-aligned chunks of ~3 edges
    println!("✂️  Chunking edges (~3 per chunk)...");
    let chunks = graph.edge_chunks(&stream, 3)?;
    for (i, chunk) in chunks.chunks().enumerate() {
        let edges = graph.chunk_edges(&chunk)?;
        println!(
            "  chunk {i}: nodes {:?}, edges {:?} → {:?}",
            chunk.vertices, chunk.edges, edges
        );
    }

    // 5. Same on the GPU, if present
    #[cfg(feature = "gpu")]
    {
        use trueno_csr::gpu::{gpu_chunk_partition, gpu_expand_offsets, GpuDevice, GpuOffsets};

        println!("\n🎮 GPU backend...");
        if GpuDevice::is_gpu_available().await {
            let device = GpuDevice::new().await?;
            println!("  adapter: {}", device.info().name);

            let offsets = GpuOffsets::from_csr_graph(&device, &graph)?;
            let gpu_sources = gpu_expand_offsets(&device, &offsets, 0).await?;
            let gpu_chunks = gpu_chunk_partition(
                &device,
                &offsets,
                u32::try_from(graph.num_nodes())?,
                u32::try_from(graph.num_edges())?,
                3,
            )
            .await?;

            println!("  ✅ sources match host: {}", gpu_sources == sources);
            println!("  ✅ chunks match host: {}", gpu_chunks == chunks);
        } else {
            println!("  ⚠️  GPU not available - skipped");
        }
    }

    println!("\n🎉 Example complete!");
    Ok(())
}
