use anyhow::Result;
use loregraph_common::AppConfig;
use loregraph_core::{GraphEngine, StoreConnector};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    dotenvy::dotenv().ok();

    // 1. Load configuration (defaults target a local dev store)
    let config = AppConfig::load()?;
    println!("Connecting to {} as {}", config.store.uri, config.store.user);

    // 2. Build the engine with an owned connector
    let engine = GraphEngine::new(StoreConnector::new(config.store));

    // 3. What does the store contain?
    let schema = engine.schema().await?;
    println!("\nLabels: {:?}", schema.labels);
    println!("Relationship types: {:?}", schema.relationship_types);

    // 4. Fetch the whole graph
    let graph = engine.fetch_all().await?;
    println!(
        "\nFull graph: {} nodes, {} edges",
        graph.nodes.len(),
        graph.edges.len()
    );
    for node in graph.nodes.iter().take(10) {
        println!("   - [{}] {}", node.node_type, node.label);
    }

    // 5. Raw statements work too (debug path, trusted input only)
    let sample = engine
        .run_raw("MATCH (n)-[r]->(m) RETURN n, r, m LIMIT 5")
        .await?;
    println!(
        "\nRaw sample: {} nodes, {} edges",
        sample.nodes.len(),
        sample.edges.len()
    );

    // 6. Explicit teardown; a later call would reconnect transparently
    engine.connector().shutdown().await;
    Ok(())
}
