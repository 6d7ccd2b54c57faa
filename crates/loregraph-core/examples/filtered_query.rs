use anyhow::Result;
use loregraph_common::{AppConfig, GraphFilter};
use loregraph_core::{GraphEngine, StoreConnector};

/// Run a filtered query from the command line.
///
/// Usage:
///   cargo run --example filtered_query -- Frodo 2        # traversal
///   cargo run --example filtered_query -- --type Location # attribute scan
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let filter = match args.first().map(String::as_str) {
        Some("--type") => GraphFilter {
            node_types: args[1..].to_vec(),
            ..GraphFilter::default()
        },
        Some(center) => GraphFilter {
            center_node: Some(center.to_owned()),
            depth: args.get(1).and_then(|d| d.parse().ok()),
            ..GraphFilter::default()
        },
        None => GraphFilter::default(),
    };

    let config = AppConfig::load()?;
    let engine = GraphEngine::new(StoreConnector::new(config.store));

    let graph = engine.run_filtered(&filter).await?;
    println!("{} nodes, {} edges", graph.nodes.len(), graph.edges.len());
    for node in &graph.nodes {
        println!("   - [{}] {}", node.node_type, node.label);
    }
    for edge in &graph.edges {
        println!("   - {} -[{}]-> {}", edge.from, edge.label, edge.to);
    }

    engine.connector().shutdown().await;
    Ok(())
}
