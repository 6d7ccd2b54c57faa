pub mod connector;
pub mod cypher;
pub mod decode;
pub mod engine;
pub mod projection;

pub use connector::StoreConnector;
pub use cypher::{CypherStatement, Param};
pub use decode::GraphValue;
pub use engine::GraphEngine;
pub use projection::Projection;

// Re-export common types for convenience
pub use loregraph_common::{
    AppConfig, Error, GraphData, GraphEdge, GraphFilter, GraphNode, GraphSchema, Result,
    StoreConfig,
};
