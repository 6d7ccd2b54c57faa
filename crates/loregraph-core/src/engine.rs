//! The engine facade: one entry point per query surface, one session per
//! operation, every result funneled through the same decode-and-assemble
//! pipeline.

use loregraph_common::{Error, GraphData, GraphFilter, GraphSchema, Result};
use neo4rs::query;

use crate::connector::StoreConnector;
use crate::cypher::{self, CypherStatement, Param};
use crate::decode;
use crate::projection::Projection;

pub struct GraphEngine {
    connector: StoreConnector,
}

impl GraphEngine {
    /// The connector is injected and owned; construct it once and share the
    /// engine across operations.
    pub fn new(connector: StoreConnector) -> Self {
        Self { connector }
    }

    pub fn connector(&self) -> &StoreConnector {
        &self.connector
    }

    /// Every entity and every directed relationship in the store. Closure
    /// filtering is unnecessary: the statement returns both endpoints of
    /// each relationship together.
    pub async fn fetch_all(&self) -> Result<GraphData> {
        self.run_statement(cypher::full_graph(), false).await
    }

    /// Execute caller-supplied Cypher and scan every resolvable column for
    /// graph values. Operator and debug use only: the text is executed
    /// as-is and must never be built from untrusted input.
    pub async fn run_raw(&self, text: &str) -> Result<GraphData> {
        let columns = decode::return_columns(text);
        let statement = CypherStatement {
            text: text.to_owned(),
            params: Vec::new(),
            columns,
        };
        self.run_statement(statement, false).await
    }

    /// Execute the query selected by the filter. Attribute-mode results get
    /// endpoint closure applied; traversal results are closed by
    /// construction since relationships are only returned for matched
    /// paths.
    pub async fn run_filtered(&self, filter: &GraphFilter) -> Result<GraphData> {
        let close_edges = !filter.has_center();
        self.run_statement(cypher::build_filtered(filter), close_edges)
            .await
    }

    /// Distinct label tags and relationship type tags, unordered.
    pub async fn schema(&self) -> Result<GraphSchema> {
        let labels = self.run_catalog(cypher::labels_catalog()).await?;
        let relationship_types = self.run_catalog(cypher::relationship_catalog()).await?;
        Ok(GraphSchema {
            labels,
            relationship_types,
        })
    }

    async fn run_statement(
        &self,
        statement: CypherStatement,
        close_edges: bool,
    ) -> Result<GraphData> {
        let session = self.connector.session().await?;
        let mut result = session
            .execute(to_query(&statement))
            .await
            .map_err(Error::execution)?;

        let mut projection = Projection::new();
        let mut rows = 0usize;
        while let Some(row) = result.next().await.map_err(Error::execution)? {
            rows += 1;
            for column in &statement.columns {
                projection.absorb(decode::decode_column(&row, column));
            }
        }

        let data = projection.finish(close_edges);
        tracing::debug!(
            rows,
            nodes = data.nodes.len(),
            edges = data.edges.len(),
            "assembled graph projection"
        );
        Ok(data)
    }

    async fn run_catalog(&self, statement: CypherStatement) -> Result<Vec<String>> {
        let session = self.connector.session().await?;
        let mut result = session
            .execute(to_query(&statement))
            .await
            .map_err(Error::execution)?;

        let mut values = Vec::new();
        while let Some(row) = result.next().await.map_err(Error::execution)? {
            for column in &statement.columns {
                if let Ok(value) = row.get::<String>(column) {
                    values.push(value);
                }
            }
        }
        Ok(values)
    }
}

fn to_query(statement: &CypherStatement) -> neo4rs::Query {
    let mut q = query(&statement.text);
    for (name, param) in &statement.params {
        q = match param {
            Param::Text(value) => q.param(name, value.clone()),
            Param::List(values) => q.param(name, values.clone()),
        };
    }
    q
}
