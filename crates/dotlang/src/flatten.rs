//! Discards subgraph structure from a [`ResolvedGraph`], producing a
//! single flat list of nodes and edges.
//!
//! Flattening is lossy: every (sub)graph level's `graph_attrs` are
//! dropped, since a flat graph has nowhere to hang them. The original
//! implementation surfaces this unconditionally — for the root graph
//! too, not only nested subgraphs — as a stderr notice before descending
//! into each level's statements; this crate reproduces that as a
//! [`FlattenNotice`] delivered to a caller-supplied sink rather than a
//! hardcoded destination.

use crate::ast::*;

/// One discarded-`graph_attrs` notice, named after the (sub)graph whose
/// attributes were dropped. `name` is empty for an anonymous graph or
/// subgraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattenNotice {
    pub name: String,
    pub discarded_attrs: usize,
}

fn flatten_impl(graph: &ResolvedGraph, out: &mut Vec<FlatStmt>, sink: &mut dyn FnMut(FlattenNotice)) {
    sink(FlattenNotice {
        name: graph.name.clone(),
        discarded_attrs: graph.graph_attrs.len(),
    });
    for stmt in &graph.statements {
        match stmt {
            ResolvedStmt::Node(n) => out.push(FlatStmt::Node(n.clone())),
            ResolvedStmt::Edge(e) => out.push(FlatStmt::Edge(e.clone())),
            ResolvedStmt::Subgraph(sub) => flatten_impl(sub, out, sink),
        }
    }
}

/// Flattens `graph`, logging one [`tracing::debug!`] event per discarded
/// (sub)graph's `graph_attrs` — including the root.
pub fn flatten(graph: &ResolvedGraph) -> FlatGraph {
    flatten_with(graph, &mut |notice: FlattenNotice| {
        tracing::debug!(
            graph = %notice.name,
            discarded_attrs = notice.discarded_attrs,
            "graph attributes discarded due to flattening"
        );
    })
}

/// Like [`flatten`], but delivers each discard notice to `sink` instead
/// of logging it, so callers can collect or assert on them.
pub fn flatten_with(graph: &ResolvedGraph, sink: &mut dyn FnMut(FlattenNotice)) -> FlatGraph {
    let mut statements = Vec::new();
    flatten_impl(graph, &mut statements, sink);
    FlatGraph {
        strict: graph.strict,
        graph_type: graph.graph_type,
        statements,
    }
}
