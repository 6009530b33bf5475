//! Scope-inheritance resolver: walks a [`RawGraph`], materializes node
//! and edge attributes against the `graph`/`node`/`edge` default tables
//! in scope, and checks whole-document well-formedness (no redefined
//! nodes, no undefined endpoints, edge direction matches `graph_type`,
//! no duplicate edges in a `strict` graph).
//!
//! Two kinds of state thread through the recursion, and they behave
//! oppositely on purpose:
//!
//! - The three inherited attribute tables ([`Inherited`]) are passed *by
//!   value* into each subgraph call. A child mutating its copy of
//!   `node`/`edge`/`graph` defaults can never leak that mutation back to
//!   a sibling subgraph or its parent — each subgraph scope is isolated.
//! - The two "seen" sets (`nodes_seen`, `edges_seen`) are passed *by
//!   mutable reference*. Node and edge identity is a whole-document
//!   concept: a node declared in one subgraph and redeclared in another
//!   is still a redefinition.

use std::collections::HashSet;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use dotlang_types::DotError;

use crate::ast::*;

#[derive(Default, Clone)]
struct Inherited {
    graph: AttrMap,
    node: AttrMap,
    edge: AttrMap,
}

/// Wraps an [`Edge`] with equality/hashing that match the original
/// implementation's symmetric treatment of undirected edges: `A -- B`
/// and `B -- A` are the same edge, but `A -> B` and `B -> A` are not.
struct EdgeKey<'a>(&'a Edge);

fn str_hash(s: &str) -> u64 {
    let mut h = DefaultHasher::new();
    s.hash(&mut h);
    h.finish()
}

/// `boost::hash_combine`-style mix of two hashes, ordered.
fn combine(a: u64, b: u64) -> u64 {
    a ^ (b
        .wrapping_add(0x9e37_79b9_7f4a_7c15)
        .wrapping_add(a << 6)
        .wrapping_add(a >> 2))
}

fn ordered_hash(src: &str, tgt: &str) -> u64 {
    combine(str_hash(src), str_hash(tgt))
}

impl PartialEq for EdgeKey<'_> {
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = (self.0, other.0);
        if a.op != b.op {
            return false;
        }
        match a.op {
            EdgeOp::Directed => a.src == b.src && a.tgt == b.tgt,
            EdgeOp::Undirected => {
                (a.src == b.src && a.tgt == b.tgt) || (a.src == b.tgt && a.tgt == b.src)
            }
        }
    }
}

impl Eq for EdgeKey<'_> {}

impl Hash for EdgeKey<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let e = self.0;
        let h = match e.op {
            EdgeOp::Directed => ordered_hash(&e.src, &e.tgt),
            EdgeOp::Undirected => {
                ordered_hash(&e.src, &e.tgt).wrapping_add(ordered_hash(&e.tgt, &e.src))
            }
        };
        state.write_u64(h);
    }
}

/// Since `EdgeKey` borrows, the seen-set has to own its edges to keep
/// lifetimes simple across the recursive walk.
struct OwnedEdgeKey(Edge);

impl PartialEq for OwnedEdgeKey {
    fn eq(&self, other: &Self) -> bool {
        EdgeKey(&self.0) == EdgeKey(&other.0)
    }
}
impl Eq for OwnedEdgeKey {}
impl Hash for OwnedEdgeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        EdgeKey(&self.0).hash(state)
    }
}

fn merge_attrs(base: &AttrMap, overrides: &AttrList) -> AttrMap {
    let mut merged = base.clone();
    for item in overrides {
        merged.insert(item.key.clone(), item.value.clone());
    }
    merged
}

#[allow(clippy::too_many_arguments)]
fn resolve_impl(
    raw: &RawGraph,
    name: &str,
    strict: bool,
    graph_type: GraphType,
    statements: &[RawStmt],
    mut inherited: Inherited,
    nodes_seen: &mut HashSet<String>,
    edges_seen: &mut HashSet<OwnedEdgeKey>,
) -> Result<ResolvedGraph, DotError> {
    let mut resolved = ResolvedGraph {
        strict,
        graph_type,
        name: name.to_string(),
        graph_attrs: inherited.graph.clone(),
        statements: Vec::new(),
    };

    for stmt in statements {
        match stmt {
            RawStmt::AttrItem(item) => {
                resolved.graph_attrs.insert(item.key.clone(), item.value.clone());
            }
            RawStmt::AttrDefault(default) => {
                let table = match default.kind {
                    AttrDefaultKind::Graph => &mut inherited.graph,
                    AttrDefaultKind::Node => &mut inherited.node,
                    AttrDefaultKind::Edge => &mut inherited.edge,
                };
                for item in &default.attrs {
                    table.insert(item.key.clone(), item.value.clone());
                }
                if default.kind == AttrDefaultKind::Graph {
                    for item in &default.attrs {
                        resolved.graph_attrs.insert(item.key.clone(), item.value.clone());
                    }
                }
            }
            RawStmt::Node(node) => {
                if !nodes_seen.insert(node.name.clone()) {
                    return Err(DotError::RedefinedNode {
                        name: node.name.clone(),
                    });
                }
                let attrs = merge_attrs(&inherited.node, &node.attrs);
                resolved.statements.push(ResolvedStmt::Node(ResolvedNode {
                    name: node.name.clone(),
                    attrs,
                }));
            }
            RawStmt::Edge(edge_stmt) => {
                for edge in &edge_stmt.edges {
                    for endpoint in [&edge.src, &edge.tgt] {
                        if !nodes_seen.contains(endpoint) {
                            return Err(DotError::UndefinedNode {
                                name: endpoint.clone(),
                            });
                        }
                    }
                    if edge.op != graph_type.expected_edge_op() {
                        return Err(DotError::EdgeDirectionMismatch {
                            src: edge.src.clone(),
                            op: edge.op.as_str(),
                            tgt: edge.tgt.clone(),
                            graph_type: raw.graph_type.as_str(),
                        });
                    }
                    if raw.strict {
                        if !edges_seen.insert(OwnedEdgeKey(edge.clone())) {
                            return Err(DotError::DuplicateEdgeInStrict {
                                src: edge.src.clone(),
                                op: edge.op.as_str(),
                                tgt: edge.tgt.clone(),
                            });
                        }
                    }
                }
                let attrs = merge_attrs(&inherited.edge, &edge_stmt.attrs);
                resolved.statements.push(ResolvedStmt::Edge(ResolvedEdge {
                    edges: edge_stmt.edges.clone(),
                    attrs,
                }));
            }
            RawStmt::Subgraph {
                name: sub_name,
                statements: sub_statements,
            } => {
                let child = resolve_impl(
                    raw,
                    sub_name.as_deref().unwrap_or(""),
                    strict,
                    graph_type,
                    sub_statements,
                    inherited.clone(),
                    nodes_seen,
                    edges_seen,
                )?;
                resolved.statements.push(ResolvedStmt::Subgraph(child));
            }
        }
    }

    Ok(resolved)
}

/// Resolves a whole document: checks well-formedness and materializes
/// every node/edge's attribute set against the `graph`/`node`/`edge`
/// defaults in scope at that point.
pub fn resolve(raw: &RawGraph) -> Result<ResolvedGraph, DotError> {
    let mut nodes_seen = HashSet::new();
    let mut edges_seen = HashSet::new();
    resolve_impl(
        raw,
        &raw.name,
        raw.strict,
        raw.graph_type,
        &raw.statements,
        Inherited::default(),
        &mut nodes_seen,
        &mut edges_seen,
    )
}
