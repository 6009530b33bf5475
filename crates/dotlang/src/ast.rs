//! The raw, resolved, and flat tree types.
//!
//! `RawStmt` is a named sum type with one constructor per statement kind,
//! including a `Subgraph { name, statements }` variant that recurses into
//! itself directly — deliberately not an untyped carrier with a side
//! `name` field, so the compiler enforces that only subgraphs carry a
//! nested statement list.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single `key=value` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttrItem {
    pub key: String,
    pub value: String,
}

/// An ordered attribute list as written in source — duplicate keys and
/// original order are both preserved; deduplication only happens in the
/// resolver.
pub type AttrList = Vec<AttrItem>;

/// A materialized, deduplicated attribute set. Iteration order is
/// key-sorted, matching the resolver's "materialized attribute ordering"
/// contract.
pub type AttrMap = BTreeMap<String, String>;

/// The lexical operator of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeOp {
    /// `--`
    Undirected,
    /// `->`
    Directed,
}

impl EdgeOp {
    pub fn as_str(self) -> &'static str {
        match self {
            EdgeOp::Undirected => "--",
            EdgeOp::Directed => "->",
        }
    }
}

/// Whether a graph is `graph` (undirected) or `digraph` (directed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GraphType {
    Graph,
    Digraph,
}

impl GraphType {
    pub fn as_str(self) -> &'static str {
        match self {
            GraphType::Graph => "graph",
            GraphType::Digraph => "digraph",
        }
    }

    /// The edge operator this graph type requires.
    pub fn expected_edge_op(self) -> EdgeOp {
        match self {
            GraphType::Graph => EdgeOp::Undirected,
            GraphType::Digraph => EdgeOp::Directed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeStmt {
    pub name: String,
    pub attrs: AttrList,
}

/// One concrete edge within an edge-chain statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub src: String,
    pub op: EdgeOp,
    pub tgt: String,
}

/// An edge-chain statement. Every `Edge` in `edges` shares the chain's
/// single `op` by construction — the field lives here, not on `Edge`
/// itself — so a chain with internally inconsistent operators cannot be
/// represented (see DESIGN.md on mixed-operator chains).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeStmt {
    pub edges: Vec<Edge>,
    pub attrs: AttrList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttrDefaultKind {
    Graph,
    Node,
    Edge,
}

impl AttrDefaultKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AttrDefaultKind::Graph => "graph",
            AttrDefaultKind::Node => "node",
            AttrDefaultKind::Edge => "edge",
        }
    }
}

/// A `graph [...]` / `node [...]` / `edge [...]` default-attribute
/// statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttrDefault {
    pub kind: AttrDefaultKind,
    pub attrs: AttrList,
}

/// A single statement as written in the source, before scope resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RawStmt {
    AttrDefault(AttrDefault),
    /// A private `ID=ID` attribute, applying only to the enclosing
    /// (sub)graph, not inherited by nested subgraphs.
    AttrItem(AttrItem),
    Node(NodeStmt),
    Edge(EdgeStmt),
    Subgraph {
        name: Option<String>,
        statements: Vec<RawStmt>,
    },
}

/// The raw parse tree for a whole document, faithful to what was written
/// (subgraphs still nested, attributes not yet inherited).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawGraph {
    pub strict: bool,
    pub graph_type: GraphType,
    /// Empty for an anonymous top-level graph.
    pub name: String,
    pub statements: Vec<RawStmt>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedNode {
    pub name: String,
    pub attrs: AttrMap,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedEdge {
    pub edges: Vec<Edge>,
    pub attrs: AttrMap,
}

/// A statement after scope resolution: node and edge attributes are
/// fully materialized, and subgraphs are resolved recursively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolvedStmt {
    Node(ResolvedNode),
    Edge(ResolvedEdge),
    Subgraph(ResolvedGraph),
}

/// A fully resolved graph or subgraph: well-formedness has been checked
/// and every node/edge carries its materialized attribute set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedGraph {
    pub strict: bool,
    pub graph_type: GraphType,
    pub name: String,
    /// The concrete graph-scope attributes of *this* (sub)graph,
    /// including private ones set via a bare `ID=ID` statement.
    pub graph_attrs: AttrMap,
    pub statements: Vec<ResolvedStmt>,
}

/// A leaf statement surviving flatten — no subgraph envelopes remain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlatStmt {
    Node(ResolvedNode),
    Edge(ResolvedEdge),
}

/// The result of discarding subgraph structure from a `ResolvedGraph`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatGraph {
    pub strict: bool,
    pub graph_type: GraphType,
    pub statements: Vec<FlatStmt>,
}
