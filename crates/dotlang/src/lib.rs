//! Parser, scope-inheritance resolver, and flattener for the Graphviz
//! DOT graph-description language.
//!
//! The pipeline is three stages, each with its own tree type:
//!
//! 1. [`parse`] turns source text into a [`RawGraph`] — faithful to what
//!    was written, subgraphs still nested, attributes not yet inherited.
//! 2. [`resolve`] turns a `RawGraph` into a [`ResolvedGraph`] — checks
//!    well-formedness (no redefined nodes, no undefined edge endpoints,
//!    edge direction matches the graph type, no duplicate edges in a
//!    `strict` graph) and materializes every node/edge's attribute set
//!    against the `graph`/`node`/`edge` defaults in scope.
//! 3. [`flatten`] turns a `ResolvedGraph` into a [`FlatGraph`] — discards
//!    subgraph structure, keeping only the flat sequence of nodes and
//!    edges.

pub mod ast;
mod flatten;
mod lexer;
mod parser;
mod render;
mod resolver;

pub use ast::{
    AttrDefault, AttrDefaultKind, AttrItem, AttrList, AttrMap, Edge, EdgeOp, EdgeStmt, FlatGraph,
    FlatStmt, GraphType, NodeStmt, RawGraph, RawStmt, ResolvedEdge, ResolvedGraph, ResolvedNode,
    ResolvedStmt,
};
pub use dotlang_types::{DotError, Result};
pub use flatten::{FlattenNotice, flatten, flatten_with};
pub use parser::{parse, parse_file};
pub use resolver::resolve;
