//! Canonical textual rendering of raw and resolved graphs.
//!
//! Raw rendering preserves attribute order exactly as written — no
//! sorting, no deduplication — since it mirrors source, not a resolved
//! view. Resolved rendering iterates `AttrMap`'s `BTreeMap`, so attrs
//! always print key-sorted, and each (sub)graph level gets an explicit
//! `[<sorted graph_attrs>]` line that raw rendering never has, since raw
//! graphs carry no materialized `graph_attrs` field at all.

use std::fmt;

use crate::ast::*;

fn write_attr_list(f: &mut fmt::Formatter<'_>, attrs: &[AttrItem]) -> fmt::Result {
    if attrs.is_empty() {
        return Ok(());
    }
    write!(f, " [")?;
    for (i, item) in attrs.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}={}", item.key, item.value)?;
    }
    write!(f, "]")
}

fn write_attr_map(f: &mut fmt::Formatter<'_>, attrs: &AttrMap) -> fmt::Result {
    if attrs.is_empty() {
        return Ok(());
    }
    write!(f, " [")?;
    for (i, (key, value)) in attrs.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{key}={value}")?;
    }
    write!(f, "]")
}

fn indent(f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
    write!(f, "{}", "  ".repeat(depth))
}

fn render_raw_stmt(f: &mut fmt::Formatter<'_>, stmt: &RawStmt, depth: usize) -> fmt::Result {
    indent(f, depth)?;
    match stmt {
        RawStmt::AttrItem(item) => writeln!(f, "{}={}", item.key, item.value),
        RawStmt::AttrDefault(d) => {
            write!(f, "{}", d.kind.as_str())?;
            write_attr_list(f, &d.attrs)?;
            writeln!(f)
        }
        RawStmt::Node(n) => {
            write!(f, "{}", n.name)?;
            write_attr_list(f, &n.attrs)?;
            writeln!(f)
        }
        RawStmt::Edge(e) => {
            for (i, edge) in e.edges.iter().enumerate() {
                if i > 0 {
                    write!(f, " {} ", edge.op.as_str())?;
                } else {
                    write!(f, "{} {} ", edge.src, edge.op.as_str())?;
                }
                write!(f, "{}", edge.tgt)?;
            }
            write_attr_list(f, &e.attrs)?;
            writeln!(f)
        }
        RawStmt::Subgraph { name, statements } => {
            match name {
                Some(n) => writeln!(f, "subgraph {n} {{")?,
                None => writeln!(f, "subgraph {{")?,
            }
            for stmt in statements {
                render_raw_stmt(f, stmt, depth + 1)?;
            }
            indent(f, depth)?;
            writeln!(f, "}}")
        }
    }
}

impl fmt::Display for RawGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.strict {
            write!(f, "strict ")?;
        }
        write!(f, "{}", self.graph_type.as_str())?;
        if !self.name.is_empty() {
            write!(f, " {}", self.name)?;
        }
        writeln!(f, " {{")?;
        for stmt in &self.statements {
            render_raw_stmt(f, stmt, 1)?;
        }
        writeln!(f, "}}")
    }
}

fn render_resolved_stmt(
    f: &mut fmt::Formatter<'_>,
    stmt: &ResolvedStmt,
    depth: usize,
) -> fmt::Result {
    indent(f, depth)?;
    match stmt {
        ResolvedStmt::Node(n) => {
            write!(f, "{}", n.name)?;
            write_attr_map(f, &n.attrs)?;
            writeln!(f)
        }
        ResolvedStmt::Edge(e) => {
            for (i, edge) in e.edges.iter().enumerate() {
                if i > 0 {
                    write!(f, " {} ", edge.op.as_str())?;
                } else {
                    write!(f, "{} {} ", edge.src, edge.op.as_str())?;
                }
                write!(f, "{}", edge.tgt)?;
            }
            write_attr_map(f, &e.attrs)?;
            writeln!(f)
        }
        ResolvedStmt::Subgraph(sub) => render_resolved_graph(f, sub, depth),
    }
}

fn render_resolved_graph(f: &mut fmt::Formatter<'_>, g: &ResolvedGraph, depth: usize) -> fmt::Result {
    indent(f, depth)?;
    if g.name.is_empty() {
        write!(f, "subgraph")?;
    } else {
        write!(f, "subgraph {}", g.name)?;
    }
    write_attr_map(f, &g.graph_attrs)?;
    writeln!(f, " {{")?;
    for stmt in &g.statements {
        render_resolved_stmt(f, stmt, depth + 1)?;
    }
    indent(f, depth)?;
    writeln!(f, "}}")
}

impl fmt::Display for ResolvedGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.strict {
            write!(f, "strict ")?;
        }
        write!(f, "{}", self.graph_type.as_str())?;
        if !self.name.is_empty() {
            write!(f, " {}", self.name)?;
        }
        write_attr_map(f, &self.graph_attrs)?;
        writeln!(f, " {{")?;
        for stmt in &self.statements {
            render_resolved_stmt(f, stmt, 1)?;
        }
        writeln!(f, "}}")
    }
}
