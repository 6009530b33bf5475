//! Grammar layer: attribute items/lists, attribute-default statements,
//! node statements, edge chains, subgraph blocks, and the top-level
//! graph production.
//!
//! The hardest part of this grammar is statement-position disambiguation
//! (see [`classify_statement`]): three productions — attribute default,
//! attribute item, and node statement — all start with a bare identifier
//! and are told apart only by a bounded look-ahead for `=`, `[`, `--`, or
//! `->` before the next `;` or newline. That look-ahead is implemented as
//! a plain forward scan (`line_contains_before_boundary` /
//! `scan_eq_lookahead`), not a backtracking combinator, to keep parse
//! time linear and to honor the `ws`/`wsr` split documented in
//! `lexer.rs`.

use std::path::Path;

use winnow::combinator::alt;
use winnow::error::{ContextError, ErrMode};
use winnow::token::literal;
use winnow::{ModalResult, Parser};

use dotlang_types::DotError;

use crate::ast::*;
use crate::lexer::{is_keyword_at, name, ws, ws_consumed, wsr};

fn backtrack() -> ErrMode<ContextError> {
    ErrMode::Backtrack(ContextError::new())
}

/// Consumes `kw` if it appears at the front of `input` as a genuine
/// keyword (not as a prefix of a longer identifier).
fn keyword<'s>(kw: &'static str) -> impl FnMut(&mut &'s str) -> ModalResult<()> {
    move |input: &mut &'s str| {
        if is_keyword_at(input, kw) {
            *input = &input[kw.len()..];
            Ok(())
        } else {
            Err(backtrack())
        }
    }
}

fn peek_keyword(input: &str, kw: &str) -> bool {
    is_keyword_at(input, kw)
}

// ---------------------------------------------------------------------
// Bounded look-ahead helpers
// ---------------------------------------------------------------------

/// Returns the remainder of `s` just past a closing `"`, given `s` starts
/// with the opening `"`. Honors backslash escapes. Returns `""` if the
/// string never closes — the scan simply stops there, same as it would
/// hit end-of-input.
fn skip_quoted(s: &str) -> &str {
    let mut rest = &s[1..];
    loop {
        match rest.chars().next() {
            None => return "",
            Some('\\') => {
                rest = &rest[1..];
                match rest.chars().next() {
                    Some(c) => rest = &rest[c.len_utf8()..],
                    None => return "",
                }
            }
            Some('"') => return &rest[1..],
            Some(c) => rest = &rest[c.len_utf8()..],
        }
    }
}

/// Scans `input` up to (but not past) the first unquoted `;` or `\n` and
/// reports whether any of `needles` occurs before that boundary.
fn line_contains_before_boundary(input: &str, needles: &[&str]) -> bool {
    let mut rest = input;
    while let Some(c) = rest.chars().next() {
        match c {
            ';' | '\n' => return false,
            '"' => rest = skip_quoted(rest),
            _ => {
                if needles.iter().any(|n| rest.starts_with(n)) {
                    return true;
                }
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    false
}

enum EqLookahead {
    None,
    BracketThenEq,
    PlainEq,
}

/// Scans for `=` before the next unquoted `;`/`\n`, noting whether a `[`
/// appeared first (which marks an attribute-default's bracketed list
/// rather than a bare `ID=ID` item).
fn scan_eq_lookahead(input: &str) -> EqLookahead {
    let mut rest = input;
    let mut seen_bracket = false;
    while let Some(c) = rest.chars().next() {
        match c {
            ';' | '\n' => return EqLookahead::None,
            '"' => rest = skip_quoted(rest),
            '[' => {
                seen_bracket = true;
                rest = &rest[1..];
            }
            '=' => {
                return if seen_bracket {
                    EqLookahead::BracketThenEq
                } else {
                    EqLookahead::PlainEq
                };
            }
            _ => rest = &rest[c.len_utf8()..],
        }
    }
    EqLookahead::None
}

// ---------------------------------------------------------------------
// Attribute items and lists
// ---------------------------------------------------------------------

fn attr_item(input: &mut &str) -> ModalResult<AttrItem> {
    let key = name(input)?;
    ws(input)?;
    '='.parse_next(input)?;
    ws(input)?;
    let value = name(input)?;
    Ok(AttrItem { key, value })
}

/// `[` ws (attr_item sep?)* `]`, where `sep` is a `,`/`;` (with
/// surrounding ws) or a bare run of blanks.
fn attr_list_bracketed(input: &mut &str) -> ModalResult<AttrList> {
    '['.parse_next(input)?;
    ws(input)?;
    let mut items = Vec::new();
    loop {
        if input.starts_with(']') {
            break;
        }
        items.push(attr_item(input)?);
        let had_blank = ws_consumed(input)?;
        if input.starts_with(',') || input.starts_with(';') {
            *input = &input[1..];
            ws(input)?;
        } else if had_blank {
            continue;
        } else {
            break;
        }
    }
    ws(input)?;
    ']'.parse_next(input)?;
    Ok(items)
}

/// An attribute list, or the empty list if no `[` is present.
fn attr_list(input: &mut &str) -> ModalResult<AttrList> {
    ws(input)?;
    if input.starts_with('[') {
        attr_list_bracketed(input)
    } else {
        Ok(Vec::new())
    }
}

// ---------------------------------------------------------------------
// Node groups and edge chains
// ---------------------------------------------------------------------

/// `{` ws (name sep?)* `}`
fn node_group(input: &mut &str) -> ModalResult<Vec<String>> {
    '{'.parse_next(input)?;
    ws(input)?;
    let mut names = Vec::new();
    loop {
        if input.starts_with('}') {
            break;
        }
        names.push(name(input)?);
        let had_blank = ws_consumed(input)?;
        if input.starts_with(',') {
            *input = &input[1..];
            ws(input)?;
        } else if had_blank {
            continue;
        } else {
            break;
        }
    }
    ws(input)?;
    '}'.parse_next(input)?;
    Ok(names)
}

fn node_or_group(input: &mut &str) -> ModalResult<Vec<String>> {
    if input.starts_with('{') {
        node_group(input)
    } else {
        name(input).map(|n| vec![n])
    }
}

fn edge_op(input: &mut &str) -> ModalResult<EdgeOp> {
    alt((
        literal("--").value(EdgeOp::Undirected),
        literal("->").value(EdgeOp::Directed),
    ))
    .parse_next(input)
}

/// Cartesian chain expansion: for each adjacent pair of groups, every
/// `src` in the first crossed with every `tgt` in the second, outer loop
/// over src, inner over tgt, groups visited left to right. This order is
/// a public contract (see spec scenarios S2/S3).
fn expand_chain(groups: &[Vec<String>], op: EdgeOp) -> Vec<Edge> {
    let mut edges = Vec::new();
    for pair in groups.windows(2) {
        for src in &pair[0] {
            for tgt in &pair[1] {
                edges.push(Edge {
                    src: src.clone(),
                    op,
                    tgt: tgt.clone(),
                });
            }
        }
    }
    edges
}

/// `node_or_group ws op (ws node_or_group ws op)* ws node_or_group ws attr_list`.
///
/// Only the *first* operator is kept — it is stamped onto every emitted
/// edge, per `EdgeStmt`'s single shared `op` field. Any further `--`/`->`
/// between later groups is consumed as a separator only; its lexical
/// value does not affect the output (see DESIGN.md on mixed-operator
/// chains, grounded in the original grammar's `edge_stmt` callback).
fn edge_stmt(input: &mut &str) -> ModalResult<EdgeStmt> {
    let head = node_or_group(input)?;
    ws(input)?;
    let op = edge_op(input)?;
    let mut groups = vec![head];
    loop {
        ws(input)?;
        groups.push(node_or_group(input)?);
        ws(input)?;
        if input.starts_with("--") || input.starts_with("->") {
            let _ = edge_op(input)?;
            continue;
        }
        break;
    }
    let attrs = attr_list(input)?;
    Ok(EdgeStmt {
        edges: expand_chain(&groups, op),
        attrs,
    })
}

// ---------------------------------------------------------------------
// Node statements and attribute defaults
// ---------------------------------------------------------------------

fn node_stmt(input: &mut &str) -> ModalResult<NodeStmt> {
    let name = name(input)?;
    let attrs = attr_list(input)?;
    Ok(NodeStmt { name, attrs })
}

fn attr_default_stmt(input: &mut &str) -> ModalResult<AttrDefault> {
    let kind = alt((
        keyword("graph").value(AttrDefaultKind::Graph),
        keyword("node").value(AttrDefaultKind::Node),
        keyword("edge").value(AttrDefaultKind::Edge),
    ))
    .parse_next(input)?;
    let attrs = attr_list(input)?;
    Ok(AttrDefault { kind, attrs })
}

// ---------------------------------------------------------------------
// Subgraphs and statement lists
// ---------------------------------------------------------------------

fn subgraph_stmt(input: &mut &str) -> ModalResult<RawStmt> {
    keyword("subgraph").parse_next(input)?;
    wsr(input)?;
    let sub_name = if input.starts_with('{') {
        None
    } else {
        let n = name(input)?;
        wsr(input)?;
        Some(n)
    };
    let statements = statement_list(input)?;
    Ok(RawStmt::Subgraph {
        name: sub_name,
        statements,
    })
}

/// The statement-position disambiguation procedure: subgraph keyword,
/// then a bounded look-ahead for an edge operator, then a bounded
/// look-ahead for `=` (further split on whether `[` precedes it — and,
/// if it does, on whether the leading token is actually one of the
/// `graph`/`node`/`edge` keywords, since a plain node name followed by a
/// bracketed attribute list, e.g. `vertex [color=red]`, also has a `[`
/// before its first `=`), and finally a bare node statement.
fn classify_statement(input: &mut &str) -> ModalResult<RawStmt> {
    if peek_keyword(input, "subgraph") {
        return subgraph_stmt(input);
    }
    if line_contains_before_boundary(input, &["--", "->"]) {
        return edge_stmt(input).map(RawStmt::Edge);
    }
    match scan_eq_lookahead(input) {
        EqLookahead::BracketThenEq => {
            if peek_keyword(input, "graph")
                || peek_keyword(input, "node")
                || peek_keyword(input, "edge")
            {
                attr_default_stmt(input).map(RawStmt::AttrDefault)
            } else {
                node_stmt(input).map(RawStmt::Node)
            }
        }
        EqLookahead::PlainEq => attr_item(input).map(RawStmt::AttrItem),
        EqLookahead::None => node_stmt(input).map(RawStmt::Node),
    }
}

/// `{` wsr (statement sep)* `}`, where `sep` is `;`, a newline, or a line
/// comment, trailing separator permitted.
fn statement_list(input: &mut &str) -> ModalResult<Vec<RawStmt>> {
    '{'.parse_next(input)?;
    wsr(input)?;
    let mut statements = Vec::new();
    loop {
        if input.starts_with('}') {
            break;
        }
        statements.push(classify_statement(input)?);
        wsr(input)?;
        if input.starts_with(';') {
            *input = &input[1..];
            wsr(input)?;
        }
        if input.starts_with('}') {
            break;
        }
    }
    '}'.parse_next(input)?;
    Ok(statements)
}

// ---------------------------------------------------------------------
// Top level
// ---------------------------------------------------------------------

fn graph_type(input: &mut &str) -> ModalResult<GraphType> {
    alt((
        keyword("digraph").value(GraphType::Digraph),
        keyword("graph").value(GraphType::Graph),
    ))
    .parse_next(input)
}

fn dot_graph(input: &mut &str) -> ModalResult<RawGraph> {
    wsr(input)?;
    let strict = if peek_keyword(input, "strict") {
        keyword("strict").parse_next(input)?;
        wsr(input)?;
        true
    } else {
        false
    };
    let graph_type = graph_type(input)?;
    wsr(input)?;
    let name = if input.starts_with('{') {
        String::new()
    } else {
        let n = name(input)?;
        wsr(input)?;
        n
    };
    let statements = statement_list(input)?;
    Ok(RawGraph {
        strict,
        graph_type,
        name,
        statements,
    })
}

fn offset_to_line_col(original: &str, consumed: usize) -> (usize, usize) {
    let consumed = consumed.min(original.len());
    let prefix = &original[..consumed];
    let line = prefix.matches('\n').count() + 1;
    let col = match prefix.rfind('\n') {
        Some(pos) => consumed - pos,
        None => consumed + 1,
    };
    (line, col)
}

/// Parses `input` as a complete DOT document.
pub fn parse(input: &str) -> Result<RawGraph, DotError> {
    let mut remaining = input;
    match dot_graph(&mut remaining) {
        Ok(graph) => {
            let _ = wsr(&mut remaining);
            if !remaining.is_empty() {
                let consumed = input.len() - remaining.len();
                let (line, col) = offset_to_line_col(input, consumed);
                let snippet: String = remaining.chars().take(20).collect();
                return Err(DotError::Parse {
                    line,
                    col,
                    message: format!("unexpected trailing input near {snippet:?}"),
                });
            }
            Ok(graph)
        }
        Err(e) => {
            let consumed = input.len() - remaining.len();
            let (line, col) = offset_to_line_col(input, consumed);
            Err(DotError::Parse {
                line,
                col,
                message: e.to_string(),
            })
        }
    }
}

/// Reads `path` and parses its contents as a DOT document. I/O failures
/// (file not found, permission denied, or any other OS error) are
/// surfaced as `DotError::Io`, distinguishable via `source.kind()`.
pub fn parse_file(path: impl AsRef<Path>) -> Result<RawGraph, DotError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| DotError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_digraph() {
        let g = parse("digraph { A -> B }").unwrap();
        assert!(!g.strict);
        assert_eq!(g.graph_type, GraphType::Digraph);
        assert_eq!(g.statements.len(), 1);
    }

    #[test]
    fn parses_strict_named_graph() {
        let g = parse("strict graph Students { A }").unwrap();
        assert!(g.strict);
        assert_eq!(g.graph_type, GraphType::Graph);
        assert_eq!(g.name, "Students");
    }

    #[test]
    fn node_statement_attrs_preserve_source_order() {
        let input = "digraph { vertex [ color=red , shape=x;     loc=center size=15; ] }";
        let g = parse(input).unwrap();
        match &g.statements[0] {
            RawStmt::Node(n) => {
                let keys: Vec<_> = n.attrs.iter().map(|a| a.key.as_str()).collect();
                assert_eq!(keys, vec!["color", "shape", "loc", "size"]);
            }
            other => panic!("expected node stmt, got {other:?}"),
        }
    }

    #[test]
    fn edge_chain_with_groups_expands_in_order() {
        let g = parse("digraph { A -- { B, C } -- D }").unwrap();
        match &g.statements[0] {
            RawStmt::Edge(e) => {
                let pairs: Vec<_> = e
                    .edges
                    .iter()
                    .map(|edge| (edge.src.clone(), edge.tgt.clone()))
                    .collect();
                assert_eq!(
                    pairs,
                    vec![
                        ("A".into(), "B".into()),
                        ("A".into(), "C".into()),
                        ("B".into(), "D".into()),
                        ("C".into(), "D".into()),
                    ]
                );
            }
            other => panic!("expected edge stmt, got {other:?}"),
        }
    }

    #[test]
    fn directed_chain_with_attrs_applies_to_every_edge() {
        let g = parse("digraph { A->{B C}->D[size=5] }").unwrap();
        match &g.statements[0] {
            RawStmt::Edge(e) => {
                assert_eq!(e.edges.len(), 4);
                assert!(e.edges.iter().all(|edge| edge.op == EdgeOp::Directed));
                assert_eq!(e.attrs, vec![AttrItem { key: "size".into(), value: "5".into() }]);
            }
            other => panic!("expected edge stmt, got {other:?}"),
        }
    }

    #[test]
    fn private_attr_item_vs_attr_default_disambiguation() {
        let g = parse("digraph { label = \"My Graph\" }").unwrap();
        assert!(matches!(g.statements[0], RawStmt::AttrItem(_)));

        let g = parse("digraph { graph [rankdir=LR] }").unwrap();
        assert!(matches!(g.statements[0], RawStmt::AttrDefault(_)));
    }

    #[test]
    fn node_group_without_subgraph_keyword_is_edge_head() {
        let g = parse("digraph { A; B; { A B } -> C }").unwrap();
        match g.statements.last().unwrap() {
            RawStmt::Edge(e) => assert_eq!(e.edges.len(), 2),
            other => panic!("expected edge stmt, got {other:?}"),
        }
    }

    #[test]
    fn anonymous_subgraph_requires_keyword() {
        let g = parse("digraph { subgraph { A; B } }").unwrap();
        assert!(matches!(g.statements[0], RawStmt::Subgraph { name: None, .. }));
    }

    #[test]
    fn nested_named_subgraph() {
        let g = parse("digraph { subgraph cluster_0 { A -> B } }").unwrap();
        match &g.statements[0] {
            RawStmt::Subgraph { name, statements } => {
                assert_eq!(name.as_deref(), Some("cluster_0"));
                assert_eq!(statements.len(), 1);
            }
            other => panic!("expected subgraph, got {other:?}"),
        }
    }

    #[test]
    fn quoted_identifiers_with_spaces() {
        let g = parse(r#"digraph { "node one" -> "node two" }"#).unwrap();
        match &g.statements[0] {
            RawStmt::Edge(e) => {
                assert_eq!(e.edges[0].src, "node one");
                assert_eq!(e.edges[0].tgt, "node two");
            }
            other => panic!("expected edge stmt, got {other:?}"),
        }
    }

    #[test]
    fn block_comment_inside_statement_does_not_cross_lookahead() {
        let g = parse("digraph { A /* x */ -> B }").unwrap();
        assert!(matches!(g.statements[0], RawStmt::Edge(_)));
    }

    #[test]
    fn line_comment_and_semicolons_are_optional_separators() {
        let input = "digraph {\n  A // a node\n  B\n  A -> B\n}";
        let g = parse(input).unwrap();
        assert_eq!(g.statements.len(), 3);
    }

    #[test]
    fn parse_file_reports_io_error() {
        let result = parse_file("/nonexistent/path/to/nowhere.dot");
        assert!(matches!(result, Err(DotError::Io { .. })));
    }

    #[test]
    fn parse_file_reads_real_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("g.dot");
        std::fs::write(&path, "digraph { A -> B }").unwrap();
        let g = parse_file(&path).unwrap();
        assert_eq!(g.statements.len(), 1);
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(parse("not a graph at all").is_err());
    }
}
