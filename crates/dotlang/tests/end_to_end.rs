//! End-to-end coverage of the parse → resolve → flatten pipeline against
//! the documented scenarios and universal properties.

use dotlang::{DotError, EdgeOp, RawStmt, ResolvedStmt, parse, parse_file, resolve};

fn node_attrs<'a>(g: &'a dotlang::ResolvedGraph, name: &str) -> &'a dotlang::AttrMap {
    g.statements
        .iter()
        .find_map(|s| match s {
            ResolvedStmt::Node(n) if n.name == name => Some(&n.attrs),
            _ => None,
        })
        .unwrap_or_else(|| panic!("node {name} not found"))
}

#[test]
fn s1_node_statement_pretty_print() {
    let g = parse("digraph { vertex [ color=red , shape=x;     loc=center size=15; ] }").unwrap();
    match &g.statements[0] {
        RawStmt::Node(n) => {
            let rendered: Vec<String> = n
                .attrs
                .iter()
                .map(|a| format!("{}={}", a.key, a.value))
                .collect();
            assert_eq!(rendered.join(", "), "color=red, shape=x, loc=center, size=15");
        }
        other => panic!("expected node stmt, got {other:?}"),
    }
}

#[test]
fn s2_edge_chain_with_groups() {
    let g = parse("graph { A -- { B, C } -- D }").unwrap();
    match &g.statements[0] {
        RawStmt::Edge(e) => {
            let pairs: Vec<(String, String)> = e
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
fn s3_directed_chain_with_attrs() {
    let g = parse("digraph { A->{B C}->D[size=5] }").unwrap();
    match &g.statements[0] {
        RawStmt::Edge(e) => {
            assert_eq!(e.edges.len(), 4);
            assert!(e.edges.iter().all(|edge| edge.op == EdgeOp::Directed));
            for edge in &e.edges {
                assert_eq!(edge.op.as_str(), "->");
            }
            assert_eq!(e.attrs.len(), 1);
            assert_eq!(e.attrs[0].key, "size");
            assert_eq!(e.attrs[0].value, "5");
        }
        other => panic!("expected edge stmt, got {other:?}"),
    }
}

#[test]
fn s4_attribute_inheritance_and_override() {
    let src = r#"
        graph Students {
          node [gender=male, age=21]
          Jack[age=19]
          Bob
          node [gender=female, age=21]
          Alice; Jessica
          edge [status="friendzoned"]
          Alice--Jack; Jack--Bob[status="BFF"]
        }
    "#;
    let raw = parse(src).unwrap();
    let resolved = resolve(&raw).unwrap();

    let jack = node_attrs(&resolved, "Jack");
    assert_eq!(jack.get("age"), Some(&"19".to_string()));
    assert_eq!(jack.get("gender"), Some(&"male".to_string()));

    let bob = node_attrs(&resolved, "Bob");
    assert_eq!(bob.get("age"), Some(&"21".to_string()));
    assert_eq!(bob.get("gender"), Some(&"male".to_string()));

    let alice = node_attrs(&resolved, "Alice");
    assert_eq!(alice.get("age"), Some(&"21".to_string()));
    assert_eq!(alice.get("gender"), Some(&"female".to_string()));

    let jessica = node_attrs(&resolved, "Jessica");
    assert_eq!(jessica.get("age"), Some(&"21".to_string()));
    assert_eq!(jessica.get("gender"), Some(&"female".to_string()));

    let edges: Vec<_> = resolved
        .statements
        .iter()
        .filter_map(|s| match s {
            ResolvedStmt::Edge(e) => Some(e),
            _ => None,
        })
        .collect();
    assert_eq!(edges.len(), 2);
    assert_eq!(edges[0].attrs.get("status"), Some(&"friendzoned".to_string()));
    assert_eq!(edges[1].attrs.get("status"), Some(&"BFF".to_string()));
}

#[test]
fn s5_resolver_rejects() {
    let cases: Vec<(&str, fn(&DotError) -> bool)> = vec![
        ("digraph {A; A;}", |e| matches!(e, DotError::RedefinedNode { .. })),
        (
            "digraph {A; B; subgraph{A;}}",
            |e| matches!(e, DotError::RedefinedNode { .. }),
        ),
        ("graph {A; A--B}", |e| matches!(e, DotError::UndefinedNode { .. })),
        (
            "graph {A; B; A->B}",
            |e| matches!(e, DotError::EdgeDirectionMismatch { .. }),
        ),
        (
            "digraph {A; B; A--B}",
            |e| matches!(e, DotError::EdgeDirectionMismatch { .. }),
        ),
        (
            "strict graph {A; B; A--B; A--B}",
            |e| matches!(e, DotError::DuplicateEdgeInStrict { .. }),
        ),
        (
            "strict digraph {A; B; {A A}->{B, B}}",
            |e| matches!(e, DotError::DuplicateEdgeInStrict { .. }),
        ),
    ];

    for (src, expected) in cases {
        let raw = parse(src).unwrap_or_else(|e| panic!("parse failed for {src:?}: {e}"));
        match resolve(&raw) {
            Err(err) => assert!(expected(&err), "unexpected error variant for {src:?}: {err}"),
            Ok(_) => panic!("expected resolve error for {src:?}"),
        }
    }
}

#[test]
fn s6_non_strict_tolerates_duplicates() {
    let raw = parse("graph {A; B; A--B; A--B}").unwrap();
    assert!(resolve(&raw).is_ok());

    let raw = parse("digraph {A; B; A->{B, B}}").unwrap();
    assert!(resolve(&raw).is_ok());
}

#[test]
fn s7_anonymous_subgraph_vs_node_group() {
    let g = parse("digraph { { A; B } }").unwrap();
    assert!(matches!(g.statements[0], RawStmt::Subgraph { .. }));

    let g = parse("digraph { A; B; { A B } -> C }").unwrap();
    match g.statements.last().unwrap() {
        RawStmt::Edge(e) => assert_eq!(e.edges.len(), 2),
        other => panic!("expected edge stmt, got {other:?}"),
    }

    let g = parse("digraph { A; B; C; C -> { A B } }").unwrap();
    match g.statements.last().unwrap() {
        RawStmt::Edge(e) => assert_eq!(e.edges.len(), 2),
        other => panic!("expected edge stmt, got {other:?}"),
    }
}

#[test]
fn property_chain_expansion_order_multi_group() {
    let g = parse("graph { { A B } -- { C D } -- E }").unwrap();
    match &g.statements[0] {
        RawStmt::Edge(e) => {
            let pairs: Vec<(String, String)> = e
                .edges
                .iter()
                .map(|edge| (edge.src.clone(), edge.tgt.clone()))
                .collect();
            assert_eq!(
                pairs,
                vec![
                    ("A".into(), "C".into()),
                    ("A".into(), "D".into()),
                    ("B".into(), "C".into()),
                    ("B".into(), "D".into()),
                    ("C".into(), "E".into()),
                    ("D".into(), "E".into()),
                ]
            );
        }
        other => panic!("expected edge stmt, got {other:?}"),
    }
}

#[test]
fn property_flatten_idempotence_matches_leaf_multiset() {
    let raw = parse("digraph { A; subgraph c { B; A -> B } }").unwrap();
    let resolved = resolve(&raw).unwrap();
    let flat = dotlang::flatten(&resolved);

    fn count_leaves(g: &dotlang::ResolvedGraph) -> usize {
        g.statements
            .iter()
            .map(|s| match s {
                ResolvedStmt::Subgraph(sub) => count_leaves(sub),
                _ => 1,
            })
            .sum()
    }

    assert_eq!(flat.statements.len(), count_leaves(&resolved));
}

#[test]
fn property_node_declaration_precedence() {
    let raw = parse("digraph { A; B; A -> B }").unwrap();
    let resolved = resolve(&raw).unwrap();
    let declared: std::collections::HashSet<&str> = resolved
        .statements
        .iter()
        .filter_map(|s| match s {
            ResolvedStmt::Node(n) => Some(n.name.as_str()),
            _ => None,
        })
        .collect();
    for stmt in &resolved.statements {
        if let ResolvedStmt::Edge(e) = stmt {
            for edge in &e.edges {
                assert!(declared.contains(edge.src.as_str()));
                assert!(declared.contains(edge.tgt.as_str()));
            }
        }
    }
}

#[test]
fn parse_file_roundtrip_and_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("students.dot");
    std::fs::write(&path, "graph Students { A; B; A--B }").unwrap();
    let g = parse_file(&path).unwrap();
    assert_eq!(g.name, "Students");

    let missing = parse_file(dir.path().join("does-not-exist.dot"));
    assert!(matches!(missing, Err(DotError::Io { .. })));
}
