use graphgrammar::{
    Edge, Grammar, GrammarConfig, GrammarDocument, GrammarError, Graph, Node, NodeId, Rule, RuleKind, RuleMatch,
    symbol_labels,
};
use tempfile::TempDir;

const ROBOT: &str = r#"{
    "terminal_symbols": ["arm", "leg", "joint"],
    "non_terminal_symbols": ["Body", "Limb"],
    "start_symbol": { "name": "Body", "color": "grey" },
    "production_rules": [
        {
            "name": "split",
            "nt": { "name": "Body" },
            "graph": {
                "base": "joint",
                "nodes": [ { "id": "l", "name": "Limb" }, { "id": "r", "name": "Limb" } ],
                "edges": [
                    { "id": "e1", "from": "base", "to": "l", "name": "joint" },
                    { "id": "e2", "from": "base", "to": "r" }
                ]
            }
        },
        {
            "name": "arm",
            "agraph": {
                "anodes": [ { "id": "x" } ],
                "nodes": [ { "id": "b", "name": "Limb" } ],
                "edges": [ { "id": "e1", "from": "x", "to": "b" } ]
            },
            "graph": {
                "nodes": [ { "id": "a", "name": "arm", "length": "2" } ],
                "edges": [ { "id": "e1", "from": "x", "to": "a" } ]
            }
        },
        {
            "name": "leg",
            "wgraph": {
                "wnodes": [ { "id": "w" } ],
                "nodes": [ { "id": "b", "name": "Limb" } ],
                "edges": [ { "id": "e1", "from": "w", "to": "b" } ]
            },
            "graph": {
                "nodes": [ { "id": "g", "name": "leg" } ],
                "edges": [ { "id": "e1", "from": "w", "to": "g" } ]
            }
        }
    ]
}"#;

fn robot() -> Grammar {
    Grammar::from_json_str(ROBOT).unwrap()
}

fn load_err(json: &str) -> GrammarError {
    Grammar::from_json_str(json).unwrap_err()
}

/// Minimal document around the given rule list.
fn with_rules(rules: &str) -> String {
    format!(
        r#"{{ "terminal_symbols": ["t"], "non_terminal_symbols": ["S"], "production_rules": {rules} }}"#
    )
}

#[test]
fn loads_symbols_start_and_rules() {
    let grammar = robot();
    assert!(grammar.is_terminal_symbol("arm"));
    assert!(grammar.is_terminal_symbol(""));
    assert!(grammar.is_non_terminal_symbol("Limb"));
    assert_eq!(grammar.start_symbol(), Some("Body"));
    let base = grammar.start_graph().unwrap().node(&NodeId::base()).unwrap();
    assert_eq!(base.label("color"), Some("grey"));

    assert_eq!(grammar.rules().len(), 3);
    assert_eq!(grammar.rule("split").unwrap().kind(), RuleKind::ContextFree);
    assert_eq!(grammar.rule("arm").unwrap().kind(), RuleKind::Anchor);
    assert_eq!(grammar.rule("leg").unwrap().kind(), RuleKind::Wildcard);
}

#[test]
fn replacement_graphs_inherit_exotic_nodes() {
    let grammar = robot();
    let Some(Rule::Anchor(arm)) = grammar.rule("arm") else {
        panic!("arm is an anchor rule");
    };
    assert!(arm.rhs().is_exotic(&NodeId::from("x")));
    assert!(arm.rhs().contains_edge(&NodeId::from("x"), &NodeId::from("a")));
    let added = arm.rhs().node(&NodeId::from("a")).unwrap();
    assert_eq!(added.label("length"), Some("2"));
}

#[test]
fn json_round_trip_preserves_the_grammar() {
    let grammar = robot();
    let terminals = GrammarDocument::from_grammar(&grammar).unwrap().terminal_symbols.unwrap();
    assert_eq!(terminals, vec!["arm", "joint", "leg"]);

    let json = grammar.to_json_string().unwrap();
    let reloaded = Grammar::from_json_str(&json).unwrap();
    assert_eq!(reloaded, grammar);
}

#[test]
fn emitted_edges_get_ids() {
    let mut grammar = Grammar::new();
    grammar.define_terminal_symbol("t").unwrap();
    grammar.define_non_terminal_symbol("S").unwrap();
    let mut rhs = Graph::new();
    rhs.add_symbol_node("base", "t");
    rhs.add_symbol_node("n", "S");
    rhs.add_edge(Edge::with_symbol("base", "n", "")).unwrap();
    grammar.add_rule(Rule::context_free("grow", "S", rhs).unwrap()).unwrap();

    let document = GrammarDocument::from_grammar(&grammar).unwrap();
    let rules = document.production_rules.as_ref().unwrap();
    let edge = &rules[0].graph.as_ref().unwrap().edges[0];
    assert_eq!(edge.id, Some(NodeId::from("e1")));

    let reloaded = document.to_grammar(&GrammarConfig::default()).unwrap();
    assert_eq!(reloaded, grammar);
}

/// S -> base(t) with a child n(S) carrying the given labels, reached over
/// an edge carrying `edge_labels`.
fn labelled_grammar(node_labels: &[(&str, &str)], edge_labels: &[(&str, &str)]) -> Grammar {
    let mut grammar = Grammar::new();
    grammar.define_terminal_symbol("t").unwrap();
    grammar.define_non_terminal_symbol("S").unwrap();
    let mut labels = symbol_labels("S");
    labels.extend(node_labels.iter().map(|(k, v)| (k.to_string(), v.to_string())));
    let mut edge = symbol_labels("");
    edge.extend(edge_labels.iter().map(|(k, v)| (k.to_string(), v.to_string())));

    let mut rhs = Graph::new();
    rhs.add_symbol_node("base", "t");
    rhs.add_node(Node::new("n", labels));
    rhs.add_edge(Edge::new("base", "n", edge)).unwrap();
    grammar.add_rule(Rule::context_free("grow", "S", rhs).unwrap()).unwrap();
    grammar
}

#[test]
fn labels_clashing_with_element_keys_are_not_emitted() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("clash.json");

    let grammar = labelled_grammar(&[("id", "joint-7")], &[]);
    let err = grammar.to_json_string().unwrap_err();
    assert!(matches!(err, GrammarError::InvalidDocument(_)));
    let err = grammar.save_grammar(&path).unwrap_err();
    assert!(matches!(err, GrammarError::InvalidDocument(_)));
    assert!(!path.exists());

    for key in ["id", "from", "to"] {
        let grammar = labelled_grammar(&[], &[(key, "elsewhere")]);
        let err = GrammarDocument::from_grammar(&grammar).unwrap_err();
        assert!(matches!(err, GrammarError::InvalidDocument(_)));
    }
}

#[test]
fn free_labels_survive_a_reload() {
    let grammar = labelled_grammar(&[("from", "left"), ("length", "2")], &[("weight", "3")]);
    let json = grammar.to_json_string().unwrap();
    assert_eq!(Grammar::from_json_str(&json).unwrap(), grammar);
}

#[test]
fn save_and_load_through_a_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("robot.json");
    let grammar = robot();
    grammar.save_grammar(&path).unwrap();
    assert_eq!(Grammar::load_grammar(&path).unwrap(), grammar);

    let missing = dir.path().join("absent.json");
    assert!(matches!(Grammar::load_grammar(&missing), Err(GrammarError::Io(_))));

    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(Grammar::load_grammar(&path), Err(GrammarError::Serialization(_))));
}

#[test]
fn start_graph_form() {
    let grammar = Grammar::from_json_str(
        r#"{
            "terminal_symbols": ["t"],
            "non_terminal_symbols": ["S"],
            "start_graph": [ {
                "nodes": [ { "id": 1, "name": "S" }, { "id": 2, "name": "t" } ],
                "edges": [ { "id": "e", "from": 1, "to": 2 } ]
            } ],
            "production_rules": []
        }"#,
    )
    .unwrap();
    assert!(grammar.start_symbol().is_none());
    let start = grammar.start_graph().unwrap();
    assert!(start.contains_edge(&NodeId::Num(1), &NodeId::Num(2)));
    assert!(!start.contains_node(&NodeId::from("1")));
}

#[test]
fn both_start_forms_are_rejected() {
    let err = load_err(
        r#"{
            "terminal_symbols": [], "non_terminal_symbols": ["S"],
            "start_symbol": { "name": "S" },
            "start_graph": [ { "nodes": [ { "id": "a", "name": "S" } ] } ],
            "production_rules": []
        }"#,
    );
    assert!(matches!(err, GrammarError::InvalidDocument(_)));

    let err = load_err(
        r#"{
            "terminal_symbols": [], "non_terminal_symbols": ["S"],
            "start_graph": [ {}, {} ],
            "production_rules": []
        }"#,
    );
    assert!(matches!(err, GrammarError::InvalidDocument(_)));
}

#[test]
fn nameless_start_symbol_leaves_no_start_graph() {
    let grammar = Grammar::from_json_str(
        r#"{ "terminal_symbols": [], "non_terminal_symbols": [], "start_symbol": {}, "production_rules": [] }"#,
    )
    .unwrap();
    assert!(grammar.start_graph().is_none());
}

#[test]
fn missing_sections_are_reported() {
    let err = load_err(r#"{ "terminal_symbols": [], "non_terminal_symbols": [] }"#);
    assert!(matches!(err, GrammarError::MissingElement(_)));
    let err = load_err(r#"{ "non_terminal_symbols": [], "production_rules": [] }"#);
    assert!(matches!(err, GrammarError::MissingElement(_)));

    let err = load_err(&with_rules(r#"[ { "name": "r", "nt": { "name": "S" } } ]"#));
    assert!(matches!(err, GrammarError::MissingElement(_)));
}

#[test]
fn missing_attributes_are_reported() {
    let cases = [
        r#"[ { "nt": { "name": "S" }, "graph": { "base": "t" } } ]"#,
        r#"[ { "name": "r", "nt": { "name": "S" }, "graph": { "nodes": [ { "id": "n", "name": "t" } ] } } ]"#,
        r#"[ { "name": "r", "nt": { "name": "S" }, "graph": { "base": "t", "nodes": [ { "name": "t" } ] } } ]"#,
        r#"[ { "name": "r", "nt": { "name": "S" }, "graph": { "base": "t", "edges": [ { "from": "base", "to": "base" } ] } } ]"#,
        r#"[ { "name": "r", "nt": { "name": "S" }, "graph": { "base": "t", "edges": [ { "id": "e", "to": "base" } ] } } ]"#,
        r#"[ { "name": "r", "nt": { "name": "S" }, "graph": { "base": "t", "edges": [ { "id": "e", "from": "base" } ] } } ]"#,
        r#"[ { "name": "r", "agraph": { "anodes": [ {} ] }, "graph": {} } ]"#,
    ];
    for rules in cases {
        let err = load_err(&with_rules(rules));
        assert!(matches!(err, GrammarError::MissingAttribute(_)), "{rules}: {err}");
    }
}

#[test]
fn duplicates_are_reported() {
    let cases = [
        r#"[ { "name": "r", "nt": { "name": "S" }, "graph": { "base": "t",
             "nodes": [ { "id": "n", "name": "t" }, { "id": "n", "name": "S" } ] } } ]"#,
        r#"[ { "name": "r", "nt": { "name": "S" }, "graph": { "base": "t",
             "nodes": [ { "id": "n", "name": "t" }, { "id": "m", "name": "t" } ],
             "edges": [ { "id": "e", "from": "base", "to": "n" }, { "id": "e", "from": "base", "to": "m" } ] } } ]"#,
        r#"[ { "name": "r", "nt": { "name": "S" }, "graph": { "base": "t",
             "nodes": [ { "id": "n", "name": "t" } ],
             "edges": [ { "id": "e", "from": "base", "to": "n" }, { "id": "f", "from": "base", "to": "n" } ] } } ]"#,
        r#"[ { "name": "r", "nt": { "name": "S" }, "graph": { "base": "t" } },
           { "name": "r", "nt": { "name": "S" }, "graph": { "base": "S" } } ]"#,
        r#"[ { "name": "r", "agraph": { "anodes": [ { "id": "x" }, { "id": "x" } ] }, "graph": {} } ]"#,
    ];
    for rules in cases {
        let err = load_err(&with_rules(rules));
        assert!(matches!(err, GrammarError::DuplicateId(_)), "{rules}: {err}");
    }
}

#[test]
fn rule_kinds_outside_the_config_are_unsupported() {
    let anchor = r#"[ { "name": "r",
        "agraph": { "anodes": [ { "id": "x" } ], "nodes": [ { "id": "b", "name": "S" } ],
                    "edges": [ { "id": "e", "from": "x", "to": "b" } ] },
        "graph": { "nodes": [ { "id": "c", "name": "t" } ] } } ]"#;
    let json = with_rules(anchor);
    assert!(Grammar::from_json_str(&json).is_ok());

    let err = Grammar::from_json_str_with(&json, &GrammarConfig::context_free_only()).unwrap_err();
    assert!(matches!(err, GrammarError::UnsupportedRule(_)));

    let err = load_err(&with_rules(r#"[ { "name": "r", "graph": { "base": "t" } } ]"#));
    assert!(matches!(err, GrammarError::UnsupportedRule(_)));
}

#[test]
fn rule_kind_priority_follows_the_config_order() {
    let both = with_rules(
        r#"[ { "name": "r", "nt": { "name": "S" },
              "wgraph": { "nodes": [ { "id": "b", "name": "S" } ] },
              "graph": { "base": "t" } } ]"#,
    );
    let grammar = Grammar::from_json_str(&both).unwrap();
    assert_eq!(grammar.rule("r").unwrap().kind(), RuleKind::ContextFree);

    let config = GrammarConfig::with_rule_kinds([RuleKind::Wildcard, RuleKind::ContextFree]);
    let grammar = Grammar::from_json_str_with(&both, &config).unwrap();
    assert_eq!(grammar.rule("r").unwrap().kind(), RuleKind::Wildcard);
}

#[test]
fn foreign_exotic_tags_are_type_mismatches() {
    let err = load_err(&with_rules(
        r#"[ { "name": "r", "agraph": { "wnodes": [ { "id": "w" } ] }, "graph": {} } ]"#,
    ));
    assert!(matches!(err, GrammarError::TypeMismatch(_)));

    let err = load_err(&with_rules(
        r#"[ { "name": "r", "nt": { "name": "S" }, "graph": { "base": "t", "anodes": [ { "id": "x" } ] } } ]"#,
    ));
    assert!(matches!(err, GrammarError::TypeMismatch(_)));
}

#[test]
fn vocabulary_is_enforced_while_loading() {
    let err = load_err(&with_rules(
        r#"[ { "name": "r", "nt": { "name": "S" }, "graph": { "base": "nowhere" } } ]"#,
    ));
    assert!(matches!(err, GrammarError::VocabularyViolation(_)));

    let err = load_err(
        r#"{ "terminal_symbols": ["x"], "non_terminal_symbols": ["x"], "production_rules": [] }"#,
    );
    assert!(matches!(err, GrammarError::SymbolDefinitionConflict(_)));
}

#[test]
fn loaded_grammar_drives_a_rewrite() {
    let grammar = robot();
    let mut graph = grammar.start_graph().unwrap().clone();
    let applicable = grammar.applicable_rules(&graph);
    assert_eq!(applicable.keys().collect::<Vec<_>>(), vec!["split"]);
    assert_eq!(applicable["split"], vec![RuleMatch::Node(NodeId::base())]);

    let mut next = 0u64;
    let mut generate = |_: &NodeId| {
        next += 1;
        NodeId::Num(next)
    };
    grammar
        .apply_rule("split", &applicable["split"][0], &mut graph, &mut generate)
        .unwrap();
    assert_eq!(graph.node_count(), 3);

    let applicable = grammar.applicable_rules(&graph);
    assert_eq!(applicable["arm"].len(), 2);
    assert_eq!(applicable["leg"].len(), 2);
}
