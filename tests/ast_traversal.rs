//! Tree consumer contract tests
//!
//! External tooling sees the tree only through `AstNode`, `Visitor`, and
//! `find_nodes_at_position`; these tests exercise that surface the way an
//! outline or hover provider would.

use clarion_parser::clarion::ast::elements::{
    ButtonDefinition, QueueBlock, WindowDefinition,
};
use clarion_parser::clarion::ast::{find_nodes_at_position, AstNode, Position, Visitor};
use clarion_parser::{parse_declarations, parse_program};

#[derive(Default)]
struct OutlineCollector {
    entries: Vec<(usize, String)>,
    depth: usize,
}

impl Visitor for OutlineCollector {
    fn visit_window_definition(&mut self, node: &WindowDefinition) {
        self.entries.push((self.depth, node.display_label()));
        self.depth += 1;
    }
    fn leave_window_definition(&mut self, _node: &WindowDefinition) {
        self.depth -= 1;
    }
    fn visit_queue_block(&mut self, node: &QueueBlock) {
        self.entries.push((self.depth, node.display_label()));
        self.depth += 1;
    }
    fn leave_queue_block(&mut self, _node: &QueueBlock) {
        self.depth -= 1;
    }
    fn visit_button_definition(&mut self, node: &ButtonDefinition) {
        self.entries.push((self.depth, node.display_label()));
    }
}

#[test]
fn test_outline_style_visitation() {
    let source = "Q QUEUE\n  Age LONG\nEND\n\
                  Win WINDOW('Main')\n  BUTTON('OK')\n  BUTTON('Cancel')\nEND\n";
    let output = parse_declarations(source);
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);

    let mut collector = OutlineCollector::default();
    output.root.accept(&mut collector);

    assert_eq!(
        collector.entries,
        vec![
            (0, "Q".to_string()),
            (0, "Win ('Main')".to_string()),
            (1, "OK".to_string()),
            (1, "Cancel".to_string()),
        ]
    );
}

#[test]
fn test_find_nodes_at_position_hits_deepest() {
    let source = "Win WINDOW('Main')\n  BUTTON('OK'),AT(10,10)\nEND\n";
    let output = parse_declarations(source);
    assert!(output.diagnostics.is_empty());

    // Line 2 is the button line; column 4 sits on BUTTON itself
    let nodes = find_nodes_at_position(&output.root, Position::new(2, 4));
    assert!(!nodes.is_empty());
    assert_eq!(nodes[0].node_type(), "ButtonDefinition");

    // Column inside AT(10,10) resolves to the clause, not the button
    let nodes = find_nodes_at_position(&output.root, Position::new(2, 16));
    assert!(nodes
        .iter()
        .any(|n| n.node_type() == "AtClause" || n.node_type() == "IntegerLiteral"));
}

#[test]
fn test_node_ranges_nest() {
    let source = "Win WINDOW('Main')\n  BUTTON('OK')\nEND\n";
    let output = parse_declarations(source);
    let window = &output.root.entries[0];

    for child in window.child_nodes() {
        let inside = window.range().span.start <= child.range().span.start
            && child.range().span.end <= window.range().span.end;
        assert!(inside, "child {} escapes its parent", child.node_type());
    }
}

#[test]
fn test_ast_serializes_for_host_transport() {
    let source = "Main PROCEDURE\n  CODE\n  x = 1\n";
    let output = parse_program(source);

    let value = serde_json::to_value(&output.root).expect("AST serializes");
    assert_eq!(value["definitions"][0]["Procedure"]["name"], "Main");

    let diagnostics = serde_json::to_value(&output.diagnostics).expect("diagnostics serialize");
    assert!(diagnostics.is_array());
}

#[test]
fn test_display_labels_for_outline() {
    let source = "  MEMBER('orders')\nMain PROCEDURE\n  CODE\n  RETURN\n";
    let output = parse_program(source);
    assert_eq!(output.root.display_label(), "MEMBER('orders')");
    assert_eq!(output.root.definitions[0].display_label(), "Main");
}
