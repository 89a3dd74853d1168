//! Error recovery integration tests
//!
//! The engine must always return a tree: missing end-markers get synthetic
//! ends, stray ENDs close the innermost block, and malformed regions turn
//! into placeholder nodes — each with a diagnostic.

use clarion_parser::clarion::ast::elements::{Declaration, Definition, Statement};
use clarion_parser::{parse_declarations, parse_program};

#[test]
fn test_if_missing_end_scenario() {
    // IF with no END and no ELSE: a missing-end diagnostic, and an
    // IfStatement whose then-branch holds the assignment, closed by a
    // synthetic end at EOF
    let source = "Main PROCEDURE\n  CODE\n  IF x = 1 THEN\n  y = 2\n";
    let output = parse_program(source);

    assert!(output
        .diagnostics
        .iter()
        .any(|d| d.code.as_deref() == Some("missing-end")));

    let Definition::Procedure(main) = &output.root.definitions[0] else {
        panic!("expected procedure");
    };
    assert_eq!(main.statements.len(), 1);
    let Statement::If(if_statement) = &main.statements[0] else {
        panic!("expected if statement");
    };
    assert_eq!(if_statement.then_branch.len(), 1);
    assert!(matches!(
        if_statement.then_branch[0],
        Statement::Assignment(_)
    ));
    assert!(if_statement.else_branch.is_none());
}

#[test]
fn test_truncated_window_mid_block() {
    let source = "W WINDOW('t'),AT(0,0\n  BUTTON('OK'";
    let output = parse_declarations(source);

    // Both unclosed parens and the missing END are reported; a window node
    // still comes back
    assert!(!output.diagnostics.is_empty());
    assert!(matches!(output.root.entries[0], Declaration::Window(_)));
}

#[test]
fn test_stray_end_closes_inner_block_only() {
    // The stray END after the LOOP closes nothing; it is reported and the
    // surrounding procedure survives
    let source = "Main PROCEDURE\n  CODE\n  LOOP\n  x = 1\n  END\nEND\n  y = 2\n";
    let output = parse_program(source);

    assert!(output
        .diagnostics
        .iter()
        .any(|d| d.code.as_deref() == Some("stray-end")));

    let Definition::Procedure(main) = &output.root.definitions[0] else {
        panic!("expected procedure");
    };
    assert!(matches!(main.statements[0], Statement::Loop(_)));
}

#[test]
fn test_nested_blocks_closed_at_eof() {
    // Three blocks open, zero ENDs: three synthetic ends
    let source = "Main PROCEDURE\n  CODE\n  LOOP\n  IF a = 1\n  CASE b\n  OF 1\n  x = 1\n";
    let output = parse_program(source);

    let missing = output
        .diagnostics
        .iter()
        .filter(|d| d.code.as_deref() == Some("missing-end"))
        .count();
    assert_eq!(missing, 3);

    let Definition::Procedure(main) = &output.root.definitions[0] else {
        panic!("expected procedure");
    };
    let Statement::Loop(loop_statement) = &main.statements[0] else {
        panic!("expected loop");
    };
    let Statement::If(if_statement) = &loop_statement.body[0] else {
        panic!("expected if");
    };
    assert!(matches!(if_statement.then_branch[0], Statement::Case(_)));
}

#[test]
fn test_lex_errors_mirrored_into_diagnostics() {
    let output = parse_declarations("S STRING(10)\nBad 'unterminated\n");
    assert!(output
        .diagnostics
        .iter()
        .any(|d| d.code.as_deref() == Some("unterminated-string")));
    assert_eq!(output.lex_errors.len(), 1);
}

#[test]
fn test_diagnostics_carry_expected_and_found() {
    let output = parse_program("Main PROCEDURE\n  CODE\n  LOOP\n  x = 1\n");
    let missing = output
        .diagnostics
        .iter()
        .find(|d| d.code.as_deref() == Some("missing-end"))
        .expect("missing-end diagnostic");
    assert_eq!(missing.expected.as_deref(), Some("keyword END"));
    assert_eq!(missing.found.as_deref(), Some("end of file"));
}

#[test]
fn test_garbage_between_declarations() {
    let source = "A LONG\n)( ===\nB LONG\n";
    let output = parse_declarations(source);

    assert_eq!(output.root.entries.len(), 3);
    assert!(matches!(output.root.entries[0], Declaration::Variable(_)));
    assert!(matches!(output.root.entries[1], Declaration::Unknown(_)));
    assert!(matches!(output.root.entries[2], Declaration::Variable(_)));
}

#[test]
fn test_deeply_nested_loops_terminate() {
    let depth = 64;
    let mut source = String::from("Main PROCEDURE\n  CODE\n");
    for _ in 0..depth {
        source.push_str("  LOOP\n");
    }
    source.push_str("  x = 1\n");
    for _ in 0..depth {
        source.push_str("  END\n");
    }

    let output = parse_program(&source);
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
}

#[test]
fn test_keywords_as_labels() {
    // Keywords double as ordinary identifiers in label position
    let output = parse_declarations("Item QUEUE\nKey LONG\nEND\n");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let Declaration::Queue(queue) = &output.root.entries[0] else {
        panic!("expected queue");
    };
    assert_eq!(queue.name, "Item");
    assert_eq!(queue.fields.len(), 1);
}
