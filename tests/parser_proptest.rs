//! Property-based totality tests
//!
//! For all inputs — printable soup, truncations of valid source, nested
//! blocks — both entry points terminate and return a tree. The engine
//! must never panic and never loop.

use proptest::prelude::*;
use clarion_parser::{parse_declarations, parse_program, tokenize};

const VALID_PROGRAM: &str = "  MEMBER('orders')\n\
                             MAP\n\
                             Main PROCEDURE(LONG pId)\n\
                             END\n\
                             Q QUEUE\n\
                             Name STRING(30)\n\
                             END\n\
                             Win WINDOW('Title'),AT(0,0,100,50),CENTER\n\
                             BUTTON('OK'),AT(10,10),USE(?Ok)\n\
                             END\n\
                             Main PROCEDURE(LONG pId)\n\
                             Total LONG\n\
                               CODE\n\
                             Total = pId * 2 + 1\n\
                             IF Total > 10 THEN\n\
                             DO Clamp\n\
                             END\n\
                             Clamp ROUTINE\n\
                               CODE\n\
                             Total = 10\n";

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_lexer_total_on_printable_soup(input in "[ -~\\n]{0,160}") {
        let output = tokenize(&input);
        prop_assert!(output.tokens.last().unwrap().is_eof());
    }

    #[test]
    fn prop_program_parse_terminates(input in "[ -~\\n]{0,160}") {
        let output = parse_program(&input);
        // A tree always comes back; diagnostics are ordered by discovery
        prop_assert!(output.root.location.span.start <= output.root.location.span.end);
    }

    #[test]
    fn prop_declarations_parse_terminates(input in "[ -~\\n]{0,160}") {
        let output = parse_declarations(&input);
        prop_assert!(output.root.location.span.start <= output.root.location.span.end);
    }

    #[test]
    fn prop_truncations_of_valid_source_parse(cut in 0usize..1024) {
        // Truncating mid-token, mid-clause, or mid-block must still parse
        let cut = cut.min(VALID_PROGRAM.len());
        let truncated = &VALID_PROGRAM[..VALID_PROGRAM
            .char_indices()
            .map(|(i, _)| i)
            .take_while(|&i| i <= cut)
            .last()
            .unwrap_or(0)];
        let output = parse_program(truncated);
        let _ = output.diagnostics;
    }

    #[test]
    fn prop_keyword_soup_parses(words in prop::collection::vec(
        prop::sample::select(vec![
            "WINDOW", "END", "IF", "LOOP", "CASE", "GROUP", "QUEUE", "MENU",
            "SHEET", "TAB", "OPTION", "(", ")", ",", "'s'", "1", "X", "\n",
        ]),
        0..60,
    )) {
        let input = words.join(" ");
        let program = parse_program(&input);
        let declarations = parse_declarations(&input);
        prop_assert!(program.root.location.span.end <= input.len());
        prop_assert!(declarations.root.location.span.end <= input.len());
    }
}

#[test]
fn test_full_valid_program_is_clean() {
    let output = parse_program(VALID_PROGRAM);
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
}
