use marginalia::{
    parse, try_parse, DerivationRule, Grammar, ParseError, Production, Symbol, Token, TokenKind,
};

type Ann = &'static str;

// ---
// Test Setup
// ---

fn sym(name: &str) -> Symbol {
    Symbol::new(name)
}

fn word(text: &str, line: usize) -> Token {
    Token::new(TokenKind::Word, text, line)
}

/// S -> A B (weight 5); A and B each match one WORD (weight 1).
fn two_word_grammar() -> Grammar<Ann> {
    Grammar::new(
        vec![
            Production::new("S", vec![DerivationRule::binary("A", "B", 5)]),
            Production::new("A", vec![DerivationRule::terminal(TokenKind::Word, 1)]),
            Production::new("B", vec![DerivationRule::terminal(TokenKind::Word, 1)]),
        ],
        "S",
    )
}

/// A deliberately ambiguous grammar accepting any nonempty run of words,
/// colons, newlines, and indents: S -> S S | WORD | COLON | NEWLINE | INDENT.
fn sequence_grammar() -> Grammar<Ann> {
    Grammar::new(
        vec![Production::new(
            "S",
            vec![
                DerivationRule::terminal(TokenKind::Word, 0),
                DerivationRule::terminal(TokenKind::Colon, 0),
                DerivationRule::terminal(TokenKind::Newline, 0),
                DerivationRule::terminal(TokenKind::Indent, 0),
                DerivationRule::binary("S", "S", 0),
            ],
        )],
        "S",
    )
}

/// Two competing derivations of S over the same two-word span, with
/// distinguishable left children and the given rule weights.
fn competing_grammar(first_weight: u32, second_weight: u32) -> Grammar<Ann> {
    Grammar::new(
        vec![
            Production::new(
                "S",
                vec![
                    DerivationRule::binary("A", "B", first_weight),
                    DerivationRule::binary("C", "D", second_weight),
                ],
            ),
            Production::new("A", vec![DerivationRule::terminal(TokenKind::Word, 0)]),
            Production::new("B", vec![DerivationRule::terminal(TokenKind::Word, 0)]),
            Production::new("C", vec![DerivationRule::terminal(TokenKind::Word, 0)]),
            Production::new("D", vec![DerivationRule::terminal(TokenKind::Word, 0)]),
        ],
        "S",
    )
}

// ---
// Core contract
// ---

#[test]
fn empty_input_parses_to_none() {
    assert!(parse(&two_word_grammar(), &[]).is_none());
    assert!(parse(&sequence_grammar(), &[]).is_none());
}

#[test]
fn two_word_grammar_end_to_end() {
    let tokens = vec![word("alpha", 1), word("beta", 1)];
    let tree = parse(&two_word_grammar(), &tokens).expect("two words should derive");

    assert_eq!(tree.symbol, sym("S"));
    assert_eq!(tree.weight, 5);

    let left = tree.left.as_deref().expect("left child");
    assert_eq!(left.symbol, sym("A"));
    assert_eq!(left.weight, 1);
    assert_eq!(left.value.as_ref().map(|t| t.text.as_str()), Some("alpha"));

    let right = tree.right.as_deref().expect("right child");
    assert_eq!(right.symbol, sym("B"));
    assert_eq!(right.weight, 1);
    assert_eq!(right.value.as_ref().map(|t| t.text.as_str()), Some("beta"));
}

#[test]
fn single_word_does_not_derive_two_word_grammar() {
    let tokens = vec![word("alpha", 1)];
    assert!(parse(&two_word_grammar(), &tokens).is_none());
}

#[test]
fn in_order_terminals_preserve_token_order() {
    let tokens = vec![
        word("one", 1),
        word("two", 1),
        Token::new(TokenKind::Newline, "\n", 1),
        word("three", 2),
        word("four", 2),
    ];
    let tree = parse(&sequence_grammar(), &tokens).expect("sequence should derive");
    let reconstructed: Vec<Token> = tree.terminals().cloned().collect();
    assert_eq!(reconstructed, tokens);
}

#[test]
fn repeated_parses_are_structurally_equal() {
    let tokens = vec![word("a", 1), word("b", 1), word("c", 1), word("d", 1)];
    let grammar = sequence_grammar();
    let first = parse(&grammar, &tokens).expect("derives");
    let second = parse(&grammar, &tokens).expect("derives");
    assert!(first.structurally_equals(&second));
    assert!(second.structurally_equals(&first));
}

// ---
// Weights and ambiguity resolution
// ---

#[test]
fn unweighted_parent_inherits_strongest_child() {
    let grammar: Grammar<Ann> = Grammar::new(
        vec![
            Production::new("S", vec![DerivationRule::binary("A", "B", 0)]),
            Production::new("A", vec![DerivationRule::terminal(TokenKind::Word, 4)]),
            Production::new("B", vec![DerivationRule::terminal(TokenKind::Word, 2)]),
        ],
        "S",
    );
    let tree = parse(&grammar, &[word("x", 1), word("y", 1)]).expect("derives");
    assert_eq!(tree.weight, 4);
}

#[test]
fn higher_weight_wins_regardless_of_rule_order() {
    let tokens = vec![word("x", 1), word("y", 1)];

    let heavier_second = parse(&competing_grammar(1, 9), &tokens).expect("derives");
    assert_eq!(heavier_second.weight, 9);
    assert_eq!(heavier_second.left.as_deref().unwrap().symbol, sym("C"));

    let heavier_first = parse(&competing_grammar(9, 1), &tokens).expect("derives");
    assert_eq!(heavier_first.weight, 9);
    assert_eq!(heavier_first.left.as_deref().unwrap().symbol, sym("A"));
}

#[test]
fn equal_weights_keep_the_later_rule() {
    let tokens = vec![word("x", 1), word("y", 1)];
    let tree = parse(&competing_grammar(3, 3), &tokens).expect("derives");
    assert_eq!(tree.weight, 3);
    assert_eq!(tree.left.as_deref().unwrap().symbol, sym("C"));
}

#[test]
fn terminal_ambiguity_resolves_by_weight_either_order() {
    let ascending: Grammar<Ann> = Grammar::new(
        vec![Production::new(
            "A",
            vec![
                DerivationRule::terminal(TokenKind::Word, 1),
                DerivationRule::terminal(TokenKind::Word, 5),
            ],
        )],
        "A",
    );
    let descending: Grammar<Ann> = Grammar::new(
        vec![Production::new(
            "A",
            vec![
                DerivationRule::terminal(TokenKind::Word, 5),
                DerivationRule::terminal(TokenKind::Word, 1),
            ],
        )],
        "A",
    );
    let tokens = vec![word("only", 1)];
    assert_eq!(parse(&ascending, &tokens).expect("derives").weight, 5);
    assert_eq!(parse(&descending, &tokens).expect("derives").weight, 5);
}

#[test]
fn annotations_ride_along_on_binary_rules() {
    let grammar: Grammar<Ann> = Grammar::new(
        vec![
            Production::new(
                "S",
                vec![DerivationRule::binary_annotated(
                    "A",
                    "B",
                    vec!["missing-blank-line"],
                    2,
                )],
            ),
            Production::new("A", vec![DerivationRule::terminal(TokenKind::Word, 0)]),
            Production::new("B", vec![DerivationRule::terminal(TokenKind::Word, 0)]),
        ],
        "S",
    );
    let tree = parse(&grammar, &[word("x", 1), word("y", 1)]).expect("derives");
    assert_eq!(tree.annotations, vec!["missing-blank-line"]);
    assert!(tree.left.as_deref().unwrap().annotations.is_empty());
}

#[test]
fn dangling_symbol_reference_never_matches() {
    let grammar: Grammar<Ann> = Grammar::new(
        vec![
            Production::new("S", vec![DerivationRule::binary("A", "Missing", 1)]),
            Production::new("A", vec![DerivationRule::terminal(TokenKind::Word, 0)]),
        ],
        "S",
    );
    assert!(parse(&grammar, &[word("x", 1), word("y", 1)]).is_none());
}

// ---
// try_parse diagnostics
// ---

#[test]
fn try_parse_reports_empty_input() {
    let result = try_parse(&two_word_grammar(), &[]);
    assert!(matches!(result, Err(ParseError::EmptyInput)));
}

#[test]
fn try_parse_reports_underivable_input() {
    let tokens = vec![word("alone", 2)];
    match try_parse(&two_word_grammar(), &tokens) {
        Err(ParseError::NoDerivation {
            start,
            first_line,
            last_line,
        }) => {
            assert_eq!(start, sym("S"));
            assert_eq!(first_line, 2);
            assert_eq!(last_line, 2);
        }
        other => panic!("expected NoDerivation, got {other:?}"),
    }
}

#[test]
fn try_parse_returns_the_tree_on_success() {
    let tokens = vec![word("alpha", 1), word("beta", 1)];
    let tree = try_parse(&two_word_grammar(), &tokens).expect("derives");
    assert_eq!(tree.symbol, sym("S"));
}
