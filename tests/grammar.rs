//! Compiling usage strings into node trees

use rstest::rstest;
use usage_grammar::{compile, Error, Grammar, Node, NodeKind};

#[rstest]
#[case("a b c", "a b c")]
#[case("a | b c", "a | b c")]
#[case("[a] b...", "[a] b...")]
#[case("(a | b)...", "(a | b)...")]
#[case("a (b | c) d", "a (b | c) d")]
#[case("(a b) | c", "a b | c")]
#[case("(a | b) | c", "a | b | c")]
#[case("(|x)", "[x]")]
#[case("--x[=<v>]", "--x[=<v>]")]
#[case("--mode=(fast | slow)", "--mode=(fast | slow)")]
#[case("  a   [ b ]  ", "a [b]")]
#[case("", "")]
fn compiles_to_canonical_usage(#[case] usage: &str, #[case] expected: &str) {
	assert_eq!(compile(usage, false).unwrap().to_string(), expected);
}

#[test]
fn sequence_structure() {
	let root = compile("install [<version>] --dir=<dir>", false).unwrap();

	assert_eq!(
		root,
		Node::sequence(vec![
			Node::literal("install"),
			Node::value_parameter("version").with_optional(),
			Node::floating("dir", Some(Node::value_parameter("dir"))),
		])
	);
	assert!(!root.is_optional());
	assert!(root.is_position_dependent());
}

#[test]
fn all_optional_sequence_is_optional() {
	let root = compile("[a] [b]", false).unwrap();

	assert!(matches!(root.kind(), NodeKind::Sequence { .. }));
	assert!(root.is_optional());
	assert_eq!(root.to_string(), "[[a] [b]]");
}

#[test]
fn optional_alternative_makes_options_optional() {
	let root = compile("a | [b]", false).unwrap();

	assert!(matches!(root.kind(), NodeKind::Options { .. }));
	assert!(root.is_optional());
	assert_eq!(root.children().len(), 2);
}

#[test]
fn repeat_binds_to_last_element() {
	let root = compile("cp <src>... <dst>", false).unwrap();
	let children = root.children();

	assert!(!children[0].is_repeating());
	assert!(children[1].is_repeating());
	assert!(!children[2].is_repeating());
}

#[test]
fn stray_closing_characters_are_literals() {
	let root = compile("a ) >", false).unwrap();

	assert_eq!(
		root,
		Node::sequence(vec![Node::literal("a"), Node::literal(")"), Node::literal(">")])
	);
}

#[test]
fn escaped_specials_are_literals() {
	let root = compile(r"a\|b \[x\]", false).unwrap();

	assert_eq!(root, Node::sequence(vec![Node::literal("a|b"), Node::literal("[x]")]));
	assert_eq!(root.to_string(), r"a\|b \[x\]");
}

#[rstest]
#[case(r"--x\=y")]
#[case(r"--log\ level[=<l>]")]
#[case(r"--a\|b=(x | y)")]
fn escaped_flag_names_survive_display(#[case] usage: &str) {
	let node = compile(usage, false).unwrap();

	assert_eq!(node.to_string(), usage);
	assert_eq!(compile(&node.to_string(), false).unwrap(), node);
}

#[test]
fn escaped_flag_name_is_decoded() {
	assert_eq!(compile(r"--x\=y", false).unwrap(), Node::floating("x=y", None));
}

#[rstest]
#[case("[a] [b] [c]", "[[a] | a [b] | a b [c]]")]
#[case("a [b] [c]", "a [b] | a b [c]")]
#[case("x ([a] [b])...", "x [[a] | a [b]]...")]
#[case("a [b] c", "a [b] c")]
fn fixes_ambiguity(#[case] usage: &str, #[case] expected: &str) {
	assert_eq!(compile(usage, true).unwrap().to_string(), expected);
}

#[test]
fn unfixed_usage_is_left_alone() {
	assert_eq!(compile("[a] [b] [c]", false).unwrap().to_string(), "[[a] [b] [c]]");
}

#[test]
fn serializes_node_tree() {
	let json = serde_json::to_string(&compile("a", false).unwrap()).unwrap();
	assert_eq!(json, r#"{"type":"literal","name":"a","optional":false,"repeating":false}"#);

	let json = serde_json::to_value(compile("--x[=<v>]", false).unwrap()).unwrap();
	assert_eq!(json["type"], "floating");
	assert_eq!(json["value"]["type"], "value_parameter");
	assert_eq!(json["value"]["optional"], true);
}

#[test]
fn grammar_keeps_usage() {
	let grammar = Grammar::compile("run [--fast]", false).unwrap();

	assert_eq!(grammar.usage(), "run [--fast]");
	assert_eq!(grammar.root().to_string(), "run [--fast]");
}

#[test]
fn unterminated_groups() {
	assert!(matches!(
		compile("(a b", false),
		Err(Error::UnterminatedGroup {
			open: '(',
			position: 0
		})
	));
	assert!(matches!(
		compile("x [a (b)", false),
		Err(Error::UnterminatedGroup {
			open: '[',
			position: 2
		})
	));
}

#[test]
fn unterminated_parameter() {
	assert!(matches!(
		compile("a <b", false),
		Err(Error::UnterminatedParameter { position: 2 })
	));
}

#[rstest]
#[case("... a", 0)]
#[case("a ...", 2)]
#[case("|...", 1)]
fn dangling_repeat(#[case] usage: &str, #[case] position: usize) {
	match compile(usage, false) {
		Err(Error::DanglingRepeat { position: at }) => assert_eq!(at, position),
		other => panic!("expected dangling repeat, got {other:?}"),
	}
}

#[test]
fn flag_value_errors() {
	assert!(matches!(
		compile("a --x=", false),
		Err(Error::MissingFlagValue { ref name, position: 2 }) if name == "x"
	));
	assert!(matches!(
		compile("--x[=<v>", false),
		Err(Error::UnclosedFlagValue { ref name, position: 0 }) if name == "x"
	));
}

#[test]
fn sequence_length_is_limited() {
	let fits: Vec<String> = (0..64).map(|i| format!("a{i}")).collect();
	assert_eq!(compile(&fits.join(" "), false).unwrap().children().len(), 64);

	let too_long: Vec<String> = (0..65).map(|i| format!("a{i}")).collect();
	let err = compile(&too_long.join(" "), false).unwrap_err();
	assert!(matches!(err, Error::SequenceTooLong { .. }));
	assert!(err.is_grammar());
	assert!(!err.is_input());
}
