use rstest::rstest;

use super::*;

#[rstest]
#[case("z", Key::char('z'))]
#[case("ctrl-z", Key::ctrl('z'))]
#[case("shift-ctrl-z", Key::ctrl('z').with_shift())]
#[case("ctrl-shift-z", Key::ctrl('z').with_shift())]
#[case("left", Key::new(KeyCode::Left))]
#[case("backspace", Key::new(KeyCode::Backspace))]
#[case("del", Key::new(KeyCode::Delete))]
#[case("ctrl-y", Key::ctrl('y'))]
#[case("space", Key::char(' '))]
#[case("e", Key::char('e'))]
#[case("-", Key::char('-'))]
fn parses_bindings(#[case] input: &str, #[case] expected: Key) {
	assert_eq!(parse_key(input), Ok(expected));
}

#[rstest]
#[case("")]
#[case("ctrl-")]
#[case("ctrl")]
#[case("leftx")]
fn rejects_malformed(#[case] input: &str) {
	assert!(matches!(parse_key(input), Err(KeymapError::Parse { .. })));
}

#[test]
fn display_round_trips_through_parser() {
	for key in [Key::ctrl('z').with_shift(), Key::new(KeyCode::Delete), Key::char(' ')] {
		assert_eq!(parse_key(&key.to_string()), Ok(key));
	}
}

#[test]
fn keymap_lookup() {
	let mut keymap = Keymap::new();
	keymap.bind("ctrl-z", "undo").unwrap().bind_all(&["ctrl-y", "shift-ctrl-z"], "redo").unwrap();
	assert_eq!(keymap.len(), 3);
	assert_eq!(keymap.get(&Key::ctrl('z')), Some(&"undo"));
	assert_eq!(keymap.get(&Key::ctrl('z').with_shift()), Some(&"redo"));
	assert_eq!(keymap.get(&Key::char('z')), None);
	assert!(keymap.bind("ctrl-", "bad").is_err());
}
