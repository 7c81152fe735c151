use proptest::prelude::*;
use shparse::{parse, Mode, ParseOptions};

const MAX_INPUT_BYTES: usize = 256;

proptest! {
    #[test]
    fn parse_handles_lossy_utf8_inputs_without_panicking(
        bytes in proptest::collection::vec(any::<u8>(), 0..=MAX_INPUT_BYTES)
    ) {
        let input = String::from_utf8_lossy(&bytes).into_owned();
        let _ = parse(&input, &ParseOptions::default());
        let _ = parse(&input, &ParseOptions::for_mode(Mode::Bash));
        let _ = parse(&input, &ParseOptions::for_mode(Mode::WordExpansion));
    }

    #[test]
    fn parse_is_deterministic(
        bytes in proptest::collection::vec(any::<u8>(), 0..=MAX_INPUT_BYTES)
    ) {
        let input = String::from_utf8_lossy(&bytes).into_owned();
        let render = |input: &str| match parse(input, &ParseOptions::default()) {
            Ok(tree) => serde_json::to_string(&tree).unwrap(),
            Err(error) => error.to_string(),
        };
        prop_assert_eq!(render(&input), render(&input));
    }

    #[test]
    fn plain_commands_always_parse(
        // `cmd` prefix keeps the generated name clear of reserved words
        source in "cmd[a-z]{0,8}( [a-z0-9]{1,8}){0,3}"
    ) {
        let tree = parse(&source, &ParseOptions::default());
        prop_assert!(tree.is_ok(), "{source:?} failed: {:?}", tree.err());
    }

    #[test]
    fn locations_never_change_the_shape(
        source in "cmd[a-z]{0,8}( [a-z0-9]{1,8}){0,3}"
    ) {
        let plain = parse(&source, &ParseOptions::default());
        let with_locations = parse(&source, &ParseOptions::default().with_locations());
        prop_assert_eq!(plain.is_ok(), with_locations.is_ok());
    }
}
