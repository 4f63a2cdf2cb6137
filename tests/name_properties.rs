// tests/name_properties.rs

use cronwrap::exec::name::{EMPTY_NAME, resolve_name};
use proptest::prelude::*;

fn shell() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("sh".to_string()),
        Just("bash".to_string()),
        Just("/bin/sh".to_string()),
        Just("/usr/bin/bash".to_string()),
    ]
}

fn command_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_.-]{0,15}".prop_filter("must not be a shell", |s| s != "sh" && s != "bash")
}

proptest! {
    #[test]
    fn shells_before_a_command_are_skipped(
        shells in prop::collection::vec(shell(), 0..4),
        dir in "(/[a-z]{1,8}){0,3}",
        name in command_name(),
        rest in prop::collection::vec("[ -~]{0,12}", 0..4),
    ) {
        let mut argv = shells;
        argv.push(format!("{dir}/{name}"));
        argv.extend(rest);

        prop_assert_eq!(resolve_name(argv.as_slice()), name);
    }

    #[test]
    fn only_shells_yield_sentinel(shells in prop::collection::vec(shell(), 0..6)) {
        prop_assert_eq!(resolve_name(shells.as_slice()), EMPTY_NAME);
    }
}
