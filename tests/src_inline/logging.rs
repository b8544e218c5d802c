use super::*;

#[test]
fn test_level_name_from_verbosity() {
    assert_eq!(level_name(0), "info");
    assert_eq!(level_name(1), "debug");
    assert_eq!(level_name(2), "trace");
    assert_eq!(level_name(9), "trace");
}

#[test]
fn test_init_twice_is_harmless() {
    init(0);
    init(1);
}
