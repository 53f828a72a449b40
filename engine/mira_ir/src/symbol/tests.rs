use super::{sym_list, Symbol};
use pretty_assertions::assert_eq;

#[test]
fn interning_is_idempotent() {
    let a = Symbol::intern("Plus");
    let b = Symbol::intern("Plus");
    assert_eq!(a, b);
    assert_eq!(a.as_str(), "Plus");
}

#[test]
fn distinct_names_get_distinct_symbols() {
    assert_ne!(Symbol::intern("Times"), Symbol::intern("Power"));
}

#[test]
fn well_known_symbols_are_stable() {
    assert_eq!(sym_list(), Symbol::intern("List"));
    assert_eq!(sym_list().to_string(), "List");
}
