//! Interned symbols.
//!
//! A `Symbol` is a u32 index into the process-wide interner, giving O(1)
//! equality and hashing for identifiers that are compared constantly
//! during rewriting. The interner is append-only: strings are leaked once
//! and live for the life of the process.

use std::fmt;
use std::sync::OnceLock;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// An interned identifier.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Symbol(u32);

struct Interner {
    map: FxHashMap<&'static str, u32>,
    names: Vec<&'static str>,
}

impl Interner {
    fn new() -> Self {
        Interner {
            map: FxHashMap::default(),
            names: Vec::with_capacity(64),
        }
    }

    fn intern(&mut self, name: &str) -> u32 {
        if let Some(&idx) = self.map.get(name) {
            return idx;
        }
        let leaked: &'static str = Box::leak(name.to_string().into_boxed_str());
        let idx = u32::try_from(self.names.len()).unwrap_or(u32::MAX);
        self.names.push(leaked);
        self.map.insert(leaked, idx);
        idx
    }
}

fn interner() -> &'static RwLock<Interner> {
    static INTERNER: OnceLock<RwLock<Interner>> = OnceLock::new();
    INTERNER.get_or_init(|| RwLock::new(Interner::new()))
}

impl Symbol {
    /// Intern `name`, returning its symbol.
    pub fn intern(name: &str) -> Symbol {
        {
            let guard = interner().read();
            if let Some(&idx) = guard.map.get(name) {
                return Symbol(idx);
            }
        }
        Symbol(interner().write().intern(name))
    }

    /// The interned string.
    pub fn as_str(self) -> &'static str {
        interner().read().names[self.0 as usize]
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `List` head.
pub fn sym_list() -> Symbol {
    Symbol::intern("List")
}

/// The `NumericArray` head.
pub fn sym_numeric_array() -> Symbol {
    Symbol::intern("NumericArray")
}

/// The inference marker for type specifications.
pub fn sym_automatic() -> Symbol {
    Symbol::intern("Automatic")
}

/// The failure sentinel returned by failing builtins.
pub fn sym_failed() -> Symbol {
    Symbol::intern("$Failed")
}

/// The logical constant `True`.
pub fn sym_true() -> Symbol {
    Symbol::intern("True")
}

/// The logical constant `False`.
pub fn sym_false() -> Symbol {
    Symbol::intern("False")
}

/// The `Unevaluated` hold wrapper skipped by the fixed-point step.
pub fn sym_unevaluated() -> Symbol {
    Symbol::intern("Unevaluated")
}

/// The `Normal` head (normal-form conversion).
pub fn sym_normal() -> Symbol {
    Symbol::intern("Normal")
}

/// The `ToString` head (display-form rendering).
pub fn sym_to_string() -> Symbol {
    Symbol::intern("ToString")
}

#[cfg(test)]
mod tests;
