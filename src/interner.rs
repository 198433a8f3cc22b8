/*!
A global dictionary of interned strings, used for generator names. This is
currently not thread safe. Provides an abstraction API for any interner
library.

*/

use string_interner::{
  StringInterner,
  symbol::SymbolU32
};

pub type InternedString = SymbolU32;

// todo: Make interner thread safe with RwLock.
static mut STRING_INTERNER: Option<Box<StringInterner>> = None;

fn global_interner() -> &'static mut StringInterner {
  unsafe {
    let boxed = STRING_INTERNER.get_or_insert_with(|| Box::new(StringInterner::default()));
    &mut **boxed
  }
}


pub fn interned(string: &str) -> InternedString {
  global_interner().get_or_intern(string)
}


pub fn interned_static(string: &'static str) -> InternedString {
  global_interner().get_or_intern_static(string)
}


pub fn resolve_str(symbol: InternedString) -> &'static str {
  match global_interner().resolve(symbol) {
    Some(string) => string,
    None => unreachable!("Tried to resolve a symbol that was never interned. This is a bug.")
  }
}
