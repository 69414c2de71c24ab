use std::collections::HashMap;

use crate::context::Context;
use crate::error::JoyResult;
use crate::value::Value;

/// A native operator. Primitives are plain functions, not trait objects:
/// the primitive set is closed and known at compile time, so storing `fn`
/// pointers keyed by name gets cheap dispatch for free while still letting
/// a user `define` shadow a primitive of the same name.
pub type Primitive = fn(&mut Context) -> JoyResult<()>;

/// A dictionary binding: either a native primitive or a user-defined
/// quotation body.
#[derive(Clone)]
pub enum Word {
    Primitive(Primitive),
    User(Vec<Value>),
}

/// Name → [`Word`] bindings. Redefinition replaces the entry atomically;
/// any quotation that refers to the old name by symbol will resolve to the
/// new binding the next time it's dispatched, since lookup always goes
/// through this map rather than through a resolved pointer captured at
/// definition time.
#[derive(Default)]
pub struct Dictionary {
    words: HashMap<String, Word>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self {
            words: HashMap::new(),
        }
    }

    pub fn define_primitive(&mut self, name: &str, f: Primitive) {
        self.words.insert(name.to_string(), Word::Primitive(f));
    }

    pub fn define_user(&mut self, name: &str, body: Vec<Value>) {
        self.words.insert(name.to_string(), Word::User(body));
    }

    pub fn lookup(&self, name: &str) -> Option<&Word> {
        self.words.get(name)
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.words.contains_key(name)
    }

    /// The bound body of a user word, for the `body` reflection primitive.
    /// Primitives have no quotation body; an empty one is returned.
    pub fn body_of(&self, name: &str) -> Vec<Value> {
        match self.words.get(name) {
            Some(Word::User(body)) => body.clone(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redefinition_replaces_binding() {
        let mut dict = Dictionary::new();
        dict.define_user("double", vec![Value::Integer(2), Value::Symbol(crate::value::JoySymbol::new("*"))]);
        assert!(matches!(dict.lookup("double"), Some(Word::User(_))));
        dict.define_user("double", vec![Value::Integer(3), Value::Symbol(crate::value::JoySymbol::new("*"))]);
        match dict.lookup("double") {
            Some(Word::User(body)) => assert_eq!(body[0], Value::Integer(3)),
            _ => panic!("expected user word"),
        }
    }
}
