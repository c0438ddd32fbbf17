use crate::{Env, Object, ObjectType};
use rustc_hash::FxHashMap;
use sloth_parser::ast::FnLiteral;
use std::fmt;
use std::rc::Rc;

/// A user defined function together with the environment it was defined in.
pub struct Function {
    pub literal: Rc<FnLiteral>,
    /// Captured by reference. Outlives the call that created the function.
    pub env: Env,
}

pub type BuiltinFn = fn(&[Object]) -> Object;

/// A function implemented in Rust.
#[derive(Clone, Copy)]
pub struct Builtin {
    pub ident: &'static str,
    pub func: BuiltinFn,
}

/// Normalized key of a hash entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashKey {
    pub kind: ObjectType,
    pub value: u64,
}

/// Values that can be used as hash keys. Implemented for integers, booleans and strings only.
pub trait Hashable {
    fn hash_key(&self) -> HashKey;
}

impl Hashable for i64 {
    fn hash_key(&self) -> HashKey {
        HashKey {
            kind: ObjectType::Integer,
            value: *self as u64,
        }
    }
}

impl Hashable for bool {
    fn hash_key(&self) -> HashKey {
        HashKey {
            kind: ObjectType::Boolean,
            value: *self as u64,
        }
    }
}

impl Hashable for Rc<str> {
    fn hash_key(&self) -> HashKey {
        HashKey {
            kind: ObjectType::String,
            value: fnv1a(self.as_bytes()),
        }
    }
}

/// 64-bit FNV-1a.
fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0100_0000_01b3;

    bytes.iter().fold(OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(PRIME)
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct HashPair {
    pub key: Object,
    pub value: Object,
}

/// Hash map from [`HashKey`] to the original key and value. Iterates in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Hash {
    pairs: FxHashMap<HashKey, HashPair>,
    order: Vec<HashKey>,
}

impl Hash {
    /// Inserts a pair. Re-inserting an existing key keeps its position and replaces the value.
    pub fn insert(&mut self, hash_key: HashKey, pair: HashPair) {
        if self.pairs.insert(hash_key, pair).is_none() {
            self.order.push(hash_key);
        }
    }

    pub fn get(&self, hash_key: &HashKey) -> Option<&HashPair> {
        self.pairs.get(hash_key)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HashPair> {
        self.order.iter().map(move |hash_key| &self.pairs[hash_key])
    }
}

impl PartialEq for Hash {
    fn eq(&self, other: &Hash) -> bool {
        self.pairs == other.pairs
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, pair) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", pair.key, pair.value)?;
        }
        f.write_str("}")
    }
}
