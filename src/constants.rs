pub const TYPE_KEY: &str = "type";

pub const CLASS_KEY: &str = "class";

pub const VALUE_KEY: &str = "value";

pub const THIS_KEY: &str = "this";

pub const RESERVED_KEYS: &[&str] = &[TYPE_KEY, CLASS_KEY, VALUE_KEY];

pub const DEFAULT_CLASS: &str = "Scope";

pub const MAX_DEPTH: usize = 256;

pub const DEFAULT_BUCKETS: usize = 16;

#[inline]
pub fn is_reserved_key(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}
