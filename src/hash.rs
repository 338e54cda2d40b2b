use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub fn stable_hash_with(f: impl FnOnce(&mut DefaultHasher)) -> u64 {
    let mut hasher = DefaultHasher::new();
    f(&mut hasher);
    hasher.finish()
}

pub fn stable_hash_str(seed: u64, value: &str) -> u64 {
    stable_hash_with(|hasher| {
        seed.hash(hasher);
        value.hash(hasher);
    })
}

pub fn stable_hash_tokens<'a>(
    seed: u64,
    tokens: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> u64 {
    stable_hash_with(|hasher| {
        seed.hash(hasher);
        for (column, token) in tokens {
            column.hash(hasher);
            token.hash(hasher);
        }
    })
}
