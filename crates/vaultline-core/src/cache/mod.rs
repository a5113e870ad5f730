//! Encrypted-at-rest cache for resolved secrets
//!
//! - `CacheCipher`: the only code that sees plaintext on its way in or out
//! - `CacheEntry`: ciphertext plus source, store time and optional TTL
//! - `CacheStore`: key → entry map with lazy expiry

mod cipher;
mod entry;
mod store;

pub use cipher::{CacheCipher, CacheError, CacheResult, EncodedValue};
pub use entry::CacheEntry;
pub use store::CacheStore;
