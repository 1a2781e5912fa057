//! Database repository layer

pub mod buddy_repo;
pub mod ride_repo;
pub mod site_repo;
pub mod user_repo;

pub use buddy_repo::BuddyRepository;
pub use ride_repo::RideRepository;
pub use site_repo::SiteRepository;
pub use user_repo::{CredentialStore, SqliteCredentialStore};

/// Build a `LIKE` pattern matching `needle` anywhere, escaping wildcards.
/// Use together with `ESCAPE '\'`.
pub(crate) fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.trim().chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
