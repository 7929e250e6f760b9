//! Issue identifier validation and generation.
//!
//! Issue files carry their identifier on the first line. Only a version-4
//! UUID written in canonical form (lowercase, hyphenated) counts as an
//! identifier; anything else is treated as "no identifier yet" and gets
//! replaced by a freshly generated one.
//!
//! # Example
//!
//! ```
//! use blitz::identity;
//!
//! let id = identity::generate();
//! assert!(identity::validate(&id.to_string()));
//! assert!(!identity::validate("My Title"));
//! ```

use uuid::{Uuid, Version};

use crate::domain::IssueId;

/// Returns `true` iff `candidate` is a canonical version-4 UUID.
///
/// Uppercase, braced, simple (no hyphens) and URN forms are rejected even
/// though they parse, because rewriting them would change the identifier
/// text in the file.
pub fn validate(candidate: &str) -> bool {
    let Ok(uuid) = Uuid::parse_str(candidate) else {
        return false;
    };

    uuid.get_version() == Some(Version::Random) && uuid.hyphenated().to_string() == candidate
}

/// Parse `candidate` into an [`IssueId`] if it passes [`validate`].
pub fn parse(candidate: &str) -> Option<IssueId> {
    if validate(candidate) {
        candidate.parse().ok()
    } else {
        None
    }
}

/// Generate a fresh random identifier.
pub fn generate() -> IssueId {
    IssueId::new(Uuid::new_v4())
}
