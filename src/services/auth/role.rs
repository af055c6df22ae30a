//! Canonical role markers and normalization.
//!
//! Every role that is stored or signed into a token goes through `normalize`
//! first, so it always carries the `ROLE_` prefix.

pub const ROLE_PREFIX: &str = "ROLE_";
pub const ROLE_USER: &str = "ROLE_USER";
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";

/// Normalize a requested or stored role.
///
/// - missing or blank -> `ROLE_USER`
/// - already prefixed -> kept as is
/// - otherwise -> `ROLE_` + upper-cased value (`"admin"` -> `ROLE_ADMIN`)
///
/// Unknown roles survive as opaque authorities; they just match no role rule.
pub fn normalize(raw: Option<&str>) -> String {
    let trimmed = raw.map(str::trim).unwrap_or_default();

    if trimmed.is_empty() {
        ROLE_USER.to_string()
    } else if trimmed.starts_with(ROLE_PREFIX) {
        trimmed.to_string()
    } else {
        format!("{ROLE_PREFIX}{}", trimmed.to_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_blank_default_to_user() {
        assert_eq!(normalize(None), ROLE_USER);
        assert_eq!(normalize(Some("")), ROLE_USER);
        assert_eq!(normalize(Some("   ")), ROLE_USER);
    }

    #[test]
    fn bare_roles_get_the_prefix() {
        assert_eq!(normalize(Some("admin")), ROLE_ADMIN);
        assert_eq!(normalize(Some("User")), ROLE_USER);
        assert_eq!(normalize(Some(" admin ")), ROLE_ADMIN);
    }

    #[test]
    fn prefixed_roles_are_kept() {
        assert_eq!(normalize(Some("ROLE_ADMIN")), ROLE_ADMIN);
        assert_eq!(normalize(Some("ROLE_STAFF")), "ROLE_STAFF");
    }

    #[test]
    fn unknown_roles_stay_opaque() {
        assert_eq!(normalize(Some("therapist")), "ROLE_THERAPIST");
    }
}
