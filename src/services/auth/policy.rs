//! Route-level access policy.
//!
//! An ordered table of `(method, path pattern) -> capabilities`, evaluated
//! top-down, first match wins. Requests that match no rule need an
//! authenticated caller. Paths are matched relative to the API mount point
//! (`/products/1`, not `/api/products/1`).
//!
//! Patterns are segment based:
//! - `*` matches exactly one segment
//! - `**` matches any number of segments (including none), only as the last segment
//! - anything else matches literally

use axum::http::Method;

use crate::services::auth::identity::Identity;
use crate::services::auth::role::{ROLE_ADMIN, ROLE_USER};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Public,
    AuthenticatedAny,
    RoleUser,
    RoleAdmin,
}

impl Capability {
    fn role(self) -> Option<&'static str> {
        match self {
            Capability::RoleUser => Some(ROLE_USER),
            Capability::RoleAdmin => Some(ROLE_ADMIN),
            Capability::Public | Capability::AuthenticatedAny => None,
        }
    }
}

/// Outcome of evaluating the policy for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    // no identity on a route that needs one (401)
    Unauthenticated,
    // identity present, role not accepted (403)
    Forbidden,
}

#[derive(Debug, Clone)]
pub enum MethodMatcher {
    Any,
    OneOf(Vec<Method>),
}

impl MethodMatcher {
    fn matches(&self, method: &Method) -> bool {
        match self {
            MethodMatcher::Any => true,
            MethodMatcher::OneOf(methods) => methods.contains(method),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    segments: Vec<String>,
}

impl PathPattern {
    pub fn new(pattern: &str) -> Self {
        Self {
            segments: split_path(pattern).map(str::to_string).collect(),
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        let path: Vec<&str> = split_path(path).collect();
        let mut i = 0;

        for (n, seg) in self.segments.iter().enumerate() {
            if seg == "**" && n == self.segments.len() - 1 {
                return true;
            }
            match path.get(i) {
                Some(p) if seg == "*" || seg == p => i += 1,
                _ => return false,
            }
        }

        i == path.len()
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// One row of the policy table. A request is admitted when it satisfies any
/// of `any_of`.
#[derive(Debug, Clone)]
pub struct PolicyRule {
    pub methods: MethodMatcher,
    pub patterns: Vec<PathPattern>,
    pub any_of: Vec<Capability>,
}

impl PolicyRule {
    pub fn new(methods: MethodMatcher, patterns: &[&str], any_of: &[Capability]) -> Self {
        Self {
            methods,
            patterns: patterns.iter().map(|p| PathPattern::new(p)).collect(),
            any_of: any_of.to_vec(),
        }
    }

    fn matches(&self, method: &Method, path: &str) -> bool {
        self.methods.matches(method) && self.patterns.iter().any(|p| p.matches(path))
    }
}

#[derive(Debug, Clone)]
pub struct AccessPolicy {
    rules: Vec<PolicyRule>,
}

const FALLBACK: &[Capability] = &[Capability::AuthenticatedAny];

const CATALOG: &[&str] = &[
    "/products/**",
    "/categories/**",
    "/services/**",
    "/service-categories/**",
];

impl AccessPolicy {
    pub fn new(rules: Vec<PolicyRule>) -> Self {
        Self { rules }
    }

    /// The storefront's policy table.
    pub fn storefront() -> Self {
        use Capability::*;
        use MethodMatcher::{Any, OneOf};

        let member = &[RoleUser, RoleAdmin];

        Self::new(vec![
            PolicyRule::new(OneOf(vec![Method::OPTIONS]), &["/**"], &[Public]),
            PolicyRule::new(Any, &["/auth/**"], &[Public]),
            PolicyRule::new(OneOf(vec![Method::GET]), CATALOG, &[Public]),
            PolicyRule::new(OneOf(vec![Method::POST]), &["/email/send"], &[Public]),
            PolicyRule::new(
                OneOf(vec![Method::POST, Method::GET]),
                &["/reservations/**"],
                member,
            ),
            PolicyRule::new(Any, &["/orders/**"], member),
            PolicyRule::new(OneOf(vec![Method::GET]), &["/users/**"], member),
            PolicyRule::new(OneOf(vec![Method::POST]), &["/images/upload"], &[RoleAdmin]),
            PolicyRule::new(
                OneOf(vec![Method::POST, Method::PUT, Method::DELETE]),
                CATALOG,
                &[RoleAdmin],
            ),
            PolicyRule::new(Any, &["/**"], &[AuthenticatedAny]),
        ])
    }

    /// Capabilities of the first matching rule, or the authenticated fallback.
    pub fn requirement(&self, method: &Method, path: &str) -> &[Capability] {
        self.rules
            .iter()
            .find(|r| r.matches(method, path))
            .map(|r| r.any_of.as_slice())
            .unwrap_or(FALLBACK)
    }

    pub fn decide(&self, method: &Method, path: &str, identity: Option<&Identity>) -> Decision {
        let any_of = self.requirement(method, path);

        if any_of.contains(&Capability::Public) {
            return Decision::Allow;
        }

        let Some(identity) = identity else {
            return Decision::Unauthenticated;
        };

        let admitted = any_of.iter().any(|cap| match cap {
            Capability::AuthenticatedAny => true,
            cap => cap.role().is_some_and(|r| identity.has_role(r)),
        });

        if admitted {
            Decision::Allow
        } else {
            Decision::Forbidden
        }
    }
}
