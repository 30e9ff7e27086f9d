//! Default-actor policy for mutations arriving without an authenticated member.
//!
//! The interface layer supplies an actor id with every mutating call; when no
//! principal is present it historically fell back to a hard-coded member id.
//! That fallback is an explicit, injectable policy here so both the
//! authenticated and the policy-default path can be configured and tested
//! deliberately.

/// Member id used when neither the environment nor the constructor supplies one.
pub const FALLBACK_ACTOR_ID: i64 = 1;

/// Policy deciding which member id owns a mutation when no authenticated
/// principal accompanies the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorPolicy {
    /// Member id substituted for missing principals.
    pub default_actor_id: i64,
}

impl ActorPolicy {
    /// Creates a policy with an explicit default actor id.
    #[must_use]
    pub const fn new(default_actor_id: i64) -> Self {
        Self { default_actor_id }
    }

    /// Builds the policy from the `DEFAULT_ACTOR_ID` environment variable,
    /// falling back to [`FALLBACK_ACTOR_ID`] when the variable is unset or
    /// unparsable.
    #[must_use]
    pub fn from_env() -> Self {
        let default_actor_id = std::env::var("DEFAULT_ACTOR_ID")
            .ok()
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(FALLBACK_ACTOR_ID);
        Self { default_actor_id }
    }

    /// Resolves the acting member: an authenticated id passes through, an
    /// absent one becomes the configured default.
    #[must_use]
    pub const fn resolve(&self, authenticated: Option<i64>) -> i64 {
        match authenticated {
            Some(id) => id,
            None => self.default_actor_id,
        }
    }
}

impl Default for ActorPolicy {
    fn default() -> Self {
        Self::new(FALLBACK_ACTOR_ID)
    }
}
