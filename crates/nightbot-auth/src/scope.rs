//! OAuth scopes and the authorization gate
//!
//! The server is the source of truth for granted scopes. The credential caches
//! the last reported set as `GrantedScopes`, which starts `Unknown` until a
//! probe or refresh fills it. The gate treats `Unknown` as empty, so a guarded
//! call can never pass on a scope set nobody has checked.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::error::{Error, Result};

/// Permission tokens of the Nightbot API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    Channel,
    ChannelSend,
    Commands,
    CommandsDefault,
    Regulars,
    SongRequests,
    SongRequestsQueue,
    SongRequestsPlaylist,
    SpamProtection,
    Subscribers,
    Timers,
}

impl Scope {
    pub const ALL: [Scope; 11] = [
        Scope::Channel,
        Scope::ChannelSend,
        Scope::Commands,
        Scope::CommandsDefault,
        Scope::Regulars,
        Scope::SongRequests,
        Scope::SongRequestsQueue,
        Scope::SongRequestsPlaylist,
        Scope::SpamProtection,
        Scope::Subscribers,
        Scope::Timers,
    ];

    /// Wire name of the scope.
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Channel => "channel",
            Scope::ChannelSend => "channel_send",
            Scope::Commands => "commands",
            Scope::CommandsDefault => "commands_default",
            Scope::Regulars => "regulars",
            Scope::SongRequests => "song_requests",
            Scope::SongRequestsQueue => "song_requests_queue",
            Scope::SongRequestsPlaylist => "song_requests_playlist",
            Scope::SpamProtection => "spam_protection",
            Scope::Subscribers => "subscribers",
            Scope::Timers => "timers",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scope name outside the API vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown scope: {0}")]
pub struct UnknownScope(pub String);

impl FromStr for Scope {
    type Err = UnknownScope;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Scope::ALL
            .iter()
            .copied()
            .find(|scope| scope.as_str() == s)
            .ok_or_else(|| UnknownScope(s.to_string()))
    }
}

/// Ordered scope list, rendered comma-separated in error messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeList(pub Vec<Scope>);

impl fmt::Display for ScopeList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, scope) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(scope.as_str())?;
        }
        Ok(())
    }
}

/// Cached view of the scopes the server has granted to the current token.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GrantedScopes {
    /// Never reported by the server (or not supplied at construction).
    #[default]
    Unknown,
    Known(BTreeSet<Scope>),
}

impl GrantedScopes {
    pub fn known(scopes: impl IntoIterator<Item = Scope>) -> Self {
        GrantedScopes::Known(scopes.into_iter().collect())
    }

    /// Build from scope names as the server reports them. Names outside the
    /// vocabulary are skipped: they cannot satisfy any endpoint requirement.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut scopes = BTreeSet::new();
        for name in names {
            match name.as_ref().parse::<Scope>() {
                Ok(scope) => {
                    scopes.insert(scope);
                }
                Err(e) => warn!(error = %e, "ignoring scope reported by server"),
            }
        }
        GrantedScopes::Known(scopes)
    }

    /// Parse the space-delimited `scope` field of a token response.
    pub fn from_scope_string(scope: &str) -> Self {
        Self::from_names(scope.split_whitespace())
    }

    pub fn is_known(&self) -> bool {
        matches!(self, GrantedScopes::Known(_))
    }

    /// Membership test; `Unknown` contains nothing.
    pub fn contains(&self, scope: Scope) -> bool {
        match self {
            GrantedScopes::Unknown => false,
            GrantedScopes::Known(scopes) => scopes.contains(&scope),
        }
    }

    /// Sorted scopes, or `None` while unknown.
    pub fn to_vec(&self) -> Option<Vec<Scope>> {
        match self {
            GrantedScopes::Unknown => None,
            GrantedScopes::Known(scopes) => Some(scopes.iter().copied().collect()),
        }
    }
}

impl From<Option<Vec<Scope>>> for GrantedScopes {
    fn from(scopes: Option<Vec<Scope>>) -> Self {
        match scopes {
            Some(scopes) => GrantedScopes::known(scopes),
            None => GrantedScopes::Unknown,
        }
    }
}

/// Check a call's required scopes against the cached grant.
///
/// `required == None` means the endpoint needs no permission. Otherwise every
/// required scope must be granted; the error lists the full required set in
/// its declared order. Pure: reads the cache, never the network.
pub fn ensure_authorized(granted: &GrantedScopes, required: Option<&[Scope]>) -> Result<()> {
    let Some(required) = required else {
        return Ok(());
    };
    if required.iter().all(|scope| granted.contains(*scope)) {
        return Ok(());
    }
    Err(Error::MissingScopes {
        required: ScopeList(required.to_vec()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for scope in Scope::ALL {
            assert_eq!(scope.as_str().parse::<Scope>().unwrap(), scope);
        }
        assert_eq!(
            "moderator".parse::<Scope>(),
            Err(UnknownScope("moderator".into()))
        );
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&vec![Scope::CommandsDefault, Scope::ChannelSend]).unwrap();
        assert_eq!(json, r#"["commands_default","channel_send"]"#);
        let parsed: Vec<Scope> = serde_json::from_str(r#"["song_requests_queue"]"#).unwrap();
        assert_eq!(parsed, vec![Scope::SongRequestsQueue]);
    }

    #[test]
    fn scope_string_is_split_on_whitespace() {
        let granted = GrantedScopes::from_scope_string("commands  channel\tchannel_send");
        assert_eq!(
            granted,
            GrantedScopes::known([Scope::Commands, Scope::Channel, Scope::ChannelSend])
        );
    }

    #[test]
    fn empty_scope_string_is_known_and_empty() {
        let granted = GrantedScopes::from_scope_string("");
        assert!(granted.is_known());
        assert_eq!(granted.to_vec(), Some(vec![]));
    }

    #[test]
    fn unknown_names_are_skipped() {
        let granted = GrantedScopes::from_names(["commands", "brand_new_scope"]);
        assert_eq!(granted, GrantedScopes::known([Scope::Commands]));
    }

    #[test]
    fn no_requirement_always_passes() {
        assert!(ensure_authorized(&GrantedScopes::Unknown, None).is_ok());
        assert!(ensure_authorized(&GrantedScopes::Known(BTreeSet::new()), None).is_ok());
        assert!(ensure_authorized(&GrantedScopes::known(Scope::ALL), None).is_ok());
    }

    #[test]
    fn unknown_grant_fails_closed() {
        let err = ensure_authorized(&GrantedScopes::Unknown, Some(&[Scope::Commands])).unwrap_err();
        assert!(matches!(err, Error::MissingScopes { .. }));
        assert!(err.to_string().contains("commands"));
    }

    #[test]
    fn empty_requirement_passes_even_when_unknown() {
        assert!(ensure_authorized(&GrantedScopes::Unknown, Some(&[] as &[Scope])).is_ok());
    }

    #[test]
    fn error_lists_full_required_set_in_order() {
        let granted = GrantedScopes::known([Scope::Channel]);
        let err = ensure_authorized(&granted, Some(&[Scope::Timers, Scope::Channel])).unwrap_err();
        match err {
            Error::MissingScopes { required } => {
                assert_eq!(required.0, vec![Scope::Timers, Scope::Channel]);
                assert_eq!(required.to_string(), "timers,channel");
            }
            other => panic!("expected MissingScopes, got {other:?}"),
        }
    }

    #[test]
    fn gate_passes_iff_required_is_subset_of_granted() {
        // Every pair of subsets over a four-scope universe
        let universe = [
            Scope::Channel,
            Scope::ChannelSend,
            Scope::Commands,
            Scope::CommandsDefault,
        ];
        let subset = |mask: u8| -> Vec<Scope> {
            universe
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, s)| *s)
                .collect()
        };

        for required_mask in 0u8..16 {
            for granted_mask in 0u8..16 {
                let required = subset(required_mask);
                let granted = GrantedScopes::known(subset(granted_mask));
                let expected = required_mask & !granted_mask == 0;
                assert_eq!(
                    ensure_authorized(&granted, Some(&required)).is_ok(),
                    expected,
                    "required={required:?} granted={granted:?}"
                );
            }
        }
    }

    #[test]
    fn option_vec_converts_to_tri_state() {
        assert_eq!(GrantedScopes::from(None), GrantedScopes::Unknown);
        assert_eq!(
            GrantedScopes::from(Some(vec![Scope::Timers])),
            GrantedScopes::known([Scope::Timers])
        );
    }
}
