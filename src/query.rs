//! Session lookup over a [`RecordStore`].

use crate::{
    persist::{PersistResult, RecordStore},
    session::{Session, SessionReconstructor},
};

/// Read-only façade answering "which QSOs did the operator have".
pub struct QsoQuery<'s, S: RecordStore> {
    store: &'s S,
    operator_call: String,
    reconstructor: SessionReconstructor,
}

impl<'s, S: RecordStore> QsoQuery<'s, S> {
    /// Queries `store` on behalf of `operator_call`.
    pub fn new(store: &'s S, operator_call: &str, reconstructor: SessionReconstructor) -> Self {
        Self {
            store,
            operator_call: normalize_call(operator_call),
            reconstructor,
        }
    }

    /// Sessions with one target station, oldest first. Input is trimmed and upper-cased.
    pub fn sessions_with(&self, target_call: &str) -> PersistResult<Vec<Session>> {
        let target = normalize_call(target_call);
        let records = self.store.records_between(&self.operator_call, &target)?;
        let mut sessions = self.reconstructor.reconstruct(&target, records);
        sessions.sort_by_key(|s| s.start_time);
        Ok(sessions)
    }

    /// Sessions with every peer the operator ever shared a record with,
    /// merged and ordered by start time.
    pub fn all_sessions(&self) -> PersistResult<Vec<Session>> {
        let mut all = Vec::new();
        for peer in self.store.peers_of(&self.operator_call)? {
            let records = self.store.records_between(&self.operator_call, &peer)?;
            all.extend(self.reconstructor.reconstruct(&peer, records));
        }
        all.sort_by_key(|s| s.start_time);
        Ok(all)
    }
}

/// Canonical form for user-entered call-signs.
pub fn normalize_call(call: &str) -> String {
    call.trim().to_uppercase()
}

/// Narrows a session list the way the interactive viewer does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionFilter {
    /// Keep sessions whose peer contains this text (case-insensitive).
    pub call_contains: Option<String>,
    /// Keep sessions on exactly this band label.
    pub band: Option<String>,
}

impl SessionFilter {
    /// True when `session` passes every set criterion.
    pub fn matches(&self, session: &Session) -> bool {
        let call_ok = self
            .call_contains
            .as_deref()
            .map(normalize_call)
            .is_none_or(|needle| session.peer_call.contains(&needle));
        let band_ok = self
            .band
            .as_deref()
            .is_none_or(|band| session.band.eq_ignore_ascii_case(band.trim()));
        call_ok && band_ok
    }

    /// Keeps matching sessions, preserving order.
    pub fn apply(&self, sessions: Vec<Session>) -> Vec<Session> {
        sessions.into_iter().filter(|s| self.matches(s)).collect()
    }
}
