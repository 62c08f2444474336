use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::scoring::domain::{
    CrisisSubmission, FinalReport, GroupActivity, Participant, PartnerSelection,
    ReactivationSequence, RiskLevel, RouteCalculation, SessionId, UserId, UserInputs,
};
use crate::scoring::store::{ReportStore, SessionStore, StoreError};
use crate::scoring::ScoringService;

pub(super) fn session_id() -> SessionId {
    SessionId("sess-alpha".to_string())
}

pub(super) fn user(id: &str) -> UserId {
    UserId(id.to_string())
}

pub(super) fn route_submission(user_id: &str, net_profit: f64) -> RouteCalculation {
    RouteCalculation {
        user_id: user(user_id),
        session_id: session_id(),
        route: vec!["HUB".to_string(), "NORTH-2".to_string(), "EAST-5".to_string()],
        total_distance: 420.0,
        total_time: 400.0,
        cold_chain_breaches: 0,
        base_revenue: 400_000.0,
        regional_modifier: 1.0,
        operating_costs: 150_000.0,
        penalties: 0.0,
        net_profit,
    }
}

pub(super) fn partner_submission(user_id: &str, score: f64) -> PartnerSelection {
    PartnerSelection {
        user_id: user(user_id),
        session_id: session_id(),
        partner_id: "partner-medseg".to_string(),
        score,
    }
}

pub(super) fn crisis_submission(
    user_id: &str,
    effectiveness: f64,
    risk_level: RiskLevel,
) -> CrisisSubmission {
    CrisisSubmission {
        user_id: user(user_id),
        session_id: session_id(),
        scenario_id: "recall-wave".to_string(),
        selected_advisors: vec!["legal".to_string(), "logistics".to_string()],
        selected_actions: vec!["public-statement".to_string()],
        total_cost: 40_000.0,
        effectiveness,
        risk_level,
    }
}

pub(super) fn reactivation_submission(user_id: &str, risk_score: f64) -> ReactivationSequence {
    ReactivationSequence {
        user_id: user(user_id),
        session_id: session_id(),
        sequence: vec!["power".to_string(), "cold-room".to_string(), "lines".to_string()],
        total_duration: 120.0,
        critical_path_time: 90.0,
        risk_score,
        resource_utilization: 0.85,
    }
}

pub(super) fn active_group() -> GroupActivity {
    GroupActivity {
        messages: 12,
        decisions: 3,
        groups_joined: 1,
        leadership_roles: 1,
    }
}

pub(super) fn full_inputs() -> UserInputs {
    UserInputs {
        route: Some(route_submission("alice", 250_000.0)),
        partner: Some(partner_submission("alice", 8.4)),
        crisis: Some(crisis_submission("alice", 0.83, RiskLevel::Medium)),
        reactivation: Some(reactivation_submission("alice", 0.2)),
        group: active_group(),
    }
}

#[derive(Default)]
pub(super) struct MemorySessionStore {
    pub(super) participants: Mutex<HashMap<SessionId, Vec<Participant>>>,
    pub(super) routes: Mutex<HashMap<(SessionId, UserId), RouteCalculation>>,
    pub(super) partners: Mutex<HashMap<(SessionId, UserId), PartnerSelection>>,
    pub(super) crises: Mutex<HashMap<(SessionId, UserId), CrisisSubmission>>,
    pub(super) reactivations: Mutex<HashMap<(SessionId, UserId), ReactivationSequence>>,
    pub(super) groups: Mutex<HashMap<(SessionId, UserId), GroupActivity>>,
}

impl MemorySessionStore {
    pub(super) fn add_participant(&self, session: &SessionId, user_id: &str, name: &str) {
        self.participants
            .lock()
            .expect("participants mutex poisoned")
            .entry(session.clone())
            .or_default()
            .push(Participant {
                user_id: user(user_id),
                user_name: name.to_string(),
            });
    }
}

impl SessionStore for MemorySessionStore {
    fn participants(&self, session: &SessionId) -> Result<Vec<Participant>, StoreError> {
        self.participants
            .lock()
            .expect("participants mutex poisoned")
            .get(session)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    fn route_submission(
        &self,
        session: &SessionId,
        user: &UserId,
    ) -> Result<Option<RouteCalculation>, StoreError> {
        Ok(self
            .routes
            .lock()
            .expect("routes mutex poisoned")
            .get(&(session.clone(), user.clone()))
            .cloned())
    }

    fn partner_submission(
        &self,
        session: &SessionId,
        user: &UserId,
    ) -> Result<Option<PartnerSelection>, StoreError> {
        Ok(self
            .partners
            .lock()
            .expect("partners mutex poisoned")
            .get(&(session.clone(), user.clone()))
            .cloned())
    }

    fn crisis_submission(
        &self,
        session: &SessionId,
        user: &UserId,
    ) -> Result<Option<CrisisSubmission>, StoreError> {
        Ok(self
            .crises
            .lock()
            .expect("crises mutex poisoned")
            .get(&(session.clone(), user.clone()))
            .cloned())
    }

    fn reactivation_submission(
        &self,
        session: &SessionId,
        user: &UserId,
    ) -> Result<Option<ReactivationSequence>, StoreError> {
        Ok(self
            .reactivations
            .lock()
            .expect("reactivations mutex poisoned")
            .get(&(session.clone(), user.clone()))
            .cloned())
    }

    fn group_activity(
        &self,
        session: &SessionId,
        user: &UserId,
    ) -> Result<GroupActivity, StoreError> {
        Ok(self
            .groups
            .lock()
            .expect("groups mutex poisoned")
            .get(&(session.clone(), user.clone()))
            .copied()
            .unwrap_or_default())
    }
}

#[derive(Default)]
pub(super) struct MemoryReportStore {
    pub(super) reports: Mutex<HashMap<(SessionId, UserId), FinalReport>>,
}

impl ReportStore for MemoryReportStore {
    fn find(&self, session: &SessionId, user: &UserId) -> Result<Option<FinalReport>, StoreError> {
        Ok(self
            .reports
            .lock()
            .expect("reports mutex poisoned")
            .get(&(session.clone(), user.clone()))
            .cloned())
    }

    fn insert(&self, report: FinalReport) -> Result<FinalReport, StoreError> {
        let mut guard = self.reports.lock().expect("reports mutex poisoned");
        let key = (report.session_id.clone(), report.user_id.clone());
        if guard.contains_key(&key) {
            return Err(StoreError::Conflict);
        }
        guard.insert(key, report.clone());
        Ok(report)
    }
}

/// Four-participant session covering the full spectrum of attempts:
/// alice does everything, bruno loses money on the route and skips group
/// work, chandra only participates in the group round, devi submits nothing.
pub(super) fn seeded_service() -> (
    ScoringService<MemorySessionStore, MemoryReportStore>,
    Arc<MemorySessionStore>,
    Arc<MemoryReportStore>,
) {
    let store = Arc::new(MemorySessionStore::default());
    let reports = Arc::new(MemoryReportStore::default());
    let session = session_id();

    store.add_participant(&session, "alice", "Alice Okafor");
    store.add_participant(&session, "bruno", "Bruno Lima");
    store.add_participant(&session, "chandra", "Chandra Rao");
    store.add_participant(&session, "devi", "Devi Sharma");

    store.routes.lock().expect("routes mutex poisoned").extend([
        (
            (session.clone(), user("alice")),
            route_submission("alice", 250_000.0),
        ),
        (
            (session.clone(), user("bruno")),
            route_submission("bruno", -50_000.0),
        ),
    ]);
    store
        .partners
        .lock()
        .expect("partners mutex poisoned")
        .insert(
            (session.clone(), user("alice")),
            partner_submission("alice", 8.4),
        );
    store.crises.lock().expect("crises mutex poisoned").extend([
        (
            (session.clone(), user("alice")),
            crisis_submission("alice", 0.83, RiskLevel::Medium),
        ),
        (
            (session.clone(), user("bruno")),
            crisis_submission("bruno", 0.6, RiskLevel::High),
        ),
    ]);
    store
        .reactivations
        .lock()
        .expect("reactivations mutex poisoned")
        .insert(
            (session.clone(), user("alice")),
            reactivation_submission("alice", 0.2),
        );
    store.groups.lock().expect("groups mutex poisoned").extend([
        ((session.clone(), user("alice")), active_group()),
        (
            (session.clone(), user("chandra")),
            GroupActivity {
                messages: 4,
                decisions: 2,
                groups_joined: 2,
                leadership_roles: 0,
            },
        ),
    ]);

    let service = ScoringService::new(store.clone(), reports.clone());
    (service, store, reports)
}
