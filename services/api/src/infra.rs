use metrics_exporter_prometheus::PrometheusHandle;
use sim_scoring::scoring::{
    CrisisSubmission, FinalReport, GroupActivity, Participant, PartnerSelection,
    ReactivationSequence, ReportStore, RiskLevel, RouteCalculation, SessionId, SessionStore,
    StoreError, UserId,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
pub(crate) struct InMemorySessionStore {
    participants: Mutex<HashMap<SessionId, Vec<Participant>>>,
    routes: Mutex<HashMap<(SessionId, UserId), RouteCalculation>>,
    partners: Mutex<HashMap<(SessionId, UserId), PartnerSelection>>,
    crises: Mutex<HashMap<(SessionId, UserId), CrisisSubmission>>,
    reactivations: Mutex<HashMap<(SessionId, UserId), ReactivationSequence>>,
    groups: Mutex<HashMap<(SessionId, UserId), GroupActivity>>,
}

impl InMemorySessionStore {
    pub(crate) fn add_participant(&self, session: &SessionId, participant: Participant) {
        self.participants
            .lock()
            .expect("participants mutex poisoned")
            .entry(session.clone())
            .or_default()
            .push(participant);
    }

    pub(crate) fn put_route(&self, session: &SessionId, submission: RouteCalculation) {
        self.routes
            .lock()
            .expect("routes mutex poisoned")
            .insert((session.clone(), submission.user_id.clone()), submission);
    }

    pub(crate) fn put_partner(&self, session: &SessionId, submission: PartnerSelection) {
        self.partners
            .lock()
            .expect("partners mutex poisoned")
            .insert((session.clone(), submission.user_id.clone()), submission);
    }

    pub(crate) fn put_crisis(&self, session: &SessionId, submission: CrisisSubmission) {
        self.crises
            .lock()
            .expect("crises mutex poisoned")
            .insert((session.clone(), submission.user_id.clone()), submission);
    }

    pub(crate) fn put_reactivation(&self, session: &SessionId, submission: ReactivationSequence) {
        self.reactivations
            .lock()
            .expect("reactivations mutex poisoned")
            .insert((session.clone(), submission.user_id.clone()), submission);
    }

    pub(crate) fn put_group_activity(
        &self,
        session: &SessionId,
        user: &UserId,
        activity: GroupActivity,
    ) {
        self.groups
            .lock()
            .expect("groups mutex poisoned")
            .insert((session.clone(), user.clone()), activity);
    }
}

impl SessionStore for InMemorySessionStore {
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
pub(crate) struct InMemoryReportStore {
    reports: Mutex<HashMap<(SessionId, UserId), FinalReport>>,
}

impl ReportStore for InMemoryReportStore {
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

/// Seed a demonstration cohort so serve/demo/export have data to work with.
/// Covers the full attempt spectrum, including a participant who never joins
/// a group and one who submits nothing.
pub(crate) fn seed_demo_session(store: &InMemorySessionStore) -> SessionId {
    let session = SessionId("demo-session".to_string());

    for (id, name) in [
        ("u-imani", "Imani Mwangi"),
        ("u-jonas", "Jonas Keller"),
        ("u-keiko", "Keiko Sato"),
        ("u-liam", "Liam O'Brien"),
    ] {
        store.add_participant(
            &session,
            Participant {
                user_id: UserId(id.to_string()),
                user_name: name.to_string(),
            },
        );
    }

    store.put_route(
        &session,
        RouteCalculation {
            user_id: UserId("u-imani".to_string()),
            session_id: session.clone(),
            route: vec![
                "HUB".to_string(),
                "NORTH-2".to_string(),
                "EAST-5".to_string(),
                "SOUTH-1".to_string(),
            ],
            total_distance: 540.0,
            total_time: 430.0,
            cold_chain_breaches: 0,
            base_revenue: 520_000.0,
            regional_modifier: 1.15,
            operating_costs: 260_000.0,
            penalties: 18_000.0,
            net_profit: 320_000.0,
        },
    );
    store.put_route(
        &session,
        RouteCalculation {
            user_id: UserId("u-jonas".to_string()),
            session_id: session.clone(),
            route: vec!["HUB".to_string(), "WEST-3".to_string()],
            total_distance: 380.0,
            total_time: 350.0,
            cold_chain_breaches: 2,
            base_revenue: 280_000.0,
            regional_modifier: 0.9,
            operating_costs: 290_000.0,
            penalties: 12_000.0,
            net_profit: -50_000.0,
        },
    );
    store.put_partner(
        &session,
        PartnerSelection {
            user_id: UserId("u-imani".to_string()),
            session_id: session.clone(),
            partner_id: "partner-medseg".to_string(),
            score: 8.6,
        },
    );
    store.put_partner(
        &session,
        PartnerSelection {
            user_id: UserId("u-jonas".to_string()),
            session_id: session.clone(),
            partner_id: "partner-axia".to_string(),
            score: 6.1,
        },
    );
    store.put_crisis(
        &session,
        CrisisSubmission {
            user_id: UserId("u-imani".to_string()),
            session_id: session.clone(),
            scenario_id: "recall-wave".to_string(),
            selected_advisors: vec!["legal".to_string(), "logistics".to_string()],
            selected_actions: vec!["public-statement".to_string(), "reroute".to_string()],
            total_cost: 64_000.0,
            effectiveness: 0.83,
            risk_level: RiskLevel::Medium,
        },
    );
    store.put_crisis(
        &session,
        CrisisSubmission {
            user_id: UserId("u-keiko".to_string()),
            session_id: session.clone(),
            scenario_id: "recall-wave".to_string(),
            selected_advisors: vec!["finance".to_string()],
            selected_actions: vec!["hold-statement".to_string()],
            total_cost: 21_000.0,
            effectiveness: 0.91,
            risk_level: RiskLevel::Low,
        },
    );
    store.put_reactivation(
        &session,
        ReactivationSequence {
            user_id: UserId("u-keiko".to_string()),
            session_id: session.clone(),
            sequence: vec![
                "audit".to_string(),
                "power".to_string(),
                "cold-room".to_string(),
                "restock".to_string(),
            ],
            total_duration: 110.0,
            critical_path_time: 88.0,
            risk_score: 0.15,
            resource_utilization: 0.9,
        },
    );
    store.put_group_activity(
        &session,
        &UserId("u-imani".to_string()),
        GroupActivity {
            messages: 14,
            decisions: 3,
            groups_joined: 1,
            leadership_roles: 1,
        },
    );
    store.put_group_activity(
        &session,
        &UserId("u-keiko".to_string()),
        GroupActivity {
            messages: 6,
            decisions: 2,
            groups_joined: 2,
            leadership_roles: 0,
        },
    );

    session
}
