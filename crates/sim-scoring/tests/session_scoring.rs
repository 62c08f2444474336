use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use sim_scoring::scoring::{
    CrisisSubmission, ExportFormat, FinalReport, GroupActivity, Participant, PartnerSelection,
    ReactivationSequence, ReportStore, RiskLevel, RouteCalculation, ScoringError, ScoringService,
    SessionId, SessionStore, StoreError, UserId,
};

#[derive(Default)]
struct FixtureStore {
    participants: Vec<Participant>,
    routes: HashMap<UserId, RouteCalculation>,
    partners: HashMap<UserId, PartnerSelection>,
    crises: HashMap<UserId, CrisisSubmission>,
    reactivations: HashMap<UserId, ReactivationSequence>,
    groups: HashMap<UserId, GroupActivity>,
}

impl SessionStore for FixtureStore {
    fn participants(&self, session: &SessionId) -> Result<Vec<Participant>, StoreError> {
        if session == &session_id() {
            Ok(self.participants.clone())
        } else {
            Err(StoreError::NotFound)
        }
    }

    fn route_submission(
        &self,
        _session: &SessionId,
        user: &UserId,
    ) -> Result<Option<RouteCalculation>, StoreError> {
        Ok(self.routes.get(user).cloned())
    }

    fn partner_submission(
        &self,
        _session: &SessionId,
        user: &UserId,
    ) -> Result<Option<PartnerSelection>, StoreError> {
        Ok(self.partners.get(user).cloned())
    }

    fn crisis_submission(
        &self,
        _session: &SessionId,
        user: &UserId,
    ) -> Result<Option<CrisisSubmission>, StoreError> {
        Ok(self.crises.get(user).cloned())
    }

    fn reactivation_submission(
        &self,
        _session: &SessionId,
        user: &UserId,
    ) -> Result<Option<ReactivationSequence>, StoreError> {
        Ok(self.reactivations.get(user).cloned())
    }

    fn group_activity(
        &self,
        _session: &SessionId,
        user: &UserId,
    ) -> Result<GroupActivity, StoreError> {
        Ok(self.groups.get(user).copied().unwrap_or_default())
    }
}

#[derive(Default)]
struct FixtureReports {
    records: Mutex<HashMap<(SessionId, UserId), FinalReport>>,
}

impl ReportStore for FixtureReports {
    fn find(&self, session: &SessionId, user: &UserId) -> Result<Option<FinalReport>, StoreError> {
        Ok(self
            .records
            .lock()
            .expect("reports mutex poisoned")
            .get(&(session.clone(), user.clone()))
            .cloned())
    }

    fn insert(&self, report: FinalReport) -> Result<FinalReport, StoreError> {
        let mut guard = self.records.lock().expect("reports mutex poisoned");
        let key = (report.session_id.clone(), report.user_id.clone());
        if guard.contains_key(&key) {
            return Err(StoreError::Conflict);
        }
        guard.insert(key, report.clone());
        Ok(report)
    }
}

fn session_id() -> SessionId {
    SessionId("cohort-7".to_string())
}

fn user(id: &str) -> UserId {
    UserId(id.to_string())
}

fn fixture_service() -> ScoringService<FixtureStore, FixtureReports> {
    let session = session_id();
    let mut store = FixtureStore::default();

    for (id, name) in [
        ("farah", "Farah Haddad"),
        ("gustav", "Gustav Lindqvist"),
        ("hana", "Hana Novak"),
    ] {
        store.participants.push(Participant {
            user_id: user(id),
            user_name: name.to_string(),
        });
    }

    store.routes.insert(
        user("farah"),
        RouteCalculation {
            user_id: user("farah"),
            session_id: session.clone(),
            route: vec!["HUB".into(), "WEST-1".into()],
            total_distance: 310.0,
            total_time: 350.0,
            cold_chain_breaches: 1,
            base_revenue: 300_000.0,
            regional_modifier: 1.1,
            operating_costs: 180_000.0,
            penalties: 10_000.0,
            net_profit: 140_000.0,
        },
    );
    store.partners.insert(
        user("farah"),
        PartnerSelection {
            user_id: user("farah"),
            session_id: session.clone(),
            partner_id: "partner-axia".into(),
            score: 7.2,
        },
    );
    store.crises.insert(
        user("gustav"),
        CrisisSubmission {
            user_id: user("gustav"),
            session_id: session.clone(),
            scenario_id: "supply-halt".into(),
            selected_advisors: vec!["finance".into()],
            selected_actions: vec!["reroute".into(), "hold-statement".into()],
            total_cost: 25_000.0,
            effectiveness: 0.74,
            risk_level: RiskLevel::Low,
        },
    );
    store.reactivations.insert(
        user("gustav"),
        ReactivationSequence {
            user_id: user("gustav"),
            session_id: session.clone(),
            sequence: vec!["audit".into(), "power".into(), "restock".into()],
            total_duration: 96.0,
            critical_path_time: 72.0,
            risk_score: 0.35,
            resource_utilization: 0.7,
        },
    );
    store.groups.insert(
        user("hana"),
        GroupActivity {
            messages: 9,
            decisions: 4,
            groups_joined: 1,
            leadership_roles: 1,
        },
    );

    ScoringService::new(Arc::new(store), Arc::new(FixtureReports::default()))
}

#[test]
fn end_to_end_session_scoring_ranks_every_participant() {
    let service = fixture_service();
    let result = service.session_scores(&session_id()).expect("session scored");

    assert_eq!(result.total_participants, 3);
    assert_eq!(result.user_scores.len(), 3);

    // Farah's route profit dominates the totals.
    assert_eq!(result.user_scores[0].user_id, user("farah"));
    assert_eq!(result.user_scores[0].rank, 1);
    assert_eq!(result.user_scores[0].total_score, 140_000.0 + 7.2);

    let ranks: Vec<u32> = result.user_scores.iter().map(|score| score.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3]);

    for score in &result.user_scores {
        assert_eq!(score.competency_scores.len(), 10);
        for competency in &score.competency_scores {
            assert!(competency.percentage >= 0.0 && competency.percentage <= 100.0);
        }
    }
}

#[test]
fn report_generation_is_idempotent_across_calls() {
    let service = fixture_service();
    let first = service
        .final_report(&session_id(), &user("gustav"))
        .expect("first report");
    let second = service
        .final_report(&session_id(), &user("gustav"))
        .expect("second report");

    assert_eq!(first.generated_at, second.generated_at);
    assert_eq!(first, second);
}

#[test]
fn exports_cover_both_supported_formats() {
    let service = fixture_service();

    let csv = service
        .export(&session_id(), ExportFormat::Csv)
        .expect("csv export");
    assert_eq!(csv.content_type, "text/csv");
    let body = String::from_utf8(csv.body).expect("utf-8 csv");
    assert_eq!(body.lines().count(), 4);

    let json = service
        .export(&session_id(), ExportFormat::Json)
        .expect("json export");
    assert_eq!(json.content_type, "application/json");
    assert_eq!(json.filename, "scoring_results_cohort-7.json");

    assert!(ExportFormat::from_str("parquet").is_err());
}

#[test]
fn unknown_sessions_surface_not_found_on_every_operation() {
    let service = fixture_service();
    let missing = SessionId("cohort-ghost".to_string());

    assert!(matches!(
        service.session_scores(&missing),
        Err(ScoringError::SessionNotFound(_))
    ));
    assert!(matches!(
        service.final_report(&missing, &user("farah")),
        Err(ScoringError::SessionNotFound(_))
    ));
    assert!(matches!(
        service.export(&missing, ExportFormat::Csv),
        Err(ScoringError::SessionNotFound(_))
    ));
}
