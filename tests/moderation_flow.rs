//! End-to-end moderation cycles against the in-process fake backend.

mod common;

use afn::afn_config::{AfnConfig, AfnToml};
use afn::moderation::{
    Badge, DashboardState, Decision, HttpModerationClient, Indicator, ListMode, ModerationApi,
    RequestDashboard, RequestListView, submit_request,
};
use afn::{AfnError, NewForgeRequest, RequestStatus, TransitionTableError};

fn test_toml(base_url: &str) -> AfnToml {
    let mut toml = AfnToml::default();
    toml.server.base_url = base_url.to_string();
    toml.auth.csrf_token = Some(common::CSRF_TOKEN.to_string());
    toml
}

fn client_from(toml: AfnToml) -> HttpModerationClient {
    let base_url = toml.server.base_url.clone();
    let config = AfnConfig::from_toml(toml).with_cli_args(Some(base_url), false);
    HttpModerationClient::from_config(&config).unwrap()
}

fn client(base_url: &str) -> HttpModerationClient {
    client_from(test_toml(base_url))
}

fn client_with_transitions(base_url: &str) -> HttpModerationClient {
    let mut toml = test_toml(base_url);
    toml.endpoints.transitions = common::TRANSITIONS_PATH.to_string();
    client_from(toml)
}

fn form(url: &str) -> NewForgeRequest {
    NewForgeRequest {
        forge_type: "gitea".to_string(),
        forge_url: url.to_string(),
        forge_contact_name: "Grace".to_string(),
        forge_contact_email: "grace@example.org".to_string(),
        forge_contact_comment: Some("small instance".to_string()),
        submitter_forward_username: true,
    }
}

#[tokio::test]
async fn test_load_decide_reload_cycle() {
    let state = common::backend_with(&[(1, RequestStatus::Pending)]);
    let base = common::spawn(state.clone()).await;
    let mut dashboard = RequestDashboard::new(client(&base), 1);

    dashboard.load().await;
    let offered: Vec<_> = dashboard.decision_options().iter().map(|o| o.status).collect();
    assert_eq!(
        offered,
        vec![
            RequestStatus::WaitingForFeedback,
            RequestStatus::Rejected,
            RequestStatus::Suspended
        ]
    );

    dashboard
        .submit_decision(Decision::new(RequestStatus::WaitingForFeedback).with_comment("which url?"))
        .await
        .unwrap();

    let view = dashboard.view().unwrap();
    assert_eq!(view.status_label(), "Waiting for feedback");
    assert_eq!(view.history.len(), 1);
    assert_eq!(view.history[0].text, "which url?");
    assert_eq!(
        dashboard.indicator(),
        Some(&Indicator::SubmitSuccess(RequestStatus::WaitingForFeedback))
    );

    let backend = state.lock().unwrap();
    assert_eq!(backend.get_calls, 2);
    assert_eq!(backend.csrf_seen, vec![Some(common::CSRF_TOKEN.to_string())]);
}

#[tokio::test]
async fn test_server_failure_keeps_view_and_shows_body() {
    let state = common::backend_with(&[(3, RequestStatus::Accepted)]);
    state.lock().unwrap().fail_next_update = Some("scheduler unavailable".to_string());
    let base = common::spawn(state.clone()).await;
    let mut dashboard = RequestDashboard::new(client(&base), 3);
    dashboard.load().await;

    let err = dashboard
        .submit_decision(Decision::new(RequestStatus::Scheduled))
        .await
        .unwrap_err();
    assert!(matches!(err, AfnError::Http { status: 500, .. }));
    assert!(matches!(dashboard.state(), DashboardState::Loaded(_)));
    match dashboard.indicator() {
        Some(Indicator::SubmitError(message)) => {
            assert!(message.contains("Error: scheduler unavailable"))
        }
        other => panic!("unexpected indicator {:?}", other),
    }
    assert_eq!(state.lock().unwrap().get_calls, 1);
}

#[tokio::test]
async fn test_missing_request_is_a_load_error() {
    let base = common::spawn(common::backend_with(&[])).await;
    let mut dashboard = RequestDashboard::new(client(&base), 42);
    match dashboard.load().await {
        DashboardState::LoadError(message) => {
            assert!(message.starts_with("Error while fetching add-forge-now request 42"));
            assert!(message.contains("Request 42 not found"));
        }
        other => panic!("unexpected state {}", other.name()),
    }
    assert!(dashboard.decision_options().is_empty());
}

#[tokio::test]
async fn test_duplicate_creation_is_refused() {
    let state = common::backend_with(&[]);
    let base = common::spawn(state.clone()).await;
    let api = client(&base);

    let first = submit_request(&api, &form("https://codeberg.example/")).await;
    assert_eq!(first.badge, Badge::Success);
    assert_eq!(first.created.as_ref().unwrap().status, RequestStatus::Pending);

    let second = submit_request(&api, &form("https://codeberg.example/")).await;
    assert_eq!(second.badge, Badge::Error);
    assert!(second.message.contains("error"));
    assert!(second.message.contains("already exists"));

    assert_eq!(state.lock().unwrap().requests.len(), 1);
}

#[tokio::test]
async fn test_empty_listing() {
    let base = common::spawn(common::backend_with(&[])).await;
    let base_url = reqwest_base(&base);
    let mut view = RequestListView::new(client(&base), ListMode::Browse, base_url, 10);
    let table = view.refresh().await.unwrap();
    assert!(table.is_empty());
    assert_eq!(table.records_total, 0);
}

#[tokio::test]
async fn test_listing_pages_and_search() {
    let requests: Vec<_> = (1..=12).map(|id| (id, RequestStatus::Pending)).collect();
    let base = common::spawn(common::backend_with(&requests)).await;
    let api = client(&base);

    let page = api
        .list_requests(&afn::moderation::DataTablesQuery::new(5))
        .await
        .unwrap();
    assert_eq!(page.data.len(), 5);
    assert_eq!(page.records_total, 12);

    let mut view = RequestListView::new(api, ListMode::Moderation, reqwest_base(&base), 5);
    let table = view.search("gitlab1").await.unwrap();
    assert_eq!(table.records_filtered, 4);
    assert_eq!(table.records_total, 12);
    assert!(table.rows[0].link.ends_with("/admin/add-forge/request/1/"));
}

#[tokio::test]
async fn test_bearer_token_sent_on_every_call() {
    let state = common::backend_with(&[(1, RequestStatus::Pending)]);
    let base = common::spawn(state.clone()).await;
    let mut toml = test_toml(&base);
    toml.auth.api_token = Some(common::API_TOKEN.to_string());
    let mut dashboard = RequestDashboard::new(client_from(toml), 1);

    dashboard.load().await;
    dashboard
        .submit_decision(Decision::new(RequestStatus::Rejected))
        .await
        .unwrap();

    let expected = Some(format!("Bearer {}", common::API_TOKEN));
    let backend = state.lock().unwrap();
    assert_eq!(backend.authorization_seen.len(), 3);
    assert!(backend.authorization_seen.iter().all(|h| *h == expected));
}

#[tokio::test]
async fn test_no_authorization_without_token() {
    let state = common::backend_with(&[(1, RequestStatus::Pending)]);
    let base = common::spawn(state.clone()).await;
    let mut dashboard = RequestDashboard::new(client(&base), 1);
    dashboard.load().await;
    assert_eq!(state.lock().unwrap().authorization_seen, vec![None]);
}

#[tokio::test]
async fn test_fetched_table_narrows_decisions() {
    let state = common::backend_with(&[(1, RequestStatus::Pending)]);
    state.lock().unwrap().transitions = Some(common::narrowed_table(
        RequestStatus::Pending,
        &[RequestStatus::Rejected],
    ));
    let base = common::spawn(state.clone()).await;
    let mut dashboard = RequestDashboard::new(client_with_transitions(&base), 1);

    dashboard.sync_transitions().await.unwrap();
    dashboard.load().await;
    let offered: Vec<_> = dashboard.decision_options().iter().map(|o| o.status).collect();
    assert_eq!(offered, vec![RequestStatus::Rejected]);

    // Allowed by the builtin table, not by the fetched one.
    let err = dashboard
        .submit_decision(Decision::new(RequestStatus::Suspended))
        .await
        .unwrap_err();
    assert!(matches!(err, AfnError::IllegalTransition { .. }));
    assert!(state.lock().unwrap().csrf_seen.is_empty());
}

#[tokio::test]
async fn test_incomplete_fetched_table_is_refused() {
    let state = common::backend_with(&[(1, RequestStatus::Pending)]);
    let mut table = common::narrowed_table(RequestStatus::Pending, &[RequestStatus::Rejected]);
    table.remove("DENIED");
    state.lock().unwrap().transitions = Some(table);
    let base = common::spawn(state).await;

    let err = client_with_transitions(&base)
        .transition_table()
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AfnError::InvalidTransitionTable(TransitionTableError::MissingEntry(RequestStatus::Denied))
    ));

    let mut dashboard = RequestDashboard::new(client_with_transitions(&base), 1);
    assert!(dashboard.sync_transitions().await.is_err());
    dashboard.load().await;
    assert_eq!(dashboard.decision_options().len(), 3);
}

#[tokio::test]
async fn test_unconfigured_transitions_endpoint_is_not_called() {
    let state = common::backend_with(&[]);
    let base = common::spawn(state.clone()).await;
    assert!(client(&base).transition_table().await.unwrap().is_none());
    assert!(state.lock().unwrap().authorization_seen.is_empty());
}

fn reqwest_base(base: &str) -> reqwest::Url {
    reqwest::Url::parse(base).unwrap()
}
