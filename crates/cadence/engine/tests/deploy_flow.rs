//! End-to-end deployment flow against in-memory collaborators.

use cadence_engine::{
    CampaignStore, DeploymentOrchestrator, InMemoryActivitySink, InMemoryCampaignStore,
    InMemoryContactStore, InMemoryStepStore, InMemoryWorkflowStore, StaticComplianceChecker,
    StepStore, StubLiveSearchLauncher,
};
use cadence_gate::{
    ActionStore, ExecutionGate, InMemoryActionStore, InMemoryApprovalStore, InMemoryLearningSink,
    InMemoryPauseStore,
};
use cadence_types::{
    ActivityKind, ActorId, CampaignError, CampaignStatus, ComplianceIssue, ComplianceReport,
    Contact, ContactId, NodeConfig, StepStatus, WorkflowEdge, WorkflowId, WorkflowNode,
    WorkspaceId,
};
use std::sync::Arc;

struct World {
    workflows: Arc<InMemoryWorkflowStore>,
    contacts: Arc<InMemoryContactStore>,
    campaigns: Arc<InMemoryCampaignStore>,
    steps: Arc<InMemoryStepStore>,
    actions: Arc<InMemoryActionStore>,
    activities: Arc<InMemoryActivitySink>,
    launcher: Arc<StubLiveSearchLauncher>,
    orchestrator: DeploymentOrchestrator,
}

fn world_with(checker: StaticComplianceChecker, launcher: StubLiveSearchLauncher) -> World {
    let workflows = Arc::new(InMemoryWorkflowStore::new());
    let contacts = Arc::new(InMemoryContactStore::new());
    let campaigns = Arc::new(InMemoryCampaignStore::new());
    let steps = Arc::new(InMemoryStepStore::new());
    let activities = Arc::new(InMemoryActivitySink::new());
    let launcher = Arc::new(launcher);

    let actions = Arc::new(InMemoryActionStore::new());
    let gate = Arc::new(ExecutionGate::new(
        actions.clone(),
        Arc::new(InMemoryApprovalStore::new()),
        Arc::new(InMemoryPauseStore::new()),
        Arc::new(InMemoryLearningSink::new()),
    ));

    let orchestrator = DeploymentOrchestrator::new(
        workflows.clone(),
        contacts.clone(),
        campaigns.clone(),
        steps.clone(),
        Arc::new(checker),
        launcher.clone(),
        activities.clone(),
        gate,
    );
    World {
        workflows,
        contacts,
        campaigns,
        steps,
        actions,
        activities,
        launcher,
        orchestrator,
    }
}

fn world() -> World {
    world_with(
        StaticComplianceChecker::permissive(),
        StubLiveSearchLauncher::succeeding(),
    )
}

/// trigger → email → wait → linkedin_message
async fn seed_outreach_workflow(world: &World) -> WorkflowId {
    let wf = WorkflowId::new("wf-outreach");
    let trigger = WorkflowNode::new("n-trigger", wf.clone(), "trigger", "Contact added")
        .with_position_y(0.0);
    let email = WorkflowNode::new("n-email", wf.clone(), "email", "Intro email")
        .with_position_y(100.0)
        .with_config(
            NodeConfig::default()
                .with_subject("Hi {{first_name}}")
                .with_content("Hello {{first_name}}, greetings from {{company}}."),
        );
    let wait = WorkflowNode::new("n-wait", wf.clone(), "wait", "Wait 3 days")
        .with_position_y(200.0)
        .with_config(NodeConfig::default().with_wait_days(3));
    let followup = WorkflowNode::new("n-msg", wf.clone(), "linkedin_message", "Follow up")
        .with_position_y(300.0)
        .with_config(NodeConfig::default().with_content("Following up, {{first_name}}."));

    let edges = vec![
        WorkflowEdge::new("e1", wf.clone(), trigger.id.clone(), email.id.clone()),
        WorkflowEdge::new("e2", wf.clone(), email.id.clone(), wait.id.clone()),
        WorkflowEdge::new("e3", wf.clone(), wait.id.clone(), followup.id.clone()),
    ];
    world
        .workflows
        .insert_graph(wf.clone(), vec![trigger, email, wait, followup], edges)
        .await;
    wf
}

async fn seed_contacts(world: &World) -> Vec<ContactId> {
    world
        .contacts
        .insert(
            Contact::new("c-ana")
                .with_name("Ana", "Souza")
                .with_company("Acme"),
        )
        .await;
    world
        .contacts
        .insert(Contact::new("c-ben").with_name("Ben", "Okafor"))
        .await;
    vec![ContactId::new("c-ana"), ContactId::new("c-ben")]
}

fn actor() -> ActorId {
    ActorId::new("actor-1")
}

fn workspace() -> WorkspaceId {
    WorkspaceId::new("ws-1")
}

#[tokio::test]
async fn test_deploy_happy_path() {
    let world = world();
    let wf = seed_outreach_workflow(&world).await;
    let contact_ids = seed_contacts(&world).await;

    let receipt = world
        .orchestrator
        .deploy(&wf, &contact_ids, &actor(), &workspace())
        .await
        .unwrap();

    assert!(!receipt.is_live_search);
    // 3 actionable steps (trigger filtered out) for 2 contacts.
    assert_eq!(receipt.scheduled_count, 6);

    let campaign = world
        .campaigns
        .find_by_workflow(&wf)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(campaign.id, receipt.campaign_id);
    assert_eq!(campaign.status, CampaignStatus::Active);

    let steps = world.steps.steps_for_campaign(&campaign.id).await.unwrap();
    assert_eq!(steps.len(), 3);
    assert_eq!(steps[0].order_index, 0);
    assert_eq!(steps[0].delay, 0);

    let scheduled = world.actions.list_for_campaign(&campaign.id).await.unwrap();
    assert_eq!(scheduled.len(), 6);
    assert!(scheduled.iter().all(|s| s.status == StepStatus::Pending));

    // Personalization resolved against each contact.
    let ana: Vec<_> = scheduled
        .iter()
        .filter(|s| s.contact_id == ContactId::new("c-ana"))
        .collect();
    assert!(ana
        .iter()
        .any(|s| s.content.body == "Hello Ana, greetings from Acme."));

    // Progress telemetry: 10 → 30 → 100.
    let events = world.activities.events().await;
    let progress: Vec<_> = events.iter().filter_map(|e| e.progress).collect();
    assert_eq!(progress, vec![10, 30, 100]);
    assert_eq!(events.last().unwrap().kind, ActivityKind::DeploymentCompleted);
}

#[tokio::test]
async fn test_compliance_rejection_schedules_nothing() {
    let world = world_with(
        StaticComplianceChecker::new(ComplianceReport::blocked(vec![ComplianceIssue::new(
            "suppressed_contact",
            "contact opted out",
        )])),
        StubLiveSearchLauncher::succeeding(),
    );
    let wf = seed_outreach_workflow(&world).await;
    let contact_ids = seed_contacts(&world).await;

    let err = world
        .orchestrator
        .deploy(&wf, &contact_ids, &actor(), &workspace())
        .await
        .unwrap_err();
    let CampaignError::ComplianceRejected(issues) = err else {
        panic!("expected compliance rejection");
    };
    assert_eq!(issues.len(), 1);

    // The campaign was created, but nothing was persisted past the check.
    let campaign = world
        .campaigns
        .find_by_workflow(&wf)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(campaign.status, CampaignStatus::Draft);
    assert!(world
        .steps
        .steps_for_campaign(&campaign.id)
        .await
        .unwrap()
        .is_empty());
    assert!(world.actions.is_empty().await);

    let events = world.activities.events().await;
    assert_eq!(events.last().unwrap().kind, ActivityKind::DeploymentFailed);
}

#[tokio::test]
async fn test_live_search_deploy_triggers_and_skips_pipeline() {
    let world = world();
    let wf = WorkflowId::new("wf-search");
    let search = WorkflowNode::new("n-search", wf.clone(), "linkedin_search", "Find founders")
        .with_position_y(0.0)
        .with_config(
            NodeConfig::default().with_search(serde_json::json!({"query": "founders"})),
        );
    let email = WorkflowNode::new("n-email", wf.clone(), "email", "Intro").with_position_y(100.0);
    let edges = vec![WorkflowEdge::new(
        "e1",
        wf.clone(),
        search.id.clone(),
        email.id.clone(),
    )];
    world
        .workflows
        .insert_graph(wf.clone(), vec![search, email], edges)
        .await;

    // No contacts needed: discovery streams them in later.
    let receipt = world
        .orchestrator
        .deploy(&wf, &[], &actor(), &workspace())
        .await
        .unwrap();

    assert!(receipt.is_live_search);
    assert_eq!(receipt.scheduled_count, 0);
    assert_eq!(world.launcher.trigger_count().await, 1);
    let (config, context) = world.launcher.last_trigger().await.unwrap();
    assert_eq!(config["query"], "founders");
    assert_eq!(context.workflow_id, wf);

    let campaign = world
        .campaigns
        .find_by_workflow(&wf)
        .await
        .unwrap()
        .unwrap();
    assert!(campaign.settings.is_live_search);
    assert_eq!(campaign.status, CampaignStatus::Active);
    assert!(world.actions.is_empty().await);

    let events = world.activities.events().await;
    assert!(events
        .iter()
        .any(|e| e.kind == ActivityKind::LiveSearchTriggered));
}

#[tokio::test]
async fn test_live_search_launcher_failure_aborts() {
    let world = world_with(
        StaticComplianceChecker::permissive(),
        StubLiveSearchLauncher::failing("search provider quota exceeded"),
    );
    let wf = WorkflowId::new("wf-search");
    let search = WorkflowNode::new("n-search", wf.clone(), "linkedin_search", "Find founders");
    world.workflows.insert_graph(wf.clone(), vec![search], vec![]).await;

    let err = world
        .orchestrator
        .deploy(&wf, &[], &actor(), &workspace())
        .await
        .unwrap_err();
    let CampaignError::LiveSearchFailed(message) = err else {
        panic!("expected live-search failure");
    };
    assert!(message.contains("quota"));

    let campaign = world
        .campaigns
        .find_by_workflow(&wf)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(campaign.status, CampaignStatus::Draft);
}

#[tokio::test]
async fn test_deploy_requires_contacts() {
    let world = world();
    let wf = seed_outreach_workflow(&world).await;

    let err = world
        .orchestrator
        .deploy(&wf, &[], &actor(), &workspace())
        .await
        .unwrap_err();
    assert!(matches!(err, CampaignError::NoContactsProvided));

    // Provided but unresolvable ids are a distinct failure.
    let err = world
        .orchestrator
        .deploy(&wf, &[ContactId::new("ghost")], &actor(), &workspace())
        .await
        .unwrap_err();
    assert!(matches!(err, CampaignError::NoContactsFound));
}

#[tokio::test]
async fn test_unknown_workflow_is_reported() {
    let world = world();
    let err = world
        .orchestrator
        .deploy(
            &WorkflowId::new("missing"),
            &[ContactId::new("c1")],
            &actor(),
            &workspace(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CampaignError::WorkflowNotFound(_)));
}

#[tokio::test]
async fn test_redeploy_reuses_campaign_and_replaces_schedule() {
    let world = world();
    let wf = seed_outreach_workflow(&world).await;
    let contact_ids = seed_contacts(&world).await;

    let first = world
        .orchestrator
        .deploy(&wf, &contact_ids, &actor(), &workspace())
        .await
        .unwrap();
    let second = world
        .orchestrator
        .deploy(&wf, &contact_ids[..1], &actor(), &workspace())
        .await
        .unwrap();

    assert_eq!(first.campaign_id, second.campaign_id);
    assert_eq!(second.scheduled_count, 3);
    // Replacement, not accumulation.
    let scheduled = world
        .actions
        .list_for_campaign(&first.campaign_id)
        .await
        .unwrap();
    assert_eq!(scheduled.len(), 3);
}

#[tokio::test]
async fn test_compile_then_schedule_separately() {
    let world = world();
    let wf = seed_outreach_workflow(&world).await;
    let contact_ids = seed_contacts(&world).await;

    let steps = world.orchestrator.compile(&wf).await.unwrap();
    assert_eq!(steps.len(), 3);

    let campaign = world
        .campaigns
        .find_by_workflow(&wf)
        .await
        .unwrap()
        .unwrap();
    let scheduled = world
        .orchestrator
        .schedule(&campaign.id, &contact_ids, None)
        .await
        .unwrap();
    assert_eq!(scheduled.len(), 6);
    assert!(world
        .campaigns
        .get(&campaign.id)
        .await
        .unwrap()
        .unwrap()
        .is_active());
}
