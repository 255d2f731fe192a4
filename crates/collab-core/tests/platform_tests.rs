//! Platform wiring: configuration files, datasets and cross-store behaviour.
//!
//! Tenet: every store a view reads from is owned by the platform instance,
//! so a change through the platform is visible in the next view.

use collab_core::prelude::*;
use collab_core::{ConfigError, LoadSummary};
use collab_onboarding::OnboardingError;
use collab_test_utils::{ann, cleo, root, sample_fixture};
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;
use std::io::Write;
use tempfile::{Builder, NamedTempFile};

fn sample_dataset() -> Dataset {
    let fixture = sample_fixture();
    Dataset {
        principals: fixture.principals,
        projects: fixture.projects,
        customer_actions: fixture.actions,
        feedback: fixture.feedback,
        workspaces: fixture.workspaces,
        dossiers: Vec::new(),
    }
}

fn temp_file(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn phases(ids: &[u8]) -> BTreeSet<PhaseId> {
    ids.iter().copied().map(PhaseId).collect()
}

#[test]
fn dataset_loads_from_json_file() {
    let json = serde_json::to_string(&sample_dataset()).unwrap();
    let file = temp_file(".json", &json);

    let dataset = Dataset::from_path(file.path()).unwrap();
    let platform = CollabPlatform::new(PlatformConfig::new()).unwrap();
    let summary = platform.load_dataset(dataset).unwrap();

    assert_eq!(
        summary,
        LoadSummary {
            principals: 8,
            projects: 4,
            customer_actions: 4,
            feedback: 3,
            workspaces: 2,
            dossiers: 0,
        }
    );

    let view = platform.resolve_view_for_email("ANN@acme.io").unwrap();
    let ids: Vec<_> = view.projects.iter().map(|p| p.project.id.as_str()).collect();
    assert_eq!(ids, vec!["p-1", "p-3"]);
}

#[test]
fn dataset_loads_from_yaml_file() {
    let yaml = r#"
principals:
  - id: u-1
    name: Dana
    email: dana@initech.io
    role: customer
    linkingId: c-9
projects:
  - id: p-9
    name: Printer Upgrade
    clientContact: Initech
    budget:
      approved: "$10k"
      current: "$0"
    priority: high
workspaces:
  - id: w-9
    projectId: p-9
    projectName: Printer Upgrade
    customerId: c-9
    customerName: Initech
"#;
    let file = temp_file(".yaml", yaml);
    let platform =
        CollabPlatform::with_dataset(PlatformConfig::new(), Dataset::from_path(file.path()).unwrap())
            .unwrap();

    let view = platform.resolve_view_for_email("dana@initech.io").unwrap();
    assert_eq!(view.workspaces.len(), 1);
    let project = view.project("p-9").unwrap();
    assert_eq!(
        project.matched_by,
        ProjectMatch::Structural {
            workspace_id: "w-9".into()
        }
    );
    // unmodelled attributes survive the trip
    assert_eq!(project.project.extra["priority"], "high");
}

#[test]
fn unknown_email_is_reported() {
    let platform = CollabPlatform::with_dataset(PlatformConfig::new(), sample_dataset()).unwrap();
    let err = platform.resolve_view_for_email("nobody@example.com").unwrap_err();
    assert!(matches!(err, CollabError::UnknownPrincipal(_)));
    assert!(err.is_missing_link());
}

#[test]
fn duplicate_workspace_in_dataset_is_rejected() {
    let mut dataset = sample_dataset();
    let mut twin = dataset.workspaces[0].clone();
    twin.id = "w-twin".into();
    dataset.workspaces.push(twin);

    let err = CollabPlatform::with_dataset(PlatformConfig::new(), dataset).unwrap_err();
    assert!(matches!(err, CollabError::Registry(_)));
}

#[test]
fn toml_config_overrides_permissions() {
    let toml = r#"
view_cache_capacity = 0

[log]
filter = "collab=debug"

[[permission_overrides]]
role = "tech"
module = "budget"
access = "view"

[[capability_overrides]]
module = "budget"
role = "tech"
capability = "track_status"
"#;
    let file = temp_file(".toml", toml);
    let config = PlatformConfig::from_path(file.path()).unwrap();
    assert_eq!(config.view_cache_capacity, 0);
    assert_eq!(config.log.filter, "collab=debug");

    let platform = CollabPlatform::new(config).unwrap();
    assert_eq!(platform.access_for(Role::Tech, Module::Budget), AccessLevel::View);
    assert_eq!(
        platform.capability_for(Module::Budget, Role::Tech),
        Capability::TrackStatus
    );
    // untouched entries keep their defaults
    assert_eq!(
        platform.access_for(Role::Admin, Module::Settings),
        AccessLevel::FullControl
    );
    assert_eq!(
        platform.access_for(Role::Customer, Module::Settings),
        AccessLevel::None
    );
}

#[test]
fn yaml_config_with_custom_phases() {
    let yaml = r"
phases:
  - id: 1
    label: Company
    section: organization
    fields:
      - name: companyName
        required: true
  - id: 2
    label: Money
    section: commercial
    fields:
      - name: budgetRange
        required: true
      - name: decisionMakers
        kind: list
";
    let file = temp_file(".yml", yaml);
    let config = PlatformConfig::from_path(file.path()).unwrap();
    assert_eq!(config.phases.len(), 2);

    let platform = CollabPlatform::new(config).unwrap();
    platform
        .start_onboarding("c-1", "Acme", "ops@acme.io", Creator::Customer)
        .unwrap();

    let d = platform.complete_phase(PhaseId(2)).unwrap();
    assert_eq!(d.current_phase, PhaseId(2));

    let err = platform.complete_phase(PhaseId(3)).unwrap_err();
    assert!(matches!(
        err,
        CollabError::Onboarding(OnboardingError::PhaseOutOfRange { .. })
    ));

    let d = platform.complete_onboarding().unwrap();
    assert_eq!(d.completed_phases, phases(&[1, 2]));
}

#[test]
fn invalid_config_files_are_rejected() {
    let gap = temp_file(
        ".yaml",
        "phases:\n  - {id: 1, label: A, section: organization}\n  - {id: 3, label: B, section: project}\n",
    );
    assert!(matches!(
        PlatformConfig::from_path(gap.path()),
        Err(ConfigError::InvalidYaml(_))
    ));

    let empty_filter = temp_file(".toml", "[log]\nfilter = \"\"\n");
    assert!(matches!(
        PlatformConfig::from_path(empty_filter.path()),
        Err(ConfigError::Invalid(_))
    ));

    let ini = temp_file(".ini", "x=1");
    assert!(matches!(
        PlatformConfig::from_path(ini.path()),
        Err(ConfigError::UnsupportedFormat(_))
    ));

    assert!(matches!(
        PlatformConfig::from_path("/definitely/not/here.toml"),
        Err(ConfigError::Io { .. })
    ));
}

#[test]
fn customer_c9_end_to_end() {
    let platform = CollabPlatform::new(PlatformConfig::new()).unwrap();
    let cid = CustomerId::from("c-9");

    // nothing is active yet: refused and observable
    let err = platform.complete_phase(PhaseId(1)).unwrap_err();
    assert!(err.is_missing_link());

    let started = platform
        .start_onboarding(cid.clone(), "Initech", "it@initech.io", Creator::Customer)
        .unwrap();
    assert_eq!(started.dossier().current_phase, PhaseId(1));
    assert!(started.dossier().completed_phases.is_empty());

    let d = platform.complete_phase(PhaseId(1)).unwrap();
    assert_eq!((d.completed_phases.clone(), d.current_phase), (phases(&[1]), PhaseId(2)));

    let d = platform.complete_phase(PhaseId(1)).unwrap();
    assert_eq!((d.completed_phases.clone(), d.current_phase), (phases(&[1]), PhaseId(2)));

    let d = platform.complete_onboarding().unwrap();
    assert_eq!(d.completed_phases, phases(&[1, 2, 3, 4, 5]));
    assert!(d.is_complete);
    assert!(platform.is_onboarding_complete(&cid));
}

#[test]
fn onboarding_budget_reaches_customer_view() {
    let platform = CollabPlatform::with_dataset(PlatformConfig::new(), sample_dataset()).unwrap();

    let before = platform.resolve_view(&ann());
    assert_eq!(before.project("p-1").unwrap().project.budget.approved, "$80k");
    assert!(before.onboarding.is_none());

    platform
        .start_onboarding("c-1", "Acme Corp", "ann@acme.io", Creator::Sales)
        .unwrap();
    platform
        .update_onboarding_data(DataSection::Commercial, [("budgetRange", "$100k-$150k")])
        .unwrap();

    let after = platform.resolve_view(&ann());
    assert_eq!(
        after.project("p-1").unwrap().project.budget.approved,
        "$100k-$150k"
    );
    assert_eq!(after.project("p-3").unwrap().project.budget.approved, "$15k");
    assert_eq!(
        after.onboarding.as_ref().map(|d| d.created_by),
        Some(Creator::Sales)
    );

    // staff never see the merged figure
    let staff = platform.resolve_view(&cleo());
    assert_eq!(staff.project("p-1").unwrap().project.budget.approved, "$80k");
    assert_eq!(platform.resolve_view(&root()).projects.len(), 4);
}

#[test]
fn export_and_reload_preserves_dossiers() {
    let platform = CollabPlatform::with_dataset(PlatformConfig::new(), sample_dataset()).unwrap();
    platform
        .start_onboarding("c-2", "Globex", "bob@globex.io", Creator::Customer)
        .unwrap();
    platform.complete_phase(PhaseId(1)).unwrap();
    platform
        .update_onboarding_data(DataSection::Requirements, [("objectives", vec!["uptime", "cost"])])
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.yaml");
    platform.export_dataset().write_to(&path).unwrap();

    let reloaded =
        CollabPlatform::with_dataset(PlatformConfig::new(), Dataset::from_path(&path).unwrap())
            .unwrap();
    let cid = CustomerId::from("c-2");
    assert_eq!(
        reloaded.get_onboarding_by_customer_id(&cid),
        platform.get_onboarding_by_customer_id(&cid)
    );
    assert_eq!(reloaded.identities().len(), 8);
    // restoring does not make anything active
    assert!(reloaded.onboarding().active().is_none());
}

#[test]
fn view_cache_serves_repeated_requests() {
    let platform = CollabPlatform::with_dataset(PlatformConfig::new(), sample_dataset()).unwrap();
    let first = platform.resolve_view(&ann());
    let second = platform.resolve_view(&ann());
    assert!(std::sync::Arc::ptr_eq(&first, &second));
    assert_eq!(platform.view_cache_stats().hits, 1);
}
