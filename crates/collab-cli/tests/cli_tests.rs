//! Command dispatch against temporary dataset files.

use collab_cli::{build_cli, load_config, run};
use collab_core::Dataset;
use collab_test_utils::sample_fixture;
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::path::Path;

fn write_sample(dir: &Path) -> String {
    let fixture = sample_fixture();
    let dataset = Dataset {
        principals: fixture.principals,
        projects: fixture.projects,
        customer_actions: fixture.actions,
        feedback: fixture.feedback,
        workspaces: fixture.workspaces,
        dossiers: Vec::new(),
    };
    let path = dir.join("data.json");
    dataset.write_to(&path).unwrap();
    path.display().to_string()
}

fn exec(args: &[&str]) -> anyhow::Result<String> {
    let matches = build_cli().try_get_matches_from(args)?;
    let config = load_config(&matches)?;
    run(&matches, config)
}

#[test]
fn access_single_module() {
    let out = exec(&["collab", "access", "--role", "admin", "--module", "settings"]).unwrap();
    assert_eq!(out.split_whitespace().collect::<Vec<_>>(), vec!["settings", "full_control"]);
}

#[test]
fn access_table_lists_every_module() {
    let out = exec(&["collab", "access", "--role", "customer"]).unwrap();
    assert_eq!(out.lines().count(), 12);
    assert!(out
        .lines()
        .any(|l| l.split_whitespace().collect::<Vec<_>>() == ["settings", "none"]));
}

#[test]
fn capability_for_unmapped_role_is_dash() {
    let out = exec(&["collab", "capability", "--module", "budget", "--role", "tech"]).unwrap();
    assert_eq!(out.split_whitespace().collect::<Vec<_>>(), vec!["tech", "—"]);
}

#[test]
fn unknown_role_is_a_usage_error() {
    assert!(build_cli()
        .try_get_matches_from(["collab", "access", "--role", "auditor"])
        .is_err());
}

#[test]
fn view_prints_resolved_json() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_sample(dir.path());

    let out = exec(&["collab", "view", "--data", &data, "--email", "sam@collab.io"]).unwrap();
    let json: Value = serde_json::from_str(&out).unwrap();

    let ids: Vec<_> = json["projects"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["p-1", "p-3"]);
    assert_eq!(json["projects"][1]["match"]["kind"], "legacyName");
    assert!(json["onboarding"].is_null());
}

#[test]
fn view_for_unknown_email_fails() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_sample(dir.path());
    let err = exec(&["collab", "view", "--data", &data, "--email", "ghost@collab.io"]).unwrap_err();
    assert!(err.to_string().contains("ghost@collab.io"));
}

#[test]
fn onboarding_session_persists_with_write() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_sample(dir.path());

    let out = exec(&[
        "collab", "onboarding", "--data", &data, "--write", "start", "--customer", "c-1",
        "--name", "Acme Corp", "--email", "ann@acme.io", "--by", "sales",
    ])
    .unwrap();
    let json: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["outcome"], "created");
    assert_eq!(json["dossier"]["createdBy"], "sales");

    exec(&[
        "collab", "onboarding", "--data", &data, "--write", "update", "--customer", "c-1",
        "--section", "commercial", "--field", "budgetRange=$100k-$150k", "--list",
        "decisionMakers=Ann, Bob",
    ])
    .unwrap();

    let out = exec(&[
        "collab", "onboarding", "--data", &data, "--write", "complete-phase", "--customer",
        "c-1", "--phase", "1",
    ])
    .unwrap();
    let json: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["completedPhases"], serde_json::json!([1]));
    assert_eq!(json["currentPhase"], 2);

    let out = exec(&["collab", "onboarding", "--data", &data, "status", "--customer", "c-1"])
        .unwrap();
    let json: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["nextIncompletePhase"], 2);
    assert_eq!(
        json["dossier"]["data"]["commercial"]["decisionMakers"],
        serde_json::json!(["Ann", "Bob"])
    );
    assert!(json["missingRequiredFields"]["1"]
        .as_array()
        .unwrap()
        .iter()
        .any(|f| f == "companyName"));
    assert!(json["missingRequiredFields"].get("5").map_or(true, |f| !f
        .as_array()
        .unwrap()
        .iter()
        .any(|f| f == "budgetRange")));

    // the customer's view now carries the onboarding budget
    let out = exec(&["collab", "view", "--data", &data, "--email", "ann@acme.io"]).unwrap();
    let json: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["projects"][0]["budget"]["approved"], "$100k-$150k");
}

#[test]
fn onboarding_without_dossier_fails() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_sample(dir.path());
    let err = exec(&[
        "collab", "onboarding", "--data", &data, "complete", "--customer", "c-404",
    ])
    .unwrap_err();
    assert!(err.to_string().contains("c-404"));
}

#[test]
fn config_file_and_log_flags_are_applied() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("collab.toml");
    std::fs::write(
        &config,
        "[[permission_overrides]]\nrole = \"tech\"\nmodule = \"budget\"\naccess = \"view\"\n",
    )
    .unwrap();
    let config = config.display().to_string();

    let matches = build_cli()
        .try_get_matches_from([
            "collab", "--config", &config, "--log-level", "debug", "--json-logs", "access",
            "--role", "tech", "--module", "budget",
        ])
        .unwrap();
    let loaded = load_config(&matches).unwrap();
    assert_eq!(loaded.log.filter, "debug");
    assert!(loaded.log.json);

    let out = run(&matches, loaded).unwrap();
    assert_eq!(out.split_whitespace().collect::<Vec<_>>(), vec!["budget", "view"]);
}
