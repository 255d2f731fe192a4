//! Testing utilities for the collab workspace
//!
//! Shared principals, records and onboarding helpers.
//!
//! The sample fixture:
//!
//! ```text
//! p-1 Apollo         ── w-1 ── c-1 Acme Corp   sales Sam, consultant Cleo, tech Tia
//! p-2 Zephyr         ── w-2 ── c-2 Globex      sales Sue, tech Tom
//! p-3 Legacy Portal  (no workspace) clientContact "Ann Lee", sales "Sam", tech Tom + Tia
//! p-4 Orphan         (no workspace) clientContact "Nobody"
//! ```

#![allow(missing_docs)]

use collab_model::{
    Budget, CustomerAction, Feedback, Principal, Project, Role, TeamMemberRef, Workspace,
};
use collab_onboarding::{Creator, DataSection, OnboardingStore};

#[derive(Debug, Clone)]
pub struct Fixture {
    pub principals: Vec<Principal>,
    pub projects: Vec<Project>,
    pub actions: Vec<CustomerAction>,
    pub feedback: Vec<Feedback>,
    pub workspaces: Vec<Workspace>,
}

impl Fixture {
    pub fn principal(&self, name: &str) -> Principal {
        self.principals
            .iter()
            .find(|p| p.name == name)
            .cloned()
            .unwrap_or_else(|| panic!("no fixture principal named {name}"))
    }
}

pub fn ann() -> Principal {
    Principal::new("u-ann", "Ann Lee", "ann@acme.io", Role::Customer).with_linking_id("c-1")
}

pub fn bob() -> Principal {
    Principal::new("u-bob", "Bob Stone", "bob@globex.io", Role::Customer).with_linking_id("c-2")
}

pub fn sam() -> Principal {
    Principal::new("u-sam", "Sam", "sam@collab.io", Role::Sales).with_linking_id("tm-s1")
}

pub fn sue() -> Principal {
    Principal::new("u-sue", "Sue", "sue@collab.io", Role::Sales).with_linking_id("tm-s2")
}

pub fn tia() -> Principal {
    Principal::new("u-tia", "Tia", "tia@collab.io", Role::Tech).with_linking_id("tm-t1")
}

pub fn tom() -> Principal {
    Principal::new("u-tom", "Tom", "tom@collab.io", Role::Tech).with_linking_id("tm-t2")
}

pub fn cleo() -> Principal {
    Principal::new("u-cleo", "Cleo", "cleo@collab.io", Role::Consultant).with_linking_id("tm-c1")
}

pub fn root() -> Principal {
    Principal::new("u-root", "Root", "root@collab.io", Role::Admin)
}

pub fn stranger() -> Principal {
    Principal::new("u-x", "Ann Lee", "x@collab.io", Role::Unrecognized).with_linking_id("c-1")
}

pub fn sample_fixture() -> Fixture {
    let projects = vec![
        Project::new("p-1", "Apollo")
            .with_client_contact("Acme Corp")
            .with_assigned_sales("Sam")
            .with_assigned_consultant("Cleo")
            .with_assigned_tech("Tia")
            .with_budget(Budget {
                approved: "$80k".into(),
                current: "$12k".into(),
                change_impact: Some("+$5k".into()),
            }),
        Project::new("p-2", "Zephyr")
            .with_client_contact("Globex")
            .with_assigned_sales("Sue")
            .with_assigned_tech("Tom")
            .with_budget(Budget {
                approved: "$40k".into(),
                current: "$3k".into(),
                change_impact: None,
            }),
        Project::new("p-3", "Legacy Portal")
            .with_client_contact("Ann Lee")
            .with_assigned_sales("Sam")
            .with_assigned_tech("Tom")
            .with_assigned_tech("Tia")
            .with_budget(Budget {
                approved: "$15k".into(),
                ..Budget::default()
            }),
        Project::new("p-4", "Orphan").with_client_contact("Nobody"),
    ];

    let workspaces = vec![
        Workspace::new("w-1", "p-1", "Apollo", "c-1", "Acme Corp")
            .with_sales(TeamMemberRef::new("tm-s1", "Sam"))
            .with_consultant(TeamMemberRef::new("tm-c1", "Cleo"))
            .with_tech(TeamMemberRef::new("tm-t1", "Tia")),
        Workspace::new("w-2", "p-2", "Zephyr", "c-2", "Globex")
            .with_sales(TeamMemberRef::new("tm-s2", "Sue"))
            .with_tech(TeamMemberRef::new("tm-t2", "Tom")),
    ];

    let actions = vec![
        CustomerAction::new("a-1", "p-1", "Sign statement of work"),
        CustomerAction::new("a-2", "p-2", "Approve design"),
        CustomerAction::new("a-3", "p-3", "Confirm hosting"),
        CustomerAction::new("a-4", "p-4", "Provide contact"),
    ];

    let feedback = vec![
        Feedback::new("f-1", "p-1", "Kickoff went well"),
        Feedback::new("f-2", "p-2", "Timeline is tight"),
        Feedback::new("f-3", "p-4", "Who owns this?"),
    ];

    Fixture {
        principals: vec![
            ann(),
            bob(),
            sam(),
            sue(),
            tia(),
            tom(),
            cleo(),
            root(),
        ],
        projects,
        actions,
        feedback,
        workspaces,
    }
}

/// Store with a started dossier for `customer_id`, commercial budget filled in
pub fn onboarding_with_budget(customer_id: &str, budget_range: &str) -> OnboardingStore {
    let store = OnboardingStore::new();
    store
        .start_onboarding(customer_id, "Acme Corp", "ann@acme.io", Creator::Customer)
        .unwrap();
    store
        .update_onboarding_data(DataSection::Commercial, [("budgetRange", budget_range)])
        .unwrap();
    store
}

pub fn sorted_ids<'a>(ids: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    let mut ids: Vec<_> = ids.into_iter().collect();
    ids.sort_unstable();
    ids
}
