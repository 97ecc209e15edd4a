//! End-to-end flows across the store, the catalog controllers, and the
//! dashboard: everything a single client sees is whatever the store last
//! pushed, and writes fan out to every other subscribed client.

use std::sync::Arc;

use chrono::{Datelike, Local};

use labhub_core::catalog::Catalog;
use labhub_core::document::Value;
use labhub_core::memory_store::MemoryDocumentStore;
use labhub_core::store::CollectionPath;
use labhub_sync::controller::{CatalogController, Confirmation};
use labhub_sync::edit::EditMode;
use labhub_sync::session::{AnonymousSessions, SessionIdentity, SessionProvider};
use labhub_sync::shell::{Shell, ShellConfig};
use labhub_sync::summary::draft_summary;

fn open_controller(
    store: &Arc<MemoryDocumentStore>,
    catalog: Catalog,
    session: &str,
) -> CatalogController {
    CatalogController::open(
        store.clone(),
        "lab-hub",
        catalog.schema(),
        SessionIdentity::new(session),
    )
}

#[test]
fn two_clients_converge_through_the_store() {
    let store = Arc::new(MemoryDocumentStore::new());
    let mut alice = open_controller(&store, Catalog::Wiki, "alice-session");
    let mut bob = open_controller(&store, Catalog::Wiki, "bob-session");
    alice.pump();
    bob.pump();

    alice.start_create();
    alice
        .update_draft_field("title", Value::text("Onboarding"))
        .unwrap();
    alice
        .update_draft_field("content", Value::text("Start here."))
        .unwrap();
    alice.save().unwrap();

    alice.pump();
    bob.pump();
    assert_eq!(alice.snapshot(), bob.snapshot());
    assert_eq!(bob.snapshot()[0].text("last_edited_by"), Some("alice-"));

    let id = bob.snapshot()[0].id.clone();
    bob.start_edit(&id).unwrap();
    bob.update_draft_field("content", Value::text("Start here. Then read the wiki."))
        .unwrap();
    bob.save().unwrap();

    alice.pump();
    bob.pump();
    assert_eq!(alice.snapshot(), bob.snapshot());
    assert_eq!(alice.snapshot()[0].text("last_edited_by"), Some("bob-se"));
}

#[test]
fn an_open_draft_survives_remote_churn_on_other_documents() {
    let store = Arc::new(MemoryDocumentStore::new());
    let mut editor = open_controller(&store, Catalog::Experiments, "editor");
    let mut other = open_controller(&store, Catalog::Experiments, "other");
    editor.pump();
    other.pump();

    editor.start_create();
    editor
        .update_draft_field("title", Value::text("Stroop Task"))
        .unwrap();

    for title in ["Flanker", "N-back", "Go/No-go"] {
        other.start_create();
        other.update_draft_field("title", Value::text(title)).unwrap();
        other.save().unwrap();
    }

    editor.pump();
    assert_eq!(editor.snapshot().len(), 3);
    assert_eq!(*editor.edit_state(), EditMode::Creating);
    assert_eq!(
        editor.draft().get("title"),
        Some(&Value::text("Stroop Task"))
    );

    editor.save().unwrap();
    editor.pump();
    assert_eq!(editor.snapshot().len(), 4);
    assert_eq!(editor.snapshot()[0].text("title"), Some("Stroop Task"));
}

#[test]
fn reference_save_defaults_the_year_and_normalizes_tags() {
    let store = Arc::new(MemoryDocumentStore::new());
    let mut library = open_controller(&store, Catalog::References, "librarian");
    library.pump();

    library.start_create();
    library
        .update_draft_field("title", Value::text("A Great Paper"))
        .unwrap();
    library
        .update_draft_field("tags", Value::text(" memory , attention ,attention "))
        .unwrap();
    library
        .update_draft_field("ai_summary", Value::text(draft_summary("A Great Paper")))
        .unwrap();
    library.save().unwrap();
    library.pump();

    let doc = &library.snapshot()[0];
    assert_eq!(doc.text("year"), Some(Local::now().year().to_string().as_str()));
    assert_eq!(
        doc.field("tags").and_then(Value::as_list),
        Some(
            &[
                "memory".to_string(),
                "attention".to_string(),
                "attention".to_string()
            ][..]
        )
    );
    assert!(doc
        .text("ai_summary")
        .is_some_and(|s| s.contains("A Great Paper")));
    assert_eq!(doc.text("added_by"), Some("librar"));
}

#[test]
fn references_order_by_year_descending() {
    let store = Arc::new(MemoryDocumentStore::new());
    let mut library = open_controller(&store, Catalog::References, "librarian");

    for (title, year) in [("Old", "1998"), ("New", "2024"), ("Mid", "2011")] {
        library.start_create();
        library.update_draft_field("title", Value::text(title)).unwrap();
        library.update_draft_field("year", Value::text(year)).unwrap();
        library.save().unwrap();
    }
    library.pump();

    let titles: Vec<&str> = library
        .snapshot()
        .iter()
        .filter_map(|d| d.text("title"))
        .collect();
    assert_eq!(titles, vec!["New", "Mid", "Old"]);
}

#[test]
fn dashboard_counts_follow_each_catalog_independently() {
    let store = Arc::new(MemoryDocumentStore::new());
    let mut shell = Shell::new(store.clone(), ShellConfig::default());
    shell.sign_in(&AnonymousSessions).unwrap();
    shell.open_dashboard().unwrap();
    shell.pump();

    let mut experiments = open_controller(&store, Catalog::Experiments, "runner");
    experiments.pump();
    experiments.start_create();
    experiments
        .update_draft_field("title", Value::text("Flanker Task v2"))
        .unwrap();
    experiments.save().unwrap();

    shell.pump();
    let counts = shell.dashboard().unwrap().counts();
    assert_eq!(counts.experiments, 1);
    assert_eq!(counts.projects, 0);
    assert_eq!(counts.wiki_pages, 0);
    assert_eq!(counts.references, 0);
}

#[test]
fn a_revoked_catalog_never_disturbs_its_siblings() {
    let store = Arc::new(MemoryDocumentStore::new());
    let mut projects = open_controller(&store, Catalog::Projects, "lead");
    let mut wiki = open_controller(&store, Catalog::Wiki, "lead");
    projects.pump();
    wiki.pump();

    store.revoke(&CollectionPath::new("lab-hub", "projects"));

    wiki.start_create();
    wiki.update_draft_field("title", Value::text("Ethics")).unwrap();
    wiki.save().unwrap();

    projects.pump();
    wiki.pump();
    assert!(projects.sync_state().is_failed());
    assert_eq!(wiki.snapshot().len(), 1);
    assert!(wiki.sync_state().is_live());
}

#[test]
fn session_watchers_hear_the_anonymous_acquisition() {
    let mut shell = Shell::new(
        Arc::new(MemoryDocumentStore::new()),
        ShellConfig::default(),
    );
    let watcher = shell.session().watch();
    assert_eq!(watcher.try_recv().unwrap(), None);

    let identity = shell.sign_in(&AnonymousSessions).unwrap();
    assert_eq!(watcher.try_recv().unwrap(), Some(identity.clone()));

    let again = shell.sign_in(&AnonymousSessions).unwrap();
    assert_eq!(again, identity);
    assert!(watcher.try_recv().is_err());
}

#[test]
fn anonymous_identities_are_unique_and_stable() {
    let a = AnonymousSessions.acquire_anonymous().unwrap();
    let b = AnonymousSessions.acquire_anonymous().unwrap();
    assert_ne!(a.id(), b.id());
    assert_eq!(a.short_id().len(), 6);
}

#[test]
fn deleting_a_project_updates_every_client() {
    let store = Arc::new(MemoryDocumentStore::new());
    let mut owner = open_controller(&store, Catalog::Projects, "owner");
    let mut viewer = open_controller(&store, Catalog::Projects, "viewer");
    owner.pump();
    viewer.pump();

    owner.start_create();
    owner.update_draft_field("title", Value::text("Pilot")).unwrap();
    owner.save().unwrap();
    owner.pump();
    viewer.pump();
    assert_eq!(viewer.snapshot().len(), 1);

    let id = owner.snapshot()[0].id.clone();
    owner.delete(&id, Confirmation::Confirmed).unwrap();
    owner.pump();
    viewer.pump();
    assert!(owner.snapshot().is_empty());
    assert!(viewer.snapshot().is_empty());
}
