//! Wiring demo: build an in-memory store, sign in anonymously, and run a
//! short round trip through the catalogs and the dashboard.

use std::sync::Arc;

use labhub_core::catalog::Catalog;
use labhub_core::document::Value;
use labhub_core::memory_store::MemoryDocumentStore;
use labhub_sync::session::AnonymousSessions;
use labhub_sync::shell::{Shell, ShellConfig};
use labhub_sync::summary::draft_summary;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let store = Arc::new(MemoryDocumentStore::new());
    let mut shell = Shell::new(store, ShellConfig::default());
    let identity = shell.sign_in(&AnonymousSessions)?;
    println!("signed in as {}", identity.short_id());

    shell.open_catalog(Catalog::Projects)?;
    if let Some(projects) = shell.catalog() {
        projects.start_create();
        projects.update_draft_field("title", Value::text("Pilot study"))?;
        projects.update_draft_field("description", Value::text("Reaction-time pilot"))?;
        projects.save()?;
        projects.pump();
        println!("projects: {}", projects.snapshot().len());
    }

    shell.open_catalog(Catalog::References)?;
    if let Some(library) = shell.catalog() {
        library.start_create();
        library.update_draft_field("title", Value::text("A Great Paper"))?;
        library.update_draft_field("authors", Value::text("Smith et al."))?;
        library.update_draft_field("tags", Value::text("memory, attention"))?;
        library.update_draft_field(
            "ai_summary",
            Value::text(draft_summary("A Great Paper")),
        )?;
        library.save()?;
        library.pump();
        for hit in library.search("memory") {
            println!("match: {}", hit.text("title").unwrap_or("(untitled)"));
        }
    }

    shell.open_dashboard()?;
    if let Some(dashboard) = shell.dashboard() {
        dashboard.pump();
        let counts = dashboard.counts();
        println!(
            "dashboard: {} projects, {} experiments, {} wiki pages, {} references",
            counts.projects, counts.experiments, counts.wiki_pages, counts.references
        );
    }

    shell.unmount();
    Ok(())
}
