//! End-to-end command flow against a file store.

use kaartmiddag::seating::{SeatRandomizer, SeatingConfig};
use kaartmiddag::storage::FileEventStore;
use kaartmiddag::{BuiltinNames, EventService, EventStatus};
use km_cli::{RunError, Runner, parse_command};
use rand::{SeedableRng, rngs::StdRng};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

type FileRunner = Runner<FileEventStore, StdRng>;

fn temp_file(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("km-cli-{tag}-{}.json", Uuid::new_v4()))
}

async fn open(path: &Path) -> FileRunner {
    let service = EventService::open(
        Arc::new(FileEventStore::new(path)),
        BuiltinNames::default(),
    )
    .await
    .unwrap();
    let seating = SeatingConfig {
        shuffle: false,
        ..SeatingConfig::default()
    };
    Runner::with_randomizer(
        service,
        seating,
        SeatRandomizer::with_rng(StdRng::seed_from_u64(7)),
    )
}

async fn run(runner: &mut FileRunner, line: &str) -> Result<String, RunError> {
    let args: Vec<&str> = line.split_ascii_whitespace().collect();
    runner.run(parse_command(&args).unwrap()).await
}

async fn ok(runner: &mut FileRunner, line: &str) -> String {
    match run(runner, line).await {
        Ok(out) => out,
        Err(err) => panic!("'{line}' failed: {err}"),
    }
}

fn line_with<'a>(text: &'a str, needle: &str) -> &'a str {
    text.lines()
        .find(|l| l.contains(needle))
        .unwrap_or_else(|| panic!("no line with {needle} in:\n{text}"))
}

#[tokio::test]
async fn test_full_afternoon_from_the_command_line() {
    let path = temp_file("flow");
    let mut runner = open(&path).await;

    assert!(ok(&mut runner, "create najaar").await.starts_with("Created Najaar"));
    for line in [
        "add najaar j anita",
        "add najaar j bert",
        "add najaar j carla",
        "add najaar r kees",
        "add najaar r lien",
    ] {
        ok(&mut runner, line).await;
    }
    ok(&mut runner, "advance najaar").await;

    let seated = ok(&mut runner, "seat najaar 1").await;
    assert!(seated.contains("Jokeren table 1"));
    assert!(seated.contains("Rikken table 1"));
    assert!(!seated.contains("Jokeren table 2"));

    let moved = ok(&mut runner, "move najaar 1 carla 2").await;
    assert!(moved.contains("Jokeren table 2"));

    for line in [
        "score najaar 1 anita 30",
        "score najaar 1 bert 10",
        "score najaar 1 carla -5",
        "score najaar 1 kees 12",
        "score najaar 1 lien 12",
    ] {
        ok(&mut runner, line).await;
    }

    ok(&mut runner, "advance najaar").await;
    ok(&mut runner, "seat najaar 2").await;
    for line in [
        "score najaar 2 anita -10",
        "score najaar 2 bert 5",
        "score najaar 2 carla 0",
        "score najaar 2 kees 0",
        "score najaar 2 lien -2",
    ] {
        ok(&mut runner, line).await;
    }

    let provisional = ok(&mut runner, "results najaar").await;
    assert!(provisional.contains("(provisional)"));

    let finished = ok(&mut runner, "advance najaar").await;
    assert!(finished.contains("RESULTS"));
    assert!(!finished.contains("(provisional)"));

    let anita = line_with(&finished, "Anita");
    assert!(anita.contains("20") && anita.contains("(PRIJS)"));
    let carla = line_with(&finished, "Carla");
    assert!(carla.contains("-5") && carla.contains("(POEDELPRIJS)"));
    let lien = line_with(&finished, "Lien");
    assert!(lien.contains("(PRIJS)") && lien.contains("(POEDELPRIJS)"));
    assert!(finished.find("Anita").unwrap() < finished.find("Bert").unwrap());

    // Everything above was persisted
    let mut reopened = open(&path).await;
    let event = reopened
        .service()
        .state()
        .find_event("najaar")
        .unwrap()
        .clone();
    assert_eq!(event.status, EventStatus::Results);
    assert_eq!(event.participants.len(), 5);
    let err = run(&mut reopened, "advance najaar").await.unwrap_err();
    assert_eq!(err.client_message(), "Event is already finished");

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn test_export_then_import_elsewhere() {
    let path = temp_file("source");
    let export = temp_file("export");
    let mut runner = open(&path).await;
    ok(&mut runner, "create voorjaar").await;
    ok(&mut runner, "add voorjaar rikken corry van heeswijk").await;

    let out = ok(&mut runner, &format!("export {}", export.display())).await;
    assert!(out.starts_with("Exported 1 events"));

    let target = temp_file("target");
    let mut other = open(&target).await;
    let out = ok(&mut other, &format!("import {}", export.display())).await;
    assert!(out.starts_with("Imported 1 events"));

    let shown = ok(&mut other, "show voorjaar").await;
    assert!(shown.contains("Corry Van Heeswijk"));
    let names = ok(&mut other, "names rikken corry").await;
    assert_eq!(names, "Corry Van Heeswijk\n");

    for file in [&path, &export, &target] {
        let _ = std::fs::remove_file(file);
    }
}

#[tokio::test]
async fn test_import_missing_file_keeps_state() {
    let path = temp_file("missing");
    let mut runner = open(&path).await;
    ok(&mut runner, "create winter").await;

    let err = run(&mut runner, "import /nonexistent/km-data.json")
        .await
        .unwrap_err();
    assert!(matches!(err, RunError::Io { .. }));
    assert_eq!(runner.service().events().len(), 1);

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn test_switch_game_unseats() {
    let path = temp_file("switch");
    let mut runner = open(&path).await;
    ok(&mut runner, "create lente").await;
    ok(&mut runner, "add lente j anita").await;
    ok(&mut runner, "add lente j bert").await;
    ok(&mut runner, "advance lente").await;
    ok(&mut runner, "seat lente 1").await;

    assert_eq!(ok(&mut runner, "switch lente bert").await, "Bert now plays Rikken\n");
    let shown = ok(&mut runner, "show lente").await;
    assert!(line_with(&shown, "Not seated").contains("Bert"));

    let _ = std::fs::remove_file(&path);
}
