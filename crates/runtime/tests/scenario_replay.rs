//! Scenario files round trip through RON and replay deterministically.

use std::io::Write;

use furnace_core::ids::{item, object, varbit, widget};
use furnace_core::{BotState, SceneObject, ScenePoint, Tile, WorldSnapshot};
use runtime::{
    Frame, RecordingEmitter, RuntimeConfig, RuntimeError, Scenario, ScenarioEvent, Session,
};

fn area() -> WorldSnapshot {
    WorldSnapshot::new()
        .at(Tile::new(20, 1))
        .with_object(SceneObject::new(
            object::BANK_CHEST,
            Tile::new(0, 0),
            ScenePoint { x: 5, y: 5 },
        ))
        .with_object(SceneObject::new(
            object::CONVEYOR_BELT,
            Tile::new(21, 0),
            ScenePoint { x: 30, y: 5 },
        ))
        .with_object(SceneObject::new(
            object::BAR_DISPENSER,
            Tile::new(20, 3),
            ScenePoint { x: 29, y: 8 },
        ))
        .with_varbit(varbit::COFFER, 40_000)
}

fn scenario() -> Scenario {
    let mut scenario = Scenario::new(
        "collect and return",
        vec![
            Frame::new(area().with_items(item::RUNITE_BAR, 27)).dispatched(),
            Frame::new(area()).with_event(ScenarioEvent::WidgetLoaded(widget::group::MAKE_PRODUCT)),
        ],
    );
    scenario.config = Some(RuntimeConfig {
        seed: Some(99),
        ..RuntimeConfig::default()
    });
    scenario
}

#[test]
fn test_scenario_file_loads_and_replays() {
    let text = ron::ser::to_string_pretty(&scenario(), ron::ser::PrettyConfig::default())
        .expect("scenario serializes");
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(text.as_bytes()).expect("write scenario");

    let loaded = Scenario::load_from_file(file.path()).expect("scenario loads");
    assert_eq!(loaded, scenario());

    let config = loaded.config.clone().unwrap_or_default();
    let mut session = Session::new(config).expect("valid config");
    let mut emitter = RecordingEmitter::new();
    let reports = loaded.replay(&mut session, &mut emitter);

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].outcome.state(), Some(BotState::OpeningStorage));
    assert!(reports[0].dispatched.is_some());
    // Dispatch started a cooldown, so the second frame only waits.
    assert_eq!(reports[1].outcome.state(), Some(BotState::TimedOut));
    assert_eq!(session.stats().ticks(), 2);
}

#[test]
fn test_replay_is_deterministic_for_a_seed() {
    let run = || {
        let scenario = scenario();
        let mut session = Session::new(scenario.config.clone().unwrap_or_default()).unwrap();
        let mut emitter = RecordingEmitter::new();
        scenario.replay(&mut session, &mut emitter);
        emitter.emitted
    };
    assert_eq!(run(), run());
}

#[test]
fn test_empty_scenario_is_rejected() {
    let result = Scenario::from_ron("(name: \"nothing\", frames: [])");
    assert!(matches!(result, Err(RuntimeError::EmptyScenario)));
}

#[test]
fn test_missing_file_reports_the_path() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("absent.ron");

    let error = Scenario::load_from_file(&path).unwrap_err();

    assert!(matches!(error, RuntimeError::Read { .. }));
    assert!(error.to_string().contains("absent.ron"));
}
