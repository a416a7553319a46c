/// Pack validation and session navigation integration tests.

use campaign_engine::core::lint::{lint_pack, LintWarning};
use campaign_engine::core::loader::{decode_document, PackError};
use campaign_engine::core::state::NarrativeState;
use campaign_engine::core::validator::{validate, ValidationError};
use campaign_engine::schema::pack::CampaignPack;
use std::path::Path;

fn load(path: &str) -> Result<CampaignPack, PackError> {
    let document = decode_document(Path::new(path))?;
    Ok(CampaignPack::from_value(document)?)
}

#[test]
fn bundled_json_pack_is_valid() {
    let pack = load("packs/ashen_road.json").unwrap();
    assert_eq!(pack.meta.id, "ashen-road");
    assert_eq!(pack.start_scene_id(), Some("waystation"));
    assert!(lint_pack(&pack).is_empty(), "{:?}", lint_pack(&pack));
}

#[test]
fn bundled_ron_pack_is_valid() {
    let pack = load("packs/lantern_keep.ron").unwrap();
    assert_eq!(pack.meta.id, "lantern-keep");
    assert_eq!(pack.scenes.len(), 3);
    assert_eq!(pack.scenes[0].choices[1].target(), None);
    assert!(pack.scenes[2].choices.is_empty());
}

#[test]
fn unknown_start_scene_fails_validation() {
    let document = decode_document(Path::new("tests/fixtures/bad_start.json")).unwrap();
    assert_eq!(
        validate(&document),
        Err(ValidationError::UnknownStartScene("prologue".to_string()))
    );
    assert!(matches!(
        load("tests/fixtures/bad_start.json"),
        Err(PackError::Validation(ValidationError::UnknownStartScene(_)))
    ));
}

#[test]
fn dangling_choice_passes_validation_but_is_linted() {
    let pack = load("tests/fixtures/dangling.json").unwrap();
    assert_eq!(
        lint_pack(&pack),
        vec![LintWarning::DanglingChoice {
            scene: "cliff".to_string(),
            choice: 0,
            target: "far_side".to_string(),
        }]
    );
}

#[test]
fn following_dangling_choice_leaves_player_stuck() {
    let pack = load("tests/fixtures/dangling.json").unwrap();
    let mut state = NarrativeState::new();
    state.load_pack(pack);

    assert!(!state.choose(0));
    assert_eq!(state.current_scene_id(), Some("cliff"));
    assert!(state.choose(1));
    assert_eq!(state.current_scene_id(), Some("cliff"));
}

#[test]
fn walk_ashen_road_to_an_ending() {
    let pack = load("packs/ashen_road.json").unwrap();
    let mut state = NarrativeState::new();
    state.load_pack(pack);

    assert_eq!(state.current_scene().unwrap().title, "The Waystation");
    assert_eq!(state.choices().len(), 3);

    assert!(state.choose(1));
    assert_eq!(state.current_scene_id(), Some("innkeeper"));
    assert!(state.choose(1));
    assert_eq!(state.current_scene_id(), Some("hearth"));
    assert!(state.is_at_ending());

    // "Rest" has a null target: nothing moves.
    assert!(!state.choose(0));
    assert_eq!(state.current_scene_id(), Some("hearth"));

    // Endings remain valid, re-enterable states.
    assert!(state.goto_scene("waystation"));
    assert!(state.goto_scene("hearth"));
}

#[test]
fn every_valid_start_is_current_after_load() {
    for path in ["packs/ashen_road.json", "packs/lantern_keep.ron", "tests/fixtures/dangling.json"] {
        let pack = load(path).unwrap();
        let expected = pack.start_scene_id().map(str::to_string);
        let mut state = NarrativeState::new();
        state.load_pack(pack);
        assert_eq!(
            state.current_scene().map(|s| s.id.clone()),
            expected,
            "start scene mismatch for {}",
            path
        );
    }
}

#[test]
fn unknown_ids_never_move_the_player() {
    let pack = load("packs/ashen_road.json").unwrap();
    let mut state = NarrativeState::new();
    state.load_pack(pack);

    for bogus in ["", "Waystation", "nowhere", "valley ", "far_side"] {
        state.goto_scene("valley");
        assert!(!state.goto_scene(bogus));
        assert_eq!(state.current_scene_id(), Some("valley"));
    }
}
