/// Pack library integration tests — discovery, listing and loading.

use campaign_engine::core::loader::{PackError, PackLibrary};
use campaign_engine::core::state::NarrativeState;
use campaign_engine::core::validator::ValidationError;
use std::fs;

fn fixture_library() -> PackLibrary {
    PackLibrary::new("tests/fixtures/library")
}

#[test]
fn scan_reports_every_candidate_with_its_outcome() {
    let entries = fixture_library().scan().unwrap();
    let names: Vec<String> = entries
        .iter()
        .map(|e| e.path.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(
        names,
        vec!["a_broken.json", "b_mire.json", "c_invalid.json", "d_untitled.json", "e_ashfall.ron"]
    );
    assert!(matches!(entries[0].summary, Err(PackError::Json(_))));
    assert!(entries[1..].iter().all(|e| e.summary.is_ok()));
}

#[test]
fn list_skips_undecodable_and_sorts_by_title() {
    let packs = fixture_library().list_packs().unwrap();
    let listing: Vec<(&str, &str)> = packs
        .iter()
        .map(|p| (p.id.as_str(), p.title.as_str()))
        .collect();
    assert_eq!(
        listing,
        vec![
            ("ashfall", "Ashfall"),
            ("mire", "beneath the Mire"),
            ("d_untitled", "d_untitled"),
            ("hollow-crown", "The Hollow Crown"),
        ]
    );
}

#[test]
fn load_finds_pack_past_broken_files() {
    let pack = fixture_library().load_pack("mire").unwrap();
    assert_eq!(pack.meta.pack_version, 2);

    let mut state = NarrativeState::new();
    state.load_pack(pack);
    assert_eq!(state.current_scene_id(), Some("edge"));
    assert!(!state.choose(1));
    assert!(state.choose(0));
    assert!(state.is_at_ending());
}

#[test]
fn load_ron_pack_by_id() {
    let pack = fixture_library().load_pack("ashfall").unwrap();
    assert_eq!(pack.scenes[0].title, "Grey Sky");
}

#[test]
fn load_reports_validation_failure() {
    let err = fixture_library().load_pack("hollow-crown").unwrap_err();
    assert!(matches!(err, PackError::Validation(ValidationError::NoScenes)));
}

#[test]
fn load_by_stem_fallback_still_validates() {
    let err = fixture_library().load_pack("d_untitled").unwrap_err();
    assert!(matches!(
        err,
        PackError::Validation(ValidationError::MissingKey { ref key, .. }) if key == "id"
    ));
}

#[test]
fn load_unknown_id_is_not_found() {
    let err = fixture_library().load_pack("broken").unwrap_err();
    assert!(matches!(err, PackError::NotFound(ref id) if id == "broken"));
}

#[test]
fn bundled_packs_are_listed() {
    let packs = PackLibrary::builder().dir("packs").build().list_packs().unwrap();
    let ids: Vec<&str> = packs.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["lantern-keep", "ashen-road"]);
}

#[test]
fn empty_directory_lists_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let lib = PackLibrary::new(dir.path());
    assert!(lib.list_packs().unwrap().is_empty());
    assert!(matches!(lib.load_pack("anything"), Err(PackError::NotFound(_))));
}

#[test]
fn first_match_in_path_order_wins() {
    let dir = tempfile::tempdir().unwrap();
    let pack = |title: &str| {
        format!(
            r#"{{"meta": {{"packVersion": 1, "id": "twin", "title": "{}", "description": ""}},
                "scenes": [{{"id": "s", "title": "S", "text": ""}}]}}"#,
            title
        )
    };
    fs::write(dir.path().join("2.json"), pack("Second")).unwrap();
    fs::write(dir.path().join("1.json"), pack("First")).unwrap();
    fs::create_dir(dir.path().join("nested.json")).unwrap();

    let lib = PackLibrary::new(dir.path());
    assert_eq!(lib.load_pack("twin").unwrap().meta.title, "First");
    assert_eq!(lib.scan().unwrap().len(), 2);
}
