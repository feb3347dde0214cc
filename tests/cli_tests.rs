use std::fs;
use std::process::Command;

const SNAPSHOT: &str = r#"{
    "player": [
        {
            "slot": "0",
            "zone": "Character",
            "content_id": "SBB_CHARACTER_CAT",
            "cardattack": 2,
            "cardhealth": 3,
            "is_golden": "True",
            "cost": 1,
            "subtypes": ["Animal"],
            "playerid": "player"
        },
        {"slot": 7, "zone": "Hero", "content_id": "SBB_HERO_PANFLUTE", "playerid": "player", "level": 3}
    ],
    "opponent": [
        {"slot": 1, "zone": "Character", "content_id": "SBB_CHARACTER_MIMIC", "cardattack": 5, "cardhealth": 5, "is_golden": false, "cost": 3, "subtypes": [], "playerid": "opponent"},
        {"slot": 7, "zone": "Hero", "content_id": "SBB_HERO_MASK", "playerid": "opponent", "level": 2}
    ]
}"#;

#[test]
fn inspect_prints_the_fingerprint_and_units() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snapshot.json");
    fs::write(&path, SNAPSHOT).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_brawlboard"))
        .arg("inspect")
        .arg(&path)
        .output()
        .expect("binary should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Fingerprint:"));
    assert!(stdout.contains("SBB_CHARACTER_CAT"));
    assert!(stdout.contains("SBB_CHARACTER_MIMIC"));
}

#[test]
fn inspect_rejects_a_broken_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ not json").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_brawlboard"))
        .arg("inspect")
        .arg(&path)
        .output()
        .expect("binary should run");

    assert!(!output.status.success());
}
