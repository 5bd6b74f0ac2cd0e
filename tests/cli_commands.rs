#![allow(deprecated)] // Command::cargo_bin

use std::collections::BTreeMap;
use std::fs;

use areamap::Position;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Каталог с небольшим миром: три города в цепочке, континент и изолированная зона
fn test_database() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("areas.json"),
        r#"[
  {"uid": "p", "name": "Port Town"},
  {"uid": "q", "name": "Quarry"},
  {"uid": "r", "name": "Ridge"},
  {"uid": "mes", "name": "The Continent of Mesolar"},
  {"uid": "sea", "name": "The Southern Ocean"},
  {"uid": "iso", "name": "Isolation Ward"}
]"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("rooms.json"),
        r#"[
  {"uid": 1, "area": "p"},
  {"uid": 2, "area": "p"},
  {"uid": 3, "area": "q"},
  {"uid": 4, "area": "r"},
  {"uid": 5, "area": "mes"},
  {"uid": 6, "area": "sea"},
  {"uid": 7, "area": "iso"}
]"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("exits.json"),
        r#"[
  {"fromuid": 1, "touid": 3, "dir": "n"},
  {"fromuid": 3, "touid": 4, "dir": "east"},
  {"fromuid": 2, "touid": 5, "dir": "s"},
  {"fromuid": 2, "touid": 6, "dir": "w"},
  {"fromuid": 4, "touid": 4, "dir": "n"},
  {"fromuid": 1, "touid": 2, "dir": "u"}
]"#,
    )
    .unwrap();
    dir
}

fn areamap(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("areamap-cli").unwrap();
    cmd.arg("--database").arg(dir.path());
    cmd
}

#[test]
fn layout_writes_positions_and_overlaps() {
    let dir = test_database();
    areamap(&dir).arg("layout").assert().success();

    let text = fs::read_to_string(dir.path().join("mega-coordinates.json")).unwrap();
    let positions: BTreeMap<String, Position> = serde_json::from_str(&text).unwrap();
    assert_eq!(
        positions.keys().collect::<Vec<_>>(),
        vec!["iso", "p", "q", "r"]
    );

    let (p, q, r) = (positions["p"], positions["q"], positions["r"]);
    assert!(q.y > p.y);
    assert!(r.x > q.x);

    let mean_x: f64 = positions.values().map(|pos| pos.x).sum::<f64>() / 4.0;
    let mean_y: f64 = positions.values().map(|pos| pos.y).sum::<f64>() / 4.0;
    assert!(mean_x.abs() < 1e-6 && mean_y.abs() < 1e-6);

    let overlaps = fs::read_to_string(dir.path().join("continent-overlaps.txt")).unwrap();
    assert_eq!(
        overlaps,
        "Areas linked to multiple continents:\n- Port Town (p): mesolar, southern ocean\n"
    );
}

#[test]
fn layout_is_reproducible_from_same_seeds() {
    let first = test_database();
    let second = test_database();
    areamap(&first).args(["layout", "--iterations", "50"]).assert().success();
    areamap(&second).args(["layout", "--iterations", "50"]).assert().success();
    assert_eq!(
        fs::read_to_string(first.path().join("mega-coordinates.json")).unwrap(),
        fs::read_to_string(second.path().join("mega-coordinates.json")).unwrap()
    );
}

#[test]
fn classify_prints_labels_and_placeholder() {
    let dir = test_database();
    areamap(&dir)
        .arg("classify")
        .assert()
        .success()
        .stdout(predicate::str::contains("p\tPort Town\tmesolar"))
        .stdout(predicate::str::contains("q\tQuarry\tmesolar"))
        .stdout(predicate::str::contains("iso\tIsolation Ward\t-"))
        .stdout(predicate::str::contains("Mesolar").not());
}

#[test]
fn config_overrides_take_precedence() {
    let dir = test_database();
    let config = dir.path().join("areamap.toml");
    fs::write(&config, "[continents.overrides]\n\"isolation ward\" = \"gelidus\"\n").unwrap();
    areamap(&dir)
        .arg("--config")
        .arg(&config)
        .arg("classify")
        .assert()
        .success()
        .stdout(predicate::str::contains("iso\tIsolation Ward\tgelidus"));
}

#[test]
fn exits_table_lists_areas() {
    let dir = test_database();
    areamap(&dir).arg("exits").assert().success();
    let table = fs::read_to_string(dir.path().join("area-exits.csv")).unwrap();
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Area Name,Continent,Exits",
            "Isolation Ward,-,(no exits to other areas)",
            "Port Town,mesolar,Quarry; The Continent of Mesolar (mesolar); The Southern Ocean (southern ocean)",
            "Quarry,mesolar,Ridge",
            "Ridge,mesolar,(no exits to other areas)",
        ]
    );
}

#[test]
fn missing_input_file_fails_loudly() {
    let dir = test_database();
    fs::remove_file(dir.path().join("exits.json")).unwrap();
    areamap(&dir)
        .arg("layout")
        .assert()
        .failure()
        .stderr(predicate::str::contains("required input file not found"));
}

#[test]
fn empty_inputs_are_valid() {
    let dir = TempDir::new().unwrap();
    for file in ["areas.json", "rooms.json", "exits.json"] {
        fs::write(dir.path().join(file), "[]").unwrap();
    }
    areamap(&dir).arg("layout").assert().success();
    assert_eq!(
        fs::read_to_string(dir.path().join("mega-coordinates.json")).unwrap(),
        "{}"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("continent-overlaps.txt")).unwrap(),
        "Areas linked to multiple continents:\n(none)\n"
    );
}

#[test]
fn invalid_config_is_rejected() {
    let dir = test_database();
    let config = dir.path().join("bad.toml");
    fs::write(&config, "[layout]\nblend = 2.0\n").unwrap();
    areamap(&dir)
        .arg("--config")
        .arg(&config)
        .arg("layout")
        .assert()
        .failure()
        .stderr(predicate::str::contains("layout.blend"));
}
