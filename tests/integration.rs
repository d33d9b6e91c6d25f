use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const FAMILY: &str = include_str!("../data/family.example.json");

fn geomoves_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("geomoves");
    path
}

fn setup_test_env(geography: &str) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();
    let data_dir = root.join("data");
    fs::create_dir_all(&data_dir).unwrap();
    fs::write(data_dir.join("family.json"), FAMILY).unwrap();

    let config_content = format!(
        r#"[tree]
path = "{}/data/family.json"

[geography]
{}
"#,
        root.display(),
        geography
    );

    let config_path = config_dir.join("geomoves.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn default_env() -> (TempDir, PathBuf) {
    setup_test_env("maximum_generations = 2\ngeneration_interval = 500")
}

fn run_geomoves(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = geomoves_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run geomoves binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

fn json_lines(stdout: &str) -> Vec<serde_json::Value> {
    stdout
        .lines()
        .map(|l| serde_json::from_str(l).unwrap_or_else(|e| panic!("bad line {:?}: {}", l, e)))
        .collect()
}

#[test]
fn test_animate_json_stream() {
    let (_tmp, config_path) = default_env();

    let (stdout, stderr, success) =
        run_geomoves(&config_path, &["animate", "I0001", "--output", "json"]);
    assert!(success, "animate failed: stdout={}, stderr={}", stdout, stderr);

    let lines = json_lines(&stdout);
    assert_eq!(lines[0]["command"], "clear_all");
    assert_eq!(lines[1]["command"], "add_message");
    assert_eq!(lines[1]["text"], "All descendants of Berg, Anna");

    let levels: Vec<u64> = lines
        .iter()
        .filter(|l| l["event"] == "level")
        .map(|l| l["report"]["level"].as_u64().unwrap())
        .collect();
    assert_eq!(levels, vec![0, 1, 2]);

    let paths = lines.iter().filter(|l| l["command"] == "add_path").count();
    assert_eq!(paths, 4);

    let summary = &lines.last().unwrap()["summary"];
    assert_eq!(summary["levels"], 3);
    assert_eq!(summary["persons_drawn"], 6);
    assert_eq!(summary["paths_drawn"], 4);
    assert_eq!(summary["marks"], 6);
    assert_eq!(summary["missing"][0]["title"], "Nowhere");
}

#[test]
fn test_animate_paths_follow_birth_order() {
    let (_tmp, config_path) = default_env();

    let (stdout, _, success) =
        run_geomoves(&config_path, &["animate", "I0001", "--output", "json"]);
    assert!(success);

    let labels: Vec<String> = json_lines(&stdout)
        .iter()
        .filter(|l| l["command"] == "add_path")
        .map(|l| l["label"].as_str().unwrap().to_string())
        .collect();
    // Nils (b. 1848) before Anna; Anna's path starts at the Bergen marriage.
    assert_eq!(labels, vec!["1848", "1872", "1875", "1900"]);
}

#[test]
fn test_animate_human_output() {
    let (_tmp, config_path) = default_env();

    let (stdout, stderr, success) =
        run_geomoves(&config_path, &["animate", "I0001", "--output", "human"]);
    assert!(success, "animate failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.starts_with("clear\n"));
    assert!(stdout.contains("message All descendants of Berg, Anna"));
    assert!(stdout.contains("path 1848  #ffa500  1 point  (60.39166667, 5.32388889)"));
    assert!(stdout.contains("done  6 persons, 4 paths, 6 places over 3 generations"));
    assert!(stdout.contains("places without coordinates:"));
    assert!(stdout.contains("P0004  Nowhere"));
}

#[test]
fn test_animate_unknown_person_fails() {
    let (_tmp, config_path) = default_env();

    let (_, stderr, success) = run_geomoves(&config_path, &["animate", "I9999"]);
    assert!(!success);
    assert!(stderr.contains("person not found: I9999"));
}

#[test]
fn test_levels() {
    let (_tmp, config_path) = default_env();

    let (stdout, stderr, success) = run_geomoves(&config_path, &["levels", "I0001"]);
    assert!(success, "levels failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("Generations of Berg, Anna (I0001), up to level 2"));
    assert!(stdout.contains("level 0  assigned 1  visited 2"));
    assert!(stdout.contains("level 1  assigned 2  visited 3"));
    assert!(stdout.contains("level 2  assigned 1  visited 1"));
    assert!(stdout.contains("I0005  Lund, Lena"));
}

#[test]
fn test_levels_respects_depth_bound() {
    let (_tmp, config_path) = setup_test_env("maximum_generations = 1");

    let (stdout, _, success) = run_geomoves(&config_path, &["levels", "I0001"]);
    assert!(success);
    assert!(stdout.contains("level 1  assigned 2  visited 3"));
    assert!(!stdout.contains("level 2"));
    assert!(!stdout.contains("I0006"));
}

#[test]
fn test_marks_in_drawing_order() {
    let (_tmp, config_path) = default_env();

    let (stdout, stderr, success) = run_geomoves(&config_path, &["marks", "I0001"]);
    assert!(success, "marks failed: stdout={}, stderr={}", stdout, stderr);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("18720000  Bergen"));
    assert!(lines[0].contains("Berg, Nils - Berg, Anna"));
    assert!(lines[0].ends_with("[E0003]"));
    assert!(lines[1].starts_with("18500312  Oslo  (59.91390000, 10.75220000)  Birth : Berg, Anna"));
}

#[test]
fn test_marks_report_missing_coordinates() {
    let (_tmp, config_path) = default_env();

    let (stdout, _, success) = run_geomoves(&config_path, &["marks", "I0003"]);
    assert!(success);
    assert!(stdout.contains("Rome  (41.90280000, 12.49640000)"));
    assert!(stdout.contains("places without coordinates:\n  P0004  Nowhere"));
}

#[test]
fn test_describe_place() {
    let (_tmp, config_path) = default_env();

    let (stdout, stderr, success) =
        run_geomoves(&config_path, &["describe", "I0001", "P0002"]);
    assert!(success, "describe failed: stdout={}, stderr={}", stdout, stderr);
    assert_eq!(
        stdout,
        "Bergen (P0002)\n  (1872) Marriage : Berg, Nils - Berg, Anna\n"
    );
}

#[test]
fn test_describe_place_without_events_fails() {
    let (_tmp, config_path) = default_env();

    let (_, stderr, success) = run_geomoves(&config_path, &["describe", "I0001", "P0005"]);
    assert!(!success);
    assert!(stderr.contains("no geocoded events of I0001 at place P0005"));
}

#[test]
fn test_invalid_config_rejected() {
    let (_tmp, config_path) = setup_test_env("maximum_generations = 50");

    let (_, stderr, success) = run_geomoves(&config_path, &["levels", "I0001"]);
    assert!(!success);
    assert!(stderr.contains("maximum_generations"));
}

#[test]
fn test_tree_override_without_config_file() {
    let (tmp, _) = default_env();
    let tree = tmp.path().join("data/family.json");
    let missing_config = tmp.path().join("config/absent.toml");

    let (stdout, stderr, success) = run_geomoves(
        &missing_config,
        &["--tree", tree.to_str().unwrap(), "marks", "I0006"],
    );
    assert!(success, "marks failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("Paris  (48.85660000, 2.35220000)  Birth : Berg, Olaf"));
}

#[test]
fn test_missing_tree_file_fails() {
    let (tmp, config_path) = default_env();
    fs::remove_file(tmp.path().join("data/family.json")).unwrap();

    let (_, stderr, success) = run_geomoves(&config_path, &["levels", "I0001"]);
    assert!(!success);
    assert!(stderr.contains("Failed to read family tree"));
}
