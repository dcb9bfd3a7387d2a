use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Read;

fn voiceable(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("voiceable").unwrap();
    cmd.current_dir(dir).env_remove("OPENAI_API_KEY").env("NO_COLOR", "1");
    cmd
}

#[test]
fn offline_one_shot_writes_archive() {
    let dir = tempfile::tempdir().unwrap();
    voiceable(dir.path())
        .args([
            "--offline",
            "--prompt",
            "screen reader for news articles",
            "--template",
            "screen-reader",
            "--fast",
            "--yes",
            "--unpack",
            "--out",
        ])
        .arg(dir.path())
        .arg("--root")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Screen Reader News is ready!")
                .and(predicate::str::contains("How to use:"))
                .and(predicate::str::contains("2. Open index.html in a web browser"))
                .and(predicate::str::contains("Unpacked: 3 files")),
        );
    assert!(dir.path().join("screen-reader-news").join("index.html").is_file());

    let zip_path = dir.path().join("screen-reader-news.zip");
    assert!(zip_path.is_file());

    let mut zip = zip::ZipArchive::new(std::fs::File::open(&zip_path).unwrap()).unwrap();
    let mut names: Vec<String> = zip.file_names().map(str::to_string).collect();
    names.sort();
    assert_eq!(names, ["README.md", "index.html", "package.json"]);

    let mut html = String::new();
    zip.by_name("index.html").unwrap().read_to_string(&mut html).unwrap();
    assert!(html.contains("speechSynthesis"));
}

#[test]
fn blank_prompt_fails() {
    let dir = tempfile::tempdir().unwrap();
    voiceable(dir.path())
        .args(["--offline", "--fast", "--yes", "--prompt", "   ", "--root"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("describe"));
}

#[test]
fn history_lists_generated_tools() {
    let dir = tempfile::tempdir().unwrap();
    voiceable(dir.path())
        .args(["--offline", "--fast", "--yes", "--prompt", "Create a medication reminder", "--template", "medication"])
        .arg("--root")
        .arg(dir.path())
        .assert()
        .success();

    voiceable(dir.path())
        .args(["--history", "5", "--root"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Medication Reminder"));

    voiceable(dir.path())
        .args(["--clear-history", "--root"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 1 tools"));
}
