use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn parse_jsonl(stdout: &[u8]) -> Vec<Value> {
    let s = String::from_utf8_lossy(stdout);
    s.lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str::<Value>(l).expect("valid jsonl line"))
        .collect()
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn wordtally() -> Command {
    let mut cmd = Command::cargo_bin("wordtally").expect("wordtally binary");
    cmd.env_remove("WORDTALLY_WORKERS")
        .env_remove("WORDTALLY_TIMEOUT_SECS")
        .env_remove("RUST_LOG");
    cmd
}

fn ranked_words(items: &[Value]) -> Vec<(String, u64)> {
    items
        .iter()
        .filter(|v| v.get("kind").and_then(|k| k.as_str()) == Some("word"))
        .map(|v| {
            let data = v.get("data").expect("word data");
            (
                data["word"].as_str().unwrap().to_string(),
                data["count"].as_u64().unwrap(),
            )
        })
        .collect()
}

#[test]
fn count_ranks_words_with_tie_break() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("story.txt"), "The cat sat. The cat ran.\n");

    let assert = wordtally()
        .arg("--root")
        .arg(temp.path())
        .arg("count")
        .arg("story.txt")
        .arg("--workers")
        .arg("3")
        .assert()
        .success();
    let items = parse_jsonl(&assert.get_output().stdout);

    assert_eq!(items[0]["kind"], "summary");
    assert_eq!(items[0]["path"], "story.txt");
    assert_eq!(items[0]["data"]["shown"], 4);
    assert_eq!(items[0]["data"]["outcome"]["status"], "complete");
    assert_eq!(
        ranked_words(&items),
        vec![
            ("cat".to_string(), 2),
            ("the".to_string(), 2),
            ("ran".to_string(), 1),
            ("sat".to_string(), 1),
        ]
    );
}

#[test]
fn count_summary_prints_header() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("story.txt"), "The cat sat. The cat ran.\n");

    wordtally()
        .arg("--root")
        .arg(temp.path())
        .arg("--no-color")
        .arg("count")
        .arg("story.txt")
        .arg("--count-format")
        .arg("summary")
        .assert()
        .success()
        .stdout("Top 4 Words:\ncat: 2\nthe: 2\nran: 1\nsat: 1\n");
}

#[test]
fn count_empty_file_is_not_an_error() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("empty.txt"), "");

    wordtally()
        .arg("--root")
        .arg(temp.path())
        .arg("--no-color")
        .arg("count")
        .arg("empty.txt")
        .arg("--count-format")
        .arg("summary")
        .assert()
        .success()
        .stdout("Top 0 Words:\n");
}

#[test]
fn count_rejects_zero_and_negative_workers() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("story.txt"), "words\n");

    for workers in ["0", "-2"] {
        wordtally()
            .arg("--root")
            .arg(temp.path())
            .arg("count")
            .arg("story.txt")
            .arg("--workers")
            .arg(workers)
            .assert()
            .failure()
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("invalid worker count"));
    }
}

#[test]
fn count_accepts_huge_worker_count() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("story.txt"), "a b c\n");

    wordtally()
        .arg("--root")
        .arg(temp.path())
        .arg("--no-color")
        .arg("count")
        .arg("story.txt")
        .arg("--workers")
        .arg(i64::MAX.to_string())
        .arg("--count-format")
        .arg("summary")
        .assert()
        .success()
        .stdout("Top 3 Words:\na: 1\nb: 1\nc: 1\n");
}

#[test]
fn count_keeps_words_around_invalid_utf8() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("mixed.txt"), b"bad \xff\xfe bytes\nbad\n").unwrap();

    wordtally()
        .arg("--root")
        .arg(temp.path())
        .arg("--no-color")
        .arg("count")
        .arg("mixed.txt")
        .arg("--count-format")
        .arg("summary")
        .assert()
        .success()
        .stdout("Top 2 Words:\nbad: 2\nbytes: 1\n")
        .stderr(predicate::str::contains("not valid UTF-8"));
}

#[test]
fn count_unknown_count_format_warns_and_falls_back() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("story.txt"), "cat cat dog\n");

    let assert = wordtally()
        .arg("--root")
        .arg(temp.path())
        .arg("count")
        .arg("story.txt")
        .arg("--count-format")
        .arg("fancy")
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "Unknown count format: fancy; falling back to standard",
        ));
    let items = parse_jsonl(&assert.get_output().stdout);
    assert_eq!(
        ranked_words(&items),
        vec![("cat".to_string(), 2), ("dog".to_string(), 1)]
    );
}

#[test]
fn count_workers_from_env() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("story.txt"), "words\n");

    wordtally()
        .env("WORDTALLY_WORKERS", "0")
        .arg("--root")
        .arg(temp.path())
        .arg("count")
        .arg("story.txt")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid worker count 0"));
}

#[test]
fn count_missing_file_fails() {
    let temp = tempdir().unwrap();

    wordtally()
        .arg("--root")
        .arg(temp.path())
        .arg("count")
        .arg("missing.txt")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("failed to read source"));
}

#[test]
fn count_totals_do_not_depend_on_workers() {
    let temp = tempdir().unwrap();
    let text: String = (0..300)
        .map(|i| format!("Alpha beta{} gamma; delta-{} alpha\n", i % 5, i % 3))
        .collect();
    write_file(&temp.path().join("big.txt"), &text);

    let run = |workers: &str| {
        let assert = wordtally()
            .arg("--root")
            .arg(temp.path())
            .arg("count")
            .arg("big.txt")
            .arg("--all")
            .arg("--workers")
            .arg(workers)
            .assert()
            .success();
        ranked_words(&parse_jsonl(&assert.get_output().stdout))
    };

    let single = run("1");
    assert_eq!(single[0], ("alpha".to_string(), 600));
    assert_eq!(run("2"), single);
    assert_eq!(run("7"), single);
}

#[test]
fn count_json_report() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("story.txt"), "one two two\n");

    let assert = wordtally()
        .arg("--root")
        .arg(temp.path())
        .arg("count")
        .arg("story.txt")
        .arg("--workers")
        .arg("2")
        .arg("--count-format")
        .arg("json")
        .assert()
        .success();
    let report: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();

    assert_eq!(report["source"], "story.txt");
    assert_eq!(report["workers"], 2);
    assert_eq!(report["total_words"], 3);
    assert_eq!(report["top"][0]["word"], "two");
    assert!(report.get("counts").is_none());
}

#[test]
fn list_reports_text_files_in_stable_order() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("b.txt"), "b");
    write_file(&temp.path().join("a.txt"), "a a");
    write_file(&temp.path().join("sub/zz.txt"), "z");
    write_file(&temp.path().join("skip.md"), "m");

    let assert = wordtally()
        .arg("--root")
        .arg(temp.path())
        .arg("list")
        .assert()
        .success();
    let items = parse_jsonl(&assert.get_output().stdout);

    let paths: Vec<_> = items
        .iter()
        .map(|v| v["path"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(paths, vec!["a.txt", "b.txt", "sub/zz.txt"]);
    assert_eq!(items[0]["meta"]["words"], 2);
}

#[test]
fn search_finds_keyword_lines() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("a.txt"), "first\nsecond keyword\n");
    write_file(&temp.path().join("b.txt"), "nothing\n");

    let assert = wordtally()
        .arg("--root")
        .arg(temp.path())
        .arg("search")
        .arg("keyword")
        .assert()
        .success();
    let items = parse_jsonl(&assert.get_output().stdout);

    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["kind"], "match");
    assert_eq!(items[0]["path"], "a.txt");
    assert_eq!(items[0]["range"]["start"], 2);
    assert_eq!(items[0]["excerpt"], "second keyword");
}

#[test]
fn search_without_matches_prints_nothing() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("a.txt"), "first\n");

    wordtally()
        .arg("--root")
        .arg(temp.path())
        .arg("search")
        .arg("absent")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("no files found with the keyword"));
}
