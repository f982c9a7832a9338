use diskusage_render::{Presenter, Theme};
use diskusage_scan::{Scanner, StatConfig, Unit};
use std::fs;
use tempfile::TempDir;

fn scanned(limit: usize) -> (TempDir, diskusage_scan::StatTree) {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("a"), vec![b'a'; 100]).unwrap();
    fs::write(temp.path().join("b"), vec![b'b'; 50]).unwrap();
    fs::create_dir(temp.path().join("d")).unwrap();
    fs::write(temp.path().join("d/c"), vec![b'c'; 1024]).unwrap();

    let config = StatConfig::builder()
        .root(temp.path())
        .unit(Unit::Bytes)
        .depth(None::<usize>)
        .limit(limit)
        .build()
        .unwrap();
    let tree = Scanner::new().scan(&config).unwrap();
    (temp, tree)
}

fn text(presenter: &Presenter, tree: &diskusage_scan::StatTree) -> String {
    let mut out = Vec::new();
    presenter.render_text(tree, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_scanned_tree_renders_all_rows() {
    let (_temp, tree) = scanned(100);
    let output = text(&Presenter::new(Unit::Bytes), &tree);
    let lines: Vec<_> = output.lines().collect();

    assert!(lines[0].starts_with("Total: 1174.000B\t"));
    assert!(lines[1].chars().all(|c| c == '-'));
    assert_eq!(
        &lines[2..],
        [
            " 1024.0B 87.2% ┌─ d",
            " 1024.0B 87.2% │  └─ c",
            "  100.0B  8.5% ├─ a",
            "   50.0B  4.3% └─ b",
            "",
        ]
    );
}

#[test]
fn test_limit_trims_rows() {
    let (_temp, tree) = scanned(2);
    let output = text(&Presenter::new(Unit::Bytes), &tree);
    let rows: Vec<_> = output.lines().skip(2).collect();

    assert_eq!(rows, [" 1024.0B 87.2% ┌─ d", "  100.0B  8.5% └─ a", ""]);
}

#[test]
fn test_time_column_has_timestamps() {
    let (_temp, tree) = scanned(100);
    let output = text(&Presenter::new(Unit::Bytes).with_time(true), &tree);
    let row = output.lines().nth(2).unwrap();

    // " 1024.0B 87.2% YYYY-MM-DD HH:MM ┌─ d"
    let stamp = &row[15..31];
    assert_eq!(stamp.as_bytes()[4], b'-');
    assert_eq!(stamp.as_bytes()[13], b':');
}

#[test]
fn test_colored_output_keeps_text() {
    let (_temp, tree) = scanned(100);
    let output = text(&Presenter::new(Unit::Bytes).with_theme(Theme::new(true)), &tree);

    assert!(output.contains('\u{1b}'));
    assert!(output.contains("└─ b"));
}

#[test]
fn test_json_rows_match_text() {
    let (_temp, tree) = scanned(100);
    let mut out = Vec::new();
    Presenter::new(Unit::Bytes).render_json(&tree, &mut out).unwrap();
    let doc: serde_json::Value = serde_json::from_slice(&out).unwrap();

    let names: Vec<_> = doc["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["d", "c", "a", "b"]);
    assert!(doc["rows"][0]["modified"].is_string());
}
