use diskusage_core::{
    FileNode, NodeKind, NodeSelector, ScanError, StatConfig, StatTree, Timestamps, Unit,
};
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

fn file(name: &str, size: u64) -> FileNode {
    FileNode::new_file(name, size, None)
}

fn dir(name: &str, children: Vec<FileNode>) -> FileNode {
    FileNode::from_children(name, None, children)
}

/// root
/// ├── big/            (3000)
/// │   ├── x.bin       2000
/// │   ├── nested/     (1000)
/// │   │   └── y.bin   1000
/// │   └── hollow/     (0)
/// │       └── inner/  (0)
/// ├── a.txt           100
/// ├── none/           (0)
/// └── b.txt           50
fn build_tree() -> FileNode {
    dir(
        "root",
        vec![
            file("a.txt", 100),
            dir("none", vec![]),
            file("b.txt", 50),
            dir(
                "big",
                vec![
                    dir("hollow", vec![dir("inner", vec![])]),
                    file("x.bin", 2000),
                    dir("nested", vec![file("y.bin", 1000)]),
                ],
            ),
        ],
    )
}

fn assert_size_conserved(node: &FileNode) {
    if node.is_dir() {
        let sum: u64 = node.children.iter().map(|c| c.size).sum();
        assert_eq!(node.size, sum, "size mismatch at {}", node.name);
        node.children.iter().for_each(assert_size_conserved);
    } else {
        assert!(node.children.is_empty());
    }
}

fn count_eligible(node: &FileNode) -> usize {
    node.children
        .iter()
        .map(|c| usize::from(c.eligible) + count_eligible(c))
        .sum()
}

fn any_eligible(node: &FileNode) -> bool {
    node.children.iter().any(|c| c.eligible || any_eligible(c))
}

#[test]
fn test_size_conservation() {
    let root = build_tree();
    assert_eq!(root.size, 3150);
    assert_size_conserved(&root);
}

#[test]
fn test_children_sorted_descending() {
    let root = build_tree();
    let names: Vec<_> = root.children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["big", "a.txt", "b.txt", "none"]);

    let big = &root.children[0];
    let names: Vec<_> = big.children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["x.bin", "nested", "hollow"]);
}

#[test]
fn test_directory_counts() {
    let root = build_tree();
    assert_eq!(root.file_count(), 4);
    // none, big, hollow, inner, nested
    assert_eq!(root.dir_count(), 5);

    match root.kind {
        NodeKind::Directory {
            file_count,
            dir_count,
        } => {
            assert_eq!(file_count, 4);
            assert_eq!(dir_count, 5);
        }
        NodeKind::File => panic!("root must be a directory"),
    }
}

#[test]
fn test_selector_budget_respect() {
    // Nodes passing the default filters: big, a.txt, b.txt, x.bin, nested, y.bin
    let passing = 6;
    for k in 0..=10 {
        let mut root = build_tree();
        let marked = NodeSelector::new(k, false, false).select(&mut root);
        assert_eq!(marked, k.min(passing), "budget {k}");
        assert_eq!(count_eligible(&root), k.min(passing), "budget {k}");
    }
}

#[test]
fn test_selector_prunes_empty_directories() {
    let mut root = build_tree();
    NodeSelector::default().select(&mut root);

    let none = root.children.iter().find(|c| c.name.as_str() == "none").unwrap();
    assert!(!none.eligible);

    let big = &root.children[0];
    let hollow = big.children.iter().find(|c| c.name.as_str() == "hollow").unwrap();
    assert!(!hollow.eligible);
    assert!(!any_eligible(hollow));
}

#[test]
fn test_selector_includes_empty_directories() {
    let mut root = build_tree();
    let marked = NodeSelector::new(usize::MAX, true, false).select(&mut root);

    // all nine nodes below the root
    assert_eq!(marked, 9);
    let hollow = &root.children[0].children[2];
    assert!(hollow.eligible);
    assert!(hollow.children[0].eligible);
}

#[test]
fn test_selector_directories_only() {
    let mut root = build_tree();
    let marked = NodeSelector::new(usize::MAX, true, true).select(&mut root);

    assert_eq!(marked, 5);
    assert!(root.children.iter().all(|c| c.eligible == c.is_dir()));
}

#[test]
fn test_selector_budget_stops_before_descendants() {
    let mut root = build_tree();
    NodeSelector::new(3, false, false).select(&mut root);

    // The top level is considered before anything below `big`.
    let marked: Vec<_> = root
        .children
        .iter()
        .filter(|c| c.eligible)
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(marked, ["big", "a.txt", "b.txt"]);
    assert!(!any_eligible(&root.children[0]));
}

#[test]
fn test_idempotent_sort() {
    let mut root = dir(
        "root",
        vec![file("p", 5), file("q", 5), file("r", 8), file("s", 1)],
    );
    let first: Vec<_> = root.children.iter().map(|c| c.name.clone()).collect();
    root.sort_children_by_size();
    root.sort_children_by_size();
    let second: Vec<_> = root.children.iter().map(|c| c.name.clone()).collect();
    assert_eq!(first, second);
}

#[test]
fn test_stat_tree_totals() {
    let tree = StatTree::new(
        build_tree(),
        PathBuf::from("/data"),
        Duration::from_millis(5),
        Vec::new(),
    );
    assert_eq!(tree.total_size(), 3150);
    assert_eq!(tree.stats.total_files, 4);
}

#[test]
fn test_timestamps() {
    let now = SystemTime::now();
    let timestamps = Timestamps::new(now, None);
    assert_eq!(timestamps.modified, now);
    assert!(timestamps.created.is_none());

    let created = now - Duration::from_secs(7200);
    let full = Timestamps::new(now, Some(created));
    assert_eq!(full.created, Some(created));
}

#[test]
fn test_unit_formatting() {
    assert_eq!(Unit::Bytes.format(1174), "1174.0B");
    assert_eq!(Unit::Kilo.format(1174), "1.1K");
    assert_eq!(Unit::Tera.format(1), "1.0B");
    assert_eq!(Unit::Giga.format(3 * 1024 * 1024), "3.0M");
    assert_eq!(Unit::Tera.to_string(), "T");
}

#[test]
fn test_invalid_unit_is_config_error() {
    let err = Unit::parse("Z").unwrap_err();
    assert!(matches!(err, ScanError::InvalidConfig { .. }));
    assert!(err.to_string().contains("invalid unit"));
}

#[test]
fn test_config_rejects_bad_regex() {
    let mut config = StatConfig::new("/data");
    config.filter = Some("*.rs".to_string());
    assert!(matches!(
        config.validate(),
        Err(ScanError::InvalidConfig { .. })
    ));
}
