use sproutfile_ops::{
    Action, ConflictKind, Container, ExistingFilePolicy, Leaf, MaterializeConfig,
    MaterializeError, Materializer, Node, Tree, materialize,
};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn scenario_a() -> Container {
    Container::new()
        .with_dir("a", Container::new().with_file("b.txt", "hello").unwrap())
        .unwrap()
}

fn project() -> Container {
    Container::new()
        .with_dir(
            "backend",
            Container::new()
                .with_dir(
                    "src",
                    Container::new()
                        .with_file("Main.java", "class Main {}\n")
                        .unwrap(),
                )
                .unwrap()
                .with_file("Dockerfile", "FROM eclipse-temurin:17-jdk\n")
                .unwrap(),
        )
        .unwrap()
        .with_dir("empty", Container::new())
        .unwrap()
        .with_file("README.md", "# Project\n")
        .unwrap()
}

fn names_in(dir: &Path) -> BTreeSet<String> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

/// Assert the directory at `dir` mirrors `container` exactly.
fn assert_mirrors(dir: &Path, container: &Container) {
    assert!(dir.is_dir(), "{} should be a directory", dir.display());
    let expected: BTreeSet<String> = container.names().map(str::to_string).collect();
    assert_eq!(names_in(dir), expected, "entries of {}", dir.display());

    for (name, node) in container.iter() {
        let path = dir.join(name);
        match node {
            Node::Container(child) => assert_mirrors(&path, child),
            Node::Leaf(leaf) => {
                assert!(path.is_file(), "{} should be a file", path.display());
                assert_eq!(fs::read(&path).unwrap(), leaf.as_bytes());
            }
        }
    }
}

#[test]
fn test_scenario_a_creates_structure() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("x");

    let report = materialize(&root, &scenario_a()).unwrap();

    assert!(root.join("a").is_dir());
    assert_eq!(fs::read_to_string(root.join("a/b.txt")).unwrap(), "hello");
    assert_eq!(report.directories_created, 2);
    assert_eq!(report.files_created, 1);
    assert_eq!(report.bytes_written, 5);
}

#[test]
fn test_scenario_b_rerun_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("x");

    materialize(&root, &scenario_a()).unwrap();
    let report = materialize(&root, &scenario_a()).unwrap();

    assert_eq!(report.directories_created, 0);
    assert_eq!(report.directories_existing, 2);
    assert_eq!(report.files_created, 0);
    assert_eq!(report.files_overwritten, 1);
    assert_eq!(fs::read_to_string(root.join("a/b.txt")).unwrap(), "hello");
    assert_mirrors(&root, &scenario_a());
}

#[test]
fn test_scenario_c_file_blocks_directory() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("x");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("a"), "original").unwrap();

    let err = materialize(&root, &scenario_a()).unwrap_err();

    match &err {
        MaterializeError::PathConflict { path, kind } => {
            assert_eq!(path, &root.join("a"));
            assert_eq!(*kind, ConflictKind::FileExists);
        }
        other => panic!("expected a path conflict, got {other:?}"),
    }
    assert!(root.join("a").is_file());
    assert_eq!(fs::read_to_string(root.join("a")).unwrap(), "original");
}

#[test]
fn test_structural_mirroring_and_faithfulness() {
    let dir = TempDir::new().unwrap();
    let tree = Tree::new(dir.path().join("project"), project());

    let report = Materializer::new().materialize(&tree).unwrap();

    assert_mirrors(tree.base(), tree.root());
    let stats = tree.stats();
    assert_eq!(report.directories_created as u64, stats.directories);
    assert_eq!(report.files_created as u64, stats.files);
    assert_eq!(report.bytes_written, stats.total_bytes);
}

#[test]
fn test_binary_payload_written_exactly() {
    let dir = TempDir::new().unwrap();
    let payload: Vec<u8> = (0..=255u8).chain([b'\r', b'\n', 0]).collect();
    let mut root = Container::new();
    root.insert("blob.bin", Leaf::new(payload.clone())).unwrap();
    root.insert("empty.txt", Leaf::new(Vec::new())).unwrap();

    materialize(dir.path(), &root).unwrap();

    assert_eq!(fs::read(dir.path().join("blob.bin")).unwrap(), payload);
    assert_eq!(fs::read(dir.path().join("empty.txt")).unwrap(), b"");
}

#[test]
fn test_existing_base_directory_accepted() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("unrelated.txt"), "keep me").unwrap();

    let report = materialize(dir.path(), &scenario_a()).unwrap();

    assert_eq!(report.directories_existing, 1);
    assert_eq!(
        fs::read_to_string(dir.path().join("unrelated.txt")).unwrap(),
        "keep me"
    );
}

#[test]
fn test_overwrite_replaces_different_content() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("a")).unwrap();
    fs::write(dir.path().join("a/b.txt"), "stale content that is longer").unwrap();

    let report = materialize(dir.path(), &scenario_a()).unwrap();

    assert_eq!(report.files_overwritten, 1);
    assert_eq!(fs::read_to_string(dir.path().join("a/b.txt")).unwrap(), "hello");
}

#[test]
fn test_keep_policy_preserves_existing_file() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("a")).unwrap();
    fs::write(dir.path().join("a/b.txt"), "edited by hand").unwrap();

    let config = MaterializeConfig::builder()
        .existing_files(ExistingFilePolicy::Keep)
        .build()
        .unwrap();
    let report = Materializer::with_config(config)
        .materialize_at(dir.path(), &scenario_a())
        .unwrap();

    assert_eq!(report.files_kept, 1);
    assert_eq!(report.bytes_written, 0);
    assert_eq!(
        fs::read_to_string(dir.path().join("a/b.txt")).unwrap(),
        "edited by hand"
    );
}

#[test]
fn test_fail_policy_rejects_existing_file() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("a")).unwrap();
    fs::write(dir.path().join("a/b.txt"), "mine").unwrap();

    let config = MaterializeConfig::builder()
        .existing_files(ExistingFilePolicy::Fail)
        .build()
        .unwrap();
    let err = Materializer::with_config(config)
        .materialize_at(dir.path(), &scenario_a())
        .unwrap_err();

    assert!(matches!(
        err,
        MaterializeError::PathConflict {
            kind: ConflictKind::FileExists,
            ..
        }
    ));
    assert_eq!(fs::read_to_string(dir.path().join("a/b.txt")).unwrap(), "mine");
}

#[test]
fn test_directory_blocks_file() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("a/b.txt")).unwrap();

    let err = materialize(dir.path(), &scenario_a()).unwrap_err();

    assert!(matches!(
        err,
        MaterializeError::PathConflict {
            kind: ConflictKind::DirectoryExists,
            ..
        }
    ));
    assert_eq!(err.path(), dir.path().join("a/b.txt"));
    assert!(dir.path().join("a/b.txt").is_dir());
}

#[test]
fn test_base_is_a_file() {
    let dir = TempDir::new().unwrap();
    let base = dir.path().join("x");
    fs::write(&base, "not a dir").unwrap();

    let err = materialize(&base, &scenario_a()).unwrap_err();

    assert!(err.is_conflict());
    assert_eq!(err.path(), base.as_path());
    assert_eq!(fs::read_to_string(&base).unwrap(), "not a dir");
}

#[test]
fn test_fail_fast_stops_before_later_siblings() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("second"), "blocker").unwrap();

    let root = Container::new()
        .with_file("first.txt", "1")
        .unwrap()
        .with_dir("second", Container::new().with_file("inner", "2").unwrap())
        .unwrap()
        .with_file("third.txt", "3")
        .unwrap();

    let err = materialize(dir.path(), &root).unwrap_err();

    assert_eq!(err.path(), dir.path().join("second"));
    // Earlier work stays, later work never starts.
    assert!(dir.path().join("first.txt").is_file());
    assert!(!dir.path().join("third.txt").exists());
}

#[test]
fn test_rerun_after_fixing_conflict_converges() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("empty"), "blocker").unwrap();

    assert!(materialize(dir.path(), &project()).is_err());

    fs::remove_file(dir.path().join("empty")).unwrap();
    materialize(dir.path(), &project()).unwrap();

    assert_mirrors(dir.path(), &project());
}

#[cfg(unix)]
#[test]
fn test_symlink_is_never_followed() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("target");
    fs::create_dir(&target).unwrap();
    let base = dir.path().join("base");
    fs::create_dir(&base).unwrap();
    std::os::unix::fs::symlink(&target, base.join("a")).unwrap();

    let err = materialize(&base, &scenario_a()).unwrap_err();

    assert!(matches!(
        err,
        MaterializeError::PathConflict {
            kind: ConflictKind::Symlink,
            ..
        }
    ));
    assert!(!target.join("b.txt").exists());
    assert!(fs::symlink_metadata(base.join("a")).unwrap().file_type().is_symlink());
}

#[test]
fn test_deeply_nested_tree() {
    let dir = TempDir::new().unwrap();
    let depth = 200;
    let mut node = Container::new().with_file("leaf.txt", "bottom").unwrap();
    for _ in 0..depth {
        node = Container::new().with_dir("d", node).unwrap();
    }

    let report = materialize(dir.path(), &node).unwrap();

    assert_eq!(report.directories_created, depth);
    assert_eq!(report.directories_existing, 1);
    let mut expected = dir.path().to_path_buf();
    for _ in 0..depth {
        expected.push("d");
    }
    expected.push("leaf.txt");
    assert_eq!(fs::read_to_string(expected).unwrap(), "bottom");
}

#[test]
fn test_plan_fresh_root() {
    let dir = TempDir::new().unwrap();
    let tree = Tree::new(dir.path().join("x"), scenario_a());

    let plan = Materializer::new().plan(&tree).unwrap();

    let actions: Vec<Action> = plan.actions.iter().map(|a| a.action).collect();
    assert_eq!(
        actions,
        vec![
            Action::CreateDirectory,
            Action::CreateDirectory,
            Action::CreateFile
        ]
    );
    assert_eq!(plan.actions[2].path, dir.path().join("x/a/b.txt"));
    assert_eq!(plan.actions[2].bytes, 5);
    assert_eq!(plan.change_count(), 3);
    assert!(!plan.has_conflicts());
    // Planning never writes.
    assert!(!dir.path().join("x").exists());
}

#[test]
fn test_plan_after_materialize() {
    let dir = TempDir::new().unwrap();
    let tree = Tree::new(dir.path(), scenario_a());
    Materializer::new().materialize(&tree).unwrap();

    let plan = Materializer::new().plan(&tree).unwrap();
    let actions: Vec<Action> = plan.actions.iter().map(|a| a.action).collect();
    assert_eq!(
        actions,
        vec![
            Action::KeepDirectory,
            Action::KeepDirectory,
            Action::OverwriteFile
        ]
    );
}

#[test]
fn test_plan_records_conflicts_and_prunes() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a"), "blocker").unwrap();
    let root = scenario_a().with_file("c.txt", "c").unwrap();

    let plan = Materializer::new().plan_at(dir.path(), &root).unwrap();

    assert!(plan.has_conflicts());
    let conflicts: Vec<_> = plan.conflicts().collect();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].path, dir.path().join("a"));
    // a/b.txt is pruned, the sibling is still planned.
    assert_eq!(plan.len(), 3);
    assert_eq!(plan.actions[2].path, dir.path().join("c.txt"));
    assert_eq!(plan.actions[2].action, Action::CreateFile);
}

#[test]
fn test_plan_serializes_to_json() {
    let dir = TempDir::new().unwrap();
    let plan = Materializer::new()
        .plan_at(dir.path(), &scenario_a())
        .unwrap();

    let json = serde_json::to_value(&plan).unwrap();
    assert_eq!(json["actions"][0]["action"], "keep_directory");
    assert_eq!(json["actions"][2]["action"], "create_file");
}
