//! End-to-end tests for `grove add` and `grove remove`.

mod common;
use common::prelude::*;

#[test]
fn test_add_lazy_node_saves_document() {
    let fixture = TestFixture::new().with_two_levels();

    fixture
        .command()
        .args(["add", "https://example.invalid/web.git", "--lazy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added /web (lazy)"));

    let document = fixture.read("grove.yaml");
    assert!(document.contains("name: web"));
    assert!(document.contains("url: https://example.invalid/web.git"));
    assert!(document.contains("fetch: lazy"));
    // Existing entries survive the rewrite
    assert!(document.contains("file: configs/infra.yaml"));

    fixture
        .command()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("web"));
}

#[test]
fn test_add_with_name_under_parent() {
    let fixture = TestFixture::new().with_two_levels();

    fixture
        .command()
        .args([
            "add",
            "https://example.invalid/other.git",
            "--name",
            "service2",
            "--lazy",
            "--parent",
            "/team",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added /team/service2"));

    let nested = fixture.read("nodes/team/grove.yaml");
    assert!(nested.contains("name: service2"));
    assert!(nested.contains("repos_dir: repos"));
    assert!(!fixture.read("grove.yaml").contains("service2"));
}

#[test]
fn test_add_from_inside_a_node_directory() {
    let fixture = TestFixture::new().with_two_levels();

    fixture
        .command_in("nodes/team")
        .args(["add", "https://example.invalid/tools.git", "--lazy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added /team/tools"));

    assert!(fixture.read("nodes/team/grove.yaml").contains("name: tools"));
}

#[test]
fn test_add_duplicate_fails() {
    let fixture = TestFixture::new().with_two_levels();

    fixture
        .command()
        .args(["add", "https://example.invalid/api.git", "--lazy"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("/api"));
}

#[test]
fn test_add_under_uncloned_repository_fails() {
    let fixture = TestFixture::new().with_two_levels();

    fixture
        .command()
        .args(["add", "https://example.invalid/x.git", "--lazy", "--parent", "/api"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not cloned"));
}

#[test]
fn test_add_rejects_invalid_name() {
    let fixture = TestFixture::new().with_two_levels();

    fixture
        .command()
        .args(["add", "https://example.invalid/x.git", "--name", "a/b"])
        .assert()
        .code(1);
}

#[test]
fn test_remove_deletes_subtree_and_directory() {
    let fixture = TestFixture::new().with_two_levels();

    fixture
        .command()
        .args(["remove", "team", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed /team (2 nodes)"));

    assert!(!fixture.join("nodes/team").exists());
    let document = fixture.read("grove.yaml");
    assert!(!document.contains("name: team"));
    assert!(document.contains("name: api"));
}

#[test]
fn test_remove_lazy_node_without_directory() {
    let fixture = TestFixture::new().with_two_levels();

    fixture
        .command()
        .args(["remove", "/infra/db", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed /infra/db (1 nodes)"));

    assert!(!fixture.read("configs/infra.yaml").contains("name: db"));
}

#[test]
fn test_remove_root_fails() {
    let fixture = TestFixture::new().with_two_levels();

    fixture
        .command()
        .args(["remove", "/", "--yes"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot be removed"));
}

#[test]
fn test_remove_unknown_node_fails() {
    let fixture = TestFixture::new().with_two_levels();

    fixture
        .command()
        .args(["remove", "nope", "--yes"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Node not found"));
}
