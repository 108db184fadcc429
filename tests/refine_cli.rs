// End-to-end tests for the `refine` surface: the hermetic way to drive
// the whole pipeline without a model server.
//
// We use assert_cmd for spawning the compiled binary, assert_fs for
// on-disk fixtures so tests never touch the developer's filesystem, and
// predicates for concise stdout assertions. The refined text is the
// binary's stdout, verbatim; informational chatter goes to stderr.

use assert_cmd::prelude::*;
use assert_fs::prelude::*;
use predicates::prelude::*;
use assert_cmd::Command;

fn cst() -> Command {
    Command::cargo_bin("cst").expect("binary builds")
}

#[test]
fn fenced_block_is_extracted_verbatim() {
    let tmp = assert_fs::TempDir::new().expect("tempdir");
    tmp.child("answer.txt")
        .write_str("Sure! Here is the code:\n```python\nx = 1\nprint(x)\n```\nHope it helps.\n")
        .expect("write fixture");

    cst()
        .current_dir(tmp.path())
        .args(["refine", "-c", "answer.txt"])
        .assert()
        .success()
        .stdout(predicate::str::diff("x = 1\nprint(x)"));
}

#[test]
fn two_fenced_blocks_join_with_one_blank_line() {
    let tmp = assert_fs::TempDir::new().expect("tempdir");
    tmp.child("answer.txt")
        .write_str("First:\n```python\na = 1\n```\nSecond:\n```python\nb = 2\n```\n")
        .expect("write fixture");

    cst()
        .current_dir(tmp.path())
        .args(["refine", "-c", "answer.txt"])
        .assert()
        .success()
        .stdout(predicate::str::diff("a = 1\n\nb = 2"));
}

#[test]
fn stdin_is_the_default_input() {
    cst()
        .args(["refine", "--clean"])
        .write_stdin(">>> x = 1\nx = 1\nimport os\n")
        .assert()
        .success()
        .stdout(predicate::str::diff("import os\n\nx = 1\n"));
}

#[test]
fn duplicate_class_collapses_under_clean_and_fix() {
    // The canonical generated-code failure: the model restates the class
    let tmp = assert_fs::TempDir::new().expect("tempdir");
    tmp.child("answer.txt")
        .write_str(
            "```python\nimport os\n\nclass Foo:\n    def bar(self):\n        return 1\n\nclass Foo:\n    def bar(self):\n        return 2\n```\n",
        )
        .expect("write fixture");

    let assert = cst()
        .current_dir(tmp.path())
        .args(["refine", "-c", "--clean", "--fix", "answer.txt"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8");
    assert_eq!(stdout.matches("class Foo").count(), 1);
    assert!(stdout.contains("return 1"));
    assert!(!stdout.contains("return 2"));
    assert!(stdout.starts_with("import os\n"));
}

#[test]
fn refining_twice_changes_nothing() {
    let input = "x = f()\n\nimport requests\nimport os\n\ndef f():\n    return 1\n\nif __name__ == '__main__':\n    print(f())\n";

    let first = cst()
        .args(["refine", "--clean"])
        .write_stdin(input)
        .assert()
        .success();
    let once = String::from_utf8(first.get_output().stdout.clone()).expect("utf8");

    cst()
        .args(["refine", "--clean"])
        .write_stdin(once.clone())
        .assert()
        .success()
        .stdout(predicate::str::diff(once));
}

#[test]
fn project_folder_gets_named_file_and_requirements() {
    let tmp = assert_fs::TempDir::new().expect("tempdir");
    tmp.child("answer.txt")
        .write_str(
            "```python\nimport numpy as np\n\nclass BinarySearchTree:\n    def __init__(self):\n        self.root = None\n```\n",
        )
        .expect("write fixture");

    cst()
        .current_dir(tmp.path())
        .args([
            "refine",
            "-c",
            "--clean",
            "--auto-save",
            "--project-folder",
            "-p",
            "Build a binary search tree in python",
            "answer.txt",
        ])
        .assert()
        .success();

    // Filename from the first class, snake-cased; folder from the prompt
    tmp.child("binary_search_tree/binary_search_tree.py")
        .assert(predicate::path::exists());
    tmp.child("binary_search_tree/requirements.txt")
        .assert(predicate::str::contains("numpy"));
}

#[test]
fn dry_run_writes_nothing() {
    let tmp = assert_fs::TempDir::new().expect("tempdir");
    tmp.child("answer.txt")
        .write_str("```python\nclass Foo:\n    pass\n```\n")
        .expect("write fixture");

    cst()
        .current_dir(tmp.path())
        .args(["--dry-run", "refine", "-c", "--auto-save", "answer.txt"])
        .assert()
        .success();

    tmp.child("foo.py").assert(predicate::path::missing());
}

#[test]
fn prose_without_code_passes_through() {
    cst()
        .args(["refine", "-c"])
        .write_stdin("No code in this answer at all.")
        .assert()
        .success()
        .stdout(predicate::str::diff("No code in this answer at all."));
}
