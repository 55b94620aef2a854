use crate::common::command::{init_repository_dir, run_revwalk_command};
use crate::common::history::History;
use crate::common::stdout_lines;
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use revwalk::artifacts::objects::object_id::ObjectId;
use rstest::{fixture, rstest};

struct PickaxeHistory {
    dir: TempDir,
    commits: Vec<ObjectId>,
}

impl PickaxeHistory {
    fn log(&self, args: &[&str]) -> Vec<String> {
        let mut full_args = vec!["log", "--oneline"];
        full_args.extend_from_slice(args);

        let output = run_revwalk_command(self.dir.path(), &full_args)
            .assert()
            .success();
        stdout_lines(output.get_output())
    }

    fn line(&self, index: usize) -> String {
        format!("{} commit{}", self.commits[index], index + 1)
    }
}

/// commit1 creates a.txt; commit2 adds test2; commit3 adds test3;
/// commit4 only touches another file
#[fixture]
fn pickaxe_history(init_repository_dir: TempDir) -> PickaxeHistory {
    let mut history = History::open(init_repository_dir.path());
    let commit1 = history.commit(&[], &[("a.txt", "line1\n")], "commit1");
    let commit2 = history.commit(&[commit1], &[("a.txt", "line1\ntest2\n")], "commit2");
    let commit3 = history.commit(
        &[commit2],
        &[("a.txt", "line1\ntest2\ntest3\n")],
        "commit3",
    );
    let commit4 = history.commit(
        &[commit3],
        &[("a.txt", "line1\ntest2\ntest3\n"), ("docs/b.txt", "other")],
        "commit4",
    );
    history.update_head(commit4);

    PickaxeHistory {
        dir: init_repository_dir,
        commits: vec![commit1, commit2, commit3, commit4],
    }
}

#[rstest]
fn literal_pattern_matches_the_commit_introducing_it(pickaxe_history: PickaxeHistory) {
    assert_eq!(pickaxe_history.log(&["-S", "test2"]), vec![pickaxe_history.line(1)]);
}

#[rstest]
fn regex_pattern_matches_every_count_change(pickaxe_history: PickaxeHistory) {
    assert_eq!(
        pickaxe_history.log(&["--pickaxe-regex", "-S", r"test\d+"]),
        vec![pickaxe_history.line(2), pickaxe_history.line(1)]
    );
}

#[rstest]
fn regex_syntax_is_literal_without_flag(pickaxe_history: PickaxeHistory) {
    assert!(pickaxe_history.log(&["-S", r"test\d+"]).is_empty());
}

#[rstest]
fn root_commit_is_compared_with_empty_tree(pickaxe_history: PickaxeHistory) {
    assert_eq!(pickaxe_history.log(&["-S", "line1"]), vec![pickaxe_history.line(0)]);
}

#[rstest]
fn files_in_subdirectories_are_searched(pickaxe_history: PickaxeHistory) {
    assert_eq!(pickaxe_history.log(&["-S", "other"]), vec![pickaxe_history.line(3)]);
}

#[rstest]
fn pickaxe_combines_with_max_count(pickaxe_history: PickaxeHistory) {
    assert_eq!(
        pickaxe_history.log(&["--pickaxe-regex", "-S", "test", "-n", "1"]),
        vec![pickaxe_history.line(2)]
    );
}

#[rstest]
fn empty_pattern_is_rejected(pickaxe_history: PickaxeHistory) {
    run_revwalk_command(pickaxe_history.dir.path(), &["log", "-S", ""])
        .assert()
        .failure()
        .stderr(predicates::str::contains("invalid pattern"));
}

#[rstest]
fn uncompilable_regex_is_rejected(pickaxe_history: PickaxeHistory) {
    run_revwalk_command(
        pickaxe_history.dir.path(),
        &["log", "--pickaxe-regex", "-S", "test("],
    )
    .assert()
    .failure()
    .stderr(predicates::str::contains("invalid pattern"));
}
