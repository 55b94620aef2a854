use crate::common::command::{init_repository_dir, repository_dir, run_revwalk_command};
use crate::common::history::History;
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn log_without_commits_fails(init_repository_dir: TempDir) {
    run_revwalk_command(init_repository_dir.path(), &["log"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("unknown revision \"HEAD\""));
}

#[rstest]
#[case::missing_branch("nonexistent")]
#[case::malformed_name("bad..name^^:")]
#[case::too_many_generations("HEAD~5")]
fn log_from_invalid_revision_fails(init_repository_dir: TempDir, #[case] revision: &str) {
    let mut history = History::open(init_repository_dir.path());
    let commit = history.commit(&[], &[("f.txt", "1")], "only");
    history.update_head(commit);

    run_revwalk_command(init_repository_dir.path(), &["log", revision])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("unknown revision"));
}

#[rstest]
fn log_outside_repository_fails(repository_dir: TempDir) {
    run_revwalk_command(repository_dir.path(), &["log"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a git repository"));
}

#[rstest]
fn bad_date_is_rejected(init_repository_dir: TempDir) {
    run_revwalk_command(init_repository_dir.path(), &["log", "--since", "someday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid date"));
}
