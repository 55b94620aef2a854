use crate::common::command::{init_repository_dir, run_revwalk_command};
use crate::common::history::History;
use crate::common::stdout_lines;
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};

#[fixture]
fn messages(init_repository_dir: TempDir) -> TempDir {
    let mut history = History::open(init_repository_dir.path());
    let first = history.commit(&[], &[("f.txt", "1")], "Add parser");
    let second = history.commit(&[first], &[("f.txt", "2")], "fix: off by one\n\nCloses #12");
    let third = history.commit(&[second], &[("f.txt", "3")], "Refactor lexer\n\nAlso FIX typo");
    history.update_head(third);

    init_repository_dir
}

#[rstest]
#[case::case_sensitive(&["--grep", "fix"], &["fix: off by one"])]
#[case::ignore_case(&["-i", "--grep", "fix"], &["Refactor lexer", "fix: off by one"])]
#[case::body_is_searched(&["--grep", "Closes #\\d+"], &["fix: off by one"])]
#[case::anchors_match_lines(&["--grep", "^Also"], &["Refactor lexer"])]
#[case::no_match(&["--grep", "release"], &[])]
fn filter_commits_by_message(messages: TempDir, #[case] args: &[&str], #[case] expected: &[&str]) {
    let mut full_args = vec!["log", "--oneline"];
    full_args.extend_from_slice(args);

    let output = run_revwalk_command(messages.path(), &full_args)
        .assert()
        .success();
    let subjects = stdout_lines(output.get_output())
        .into_iter()
        .filter_map(|line| line.split_once(' ').map(|(_, subject)| subject.to_string()))
        .collect::<Vec<_>>();

    assert_eq!(subjects, expected);
}

#[rstest]
fn empty_grep_is_rejected(messages: TempDir) {
    run_revwalk_command(messages.path(), &["log", "--grep", ""])
        .assert()
        .failure()
        .stderr(predicates::str::contains("invalid pattern"));
}
