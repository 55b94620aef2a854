use crate::common::command::{init_repository_dir, run_revwalk_command};
use crate::common::history::History;
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn show_commits_in_medium_format(init_repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let mut history = History::open(init_repository_dir.path());
    let first = history.commit(&[], &[("1.txt", "one")], "Initial commit");
    let second = history.commit(&[first], &[("1.txt", "one"), ("2.txt", "two")], "Second commit");
    history.update_head(second);

    let output = run_revwalk_command(init_repository_dir.path(), &["log"])
        .assert()
        .success();

    let expected = format!(
        "commit {second}
Author: A U Thor <author@example.com>
Date:   Sat Jan 1 00:03:20 2022 +0000

    Second commit

commit {first}
Author: A U Thor <author@example.com>
Date:   Sat Jan 1 00:01:40 2022 +0000

    Initial commit
"
    );
    assert_eq!(String::from_utf8(output.get_output().stdout.clone())?, expected);

    Ok(())
}

#[rstest]
fn multi_line_messages_are_indented(init_repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let mut history = History::open(init_repository_dir.path());
    let commit = history.commit(
        &[],
        &[("1.txt", "one")],
        "Add the first file\n\nIt says one.",
    );
    history.update_head(commit);

    let output = run_revwalk_command(init_repository_dir.path(), &["log", "--abbrev-commit"])
        .assert()
        .success();
    let lines = crate::common::stdout_lines(output.get_output());

    assert_eq!(lines[0], format!("commit {}", commit.to_short_oid()));
    assert_eq!(
        &lines[4..],
        &["    Add the first file", "", "    It says one."]
    );

    Ok(())
}
