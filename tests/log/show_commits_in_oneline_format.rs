use crate::common::command::{init_repository_dir, run_revwalk_command};
use crate::common::history::History;
use crate::common::stdout_lines;
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case::full_ids(false)]
#[case::abbreviated_ids(true)]
fn show_commits_in_oneline_format(
    init_repository_dir: TempDir,
    #[case] abbrev_commit: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut history = History::open(init_repository_dir.path());
    let first = history.commit(&[], &[("1.txt", "one")], "Initial commit\n\nwith a body");
    let second = history.commit(&[first], &[("1.txt", "uno")], "Translate one");
    history.update_head(second);

    let mut args = vec!["log", "--oneline"];
    if abbrev_commit {
        args.push("--abbrev-commit");
    }
    let output = run_revwalk_command(init_repository_dir.path(), &args)
        .assert()
        .success();

    let id = |oid: &revwalk::artifacts::objects::object_id::ObjectId| {
        if abbrev_commit {
            oid.to_short_oid()
        } else {
            oid.to_string()
        }
    };
    assert_eq!(
        stdout_lines(output.get_output()),
        vec![
            format!("{} Translate one", id(&second)),
            format!("{} Initial commit", id(&first)),
        ]
    );

    Ok(())
}
