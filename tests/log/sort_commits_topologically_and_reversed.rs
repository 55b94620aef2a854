use crate::common::command::{init_repository_dir, run_revwalk_command};
use crate::common::history::{EPOCH, History};
use crate::common::stdout_lines;
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};

/// `skewed` claims to be older than its parent `base`; `merge` joins both
#[fixture]
fn skewed_history(init_repository_dir: TempDir) -> TempDir {
    let history = History::open(init_repository_dir.path());
    let base = history.commit_at(EPOCH + 400, &[], &[("f.txt", "base")], "base");
    let skewed = history.commit_at(EPOCH + 150, &[base], &[("f.txt", "skewed")], "skewed");
    let merge = history.commit_at(EPOCH + 600, &[base, skewed], &[("f.txt", "skewed")], "merge");
    history.update_head(merge);

    init_repository_dir
}

#[rstest]
#[case::commit_time(&[], &["merge", "base", "skewed"])]
#[case::topological(&["--topo-order"], &["merge", "skewed", "base"])]
#[case::reversed(&["--reverse"], &["skewed", "base", "merge"])]
#[case::topological_reversed(&["--topo-order", "--reverse"], &["base", "skewed", "merge"])]
#[case::reversed_after_paging(&["--reverse", "-n", "2"], &["base", "merge"])]
fn sort_commits(skewed_history: TempDir, #[case] args: &[&str], #[case] expected: &[&str]) {
    let mut full_args = vec!["log", "--oneline"];
    full_args.extend_from_slice(args);

    let output = run_revwalk_command(skewed_history.path(), &full_args)
        .assert()
        .success();
    let subjects = stdout_lines(output.get_output())
        .into_iter()
        .filter_map(|line| line.split_once(' ').map(|(_, subject)| subject.to_string()))
        .collect::<Vec<_>>();

    assert_eq!(subjects, expected);
}
