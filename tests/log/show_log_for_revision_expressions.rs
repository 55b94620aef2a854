use crate::common::command::{init_repository_dir, run_revwalk_command};
use crate::common::history::History;
use crate::common::stdout_lines;
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};

/// master: c1 - c2 - c3, topic: c1 - t1 - t2 (HEAD on master)
struct Branches {
    dir: TempDir,
}

impl Branches {
    fn log(&self, args: &[&str]) -> Vec<String> {
        let mut full_args = vec!["log", "--oneline"];
        full_args.extend_from_slice(args);

        let output = run_revwalk_command(self.dir.path(), &full_args)
            .assert()
            .success();
        stdout_lines(output.get_output())
            .into_iter()
            .map(|line| line.split_once(' ').map(|(_, subject)| subject.to_string()).unwrap_or(line))
            .collect()
    }
}

#[fixture]
fn branches(init_repository_dir: TempDir) -> Branches {
    let mut history = History::open(init_repository_dir.path());
    let c1 = history.commit(&[], &[("f.txt", "1")], "c1");
    let c2 = history.commit(&[c1], &[("f.txt", "2")], "c2");
    let t1 = history.commit(&[c1], &[("f.txt", "1"), ("t.txt", "1")], "t1");
    let c3 = history.commit(&[c2], &[("f.txt", "3")], "c3");
    let t2 = history.commit(&[t1], &[("f.txt", "1"), ("t.txt", "2")], "t2");
    history.update_head(c3);
    history.update_branch("topic", t2);

    Branches {
        dir: init_repository_dir,
    }
}

#[rstest]
#[case::head_by_default(&[], &["c3", "c2", "c1"])]
#[case::alias(&["@"], &["c3", "c2", "c1"])]
#[case::branch(&["topic"], &["t2", "t1", "c1"])]
#[case::qualified_ref(&["refs/heads/topic"], &["t2", "t1", "c1"])]
#[case::several_starts(&["master", "topic"], &["t2", "c3", "t1", "c2", "c1"])]
#[case::range(&["master..topic"], &["t2", "t1"])]
#[case::range_to_head(&["topic.."], &["c3", "c2"])]
#[case::range_from_head(&["..topic"], &["t2", "t1"])]
#[case::exclusion(&["topic", "^master"], &["t2", "t1"])]
#[case::only_exclusions_default_to_head(&["^topic"], &["c3", "c2"])]
#[case::parent(&["master^"], &["c2", "c1"])]
#[case::ancestor(&["topic~2"], &["c1"])]
#[case::excluding_ancestor(&["master", "^HEAD~1"], &["c3"])]
fn log_from_revisions(branches: Branches, #[case] args: &[&str], #[case] expected: &[&str]) {
    assert_eq!(branches.log(args), expected);
}

#[rstest]
fn abbreviated_and_full_ids_resolve(init_repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let mut history = History::open(init_repository_dir.path());
    let first = history.commit(&[], &[("f.txt", "1")], "first");
    let second = history.commit(&[first], &[("f.txt", "2")], "second");
    history.update_head(second);

    for revision in [first.to_string(), first.to_short_oid()] {
        let output = run_revwalk_command(init_repository_dir.path(), &["log", "--oneline", &revision])
            .assert()
            .success();

        assert_eq!(
            stdout_lines(output.get_output()),
            vec![format!("{first} first")]
        );
    }

    Ok(())
}
