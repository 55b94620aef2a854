use crate::common::command::{init_repository_dir, run_revwalk_command};
use crate::common::history::{EPOCH, History, TICK};
use crate::common::stdout_lines;
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use revwalk::artifacts::objects::object_id::ObjectId;
use rstest::{fixture, rstest};

/// Four linear commits, one tick apart starting one tick after `EPOCH`
#[fixture]
fn dated_history(init_repository_dir: TempDir) -> TempDir {
    let mut history = History::open(init_repository_dir.path());
    let mut parents: Vec<ObjectId> = Vec::new();
    for index in 1..=4 {
        let content = index.to_string();
        let commit = history.commit(&parents, &[("f.txt", content.as_str())], &format!("c{index}"));
        parents = vec![commit];
    }
    history.update_head(parents[0]);

    init_repository_dir
}

fn subjects(dir: &TempDir, args: &[String]) -> Vec<String> {
    let mut full_args = vec!["log".to_string(), "--oneline".to_string()];
    full_args.extend_from_slice(args);

    let output = run_revwalk_command(
        dir.path(),
        &full_args.iter().map(String::as_str).collect::<Vec<_>>(),
    )
    .assert()
    .success();
    stdout_lines(output.get_output())
        .into_iter()
        .filter_map(|line| line.split_once(' ').map(|(_, subject)| subject.to_string()))
        .collect()
}

fn at(ticks: i64) -> String {
    (EPOCH + ticks * TICK).to_string()
}

#[rstest]
fn since_is_inclusive(dated_history: TempDir) {
    assert_eq!(
        subjects(&dated_history, &["--since".to_string(), at(2)]),
        vec!["c4", "c3", "c2"]
    );
}

#[rstest]
fn until_is_inclusive(dated_history: TempDir) {
    assert_eq!(
        subjects(&dated_history, &["--until".to_string(), at(3)]),
        vec!["c3", "c2", "c1"]
    );
}

#[rstest]
fn since_and_until_form_a_window(dated_history: TempDir) {
    assert_eq!(
        subjects(
            &dated_history,
            &["--after".to_string(), at(2), "--before".to_string(), at(3)]
        ),
        vec!["c3", "c2"]
    );
}

#[rstest]
#[case::calendar_date("2022-01-01")]
#[case::rfc2822("Sat, 1 Jan 2022 00:00:00 +0000")]
#[case::with_offset("2022-01-01 01:00:00 +0100")]
fn readable_dates_are_accepted(dated_history: TempDir, #[case] since: &str) {
    assert_eq!(
        subjects(&dated_history, &["--since".to_string(), since.to_string()]),
        vec!["c4", "c3", "c2", "c1"]
    );
}

#[rstest]
fn future_since_shows_nothing(dated_history: TempDir) {
    assert!(subjects(&dated_history, &["--since".to_string(), at(10)]).is_empty());
}
