mod filter_commits_by_date;
mod filter_commits_by_message;
mod pickaxe_finds_commits_changing_occurrences;
mod show_commits_in_medium_format;
mod show_commits_in_oneline_format;
mod show_log_for_revision_expressions;
mod show_log_with_invalid_input;
mod sort_commits_topologically_and_reversed;
