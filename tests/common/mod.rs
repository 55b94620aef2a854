#![allow(dead_code)]

pub mod command;
pub mod history;

/// Lines of a command's stdout, trailing whitespace trimmed.
pub fn stdout_lines(output: &std::process::Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|line| line.trim_end().to_string())
        .collect()
}
