use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use anyhow::Context;
use std::fs;
use std::io::Write;

const DEFAULT_BRANCH: &str = "master";

impl Repository {
    pub fn init(&self) -> anyhow::Result<()> {
        let objects_path = self
            .database()
            .objects_path()
            .context("repository has no on-disk object database")?;
        fs::create_dir_all(objects_path).context("Failed to create .git/objects directory")?;

        fs::create_dir_all(self.refs().heads_path())
            .context("Failed to create .git/refs/heads directory")?;

        // HEAD names an unborn branch until the first commit lands on it
        if !self.refs().head_path().exists() {
            let default_branch = BranchName::try_parse(DEFAULT_BRANCH.to_string())?;
            self.refs()
                .set_head(&default_branch)
                .context("Failed to create initial HEAD reference")?;
        }

        tracing::info!(path = %self.path().display(), "initialized repository");
        writeln!(
            self.writer(),
            "Initialized empty Git repository in {}",
            self.path().display()
        )?;

        Ok(())
    }
}
