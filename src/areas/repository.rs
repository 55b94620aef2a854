use crate::areas::database::Database;
use crate::areas::refs::Refs;
use crate::artifacts::log::commit_graph::CommitGraph;
use std::cell::{RefCell, RefMut};
use std::path::Path;
use std::sync::Arc;

pub const GIT_DIR: &str = ".git";

/// Handle on a repository: its object database, refs and the commit graph
/// shared by every walk started from it.
pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    database: Arc<Database>,
    refs: Refs,
    graph: Arc<CommitGraph>,
}

impl Repository {
    pub fn new(path: &str, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let path = Path::new(path);
        if !path.exists() {
            std::fs::create_dir_all(path)?;
        }
        let path = path.canonicalize()?;

        let git_path = path.join(GIT_DIR);
        let database = Arc::new(Database::new(git_path.join("objects").into_boxed_path()));
        let refs = Refs::new(git_path.into_boxed_path());
        let graph = Arc::new(CommitGraph::new(database.clone()));

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            database,
            refs,
            graph,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn git_path(&self) -> Box<Path> {
        self.path.join(GIT_DIR).into_boxed_path()
    }

    pub fn is_initialized(&self) -> bool {
        self.git_path().is_dir()
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn database(&self) -> &Arc<Database> {
        &self.database
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn graph(&self) -> &Arc<CommitGraph> {
        &self.graph
    }
}
