use anyhow::Result;
use clap::{Parser, Subcommand};
use is_terminal::IsTerminal;
use revwalk::areas::repository::Repository;
use revwalk::artifacts::log::pickaxe::PickaxeOptions;
use revwalk::commands::porcelain::log::{LogOptions, parse_date};
use tracing_subscriber::EnvFilter;

const LOG_ENV_VAR: &str = "REVWALK_LOG";

#[derive(Parser)]
#[command(
    name = "revwalk",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "Walk and filter git commit history",
    long_about = "Walks the commit graph of a git repository newest first, \
    with filters for content changes (pickaxe), messages, dates, merges and paging.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[arg(
        short = 'C',
        global = true,
        value_name = "PATH",
        help = "Run as if started in <PATH>"
    )]
    directory: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command initializes a new repository in the current directory or at the specified path."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<String>,
    },
    #[command(
        name = "log",
        about = "Show commit logs",
        long_about = "This command walks history from the given revisions (HEAD by default), \
        newest commit first, printing every commit accepted by the requested filters."
    )]
    Log {
        #[arg(
            index = 1,
            num_args = 0..,
            help = "Revisions to start from; ^<rev> hides <rev>, <a>..<b> shows b not reachable from a"
        )]
        revisions: Vec<String>,
        #[arg(
            short = 'S',
            value_name = "PATTERN",
            help = "Only commits that change the number of occurrences of PATTERN"
        )]
        pickaxe: Option<String>,
        #[arg(long = "pickaxe-regex", help = "Treat the -S pattern as a regular expression")]
        pickaxe_regex: bool,
        #[arg(long, value_name = "REGEX", help = "Only commits whose message matches REGEX")]
        grep: Option<String>,
        #[arg(
            short = 'i',
            long = "regexp-ignore-case",
            help = "Match --grep case-insensitively"
        )]
        regexp_ignore_case: bool,
        #[arg(long = "no-merges", help = "Hide commits with more than one parent")]
        no_merges: bool,
        #[arg(
            long,
            visible_alias = "after",
            value_name = "DATE",
            value_parser = parse_date,
            help = "Only commits at or after DATE"
        )]
        since: Option<i64>,
        #[arg(
            long,
            visible_alias = "before",
            value_name = "DATE",
            value_parser = parse_date,
            help = "Only commits at or before DATE"
        )]
        until: Option<i64>,
        #[arg(short = 'n', long = "max-count", help = "Show at most N commits")]
        max_count: Option<usize>,
        #[arg(long, help = "Skip the first N commits")]
        skip: Option<usize>,
        #[arg(long = "topo-order", help = "Never show a commit before its children")]
        topo_order: bool,
        #[arg(long, help = "Output commits in reverse order")]
        reverse: bool,
        #[arg(long, help = "Show each commit on a single line")]
        oneline: bool,
        #[arg(long = "abbrev-commit", help = "Show abbreviated commit ids")]
        abbrev_commit: bool,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_repository(path: Option<&str>) -> Result<Repository> {
    match path {
        Some(path) => Repository::new(path, Box::new(std::io::stdout())),
        None => {
            let pwd = std::env::current_dir()?;
            Repository::new(&pwd.to_string_lossy(), Box::new(std::io::stdout()))
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    colored::control::set_override(std::io::stdout().is_terminal());

    let cli = Cli::parse();
    let directory = cli.directory.as_deref();

    match cli.command {
        Commands::Init { path } => {
            let repository = open_repository(path.as_deref().or(directory))?;

            repository.init()?
        }
        Commands::Log {
            revisions,
            pickaxe,
            pickaxe_regex,
            grep,
            regexp_ignore_case,
            no_merges,
            since,
            until,
            max_count,
            skip,
            topo_order,
            reverse,
            oneline,
            abbrev_commit,
        } => {
            let repository = open_repository(directory)?;
            if !repository.is_initialized() {
                anyhow::bail!("not a git repository: {}", repository.path().display());
            }

            let options = LogOptions {
                revisions,
                pickaxe: pickaxe.map(|pattern| PickaxeOptions::new(pattern).with_regex(pickaxe_regex)),
                grep,
                regexp_ignore_case,
                no_merges,
                since,
                until,
                max_count,
                skip,
                topo_order,
                reverse,
                oneline,
                abbrev_commit,
            };

            repository.log(&options)?
        }
    }

    Ok(())
}
