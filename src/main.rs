//! CLI entry point for repo-diagram

use std::fmt::Display;
use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::{ArgAction, Parser, ValueEnum};
use repo_diagram::state::DEFAULT_MAX_DEPTH;
use repo_diagram::{
    ClientConfig, DiagramFormatter, DiagramSession, DiagramSnapshot, DiagramState, EntryFilter,
    FetchError, LayoutMode, LayoutParams, NodeId, OutputConfig, RepoClient, RepoRef, TreeListing,
    TreeNode, build_tree, collect_stats, print_json, print_stats, print_stats_json,
};
use tracing_subscriber::EnvFilter;

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            std::io::stdout().is_terminal()
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "repo-diagram")]
#[command(about = "Browse a GitHub repository's file tree as a laid-out diagram")]
#[command(version)]
struct Args {
    /// Repository as owner/name or a github.com URL
    repo: String,

    /// Branch to list
    #[arg(short, long, default_value = "main")]
    branch: String,

    /// Descend only N levels below the root (values below 1 show the root only)
    #[arg(short = 'L', long, default_value_t = DEFAULT_MAX_DEPTH, allow_negative_numbers = true)]
    depth: i64,

    /// Show nodes whose name contains QUERY (case-insensitive), at any depth
    #[arg(short, long, value_name = "QUERY")]
    search: Option<String>,

    /// Expand the directory at PATH (can be used multiple times)
    #[arg(short, long, value_name = "PATH")]
    expand: Vec<String>,

    /// Expand every directory
    #[arg(short = 'a', long)]
    expand_all: bool,

    /// Layout used to place nodes
    #[arg(short, long, value_enum, default_value_t = LayoutMode::Tree)]
    layout: LayoutMode,

    /// Container width for layout
    #[arg(long, default_value_t = 1200.0)]
    width: f64,

    /// Container height for layout
    #[arg(long, default_value_t = 800.0)]
    height: f64,

    /// Output in JSON format
    #[arg(long)]
    json: bool,

    /// Show repository statistics instead of the diagram
    #[arg(long, conflicts_with = "branches")]
    stats: bool,

    /// List the repository's branches instead of the diagram
    #[arg(long, conflicts_with = "from_file")]
    branches: bool,

    /// Show sizes next to names
    #[arg(long)]
    size: bool,

    /// Drop entries matching pattern (can be used multiple times)
    #[arg(short = 'I', long, value_name = "PATTERN")]
    ignore: Vec<String>,

    /// Read a saved tree listing instead of calling the API
    #[arg(long, value_name = "FILE")]
    from_file: Option<PathBuf>,

    /// How long fetched trees stay cached (e.g. 30s, 5m)
    #[arg(long, value_name = "DURATION", default_value = "5m")]
    cache_ttl: String,

    /// Per-request timeout (e.g. 10s, 1m)
    #[arg(long, value_name = "DURATION", default_value = "30s")]
    timeout: String,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    color: ColorMode,

    /// Log more to stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Report an error and exit with status 1.
fn fail(message: impl Display) -> ! {
    eprintln!("repo-diagram: {}", message);
    process::exit(1);
}

/// Install the stderr log subscriber. `RUST_LOG` applies unless `-v` is given.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("repo_diagram=info"),
        _ => EnvFilter::new("repo_diagram=debug"),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Parse a duration string like "30s" or "5m" with humantime.
fn parse_duration_arg(flag: &str, value: &str) -> Duration {
    humantime::parse_duration(value.trim())
        .unwrap_or_else(|e| fail(format!("invalid {} duration '{}': {}", flag, value, e)))
}

/// Build a tree from a listing saved to disk.
fn read_listing(path: &Path, filter: &EntryFilter, root_label: &str) -> Result<TreeNode, FetchError> {
    let body = fs::read_to_string(path)
        .unwrap_or_else(|e| fail(format!("cannot read '{}': {}", path.display(), e)));
    let listing = TreeListing::parse(&body)?;
    Ok(build_tree(&filter.apply(listing.into_entries()), root_label))
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    let repo = RepoRef::parse(&args.repo).unwrap_or_else(|e| fail(e));
    let filter = EntryFilter::new(&args.ignore)
        .unwrap_or_else(|e| fail(format!("invalid --ignore pattern: {}", e)));

    let config = ClientConfig {
        token: std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty()),
        cache_ttl: parse_duration_arg("--cache-ttl", &args.cache_ttl),
        timeout: parse_duration_arg("--timeout", &args.timeout),
        ..ClientConfig::default()
    };
    let use_color = should_use_color(args.color);

    if args.branches {
        let mut client = RepoClient::new(config);
        let names = client
            .fetch_branches(&repo.owner, &repo.name)
            .unwrap_or_else(|e| fail(e));
        let result = if args.json {
            print_json(&names)
        } else {
            names.iter().for_each(|name| println!("{}", name));
            Ok(())
        };
        if let Err(e) = result {
            fail(format!("error writing output: {}", e));
        }
        return;
    }

    let initial = DiagramState::default()
        .with_max_depth(args.depth)
        .with_search(args.search.clone().unwrap_or_default())
        .with_layout_mode(args.layout);
    let mut session = DiagramSession::with_state(initial);

    let loaded = match &args.from_file {
        Some(path) => session.begin_load(repo.clone(), &args.branch).and_then(|ticket| {
            let result = read_listing(path, &filter, &repo.name).map(Arc::new);
            session.finish_load(ticket, result)
        }),
        None => {
            let mut client = RepoClient::new(config).with_filter(filter);
            session.load(&mut client, repo.clone(), &args.branch)
        }
    };
    if let Err(e) = loaded {
        fail(format!("failed to load {}: {}", repo, e));
    }

    let Some(tree) = session.tree().cloned() else {
        fail(format!("failed to load {}", repo));
    };

    if args.expand_all {
        session.expand_all();
    }
    for path in &args.expand {
        let path = path.trim_matches('/');
        if !tree.find(path).is_some_and(TreeNode::is_dir) {
            eprintln!("repo-diagram: warning: no directory '{}' in {}", path, repo);
            continue;
        }
        let id = if path.is_empty() {
            NodeId::Root
        } else {
            NodeId::path(path)
        };
        session.apply(|state| state.with_expanded(id));
    }

    let result = if args.stats {
        let stats = collect_stats(&tree);
        if args.json {
            print_stats_json(&stats)
        } else {
            print_stats(&stats, use_color)
        }
    } else {
        let params = LayoutParams {
            container_width: args.width,
            container_height: args.height,
            ..LayoutParams::default()
        };
        let Some(render) = session.render(&params) else {
            fail(format!("failed to load {}", repo));
        };
        if args.json {
            print_json(&DiagramSnapshot::new(
                repo.to_string(),
                args.branch.as_str(),
                session.state(),
                &render,
            ))
        } else {
            let formatter = DiagramFormatter::new(OutputConfig {
                use_color,
                show_size: args.size,
                ..OutputConfig::default()
            });
            formatter.print(&format!("{}@{}", repo, args.branch), session.state(), &render)
        }
    };

    if let Err(e) = result {
        fail(format!("error writing output: {}", e));
    }
}
