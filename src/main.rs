use clap::{Parser, Subcommand};
use prose_lens::config::{self, AnalysisConfig};
use prose_lens::outline::{self, OutlineView};
use prose_lens::output;
use prose_lens::scan::{self, PostMeta};
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "prose-lens")]
#[command(about = "Readability and SEO scoring for blog posts")]
#[command(long_about = "\
Readability and SEO scoring for blog posts

Posts are HTML (.html, .htm) or Markdown (.md) files. Each one is scored for
search-engine placement of a focus keyword and for readability, with a list
of concrete improvements. Headings get stable identifiers (h-1, h-2, ...) and
are shown as an outline.

Meta fields default the way a new post in the editor does:
  Title:        first <h1>, else the file name
  Description:  excerpt of the post text
  URL slug:     slug of the title

Set RUST_LOG=debug for analysis traces on stderr.
Run 'prose-lens gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Configuration file (default: ./config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Clone)]
struct MetaArgs {
    /// Focus keyword to check placement and density for
    #[arg(long)]
    keyword: Option<String>,
    /// Meta title (default: first <h1> or file name)
    #[arg(long)]
    title: Option<String>,
    /// Meta description (default: excerpt of the post)
    #[arg(long)]
    description: Option<String>,
    /// URL slug (default: slug of the title)
    #[arg(long)]
    slug: Option<String>,
}

impl From<MetaArgs> for PostMeta {
    fn from(args: MetaArgs) -> Self {
        PostMeta {
            focus_keyword: args.keyword,
            title: args.title,
            description: args.description,
            slug: args.slug,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Score posts for SEO and readability
    Analyze {
        /// Post files or directories to scan
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        #[command(flatten)]
        meta: MetaArgs,
        /// Print reports as JSON
        #[arg(long)]
        json: bool,
    },
    /// Assign heading ids and print the outline of a post
    Outline {
        file: PathBuf,
        /// Save the post back with heading ids (Markdown posts are saved as .html)
        #[arg(long)]
        write: bool,
        /// With --write, replace an existing .html next to a Markdown post
        #[arg(long, requires = "write")]
        force: bool,
        /// Print the rendered outline markup instead of the tree
        #[arg(long)]
        html: bool,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Analyze { paths, meta, json } => {
            let config = resolve_config(cli.config.as_deref())?;
            init_thread_pool(&config.processing);

            let posts = scan::discover(&paths)?;
            let meta = PostMeta::from(meta);
            let results: Vec<_> = posts
                .iter()
                .cloned()
                .zip(scan::analyze_posts(&posts, &meta, &config))
                .collect();

            if json {
                let mut values = Vec::with_capacity(results.len());
                for (path, result) in &results {
                    values.push(match result {
                        Ok(post) => serde_json::to_value(post)?,
                        Err(e) => serde_json::json!({
                            "path": path,
                            "error": e.to_string(),
                        }),
                    });
                }
                println!("{}", serde_json::to_string_pretty(&values)?);
            } else {
                output::print_analyze_output(&results);
            }
        }
        Command::Outline {
            file,
            write,
            force,
            html,
        } => {
            let config = resolve_config(cli.config.as_deref())?;
            let post = scan::load_post(&file)?;
            let target = if write {
                Some(scan::annotated_path(&post, force)?)
            } else {
                None
            };
            let annotated = outline::annotate_html(&post.html, &config.outline.id_prefix)?;

            if html {
                let mut panel = String::new();
                let view = OutlineView::from(&config.outline);
                outline::render_outline(&mut panel, &annotated.headings, &view);
                println!("{}", panel);
            } else {
                output::print_outline_output(&file, &annotated);
            }

            if let Some(target) = target {
                std::fs::write(&target, &annotated.html)?;
                tracing::info!(
                    path = %target.display(),
                    assigned = annotated.assigned,
                    "saved annotated post"
                );
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load the config given with `--config`, else `./config.toml` when present,
/// else the stock defaults.
fn resolve_config(path: Option<&Path>) -> Result<AnalysisConfig, config::ConfigError> {
    match path {
        Some(path) => config::load_config_file(path),
        None => config::load_config(Path::new(".")),
    }
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
