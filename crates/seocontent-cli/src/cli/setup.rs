use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format for releases: "v0.4.2"
/// Format for dev builds: "v0.4.2\ndev: abc1234 2024-01-15 14:30"
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" {
            format!("v{}", VERSION)
        } else {
            format!("v{}\ndev: {} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(
    name = "seocontent",
    bin_name = "seocontent",
    version = get_version(),
    disable_help_subcommand = true
)]
#[command(about = "Manage SEO titles, keywords and descriptions for records", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Use the global table instead of the project's
    #[arg(short, long, global = true, help_heading = "Options")]
    pub global: bool,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,

    /// Project data directory to use instead of searching from the working directory
    #[arg(long, global = true, value_name = "PATH", help_heading = "Options")]
    pub data: Option<PathBuf>,
}

/// Template inputs shared by the commands that expand templates.
#[derive(Args, Debug, Default, Clone)]
pub struct TemplateArgs {
    /// Application parameter for %%appParam_KEY%% (repeatable)
    #[arg(long = "param", short = 'p', value_name = "KEY=VALUE")]
    pub params: Vec<String>,

    /// Separator for %%sep%%
    #[arg(long, value_name = "SEP")]
    pub separator: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List stored entries
    #[command(alias = "ls", display_order = 1)]
    List {
        /// Only entries of this owner type
        #[arg(long = "type", short = 't', value_name = "TYPE")]
        owner_type: Option<String>,
    },

    /// Show the entry that applies to a record (its own or the type default)
    #[command(display_order = 2)]
    Show {
        owner_type: String,
        /// Omit to show the type-wide default
        owner_id: Option<String>,
    },

    /// Create or edit an entry; an empty value clears a field
    #[command(display_order = 3)]
    Set {
        owner_type: String,
        #[arg(required_unless_present = "global_default")]
        owner_id: Option<String>,

        /// Edit the type-wide default instead of a record's entry
        #[arg(long, conflicts_with = "owner_id")]
        global_default: bool,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        keywords: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Delete an entry
    #[command(alias = "rm", display_order = 4)]
    Delete {
        owner_type: String,
        #[arg(required_unless_present = "global_default")]
        owner_id: Option<String>,

        /// Delete the type-wide default
        #[arg(long, conflicts_with = "owner_id")]
        global_default: bool,
    },

    /// Expand a template against an optional JSON record
    #[command(display_order = 10)]
    Expand {
        template: String,

        /// JSON object file supplying %%model_*%% attributes
        #[arg(long, value_name = "FILE")]
        record: Option<PathBuf>,

        #[command(flatten)]
        template_args: TemplateArgs,
    },

    /// Resolve a record's SEO fields and print the tags they publish
    #[command(display_order = 11)]
    Preview {
        owner_type: String,
        /// JSON object file
        record: PathBuf,

        #[command(flatten)]
        template_args: TemplateArgs,
    },

    /// Check that a record's title is not used by another entry
    #[command(name = "check-title", display_order = 12)]
    CheckTitle {
        owner_type: String,
        /// JSON object file
        record: PathBuf,

        #[command(flatten)]
        template_args: TemplateArgs,
    },

    /// Apply pending table migrations
    #[command(display_order = 20)]
    Migrate,

    /// Describe the table layout and migration state
    #[command(display_order = 21)]
    Schema,

    /// Show the resolved configuration
    #[command(display_order = 22)]
    Config,
}
