use crate::export::{ExportFormat, ExportTable};
use clap::{Parser, Subcommand, ValueEnum};

/// Command-line interface definition for clockblocks
/// Personal time tracking with time boxes, backed by SQLite
#[derive(Parser)]
#[command(
    name = "clockblocks",
    version = env!("CARGO_PKG_VERSION"),
    about = "A time-box tracker: activate boxes, review sessions and re-assign past time ranges",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum GroupBy {
    Session,
    Date,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(long = "editor", requires = "edit_config", help = "Editor to use instead of $EDITOR")]
        editor: Option<String>,
    },

    /// Manage time boxes
    Category {
        #[command(subcommand)]
        action: CategoryAction,
    },

    /// Start tracking a time box (switches if another one is running)
    Start {
        /// Time box name or id
        category: String,

        #[arg(long, value_name = "RFC3339", help = "Switch instant (default: now)")]
        at: Option<String>,
    },

    /// Stop the active session
    Stop {
        #[arg(long, value_name = "RFC3339", help = "Stop instant (default: now)")]
        at: Option<String>,
    },

    /// Show the running time box and the live session totals
    Status {
        #[arg(long, value_name = "RFC3339", help = "Reference instant (default: now)")]
        at: Option<String>,
    },

    /// List sessions with per-time-box totals
    List {
        #[arg(long, value_name = "REF", help = "Show the intervals of one session (number or id)")]
        session: Option<String>,

        #[arg(long, value_enum, default_value = "session", help = "Group totals by session or by date")]
        by: GroupBy,

        #[arg(long = "utc-offset", value_name = "MINUTES", allow_hyphen_values = true)]
        utc_offset: Option<i32>,

        #[arg(long, value_name = "RFC3339", help = "Reference instant (default: now)")]
        at: Option<String>,
    },

    /// Re-assign a time range of a session to a time box
    Edit {
        /// Session number (as shown by `list`) or id
        session: String,

        #[arg(long, value_name = "HH:MM")]
        from: String,

        #[arg(long, value_name = "HH:MM")]
        to: String,

        #[arg(long, value_name = "REF", help = "Time box name or id")]
        category: Option<String>,

        #[arg(
            long = "utc-offset",
            value_name = "MINUTES",
            allow_hyphen_values = true,
            help = "Offset of the typed times, minutes east of UTC (default: config or system)"
        )]
        utc_offset: Option<i32>,

        #[arg(long, value_name = "RFC3339", help = "Reference instant (default: now)")]
        at: Option<String>,
    },

    /// Export summaries or detail tables
    Export {
        #[arg(long, value_enum, default_value = "summary-by-session")]
        table: ExportTable,

        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE", help = "Absolute path of the output file")]
        file: String,

        #[arg(long = "utc-offset", value_name = "MINUTES", allow_hyphen_values = true)]
        utc_offset: Option<i32>,

        #[arg(long, help = "Overwrite an existing file without asking")]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum CategoryAction {
    /// List time boxes
    List {
        #[arg(long, help = "Include deleted time boxes")]
        all: bool,
    },

    /// Create a time box
    Add {
        name: String,

        #[arg(long, value_name = "#RRGGBB")]
        colour: Option<String>,
    },

    Rename {
        reference: String,
        name: String,
    },

    /// Change the colour of a time box
    Colour {
        reference: String,
        #[arg(value_name = "#RRGGBB")]
        colour: String,
    },

    /// Hide a time box from the start list
    Hide { reference: String },

    Show { reference: String },

    /// Soft-delete a time box (recorded intervals keep its name)
    Delete {
        reference: String,

        #[arg(long, short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },
}
