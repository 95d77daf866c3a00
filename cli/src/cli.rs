use std::path::PathBuf;
use std::sync::LazyLock;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use console_business::{EntityId, EntityKind, MfaType, TableKind};

static LONG_VERSION: LazyLock<String> = LazyLock::new(console_utils::version_info::long_version);

#[derive(Parser)]
#[command(name = "iam-console")]
#[command(about = "Edit identity server entities and their row tables", long_about = None)]
#[command(version = console_utils::version_info::build_version(), long_version = LONG_VERSION.as_str())]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Use this config file instead of the default location
    #[arg(long, global = true, env = "CONSOLE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Show timing/latency information
    #[arg(long, global = true)]
    pub timing: bool,

    /// Enable verbose debug output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

/// Which table of which entity a row command works on.
#[derive(Args, Debug, Clone)]
pub struct TableTarget {
    /// Entity kind: organization, application, syncer, user or ldap
    pub kind: EntityKind,

    /// Entity id as owner/name
    pub id: EntityId,

    /// Table name, e.g. account-items or signupItems
    pub table: TableKind,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List entities of a kind
    List {
        kind: EntityKind,

        /// Owner to list under (defaults to the configured organization)
        #[arg(long, short = 'o')]
        owner: Option<String>,

        /// Pick an entity and one of its tables to show
        #[arg(long, short = 'i')]
        interactive: bool,
    },
    /// Show the rows of one table
    Show {
        #[command(flatten)]
        target: TableTarget,
    },
    /// Append a new row (or prepend with --top)
    AddRow {
        #[command(flatten)]
        target: TableTarget,

        /// Insert at the top instead of the bottom
        #[arg(long)]
        top: bool,

        /// Add a user-defined row (sign-in items only)
        #[arg(long)]
        custom: bool,

        /// Initial field values as key=value
        #[arg(long = "set", value_parser = parse_key_value)]
        set: Vec<(String, String)>,
    },
    /// Delete a row by index
    DeleteRow {
        #[command(flatten)]
        target: TableTarget,

        index: usize,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Move a row one place up or down
    MoveRow {
        #[command(flatten)]
        target: TableTarget,

        index: usize,

        #[arg(value_enum)]
        direction: Direction,
    },
    /// Set one field of a row
    SetField {
        #[command(flatten)]
        target: TableTarget,

        index: usize,

        /// Field name as shown by `show`
        key: String,

        value: String,
    },
    /// List values not yet used in a table's name column
    Options {
        #[command(flatten)]
        target: TableTarget,
    },
    /// Set up multi-factor authentication for a user
    MfaSetup {
        /// User id as owner/name
        user: EntityId,

        /// Method: app, sms, email, radius or push
        #[arg(long, short = 'm', default_value = "app")]
        method: MfaType,

        /// Skip the password check (for a session that has just signed in)
        #[arg(long)]
        skip_password: bool,
    },
    /// Make an enabled MFA method the user's preferred one
    MfaPreferred {
        /// User id as owner/name
        user: EntityId,

        method: MfaType,
    },
    /// Remove all MFA methods from a user
    MfaDisable {
        /// User id as owner/name
        user: EntityId,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Show, edit and sync LDAP servers
    Ldap {
        #[command(subcommand)]
        action: LdapAction,
    },
    /// Show or change saved settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum LdapAction {
    /// Print an LDAP server's connection and sync settings
    Show {
        /// Server id as owner/id
        id: EntityId,
    },
    /// Change settings such as host, port, baseDn, filter or autoSync
    Set {
        /// Server id as owner/id
        id: EntityId,

        /// Values as key=value
        #[arg(long = "set", value_parser = parse_key_value, required = true)]
        set: Vec<(String, String)>,
    },
    /// Import directory users that are not in the organization yet
    Sync {
        /// Server id as owner/id
        id: EntityId,

        /// Import every pending user without prompting
        #[arg(long)]
        all: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Save the server URL
    SetServer { url: String },
    /// Save an access token (prompts when omitted)
    SetToken { token: Option<String> },
    /// Forget the saved access token
    ClearToken,
    /// Print the effective settings
    Show,
}

fn parse_key_value(input: &str) -> Result<(String, String), String> {
    input
        .split_once('=')
        .filter(|(key, _)| !key.trim().is_empty())
        .map(|(key, value)| (key.trim().to_owned(), value.to_owned()))
        .ok_or_else(|| format!("expected key=value, got {input:?}"))
}
