use super::*;

#[derive(Parser)]
#[command(author, version, about)]
pub(super) struct Cli {
    #[arg(long, global = true, help = "Path to the config file")]
    pub(super) config: Option<PathBuf>,
    #[command(subcommand)]
    pub(super) command: Commands,
}

#[derive(clap::Subcommand)]
pub(super) enum Commands {
    #[command(about = "Print the provider authorization URL to begin login")]
    Login,
    #[command(about = "Complete the OAuth callback and store the session token")]
    Callback(CallbackArgs),
    #[command(about = "Log out and clear the stored session")]
    Logout,
    #[command(about = "Show the current identity")]
    Whoami,
    #[command(about = "List the groups you administer")]
    Groups,
    #[command(about = "List repositories under a group")]
    Repos(ReposArgs),
    #[command(about = "Build a repository selection and print its navigable state")]
    Select(SelectArgs),
    #[command(about = "Validate or submit a pipeline definition")]
    Workflow(WorkflowArgs),
    #[command(about = "Show or watch a submission's status")]
    Status(StatusArgs),
    #[command(about = "Manage config")]
    Config(ConfigArgs),
}

#[derive(Parser)]
pub(super) struct CallbackArgs {
    #[arg(long, help = "Raw query string from the redirect URL")]
    pub(super) query: Option<String>,
    #[arg(long, help = "Authorization code from the redirect URL")]
    pub(super) code: Option<String>,
    #[arg(long, help = "Error signal from the redirect URL")]
    pub(super) error: Option<String>,
}

#[derive(Parser)]
pub(super) struct ReposArgs {
    #[arg(long)]
    pub(super) group_id: Option<u64>,
}

#[derive(Parser)]
pub(super) struct SelectArgs {
    #[arg(long)]
    pub(super) group_id: Option<u64>,
    #[arg(long = "toggle", help = "Toggle a repository id in the selection")]
    pub(super) toggle: Vec<u64>,
    #[arg(long, help = "Start from the full repository set of the group")]
    pub(super) all: bool,
    #[arg(long, help = "Empty the selection before applying toggles")]
    pub(super) clear: bool,
}

#[derive(Parser)]
pub(super) struct WorkflowArgs {
    #[command(subcommand)]
    pub(super) command: WorkflowCommands,
}

#[derive(clap::Subcommand)]
pub(super) enum WorkflowCommands {
    #[command(about = "Print the example pipeline definition")]
    Template,
    #[command(about = "Validate a pipeline definition")]
    Validate(ValidateArgs),
    #[command(about = "Submit a pipeline definition to the selected repositories")]
    Submit(SubmitArgs),
}

#[derive(Parser)]
pub(super) struct ValidateArgs {
    #[arg(long, help = "Pipeline definition file; defaults to the example")]
    pub(super) file: Option<PathBuf>,
}

#[derive(Parser)]
pub(super) struct SubmitArgs {
    #[arg(long, help = "Navigable state printed by `select`")]
    pub(super) state: Option<String>,
    #[arg(long)]
    pub(super) group_id: Option<u64>,
    #[arg(long, value_delimiter = ',')]
    pub(super) repo_ids: Vec<u64>,
    #[arg(long, help = "Pipeline definition file; defaults to the example")]
    pub(super) file: Option<PathBuf>,
}

#[derive(Parser)]
pub(super) struct StatusArgs {
    #[arg(long)]
    pub(super) id: Option<String>,
    #[arg(long, help = "Poll until the submission reaches a terminal state")]
    pub(super) watch: bool,
}

#[derive(Parser)]
pub(super) struct ConfigArgs {
    #[command(subcommand)]
    pub(super) command: ConfigCommands,
}

#[derive(clap::Subcommand)]
pub(super) enum ConfigCommands {
    #[command(about = "Show the effective config")]
    Show,
    #[command(about = "Set config values")]
    Set(SetConfigArgs),
}

#[derive(Parser)]
pub(super) struct SetConfigArgs {
    #[arg(long)]
    pub(super) api_base_url: Option<String>,
    #[arg(long)]
    pub(super) poll_interval_secs: Option<u64>,
    #[arg(long)]
    pub(super) max_polls: Option<u32>,
}
