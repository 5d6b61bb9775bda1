use super::*;

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    info!(command = command_label(&cli.command), "Running command");

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => default_config_path()?,
    };
    let config = AppConfig::load(&config_path)?;
    let ledger_path = config_path.with_file_name("consumed_codes.json");
    let store: Arc<dyn CredentialStore> = Arc::new(KeyringStore::new());
    let api = HttpWorkflowApi::new(&config.base_url(), store.clone());

    match cli.command {
        Commands::Login => handle_login(&api).await,
        Commands::Callback(args) => {
            handle_callback(args, &api, store.as_ref(), &ledger_path).await
        }
        Commands::Logout => handle_logout(&api, store).await,
        Commands::Whoami => handle_whoami(&api, store).await,
        Commands::Groups => handle_groups(&api, store).await,
        Commands::Repos(args) => handle_repos(args, &api, store).await,
        Commands::Select(args) => handle_select(args, &api, store).await,
        Commands::Workflow(args) => handle_workflow(args, &api).await,
        Commands::Status(args) => handle_status(args, &api, &config).await,
        Commands::Config(args) => handle_config(args, &config_path),
    }
}

fn command_label(command: &Commands) -> &'static str {
    match command {
        Commands::Login => "login",
        Commands::Callback(_) => "callback",
        Commands::Logout => "logout",
        Commands::Whoami => "whoami",
        Commands::Groups => "groups",
        Commands::Repos(_) => "repos",
        Commands::Select(_) => "select",
        Commands::Workflow(_) => "workflow",
        Commands::Status(_) => "status",
        Commands::Config(_) => "config",
    }
}

/// Initializes the session and evaluates the navigation guard. Prints the
/// redirect hint and returns `None` when the caller must not proceed.
async fn require_session(
    api: &dyn WorkflowApi,
    store: Arc<dyn CredentialStore>,
) -> Option<User> {
    let mut session = SessionManager::new(store);
    session.initialize(api).await;
    match guard::evaluate(session.state()) {
        GuardDecision::Admit => session.state().identity().cloned(),
        _ => {
            // initialize() always resolves, so Wait cannot occur here.
            println!("Not logged in. Run `onboard-cli login` to authenticate.");
            None
        }
    }
}

async fn handle_login(api: &dyn WorkflowApi) -> anyhow::Result<()> {
    match oauth::begin_login(api).await {
        Ok(auth_url) => {
            println!("Open this URL in your browser to authorize:");
            println!("  {auth_url}");
            println!();
            println!("After the redirect, complete the login with:");
            println!("  onboard-cli callback --query '<query string from the redirect URL>'");
            Ok(())
        }
        Err(err) => {
            println!("{}", render_api_error(&err));
            Ok(())
        }
    }
}

pub(super) async fn handle_callback(
    args: CallbackArgs,
    api: &dyn WorkflowApi,
    store: &dyn CredentialStore,
    ledger_path: &std::path::Path,
) -> anyhow::Result<()> {
    let query = match &args.query {
        Some(raw) => CallbackQuery::parse(raw),
        None => CallbackQuery {
            code: args.code.clone(),
            error: args.error.clone(),
        },
    };
    // The ledger keeps authorization codes single-use across invocations.
    let mut handoff = OauthHandoff::load(ledger_path)?;
    let route = handoff
        .complete(api, store, &query, &TracingReporter)
        .await;
    handoff.save(ledger_path)?;
    match route {
        Route::Groups => {
            println!("Login successful. List your groups with `onboard-cli groups`.");
        }
        Route::Login { error } => {
            println!(
                "Login failed: {}",
                error.unwrap_or_else(|| "unknown error".to_string())
            );
        }
        other => println!("Unexpected destination: {other}"),
    }
    Ok(())
}

async fn handle_logout(
    api: &dyn WorkflowApi,
    store: Arc<dyn CredentialStore>,
) -> anyhow::Result<()> {
    let mut session = SessionManager::new(store);
    session.logout(api, &TracingReporter).await;
    println!("Logged out.");
    Ok(())
}

async fn handle_whoami(
    api: &dyn WorkflowApi,
    store: Arc<dyn CredentialStore>,
) -> anyhow::Result<()> {
    let Some(user) = require_session(api, store).await else {
        return Ok(());
    };
    println!("{} (@{})", user.name, user.username);
    println!("{}", user.email);
    Ok(())
}

async fn handle_groups(
    api: &dyn WorkflowApi,
    store: Arc<dyn CredentialStore>,
) -> anyhow::Result<()> {
    let Some(user) = require_session(api, store).await else {
        return Ok(());
    };
    println!("Signed in as @{}", user.username);
    match api.list_groups().await {
        Ok(groups) if groups.is_empty() => {
            println!("No groups found.");
        }
        Ok(groups) => {
            for group in &groups {
                println!("{:>6}  {}  ({})", group.id, group.name, group.path);
            }
            println!();
            println!("Next: onboard-cli repos --group-id <id>");
        }
        Err(err) => println!("{}", render_api_error(&err)),
    }
    Ok(())
}

async fn handle_repos(
    args: ReposArgs,
    api: &dyn WorkflowApi,
    store: Arc<dyn CredentialStore>,
) -> anyhow::Result<()> {
    // The step-entry guard runs before any network traffic.
    let state = nav_state_for_group(args.group_id);
    let group_id = match selection::enter_repository_step(&state) {
        StepEntry::Proceed(group_id) => group_id,
        StepEntry::Redirect(_) => {
            println!("No group selected. Choose one with `onboard-cli groups` first.");
            return Ok(());
        }
    };
    if require_session(api, store).await.is_none() {
        return Ok(());
    }
    match api.list_repositories(group_id).await {
        Ok(repos) if repos.is_empty() => {
            println!("No repositories found in this group.");
        }
        Ok(repos) => {
            for repo in &repos {
                let ci = if repo.has_gitlab_ci { " [has CI]" } else { "" };
                println!(
                    "{:>6}  {}  (default: {}){ci}",
                    repo.id, repo.name, repo.default_branch
                );
            }
            println!();
            println!(
                "Next: onboard-cli select --group-id {group_id} --toggle <id> [--toggle <id> ...]"
            );
        }
        Err(err) => println!("{}", render_api_error(&err)),
    }
    Ok(())
}

pub(super) async fn handle_select(
    args: SelectArgs,
    api: &dyn WorkflowApi,
    store: Arc<dyn CredentialStore>,
) -> anyhow::Result<()> {
    let state = nav_state_for_group(args.group_id);
    let group_id = match selection::enter_repository_step(&state) {
        StepEntry::Proceed(group_id) => group_id,
        StepEntry::Redirect(_) => {
            println!("No group selected. Choose one with `onboard-cli groups` first.");
            return Ok(());
        }
    };
    if require_session(api, store).await.is_none() {
        return Ok(());
    }
    let mut context = SelectionContext::new(group_id);
    if args.all {
        match api.list_repositories(group_id).await {
            Ok(repos) => context.select_all(repos.iter().map(|repo| repo.id)),
            Err(err) => {
                println!("{}", render_api_error(&err));
                return Ok(());
            }
        }
    }
    if args.clear {
        context.clear();
    }
    for id in args.toggle {
        context.toggle(id);
    }
    println!("{}", context.to_nav().encode());
    if context.is_submittable() {
        println!();
        println!(
            "Continue with {} repositories:",
            context.len()
        );
        println!(
            "  onboard-cli workflow submit --state '{}'",
            context.to_nav().encode()
        );
    } else {
        println!();
        println!("Selection is empty; pick at least one repository to continue.");
    }
    Ok(())
}

async fn handle_workflow(args: WorkflowArgs, api: &dyn WorkflowApi) -> anyhow::Result<()> {
    match args.command {
        WorkflowCommands::Template => {
            print!("{}", WorkflowDraft::default().content());
            Ok(())
        }
        WorkflowCommands::Validate(args) => handle_validate(args, api).await,
        WorkflowCommands::Submit(args) => handle_submit(args, api).await,
    }
}

async fn handle_validate(args: ValidateArgs, api: &dyn WorkflowApi) -> anyhow::Result<()> {
    let draft = load_draft(args.file.as_deref())?;
    match workflow::validate(api, draft.content()).await {
        Ok(ValidationOutcome::Skipped) => {
            println!("Nothing to validate: workflow content is empty.");
        }
        Ok(ValidationOutcome::Checked(result)) if result.valid => {
            println!("Workflow is valid");
        }
        Ok(ValidationOutcome::Checked(result)) => {
            println!("Workflow validation failed:");
            for error in &result.errors {
                println!("  - {error}");
            }
        }
        Err(err) => println!("{}", render_api_error(&err)),
    }
    Ok(())
}

async fn handle_submit(args: SubmitArgs, api: &dyn WorkflowApi) -> anyhow::Result<()> {
    let state = match &args.state {
        Some(raw) => NavState::decode(raw),
        None => {
            let mut context = match args.group_id {
                Some(group_id) => SelectionContext::new(group_id),
                None => {
                    println!("No group selected. Choose one with `onboard-cli groups` first.");
                    return Ok(());
                }
            };
            context.select_all(args.repo_ids.iter().copied());
            context.to_nav()
        }
    };
    let context = match selection::enter_workflow_step(&state) {
        StepEntry::Proceed(context) => context,
        StepEntry::Redirect(_) => {
            println!("A group and a non-empty repository selection are required.");
            println!("Start again with `onboard-cli groups`.");
            return Ok(());
        }
    };
    let draft = load_draft(args.file.as_deref())?;
    match workflow::submit(api, &context, draft.content()).await {
        Ok(submission_id) => {
            println!("Submitted to {} repositories.", context.len());
            println!("Submission ID: {submission_id}");
            println!();
            println!("Track it with: onboard-cli status --id {submission_id} --watch");
        }
        Err(err) => println!("{}", render_api_error(&err)),
    }
    Ok(())
}

async fn handle_status(
    args: StatusArgs,
    api: &dyn WorkflowApi,
    config: &AppConfig,
) -> anyhow::Result<()> {
    let submission_id = match selection::enter_status_step(args.id.as_deref()) {
        StepEntry::Proceed(id) => id,
        StepEntry::Redirect(_) => {
            println!("No submission id. Start again with `onboard-cli groups`.");
            return Ok(());
        }
    };
    if args.watch {
        let poller = StatusPoller::new(config.poll_settings());
        let view = poller
            .run(api, &TokioDelay, &submission_id, |record| {
                println!("status: {}", record.status);
            })
            .await;
        match view {
            PollView::Finished(record) => render_record(&record),
            PollView::TimedOut(record) => {
                println!("Still processing after the configured poll limit.");
                render_record(&record);
            }
            PollView::NotFound => println!("Submission not found."),
            PollView::Unauthorized => {
                println!("Session expired. Please log in again.");
            }
            PollView::Failed(message) => println!("Error: {message}"),
            PollView::Cancelled => {}
        }
    } else {
        match api.submission_status(&submission_id).await {
            Ok(record) => render_record(&record),
            Err(err) => println!("{}", render_api_error(&err)),
        }
    }
    Ok(())
}

fn handle_config(args: ConfigArgs, config_path: &std::path::Path) -> anyhow::Result<()> {
    match args.command {
        ConfigCommands::Show => {
            let config = AppConfig::load(config_path)?;
            println!("config file:   {}", config_path.display());
            println!("api base url:  {}", config.base_url());
            let settings = config.poll_settings();
            println!("poll interval: {}s", settings.interval.as_secs());
            match settings.max_polls {
                Some(max) => println!("max polls:     {max}"),
                None => println!("max polls:     unbounded"),
            }
        }
        ConfigCommands::Set(args) => {
            let mut config = AppConfig::load(config_path)?;
            if let Some(url) = args.api_base_url {
                config.api_base_url = Some(url);
            }
            if let Some(secs) = args.poll_interval_secs {
                config.poll_interval_secs = Some(secs);
            }
            if let Some(max) = args.max_polls {
                config.max_polls = Some(max);
            }
            config.save(config_path)?;
            println!("Config saved to {}", config_path.display());
        }
    }
    Ok(())
}

fn nav_state_for_group(group_id: Option<u64>) -> NavState {
    let mut state = NavState::new();
    if let Some(group_id) = group_id {
        state.insert("group_id", group_id.to_string());
    }
    state
}

fn load_draft(file: Option<&std::path::Path>) -> anyhow::Result<WorkflowDraft> {
    match file {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("read workflow file {}", path.display()))?;
            Ok(WorkflowDraft::new(content))
        }
        None => Ok(WorkflowDraft::default()),
    }
}

fn render_api_error(err: &ApiError) -> String {
    match err {
        ApiError::Unauthorized => "Session expired. Please log in again.".to_string(),
        ApiError::NotFound => "Submission not found.".to_string(),
        ApiError::Transport(message) => format!("Error: {message}"),
    }
}

fn render_record(record: &SubmissionRecord) {
    println!("{}", record.status.title());
    println!("Submitted to {} repositories", record.repository_count);
    println!();
    println!("Submission ID: {}", record.submission_id);
    println!("Status:        {}", record.status);
    println!("Created:       {}", record.created_at);
    if let Some(completed_at) = &record.completed_at {
        println!("Completed:     {completed_at}");
    }
    if let Some(detail) = &record.error_message {
        println!("Errors:");
        println!(
            "{}",
            serde_json::to_string_pretty(detail).unwrap_or_else(|_| detail.to_string())
        );
    }
}
