use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use serde_json::{Value, json};
use solution_client::api::admin::DEFAULT_INVITE_EXPIRE_HOURS;
use solution_client::api::files::FileListQuery;
use solution_client::api::invite::RegisterWithInviteRequest;
use solution_client::editor::{self, EnvAiSettings};
use solution_client::guard::{self, Navigation};
use solution_client::jobs::{FileListSource, FileParsePoller, JobSource, PollPhase, TemplateCreateParams, TemplateCreateTask};
use solution_client::net::{Notifier, TracingNotifier};
use solution_client::session::Profile;
use solution_client::state::{ModelConfigStore, PromptConfigStore, RouterStore, SystemStore, UserStore};
use solution_client::storage::{FileStore, KeyValueStore};
use solution_client::{ApiClient, ApiError, ClientConfig};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Editor(#[from] editor::EditorConfigError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("not logged in; run `solution-cli login` first")]
    NotLoggedIn,
    #[error("no user id in the current profile; pass --busi-id")]
    MissingBusiId,
    #[error("file {file_id} failed to parse: {reason}")]
    JobFailed { file_id: i64, reason: String },
    #[error("template generation returned no data")]
    EmptyTemplate,
}

#[derive(Parser, Debug)]
#[command(name = "solution-cli", about = "Solution assistant API CLI")]
struct Cli {
    #[arg(long, env = "SOLUTION_API_HOST")]
    api_host: Option<String>,

    #[arg(long, env = "SOLUTION_STATE_DIR")]
    state_dir: Option<PathBuf>,

    #[arg(long, short, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        username: String,
        #[arg(long, env = "SOLUTION_PASSWORD")]
        password: String,
    },
    Register {
        username: String,
        #[arg(long, env = "SOLUTION_PASSWORD")]
        password: String,
        #[arg(long)]
        invite_code: String,
    },
    Logout,
    Whoami,
    Files(FilesCommand),
    Templates(TemplatesCommand),
    Models(ModelsCommand),
    Prompts(PromptsCommand),
    Public(PublicCommand),
    Editor(EditorCommand),
    Admin(AdminCommand),
    Route(RouteCommand),
}

#[derive(Args, Debug)]
struct FilesCommand {
    /// Owner of the files; defaults to the logged-in user.
    #[arg(long)]
    busi_id: Option<String>,

    #[command(subcommand)]
    command: FilesSubcommand,
}

#[derive(Subcommand, Debug)]
enum FilesSubcommand {
    List,
    Upload {
        path: PathBuf,
        /// Keep polling until the backend finishes parsing the file.
        #[arg(long, default_value_t = false)]
        watch: bool,
    },
    Watch {
        file_id: i64,
    },
    Delete {
        file_id: i64,
    },
    Rename {
        file_id: i64,
        file_name: String,
    },
    Reanalyze {
        file_id: i64,
        #[arg(long, default_value_t = false)]
        watch: bool,
    },
}

#[derive(Args, Debug)]
struct TemplatesCommand {
    #[command(subcommand)]
    command: TemplatesSubcommand,
}

#[derive(Subcommand, Debug)]
enum TemplatesSubcommand {
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        requirement: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        model_id: Option<i64>,
        #[arg(long)]
        example_output: Option<String>,
    },
}

#[derive(Args, Debug)]
struct ModelsCommand {
    #[command(subcommand)]
    command: ModelsSubcommand,
}

#[derive(Subcommand, Debug)]
enum ModelsSubcommand {
    List,
    Default,
    SetDefault { model_id: i64 },
    Use { model_id: i64 },
    Delete { model_id: i64 },
}

#[derive(Args, Debug)]
struct PromptsCommand {
    #[command(subcommand)]
    command: PromptsSubcommand,
}

#[derive(Subcommand, Debug)]
enum PromptsSubcommand {
    List,
    Show { prompt_type: String },
}

#[derive(Args, Debug)]
struct PublicCommand {
    #[command(subcommand)]
    command: PublicSubcommand,
}

#[derive(Subcommand, Debug)]
enum PublicSubcommand {
    Configs,
}

#[derive(Args, Debug)]
struct EditorCommand {
    #[command(subcommand)]
    command: EditorSubcommand,
}

#[derive(Subcommand, Debug)]
enum EditorSubcommand {
    /// Resolved AI settings: server config, then env, else disabled.
    Config,
    /// Server config only, failing instead of falling back.
    Server,
}

#[derive(Args, Debug)]
struct AdminCommand {
    #[command(subcommand)]
    command: AdminSubcommand,
}

#[derive(Subcommand, Debug)]
enum AdminSubcommand {
    Invite {
        #[arg(long, default_value_t = DEFAULT_INVITE_EXPIRE_HOURS)]
        expire_hours: u32,
    },
    Users {
        #[arg(long, default_value = "")]
        kw: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        page_size: u32,
    },
    ResetPassword {
        user_id: String,
        #[arg(long)]
        password: String,
    },
    SetStatus {
        user_id: String,
        /// `Y` to enable, `N` to disable.
        status: String,
    },
}

#[derive(Args, Debug)]
struct RouteCommand {
    #[command(subcommand)]
    command: RouteSubcommand,
}

#[derive(Subcommand, Debug)]
enum RouteSubcommand {
    /// Run the navigation guard against the current session.
    Check { path: String },
    Menu,
    Select { name: String },
}

struct CliContext {
    client: Arc<ApiClient>,
    store: Arc<dyn KeyValueStore>,
    poll_interval: Duration,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();
    let level = if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };
    tracing_subscriber::fmt().with_writer(io::stderr).with_max_level(level).init();

    if let Err(e) = dotenv {
        if !e.not_found() {
            tracing::warn!(error = %e, "failed to load .env");
        }
    }

    let mut config = ClientConfig::from_env();
    if let Some(host) = cli.api_host {
        config.api_host = host;
    }
    if let Some(dir) = cli.state_dir {
        config.state_dir = dir;
    }

    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&config.state_dir)?);
    let notifier: Arc<dyn Notifier> = Arc::new(TracingNotifier);
    let client = Arc::new(ApiClient::from_config(&config, notifier, Arc::clone(&store))?);
    let ctx = CliContext { client, store, poll_interval: config.poll_interval };

    match cli.command {
        Command::Login { username, password } => run_login(&ctx, &username, &password).await,
        Command::Register { username, password, invite_code } => {
            run_register(&ctx, &username, &password, &invite_code).await
        }
        Command::Logout => run_logout(&ctx),
        Command::Whoami => run_whoami(&ctx).await,
        Command::Files(files) => run_files(&ctx, files).await,
        Command::Templates(templates) => run_templates(&ctx, templates).await,
        Command::Models(models) => run_models(&ctx, models).await,
        Command::Prompts(prompts) => run_prompts(&ctx, prompts).await,
        Command::Public(public) => run_public(&ctx, public).await,
        Command::Editor(editor) => run_editor(&ctx, editor).await,
        Command::Admin(admin) => run_admin(&ctx, admin).await,
        Command::Route(route) => run_route(&ctx, route),
    }
}

// =============================================================================
// session
// =============================================================================

async fn run_login(ctx: &CliContext, username: &str, password: &str) -> Result<(), CliError> {
    let user = UserStore::new(&ctx.client);
    let profile = user.login(&ctx.client, username, password).await?;
    print_profile(&profile)
}

async fn run_register(ctx: &CliContext, username: &str, password: &str, invite_code: &str) -> Result<(), CliError> {
    let user = UserStore::new(&ctx.client);
    let request = RegisterWithInviteRequest {
        username: username.to_owned(),
        password: password.to_owned(),
        invite_code: invite_code.to_owned(),
    };
    let profile = user.register_with_invite(&ctx.client, &request).await?;
    print_profile(&profile)
}

fn run_logout(ctx: &CliContext) -> Result<(), CliError> {
    UserStore::new(&ctx.client).logout()?;
    println!("logged out");
    Ok(())
}

async fn run_whoami(ctx: &CliContext) -> Result<(), CliError> {
    let user = require_session(ctx).await?;
    print_profile(&user.profile())
}

/// Verify the stored token with the backend before doing anything on the
/// user's behalf.
async fn require_session(ctx: &CliContext) -> Result<UserStore, CliError> {
    let user = UserStore::new(&ctx.client);
    if !user.verify_token(&ctx.client).await? {
        return Err(CliError::NotLoggedIn);
    }
    Ok(user)
}

fn print_profile(profile: &Profile) -> Result<(), CliError> {
    print_json(&serde_json::to_value(profile)?)
}

// =============================================================================
// files
// =============================================================================

async fn run_files(ctx: &CliContext, files: FilesCommand) -> Result<(), CliError> {
    let user = require_session(ctx).await?;
    let profile = user.profile();
    let busi_id = files
        .busi_id
        .or_else(|| profile.user_id.clone())
        .filter(|id| !id.is_empty())
        .ok_or(CliError::MissingBusiId)?;

    match files.command {
        FilesSubcommand::List => {
            let list = ctx.client.files().list(&FileListQuery::all(busi_id.as_str())).await?;
            print_json(&json!({
                "fileCount": list.file_count,
                "fileList": serde_json::to_value(&list.file_list)?,
            }))
        }
        FilesSubcommand::Upload { path, watch } => {
            let uploaded = ctx
                .client
                .files()
                .upload_path(&path, &busi_id, profile.display_name())
                .await?;
            print_json(&json!({
                "file_id": uploaded.file_id,
                "file_name": uploaded.file_name,
                "create_date": uploaded.create_date,
            }))?;
            if watch { watch_file(ctx, &busi_id, uploaded.file_id).await } else { Ok(()) }
        }
        FilesSubcommand::Watch { file_id } => watch_file(ctx, &busi_id, file_id).await,
        FilesSubcommand::Delete { file_id } => {
            ctx.client.files().delete(file_id).await?;
            println!("deleted {file_id}");
            Ok(())
        }
        FilesSubcommand::Rename { file_id, file_name } => {
            ctx.client.files().rename(file_id, &file_name).await?;
            println!("renamed {file_id}");
            Ok(())
        }
        FilesSubcommand::Reanalyze { file_id, watch } => {
            ctx.client.files().re_analysis(file_id).await?;
            if watch {
                watch_file(ctx, &busi_id, file_id).await
            } else {
                println!("reanalysis started for {file_id}");
                Ok(())
            }
        }
    }
}

async fn watch_file(ctx: &CliContext, busi_id: &str, file_id: i64) -> Result<(), CliError> {
    let source: Arc<dyn JobSource> = Arc::new(FileListSource::new(Arc::clone(&ctx.client), busi_id));
    let mut poller = FileParsePoller::new(source, ctx.poll_interval);
    let mut updates = poller.subscribe();
    poller.start(file_id);

    let progress = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let snapshot = updates.borrow_and_update().clone();
            if let Some(error) = &snapshot.last_error {
                tracing::warn!(file_id, error = %error, "file status query failed");
            } else {
                tracing::info!(file_id, status = snapshot.status.code(), "file status");
            }
            if snapshot.phase.is_terminal() {
                break;
            }
        }
    });

    let snapshot = poller.finished().await;
    progress.abort();

    match snapshot.phase {
        PollPhase::Done { result, .. } => print_json(&result.unwrap_or(Value::Null)),
        PollPhase::Failed { reason, .. } => Err(CliError::JobFailed { file_id, reason }),
        PollPhase::Idle | PollPhase::Polling(_) => Ok(()),
    }
}

// =============================================================================
// templates
// =============================================================================

async fn run_templates(ctx: &CliContext, templates: TemplatesCommand) -> Result<(), CliError> {
    let user = require_session(ctx).await?;
    match templates.command {
        TemplatesSubcommand::Create { title, requirement, name, model_id, example_output } => {
            let model_id = match model_id {
                Some(id) => Some(id),
                None => {
                    let mut models = ModelConfigStore::load(Arc::clone(&ctx.store))?;
                    models.fetch_default(&ctx.client, user.profile().user_id.as_deref()).await?;
                    models.current_or_first()
                }
            };
            let params = TemplateCreateParams {
                title_name: title,
                writing_requirement: requirement,
                user_id: user.profile().user_id.unwrap_or_default(),
                template_name: name,
                model_id,
                example_output,
            };
            let task = TemplateCreateTask::new();
            let data = task.start(&ctx.client, &params).await?.ok_or(CliError::EmptyTemplate)?;
            print_json(&data)
        }
    }
}

// =============================================================================
// configuration stores
// =============================================================================

async fn run_models(ctx: &CliContext, models: ModelsCommand) -> Result<(), CliError> {
    let user = require_session(ctx).await?;
    let mut store = ModelConfigStore::load(Arc::clone(&ctx.store))?;
    match models.command {
        ModelsSubcommand::List => {
            store.fetch_list(&ctx.client).await?;
            print_json(&json!({
                "total": store.pagination.total,
                "current_model_id": store.current_model_id,
                "list": serde_json::to_value(&store.model_list)?,
            }))
        }
        ModelsSubcommand::Default => {
            store.fetch_default(&ctx.client, user.profile().user_id.as_deref()).await?;
            print_json(&serde_json::to_value(&store.default_model)?)
        }
        ModelsSubcommand::SetDefault { model_id } => {
            store.set_default(&ctx.client, model_id).await?;
            println!("default model set to {model_id}");
            Ok(())
        }
        ModelsSubcommand::Use { model_id } => {
            store.set_current(Some(model_id))?;
            println!("using model {model_id}");
            Ok(())
        }
        ModelsSubcommand::Delete { model_id } => {
            store.delete_model(&ctx.client, model_id).await?;
            if store.current_model_id == Some(model_id) {
                store.set_current(None)?;
            }
            println!("deleted model {model_id}");
            Ok(())
        }
    }
}

async fn run_prompts(ctx: &CliContext, prompts: PromptsCommand) -> Result<(), CliError> {
    require_session(ctx).await?;
    let mut store = PromptConfigStore::new();
    match prompts.command {
        PromptsSubcommand::List => {
            store.fetch_list(&ctx.client).await?;
            print_json(&serde_json::to_value(&store.prompt_list)?)
        }
        PromptsSubcommand::Show { prompt_type } => {
            let prompt = store.by_type(&ctx.client, &prompt_type).await?;
            print_json(&serde_json::to_value(prompt)?)
        }
    }
}

async fn run_public(ctx: &CliContext, public: PublicCommand) -> Result<(), CliError> {
    match public.command {
        PublicSubcommand::Configs => {
            let mut system = SystemStore::new();
            system.fetch_public_configs(&ctx.client).await;
            print_json(&Value::Object(system.configs))
        }
    }
}

async fn run_editor(ctx: &CliContext, editor_cmd: EditorCommand) -> Result<(), CliError> {
    require_session(ctx).await?;
    match editor_cmd.command {
        EditorSubcommand::Config => {
            let resolved = editor::resolve(&ctx.client, &EnvAiSettings::from_env()).await;
            print_json(&serde_json::to_value(resolved)?)
        }
        EditorSubcommand::Server => {
            let config = editor::fetch_server_config(&ctx.client).await?;
            print_json(&serde_json::to_value(config)?)
        }
    }
}

async fn run_admin(ctx: &CliContext, admin: AdminCommand) -> Result<(), CliError> {
    require_session(ctx).await?;
    let api = ctx.client.admin();
    match admin.command {
        AdminSubcommand::Invite { expire_hours } => {
            let invite = api.create_invite(Some(expire_hours)).await?;
            print_json(&json!({ "invite_code": invite.invite_code, "expire_time": invite.expire_time }))
        }
        AdminSubcommand::Users { kw, page, page_size } => {
            let members = api.list_users(&kw, page, page_size).await?;
            print_json(&json!({ "total": members.total, "list": serde_json::to_value(&members.list)? }))
        }
        AdminSubcommand::ResetPassword { user_id, password } => {
            api.reset_password(&user_id, &password).await?;
            println!("password reset for {user_id}");
            Ok(())
        }
        AdminSubcommand::SetStatus { user_id, status } => {
            api.set_status(&user_id, &status).await?;
            println!("status of {user_id} set to {status}");
            Ok(())
        }
    }
}

// =============================================================================
// routing
// =============================================================================

fn run_route(ctx: &CliContext, route: RouteCommand) -> Result<(), CliError> {
    match route.command {
        RouteSubcommand::Check { path } => {
            match guard::before_each(&path, &ctx.client.session().snapshot()) {
                Navigation::Proceed => println!("proceed {path}"),
                Navigation::Redirect(to) => println!("redirect {to}"),
            }
            Ok(())
        }
        RouteSubcommand::Menu => {
            let router = RouterStore::load(Arc::clone(&ctx.store))?;
            let current = router.current_route();
            for item in router.menu_list() {
                let marker = if item.name == current.name { "*" } else { " " };
                println!("{marker} {:<16} {:<32} {}", item.name, item.route, item.text);
            }
            Ok(())
        }
        RouteSubcommand::Select { name } => {
            let mut router = RouterStore::load(Arc::clone(&ctx.store))?;
            router.set_current_route(&name)?;
            println!("current route {}", router.current_route().route);
            Ok(())
        }
    }
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
