use clap::{Parser, Subcommand};
use fareapp_admin::chat::KeyStatus;
use fareapp_admin::paths::{get_app_data_dir, get_settings_path};
use fareapp_admin::{
    AdminPanel, ChatService, ConfigRepository, Credentials, FieldRef, ImageField, ImageFile,
    ImageStatus, PanelSettings, Reconciled, SqliteStore, StrategyKind, TemplateField,
};
use log::{error, info};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fareapp-admin", version, about = "Fare App site administration")]
struct Cli {
    #[arg(long, env = "FAREAPP_ADMIN_EMAIL", default_value = "")]
    email: String,

    #[arg(long, env = "FAREAPP_ADMIN_PASSWORD", default_value = "", hide_env_values = true)]
    password: String,

    /// Override the image strategy from settings.json
    #[arg(long, value_parser = ["embed", "hosted"])]
    strategy: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the saved configuration
    Show,
    /// Print (or write) the sync bundle for another deployment
    Export {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Load a sync bundle and save it
    Import { file: PathBuf },
    /// Clear every saved value
    Reset {
        #[arg(long)]
        yes: bool,
    },
    /// Replace the chatbot system prompt with the contents of a file
    SetPrompt { file: PathBuf },
    /// Append a placeholder template, optionally naming it
    AddTemplate {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    RemoveTemplate { id: String },
    /// Set one template field (name, category, image, description, playStoreUrl, appStoreUrl)
    EditTemplate {
        id: String,
        field: String,
        value: String,
    },
    /// Attach an image file to `logo` or to a template id
    SetImage { target: String, path: PathBuf },
    /// Set the site-wide store links
    SetStoreUrls {
        #[arg(long)]
        play: Option<String>,
        #[arg(long)]
        app: Option<String>,
    },
    /// Ask the support chatbot something
    Chat { message: String },
    /// Check the chat endpoint configuration
    ChatCheck,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn open_unlocked(
    credentials: &Credentials,
    settings: &PanelSettings,
    store: Arc<SqliteStore>,
) -> Result<AdminPanel, String> {
    let mut panel = AdminPanel::from_settings(store, settings);
    for issue in panel.open() {
        println!("note: {}", issue);
    }
    if !panel.login(credentials).map_err(|e| e.to_string())? {
        return Err("Accesso negato: wrong email or password".to_string());
    }
    Ok(panel)
}

fn print_snapshot(panel: &AdminPanel) -> Result<(), String> {
    let snapshot = panel.snapshot().map_err(|e| e.to_string())?;
    println!("Prompt:\n{}\n", snapshot.prompt.trim());
    println!("Templates:");
    for t in &snapshot.templates {
        let status = match panel
            .image_status(&ImageField::Template(t.id.clone()))
            .map_err(|e| e.to_string())?
        {
            ImageStatus::Resolved => "ok",
            ImageStatus::Resolving => "resolving",
            ImageStatus::Pending { .. } => "pending",
        };
        println!("  [{}] {} ({}) image={} [{}]", t.id, t.name, t.category, t.image, status);
    }
    let branding = &snapshot.branding;
    println!(
        "\nLogo: {}",
        branding.logo.as_ref().map(|l| l.as_str()).unwrap_or("(none)")
    );
    println!("Play Store: {}", branding.play_store_url);
    println!("App Store: {}", branding.app_store_url);
    Ok(())
}

async fn run(cli: Cli) -> Result<(), String> {
    let mut settings = PanelSettings::load();
    if let Some(strategy) = cli.strategy.as_deref() {
        settings.image_strategy = match strategy {
            "embed" => StrategyKind::Embed,
            _ => StrategyKind::Hosted,
        };
    }
    let store = Arc::new(SqliteStore::open_default().map_err(|e| e.to_string())?);
    info!("[startup] Data directory: {:?}", get_app_data_dir()?);
    info!("[startup] Store: {:?}", store.path());
    info!("[startup] Settings: {:?}", get_settings_path()?);

    let credentials = Credentials::new(cli.email, cli.password);
    match cli.command {
        Command::Chat { message } => {
            let chat = ChatService::new(settings.chat.clone(), ConfigRepository::new(store));
            println!("{}", chat.reply(&[], &message).await);
            Ok(())
        }
        Command::ChatCheck => {
            open_unlocked(&credentials, &settings, store.clone())?;
            let chat = ChatService::new(settings.chat.clone(), ConfigRepository::new(store));
            match chat.key_status() {
                KeyStatus::Missing => println!("API key: missing"),
                KeyStatus::Present { length } => println!("API key: present ({} chars)", length),
            }
            let check = chat.test_connection().await;
            println!("{}", check.message);
            if check.success {
                Ok(())
            } else {
                Err(check.message)
            }
        }
        command => {
            let mut panel = open_unlocked(&credentials, &settings, store)?;
            run_admin(&mut panel, command).await
        }
    }
}

async fn run_admin(panel: &mut AdminPanel, command: Command) -> Result<(), String> {
    match command {
        Command::Show => return print_snapshot(panel),
        Command::Export { out } => {
            let text = panel.export_config().map_err(|e| e.to_string())?;
            match out {
                Some(path) => std::fs::write(&path, text)
                    .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?,
                None => println!("{}", text),
            }
            return Ok(());
        }
        Command::Reset { yes } => {
            if !yes {
                return Err("refusing to reset without --yes".to_string());
            }
            panel.reset_to_factory().map_err(|e| e.to_string())?;
            println!("All saved configuration cleared");
            return Ok(());
        }
        Command::Import { file } => {
            let text = std::fs::read_to_string(&file)
                .map_err(|e| format!("Failed to read {}: {}", file.display(), e))?;
            panel.import_config(&text).map_err(|e| e.to_string())?;
        }
        Command::SetPrompt { file } => {
            let prompt = std::fs::read_to_string(&file)
                .map_err(|e| format!("Failed to read {}: {}", file.display(), e))?;
            panel
                .edit(&FieldRef::Prompt, &prompt)
                .map_err(|e| e.to_string())?;
        }
        Command::AddTemplate { name, category } => {
            let id = panel.add_template().map_err(|e| e.to_string())?;
            let fields = [(TemplateField::Name, name), (TemplateField::Category, category)];
            for (field, value) in fields {
                if let Some(value) = value {
                    panel
                        .edit(&FieldRef::Template { id: id.clone(), field }, &value)
                        .map_err(|e| e.to_string())?;
                }
            }
            println!("Added template {}", id);
        }
        Command::RemoveTemplate { id } => {
            if !panel.remove_template(&id).map_err(|e| e.to_string())? {
                return Err(format!("No template with id {}", id));
            }
        }
        Command::EditTemplate { id, field, value } => {
            let field = TemplateField::parse(&field)
                .ok_or_else(|| format!("Unknown template field: {}", field))?;
            panel
                .edit(&FieldRef::Template { id, field }, &value)
                .map_err(|e| e.to_string())?;
        }
        Command::SetImage { target, path } => {
            let field = if target == "logo" {
                ImageField::Logo
            } else {
                ImageField::Template(target)
            };
            let file = ImageFile::read(&path).await.map_err(|e| e.to_string())?;
            match panel
                .attach_image(field.clone(), file)
                .await
                .map_err(|e| e.to_string())?
            {
                Reconciled::Applied(image) => {
                    println!("{} -> {}", field, truncate(image.as_str(), 80))
                }
                Reconciled::Failed(reason) => {
                    return Err(format!("{} not updated, nothing saved: {}", field, reason))
                }
                Reconciled::Discarded => return Err(format!("{} no longer exists", field)),
            }
        }
        Command::SetStoreUrls { play, app } => {
            if let Some(play) = play {
                panel
                    .edit(&FieldRef::PlayStoreUrl, &play)
                    .map_err(|e| e.to_string())?;
            }
            if let Some(app) = app {
                panel
                    .edit(&FieldRef::AppStoreUrl, &app)
                    .map_err(|e| e.to_string())?;
            }
        }
        Command::Chat { .. } | Command::ChatCheck => {
            return Err("chat commands do not edit the configuration".to_string())
        }
    }

    panel.save().map_err(|e| e.to_string())?;
    println!("Modifiche salvate");
    Ok(())
}

fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[tokio::main]
async fn main() {
    init_logging();
    let cli = Cli::parse();
    info!("=== Fare App Admin Starting ===");

    if let Err(e) = run(cli).await {
        error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
