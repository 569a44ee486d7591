//! MoodNote command-line front end.
//!
//! # Responsibility
//! - Drive the core note services against a local SQLite file.
//! - Drive the REST client against a remote backend.
//! - Print results as aligned tables or pretty JSON.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use moodnote_client::{
    ApiClient, ClientConfig, FileTokenStore, LabelCreate, NoteCreate, NoteUpdate, UserCreate,
    UserLogin,
};
use moodnote_core::{
    classify_mood, default_log_level, extract_keywords, init_logging, open_db, summarize,
    ChecklistItem, LabelService, Mood, Note, NoteColor, NoteDraft, NoteKind, NotePatch,
    NoteQuery, NoteService, SortKey, SqliteLabelRepository, SqliteNoteRepository,
};
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "moodnote")]
#[command(about = "Notes with keyword mood detection", version)]
struct Cli {
    /// Local notes database
    #[arg(long, env = "MOODNOTE_DB", default_value = "moodnote.db")]
    db: PathBuf,

    /// Backend base URL for `remote` commands
    #[arg(long, env = "MOODNOTE_API_URL", default_value = "http://localhost:8000")]
    server: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "MOODNOTE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, env = "MOODNOTE_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// File holding the backend access token
    #[arg(long, env = "MOODNOTE_TOKEN_FILE", default_value = ".moodnote-token.json")]
    token_file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Local note operations
    Note {
        #[command(subcommand)]
        action: NoteAction,
    },

    /// Local label catalog
    Label {
        #[command(subcommand)]
        action: LabelAction,
    },

    /// Mood tracker counters for the local collection
    Stats,

    /// Run mood detection on text
    Classify {
        text: String,
    },

    /// Bullet summary and key themes of text
    Summarize {
        text: String,
    },

    /// Remote backend operations
    Remote {
        #[command(subcommand)]
        action: RemoteAction,
    },
}

#[derive(Subcommand)]
enum NoteAction {
    /// Create a note
    Add {
        #[arg(short, long, default_value = "")]
        title: String,

        #[arg(short, long, default_value = "")]
        content: String,

        /// Checklist item; repeat for more (makes a checklist note)
        #[arg(long = "item")]
        items: Vec<String>,

        /// Label; repeat for more
        #[arg(short, long = "label")]
        labels: Vec<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        color: Option<NoteColor>,

        /// Manual mood; implies --no-detect
        #[arg(long)]
        mood: Option<Mood>,

        /// Skip automatic mood detection
        #[arg(long)]
        no_detect: bool,

        #[arg(long)]
        pin: bool,
    },

    /// Edit title and/or content
    Edit {
        id: Uuid,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        content: Option<String>,
    },

    /// Filter and sort notes
    List(ListArgs),

    /// Show one note as JSON
    Show {
        id: Uuid,
    },

    /// Toggle pinned
    Pin {
        id: Uuid,
    },

    /// Toggle archived
    Archive {
        id: Uuid,
    },

    /// Toggle favorite
    Favorite {
        id: Uuid,
    },

    /// Set the card color
    Color {
        id: Uuid,
        color: NoteColor,
    },

    /// Set a manual mood, or `none` to clear it
    Mood {
        id: Uuid,
        mood: String,
    },

    /// Replace all labels
    Labels {
        id: Uuid,
        labels: Vec<String>,
    },

    /// Delete permanently
    Delete {
        id: Uuid,
    },
}

#[derive(Args)]
struct ListArgs {
    /// Case-insensitive text search over title, content, checklist and labels
    #[arg(short, long, default_value = "")]
    search: String,

    #[arg(long)]
    mood: Option<Mood>,

    #[arg(long)]
    category: Option<String>,

    #[arg(long)]
    label: Option<String>,

    #[arg(long)]
    color: Option<NoteColor>,

    #[arg(long)]
    reminder: bool,

    #[arg(long)]
    image: bool,

    #[arg(long)]
    audio: bool,

    #[arg(long)]
    favorites: bool,

    /// Show the archive instead of active notes
    #[arg(long)]
    archived: bool,

    /// created, updated, title or mood
    #[arg(long, default_value = "updated")]
    sort: SortKey,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

impl From<ListArgs> for NoteQuery {
    fn from(args: ListArgs) -> Self {
        Self {
            search: args.search,
            mood: args.mood,
            category: args.category,
            label: args.label,
            color: args.color,
            has_reminder: args.reminder,
            has_image: args.image,
            has_audio: args.audio,
            favorites_only: args.favorites,
            archived: args.archived,
            sort: args.sort,
        }
    }
}

#[derive(Subcommand)]
enum LabelAction {
    /// Create a label
    Add {
        name: String,

        /// Defaults to blue
        #[arg(long)]
        color: Option<NoteColor>,
    },

    /// List labels
    List,
}

#[derive(Subcommand)]
enum RemoteAction {
    /// Check backend health
    Health,

    /// Create an account and store its token
    Register {
        #[arg(long)]
        email: String,

        #[arg(long)]
        username: String,

        #[arg(long)]
        password: String,
    },

    /// Log in and store the token
    Login {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// Forget the stored token
    Logout,

    /// List remote notes
    Notes {
        #[arg(long, default_value = "0")]
        skip: u32,

        #[arg(long, default_value = "100")]
        limit: u32,
    },

    /// Upload a local note to the backend
    Push {
        id: Uuid,
    },

    /// Delete a remote note
    Delete {
        id: i64,
    },

    /// Fetch a link preview
    Preview {
        url: String,
    },

    /// List remote labels
    Labels,

    /// Create a remote label
    Label {
        name: String,

        #[arg(long)]
        color: Option<NoteColor>,
    },

    /// Upload an image or audio file
    Upload {
        path: PathBuf,

        /// MIME type, e.g. image/png or audio/mpeg
        #[arg(long)]
        content_type: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).map_err(|err| anyhow!("{err}"))?;
    }

    match cli.command {
        Commands::Note { action } => handle_note(&cli.db, action),
        Commands::Label { action } => handle_label(&cli.db, action),
        Commands::Stats => handle_stats(&cli.db),
        Commands::Classify { text } => handle_classify(&text),
        Commands::Summarize { text } => {
            println!("{}", summarize(&text).trim_end());
            let keywords = extract_keywords(&text);
            if !keywords.is_empty() {
                println!("keywords: {}", keywords.join(", "));
            }
            Ok(())
        }
        Commands::Remote { action } => {
            let client = ApiClient::new(
                ClientConfig::with_base_url(&cli.server),
                FileTokenStore::new(&cli.token_file),
            )?;
            handle_remote(&client, &cli.db, action).await
        }
    }
}

fn handle_note(db: &Path, action: NoteAction) -> Result<()> {
    let mut conn = open_db(db).with_context(|| format!("failed to open {}", db.display()))?;
    let repo = SqliteNoteRepository::try_new(&mut conn)?;
    let mut service = NoteService::new(repo);

    match action {
        NoteAction::Add {
            title,
            content,
            items,
            labels,
            category,
            color,
            mood,
            no_detect,
            pin,
        } => {
            let mut draft = NoteDraft::new(title, content);
            if !items.is_empty() {
                draft.kind = NoteKind::Checklist;
                draft.checklist = items.into_iter().map(ChecklistItem::new).collect();
            }
            draft.labels = labels;
            draft.category = category;
            draft.color = color.unwrap_or_default();
            draft.mood_detection = !no_detect && mood.is_none();
            draft.mood = mood;
            draft.is_pinned = pin;

            let note = service.create_note(draft)?;
            println!("Created note: {}", note.id);
            print_mood(&note);
        }

        NoteAction::Edit { id, title, content } => {
            let note = service.update_note(
                id,
                NotePatch {
                    title,
                    content,
                    ..NotePatch::default()
                },
            )?;
            println!("Updated note: {}", note.id);
            print_mood(&note);
        }

        NoteAction::List(args) => {
            let json = args.json;
            let notes = service.query_notes(&NoteQuery::from(args))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&notes)?);
            } else {
                print_note_table(&notes);
            }
        }

        NoteAction::Show { id } => {
            let note = service
                .get_note(id)?
                .ok_or_else(|| anyhow!("note not found: {id}"))?;
            println!("{}", serde_json::to_string_pretty(&note)?);
        }

        NoteAction::Pin { id } => {
            let note = service.toggle_pin(id)?;
            println!("pinned={}", note.is_pinned);
        }

        NoteAction::Archive { id } => {
            let note = service.toggle_archive(id)?;
            println!("archived={}", note.is_archived);
        }

        NoteAction::Favorite { id } => {
            let note = service.toggle_favorite(id)?;
            println!("favorite={}", note.is_favorite);
        }

        NoteAction::Color { id, color } => {
            let note = service.set_color(id, color)?;
            println!("color={}", note.color);
        }

        NoteAction::Mood { id, mood } => {
            let mood = if mood.trim().eq_ignore_ascii_case("none") {
                None
            } else {
                Some(mood.parse::<Mood>()?)
            };
            let note = service.set_mood(id, mood)?;
            print_mood(&note);
        }

        NoteAction::Labels { id, labels } => {
            let note = service.set_labels(id, labels)?;
            println!("labels={}", note.labels.join(","));
        }

        NoteAction::Delete { id } => {
            service.delete_note(id)?;
            println!("Deleted note: {id}");
        }
    }

    Ok(())
}

fn handle_label(db: &Path, action: LabelAction) -> Result<()> {
    let mut conn = open_db(db).with_context(|| format!("failed to open {}", db.display()))?;
    let repo = SqliteLabelRepository::try_new(&mut conn)?;
    let mut service = LabelService::new(repo);

    match action {
        LabelAction::Add { name, color } => {
            let label = service.create_label(&name, color)?;
            println!("Created label: {} ({})", label.name, label.color);
        }

        LabelAction::List => {
            for label in service.list_labels()? {
                println!("{:<24} {}", label.name, label.color.as_str());
            }
        }
    }

    Ok(())
}

fn handle_stats(db: &Path) -> Result<()> {
    let mut conn = open_db(db).with_context(|| format!("failed to open {}", db.display()))?;
    let service = NoteService::new(SqliteNoteRepository::try_new(&mut conn)?);
    let stats = service.stats()?;

    println!("{}", serde_json::to_string_pretty(&stats)?);
    if let Some(mood) = stats.dominant_mood() {
        println!("dominant mood: {} {}", mood.emoji(), mood.label());
    }
    Ok(())
}

fn handle_classify(text: &str) -> Result<()> {
    let analysis = classify_mood(text);
    println!(
        "{} {} ({:.0}%)",
        analysis.mood.emoji(),
        analysis.mood.label(),
        analysis.confidence * 100.0
    );
    println!("{}", serde_json::to_string_pretty(&analysis)?);
    Ok(())
}

async fn handle_remote(client: &ApiClient, db: &Path, action: RemoteAction) -> Result<()> {
    match action {
        RemoteAction::Health => {
            let health = client.health().await?;
            println!(
                "status={} database={}",
                health.status,
                health.database.as_deref().unwrap_or("-")
            );
        }

        RemoteAction::Register {
            email,
            username,
            password,
        } => {
            let user = client
                .register(&UserCreate {
                    email,
                    username,
                    password,
                })
                .await?;
            println!("Registered as {}", user.username);
        }

        RemoteAction::Login { email, password } => {
            let user = client.login(&UserLogin { email, password }).await?;
            println!("Logged in as {}", user.username);
        }

        RemoteAction::Logout => {
            client.logout()?;
            println!("Logged out");
        }

        RemoteAction::Notes { skip, limit } => {
            let notes = client.list_notes(Some(skip), Some(limit)).await?;
            println!("{:<8} {:<10} {:<10} {}", "ID", "MOOD", "COLOR", "TITLE");
            println!("{}", "-".repeat(60));
            for note in notes {
                println!(
                    "{:<8} {:<10} {:<10} {}",
                    note.id,
                    note.detected_mood.as_deref().unwrap_or("-"),
                    note.color,
                    note.title
                );
            }
        }

        RemoteAction::Push { id } => {
            let mut conn =
                open_db(db).with_context(|| format!("failed to open {}", db.display()))?;
            let service = NoteService::new(SqliteNoteRepository::try_new(&mut conn)?);
            let note = service
                .get_note(id)?
                .ok_or_else(|| anyhow!("note not found: {id}"))?;

            let created = client.create_note(&NoteCreate::from(&note)).await?;
            if let Some(mood) = note.mood {
                let update = NoteUpdate {
                    detected_mood: Some(mood.as_str().to_string()),
                    mood_confidence: note.mood_confidence,
                    ..NoteUpdate::default()
                };
                client.update_note(created.id, &update).await?;
            }
            info!(
                "event=note_push module=cli status=ok note_id={} remote_id={}",
                note.id, created.id
            );
            println!("Pushed note {} as remote #{}", note.id, created.id);
        }

        RemoteAction::Delete { id } => {
            let response = client.delete_note(id).await?;
            println!("{}", response.message);
        }

        RemoteAction::Preview { url } => {
            let preview = client.link_preview(&url).await?;
            println!("{}", preview.title.as_deref().unwrap_or(&preview.url));
            if let Some(description) = preview.description.as_deref() {
                println!("{description}");
            }
        }

        RemoteAction::Labels => {
            for label in client.list_labels().await? {
                println!("{:<24} {}", label.name, label.color);
            }
        }

        RemoteAction::Label { name, color } => {
            let label = client.create_label(&LabelCreate::new(name, color)).await?;
            println!("Created label: {} ({})", label.name, label.color);
        }

        RemoteAction::Upload { path, content_type } => {
            let bytes = std::fs::read(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let file_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or("upload")
                .to_string();
            let uploaded = if content_type.starts_with("audio/") {
                client.upload_audio(&file_name, &content_type, bytes).await?
            } else if content_type.starts_with("image/") {
                client.upload_image(&file_name, &content_type, bytes).await?
            } else {
                bail!("content type must be image/* or audio/*, got `{content_type}`");
            };
            println!("{}", uploaded.file_url);
        }
    }

    Ok(())
}

fn print_note_table(notes: &[Note]) {
    if notes.is_empty() {
        println!("No notes");
        return;
    }
    println!(
        "{:<36} {:<3} {:<10} {:<8} {}",
        "ID", "PIN", "MOOD", "COLOR", "TITLE"
    );
    println!("{}", "-".repeat(80));
    for note in notes {
        println!(
            "{:<36} {:<3} {:<10} {:<8} {}",
            note.id,
            if note.is_pinned { "*" } else { "" },
            note.mood.map_or("-", Mood::as_str),
            note.color.as_str(),
            note.title
        );
    }
}

fn print_mood(note: &Note) {
    match (note.mood, note.mood_confidence) {
        (Some(mood), Some(confidence)) => println!(
            "mood: {} {} ({:.0}%)",
            mood.emoji(),
            mood.label(),
            confidence * 100.0
        ),
        _ => println!("mood: -"),
    }
}
