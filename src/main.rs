use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use postboard::auth::LoginForm;
use postboard::post::{PostDetailController, PostImage};
use postboard::posts::PostListController;
use postboard::{ClientConfig, HttpBackend, PageContext, Route, Shell};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

/// Prints what a browser would pop up or navigate to.
struct TerminalShell;

impl Shell for TerminalShell {
    fn alert(&self, message: &str) {
        println!("[alert] {message}");
    }
    fn toast(&self, message: &str) {
        println!("[toast] {message}");
    }
    fn navigate(&self, route: Route) {
        println!("[navigate] {route}");
    }
}

#[derive(Debug)]
enum Command {
    Login { email: String, password: String },
    Posts { pages: u32 },
    Post { id: i64 },
    Like { id: i64 },
    Comment { id: i64, text: String },
}

fn help_text() -> String {
    "usage: postboard <command>\n\
     \n\
     commands:\n\
     \x20 login <email> <password>   check credentials\n\
     \x20 posts [pages]              list posts, newest first (default 1 page)\n\
     \x20 post <id>                  show a post with its comments\n\
     \x20 like <id>                  toggle your like on a post\n\
     \x20 comment <id> <text>        add a comment\n\
     \n\
     POSTBOARD_EMAIL / POSTBOARD_PASSWORD log in before running the command."
        .to_string()
}

fn parse_id(raw: Option<&String>) -> anyhow::Result<i64> {
    let raw = raw.ok_or_else(|| anyhow!("missing post id\n\n{}", help_text()))?;
    raw.parse().with_context(|| format!("invalid post id {raw:?}"))
}

fn parse_command(args: &[String]) -> anyhow::Result<Command> {
    let Some(cmd) = args.first() else { bail!(help_text()) };
    match cmd.as_str() {
        "login" => match (args.get(1), args.get(2)) {
            (Some(e), Some(p)) => Ok(Command::Login { email: e.clone(), password: p.clone() }),
            _ => bail!("login needs <email> <password>"),
        },
        "posts" => {
            let pages = match args.get(1) {
                Some(p) => p.parse().with_context(|| format!("invalid page count {p:?}"))?,
                None => 1,
            };
            Ok(Command::Posts { pages })
        }
        "post" => Ok(Command::Post { id: parse_id(args.get(1))? }),
        "like" => Ok(Command::Like { id: parse_id(args.get(1))? }),
        "comment" => {
            let id = parse_id(args.get(1))?;
            let text = args[2.min(args.len())..].join(" ");
            Ok(Command::Comment { id, text })
        }
        "help" | "--help" | "-h" => bail!(help_text()),
        other => bail!("unknown command {other:?}\n\n{}", help_text()),
    }
}

async fn login(ctx: &PageContext, email: &str, password: &str) -> anyhow::Result<()> {
    let mut form = LoginForm::new(ctx.clone());
    form.set_email(email);
    form.set_password(password);
    if let Some(e) = form.email_error() {
        bail!("{e}");
    }
    if !form.submit().await {
        bail!("login failed");
    }
    Ok(())
}

fn show_post(page: &PostDetailController) {
    let Some(view) = page.view() else { return };
    println!("{}\n{} · {}", view.title, view.author, view.created_at);
    let liked = if page.like_state().liked { "liked" } else { "not liked" };
    println!(
        "likes {} ({liked}) · views {} · comments {}",
        view.likes,
        view.views,
        page.comment_count_label()
    );
    if let PostImage::Shown(img) = page.image() {
        println!("[image {} bytes, {}]", img.bytes.len(), img.mime);
    }
    println!("\n{}\n", view.content);
    for c in page.comment_items() {
        let mark = if c.editable { " (yours)" } else { "" };
        println!("  • {} {}{}\n    {}", c.author, c.created_at, mark, c.content);
    }
}

async fn run(args: Vec<String>) -> anyhow::Result<()> {
    let command = parse_command(&args)?;
    let config = ClientConfig::from_env();
    let backend = HttpBackend::new(&config).context("building HTTP client")?;
    let ctx = PageContext::new(Arc::new(backend), Arc::new(TerminalShell), config);

    if let (Ok(email), Ok(password)) = (std::env::var("POSTBOARD_EMAIL"), std::env::var("POSTBOARD_PASSWORD")) {
        login(&ctx, &email, &password).await?;
    }

    match command {
        Command::Login { email, password } => {
            login(&ctx, &email, &password).await?;
            info!("credentials accepted");
        }
        Command::Posts { pages } => {
            let list = PostListController::new(ctx.clone());
            for _ in 0..pages.max(1) {
                list.fetch_next_page().await;
                if list.is_last_page() {
                    break;
                }
            }
            for card in list.cards() {
                println!(
                    "#{:<5} {:<30} {}  likes {} comments {} views {}  {}",
                    card.id, card.title, card.author_name, card.likes, card.comments, card.views, card.created_at
                );
            }
            if list.is_last_page() {
                println!("-- end of list --");
            }
        }
        Command::Post { id } => {
            let mut page = PostDetailController::new(ctx.clone(), id);
            page.init().await;
            show_post(&page);
        }
        Command::Like { id } => {
            let mut page = PostDetailController::new(ctx.clone(), id);
            page.init().await;
            page.toggle_like().await;
            let like = page.like_state();
            println!("{} · {} likes", if like.liked { "liked" } else { "unliked" }, like.count);
        }
        Command::Comment { id, text } => {
            let mut page = PostDetailController::new(ctx.clone(), id);
            page.init().await;
            page.set_comment_input(text);
            if !page.submit_comment().await {
                if let Some(h) = page.comment_helper() {
                    bail!("{h}");
                }
                bail!("comment was not posted");
            }
            show_post(&page);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    // Load .env automatically only in debug builds.
    if cfg!(debug_assertions) {
        let _ = dotenv::dotenv();
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    if let Err(err) = run(std::env::args().skip(1).collect()).await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
