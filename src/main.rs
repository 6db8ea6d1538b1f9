use chrono::Utc;
use clap::{Arg, ArgAction, ArgMatches, Command};
use color_eyre::{eyre::eyre, Result};
use std::sync::Arc;

use review_comment::adapters::{
    browser::ConsoleBrowser,
    config::FileConfigStore,
    memory::{InMemorySession, InMemoryThread},
};
use review_comment::application::{workflow, AppError, CommentContext, Outcome, ReviewComment};
use review_comment::domain::{CommentId, CommentRecord, User};
use review_comment::ports::{ConfigStore, RepositoryError};

fn cli() -> Command {
    Command::new("review-comment")
        .version("0.1.0")
        .about("Drive a pull request review comment through its editing lifecycle")
        .long_about("Creates, edits, commits and cancels a single inline review comment against an in-memory review session, printing the resulting comment state as JSON.")
        .subcommand_required(true)
        .arg(
            Arg::new("login")
                .long("login")
                .value_name("LOGIN")
                .help("Current user's login (can also be set via REVIEW_COMMENT_LOGIN)")
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to the configuration file")
                .global(true),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .default_value("debug")
                .help("Log level written to review-comment.log")
                .global(true),
        )
        .arg(
            Arg::new("pending")
                .long("pending")
                .action(ArgAction::SetTrue)
                .help("Pretend a review is already pending")
                .global(true),
        )
        .arg(
            Arg::new("fail")
                .long("fail")
                .value_name("MESSAGE")
                .help("Make the next post fail with MESSAGE")
                .global(true),
        )
        .subcommand(
            Command::new("post")
                .about("Create a new comment from a placeholder and commit it")
                .arg(
                    Arg::new("body")
                        .long("body")
                        .short('b')
                        .value_name("TEXT")
                        .required(true),
                )
                .arg(
                    Arg::new("start-review")
                        .long("start-review")
                        .action(ArgAction::SetTrue)
                        .help("Start a review and add the comment to it"),
                ),
        )
        .subcommand(
            Command::new("edit")
                .about("Edit an existing comment, then commit or cancel")
                .arg(
                    Arg::new("id")
                        .long("id")
                        .value_name("ID")
                        .value_parser(clap::value_parser!(u64))
                        .required(true),
                )
                .arg(
                    Arg::new("author")
                        .long("author")
                        .value_name("LOGIN")
                        .help("Author of the existing comment (defaults to the current user)"),
                )
                .arg(Arg::new("body").long("body").value_name("TEXT").default_value(""))
                .arg(
                    Arg::new("new-body")
                        .long("new-body")
                        .value_name("TEXT")
                        .required(true),
                )
                .arg(
                    Arg::new("cancel")
                        .long("cancel")
                        .action(ArgAction::SetTrue)
                        .help("Cancel the edit instead of committing it"),
                ),
        )
        .subcommand(
            Command::new("open")
                .about("Print the web URL of a comment")
                .arg(
                    Arg::new("id")
                        .long("id")
                        .value_name("ID")
                        .value_parser(clap::value_parser!(u64))
                        .required(true),
                ),
        )
        .subcommand(Command::new("config").about("Show the effective configuration"))
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let matches = cli().get_matches();

    // Initialize logging to file
    let level: tracing::Level = matches
        .get_one::<String>("log-level")
        .map(String::as_str)
        .unwrap_or("debug")
        .parse()
        .map_err(|e| eyre!("Invalid log level: {e}"))?;
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("review-comment.log")?;
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_max_level(level)
        .init();

    // Load configuration
    let config_store = match matches.get_one::<String>("config") {
        Some(path) => FileConfigStore::with_path(path),
        None => FileConfigStore::new()?,
    };
    let mut config = config_store.load_config().await?;
    if let Some(login) = matches.get_one::<String>("login") {
        config.login = Some(login.as_str().into());
    }

    if let Some(("config", _)) = matches.subcommand() {
        let json = serde_json::json!({
            "path": config_store.path(),
            "login": config.login.as_ref().map(|l| l.0.clone()),
            "host": config.host,
            "owner": config.owner,
            "repository": config.repository,
            "pull_request": config.pull_request,
        });
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    let login = config.login.clone().ok_or_else(|| {
        eprintln!("❌ No login configured!");
        eprintln!();
        eprintln!("Run: export REVIEW_COMMENT_LOGIN=your_login");
        eprintln!("Or pass --login your_login");
        AppError::LoginNotConfigured
    })?;
    let current_user = User::new(login);

    // Create collaborators
    let session = Arc::new(InMemorySession::with_pending_review(
        matches.get_flag("pending"),
    ));
    let thread = Arc::new(InMemoryThread::new(config.pull_request_ref()));
    if let Some(message) = matches.get_one::<String>("fail") {
        thread
            .fail_next(RepositoryError::Api(message.clone()))
            .await;
    }
    let context = CommentContext::new(
        current_user.clone(),
        session.clone(),
        thread.clone(),
        Arc::new(ConsoleBrowser),
    );

    let (comment, outcome) = match matches.subcommand() {
        Some(("post", post_matches)) => post(context, post_matches).await,
        Some(("edit", edit_matches)) => edit(context, edit_matches, &current_user).await?,
        Some(("open", open_matches)) => {
            let comment = existing(context, open_matches, current_user.clone(), "")?;
            let outcome = comment.open_on_github();
            (comment, outcome)
        }
        _ => {
            eprintln!("❌ Unknown command");
            std::process::exit(1);
        }
    };

    if matches.subcommand_name() != Some("open") {
        report(&comment, outcome)?;
    }
    if outcome == Outcome::Failed {
        if let Some(failure) = comment.last_error() {
            eprintln!("❌ {failure}");
        }
        std::process::exit(1);
    }

    Ok(())
}

async fn post(context: CommentContext, matches: &ArgMatches) -> (ReviewComment, Outcome) {
    let comment = ReviewComment::placeholder(context);
    let body = matches
        .get_one::<String>("body")
        .map(String::as_str)
        .unwrap_or("");
    let outcome = workflow::compose(&comment, body, matches.get_flag("start-review")).await;
    (comment, outcome)
}

async fn edit(
    context: CommentContext,
    matches: &ArgMatches,
    current_user: &User,
) -> Result<(ReviewComment, Outcome)> {
    let author = matches
        .get_one::<String>("author")
        .map(|login| User::new(login.as_str()))
        .unwrap_or_else(|| current_user.clone());
    let body = matches
        .get_one::<String>("body")
        .map(String::as_str)
        .unwrap_or("");
    let comment = existing(context, matches, author, body)?;

    let new_body = matches
        .get_one::<String>("new-body")
        .map(String::as_str)
        .unwrap_or("");
    let outcome = workflow::revise(&comment, new_body, matches.get_flag("cancel")).await;
    if outcome == Outcome::Skipped {
        eprintln!("⚠️  {} cannot edit this comment", current_user.login);
    }
    Ok((comment, outcome))
}

fn existing(
    context: CommentContext,
    matches: &ArgMatches,
    author: User,
    body: &str,
) -> Result<ReviewComment> {
    let id = matches.get_one::<u64>("id").copied().unwrap_or_default();
    let comment = ReviewComment::from_record(
        context,
        CommentRecord {
            id: CommentId(id),
            body: body.to_string(),
            author,
            updated_at: Utc::now(),
        },
    )
    .map_err(AppError::from)?;
    Ok(comment)
}

fn report(comment: &ReviewComment, outcome: Outcome) -> Result<()> {
    let json = serde_json::json!({
        "outcome": format!("{outcome:?}"),
        "comment": comment.snapshot(),
        "availability": comment.availability(),
        "last_error": comment.last_error().map(|failure| failure.to_string()),
    });
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
