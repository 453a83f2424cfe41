//! `bookshelf` command-line client.
//!
//! # Responsibility
//! - Issue one catalog operation per invocation.
//! - Render loading, error and success states; no business logic.

use bookshelf_cli::{CatalogClient, ClientResult, View};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "bookshelf", version, about = "Book catalog client")]
struct Cli {
    /// Server address as host:port.
    #[arg(long, env = "BOOKSHELF_SERVER", default_value = "127.0.0.1:4000")]
    server: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List every book.
    List,
    /// Show one book.
    Get { id: String },
    /// Create a book.
    Create {
        #[arg(long, default_value = "New Book")]
        title: String,
        #[arg(long, default_value = "New Author")]
        author: String,
    },
    /// Update a book; empty values keep the stored field.
    ///
    /// Both fields fall back to their defaults when omitted, so change only
    /// the title with `--title X --author ""`.
    Update {
        id: String,
        /// New title; pass "" to keep the stored title.
        #[arg(long, default_value = "Updated Title")]
        title: String,
        /// New author; pass "" to keep the stored author.
        #[arg(long, default_value = "Updated Author")]
        author: String,
    },
    /// Delete a book.
    Delete { id: String },
    /// Print the server schema.
    Schema,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    eprint!("{}", View::Loading);
    let _ = std::io::stderr().flush();
    let view = run(&cli).await;
    eprint!("\r{}\r", " ".repeat(View::Loading.to_string().len()));

    match view {
        View::Error(_) => {
            eprintln!("{view}");
            ExitCode::FAILURE
        }
        _ => {
            println!("{view}");
            ExitCode::SUCCESS
        }
    }
}

async fn run(cli: &Cli) -> View {
    let mut client = match CatalogClient::connect(&cli.server).await {
        Ok(client) => client,
        Err(err) => return View::Error(format!("{err:#}")),
    };
    match execute(&mut client, &cli.command).await {
        Ok(view) => view,
        Err(err) => View::Error(err.to_string()),
    }
}

async fn execute(client: &mut CatalogClient, command: &Command) -> ClientResult<View> {
    Ok(match command {
        Command::List => View::Books(client.books().await?),
        Command::Get { id } => View::Book(client.book(id).await?),
        Command::Create { title, author } => View::Created(client.create_book(title, author).await?),
        Command::Update { id, title, author } => View::Updated(
            client
                .update_book(id, Some(title.as_str()), Some(author.as_str()))
                .await?,
        ),
        Command::Delete { id } => View::Deleted(client.delete_book(id).await?),
        Command::Schema => View::Schema(client.schema().await?),
    })
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::{CommandFactory, Parser};

    #[test]
    fn update_help_explains_how_to_keep_a_field() {
        let mut cli = Cli::command();
        let help = cli
            .find_subcommand_mut("update")
            .unwrap()
            .render_long_help()
            .to_string();

        assert!(help.contains("pass \"\" to keep the stored author"));
        assert!(help.contains("pass \"\" to keep the stored title"));
    }

    #[test]
    fn title_only_update_passes_an_empty_author() {
        let cli =
            Cli::try_parse_from(["bookshelf", "update", "1", "--title", "X", "--author", ""])
                .unwrap();

        match cli.command {
            Command::Update { id, title, author } => {
                assert_eq!(id, "1");
                assert_eq!(title, "X");
                assert_eq!(author, "");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn omitted_update_fields_use_defaults() {
        let cli = Cli::try_parse_from(["bookshelf", "update", "2"]).unwrap();

        match cli.command {
            Command::Update { title, author, .. } => {
                assert_eq!(title, "Updated Title");
                assert_eq!(author, "Updated Author");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
