//! Terminal rendering of request states.

use bookshelf_core::Book;
use std::fmt::{Display, Formatter};

/// What the terminal shows for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Loading,
    Error(String),
    Books(Vec<Book>),
    Book(Option<Book>),
    Created(Book),
    Updated(Book),
    Deleted(bool),
    Schema(String),
}

impl Display for View {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loading => write!(f, "Loading..."),
            Self::Error(message) => write!(f, "Error: {message}"),
            Self::Books(books) if books.is_empty() => write!(f, "No books."),
            Self::Books(books) => {
                for (index, book) in books.iter().enumerate() {
                    if index > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}", list_item(book))?;
                }
                Ok(())
            }
            Self::Book(Some(book)) => write!(f, "{}", list_item(book)),
            Self::Book(None) => write!(f, "No book."),
            Self::Created(book) => write!(f, "New book created: {}", list_item(book)),
            Self::Updated(book) => write!(f, "Book updated: {}", list_item(book)),
            Self::Deleted(deleted) => write!(f, "Book deleted: {deleted}"),
            Self::Schema(sdl) => write!(f, "{}", sdl.trim_end()),
        }
    }
}

fn list_item(book: &Book) -> String {
    format!("[{}] {} by {}", book.id, book.title, book.author)
}
