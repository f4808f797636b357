//! Data models and request/response types

pub mod author;
pub mod book;
pub mod user;

pub use author::{Author, AuthorQuery, CreateAuthor, UpdateAuthor};
pub use book::{Book, BookQuery, CreateBook, UpdateBook};
pub use user::{User, UserClaims};
