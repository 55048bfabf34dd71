//! Wire models for the catalog API.

mod details;
mod genres;
mod movie;
mod page;

pub use details::MovieDetails;
pub use genres::{Genre, GenreDirectory, GenreListResponse};
pub use movie::Movie;
pub use page::Page;
