pub mod history;
pub mod manager;
pub mod recipes;

pub use history::History;
pub use manager::{ActiveSession, BulkProgress, SessionManager};
pub use recipes::RecipeBook;
