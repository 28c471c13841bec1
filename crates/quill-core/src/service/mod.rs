//! Domain services - the post write/read pipelines and category operations.

mod categories;
mod posts;

pub use categories::CategoryService;
pub use posts::{NewPost, PostPage, PostPatch, PostService};
