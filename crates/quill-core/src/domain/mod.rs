//! Domain entities - the core business objects.

mod page;
mod post;
mod user;

pub use page::{DEFAULT_PER_PAGE, Page, PageRequest};
pub use post::Post;
pub use user::{DEFAULT_IMAGE_FILE, User, mask_email, normalize_email};
