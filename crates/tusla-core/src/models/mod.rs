mod category;
mod post;
mod user;
mod volunteer;

pub use category::*;
pub use post::*;
pub use user::*;
pub use volunteer::*;
