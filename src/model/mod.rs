mod comment;
mod follow;
mod group;
mod post;
mod user;

pub use comment::*;
pub use follow::*;
pub use group::*;
pub use post::*;
pub use user::*;
