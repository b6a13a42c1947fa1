//! Forum domain - users, threads and posts

mod kind;
mod post;
mod thread;
mod user;

pub use kind::EntityKind;
pub use post::{NewPost, PostItem, THREAD_INDEX, USER_INDEX};
pub use thread::{NewThread, ThreadItem};
pub use user::UserItem;
