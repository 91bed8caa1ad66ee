pub mod catalog;
pub mod conversation;
pub mod intent;
pub mod reply;

pub use catalog::*;
pub use conversation::*;
pub use intent::*;
pub use reply::*;
