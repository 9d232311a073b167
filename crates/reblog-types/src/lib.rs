pub mod archive;
pub mod channel;
pub mod message;
pub mod reblog;
pub mod user;

pub use archive::{group_by_month, MonthArchive};
pub use channel::{Channel, TEXT_CHANNEL_TYPE};
pub use message::{is_chronological, Attachment, Author, Message, ReactionGroup, ReactionUser};
pub use reblog::{Creator, ReblogEntry, Star};
pub use user::UserIdentity;
