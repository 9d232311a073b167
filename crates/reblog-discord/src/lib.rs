pub mod cache;
pub mod caching;
pub mod client;
pub mod error;
pub mod link;
pub mod observer;
pub mod reactions;
pub mod traits;
pub mod window;
mod wire;

pub use cache::{CacheStats, CacheValue, ResultCache, DEFAULT_SWEEP_PERIOD, DEFAULT_TTL};
pub use caching::CachingSource;
pub use client::{DiscordClient, DISCORD_API_BASE, MAX_PAGE_LIMIT};
pub use error::{Result, SourceError};
pub use link::{parse_message_link, MessageLink};
pub use observer::{CountingObserver, NoopObserver, SourceObserver, SourceStats};
pub use reactions::{group_reactions, RawReaction};
pub use traits::{Direction, MessageSource};
pub use window::{ContextWindow, ContextWindowAssembler, WindowSlice, DEFAULT_HALF_WIDTH};
