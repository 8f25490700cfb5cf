pub mod errors;
pub mod events;
pub mod id;
pub mod language;

pub use errors::{ConfigError, SidechatError};
pub use events::EventBus;
pub use id::StoreId;
pub use language::{Language, UnknownLanguage};
