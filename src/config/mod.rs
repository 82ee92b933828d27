//! Configuration module

mod site;

pub use site::ContentMode;
pub use site::HighlightConfig;
pub use site::ServerConfig;
pub use site::SiteConfig;
pub use site::{ENV_MOCK_DATA, ENV_MODE};
