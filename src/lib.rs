pub mod config;
pub mod utils;
pub mod system;
pub mod identifier;
pub mod alias;

// 重新导出主要结构
pub use config::{AliasSettings, Config, PathSettings, SystemPaths};
pub use identifier::{IdStrategy, IdentifierSet, RefreshOptions, RefreshReport, SystemIdentifierManager};
pub use alias::{AddyClient, Alias, AliasApi, AliasId, EmailAliasManager, NewAlias};
pub use system::{DefaultSystemCommands, SystemCommands};
pub use utils::{RefresherError, Result};
