pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::HttpUserSource;
pub use app::OutputFormat;
pub use config::{cli::LocalStorage, AppConfig};
pub use core::handler::{UserListHandler, UserListView};
pub use core::limit::{apply_limit, resolve_limit, DEFAULT_LIMIT};
pub use domain::model::{
    Address, Company, Coordinates, Crypto, Hair, Nullable, NullableField, SchemaTolerant, User,
};
pub use domain::ports::UserSource;
pub use utils::error::{ErrorKind, Result, UsersError};
