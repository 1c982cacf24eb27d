pub mod handler;
pub mod limit;

pub use crate::domain::model::User;
pub use crate::domain::ports::{ConfigProvider, Storage, UserSource};
pub use crate::utils::error::Result;
