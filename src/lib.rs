mod entity;
mod instantiate;
mod key;
mod mapper;
mod relation;
mod schema;
mod value;

pub use ::anyhow::Context;
pub use entity::*;
pub use instantiate::*;
pub use key::*;
pub use mapper::*;
pub use relation::*;
pub use schema::*;
pub use value::*;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
