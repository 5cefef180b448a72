mod builder;
mod server;

pub use builder::*;
pub use server::*;
