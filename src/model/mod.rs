//! Record model: identifiers, the cryptocurrency entity, vote direction,
//! listing order and input validation.

mod id;
mod record;
mod validation;

pub use id::*;
pub use record::*;
pub use validation::*;

#[cfg(test)]
mod id_test;
#[cfg(test)]
mod record_test;
#[cfg(test)]
mod validation_test;
