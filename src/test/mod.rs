mod provider;

pub use builders::{array_of, generic_param, named, primitive, MockType};
pub use provider::MockProvider;
