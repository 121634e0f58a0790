mod parameters;

pub use parameters::build_parameters;
