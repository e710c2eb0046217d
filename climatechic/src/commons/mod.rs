pub mod basic_functions;
pub mod global_variables;
