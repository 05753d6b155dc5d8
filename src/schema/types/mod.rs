mod physical_type;
pub use physical_type::*;
