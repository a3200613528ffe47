pub mod errors;
pub mod extract;
pub mod identity;
