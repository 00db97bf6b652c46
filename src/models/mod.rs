// Model modules
pub mod credits;
pub mod places;
pub mod premium;
pub mod tours;
