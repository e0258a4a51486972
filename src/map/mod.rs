pub mod index;
pub mod load;
pub mod model;
pub mod visibility;
