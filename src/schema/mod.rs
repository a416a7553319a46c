pub mod pack;
pub mod roll;
