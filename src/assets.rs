pub mod media;
pub mod respack;
pub mod sprite;
