pub mod beat_bar;
pub mod spectrum;
