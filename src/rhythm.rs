pub mod beat;
pub mod track;
