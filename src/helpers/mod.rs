pub mod excel;
pub mod pdf;
