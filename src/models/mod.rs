pub mod flashcard;
pub mod unit_code;

pub use flashcard::{CardSide, Flashcard, HarvestResult, HarvestStop, PageRequest};
pub use unit_code::extract_unit_code;
