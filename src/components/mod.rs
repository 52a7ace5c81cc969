pub mod announcement;
pub mod bracket;
pub mod shuffle;
