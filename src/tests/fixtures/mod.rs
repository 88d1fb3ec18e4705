pub mod records;
pub mod submissions;
