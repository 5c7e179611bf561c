pub mod literature;
pub mod system;
