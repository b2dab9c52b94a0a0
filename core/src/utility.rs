mod data_file;
pub use data_file::*;
