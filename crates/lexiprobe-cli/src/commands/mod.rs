pub mod estimate;
pub mod init;
pub mod level;
pub mod survey;
pub mod validate;
