pub mod extract;
pub mod scan;
pub mod sessions;
pub mod transcript;
