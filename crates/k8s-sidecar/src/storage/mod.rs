pub mod filesystem;

pub use filesystem::{unique_filename, FileMaterializer, MaterializerOptions};
