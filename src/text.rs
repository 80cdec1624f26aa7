pub mod chunking;

pub use chunking::{split, split_with_metadata};
