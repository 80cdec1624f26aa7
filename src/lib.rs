pub mod text;
pub mod util;
