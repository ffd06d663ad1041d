pub mod analysis;
pub mod conversation;
pub mod enums;

pub use analysis::*;
pub use conversation::*;
pub use enums::*;
