pub mod learnings;
pub mod secret;
pub mod session;
pub mod turn;

pub use learnings::*;
pub use secret::*;
pub use session::*;
pub use turn::*;
