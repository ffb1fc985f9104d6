pub mod game;
pub mod input;
pub mod pick;
pub mod survivor;

pub use game::*;
pub use input::*;
pub use pick::*;
pub use survivor::*;
