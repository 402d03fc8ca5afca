pub mod detail;
pub mod enums;
pub mod restaurant;

pub use detail::*;
pub use enums::*;
pub use restaurant::*;
