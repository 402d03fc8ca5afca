//! Detail panel controller: the update form toggle and the restaurant
//! detail fetch-and-render cycle.

pub mod detail;
pub mod form;
pub mod render;

pub use detail::{Applied, DetailLoaded, DetailPanel, DetailRequest};
pub use form::FormToggle;
pub use render::PHOTO_HEIGHT;
