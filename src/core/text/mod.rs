//! Text measurement helpers.
//!
//! Pure string-in/number-out helpers shared by the layout backends.

pub mod width;
