//! # Stepping Windows
//!
//! Windowed traversal of a region of jagged records. A [`SteppingWindow`]
//! yields [`Window`]s whose width and step are configured independently
//! through [`WindowConfig`], so consecutive windows may tile the region,
//! overlap, or leave gaps.
//!
//! ```ignore
//! let config = WindowConfig::records(2).step_records(1);
//! for window in SteppingWindow::new(region, &layout, config)? {
//!     let window = window?;
//!     for record in window.records() {
//!         println!("{} @ {}", record.str("name")?, record.start());
//!     }
//! }
//! ```

pub mod config;
pub mod stepping;


pub use config::{Extent, WindowConfig, WindowContents};
pub use stepping::{SteppingWindow, Window};
