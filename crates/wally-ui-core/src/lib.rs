//! Core systems for Wally UI.
//!
//! This crate provides the foundational components shared by Wally UI
//! widget state engines:
//!
//! - **Signal/Slot System**: Type-safe change notification between a widget
//!   state engine and the surfaces that render it
//! - **Geometry**: Point, size and rectangle value types used by
//!   viewport-aware panel placement
//!
//! # Signal/Slot Example
//!
//! ```
//! use wally_ui_core::Signal;
//!
//! // Create a signal that notifies when a value changes
//! let value_changed = Signal::<i32>::new();
//!
//! // Connect a slot to handle the signal
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! // Emit the signal
//! value_changed.emit(42);
//!
//! // Disconnect when done
//! value_changed.disconnect(conn_id);
//! ```

pub mod geometry;
pub mod signal;

pub use geometry::{Point, Rect, Size};
pub use signal::{ConnectionId, Signal};
