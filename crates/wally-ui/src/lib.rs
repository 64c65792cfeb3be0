//! Wally UI combobox state engine.
//!
//! This crate implements the state engine behind a searchable, optionally
//! multi-select, optionally grouped dropdown selector:
//!
//! - **Data & Filtering**: a candidate item list with a case-insensitive
//!   substring filter over label, description and value
//! - **Grouping**: a derived view bucketing filtered items by their group
//!   key, in first-seen order
//! - **Selection**: single- or multi-select over item values, in selection
//!   order
//! - **Focus/Navigation**: a focused index into the filtered view with
//!   first/last/next/previous movement and select-focused
//! - **Open/Close & Placement**: panel visibility plus viewport-aware
//!   placement against the trigger's bounding rectangle
//!
//! All of it is exposed through a single [`ComboBox`] facade. The rendering
//! surfaces (input field, trigger button, content panel, item rows) call the
//! facade's methods and read its derived views; they hold no selection or
//! filtering logic of their own.
//!
//! # Example
//!
//! ```
//! use wally_ui::{ComboBox, ComboItem};
//!
//! let mut combo = ComboBox::new().with_data(vec![
//!     ComboItem::new(1, "Apple"),
//!     ComboItem::new(2, "Banana"),
//!     ComboItem::new(3, "Orange"),
//! ]);
//!
//! combo.selection_changed.connect(|items| {
//!     println!("selected: {:?}", items);
//! });
//!
//! combo.open();
//! combo.set_search_query("an");
//! combo.focus_first();
//! combo.select_focused_item();
//!
//! assert!(combo.is_selected(&2.into()));
//! ```

pub mod combo_box;
pub mod filter;
pub mod item;
pub mod placement;

pub use combo_box::{ComboBox, Key, TriggerMode};
pub use item::{ComboItem, ComboValue, ItemGroup, FALLBACK_GROUP_LABEL};
pub use placement::{resolve_placement, GeometryProvider, PanelPlacement, PLACEMENT_MARGIN};
pub use wally_ui_core::{Point, Rect, Signal, Size};
