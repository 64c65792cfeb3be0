//! Combobox state engine facade.
//!
//! The ComboBox facade owns the whole state of one combobox instance:
//! - Candidate data with search filtering and optional grouping
//! - Single- or multi-select selection tracking
//! - Keyboard focus over the filtered view
//! - Panel open/close state and viewport-aware placement
//!
//! The four rendering surfaces (input field, trigger button, content panel,
//! item rows) call methods on this facade and read its derived views; no
//! selection or filtering logic lives in the surfaces.
//!
//! # Example
//!
//! ```
//! use wally_ui::{ComboBox, ComboItem};
//!
//! let mut combo = ComboBox::new()
//!     .with_data(vec![
//!         ComboItem::new("js", "JavaScript").with_group("Frontend"),
//!         ComboItem::new("ts", "TypeScript").with_group("Frontend"),
//!         ComboItem::new("py", "Python").with_group("Backend"),
//!     ])
//!     .with_multi_select(true)
//!     .with_group_by("group");
//!
//! // Connect to signals
//! combo.selection_changed.connect(|items| {
//!     println!("Selection now has {} items", items.len());
//! });
//!
//! combo.open();
//! combo.set_search_query("script");
//! assert_eq!(combo.filtered_data().len(), 2);
//!
//! combo.select_item("ts");
//! combo.select_item("js");
//! assert_eq!(combo.selected_values().len(), 2);
//! ```

use wally_ui_core::Signal;

use crate::filter;
use crate::item::{ComboItem, ComboValue, ItemGroup};
use crate::placement::{GeometryProvider, PanelPlacement, PanelPositioner};

// ============================================================================
// Trigger Mode
// ============================================================================

/// Which external surface is allowed to open and close the panel.
///
/// This is a policy marker for the surfaces: the input surface opens on
/// focus/click/typing and never toggles closed on click, while a custom
/// trigger toggles on click or Enter/Space. The state engine itself behaves
/// identically in both modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriggerMode {
    /// The text-input surface drives opening.
    #[default]
    Input,
    /// A separate custom trigger element drives toggling.
    Custom,
}

// ============================================================================
// Keyboard
// ============================================================================

/// Keys the input surface forwards to [`ComboBox::handle_key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Home,
    End,
    Enter,
    Escape,
}

// ============================================================================
// ComboBox Facade
// ============================================================================

/// State engine for a searchable, optionally multi-select, optionally
/// grouped dropdown selector.
///
/// All mutations are synchronous; derived views (`filtered_data`,
/// `grouped_data`, `selected_items`, `focused_item`) are computed from the
/// current state on each read, except for the filtered index list which is
/// cached and refreshed on the mutations that can change it (new data, new
/// query, close).
///
/// # Invariants
///
/// - `focused_index` is `-1` or a valid index into the filtered view; any
///   change to the filtered view resets it to `-1`
/// - In single-select mode at most one value is selected
/// - Opening resets focus; closing clears the search query and focus but
///   preserves the selection
///
/// # Signals
///
/// - `selection_changed(Vec<ComboItem>)`: Emitted with the current selected
///   items every time the selection changes
/// - `open_changed(bool)`: Emitted when the panel opens or closes
pub struct ComboBox {
    /// Source of truth, replaced wholesale by the consuming application.
    data: Vec<ComboItem>,

    /// Current search query.
    search_query: String,

    /// Cached filtered view: indices into `data`, refreshed whenever `data`
    /// or `search_query` changes.
    filtered_indices: Vec<usize>,

    /// Selected identifiers, in selection order.
    selected_values: Vec<ComboValue>,

    /// Focused index into the filtered view (-1 means nothing focused).
    focused_index: i32,

    /// Whether the panel is open.
    is_open: bool,

    /// Whether multiple items may be selected.
    multi_select: bool,

    /// Grouping key; grouping is active while this is set.
    group_by: Option<String>,

    /// Whether a single-select pick closes the panel.
    close_on_select: bool,

    /// Whether the whole combobox is disabled (enforced by the surfaces).
    disabled: bool,

    /// Placeholder text for the input surface.
    placeholder: String,

    /// Which surface drives opening (policy marker for the surfaces).
    trigger_mode: TriggerMode,

    /// Panel placement state.
    positioner: PanelPositioner,

    // Signals
    /// Signal emitted with the selected items whenever the selection changes.
    pub selection_changed: Signal<Vec<ComboItem>>,
    /// Signal emitted when the panel opens or closes.
    pub open_changed: Signal<bool>,
}

impl Default for ComboBox {
    fn default() -> Self {
        Self::new()
    }
}

impl ComboBox {
    /// Create a new combobox with no data and default configuration.
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            search_query: String::new(),
            filtered_indices: Vec::new(),
            selected_values: Vec::new(),
            focused_index: -1,
            is_open: false,
            multi_select: false,
            group_by: None,
            close_on_select: true,
            disabled: false,
            placeholder: String::new(),
            trigger_mode: TriggerMode::Input,
            positioner: PanelPositioner::new(PanelPlacement::Bottom),
            selection_changed: Signal::new(),
            open_changed: Signal::new(),
        }
    }

    // =========================================================================
    // Data & Filtering
    // =========================================================================

    /// Replace the candidate list wholesale.
    ///
    /// No merge semantics. The filtered view is recomputed and focus is
    /// reset. Selected values that no longer match any item are kept (so a
    /// refetch does not lose the selection) but drop out of
    /// [`selected_items`](Self::selected_items) until they match again.
    pub fn set_data(&mut self, items: Vec<ComboItem>) {
        self.data = items;
        self.refresh_filter();
        self.focused_index = -1;
    }

    /// Set data using builder pattern.
    pub fn with_data(mut self, items: Vec<ComboItem>) -> Self {
        self.set_data(items);
        self
    }

    /// The full candidate list.
    pub fn data(&self) -> &[ComboItem] {
        &self.data
    }

    /// Set the search query and recompute the filtered view.
    ///
    /// Resets the focused index, since it points into the filtered view.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
        self.refresh_filter();
        self.focused_index = -1;
    }

    /// The current search query.
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// The filtered view: items matching the current query, in data order.
    pub fn filtered_data(&self) -> Vec<ComboItem> {
        self.filtered_indices
            .iter()
            .map(|&i| self.data[i].clone())
            .collect()
    }

    /// Number of items in the filtered view.
    pub fn filtered_len(&self) -> usize {
        self.filtered_indices.len()
    }

    fn refresh_filter(&mut self) {
        self.filtered_indices = filter::filter_indices(&self.data, &self.search_query);
    }

    // =========================================================================
    // Grouping
    // =========================================================================

    /// Set the grouping key, or `None` to disable grouping.
    pub fn set_group_by(&mut self, key: Option<String>) {
        self.group_by = key;
    }

    /// Set the grouping key using builder pattern.
    pub fn with_group_by(mut self, key: impl Into<String>) -> Self {
        self.group_by = Some(key.into());
        self
    }

    /// The current grouping key.
    pub fn group_by(&self) -> Option<&str> {
        self.group_by.as_deref()
    }

    /// The grouped view, or `None` when grouping is disabled.
    ///
    /// Buckets the filtered view by group label in first-seen order; within
    /// each bucket, filtered-view order is preserved. Recomputed on each
    /// read, so it always reflects the current filtered view.
    pub fn grouped_data(&self) -> Option<Vec<ItemGroup>> {
        self.group_by.as_ref()?;

        let groups = filter::group_positions(&self.data, &self.filtered_indices);
        Some(
            groups
                .into_iter()
                .map(|(label, positions)| ItemGroup {
                    label,
                    items: positions
                        .iter()
                        .map(|&p| self.data[self.filtered_indices[p]].clone())
                        .collect(),
                })
                .collect(),
        )
    }

    /// Map a (group index, item-in-group index) pair to the item's flat
    /// index in the filtered view.
    ///
    /// The content panel uses this so keyboard highlighting agrees between
    /// grouped and ungrouped rendering. Returns `None` when grouping is
    /// disabled or the coordinate is out of range.
    pub fn flat_index(&self, group_index: usize, item_index: usize) -> Option<usize> {
        self.group_by.as_ref()?;

        let groups = filter::group_positions(&self.data, &self.filtered_indices);
        groups.get(group_index)?.1.get(item_index).copied()
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Select an item by value.
    ///
    /// In multi-select mode this toggles membership. In single-select mode
    /// it replaces the selection and, when `close_on_select` is set, closes
    /// the panel as a side effect.
    ///
    /// Values are not validated against the data: per-item disabled checks
    /// are the calling surface's responsibility, and selecting an unknown
    /// value is accepted (it just never appears in
    /// [`selected_items`](Self::selected_items)).
    pub fn select_item(&mut self, value: impl Into<ComboValue>) {
        let value = value.into();
        let changed;

        if self.multi_select {
            if let Some(pos) = self.selected_values.iter().position(|v| *v == value) {
                self.selected_values.remove(pos);
            } else {
                self.selected_values.push(value);
            }
            changed = true;
        } else {
            changed = self.selected_values.as_slice() != std::slice::from_ref(&value);
            self.selected_values = vec![value];
            if self.close_on_select {
                self.close();
            }
        }

        if changed {
            self.emit_selection_changed();
        }
    }

    /// Remove a value from the selection. No-op if it is not selected.
    pub fn deselect_item(&mut self, value: &ComboValue) {
        if let Some(pos) = self.selected_values.iter().position(|v| v == value) {
            self.selected_values.remove(pos);
            self.emit_selection_changed();
        }
    }

    /// Clear the entire selection.
    pub fn clear_selection(&mut self) {
        if !self.selected_values.is_empty() {
            self.selected_values.clear();
            self.emit_selection_changed();
        }
    }

    /// Check whether a value is currently selected.
    pub fn is_selected(&self, value: &ComboValue) -> bool {
        self.selected_values.contains(value)
    }

    /// The selected values, in selection order.
    pub fn selected_values(&self) -> &[ComboValue] {
        &self.selected_values
    }

    /// The selected items, resolved against the full data (not the filtered
    /// view). Values with no matching item are dropped.
    pub fn selected_items(&self) -> Vec<ComboItem> {
        self.selected_values
            .iter()
            .filter_map(|value| self.data.iter().find(|item| item.value == *value))
            .cloned()
            .collect()
    }

    /// Check if multi-select mode is enabled.
    pub fn is_multi_select(&self) -> bool {
        self.multi_select
    }

    /// Switch between single- and multi-select.
    ///
    /// Switching multi to single truncates the selection to its first
    /// value; switching single to multi leaves the selection untouched.
    pub fn set_multi_select(&mut self, enabled: bool) {
        self.multi_select = enabled;
        if !enabled && self.selected_values.len() > 1 {
            self.selected_values.truncate(1);
            self.emit_selection_changed();
        }
    }

    /// Set multi-select using builder pattern.
    pub fn with_multi_select(mut self, enabled: bool) -> Self {
        self.set_multi_select(enabled);
        self
    }

    fn emit_selection_changed(&self) {
        self.selection_changed.emit(self.selected_items());
    }

    // =========================================================================
    // Focus / Navigation
    // =========================================================================

    /// The focused index into the filtered view (-1 means nothing focused).
    pub fn focused_index(&self) -> i32 {
        self.focused_index
    }

    /// Set the focused index directly (item-row mouse-enter contract).
    ///
    /// Accepted only for `-1` or an index inside the current filtered view;
    /// anything else is ignored. Returns whether the index was applied.
    pub fn set_focused_index(&mut self, index: i32) -> bool {
        if index == -1 || (index >= 0 && (index as usize) < self.filtered_indices.len()) {
            self.focused_index = index;
            true
        } else {
            false
        }
    }

    /// Focus the first item of the filtered view. No-op on an empty view.
    pub fn focus_first(&mut self) {
        if !self.filtered_indices.is_empty() {
            self.focused_index = 0;
        }
    }

    /// Focus the last item of the filtered view. No-op on an empty view.
    pub fn focus_last(&mut self) {
        if !self.filtered_indices.is_empty() {
            self.focused_index = self.filtered_indices.len() as i32 - 1;
        }
    }

    /// Move focus down, clamped at the last item (no wraparound).
    pub fn focus_next(&mut self) {
        let len = self.filtered_indices.len() as i32;
        if len > 0 {
            self.focused_index = (self.focused_index + 1).min(len - 1);
        }
    }

    /// Move focus up, clamped at the first item (no wraparound).
    pub fn focus_previous(&mut self) {
        if !self.filtered_indices.is_empty() {
            self.focused_index = (self.focused_index - 1).max(0);
        }
    }

    /// The item at the focused index, or `None` if nothing is focused.
    pub fn focused_item(&self) -> Option<&ComboItem> {
        if self.focused_index < 0 {
            return None;
        }
        self.filtered_indices
            .get(self.focused_index as usize)
            .map(|&i| &self.data[i])
    }

    /// Select the focused item, if any. No-op when nothing is focused.
    pub fn select_focused_item(&mut self) {
        if let Some(item) = self.focused_item() {
            let value = item.value.clone();
            self.select_item(value);
        }
    }

    // =========================================================================
    // Open / Close
    // =========================================================================

    /// Whether the panel is open.
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Open the panel.
    ///
    /// Resets the focused index and schedules a deferred placement pass
    /// (the panel must render before it can be measured; the host loop
    /// drains it via [`process_deferred`](Self::process_deferred)).
    pub fn open(&mut self) {
        self.focused_index = -1;
        if !self.is_open {
            self.is_open = true;
            self.positioner.schedule_recompute();
            tracing::debug!(target: "wally_ui::combobox", "panel opened");
            self.open_changed.emit(true);
        }
    }

    /// Close the panel.
    ///
    /// Always clears the search query (restoring the unfiltered view) and
    /// the focused index; the selection is preserved.
    pub fn close(&mut self) {
        self.search_query.clear();
        self.refresh_filter();
        self.focused_index = -1;
        if self.is_open {
            self.is_open = false;
            tracing::debug!(target: "wally_ui::combobox", "panel closed");
            self.open_changed.emit(false);
        }
    }

    /// Toggle the panel between open and closed.
    pub fn toggle(&mut self) {
        if self.is_open {
            self.close();
        } else {
            self.open();
        }
    }

    // =========================================================================
    // Placement
    // =========================================================================

    /// Install the platform measurement source for placement.
    pub fn set_geometry_provider(&mut self, provider: Box<dyn GeometryProvider>) {
        self.positioner.set_provider(provider);
    }

    /// Set the geometry provider using builder pattern.
    pub fn with_geometry_provider(mut self, provider: Box<dyn GeometryProvider>) -> Self {
        self.set_geometry_provider(provider);
        self
    }

    /// The requested preferred side for the panel.
    pub fn preferred_placement(&self) -> PanelPlacement {
        self.positioner.preferred()
    }

    /// Change the preferred side for the panel.
    pub fn set_preferred_placement(&mut self, placement: PanelPlacement) {
        self.positioner.set_preferred(placement);
    }

    /// Set the preferred side using builder pattern.
    pub fn with_preferred_placement(mut self, placement: PanelPlacement) -> Self {
        self.positioner.set_preferred(placement);
        self
    }

    /// The currently resolved panel side.
    pub fn placement(&self) -> PanelPlacement {
        self.positioner.current()
    }

    /// Recompute placement while the panel is open (window-resize hook).
    pub fn handle_viewport_resize(&mut self) {
        if self.is_open {
            self.positioner.recompute();
        }
    }

    /// Run the deferred placement pass scheduled by [`open`](Self::open).
    ///
    /// The host event loop calls this once after the panel has rendered.
    /// If the panel closed in the meantime the pass is dropped, so a stale
    /// side never flashes into a freshly reopened panel. Returns whether a
    /// recomputation ran.
    pub fn process_deferred(&mut self) -> bool {
        self.positioner.process_deferred(self.is_open)
    }

    // =========================================================================
    // Keyboard
    // =========================================================================

    /// Dispatch a key from the input surface.
    ///
    /// ArrowDown opens a closed panel or moves focus down; ArrowUp moves
    /// focus up; Home/End jump to the ends of the filtered view; Enter
    /// selects the focused item; Escape closes. Returns whether the key was
    /// consumed.
    pub fn handle_key(&mut self, key: Key) -> bool {
        match key {
            Key::ArrowDown => {
                if self.is_open {
                    self.focus_next();
                } else {
                    self.open();
                }
                true
            }
            Key::ArrowUp => {
                if self.is_open {
                    self.focus_previous();
                    true
                } else {
                    false
                }
            }
            Key::Home => {
                if self.is_open && !self.filtered_indices.is_empty() {
                    self.focus_first();
                    true
                } else {
                    false
                }
            }
            Key::End => {
                if self.is_open && !self.filtered_indices.is_empty() {
                    self.focus_last();
                    true
                } else {
                    false
                }
            }
            Key::Enter => {
                if self.is_open && self.focused_item().is_some() {
                    self.select_focused_item();
                    true
                } else {
                    false
                }
            }
            Key::Escape => {
                if self.is_open {
                    self.close();
                    true
                } else {
                    false
                }
            }
        }
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Whether a single-select pick closes the panel.
    pub fn close_on_select(&self) -> bool {
        self.close_on_select
    }

    /// Set whether a single-select pick closes the panel.
    pub fn set_close_on_select(&mut self, close_on_select: bool) {
        self.close_on_select = close_on_select;
    }

    /// Set close-on-select using builder pattern.
    pub fn with_close_on_select(mut self, close_on_select: bool) -> Self {
        self.close_on_select = close_on_select;
        self
    }

    /// Whether the combobox is disabled.
    ///
    /// Enforced by the surfaces (they stop forwarding interactions); the
    /// engine itself does not gate its operations on it.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Set the disabled flag.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Set the disabled flag using builder pattern.
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// The placeholder text for the input surface.
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Set the placeholder text.
    pub fn set_placeholder(&mut self, text: impl Into<String>) {
        self.placeholder = text.into();
    }

    /// Set the placeholder using builder pattern.
    pub fn with_placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = text.into();
        self
    }

    /// Which surface drives opening.
    pub fn trigger_mode(&self) -> TriggerMode {
        self.trigger_mode
    }

    /// Set the trigger mode.
    pub fn set_trigger_mode(&mut self, mode: TriggerMode) {
        self.trigger_mode = mode;
    }

    /// Set the trigger mode using builder pattern.
    pub fn with_trigger_mode(mut self, mode: TriggerMode) -> Self {
        self.trigger_mode = mode;
        self
    }
}

impl std::fmt::Debug for ComboBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComboBox")
            .field("data_len", &self.data.len())
            .field("search_query", &self.search_query)
            .field("filtered_len", &self.filtered_indices.len())
            .field("selected_values", &self.selected_values)
            .field("focused_index", &self.focused_index)
            .field("is_open", &self.is_open)
            .field("multi_select", &self.multi_select)
            .field("group_by", &self.group_by)
            .field("trigger_mode", &self.trigger_mode)
            .field("placement", &self.positioner.current())
            .finish()
    }
}
