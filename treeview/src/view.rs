//! The tree view: a model, its materialized rows, the selection, and the
//! input state machine behind one facade.
//!
//! Every mutating call runs to completion before returning: rows are
//! patched, queued model notifications are applied, and the resulting
//! [`TreeEvent`]s are waiting in [`drain_events`](TreeView::drain_events).

use std::sync::Arc;

use log::{debug, trace, warn};

use crate::config::TreeConfig;
use crate::controls::{
    DrawContext, DrawSelectionMode, NodeControl, NodeControls, RenderCell, RenderRow, RowInfo,
    ToolTipProvider, TreeColumn, truncate_to_width,
};
use crate::error::{Result, TreeError};
use crate::events::TreeEvent;
use crate::geometry::Rect;
use crate::input::{
    DragSession, EditSession, InputHandler, InputSession, InputState, InputStateKind, KeyInput,
    Modifiers, MouseInput, PointerEvent, RowHit, edit,
};
use crate::model::{ModelEvent, Subscription, TreeModel, TreePath};
use crate::rows::{RowId, RowLayer, RowPatch, Viewport};
use crate::selection::{Selection, SelectionMode, SelectionNotice};

/// Size assumed until the host reports one.
const DEFAULT_WIDTH: u16 = 80;
const DEFAULT_HEIGHT: u16 = 24;

/// Notification rounds applied per sync before giving up on a model that
/// keeps emitting while it is queried.
const MAX_SYNC_ROUNDS: usize = 64;

type SelectionFilter<K> = Box<dyn Fn(&TreePath<K>) -> bool>;

/// A virtualized tree over a [`TreeModel`].
pub struct TreeView<M: TreeModel> {
    model: Option<Arc<M>>,
    /// Dropped (and thereby unsubscribed) together with the model.
    subscription: Option<Subscription<M::Key>>,
    rows: RowLayer<M::Key>,
    selection: Selection,
    viewport: Viewport,
    width: u16,
    config: TreeConfig,
    session: InputSession,
    controls: NodeControls<M::Key>,
    tooltips: Option<Box<dyn ToolTipProvider<M::Key>>>,
    selection_filter: Option<SelectionFilter<M::Key>>,
    events: Vec<TreeEvent>,
    dirty: bool,
    focused: bool,
    enabled: bool,
}

impl<M: TreeModel> std::fmt::Debug for TreeView<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeView")
            .field("attached", &self.model.is_some())
            .field("rows", &self.rows.len())
            .field("selection", &self.selection)
            .field("viewport", &self.viewport)
            .field("session", &self.session)
            .field("pending_events", &self.events.len())
            .finish_non_exhaustive()
    }
}

impl<M: TreeModel> TreeView<M> {
    /// Create a view without a model.
    pub fn new(config: TreeConfig) -> Self {
        let row_height = config.row_height.max(1);
        Self {
            model: None,
            subscription: None,
            rows: RowLayer::new(config.show_root, config.evict_on_collapse),
            selection: Selection::new(config.selection_mode),
            viewport: Viewport::new((DEFAULT_HEIGHT / row_height) as usize),
            width: DEFAULT_WIDTH,
            config,
            session: InputSession::default(),
            controls: NodeControls::new(),
            tooltips: None,
            selection_filter: None,
            events: Vec::new(),
            dirty: true,
            focused: true,
            enabled: true,
        }
    }

    /// Create a view showing `model`.
    pub fn with_model(model: Arc<M>, config: TreeConfig) -> Self {
        let mut view = Self::new(config);
        view.set_model(Some(model));
        view
    }

    // -------------------------------------------------------------------------
    // Model lifecycle
    // -------------------------------------------------------------------------

    pub fn model(&self) -> Option<&Arc<M>> {
        self.model.as_ref()
    }

    /// Attach a model (or none), discarding all rows, selection and gesture
    /// state of the previous one.
    pub fn set_model(&mut self, model: Option<Arc<M>>) {
        if self.model.is_some() {
            self.subscription = None;
            self.model = None;
            debug!("model detached");
            self.events.push(TreeEvent::ModelDetached);
        }
        self.rows.clear();
        self.selection.reset();
        self.cancel_gestures();
        self.viewport.set_offset(0, 0);

        if let Some(model) = model {
            self.subscription = Some(model.events().subscribe());
            self.rows.attach(model.as_ref());
            self.model = Some(model);
            debug!("model attached ({} rows)", self.rows.len());
            self.events.push(TreeEvent::ModelAttached);
        }
        self.finish();
    }

    /// Detach the current model and return it.
    pub fn detach_model(&mut self) -> Option<Arc<M>> {
        let model = self.model.clone();
        self.set_model(None);
        model
    }

    /// Apply pending model notifications.
    ///
    /// Runs automatically at the end of every mutating call; hosts call it
    /// after changing the model outside the view. Returns `true` if any
    /// notification was applied.
    pub fn sync(&mut self) -> bool {
        let Some(model) = self.model.clone() else {
            return false;
        };
        let mut applied = false;
        let mut rounds = 0;
        loop {
            let pending = match &self.subscription {
                Some(subscription) => subscription.drain(),
                None => break,
            };
            if pending.is_empty() {
                break;
            }
            if rounds == MAX_SYNC_ROUNDS {
                warn!(
                    "model still emitting after {} sync rounds, dropping {} notifications",
                    rounds,
                    pending.len()
                );
                break;
            }
            rounds += 1;
            for event in pending {
                self.apply(model.as_ref(), event);
            }
            applied = true;
        }
        if applied {
            self.prune_session();
            self.flush_selection();
            self.viewport.clamp(self.rows.len());
        }
        applied
    }

    fn apply(&mut self, model: &M, event: ModelEvent<M::Key>) {
        trace!("applying {:?}", event);
        let focus_index = self.current().and_then(|row| self.rows.index_of(row));
        let patch = match event {
            ModelEvent::NodesChanged { path } => {
                if let Some(range) = self.rows.nodes_changed(&path) {
                    self.events.push(TreeEvent::RowsChanged { range });
                    self.dirty = true;
                }
                return;
            }
            ModelEvent::NodesInserted {
                parent,
                start,
                count,
            } => self.rows.nodes_inserted(model, &parent, start, count),
            ModelEvent::NodesRemoved {
                parent,
                start,
                count,
            } => self.rows.nodes_removed(model, &parent, start, count),
            ModelEvent::StructureChanged { path } => self.rows.structure_changed(model, &path),
        };
        self.apply_patch(patch, focus_index);
    }

    fn apply_patch(&mut self, patch: RowPatch, focus_index: Option<usize>) {
        if !patch.removed.is_empty() {
            self.selection.forget(&patch.removed);
        }
        // Focus on a removed row falls to whatever now sits at its index.
        if let Some(current) = self.current()
            && !self.rows.is_visible(current)
        {
            let fallback = focus_index
                .filter(|_| !self.rows.is_empty())
                .and_then(|index| self.rows.row_at(index.min(self.rows.len() - 1)));
            self.selection.replace_current(fallback);
        }
        if patch.reshaped || !patch.removed.is_empty() {
            self.events.push(TreeEvent::StructureChanged);
            self.dirty = true;
        }
    }

    /// Sync, forward selection notices and keep the viewport valid.
    fn finish(&mut self) {
        self.sync();
        self.flush_selection();
        self.viewport.clamp(self.rows.len());
    }

    fn flush_selection(&mut self) {
        for notice in self.selection.take_notices() {
            self.events.push(match notice {
                SelectionNotice::SelectionChanged => TreeEvent::SelectionChanged,
                SelectionNotice::CurrentChanged { previous, current } => {
                    TreeEvent::CurrentChanged { previous, current }
                }
            });
            self.dirty = true;
        }
    }

    // -------------------------------------------------------------------------
    // Rows
    // -------------------------------------------------------------------------

    pub fn rows(&self) -> &RowLayer<M::Key> {
        &self.rows
    }

    /// Visible row at a flat index.
    pub fn row_at(&self, index: usize) -> Option<RowId> {
        self.rows.row_at(index)
    }

    pub fn index_of(&self, row: RowId) -> Option<usize> {
        self.rows.index_of(row)
    }

    pub fn path(&self, row: RowId) -> Option<TreePath<M::Key>> {
        self.rows.path(row)
    }

    /// Check that a row handle still refers to a materialized row.
    pub fn try_row(&self, row: RowId) -> Result<RowId> {
        if self.rows.contains(row) {
            Ok(row)
        } else {
            Err(TreeError::StaleRow(row))
        }
    }

    /// Visible row at a flat index, or why there is none.
    pub fn try_row_at(&self, index: usize) -> Result<RowId> {
        self.rows.row_at(index).ok_or(TreeError::RowIndexOutOfRange {
            index,
            len: self.rows.len(),
        })
    }

    /// Materialized row for a path. Collapsed-away rows are not fetched.
    pub fn find_row(&self, path: &TreePath<M::Key>) -> Result<RowId> {
        self.rows
            .find(path)
            .ok_or_else(|| TreeError::PathNotFound(format!("{path:?}")))
    }

    /// Everything controls need to draw a visible row.
    pub fn row_info(&self, row: RowId) -> Option<RowInfo<M::Key>> {
        Some(RowInfo {
            row,
            index: self.rows.index_of(row)?,
            path: self.rows.path(row)?,
            key: self.rows.key(row).cloned(),
            level: self.rows.level(row)?,
            expanded: self.rows.is_expanded(row),
            leaf: self.rows.is_leaf(row),
            selected: self.selection.is_selected(row),
            current: self.selection.current() == Some(row),
        })
    }

    // -------------------------------------------------------------------------
    // Expansion
    // -------------------------------------------------------------------------

    /// Expand a row, fetching its children on first use.
    pub fn expand(&mut self, row: RowId) -> bool {
        let Some(model) = self.model.clone() else {
            return false;
        };
        let expanded = self.rows.expand(model.as_ref(), row);
        if expanded {
            self.events.push(TreeEvent::Expanded(row));
            self.dirty = true;
        }
        self.finish();
        expanded
    }

    /// Collapse a row. Selected rows it hides are deselected and focus on a
    /// hidden row moves to `row`.
    pub fn collapse(&mut self, row: RowId) -> bool {
        let Some(gone) = self.rows.collapse(row) else {
            return false;
        };
        self.hide_rows(Some(row), &gone);
        self.events.push(TreeEvent::Collapsed(row));
        self.dirty = true;
        self.finish();
        true
    }

    pub fn toggle_expand(&mut self, row: RowId) -> bool {
        if self.rows.is_expanded(row) {
            self.collapse(row)
        } else {
            self.expand(row)
        }
    }

    /// Expand a row and its whole subtree.
    pub fn expand_all(&mut self, row: RowId) -> bool {
        let Some(model) = self.model.clone() else {
            return false;
        };
        let expanded = self.rows.expand_all(model.as_ref(), row);
        if expanded {
            self.events.push(TreeEvent::Expanded(row));
            self.dirty = true;
        }
        self.finish();
        expanded
    }

    /// Collapse a row and every expanded row below it.
    pub fn collapse_all(&mut self, row: RowId) -> bool {
        let Some(gone) = self.rows.collapse_all(row) else {
            return false;
        };
        let owner = Some(row).filter(|row| self.rows.is_visible(*row));
        self.hide_rows(owner, &gone);
        self.events.push(TreeEvent::Collapsed(row));
        self.dirty = true;
        self.finish();
        true
    }

    /// Deselect rows that left the flat list and move focus off them, to
    /// `owner` when given.
    fn hide_rows(&mut self, owner: Option<RowId>, gone: &[RowId]) {
        self.selection.forget(gone);
        if let Some(current) = self.current()
            && !self.rows.is_visible(current)
        {
            let fallback = owner.or_else(|| {
                self.rows
                    .parent(current)
                    .filter(|parent| self.rows.is_visible(*parent))
            });
            let fallback = fallback.or_else(|| self.rows.row_at(0));
            self.selection.replace_current(fallback);
        }
        self.prune_session();
    }

    /// Expand every ancestor of the node at `path`, materializing rows as
    /// needed, and scroll it into view.
    pub fn ensure_visible(&mut self, path: &TreePath<M::Key>) -> Result<RowId> {
        for depth in 0..path.len() {
            let ancestor: TreePath<M::Key> = path.keys()[..depth].iter().cloned().collect();
            let row = self.find_row(&ancestor)?;
            if !self.rows.is_expanded(row) {
                self.expand(row);
            }
        }
        let row = self.find_row(path)?;
        self.scroll_to(row);
        Ok(row)
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_mode(&self) -> SelectionMode {
        self.selection.mode()
    }

    pub fn set_selection_mode(&mut self, mode: SelectionMode) {
        self.config.selection_mode = mode;
        self.selection.set_mode(mode);
        self.flush_selection();
    }

    pub fn current(&self) -> Option<RowId> {
        self.selection.current()
    }

    pub fn is_selected(&self, row: RowId) -> bool {
        self.selection.is_selected(row)
    }

    /// Selected rows in visible order.
    pub fn selected_rows(&self) -> Vec<RowId> {
        self.selection.selected_rows(&self.rows)
    }

    /// Veto selection of rows whose path the filter rejects.
    pub fn set_selection_filter(&mut self, filter: impl Fn(&TreePath<M::Key>) -> bool + 'static) {
        self.selection_filter = Some(Box::new(filter));
    }

    pub fn clear_selection_filter(&mut self) {
        self.selection_filter = None;
    }

    /// Whether the selection filter accepts `row`.
    pub fn can_select(&self, row: RowId) -> bool {
        allows(&self.selection_filter, &self.rows, row)
    }

    /// Make `row` the only selected row and the range anchor.
    pub fn select(&mut self, row: RowId) -> bool {
        self.try_select(row).unwrap_or_else(|err| {
            trace!("select {} ignored: {}", row, err);
            false
        })
    }

    /// Checked [`select`](Self::select). Returns whether the selection
    /// changed; a filtered or hidden row is `Ok(false)`.
    pub fn try_select(&mut self, row: RowId) -> Result<bool> {
        self.check_selectable(row)?;
        if !self.can_select(row) {
            return Ok(false);
        }
        let changed = self.selection.select(&self.rows, row);
        self.flush_selection();
        Ok(changed)
    }

    /// Flip selection of `row`, leaving other rows and the anchor alone.
    pub fn toggle(&mut self, row: RowId) -> bool {
        self.try_toggle(row).unwrap_or_else(|err| {
            trace!("toggle {} ignored: {}", row, err);
            false
        })
    }

    /// Checked [`toggle`](Self::toggle).
    pub fn try_toggle(&mut self, row: RowId) -> Result<bool> {
        self.check_selectable(row)?;
        if !self.can_select(row) {
            return Ok(false);
        }
        let changed = self.selection.toggle(&self.rows, row);
        self.flush_selection();
        Ok(changed)
    }

    fn check_selectable(&self, row: RowId) -> Result<()> {
        if self.selection.mode() == SelectionMode::None {
            return Err(TreeError::SelectionDisabled);
        }
        self.try_row(row).map(|_| ())
    }

    /// Select the visible rows from `anchor` to `target`, inclusive.
    pub fn select_range(&mut self, anchor: RowId, target: RowId) -> bool {
        let changed = self.selection.select_range(&self.rows, anchor, target, |row| {
            allows(&self.selection_filter, &self.rows, row)
        });
        self.flush_selection();
        changed
    }

    pub fn select_all(&mut self) -> bool {
        let changed = self
            .selection
            .select_all(&self.rows, |row| allows(&self.selection_filter, &self.rows, row));
        self.flush_selection();
        changed
    }

    pub fn clear_selection(&mut self) -> bool {
        let changed = self.selection.clear();
        self.flush_selection();
        changed
    }

    /// Move focus without changing the selection.
    pub fn set_current(&mut self, row: RowId) -> bool {
        let changed = self.selection.set_current(&self.rows, row);
        self.flush_selection();
        changed
    }

    /// Run `f` with selection notices batched into at most one
    /// `SelectionChanged`.
    pub fn batch_selection<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.selection.begin_batch();
        let result = f(self);
        self.selection.end_batch();
        self.flush_selection();
        result
    }

    /// Raise `Activated` for a visible row.
    pub fn activate(&mut self, row: RowId) -> bool {
        if !self.rows.is_visible(row) {
            return false;
        }
        debug!("activated {}", row);
        self.events.push(TreeEvent::Activated(row));
        true
    }

    // -------------------------------------------------------------------------
    // Viewport
    // -------------------------------------------------------------------------

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    /// Report the area the tree is drawn in, in cells.
    pub fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        let rows = (height / self.config.row_height.max(1)) as usize;
        self.viewport.set_height(rows, self.rows.len());
        self.dirty = true;
    }

    /// Scroll the minimum amount needed to show `row`.
    pub fn scroll_to(&mut self, row: RowId) -> bool {
        let Some(index) = self.rows.index_of(row) else {
            return false;
        };
        let scrolled = self.viewport.scroll_to(index, self.rows.len());
        self.dirty |= scrolled;
        scrolled
    }

    /// Scroll by `delta` rows.
    pub fn scroll_by(&mut self, delta: isize) -> bool {
        let offset = self.viewport.offset().saturating_add_signed(delta);
        let scrolled = self.viewport.set_offset(offset, self.rows.len());
        self.dirty |= scrolled;
        scrolled
    }

    /// Resolve a viewport position to the row, expander and control under it.
    pub fn hit_test(&self, x: u16, y: u16) -> Option<RowHit> {
        if x >= self.width {
            return None;
        }
        let row_height = self.config.row_height.max(1);
        let index = self.viewport.index_at(y, row_height, self.rows.len())?;
        let row = self.rows.row_at(index)?;
        let info = self.row_info(row)?;
        let bounds = self.row_bounds(index);
        let layout = self.controls.layout(&info, bounds, self.config.indent);
        Some(RowHit {
            row,
            index,
            on_expander: layout.on_expander(x, y),
            control: layout.control_at(x, y),
            fraction: (f32::from(y - bounds.y) + 0.5) / f32::from(row_height),
        })
    }

    fn row_bounds(&self, index: usize) -> Rect {
        let row_height = self.config.row_height.max(1);
        let top = index.saturating_sub(self.viewport.offset()) * row_height as usize;
        Rect::new(0, top.min(u16::MAX as usize) as u16, self.width, row_height)
    }

    /// Lay out the rows inside the viewport for painting.
    pub fn render_rows(&self) -> Vec<RenderRow<M::Key>> {
        let range = self.viewport.visible_range(self.rows.len());
        let editing = self.session.edit;
        range
            .filter_map(|index| {
                let row = self.rows.row_at(index)?;
                let info = self.row_info(row)?;
                let bounds = self.row_bounds(index);
                let layout = self.controls.layout(&info, bounds, self.config.indent);
                let draw_selection = match (info.selected, self.focused) {
                    (false, _) => DrawSelectionMode::None,
                    (true, _) if self.config.full_row_select => DrawSelectionMode::FullRowSelect,
                    (true, true) => DrawSelectionMode::Active,
                    (true, false) => DrawSelectionMode::Inactive,
                };
                let editor_owner = editing
                    .filter(|edit| edit.row == row)
                    .map(|edit| edit.control);
                let cells = layout
                    .cells
                    .iter()
                    .filter_map(|cell| {
                        let control = self.controls.get(cell.control)?;
                        Some(RenderCell {
                            control: cell.control,
                            text: truncate_to_width(
                                &control.text(&info),
                                cell.bounds.width as usize,
                            ),
                            context: DrawContext {
                                bounds: cell.bounds,
                                draw_selection,
                                draw_focus: self.focused && info.current,
                                enabled: self.enabled,
                                editor_owner,
                            },
                        })
                    })
                    .collect();
                Some(RenderRow {
                    info,
                    bounds,
                    expander: layout.expander,
                    cells,
                })
            })
            .collect()
    }

    /// Tooltip for the position; a control's own tooltip wins over the
    /// provider's.
    pub fn tooltip_at(&self, x: u16, y: u16) -> Option<String> {
        let hit = self.hit_test(x, y)?;
        let info = self.row_info(hit.row)?;
        hit.control
            .and_then(|index| self.controls.get(index))
            .and_then(|control| control.tooltip(&info))
            .or_else(|| {
                self.tooltips
                    .as_ref()
                    .and_then(|provider| provider.tooltip(&info, hit.control))
            })
    }

    // -------------------------------------------------------------------------
    // Node controls
    // -------------------------------------------------------------------------

    pub fn controls(&self) -> &NodeControls<M::Key> {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut NodeControls<M::Key> {
        self.dirty = true;
        &mut self.controls
    }

    /// Append a node control.
    pub fn add_control(&mut self, control: impl NodeControl<M::Key> + 'static) -> usize {
        self.dirty = true;
        self.controls.push(control)
    }

    pub fn set_columns(&mut self, columns: Vec<TreeColumn>) {
        self.controls.set_columns(columns);
        self.dirty = true;
    }

    pub fn set_tooltip_provider(&mut self, provider: impl ToolTipProvider<M::Key> + 'static) {
        self.tooltips = Some(Box::new(provider));
    }

    /// Whether `control` can edit the label of `row`.
    pub fn is_editable(&self, row: RowId, control: usize) -> bool {
        let Some(info) = self.row_info(row) else {
            return false;
        };
        self.controls
            .get(control)
            .is_some_and(|control| control.is_editable(&info))
    }

    pub fn first_editable(&self, row: RowId) -> Option<usize> {
        let info = self.row_info(row)?;
        self.controls.first_editable(&info)
    }

    // -------------------------------------------------------------------------
    // Input
    // -------------------------------------------------------------------------

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn session(&self) -> &InputSession {
        &self.session
    }

    /// State that would handle an unmodified event now.
    pub fn input_state(&self) -> InputStateKind {
        InputState::select(&self.session, Modifiers::NONE).kind()
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.dirty |= self.focused != focused;
        self.focused = focused;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// A disabled tree ignores input.
    pub fn set_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.cancel_gestures();
        }
        self.dirty |= self.enabled != enabled;
        self.enabled = enabled;
    }

    /// Returns `true` if the key was consumed.
    pub fn key_down(&mut self, input: &KeyInput) -> bool {
        self.dispatch(input.modifiers, |state, view, session| {
            state.key_down(view, session, input)
        })
    }

    pub fn mouse_down(&mut self, input: &MouseInput) -> bool {
        let hit = self.hit_test(input.x, input.y);
        self.dispatch(input.modifiers, |state, view, session| {
            state.mouse_down(view, session, input, hit)
        })
    }

    pub fn mouse_up(&mut self, input: &MouseInput) -> bool {
        let hit = self.hit_test(input.x, input.y);
        self.dispatch(input.modifiers, |state, view, session| {
            state.mouse_up(view, session, input, hit)
        })
    }

    /// Pointer motion with a button held.
    pub fn mouse_move(&mut self, input: &MouseInput) -> bool {
        let hit = self.hit_test(input.x, input.y);
        self.dispatch(input.modifiers, |state, view, session| {
            state.mouse_move(view, session, input, hit)
        })
    }

    pub fn pointer(&mut self, event: &PointerEvent) -> bool {
        match event {
            PointerEvent::Down(input) => self.mouse_down(input),
            PointerEvent::Up(input) => self.mouse_up(input),
            PointerEvent::Move(input) => self.mouse_move(input),
        }
    }

    /// Feed a raw terminal event. `origin` is the tree's top-left corner on
    /// screen.
    pub fn handle_crossterm(&mut self, event: &crossterm::event::Event, origin: (u16, u16)) -> bool {
        use crossterm::event::{Event, MouseEventKind};
        match event {
            Event::Key(key) => {
                KeyInput::from_crossterm(key).is_some_and(|input| self.key_down(&input))
            }
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollDown => self.scroll_by(1),
                MouseEventKind::ScrollUp => self.scroll_by(-1),
                _ => PointerEvent::from_crossterm(mouse, origin)
                    .is_some_and(|pointer| self.pointer(&pointer)),
            },
            Event::FocusGained => {
                self.set_focused(true);
                false
            }
            Event::FocusLost => {
                self.set_focused(false);
                false
            }
            _ => false,
        }
    }

    /// Lend the session to the state chosen for this event.
    fn dispatch(
        &mut self,
        modifiers: Modifiers,
        handle: impl FnOnce(InputState, &mut Self, &mut InputSession) -> bool,
    ) -> bool {
        if !self.enabled {
            return false;
        }
        let mut session = std::mem::take(&mut self.session);
        let state = InputState::select(&session, modifiers);
        let handled = handle(state, self, &mut session);
        self.session = session;
        self.prune_session();
        self.finish();
        handled
    }

    // -------------------------------------------------------------------------
    // Gesture sessions
    // -------------------------------------------------------------------------

    pub fn drag(&self) -> Option<&DragSession> {
        self.session.drag()
    }

    pub fn editing(&self) -> Option<EditSession> {
        self.session.edit().copied()
    }

    /// Open a label editor on `control` of `row`.
    pub fn begin_edit(&mut self, row: RowId, control: usize) -> Result<()> {
        self.with_session(|view, session| edit::begin(view, session, row, control))
    }

    /// Accept the open label edit.
    pub fn commit_edit(&mut self) -> Result<()> {
        self.with_session(edit::commit)
    }

    /// Abandon the open label edit.
    pub fn cancel_edit(&mut self) -> Result<()> {
        self.with_session(edit::cancel)
    }

    fn with_session<R>(&mut self, f: impl FnOnce(&mut Self, &mut InputSession) -> R) -> R {
        let mut session = std::mem::take(&mut self.session);
        let result = f(self, &mut session);
        self.session = session;
        self.finish();
        result
    }

    /// End any press, drag or edit without committing.
    fn cancel_gestures(&mut self) {
        let session = std::mem::take(&mut self.session);
        if let Some(edit) = session.edit {
            self.events.push(TreeEvent::EditCancelled {
                row: edit.row,
                control: edit.control,
            });
        }
        if session.drag.is_some() {
            self.events.push(TreeEvent::DragCancelled);
        }
    }

    /// Drop session references to rows that were released or hidden.
    fn prune_session(&mut self) {
        let rows = &self.rows;
        let (edit, drag) = self.session.retain_rows(|row| rows.is_visible(row));
        if let Some(edit) = edit {
            debug!("edit on {} cancelled, row gone", edit.row);
            self.events.push(TreeEvent::EditCancelled {
                row: edit.row,
                control: edit.control,
            });
        }
        if drag.is_some() {
            debug!("drag cancelled, dragged rows gone");
            self.events.push(TreeEvent::DragCancelled);
        }
    }

    // -------------------------------------------------------------------------
    // Host notifications
    // -------------------------------------------------------------------------

    pub(crate) fn push_event(&mut self, event: TreeEvent) {
        self.events.push(event);
        self.dirty = true;
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Take pending events, oldest first.
    pub fn drain_events(&mut self) -> Vec<TreeEvent> {
        std::mem::take(&mut self.events)
    }

    /// Check if the view needs a redraw.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag after rendering.
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}

/// Selection policy for a live row. Kept free so it can run while the
/// selection is borrowed mutably.
fn allows<K>(filter: &Option<SelectionFilter<K>>, rows: &RowLayer<K>, row: RowId) -> bool
where
    K: Clone + Eq + std::hash::Hash + std::fmt::Debug,
{
    if !rows.contains(row) {
        return false;
    }
    match filter {
        Some(filter) => rows.path(row).is_some_and(|path| filter(&path)),
        None => true,
    }
}
