//! Input state machine.
//!
//! Every key or mouse edge is routed to exactly one [`InputState`], picked
//! from the live modifier flags and the gesture session at the time of the
//! event. Label editing and dragging are sticky: they own all input until
//! they commit, cancel, or drop. Otherwise Shift, then Ctrl, then plain
//! input decides.

mod control;
mod drag;
pub(crate) mod edit;
mod event;
mod normal;
mod session;
mod shift;

pub use control::ControlInput;
pub use drag::DragInput;
pub use edit::EditInput;
pub use event::{Key, KeyInput, Modifiers, MouseButton, MouseInput, PointerEvent, RowHit};
pub use normal::NormalInput;
pub use session::{DragSession, EditSession, InputSession, Press};
pub use shift::ShiftInput;

use log::trace;

use crate::model::TreeModel;
use crate::view::TreeView;

/// Which state handles input right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputStateKind {
    #[default]
    Normal,
    WithShift,
    WithControl,
    Dragging,
    Editing,
}

/// Capability set shared by every input state.
///
/// Each method returns `true` when the event was consumed.
pub trait InputHandler {
    fn key_down<M: TreeModel>(
        &self,
        view: &mut TreeView<M>,
        session: &mut InputSession,
        input: &KeyInput,
    ) -> bool;

    fn mouse_down<M: TreeModel>(
        &self,
        view: &mut TreeView<M>,
        session: &mut InputSession,
        input: &MouseInput,
        hit: Option<RowHit>,
    ) -> bool;

    fn mouse_up<M: TreeModel>(
        &self,
        view: &mut TreeView<M>,
        session: &mut InputSession,
        input: &MouseInput,
        hit: Option<RowHit>,
    ) -> bool;

    fn mouse_move<M: TreeModel>(
        &self,
        _view: &mut TreeView<M>,
        _session: &mut InputSession,
        _input: &MouseInput,
        _hit: Option<RowHit>,
    ) -> bool {
        false
    }
}

/// The state chosen for one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputState {
    Normal(NormalInput),
    WithShift(ShiftInput),
    WithControl(ControlInput),
    Dragging(DragInput),
    Editing(EditInput),
}

impl InputState {
    /// Pick the state for an event carrying `modifiers`.
    pub fn select(session: &InputSession, modifiers: Modifiers) -> Self {
        if session.edit.is_some() {
            InputState::Editing(EditInput)
        } else if session.drag.is_some() {
            InputState::Dragging(DragInput)
        } else if modifiers.shift {
            InputState::WithShift(ShiftInput)
        } else if modifiers.ctrl {
            InputState::WithControl(ControlInput)
        } else {
            InputState::Normal(NormalInput)
        }
    }

    pub fn kind(&self) -> InputStateKind {
        match self {
            InputState::Normal(_) => InputStateKind::Normal,
            InputState::WithShift(_) => InputStateKind::WithShift,
            InputState::WithControl(_) => InputStateKind::WithControl,
            InputState::Dragging(_) => InputStateKind::Dragging,
            InputState::Editing(_) => InputStateKind::Editing,
        }
    }
}

impl InputHandler for InputState {
    fn key_down<M: TreeModel>(
        &self,
        view: &mut TreeView<M>,
        session: &mut InputSession,
        input: &KeyInput,
    ) -> bool {
        trace!("{:?} key_down {:?}", self.kind(), input);
        match self {
            InputState::Normal(state) => state.key_down(view, session, input),
            InputState::WithShift(state) => state.key_down(view, session, input),
            InputState::WithControl(state) => state.key_down(view, session, input),
            InputState::Dragging(state) => state.key_down(view, session, input),
            InputState::Editing(state) => state.key_down(view, session, input),
        }
    }

    fn mouse_down<M: TreeModel>(
        &self,
        view: &mut TreeView<M>,
        session: &mut InputSession,
        input: &MouseInput,
        hit: Option<RowHit>,
    ) -> bool {
        trace!("{:?} mouse_down {:?} on {:?}", self.kind(), input, hit);
        match self {
            InputState::Normal(state) => state.mouse_down(view, session, input, hit),
            InputState::WithShift(state) => state.mouse_down(view, session, input, hit),
            InputState::WithControl(state) => state.mouse_down(view, session, input, hit),
            InputState::Dragging(state) => state.mouse_down(view, session, input, hit),
            InputState::Editing(state) => state.mouse_down(view, session, input, hit),
        }
    }

    fn mouse_up<M: TreeModel>(
        &self,
        view: &mut TreeView<M>,
        session: &mut InputSession,
        input: &MouseInput,
        hit: Option<RowHit>,
    ) -> bool {
        trace!("{:?} mouse_up {:?} on {:?}", self.kind(), input, hit);
        match self {
            InputState::Normal(state) => state.mouse_up(view, session, input, hit),
            InputState::WithShift(state) => state.mouse_up(view, session, input, hit),
            InputState::WithControl(state) => state.mouse_up(view, session, input, hit),
            InputState::Dragging(state) => state.mouse_up(view, session, input, hit),
            InputState::Editing(state) => state.mouse_up(view, session, input, hit),
        }
    }

    fn mouse_move<M: TreeModel>(
        &self,
        view: &mut TreeView<M>,
        session: &mut InputSession,
        input: &MouseInput,
        hit: Option<RowHit>,
    ) -> bool {
        match self {
            InputState::Normal(state) => state.mouse_move(view, session, input, hit),
            InputState::WithShift(state) => state.mouse_move(view, session, input, hit),
            InputState::WithControl(state) => state.mouse_move(view, session, input, hit),
            InputState::Dragging(state) => state.mouse_move(view, session, input, hit),
            InputState::Editing(state) => state.mouse_move(view, session, input, hit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rows::RowId;

    #[test]
    fn test_state_follows_modifiers() {
        let session = InputSession::default();
        assert_eq!(
            InputState::select(&session, Modifiers::NONE).kind(),
            InputStateKind::Normal
        );
        assert_eq!(
            InputState::select(&session, Modifiers::SHIFT).kind(),
            InputStateKind::WithShift
        );
        assert_eq!(
            InputState::select(&session, Modifiers::CTRL).kind(),
            InputStateKind::WithControl
        );
        let both = Modifiers {
            shift: true,
            ctrl: true,
            alt: false,
        };
        assert_eq!(
            InputState::select(&session, both).kind(),
            InputStateKind::WithShift
        );
    }

    #[test]
    fn test_sticky_states_win() {
        let mut session = InputSession {
            drag: Some(DragSession {
                rows: vec![RowId::fixture(1)],
                target: None,
            }),
            ..Default::default()
        };
        assert_eq!(
            InputState::select(&session, Modifiers::SHIFT).kind(),
            InputStateKind::Dragging
        );
        session.edit = Some(EditSession {
            row: RowId::fixture(1),
            control: 0,
        });
        assert_eq!(
            InputState::select(&session, Modifiers::NONE).kind(),
            InputStateKind::Editing
        );
    }

    #[test]
    fn test_retain_rows_reports_lost_sessions() {
        let kept = RowId::fixture(1);
        let gone = RowId::fixture(2);
        let mut session = InputSession {
            press: None,
            drag: Some(DragSession {
                rows: vec![kept, gone],
                target: None,
            }),
            edit: Some(EditSession {
                row: gone,
                control: 0,
            }),
        };
        let (edit, drag) = session.retain_rows(|row| row == kept);
        assert_eq!(edit.map(|e| e.row), Some(gone));
        assert!(drag.is_none());
        assert_eq!(session.drag().map(|d| d.rows.clone()), Some(vec![kept]));
    }
}
