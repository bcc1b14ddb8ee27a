//! Reusable terminal controls
//!
//! Each control lives in its own module with:
//! - a state struct (`*State`)
//! - rendering functions (`render_*`) returning a layout for hit testing
//! - input handling (`handle_key`, `handle_mouse`) returning control events

pub mod select_plus;

pub use select_plus::{
    render_select_plus, LabelProjection, PostRenderAction, Resolution, SearchState,
    SelectPlusColors, SelectPlusEvent, SelectPlusLayout, SelectPlusState,
};

/// Focus state shared by all controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusState {
    /// Not focused, not hovered
    #[default]
    Normal,
    /// Has keyboard focus
    Focused,
    /// Mouse is over the control
    Hovered,
    /// Control does not react to input
    Disabled,
}
