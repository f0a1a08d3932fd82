//! Declarative "simple UI" sub-protocol.
//!
//! An operation that has no bespoke GUI needs may declare an ordered list of
//! typed UI elements instead of supplying `gui_init`/`gui_update`. The
//! registration path synthesizes generic init/update callbacks from that
//! list and packs one 4-byte slot per element into the parameter block, so
//! simple operations carry no hand-written UI glue at all.

use smallvec::SmallVec;

use crate::ops::provider::{GuiInitFn, GuiUpdateFn, InitFn, OperationInit};
use crate::params::block::ParamBlock;

/// One declared UI element of a simple operation.
#[derive(Clone, Debug)]
pub enum UiElement {
    /// Continuous value slider; the slot is stored as `f32`.
    Slider {
        /// Display label.
        label: String,
        /// Stable element id; synthesized from the index when `None`.
        id: Option<String>,
        /// Lower bound.
        min: f32,
        /// Upper bound.
        max: f32,
        /// UI step size.
        step: f32,
        /// Default value, used to initialize the parameter slot.
        default: f32,
        /// Display digits.
        digits: u8,
    },
    /// Enumerated choice; the slot is stored as an `i32` index.
    Combobox {
        /// Display label.
        label: String,
        /// Stable element id; synthesized from the index when `None`.
        id: Option<String>,
        /// Choice labels in order.
        entries: Vec<String>,
        /// Default index.
        default: i32,
    },
    /// Momentary action button; the slot is unused but still reserved.
    Button {
        /// Display label.
        label: String,
        /// Stable element id; synthesized from the index when `None`.
        id: Option<String>,
    },
    /// Two-state toggle; the slot is stored as `i32` 0/1.
    Toggle {
        /// Display label.
        label: String,
        /// Stable element id; synthesized from the index when `None`.
        id: Option<String>,
        /// Default state.
        default: bool,
    },
}

impl UiElement {
    fn label(&self) -> &str {
        match self {
            UiElement::Slider { label, .. }
            | UiElement::Combobox { label, .. }
            | UiElement::Button { label, .. }
            | UiElement::Toggle { label, .. } => label,
        }
    }

    fn id(&self) -> Option<&str> {
        match self {
            UiElement::Slider { id, .. }
            | UiElement::Combobox { id, .. }
            | UiElement::Button { id, .. }
            | UiElement::Toggle { id, .. } => id.as_deref(),
        }
    }
}

/// Ordered element list declared by a simple operation.
#[derive(Clone, Debug, Default)]
pub struct SimpleUi {
    /// Declared elements, one parameter slot each.
    pub elements: SmallVec<[UiElement; 8]>,
}

impl SimpleUi {
    /// Parameter-block size implied by the element list: one 4-byte slot
    /// per element.
    pub fn params_size(&self) -> usize {
        self.elements.len() * 4
    }

    /// Pack every element's declared default into a fresh block.
    pub fn packed_defaults(&self) -> ParamBlock {
        let mut block = ParamBlock::zeroed(self.params_size());
        for (slot, el) in self.elements.iter().enumerate() {
            match el {
                UiElement::Slider { default, .. } => block.write_f32_slot(slot, *default),
                UiElement::Combobox { default, .. } => block.write_i32_slot(slot, *default),
                UiElement::Button { .. } => block.write_i32_slot(slot, 0),
                UiElement::Toggle { default, .. } => {
                    block.write_i32_slot(slot, i32::from(*default))
                }
            }
        }
        block
    }
}

/// Current value of one synthesized control.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UiValue {
    /// Slider position.
    Float(f32),
    /// Combobox index.
    Index(i32),
    /// Toggle state.
    Toggle(bool),
    /// Stateless action button.
    Action,
}

/// One control of a synthesized panel.
#[derive(Clone, Debug, PartialEq)]
pub struct UiControl {
    /// Stable control id.
    pub id: String,
    /// Display label.
    pub label: String,
    /// Current value.
    pub value: UiValue,
}

/// GUI-facing model of a module's controls.
///
/// This is the whole GUI contract of the core: external widget toolkits
/// render a panel and feed edits back through session edit operations.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UiPanel {
    /// Controls in declaration order.
    pub controls: Vec<UiControl>,
}

fn control_value(el: &UiElement, params: &ParamBlock, slot: usize) -> UiValue {
    match el {
        UiElement::Slider { .. } => UiValue::Float(params.read_f32_slot(slot)),
        UiElement::Combobox { .. } => UiValue::Index(params.read_i32_slot(slot)),
        UiElement::Toggle { .. } => UiValue::Toggle(params.read_i32_slot(slot) != 0),
        UiElement::Button { .. } => UiValue::Action,
    }
}

fn control_id(op: &str, el: &UiElement, slot: usize) -> String {
    match el.id() {
        Some(id) => id.to_string(),
        None => format!("{op}_control_{slot}"),
    }
}

/// Synthesize the `init` entry point from a declared element list.
///
/// The packed defaults seed the [`OperationInit`]; a chained hand-written
/// `init` (when the unit also exports one) runs afterwards and may adjust
/// the result.
pub(crate) fn synth_init(ui: SimpleUi) -> InitFn {
    std::sync::Arc::new(move |mut seed: OperationInit| {
        seed.default_params = ui.packed_defaults();
        seed
    })
}

/// Synthesize `gui_init` from a declared element list.
pub(crate) fn synth_gui_init(op: String, ui: SimpleUi) -> GuiInitFn {
    std::sync::Arc::new(move |params: &ParamBlock| {
        let controls = ui
            .elements
            .iter()
            .enumerate()
            .map(|(slot, el)| UiControl {
                id: control_id(&op, el, slot),
                label: el.label().to_string(),
                value: control_value(el, params, slot),
            })
            .collect();
        UiPanel { controls }
    })
}

/// Synthesize `gui_update` from a declared element list.
pub(crate) fn synth_gui_update(ui: SimpleUi) -> GuiUpdateFn {
    std::sync::Arc::new(move |panel: &mut UiPanel, params: &ParamBlock| {
        for (slot, (el, control)) in ui.elements.iter().zip(panel.controls.iter_mut()).enumerate()
        {
            control.value = control_value(el, params, slot);
        }
    })
}

#[cfg(test)]
#[path = "../../tests/unit/ops/simple.rs"]
mod tests;
