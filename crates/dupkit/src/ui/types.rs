//! Types and enums used across the UI

use crate::model::ToolData;
use crate::tools::ToolKind;
use crate::ui::rows::SortSpec;
use crate::ui::select::Selection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Results,
    Help,
    SelectMenu,
    ConfirmDelete,
    MoveDialog,
    RenameDialog,
    SaveDialog,
    Logs,
}

#[derive(Debug, Clone, Default)]
pub struct ScanProgress {
    pub current_step: u32,
    pub total_steps: u32,
    pub step_label: String,
}

/// Everything one tool owns: its canonical data plus its view state.
/// Selection, sort, and filter survive tool switches because each tool has
/// its own copy; nothing bleeds across tools.
#[derive(Debug, Clone)]
pub struct ToolState {
    pub data: ToolData,
    pub selection: Selection,
    pub sort: Option<SortSpec>,
    pub filter: String,
}

impl ToolState {
    pub fn new(tool: ToolKind) -> Self {
        let data = if tool.is_grouped() {
            ToolData::Grouped(Vec::new())
        } else {
            ToolData::Flat(Vec::new())
        };
        Self {
            data,
            selection: Selection::default(),
            sort: None,
            filter: String::new(),
        }
    }
}
