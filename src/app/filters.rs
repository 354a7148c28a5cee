//! Search filtering for the workshop list

use super::App;
use crate::workshop::filter_files;

/// What a click on a list row asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListAction {
    Select(usize),
    /// Double-click: select the row and activate its map
    Activate(usize),
}

impl ListAction {
    pub fn from_row(idx: usize, clicked: bool, double_clicked: bool) -> Option<Self> {
        if double_clicked {
            Some(Self::Activate(idx))
        } else if clicked {
            Some(Self::Select(idx))
        } else {
            None
        }
    }
}

impl App {
    /// Rebuild the visible list from the search box. The highlight is cleared because
    /// row indices no longer line up with the previous list.
    pub fn apply_search(&mut self) {
        self.files = filter_files(&self.all_files, self.search_query.trim());
        self.selected = None;
    }

    pub fn select(&mut self, idx: usize) {
        if idx < self.files.len() {
            self.selected = Some(idx);
        }
    }

    pub fn handle_list_action(&mut self, action: ListAction) {
        match action {
            ListAction::Select(idx) => self.select(idx),
            ListAction::Activate(idx) => {
                self.select(idx);
                self.activate_selected();
            }
        }
    }
}
