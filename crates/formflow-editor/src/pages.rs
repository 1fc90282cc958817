use formflow_spec::PageSpec;
use formflow_spec::invariants::{after_append, after_removal, after_swap, remap_page_refs};
use tracing::debug;

use crate::session::{Direction, EditorSession};

/// Page-level text fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageField {
    Title(String),
    Description(String),
}

impl EditorSession {
    /// Appends an empty page and returns its index. References to the
    /// submission sentinel keep meaning "submit".
    pub fn add_page(&mut self) -> usize {
        let old_count = self.form.pages.len();
        remap_page_refs(&mut self.form, after_append(old_count));
        self.form.pages.push(PageSpec::default());
        debug!(page = old_count, "added page");
        old_count
    }

    pub fn delete_page(&mut self, page: usize) -> bool {
        if page >= self.form.pages.len() {
            debug!(page, "delete_page: no such page");
            return false;
        }
        self.restructure(|form| {
            form.pages.remove(page);
            remap_page_refs(form, after_removal(page));
        });
        debug!(page, "deleted page");
        true
    }

    pub fn move_page(&mut self, page: usize, direction: Direction) -> bool {
        let Some(other) = direction.neighbour(page, self.form.pages.len()) else {
            debug!(page, ?direction, "move_page: nothing to swap with");
            return false;
        };
        self.restructure(|form| {
            form.pages.swap(page, other);
            remap_page_refs(form, after_swap(page, other));
        });
        debug!(from = page, to = other, "moved page");
        true
    }

    /// Overrides the page's linear successor. `target` may be the submission
    /// sentinel (page count); the default successor is stored implicitly.
    pub fn adjust_linear_next_page(&mut self, page: usize, target: usize) -> bool {
        let page_count = self.form.pages.len();
        let Some(slot) = self.form.pages.get_mut(page) else {
            return false;
        };
        if target > page_count {
            debug!(page, target, "adjust_linear_next_page: target out of range");
            return false;
        }
        slot.next_page = (target != page + 1).then_some(target);
        true
    }

    pub fn change_page_field(&mut self, page: usize, field: PageField) -> bool {
        let Some(slot) = self.form.pages.get_mut(page) else {
            return false;
        };
        match field {
            PageField::Title(title) => slot.title = title,
            PageField::Description(description) => slot.description = description,
        }
        true
    }
}
