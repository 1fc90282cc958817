//! Helpers that re-establish document invariants after structural edits.

use std::collections::BTreeMap;

use crate::spec::form::FormSpec;

/// Question each branch rule was keyed on before an edit, by branch id.
///
/// Capture before reordering or moving questions, restore afterwards: rules
/// follow their question to its new page-local position, and rules whose
/// question left the owning page are dropped.
#[derive(Debug, Clone, Default)]
pub struct BranchAnchors {
    anchors: BTreeMap<String, String>,
}

impl BranchAnchors {
    pub fn capture(form: &FormSpec) -> Self {
        let mut anchors = BTreeMap::new();
        for page in &form.pages {
            for branch in &page.branches {
                if let Some(question) = page.question_by_number(branch.question_number) {
                    anchors.insert(branch.id.clone(), question.id.clone());
                }
            }
        }
        Self { anchors }
    }

    /// Rewrites rule numbers against the current layout and returns the ids of
    /// the rules that were dropped.
    pub fn restore(self, form: &mut FormSpec) -> Vec<String> {
        let mut dropped = Vec::new();
        for page in &mut form.pages {
            let positions: BTreeMap<&str, usize> = page
                .questions
                .iter()
                .enumerate()
                .map(|(idx, question)| (question.id.as_str(), idx + 1))
                .collect();
            page.branches.retain_mut(|branch| {
                // Rules that never resolved are left for `validate` to report.
                let Some(question_id) = self.anchors.get(&branch.id) else {
                    return true;
                };
                match positions.get(question_id.as_str()) {
                    Some(position) => {
                        branch.question_number = *position;
                        true
                    }
                    None => {
                        dropped.push(branch.id.clone());
                        false
                    }
                }
            });
        }
        dropped
    }
}

/// Applies `map` to every page reference held by the form: branch targets and
/// explicit linear fallbacks.
pub fn remap_page_refs(form: &mut FormSpec, map: impl Fn(usize) -> usize) {
    for page in &mut form.pages {
        if let Some(next) = page.next_page.as_mut() {
            *next = map(*next);
        }
        for branch in &mut page.branches {
            branch.target_page = map(branch.target_page);
        }
    }
}

/// Page reference mapping after removing the page at `removed`. References to
/// the removed page land on the page that slides into its slot.
pub fn after_removal(removed: usize) -> impl Fn(usize) -> usize {
    move |page| if page > removed { page - 1 } else { page }
}

/// Page reference mapping after appending a page to a form that had
/// `old_count` pages; the submission sentinel stays the sentinel.
pub fn after_append(old_count: usize) -> impl Fn(usize) -> usize {
    move |page| if page >= old_count { page + 1 } else { page }
}

/// Page reference mapping after swapping pages `a` and `b`.
pub fn after_swap(a: usize, b: usize) -> impl Fn(usize) -> usize {
    move |page| {
        if page == a {
            b
        } else if page == b {
            a
        } else {
            page
        }
    }
}
