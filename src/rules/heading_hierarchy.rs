//! Outline tree recovered from a flat heading list.
//!
//! The parent of a heading is the nearest preceding heading with a strictly
//! lower level. Parents are found in one pass with a stack of open ancestors,
//! and the tree is stored as an index arena: `parents[i]` points into
//! `headings`, never the other way round.

use super::heading_utils::{Heading, HeadingPrefix};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct HeadingOutline {
    headings: Vec<Heading>,
    prefixes: Vec<HeadingPrefix>,
    parents: Vec<Option<usize>>,
    /// Sibling group id for each heading
    group_of: Vec<usize>,
    /// Members of each sibling group, in line order
    groups: Vec<Vec<usize>>,
}

/// Parent index for each heading, headings assumed sorted by line
pub fn parent_indices(levels: impl IntoIterator<Item = usize>) -> Vec<Option<usize>> {
    let mut stack: Vec<(usize, usize)> = Vec::new();
    let mut parents = Vec::new();

    for (index, level) in levels.into_iter().enumerate() {
        while stack.last().is_some_and(|&(open_level, _)| open_level >= level) {
            stack.pop();
        }
        parents.push(stack.last().map(|&(_, idx)| idx));
        stack.push((level, index));
    }

    parents
}

impl HeadingOutline {
    pub fn build(mut headings: Vec<Heading>) -> Self {
        headings.sort_by_key(|h| h.line);

        let parents = parent_indices(headings.iter().map(|h| h.level));
        let prefixes: Vec<HeadingPrefix> = headings.iter().map(Heading::prefix).collect();

        let mut group_ids: HashMap<(Option<usize>, usize), usize> = HashMap::new();
        let mut groups: Vec<Vec<usize>> = Vec::new();
        let mut group_of = Vec::with_capacity(headings.len());

        for (idx, heading) in headings.iter().enumerate() {
            let key = (parents[idx], heading.level);
            let group = *group_ids.entry(key).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[group].push(idx);
            group_of.push(group);
        }

        Self {
            headings,
            prefixes,
            parents,
            group_of,
            groups,
        }
    }

    pub fn len(&self) -> usize {
        self.headings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headings.is_empty()
    }

    pub fn headings(&self) -> &[Heading] {
        &self.headings
    }

    pub fn heading(&self, idx: usize) -> &Heading {
        &self.headings[idx]
    }

    pub fn prefix(&self, idx: usize) -> &HeadingPrefix {
        &self.prefixes[idx]
    }

    pub fn parent(&self, idx: usize) -> Option<usize> {
        self.parents[idx]
    }

    pub fn parents(&self) -> &[Option<usize>] {
        &self.parents
    }

    /// Same parent and same level as `idx`, in line order, `idx` included
    pub fn siblings(&self, idx: usize) -> &[usize] {
        &self.groups[self.group_of[idx]]
    }

    /// Position of `idx` within its sibling group
    pub fn sibling_position(&self, idx: usize) -> usize {
        self.siblings(idx).iter().position(|&s| s == idx).unwrap_or(0)
    }

    /// First sibling of `idx` carrying a numbering prefix
    pub fn first_numbered_sibling(&self, idx: usize) -> Option<usize> {
        self.siblings(idx).iter().copied().find(|&s| self.prefixes[s].is_numbered())
    }

    /// Level that numbering under `idx` counts from.
    ///
    /// Walks up through numbered ancestors to the nearest unnumbered one and
    /// returns its level. When the chain reaches the top without one, numbering
    /// counts from level 1, except that a numbered level-1 heading roots its
    /// chain at 0 so `# 1` / `## 1.1` documents are consistent.
    pub fn numbering_root_level(&self, idx: usize) -> usize {
        let mut current = idx;
        while let Some(parent) = self.parents[current] {
            if !self.prefixes[parent].is_numbered() {
                return self.headings[parent].level;
            }
            current = parent;
        }

        if self.headings[current].level == 1 && self.prefixes[current].is_numbered() {
            0
        } else {
            1
        }
    }
}
