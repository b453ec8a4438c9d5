//! Positional editing of compilation units.
//!
//! Edits address members by [`MemberPath`] in the *original* tree. The
//! editor collects them, checks that they do not overlap, and rebuilds only
//! the member lists on the paths it touches; every other subtree is shared
//! with the original.

use std::collections::BTreeMap;
use std::fmt;

use tracing::trace;

use crate::error::SyntaxError;
use crate::nodes::{CompilationUnit, Member};

/// Index path from the compilation unit to a member.
///
/// `[2, 0]` is the first member of the third top-level member.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct MemberPath(Vec<usize>);

impl MemberPath {
    /// Creates a path from its indices.
    #[must_use]
    pub const fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    /// The empty path denoting the compilation unit itself.
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Returns the indices.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Number of indices.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Returns the path of the `index`-th child.
    #[must_use]
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// Returns the parent path, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let (_, parent) = self.0.split_last()?;
        Some(Self(parent.to_vec()))
    }

    /// Whether `self` equals `ancestor` or lies beneath it.
    #[must_use]
    pub fn starts_with(&self, ancestor: &Self) -> bool {
        self.0.starts_with(&ancestor.0)
    }
}

impl fmt::Display for MemberPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("/")?;
        let mut first = true;
        for index in &self.0 {
            if !first {
                f.write_str("/")?;
            }
            write!(f, "{index}")?;
            first = false;
        }
        Ok(())
    }
}

/// A single edit against the original tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxEdit {
    /// Replace the member at `target` with `node`.
    Replace {
        /// The member being replaced.
        target: MemberPath,
        /// Its replacement.
        node: Member,
    },
    /// Insert `node` as a sibling immediately before `anchor`.
    InsertBefore {
        /// The member the new node precedes.
        anchor: MemberPath,
        /// The inserted member.
        node: Member,
    },
}

impl SyntaxEdit {
    /// The path the edit refers to.
    #[must_use]
    pub const fn path(&self) -> &MemberPath {
        match self {
            Self::Replace { target, .. } => target,
            Self::InsertBefore { anchor, .. } => anchor,
        }
    }

    /// The node the edit introduces.
    #[must_use]
    pub const fn node(&self) -> &Member {
        match self {
            Self::Replace { node, .. } | Self::InsertBefore { node, .. } => node,
        }
    }
}

#[derive(Debug, Default)]
struct PendingEdits {
    inserts: Vec<Member>,
    replacement: Option<Member>,
}

/// Collects edits against one compilation unit and applies them together.
#[derive(Debug)]
pub struct SyntaxEditor {
    original: CompilationUnit,
    edits: BTreeMap<MemberPath, PendingEdits>,
}

impl SyntaxEditor {
    /// Starts an editing session over `original`.
    #[must_use]
    pub fn new(original: CompilationUnit) -> Self {
        Self {
            original,
            edits: BTreeMap::new(),
        }
    }

    /// Returns the tree the edits refer to.
    #[must_use]
    pub const fn original(&self) -> &CompilationUnit {
        &self.original
    }

    /// Records a replacement.
    ///
    /// # Errors
    ///
    /// Fails if `target` does not exist, is already replaced, or overlaps a
    /// replaced ancestor or descendant.
    pub fn replace(&mut self, target: MemberPath, node: Member) -> Result<(), SyntaxError> {
        self.ensure_exists(&target)?;
        if let Some(ancestor) = self.replaced_ancestor(&target) {
            return Err(SyntaxError::conflicting_edits(
                target,
                format!("an enclosing member at {ancestor} is already replaced"),
            ));
        }
        let has_descendant_edit = self
            .edits
            .keys()
            .any(|path| path != &target && path.starts_with(&target));
        if has_descendant_edit {
            return Err(SyntaxError::conflicting_edits(
                target,
                "a nested member is already edited",
            ));
        }
        let pending = self.edits.entry(target.clone()).or_default();
        if pending.replacement.is_some() {
            return Err(SyntaxError::conflicting_edits(
                target,
                "the member is already replaced",
            ));
        }
        trace!(path = %target, "recorded replacement");
        pending.replacement = Some(node);
        Ok(())
    }

    /// Records an insertion before `anchor`.
    ///
    /// Several insertions before one anchor keep the order they were
    /// recorded in; all of them precede the anchor or its replacement.
    ///
    /// # Errors
    ///
    /// Fails if `anchor` does not exist or lies inside a replaced member.
    pub fn insert_before(&mut self, anchor: MemberPath, node: Member) -> Result<(), SyntaxError> {
        self.ensure_exists(&anchor)?;
        if let Some(ancestor) = self.replaced_ancestor(&anchor) {
            return Err(SyntaxError::conflicting_edits(
                anchor,
                format!("an enclosing member at {ancestor} is already replaced"),
            ));
        }
        trace!(path = %anchor, "recorded insertion");
        self.edits.entry(anchor).or_default().inserts.push(node);
        Ok(())
    }

    /// Records an edit value.
    ///
    /// # Errors
    ///
    /// Propagates the errors of [`Self::replace`] and [`Self::insert_before`].
    pub fn apply(&mut self, edit: SyntaxEdit) -> Result<(), SyntaxError> {
        match edit {
            SyntaxEdit::Replace { target, node } => self.replace(target, node),
            SyntaxEdit::InsertBefore { anchor, node } => self.insert_before(anchor, node),
        }
    }

    /// Records several edits in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Propagates the first failing edit's error.
    pub fn apply_all(
        &mut self,
        edits: impl IntoIterator<Item = SyntaxEdit>,
    ) -> Result<(), SyntaxError> {
        edits.into_iter().try_for_each(|edit| self.apply(edit))
    }

    /// Builds the edited tree.
    #[must_use]
    pub fn finish(self) -> CompilationUnit {
        if self.edits.is_empty() {
            return self.original;
        }
        let members = rebuild(self.original.members(), &MemberPath::root(), &self.edits);
        trace!(edits = self.edits.len(), "applied syntax edits");
        self.original.with_members(members)
    }

    fn ensure_exists(&self, path: &MemberPath) -> Result<(), SyntaxError> {
        match self.original.member(path) {
            Some(_) => Ok(()),
            None => Err(SyntaxError::missing_edit_target(path.clone())),
        }
    }

    fn replaced_ancestor(&self, path: &MemberPath) -> Option<&MemberPath> {
        self.edits.iter().find_map(|(candidate, pending)| {
            let encloses = candidate != path && path.starts_with(candidate);
            (encloses && pending.replacement.is_some()).then_some(candidate)
        })
    }
}

fn rebuild(
    members: &[Member],
    prefix: &MemberPath,
    edits: &BTreeMap<MemberPath, PendingEdits>,
) -> Vec<Member> {
    let mut rebuilt = Vec::with_capacity(members.len());
    for (index, member) in members.iter().enumerate() {
        let path = prefix.child(index);
        let pending = edits.get(&path);
        if let Some(pending) = pending {
            rebuilt.extend(pending.inserts.iter().cloned());
        }
        if let Some(replacement) = pending.and_then(|pending| pending.replacement.as_ref()) {
            rebuilt.push(replacement.clone());
            continue;
        }
        let touches_children = edits
            .keys()
            .any(|edited| edited != &path && edited.starts_with(&path));
        if touches_children {
            rebuilt.push(member.with_members(rebuild(member.members(), &path, edits)));
        } else {
            rebuilt.push(member.clone());
        }
    }
    rebuilt
}

/// Applies a batch of edits to `unit` in one session.
///
/// # Errors
///
/// Returns the first invalid or conflicting edit.
pub fn apply_edits(
    unit: &CompilationUnit,
    edits: impl IntoIterator<Item = SyntaxEdit>,
) -> Result<CompilationUnit, SyntaxError> {
    let mut editor = SyntaxEditor::new(unit.clone());
    editor.apply_all(edits)?;
    Ok(editor.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_order_depth_first() {
        let mut paths = vec![
            MemberPath::new(vec![1]),
            MemberPath::new(vec![0, 2]),
            MemberPath::new(vec![0]),
        ];
        paths.sort();
        let rendered: Vec<String> = paths.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["/0", "/0/2", "/1"]);
    }

    #[test]
    fn starts_with_includes_self() {
        let path = MemberPath::new(vec![0, 1]);
        assert!(path.starts_with(&path));
        assert!(path.starts_with(&MemberPath::new(vec![0])));
        assert!(!MemberPath::new(vec![0]).starts_with(&path));
        assert_eq!(path.parent(), Some(MemberPath::new(vec![0])));
        assert_eq!(MemberPath::root().parent(), None);
    }
}
