////////////////////////////////////////////////////////////////////////////////
// This file is part of "Lineage", a runtime type information library with    //
// class hierarchies, constant-time cross-casting, and typed visitors.        //
//                                                                            //
// This work is licensed under the Apache License, Version 2.0. You may       //
// obtain a copy of the License at                                            //
//                                                                            //
//     http://www.apache.org/licenses/LICENSE-2.0                             //
//                                                                            //
// Unless required by applicable law or agreed to in writing, software        //
// distributed under the License is distributed on an "AS IS" BASIS,          //
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.   //
////////////////////////////////////////////////////////////////////////////////

use std::sync::{LazyLock, RwLock, RwLockReadGuard, RwLockWriteGuard};

use ahash::{AHashMap, AHashSet};

use crate::{
    report::debug_unreachable,
    rtti::{ClassId, ClassMeta, RttiError, RttiResult},
};

/// The process-wide directed acyclic graph of registered classes.
///
/// The graph records every class's descriptor, its direct parents in
/// declaration order, and a memoized set of its transitive ancestors. Classes
/// insert themselves as a side effect of their first
/// [class_meta](crate::rtti::Class::class_meta) access; the graph supports no
/// removal and no mutation of registered nodes.
///
/// All per-instance casting bypasses this structure entirely (casts read the
/// object's own cross-pointer table). The graph serves ancestry queries,
/// diagnostics, and the ordered traversals that power
/// [visitor dispatch](crate::rtti::Visitor).
///
/// Querying an identifier that was never registered panics: such a lookup
/// always indicates a setup bug (a class's descriptor accessor was never
/// invoked), not a runtime data condition.
pub struct Hierarchy {
    inner: RwLock<HierarchyInner>,
}

#[derive(Default)]
struct HierarchyInner {
    classes: AHashMap<ClassId, &'static ClassMeta>,
    parents: AHashMap<ClassId, Vec<ClassId>>,
    roots: AHashSet<ClassId>,
    ancestors: AHashMap<ClassId, AHashSet<ClassId>>,
}

impl Hierarchy {
    /// Returns the singleton instance of the graph.
    #[inline(always)]
    pub fn global() -> &'static Self {
        static GLOBAL: LazyLock<Hierarchy> = LazyLock::new(|| Hierarchy {
            inner: RwLock::default(),
        });

        &GLOBAL
    }

    pub(crate) fn add(
        &self,
        meta: &'static ClassMeta,
        parents: &[&'static ClassMeta],
    ) -> RttiResult<()> {
        let mut inner = self.write();

        if let Some(existing) = inner.classes.get(&meta.id()).copied() {
            return Err(RttiError::DuplicateClass {
                existing,
                duplicate: meta,
            });
        }

        let mut ancestors = AHashSet::new();

        for parent in parents {
            let parent_id = parent.id();

            let Some(parent_ancestors) = inner.ancestors.get(&parent_id) else {
                // The registration front end forces parent descriptors
                // before their children.
                debug_unreachable!("Unregistered parent class.")
            };

            ancestors.extend(parent_ancestors.iter().copied());

            let _ = ancestors.insert(parent_id);
        }

        let id = meta.id();

        match parents.is_empty() {
            true => {
                let _ = inner.roots.insert(id);
            }

            false => {
                let _ = inner
                    .parents
                    .insert(id, parents.iter().map(|parent| parent.id()).collect());
            }
        }

        let _ = inner.ancestors.insert(id, ancestors);
        let _ = inner.classes.insert(id, meta);

        Ok(())
    }

    /// Returns true if `id` names a registered class.
    #[inline(always)]
    pub fn contains(&self, id: ClassId) -> bool {
        self.read().classes.contains_key(&id)
    }

    /// Returns the descriptor registered under `id`, or None if the
    /// identifier is unknown.
    #[inline(always)]
    pub fn get(&self, id: ClassId) -> Option<&'static ClassMeta> {
        self.read().classes.get(&id).copied()
    }

    /// Returns the descriptor registered under `id`.
    ///
    /// **Panics** if the identifier is unknown.
    #[inline(always)]
    pub fn class_of(&self, id: ClassId) -> &'static ClassMeta {
        match self.get(id) {
            Some(meta) => meta,
            None => panic!("{}", RttiError::UnknownClass(id)),
        }
    }

    /// Returns true if `id` names a registered class with no parents.
    ///
    /// The universal [Object](crate::rtti::Object) class is the only root in
    /// a hierarchy built through the standard registration front end.
    #[inline(always)]
    pub fn is_root(&self, id: ClassId) -> bool {
        self.read().roots.contains(&id)
    }

    /// Returns true if `ancestor` belongs to the transitive parent closure
    /// of `descendant`.
    ///
    /// This is a constant-time membership test against the ancestor set
    /// memoized at registration. A class is not its own ancestor; exact
    /// identity is checked through
    /// [is_exact](crate::rtti::Instance::is_exact) instead.
    ///
    /// **Panics** if `descendant` is unknown.
    pub fn is_ancestor(&self, descendant: ClassId, ancestor: ClassId) -> bool {
        let inner = self.read();

        let Some(ancestors) = inner.ancestors.get(&descendant) else {
            panic!("{}", RttiError::UnknownClass(descendant));
        };

        ancestors.contains(&ancestor)
    }

    /// Walks the ancestors of `start` in construction order: every parent is
    /// fully visited (in declaration order, left to right) before the node
    /// itself, so the node `start` is visited last.
    ///
    /// Ancestors shared between several derivation paths (inheritance
    /// diamonds) are visited exactly once, at their first reachability,
    /// matching the single-construction semantics of shared base classes.
    ///
    /// Returns false (and stops immediately) if `visit` returns false for
    /// some node.
    ///
    /// **Panics** if `start` is unknown.
    pub fn windup(
        &self,
        start: ClassId,
        mut visit: impl FnMut(&'static ClassMeta) -> bool,
    ) -> bool {
        for meta in self.construction_order(start) {
            if !visit(meta) {
                return false;
            }
        }

        true
    }

    /// Walks the ancestors of `start` in destruction order: the exact mirror
    /// sequence of [windup](Self::windup) over the same graph, beginning
    /// with `start` itself.
    ///
    /// Returns false (and stops immediately) if `visit` returns false for
    /// some node.
    ///
    /// **Panics** if `start` is unknown.
    pub fn unwind(
        &self,
        start: ClassId,
        mut visit: impl FnMut(&'static ClassMeta) -> bool,
    ) -> bool {
        for meta in self.construction_order(start).into_iter().rev() {
            if !visit(meta) {
                return false;
            }
        }

        true
    }

    // Snapshots the visitation order under the read lock. Callbacks run
    // after the lock is released, so they may force further registrations.
    fn construction_order(&self, start: ClassId) -> Vec<&'static ClassMeta> {
        let inner = self.read();

        if !inner.classes.contains_key(&start) {
            panic!("{}", RttiError::UnknownClass(start));
        }

        let mut visited = AHashSet::new();
        let mut order = Vec::new();

        Self::wind(&inner, start, &mut visited, &mut order);

        order
    }

    fn wind(
        inner: &HierarchyInner,
        id: ClassId,
        visited: &mut AHashSet<ClassId>,
        order: &mut Vec<&'static ClassMeta>,
    ) {
        if !visited.insert(id) {
            return;
        }

        if let Some(parents) = inner.parents.get(&id) {
            for parent in parents {
                Self::wind(inner, *parent, visited, order);
            }
        }

        let Some(meta) = inner.classes.get(&id).copied() else {
            // Edge lists only ever refer to registered classes.
            debug_unreachable!("Unregistered hierarchy node.")
        };

        order.push(meta);
    }

    #[inline(always)]
    fn read(&self) -> RwLockReadGuard<'_, HierarchyInner> {
        self.inner
            .read()
            .unwrap_or_else(|poison| poison.into_inner())
    }

    #[inline(always)]
    fn write(&self) -> RwLockWriteGuard<'_, HierarchyInner> {
        self.inner
            .write()
            .unwrap_or_else(|poison| poison.into_inner())
    }
}
