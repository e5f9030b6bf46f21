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

use std::{
    collections::{btree_map::Entry, BTreeMap},
    fmt::{Debug, Formatter},
    mem::ManuallyDrop,
    ops::{Deref, DerefMut},
    ptr,
    ptr::NonNull,
    sync::LazyLock,
};

use crate::rtti::{Class, ClassId, ClassMeta, RttiError};

/// The universal root of the class hierarchy.
///
/// Every class registered with an empty parent list attaches under this node,
/// so all registered classes share a single common ancestor. The class
/// carries no state; in an instance's cross-pointer table, its entry aliases
/// the base address of the complete object.
pub struct Object;

impl Class for Object {
    const NAME: &'static str = "Object";

    fn class_meta() -> &'static ClassMeta {
        static META: LazyLock<&'static ClassMeta> =
            LazyLock::new(|| ClassMeta::register_root(Object::NAME, Object::CLASS_ID));

        *META
    }
}

impl Layer for Object {
    #[inline(always)]
    fn mount(&mut self, table: &mut CrossPtrs) {
        table.record(self);
    }
}

/// A class whose values can serve as layers of a complete object.
///
/// Implementations are normally generated by the [rtti](crate::rtti!) macro.
/// The mounting contract is strict: `mount` must first mount every declared
/// parent layer (in declaration order), then [record](CrossPtrs::record)
/// itself, and nothing else. The recursion bottoms out at root classes,
/// which record themselves immediately.
pub trait Layer: Class {
    /// Registers this layer and all of its parent layers in the instance's
    /// cross-pointer table.
    fn mount(&mut self, table: &mut CrossPtrs);
}

/// The per-instance cross-pointer table.
///
/// The table maps the [ClassId] of every layer of a complete object to the
/// address of that layer inside the object, and tracks the most derived
/// class recorded so far. It is populated exactly once, during
/// [Instance::new], by the mounting protocol; both cast forms are ordinary
/// lookups into this table and never consult the global hierarchy.
pub struct CrossPtrs {
    rtti: &'static ClassMeta,
    base: NonNull<()>,
    table: BTreeMap<ClassId, NonNull<()>>,
}

impl Debug for CrossPtrs {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_fmt(format_args!(
            "CrossPtrs(rtti: {:?}, layers: {})",
            self.rtti,
            self.table.len(),
        ))
    }
}

impl CrossPtrs {
    fn seed(base: NonNull<()>) -> Self {
        let mut table = BTreeMap::new();

        let _ = table.insert(Object::CLASS_ID, base);

        Self {
            rtti: Object::class_meta(),
            base,
            table,
        }
    }

    /// Records `layer` as the currently most derived layer of the object
    /// under construction.
    ///
    /// A class already present in the table is skipped entirely: a base
    /// shared between several derivation paths keeps the address and
    /// identity recorded at its first reachability.
    pub fn record<T: Class>(&mut self, layer: &mut T) {
        let meta = T::class_meta();

        match self.table.entry(meta.id()) {
            Entry::Occupied(_) => (),

            Entry::Vacant(entry) => {
                let _ = entry.insert(NonNull::from(layer).cast());

                self.rtti = meta;
            }
        }
    }

    /// Returns the descriptor of the most derived class recorded so far.
    ///
    /// During mounting this is the identity of the partially constructed
    /// object; once [Instance::new] returns, it is the exact dynamic class
    /// of the complete object and never changes again.
    #[inline(always)]
    pub fn rtti(&self) -> &'static ClassMeta {
        self.rtti
    }

    #[inline(always)]
    fn lookup(&self, id: ClassId) -> Option<NonNull<()>> {
        self.table.get(&id).copied()
    }
}

/// A heap-allocated complete object with a cross-pointer table.
///
/// The instance owns a value of the most derived class `T` and the table
/// mapping every layer class of `T` to the address of that layer. Both cast
/// forms run in a single table lookup, independently of the hierarchy depth.
///
/// The instance dereferences to `T`, so the most derived interface is
/// available without casting.
///
/// The allocation is held as a raw pointer rather than a `Box`: every
/// reference the instance hands out (through `Deref` or through a cast)
/// derives from that one pointer, so the table's cross pointers stay valid
/// under moves of the instance and under any interleaving of casts and
/// dereferences.
pub struct Instance<T: Layer> {
    table: CrossPtrs,
    value: NonNull<T>,
}

// Safety: the table's pointers alias the heap value owned by the same
// instance, and the allocation address is stable under moves of the
// instance itself.
unsafe impl<T: Layer + Send> Send for Instance<T> {}

// Safety: shared access through the table hands out shared references only.
unsafe impl<T: Layer + Sync> Sync for Instance<T> {}

impl<T: Layer> Drop for Instance<T> {
    fn drop(&mut self) {
        // Safety: the pointer originates from `Box::into_raw` in `new`, and
        // this is its single release.
        drop(unsafe { Box::from_raw(self.value.as_ptr()) });
    }
}

impl<T: Layer + Debug> Debug for Instance<T> {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&**self, formatter)
    }
}

impl<T: Layer> Deref for Instance<T> {
    type Target = T;

    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        // Safety: the allocation is owned by this instance and stays live
        // for the instance's lifetime.
        unsafe { self.value.as_ref() }
    }
}

impl<T: Layer> DerefMut for Instance<T> {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut Self::Target {
        // Safety: as in `deref`, and the exclusive borrow of the instance
        // makes this the only access path to the value.
        unsafe { self.value.as_mut() }
    }
}

impl<T: Layer> Instance<T> {
    /// Heap-places `value` and mounts all of its layers.
    ///
    /// Mounting visits the layers in construction order (parents before
    /// children, in declaration order), recording one cross pointer per
    /// layer class. The table observes the identity of the object growing
    /// from [Object] towards `T` during this call.
    pub fn new(value: T) -> Self {
        let value = Box::into_raw(Box::new(value));

        // Safety: Box never allocates at the null address.
        let value = unsafe { NonNull::new_unchecked(value) };

        let mut table = CrossPtrs::seed(value.cast());

        {
            // Safety: the allocation is live, and this borrow is the only
            // access path to it within this function.
            let layers = unsafe { &mut *value.as_ptr() };

            layers.mount(&mut table);
        }

        Self { table, value }
    }

    /// Returns the descriptor of the exact dynamic class of this object.
    #[inline(always)]
    pub fn rtti(&self) -> &'static ClassMeta {
        self.table.rtti
    }

    /// Returns true if `U` is the exact dynamic class of this object (not
    /// merely an ancestor of it).
    #[inline(always)]
    pub fn is_exact<U: Class>(&self) -> bool {
        self.table.rtti.id() == U::CLASS_ID
    }

    /// Returns a reference to the `U` layer of this object, or None if `U`
    /// is not among the object's layer classes.
    ///
    /// A single table lookup, regardless of where `U` sits in the ancestry.
    #[inline(always)]
    pub fn try_cast<U: Class>(&self) -> Option<&U> {
        let ptr = self.table.lookup(U::CLASS_ID)?;

        // Safety: the pointer was recorded from the `U` layer of the boxed
        // value during mounting, and the value is owned by this instance.
        Some(unsafe { ptr.cast().as_ref() })
    }

    /// Returns a mutable reference to the `U` layer of this object, or None
    /// if `U` is not among the object's layer classes.
    #[inline(always)]
    pub fn try_cast_mut<U: Class>(&mut self) -> Option<&mut U> {
        let ptr = self.table.lookup(U::CLASS_ID)?;

        // Safety: as in `try_cast`, and the exclusive borrow of the
        // instance makes this the only access path to the value.
        Some(unsafe { ptr.cast().as_mut() })
    }

    /// Returns a reference to the `U` layer of this object.
    ///
    /// **Panics** if `U` is not among the object's layer classes. Use
    /// [try_cast](Self::try_cast) to probe a cast that is allowed to miss.
    #[inline(always)]
    pub fn cast<U: Class>(&self) -> &U {
        match self.try_cast::<U>() {
            Some(layer) => layer,
            None => panic!("{}", self.mismatch::<U>()),
        }
    }

    /// Returns a mutable reference to the `U` layer of this object.
    ///
    /// **Panics** if `U` is not among the object's layer classes.
    #[inline(always)]
    pub fn cast_mut<U: Class>(&mut self) -> &mut U {
        match self.table.lookup(U::CLASS_ID) {
            // Safety: as in `try_cast_mut`.
            Some(ptr) => unsafe { ptr.cast().as_mut() },
            None => panic!("{}", self.mismatch::<U>()),
        }
    }

    /// Returns a reference to the `U` layer of this object only if that
    /// layer sits at the base address of the complete object, or None
    /// otherwise.
    ///
    /// This cast form succeeds exactly when no address adjustment is
    /// involved, which callers on hot paths can rely on for
    /// reinterpretation-style access.
    #[inline(always)]
    pub fn fast_cast<U: Class>(&self) -> Option<&U> {
        let ptr = self.table.lookup(U::CLASS_ID)?;

        if ptr != self.table.base {
            return None;
        }

        // Safety: as in `try_cast`.
        Some(unsafe { ptr.cast().as_ref() })
    }

    /// Type-erases this instance into a dynamically classified view.
    #[inline(always)]
    pub fn as_object(&self) -> ObjectRef<'_> {
        ObjectRef { table: &self.table }
    }

    /// Takes the owned value back, discarding the cross-pointer table.
    pub fn into_inner(self) -> T {
        let mut this = ManuallyDrop::new(self);

        // Safety: the table is not touched again; dropping it in place
        // releases its storage.
        unsafe { ptr::drop_in_place(&mut this.table) };

        // Safety: the pointer originates from `Box::into_raw` in `new`, and
        // the suppressed `Drop` makes this its single release.
        *unsafe { Box::from_raw(this.value.as_ptr()) }
    }

    fn mismatch<U: Class>(&self) -> RttiError {
        RttiError::CastMismatch {
            from: self.table.rtti,
            to: U::class_meta(),
        }
    }
}

/// A type-erased shared view of an [Instance].
///
/// The view forgets the static type of the most derived class while keeping
/// the full casting interface, so heterogeneous objects can flow through one
/// code path (this is the currency of [Visitor](crate::rtti::Visitor)
/// dispatch). It is a plain borrow: copying it is free, and it cannot
/// outlive its instance.
#[derive(Clone, Copy)]
pub struct ObjectRef<'a> {
    table: &'a CrossPtrs,
}

impl<'a> Debug for ObjectRef<'a> {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_fmt(format_args!("ObjectRef({:?})", self.table.rtti))
    }
}

impl<'a> ObjectRef<'a> {
    /// Returns the descriptor of the exact dynamic class of the underlying
    /// object.
    #[inline(always)]
    pub fn rtti(&self) -> &'static ClassMeta {
        self.table.rtti
    }

    /// Returns true if `U` is the exact dynamic class of the underlying
    /// object.
    #[inline(always)]
    pub fn is_exact<U: Class>(&self) -> bool {
        self.table.rtti.id() == U::CLASS_ID
    }

    /// Returns a reference to the `U` layer of the underlying object, or
    /// None if `U` is not among its layer classes.
    #[inline(always)]
    pub fn try_cast<U: Class>(&self) -> Option<&'a U> {
        let ptr = self.table.lookup(U::CLASS_ID)?;

        // Safety: the pointer was recorded from the `U` layer of the
        // instance this view borrows from.
        Some(unsafe { ptr.cast().as_ref() })
    }

    /// Returns a reference to the `U` layer of the underlying object.
    ///
    /// **Panics** if `U` is not among the object's layer classes.
    #[inline(always)]
    pub fn cast<U: Class>(&self) -> &'a U {
        match self.try_cast::<U>() {
            Some(layer) => layer,

            None => panic!(
                "{}",
                RttiError::CastMismatch {
                    from: self.table.rtti,
                    to: U::class_meta(),
                },
            ),
        }
    }

    /// Returns a reference to the `U` layer of the underlying object only
    /// if that layer sits at the object's base address, or None otherwise.
    #[inline(always)]
    pub fn fast_cast<U: Class>(&self) -> Option<&'a U> {
        let ptr = self.table.lookup(U::CLASS_ID)?;

        if ptr != self.table.base {
            return None;
        }

        // Safety: as in `try_cast`.
        Some(unsafe { ptr.cast().as_ref() })
    }
}
