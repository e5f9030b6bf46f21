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
    cmp::Ordering,
    fmt::{Debug, Display, Formatter},
    hash::{Hash, Hasher},
};

use log::{error, trace};

use crate::rtti::{ClassId, Hierarchy, Object};

/// The descriptor of a class registered in the [Hierarchy].
///
/// One descriptor exists per class. It is created lazily, on the first call
/// to the class's [Class::class_meta] accessor, lives in static storage for
/// the rest of the process lifetime, and is never mutated afterwards.
///
/// Descriptors compare, order, and hash by their [identifier](Self::id).
///
/// The [Display] implementation prints the class name followed by the
/// identifier (e.g. `Shape(id:f3a1-...)`); [Debug] prints the name alone.
pub struct ClassMeta {
    name: &'static str,
    id: ClassId,
}

impl PartialEq for ClassMeta {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.id.eq(&other.id)
    }
}

impl Eq for ClassMeta {}

impl Ord for ClassMeta {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl PartialOrd for ClassMeta {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Hash for ClassMeta {
    #[inline(always)]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state)
    }
}

impl Debug for ClassMeta {
    #[inline(always)]
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.name)
    }
}

impl Display for ClassMeta {
    #[inline(always)]
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_fmt(format_args!("{}(id:{})", self.name, self.id))
    }
}

impl ClassMeta {
    /// Creates the descriptor and registers it in the global [Hierarchy] as
    /// one atomic step.
    ///
    /// An empty `parents` list attaches the class directly under the
    /// universal [Object] root.
    ///
    /// Normally this function is invoked once per class from the accessor
    /// generated by the [rtti](crate::rtti!) macro; calling it by hand is
    /// only required for manual [Class] implementations. The parents must be
    /// passed as descriptors, which structurally forces every parent class
    /// to register before its children.
    ///
    /// **Panics** if `id` is already registered. An identifier collision is
    /// a configuration error that calling code cannot meaningfully recover
    /// from, so it is deliberately not surfaced as a `Result`.
    pub fn register(
        name: &'static str,
        id: ClassId,
        parents: &[&'static ClassMeta],
    ) -> &'static ClassMeta {
        match parents.is_empty() {
            false => Self::register_with(name, id, parents),
            true => Self::register_with(name, id, &[Object::class_meta()]),
        }
    }

    pub(crate) fn register_root(name: &'static str, id: ClassId) -> &'static ClassMeta {
        Self::register_with(name, id, &[])
    }

    fn register_with(
        name: &'static str,
        id: ClassId,
        parents: &[&'static ClassMeta],
    ) -> &'static ClassMeta {
        let meta: &'static ClassMeta = Box::leak(Box::new(ClassMeta { name, id }));

        if let Err(collision) = Hierarchy::global().add(meta, parents) {
            error!("{collision}");
            panic!("{collision}");
        }

        trace!("Class {meta} registered.");

        meta
    }

    /// Returns the declared display name of the class.
    #[inline(always)]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the class identifier.
    #[inline(always)]
    pub fn id(&self) -> ClassId {
        self.id
    }
}

/// A class participating in the RTTI hierarchy.
///
/// Implementations are normally generated by the [rtti](crate::rtti!) macro.
/// A manual implementation must uphold the accessor contract: `class_meta`
/// has to be idempotent, return the same descriptor instance on every call,
/// and force the descriptors of all declared parents before constructing its
/// own (so that by registration time every parent identifier is a valid
/// hierarchy node).
pub trait Class: 'static {
    /// The declared display name of the class. The class identifier is
    /// derived from this name.
    const NAME: &'static str;

    /// The compile-time identifier of the class.
    ///
    /// The default value hashes [NAME](Self::NAME); overriding it (e.g. with
    /// a [salted hash](crate::rtti::ClassId::from_hash)) is the collision
    /// hardening escape hatch.
    const CLASS_ID: ClassId = ClassId::of(Self::NAME);

    /// Returns the registered descriptor of this class, creating and
    /// registering it on the first call.
    fn class_meta() -> &'static ClassMeta;
}

/// Wires structs into the RTTI hierarchy.
///
/// Each item declares a participating struct, its display name, and its
/// direct parent classes together with the struct fields that embed the
/// corresponding parent layers:
///
/// ```
/// use lineage::{rtti, rtti::{Class, Instance}};
///
/// pub struct Vehicle { pub wheels: u8 }
/// pub struct Truck { pub vehicle: Vehicle, pub axles: u8 }
///
/// rtti! {
///     impl Vehicle as "Vehicle" {}
///     impl Truck as "Truck" { vehicle: Vehicle }
/// }
///
/// let truck = Instance::new(Truck {
///     vehicle: Vehicle { wheels: 6 },
///     axles: 3,
/// });
///
/// assert_eq!(truck.cast::<Vehicle>().wheels, 6);
/// ```
///
/// An empty parent block declares a root class (attached under the universal
/// [Object](crate::rtti::Object) node). The parent list is declared
/// explicitly rather than inferred from the struct's fields: the hierarchy
/// edges are deliberately decoupled from physical layout, and a parent layer
/// may sit behind a nested field path (`outer.inner: Parent`).
///
/// The parents are walked in declaration order during mounting, which makes
/// the declaration order the construction order of the class's layers.
///
/// The macro generates the [Class](crate::rtti::Class) and
/// [Layer](crate::rtti::Layer) implementations for the struct.
#[macro_export]
macro_rules! rtti {
    () => {};

    (
        impl $ty:ty as $name:literal { $($($field:ident).+ : $parent:ty),* $(,)? }
        $($rest:tt)*
    ) => {
        impl $crate::rtti::Class for $ty {
            const NAME: &'static str = $name;

            fn class_meta() -> &'static $crate::rtti::ClassMeta {
                static META: ::std::sync::LazyLock<&'static $crate::rtti::ClassMeta> =
                    ::std::sync::LazyLock::new(|| {
                        $crate::rtti::ClassMeta::register(
                            <$ty as $crate::rtti::Class>::NAME,
                            <$ty as $crate::rtti::Class>::CLASS_ID,
                            &[$(<$parent as $crate::rtti::Class>::class_meta()),*],
                        )
                    });

                *META
            }
        }

        impl $crate::rtti::Layer for $ty {
            fn mount(&mut self, table: &mut $crate::rtti::CrossPtrs) {
                $($crate::rtti::Layer::mount(&mut self.$($field).+, table);)*

                table.record(self);
            }
        }

        $crate::rtti!($($rest)*);
    };
}
