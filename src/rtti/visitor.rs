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

use ahash::AHashMap;

use crate::rtti::{Class, ClassId, ClassMeta, Hierarchy, ObjectRef};

/// Dispatches type-erased objects to per-class handlers.
///
/// A handler registered for class `U` receives every visited object whose
/// dynamic class is `U` or a descendant of `U`, as a `&U` reference to the
/// matching layer. Dispatch walks the object's ancestry from the most
/// derived class towards the roots, so the handler of the closest registered
/// ancestor wins:
///
/// ```
/// use lineage::{rtti, rtti::{Instance, Visitor}};
///
/// struct Shape { sides: u8 }
/// struct Square { shape: Shape }
///
/// rtti! {
///     impl Shape as "Shape" {}
///     impl Square as "Square" { shape: Shape }
/// }
///
/// let square = Instance::new(Square { shape: Shape { sides: 4 } });
///
/// let mut seen = None;
///
/// let mut visitor = Visitor::new();
///
/// visitor.on(|shape: &Shape| {
///     seen = Some(shape.sides);
///     true
/// });
///
/// assert!(visitor.visit(square.as_object()));
///
/// drop(visitor);
///
/// assert_eq!(seen, Some(4));
/// ```
///
/// A handler returns true to accept the object (stopping the walk) or false
/// to decline it, in which case dispatch continues towards more distant
/// ancestors. An object whose entire ancestry declines (or registers no
/// handler at all) is reported as unhandled through the return value of
/// [visit](Self::visit); this is an expected outcome, not an error.
pub struct Visitor<'a> {
    handlers: AHashMap<ClassId, Box<dyn FnMut(ObjectRef) -> bool + 'a>>,
}

impl<'a> Default for Visitor<'a> {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Visitor<'a> {
    /// Creates a visitor with no handlers.
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            handlers: AHashMap::new(),
        }
    }

    /// Registers `handler` for class `U`, replacing the previous handler of
    /// `U` if there was one.
    ///
    /// The handler returns true to accept the object or false to decline it
    /// and let dispatch continue up the ancestry.
    pub fn on<U: Class>(&mut self, mut handler: impl FnMut(&U) -> bool + 'a) {
        let _ = self.handlers.insert(
            U::CLASS_ID,
            Box::new(move |object: ObjectRef| match object.try_cast::<U>() {
                Some(layer) => handler(layer),
                None => false,
            }),
        );
    }

    /// Dispatches `object` to the handler of the closest class in its
    /// ancestry that accepts it.
    ///
    /// Returns true if some handler accepted the object.
    pub fn visit(&mut self, object: ObjectRef) -> bool {
        let handlers = &mut self.handlers;

        let mut handled = false;

        let _ = Hierarchy::global().unwind(object.rtti().id(), |meta| {
            let Some(handler) = handlers.get_mut(&meta.id()) else {
                return true;
            };

            match handler(object) {
                true => {
                    handled = true;

                    false
                }

                false => true,
            }
        });

        handled
    }
}

/// The [Visitor] counterpart that dispatches over classes themselves rather
/// than object instances.
///
/// Handlers receive the [ClassMeta] descriptor of the visited class. The
/// dispatch rule is the same closest-ancestor walk, which makes this type
/// the tool for per-class policies (serialization strategies, factory
/// selection) that hold without an instance at hand.
pub struct ClassVisitor<'a> {
    handlers: AHashMap<ClassId, Box<dyn FnMut(&'static ClassMeta) -> bool + 'a>>,
}

impl<'a> Default for ClassVisitor<'a> {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> ClassVisitor<'a> {
    /// Creates a visitor with no handlers.
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            handlers: AHashMap::new(),
        }
    }

    /// Registers `handler` for class `U`, replacing the previous handler of
    /// `U` if there was one.
    ///
    /// The handler receives the descriptor of the class being dispatched
    /// (which is `U` or a descendant of `U`), and returns true to accept it.
    pub fn on<U: Class>(&mut self, handler: impl FnMut(&'static ClassMeta) -> bool + 'a) {
        let _ = self.handlers.insert(U::CLASS_ID, Box::new(handler));
    }

    /// Dispatches the class `start` to the handler of the closest class in
    /// its ancestry (including `start` itself) that accepts it.
    ///
    /// Returns true if some handler accepted the class.
    ///
    /// **Panics** if `start` is not a registered class.
    pub fn visit(&mut self, start: ClassId) -> bool {
        let subject = Hierarchy::global().class_of(start);

        let handlers = &mut self.handlers;

        let mut handled = false;

        let _ = Hierarchy::global().unwind(start, |meta| {
            let Some(handler) = handlers.get_mut(&meta.id()) else {
                return true;
            };

            match handler(subject) {
                true => {
                    handled = true;

                    false
                }

                false => true,
            }
        });

        handled
    }
}
