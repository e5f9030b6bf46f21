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

//! # Lineage
//!
//! A custom runtime type information (RTTI) facility: a faster and more
//! flexible alternative to the type identification built into the language.
//!
//! Lineage maintains a process-wide directed acyclic graph of classes with
//! multiple (and diamond-shaped) inheritance, and a per-instance table that
//! maps every ancestor class to the correctly-adjusted sub-object address.
//! Casting an object to any of its ancestors is a single map lookup; the
//! inheritance graph is never walked at cast time.
//!
//! The main entry points are:
//!
//!   - The [rtti](crate::rtti!) macro, which wires a participating struct
//!     into the hierarchy.
//!   - [Instance](crate::rtti::Instance), the owner of a mounted object,
//!     providing identity queries and all cast forms.
//!   - [Hierarchy](crate::rtti::Hierarchy), the global class graph with
//!     ancestor queries and construction-order ("windup") and
//!     destruction-order ("unwind") traversals.
//!   - [Visitor](crate::rtti::Visitor), which dispatches a live object to
//!     the most specific registered handler, falling back through ancestors.
//!
//! ```
//! use lineage::{
//!     rtti,
//!     rtti::{Class, Hierarchy, Instance},
//! };
//!
//! pub struct Shape {
//!     pub sides: usize,
//! }
//!
//! pub struct Circle {
//!     pub shape: Shape,
//!     pub radius: f64,
//! }
//!
//! rtti! {
//!     impl Shape as "Shape" {}
//!     impl Circle as "Circle" { shape: Shape }
//! }
//!
//! let mut circle = Instance::new(Circle {
//!     shape: Shape { sides: 0 },
//!     radius: 2.0,
//! });
//!
//! assert_eq!(circle.rtti().name(), "Circle");
//! assert!(circle.is_exact::<Circle>());
//!
//! // Constant-time upcast to any ancestor.
//! let shape = circle.cast::<Shape>();
//! assert_eq!(shape.sides, 0);
//!
//! // The cast aliases the original object.
//! circle.cast_mut::<Shape>().sides = 1;
//! assert_eq!(circle.shape.sides, 1);
//!
//! // Graph-level ancestry query.
//! let hierarchy = Hierarchy::global();
//! assert!(hierarchy.is_ancestor(Circle::CLASS_ID, Shape::CLASS_ID));
//! ```
//!
//! Class identifiers are CRC-64 hashes of the declared class names, computed
//! at compile time. Two classes hashing to the same identifier are a fatal
//! configuration error reported at registration time.

pub(crate) mod report;

pub mod rtti;
