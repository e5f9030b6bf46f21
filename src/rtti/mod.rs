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

//! The runtime type information facility.
//!
//! The module splits into a static side and a dynamic side. The static side
//! is the process-wide class graph: [ClassId] identifiers, [ClassMeta]
//! descriptors, and the [Hierarchy] with its ancestry queries and ordered
//! traversals. The dynamic side is per-object: [Instance] owns a mounted
//! object and its [CrossPtrs] table, [ObjectRef] is its type-erased view,
//! and [Visitor]/[ClassVisitor] dispatch over either side.
//!
//! User code normally touches only the [rtti](crate::rtti!) macro and the
//! [Instance] interface; everything else backs them.

mod crc;
mod error;
mod hierarchy;
mod id;
mod meta;
mod object;
mod visitor;

pub use crate::rtti::{
    crc::Crc64,
    error::{RttiError, RttiResult},
    hierarchy::Hierarchy,
    id::ClassId,
    meta::{Class, ClassMeta},
    object::{CrossPtrs, Instance, Layer, Object, ObjectRef},
    visitor::{ClassVisitor, Visitor},
};
