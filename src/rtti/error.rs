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
    error::Error as StdError,
    fmt::{Debug, Display, Formatter},
    result::Result as StdResult,
};

use crate::rtti::{ClassId, ClassMeta};

/// A result of an RTTI operation that can fail with an [RttiError].
pub type RttiResult<T> = StdResult<T, RttiError>;

/// Represents a violation of the RTTI setup or usage contract.
///
/// Only a subset of failures is surfaced through values of this type:
/// expected, recoverable outcomes (a cast miss probed through
/// [try_cast](crate::rtti::Instance::try_cast), an unhandled visitor
/// dispatch) stay value-level `Option`/`bool` results and are never wrapped
/// into errors. Configuration errors, on the other hand, are not meant to be
/// recovered from; the registration front end prints their [Display]
/// rendering and panics.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum RttiError {
    /// Two classes registered under one identifier: either a name collision
    /// or a hashing defect.
    DuplicateClass {
        /// The already-registered owner of the identifier.
        existing: &'static ClassMeta,

        /// The class that attempted to re-claim the identifier.
        duplicate: &'static ClassMeta,
    },

    /// An identifier that was never registered was used in a hierarchy
    /// query. This always indicates a setup bug: a class's descriptor
    /// accessor was never invoked.
    UnknownClass(ClassId),

    /// A reference-form cast to a class outside of the object's ancestry.
    CastMismatch {
        /// The exact dynamic class of the object.
        from: &'static ClassMeta,

        /// The requested target class.
        to: &'static ClassMeta,
    },
}

impl Debug for RttiError {
    #[inline(always)]
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, formatter)
    }
}

impl Display for RttiError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateClass {
                existing,
                duplicate,
            } => formatter.write_fmt(format_args!(
                "Class identifier {} of {:?} is already registered by {:?}. \
                Either the class was registered twice, or two class names \
                collide under the identifier hash.",
                duplicate.id(),
                duplicate.name(),
                existing.name(),
            )),

            Self::UnknownClass(id) => formatter.write_fmt(format_args!(
                "Class identifier {id} is not registered in the hierarchy.",
            )),

            Self::CastMismatch { from, to } => formatter.write_fmt(format_args!(
                "Invalid cast from {from} to {to}: the target class is not \
                an ancestor of the object's class.",
            )),
        }
    }
}

impl StdError for RttiError {}
