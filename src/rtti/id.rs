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

use std::fmt::{Debug, Display, Formatter};

use crate::rtti::Crc64;

/// A fixed-width identifier uniquely naming a participating class for the
/// lifetime of the process.
///
/// The identifier is the CRC-64 checksum of the class's declared name (see
/// [Crc64]), computed at compile time. It is stable across a single program
/// execution, but NOT guaranteed stable across recompilation: it hashes the
/// name only, never the binary layout.
///
/// Two classes with accidentally identical identifiers constitute a fatal
/// configuration error, detected when the second class registers. An
/// implementation under collision pressure can harden its identifiers by
/// salting the hash with source-location data through
/// [from_hash](Self::from_hash), at the cost of reproducibility.
///
/// The [Display] implementation renders the canonical
/// `xxxx-xxxx-xxxx-xxxx` grouping of the 64-bit value.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassId(u64);

impl Debug for ClassId {
    #[inline(always)]
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_fmt(format_args!("ClassId({self})"))
    }
}

impl Display for ClassId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_fmt(format_args!(
            "{:04x}-{:04x}-{:04x}-{:04x}",
            (self.0 >> 48) & 0xFFFF,
            (self.0 >> 32) & 0xFFFF,
            (self.0 >> 16) & 0xFFFF,
            self.0 & 0xFFFF,
        ))
    }
}

impl ClassId {
    /// Computes the identifier of a class with the declared name `name`.
    ///
    /// ```
    /// use lineage::rtti::ClassId;
    ///
    /// const ID: ClassId = ClassId::of("qwe");
    ///
    /// assert_eq!(ID.into_inner(), 0x29AA_A28D_DA3D_CEC1);
    /// ```
    #[inline(always)]
    pub const fn of(name: &str) -> Self {
        Self(Crc64::new().str(name).finish())
    }

    /// Wraps a finished [Crc64] state into an identifier.
    ///
    /// This is the extension point for salted identifiers:
    ///
    /// ```
    /// use lineage::rtti::{ClassId, Crc64};
    ///
    /// const ID: ClassId = ClassId::from_hash(
    ///     Crc64::new().str("Widget").str(file!()).u32(line!()),
    /// );
    /// ```
    #[inline(always)]
    pub const fn from_hash(hash: Crc64) -> Self {
        Self(hash.finish())
    }

    /// Returns the raw 64-bit value of this identifier.
    #[inline(always)]
    pub const fn into_inner(self) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_grouping() {
        assert_eq!(
            ClassId::from_hash(Crc64::new().u64(0x0123_4567_89AB_CDEF)).to_string().len(),
            19,
        );

        assert_eq!(ClassId::of("qwe").to_string(), "29aa-a28d-da3d-cec1");
    }
}
