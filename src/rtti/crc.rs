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

// The reflected CRC-64/ECMA generator polynomial.
const POLYNOMIAL: u64 = 0xC96C_5795_D787_0F42;

const TABLE: [u64; 256] = {
    let mut table = [0u64; 256];

    let mut index = 0usize;

    while index < 256 {
        let mut entry = index as u64;

        let mut bit = 0;

        while bit < 8 {
            entry = (entry >> 1)
                ^ match entry & 1 {
                    0 => 0,
                    _ => POLYNOMIAL,
                };

            bit += 1;
        }

        table[index] = entry;

        index += 1;
    }

    table
};

/// An incremental CRC-64 checksum engine (ECMA polynomial), evaluable in
/// const contexts.
///
/// The engine is a plain byte-mixing primitive, not a cryptographic hash:
/// its purpose is an extremely low collision probability over typical symbol
/// counts (tens of thousands of class names).
///
/// Heterogeneous inputs fold left to right into a single running state.
/// Multi-byte integers fold least-significant byte first, so splitting the
/// same logical content into different chunks produces the same checksum:
///
/// ```
/// use lineage::rtti::Crc64;
///
/// let whole = Crc64::new().str("qweqwe").finish();
/// let split = Crc64::new().str("qwe").str("qwe").finish();
///
/// assert_eq!(whole, split);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Crc64 {
    state: u64,
}

impl Default for Crc64 {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl Crc64 {
    /// Creates an engine with zero initial state.
    #[inline(always)]
    pub const fn new() -> Self {
        Self { state: 0 }
    }

    /// Folds a single byte into the running state.
    #[inline(always)]
    pub const fn u8(self, byte: u8) -> Self {
        Self {
            state: (self.state >> 8) ^ TABLE[((self.state ^ byte as u64) & 0xFF) as usize],
        }
    }

    /// Folds a byte slice, left to right.
    pub const fn bytes(mut self, bytes: &[u8]) -> Self {
        let mut index = 0;

        while index < bytes.len() {
            self = self.u8(bytes[index]);
            index += 1;
        }

        self
    }

    /// Folds the UTF-8 bytes of a string (without a terminator).
    #[inline(always)]
    pub const fn str(self, string: &str) -> Self {
        self.bytes(string.as_bytes())
    }

    /// Folds a 16-bit integer, least-significant byte first.
    #[inline(always)]
    pub const fn u16(self, value: u16) -> Self {
        self.bytes(&value.to_le_bytes())
    }

    /// Folds a 32-bit integer, least-significant byte first.
    #[inline(always)]
    pub const fn u32(self, value: u32) -> Self {
        self.bytes(&value.to_le_bytes())
    }

    /// Folds a 64-bit integer, least-significant byte first.
    #[inline(always)]
    pub const fn u64(self, value: u64) -> Self {
        self.bytes(&value.to_le_bytes())
    }

    /// Folds a signed 32-bit integer, least-significant byte first.
    #[inline(always)]
    pub const fn i32(self, value: i32) -> Self {
        self.bytes(&value.to_le_bytes())
    }

    /// Folds a signed 64-bit integer, least-significant byte first.
    #[inline(always)]
    pub const fn i64(self, value: i64) -> Self {
        self.bytes(&value.to_le_bytes())
    }

    /// Finalizes the checksum. The final xor of this CRC variant is zero.
    #[inline(always)]
    pub const fn finish(self) -> u64 {
        self.state
    }
}
