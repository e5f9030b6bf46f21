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

// Reports an internal invariant violation.
//
// Reachable branches must never use this macro; it always indicates a bug in
// this crate rather than a misconfiguration on the user side.
macro_rules! system_panic {
    ($message:expr) => {
        panic!(
            "Lineage internal error. This is a bug.\n{}\nFile: {}\nLine: {}",
            $message,
            file!(),
            line!(),
        )
    };
}

// A checked counterpart of `unreachable_unchecked`.
//
// The caller must guarantee the branch is unreachable. Debug builds verify
// the guarantee by panicking; release builds rely on it.
macro_rules! debug_unreachable {
    ($message:expr) => {{
        #[cfg(debug_assertions)]
        {
            $crate::report::system_panic!($message)
        }

        #[cfg(not(debug_assertions))]
        {
            // Safety: the caller vouches for unreachability.
            unsafe { ::std::hint::unreachable_unchecked() }
        }
    }};
}

pub(crate) use {debug_unreachable, system_panic};
