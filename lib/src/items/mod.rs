// Copyright 2026 The Conform Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Illustrative, in-scope item kinds (§4.C.1): thin enough to exercise the
//! `Item` contract and the mode validator, not a production item-class
//! library (that remains an external collaborator per §1).

pub mod file;
pub mod package;

pub use file::FileItem;
pub use package::PackageItem;
