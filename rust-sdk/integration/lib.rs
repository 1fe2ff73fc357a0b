//
// Copyright (c) Cryptic Dot
//
// Licensed under FusionAMM SDK Source-Available License v1.0
// See the LICENSE file in the project root for license information.
//
// Builds the core crate against pinned dependency versions and checks that
// quotes do not depend on which version got resolved.
