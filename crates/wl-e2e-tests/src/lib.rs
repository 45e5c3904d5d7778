//! Test-only crate. The integration tests live in `tests/`.
