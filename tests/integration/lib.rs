//! Integration tests for Herald. See `tests/`.
