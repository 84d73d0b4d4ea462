//! End-to-end tests for the OBD bridge live under `tests/`.
