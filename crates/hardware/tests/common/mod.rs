//! Shared test infrastructure.


pub use harness::TestContext;
