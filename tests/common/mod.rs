#![allow(dead_code, unused_imports)]

pub use pagewatch_test_utils::{builders, fakes, http_stub, init_tracing, with_timeout};
