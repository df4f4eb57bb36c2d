#![allow(dead_code)]

use std::sync::Once;

use danci_placement::{PlacementEngine, SelectedItem, SessionState};

static TRACING: Once = Once::new();

/// Route library logs to the test writer; filter with RUST_LOG
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Drive a session to completion, answering item `n` with `answer(item, n)`
pub fn run_session<F>(engine: &PlacementEngine, prior_theta: f64, mut answer: F) -> SessionState
where
    F: FnMut(&SelectedItem, usize) -> bool,
{
    let mut state = engine.start(prior_theta).unwrap();
    while let Some(item) = engine.next_item(&state) {
        let is_correct = answer(&item, state.response_count());
        state = engine.record_answer(&state, &item, is_correct).unwrap();
    }
    state
}
