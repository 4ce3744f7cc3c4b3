//! Span and event capture for the `tracing` feature.

#![cfg(feature = "tracing")]

use std::sync::{Arc, Mutex};

use tessera_core::PaneId;
use tessera_layout::TilingLayout;
use tracing::Subscriber;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};

#[derive(Default)]
struct TraceState {
    spans: Vec<String>,
    saw_rollback_event: bool,
}

struct TraceCapture {
    state: Arc<Mutex<TraceState>>,
}

impl<S> Layer<S> for TraceCapture
where
    S: Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::Id,
        _ctx: Context<'_, S>,
    ) {
        self.state
            .lock()
            .expect("trace lock")
            .spans
            .push(attrs.metadata().name().to_owned());
    }

    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        struct Msg {
            message: Option<String>,
        }
        impl tracing::field::Visit for Msg {
            fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
                if field.name() == "message" {
                    self.message = Some(value.to_string());
                }
            }

            fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
                if field.name() == "message" {
                    self.message = Some(format!("{value:?}").trim_matches('"').to_string());
                }
            }
        }
        let mut msg = Msg { message: None };
        event.record(&mut msg);
        if msg.message.as_deref() == Some("tiling.rollback") {
            self.state.lock().expect("trace lock").saw_rollback_event = true;
        }
    }
}

#[test]
fn split_and_remove_emit_spans_and_rollback_event() {
    let state = Arc::new(Mutex::new(TraceState::default()));
    let subscriber = tracing_subscriber::registry().with(TraceCapture {
        state: Arc::clone(&state),
    });
    let _guard = tracing::subscriber::set_default(subscriber);

    let ids: Vec<PaneId> = (1..=3).map(|raw| PaneId::new(raw).expect("id")).collect();
    let mut layout = TilingLayout::with_initial_pane(2, ids[0]).expect("initial pane");
    layout.hsplit(ids[0], ids[1]).expect("hsplit");
    assert!(layout.hsplit(ids[0], ids[2]).is_err());
    layout.remove_pane(ids[1]).expect("remove");

    let snapshot = state.lock().expect("trace lock");
    assert!(snapshot.spans.iter().any(|name| name == "tiling.split"));
    assert!(snapshot.spans.iter().any(|name| name == "tiling.remove"));
    assert!(snapshot.saw_rollback_event, "expected tiling.rollback event");
}
