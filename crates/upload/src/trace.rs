use tracing::{Span, field};

/// W3C trace continuation headers returned by the coordination service.
///
/// When Init returns `traceparent`/`tracestate`, subsequent phase calls
/// forward them so client and server spans compose into one logical trace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceContext {
    pub traceparent: Option<String>,
    pub tracestate: Option<String>,
}

impl TraceContext {
    pub fn is_empty(&self) -> bool {
        self.traceparent.is_none() && self.tracestate.is_none()
    }

    /// Header pairs to attach to an outgoing request.
    pub fn headers(&self) -> Vec<(&'static str, &str)> {
        let mut headers = Vec::new();
        if let Some(tp) = &self.traceparent {
            headers.push(("traceparent", tp.as_str()));
        }
        if let Some(ts) = &self.tracestate {
            headers.push(("tracestate", ts.as_str()));
        }
        headers
    }
}

/// Session-scoped trace handle.
///
/// One root span per upload session; every phase and part runs in a direct
/// child span (flat fan-out, never chained) so concurrent parts do not
/// appear serialized in the trace tree. Created per upload invocation and
/// threaded explicitly; there is no process-wide tracer state here, and
/// subscriber installation is left to the embedding application.
pub struct UploadTrace {
    session: Span,
}

impl UploadTrace {
    pub fn new(file_name: &str, total_bytes: u64, total_parts: u64) -> Self {
        let session = tracing::info_span!(
            "upload_session",
            file.name = %file_name,
            file.size = total_bytes,
            upload.parts = total_parts,
            error = field::Empty,
        );
        Self { session }
    }

    /// Child span for a lifecycle phase (init, complete, abort).
    pub fn phase_span(&self, phase: &'static str) -> Span {
        tracing::info_span!(
            parent: &self.session,
            "upload_phase",
            upload.phase = phase,
            error = field::Empty,
        )
    }

    /// Child span for one part job.
    pub fn part_span(&self, part_number: u32) -> Span {
        tracing::info_span!(
            parent: &self.session,
            "upload_part",
            file.part_number = part_number,
            error = field::Empty,
        )
    }

    /// Records a terminal failure on the session span.
    pub fn record_failure(&self, err: &dyn std::fmt::Display) {
        Self::mark_failed(&self.session, err);
    }

    /// Flags `span` as failed with the error's message.
    pub fn mark_failed(span: &Span, err: &dyn std::fmt::Display) {
        span.record("error", field::display(err));
    }
}
