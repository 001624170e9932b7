//! Transport layers that make the JSON-RPC traffic of a provider visible in
//! the logs. The [`LabelingLayer`] tags every request with the name of the
//! component that issued it and the [`InstrumentationLayer`] logs each
//! request together with that label, its outcome and how long it took.
use {
    alloy::{
        rpc::json_rpc::{RequestPacket, ResponsePacket, SerializedRequest},
        transports::TransportError,
    },
    std::{
        fmt::Debug,
        pin::Pin,
        task::{Context, Poll},
        time::Instant,
    },
    tower::{Layer, Service},
};

/// Layer that attaches a label to each request that passes through.
pub(crate) struct LabelingLayer {
    pub label: String,
}

impl<S> Layer<S> for LabelingLayer {
    type Service = LabeledProvider<S>;

    fn layer(&self, inner: S) -> Self::Service {
        LabeledProvider {
            inner,
            label: self.label.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct LabeledProvider<S> {
    inner: S,
    label: String,
}

impl<S> LabeledProvider<S> {
    fn attach_label(&self, req: &mut SerializedRequest) {
        req.meta_mut()
            .extensions_mut()
            .get_or_insert_default::<ProviderLabel>()
            .prepend(&self.label);
    }
}

impl<S> Service<RequestPacket> for LabeledProvider<S>
where
    S: Service<RequestPacket, Response = ResponsePacket, Error = TransportError>,
    S::Future: Send + 'static,
{
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;
    type Response = S::Response;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: RequestPacket) -> Self::Future {
        req.requests_mut()
            .iter_mut()
            .for_each(|r| self.attach_label(r));
        Box::pin(self.inner.call(req))
    }
}

/// Layer that logs every request based on the [`ProviderLabel`] metadata
/// attached to it.
pub(crate) struct InstrumentationLayer;

impl<S> Layer<S> for InstrumentationLayer {
    type Service = InstrumentedProvider<S>;

    fn layer(&self, inner: S) -> Self::Service {
        InstrumentedProvider { inner }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct InstrumentedProvider<S> {
    inner: S,
}

impl<S> Service<RequestPacket> for InstrumentedProvider<S>
where
    S: Service<RequestPacket, Response = ResponsePacket, Error = TransportError>,
    S::Future: Send + 'static,
    S::Response: Send + 'static + Debug,
    S::Error: Send + 'static + Debug,
{
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;
    type Response = S::Response;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: RequestPacket) -> Self::Future {
        let methods: Vec<_> = req
            .requests_mut()
            .iter_mut()
            .map(|r| {
                let component: String = r
                    .meta_mut()
                    .extensions_mut()
                    .remove::<ProviderLabel>()
                    .map(Into::into)
                    .unwrap_or_default();
                tracing::trace!(component, ?r, "executing request");
                format!("{component}:{}", r.method())
            })
            .collect();

        let start = Instant::now();
        let fut = self.inner.call(req);
        Box::pin(async move {
            let res = fut.await;
            let elapsed = start.elapsed();
            match &res {
                Ok(_) => tracing::debug!(?methods, ?elapsed, "request completed"),
                Err(err) => tracing::debug!(?methods, ?elapsed, ?err, "request failed"),
            }
            res
        })
    }
}

/// Label that identifies which component emitted a request. Nested
/// [`LabelingLayer`]s produce labels like `outer_inner`.
#[derive(Debug, Clone, Default)]
struct ProviderLabel(Vec<String>);

impl ProviderLabel {
    fn prepend(&mut self, label: &str) {
        self.0.insert(0, label.to_string())
    }
}

impl From<ProviderLabel> for String {
    fn from(value: ProviderLabel) -> Self {
        value.0.join("_")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_labels_are_joined_outermost_first() {
        let mut label = ProviderLabel::default();
        label.prepend("inner");
        label.prepend("outer");
        assert_eq!(String::from(label), "outer_inner");
    }

    #[test]
    fn missing_label_is_empty() {
        assert_eq!(String::from(ProviderLabel::default()), "");
    }
}
