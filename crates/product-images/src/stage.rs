//! Lazy, pull-based sequence combinators.
//!
//! A pipeline stage is a function from one element to one transformed
//! element. [`map_stage`] lifts such a function over a [`LazySeq`] without
//! materializing it: an element is transformed only when the consumer asks
//! for it, and at most one transform is in flight at a time.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll, ready};

use futures::future::BoxFuture;
use futures::stream::{BoxStream, Stream};
use futures::{FutureExt, StreamExt, TryStreamExt};

/// A boxed, fallible, lazily evaluated sequence.
pub type LazySeq<'a, T, E> = BoxStream<'a, Result<T, E>>;

type Transform<'a, T, U, E> = Box<dyn FnMut(T) -> BoxFuture<'a, Result<U, E>> + Send + 'a>;

/// Stream returned by [`map_stage`].
///
/// Fused after the first error: once an element fails, upstream is never
/// polled again and the sequence ends.
struct MapStage<'a, T, U, E> {
    upstream: LazySeq<'a, T, E>,
    transform: Transform<'a, T, U, E>,
    in_flight: Option<BoxFuture<'a, Result<U, E>>>,
    finished: bool,
}

impl<T, U, E> Stream for MapStage<'_, T, U, E> {
    type Item = Result<U, E>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;

        loop {
            if this.finished {
                return Poll::Ready(None);
            }

            if let Some(pending) = this.in_flight.as_mut() {
                let output = ready!(pending.poll_unpin(cx));
                this.in_flight = None;
                this.finished = output.is_err();
                return Poll::Ready(Some(output));
            }

            match ready!(this.upstream.poll_next_unpin(cx)) {
                Some(Ok(item)) => this.in_flight = Some((this.transform)(item)),
                Some(Err(err)) => {
                    this.finished = true;
                    return Poll::Ready(Some(Err(err)));
                }
                None => {
                    this.finished = true;
                    return Poll::Ready(None);
                }
            }
        }
    }
}

/// Lift an asynchronous transform into a transform over a lazy sequence.
///
/// The output has the same length and order as the input. Element `i + 1`
/// is not pulled from upstream until element `i` has been yielded.
pub fn map_stage<'a, T, U, E, F, Fut>(
    upstream: impl Stream<Item = Result<T, E>> + Send + 'a,
    mut transform: F,
) -> LazySeq<'a, U, E>
where
    T: 'a,
    U: 'a,
    E: 'a,
    F: FnMut(T) -> Fut + Send + 'a,
    Fut: Future<Output = Result<U, E>> + Send + 'a,
{
    MapStage {
        upstream: upstream.boxed(),
        transform: Box::new(move |item: T| transform(item).boxed()),
        in_flight: None,
        finished: false,
    }
    .boxed()
}

/// Synchronous counterpart of [`map_stage`].
pub fn map_stage_sync<'a, T, U, E, F>(
    upstream: impl Stream<Item = Result<T, E>> + Send + 'a,
    mut transform: F,
) -> LazySeq<'a, U, E>
where
    T: 'a,
    U: Send + 'a,
    E: Send + 'a,
    F: FnMut(T) -> Result<U, E> + Send + 'a,
{
    map_stage(upstream, move |item| futures::future::ready(transform(item)))
}

/// Drain a sequence one element at a time.
///
/// Returns how many elements were consumed, or the first error.
pub async fn run_serial<T, E>(seq: impl Stream<Item = Result<T, E>>) -> Result<usize, E> {
    seq.try_fold(0usize, |consumed, _| async move { Ok(consumed + 1) })
        .await
}

/// Method syntax for the stage combinators.
pub trait StageExt<'a, T: 'a, E: 'a>: Stream<Item = Result<T, E>> + Send + Sized + 'a {
    fn map_stage<U, F, Fut>(self, transform: F) -> LazySeq<'a, U, E>
    where
        U: 'a,
        F: FnMut(T) -> Fut + Send + 'a,
        Fut: Future<Output = Result<U, E>> + Send + 'a,
    {
        map_stage(self, transform)
    }

    fn map_stage_sync<U, F>(self, transform: F) -> LazySeq<'a, U, E>
    where
        U: Send + 'a,
        E: Send,
        F: FnMut(T) -> Result<U, E> + Send + 'a,
    {
        map_stage_sync(self, transform)
    }
}

impl<'a, T: 'a, E: 'a, S> StageExt<'a, T, E> for S where S: Stream<Item = Result<T, E>> + Send + 'a {}
