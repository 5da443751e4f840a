//! Shared per-lane state

use std::task::{Context, Poll, Waker};

use bytes::BytesMut;
use parking_lot::Mutex;

use crate::Closed;

/// One bounded byte buffer with a single writer and a single reader.
///
/// The buffer never grows past `capacity`. Terminal state is recorded in
/// `done`: `None` while open, `Some(None)` after a clean close and
/// `Some(Some(reason))` after a close with a stored reason.
pub(crate) struct Lane<E> {
    state: Mutex<LaneState<E>>,
}

struct LaneState<E> {
    buf: BytesMut,
    capacity: usize,
    done: Option<Option<E>>,
    read_waker: Option<Waker>,
    write_waker: Option<Waker>,
}

impl<E> Lane<E> {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(LaneState {
                buf: BytesMut::new(),
                capacity,
                done: None,
                read_waker: None,
                write_waker: None,
            }),
        }
    }

    /// Terminate the lane. The first close wins; returns whether this call
    /// stored the terminal state.
    pub(crate) fn close(&self, reason: Option<E>) -> bool {
        let (read_waker, write_waker) = {
            let mut state = self.state.lock();
            if state.done.is_some() {
                return false;
            }
            state.done = Some(reason);
            (state.read_waker.take(), state.write_waker.take())
        };
        if let Some(waker) = read_waker {
            waker.wake();
        }
        if let Some(waker) = write_waker {
            waker.wake();
        }
        true
    }
}

impl<E: Clone> Lane<E> {
    /// Append as much of `data` as fits below capacity, parking the waker
    /// when the buffer is full. Appending to a terminated lane fails with
    /// the stored reason.
    pub(crate) fn poll_write(
        &self,
        cx: &mut Context<'_>,
        data: &[u8],
    ) -> Poll<Result<usize, Closed<E>>> {
        let mut state = self.state.lock();
        if let Some(reason) = &state.done {
            return Poll::Ready(Err(Closed(reason.clone())));
        }
        if data.is_empty() {
            return Poll::Ready(Ok(0));
        }
        let available = state.capacity - state.buf.len();
        if available == 0 {
            state.write_waker = Some(cx.waker().clone());
            return Poll::Pending;
        }
        let n = available.min(data.len());
        state.buf.extend_from_slice(&data[..n]);
        let waker = state.read_waker.take();
        drop(state);
        if let Some(waker) = waker {
            waker.wake();
        }
        Poll::Ready(Ok(n))
    }

    /// Move buffered bytes into `dst` in producer order. An empty open lane
    /// parks the waker; a drained terminated lane yields `Ok(0)` for a clean
    /// close or the stored reason otherwise, on every call.
    pub(crate) fn poll_read(&self, cx: &mut Context<'_>, dst: &mut [u8]) -> Poll<Result<usize, E>> {
        if dst.is_empty() {
            return Poll::Ready(Ok(0));
        }
        let mut state = self.state.lock();
        if !state.buf.is_empty() {
            let n = dst.len().min(state.buf.len());
            let chunk = state.buf.split_to(n);
            dst[..n].copy_from_slice(&chunk);
            let waker = state.write_waker.take();
            drop(state);
            if let Some(waker) = waker {
                waker.wake();
            }
            return Poll::Ready(Ok(n));
        }
        match state.done.clone() {
            Some(None) => Poll::Ready(Ok(0)),
            Some(Some(reason)) => Poll::Ready(Err(reason)),
            None => {
                state.read_waker = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}
