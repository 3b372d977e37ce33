//! Callback-style sending on top of [`WebSmsClient::send`].

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use super::{WebSmsClient, WebSmsError, exchange};
use crate::domain::{ApiResponse, ErrorCause, Message, SendOptions};

/// Outcome handed to a send callback.
pub type SendResult = Result<ApiResponse, WebSmsError>;

/// Delivers the outcome of one send to its callback, at most once.
///
/// Owned by a single send, never shared between sends.
pub(crate) struct Completion<F> {
    callback: Option<F>,
}

impl<F> Completion<F>
where
    F: FnOnce(SendResult),
{
    pub(crate) fn new(callback: F) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    /// Invoke the callback unless it already ran. Returns whether it ran.
    pub(crate) fn finish(&mut self, result: SendResult) -> bool {
        match self.callback.take() {
            Some(callback) => {
                callback(result);
                true
            }
            None => {
                let cause = result.as_ref().err().map(WebSmsError::cause);
                debug!(?cause, "send already completed, dropping late outcome");
                false
            }
        }
    }
}

impl WebSmsClient {
    /// Send a message and report the outcome through `callback`.
    ///
    /// - With no callback, a `parameter` error is logged and nothing else happens.
    /// - Failures detected before any I/O (invalid message, unknown message type,
    ///   out-of-range `max_sms_per_message`) invoke the callback before this returns.
    /// - Otherwise the request runs on a task spawned on the current Tokio runtime and the
    ///   callback is invoked once when it settles. The task handle is returned.
    ///
    /// Without a Tokio runtime the callback receives a `parameter` error.
    pub fn send_with_callback<M, F>(
        &self,
        message: &M,
        options: SendOptions,
        callback: Option<F>,
    ) -> Option<JoinHandle<()>>
    where
        M: Message + ?Sized,
        F: FnOnce(SendResult) + Send + 'static,
    {
        let Some(callback) = callback else {
            error!(cause = %ErrorCause::Parameter, "missing callback function");
            return None;
        };
        let mut completion = Completion::new(callback);

        let request = match self.prepare(message, options) {
            Ok(request) => request,
            Err(err) => {
                completion.finish(Err(err));
                return None;
            }
        };

        let Ok(runtime) = Handle::try_current() else {
            completion.finish(Err(WebSmsError::Parameter(
                "send_with_callback must be called from within a Tokio runtime",
            )));
            return None;
        };

        let http = Arc::clone(&self.http);
        Some(runtime.spawn(async move {
            let result = exchange(http.as_ref(), request).await;
            completion.finish(result);
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use crate::domain::StatusCode;

    use super::*;

    fn ok_response() -> SendResult {
        Ok(ApiResponse {
            status_code: Some(StatusCode::new(2000)),
            status_message: None,
            transfer_id: None,
            client_message_id: None,
        })
    }

    #[test]
    fn completion_runs_callback_only_once() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&calls);
        let mut completion = Completion::new(move |result: SendResult| {
            seen.lock().unwrap().push(result.is_ok());
        });

        assert!(completion.finish(ok_response()));
        assert!(!completion.finish(Err(WebSmsError::ResponseStream(
            "closed after response".into()
        ))));
        assert_eq!(*calls.lock().unwrap(), vec![true]);
    }

    #[test]
    fn completions_are_independent() {
        let calls = Arc::new(Mutex::new(0));
        let first_calls = Arc::clone(&calls);
        let second_calls = Arc::clone(&calls);
        let mut first = Completion::new(move |_: SendResult| *first_calls.lock().unwrap() += 1);
        let mut second = Completion::new(move |_: SendResult| *second_calls.lock().unwrap() += 1);

        assert!(first.finish(ok_response()));
        assert!(second.finish(ok_response()));
        assert!(!first.finish(ok_response()));
        assert_eq!(*calls.lock().unwrap(), 2);
    }
}
