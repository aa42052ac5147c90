//! Completion delivery on the control thread.
//!
//! The audio thread only flips a bit when a fade ends. Turning that bit into
//! user code running happens here, from [`crate::FadeHandle::dispatch`], so
//! callbacks are free to allocate, lock or take their time.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::{dsp::envelope::FadeKind, error::FadeError};

/// Receives fade completions. Both hooks default to doing nothing.
pub trait FadeListener: Send {
    fn on_fade_in_complete(&mut self) {}

    fn on_fade_out_complete(&mut self) {}
}

pub(crate) type Callback = Box<dyn FnOnce() + Send>;

/// One-shot completion callbacks plus an optional long-lived listener.
#[derive(Default)]
pub struct FadeNotifier {
    on_fade_in: Option<Callback>,
    on_fade_out: Option<Callback>,
    listener: Option<Box<dyn FadeListener>>,
}

impl FadeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` once, the next time a fade-in completes.
    pub fn on_fade_in_complete(&mut self, f: impl FnOnce() + Send + 'static) {
        self.on_fade_in = Some(Box::new(f));
    }

    /// Run `f` once, the next time a fade-out completes.
    pub fn on_fade_out_complete(&mut self, f: impl FnOnce() + Send + 'static) {
        self.on_fade_out = Some(Box::new(f));
    }

    pub fn clear_fade_in_callback(&mut self) {
        self.on_fade_in = None;
    }

    pub fn clear_fade_out_callback(&mut self) {
        self.on_fade_out = None;
    }

    /// Swap the pending fade-out callback, returning the one it displaced.
    pub(crate) fn replace_fade_out_callback(&mut self, callback: Option<Callback>) -> Option<Callback> {
        std::mem::replace(&mut self.on_fade_out, callback)
    }

    pub fn set_listener(&mut self, listener: impl FadeListener + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    pub fn has_listener(&self) -> bool {
        self.listener.is_some()
    }

    /// Invoke the one-shot callback for `kind`, then the listener hook.
    ///
    /// Panics from either are caught and logged; the listener still runs if
    /// the callback panicked. The first panic is returned.
    pub fn deliver(&mut self, kind: FadeKind) -> Result<(), FadeError> {
        let callback = match kind {
            FadeKind::In => self.on_fade_in.take(),
            FadeKind::Out => self.on_fade_out.take(),
        };

        let mut result = Ok(());

        if let Some(callback) = callback {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(callback)) {
                result = Err(callback_panicked(kind, payload));
            }
        }

        if let Some(listener) = self.listener.as_mut() {
            let hook = panic::catch_unwind(AssertUnwindSafe(|| match kind {
                FadeKind::In => listener.on_fade_in_complete(),
                FadeKind::Out => listener.on_fade_out_complete(),
            }));
            if let Err(payload) = hook {
                let err = callback_panicked(kind, payload);
                if result.is_ok() {
                    result = Err(err);
                }
            }
        }

        result
    }
}

fn callback_panicked(kind: FadeKind, payload: Box<dyn Any + Send>) -> FadeError {
    let message = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        String::from("unknown panic payload")
    };

    log::error!("{} completion callback panicked: {}", kind, message);
    FadeError::CallbackPanicked { kind, message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    };

    #[derive(Clone, Default)]
    struct Recorder {
        events: Arc<Mutex<Vec<&'static str>>>,
    }

    impl FadeListener for Recorder {
        fn on_fade_in_complete(&mut self) {
            self.events.lock().unwrap().push("listener:in");
        }

        fn on_fade_out_complete(&mut self) {
            self.events.lock().unwrap().push("listener:out");
        }
    }

    #[test]
    fn callback_runs_before_listener() {
        let recorder = Recorder::default();
        let mut notifier = FadeNotifier::new();
        notifier.set_listener(recorder.clone());

        let events = recorder.events.clone();
        notifier.on_fade_out_complete(move || events.lock().unwrap().push("callback:out"));

        notifier.deliver(FadeKind::Out).unwrap();
        assert_eq!(
            *recorder.events.lock().unwrap(),
            ["callback:out", "listener:out"]
        );
    }

    #[test]
    fn callbacks_are_one_shot() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut notifier = FadeNotifier::new();
        let counter = count.clone();
        notifier.on_fade_in_complete(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        notifier.deliver(FadeKind::In).unwrap();
        notifier.deliver(FadeKind::In).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn callback_for_other_direction_is_untouched() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut notifier = FadeNotifier::new();
        let counter = count.clone();
        notifier.on_fade_out_complete(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        notifier.deliver(FadeKind::In).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 0);
        notifier.deliver(FadeKind::Out).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn replaced_callback_can_be_put_back() {
        let recorder = Recorder::default();
        let mut notifier = FadeNotifier::new();
        let events = recorder.events.clone();
        notifier.on_fade_out_complete(move || events.lock().unwrap().push("first"));

        let previous = notifier.replace_fade_out_callback(Some(Box::new(|| {})));
        notifier.replace_fade_out_callback(previous);
        notifier.deliver(FadeKind::Out).unwrap();
        assert_eq!(*recorder.events.lock().unwrap(), ["first"]);

        notifier.on_fade_out_complete(|| panic!("cleared callbacks never run"));
        notifier.clear_fade_out_callback();
        assert!(notifier.deliver(FadeKind::Out).is_ok());
    }

    #[test]
    fn default_listener_hooks_do_nothing() {
        struct Silent;
        impl FadeListener for Silent {}

        let mut notifier = FadeNotifier::new();
        notifier.set_listener(Silent);
        assert!(notifier.has_listener());
        assert!(notifier.deliver(FadeKind::In).is_ok());
        assert!(notifier.deliver(FadeKind::Out).is_ok());
    }

    #[test]
    fn panicking_callback_is_contained() {
        let recorder = Recorder::default();
        let mut notifier = FadeNotifier::new();
        notifier.set_listener(recorder.clone());
        notifier.on_fade_out_complete(|| panic!("boom"));

        let result = notifier.deliver(FadeKind::Out);
        assert_eq!(
            result,
            Err(FadeError::CallbackPanicked {
                kind: FadeKind::Out,
                message: "boom".to_string(),
            })
        );
        // listener still heard about it
        assert_eq!(*recorder.events.lock().unwrap(), ["listener:out"]);
    }
}
