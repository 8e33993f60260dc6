//! Utilities for managing incoming signals

use std::sync::RwLock;

use log::debug;

/// The exit code used when an interrupt arrives while nobody is listening (`128 + SIGINT`)
pub const INTERRUPT_EXIT_CODE: i32 = 130;

/// A structure to handle incoming signals and dispatch them to the newest signal handler
///
/// Without any registered handler, an incoming signal terminates the process
/// with `INTERRUPT_EXIT_CODE`.
#[derive(Default)]
pub struct SignalDispatcher {
    handlers: RwLock<Vec<Box<dyn FnMut() + Send + Sync>>>,
}

impl SignalDispatcher {
    /// Pushes a new handler function to invoke when a signal arrives
    /// # Arguments
    /// * `function` - The function to invoke
    /// # Returns
    /// A handler guard that automatically pops the handler when the guard is dropped
    #[must_use]
    pub fn add_handler(&self, function: Box<dyn FnMut() + Send + Sync>) -> HandlerGuard {
        self.handlers
            .write()
            .expect("Poisoned signal handler collection")
            .push(function);

        HandlerGuard { dispatcher: self }
    }

    /// Returns the number of currently registered handlers
    pub fn handler_count(&self) -> usize {
        self.handlers
            .read()
            .expect("Poisoned signal handler collection")
            .len()
    }

    /// Invokes the top-most registered handler, exits the process if there is none
    pub fn handle(&self) {
        if !self.dispatch() {
            debug!("Interrupted without a registered handler, exiting");
            std::process::exit(INTERRUPT_EXIT_CODE);
        }
    }

    /// Invokes the top-most registered handler
    /// # Returns
    /// `false` if there was no handler to invoke
    fn dispatch(&self) -> bool {
        match self
            .handlers
            .write()
            .expect("Poisoned signal handler collection")
            .last_mut()
        {
            Some(h) => {
                h();
                true
            }
            None => false,
        }
    }

    fn pop_last_handler(&self) {
        self.handlers
            .write()
            .expect("Poisoned signal handler collection")
            .pop();
    }
}

/// A structure that automatically drops the top-most handler
/// function from the dispatcher when the object is dropped
pub struct HandlerGuard<'a> {
    dispatcher: &'a SignalDispatcher,
}

impl<'a> Drop for HandlerGuard<'a> {
    fn drop(&mut self) {
        self.dispatcher.pop_last_handler()
    }
}
