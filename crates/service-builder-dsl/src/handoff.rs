//! Lexing on a dedicated scanning thread.
//!
//! The scanning thread hands each lexeme to the parser through a
//! zero-capacity channel, so it blocks after every lexeme until the parser
//! takes it. Cancellation is explicit: [`Handoff::cancel`] (or dropping the
//! handoff) wakes the scanning thread at its next handoff point and joins it.

use std::io::Read;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, select, Receiver, Sender};

use crate::error::ScanError;
use crate::lexer::{LexemeSource, Lexer};
use crate::token::{Lexeme, Token};

type Delivery = Result<Lexeme, ScanError>;

/// The parser-side end of a threaded lexer.
pub struct Handoff {
    lexemes: Receiver<Delivery>,
    cancel: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
    end: Option<Lexeme>,
}

impl Handoff {
    /// Starts `lexer` on its own thread.
    ///
    /// # Errors
    ///
    /// Returns `ScanError::Io` if the thread cannot be spawned.
    pub fn spawn<R>(lexer: Lexer<R>) -> Result<Self, ScanError>
    where
        R: Read + Send + 'static,
    {
        let (lexeme_tx, lexeme_rx) = bounded(0);
        let (cancel_tx, cancel_rx) = bounded(0);

        let worker = thread::Builder::new()
            .name("dsl-scanner".to_string())
            .spawn(move || scan(lexer, lexeme_tx, cancel_rx))
            .map_err(|e| ScanError::io(&e, crate::error::Position::START))?;
        tracing::debug!("scanning thread started");

        Ok(Self {
            lexemes: lexeme_rx,
            cancel: Some(cancel_tx),
            worker: Some(worker),
            end: None,
        })
    }

    /// Stops the scanning thread and waits for it to exit.
    ///
    /// The thread notices the signal while it is waiting to hand over a
    /// lexeme; a read blocked inside the underlying reader finishes first.
    /// Calling this more than once is harmless.
    pub fn cancel(&mut self) {
        if self.cancel.take().is_some() {
            tracing::debug!("cancelling scanning thread");
        }
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::warn!("scanning thread panicked");
            }
        }
    }
}

impl LexemeSource for Handoff {
    fn next_lexeme(&mut self) -> Result<Lexeme, ScanError> {
        if let Some(end) = &self.end {
            return Ok(end.clone());
        }
        match self.lexemes.recv() {
            Ok(Ok(lexeme)) => {
                if lexeme.token == Token::Eof {
                    self.end = Some(lexeme.clone());
                }
                Ok(lexeme)
            }
            Ok(Err(e)) => Err(e),
            Err(_) => Err(ScanError::Disconnected),
        }
    }
}

impl Drop for Handoff {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn scan<R: Read>(mut lexer: Lexer<R>, lexemes: Sender<Delivery>, cancel: Receiver<()>) {
    loop {
        let delivery = lexer.next_lexeme();
        let last = !matches!(&delivery, Ok(lexeme) if lexeme.token != Token::Eof);

        select! {
            send(lexemes, delivery) -> sent => {
                if sent.is_err() {
                    tracing::debug!("parser went away; scanning thread exiting");
                    return;
                }
            }
            recv(cancel) -> _ => {
                tracing::debug!("scanning thread cancelled");
                return;
            }
        }

        if last {
            return;
        }
    }
}
