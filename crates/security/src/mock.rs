//! Recording transport double for the credential flow tests

use dsec_core::{Error, Result};
use dsec_drpc::{Call, Connector, Response, Session};
use std::cell::RefCell;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// What the mock peer does with the next call
pub(crate) enum Reply {
    /// Answer with a successful response carrying this body
    Body(Vec<u8>),
    /// Answer with a complete response
    Response(Response),
    /// Close the call without a response
    Nothing,
    /// Fail the call itself
    CallFails,
}

#[derive(Default)]
pub(crate) struct Recorded {
    pub connected_to: Vec<PathBuf>,
    pub calls: Vec<Call>,
    pub closed: usize,
}

/// Connector whose sessions answer with a scripted reply
#[derive(Clone)]
pub(crate) struct MockConnector {
    reply: Rc<RefCell<Option<Reply>>>,
    refuse: bool,
    pub recorded: Rc<RefCell<Recorded>>,
}

impl MockConnector {
    pub fn replying(reply: Reply) -> Self {
        Self {
            reply: Rc::new(RefCell::new(Some(reply))),
            refuse: false,
            recorded: Rc::default(),
        }
    }

    pub fn refusing() -> Self {
        Self {
            refuse: true,
            ..Self::replying(Reply::Nothing)
        }
    }

    pub fn connects(&self) -> usize {
        self.recorded.borrow().connected_to.len()
    }

    /// Every opened session has been dropped
    pub fn all_closed(&self) -> bool {
        let recorded = self.recorded.borrow();
        recorded.closed == recorded.connected_to.len()
    }

    pub fn last_call(&self) -> Option<Call> {
        self.recorded.borrow().calls.last().cloned()
    }
}

pub(crate) struct MockSession {
    reply: Rc<RefCell<Option<Reply>>>,
    recorded: Rc<RefCell<Recorded>>,
}

impl Connector for MockConnector {
    type Session = MockSession;

    fn connect(&self, path: &Path) -> Result<MockSession> {
        if self.refuse {
            return Err(Error::connect_failed(
                path,
                io::Error::from(io::ErrorKind::ConnectionRefused),
            ));
        }
        self.recorded
            .borrow_mut()
            .connected_to
            .push(path.to_path_buf());
        Ok(MockSession {
            reply: Rc::clone(&self.reply),
            recorded: Rc::clone(&self.recorded),
        })
    }
}

impl Session for MockSession {
    fn call(&mut self, call: &Call) -> Result<Option<Response>> {
        self.recorded.borrow_mut().calls.push(call.clone());
        match self.reply.borrow_mut().take() {
            Some(Reply::Body(body)) => Ok(Some(Response::success(call.sequence, body))),
            Some(Reply::Response(response)) => Ok(Some(response)),
            Some(Reply::Nothing) | None => Ok(None),
            Some(Reply::CallFails) => Err(Error::transport(
                "mock call",
                io::Error::from(io::ErrorKind::BrokenPipe),
            )),
        }
    }
}

impl Drop for MockSession {
    fn drop(&mut self) {
        self.recorded.borrow_mut().closed += 1;
    }
}
