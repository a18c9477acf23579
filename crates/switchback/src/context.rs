// File: src/context.rs
// Purpose: Request/response seam and the per-call context handed to functions

use std::collections::HashMap;

use crate::method::Method;
use crate::route::HandlerKey;

/// Key/value store the router writes captured variables into
pub type Params = HashMap<String, String>;

/// Inbound request as seen by the router.
///
/// Re-routing rewrites the path and method in place, so anything else the
/// request carries (params included) survives a re-route.
pub trait Request {
    fn path(&self) -> &str;
    fn method(&self) -> Method;
    fn set_path(&mut self, path: &str);
    fn set_method(&mut self, method: Method);
    fn params(&self) -> &Params;
    fn params_mut(&mut self) -> &mut Params;
}

/// Outbound response as seen by the router
pub trait Response {
    fn status(&self) -> u16;
    fn set_status(&mut self, status: u16);
}

/// Minimal owned request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicRequest {
    pub method: Method,
    pub path: String,
    pub params: Params,
}

impl BasicRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: Params::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }
}

impl Request for BasicRequest {
    fn path(&self) -> &str {
        &self.path
    }

    fn method(&self) -> Method {
        self.method
    }

    fn set_path(&mut self, path: &str) {
        self.path = path.to_string();
    }

    fn set_method(&mut self, method: Method) {
        self.method = method;
    }

    fn params(&self) -> &Params {
        &self.params
    }

    fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }
}

/// Minimal response carrying only a status code (defaults to 200)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicResponse {
    pub status: u16,
}

impl Default for BasicResponse {
    fn default() -> Self {
        Self { status: 200 }
    }
}

impl Response for BasicResponse {
    fn status(&self) -> u16 {
        self.status
    }

    fn set_status(&mut self, status: u16) {
        self.status = status;
    }
}

/// Transfer of control requested by a function
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    /// Abandon the chain and route again with a new path and method
    Reroute { path: String, method: Method },
    /// Abandon the chain and run an error handler
    Handle(HandlerKey),
    /// Abandon the chain
    Halt,
}

/// Context handed to every function in a chain.
///
/// Control operations take effect once the calling function returns: the
/// rest of the chain is skipped. If a function requests several, the last
/// one wins.
pub struct Context<'a> {
    request: &'a mut dyn Request,
    response: &'a mut dyn Response,
    control: Option<Control>,
}

impl<'a> Context<'a> {
    pub fn new(request: &'a mut dyn Request, response: &'a mut dyn Response) -> Self {
        Self {
            request,
            response,
            control: None,
        }
    }

    pub fn request(&self) -> &dyn Request {
        &*self.request
    }

    pub fn request_mut(&mut self) -> &mut dyn Request {
        &mut *self.request
    }

    pub fn response(&self) -> &dyn Response {
        &*self.response
    }

    pub fn response_mut(&mut self) -> &mut dyn Response {
        &mut *self.response
    }

    pub fn path(&self) -> &str {
        self.request.path()
    }

    pub fn method(&self) -> Method {
        self.request.method()
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.request.params().get(name).map(String::as_str)
    }

    pub fn params_mut(&mut self) -> &mut Params {
        self.request.params_mut()
    }

    /// Re-routes to `path`, keeping the current method
    pub fn reroute(&mut self, path: impl Into<String>) {
        let method = self.request.method();
        self.reroute_with(path, method);
    }

    /// Re-routes to `path` with a new method
    pub fn reroute_with(&mut self, path: impl Into<String>, method: Method) {
        self.control = Some(Control::Reroute {
            path: path.into(),
            method,
        });
    }

    /// Runs the handler registered under `key` and ends the chain
    pub fn handle(&mut self, key: impl Into<HandlerKey>) {
        self.control = Some(Control::Handle(key.into()));
    }

    pub fn halt(&mut self) {
        self.control = Some(Control::Halt);
    }

    /// Pending control operation, if any
    pub fn control(&self) -> Option<&Control> {
        self.control.as_ref()
    }

    pub(crate) fn take_control(&mut self) -> Option<Control> {
        self.control.take()
    }
}
