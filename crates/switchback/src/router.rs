// File: src/router.rs
// Purpose: Registry of named route sets and request dispatch

use crate::builder::SetBuilder;
use crate::config::{RouterConfig, RoutingConfig};
use crate::context::{Context, Control, Request, Response};
use crate::error::{Result, RouterError};
use crate::func::Func;
use crate::lookup::RouteLookup;
use crate::method::Method;
use crate::route::{Handler, HandlerKey, Route, RouteMatch};
use crate::set::RouteSet;

/// How a dispatched request ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A route's chain ran to completion
    Routed { set: String, route: Option<String> },
    /// A handler's chain ran to completion
    Handled { name: Option<String>, code: Option<u16> },
    /// A function halted the chain
    Halted,
    /// Nothing matched and no fallback handler exists
    Unhandled,
}

enum Next {
    Route,
    Handle(HandlerKey),
}

/// Named route sets, consulted in registration order.
///
/// Set up once, then shared read-only between request handlers; the router
/// is `Send + Sync` and cheap to wrap in an `Arc`.
///
/// # Re-routing
///
/// A re-route restarts dispatch with the rewritten request. Route graphs that
/// re-route in a cycle, or handlers that hand off to each other, loop forever
/// unless [`RoutingConfig::max_reroutes`] is set. Both kinds of transfer count
/// against that limit.
#[derive(Debug, Clone, Default)]
pub struct Router {
    sets: Vec<(String, RouteSet)>,
    config: RoutingConfig,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RouterConfig) -> Self {
        Self {
            sets: Vec::new(),
            config: config.routing,
        }
    }

    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    /// Builds a set from `body` and registers it under `name`
    ///
    /// A set already registered under `name` is replaced in place, keeping
    /// its position in the dispatch order.
    pub fn set<F>(&mut self, name: impl Into<String>, body: F) -> Result<&RouteSet>
    where
        F: FnOnce(&mut SetBuilder),
    {
        let mut set = RouteSet::new().with_case_insensitive(self.config.case_insensitive);
        let name = name.into();
        set.set_name(name.clone());
        set.eval(body)?;
        Ok(self.insert(name, set))
    }

    /// Registers an already built set under `name`
    pub fn insert(&mut self, name: impl Into<String>, mut set: RouteSet) -> &RouteSet {
        let name = name.into();
        set.set_name(name.clone());

        match self.sets.iter().position(|(existing, _)| *existing == name) {
            Some(index) => {
                tracing::debug!("Replacing route set {}", name);
                self.sets[index].1 = set;
                &self.sets[index].1
            }
            None => {
                tracing::debug!("Registering route set {}", name);
                let index = self.sets.len();
                self.sets.push((name, set));
                &self.sets[index].1
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&RouteSet> {
        self.sets
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, set)| set)
    }

    /// Registered sets in dispatch order
    pub fn sets(&self) -> impl Iterator<Item = &RouteSet> {
        self.sets.iter().map(|(_, set)| set)
    }

    /// First route named `name`, searching sets in registration order
    pub fn route(&self, name: &str) -> Option<&Route> {
        self.sets().find_map(|set| set.route(name))
    }

    /// First handler answering `key`, searching sets in registration order
    pub fn handle(&self, key: impl Into<HandlerKey>) -> Option<&Handler> {
        let key = key.into();
        self.sets().find_map(|set| set.handle(&key))
    }

    /// Reverse lookup over every registered set
    pub fn lookup(&self) -> RouteLookup<'_> {
        RouteLookup::new(self)
    }

    /// Routes a request and runs the resulting chain
    ///
    /// Captured variables are written into the request's params before the
    /// chain runs. Functions may re-route, hand off to a handler or halt;
    /// see [`Context`]. The only error is exceeding the configured limit on
    /// re-routes and hand-offs.
    pub fn dispatch(&self, request: &mut dyn Request, response: &mut dyn Response) -> Result<Outcome> {
        let mut transfers = 0usize;
        let mut next = Next::Route;

        loop {
            let (chain, outcome) = match next {
                Next::Route => match self.find(request.path(), request.method()) {
                    Some((set, matched)) => {
                        tracing::debug!(
                            "{} /{} matched {} in set {}",
                            request.method(),
                            request.path().trim_start_matches('/'),
                            matched.pattern,
                            set
                        );
                        let params = request.params_mut();
                        for (name, value) in matched.captures {
                            params.insert(name, value);
                        }
                        let outcome = Outcome::Routed {
                            set: set.to_string(),
                            route: matched.name,
                        };
                        (matched.chain, outcome)
                    }
                    None => {
                        let code = self.config.not_found_code;
                        let fallback = self
                            .sets
                            .last()
                            .and_then(|(_, set)| set.handle(HandlerKey::Code(code)));
                        match fallback {
                            Some(handler) => {
                                tracing::debug!(
                                    "No route for {} {}, running {} handler",
                                    request.method(),
                                    request.path(),
                                    code
                                );
                                start_handler(handler, response)
                            }
                            None => {
                                tracing::warn!(
                                    "No route for {} {} and no {} handler",
                                    request.method(),
                                    request.path(),
                                    code
                                );
                                return Ok(Outcome::Unhandled);
                            }
                        }
                    }
                },
                Next::Handle(key) => match self.handle(&key) {
                    Some(handler) => {
                        tracing::debug!("Handing off to handler {}", key);
                        start_handler(handler, response)
                    }
                    None => {
                        tracing::warn!("No handler registered for {}", key);
                        return Ok(Outcome::Unhandled);
                    }
                },
            };

            let control = {
                let mut ctx = Context::new(&mut *request, &mut *response);
                run_chain(&chain, &mut ctx)
            };

            match control {
                None => return Ok(outcome),
                Some(Control::Halt) => {
                    tracing::debug!("Chain halted");
                    return Ok(Outcome::Halted);
                }
                Some(Control::Handle(key)) => {
                    transfers += 1;
                    self.check_transfers(transfers, request.path())?;
                    next = Next::Handle(key);
                }
                Some(Control::Reroute { path, method }) => {
                    transfers += 1;
                    self.check_transfers(transfers, &path)?;
                    tracing::debug!("Re-routing to {} {}", method, path);
                    request.set_path(&path);
                    request.set_method(method);
                    next = Next::Route;
                }
            }
        }
    }

    /// Re-routes and handler hand-offs share one limit
    fn check_transfers(&self, transfers: usize, path: &str) -> Result<()> {
        match self.config.max_reroutes {
            Some(limit) if transfers > limit => Err(RouterError::TooManyReroutes {
                limit,
                path: path.to_string(),
            }),
            _ => Ok(()),
        }
    }

    fn find(&self, path: &str, method: Method) -> Option<(&str, RouteMatch)> {
        self.sets.iter().find_map(|(name, set)| {
            set.match_route(path, method)
                .and_then(|matches| matches.into_iter().next())
                .map(|matched| (name.as_str(), matched))
        })
    }
}

fn start_handler(handler: &Handler, response: &mut dyn Response) -> (Vec<Func>, Outcome) {
    if let Some(code) = handler.code() {
        response.set_status(code);
    }
    let outcome = Outcome::Handled {
        name: handler.name().map(str::to_string),
        code: handler.code(),
    };
    (handler.chain().to_vec(), outcome)
}

/// Runs functions in order until one requests a transfer of control
fn run_chain(chain: &[Func], ctx: &mut Context<'_>) -> Option<Control> {
    for (index, func) in chain.iter().enumerate() {
        tracing::trace!("Running function {} of {}", index + 1, chain.len());
        func.call(ctx);
        if let Some(control) = ctx.take_control() {
            return Some(control);
        }
    }
    None
}
