//! Queued calls and the commands they resolve to.
//!
//! A host page records instrumentation as `[methodName, ...args]` tuples,
//! possibly before the tracker exists. [`Call`] is one such tuple;
//! [`Command`] is its typed interpretation.

use serde_json::Value;
use std::fmt;

use crate::response::TrackResponse;
use crate::types::{Account, PropertyMap};

/// Callback invoked once a tracked event has been answered.
///
/// Receives the classified response and the event object that was sent.
pub type TrackCallback = Box<dyn FnOnce(TrackResponse, PropertyMap) + Send + 'static>;

/// One argument of a queued call.
pub enum Arg {
    /// A plain JSON value.
    Value(Value),
    /// A native callback (only meaningful for tracking calls).
    Callback(TrackCallback),
}

impl Arg {
    /// The JSON value, if this argument is one.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Arg::Value(value) => Some(value),
            Arg::Callback(_) => None,
        }
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Value(value) => write!(f, "Value({})", value),
            Arg::Callback(_) => write!(f, "Callback(..)"),
        }
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Arg::Value(value)
    }
}

/// A well-formed queued call: a method name followed by arguments.
#[derive(Debug)]
pub struct Call {
    method: String,
    args: Vec<Arg>,
}

impl Call {
    /// Start a call to `method` with no arguments.
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            args: Vec::new(),
        }
    }

    /// Append a JSON argument.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(Arg::Value(value.into()));
        self
    }

    /// Append a callback argument.
    pub fn callback<F>(mut self, f: F) -> Self
    where
        F: FnOnce(TrackResponse, PropertyMap) + Send + 'static,
    {
        self.args.push(Arg::Callback(Box::new(f)));
        self
    }

    /// Parse a raw `[methodName, ...args]` tuple.
    ///
    /// Returns `None` for anything that is not an array headed by a string.
    pub fn from_json(value: Value) -> Option<Self> {
        let Value::Array(items) = value else {
            return None;
        };
        let mut items = items.into_iter();
        let Some(Value::String(method)) = items.next() else {
            return None;
        };
        Some(Self {
            method,
            args: items.map(Arg::Value).collect(),
        })
    }

    /// The method name as pushed.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The arguments following the method name.
    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    /// Which dispatch group this call belongs to.
    pub fn category(&self) -> CallCategory {
        CallCategory::of(&self.method)
    }
}

/// Dispatch group of a call, derived from its method name.
///
/// Groups run in declaration order: account first, then configuration, then
/// tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CallCategory {
    /// Method name contains `setAccount`.
    Account,
    /// Anything that is neither account nor tracking.
    Config,
    /// Method name contains `track`.
    Tracking,
}

impl CallCategory {
    /// Classify a method name. Substring matches, account checked first.
    pub fn of(method: &str) -> Self {
        if method.contains("setAccount") {
            CallCategory::Account
        } else if method.contains("track") {
            CallCategory::Tracking
        } else {
            CallCategory::Config
        }
    }
}

/// A call resolved against the tracker's known operations.
pub enum Command {
    SetAccount(Account),
    Identify(String),
    Set(Value),
    SetOnce(Value),
    Unset(String),
    TrackEvent {
        props: PropertyMap,
        callback: Option<TrackCallback>,
    },
    /// A known method whose arguments have the wrong shape.
    Invalid {
        method: String,
        reason: &'static str,
    },
    /// A method name the tracker does not implement.
    Unknown(String),
}

impl Command {
    /// Resolve a call. Never fails: bad input becomes `Invalid` or `Unknown`.
    ///
    /// A single leading underscore on the method name is ignored, so
    /// `_setAccount` and `setAccount` are the same operation.
    pub fn from_call(call: Call) -> Self {
        let Call { method, args } = call;
        let name = method.strip_prefix('_').unwrap_or(&method).to_owned();
        let mut args = args.into_iter();

        match name.as_str() {
            "setAccount" => match (next_string(&mut args), next_string(&mut args)) {
                (Some(input_id), Some(token)) => Command::SetAccount(Account::new(input_id, token)),
                _ => Command::Invalid {
                    method,
                    reason: "expected (inputId: string, token: string)",
                },
            },
            "identify" => match next_string(&mut args) {
                Some(uid) => Command::Identify(uid),
                None => Command::Invalid {
                    method,
                    reason: "expected (uid: string)",
                },
            },
            "set" => Command::Set(next_value(&mut args)),
            "setOnce" => Command::SetOnce(next_value(&mut args)),
            "unset" => match next_string(&mut args) {
                Some(key) => Command::Unset(key),
                None => Command::Invalid {
                    method,
                    reason: "expected (prop: string)",
                },
            },
            "trackEvent" => {
                let props = match next_value(&mut args) {
                    Value::Object(props) => props,
                    Value::Null => PropertyMap::new(),
                    _ => {
                        return Command::Invalid {
                            method,
                            reason: "expected (props: object, callback?)",
                        }
                    }
                };
                let callback = match args.next() {
                    Some(Arg::Callback(callback)) => Some(callback),
                    _ => None,
                };
                Command::TrackEvent { props, callback }
            }
            _ => Command::Unknown(method),
        }
    }

    /// Short name for logging.
    pub fn name(&self) -> &str {
        match self {
            Command::SetAccount(_) => "setAccount",
            Command::Identify(_) => "identify",
            Command::Set(_) => "set",
            Command::SetOnce(_) => "setOnce",
            Command::Unset(_) => "unset",
            Command::TrackEvent { .. } => "trackEvent",
            Command::Invalid { method, .. } => method,
            Command::Unknown(method) => method,
        }
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::SetAccount(account) => f.debug_tuple("SetAccount").field(account).finish(),
            Command::Identify(uid) => f.debug_tuple("Identify").field(uid).finish(),
            Command::Set(props) => f.debug_tuple("Set").field(props).finish(),
            Command::SetOnce(props) => f.debug_tuple("SetOnce").field(props).finish(),
            Command::Unset(key) => f.debug_tuple("Unset").field(key).finish(),
            Command::TrackEvent { props, callback } => f
                .debug_struct("TrackEvent")
                .field("props", props)
                .field("callback", &callback.is_some())
                .finish(),
            Command::Invalid { method, reason } => f
                .debug_struct("Invalid")
                .field("method", method)
                .field("reason", reason)
                .finish(),
            Command::Unknown(method) => f.debug_tuple("Unknown").field(method).finish(),
        }
    }
}

fn next_value(args: &mut impl Iterator<Item = Arg>) -> Value {
    match args.next() {
        Some(Arg::Value(value)) => value,
        _ => Value::Null,
    }
}

fn next_string(args: &mut impl Iterator<Item = Arg>) -> Option<String> {
    match args.next() {
        Some(Arg::Value(Value::String(s))) => Some(s),
        _ => None,
    }
}
