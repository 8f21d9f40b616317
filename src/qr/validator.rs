//! Request Validator
//!
//! A pure state machine over request snapshots:
//!
//! ```text
//! Empty --Edit--> Encoding --Advance--> Classified --Advance--> Accepted
//!                    |                      |
//!                    +--> Rejected <--------+
//! ```
//!
//! `Edit` restarts from `Encoding` in every state, so nothing from an earlier
//! request survives into the next one. [`RequestValidator::validate`] drives a
//! request to a terminal state and then applies the optional dynamic adapter.

use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

use super::capacity::capacity_for;
use super::content::Content;
use super::dynamic::{DynamicAdapter, ShortLinkFallback};
use super::encoder::encode;
use super::selector::{select, Selection};
use super::types::{
    ContentKind, EncodedPayload, GenerationRequest, RenderTicket, Version, VersionChoice,
};
use super::{ErrorCorrectionLevel, Rejection};

const LOG_MODULE: &str = "qr::validator";

lazy_static! {
    static ref EMAIL_SHAPE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    static ref PHONE_SHAPE: Regex = Regex::new(r"^\+?[0-9\s\-().]+$").unwrap();
}

/// An accepted request: the payload plus the version it will be drawn at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accepted {
    pub encoded: EncodedPayload,
    /// Pinned version, or the required one in auto mode
    pub version: Version,
}

impl Accepted {
    pub fn ticket(&self) -> RenderTicket {
        RenderTicket {
            payload: self.encoded.raw_string.clone(),
            version: self.version,
            level: self.encoded.level,
        }
    }
}

/// Validator states
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationState {
    Empty,
    Encoding(GenerationRequest),
    Classified {
        request: GenerationRequest,
        payload: String,
        selection: Selection,
    },
    Accepted(Accepted),
    Rejected(Rejection),
}

impl ValidationState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ValidationState::Accepted(_) | ValidationState::Rejected(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            ValidationState::Empty => "empty",
            ValidationState::Encoding(_) => "encoding",
            ValidationState::Classified { .. } => "classified",
            ValidationState::Accepted(_) => "accepted",
            ValidationState::Rejected(_) => "rejected",
        }
    }
}

/// Validator events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationEvent {
    /// The form changed; carries the new snapshot
    Edit(GenerationRequest),
    /// Run the next step
    Advance,
}

/// Pure state transition
pub fn transition(state: ValidationState, event: ValidationEvent) -> ValidationState {
    match (state, event) {
        (_, ValidationEvent::Edit(request)) => ValidationState::Encoding(request),
        (ValidationState::Encoding(request), ValidationEvent::Advance) => encode_step(request),
        (
            ValidationState::Classified {
                request,
                payload,
                selection,
            },
            ValidationEvent::Advance,
        ) => match settle(request.content_type, payload, selection, request.level, request.version) {
            Ok(accepted) => ValidationState::Accepted(accepted),
            Err(rejection) => ValidationState::Rejected(rejection),
        },
        (state, ValidationEvent::Advance) => state,
    }
}

/// Encoding -> Rejected(NoData | InvalidFormat) | Classified
fn encode_step(request: GenerationRequest) -> ValidationState {
    let content = Content::from_fields(request.content_type, &request.fields);
    let payload = encode(&content);

    if payload.is_empty() {
        return ValidationState::Rejected(Rejection::NoData(format!(
            "required {} fields are empty",
            request.content_type
        )));
    }

    if let Err(rejection) = check_format(&content) {
        return ValidationState::Rejected(rejection);
    }

    let selection = select(&payload, request.level);
    ValidationState::Classified {
        request,
        payload,
        selection,
    }
}

/// Shape checks that run before any capacity check
fn check_format(content: &Content) -> Result<(), Rejection> {
    match content {
        Content::Url(f) => Url::parse(&f.url)
            .map(|_| ())
            .map_err(|e| Rejection::InvalidFormat(format!("url does not parse: {}", e))),
        Content::Email(f) if !EMAIL_SHAPE.is_match(&f.email) => Err(Rejection::InvalidFormat(
            format!("{:?} is not an email address", f.email),
        )),
        Content::Phone(f) if !is_phone_number(&f.number) => Err(Rejection::InvalidFormat(
            format!("{:?} is not a phone number", f.number),
        )),
        _ => Ok(()),
    }
}

fn is_phone_number(number: &str) -> bool {
    PHONE_SHAPE.is_match(number) && number.chars().any(|c| c.is_ascii_digit())
}

/// Capacity decision for a classified payload.
///
/// A pinned version must hold the payload. In auto mode the smallest fitting
/// version wins, and a payload that overflows version 40 at `level` is
/// rejected as `CapacityExceeded` rather than truncated.
fn settle(
    content_type: ContentKind,
    payload: String,
    selection: Selection,
    level: ErrorCorrectionLevel,
    choice: VersionChoice,
) -> Result<Accepted, Rejection> {
    let version = match choice {
        VersionChoice::Pinned(pinned) => {
            let capacity = capacity_for(pinned, level).capacity_of(selection.alphabet);
            if selection.byte_length > capacity {
                return Err(Rejection::CapacityExceeded(format!(
                    "payload needs {} bytes as {}; version {} at level {} holds {}",
                    selection.byte_length, selection.alphabet, pinned, level, capacity
                )));
            }
            pinned
        }
        VersionChoice::Auto if !selection.fits => {
            let capacity = capacity_for(Version::MAX, level).capacity_of(selection.alphabet);
            return Err(Rejection::CapacityExceeded(format!(
                "payload needs {} bytes as {}; the largest version ({}) at level {} holds {}",
                selection.byte_length, selection.alphabet, Version::MAX, level, capacity
            )));
        }
        VersionChoice::Auto => selection.version,
    };

    Ok(Accepted {
        encoded: EncodedPayload {
            content_type,
            byte_length: selection.byte_length,
            alphabet_class: selection.alphabet,
            required_version: selection.version,
            level,
            raw_string: payload,
            short_link_source: None,
        },
        version,
    })
}

/// Runs requests through the state machine
#[derive(Default)]
pub struct RequestValidator {
    dynamic: Option<DynamicAdapter>,
}

impl RequestValidator {
    /// Validator without short-link support
    pub fn new() -> Self {
        Self { dynamic: None }
    }

    /// Validator that wraps link-like content when a request asks for it
    pub fn with_dynamic(adapter: DynamicAdapter) -> Self {
        Self {
            dynamic: Some(adapter),
        }
    }

    /// Validate one request snapshot
    pub fn validate(&self, request: &GenerationRequest) -> Result<Accepted, Rejection> {
        let mut state = transition(ValidationState::Empty, ValidationEvent::Edit(request.clone()));
        let accepted = loop {
            match state {
                ValidationState::Accepted(accepted) => break accepted,
                ValidationState::Rejected(rejection) => {
                    crate::log_debug!(
                        LOG_MODULE,
                        "request rejected",
                        content_type = request.content_type,
                        reason = rejection
                    );
                    return Err(rejection);
                }
                pending => {
                    let from = pending.name();
                    state = transition(pending, ValidationEvent::Advance);
                    crate::log_debug!(LOG_MODULE, "transition", from = from, to = state.name());
                }
            }
        };

        if !request.dynamic {
            return Ok(accepted);
        }
        match &self.dynamic {
            Some(adapter) => self.apply_dynamic(adapter, accepted, request),
            None => {
                crate::log_warn!(LOG_MODULE, "dynamic mode requested without a short-link service");
                Ok(accepted)
            }
        }
    }

    /// Wrap an accepted payload and re-check the short reference
    fn apply_dynamic(
        &self,
        adapter: &DynamicAdapter,
        accepted: Accepted,
        request: &GenerationRequest,
    ) -> Result<Accepted, Rejection> {
        let content_type = request.content_type;
        if !content_type.is_linkable() {
            crate::log_warn!(
                LOG_MODULE,
                "dynamic mode ignored for non-link content",
                content_type = content_type
            );
            return Ok(accepted);
        }

        let original = accepted.encoded.raw_string.clone();
        match adapter.wrap(&original) {
            Ok(short) => {
                let selection = select(&short, request.level);
                let mut wrapped = settle(content_type, short, selection, request.level, request.version)?;
                wrapped.encoded.short_link_source = Some(original);
                crate::log_debug!(
                    LOG_MODULE,
                    "payload wrapped",
                    payload = wrapped.encoded.raw_string,
                    version = wrapped.version
                );
                Ok(wrapped)
            }
            Err(e) => match adapter.fallback() {
                ShortLinkFallback::UseOriginal => {
                    crate::log_warn!(LOG_MODULE, "short link unavailable, keeping original", error = e);
                    Ok(accepted)
                }
                ShortLinkFallback::Reject => Err(Rejection::CapacityExceeded(format!(
                    "short link could not be issued: {}",
                    e
                ))),
            },
        }
    }
}
