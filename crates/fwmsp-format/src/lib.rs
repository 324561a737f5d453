// fwmsp-format: deterministic JSON-to-report transformation.
//
// Everything in this crate is a pure function of its inputs (plus the
// timestamp captured at format time): raw MSP JSON in, XML envelope with
// an embedded Markdown artifact out.

use std::collections::BTreeMap;

pub mod bytes;
pub mod dispatch;
pub mod envelope;
pub mod markdown;
pub mod xml;

/// Flat metadata map carried into the response envelope.
///
/// `BTreeMap` keeps envelope output deterministic for a given input.
pub type Meta = BTreeMap<String, String>;

pub use bytes::format_bytes;
pub use dispatch::render_enhanced;
pub use envelope::build_envelope;
pub use xml::{escape_xml, value_to_xml};
