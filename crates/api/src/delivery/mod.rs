//! Outbound delivery of generated reports.
//!
//! - [`email`] -- SMTP delivery with the PDF attached.

pub mod email;
