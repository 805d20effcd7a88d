//! Output builders for the two render targets (SVG documents, HTML fragments)

pub mod html;
pub mod svg;
